//! Static object kind, ego and artifact tables.
//!
//! A slice of the full game's item lists: enough variety for every depth
//! band so drop generation always has something to hand out. Index 0 must
//! stay the gold kind.

use crate::object::{ArtifactKind, EgoKind, ObjectClass, ObjectKind};

pub static KINDS: &[ObjectKind] = &[
    ObjectKind { name: "gold", class: ObjectClass::Gold, level: 0, cost: 0 },
    // shallow
    ObjectKind { name: "ration of food", class: ObjectClass::Food, level: 0, cost: 3 },
    ObjectKind { name: "wooden torch", class: ObjectClass::Light, level: 1, cost: 2 },
    ObjectKind { name: "dagger", class: ObjectClass::Weapon, level: 1, cost: 10 },
    ObjectKind { name: "sling", class: ObjectClass::Bow, level: 1, cost: 5 },
    ObjectKind { name: "soft leather armour", class: ObjectClass::Armor, level: 2, cost: 18 },
    ObjectKind { name: "potion of cure light wounds", class: ObjectClass::Potion, level: 1, cost: 15 },
    ObjectKind { name: "scroll of phase door", class: ObjectClass::Scroll, level: 1, cost: 15 },
    // low
    ObjectKind { name: "short sword", class: ObjectClass::Weapon, level: 5, cost: 78 },
    ObjectKind { name: "small metal shield", class: ObjectClass::Shield, level: 8, cost: 65 },
    ObjectKind { name: "brass lantern", class: ObjectClass::Light, level: 5, cost: 35 },
    ObjectKind { name: "scroll of magic mapping", class: ObjectClass::Scroll, level: 5, cost: 40 },
    ObjectKind { name: "wand of stinking cloud", class: ObjectClass::Wand, level: 6, cost: 120 },
    ObjectKind { name: "ring of protection", class: ObjectClass::Ring, level: 10, cost: 150 },
    // mid
    ObjectKind { name: "long sword", class: ObjectClass::Weapon, level: 12, cost: 300 },
    ObjectKind { name: "long bow", class: ObjectClass::Bow, level: 15, cost: 200 },
    ObjectKind { name: "chain mail", class: ObjectClass::Armor, level: 20, cost: 530 },
    ObjectKind { name: "potion of speed", class: ObjectClass::Potion, level: 20, cost: 750 },
    ObjectKind { name: "wand of fire bolts", class: ObjectClass::Wand, level: 22, cost: 600 },
    ObjectKind { name: "amulet of resist acid", class: ObjectClass::Amulet, level: 18, cost: 300 },
    // deep
    ObjectKind { name: "war hammer of the maul", class: ObjectClass::Weapon, level: 35, cost: 1200 },
    ObjectKind { name: "mithril chain mail", class: ObjectClass::Armor, level: 45, cost: 3000 },
    ObjectKind { name: "potion of healing", class: ObjectClass::Potion, level: 35, cost: 1500 },
    ObjectKind { name: "scroll of banishment", class: ObjectClass::Scroll, level: 55, cost: 2000 },
    ObjectKind { name: "ring of speed", class: ObjectClass::Ring, level: 65, cost: 12000 },
    ObjectKind { name: "wand of annihilation", class: ObjectClass::Wand, level: 60, cost: 6000 },
    ObjectKind { name: "potion of life", class: ObjectClass::Potion, level: 75, cost: 25000 },
];

pub static EGOS: &[EgoKind] = &[
    EgoKind { name: "of resistance", level: 15, rating: 20 },
    EgoKind { name: "of slay evil", level: 10, rating: 15 },
    EgoKind { name: "of free action", level: 20, rating: 25 },
    EgoKind { name: "of extra might", level: 30, rating: 30 },
    EgoKind { name: "of elvenkind", level: 40, rating: 40 },
    EgoKind { name: "of holy might", level: 60, rating: 60 },
];

pub static ARTIFACTS: &[ArtifactKind] = &[
    ArtifactKind { name: "the Dagger 'Nightpiercer'", level: 15, rating: 100 },
    ArtifactKind { name: "the Shield of Broken Oaths", level: 35, rating: 150 },
    ArtifactKind { name: "the Long Sword 'Dawnbreaker'", level: 50, rating: 200 },
    ArtifactKind { name: "the Crown of the Deep King", level: 80, rating: 300 },
];
