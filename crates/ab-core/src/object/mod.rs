//! The object model the generator populates levels with.
//!
//! Kinds, egos and artifacts are static data; an [`Object`] is an instance
//! on the floor of one level. The generator only ever creates objects, so
//! there is no inventory or wielding logic here.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::data::kinds::{ARTIFACTS, EGOS, KINDS};
use ab_rng::GameRng;

/// Broad object classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ObjectClass {
    Gold,
    Weapon,
    Bow,
    Armor,
    Shield,
    Potion,
    Scroll,
    Wand,
    Ring,
    Amulet,
    Food,
    Light,
}

/// Where a thing on the level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Origin {
    Floor,
    Special,
    Vault,
    Pit,
    Cavern,
    Labyrinth,
    Town,
    Drop,
    DropSpecial,
    DropPit,
    DropVault,
}

/// A kind of object, from the static kind table.
#[derive(Debug, Clone, Copy)]
pub struct ObjectKind {
    pub name: &'static str,
    pub class: ObjectClass,
    /// Depth where this kind normally appears.
    pub level: i32,
    pub cost: i32,
}

/// An ego template applied to good/great items.
#[derive(Debug, Clone, Copy)]
pub struct EgoKind {
    pub name: &'static str,
    pub level: i32,
    pub rating: u32,
}

/// A fixed artifact.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactKind {
    pub name: &'static str,
    pub level: i32,
    pub rating: u32,
}

/// One object lying on a level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Object {
    /// Index into the kind table.
    pub kind: usize,
    /// Index into the ego table, if any.
    pub ego: Option<usize>,
    /// Index into the artifact table, if any.
    pub artifact: Option<usize>,
    /// Gold amount for gold, enchantment for everything else.
    pub pval: i32,
    pub y: i32,
    pub x: i32,
    pub origin: Origin,
    pub origin_depth: i32,
}

impl Object {
    pub fn kind(&self) -> &'static ObjectKind {
        &KINDS[self.kind]
    }

    pub fn is_gold(&self) -> bool {
        self.kind().class == ObjectClass::Gold
    }
}

/// Make a random object appropriate to `level`.
///
/// `good` forces an ego roll; `great` additionally allows artifacts. Returns
/// the object and the rating it contributes to the level's object feeling,
/// or `None` when no kind is shallow enough.
pub fn make_object(
    level: i32,
    good: bool,
    great: bool,
    rng: &mut GameRng,
) -> Option<(Object, u32)> {
    let level = level.max(1);

    let candidates: Vec<usize> = KINDS
        .iter()
        .enumerate()
        .filter(|(_, k)| k.class != ObjectClass::Gold && k.level <= level)
        .map(|(i, _)| i)
        .collect();
    let kind = *candidates.get(rng.randint0(candidates.len() as i32) as usize)?;

    let mut rating = (KINDS[kind].level as u32) * 2 + (KINDS[kind].cost / 100) as u32;

    let ego = if great || (good && !rng.one_in(3)) || rng.one_in(20) {
        let egos: Vec<usize> = EGOS
            .iter()
            .enumerate()
            .filter(|(_, e)| e.level <= level + 10)
            .map(|(i, _)| i)
            .collect();
        if egos.is_empty() {
            None
        } else {
            let e = egos[rng.randint0(egos.len() as i32) as usize];
            rating += EGOS[e].rating;
            Some(e)
        }
    } else {
        None
    };

    let artifact = if (good && great && rng.one_in(10)) || rng.one_in(500) {
        let arts: Vec<usize> = ARTIFACTS
            .iter()
            .enumerate()
            .filter(|(_, a)| a.level <= level + 15)
            .map(|(i, _)| i)
            .collect();
        if arts.is_empty() {
            None
        } else {
            let a = arts[rng.randint0(arts.len() as i32) as usize];
            rating += ARTIFACTS[a].rating;
            Some(a)
        }
    } else {
        None
    };

    let pval = if ego.is_some() || artifact.is_some() {
        rng.randint1(3) + if great { rng.randint1(3) } else { 0 }
    } else {
        0
    };

    Some((
        Object {
            kind,
            ego,
            artifact,
            pval,
            y: 0,
            x: 0,
            origin: Origin::Floor,
            origin_depth: level,
        },
        rating,
    ))
}

/// Make a pile of gold scaled to `level`.
pub fn make_gold(level: i32, rng: &mut GameRng) -> Object {
    Object {
        kind: 0,
        ego: None,
        artifact: None,
        pval: rng.randint1(10 + 2 * level.max(0)) + 5,
        y: 0,
        x: 0,
        origin: Origin::Floor,
        origin_depth: level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_object_respects_level() {
        let mut rng = GameRng::new(42);
        for _ in 0..200 {
            if let Some((obj, _)) = make_object(1, false, false, &mut rng) {
                assert!(obj.kind().level <= 1, "kind {} too deep", obj.kind().name);
            }
        }
    }

    #[test]
    fn test_great_objects_rate_higher() {
        let mut rng = GameRng::new(42);
        let plain: u32 = (0..200)
            .filter_map(|_| make_object(30, false, false, &mut rng))
            .map(|(_, r)| r)
            .sum();
        let great: u32 = (0..200)
            .filter_map(|_| make_object(30, true, true, &mut rng))
            .map(|(_, r)| r)
            .sum();
        assert!(great > plain, "great {great} <= plain {plain}");
    }

    #[test]
    fn test_make_gold_scales() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            let gold = make_gold(10, &mut rng);
            assert!(gold.is_gold());
            assert!((6..=35).contains(&gold.pval), "amount {}", gold.pval);
        }
    }

    #[test]
    fn test_gold_kind_is_index_zero() {
        assert_eq!(KINDS[0].class, ObjectClass::Gold);
    }
}
