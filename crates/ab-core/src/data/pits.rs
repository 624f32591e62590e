//! Static monster pit and nest profiles.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::monster::{MonsterBase, MonsterColor, MonsterRace, RaceFlags, SpellFlags};

/// Whether a profile fills a pit (tiered layout) or a nest (random scatter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum PitKind {
    Pit,
    Nest,
}

/// A themed-chamber profile: which depth it prefers and which monsters
/// belong inside.
#[derive(Debug, Clone, Copy)]
pub struct PitProfile {
    pub name: &'static str,
    pub kind: PitKind,
    /// Depth where this pit is most common.
    pub ave: i32,
    /// 1-in-rarity acceptance filter during selection.
    pub rarity: i32,
    /// Percent chance of an object on each chamber grid.
    pub obj_rarity: i32,
    /// Flags every inhabitant must have.
    pub flags: RaceFlags,
    /// Flags no inhabitant may have.
    pub forbidden_flags: RaceFlags,
    /// Spells every inhabitant must have.
    pub spells: SpellFlags,
    /// Spells no inhabitant may have.
    pub forbidden_spells: SpellFlags,
    /// When non-empty, inhabitants must be of one of these bases.
    pub bases: &'static [MonsterBase],
    /// When non-empty, inhabitants must wear one of these colors.
    pub colors: &'static [MonsterColor],
    /// Races banned outright, by name.
    pub forbidden_monsters: &'static [&'static str],
}

impl PitProfile {
    /// The race filter this profile imposes on its inhabitants.
    ///
    /// Uniques never live in pits.
    pub fn allows(&self, race: &MonsterRace) -> bool {
        if race.flags.contains(RaceFlags::UNIQUE) {
            return false;
        }
        if !race.flags.contains(self.flags) {
            return false;
        }
        if race.flags.intersects(self.forbidden_flags) {
            return false;
        }
        if !race.spells.contains(self.spells) {
            return false;
        }
        if race.spells.intersects(self.forbidden_spells) {
            return false;
        }
        if self.forbidden_monsters.contains(&race.name) {
            return false;
        }
        if !self.bases.is_empty() && !self.bases.contains(&race.base) {
            return false;
        }
        if !self.colors.is_empty() && !self.colors.contains(&race.color) {
            return false;
        }
        true
    }
}

const NONE: RaceFlags = RaceFlags::empty();
const NO_SPELLS: SpellFlags = SpellFlags::empty();

pub static PITS: &[PitProfile] = &[
    PitProfile {
        name: "orc pit",
        kind: PitKind::Pit,
        ave: 12,
        rarity: 1,
        obj_rarity: 10,
        flags: NONE,
        forbidden_flags: NONE,
        spells: NO_SPELLS,
        forbidden_spells: NO_SPELLS,
        bases: &[MonsterBase::Orc],
        colors: &[],
        forbidden_monsters: &[],
    },
    PitProfile {
        name: "troll pit",
        kind: PitKind::Pit,
        ave: 25,
        rarity: 1,
        obj_rarity: 15,
        flags: NONE,
        forbidden_flags: NONE,
        spells: NO_SPELLS,
        forbidden_spells: NO_SPELLS,
        bases: &[MonsterBase::Troll],
        colors: &[],
        forbidden_monsters: &[],
    },
    PitProfile {
        name: "giant pit",
        kind: PitKind::Pit,
        ave: 40,
        rarity: 1,
        obj_rarity: 20,
        flags: NONE,
        forbidden_flags: NONE,
        spells: NO_SPELLS,
        forbidden_spells: NO_SPELLS,
        bases: &[MonsterBase::Giant],
        colors: &[],
        forbidden_monsters: &[],
    },
    PitProfile {
        name: "lightning dragon pit",
        kind: PitKind::Pit,
        ave: 60,
        rarity: 2,
        obj_rarity: 30,
        flags: NONE,
        forbidden_flags: NONE,
        spells: SpellFlags::BR_ELEC,
        forbidden_spells: NO_SPELLS,
        bases: &[MonsterBase::Dragon],
        colors: &[],
        forbidden_monsters: &[],
    },
    PitProfile {
        name: "fire dragon pit",
        kind: PitKind::Pit,
        ave: 65,
        rarity: 2,
        obj_rarity: 30,
        flags: NONE,
        forbidden_flags: NONE,
        spells: SpellFlags::BR_FIRE,
        forbidden_spells: NO_SPELLS,
        bases: &[MonsterBase::Dragon],
        colors: &[MonsterColor::Red],
        forbidden_monsters: &[],
    },
    PitProfile {
        name: "demon pit",
        kind: PitKind::Pit,
        ave: 80,
        rarity: 2,
        obj_rarity: 35,
        flags: RaceFlags::DEMON,
        forbidden_flags: NONE,
        spells: NO_SPELLS,
        forbidden_spells: NO_SPELLS,
        bases: &[],
        colors: &[],
        forbidden_monsters: &[],
    },
    PitProfile {
        name: "jelly nest",
        kind: PitKind::Nest,
        ave: 6,
        rarity: 1,
        obj_rarity: 15,
        flags: NONE,
        forbidden_flags: RaceFlags::EVIL,
        spells: NO_SPELLS,
        forbidden_spells: NO_SPELLS,
        bases: &[MonsterBase::Jelly],
        colors: &[],
        forbidden_monsters: &[],
    },
    PitProfile {
        name: "animal nest",
        kind: PitKind::Nest,
        ave: 25,
        rarity: 1,
        obj_rarity: 10,
        flags: RaceFlags::ANIMAL,
        forbidden_flags: RaceFlags::UNDEAD,
        spells: NO_SPELLS,
        forbidden_spells: NO_SPELLS,
        bases: &[],
        colors: &[],
        forbidden_monsters: &[],
    },
    PitProfile {
        name: "undead nest",
        kind: PitKind::Nest,
        ave: 55,
        rarity: 2,
        obj_rarity: 20,
        flags: RaceFlags::UNDEAD,
        forbidden_flags: NONE,
        spells: NO_SPELLS,
        forbidden_spells: NO_SPELLS,
        bases: &[],
        colors: &[],
        forbidden_monsters: &["archlich"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::races::RACES;

    #[test]
    fn test_every_pit_has_inhabitants() {
        for pit in PITS {
            let ceiling = pit.ave + 10;
            let count = RACES
                .iter()
                .filter(|r| r.level > 0 && r.level <= ceiling && pit.allows(r))
                .count();
            assert!(count > 0, "{} has no inhabitants by depth {ceiling}", pit.name);
        }
    }

    #[test]
    fn test_uniques_never_allowed() {
        for pit in PITS {
            for race in RACES.iter().filter(|r| r.flags.contains(RaceFlags::UNIQUE)) {
                assert!(!pit.allows(race), "{} admits {}", pit.name, race.name);
            }
        }
    }

    #[test]
    fn test_forbidden_monster_list() {
        let undead_nest = PITS
            .iter()
            .find(|p| p.name == "undead nest")
            .expect("undead nest configured");
        let archlich = RACES.iter().find(|r| r.name == "archlich").expect("archlich configured");
        assert!(!undead_nest.allows(archlich));
    }

    #[test]
    fn test_color_filter() {
        let fire_pit = PITS
            .iter()
            .find(|p| p.name == "fire dragon pit")
            .expect("fire dragon pit configured");
        for race in RACES.iter().filter(|r| fire_pit.allows(r)) {
            assert_eq!(race.color, MonsterColor::Red, "{}", race.name);
        }
    }

    #[test]
    fn test_both_kinds_present() {
        assert!(PITS.iter().any(|p| p.kind == PitKind::Pit));
        assert!(PITS.iter().any(|p| p.kind == PitKind::Nest));
    }
}
