//! The monster model the generator populates levels with.
//!
//! Races are static data; a [`Monster`] is an instance on one level. Race
//! selection is rarity-weighted and can be narrowed by a caller-supplied
//! filter, which is how pits and nests restrict their inhabitants without
//! any global hook state.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::data::races::RACES;
use crate::dungeon::{alloc, Cave};
use crate::object::Origin;
use ab_rng::GameRng;

bitflags! {
    /// Monster race flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RaceFlags: u16 {
        const UNIQUE  = 0x0001;
        /// Must appear on its native depth.
        const QUESTOR = 0x0002;
        /// Appears in groups.
        const FRIEND  = 0x0004;
        const ANIMAL  = 0x0008;
        const EVIL    = 0x0010;
        const UNDEAD  = 0x0020;
        const DEMON   = 0x0040;
        const DRAGON  = 0x0080;
        const GIANT   = 0x0100;
        const TROLL   = 0x0200;
        const ORC     = 0x0400;
    }
}

bitflags! {
    /// Monster spell flags (breath attacks are all the generator cares about).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SpellFlags: u8 {
        const BR_ACID = 0x01;
        const BR_ELEC = 0x02;
        const BR_FIRE = 0x04;
        const BR_COLD = 0x08;
        const BR_POIS = 0x10;
    }
}

impl Serialize for RaceFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RaceFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(RaceFlags::from_bits_truncate(u16::deserialize(deserializer)?))
    }
}

impl Serialize for SpellFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SpellFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(SpellFlags::from_bits_truncate(u8::deserialize(deserializer)?))
    }
}

/// Monster base kind ("template family").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum MonsterBase {
    Townsfolk,
    Jelly,
    Spider,
    Rodent,
    Bat,
    Hound,
    Kobold,
    Orc,
    Troll,
    Giant,
    Dragon,
    Demon,
    Skeleton,
    Zombie,
    Wight,
    Vampire,
    Lich,
}

/// Display color of a race; some pits select by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum MonsterColor {
    White,
    Grey,
    Black,
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Violet,
    Gold,
}

/// A monster race from the static race table.
#[derive(Debug, Clone, Copy)]
pub struct MonsterRace {
    pub name: &'static str,
    pub base: MonsterBase,
    pub color: MonsterColor,
    /// Native depth; 0 = townsfolk.
    pub level: i32,
    /// Higher is rarer; weights selection as 1/rarity.
    pub rarity: i32,
    pub flags: RaceFlags,
    pub spells: SpellFlags,
}

/// One monster on a level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    /// Index into the race table.
    pub race: usize,
    pub y: i32,
    pub x: i32,
    pub asleep: bool,
    pub origin: Origin,
}

impl Monster {
    pub fn race(&self) -> &'static MonsterRace {
        &RACES[self.race]
    }
}

/// Approximate distance between two grids.
pub fn distance(y1: i32, x1: i32, y2: i32, x2: i32) -> i32 {
    let dy = (y2 - y1).abs();
    let dx = (x2 - x1).abs();
    if dy > dx {
        dy + (dx >> 1)
    } else {
        dx + (dy >> 1)
    }
}

/// Pick a race for depth `level`, rarity-weighted.
///
/// Townsfolk (level 0 races) are only eligible when `level <= 0`. A filter
/// narrows the candidate set; when nothing qualifies, returns `None` and the
/// caller's room simply isn't built.
pub fn get_mon_num(
    level: i32,
    rng: &mut GameRng,
    filter: Option<&dyn Fn(&MonsterRace) -> bool>,
) -> Option<usize> {
    let mut total = 0;
    let mut weights: Vec<(usize, i32)> = Vec::new();

    for (i, race) in RACES.iter().enumerate() {
        let eligible = if level <= 0 {
            race.level == 0
        } else {
            race.level > 0 && race.level <= level
        };
        if !eligible {
            continue;
        }
        if let Some(pred) = filter {
            if !pred(race) {
                continue;
            }
        }
        let weight = 100 / race.rarity.max(1);
        weights.push((i, weight));
        total += weight;
    }

    if total == 0 {
        return None;
    }

    let mut roll = rng.randint0(total);
    for (i, weight) in weights {
        roll -= weight;
        if roll < 0 {
            return Some(i);
        }
    }
    None
}

/// Place a monster of the given race at (y, x).
///
/// Fails on occupied or non-floor grids, on a second copy of a unique, and
/// when the level's monster list is full. `group` lets FRIEND races bring
/// company. Out-of-depth placements raise the level's monster rating.
pub fn place_new_monster(
    c: &mut Cave,
    y: i32,
    x: i32,
    race_idx: usize,
    sleep: bool,
    group: bool,
    origin: Origin,
    rng: &mut GameRng,
) -> bool {
    if !c.in_bounds(y, x) || !c.is_empty(y, x) {
        return false;
    }

    let race = &RACES[race_idx];
    if race.flags.contains(RaceFlags::UNIQUE) && c.monsters.iter().any(|m| m.race == race_idx) {
        return false;
    }

    if !c.add_monster(Monster {
        race: race_idx,
        y,
        x,
        asleep: sleep,
        origin,
    }) {
        return false;
    }

    if race.level > c.depth {
        c.mon_rating += (race.level - c.depth) as u32;
    }

    if group && race.flags.contains(RaceFlags::FRIEND) {
        place_monster_group(c, y, x, race_idx, sleep, origin, rng);
    }

    true
}

/// Scatter a few more of the same race around the anchor.
fn place_monster_group(
    c: &mut Cave,
    y0: i32,
    x0: i32,
    race_idx: usize,
    sleep: bool,
    origin: Origin,
    rng: &mut GameRng,
) {
    let total = rng.randint1(6);
    for _ in 0..total {
        for _ in 0..9 {
            let Some((y, x)) = alloc::find_nearby_grid(c, y0, 3, x0, 3, rng) else {
                return;
            };
            if c.is_empty(y, x) {
                place_new_monster(c, y, x, race_idx, sleep, false, origin, rng);
                break;
            }
        }
    }
}

/// Pick a race for `level` and place it at (y, x).
pub fn pick_and_place_monster(
    c: &mut Cave,
    y: i32,
    x: i32,
    level: i32,
    sleep: bool,
    group: bool,
    origin: Origin,
    rng: &mut GameRng,
) -> bool {
    match get_mon_num(level, rng, None) {
        Some(race_idx) => place_new_monster(c, y, x, race_idx, sleep, group, origin, rng),
        None => false,
    }
}

/// Pick a race and place it somewhere further than `dis` from the player.
pub fn pick_and_place_distant_monster(
    c: &mut Cave,
    py: i32,
    px: i32,
    dis: i32,
    sleep: bool,
    level: i32,
    rng: &mut GameRng,
) -> bool {
    let Some((y, x)) =
        alloc::cave_find(c, rng, |c, y, x| c.is_empty(y, x) && distance(y, x, py, px) > dis)
    else {
        return false;
    };
    pick_and_place_monster(c, y, x, level, sleep, true, Origin::Drop, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_mon_num_respects_level() {
        let mut rng = GameRng::new(42);
        for _ in 0..200 {
            if let Some(idx) = get_mon_num(5, &mut rng, None) {
                let race = &RACES[idx];
                assert!(race.level >= 1 && race.level <= 5, "{} out of band", race.name);
            }
        }
    }

    #[test]
    fn test_get_mon_num_town_only_at_zero() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            let idx = get_mon_num(0, &mut rng, None).expect("town races exist");
            assert_eq!(RACES[idx].level, 0, "{}", RACES[idx].name);
        }
    }

    #[test]
    fn test_get_mon_num_filter() {
        let mut rng = GameRng::new(42);
        let only_orcs = |r: &MonsterRace| r.flags.contains(RaceFlags::ORC);
        for _ in 0..100 {
            let idx = get_mon_num(20, &mut rng, Some(&only_orcs)).expect("orcs exist by 20");
            assert!(RACES[idx].flags.contains(RaceFlags::ORC));
        }
    }

    #[test]
    fn test_get_mon_num_impossible_filter() {
        let mut rng = GameRng::new(42);
        let nothing = |_: &MonsterRace| false;
        assert!(get_mon_num(50, &mut rng, Some(&nothing)).is_none());
    }

    #[test]
    fn test_distance_shape() {
        assert_eq!(distance(0, 0, 0, 10), 10);
        assert_eq!(distance(0, 0, 10, 0), 10);
        assert_eq!(distance(0, 0, 4, 10), 12);
        assert_eq!(distance(3, 3, 3, 3), 0);
    }
}
