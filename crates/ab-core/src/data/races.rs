//! Static monster race table.
//!
//! A compact bestiary spanning every depth band, with enough flag and base
//! variety to exercise the pit and nest filters. Questor uniques sit on the
//! quest depths.

use crate::monster::{MonsterBase, MonsterColor, MonsterRace, RaceFlags, SpellFlags};

use MonsterBase as B;
use MonsterColor as C;

const fn race(
    name: &'static str,
    base: B,
    color: C,
    level: i32,
    rarity: i32,
    flags: RaceFlags,
    spells: SpellFlags,
) -> MonsterRace {
    MonsterRace {
        name,
        base,
        color,
        level,
        rarity,
        flags,
        spells,
    }
}

const NONE: RaceFlags = RaceFlags::empty();
const NO_SPELLS: SpellFlags = SpellFlags::empty();

pub static RACES: &[MonsterRace] = &[
    // townsfolk
    race("scruffy-looking urchin", B::Townsfolk, C::Grey, 0, 1, NONE, NO_SPELLS),
    race("pitiful wretch", B::Townsfolk, C::Grey, 0, 1, NONE, NO_SPELLS),
    race("blubbering idiot", B::Townsfolk, C::Grey, 0, 1, NONE, NO_SPELLS),
    race("aimless-looking merchant", B::Townsfolk, C::Yellow, 0, 2, NONE, NO_SPELLS),
    // depth 1-5
    race("giant white mouse", B::Rodent, C::White, 1, 1, RaceFlags::ANIMAL.union(RaceFlags::FRIEND), NO_SPELLS),
    race("jackal", B::Hound, C::Orange, 1, 1, RaceFlags::ANIMAL.union(RaceFlags::FRIEND), NO_SPELLS),
    race("small kobold", B::Kobold, C::Yellow, 1, 1, RaceFlags::EVIL, NO_SPELLS),
    race("cave spider", B::Spider, C::Grey, 2, 1, RaceFlags::ANIMAL.union(RaceFlags::FRIEND), NO_SPELLS),
    race("fruit bat", B::Bat, C::Orange, 2, 1, RaceFlags::ANIMAL, NO_SPELLS),
    race("kobold", B::Kobold, C::Green, 2, 1, RaceFlags::EVIL, NO_SPELLS),
    race("white jelly", B::Jelly, C::White, 3, 1, NONE, NO_SPELLS),
    race("wild dog", B::Hound, C::Grey, 4, 1, RaceFlags::ANIMAL.union(RaceFlags::FRIEND), NO_SPELLS),
    race("skeleton kobold", B::Skeleton, C::White, 5, 1, RaceFlags::UNDEAD.union(RaceFlags::EVIL), NO_SPELLS),
    race("yellow jelly", B::Jelly, C::Yellow, 5, 2, NONE, NO_SPELLS),
    // depth 6-15
    race("snaga", B::Orc, C::Green, 6, 1, RaceFlags::ORC.union(RaceFlags::EVIL).union(RaceFlags::FRIEND), NO_SPELLS),
    race("cave orc", B::Orc, C::Green, 7, 1, RaceFlags::ORC.union(RaceFlags::EVIL).union(RaceFlags::FRIEND), NO_SPELLS),
    race("hill orc", B::Orc, C::Orange, 8, 1, RaceFlags::ORC.union(RaceFlags::EVIL).union(RaceFlags::FRIEND), NO_SPELLS),
    race("green jelly", B::Jelly, C::Green, 9, 1, NONE, NO_SPELLS),
    race("zombified orc", B::Zombie, C::Grey, 11, 1, RaceFlags::UNDEAD.union(RaceFlags::EVIL), NO_SPELLS),
    race("black orc", B::Orc, C::Black, 13, 2, RaceFlags::ORC.union(RaceFlags::EVIL), NO_SPELLS),
    race("wolf", B::Hound, C::Grey, 13, 1, RaceFlags::ANIMAL.union(RaceFlags::FRIEND), NO_SPELLS),
    race("wight", B::Wight, C::Grey, 15, 2, RaceFlags::UNDEAD.union(RaceFlags::EVIL), NO_SPELLS),
    race(
        "Grishak, the Orc Chieftain",
        B::Orc,
        C::Red,
        15,
        3,
        RaceFlags::UNIQUE.union(RaceFlags::ORC).union(RaceFlags::EVIL),
        NO_SPELLS,
    ),
    // depth 16-30
    race("cave troll", B::Troll, C::Green, 16, 1, RaceFlags::TROLL.union(RaceFlags::EVIL), NO_SPELLS),
    race("uruk", B::Orc, C::Black, 18, 2, RaceFlags::ORC.union(RaceFlags::EVIL).union(RaceFlags::FRIEND), NO_SPELLS),
    race("rock troll", B::Troll, C::Grey, 20, 1, RaceFlags::TROLL.union(RaceFlags::EVIL), NO_SPELLS),
    race("hill giant", B::Giant, C::Orange, 22, 1, RaceFlags::GIANT.union(RaceFlags::EVIL), NO_SPELLS),
    race("quasit", B::Demon, C::Violet, 23, 2, RaceFlags::DEMON.union(RaceFlags::EVIL), NO_SPELLS),
    race("water troll", B::Troll, C::Blue, 25, 2, RaceFlags::TROLL.union(RaceFlags::EVIL), NO_SPELLS),
    race("mummified troll", B::Zombie, C::White, 25, 2, RaceFlags::UNDEAD.union(RaceFlags::EVIL), NO_SPELLS),
    race("young blue dragon", B::Dragon, C::Blue, 25, 1, RaceFlags::DRAGON.union(RaceFlags::EVIL), SpellFlags::BR_ELEC),
    race("young black dragon", B::Dragon, C::Black, 26, 1, RaceFlags::DRAGON.union(RaceFlags::EVIL), SpellFlags::BR_ACID),
    race("young red dragon", B::Dragon, C::Red, 28, 1, RaceFlags::DRAGON.union(RaceFlags::EVIL), SpellFlags::BR_FIRE),
    race("stone giant", B::Giant, C::Grey, 28, 1, RaceFlags::GIANT.union(RaceFlags::EVIL), NO_SPELLS),
    race("olog", B::Troll, C::Black, 30, 2, RaceFlags::TROLL.union(RaceFlags::EVIL).union(RaceFlags::FRIEND), NO_SPELLS),
    // depth 31-50
    race("frost giant", B::Giant, C::White, 35, 1, RaceFlags::GIANT.union(RaceFlags::EVIL), NO_SPELLS),
    race("mature white dragon", B::Dragon, C::White, 38, 1, RaceFlags::DRAGON.union(RaceFlags::EVIL), SpellFlags::BR_COLD),
    race("vampire", B::Vampire, C::Violet, 39, 1, RaceFlags::UNDEAD.union(RaceFlags::EVIL), NO_SPELLS),
    race("fire giant", B::Giant, C::Red, 40, 1, RaceFlags::GIANT.union(RaceFlags::EVIL), NO_SPELLS),
    race("dread", B::Wight, C::Black, 42, 2, RaceFlags::UNDEAD.union(RaceFlags::EVIL), NO_SPELLS),
    race("mature red dragon", B::Dragon, C::Red, 45, 1, RaceFlags::DRAGON.union(RaceFlags::EVIL), SpellFlags::BR_FIRE),
    race("bodak", B::Demon, C::Red, 45, 2, RaceFlags::DEMON.union(RaceFlags::EVIL), SpellFlags::BR_FIRE),
    race("master vampire", B::Vampire, C::Violet, 48, 2, RaceFlags::UNDEAD.union(RaceFlags::EVIL), NO_SPELLS),
    // depth 51+
    race("lich", B::Lich, C::Violet, 52, 2, RaceFlags::UNDEAD.union(RaceFlags::EVIL), NO_SPELLS),
    race("ancient blue dragon", B::Dragon, C::Blue, 55, 1, RaceFlags::DRAGON.union(RaceFlags::EVIL), SpellFlags::BR_ELEC),
    race("ancient red dragon", B::Dragon, C::Red, 60, 1, RaceFlags::DRAGON.union(RaceFlags::EVIL), SpellFlags::BR_FIRE),
    race("nightwing", B::Wight, C::Black, 62, 2, RaceFlags::UNDEAD.union(RaceFlags::EVIL), NO_SPELLS),
    race("archlich", B::Lich, C::White, 68, 2, RaceFlags::UNDEAD.union(RaceFlags::EVIL), NO_SPELLS),
    race("great fire wyrm", B::Dragon, C::Red, 76, 2, RaceFlags::DRAGON.union(RaceFlags::EVIL), SpellFlags::BR_FIRE),
    race("pit fiend", B::Demon, C::Red, 77, 2, RaceFlags::DEMON.union(RaceFlags::EVIL), SpellFlags::BR_FIRE),
    race("great storm wyrm", B::Dragon, C::Blue, 80, 2, RaceFlags::DRAGON.union(RaceFlags::EVIL), SpellFlags::BR_ELEC),
    race("demon prince", B::Demon, C::Violet, 85, 3, RaceFlags::DEMON.union(RaceFlags::EVIL), SpellFlags::BR_FIRE),
    // questors
    race(
        "The Sorcerer-King",
        B::Lich,
        C::Violet,
        99,
        1,
        RaceFlags::UNIQUE
            .union(RaceFlags::QUESTOR)
            .union(RaceFlags::UNDEAD)
            .union(RaceFlags::EVIL),
        NO_SPELLS,
    ),
    race(
        "The Lord of the Pit",
        B::Demon,
        C::Red,
        100,
        1,
        RaceFlags::UNIQUE
            .union(RaceFlags::QUESTOR)
            .union(RaceFlags::DEMON)
            .union(RaceFlags::EVIL),
        SpellFlags::BR_FIRE,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questors_on_quest_depths() {
        for depth in crate::QUEST_DEPTHS {
            assert!(
                RACES
                    .iter()
                    .any(|r| r.flags.contains(RaceFlags::QUESTOR) && r.level == depth),
                "no questor at depth {depth}"
            );
        }
    }

    #[test]
    fn test_townsfolk_exist() {
        assert!(RACES.iter().any(|r| r.level == 0));
    }

    #[test]
    fn test_questors_are_unique() {
        for r in RACES.iter().filter(|r| r.flags.contains(RaceFlags::QUESTOR)) {
            assert!(r.flags.contains(RaceFlags::UNIQUE), "{}", r.name);
        }
    }

    #[test]
    fn test_pit_bases_have_coverage() {
        // Every base the pit tables select must appear at several depths.
        for base in [MonsterBase::Orc, MonsterBase::Troll, MonsterBase::Giant, MonsterBase::Dragon] {
            let count = RACES.iter().filter(|r| r.base == base).count();
            assert!(count >= 3, "{base} only has {count} races");
        }
    }
}
