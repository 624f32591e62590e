//! Town generation.
//!
//! The town layout is the same every visit: the builder parks the main RNG,
//! runs the layout from the persistent town seed, and restores the main
//! stream afterwards. Day and night only change residents and lighting.

use super::alloc::{find_empty_range, player_place};
use super::cell::Feature;
use super::grid::fill_rectangle;
use super::Cave;
use crate::monster::pick_and_place_distant_monster;
use crate::player::{Player, World};
use crate::{MAX_STORES, MIN_M_ALLOC_TD, MIN_M_ALLOC_TN, TOWN_DAWN, TOWN_DUSK, TOWN_HGT, TOWN_WID};
use ab_rng::GameRng;

/// Build one store at pseudo-location (yy, xx).
///
/// A main street runs horizontally through the middle of town and every
/// shop door faces it.
fn build_store(c: &mut Cave, n: usize, yy: i32, xx: i32, rng: &mut GameRng) {
    let y0 = yy * 9 + 6;
    let x0 = xx * 14 + 12;

    let y1 = y0 - rng.randint1(if yy == 0 { 3 } else { 2 });
    let y2 = y0 + rng.randint1(if yy == 1 { 3 } else { 2 });
    let x1 = x0 - rng.randint1(5);
    let x2 = x0 + rng.randint1(5);

    // Door on the street-facing edge.
    let dy = if yy == 0 { y2 } else { y1 };
    let dx = rng.rand_range(x1, x2);

    fill_rectangle(c, y1, x1, y2, x2, Feature::PermExtra);
    c.set_feat(dy, dx, Feature::Shop(n as u8));
}

/// Lay out the stores, the stair, and the player, all from the town seed.
fn town_gen_layout(c: &mut Cave, p: &mut Player, town_seed: u64, rng: &mut GameRng) -> bool {
    let saved = rng.snapshot();
    rng.reseed(town_seed);

    let n_rows = 2;
    let n_cols = (MAX_STORES as i32 + 1) / n_rows;

    let mut rooms: Vec<usize> = (0..MAX_STORES).collect();
    'outer: for y in 0..n_rows {
        for x in 0..n_cols {
            if rooms.is_empty() {
                break 'outer;
            }
            let k = rng.randint0(rooms.len() as i32) as usize;
            build_store(c, rooms[k], y, x, rng);
            rooms.swap_remove(k);
        }
    }

    let spot = find_empty_range(c, rng, 3, TOWN_HGT as i32 - 3, 3, TOWN_WID as i32 - 3);
    let ok = match spot {
        Some((y, x)) => {
            c.set_feat(y, x, Feature::MoreStair);
            player_place(c, p, y, x);
            true
        }
        None => false,
    };

    rng.restore(saved);
    ok
}

/// The town builder. Handles the physical layout and the residents; store
/// inventories belong to someone else.
pub(crate) fn town_gen(c: &mut Cave, p: &mut Player, world: &World, rng: &mut GameRng) -> bool {
    let daytime = world.turn % (10 * TOWN_DAWN) < 10 * TOWN_DUSK;
    let residents = if daytime { MIN_M_ALLOC_TD } else { MIN_M_ALLOC_TN };

    c.set_dimensions(TOWN_HGT as i32, TOWN_WID as i32);

    fill_rectangle(c, 0, 0, c.height - 1, c.width - 1, Feature::PermSolid);
    fill_rectangle(c, 1, 1, c.height - 2, c.width - 2, Feature::Floor);

    if !town_gen_layout(c, p, world.town_seed, rng) {
        return false;
    }

    c.illuminate(daytime);

    for _ in 0..residents {
        pick_and_place_distant_monster(c, p.py, p.px, 3, true, c.depth, rng);
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_town(world: &World, rng: &mut GameRng) -> (Cave, Player) {
        let mut c = Cave::new();
        let mut p = Player::at_depth(0);
        c.clear(&mut p);
        c.depth = 0;
        assert!(town_gen(&mut c, &mut p, world, rng));
        (c, p)
    }

    fn shop_doors(c: &Cave) -> Vec<(i32, i32, u8)> {
        let mut doors = Vec::new();
        for y in 0..c.height {
            for x in 0..c.width {
                if let Feature::Shop(n) = c.feat(y, x) {
                    doors.push((y, x, n));
                }
            }
        }
        doors
    }

    #[test]
    fn test_town_has_all_stores_and_one_stair() {
        let world = World::default();
        let mut rng = GameRng::new(42);
        let (c, p) = build_town(&world, &mut rng);

        let doors = shop_doors(&c);
        assert_eq!(doors.len(), MAX_STORES);
        let mut indices: Vec<u8> = doors.iter().map(|d| d.2).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..MAX_STORES as u8).collect::<Vec<_>>());

        let mut stairs = 0;
        for y in 0..c.height {
            for x in 0..c.width {
                if c.feat(y, x) == Feature::MoreStair {
                    stairs += 1;
                }
            }
        }
        assert_eq!(stairs, 1);
        assert_eq!(c.feat(p.py, p.px), Feature::MoreStair);
    }

    #[test]
    fn test_town_layout_survives_rng_state() {
        // The same town seed gives the same town regardless of what the
        // main stream did beforehand.
        let world = World::default();

        let mut rng_a = GameRng::new(1);
        let (town_a, _) = build_town(&world, &mut rng_a);

        let mut rng_b = GameRng::new(999);
        for _ in 0..1234 {
            rng_b.randint0(100);
        }
        let (town_b, _) = build_town(&world, &mut rng_b);

        assert_eq!(town_a.render(), town_b.render());
    }

    #[test]
    fn test_town_changes_with_seed() {
        let mut world = World::default();
        let mut rng = GameRng::new(42);
        let (town_a, _) = build_town(&world, &mut rng);

        world.town_seed = world.town_seed.wrapping_add(1);
        let (town_b, _) = build_town(&world, &mut rng);

        assert_ne!(town_a.render(), town_b.render());
    }

    #[test]
    fn test_layout_leaves_main_stream_untouched() {
        let world = World::default();

        let mut rng_a = GameRng::new(7);
        let mut rng_b = GameRng::new(7);

        let _ = build_town(&world, &mut rng_a);
        // Consume what town_gen consumed from the main stream: only the
        // resident placement draws from it. Drawing the same residents by
        // hand from the twin stream must leave the two streams aligned.
        let mut c = Cave::new();
        let mut p = Player::at_depth(0);
        c.clear(&mut p);
        c.depth = 0;
        c.set_dimensions(TOWN_HGT as i32, TOWN_WID as i32);
        let h = c.height;
        let w = c.width;
        fill_rectangle(&mut c, 0, 0, h - 1, w - 1, Feature::PermSolid);
        fill_rectangle(&mut c, 1, 1, h - 2, w - 2, Feature::Floor);
        assert!(town_gen_layout(&mut c, &mut p, world.town_seed, &mut rng_b));
        c.illuminate(true);
        for _ in 0..MIN_M_ALLOC_TD {
            pick_and_place_distant_monster(&mut c, p.py, p.px, 3, true, 0, &mut rng_b);
        }

        assert_eq!(rng_a.randint0(1 << 30), rng_b.randint0(1 << 30));
    }

    #[test]
    fn test_night_town_spawns_more_residents() {
        let mut world = World::default();
        world.turn = 1;
        let mut rng = GameRng::new(42);
        let (day_town, _) = build_town(&world, &mut rng);

        world.turn = 10 * TOWN_DUSK + 1;
        let mut rng = GameRng::new(42);
        let (night_town, _) = build_town(&world, &mut rng);

        assert!(night_town.monsters.len() >= day_town.monsters.len());
        // Night towns glow only at the shop fronts.
        let mut glowing_floor = 0;
        for y in 0..night_town.height {
            for x in 0..night_town.width {
                if night_town.is_floor(y, x)
                    && night_town.has_flag(y, x, crate::dungeon::CellFlags::GLOW)
                {
                    glowing_floor += 1;
                }
            }
        }
        assert_eq!(glowing_floor, 0, "plain floor glowing at night");
    }
}
