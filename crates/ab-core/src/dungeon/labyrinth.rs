//! Labyrinth generation: randomized Kruskal on a half-resolution grid.
//!
//! Cells sit at even grid positions; the walls between adjoining cells are
//! knocked down in shuffled order whenever they separate two different
//! connected sets. The result is a perfect maze, so no repair pass is
//! needed.

use log::debug;

use super::alloc::{
    alloc_objects, alloc_stairs, find_empty, new_player_spot, place_closed_door, AllocKind,
    AllocSet,
};
use super::cell::{CellFlags, Feature};
use super::grid::fill_rectangle;
use super::Cave;
use crate::monster::pick_and_place_distant_monster;
use crate::object::Origin;
use crate::player::{Player, World};
use crate::{is_quest, DUNGEON_HGT, DUNGEON_WID, MIN_M_ALLOC_LEVEL};
use ab_rng::GameRng;

/// Whether (y, x) reads as a corridor square: open along exactly one axis.
fn lab_is_tunnel(c: &Cave, y: i32, x: i32) -> bool {
    let west = c.is_floor(y, x - 1);
    let east = c.is_floor(y, x + 1);
    let north = c.is_floor(y - 1, x);
    let south = c.is_floor(y + 1, x);
    north == south && west == east && north != west
}

/// The labyrinth builder.
pub(crate) fn labyrinth_gen(c: &mut Cave, p: &mut Player, world: &World, rng: &mut GameRng) -> bool {
    let depth = c.depth;

    // The labyrinth area proper is odd-sized; the enclosing walls add two.
    let h = 15 + rng.randint0(depth / 10) * 2;
    let w = 51 + rng.randint0(depth / 10) * 2;
    let n = h * w;

    // Most labyrinths are lit, many are known, most have soft walls.
    let lit = rng.randint0(depth) < 25 || rng.randint0(2) < 1;
    let known = lit && rng.randint0(depth) < 25;
    let soft = rng.randint0(depth) < 35 || rng.randint0(3) < 2;

    if depth < 13 {
        return false;
    }
    if is_quest(depth) {
        return false;
    }

    // Certain depths are more hospitable to labyrinths.
    let mut chance = 1;
    for m in [3, 5, 7, 11, 13] {
        if depth % m == 0 {
            chance += 1;
        }
    }
    if rng.randint0(100) >= chance {
        return false;
    }

    c.set_dimensions(h + 2, w + 2);
    debug!("labyrinth h={h} w={w} lit={lit} known={known} soft={soft}");

    fill_rectangle(c, 0, 0, h + 1, w + 1, Feature::PermSolid);
    fill_rectangle(
        c,
        1,
        1,
        h,
        w,
        if soft {
            Feature::WallSolid
        } else {
            Feature::PermSolid
        },
    );

    // sets tracks connectedness: cells with equal labels are joined.
    let mut sets: Vec<i32> = vec![-1; n as usize];
    let mut walls: Vec<i32> = (0..n).collect();

    // Cut out the grid of 1x1 cells.
    let mut y = 0;
    while y < h {
        let mut x = 0;
        while x < w {
            let k = y * w + x;
            sets[k as usize] = k;
            c.set_feat(y + 1, x + 1, Feature::Floor);
            if lit {
                c.add_flags(y + 1, x + 1, CellFlags::GLOW);
            }
            x += 2;
        }
        y += 2;
    }

    rng.shuffle(&mut walls);

    // Randomized Kruskal: knock down each adjoining wall that still
    // separates two sets.
    for i in 0..n as usize {
        let j = walls[i];
        let y = j / w;
        let x = j % w;

        if (x < 1 && y < 1) || (x > w - 2 && y > h - 2) {
            continue;
        }
        if x % 2 == y % 2 {
            continue;
        }

        let (a, b) = if x % 2 == 1 {
            ((j - 1) as usize, (j + 1) as usize)
        } else {
            ((j - w) as usize, (j + w) as usize)
        };

        if sets[a] != sets[b] {
            let sa = sets[a];
            let sb = sets[b];
            c.set_feat(y + 1, x + 1, Feature::Floor);
            if lit {
                c.add_flags(y + 1, x + 1, CellFlags::GLOW);
            }
            for s in sets.iter_mut() {
                if *s == sb {
                    *s = sa;
                }
            }
        }
    }

    let had_down = p.create_down_stair && !world.no_stairs;
    let had_up = p.create_up_stair && !world.no_stairs;

    if !new_player_spot(c, p, world, rng) {
        return false;
    }

    // Exactly one staircase of each direction.
    if had_down {
        alloc_stairs(c, Feature::LessStair, 1, 3, rng);
    } else if had_up {
        alloc_stairs(c, Feature::MoreStair, 1, 3, rng);
    } else {
        alloc_stairs(c, Feature::MoreStair, 1, 3, rng);
        alloc_stairs(c, Feature::LessStair, 1, 3, rng);
    }

    // Roughly one closed door per hundred squares, on genuine corridor
    // grids when one turns up.
    for _ in 0..n / 100 {
        let mut spot = None;
        for _ in 0..10 {
            let Some((y, x)) = find_empty(c, rng) else {
                break;
            };
            if (y, x) == (p.py, p.px) {
                continue;
            }
            spot = Some((y, x));
            if lab_is_tunnel(c, y, x) {
                break;
            }
        }
        if let Some((y, x)) = spot {
            place_closed_door(c, y, x, rng);
        }
    }

    let k = (depth / 3).clamp(2, 10);
    let k = 3 * k * h * w / (DUNGEON_HGT as i32 * DUNGEON_WID as i32);

    alloc_objects(c, AllocSet::Both, AllocKind::Rubble, rng.randint1(k), depth, Origin::Floor, rng);
    alloc_objects(c, AllocSet::Both, AllocKind::Trap, rng.randint1(k), depth, Origin::Floor, rng);

    for _ in 0..MIN_M_ALLOC_LEVEL + rng.randint1(8) + k {
        pick_and_place_distant_monster(c, p.py, p.px, 0, true, depth, rng);
    }

    let num = rng.rand_normal(6, 3);
    alloc_objects(c, AllocSet::Both, AllocKind::Object, num, depth, Origin::Labyrinth, rng);
    let num = rng.rand_normal(6, 3);
    alloc_objects(c, AllocSet::Both, AllocKind::Gold, num, depth, Origin::Labyrinth, rng);
    alloc_objects(
        c,
        AllocSet::Both,
        AllocKind::GoodObject,
        rng.randint0(2),
        depth,
        Origin::Labyrinth,
        rng,
    );

    // Dark labyrinths carry better loot; hard-walled ones carry the best.
    if !lit {
        let num = rng.rand_normal(3, 2);
        alloc_objects(c, AllocSet::Both, AllocKind::GoodObject, num, depth, Origin::Labyrinth, rng);
    }
    if !soft {
        let num = rng.rand_normal(2, 1);
        alloc_objects(c, AllocSet::Both, AllocKind::GreatObject, num, depth, Origin::Labyrinth, rng);
    }

    if known {
        c.reveal();
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_one(depth: i32) -> Option<(Cave, Player)> {
        let world = World::default();
        for seed in 0..500 {
            let mut c = Cave::new();
            let mut p = Player::at_depth(depth);
            let mut rng = GameRng::new(seed);
            c.clear(&mut p);
            c.depth = depth;
            if labyrinth_gen(&mut c, &mut p, &world, &mut rng) {
                return Some((c, p));
            }
        }
        None
    }

    #[test]
    fn test_labyrinth_rejects_shallow_and_quest_depths() {
        let world = World::default();
        for depth in [1, 12, 99, 100] {
            for seed in 0..50 {
                let mut c = Cave::new();
                let mut p = Player::at_depth(depth);
                let mut rng = GameRng::new(seed);
                c.clear(&mut p);
                c.depth = depth;
                assert!(
                    !labyrinth_gen(&mut c, &mut p, &world, &mut rng),
                    "labyrinth built at depth {depth}"
                );
            }
        }
    }

    #[test]
    fn test_labyrinth_dimensions_at_thirteen() {
        let (c, _) = build_one(13).expect("no labyrinth in 500 seeds");
        assert_eq!(c.height, 17, "15 + enclosing walls");
        assert_eq!(c.width, 53, "51 + enclosing walls");
    }

    #[test]
    fn test_labyrinth_has_one_stair_pair() {
        let (c, _) = build_one(26).expect("no labyrinth in 500 seeds");
        let mut up = 0;
        let mut down = 0;
        for y in 0..c.height {
            for x in 0..c.width {
                match c.feat(y, x) {
                    Feature::LessStair => up += 1,
                    Feature::MoreStair => down += 1,
                    _ => {}
                }
            }
        }
        assert_eq!(up, 1);
        assert_eq!(down, 1);
    }

    #[test]
    fn test_labyrinth_cells_all_connected() {
        let (c, _) = build_one(13).expect("no labyrinth in 500 seeds");
        let (_, counts) = crate::dungeon::region::build_colors(&c, false);
        assert_eq!(counts.len(), 1, "maze is not a single region");
    }

    #[test]
    fn test_lab_is_tunnel() {
        let mut c = Cave::new();
        c.set_dimensions(10, 10);
        fill_rectangle(&mut c, 0, 0, 9, 9, Feature::WallSolid);
        for x in 2..=6 {
            c.set_feat(4, x, Feature::Floor);
        }
        assert!(lab_is_tunnel(&c, 4, 4));
        assert!(!lab_is_tunnel(&c, 3, 4));
        c.set_feat(3, 4, Feature::Floor);
        // A junction is no longer a plain tunnel square.
        assert!(!lab_is_tunnel(&c, 4, 4));
    }

    #[test]
    fn test_edge_wall_indexing_never_panics() {
        // The adjoining-wall check skips only the corner-adjacent indices;
        // everything else must stay in range for every seed shape.
        for depth in [13, 20, 39, 65, 91] {
            if let Some((c, _)) = build_one(depth) {
                // Getting here without an index panic is the property.
                assert!(c.height >= 17);
            }
        }
    }
}
