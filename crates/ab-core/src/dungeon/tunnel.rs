//! Corridor carving.
//!
//! A tunnel wanders from one room center toward another, recording the
//! grids it digs and the outer walls it pierces, and only committing them
//! to floor at the end. Recording the piercings separately keeps a corridor
//! from leaving a room and coming straight back in through the same hole,
//! and converting the neighboring outer walls to solid stops two corridors
//! from entering a room through adjacent grids.

use super::alloc::{correct_dir, place_random_door, rand_dir};
use super::cell::Feature;
use super::generation::GenState;
use super::{Cave, Loc};
use crate::{DOOR_MAX, TUNN_MAX, WALL_MAX};
use ab_rng::GameRng;

/// Hard bound on tunnel steps; geometry can box the walk in.
const MAX_TUNNEL_STEPS: u32 = 2000;

/// Walls and veins a tunnel digs straight through.
fn is_diggable(feat: Feature) -> bool {
    matches!(
        feat,
        Feature::WallExtra
            | Feature::WallInner
            | Feature::Magma { .. }
            | Feature::Quartz { .. }
            | Feature::Rubble
    )
}

/// Carve a tunnel from (row1, col1) to (row2, col2).
pub(crate) fn build_tunnel(
    c: &mut Cave,
    dun: &mut GenState,
    mut row1: i32,
    mut col1: i32,
    row2: i32,
    col2: i32,
    rng: &mut GameRng,
) {
    dun.tunn.clear();
    dun.wall.clear();

    let start_row = row1;
    let start_col = col1;
    let mut door_flag = false;
    let mut steps = 0u32;

    let tun = dun.profile.tun;
    let (mut row_dir, mut col_dir) = correct_dir(row1, col1, row2, col2, rng);

    while row1 != row2 || col1 != col2 {
        steps += 1;
        if steps > MAX_TUNNEL_STEPS {
            break;
        }

        // Allow bends in the tunnel.
        if rng.randint0(100) < tun.chg {
            let dir = correct_dir(row1, col1, row2, col2, rng);
            row_dir = dir.0;
            col_dir = dir.1;
            if rng.randint0(100) < tun.rnd {
                let dir = rand_dir(rng);
                row_dir = dir.0;
                col_dir = dir.1;
            }
        }

        let mut tmp_row = row1 + row_dir;
        let mut tmp_col = col1 + col_dir;

        while !c.in_bounds(tmp_row, tmp_col) {
            let dir = correct_dir(row1, col1, row2, col2, rng);
            row_dir = dir.0;
            col_dir = dir.1;
            if rng.randint0(100) < tun.rnd {
                let dir = rand_dir(rng);
                row_dir = dir.0;
                col_dir = dir.1;
            }
            tmp_row = row1 + row_dir;
            tmp_col = col1 + col_dir;
        }

        let feat = c.feat(tmp_row, tmp_col);

        // Never dig the boundary or anything permanent.
        if feat.is_perm() {
            continue;
        }

        // Solid granite marks forbidden piercing spots.
        if feat == Feature::WallSolid {
            continue;
        }

        if feat == Feature::WallOuter {
            // Pierce an outer room wall, but only if the grid past it is
            // open: no doubled walls, and no exiting straight into rock.
            let y = tmp_row + row_dir;
            let x = tmp_col + col_dir;
            if !c.in_bounds(y, x) {
                continue;
            }
            match c.feat(y, x) {
                Feature::PermSolid
                | Feature::PermOuter
                | Feature::WallOuter
                | Feature::WallSolid => continue,
                _ => {}
            }

            row1 = tmp_row;
            col1 = tmp_col;

            if dun.wall.len() < WALL_MAX {
                dun.wall.push(Loc::new(row1, col1));
            }

            // Forbid re-entry near this piercing.
            for y in row1 - 1..=row1 + 1 {
                for x in col1 - 1..=col1 + 1 {
                    if c.in_bounds(y, x) && c.feat(y, x) == Feature::WallOuter {
                        c.set_feat(y, x, Feature::WallSolid);
                    }
                }
            }
        } else if c.is_room(tmp_row, tmp_col) {
            // Travel quickly through rooms.
            row1 = tmp_row;
            col1 = tmp_col;
        } else if is_diggable(feat) {
            row1 = tmp_row;
            col1 = tmp_col;

            if dun.tunn.len() < TUNN_MAX {
                dun.tunn.push(Loc::new(row1, col1));
            }

            // Allow a door in the next grid.
            door_flag = false;
        } else {
            // Corridor intersection or overlap.
            row1 = tmp_row;
            col1 = tmp_col;

            if !door_flag {
                if dun.door.len() < DOOR_MAX {
                    dun.door.push(Loc::new(row1, col1));
                }
                door_flag = true;
            }

            // Occasionally terminate early once far enough from the start.
            if rng.randint0(100) >= tun.con {
                let dr = (row1 - start_row).abs();
                let dc = (col1 - start_col).abs();
                if dr > 10 || dc > 10 {
                    break;
                }
            }
        }
    }

    // Commit the tunnel.
    for i in 0..dun.tunn.len() {
        let Loc { y, x } = dun.tunn[i];
        c.set_feat(y, x, Feature::Floor);
    }

    // Apply the piercings, sometimes with a door.
    for i in 0..dun.wall.len() {
        let Loc { y, x } = dun.wall[i];
        c.set_feat(y, x, Feature::Floor);
        if rng.randint0(100) < tun.pen {
            place_random_door(c, y, x, rng);
        }
    }
}

/// Count the corridor grids (floors outside rooms) adjacent to (y1, x1).
fn next_to_corr(c: &Cave, y1: i32, x1: i32) -> i32 {
    let mut k = 0;
    for (dy, dx) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
        let (y, x) = (y1 + dy, x1 + dx);
        if c.in_bounds(y, x) && c.is_floor(y, x) && !c.is_room(y, x) {
            k += 1;
        }
    }
    k
}

/// Whether a doorway can stand at (y, x): adjacent to at least two corridor
/// grids and framed between two walls.
fn possible_doorway(c: &Cave, y: i32, x: i32) -> bool {
    if next_to_corr(c, y, x) < 2 {
        return false;
    }
    if c.is_strong_wall(y - 1, x) && c.is_strong_wall(y + 1, x) {
        return true;
    }
    if c.is_strong_wall(y, x - 1) && c.is_strong_wall(y, x + 1) {
        return true;
    }
    false
}

/// Try a junction door at (y, x).
pub(crate) fn try_door(c: &mut Cave, dun: &GenState, y: i32, x: i32, rng: &mut GameRng) {
    if !c.in_bounds_fully(y, x) {
        return;
    }
    if c.is_strong_wall(y, x) || c.is_room(y, x) {
        return;
    }
    if rng.randint0(100) < dun.profile.tun.jct && possible_doorway(c, y, x) {
        place_random_door(c, y, x, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::generation::{GenState, CAVE_PROFILES};
    use crate::dungeon::grid::{draw_rectangle, fill_rectangle, generate_room};

    fn rock_cave() -> Cave {
        let mut c = Cave::new();
        let h = c.height;
        let w = c.width;
        fill_rectangle(&mut c, 0, 0, h - 1, w - 1, Feature::WallExtra);
        draw_rectangle(&mut c, 0, 0, h - 1, w - 1, Feature::PermSolid);
        c
    }

    fn simple_room(c: &mut Cave, y1: i32, x1: i32, y2: i32, x2: i32) {
        generate_room(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, false);
        draw_rectangle(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, Feature::WallOuter);
        fill_rectangle(c, y1, x1, y2, x2, Feature::Floor);
    }

    fn default_profile_state() -> GenState {
        GenState::new(&CAVE_PROFILES[CAVE_PROFILES.len() - 1])
    }

    #[test]
    fn test_tunnel_connects_two_rooms() {
        let mut c = rock_cave();
        c.depth = 5;
        simple_room(&mut c, 10, 10, 14, 20);
        simple_room(&mut c, 30, 60, 34, 70);

        let mut dun = default_profile_state();
        let mut rng = GameRng::new(42);
        build_tunnel(&mut c, &mut dun, 12, 15, 32, 65, &mut rng);

        // The tunnel must have dug something.
        let mut corridor = 0;
        for y in 0..c.height {
            for x in 0..c.width {
                if c.is_floor(y, x) && !c.is_room(y, x) {
                    corridor += 1;
                }
            }
        }
        assert!(corridor > 0, "no corridor grids dug");
    }

    #[test]
    fn test_tunnel_never_breaks_permanent_walls() {
        let mut c = rock_cave();
        c.depth = 5;
        simple_room(&mut c, 10, 10, 14, 20);
        simple_room(&mut c, 30, 100, 34, 110);

        let mut dun = default_profile_state();
        let mut rng = GameRng::new(7);
        for _ in 0..20 {
            build_tunnel(&mut c, &mut dun, 12, 15, 32, 105, &mut rng);
        }

        for y in 0..c.height {
            assert_eq!(c.feat(y, 0), Feature::PermSolid);
            assert_eq!(c.feat(y, c.width - 1), Feature::PermSolid);
        }
        for x in 0..c.width {
            assert_eq!(c.feat(0, x), Feature::PermSolid);
            assert_eq!(c.feat(c.height - 1, x), Feature::PermSolid);
        }
    }

    #[test]
    fn test_piercing_solidifies_neighbors() {
        let mut c = rock_cave();
        c.depth = 5;
        simple_room(&mut c, 10, 10, 14, 20);
        simple_room(&mut c, 10, 40, 14, 50);

        let mut dun = default_profile_state();
        let mut rng = GameRng::new(42);
        build_tunnel(&mut c, &mut dun, 12, 15, 12, 45, &mut rng);

        // Recorded piercings are never adjacent to each other, and the
        // outer walls around each one were downgraded to solid.
        for (i, a) in dun.wall.iter().enumerate() {
            for b in dun.wall.iter().skip(i + 1) {
                let dist = (a.y - b.y).abs().max((a.x - b.x).abs());
                assert!(dist >= 2, "adjacent piercings at {a:?} and {b:?}");
            }
            for dy in -1..=1 {
                for dx in -1..=1 {
                    assert_ne!(
                        c.feat(a.y + dy, a.x + dx),
                        Feature::WallOuter,
                        "outer wall left beside piercing {a:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_try_door_needs_corridor_junction() {
        let mut c = rock_cave();
        c.depth = 5;
        let dun = default_profile_state();
        let mut rng = GameRng::new(42);

        // An isolated rock grid never takes a door.
        for _ in 0..50 {
            try_door(&mut c, &dun, 20, 20, &mut rng);
        }
        assert_eq!(c.feat(20, 20), Feature::WallExtra);

        // A corridor pinch point framed by walls does.
        for x in 18..=22 {
            c.set_feat(20, x, Feature::Floor);
        }
        let mut placed = false;
        for _ in 0..50 {
            try_door(&mut c, &dun, 20, 20, &mut rng);
            if c.feat(20, 20).is_door() {
                placed = true;
                break;
            }
        }
        assert!(placed, "no junction door placed in 50 tries");
    }
}
