//! Region labelling and connectivity repair.
//!
//! After layout, the passable grids are flood-filled into numbered regions.
//! Undersized regions are filled back in, and the survivors are bridged
//! with L-shaped corridors until a single region remains. Every builder
//! finishes with this pass, which is what guarantees the reachability
//! invariant.

use hashbrown::HashMap;
use log::debug;

use super::cell::Feature;
use super::Cave;
use ab_rng::GameRng;

/// Open regions smaller than this are deleted outright.
const MIN_REGION: usize = 9;

/// Bridge attempts before a builder gives up and fails the level.
const JOIN_TRIES: usize = 50;

/// Label every passable grid with a region number.
///
/// Returns the label grid (0 = unlabelled) and the size of each region.
/// `diagonal` widens the flood fill to eight neighbors.
pub(crate) fn build_colors(c: &Cave, diagonal: bool) -> (Vec<i32>, HashMap<i32, usize>) {
    let w = c.width;
    let mut colors = vec![0i32; (c.height * w) as usize];
    let mut counts: HashMap<i32, usize> = HashMap::new();
    let mut next_color = 1;

    let mut stack: Vec<(i32, i32)> = Vec::new();
    for y in 0..c.height {
        for x in 0..c.width {
            if !c.is_passable(y, x) || colors[(y * w + x) as usize] != 0 {
                continue;
            }

            let color = next_color;
            next_color += 1;
            let mut size = 0;

            stack.push((y, x));
            colors[(y * w + x) as usize] = color;
            while let Some((cy, cx)) = stack.pop() {
                size += 1;
                let neighbors: &[(i32, i32)] = if diagonal {
                    &[(-1, 0), (1, 0), (0, -1), (0, 1), (-1, -1), (-1, 1), (1, -1), (1, 1)]
                } else {
                    &[(-1, 0), (1, 0), (0, -1), (0, 1)]
                };
                for (dy, dx) in neighbors {
                    let (ny, nx) = (cy + dy, cx + dx);
                    if !c.in_bounds(ny, nx) || !c.is_passable(ny, nx) {
                        continue;
                    }
                    let idx = (ny * w + nx) as usize;
                    if colors[idx] == 0 {
                        colors[idx] = color;
                        stack.push((ny, nx));
                    }
                }
            }

            counts.insert(color, size);
        }
    }

    (colors, counts)
}

/// Fill in all open regions smaller than `MIN_REGION` grids.
///
/// Grids carrying a monster, an object, or a trap are spared; whatever
/// pocket they sit in gets bridged instead of buried.
pub(crate) fn clear_small_regions(c: &mut Cave) {
    let (colors, counts) = build_colors(c, false);
    let w = c.width;
    for y in 0..c.height {
        for x in 0..c.width {
            let color = colors[(y * w + x) as usize];
            if color == 0 {
                continue;
            }
            if counts.get(&color).copied().unwrap_or(0) >= MIN_REGION {
                continue;
            }
            let cell = c.cell(y, x);
            if cell.m_idx != 0 || cell.o_idx != 0 || c.trap_at(y, x).is_some() {
                continue;
            }
            c.set_feat(y, x, Feature::WallSolid);
        }
    }
}

/// Carve the L-shaped corridor from (y1, x1) to (y2, x2), one leg at a
/// time. Fails without touching the grid if the path crosses permanent
/// rock.
fn carve_l(c: &mut Cave, y1: i32, x1: i32, y2: i32, x2: i32, horizontal_first: bool) -> bool {
    let mut path: Vec<(i32, i32)> = Vec::new();

    let (corner_y, corner_x) = if horizontal_first { (y1, x2) } else { (y2, x1) };

    let mut push_leg = |path: &mut Vec<(i32, i32)>, ay: i32, ax: i32, by: i32, bx: i32| {
        let dy = (by - ay).signum();
        let dx = (bx - ax).signum();
        let (mut y, mut x) = (ay, ax);
        while (y, x) != (by, bx) {
            y += dy;
            x += dx;
            path.push((y, x));
        }
    };

    push_leg(&mut path, y1, x1, corner_y, corner_x);
    push_leg(&mut path, corner_y, corner_x, y2, x2);

    if path.iter().any(|&(y, x)| !c.in_bounds_fully(y, x) || c.is_perm(y, x)) {
        return false;
    }

    for (y, x) in path {
        if !c.is_passable(y, x) {
            c.set_feat(y, x, Feature::Floor);
        }
    }
    true
}

/// Bridge regions with L-shaped corridors until one remains.
///
/// Returns false when no viable bridge can be found, which fails the
/// builder and lets the director retry the level.
pub(crate) fn join_regions(c: &mut Cave, rng: &mut GameRng) -> bool {
    loop {
        let (colors, counts) = build_colors(c, false);
        if counts.len() <= 1 {
            return true;
        }

        // Bridge the smallest region; ties break deterministically on the
        // label itself.
        let &from = counts
            .iter()
            .min_by_key(|&(color, size)| (*size, *color))
            .map(|(color, _)| color)
            .unwrap_or(&0);

        let w = c.width;
        let ours: Vec<(i32, i32)> = (0..c.height)
            .flat_map(|y| (0..c.width).map(move |x| (y, x)))
            .filter(|&(y, x)| colors[(y * w + x) as usize] == from)
            .collect();
        let theirs: Vec<(i32, i32)> = (0..c.height)
            .flat_map(|y| (0..c.width).map(move |x| (y, x)))
            .filter(|&(y, x)| {
                let color = colors[(y * w + x) as usize];
                color != 0 && color != from
            })
            .collect();

        let mut bridged = false;
        for _ in 0..JOIN_TRIES {
            let (y1, x1) = ours[rng.randint0(ours.len() as i32) as usize];
            let (y2, x2) = theirs[rng.randint0(theirs.len() as i32) as usize];
            let horizontal_first = rng.randint0(2) == 0;
            if carve_l(c, y1, x1, y2, x2, horizontal_first)
                || carve_l(c, y1, x1, y2, x2, !horizontal_first)
            {
                bridged = true;
                break;
            }
        }
        if !bridged {
            debug!("unable to bridge region {from}");
            return false;
        }
    }
}

/// The full repair pass: delete undersized regions, then bridge the rest.
pub(crate) fn ensure_connectedness(c: &mut Cave, rng: &mut GameRng) -> bool {
    clear_small_regions(c);
    join_regions(c, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::grid::{draw_rectangle, fill_rectangle};

    fn walled_cave(h: i32, w: i32) -> Cave {
        let mut c = Cave::new();
        c.set_dimensions(h, w);
        fill_rectangle(&mut c, 0, 0, h - 1, w - 1, Feature::WallSolid);
        draw_rectangle(&mut c, 0, 0, h - 1, w - 1, Feature::PermSolid);
        c
    }

    #[test]
    fn test_build_colors_counts_regions() {
        let mut c = walled_cave(20, 40);
        fill_rectangle(&mut c, 2, 2, 6, 10, Feature::Floor);
        fill_rectangle(&mut c, 12, 20, 16, 30, Feature::Floor);

        let (_, counts) = build_colors(&c, false);
        assert_eq!(counts.len(), 2);
        let mut sizes: Vec<usize> = counts.values().copied().collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![45, 55]);
    }

    #[test]
    fn test_doors_join_regions() {
        let mut c = walled_cave(20, 40);
        fill_rectangle(&mut c, 2, 2, 6, 10, Feature::Floor);
        fill_rectangle(&mut c, 2, 12, 6, 20, Feature::Floor);
        // Separated by a wall column; a door in it merges them.
        c.set_feat(4, 11, Feature::SecretDoor);

        let (_, counts) = build_colors(&c, false);
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_clear_small_regions() {
        let mut c = walled_cave(20, 40);
        fill_rectangle(&mut c, 2, 2, 6, 10, Feature::Floor);
        // A 2x2 puddle, too small to live.
        fill_rectangle(&mut c, 12, 20, 13, 21, Feature::Floor);

        clear_small_regions(&mut c);

        let (_, counts) = build_colors(&c, false);
        assert_eq!(counts.len(), 1);
        assert_eq!(c.feat(12, 20), Feature::WallSolid);
    }

    #[test]
    fn test_join_regions_connects_everything() {
        let mut c = walled_cave(30, 60);
        fill_rectangle(&mut c, 2, 2, 8, 12, Feature::Floor);
        fill_rectangle(&mut c, 20, 40, 27, 55, Feature::Floor);
        fill_rectangle(&mut c, 3, 40, 9, 50, Feature::Floor);

        let mut rng = GameRng::new(42);
        assert!(join_regions(&mut c, &mut rng));

        let (_, counts) = build_colors(&c, false);
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_join_respects_permanent_rock() {
        // A region sealed in permanent rock cannot be bridged; the builder
        // must fail rather than tunnel through.
        let mut c = walled_cave(30, 60);
        fill_rectangle(&mut c, 2, 2, 10, 12, Feature::Floor);
        fill_rectangle(&mut c, 18, 38, 26, 52, Feature::PermInner);
        fill_rectangle(&mut c, 20, 40, 24, 50, Feature::Floor);

        let mut rng = GameRng::new(42);
        assert!(!join_regions(&mut c, &mut rng));
        // The sealed interior was not breached.
        for x in 38..=52 {
            assert_eq!(c.feat(18, x), Feature::PermInner);
        }
    }
}
