//! Allocation helpers: randomized grid searches and the placement routines
//! built on top of them.

use log::debug;

use super::cell::Feature;
use super::trap::place_trap;
use super::{Cave, DDX, DDY};
use crate::data::kinds::ARTIFACTS;
use crate::object::{make_gold, make_object, Origin};
use crate::player::{Player, World};
use crate::{is_quest, MAX_DEPTH};
use ab_rng::GameRng;

/// Find a grid in `y1 <= y < y2`, `x1 <= x < x2` satisfying the predicate,
/// testing candidates in random order. Out-of-range grids are skipped, so
/// predicates can read the grid freely.
pub(crate) fn cave_find_in_range(
    c: &Cave,
    rng: &mut GameRng,
    y1: i32,
    y2: i32,
    x1: i32,
    x2: i32,
    pred: impl Fn(&Cave, i32, i32) -> bool,
) -> Option<(i32, i32)> {
    let yd = y2 - y1;
    let xd = x2 - x1;
    if yd <= 0 || xd <= 0 {
        return None;
    }

    // Partial shuffle; stops as soon as a grid qualifies.
    let n = (yd * xd) as usize;
    let mut squares: Vec<u32> = (0..n as u32).collect();
    for i in 0..n {
        let j = i + rng.randint0((n - i) as i32) as usize;
        squares.swap(i, j);

        let k = squares[i] as i32;
        let y = k / xd + y1;
        let x = k % xd + x1;
        if !c.in_bounds(y, x) {
            continue;
        }
        if pred(c, y, x) {
            return Some((y, x));
        }
    }
    None
}

/// Find a grid anywhere in the active area satisfying the predicate.
pub(crate) fn cave_find(
    c: &Cave,
    rng: &mut GameRng,
    pred: impl Fn(&Cave, i32, i32) -> bool,
) -> Option<(i32, i32)> {
    cave_find_in_range(c, rng, 0, c.height, 0, c.width, pred)
}

/// Find an empty floor grid anywhere in the active area.
pub(crate) fn find_empty(c: &Cave, rng: &mut GameRng) -> Option<(i32, i32)> {
    cave_find(c, rng, Cave::is_empty)
}

/// Find an empty floor grid in the given range.
pub(crate) fn find_empty_range(
    c: &Cave,
    rng: &mut GameRng,
    y1: i32,
    y2: i32,
    x1: i32,
    x2: i32,
) -> Option<(i32, i32)> {
    cave_find_in_range(c, rng, y1, y2, x1, x2, Cave::is_empty)
}

/// Find any in-bounds grid within +/- yd, xd of (y0, x0).
pub(crate) fn find_nearby_grid(
    c: &Cave,
    y0: i32,
    yd: i32,
    x0: i32,
    xd: i32,
    rng: &mut GameRng,
) -> Option<(i32, i32)> {
    cave_find_in_range(c, rng, y0 - yd, y0 + yd + 1, x0 - xd, x0 + xd + 1, |_, _, _| true)
}

/// Given two points, pick a valid cardinal direction from one to the other.
pub(crate) fn correct_dir(
    y1: i32,
    x1: i32,
    y2: i32,
    x2: i32,
    rng: &mut GameRng,
) -> (i32, i32) {
    let mut rdir = (y2 - y1).signum();
    let mut cdir = (x2 - x1).signum();

    // A diagonal heading collapses to a random cardinal.
    if rdir != 0 && cdir != 0 {
        if rng.randint0(100) < 50 {
            rdir = 0;
        } else {
            cdir = 0;
        }
    }
    (rdir, cdir)
}

/// Pick a random cardinal direction.
pub(crate) fn rand_dir(rng: &mut GameRng) -> (i32, i32) {
    let i = rng.randint0(4) as usize;
    (DDY[i], DDX[i])
}

/// Whether (y, x) is a valid starting location for the player.
pub(crate) fn is_start(c: &Cave, y: i32, x: i32) -> bool {
    c.is_empty(y, x) && !c.is_vault(y, x)
}

/// Place the player at a random starting location, creating the staircase
/// they arrived by when one was requested.
pub(crate) fn new_player_spot(
    c: &mut Cave,
    p: &mut Player,
    world: &World,
    rng: &mut GameRng,
) -> bool {
    let Some((y, x)) = cave_find(c, rng, is_start) else {
        debug!("no starting location for the player");
        return false;
    };

    if world.no_stairs {
        // Arrive without a connected staircase.
    } else if p.create_down_stair {
        c.set_feat(y, x, Feature::MoreStair);
        p.create_down_stair = false;
    } else if p.create_up_stair {
        c.set_feat(y, x, Feature::LessStair);
        p.create_up_stair = false;
    }

    player_place(c, p, y, x);
    true
}

/// Put the player at (y, x). The grid is marked occupied so later
/// allocation passes leave it alone.
pub fn player_place(c: &mut Cave, p: &mut Player, y: i32, x: i32) {
    debug_assert!(
        c.is_passable(y, x) && !c.is_vault(y, x),
        "player placed on a bad grid ({y},{x})"
    );
    c.cell_mut(y, x).m_idx = super::cave::PLAYER_MARK;
    p.py = y;
    p.px = x;
}

/// How many cardinal neighbors of (y, x) are walls.
pub(crate) fn next_to_walls(c: &Cave, y: i32, x: i32) -> i32 {
    let mut k = 0;
    for i in 0..4 {
        let (ny, nx) = (y + DDY[i], x + DDX[i]);
        if c.in_bounds(ny, nx) && c.is_wall(ny, nx) {
            k += 1;
        }
    }
    k
}

/// Place stairs of the requested kind at (y, x), subject to the depth rules:
/// town stairs go down, stairs on quest depths and the dungeon bottom go up.
pub(crate) fn place_stairs(c: &mut Cave, y: i32, x: i32, feat: Feature) {
    if c.depth == 0 {
        c.set_feat(y, x, Feature::MoreStair);
    } else if is_quest(c.depth) || c.depth >= MAX_DEPTH - 1 {
        c.set_feat(y, x, Feature::LessStair);
    } else {
        c.set_feat(y, x, feat);
    }
}

/// Place a random staircase at (y, x) if the grid is clean.
pub(crate) fn place_random_stairs(c: &mut Cave, y: i32, x: i32, rng: &mut GameRng) {
    let feat = if rng.randint0(100) < 50 {
        Feature::LessStair
    } else {
        Feature::MoreStair
    };
    if c.can_put_item(y, x) {
        place_stairs(c, y, x, feat);
    }
}

/// Place `num` staircases, preferring grids next to at least `walls` walls.
/// The wall requirement relaxes when placement keeps failing.
pub(crate) fn alloc_stairs(
    c: &mut Cave,
    feat: Feature,
    num: i32,
    walls: i32,
    rng: &mut GameRng,
) {
    for _ in 0..num {
        let mut walls = walls;
        'placed: loop {
            for _ in 0..=1000 {
                let Some((y, x)) = find_empty(c, rng) else {
                    return;
                };
                if next_to_walls(c, y, x) < walls {
                    continue;
                }
                place_stairs(c, y, x, feat);
                break 'placed;
            }
            if walls == 0 {
                break;
            }
            walls -= 1;
        }
    }
}

/// Place a hidden door at (y, x).
pub(crate) fn place_secret_door(c: &mut Cave, y: i32, x: i32) {
    c.set_feat(y, x, Feature::SecretDoor);
}

/// Place a closed door at (y, x); 3/4 plain, most of the rest locked, the
/// occasional one jammed shut.
pub(crate) fn place_closed_door(c: &mut Cave, y: i32, x: i32, rng: &mut GameRng) {
    use super::cell::DoorPower;

    let tmp = rng.randint0(400);
    let power = if tmp < 300 {
        DoorPower::Plain
    } else if tmp < 399 {
        DoorPower::Locked(rng.randint1(7) as u8)
    } else {
        DoorPower::Jammed(rng.randint0(8) as u8)
    };
    c.set_feat(y, x, Feature::ClosedDoor(power));
}

/// Place a random door at (y, x): open 30%, broken 10%, secret 20%,
/// closed 40%.
pub(crate) fn place_random_door(c: &mut Cave, y: i32, x: i32, rng: &mut GameRng) {
    let tmp = rng.randint0(100);
    if tmp < 30 {
        c.set_feat(y, x, Feature::OpenDoor);
    } else if tmp < 40 {
        c.set_feat(y, x, Feature::BrokenDoor);
    } else if tmp < 60 {
        c.set_feat(y, x, Feature::SecretDoor);
    } else {
        place_closed_door(c, y, x, rng);
    }
}

/// Place a random object at (y, x), accumulating the level's object rating.
pub(crate) fn place_object(
    c: &mut Cave,
    y: i32,
    x: i32,
    level: i32,
    good: bool,
    great: bool,
    origin: Origin,
    rng: &mut GameRng,
) {
    assert!(c.in_bounds(y, x), "object placement out of bounds: ({y},{x})");
    if !c.can_put_item(y, x) {
        return;
    }

    let Some((mut obj, mut rating)) = make_object(level, good, great, rng) else {
        return;
    };
    obj.origin = origin;
    obj.origin_depth = c.depth;

    // One instance of each artifact per level.
    if let Some(a) = obj.artifact {
        if c.objects.iter().any(|o| o.artifact == Some(a)) {
            obj.artifact = None;
            rating = rating.saturating_sub(ARTIFACTS[a].rating);
        }
    }

    let is_artifact = obj.artifact.is_some();
    if c.floor_carry(y, x, obj) {
        if is_artifact {
            c.good_item = true;
        }
        c.obj_rating += rating;
    }
}

/// Place a random amount of gold at (y, x).
pub(crate) fn place_gold(
    c: &mut Cave,
    y: i32,
    x: i32,
    level: i32,
    origin: Origin,
    rng: &mut GameRng,
) {
    assert!(c.in_bounds(y, x), "gold placement out of bounds: ({y},{x})");
    if !c.can_put_item(y, x) {
        return;
    }
    let mut gold = make_gold(level, rng);
    gold.origin = origin;
    gold.origin_depth = level;
    c.floor_carry(y, x, gold);
}

/// Where [`alloc_object`] may put things.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AllocSet {
    Corridor,
    Room,
    Both,
}

impl AllocSet {
    fn allows(self, in_room: bool) -> bool {
        match self {
            AllocSet::Corridor => !in_room,
            AllocSet::Room => in_room,
            AllocSet::Both => true,
        }
    }
}

/// What [`alloc_object`] puts there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AllocKind {
    Rubble,
    Trap,
    Gold,
    Object,
    GoodObject,
    GreatObject,
}

/// Allocate `num` random things across the dungeon.
pub(crate) fn alloc_objects(
    c: &mut Cave,
    set: AllocSet,
    kind: AllocKind,
    num: i32,
    depth: i32,
    origin: Origin,
    rng: &mut GameRng,
) {
    for _ in 0..num.max(0) {
        alloc_object(c, set, kind, depth, origin, rng);
    }
}

/// Allocate one random thing on an empty grid in the requested set.
pub(crate) fn alloc_object(
    c: &mut Cave,
    set: AllocSet,
    kind: AllocKind,
    depth: i32,
    origin: Origin,
    rng: &mut GameRng,
) -> bool {
    let mut spot = None;
    for _ in 0..2000 {
        let Some((y, x)) = find_empty(c, rng) else {
            break;
        };
        if set.allows(c.is_room(y, x)) {
            spot = Some((y, x));
            break;
        }
    }
    let Some((y, x)) = spot else {
        debug!("no room for allocation of {kind:?}");
        return false;
    };

    match kind {
        AllocKind::Rubble => c.set_feat(y, x, Feature::Rubble),
        AllocKind::Trap => place_trap(c, y, x, rng),
        AllocKind::Gold => place_gold(c, y, x, depth, origin, rng),
        AllocKind::Object => place_object(c, y, x, depth, false, false, origin, rng),
        AllocKind::GoodObject => place_object(c, y, x, depth, true, false, origin, rng),
        AllocKind::GreatObject => place_object(c, y, x, depth, true, true, origin, rng),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::grid::{draw_rectangle, fill_rectangle};

    fn open_cave() -> Cave {
        let mut c = Cave::new();
        c.set_dimensions(22, 44);
        fill_rectangle(&mut c, 0, 0, 21, 43, Feature::Floor);
        draw_rectangle(&mut c, 0, 0, 21, 43, Feature::PermSolid);
        c
    }

    #[test]
    fn test_cave_find_exhaustive() {
        // With a single qualifying grid the randomized search must still
        // find it.
        let mut c = open_cave();
        fill_rectangle(&mut c, 1, 1, 20, 42, Feature::WallSolid);
        c.set_feat(7, 13, Feature::Floor);

        let mut rng = GameRng::new(42);
        for _ in 0..10 {
            assert_eq!(find_empty(&c, &mut rng), Some((7, 13)));
        }
    }

    #[test]
    fn test_cave_find_none() {
        let mut c = open_cave();
        fill_rectangle(&mut c, 0, 0, 21, 43, Feature::WallSolid);
        let mut rng = GameRng::new(42);
        assert_eq!(find_empty(&c, &mut rng), None);
    }

    #[test]
    fn test_find_nearby_grid_stays_near() {
        let c = open_cave();
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            let (y, x) = find_nearby_grid(&c, 10, 2, 20, 3, &mut rng).expect("open cave");
            assert!((8..=12).contains(&y));
            assert!((17..=23).contains(&x));
        }
    }

    #[test]
    fn test_correct_dir_is_cardinal() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            let (rdir, cdir) = correct_dir(5, 5, 17, 23, &mut rng);
            assert!(rdir == 0 || cdir == 0);
            assert!(rdir == 1 || cdir == 1);
        }
        assert_eq!(correct_dir(5, 5, 5, 9, &mut rng), (0, 1));
        assert_eq!(correct_dir(9, 5, 5, 5, &mut rng), (-1, 0));
    }

    #[test]
    fn test_alloc_stairs_places_requested_number() {
        let mut c = open_cave();
        c.depth = 10;
        let mut rng = GameRng::new(42);
        alloc_stairs(&mut c, Feature::MoreStair, 3, 3, &mut rng);

        let mut count = 0;
        for y in 0..c.height {
            for x in 0..c.width {
                if c.feat(y, x) == Feature::MoreStair {
                    count += 1;
                }
            }
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_stairs_go_up_on_quest_levels() {
        let mut c = open_cave();
        c.depth = 99;
        let mut rng = GameRng::new(42);
        alloc_stairs(&mut c, Feature::MoreStair, 2, 0, &mut rng);

        for y in 0..c.height {
            for x in 0..c.width {
                assert_ne!(c.feat(y, x), Feature::MoreStair);
            }
        }
    }

    #[test]
    fn test_closed_door_distribution() {
        use super::super::cell::DoorPower;

        let mut c = open_cave();
        let mut rng = GameRng::new(42);
        let mut plain = 0;
        let mut locked = 0;
        let mut jammed = 0;
        for _ in 0..4000 {
            place_closed_door(&mut c, 5, 5, &mut rng);
            match c.feat(5, 5) {
                Feature::ClosedDoor(DoorPower::Plain) => plain += 1,
                Feature::ClosedDoor(DoorPower::Locked(p)) => {
                    assert!((1..=7).contains(&p));
                    locked += 1;
                }
                Feature::ClosedDoor(DoorPower::Jammed(p)) => {
                    assert!(p <= 7);
                    jammed += 1;
                }
                other => panic!("not a closed door: {other:?}"),
            }
        }
        assert!(plain > 2700 && plain < 3300, "plain {plain}");
        assert!(locked > 700 && locked < 1300, "locked {locked}");
        assert!(jammed < 50, "jammed {jammed}");
    }

    #[test]
    fn test_alloc_corridor_set_avoids_rooms() {
        use super::super::cell::CellFlags;

        let mut c = open_cave();
        c.depth = 5;
        // Mark the left half as a room.
        for y in 1..21 {
            for x in 1..22 {
                c.add_flags(y, x, CellFlags::ROOM);
            }
        }
        let mut rng = GameRng::new(42);
        for _ in 0..40 {
            alloc_object(&mut c, AllocSet::Corridor, AllocKind::Rubble, 5, Origin::Floor, &mut rng);
        }
        for y in 1..21 {
            for x in 1..22 {
                assert_ne!(c.feat(y, x), Feature::Rubble, "rubble in room at ({y},{x})");
            }
        }
    }

    #[test]
    fn test_place_object_accumulates_rating() {
        let mut c = open_cave();
        c.depth = 20;
        let mut rng = GameRng::new(42);
        for _ in 0..10 {
            alloc_object(&mut c, AllocSet::Both, AllocKind::Object, 20, Origin::Floor, &mut rng);
        }
        assert!(!c.objects.is_empty());
        assert!(c.obj_rating > 0);
    }
}
