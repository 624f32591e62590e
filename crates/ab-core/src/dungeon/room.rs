//! Room builders.
//!
//! Each builder stamps one room around an anchor point handed out by the
//! block allocator. A false return means "try another slot": builders check
//! everything that can fail before touching the grid.

use log::debug;

use super::alloc::{
    find_nearby_grid, place_gold, place_object, place_random_stairs, place_secret_door,
};
use super::cell::{CellFlags, DoorPower, Feature};
use super::generation::GenState;
use super::grid::{
    draw_rectangle, fill_circle, fill_rectangle, generate_hole, generate_open, generate_plus,
    generate_room,
};
use super::pit::choose_pit_type;
use super::trap::place_trap;
use super::Cave;
use crate::data::pits::PitKind;
use crate::data::races::RACES;
use crate::data::vaults::{random_vault, Vault, VaultKind};
use crate::monster::{get_mon_num, pick_and_place_monster, place_new_monster};
use crate::object::Origin;
use ab_rng::GameRng;

/// Create up to `num` objects near (y, x) inside a room.
fn vault_objects(c: &mut Cave, y: i32, x: i32, depth: i32, num: i32, rng: &mut GameRng) {
    for _ in 0..num {
        for _ in 0..11 {
            let Some((j, k)) = find_nearby_grid(c, y, 2, x, 3, rng) else {
                break;
            };
            if !c.can_put_item(j, k) {
                continue;
            }
            if rng.randint0(100) < 75 {
                place_object(c, j, k, depth, false, false, Origin::Special, rng);
            } else {
                place_gold(c, j, k, depth, Origin::Vault, rng);
            }
            break;
        }
    }
}

/// Place a trap near (y, x) within the given displacement.
fn vault_trap_aux(c: &mut Cave, y: i32, x: i32, yd: i32, xd: i32, rng: &mut GameRng) {
    for _ in 0..=5 {
        let Some((y1, x1)) = find_nearby_grid(c, y, yd, x, xd, rng) else {
            return;
        };
        if !c.is_empty(y1, x1) {
            continue;
        }
        place_trap(c, y1, x1, rng);
        break;
    }
}

/// Place `num` traps near (y, x) within the given displacement.
fn vault_traps(c: &mut Cave, y: i32, x: i32, yd: i32, xd: i32, num: i32, rng: &mut GameRng) {
    for _ in 0..num {
        vault_trap_aux(c, y, x, yd, xd, rng);
    }
}

/// Place `num` sleeping monsters near (y, x).
fn vault_monsters(c: &mut Cave, y1: i32, x1: i32, depth: i32, num: i32, rng: &mut GameRng) {
    for _ in 0..num {
        for _ in 0..9 {
            let Some((y, x)) = find_nearby_grid(c, y1, 1, x1, 1, rng) else {
                break;
            };
            if !c.is_empty(y, x) {
                continue;
            }
            pick_and_place_monster(c, y, x, depth, true, true, Origin::DropSpecial, rng);
            break;
        }
    }
}

/// Roll room lighting: shallow rooms are usually lit.
fn room_light(depth: i32, rng: &mut GameRng) -> bool {
    depth <= rng.randint1(25)
}

/// Build a circular room (interior radius 4-7), occasionally with an inner
/// chamber.
pub(crate) fn build_circular(
    c: &mut Cave,
    _dun: &mut GenState,
    y0: i32,
    x0: i32,
    rng: &mut GameRng,
) -> bool {
    let radius = 2 + rng.randint1(2) + rng.randint1(3);
    let light = room_light(c.depth, rng);

    let mut info = CellFlags::ROOM;
    if light {
        info |= CellFlags::GLOW;
    }

    fill_circle(c, y0, x0, radius + 1, 1, Feature::WallOuter, info);
    fill_circle(c, y0, x0, radius, 0, Feature::Floor, info);

    // Especially large circular rooms have a middle chamber.
    if radius - 4 > 0 && rng.randint0(4) < radius - 4 {
        let (rd, cd) = super::alloc::rand_dir(rng);

        draw_rectangle(c, y0 - 2, x0 - 2, y0 + 2, x0 + 2, Feature::WallInner);
        c.set_feat(y0 + cd * 2, x0 + rd * 2, Feature::SecretDoor);

        vault_objects(c, y0, x0, c.depth, rng.randint0(2), rng);
        vault_monsters(c, y0, x0, c.depth + 1, rng.randint0(3), rng);
    }

    true
}

/// Build a plain rectangular room, with the occasional pillared or
/// ragged-edge variant.
pub(crate) fn build_simple(
    c: &mut Cave,
    _dun: &mut GenState,
    y0: i32,
    x0: i32,
    rng: &mut GameRng,
) -> bool {
    let light = room_light(c.depth, rng);

    let y1 = y0 - rng.randint1(4);
    let x1 = x0 - rng.randint1(11);
    let y2 = y0 + rng.randint1(3);
    let x2 = x0 + rng.randint1(11);

    generate_room(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, light);
    draw_rectangle(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, Feature::WallOuter);
    fill_rectangle(c, y1, x1, y2, x2, Feature::Floor);

    if rng.one_in(20) {
        // Pillar room.
        let mut y = y1;
        while y <= y2 {
            let mut x = x1;
            while x <= x2 {
                c.set_feat(y, x, Feature::WallInner);
                x += 2;
            }
            y += 2;
        }
    } else if rng.one_in(50) {
        // Ragged-edge room.
        let mut y = y1 + 2;
        while y <= y2 - 2 {
            c.set_feat(y, x1, Feature::WallInner);
            c.set_feat(y, x2, Feature::WallInner);
            y += 2;
        }
        let mut x = x1 + 2;
        while x <= x2 - 2 {
            c.set_feat(y1, x, Feature::WallInner);
            c.set_feat(y2, x, Feature::WallInner);
            x += 2;
        }
    }

    true
}

/// Build two overlapping rectangular rooms around the same center.
pub(crate) fn build_overlap(
    c: &mut Cave,
    _dun: &mut GenState,
    y0: i32,
    x0: i32,
    rng: &mut GameRng,
) -> bool {
    let light = room_light(c.depth, rng);

    let y1a = y0 - rng.randint1(4);
    let x1a = x0 - rng.randint1(11);
    let y2a = y0 + rng.randint1(3);
    let x2a = x0 + rng.randint1(10);

    let y1b = y0 - rng.randint1(3);
    let x1b = x0 - rng.randint1(10);
    let y2b = y0 + rng.randint1(4);
    let x2b = x0 + rng.randint1(11);

    generate_room(c, y1a - 1, x1a - 1, y2a + 1, x2a + 1, light);
    generate_room(c, y1b - 1, x1b - 1, y2b + 1, x2b + 1, light);

    draw_rectangle(c, y1a - 1, x1a - 1, y2a + 1, x2a + 1, Feature::WallOuter);
    draw_rectangle(c, y1b - 1, x1b - 1, y2b + 1, x2b + 1, Feature::WallOuter);

    fill_rectangle(c, y1a, x1a, y2a, x2a, Feature::Floor);
    fill_rectangle(c, y1b, x1b, y2b, x2b, Feature::Floor);

    true
}

/// Build a cross-shaped room, with a decorated center.
pub(crate) fn build_crossed(
    c: &mut Cave,
    _dun: &mut GenState,
    y0: i32,
    x0: i32,
    rng: &mut GameRng,
) -> bool {
    let light = room_light(c.depth, rng);

    // Room (a) runs north/south, room (b) east/west; the shared center is
    // 3x3.
    let wy = 1;
    let wx = 1;
    let dy = rng.rand_range(3, 4);
    let dx = rng.rand_range(3, 11);

    let y1a = y0 - dy;
    let x1a = x0 - wx;
    let y2a = y0 + dy;
    let x2a = x0 + wx;

    let y1b = y0 - wy;
    let x1b = x0 - dx;
    let y2b = y0 + wy;
    let x2b = x0 + dx;

    generate_room(c, y1a - 1, x1a - 1, y2a + 1, x2a + 1, light);
    generate_room(c, y1b - 1, x1b - 1, y2b + 1, x2b + 1, light);

    draw_rectangle(c, y1a - 1, x1a - 1, y2a + 1, x2a + 1, Feature::WallOuter);
    draw_rectangle(c, y1b - 1, x1b - 1, y2b + 1, x2b + 1, Feature::WallOuter);

    fill_rectangle(c, y1a, x1a, y2a, x2a, Feature::Floor);
    fill_rectangle(c, y1b, x1b, y2b, x2b, Feature::Floor);

    match rng.randint1(4) {
        1 => {}

        // Large solid middle pillar.
        2 => {
            fill_rectangle(c, y1b, x1a, y2b, x2a, Feature::WallInner);
        }

        // Inner treasure vault.
        3 => {
            draw_rectangle(c, y1b, x1a, y2b, x2a, Feature::WallInner);
            generate_hole(c, y1b, x1a, y2b, x2a, Feature::SecretDoor, rng);

            place_object(c, y0, x0, c.depth, false, false, Origin::Special, rng);
            vault_monsters(c, y0, x0, c.depth + 2, rng.randint0(2) + 3, rng);
            vault_traps(c, y0, x0, 4, 4, rng.randint0(3) + 2, rng);
        }

        // Shape-altering treatments.
        _ => {
            if rng.one_in(3) {
                // Pinch the center shut.
                for y in y1b..=y2b {
                    if y == y0 {
                        continue;
                    }
                    c.set_feat(y, x1a - 1, Feature::WallInner);
                    c.set_feat(y, x2a + 1, Feature::WallInner);
                }
                for x in x1a..=x2a {
                    if x == x0 {
                        continue;
                    }
                    c.set_feat(y1b - 1, x, Feature::WallInner);
                    c.set_feat(y2b + 1, x, Feature::WallInner);
                }
                if rng.one_in(3) {
                    generate_open(c, y1b - 1, x1a - 1, y2b + 1, x2a + 1, Feature::SecretDoor);
                }
            } else if rng.one_in(3) {
                generate_plus(c, y1b, x1a, y2b, x2a, Feature::WallInner);
            } else if rng.one_in(3) {
                c.set_feat(y0, x0, Feature::WallInner);
            }
        }
    }

    true
}

/// Build a large room with one of five inner-room decorations.
pub(crate) fn build_large(
    c: &mut Cave,
    _dun: &mut GenState,
    y0: i32,
    x0: i32,
    rng: &mut GameRng,
) -> bool {
    let light = room_light(c.depth, rng);

    let mut y1 = y0 - 4;
    let mut y2 = y0 + 4;
    let mut x1 = x0 - 11;
    let mut x2 = x0 + 11;

    generate_room(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, light);
    draw_rectangle(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, Feature::WallOuter);
    fill_rectangle(c, y1, x1, y2, x2, Feature::Floor);

    // The inner room.
    y1 += 2;
    y2 -= 2;
    x1 += 2;
    x2 -= 2;
    draw_rectangle(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, Feature::WallInner);

    match rng.randint1(5) {
        // Just an inner room with one monster.
        1 => {
            generate_hole(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, Feature::SecretDoor, rng);
            vault_monsters(c, y0, x0, c.depth + 2, 1, rng);
        }

        // An inner room with a locked treasure chamber.
        2 => {
            generate_hole(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, Feature::SecretDoor, rng);

            draw_rectangle(c, y0 - 1, x0 - 1, y0 + 1, x0 + 1, Feature::WallInner);
            generate_hole(
                c,
                y0 - 1,
                x0 - 1,
                y0 + 1,
                x0 + 1,
                Feature::ClosedDoor(DoorPower::Locked(rng.randint1(7) as u8)),
                rng,
            );

            vault_monsters(c, y0, x0, c.depth + 2, rng.randint1(3) + 2, rng);

            // Object (80%) or stairs (20%).
            if rng.randint0(100) < 80 {
                place_object(c, y0, x0, c.depth, false, false, Origin::Special, rng);
            } else {
                place_random_stairs(c, y0, x0, rng);
            }

            vault_traps(c, y0, x0, 4, 10, 2 + rng.randint1(3), rng);
        }

        // An inner room with pillars.
        3 => {
            generate_hole(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, Feature::SecretDoor, rng);

            fill_rectangle(c, y0 - 1, x0 - 1, y0 + 1, x0 + 1, Feature::WallInner);

            if rng.one_in(2) {
                if rng.one_in(2) {
                    fill_rectangle(c, y0 - 1, x0 - 7, y0 + 1, x0 - 5, Feature::WallInner);
                    fill_rectangle(c, y0 - 1, x0 + 5, y0 + 1, x0 + 7, Feature::WallInner);
                } else {
                    fill_rectangle(c, y0 - 1, x0 - 6, y0 + 1, x0 - 4, Feature::WallInner);
                    fill_rectangle(c, y0 - 1, x0 + 4, y0 + 1, x0 + 6, Feature::WallInner);
                }
            }

            if rng.one_in(3) {
                // A treasure corridor between the pillars.
                draw_rectangle(c, y0 - 1, x0 - 5, y0 + 1, x0 + 5, Feature::WallInner);
                place_secret_door(c, y0 - 3 + rng.randint1(2) * 2, x0 - 3);
                place_secret_door(c, y0 - 3 + rng.randint1(2) * 2, x0 + 3);

                vault_monsters(c, y0, x0 - 2, c.depth + 2, rng.randint1(2), rng);
                vault_monsters(c, y0, x0 + 2, c.depth + 2, rng.randint1(2), rng);

                if rng.one_in(3) {
                    place_object(c, y0, x0 - 2, c.depth, false, false, Origin::Special, rng);
                }
                if rng.one_in(3) {
                    place_object(c, y0, x0 + 2, c.depth, false, false, Origin::Special, rng);
                }
            }
        }

        // An inner room with a checkerboard.
        4 => {
            generate_hole(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, Feature::SecretDoor, rng);

            for y in y1..=y2 {
                for x in x1..=x2 {
                    if (x + y) & 1 != 0 {
                        c.set_feat(y, x, Feature::WallInner);
                    }
                }
            }

            vault_monsters(c, y0, x0 - 5, c.depth + 2, rng.randint1(3), rng);
            vault_monsters(c, y0, x0 + 5, c.depth + 2, rng.randint1(3), rng);
            vault_traps(c, y0, x0 - 3, 2, 8, rng.randint1(3), rng);
            vault_traps(c, y0, x0 + 3, 2, 8, rng.randint1(3), rng);
            vault_objects(c, y0, x0, c.depth, 3, rng);
        }

        // Four compartments.
        _ => {
            generate_plus(c, y1, x1, y2, x2, Feature::WallInner);

            if rng.randint0(100) < 50 {
                let i = rng.randint1(10);
                place_secret_door(c, y1 - 1, x0 - i);
                place_secret_door(c, y1 - 1, x0 + i);
                place_secret_door(c, y2 + 1, x0 - i);
                place_secret_door(c, y2 + 1, x0 + i);
            } else {
                let i = rng.randint1(3);
                place_secret_door(c, y0 + i, x1 - 1);
                place_secret_door(c, y0 - i, x1 - 1);
                place_secret_door(c, y0 + i, x2 + 1);
                place_secret_door(c, y0 - i, x2 + 1);
            }

            vault_objects(c, y0, x0, c.depth, 2 + rng.randint1(2), rng);

            vault_monsters(c, y0 + 1, x0 - 4, c.depth + 2, rng.randint1(4), rng);
            vault_monsters(c, y0 + 1, x0 + 4, c.depth + 2, rng.randint1(4), rng);
            vault_monsters(c, y0 - 1, x0 - 4, c.depth + 2, rng.randint1(4), rng);
            vault_monsters(c, y0 - 1, x0 + 4, c.depth + 2, rng.randint1(4), rng);
        }
    }

    true
}

/// Sample `n` races for a themed chamber, hardest selection 10 levels out
/// of depth. Fails when the filter leaves nothing to pick.
fn sample_pit_races(
    c: &Cave,
    kind: PitKind,
    n: usize,
    rng: &mut GameRng,
) -> Option<(&'static crate::data::pits::PitProfile, Vec<usize>)> {
    let pit = choose_pit_type(c.depth, kind, rng)?;
    let filter = |race: &crate::monster::MonsterRace| pit.allows(race);

    let mut what = Vec::with_capacity(n);
    for _ in 0..n {
        what.push(get_mon_num(c.depth + 10, rng, Some(&filter))?);
    }
    Some((pit, what))
}

/// Shared geometry for nests and pits: a large room with an inner chamber
/// behind a secret door.
fn generate_pit_room(c: &mut Cave, y0: i32, x0: i32, rng: &mut GameRng) {
    let y1 = y0 - 4;
    let y2 = y0 + 4;
    let x1 = x0 - 11;
    let x2 = x0 + 11;

    generate_room(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, false);
    draw_rectangle(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, Feature::WallOuter);
    fill_rectangle(c, y1, x1, y2, x2, Feature::Floor);

    let y1 = y1 + 2;
    let y2 = y2 - 2;
    let x1 = x1 + 2;
    let x2 = x2 - 2;

    draw_rectangle(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, Feature::WallInner);
    generate_hole(c, y1 - 1, x1 - 1, y2 + 1, x2 + 1, Feature::SecretDoor, rng);
}

/// Build a monster nest: an inner chamber filled with random picks from a
/// themed set of races.
pub(crate) fn build_nest(
    c: &mut Cave,
    _dun: &mut GenState,
    y0: i32,
    x0: i32,
    rng: &mut GameRng,
) -> bool {
    // Sample before drawing so failure leaves the grid untouched.
    let Some((pit, what)) = sample_pit_races(c, PitKind::Nest, 64, rng) else {
        return false;
    };

    generate_pit_room(c, y0, x0, rng);

    debug!("Monster nest ({})", pit.name);

    c.mon_rating += (5 + pit.ave / 10) as u32;

    let alloc_obj = pit.obj_rarity;
    for y in y0 - 2..=y0 + 2 {
        for x in x0 - 9..=x0 + 9 {
            let race = what[rng.randint0(64) as usize];
            place_new_monster(c, y, x, race, false, false, Origin::DropPit, rng);

            // Occasionally place an item, making it good 1/3 of the time.
            if rng.randint0(100) < alloc_obj {
                let good = rng.one_in(3);
                place_object(c, y, x, c.depth + 10, good, false, Origin::Pit, rng);
            }
        }
    }

    true
}

/// Build a monster pit: sixteen sampled races sorted by level, thinned to
/// eight tiers and placed in the canonical concentric layout.
pub(crate) fn build_pit(
    c: &mut Cave,
    _dun: &mut GenState,
    y0: i32,
    x0: i32,
    rng: &mut GameRng,
) -> bool {
    let Some((pit, mut what)) = sample_pit_races(c, PitKind::Pit, 16, rng) else {
        return false;
    };

    generate_pit_room(c, y0, x0, rng);

    debug!("Monster pit ({})", pit.name);

    what.sort_by_key(|&r| RACES[r].level);
    for i in 0..8 {
        what[i] = what[i * 2];
    }

    c.mon_rating += (5 + pit.ave / 10) as u32;

    // Top and bottom rows.
    for x in x0 - 9..=x0 + 9 {
        place_new_monster(c, y0 - 2, x, what[0], false, false, Origin::DropPit, rng);
        place_new_monster(c, y0 + 2, x, what[0], false, false, Origin::DropPit, rng);
    }

    // Middle columns.
    for y in y0 - 1..=y0 + 1 {
        place_new_monster(c, y, x0 - 9, what[0], false, false, Origin::DropPit, rng);
        place_new_monster(c, y, x0 + 9, what[0], false, false, Origin::DropPit, rng);

        place_new_monster(c, y, x0 - 8, what[1], false, false, Origin::DropPit, rng);
        place_new_monster(c, y, x0 + 8, what[1], false, false, Origin::DropPit, rng);

        place_new_monster(c, y, x0 - 7, what[1], false, false, Origin::DropPit, rng);
        place_new_monster(c, y, x0 + 7, what[1], false, false, Origin::DropPit, rng);

        place_new_monster(c, y, x0 - 6, what[2], false, false, Origin::DropPit, rng);
        place_new_monster(c, y, x0 + 6, what[2], false, false, Origin::DropPit, rng);

        place_new_monster(c, y, x0 - 5, what[2], false, false, Origin::DropPit, rng);
        place_new_monster(c, y, x0 + 5, what[2], false, false, Origin::DropPit, rng);

        place_new_monster(c, y, x0 - 4, what[3], false, false, Origin::DropPit, rng);
        place_new_monster(c, y, x0 + 4, what[3], false, false, Origin::DropPit, rng);

        place_new_monster(c, y, x0 - 3, what[3], false, false, Origin::DropPit, rng);
        place_new_monster(c, y, x0 + 3, what[3], false, false, Origin::DropPit, rng);

        place_new_monster(c, y, x0 - 2, what[4], false, false, Origin::DropPit, rng);
        place_new_monster(c, y, x0 + 2, what[4], false, false, Origin::DropPit, rng);
    }

    // Above and below the center.
    for x in x0 - 1..=x0 + 1 {
        place_new_monster(c, y0 + 1, x, what[5], false, false, Origin::DropPit, rng);
        place_new_monster(c, y0 - 1, x, what[5], false, false, Origin::DropPit, rng);
    }

    // Flanking the center monster.
    place_new_monster(c, y0, x0 + 1, what[6], false, false, Origin::DropPit, rng);
    place_new_monster(c, y0, x0 - 1, what[6], false, false, Origin::DropPit, rng);

    // The center monster.
    place_new_monster(c, y0, x0, what[7], false, false, Origin::DropPit, rng);

    // Some objects.
    let alloc_obj = pit.obj_rarity;
    for y in y0 - 2..=y0 + 2 {
        for x in x0 - 9..=x0 + 9 {
            if rng.randint0(100) < alloc_obj {
                let good = rng.one_in(3);
                place_object(c, y, x, c.depth + 10, good, false, Origin::Pit, rng);
            }
        }
    }

    true
}

/// Stamp a vault template centered at (y0, x0).
pub(crate) fn build_vault(c: &mut Cave, y0: i32, x0: i32, vault: &Vault, rng: &mut GameRng) {
    let top = y0 - vault.height / 2;
    let left = x0 - vault.width / 2;

    // First pass: features.
    for (dy, row) in vault.text.iter().enumerate() {
        for (dx, ch) in row.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let y = top + dy as i32;
            let x = left + dx as i32;
            debug_assert!(c.in_bounds(y, x), "vault overruns the grid at ({y},{x})");

            c.set_feat(y, x, Feature::Floor);

            let mut icky = true;
            match ch {
                '%' => {
                    // Doorstep: part of the outer wall, so tunnels may
                    // remove it. Not marked icky.
                    c.set_feat(y, x, Feature::WallOuter);
                    icky = false;
                }
                '#' => c.set_feat(y, x, Feature::WallInner),
                'X' => c.set_feat(y, x, Feature::PermInner),
                '+' => place_secret_door(c, y, x),
                '^' => place_trap(c, y, x, rng),
                '*' => {
                    // Treasure or a trap.
                    if rng.randint0(100) < 75 {
                        place_object(c, y, x, c.depth, false, false, Origin::Vault, rng);
                    } else {
                        place_trap(c, y, x, rng);
                    }
                }
                _ => {}
            }

            c.add_flags(y, x, CellFlags::ROOM);
            if icky {
                c.add_flags(y, x, CellFlags::ICKY);
            }
        }
    }

    // Second pass: monsters and the objects tied to them.
    for (dy, row) in vault.text.iter().enumerate() {
        for (dx, ch) in row.chars().enumerate() {
            let y = top + dy as i32;
            let x = left + dx as i32;
            match ch {
                '&' => {
                    pick_and_place_monster(c, y, x, c.depth + 5, true, true, Origin::DropVault, rng);
                }
                '@' => {
                    pick_and_place_monster(c, y, x, c.depth + 11, true, true, Origin::DropVault, rng);
                }
                '9' => {
                    // Meaner monster, plus treasure.
                    pick_and_place_monster(c, y, x, c.depth + 9, true, true, Origin::DropVault, rng);
                    place_object(c, y, x, c.depth + 7, true, false, Origin::Vault, rng);
                }
                '8' => {
                    // Nasty monster and treasure.
                    pick_and_place_monster(c, y, x, c.depth + 40, true, true, Origin::DropVault, rng);
                    place_object(c, y, x, c.depth + 20, true, true, Origin::Vault, rng);
                }
                ',' => {
                    // Monster and/or object.
                    if rng.randint0(100) < 50 {
                        pick_and_place_monster(
                            c,
                            y,
                            x,
                            c.depth + 3,
                            true,
                            true,
                            Origin::DropVault,
                            rng,
                        );
                    }
                    if rng.randint0(100) < 50 {
                        place_object(c, y, x, c.depth + 7, false, false, Origin::Vault, rng);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Pick a vault of the given kind and stamp it.
fn build_vault_type(
    c: &mut Cave,
    y0: i32,
    x0: i32,
    kind: VaultKind,
    label: &str,
    rng: &mut GameRng,
) -> bool {
    let Some(vault) = random_vault(kind, rng) else {
        return false;
    };

    debug!("{label} ({})", vault.name);

    c.mon_rating += vault.rating;
    build_vault(c, y0, x0, vault, rng);

    true
}

pub(crate) fn build_lesser_vault(
    c: &mut Cave,
    _dun: &mut GenState,
    y0: i32,
    x0: i32,
    rng: &mut GameRng,
) -> bool {
    build_vault_type(c, y0, x0, VaultKind::Lesser, "Lesser vault", rng)
}

pub(crate) fn build_medium_vault(
    c: &mut Cave,
    _dun: &mut GenState,
    y0: i32,
    x0: i32,
    rng: &mut GameRng,
) -> bool {
    build_vault_type(c, y0, x0, VaultKind::Medium, "Medium vault", rng)
}

/// Build a greater vault.
///
/// Only attempted as the first room, and gated by depth: 2/3 at depth 90
/// and below it the odds shrink by 2/3 per ten levels.
pub(crate) fn build_greater_vault(
    c: &mut Cave,
    dun: &mut GenState,
    y0: i32,
    x0: i32,
    rng: &mut GameRng,
) -> bool {
    if !dun.cent.is_empty() {
        return false;
    }

    let mut numerator = 2;
    let mut denominator = 3;
    let mut i = 90;
    while i > c.depth {
        numerator *= 2;
        denominator *= 3;
        i -= 10;
    }

    if rng.randint0(denominator) >= numerator {
        return false;
    }

    build_vault_type(c, y0, x0, VaultKind::Greater, "Greater vault", rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::generation::{GenState, CAVE_PROFILES};
    use crate::dungeon::grid::draw_rectangle as draw_rect;

    fn rock_cave(depth: i32) -> Cave {
        let mut c = Cave::new();
        c.depth = depth;
        let h = c.height;
        let w = c.width;
        fill_rectangle(&mut c, 0, 0, h - 1, w - 1, Feature::WallExtra);
        draw_rect(&mut c, 0, 0, h - 1, w - 1, Feature::PermSolid);
        c
    }

    fn state() -> GenState {
        GenState::new(&CAVE_PROFILES[CAVE_PROFILES.len() - 1])
    }

    #[test]
    fn test_simple_room_has_floor_and_walls() {
        let mut c = rock_cave(5);
        let mut dun = state();
        let mut rng = GameRng::new(42);

        assert!(build_simple(&mut c, &mut dun, 16, 22, &mut rng));
        assert!(c.is_room(16, 22));

        // Somewhere in the room there is floor ringed by outer wall.
        let mut outer = 0;
        for y in 0..c.height {
            for x in 0..c.width {
                if c.feat(y, x) == Feature::WallOuter {
                    outer += 1;
                }
            }
        }
        assert!(outer > 0, "no outer walls drawn");
    }

    #[test]
    fn test_nest_fills_chamber_and_sets_rating() {
        let mut c = rock_cave(10);
        let mut dun = state();
        let mut rng = GameRng::new(42);

        assert!(build_nest(&mut c, &mut dun, 16, 22, &mut rng));
        assert!(!c.monsters.is_empty(), "nest placed no monsters");
        assert!(c.mon_rating >= 5, "rating {}", c.mon_rating);
    }

    #[test]
    fn test_pit_layout_is_tiered() {
        let mut c = rock_cave(25);
        let mut dun = state();
        let mut rng = GameRng::new(42);

        assert!(build_pit(&mut c, &mut dun, 16, 22, &mut rng));

        // The center monster is the hardest tier; the outer ring the
        // weakest.
        let center = c.monster_at(16, 22).expect("center monster");
        let ring = c.monster_at(14, 22).expect("ring monster");
        assert!(
            center.race().level >= ring.race().level,
            "center {} < ring {}",
            center.race().level,
            ring.race().level
        );
        // Mirror cells share a race.
        let left = c.monster_at(16, 21).expect("left flank");
        let right = c.monster_at(16, 23).expect("right flank");
        assert_eq!(left.race, right.race);
    }

    #[test]
    fn test_vault_stamp_marks_icky() {
        let mut c = rock_cave(20);
        let mut rng = GameRng::new(42);
        let vault = random_vault(VaultKind::Lesser, &mut rng).expect("lesser vaults");

        build_vault(&mut c, 33, 99, vault, &mut rng);

        let top = 33 - vault.height / 2;
        let left = 99 - vault.width / 2;
        for (dy, row) in vault.text.iter().enumerate() {
            for (dx, ch) in row.chars().enumerate() {
                let y = top + dy as i32;
                let x = left + dx as i32;
                match ch {
                    ' ' => assert!(!c.is_vault(y, x)),
                    '%' => {
                        assert!(!c.is_vault(y, x), "doorstep marked icky at ({y},{x})");
                        assert_eq!(c.feat(y, x), Feature::WallOuter);
                    }
                    _ => assert!(c.is_vault(y, x), "vault grid not icky at ({y},{x})"),
                }
            }
        }
    }

    #[test]
    fn test_greater_vault_only_first_room() {
        let mut c = rock_cave(100);
        let mut dun = state();
        dun.cent.push(crate::dungeon::Loc::new(10, 10));
        let mut rng = GameRng::new(42);

        for _ in 0..50 {
            assert!(!build_greater_vault(&mut c, &mut dun, 33, 99, &mut rng));
        }
    }

    #[test]
    fn test_greater_vault_chance_at_bottom() {
        // Depth 100: the depth gate passes with probability 2/3.
        let mut successes = 0;
        let trials = 3000;
        let mut rng = GameRng::new(42);
        for _ in 0..trials {
            let mut c = rock_cave(100);
            let mut dun = state();
            if build_greater_vault(&mut c, &mut dun, 33, 99, &mut rng) {
                successes += 1;
            }
        }
        let ratio = successes as f64 / trials as f64;
        assert!((0.61..=0.72).contains(&ratio), "greater vault ratio {ratio}");
    }

    #[test]
    fn test_failed_builder_leaves_grid_untouched() {
        // An impossible nest (no races pass an impossible depth) must not
        // scar the grid. Shallow depth means nest selection can still pick
        // a profile but the sample uses depth+10; use a cave at depth 0
        // where no dungeon race qualifies.
        let mut c = rock_cave(0);
        c.depth = -20;
        let mut dun = state();
        let mut rng = GameRng::new(42);

        let before = c.render();
        assert!(!build_nest(&mut c, &mut dun, 16, 22, &mut rng));
        assert_eq!(before, c.render(), "failed nest modified the grid");
    }
}
