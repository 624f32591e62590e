//! The generation director: profile tables, the retry loop, and the default
//! rooms-and-corridors builder.
//!
//! The director selects a cave profile for the requested depth, hands a
//! fresh scratch state to the profile's builder, and retries from a clean
//! grid whenever a builder gives up. Rooms in the default builder come from
//! an ordered profile table walked with a rarity roll and a cutoff key, so
//! exotic rooms grow more likely with depth without ever locking out the
//! plain ones.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::alloc::{alloc_objects, alloc_stairs, find_empty, new_player_spot, AllocKind, AllocSet};
use super::cell::{CellFlags2, Feature};
use super::grid::{draw_rectangle, fill_rectangle};
use super::region::ensure_connectedness;
use super::room;
use super::tunnel::{build_tunnel, try_door};
use super::{cavern, labyrinth, town};
use super::{Cave, Loc};
use crate::data::races::RACES;
use crate::monster::{pick_and_place_distant_monster, place_new_monster, RaceFlags};
use crate::object::Origin;
use crate::player::{Player, World};
use crate::{
    is_quest, BLOCK_HGT, BLOCK_WID, CENT_MAX, DUNGEON_HGT, DUNGEON_WID, FEELING_TOTAL,
    MAX_GENERATION_TRIES, MAX_LEVEL_MONSTERS, MAX_LEVEL_OBJECTS, MAX_ROOMS_COL, MAX_ROOMS_ROW,
    MIN_M_ALLOC_LEVEL,
};
use ab_rng::GameRng;

/// Objects for rooms.
const DUN_AMT_ROOM: i32 = 7;
/// Objects for rooms and corridors.
const DUN_AMT_ITEM: i32 = 2;
/// Gold for rooms and corridors.
const DUN_AMT_GOLD: i32 = 3;

/// Generation failed outright.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Every attempt failed; the configuration is broken. Callers treat
    /// this as fatal.
    #[error("level generation failed {tries} times (last failure: {last})")]
    RetriesExhausted { tries: u32, last: &'static str },
}

/// Tunnel shape knobs, in percent.
#[derive(Debug, Clone, Copy)]
pub struct TunnelProfile {
    pub name: &'static str,
    /// Chance of picking a random direction on a bend.
    pub rnd: i32,
    /// Chance of re-evaluating the direction each step.
    pub chg: i32,
    /// Chance of continuing past the early-termination point.
    pub con: i32,
    /// Chance of a door where a corridor pierces a room wall.
    pub pen: i32,
    /// Chance of a door at a corridor junction.
    pub jct: i32,
}

/// Mineral streamer knobs.
#[derive(Debug, Clone, Copy)]
pub struct StreamerProfile {
    pub name: &'static str,
    /// Grids placed per streamer step.
    pub den: i32,
    /// Scatter width around the streamer's spine.
    pub rng: i32,
    /// Number of magma streamers.
    pub mag: i32,
    /// Inverse chance of treasure per magma grid.
    pub mc: i32,
    /// Number of quartz streamers.
    pub qua: i32,
    /// Inverse chance of treasure per quartz grid.
    pub qc: i32,
}

/// The room kinds the default builder can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomKind {
    Simple,
    Overlap,
    Crossed,
    Circular,
    Large,
    Nest,
    Pit,
    LesserVault,
    MediumVault,
    GreaterVault,
}

impl RoomKind {
    fn build(self, c: &mut Cave, dun: &mut GenState, y0: i32, x0: i32, rng: &mut GameRng) -> bool {
        match self {
            RoomKind::Simple => room::build_simple(c, dun, y0, x0, rng),
            RoomKind::Overlap => room::build_overlap(c, dun, y0, x0, rng),
            RoomKind::Crossed => room::build_crossed(c, dun, y0, x0, rng),
            RoomKind::Circular => room::build_circular(c, dun, y0, x0, rng),
            RoomKind::Large => room::build_large(c, dun, y0, x0, rng),
            RoomKind::Nest => room::build_nest(c, dun, y0, x0, rng),
            RoomKind::Pit => room::build_pit(c, dun, y0, x0, rng),
            RoomKind::LesserVault => room::build_lesser_vault(c, dun, y0, x0, rng),
            RoomKind::MediumVault => room::build_medium_vault(c, dun, y0, x0, rng),
            RoomKind::GreaterVault => room::build_greater_vault(c, dun, y0, x0, rng),
        }
    }
}

/// One entry in a room profile table.
#[derive(Debug, Clone, Copy)]
pub struct RoomProfile {
    pub name: &'static str,
    pub kind: RoomKind,
    /// Block footprint.
    pub height: i32,
    pub width: i32,
    /// Minimum dungeon level.
    pub level: i32,
    /// Pits and nests are crowded; at most one per level.
    pub crowded: bool,
    /// Rarity tier: 0 common, higher rarer.
    pub rarity: i32,
    /// Upper bound for the 1-100 key roll.
    pub cutoff: i32,
}

/// The level kinds the director can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaveKind {
    Town,
    Labyrinth,
    Cavern,
    Default,
}

/// One entry in the cave profile table.
#[derive(Debug, Clone, Copy)]
pub struct CaveProfile {
    pub name: &'static str,
    pub kind: CaveKind,
    /// Number of rooms to attempt.
    pub dun_rooms: i32,
    /// Level/chance of unusual rooms.
    pub dun_unusual: i32,
    /// Max room rarity tier used.
    pub max_rarity: i32,
    pub tun: TunnelProfile,
    pub streamer: StreamerProfile,
    pub room_profiles: &'static [RoomProfile],
    /// Selection cutoff; the last profile ignores it.
    pub cutoff: i32,
}

const TUNNEL_DEFAULT: TunnelProfile = TunnelProfile {
    name: "tunnel-default",
    rnd: 10,
    chg: 30,
    con: 15,
    pen: 25,
    jct: 90,
};

const STREAMER_DEFAULT: StreamerProfile = StreamerProfile {
    name: "streamer-default",
    den: 5,
    rng: 2,
    mag: 3,
    mc: 90,
    qua: 2,
    qc: 40,
};

/// Room profiles for the default builder, walked in order.
///
/// Greater vaults only have rarity 1, but they run their own depth check.
/// The cutoffs give rare rolls a chance to fall through to common rooms.
pub static DEFAULT_ROOMS: [RoomProfile; 10] = [
    RoomProfile { name: "greater vault", kind: RoomKind::GreaterVault, height: 4, width: 6, level: 10, crowded: false, rarity: 1, cutoff: 100 },
    RoomProfile { name: "medium vault", kind: RoomKind::MediumVault, height: 2, width: 3, level: 5, crowded: false, rarity: 2, cutoff: 10 },
    RoomProfile { name: "lesser vault", kind: RoomKind::LesserVault, height: 2, width: 3, level: 5, crowded: false, rarity: 2, cutoff: 25 },
    RoomProfile { name: "monster pit", kind: RoomKind::Pit, height: 1, width: 3, level: 5, crowded: true, rarity: 2, cutoff: 40 },
    RoomProfile { name: "monster nest", kind: RoomKind::Nest, height: 1, width: 3, level: 5, crowded: true, rarity: 2, cutoff: 50 },
    RoomProfile { name: "large room", kind: RoomKind::Large, height: 1, width: 3, level: 3, crowded: false, rarity: 1, cutoff: 25 },
    RoomProfile { name: "crossed room", kind: RoomKind::Crossed, height: 1, width: 3, level: 3, crowded: false, rarity: 1, cutoff: 50 },
    RoomProfile { name: "circular room", kind: RoomKind::Circular, height: 2, width: 2, level: 1, crowded: false, rarity: 1, cutoff: 60 },
    RoomProfile { name: "overlap room", kind: RoomKind::Overlap, height: 1, width: 3, level: 1, crowded: false, rarity: 1, cutoff: 100 },
    RoomProfile { name: "simple room", kind: RoomKind::Simple, height: 1, width: 3, level: 1, crowded: false, rarity: 0, cutoff: 100 },
];

/// Cave profiles, scanned in order; the last is the unconditional fallback.
pub static CAVE_PROFILES: [CaveProfile; 3] = [
    CaveProfile {
        name: "labyrinth",
        kind: CaveKind::Labyrinth,
        dun_rooms: 0,
        dun_unusual: 200,
        max_rarity: 0,
        tun: TUNNEL_DEFAULT,
        streamer: STREAMER_DEFAULT,
        room_profiles: &[],
        // Always scanned; the builder runs its own depth and chance checks.
        cutoff: 100,
    },
    CaveProfile {
        name: "cavern",
        kind: CaveKind::Cavern,
        dun_rooms: 0,
        dun_unusual: 200,
        max_rarity: 0,
        tun: TUNNEL_DEFAULT,
        streamer: STREAMER_DEFAULT,
        room_profiles: &[],
        cutoff: 10,
    },
    CaveProfile {
        name: "default",
        kind: CaveKind::Default,
        dun_rooms: 50,
        dun_unusual: 200,
        max_rarity: 2,
        tun: TUNNEL_DEFAULT,
        streamer: STREAMER_DEFAULT,
        room_profiles: &DEFAULT_ROOMS,
        cutoff: 100,
    },
];

/// Profile used for the town level.
pub static TOWN_PROFILE: CaveProfile = CaveProfile {
    name: "town-default",
    kind: CaveKind::Town,
    dun_rooms: 50,
    dun_unusual: 200,
    max_rarity: 2,
    tun: TUNNEL_DEFAULT,
    streamer: STREAMER_DEFAULT,
    room_profiles: &[],
    cutoff: 0,
};

/// Scratch state for one generation attempt. Lives exactly as long as the
/// attempt; only the director and the builder it invoked touch it.
pub(crate) struct GenState {
    pub profile: &'static CaveProfile,

    /// Centers of built rooms.
    pub cent: Vec<Loc>,

    /// Candidate door locations found while tunnelling.
    pub door: Vec<Loc>,

    /// Wall piercings of the tunnel under construction.
    pub wall: Vec<Loc>,

    /// Plain grids of the tunnel under construction.
    pub tunn: Vec<Loc>,

    /// Block grid dimensions for this level.
    pub row_rooms: i32,
    pub col_rooms: i32,

    /// Which blocks are spoken for.
    pub room_map: [[bool; MAX_ROOMS_COL]; MAX_ROOMS_ROW],

    /// A pit or nest has been built on this level.
    pub crowded: bool,
}

impl GenState {
    pub(crate) fn new(profile: &'static CaveProfile) -> Self {
        Self {
            profile,
            cent: Vec::with_capacity(CENT_MAX),
            door: Vec::new(),
            wall: Vec::new(),
            tunn: Vec::new(),
            row_rooms: 0,
            col_rooms: 0,
            room_map: [[false; MAX_ROOMS_COL]; MAX_ROOMS_ROW],
            crowded: false,
        }
    }
}

/// Attempt to build a room of the given profile anchored at block
/// (by0, bx0).
fn room_build(
    c: &mut Cave,
    dun: &mut GenState,
    by0: i32,
    bx0: i32,
    profile: &RoomProfile,
    rng: &mut GameRng,
) -> bool {
    let by1 = by0;
    let bx1 = bx0;
    let by2 = by0 + profile.height;
    let bx2 = bx0 + profile.width;

    // Enforce the room profile's minimum depth.
    if c.depth < profile.level {
        return false;
    }

    // Only one crowded room per level.
    if dun.crowded && profile.crowded {
        return false;
    }

    // Never run off the block grid.
    if by1 < 0 || by2 >= dun.row_rooms || bx1 < 0 || bx2 >= dun.col_rooms {
        return false;
    }

    // Verify open space, including a one-block margin.
    for by in by1..=by2 {
        for bx in bx1..=bx2 {
            if dun.room_map[by as usize][bx as usize] {
                return false;
            }
        }
    }

    // The room's anchor point.
    let y = (by1 + by2 + 1) * BLOCK_HGT / 2;
    let x = (bx1 + bx2 + 1) * BLOCK_WID / 2;

    if !profile.kind.build(c, dun, y, x, rng) {
        return false;
    }

    if dun.cent.len() < CENT_MAX {
        dun.cent.push(Loc::new(y, x));
    }

    // Reserve the footprint.
    for by in by1..by2 {
        for bx in bx1..bx2 {
            dun.room_map[by as usize][bx as usize] = true;
        }
    }

    if profile.crowded {
        dun.crowded = true;
    }

    true
}

/// Place a streamer of the given mineral through the dungeon.
fn build_streamer(c: &mut Cave, magma: bool, chance: i32, dun: &GenState, rng: &mut GameRng) {
    use super::{DDX, DDY};

    let mut y = rng.rand_spread(c.height / 2, 10);
    let mut x = rng.rand_spread(c.width / 2, 15);
    let dir = rng.randint0(8) as usize;

    loop {
        for _ in 0..dun.profile.streamer.den {
            let d = dun.profile.streamer.rng;
            let Some((ty, tx)) = super::alloc::find_nearby_grid(c, y, d, x, d, rng) else {
                continue;
            };

            // Only convert rock; rooms and permanent walls are left alone.
            if !c.is_rock(ty, tx) {
                continue;
            }

            let gold = rng.one_in(chance);
            let feat = if magma {
                Feature::Magma { gold }
            } else {
                Feature::Quartz { gold }
            };
            c.set_feat(ty, tx, feat);
        }

        y += DDY[dir];
        x += DDX[dir];

        if !c.in_bounds(y, x) {
            break;
        }
    }
}

/// The default rooms-and-corridors builder.
fn default_gen(
    c: &mut Cave,
    p: &mut Player,
    dun: &mut GenState,
    world: &World,
    rng: &mut GameRng,
) -> bool {
    // Possibly generate fewer rooms in a smaller area via a scaling
    // factor; the block grid scales along with it, so room density stays
    // put.
    let roll = rng.randint1(10) + c.depth / 24;
    let size_percent = if is_quest(c.depth) {
        100
    } else if roll < 2 {
        75
    } else if roll < 3 {
        80
    } else if roll < 4 {
        85
    } else if roll < 5 {
        90
    } else if roll < 6 {
        95
    } else {
        100
    };
    let num_rooms = dun.profile.dun_rooms * size_percent / 100;

    c.set_dimensions(DUNGEON_HGT as i32, DUNGEON_WID as i32);
    fill_rectangle(c, 0, 0, c.height - 1, c.width - 1, Feature::WallExtra);

    dun.row_rooms = c.height / BLOCK_HGT;
    dun.col_rooms = c.width / BLOCK_WID;

    let mut blocks_tried = [[false; MAX_ROOMS_COL]; MAX_ROOMS_ROW];
    dun.crowded = false;
    dun.cent.clear();

    let mut built = 0;
    while built < num_rooms {
        // Pick one untried block, uniformly, in a single sweep.
        let mut remaining = 0;
        let mut tby = 0usize;
        let mut tbx = 0usize;
        for by in 0..dun.row_rooms as usize {
            for bx in 0..dun.col_rooms as usize {
                if blocks_tried[by][bx] {
                    continue;
                }
                remaining += 1;
                if rng.one_in(remaining) {
                    tby = by;
                    tbx = bx;
                }
            }
        }
        if remaining == 0 {
            break;
        }

        assert!(!blocks_tried[tby][tbx], "generation: inconsistent blocks");
        blocks_tried[tby][tbx] = true;

        // Roll the key the profile cutoffs are compared against.
        let key = rng.randint0(100);

        // Roll a rarity tier: depth/dun_unusual chance of being > 0, the
        // square of that of being > 1, and so on up to max_rarity.
        let mut i = 0;
        let mut rarity = 0;
        while i == rarity && i < dun.profile.max_rarity {
            if rng.randint0(dun.profile.dun_unusual) < c.depth {
                rarity += 1;
            }
            i += 1;
        }

        // First matching profile that actually builds wins the block.
        let profiles = dun.profile.room_profiles;
        for profile in profiles {
            if profile.rarity > rarity {
                continue;
            }
            if profile.cutoff <= key {
                continue;
            }
            if room_build(c, dun, tby as i32, tbx as i32, profile, rng) {
                built += 1;
                break;
            }
        }
    }

    draw_rectangle(c, 0, 0, c.height - 1, c.width - 1, Feature::PermSolid);

    if dun.cent.is_empty() {
        return false;
    }

    // Shuffle the room order (Fisher-Yates), then connect each room to the
    // previous one, starting from the last so the chain closes.
    rng.shuffle(&mut dun.cent);
    dun.door.clear();

    let cents: Vec<Loc> = dun.cent.clone();
    let mut prev = cents[cents.len() - 1];
    for next in &cents {
        build_tunnel(c, dun, next.y, next.x, prev.y, prev.x, rng);
        prev = *next;
    }

    // Try doors around every junction candidate.
    let doors: Vec<Loc> = dun.door.clone();
    for d in doors {
        try_door(c, dun, d.y, d.x - 1, rng);
        try_door(c, dun, d.y, d.x + 1, rng);
        try_door(c, dun, d.y - 1, d.x, rng);
        try_door(c, dun, d.y + 1, d.x, rng);
    }

    if !ensure_connectedness(c, rng) {
        return false;
    }

    for _ in 0..dun.profile.streamer.mag {
        build_streamer(c, true, dun.profile.streamer.mc, dun, rng);
    }
    for _ in 0..dun.profile.streamer.qua {
        build_streamer(c, false, dun.profile.streamer.qc, dun, rng);
    }

    alloc_stairs(c, Feature::MoreStair, rng.rand_range(3, 4), 3, rng);
    alloc_stairs(c, Feature::LessStair, rng.rand_range(1, 2), 3, rng);

    // General amount of rubble, traps and monsters.
    let k = (c.depth / 3).clamp(2, 10);

    alloc_objects(c, AllocSet::Corridor, AllocKind::Rubble, rng.randint1(k), c.depth, Origin::Floor, rng);
    alloc_objects(c, AllocSet::Both, AllocKind::Trap, rng.randint1(k), c.depth, Origin::Floor, rng);

    if !new_player_spot(c, p, world, rng) {
        return false;
    }

    for _ in 0..MIN_M_ALLOC_LEVEL + rng.randint1(8) + k {
        pick_and_place_distant_monster(c, p.py, p.px, 0, true, c.depth, rng);
    }

    let num = rng.rand_normal(DUN_AMT_ROOM, 3);
    alloc_objects(c, AllocSet::Room, AllocKind::Object, num, c.depth, Origin::Floor, rng);
    let num = rng.rand_normal(DUN_AMT_ITEM, 3);
    alloc_objects(c, AllocSet::Both, AllocKind::Object, num, c.depth, Origin::Floor, rng);
    let num = rng.rand_normal(DUN_AMT_GOLD, 3);
    alloc_objects(c, AllocSet::Both, AllocKind::Gold, num, c.depth, Origin::Floor, rng);

    true
}

/// Scatter the hidden squares that feed the level feeling.
fn place_feeling(c: &mut Cave, rng: &mut GameRng) {
    for _ in 0..FEELING_TOTAL {
        for _ in 0..500 {
            let y = rng.randint0(c.height);
            let x = rng.randint0(c.width);

            if c.is_wall(y, x) {
                continue;
            }
            if c.has_flag2(y, x, CellFlags2::FEEL) {
                continue;
            }

            c.add_flags2(y, x, CellFlags2::FEEL);
            break;
        }
    }
    c.feeling_squares = 0;
}

/// Level feeling contribution from loot.
fn calc_obj_feeling(c: &Cave, world: &World) -> i32 {
    if c.depth == 0 {
        return 0;
    }

    // Artifacts trigger a special feeling when preservation is off.
    if c.good_item && world.no_preserve {
        return 10;
    }

    let x = c.obj_rating / c.depth as u32;
    if x > 6000 {
        20
    } else if x > 3500 {
        30
    } else if x > 2000 {
        40
    } else if x > 1000 {
        50
    } else if x > 500 {
        60
    } else if x > 300 {
        70
    } else if x > 200 {
        80
    } else if x > 100 {
        90
    } else {
        100
    }
}

/// Level feeling contribution from monsters.
fn calc_mon_feeling(c: &Cave) -> i32 {
    if c.depth == 0 {
        return 0;
    }

    let x = c.mon_rating / (c.depth * c.depth) as u32;
    if x > 7000 {
        1
    } else if x > 4500 {
        2
    } else if x > 2500 {
        3
    } else if x > 1500 {
        4
    } else if x > 800 {
        5
    } else if x > 400 {
        6
    } else if x > 150 {
        7
    } else if x > 50 {
        8
    } else {
        9
    }
}

/// Ensure every unseen questor of this depth is placed.
fn place_questors(c: &mut Cave, rng: &mut GameRng) {
    for (i, race) in RACES.iter().enumerate() {
        if !race.flags.contains(RaceFlags::QUESTOR) || race.level != c.depth {
            continue;
        }
        if c.monsters.iter().any(|m| m.race == i) {
            continue;
        }
        if let Some((y, x)) = find_empty(c, rng) {
            place_new_monster(c, y, x, i, true, true, Origin::Drop, rng);
        }
    }
}

/// Generate a new level for the player's requested depth.
///
/// On success the cave is fully populated and its invariants hold. The
/// retry budget covers transient builder failures and population
/// overflows; exhausting it means the configuration is broken and the
/// caller should abort.
pub fn generate(
    c: &mut Cave,
    p: &mut Player,
    world: &World,
    rng: &mut GameRng,
) -> Result<(), GenerationError> {
    c.depth = p.depth;

    let mut last_error = "no generation";

    for _ in 0..MAX_GENERATION_TRIES {
        c.clear(p);
        c.depth = p.depth;

        let built = if c.depth == 0 {
            town::town_gen(c, p, world, rng)
        } else {
            let perc = rng.randint0(100);
            let last = CAVE_PROFILES.len() - 1;
            let mut ok = false;
            for (i, profile) in CAVE_PROFILES.iter().enumerate() {
                if i < last && profile.cutoff < perc {
                    continue;
                }

                ok = match profile.kind {
                    CaveKind::Labyrinth => labyrinth::labyrinth_gen(c, p, world, rng),
                    CaveKind::Cavern => cavern::cavern_gen(c, p, world, rng),
                    CaveKind::Town => town::town_gen(c, p, world, rng),
                    CaveKind::Default => {
                        let mut dun = GenState::new(profile);
                        default_gen(c, p, &mut dun, world, rng)
                    }
                };
                if ok {
                    break;
                }

                // A failed builder may have scribbled on the grid.
                c.clear(p);
                c.depth = p.depth;
            }
            ok
        };

        let mut error = if built { None } else { Some("no builder succeeded") };

        if error.is_none() {
            if is_quest(c.depth) {
                place_questors(c, rng);
            }

            place_feeling(c, rng);
            c.feeling = calc_obj_feeling(c, world) + calc_mon_feeling(c);

            // Regenerate levels that overflow their maxima.
            if c.objects.len() >= MAX_LEVEL_OBJECTS {
                error = Some("too many objects");
            }
            if c.monsters.len() >= MAX_LEVEL_MONSTERS {
                error = Some("too many monsters");
            }
        }

        match error {
            None => {
                c.created_at = world.turn;
                return Ok(());
            }
            Some(e) => {
                last_error = e;
                debug!("Generation restarted: {e}.");
            }
        }
    }

    Err(GenerationError::RetriesExhausted {
        tries: MAX_GENERATION_TRIES,
        last: last_error,
    })
}
