//! Traps.
//!
//! Traps live in a list on the level rather than in the terrain, so the
//! feature set stays closed. Kind selection widens with depth.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::Cave;
use ab_rng::GameRng;

/// Trap kinds, in rough order of appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum TrapKind {
    TrapDoor,
    Pit,
    SpikedPit,
    PoisonPit,
    SummonRune,
    TeleportRune,
    FireTrap,
    AcidTrap,
    SlowDart,
    StrengthDart,
    GasBlind,
    GasConfuse,
    GasPoison,
    GasSleep,
}

/// A trap on the level. Traps start hidden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trap {
    pub y: i32,
    pub x: i32,
    pub kind: TrapKind,
    pub hidden: bool,
}

/// Pick a trap kind appropriate to the depth.
fn pick_trap_kind(depth: i32, rng: &mut GameRng) -> TrapKind {
    use TrapKind::*;

    let available: &[TrapKind] = match depth {
        0..=3 => &[Pit, SlowDart, GasSleep, GasConfuse],
        4..=9 => &[Pit, SpikedPit, SlowDart, StrengthDart, GasSleep, GasConfuse, GasBlind],
        10..=24 => &[
            TrapDoor, Pit, SpikedPit, PoisonPit, SlowDart, StrengthDart, GasBlind, GasConfuse,
            GasPoison, GasSleep, TeleportRune,
        ],
        _ => &[
            TrapDoor, Pit, SpikedPit, PoisonPit, SummonRune, TeleportRune, FireTrap, AcidTrap,
            SlowDart, StrengthDart, GasBlind, GasConfuse, GasPoison, GasSleep,
        ],
    };
    available[rng.randint0(available.len() as i32) as usize]
}

/// Place a hidden trap at (y, x) if the grid is a clean floor.
pub fn place_trap(c: &mut Cave, y: i32, x: i32, rng: &mut GameRng) {
    if !c.in_bounds(y, x) || !c.is_empty(y, x) || c.trap_at(y, x).is_some() {
        return;
    }
    let kind = pick_trap_kind(c.depth, rng);
    c.traps.push(Trap {
        y,
        x,
        kind,
        hidden: true,
    });
}
