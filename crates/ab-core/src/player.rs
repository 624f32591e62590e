//! The player fields the generator reads and writes, plus the world inputs
//! it consults.

use serde::{Deserialize, Serialize};

/// Player state relevant to level generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    /// Position on the current level.
    pub px: i32,
    pub py: i32,

    /// Requested depth for the next level (0 = town).
    pub depth: i32,

    /// The player took an up staircase; place a matching down stair under
    /// them on arrival.
    pub create_down_stair: bool,

    /// The player took a down staircase; place a matching up stair.
    pub create_up_stair: bool,
}

impl Player {
    /// A player requesting the given depth, with no connected-stair request.
    pub fn at_depth(depth: i32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }
}

/// World state the generator consults but does not own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct World {
    /// Game turn counter; drives town day/night.
    pub turn: i32,

    /// Persistent seed for the town layout. The town looks the same every
    /// visit within one game.
    pub town_seed: u64,

    /// Birth option: artifacts are lost when left behind, so finding one
    /// triggers the special level feeling.
    pub no_preserve: bool,

    /// Birth option: suppress the staircase normally created under the
    /// player on arrival.
    pub no_stairs: bool,
}

impl Default for World {
    fn default() -> Self {
        Self {
            turn: 1,
            town_seed: 0x5EED_70B1,
            no_preserve: false,
            no_stairs: false,
        }
    }
}
