//! ab-core: dungeon level generation.
//!
//! Builds fully populated roguelike levels: terrain, rooms, corridors,
//! vaults, stairs, traps, monsters, and objects. Pure logic with no I/O;
//! given the same seed and inputs the output is identical.

pub mod data;
pub mod dungeon;
pub mod monster;
pub mod object;
pub mod player;

mod consts;

pub use consts::*;
pub use dungeon::{generate, Cave, GenerationError};
pub use player::{Player, World};

pub use ab_rng::{GameRng, RngSnapshot};
