//! Grid cell types.
//!
//! The wall sub-types matter to the builders: "extra" is the basic fill rock
//! that tunnels dig through, "inner" is inside a room, "outer" is the wall
//! ring a corridor may pierce, and "solid" may never be pierced (it is used
//! to forbid two corridors entering a room through adjacent grids). The
//! permanent sub-types are indestructible and include the dungeon boundary.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::Display;

/// State of a closed door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DoorPower {
    #[default]
    Plain,
    /// Locked at power 1-7.
    Locked(u8),
    /// Stuck at power 0-7; must be forced.
    Jammed(u8),
}

/// Terrain feature of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum Feature {
    #[default]
    Floor,
    Rubble,
    /// Magma vein, sometimes carrying visible gold.
    Magma {
        gold: bool,
    },
    /// Quartz vein, sometimes carrying visible gold.
    Quartz {
        gold: bool,
    },
    OpenDoor,
    BrokenDoor,
    SecretDoor,
    ClosedDoor(DoorPower),
    /// Staircase leading up.
    LessStair,
    /// Staircase leading down.
    MoreStair,
    /// Entrance to store `0..MAX_STORES`.
    Shop(u8),
    WallExtra,
    WallInner,
    WallOuter,
    WallSolid,
    PermExtra,
    PermInner,
    PermOuter,
    PermSolid,
}

impl Feature {
    /// Plain floor.
    pub const fn is_floor(self) -> bool {
        matches!(self, Feature::Floor)
    }

    /// Any staircase.
    pub const fn is_stair(self) -> bool {
        matches!(self, Feature::LessStair | Feature::MoreStair)
    }

    /// Any door, hidden or not.
    pub const fn is_door(self) -> bool {
        matches!(
            self,
            Feature::OpenDoor
                | Feature::BrokenDoor
                | Feature::SecretDoor
                | Feature::ClosedDoor(_)
        )
    }

    pub const fn is_shop(self) -> bool {
        matches!(self, Feature::Shop(_))
    }

    /// Granite or mineral vein; what a streamer may replace and a tunnel may
    /// (eventually) dig through.
    pub const fn is_rock(self) -> bool {
        matches!(
            self,
            Feature::Magma { .. }
                | Feature::Quartz { .. }
                | Feature::WallExtra
                | Feature::WallInner
                | Feature::WallOuter
                | Feature::WallSolid
        )
    }

    /// Indestructible walls, including the dungeon boundary.
    pub const fn is_perm(self) -> bool {
        matches!(
            self,
            Feature::PermExtra | Feature::PermInner | Feature::PermOuter | Feature::PermSolid
        )
    }

    /// Mineral vein.
    pub const fn is_mineral(self) -> bool {
        matches!(self, Feature::Magma { .. } | Feature::Quartz { .. })
    }

    /// Anything that reads as wall to the player: rock, permanent walls.
    pub const fn is_wall(self) -> bool {
        self.is_rock() || self.is_perm()
    }

    /// A wall a doorway can be framed against.
    pub const fn is_strong_wall(self) -> bool {
        self.is_rock() || self.is_perm()
    }

    /// Can be crossed, if slowly: doors open, rubble clears.
    pub const fn is_passable(self) -> bool {
        self.is_floor()
            || self.is_stair()
            || self.is_door()
            || self.is_shop()
            || matches!(self, Feature::Rubble)
    }

    /// Display character, for map dumps in tests and debugging.
    pub const fn symbol(self) -> char {
        match self {
            Feature::Floor => '.',
            Feature::Rubble => ':',
            Feature::Magma { gold: false } => '%',
            Feature::Magma { gold: true } => '*',
            Feature::Quartz { gold: false } => '%',
            Feature::Quartz { gold: true } => '*',
            Feature::OpenDoor => '\'',
            Feature::BrokenDoor => '\'',
            Feature::SecretDoor => '#',
            Feature::ClosedDoor(_) => '+',
            Feature::LessStair => '<',
            Feature::MoreStair => '>',
            Feature::Shop(_) => '1',
            Feature::WallExtra
            | Feature::WallInner
            | Feature::WallOuter
            | Feature::WallSolid
            | Feature::PermExtra
            | Feature::PermInner
            | Feature::PermOuter
            | Feature::PermSolid => '#',
        }
    }
}

bitflags! {
    /// Primary per-cell info flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        /// Part of a room interior or its walls.
        const ROOM = 0x01;
        /// Permanently lit.
        const GLOW = 0x02;
        /// Part of a vault template; teleports avoid these.
        const ICKY = 0x04;
        /// Known to the player.
        const MARK = 0x08;
    }
}

bitflags! {
    /// Auxiliary per-cell info flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags2: u8 {
        /// Hidden square that advances the level feeling when found.
        const FEEL = 0x01;
    }
}

// bitflags carry no serde derives; store the raw bits.
impl Serialize for CellFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(CellFlags::from_bits_truncate(u8::deserialize(deserializer)?))
    }
}

impl Serialize for CellFlags2 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellFlags2 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(CellFlags2::from_bits_truncate(u8::deserialize(deserializer)?))
    }
}

/// A single map cell.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Terrain.
    pub feat: Feature,

    /// Info flags.
    pub info: CellFlags,

    /// Auxiliary info flags.
    pub info2: CellFlags2,

    /// Monster here: 1-based index into the level's monster list, 0 = none.
    pub m_idx: u16,

    /// Object here: 1-based index into the level's object list, 0 = none.
    pub o_idx: u16,

    /// Flow cost for pathing; cleared on generation.
    pub cost: u16,

    /// Flow timestamp for pathing; cleared on generation.
    pub when: u8,
}
