//! Core generation constants.

/// Dungeon dimensions.
pub const DUNGEON_HGT: usize = 66;
pub const DUNGEON_WID: usize = 198;

/// Rooms are accounted for in 11x11 blocks.
pub const BLOCK_HGT: i32 = 11;
pub const BLOCK_WID: i32 = 11;

/// Maximum numbers of room blocks along each axis (currently 6x18).
pub const MAX_ROOMS_ROW: usize = DUNGEON_HGT / BLOCK_HGT as usize;
pub const MAX_ROOMS_COL: usize = DUNGEON_WID / BLOCK_WID as usize;

/// Bounds on the scratch arrays used during generation.
/// These bounds are checked, though usually this is a formality.
pub const CENT_MAX: usize = 100;
pub const DOOR_MAX: usize = 200;
pub const WALL_MAX: usize = 500;
pub const TUNN_MAX: usize = 900;

/// Town dimensions and contents.
pub const TOWN_HGT: usize = 22;
pub const TOWN_WID: usize = 66;
pub const MAX_STORES: usize = 8;

/// Day length bookkeeping for the town.
pub const TOWN_DAWN: i32 = 10_000;
pub const TOWN_DUSK: i32 = 5_000;

/// Base monster allocations.
pub const MIN_M_ALLOC_LEVEL: i32 = 14;
pub const MIN_M_ALLOC_TD: i32 = 4;
pub const MIN_M_ALLOC_TN: i32 = 8;

/// Deepest generatable level.
pub const MAX_DEPTH: i32 = 128;

/// Hidden squares that feed the level-feeling readout.
pub const FEELING_TOTAL: i32 = 100;

/// Per-level maxima; overflowing either forces a regeneration.
pub const MAX_LEVEL_MONSTERS: usize = 1024;
pub const MAX_LEVEL_OBJECTS: usize = 512;

/// Full-level generation attempts before giving up.
pub const MAX_GENERATION_TRIES: u32 = 100;

/// Quest monsters live on these depths; stairs there only lead up.
pub const QUEST_DEPTHS: [i32; 2] = [99, 100];

/// Whether `depth` hosts a quest monster.
pub fn is_quest(depth: i32) -> bool {
    QUEST_DEPTHS.contains(&depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_grid_shape() {
        assert_eq!(MAX_ROOMS_ROW, 6);
        assert_eq!(MAX_ROOMS_COL, 18);
    }

    #[test]
    fn test_is_quest() {
        assert!(is_quest(99));
        assert!(is_quest(100));
        assert!(!is_quest(0));
        assert!(!is_quest(98));
    }
}
