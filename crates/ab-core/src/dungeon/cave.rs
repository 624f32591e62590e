//! The level structure.
//!
//! The grid is always allocated at full size; `height`/`width` give the
//! active area the current builder chose. Everything outside the active
//! area is left permanently solid by the builders.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellFlags, CellFlags2, Feature};
use super::trap::Trap;
use crate::monster::Monster;
use crate::object::Object;
use crate::player::Player;
use crate::{DUNGEON_HGT, DUNGEON_WID, MAX_LEVEL_MONSTERS, MAX_LEVEL_OBJECTS};

fn default_cells() -> Vec<Vec<Cell>> {
    vec![vec![Cell::default(); DUNGEON_WID]; DUNGEON_HGT]
}

/// Sentinel for the player in a cell's monster index.
pub(crate) const PLAYER_MARK: u16 = u16::MAX;

/// A dungeon level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cave {
    /// Active grid dimensions; at most `DUNGEON_HGT` x `DUNGEON_WID`.
    pub height: i32,
    pub width: i32,

    /// Depth this level was generated for (0 = town).
    pub depth: i32,

    #[serde(default = "default_cells")]
    cells: Vec<Vec<Cell>>,

    /// Accumulated monster threat; feeds the level feeling.
    pub mon_rating: u32,

    /// Accumulated loot value; feeds the level feeling.
    pub obj_rating: u32,

    /// An artifact was placed here.
    pub good_item: bool,

    /// Combined level feeling, computed at the end of generation.
    pub feeling: i32,

    /// Feeling squares the player has found so far.
    pub feeling_squares: i32,

    /// Game turn this level was created on.
    pub created_at: i32,

    pub monsters: Vec<Monster>,
    pub objects: Vec<Object>,
    pub traps: Vec<Trap>,
}

impl Cave {
    pub fn new() -> Self {
        Self {
            height: DUNGEON_HGT as i32,
            width: DUNGEON_WID as i32,
            depth: 0,
            cells: default_cells(),
            mon_rating: 0,
            obj_rating: 0,
            good_item: false,
            feeling: 0,
            feeling_squares: 0,
            created_at: 0,
            monsters: Vec::new(),
            objects: Vec::new(),
            traps: Vec::new(),
        }
    }

    /// Wipe the level, ready for generation to begin.
    pub fn clear(&mut self, p: &mut Player) {
        self.height = DUNGEON_HGT as i32;
        self.width = DUNGEON_WID as i32;
        for row in &mut self.cells {
            for cell in row.iter_mut() {
                *cell = Cell::default();
            }
        }
        self.monsters.clear();
        self.objects.clear();
        self.traps.clear();
        self.mon_rating = 0;
        self.obj_rating = 0;
        self.good_item = false;
        self.feeling = 0;
        self.feeling_squares = 0;

        p.px = 0;
        p.py = 0;
    }

    /// Set the active dimensions a builder will work in.
    pub fn set_dimensions(&mut self, h: i32, w: i32) {
        assert!(
            h >= 1 && h <= DUNGEON_HGT as i32 && w >= 1 && w <= DUNGEON_WID as i32,
            "bad cave dimensions {h}x{w}"
        );
        self.height = h;
        self.width = w;
    }

    pub fn in_bounds(&self, y: i32, x: i32) -> bool {
        y >= 0 && y < self.height && x >= 0 && x < self.width
    }

    /// Inside the active area, off the boundary ring.
    pub fn in_bounds_fully(&self, y: i32, x: i32) -> bool {
        y > 0 && y < self.height - 1 && x > 0 && x < self.width - 1
    }

    pub fn cell(&self, y: i32, x: i32) -> &Cell {
        assert!(self.in_bounds(y, x), "grid read out of bounds: ({y},{x})");
        &self.cells[y as usize][x as usize]
    }

    pub fn cell_mut(&mut self, y: i32, x: i32) -> &mut Cell {
        assert!(self.in_bounds(y, x), "grid write out of bounds: ({y},{x})");
        &mut self.cells[y as usize][x as usize]
    }

    pub fn feat(&self, y: i32, x: i32) -> Feature {
        self.cell(y, x).feat
    }

    pub fn set_feat(&mut self, y: i32, x: i32, feat: Feature) {
        self.cell_mut(y, x).feat = feat;
    }

    pub fn add_flags(&mut self, y: i32, x: i32, flags: CellFlags) {
        self.cell_mut(y, x).info |= flags;
    }

    pub fn has_flag(&self, y: i32, x: i32, flags: CellFlags) -> bool {
        self.cell(y, x).info.contains(flags)
    }

    pub fn add_flags2(&mut self, y: i32, x: i32, flags: CellFlags2) {
        self.cell_mut(y, x).info2 |= flags;
    }

    pub fn has_flag2(&self, y: i32, x: i32, flags: CellFlags2) -> bool {
        self.cell(y, x).info2.contains(flags)
    }

    pub fn is_floor(&self, y: i32, x: i32) -> bool {
        self.feat(y, x).is_floor()
    }

    pub fn is_wall(&self, y: i32, x: i32) -> bool {
        self.feat(y, x).is_wall()
    }

    pub fn is_rock(&self, y: i32, x: i32) -> bool {
        self.feat(y, x).is_rock()
    }

    pub fn is_perm(&self, y: i32, x: i32) -> bool {
        self.feat(y, x).is_perm()
    }

    pub fn is_strong_wall(&self, y: i32, x: i32) -> bool {
        self.feat(y, x).is_strong_wall()
    }

    pub fn is_passable(&self, y: i32, x: i32) -> bool {
        self.feat(y, x).is_passable()
    }

    /// Part of a room (interior or walls).
    pub fn is_room(&self, y: i32, x: i32) -> bool {
        self.has_flag(y, x, CellFlags::ROOM)
    }

    /// Part of a vault template.
    pub fn is_vault(&self, y: i32, x: i32) -> bool {
        self.has_flag(y, x, CellFlags::ICKY)
    }

    /// Plain untrapped floor with nothing on it.
    pub fn is_empty(&self, y: i32, x: i32) -> bool {
        let cell = self.cell(y, x);
        cell.feat.is_floor() && cell.m_idx == 0 && cell.o_idx == 0 && self.trap_at(y, x).is_none()
    }

    /// Floor that can take an object.
    pub fn can_put_item(&self, y: i32, x: i32) -> bool {
        let cell = self.cell(y, x);
        cell.feat.is_floor() && cell.o_idx == 0 && self.trap_at(y, x).is_none()
    }

    /// Register a monster; false when the level is full.
    pub fn add_monster(&mut self, monster: Monster) -> bool {
        if self.monsters.len() >= MAX_LEVEL_MONSTERS {
            return false;
        }
        let (y, x) = (monster.y, monster.x);
        self.monsters.push(monster);
        self.cell_mut(y, x).m_idx = self.monsters.len() as u16;
        true
    }

    pub fn monster_at(&self, y: i32, x: i32) -> Option<&Monster> {
        let idx = self.cell(y, x).m_idx;
        if idx == 0 || idx == PLAYER_MARK {
            None
        } else {
            self.monsters.get(idx as usize - 1)
        }
    }

    /// Attach an object to a cell; false when occupied or the level is full.
    pub fn floor_carry(&mut self, y: i32, x: i32, mut obj: Object) -> bool {
        if self.cell(y, x).o_idx != 0 || self.objects.len() >= MAX_LEVEL_OBJECTS {
            return false;
        }
        obj.y = y;
        obj.x = x;
        self.objects.push(obj);
        self.cell_mut(y, x).o_idx = self.objects.len() as u16;
        true
    }

    pub fn object_at(&self, y: i32, x: i32) -> Option<&Object> {
        let idx = self.cell(y, x).o_idx;
        if idx == 0 {
            None
        } else {
            self.objects.get(idx as usize - 1)
        }
    }

    pub fn trap_at(&self, y: i32, x: i32) -> Option<&Trap> {
        self.traps.iter().find(|t| t.y == y && t.x == x)
    }

    /// Light the level for day, or darken everything but the shop fronts
    /// for night.
    pub fn illuminate(&mut self, daytime: bool) {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cell_mut(y, x);
                if daytime {
                    cell.info |= CellFlags::GLOW | CellFlags::MARK;
                } else {
                    cell.info -= CellFlags::GLOW;
                    if cell.feat.is_shop() {
                        cell.info |= CellFlags::GLOW;
                    }
                }
            }
        }
    }

    /// Reveal the whole layout to the player.
    pub fn reveal(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                self.cell_mut(y, x).info |= CellFlags::MARK;
            }
        }
    }

    /// Render the active area as text, one row per line. Debug aid.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.height * (self.width + 1)) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.feat(y, x).symbol());
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Cave {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{make_gold, Origin};
    use ab_rng::GameRng;

    #[test]
    fn test_clear_resets_everything() {
        let mut c = Cave::new();
        let mut p = Player::at_depth(5);
        p.px = 10;
        p.py = 10;

        c.set_feat(3, 3, Feature::WallSolid);
        c.add_flags(3, 3, CellFlags::ROOM);
        c.mon_rating = 99;
        c.good_item = true;
        c.set_dimensions(20, 30);

        c.clear(&mut p);

        assert_eq!(c.feat(3, 3), Feature::Floor);
        assert!(!c.is_room(3, 3));
        assert_eq!(c.mon_rating, 0);
        assert!(!c.good_item);
        assert_eq!(c.height, DUNGEON_HGT as i32);
        assert_eq!(p.px, 0);
        assert_eq!(p.py, 0);
    }

    #[test]
    fn test_floor_carry_one_per_cell() {
        let mut c = Cave::new();
        let mut rng = GameRng::new(1);
        let mut gold = make_gold(5, &mut rng);
        gold.origin = Origin::Floor;

        assert!(c.floor_carry(4, 4, gold.clone()));
        assert!(!c.floor_carry(4, 4, gold));
        assert!(c.object_at(4, 4).is_some());
        assert!(!c.can_put_item(4, 4));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_bounds_read_panics() {
        let mut c = Cave::new();
        c.set_dimensions(10, 10);
        let _ = c.feat(10, 3);
    }

    #[test]
    fn test_bounds_track_active_area() {
        let mut c = Cave::new();
        c.set_dimensions(17, 53);
        assert!(c.in_bounds(16, 52));
        assert!(!c.in_bounds(17, 0));
        assert!(c.in_bounds_fully(1, 1));
        assert!(!c.in_bounds_fully(0, 1));
        assert!(!c.in_bounds_fully(16, 52));
    }
}
