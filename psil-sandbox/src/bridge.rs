//! The sense/act bridge (`spec.md §4.J`): the host↔VM contract over Ring0
//! and Ring1.
//!
//! `spec.md` names "nearest-threat distance" and "danger level" without
//! defining what a threat *is* — the tile world only has `EMPTY`/`FOOD`
//! kinds, no predator concept. This resolves that silence the simplest way
//! consistent with the rest of the model: any other live NPC's occupied
//! tile counts as a threat. See DESIGN.md.

use psil_vm::memory::SlottedMemory;

use crate::npc::NpcRow;
use crate::tile::{tile_type, TileWorld};

/// Ring0 perception slots (`spec.md §4.J`).
pub mod ring0 {
    pub const SELF_ID: u16 = 0;
    pub const HEALTH: u16 = 1;
    pub const ENERGY: u16 = 2;
    pub const HUNGER: u16 = 3;
    pub const NEAREST_THREAT: u16 = 4;
    pub const NEAREST_FOOD: u16 = 5;
    pub const DANGER_LEVEL: u16 = 6;
    pub const NEAR_MARKER: u16 = 7;
    pub const X: u16 = 8;
    pub const Y: u16 = 9;
    pub const TIME_OF_DAY: u16 = 10;
}

/// Ring1 action slots, offsets within Ring1 (`spec.md §4.J`).
pub mod ring1 {
    pub const MOVE_DIRECTION: u16 = 0;
    pub const ACTION: u16 = 1;
}

/// `NEAREST_THREAT`/`NEAREST_FOOD` saturate at this distance when nothing is
/// found within range (`spec.md §4.J`).
pub const NO_TARGET_DISTANCE: u8 = 31;

/// Move directions read from Ring1 slot 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    None,
    North,
    East,
    South,
    West,
}

impl MoveDirection {
    pub fn from_word(w: i16) -> Self {
        match w {
            1 => Self::North,
            2 => Self::East,
            3 => Self::South,
            4 => Self::West,
            _ => Self::None,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::None => (0, 0),
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Fill Ring0 from NPC and world state (`spec.md §4.J` step "before running
/// a brain"). Ring0 occupies slots `0..=10` directly, as the table
/// specifies. Uses [`SlottedMemory::host_store`], not `store`, since this is
/// the host writing its own ring, not a VM-issued write.
pub fn fill_ring0(memory: &mut SlottedMemory, npc: &NpcRow, world: &TileWorld, tick: u32) {
    let nearest_food = nearest_matching(world, npc.x, npc.y, |b| TileWorld::kind(b) == tile_type::FOOD);
    let nearest_threat = nearest_other_occupant(world, npc.x, npc.y);
    let danger_level = if nearest_threat <= 2 { 1 } else { 0 };
    let near_marker = if nearest_food <= 1 { 1 } else { 0 };

    memory.host_store(ring0::SELF_ID as i16, npc.id as i16);
    memory.host_store(ring0::HEALTH as i16, npc.health as i16);
    memory.host_store(ring0::ENERGY as i16, npc.energy as i16);
    memory.host_store(ring0::HUNGER as i16, npc.hunger as i16);
    memory.host_store(ring0::NEAREST_THREAT as i16, nearest_threat as i16);
    memory.host_store(ring0::NEAREST_FOOD as i16, nearest_food as i16);
    memory.host_store(ring0::DANGER_LEVEL as i16, danger_level);
    memory.host_store(ring0::NEAR_MARKER as i16, near_marker);
    memory.host_store(ring0::X as i16, npc.x as i16);
    memory.host_store(ring0::Y as i16, npc.y as i16);
    memory.host_store(ring0::TIME_OF_DAY as i16, (tick % 256) as i16);
}

/// Manhattan-distance search over growing diamonds, capped at
/// [`NO_TARGET_DISTANCE`]. `d = 0` checks the NPC's own tile.
fn nearest_matching(world: &TileWorld, x: i32, y: i32, matches: impl Fn(u8) -> bool) -> u8 {
    for d in 0..=NO_TARGET_DISTANCE as i32 {
        if d == 0 {
            if matches(world.get(x, y)) {
                return 0;
            }
            continue;
        }
        for dx in -d..=d {
            let dy = d - dx.abs();
            if matches(world.get(x + dx, y + dy)) {
                return d as u8;
            }
            if dy != 0 && matches(world.get(x + dx, y - dy)) {
                return d as u8;
            }
        }
    }
    NO_TARGET_DISTANCE
}

/// Nearest *other* occupied tile, always excluding the NPC's own tile (`d =
/// 0` would otherwise always match, since the occupant nibble only records
/// presence, not which NPC — see [`crate::tile`]'s module docs).
fn nearest_other_occupant(world: &TileWorld, x: i32, y: i32) -> u8 {
    for d in 1..=NO_TARGET_DISTANCE as i32 {
        for dx in -d..=d {
            let dy = d - dx.abs();
            if world.is_occupied(x + dx, y + dy) {
                return d as u8;
            }
            if dy != 0 && world.is_occupied(x + dx, y - dy) {
                return d as u8;
            }
        }
    }
    NO_TARGET_DISTANCE
}

/// Read Ring1 slots within `memory` (Ring1 is slots 32..64; `offset` is the
/// within-ring offset from `spec.md §4.J`'s second table).
pub fn read_ring1(memory: &SlottedMemory, offset: u16) -> i16 {
    memory.load((psil_vm::memory::RING0_END as u16 + offset) as i16)
}

pub fn move_direction(memory: &SlottedMemory) -> MoveDirection {
    MoveDirection::from_word(read_ring1(memory, ring1::MOVE_DIRECTION))
}

pub fn wants_to_eat(memory: &SlottedMemory) -> bool {
    read_ring1(memory, ring1::ACTION) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_food_at_distance_one() {
        let mut world = TileWorld::new(8);
        world.set_kind(3, 3, tile_type::FOOD);
        let d = nearest_matching(&world, 2, 3, |b| TileWorld::kind(b) == tile_type::FOOD);
        assert_eq!(d, 1);
    }

    #[test]
    fn nearest_food_absent_saturates() {
        let world = TileWorld::new(8);
        let d = nearest_matching(&world, 0, 0, |b| TileWorld::kind(b) == tile_type::FOOD);
        assert_eq!(d, NO_TARGET_DISTANCE);
    }

    #[test]
    fn move_direction_decodes_all_five_values() {
        assert_eq!(MoveDirection::from_word(0), MoveDirection::None);
        assert_eq!(MoveDirection::from_word(1), MoveDirection::North);
        assert_eq!(MoveDirection::from_word(4), MoveDirection::West);
        assert_eq!(MoveDirection::from_word(99), MoveDirection::None);
    }
}
