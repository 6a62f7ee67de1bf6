//! Serialized sandbox state (`spec.md §6`: "if an implementation adds
//! snapshotting, the canonical layout is..."), gated behind the `serde`
//! feature exactly as `psil-vm`/`psil-asm` gate theirs.

use serde::{Deserialize, Serialize};

use crate::genome::GenomeBank;
use crate::lfsr::Lfsr;
use crate::npc::NpcTable;
use crate::scheduler::Scheduler;
use crate::tile::TileWorld;

/// World grid bytes, NPC table rows, genome bank, LFSR state, tick counter,
/// generation counter — in that order, per `spec.md §6`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub world_cells: Vec<u8>,
    pub world_size: usize,
    pub npcs: NpcTable,
    pub genomes: GenomeBank,
    pub lfsr_state: u16,
    pub tick: u32,
    pub generation: u32,
}

impl Snapshot {
    pub fn capture(scheduler: &Scheduler) -> Self {
        Self {
            world_cells: scheduler.world().cells().to_vec(),
            world_size: scheduler.world().width(),
            npcs: scheduler.npcs().clone(),
            genomes: scheduler.genomes_ref().clone(),
            lfsr_state: scheduler.lfsr_state(),
            tick: scheduler.tick_count(),
            generation: scheduler.generation(),
        }
    }

    pub fn restore_world(&self) -> TileWorld {
        let mut world = TileWorld::new(self.world_size);
        for (i, &byte) in self.world_cells.iter().enumerate() {
            let x = (i % self.world_size) as i32;
            let y = (i / self.world_size) as i32;
            world.set(x, y, byte);
        }
        world
    }

    pub fn restore_lfsr(&self) -> Lfsr {
        Lfsr::restore(self.lfsr_state)
    }
}
