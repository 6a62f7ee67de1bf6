//! The tick scheduler (`spec.md §4.K`): sense → think → act → decay, run
//! per live NPC each tick, plus food respawn and periodic evolution.

use itertools::iproduct;
use psil_vm::{Interpreter, NullSink, ProgramLayout};

use crate::bridge::{self, MoveDirection};
use crate::config::{GaConfig, SandboxConfig};
use crate::error::SchedulerFault;
use crate::ga::{self, GaStats};
use crate::genome::GenomeBank;
use crate::lfsr::Lfsr;
use crate::npc::NpcTable;
use crate::tile::{tile_type, TileWorld};

/// Capped health/energy values (`spec.md §4.K` step d's "Eat" clause).
const MAX_HEALTH: i32 = 100;
const MAX_ENERGY: i32 = 200;

/// One self-contained simulation: world, NPC table, genome bank, LFSR, and
/// the tick/generation counters (`spec.md §9` "Global state").
pub struct Scheduler {
    config: SandboxConfig,
    ga_config: GaConfig,
    world: TileWorld,
    npcs: NpcTable,
    genomes: GenomeBank,
    lfsr: Lfsr,
    tick: u32,
    generation: u32,
}

/// Per-tick outcome surfaced to the caller (`spec.md §7` "sandbox prints
/// `T=tick A=alive` lines").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
    pub tick: u32,
    pub alive: usize,
    pub evolution: Option<GaEvolutionOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaEvolutionOutcome {
    pub generation: u32,
    pub reseeded: bool,
    pub elite_fitness: i64,
}

impl Scheduler {
    /// Build a fresh sandbox: empty world, NPC table fully populated with
    /// live rows at random positions, genome bank seeded from `seed`.
    pub fn new(config: SandboxConfig, ga_config: GaConfig, seed: u16) -> Self {
        let mut lfsr = Lfsr::new(seed);
        let mut world = TileWorld::new(config.world_size);
        let mut genomes = GenomeBank::new(config.max_npcs, config.genome_len);
        genomes.reseed_all(&mut lfsr);

        let mut npcs = NpcTable::new(config.max_npcs);
        for row in 0..config.max_npcs {
            let (x, y) = random_empty_tile(&world, &mut lfsr).unwrap_or((0, 0));
            let npc = npcs.get_mut(row);
            npc.id = (row + 1) as u32;
            npc.x = x;
            npc.y = y;
            npc.reset_for_new_generation();
            world.set_occupant(x, y, 1);
        }

        Self { config, ga_config, world, npcs, genomes, lfsr, tick: 0, generation: 0 }
    }

    pub fn world(&self) -> &TileWorld {
        &self.world
    }

    pub fn npcs(&self) -> &NpcTable {
        &self.npcs
    }

    pub fn genomes_ref(&self) -> &GenomeBank {
        &self.genomes
    }

    pub fn lfsr_state(&self) -> u16 {
        self.lfsr.state()
    }

    /// Overwrite one NPC row's genome. Useful for seeding a scripted brain
    /// (tests, reproducing a saved run) without going through the GA.
    pub fn set_genome(&mut self, row: usize, genome: Vec<u8>) {
        self.genomes.set(row, genome);
    }

    /// Place a food tile at `(x, y)`, overwriting whatever kind was there.
    /// Useful for seeding a deterministic scenario without waiting on the
    /// LFSR-driven respawn.
    pub fn place_food(&mut self, x: i32, y: i32) {
        self.world.set_kind(x, y, tile_type::FOOD);
    }

    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Run one tick to completion (`spec.md §4.K`).
    #[tracing::instrument(name = "psil_sandbox::tick", skip(self))]
    pub fn tick(&mut self) -> TickStats {
        for row in 0..self.npcs.len() {
            if self.npcs.get(row).is_empty() {
                continue;
            }
            if let Err(fault) = self.run_one_npc(row) {
                tracing::debug!(row, ?fault, "NPC brain faulted; fitness left unchanged this tick");
            }
        }

        self.respawn_food();

        let evolution = if self.config.evolve_every != 0 && (self.tick + 1) % self.config.evolve_every == 0 {
            Some(self.evolve())
        } else {
            None
        };

        let stats = TickStats { tick: self.tick, alive: self.npcs.alive_count(), evolution };
        tracing::info!(tick = stats.tick, alive = stats.alive, "T={} A={}", stats.tick, stats.alive);
        self.tick += 1;
        stats
    }

    /// Run `self.tick` repeatedly until `config.tick_max` is reached.
    pub fn run_to_completion(&mut self) -> Vec<TickStats> {
        let mut history = Vec::with_capacity(self.config.tick_max as usize);
        while self.tick < self.config.tick_max {
            history.push(self.tick());
        }
        history
    }

    fn run_one_npc(&mut self, row: usize) -> Result<(), SchedulerFault> {
        let genome = self.genomes.get(row).to_vec();
        let npc = *self.npcs.get(row);

        let mut vm = Interpreter::load(&genome, ProgramLayout::Flat, &self.config.vm, NullSink)
            .map_err(SchedulerFault::LoadFault)?;
        bridge::fill_ring0(vm.memory_mut(), &npc, &self.world, self.tick);

        let halt = vm.run();
        if halt.is_fault() {
            return Err(SchedulerFault::BrainFault);
        }

        let direction = bridge::move_direction(vm.memory());
        let wants_to_eat = bridge::wants_to_eat(vm.memory());
        drop(vm);

        self.apply_move(row, direction);
        if wants_to_eat {
            self.apply_eat(row);
        }
        self.apply_decay(row);
        self.npcs.get_mut(row).recompute_fitness();
        Ok(())
    }

    fn apply_move(&mut self, row: usize, direction: MoveDirection) {
        let (dx, dy) = direction.delta();
        if (dx, dy) == (0, 0) {
            return;
        }
        let npc = self.npcs.get(row);
        let (old_x, old_y) = (npc.x, npc.y);
        let (new_x, new_y) = (old_x + dx, old_y + dy);

        let in_bounds = new_x >= 0 && new_y >= 0 && (new_x as usize) < self.world.width() && (new_y as usize) < self.world.width();
        if !in_bounds || self.world.is_occupied(new_x, new_y) {
            return;
        }

        self.world.set_occupant(old_x, old_y, 0);
        self.world.set_occupant(new_x, new_y, 1);
        let npc = self.npcs.get_mut(row);
        npc.x = new_x;
        npc.y = new_y;
    }

    /// Own tile, then N, E, S, W in order; the first adjacent food tile
    /// found is consumed (`spec.md §4.K` step d "Eat").
    fn apply_eat(&mut self, row: usize) {
        let npc = self.npcs.get(row);
        let (x, y) = (npc.x, npc.y);
        let candidates = [(x, y), (x, y - 1), (x + 1, y), (x, y + 1), (x - 1, y)];

        for (cx, cy) in candidates {
            if TileWorld::kind(self.world.get(cx, cy)) == tile_type::FOOD {
                self.world.set_kind(cx, cy, tile_type::EMPTY);
                let npc = self.npcs.get_mut(row);
                npc.energy = (npc.energy + 30).min(MAX_ENERGY);
                npc.health = (npc.health + 5).min(MAX_HEALTH);
                npc.food_eaten += 1;
                npc.hunger = 0;
                return;
            }
        }
    }

    /// `spec.md §4.K` step e.
    fn apply_decay(&mut self, row: usize) {
        let npc = self.npcs.get_mut(row);
        if npc.energy > 0 {
            npc.energy -= 1;
        } else {
            npc.health = (npc.health - 5).max(0);
        }
        npc.age += 1;
        npc.hunger += 1;

        if npc.health == 0 {
            let (x, y) = (npc.x, npc.y);
            self.world.set_occupant(x, y, 0);
            self.npcs.kill(row);
        }
    }

    fn respawn_food(&mut self) {
        if let Some((x, y)) = random_empty_tile(&self.world, &mut self.lfsr) {
            self.world.set_kind(x, y, tile_type::FOOD);
        }
    }

    fn evolve(&mut self) -> GaEvolutionOutcome {
        let GaStats { reseeded, elite_fitness, .. } =
            ga::evolve(&mut self.genomes, self.npcs.rows(), &self.ga_config, &mut self.lfsr);

        for row in 0..self.npcs.len() {
            let npc = self.npcs.get(row);
            let (old_x, old_y) = (npc.x, npc.y);
            if !npc.is_empty() {
                self.world.set_occupant(old_x, old_y, 0);
            }
            let (x, y) = random_empty_tile(&self.world, &mut self.lfsr).unwrap_or((0, 0));
            let npc = self.npcs.get_mut(row);
            npc.id = (row + 1) as u32;
            npc.x = x;
            npc.y = y;
            npc.reset_for_new_generation();
            self.world.set_occupant(x, y, 1);
        }

        self.generation += 1;
        GaEvolutionOutcome { generation: self.generation, reseeded, elite_fitness }
    }
}

/// Uniformly random empty tile, or `None` if the world is full.
fn random_empty_tile(world: &TileWorld, lfsr: &mut Lfsr) -> Option<(i32, i32)> {
    let width = world.width() as i32;
    let empty: Vec<(i32, i32)> =
        iproduct!(0..width, 0..width).filter(|&(x, y)| !world.is_occupied(x, y)).collect();
    if empty.is_empty() {
        return None;
    }
    let idx = lfsr.next_below(empty.len() as u32) as usize;
    Some(empty[idx])
}
