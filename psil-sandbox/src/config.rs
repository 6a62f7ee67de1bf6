//! Sandbox-wide tunables, grouped the way the teacher groups consensus
//! parameters rather than scattered as module-level `const`s — see
//! `fuel-tx::ConsensusParameters`.

use psil_vm::VmConfig;

/// Sizing and timing knobs for one sandbox run (`spec.md §3`, §4.I, §4.K).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SandboxConfig {
    /// World width and height (the world is square, `W x W`).
    pub world_size: usize,
    /// Fixed number of NPC table rows.
    pub max_npcs: usize,
    /// Per-brain-invocation gas budget (`spec.md §4.K` step 1.b).
    pub gas_limit: u32,
    /// Number of ticks one simulation runs.
    pub tick_max: u32,
    /// Run the genetic algorithm every this many ticks; a power of two
    /// (`spec.md §4.K` step 3).
    pub evolve_every: u32,
    /// Fixed genome length in bytes the bank stores per NPC (`spec.md §6`'s
    /// "64-byte budget per genome").
    pub genome_len: usize,
    /// Per-brain VM sizing, reused unmodified from `psil-vm`.
    pub vm: VmConfig,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        use default_parameters::*;
        Self {
            world_size: WORLD_SIZE,
            max_npcs: MAX_NPCS,
            gas_limit: GAS_LIMIT,
            tick_max: TICK_MAX,
            evolve_every: EVOLVE_EVERY,
            genome_len: GENOME_LEN,
            vm: VmConfig { stack_capacity: 64, memory_slots: 256, max_gas: GAS_LIMIT },
        }
    }
}

/// Defaults implied by `spec.md`'s worked examples and size budget.
pub mod default_parameters {
    pub const WORLD_SIZE: usize = 16;
    pub const MAX_NPCS: usize = 64;
    pub const GAS_LIMIT: u32 = 512;
    pub const TICK_MAX: u32 = 10_000;
    pub const EVOLVE_EVERY: u32 = 256;
    pub const GENOME_LEN: usize = 64;
}

/// How the genetic algorithm recombines parent genomes (`spec.md §4.L`,
/// crossover is named optional there).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossoverMode {
    /// Point-mutation-only, the primary description in `spec.md §4.L` step 3.
    #[default]
    None,
    /// One-point splice at a random byte boundary: prefix from parent A,
    /// suffix from parent B.
    OnePoint,
}

/// Genetic algorithm tunables (`spec.md §4.L`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Per-byte point mutation probability.
    pub p_mut: f64,
    /// How parent genomes are recombined before mutation.
    pub crossover: CrossoverMode,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self { p_mut: 0.01, crossover: CrossoverMode::None }
    }
}
