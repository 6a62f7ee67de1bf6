//! The NPC sandbox: a tile world of PSIL-brained agents evolved by a
//! genetic algorithm.
//!
//! Each NPC's behaviour is governed by a genome — a PSIL bytecode program
//! run fresh each tick through [`psil_vm::Interpreter`] — sensed and acted
//! on through the Ring0/Ring1 bridge. Fitness accrues from survival and
//! foraging; every few ticks the population is evolved via tournament
//! selection with elitism.

#![deny(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod error;
pub mod ga;
pub mod genome;
pub mod lfsr;
pub mod npc;
pub mod scheduler;
pub mod tile;

#[cfg(feature = "serde")]
pub mod snapshot;

pub use config::{CrossoverMode, GaConfig, SandboxConfig};
pub use error::SchedulerFault;
pub use ga::{evolve, GaStats};
pub use lfsr::Lfsr;
pub use scheduler::{GaEvolutionOutcome, Scheduler, TickStats};

#[cfg(feature = "serde")]
pub use snapshot::Snapshot;
