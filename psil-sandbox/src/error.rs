//! Scheduler-level faults (`spec.md §7` "Propagation policy"): caught per
//! NPC, logged, and never allowed to abort the whole simulation.

use thiserror::Error;

/// Something that went wrong running one NPC's brain this tick.
#[derive(Debug, Error)]
pub enum SchedulerFault {
    /// The genome's quotation header (if any) was malformed at load time.
    #[error("genome failed to load: {0}")]
    LoadFault(#[from] psil_vm::LoadFault),
    /// The VM reported a genuine fault (stack under/overflow) while running
    /// this NPC's brain.
    #[error("brain faulted during execution")]
    BrainFault,
}
