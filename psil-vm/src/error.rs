//! Fault taxonomy and halt codes (`spec.md §6`, §7).
//!
//! Most "error-like" conditions a mutated genome can trigger are defined to
//! a safe value rather than a fault (divide by zero, invalid quotation
//! index, out-of-range slot, unknown opcode) — see `spec.md §7`/§9. What's
//! left as a real fault is a genuine resource-shape violation: stack
//! under/overflow, and a malformed quotation header at load time.

use crate::stack::StackFault;
use thiserror::Error;

/// A fault that can only occur at program load, before any instruction
/// runs (`spec.md §4.D`).
pub type LoadFault = psil_asm::HeaderFault;

/// Why `run` (or a nested `invoke`) stopped. `Halted`, `EndOfProgram`, and
/// `Ret` are deliberately indistinguishable to callers beyond this enum's
/// shape — `spec.md §6` treats them as one category ("clean termination").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// Reached a halt opcode (`0xF0`).
    Halted,
    /// Ran off the end of the program (`0xFF` or past the last byte).
    EndOfProgram,
    /// A `ret` terminated the current quotation invocation.
    Ret,
    /// Gas reached zero; not a fault.
    GasExhausted,
    /// A genuine fault: stack under/overflow or a malformed quotation
    /// header. `InvalidOpcode` is part of the contracted interface
    /// (`spec.md §6`) for implementations that choose to fault on unknown
    /// opcodes; this VM instead treats them as no-ops (`spec.md §9`), so
    /// that variant is never constructed here.
    Fault(Fault),
}

impl Halt {
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    /// Whether the current fetch-decode-execute loop should keep running
    /// after reaching this state.
    pub fn should_continue(&self) -> bool {
        false
    }
}

/// The fault kinds named in `spec.md §6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("stack underflow")]
    StackUnderflow,
    #[error("stack overflow")]
    StackOverflow,
    /// Reserved for implementations that fault on unknown opcodes; this one
    /// never constructs it (see [`Halt::Fault`]).
    #[error("invalid opcode")]
    InvalidOpcode,
    #[error("invalid quotation header")]
    InvalidQuotationHeader,
}

impl From<StackFault> for Fault {
    fn from(e: StackFault) -> Self {
        match e {
            StackFault::Underflow => Fault::StackUnderflow,
            StackFault::Overflow { .. } => Fault::StackOverflow,
        }
    }
}
