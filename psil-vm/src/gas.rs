//! Gas metering (`spec.md §4.G`).
//!
//! Every opcode, including no-ops, decrements the gas counter by one.
//! Reaching zero is a clean halt, never a fault — brains routinely hit
//! this, and the scheduler relies on it to bound every tick's work.

/// `max_gas = 0` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasMeter {
    remaining: u32,
    max_gas: u32,
}

impl GasMeter {
    pub fn new(max_gas: u32) -> Self {
        Self { remaining: max_gas, max_gas }
    }

    /// True if no gas remains and the limit isn't unlimited.
    pub fn is_exhausted(&self) -> bool {
        self.max_gas != 0 && self.remaining == 0
    }

    /// Charge one unit for the instruction about to be executed. Call this
    /// only once `is_exhausted` has been checked and found false.
    pub fn consume(&mut self) {
        if self.max_gas != 0 {
            self.remaining = self.remaining.saturating_sub(1);
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn reset(&mut self) {
        self.remaining = self.max_gas;
    }
}
