//! The abstract output port (`spec.md §6`): the VM emits bytes, the host
//! decides what a sink does with them. No framing is assumed.

/// A sink instructions like `print` write bytes to.
pub trait OutputSink {
    fn emit(&mut self, byte: u8);

    fn emit_all(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.emit(b);
        }
    }
}

impl OutputSink for Vec<u8> {
    fn emit(&mut self, byte: u8) {
        self.push(byte);
    }
}

/// A sink that discards everything, for brains whose output nobody reads
/// (the NPC scheduler, for instance — `spec.md §4.K` never reads VM
/// output).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _byte: u8) {}
}
