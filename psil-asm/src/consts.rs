//! Instruction encoding ranges and well-known constants.
//!
//! See the first-byte classification table: each range of the opcode space
//! carries its own instruction length, independent of what the opcode
//! actually does.

/// A stack word is a 16-bit two's complement integer.
pub type Word = i16;

/// Highest command opcode (`nop` .. `clear`), one-byte, dispatch-table class.
pub const CMD_MAX: u8 = 0x1F;

/// Base of the "push small number" class; `n = op - PUSH_SMALL_BASE`.
pub const PUSH_SMALL_BASE: u8 = 0x20;
pub const PUSH_SMALL_MAX: u8 = 0x3F;

/// Base of the "push inline symbol slot" class; `s = op - PUSH_SLOT_BASE`.
pub const PUSH_SLOT_BASE: u8 = 0x40;
pub const PUSH_SLOT_MAX: u8 = 0x5F;

/// Base of the "push quotation reference" class; `index = op - PUSH_QUOT_BASE`.
pub const PUSH_QUOT_BASE: u8 = 0x60;
pub const PUSH_QUOT_MAX: u8 = 0x7F;

/// Extended opcodes with one immediate byte (2-byte instructions).
pub const EXT1_MIN: u8 = 0x80;
pub const EXT1_MAX: u8 = 0xBF;

/// Extended opcodes with two immediate bytes (3-byte instructions).
pub const EXT2_MIN: u8 = 0xC0;
pub const EXT2_MAX: u8 = 0xDF;

/// Reserved range, declared but unused; the decoder skips it as a no-op.
/// `spec.md` leaves the exact skip width to the implementer for this range;
/// this implementation treats it as one byte (see SPEC_FULL.md's resolution
/// of the corresponding Open Question).
pub const RESERVED_MIN: u8 = 0xE0;
pub const RESERVED_MAX: u8 = 0xEF;

/// Normal termination of `run`.
pub const OP_HALT: u8 = 0xF0;
/// End-of-program sentinel; behaves like `OP_HALT`.
pub const OP_END: u8 = 0xFF;

/// High bit tagging a stack word as a quotation reference.
pub const QUOTATION_TAG: u16 = 0x8000;

/// Maximum number of quotations addressable by the one-byte push-quotation
/// opcode and the quotation table header.
pub const MAX_QUOTATIONS: usize = 32;

/// Base slot for the `local.load` / `local.store` extended opcodes; their
/// immediate byte is an offset added to this base.
pub const LOCAL_BASE: u8 = 64;

/// Stack entries hold either a byte or a word; the tag lets generic ops like
/// `dup`/`drop`/`swap` operate without knowing the element width.
pub const SIZE_BYTE: u8 = 1;
pub const SIZE_WORD: u8 = 2;

/// Call-builtin immediate values understood by the extended `call` opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[non_exhaustive]
pub enum Builtin {
    Newline = 0,
    Space = 1,
    Chr = 2,
    Abs = 3,
    Min = 4,
    Max = 5,
}

impl Builtin {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Self::Newline),
            1 => Some(Self::Space),
            2 => Some(Self::Chr),
            3 => Some(Self::Abs),
            4 => Some(Self::Min),
            5 => Some(Self::Max),
            _ => None,
        }
    }
}
