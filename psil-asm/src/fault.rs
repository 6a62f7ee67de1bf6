//! Load-time faults. Decoding a fetched instruction never fails (see
//! [`crate::instruction::fetch`]); the only thing that can be malformed is
//! the quotation table header a program may be prefixed with.

/// Quotation header parse failure (`spec.md §4.D`, step 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeaderFault {
    /// `n > 32`: declares more quotations than the table can hold.
    #[error("quotation header declares {0} entries, more than the 32 allowed")]
    TooManyQuotations(u8),
    /// The header claims more length bytes than remain in the program.
    #[error("quotation header truncated: expected {expected} length bytes, found {found}")]
    TruncatedLengths { expected: usize, found: usize },
}
