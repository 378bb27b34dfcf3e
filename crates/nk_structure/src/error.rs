use thiserror::Error;

/// Errors raised while reading or pairing dot-bracket structures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("unexpected character '{0}' in structure")]
    InvalidChar(char),

    #[error("unmatched ')' at position {0}")]
    UnmatchedClose(usize),

    #[error("unmatched '(' at position {0}")]
    UnmatchedOpen(usize),

    #[error("structure of length {0} exceeds the index range")]
    TooLong(usize),
}
