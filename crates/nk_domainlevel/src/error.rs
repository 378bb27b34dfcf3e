use nk_structure::StructureError;
use thiserror::Error;

/// Errors of the domain-level representations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A domain name was not found in the registry.
    #[error("unknown domain '{0}'")]
    UnknownDomain(String),

    /// Sequence and structure rows do not line up.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Two paired positions do not hold complementary domains.
    #[error("positions {i} ({left}) and {j} ({right}) are paired but not complementary")]
    PairMismatch {
        i: usize,
        j: usize,
        left: String,
        right: String,
    },

    /// Some strand shares no base pair path with the first strand.
    #[error("strand {strand} of '{complex}' is not connected to the rest of the complex")]
    Disconnected { strand: usize, complex: String },

    #[error(transparent)]
    Structure(#[from] StructureError),
}
