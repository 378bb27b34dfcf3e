//! The nk_structure crate.
//!
//! Domain-level secondary structure representations:
//!  - dot-bracket symbols (including strand breaks and flexible positions)
//!  - pair tables over multi-stranded complexes
//!

mod error;
mod dotbracket;
mod pair_table;

pub use error::*;
pub use dotbracket::*;
pub use pair_table::*;

/// Nucleic Acid INdeX: we use `u16` (0 to 65k), which is plenty for
/// domain-level complexes, where every index is a domain, not a nucleotide.
pub type NAIDX = u16;
