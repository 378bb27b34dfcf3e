//! The nk_domainlevel crate.
//!
//! Provides the domain-level representations used by the nuskell compiler:
//!  - Domains (and the registry allocating them)
//!  - Structures, Complexes and Solutions
//!  - Strands
//!  - Reactions and CRNs
//!

mod error;
mod representations;

pub use error::*;
pub use representations::*;
