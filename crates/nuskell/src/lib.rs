//! Compiles chemical reaction networks into domain-level DNA strand
//! displacement systems.
//!
//! A translation scheme is a small functional program that describes the
//! gates implementing each reaction. [`Compiler`] runs a scheme on a
//! [`Crn`](nk_domainlevel::Crn) and returns the resulting [`Implementation`].
//!
//! ```no_run
//! use nk_domainlevel::{Crn, Reaction};
//! use nuskell::Compiler;
//!
//! let crn = Crn::new(vec![Reaction::new(&["A", "B"], &["C"])]);
//! let compiler = Compiler::builtin("cardelli_2domain_fixed_noGC").unwrap();
//! let implementation = compiler.compile(&crn).unwrap();
//! println!("{implementation}");
//! ```
//!

pub mod ast;
pub mod builtins;
pub mod compiler;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod report;
pub mod scheme;
pub mod scope;
pub mod translator;
pub mod value;

pub use compiler::*;
pub use config::CompilerConfig;
pub use error::*;
pub use scheme::Scheme;
pub use translator::ReactionClass;
