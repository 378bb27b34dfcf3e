//! Parsed translation schemes.
//!
//! Two schemes from the literature ship with the crate and can be loaded by
//! name with [`Scheme::builtin`]. Every scheme is evaluated on top of a small
//! prelude of helper functions written in the scheme language itself.
//!

use chumsky::prelude::*;
use log::debug;
use once_cell::sync::Lazy;

use crate::ast::Declaration;
use crate::ast::FunctionDecl;
use crate::ast::GlobalDecl;
use crate::error::SchemeError;
use crate::lexer::Span;
use crate::lexer::lexer;
use crate::parser::parser;
use crate::report::render_errors;

const BUILTIN_SCHEMES: [(&str, &str); 2] = [
    ("cardelli2011_NM_noGC", include_str!("../schemes/cardelli2011_NM_noGC.ts")),
    ("cardelli_2domain_fixed_noGC", include_str!("../schemes/cardelli_2domain_fixed_noGC.ts")),
];

static PRELUDE: Lazy<Result<Scheme, SchemeError>> =
    Lazy::new(|| Scheme::parse("prelude", include_str!("../schemes/prelude.ts")));

#[derive(Debug, Clone, PartialEq)]
pub struct Scheme {
    name: String,
    declarations: Vec<Declaration>,
}

impl Scheme {
    /// Parses scheme source. Lexer and parser errors are rendered into the
    /// returned [`SchemeError::Parse`].
    pub fn parse(name: &str, source: &str) -> Result<Self, SchemeError> {
        let (tokens, errors) = lexer().parse(source).into_output_errors();
        let Some(tokens) = tokens.filter(|_| errors.is_empty()) else {
            return Err(SchemeError::Parse {
                scheme: name.to_string(),
                report: render_errors(errors, name, source),
            });
        };

        let eoi: Span = (source.len()..source.len()).into();
        let (declarations, errors) = parser()
            .parse(tokens.map(eoi, |(token, span)| (token, span)))
            .into_output_errors();
        let Some(declarations) = declarations.filter(|_| errors.is_empty()) else {
            return Err(SchemeError::Parse {
                scheme: name.to_string(),
                report: render_errors(errors, name, source),
            });
        };

        debug!("parsed scheme '{}' with {} declarations", name, declarations.len());
        Ok(Self {
            name: name.to_string(),
            declarations,
        })
    }

    /// Loads one of the schemes shipped with this crate.
    pub fn builtin(name: &str) -> Result<Self, SchemeError> {
        BUILTIN_SCHEMES
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| SchemeError::UnknownScheme(name.to_string()))
            .and_then(|(n, source)| Self::parse(n, source))
    }

    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_SCHEMES.iter().map(|(n, _)| *n)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn globals(&self) -> impl Iterator<Item = &GlobalDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Global(g) => Some(g),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Function(f) => Some(f),
            _ => None,
        })
    }

    /// The last declaration of that name; later declarations shadow earlier ones.
    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions().filter(|f| f.name == name).last()
    }
}

/// Helper functions evaluated before every scheme.
pub fn prelude() -> Result<&'static Scheme, SchemeError> {
    PRELUDE.as_ref().map_err(Clone::clone)
}
