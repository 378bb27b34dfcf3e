//! Classification of reactions for translation.
//!
//! Which gate a scheme builds for a reaction is decided by the scheme's own
//! `reaction` module. The class computed here mirrors the usual dispatch of
//! those modules and is attached to log records and errors, so a failing
//! translation names the kind of gate that was attempted.
//!

use std::fmt;
use std::rc::Rc;

use log::debug;
use nk_domainlevel::Reaction;

use crate::error::EvalError;
use crate::value::ReactionValue;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionClass {
    /// Neither reactants nor products.
    Unclassified,
    /// `-> P`: products appear from a synthesized signal.
    ZeroReactant,
    /// `R ->`: reactants are consumed without output.
    ZeroProduct,
    OneInput,
    TwoInput,
    /// Three or more reactants.
    MultiInput,
}

impl ReactionClass {
    pub fn of(reactants: usize, products: usize) -> Self {
        match (reactants, products) {
            (0, 0) => ReactionClass::Unclassified,
            (_, 0) => ReactionClass::ZeroProduct,
            (0, _) => ReactionClass::ZeroReactant,
            (1, _) => ReactionClass::OneInput,
            (2, _) => ReactionClass::TwoInput,
            _ => ReactionClass::MultiInput,
        }
    }

    pub fn of_reaction(reaction: &Reaction) -> Self {
        let (reactants, products) = reaction.arity();
        Self::of(reactants, products)
    }
}

impl fmt::Display for ReactionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReactionClass::Unclassified => "unclassified",
            ReactionClass::ZeroReactant => "zero-reactant",
            ReactionClass::ZeroProduct => "zero-product",
            ReactionClass::OneInput => "one-input",
            ReactionClass::TwoInput => "two-input",
            ReactionClass::MultiInput => "multi-input",
        };
        write!(f, "{s}")
    }
}

/// The reaction a module is called with, if any of its arguments is one.
pub(crate) fn reaction_argument(args: &[Value]) -> Option<&Rc<ReactionValue>> {
    args.iter().find_map(|a| match a {
        Value::Reaction(r) => Some(r),
        _ => None,
    })
}

/// Runs the translation of one reaction, attaching the reaction to errors.
pub(crate) fn translate<F>(module: &str, reaction: &ReactionValue, run: F) -> Result<Value, EvalError>
where
    F: FnOnce() -> Result<Value, EvalError>,
{
    debug!("{} translates {} reaction '{}'", module, reaction.class(), reaction.reaction);
    run().map_err(|err| {
        debug!("translation of '{}' failed: {}", reaction.reaction, err);
        err.in_reaction(&reaction.reaction)
    })
}

/// Error for a scheme that treats a reaction as something it is not, e.g.
/// a fallback branch indexing into it.
pub(crate) fn unsupported(reaction: &ReactionValue) -> EvalError {
    let (reactants, products) = reaction.reaction.arity();
    EvalError::UnsupportedArity {
        reaction: reaction.reaction.to_string(),
        reactants,
        products,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(ReactionClass::of(0, 0), ReactionClass::Unclassified);
        assert_eq!(ReactionClass::of(0, 1), ReactionClass::ZeroReactant);
        assert_eq!(ReactionClass::of(2, 0), ReactionClass::ZeroProduct);
        assert_eq!(ReactionClass::of(1, 0), ReactionClass::ZeroProduct);
        assert_eq!(ReactionClass::of(1, 2), ReactionClass::OneInput);
        assert_eq!(ReactionClass::of(2, 1), ReactionClass::TwoInput);
        assert_eq!(ReactionClass::of(3, 1), ReactionClass::MultiInput);
        let r = Reaction::new(&["A", "B"], &["C"]);
        assert_eq!(ReactionClass::of_reaction(&r).to_string(), "two-input");
    }

    #[test]
    fn test_translate_wraps_errors() {
        let reaction = ReactionValue {
            reaction: Reaction::new(&["A", "B", "C"], &["D"]),
            reactants: vec![],
            products: vec![],
        };
        let err = translate("reaction", &reaction, || Err(unsupported(&reaction))).unwrap_err();
        let EvalError::InReaction { reaction: text, class, source } = err else { panic!() };
        assert_eq!(text, "A + B + C -> D");
        assert_eq!(class, ReactionClass::MultiInput);
        assert!(matches!(*source, EvalError::UnsupportedArity { reactants: 3, products: 1, .. }));

        let ok = translate("reaction", &reaction, || Ok(Value::Int(1))).unwrap();
        assert_eq!(ok, Value::Int(1));

        let args = vec![Value::Int(0), Value::Reaction(Rc::new(reaction.clone()))];
        assert!(reaction_argument(&args).is_some());
        assert!(reaction_argument(&args[..1]).is_none());
    }
}
