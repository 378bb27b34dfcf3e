use nk_domainlevel::DomainError;
use nk_domainlevel::Reaction;
use thiserror::Error;

use crate::translator::ReactionClass;

/// Errors raised while evaluating a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Rows of a structure do not line up, or a complex is malformed.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("'{name}' expects {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unbound name '{0}'")]
    UnboundName(String),

    #[error("{target} has no attribute '{name}'")]
    UnknownAttribute { target: String, name: String },

    #[error("{0} of an empty list")]
    EmptyList(&'static str),

    #[error("index {index} is out of range for a list of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// The scheme has no gate for reactions of this shape.
    #[error("no translation for '{reaction}' ({reactants} reactants, {products} products)")]
    UnsupportedArity {
        reaction: String,
        reactants: usize,
        products: usize,
    },

    #[error("integer overflow in '{0}'")]
    IntegerOverflow(&'static str),

    #[error("recursion limit of {0} nested calls exceeded")]
    RecursionLimit(usize),

    #[error("while translating {class} reaction '{reaction}': {source}")]
    InReaction {
        reaction: String,
        class: ReactionClass,
        source: Box<EvalError>,
    },
}

impl EvalError {
    pub(crate) fn type_mismatch(context: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        EvalError::TypeMismatch {
            context: context.into(),
            expected,
            found,
        }
    }

    /// Attach the reaction being translated, unless already attached.
    pub(crate) fn in_reaction(self, reaction: &Reaction) -> Self {
        match self {
            EvalError::InReaction { .. } => self,
            source => {
                let (reactants, products) = reaction.arity();
                EvalError::InReaction {
                    reaction: reaction.to_string(),
                    class: ReactionClass::of(reactants, products),
                    source: Box::new(source),
                }
            }
        }
    }

    /// The error without any reaction context.
    pub fn root_cause(&self) -> &EvalError {
        match self {
            EvalError::InReaction { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<DomainError> for EvalError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ShapeMismatch(msg) => EvalError::ShapeMismatch(msg),
            DomainError::UnknownDomain(name) => EvalError::UnboundName(name),
            other => EvalError::ShapeMismatch(other.to_string()),
        }
    }
}

/// Errors of the public compiler API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemeError {
    #[error("cannot parse scheme '{scheme}':\n{report}")]
    Parse { scheme: String, report: String },

    #[error("unknown built-in scheme '{0}'")]
    UnknownScheme(String),

    #[error("scheme '{scheme}' declares no {kind} named '{name}'")]
    MissingDeclaration {
        scheme: String,
        kind: &'static str,
        name: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot serialize to JSON: {0}")]
    Serialize(String),

    /// The evaluation thread could not be started.
    #[error("cannot start evaluation thread: {0}")]
    Thread(String),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
