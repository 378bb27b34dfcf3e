//! Runtime values of the scheme language.

use std::fmt;
use std::rc::Rc;

use itertools::Itertools;
use nk_domainlevel::DomainRef;
use nk_domainlevel::Reaction;
use nk_domainlevel::Solution;
use nk_domainlevel::Structure;

use crate::builtins::Builtin;
use crate::error::EvalError;
use crate::translator::ReactionClass;

#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    /// A species name, as handed to the `formal` class.
    Text(Rc<str>),
    Domain(DomainRef),
    Structure(Rc<Structure>),
    Instance(Rc<Instance>),
    List(Rc<Vec<Value>>),
    Function(Callable),
    Reaction(Rc<ReactionValue>),
    Solution(Rc<Solution>),
}

/// A function value: declared in a scheme or provided natively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callable {
    Declared(Rc<str>),
    Builtin(Builtin),
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Declared(name) => write!(f, "{name}"),
            Callable::Builtin(b) => write!(f, "{}", b.name()),
        }
    }
}

/// The result of a `class` whose body is a structure.
///
/// The attributes are the top-level `where` bindings of the class body, in
/// binding order. Later bindings shadow earlier ones.
#[derive(Debug, Clone)]
pub struct Instance {
    pub class: String,
    pub structure: Rc<Structure>,
    pub attributes: Vec<(String, Value)>,
}

impl Instance {
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.iter().rev().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// A reaction as seen by a scheme: reactants and products are species.
#[derive(Debug, Clone)]
pub struct ReactionValue {
    pub reaction: Reaction,
    pub reactants: Vec<Value>,
    pub products: Vec<Value>,
}

impl ReactionValue {
    pub fn class(&self) -> ReactionClass {
        let (reactants, products) = self.reaction.arity();
        ReactionClass::of(reactants, products)
    }

    /// The irreversible reactions this reaction stands for.
    pub fn irreversible(&self) -> Vec<ReactionValue> {
        if !self.reaction.is_reversible() {
            return vec![self.clone()];
        }
        let mut reactions = self.reaction.irreversible().into_iter();
        match (reactions.next(), reactions.next()) {
            (Some(forward), Some(backward)) => vec![
                ReactionValue {
                    reaction: forward,
                    reactants: self.reactants.clone(),
                    products: self.products.clone(),
                },
                ReactionValue {
                    reaction: backward,
                    reactants: self.products.clone(),
                    products: self.reactants.clone(),
                },
            ],
            _ => vec![self.clone()],
        }
    }
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Text(_) => "name",
            Value::Domain(_) => "domain",
            Value::Structure(_) => "structure",
            Value::Instance(_) => "instance",
            Value::List(_) => "list",
            Value::Function(_) => "function",
            Value::Reaction(_) => "reaction",
            Value::Solution(_) => "solution",
        }
    }

    pub fn as_int(&self, context: &str) -> Result<i64, EvalError> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(EvalError::type_mismatch(context, "integer", other.type_name())),
        }
    }

    pub fn as_bool(&self, context: &str) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(EvalError::type_mismatch(context, "boolean", other.type_name())),
        }
    }

    pub fn as_list(&self, context: &str) -> Result<&[Value], EvalError> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(EvalError::type_mismatch(context, "list", other.type_name())),
        }
    }

    /// The structure of a structure value or class instance.
    pub fn as_structure(&self) -> Option<&Rc<Structure>> {
        match self {
            Value::Structure(s) => Some(s),
            Value::Instance(i) => Some(&i.structure),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Domain(a), Value::Domain(b)) => a == b,
            (Value::Structure(a), Value::Structure(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => {
                Rc::ptr_eq(a, b) || (a.class == b.class && a.structure == b.structure)
            }
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Reaction(a), Value::Reaction(b)) => a.reaction == b.reaction,
            (Value::Solution(a), Value::Solution(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Domain(d) => write!(f, "{d}"),
            Value::Structure(s) => write!(f, "{s}"),
            Value::Instance(i) => write!(f, "{}<{}>", i.class, i.structure),
            Value::List(items) => write!(f, "[{}]", items.iter().join(", ")),
            Value::Function(c) => write!(f, "<function {c}>"),
            Value::Reaction(r) => write!(f, "{}", r.reaction),
            Value::Solution(s) => write!(f, "{{{}}}", s.iter().join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nk_domainlevel::DomainRegistry;
    use nk_domainlevel::Segment;
    use nk_structure::DotBracketVec;

    #[test]
    fn test_equality() {
        assert_eq!(Value::Int(3), Value::Int(3));
        assert_ne!(Value::Int(3), Value::Bool(true));
        assert_eq!(
            Value::list(vec![Value::Int(1), Value::Text("A".into())]),
            Value::list(vec![Value::Int(1), Value::Text("A".into())]),
        );

        let mut registry = DomainRegistry::new();
        let d = registry.fresh_long();
        let s = Rc::new(Structure::new(
            vec![Segment::Domain(d.clone())],
            DotBracketVec::try_from(".").unwrap(),
        ).unwrap());
        let a = Value::Instance(Rc::new(Instance {
            class: "formal".to_string(),
            structure: s.clone(),
            attributes: vec![("x".to_string(), Value::Domain(d))],
        }));
        assert_eq!(a, a.clone());
        assert_ne!(a, Value::Structure(s.clone()));
        assert_eq!(a.as_structure(), Some(&s));
        assert_eq!(a.to_string(), "formal<d0>");
    }

    #[test]
    fn test_reversible_split() {
        let r = ReactionValue {
            reaction: Reaction::reversible(&["A"], &["B", "C"]),
            reactants: vec![Value::Text("A".into())],
            products: vec![Value::Text("B".into()), Value::Text("C".into())],
        };
        let split = r.irreversible();
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].class(), ReactionClass::OneInput);
        assert_eq!(split[1].class(), ReactionClass::TwoInput);
        assert_eq!(split[1].reactants.len(), 2);
        assert_eq!(split[1].reaction.to_string(), "B + C -> A");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::Int(2).as_int("test"), Ok(2));
        assert!(matches!(
            Value::Bool(true).as_list("len"),
            Err(EvalError::TypeMismatch { expected: "list", found: "boolean", .. })
        ));
    }
}
