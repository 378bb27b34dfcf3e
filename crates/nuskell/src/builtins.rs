//! Natively implemented scheme functions and the overloaded `+`.

use std::rc::Rc;

use log::trace;
use nk_domainlevel::Complex;
use nk_domainlevel::DomainKind;
use nk_domainlevel::Solution;

use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Short,
    Long,
    Len,
    Tail,
    Reverse,
    Map,
    Flip,
    Sum,
    Infty,
    IrrevReactions,
}

impl Builtin {
    pub const ALL: [Builtin; 10] = [
        Builtin::Short,
        Builtin::Long,
        Builtin::Len,
        Builtin::Tail,
        Builtin::Reverse,
        Builtin::Map,
        Builtin::Flip,
        Builtin::Sum,
        Builtin::Infty,
        Builtin::IrrevReactions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Short => "short",
            Builtin::Long => "long",
            Builtin::Len => "len",
            Builtin::Tail => "tail",
            Builtin::Reverse => "reverse",
            Builtin::Map => "map",
            Builtin::Flip => "flip",
            Builtin::Sum => "sum",
            Builtin::Infty => "infty",
            Builtin::IrrevReactions => "irrev_reactions",
        }
    }

    pub fn from_name(name: &str) -> Option<Builtin> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn arity(&self) -> usize {
        match self {
            Builtin::Short | Builtin::Long => 0,
            Builtin::Map | Builtin::Flip => 2,
            _ => 1,
        }
    }
}

/// Applies a native function. Argument counts have been checked by the caller.
pub(crate) fn call(interp: &mut Interpreter<'_>, builtin: Builtin, args: Vec<Value>) -> Result<Value, EvalError> {
    let name = builtin.name();
    match (builtin, args.as_slice()) {
        (Builtin::Short, []) => Ok(Value::Domain(interp.fresh_domain(DomainKind::Short))),
        (Builtin::Long, []) => Ok(Value::Domain(interp.fresh_domain(DomainKind::Long))),
        (Builtin::Len, [list]) => {
            let len = list.as_list(name)?.len();
            Ok(Value::Int(len as i64))
        }
        (Builtin::Tail, [list]) => match list.as_list(name)? {
            [] => Err(EvalError::EmptyList("tail")),
            [_, rest @ ..] => Ok(Value::list(rest.to_vec())),
        },
        (Builtin::Reverse, [list]) => {
            let items = list.as_list(name)?;
            Ok(Value::list(items.iter().rev().cloned().collect()))
        }
        (Builtin::Map, [f, list]) => {
            let items = list.as_list(name)?;
            let mut mapped = Vec::with_capacity(items.len());
            for item in items {
                mapped.push(interp.apply(f, vec![item.clone()])?);
            }
            Ok(Value::list(mapped))
        }
        (Builtin::Flip, [list, k]) => flip(list.as_list(name)?, k.as_int(name)?),
        (Builtin::Sum, [list]) => {
            let mut items = list.as_list(name)?.iter();
            let Some(first) = items.next() else {
                return Ok(Value::Solution(Rc::new(Solution::new())));
            };
            items.try_fold(first.clone(), |acc, item| add(&acc, item))
        }
        (Builtin::Infty, [x]) => infty(x),
        (Builtin::IrrevReactions, [list]) => {
            let mut reactions = Vec::new();
            for item in list.as_list(name)? {
                match item {
                    Value::Reaction(r) => reactions.extend(
                        r.irreversible().into_iter().map(|r| Value::Reaction(Rc::new(r))),
                    ),
                    other => {
                        return Err(EvalError::type_mismatch(name, "reaction", other.type_name()));
                    }
                }
            }
            Ok(Value::list(reactions))
        }
        (_, args) => Err(EvalError::ArityMismatch {
            name: name.to_string(),
            expected: builtin.arity(),
            found: args.len(),
        }),
    }
}

/// Transposes a list of `k`-tuples into `k` lists.
fn flip(tuples: &[Value], k: i64) -> Result<Value, EvalError> {
    let width = usize::try_from(k)
        .map_err(|_| EvalError::type_mismatch("flip", "non-negative integer", "negative integer"))?;
    let mut columns = vec![Vec::with_capacity(tuples.len()); width];
    for tuple in tuples {
        let items = tuple.as_list("flip")?;
        if items.len() != width {
            return Err(EvalError::ArityMismatch {
                name: "flip".to_string(),
                expected: width,
                found: items.len(),
            });
        }
        for (column, item) in columns.iter_mut().zip(items) {
            column.push(item.clone());
        }
    }
    Ok(Value::list(columns.into_iter().map(Value::list).collect()))
}

/// A solution holding `x` in unbounded supply.
fn infty(x: &Value) -> Result<Value, EvalError> {
    let solution = match x {
        Value::Solution(s) => s.iter().map(Complex::to_unbounded).collect(),
        other => match other.as_structure() {
            Some(structure) => Solution::from(Complex::unbounded(structure.as_ref().clone())?),
            None => return Err(EvalError::type_mismatch("infty", "structure", other.type_name())),
        },
    };
    trace!("infty: {} unbounded complexes", solution.len());
    Ok(Value::Solution(Rc::new(solution)))
}

/// The `+` operator.
pub(crate) fn add(lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(*b)
            .map(Value::Int)
            .ok_or(EvalError::IntegerOverflow("+")),
        (Value::List(a), Value::List(b)) => {
            let mut items = Vec::with_capacity(a.len() + b.len());
            items.extend(a.iter().cloned());
            items.extend(b.iter().cloned());
            Ok(Value::list(items))
        }
        (Value::Solution(a), Value::Solution(b)) => Ok(Value::Solution(Rc::new(a.union(b)))),
        _ => match (lhs.as_structure(), rhs.as_structure()) {
            (Some(a), Some(b)) => Ok(Value::Structure(Rc::new(a.concat(b)))),
            _ => Err(EvalError::TypeMismatch {
                context: "'+'".to_string(),
                expected: lhs.type_name(),
                found: rhs.type_name(),
            }),
        },
    }
}
