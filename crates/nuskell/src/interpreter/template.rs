use std::rc::Rc;

use nk_domainlevel::Segment;
use nk_domainlevel::Structure;
use nk_structure::DotBracket;
use nk_structure::DotBracketVec;

use super::Interpreter;
use crate::ast::SequenceItem;
use crate::ast::StructureLiteral;
use crate::error::EvalError;
use crate::scope::Scope;
use crate::value::Value;

impl Interpreter<'_> {
    /// Instantiates a structure literal in the current scope.
    ///
    /// A name bound to a domain fills one position, `x*` its complement.
    /// Under `~`, a name may instead be bound to a structure, an instance or
    /// a list of those, which is spliced in place. A domain under `~` keeps
    /// the flexible symbol.
    pub(super) fn structure_literal(&self, literal: &StructureLiteral, scope: &Scope<'_>) -> Result<Value, EvalError> {
        if literal.sequence.len() != literal.structure.len() {
            return Err(EvalError::ShapeMismatch(format!(
                "literal has {} sequence items but {} structure symbols",
                literal.sequence.len(),
                literal.structure.len()
            )));
        }

        let mut sequence = Vec::with_capacity(literal.sequence.len());
        let mut structure = DotBracketVec::default();
        for (item, &symbol) in literal.sequence.iter().zip(&literal.structure) {
            match item {
                SequenceItem::Break => {
                    sequence.push(Segment::Break);
                    structure.push(symbol);
                }
                SequenceItem::Wildcard => {
                    sequence.push(Segment::Wildcard);
                    structure.push(symbol);
                }
                SequenceItem::Name { name, complement } => match self.lookup(name, scope)? {
                    Value::Domain(domain) => {
                        let domain = if *complement {
                            self.complement(&domain)?
                        } else {
                            domain
                        };
                        sequence.push(Segment::Domain(domain));
                        structure.push(symbol);
                    }
                    value if symbol == DotBracket::Flexible && !complement => {
                        splice(&value, &mut sequence, &mut structure)?;
                    }
                    value => {
                        let expected = if symbol == DotBracket::Flexible { "structure" } else { "domain" };
                        return Err(EvalError::type_mismatch(
                            format!("structure literal at '{name}'"),
                            expected,
                            value.type_name(),
                        ));
                    }
                },
            }
        }
        Ok(Value::Structure(Rc::new(Structure::new(sequence, structure)?)))
    }
}

fn splice(value: &Value, sequence: &mut Vec<Segment>, structure: &mut DotBracketVec) -> Result<(), EvalError> {
    if let Value::List(items) = value {
        return items.iter().try_for_each(|item| splice(item, sequence, structure));
    }
    match value.as_structure() {
        Some(s) => {
            sequence.extend(s.sequence().iter().cloned());
            structure.extend(s.structure().iter().copied());
            Ok(())
        }
        None => Err(EvalError::type_mismatch("splice", "structure", value.type_name())),
    }
}
