//! Evaluation of scheme declarations.
//!
//! An [`Interpreter`] lives for one compilation pass. It owns the domain
//! registry of that pass, the evaluated globals, and a name table of all
//! declared functions. Function bodies only see their parameters, the
//! globals and other functions, never the locals of their caller.
//!

mod template;

use std::rc::Rc;

use ahash::AHashMap;
use itertools::Itertools;
use log::trace;
use nk_domainlevel::DomainKind;
use nk_domainlevel::DomainRef;
use nk_domainlevel::DomainRegistry;
use nk_domainlevel::Solution;

use crate::ast::BinaryOp;
use crate::ast::Binding;
use crate::ast::DeclKind;
use crate::ast::Expr;
use crate::ast::FunctionDecl;
use crate::ast::Pattern;
use crate::ast::UnaryOp;
use crate::builtins;
use crate::builtins::Builtin;
use crate::config::CompilerConfig;
use crate::error::EvalError;
use crate::scheme::Scheme;
use crate::scope::Scope;
use crate::translator;
use crate::value::Callable;
use crate::value::Instance;
use crate::value::Value;

pub struct Interpreter<'s> {
    functions: AHashMap<&'s str, &'s FunctionDecl>,
    globals: Vec<(String, Value)>,
    registry: DomainRegistry,
    depth: usize,
    max_depth: usize,
}

impl<'s> Interpreter<'s> {
    /// Loads the given schemes in order and evaluates their globals.
    ///
    /// A function declared in a later scheme replaces one of the same name
    /// from an earlier scheme.
    pub fn new(schemes: &[&'s Scheme], config: &CompilerConfig) -> Result<Self, EvalError> {
        let mut interp = Self {
            functions: AHashMap::default(),
            globals: vec![("empty".to_string(), Value::Solution(Rc::new(Solution::new())))],
            registry: DomainRegistry::with_lengths(config.short_length, config.long_length),
            depth: 0,
            max_depth: config.max_depth,
        };
        for &scheme in schemes {
            for decl in scheme.functions() {
                interp.functions.insert(decl.name.as_str(), decl);
            }
        }
        for &scheme in schemes {
            for global in scheme.globals() {
                let value = interp.eval(&global.value, &Scope::root())?;
                trace!("global {} = {}", global.name, value);
                interp.globals.push((global.name.clone(), value));
            }
        }
        Ok(interp)
    }

    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    pub fn fresh_domain(&mut self, kind: DomainKind) -> DomainRef {
        self.registry.fresh(kind)
    }

    pub fn complement(&self, domain: &DomainRef) -> Result<DomainRef, EvalError> {
        Ok(self.registry.complement(domain)?)
    }

    /// Resolves a name outside of any local scope: globals, then declared
    /// functions, then builtins.
    pub fn lookup_global(&self, name: &str) -> Option<Value> {
        if let Some((_, value)) = self.globals.iter().rev().find(|(n, _)| n == name) {
            return Some(value.clone());
        }
        if let Some(decl) = self.functions.get(name) {
            return Some(Value::Function(Callable::Declared(Rc::from(decl.name.as_str()))));
        }
        Builtin::from_name(name).map(|b| Value::Function(Callable::Builtin(b)))
    }

    fn lookup(&self, name: &str, scope: &Scope<'_>) -> Result<Value, EvalError> {
        match scope.lookup(name) {
            Some(value) => Ok(value.clone()),
            None => self
                .lookup_global(name)
                .ok_or_else(|| EvalError::UnboundName(name.to_string())),
        }
    }

    /// Calls a declared function or builtin by name.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        match self.functions.get(name).copied() {
            Some(decl) => self.call_declared(decl, args),
            None => match Builtin::from_name(name) {
                Some(builtin) => self.call_builtin(builtin, args),
                None => Err(EvalError::UnboundName(name.to_string())),
            },
        }
    }

    /// Calls a function value.
    pub fn apply(&mut self, f: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
        match f {
            Value::Function(Callable::Declared(name)) => self.call(name, args),
            Value::Function(Callable::Builtin(builtin)) => self.call_builtin(*builtin, args),
            other => Err(EvalError::type_mismatch("call", "function", other.type_name())),
        }
    }

    fn call_builtin(&mut self, builtin: Builtin, args: Vec<Value>) -> Result<Value, EvalError> {
        if args.len() != builtin.arity() {
            return Err(EvalError::ArityMismatch {
                name: builtin.name().to_string(),
                expected: builtin.arity(),
                found: args.len(),
            });
        }
        builtins::call(self, builtin, args)
    }

    fn call_declared(&mut self, decl: &'s FunctionDecl, args: Vec<Value>) -> Result<Value, EvalError> {
        if args.len() != decl.params.len() {
            return Err(EvalError::ArityMismatch {
                name: decl.name.clone(),
                expected: decl.params.len(),
                found: args.len(),
            });
        }
        if self.depth >= self.max_depth {
            return Err(EvalError::RecursionLimit(self.max_depth));
        }
        trace!("{} {}({})", decl.kind, decl.name, args.iter().join(", "));

        let reaction = match decl.kind {
            DeclKind::Module => translator::reaction_argument(&args).cloned(),
            _ => None,
        };
        let mut scope = Scope::root();
        for (param, arg) in decl.params.iter().zip(args) {
            scope.bind(param.as_str(), arg);
        }

        self.depth += 1;
        let result = match &reaction {
            Some(r) => translator::translate(&decl.name, r, || self.eval_body(decl, &scope)),
            None => self.eval_body(decl, &scope),
        };
        self.depth -= 1;
        result
    }

    /// Evaluates a function body. Structures returned by a class become
    /// instances carrying the class's top-level `where` bindings.
    fn eval_body(&mut self, decl: &'s FunctionDecl, scope: &Scope<'_>) -> Result<Value, EvalError> {
        if decl.kind != DeclKind::Class {
            return self.eval(&decl.body, scope);
        }
        let (value, attributes) = match &decl.body {
            Expr::Where { body, bindings } => {
                let mut local = scope.child();
                self.bind_all(bindings, &mut local)?;
                let value = self.eval(body, &local)?;
                (value, local.into_bindings())
            }
            body => (self.eval(body, scope)?, Vec::new()),
        };
        Ok(match value {
            Value::Structure(structure) => Value::Instance(Rc::new(Instance {
                class: decl.name.clone(),
                structure,
                attributes,
            })),
            other => other,
        })
    }

    pub(crate) fn eval(&mut self, expr: &'s Expr, scope: &Scope<'_>) -> Result<Value, EvalError> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Name(name) => self.lookup(name, scope),
            Expr::Structure(literal) => self.structure_literal(literal, scope),
            Expr::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval(item, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(values))
            }
            Expr::Call { callee, args } => {
                let f = self.eval(callee, scope)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                self.apply(&f, args)
            }
            Expr::Index { target, index } => {
                let target = self.eval(target, scope)?;
                let index = self.eval(index, scope)?;
                index_value(&target, &index)
            }
            Expr::Attribute { target, name } => {
                let target = self.eval(target, scope)?;
                attribute(&target, name)
            }
            Expr::Unary { op, operand } => {
                let value = self.eval(operand, scope)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!value.as_bool("'not'")?)),
                    UnaryOp::Neg => value
                        .as_int("unary '-'")?
                        .checked_neg()
                        .map(Value::Int)
                        .ok_or(EvalError::IntegerOverflow("-")),
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let l = self.eval(lhs, scope)?;
                let r = self.eval(rhs, scope)?;
                binary(*op, &l, &r)
            }
            Expr::Logical { op, lhs, rhs } => {
                let symbol = op.symbol();
                let decisive = op.decisive();
                if self.eval(lhs, scope)?.as_bool(symbol)? == decisive {
                    return Ok(Value::Bool(decisive));
                }
                Ok(Value::Bool(self.eval(rhs, scope)?.as_bool(symbol)?))
            }
            Expr::If { branches, otherwise } => {
                for (condition, then) in branches {
                    if self.eval(condition, scope)?.as_bool("if condition")? {
                        return self.eval(then, scope);
                    }
                }
                self.eval(otherwise, scope)
            }
            Expr::Where { body, bindings } => {
                let mut local = scope.child();
                self.bind_all(bindings, &mut local)?;
                self.eval(body, &local)
            }
        }
    }

    /// Binds `where` clauses in order; each sees the bindings before it.
    fn bind_all(&mut self, bindings: &'s [Binding], scope: &mut Scope<'_>) -> Result<(), EvalError> {
        for binding in bindings {
            let value = self.eval(&binding.value, scope)?;
            destructure(&binding.pattern, value, scope)?;
        }
        Ok(())
    }
}

fn destructure(pattern: &Pattern, value: Value, scope: &mut Scope<'_>) -> Result<(), EvalError> {
    match pattern {
        Pattern::Name(name) => {
            scope.bind(name.as_str(), value);
            Ok(())
        }
        Pattern::List(patterns) => {
            let items = value.as_list("destructuring binding")?;
            if items.len() != patterns.len() {
                return Err(EvalError::ArityMismatch {
                    name: "destructuring binding".to_string(),
                    expected: patterns.len(),
                    found: items.len(),
                });
            }
            for (pattern, item) in patterns.iter().zip(items) {
                destructure(pattern, item.clone(), scope)?;
            }
            Ok(())
        }
    }
}

fn binary(op: BinaryOp, l: &Value, r: &Value) -> Result<Value, EvalError> {
    let symbol = op.symbol();
    let checked = |result: Option<i64>| result.map(Value::Int).ok_or(EvalError::IntegerOverflow(symbol));
    match op {
        BinaryOp::Add => builtins::add(l, r),
        BinaryOp::Sub => checked(l.as_int(symbol)?.checked_sub(r.as_int(symbol)?)),
        BinaryOp::Mul => checked(l.as_int(symbol)?.checked_mul(r.as_int(symbol)?)),
        BinaryOp::Eq => Ok(Value::Bool(l == r)),
        BinaryOp::Ne => Ok(Value::Bool(l != r)),
        BinaryOp::Lt => Ok(Value::Bool(l.as_int(symbol)? < r.as_int(symbol)?)),
        BinaryOp::Le => Ok(Value::Bool(l.as_int(symbol)? <= r.as_int(symbol)?)),
        BinaryOp::Gt => Ok(Value::Bool(l.as_int(symbol)? > r.as_int(symbol)?)),
        BinaryOp::Ge => Ok(Value::Bool(l.as_int(symbol)? >= r.as_int(symbol)?)),
    }
}

fn index_value(target: &Value, index: &Value) -> Result<Value, EvalError> {
    match target {
        Value::List(items) => {
            let i = index.as_int("index")?;
            usize::try_from(i)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .ok_or(EvalError::IndexOutOfRange { index: i, len: items.len() })
        }
        Value::Reaction(reaction) => Err(translator::unsupported(reaction)),
        other => Err(EvalError::type_mismatch("index", "list", other.type_name())),
    }
}

fn attribute(target: &Value, name: &str) -> Result<Value, EvalError> {
    match target {
        Value::Instance(instance) => {
            instance
                .attribute(name)
                .cloned()
                .ok_or_else(|| EvalError::UnknownAttribute {
                    target: format!("instance of '{}'", instance.class),
                    name: name.to_string(),
                })
        }
        Value::Reaction(reaction) => match name {
            "reactants" => Ok(Value::list(reaction.reactants.clone())),
            "products" => Ok(Value::list(reaction.products.clone())),
            "reversible" => Ok(Value::Bool(reaction.reaction.is_reversible())),
            _ => Err(EvalError::UnknownAttribute {
                target: format!("reaction '{}'", reaction.reaction),
                name: name.to_string(),
            }),
        },
        other => Err(EvalError::type_mismatch(
            format!("attribute '{name}'"),
            "instance",
            other.type_name(),
        )),
    }
}
