//! Compilation of reaction networks into DNA implementations.

use std::borrow::Cow;
use std::fmt;
use std::panic;
use std::rc::Rc;
use std::thread;

use ahash::AHashMap;
use log::debug;
use log::info;
use nk_domainlevel::Complex;
use nk_domainlevel::Crn;
use nk_domainlevel::DomainRef;
use nk_domainlevel::DomainRegistry;
use nk_domainlevel::Reaction;
use nk_domainlevel::Solution;
use nk_domainlevel::StrandRegistry;
use nk_domainlevel::Structure;
use serde::Serialize;

use crate::ast::DeclKind;
use crate::config::CompilerConfig;
use crate::error::EvalError;
use crate::error::SchemeError;
use crate::interpreter::Interpreter;
use crate::scheme;
use crate::scheme::Scheme;
use crate::value::ReactionValue;
use crate::value::Value;

/// Stack reserved per nested scheme call on the evaluation thread.
const STACK_PER_CALL: usize = 64 * 1024;
/// Stack for everything below the outermost scheme call.
const STACK_BASE: usize = 1024 * 1024;

/// A formal species as built by the scheme's formal class.
struct FormalSpecies {
    name: String,
    structure: Rc<Structure>,
    value: Value,
}

#[derive(Debug, Clone)]
pub struct Compiler {
    scheme: Scheme,
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(scheme: Scheme) -> Self {
        Self::with_config(scheme, CompilerConfig::default())
    }

    pub fn with_config(scheme: Scheme, config: CompilerConfig) -> Self {
        Self { scheme, config }
    }

    /// A compiler for one of the shipped schemes.
    pub fn builtin(name: &str) -> Result<Self, SchemeError> {
        Ok(Self::new(Scheme::builtin(name)?))
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Translates a whole network with the scheme's main module.
    ///
    /// Each call is an independent pass with its own domain registry, so
    /// compiling the same network twice gives identical results.
    pub fn compile(&self, crn: &Crn) -> Result<Implementation, SchemeError> {
        self.require(DeclKind::Class, &self.config.formal_class)?;
        self.require(DeclKind::Module, &self.config.main_module)?;
        self.on_eval_thread(|| self.compile_network(crn))
    }

    /// Translates one reaction in isolation with the scheme's reaction module.
    pub fn translate_reaction(&self, reaction: &Reaction) -> Result<Implementation, SchemeError> {
        self.require(DeclKind::Class, &self.config.formal_class)?;
        self.require(DeclKind::Module, &self.config.reaction_module)?;
        self.on_eval_thread(|| self.compile_reaction(reaction))
    }

    /// Runs `f` on a thread whose stack holds `max_depth` nested scheme
    /// calls, so deep recursion ends in [`EvalError::RecursionLimit`].
    fn on_eval_thread<'a, F>(&'a self, f: F) -> Result<Implementation, SchemeError>
    where
        F: FnOnce() -> Result<Implementation, SchemeError> + Send + 'a,
    {
        let stack_size = self
            .config
            .max_depth
            .saturating_mul(STACK_PER_CALL)
            .saturating_add(STACK_BASE);
        thread::scope(|s| {
            let handle = thread::Builder::new()
                .name("nuskell-eval".to_string())
                .stack_size(stack_size)
                .spawn_scoped(s, f)
                .map_err(|err| SchemeError::Thread(err.to_string()))?;
            match handle.join() {
                Ok(result) => result,
                Err(payload) => panic::resume_unwind(payload),
            }
        })
    }

    fn compile_network(&self, crn: &Crn) -> Result<Implementation, SchemeError> {
        let crn = if self.config.split_reversible {
            Cow::Owned(crn.irreversible())
        } else {
            Cow::Borrowed(crn)
        };

        let mut interp = self.interpreter()?;
        let species = self.formal_species(&mut interp, &crn.species())?;
        let reactions = crn
            .reactions()
            .iter()
            .map(|r| reaction_value(r, &species))
            .collect::<Result<Vec<_>, _>>()?;

        let output = interp.call(&self.config.main_module, vec![Value::list(reactions)])?;
        let solution = expect_solution(output, &self.config.main_module)?;
        let implementation = Implementation::assemble(self.scheme.name(), interp.registry(), &species, &solution)?;
        info!(
            "compiled {} reactions with '{}' into {} complexes over {} domains",
            crn.len(),
            self.scheme.name(),
            implementation.complexes.len(),
            implementation.domains.len()
        );
        Ok(implementation)
    }

    fn compile_reaction(&self, reaction: &Reaction) -> Result<Implementation, SchemeError> {
        let mut interp = self.interpreter()?;
        let names = Crn::new(vec![reaction.clone()]).species();
        let species = self.formal_species(&mut interp, &names)?;
        let value = reaction_value(reaction, &species)?;

        let output = interp.call(&self.config.reaction_module, vec![value])?;
        let solution = expect_solution(output, &self.config.reaction_module)?;
        Ok(Implementation::assemble(self.scheme.name(), interp.registry(), &species, &solution)?)
    }

    fn require(&self, kind: DeclKind, name: &str) -> Result<(), SchemeError> {
        match self.scheme.function(name) {
            Some(decl) if decl.kind == kind => Ok(()),
            _ => Err(SchemeError::MissingDeclaration {
                scheme: self.scheme.name().to_string(),
                kind: kind.keyword(),
                name: name.to_string(),
            }),
        }
    }

    fn interpreter(&self) -> Result<Interpreter<'_>, SchemeError> {
        let prelude = scheme::prelude()?;
        Ok(Interpreter::new(&[prelude, &self.scheme], &self.config)?)
    }

    fn formal_species(&self, interp: &mut Interpreter<'_>, names: &[String]) -> Result<Vec<FormalSpecies>, EvalError> {
        let mut species = Vec::with_capacity(names.len());
        for name in names {
            let value = interp.call(&self.config.formal_class, vec![Value::Text(Rc::from(name.as_str()))])?;
            let Some(structure) = value.as_structure().cloned() else {
                return Err(EvalError::type_mismatch(
                    format!("formal species '{name}'"),
                    "structure",
                    value.type_name(),
                ));
            };
            debug!("formal species {} = {}", name, structure);
            species.push(FormalSpecies {
                name: name.clone(),
                structure,
                value,
            });
        }
        Ok(species)
    }
}

fn reaction_value(reaction: &Reaction, species: &[FormalSpecies]) -> Result<Value, EvalError> {
    let table: AHashMap<&str, &Value> = species.iter().map(|s| (s.name.as_str(), &s.value)).collect();
    let lookup = |names: &[String]| {
        names
            .iter()
            .map(|n| {
                table
                    .get(n.as_str())
                    .map(|&v| v.clone())
                    .ok_or_else(|| EvalError::UnboundName(n.clone()))
            })
            .collect::<Result<Vec<_>, _>>()
    };
    Ok(Value::Reaction(Rc::new(ReactionValue {
        reaction: reaction.clone(),
        reactants: lookup(reaction.reactants())?,
        products: lookup(reaction.products())?,
    })))
}

fn expect_solution(value: Value, module: &str) -> Result<Rc<Solution>, EvalError> {
    match value {
        Value::Solution(solution) => Ok(solution),
        other => Err(EvalError::type_mismatch(
            format!("result of module '{module}'"),
            "solution",
            other.type_name(),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedStrand {
    pub name: String,
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedComplex {
    pub name: String,
    pub strands: Vec<String>,
    #[serde(flatten)]
    pub complex: Complex,
}

/// The DNA implementation of a network.
///
/// Formal species are named after the species they implement, all other
/// complexes are named `f0`, `f1`, ... in the order the scheme emitted them.
#[derive(Debug, Clone, Serialize)]
pub struct Implementation {
    pub scheme: String,
    pub domains: Vec<DomainRef>,
    pub strands: Vec<NamedStrand>,
    pub species: Vec<NamedComplex>,
    pub complexes: Vec<NamedComplex>,
}

impl Implementation {
    fn assemble(
        scheme: &str,
        registry: &DomainRegistry,
        species: &[FormalSpecies],
        solution: &Solution,
    ) -> Result<Self, EvalError> {
        let mut strands = StrandRegistry::new();
        let species = species
            .iter()
            .map(|s| -> Result<NamedComplex, EvalError> {
                let complex = Complex::finite(s.structure.as_ref().clone())?;
                Ok(named(&mut strands, s.name.clone(), complex))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let complexes = solution
            .iter()
            .enumerate()
            .map(|(i, c)| named(&mut strands, format!("f{i}"), c.clone()))
            .collect();
        let strands = strands
            .iter()
            .map(|(name, segments)| NamedStrand {
                name: name.to_string(),
                domains: segments.iter().map(ToString::to_string).collect(),
            })
            .collect();
        Ok(Self {
            scheme: scheme.to_string(),
            domains: registry.iter().cloned().collect(),
            strands,
            species,
            complexes,
        })
    }

    /// Looks up a formal species or output complex by name.
    pub fn complex(&self, name: &str) -> Option<&NamedComplex> {
        self.species
            .iter()
            .chain(self.complexes.iter())
            .find(|c| c.name == name)
    }

    pub fn unbounded_count(&self) -> usize {
        self.complexes.iter().filter(|c| c.complex.is_unbounded()).count()
    }

    pub fn to_json(&self) -> Result<String, SchemeError> {
        to_pretty_json(self)
    }
}

pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, SchemeError> {
    serde_json::to_string_pretty(value).map_err(|err| SchemeError::Serialize(err.to_string()))
}

fn named(strands: &mut StrandRegistry, name: String, complex: Complex) -> NamedComplex {
    let names = complex
        .structure()
        .strands()
        .iter()
        .map(|(segments, _)| strands.intern(segments).to_string())
        .collect();
    NamedComplex {
        name,
        strands: names,
        complex,
    }
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.scheme)?;
        for d in &self.domains {
            writeln!(f, "length {} = {}", d.name, d.length)?;
        }
        writeln!(f)?;
        for s in &self.strands {
            writeln!(f, "{} = {}", s.name, s.domains.join(" "))?;
        }
        writeln!(f)?;
        for c in self.species.iter().chain(self.complexes.iter()) {
            writeln!(f, "{} = {}", c.name, c.complex)?;
        }
        Ok(())
    }
}
