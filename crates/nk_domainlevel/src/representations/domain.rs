//! Domains and the registry that issues them.
//!
//! A domain is identified by its kind (short/toehold or long) and a per-kind
//! sequence number. Every issued domain comes with its complement, which is
//! a distinct identity: `d3` and `d3*` are never equal, but
//! `are_complements(d3, d3*)` holds.
//!

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use ahash::AHashMap;
use log::trace;
use serde::Serialize;

use crate::DomainError;

/// Default nucleotide length of short (toehold) domains.
pub const SHORT_LENGTH: usize = 6;
/// Default nucleotide length of long (branch-migration) domains.
pub const LONG_LENGTH: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainKind {
    Short,
    Long,
}

impl DomainKind {
    fn prefix(&self) -> &'static str {
        match self {
            DomainKind::Short => "t",
            DomainKind::Long => "d",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Domain {
    pub name: String,
    pub kind: DomainKind,
    pub number: usize,
    pub length: usize,
    pub complement: bool,
}

impl Domain {
    pub fn is_complement_of(&self, other: &Domain) -> bool {
        self.kind == other.kind
            && self.number == other.number
            && self.complement != other.complement
    }
}

impl PartialEq for Domain {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.number == other.number
            && self.complement == other.complement
    }
}

impl Eq for Domain {}

impl Hash for Domain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.number.hash(state);
        self.complement.hash(state);
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub type DomainRef = Arc<Domain>;
pub type DomainRefVec = Vec<DomainRef>;

/// The domain allocator of one compilation pass.
///
/// Counters are kept per kind and are never reset, so every call to
/// [`DomainRegistry::fresh`] returns a domain that differs from all
/// previously issued ones.
#[derive(Debug, Clone)]
pub struct DomainRegistry {
    short_length: usize,
    long_length: usize,
    short: Vec<[DomainRef; 2]>,
    long: Vec<[DomainRef; 2]>,
    order: DomainRefVec,
    names: AHashMap<String, DomainRef>,
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::with_lengths(SHORT_LENGTH, LONG_LENGTH)
    }

    pub fn with_lengths(short_length: usize, long_length: usize) -> Self {
        Self {
            short_length,
            long_length,
            short: Vec::new(),
            long: Vec::new(),
            order: Vec::new(),
            names: AHashMap::default(),
        }
    }

    /// Issue a new domain (and its complement) of the given kind.
    pub fn fresh(&mut self, kind: DomainKind) -> DomainRef {
        let (pool, length) = match kind {
            DomainKind::Short => (&mut self.short, self.short_length),
            DomainKind::Long => (&mut self.long, self.long_length),
        };
        let number = pool.len();
        let name = format!("{}{}", kind.prefix(), number);
        let domain = Arc::new(Domain {
            name: name.clone(),
            kind,
            number,
            length,
            complement: false,
        });
        let complement = Arc::new(Domain {
            name: format!("{name}*"),
            kind,
            number,
            length,
            complement: true,
        });
        pool.push([domain.clone(), complement.clone()]);
        trace!("allocated {kind:?} domain {name}");

        self.names.insert(name, domain.clone());
        self.names.insert(complement.name.clone(), complement);
        self.order.push(domain.clone());
        domain
    }

    pub fn fresh_toehold(&mut self) -> DomainRef {
        self.fresh(DomainKind::Short)
    }

    pub fn fresh_long(&mut self) -> DomainRef {
        self.fresh(DomainKind::Long)
    }

    /// Returns the complement of a domain issued by this registry.
    pub fn complement(&self, domain: &Domain) -> Result<DomainRef, DomainError> {
        let pool = match domain.kind {
            DomainKind::Short => &self.short,
            DomainKind::Long => &self.long,
        };
        pool.get(domain.number)
            .filter(|pair| *pair[0] == *domain || *pair[1] == *domain)
            .map(|pair| pair[usize::from(!domain.complement)].clone())
            .ok_or_else(|| DomainError::UnknownDomain(domain.name.clone()))
    }

    pub fn get(&self, name: &str) -> Option<DomainRef> {
        self.names.get(name).cloned()
    }

    pub fn are_complements(&self, a: &Domain, b: &Domain) -> bool {
        a.is_complement_of(b)
    }

    /// Number of domains of one kind issued so far (complements excluded).
    pub fn count(&self, kind: DomainKind) -> usize {
        match kind {
            DomainKind::Short => self.short.len(),
            DomainKind::Long => self.long.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All issued domains (complements excluded) in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &DomainRef> {
        self.order.iter()
    }
}
