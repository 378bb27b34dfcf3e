//! Structure values and complexes.
//!
//! A [`Structure`] is a flat, position-aligned pair of rows: the domain
//! sequence and the dot-bracket structure. Strand breaks occupy one position
//! in both rows. Structures may be fragments (unbalanced brackets, dangling
//! strand breaks), a [`Complex`] may not.
//!

use std::fmt;

use itertools::Itertools;
use nk_structure::DotBracket;
use nk_structure::DotBracketVec;
use nk_structure::PairTable;
use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::DomainError;
use crate::DomainRef;

/// One position of the sequence row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Domain(DomainRef),
    /// A history domain `?`, which never pairs.
    Wildcard,
    Break,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Domain(d) => write!(f, "{}", d),
            Segment::Wildcard => write!(f, "?"),
            Segment::Break => write!(f, "+"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Structure {
    sequence: Vec<Segment>,
    structure: DotBracketVec,
}

impl Structure {
    /// Build a structure, requiring both rows to have equal length and
    /// strand breaks at the same positions.
    pub fn new(sequence: Vec<Segment>, structure: DotBracketVec) -> Result<Self, DomainError> {
        if sequence.len() != structure.len() {
            return Err(DomainError::ShapeMismatch(format!(
                "sequence has {} positions, structure has {}",
                sequence.len(), structure.len()
            )));
        }
        for (i, (seg, &db)) in sequence.iter().zip(structure.iter()).enumerate() {
            let seg_break = matches!(seg, Segment::Break);
            let db_break = db == DotBracket::Break;
            if seg_break != db_break {
                return Err(DomainError::ShapeMismatch(format!(
                    "strand break misaligned at position {i} ('{seg}' vs '{}')",
                    char::from(db)
                )));
            }
        }
        Ok(Self { sequence, structure })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sequence(&self) -> &[Segment] {
        &self.sequence
    }

    pub fn structure(&self) -> &DotBracketVec {
        &self.structure
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Positional concatenation: `other` continues where `self` ends.
    pub fn concat(&self, other: &Structure) -> Structure {
        let mut sequence = self.sequence.clone();
        sequence.extend(other.sequence.iter().cloned());
        let mut structure = self.structure.clone();
        structure.extend(other.structure.iter().copied());
        Structure { sequence, structure }
    }

    /// Rows split at strand breaks.
    pub fn strands(&self) -> Vec<(&[Segment], &[DotBracket])> {
        self.sequence
            .split(|s| matches!(s, Segment::Break))
            .zip(self.structure.split(|&db| db == DotBracket::Break))
            .collect()
    }

    /// All domains in sequence order (wildcards and breaks skipped).
    pub fn domains(&self) -> impl Iterator<Item = &DomainRef> {
        self.sequence.iter().filter_map(|s| match s {
            Segment::Domain(d) => Some(d),
            _ => None,
        })
    }

    pub fn pair_table(&self) -> Result<PairTable, DomainError> {
        Ok(PairTable::try_from(&self.structure)?)
    }

    /// Checks that this structure describes a complete complex: no empty
    /// strands, balanced brackets, complementary domains at every pair, and
    /// all strands connected through base pairs.
    pub fn check_complex(&self) -> Result<(), DomainError> {
        if self.is_empty() {
            return Err(DomainError::ShapeMismatch("empty complex".to_string()));
        }
        if let Some(i) = self.strands().iter().position(|(seq, _)| seq.is_empty()) {
            return Err(DomainError::ShapeMismatch(format!(
                "strand {i} of '{self}' is empty"
            )));
        }
        let pt = self.pair_table()?;
        for (i, j) in pt.pairs() {
            let complementary = match (&self.sequence[i], &self.sequence[j]) {
                (Segment::Domain(a), Segment::Domain(b)) => a.is_complement_of(b),
                _ => false,
            };
            if !complementary {
                return Err(DomainError::PairMismatch {
                    i,
                    j,
                    left: self.sequence[i].to_string(),
                    right: self.sequence[j].to_string(),
                });
            }
        }
        self.check_connected(&pt)
    }

    /// Flexible positions have unspecified pairing, so structures holding
    /// one are not checked.
    fn check_connected(&self, pt: &PairTable) -> Result<(), DomainError> {
        if self.structure.iter().any(|&db| db == DotBracket::Flexible) {
            return Ok(());
        }
        let mut strand_of = Vec::with_capacity(self.len());
        let mut count = 1;
        for &db in self.structure.iter() {
            if db == DotBracket::Break {
                count += 1;
            }
            strand_of.push(count - 1);
        }
        if count == 1 {
            return Ok(());
        }

        let mut adjacent = vec![Vec::new(); count];
        for (i, j) in pt.pairs() {
            adjacent[strand_of[i]].push(strand_of[j]);
            adjacent[strand_of[j]].push(strand_of[i]);
        }
        let mut seen = vec![false; count];
        seen[0] = true;
        let mut stack = vec![0];
        while let Some(s) = stack.pop() {
            for &n in &adjacent[s] {
                if !seen[n] {
                    seen[n] = true;
                    stack.push(n);
                }
            }
        }
        match seen.iter().position(|&s| !s) {
            Some(strand) => Err(DomainError::Disconnected {
                strand,
                complex: self.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// The sequence row as space separated names.
    pub fn sequence_string(&self) -> String {
        self.sequence.iter().join(" ")
    }

    /// Kernel notation, e.g. `d0( t0( + t0* ) d0* )`.
    pub fn kernel(&self) -> String {
        self.sequence.iter()
            .zip(self.structure.iter())
            .map(|(seg, db)| match db {
                DotBracket::Open => format!("{seg}("),
                DotBracket::Close => ")".to_string(),
                DotBracket::Flexible => format!("{seg}~"),
                _ => seg.to_string(),
            })
            .join(" ")
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kernel())
    }
}

impl Serialize for Structure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Structure", 2)?;
        state.serialize_field("sequence", &self.sequence_string())?;
        state.serialize_field("structure", &self.structure.to_string())?;
        state.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    /// A single, stoichiometric copy.
    Finite,
    /// Present in unlimited supply (fuels, gates).
    Unbounded,
}

/// A complete complex together with its multiplicity class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Complex {
    structure: Structure,
    multiplicity: Multiplicity,
}

impl Complex {
    pub fn new(structure: Structure, multiplicity: Multiplicity) -> Result<Self, DomainError> {
        structure.check_complex()?;
        Ok(Self { structure, multiplicity })
    }

    pub fn finite(structure: Structure) -> Result<Self, DomainError> {
        Self::new(structure, Multiplicity::Finite)
    }

    pub fn unbounded(structure: Structure) -> Result<Self, DomainError> {
        Self::new(structure, Multiplicity::Unbounded)
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    pub fn is_unbounded(&self) -> bool {
        self.multiplicity == Multiplicity::Unbounded
    }

    /// Same complex, marked as present in unlimited supply.
    pub fn to_unbounded(&self) -> Complex {
        Complex {
            structure: self.structure.clone(),
            multiplicity: Multiplicity::Unbounded,
        }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.structure)?;
        if self.is_unbounded() {
            write!(f, " @inf")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomainRegistry;

    fn seg(d: &DomainRef) -> Segment {
        Segment::Domain(d.clone())
    }

    #[test]
    fn test_structure_shape_mismatch() {
        let mut registry = DomainRegistry::new();
        let x = registry.fresh_long();
        let db = DotBracketVec::try_from("..").unwrap();
        assert!(matches!(Structure::new(vec![seg(&x)], db),
            Err(DomainError::ShapeMismatch(_))));

        let db = DotBracketVec::try_from(".+").unwrap();
        assert!(matches!(Structure::new(vec![seg(&x), seg(&x)], db),
            Err(DomainError::ShapeMismatch(_))));
    }

    #[test]
    fn test_concat_and_strands() {
        let mut registry = DomainRegistry::new();
        let t = registry.fresh_toehold();
        let x = registry.fresh_long();
        let tc = registry.complement(&t).unwrap();
        let xc = registry.complement(&x).unwrap();

        let head = Structure::new(
            vec![seg(&t), seg(&x), Segment::Break],
            DotBracketVec::try_from("((+").unwrap()).unwrap();
        let tail = Structure::new(
            vec![seg(&xc), seg(&tc)],
            DotBracketVec::try_from("))").unwrap()).unwrap();
        assert!(head.check_complex().is_err());

        let full = head.concat(&tail);
        assert_eq!(full.len(), 5);
        assert_eq!(full.strands().len(), 2);
        assert_eq!(full.sequence_string(), "t0 d0 + d0* t0*");
        assert_eq!(full.kernel(), "t0( d0( + ) )");
        assert!(full.check_complex().is_ok());
        assert_eq!(full.domains().count(), 4);
    }

    #[test]
    fn test_pairing_requires_complements() {
        let mut registry = DomainRegistry::new();
        let a = registry.fresh_long();
        let b = registry.fresh_long();
        let s = Structure::new(
            vec![seg(&a), Segment::Wildcard, seg(&b)],
            DotBracketVec::try_from("(.)").unwrap()).unwrap();
        assert!(matches!(s.check_complex(), Err(DomainError::PairMismatch { i: 0, j: 2, .. })));
    }

    #[test]
    fn test_empty_strand_is_rejected() {
        let mut registry = DomainRegistry::new();
        let a = registry.fresh_long();
        let s = Structure::new(
            vec![seg(&a), Segment::Break],
            DotBracketVec::try_from(".+").unwrap()).unwrap();
        assert!(matches!(Complex::finite(s), Err(DomainError::ShapeMismatch(_))));
    }

    #[test]
    fn test_strands_must_be_connected() {
        let mut registry = DomainRegistry::new();
        let t = registry.fresh_toehold();
        let x = registry.fresh_long();
        let tc = registry.complement(&t).unwrap();

        // two free strands side by side
        let apart = Structure::new(
            vec![seg(&t), Segment::Break, seg(&x)],
            DotBracketVec::try_from(".+.").unwrap()).unwrap();
        assert!(matches!(apart.check_complex(), Err(DomainError::Disconnected { strand: 1, .. })));

        // the third strand is only bound to itself
        let third = Structure::new(
            vec![seg(&t), Segment::Break, seg(&tc), Segment::Break, seg(&t), seg(&tc)],
            DotBracketVec::try_from("(+)+()").unwrap()).unwrap();
        assert!(matches!(third.check_complex(), Err(DomainError::Disconnected { strand: 2, .. })));

        let bound = Structure::new(
            vec![seg(&t), Segment::Break, seg(&x), seg(&tc)],
            DotBracketVec::try_from("(+.)").unwrap()).unwrap();
        assert!(bound.check_complex().is_ok());

        let flexible = Structure::new(
            vec![seg(&t), Segment::Break, seg(&x)],
            DotBracketVec::try_from(".+~").unwrap()).unwrap();
        assert!(flexible.check_complex().is_ok());
    }

    #[test]
    fn test_serialize_structure() {
        let mut registry = DomainRegistry::new();
        let a = registry.fresh_long();
        let s = Structure::new(
            vec![Segment::Wildcard, seg(&a)],
            DotBracketVec::try_from("..").unwrap()).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"sequence":"? d0","structure":".."}"#);
    }
}
