//! PairTable: for every position, the index of its pairing partner.
//!
//! Indices are 0-based and refer to the flat dot-bracket vector, so strand
//! breaks occupy a position (and are always unpaired). This keeps the
//! positions aligned with domain sequences that use the same layout.
//!

use std::ops::Index;

use crate::DotBracket;
use crate::DotBracketVec;
use crate::StructureError;
use crate::NAIDX;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairTable(Vec<Option<NAIDX>>);

impl PairTable {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Option<NAIDX>> {
        self.0.iter()
    }

    /// Iterate over all base pairs `(i, j)` with `i < j`, ordered by `i`.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter()
            .enumerate()
            .filter_map(|(i, j)| match j {
                Some(j) if (*j as usize) > i => Some((i, *j as usize)),
                _ => None,
            })
    }

    /// Number of base pairs.
    pub fn pair_count(&self) -> usize {
        self.pairs().count()
    }
}

impl Index<usize> for PairTable {
    type Output = Option<NAIDX>;

    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}

impl TryFrom<&[DotBracket]> for PairTable {
    type Error = StructureError;

    fn try_from(dbv: &[DotBracket]) -> Result<Self, Self::Error> {
        if dbv.len() >= NAIDX::MAX as usize {
            return Err(StructureError::TooLong(dbv.len()));
        }
        let mut stack: Vec<usize> = Vec::new();
        let mut table = vec![None; dbv.len()];
        for (i, db) in dbv.iter().enumerate() {
            match db {
                DotBracket::Open => stack.push(i),
                DotBracket::Close => {
                    let j = stack.pop().ok_or(StructureError::UnmatchedClose(i))?;
                    table[i] = Some(j as NAIDX);
                    table[j] = Some(i as NAIDX);
                }
                DotBracket::Unpaired | DotBracket::Break | DotBracket::Flexible => (),
            }
        }
        if let Some(i) = stack.pop() {
            return Err(StructureError::UnmatchedOpen(i));
        }
        Ok(PairTable(table))
    }
}

impl TryFrom<&DotBracketVec> for PairTable {
    type Error = StructureError;

    fn try_from(dbv: &DotBracketVec) -> Result<Self, Self::Error> {
        PairTable::try_from(dbv.as_slice())
    }
}

impl TryFrom<&str> for PairTable {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let dbv = DotBracketVec::try_from(s)?;
        PairTable::try_from(&dbv)
    }
}
