//! Dot-bracket symbols for domain-level structures.
//!
//! Every symbol describes exactly one position of a complex: a domain, a
//! wildcard, or the strand break `+`. The flexible symbol `~` marks a
//! position whose pairing is left unspecified.
//!

use std::fmt;
use std::ops::Deref;
use std::ops::DerefMut;

use crate::StructureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DotBracket {
    Unpaired,
    Open,
    Close,
    Break,
    Flexible,
}

impl TryFrom<char> for DotBracket {
    type Error = StructureError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(DotBracket::Unpaired),
            '(' => Ok(DotBracket::Open),
            ')' => Ok(DotBracket::Close),
            '+' => Ok(DotBracket::Break),
            '~' => Ok(DotBracket::Flexible),
            _ => Err(StructureError::InvalidChar(c)),
        }
    }
}

impl From<DotBracket> for char {
    fn from(db: DotBracket) -> Self {
        match db {
            DotBracket::Unpaired => '.',
            DotBracket::Open => '(',
            DotBracket::Close => ')',
            DotBracket::Break => '+',
            DotBracket::Flexible => '~',
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DotBracketVec(pub Vec<DotBracket>);

impl DotBracketVec {
    /// Number of strands, i.e. strand breaks + 1 (0 for an empty vector).
    pub fn strand_count(&self) -> usize {
        if self.0.is_empty() {
            return 0;
        }
        1 + self.0.iter().filter(|&&db| db == DotBracket::Break).count()
    }
}

impl Deref for DotBracketVec {
    type Target = Vec<DotBracket>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DotBracketVec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Whitespace is ignored, so "( ( + . )" and "((+.)" are equivalent.
impl TryFrom<&str> for DotBracketVec {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(DotBracket::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map(DotBracketVec)
    }
}

impl fmt::Display for DotBracketVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &db in self.iter() {
            write!(f, "{}", char::from(db))?;
        }
        Ok(())
    }
}
