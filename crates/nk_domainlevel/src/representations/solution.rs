use serde::Serialize;

use crate::Complex;

/// A multiset of complexes, the output system of a translation.
///
/// Union keeps every complex: two structurally identical fuels emitted by
/// different reactions stay separate entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Solution {
    complexes: Vec<Complex>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.complexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complexes.is_empty()
    }

    pub fn push(&mut self, complex: Complex) {
        self.complexes.push(complex);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Complex> {
        self.complexes.iter()
    }

    pub fn union(&self, other: &Solution) -> Solution {
        let mut complexes = Vec::with_capacity(self.len() + other.len());
        complexes.extend(self.complexes.iter().cloned());
        complexes.extend(other.complexes.iter().cloned());
        Solution { complexes }
    }

    pub fn unbounded_count(&self) -> usize {
        self.complexes.iter().filter(|c| c.is_unbounded()).count()
    }
}

impl From<Complex> for Solution {
    fn from(complex: Complex) -> Self {
        Solution { complexes: vec![complex] }
    }
}

impl FromIterator<Complex> for Solution {
    fn from_iter<T: IntoIterator<Item = Complex>>(iter: T) -> Self {
        Solution { complexes: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Solution {
    type Item = &'a Complex;
    type IntoIter = std::slice::Iter<'a, Complex>;

    fn into_iter(self) -> Self::IntoIter {
        self.complexes.iter()
    }
}
