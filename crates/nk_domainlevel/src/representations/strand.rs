//! Strand naming for output systems.
//!
//! Strands are interned by their domain sequence: the same sequence
//! always gets the same name, new sequences get `s0`, `s1`, ...
//!

use ahash::AHashMap;

use crate::Segment;

pub type SegmentVec = Vec<Segment>;

#[derive(Debug, Clone, Default)]
pub struct StrandRegistry {
    strands: Vec<(String, SegmentVec)>,
    names: AHashMap<SegmentVec, usize>,
}

impl StrandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the name of this strand, registering it if it is new.
    pub fn intern(&mut self, strand: &[Segment]) -> &str {
        let idx = match self.names.get(strand) {
            Some(&idx) => idx,
            None => {
                let idx = self.strands.len();
                self.strands.push((format!("s{idx}"), strand.to_vec()));
                self.names.insert(strand.to_vec(), idx);
                idx
            }
        };
        &self.strands[idx].0
    }

    pub fn get_by_name(&self, name: &str) -> Option<&[Segment]> {
        self.strands.iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.as_slice())
    }

    pub fn get_name(&self, strand: &[Segment]) -> Option<&str> {
        self.names.get(strand).map(|&idx| self.strands[idx].0.as_str())
    }

    pub fn len(&self) -> usize {
        self.strands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strands.is_empty()
    }

    /// Registered strands in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Segment])> {
        self.strands.iter().map(|(n, s)| (n.as_str(), s.as_slice()))
    }
}
