//! Formal reactions and chemical reaction networks.

use std::fmt;

use ahash::AHashSet;
use itertools::Itertools;
use serde::Serialize;

/// A formal reaction over named species.
///
/// Reactant and product order is preserved, it determines the order in
/// which translation schemes see the species.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reaction {
    reactants: Vec<String>,
    products: Vec<String>,
    reversible: bool,
}

impl Reaction {
    pub fn new<S: AsRef<str>>(reactants: &[S], products: &[S]) -> Self {
        Self {
            reactants: reactants.iter().map(|s| s.as_ref().to_string()).collect(),
            products: products.iter().map(|s| s.as_ref().to_string()).collect(),
            reversible: false,
        }
    }

    pub fn reversible<S: AsRef<str>>(reactants: &[S], products: &[S]) -> Self {
        Self {
            reversible: true,
            ..Self::new(reactants, products)
        }
    }

    pub fn reactants(&self) -> &[String] {
        &self.reactants
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn is_reversible(&self) -> bool {
        self.reversible
    }

    /// (number of reactants, number of products)
    pub fn arity(&self) -> (usize, usize) {
        (self.reactants.len(), self.products.len())
    }

    /// The irreversible reaction in the opposite direction.
    pub fn reverse(&self) -> Reaction {
        Reaction {
            reactants: self.products.clone(),
            products: self.reactants.clone(),
            reversible: false,
        }
    }

    /// Splits a reversible reaction into forward and backward reactions.
    pub fn irreversible(&self) -> Vec<Reaction> {
        if self.reversible {
            let forward = Reaction { reversible: false, ..self.clone() };
            vec![forward, self.reverse()]
        } else {
            vec![self.clone()]
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.reversible { "<=>" } else { "->" };
        write!(f, "{} {} {}",
            self.reactants.iter().join(" + "),
            arrow,
            self.products.iter().join(" + "))
    }
}

/// An ordered collection of reactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Crn {
    reactions: Vec<Reaction>,
}

impl Crn {
    pub fn new(reactions: Vec<Reaction>) -> Self {
        Self { reactions }
    }

    pub fn push(&mut self, reaction: Reaction) {
        self.reactions.push(reaction);
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    /// Distinct species in order of first appearance.
    pub fn species(&self) -> Vec<String> {
        let mut seen = AHashSet::new();
        self.reactions.iter()
            .flat_map(|r| r.reactants.iter().chain(r.products.iter()))
            .filter(|s| seen.insert(s.as_str()))
            .cloned()
            .collect()
    }

    /// The same network with every reversible reaction split in two.
    pub fn irreversible(&self) -> Crn {
        Crn {
            reactions: self.reactions.iter().flat_map(Reaction::irreversible).collect(),
        }
    }
}

impl FromIterator<Reaction> for Crn {
    fn from_iter<T: IntoIterator<Item = Reaction>>(iter: T) -> Self {
        Crn { reactions: iter.into_iter().collect() }
    }
}

impl fmt::Display for Crn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.reactions {
            writeln!(f, "{r}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_arity() {
        let r = Reaction::new(&["A", "B"], &["C"]);
        assert_eq!(r.to_string(), "A + B -> C");
        assert_eq!(r.arity(), (2, 1));
        let r = Reaction::reversible(&["A"], &[]);
        assert_eq!(r.to_string(), "A <=> ");
        assert_eq!(Reaction::new(&[], &["A"]).to_string(), " -> A");
    }

    #[test]
    fn test_species_order() {
        let crn = Crn::new(vec![
            Reaction::new(&["B", "A"], &["C"]),
            Reaction::new(&["C"], &["A", "D"]),
        ]);
        assert_eq!(crn.species(), vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn test_irreversible_split() {
        let crn: Crn = vec![
            Reaction::reversible(&["A", "B"], &["C"]),
            Reaction::new(&["C"], &["D"]),
        ].into_iter().collect();
        let irr = crn.irreversible();
        assert_eq!(irr.len(), 3);
        assert_eq!(irr.reactions()[0], Reaction::new(&["A", "B"], &["C"]));
        assert_eq!(irr.reactions()[1], Reaction::new(&["C"], &["A", "B"]));
        assert!(irr.reactions().iter().all(|r| !r.is_reversible()));
    }
}
