use crate::value::Value;

/// Local bindings of one evaluation frame.
///
/// Frames form a chain through borrowed parents. Lookup walks the chain
/// from the innermost frame outwards and, within a frame, from the most
/// recent binding backwards.
#[derive(Debug, Default)]
pub struct Scope<'p> {
    bindings: Vec<(String, Value)>,
    parent: Option<&'p Scope<'p>>,
}

impl Scope<'static> {
    pub fn root() -> Self {
        Scope {
            bindings: Vec::new(),
            parent: None,
        }
    }
}

impl<'p> Scope<'p> {
    pub fn child(&'p self) -> Scope<'p> {
        Scope {
            bindings: Vec::new(),
            parent: Some(self),
        }
    }

    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.push((name.into(), value));
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .or_else(|| self.parent.and_then(|p| p.lookup(name)))
    }

    /// Bindings of this frame only, in binding order.
    pub fn bindings(&self) -> &[(String, Value)] {
        &self.bindings
    }

    pub fn into_bindings(self) -> Vec<(String, Value)> {
        self.bindings
    }
}
