//! Ordered named parameters handed to the engine on execute.

use crate::value::Value;

/// A single named parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// Placeholder name, including its leading `:`.
    pub placeholder: String,
    pub value: Value,
}

impl Param {
    pub fn new(placeholder: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            placeholder: placeholder.into(),
            value: value.into(),
        }
    }
}

/// A collection of parameters in binding order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its zero-based position.
    pub fn push(&mut self, placeholder: impl Into<String>, value: impl Into<Value>) -> usize {
        self.params.push(Param::new(placeholder, value));
        self.params.len() - 1
    }

    /// Builder-style [`ParamList::push`].
    pub fn with(mut self, placeholder: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(placeholder, value);
        self
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Look up a value by placeholder name.
    pub fn get(&self, placeholder: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|p| p.placeholder == placeholder)
            .map(|p| &p.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    /// Extend this list with another list's parameters.
    pub fn extend(&mut self, other: &ParamList) {
        self.params.extend(other.params.iter().cloned());
    }

    /// `None` for an empty list.
    ///
    /// Handing an empty list to a statement whose parameters were already
    /// bound makes the engine fail, so empty means "nothing supplied".
    pub fn as_supplied(&self) -> Option<&ParamList> {
        (!self.is_empty()).then_some(self)
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl<P: Into<String>, V: Into<Value>> FromIterator<(P, V)> for ParamList {
    fn from_iter<I: IntoIterator<Item = (P, V)>>(iter: I) -> Self {
        let mut list = ParamList::new();
        for (p, v) in iter {
            list.push(p, v);
        }
        list
    }
}

impl serde::Serialize for ParamList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.params.len()))?;
        for p in &self.params {
            map.serialize_entry(&p.placeholder, &p.value)?;
        }
        map.end()
    }
}
