//! Declaration annotations.
//!
//! An annotation is a name plus uniquely keyed name/value pairs, e.g.
//! `@route(path: "orders", version: "2")`. A declaration may carry several
//! annotations of the same name; [`AnnotationSet`] groups them by name while
//! keeping source order inside each group.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use crate::Identifier;

/// Error when building an annotation with repeated pair keys.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    #[error("annotation '{annotation}' has more than one pair named '{key}'")]
    DuplicatePair { annotation: Identifier, key: Identifier },
}

/// One `key: value` entry of an annotation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationPair {
    pub name: Identifier,
    pub value: String,
}

impl AnnotationPair {
    pub fn new(name: Identifier, value: impl Into<String>) -> Self {
        AnnotationPair {
            name,
            value: value.into(),
        }
    }
}

/// A named annotation attached to a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    name: Identifier,
    pairs: Vec<AnnotationPair>,
}

impl Annotation {
    /// Build an annotation, rejecting pairs that share a key.
    pub fn new(name: Identifier, pairs: Vec<AnnotationPair>) -> Result<Self, AnnotationError> {
        let mut seen = FxHashSet::default();
        for pair in &pairs {
            if !seen.insert(&pair.name) {
                return Err(AnnotationError::DuplicatePair {
                    annotation: name.clone(),
                    key: pair.name.clone(),
                });
            }
        }
        Ok(Annotation { name, pairs })
    }

    /// An annotation with no pairs, e.g. `@deprecated`.
    pub fn marker(name: Identifier) -> Self {
        Annotation {
            name,
            pairs: Vec::new(),
        }
    }

    pub fn name(&self) -> &Identifier {
        &self.name
    }

    pub fn pairs(&self) -> &[AnnotationPair] {
        &self.pairs
    }

    /// The pair stored under `key`.
    pub fn pair(&self, key: &str) -> Option<&AnnotationPair> {
        self.pairs.iter().find(|pair| pair.name == key)
    }

    /// The value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.pair(key).map(|pair| pair.value.as_str())
    }
}

/// Annotations of one declaration, grouped by annotation name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotationSet {
    groups: BTreeMap<Identifier, Vec<Annotation>>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        AnnotationSet::default()
    }

    pub fn push(&mut self, annotation: Annotation) {
        self.groups
            .entry(annotation.name.clone())
            .or_default()
            .push(annotation);
    }

    /// Every annotation named `name`, in source order.
    pub fn get(&self, name: &str) -> &[Annotation] {
        self.groups.get(name).map_or(&[], Vec::as_slice)
    }

    /// The first annotation named `name`.
    pub fn first(&self, name: &str) -> Option<&Annotation> {
        self.get(name).first()
    }

    /// The annotation named `name` when exactly one is present.
    pub fn single(&self, name: &str) -> Option<&Annotation> {
        match self.get(name) {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        !self.get(name).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of annotations across all names.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Groups in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &[Annotation])> {
        self.groups.iter().map(|(name, group)| (name, group.as_slice()))
    }
}

impl FromIterator<Annotation> for AnnotationSet {
    fn from_iter<T: IntoIterator<Item = Annotation>>(iter: T) -> Self {
        let mut set = AnnotationSet::new();
        for annotation in iter {
            set.push(annotation);
        }
        set
    }
}

impl Extend<Annotation> for AnnotationSet {
    fn extend<T: IntoIterator<Item = Annotation>>(&mut self, iter: T) {
        for annotation in iter {
            self.push(annotation);
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
