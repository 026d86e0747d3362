//! Identifiers and dotted identifier chains.
//!
//! Provides [`Identifier`] (a single validated token) and
//! [`QualifiedIdentifier`] (a non-empty chain of tokens). Both have value
//! semantics: equality and hashing depend only on the segment text, never on
//! how the value was constructed, so they can be used directly as map keys.
//!
//! # Token Pattern
//!
//! An identifier is an ASCII letter followed by any number of ASCII letters
//! or digits (`[A-Za-z][A-Za-z0-9]*`). Storage is case-sensitive.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Add;
use std::str::FromStr;
use std::sync::Arc;

use smallvec::SmallVec;

/// Error when constructing an identifier or identifier chain fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdentError {
    /// The text is empty or only whitespace.
    #[error("an identifier cannot be empty")]
    Empty,

    /// The text does not match the identifier token pattern.
    #[error("`{0}` is not a valid identifier; expected a letter followed by letters or digits")]
    InvalidIdentifier(String),

    /// A qualified identifier was built from zero segments.
    #[error("a qualified identifier needs at least one segment")]
    EmptyChain,
}

/// A single validated identifier token.
///
/// Cloning is cheap: the text is reference counted.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Identifier(Arc<str>);

impl Identifier {
    /// Validate `text` and build an identifier from it.
    pub fn new(text: &str) -> Result<Self, IdentError> {
        if text.trim().is_empty() {
            Err(IdentError::Empty)
        } else if Self::is_valid(text) {
            Ok(Identifier(Arc::from(text)))
        } else {
            Err(IdentError::InvalidIdentifier(text.to_owned()))
        }
    }

    /// Check whether `text` matches the identifier token pattern.
    pub fn is_valid(text: &str) -> bool {
        let mut chars = text.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
            _ => false,
        }
    }

    /// The identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({:?})", self.as_str())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Identifier {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::new(s)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = IdentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Identifier::new(value)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identifier::new(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.as_str().to_owned()
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Segment storage. Most names in practice have four segments or fewer.
type Segments = SmallVec<[Identifier; 4]>;

/// A non-empty, ordered chain of identifiers, written `A.B.C`.
///
/// # Invariant
/// Always holds at least one segment.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct QualifiedIdentifier(Segments);

impl QualifiedIdentifier {
    /// Parse a dotted chain such as `Acme.Billing.Invoice`.
    pub fn new(text: &str) -> Result<Self, IdentError> {
        if text.trim().is_empty() {
            return Err(IdentError::Empty);
        }
        let segments = text
            .split('.')
            .map(Identifier::new)
            .collect::<Result<Segments, _>>()?;
        Ok(QualifiedIdentifier(segments))
    }

    /// Build a chain from already-validated segments.
    pub fn from_segments<I>(segments: I) -> Result<Self, IdentError>
    where
        I: IntoIterator<Item = Identifier>,
    {
        let segments: Segments = segments.into_iter().collect();
        if segments.is_empty() {
            return Err(IdentError::EmptyChain);
        }
        Ok(QualifiedIdentifier(segments))
    }

    /// Number of segments (always at least one).
    #[inline]
    #[expect(clippy::len_without_is_empty, reason = "a chain is never empty")]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The segments in order.
    #[inline]
    pub fn segments(&self) -> &[Identifier] {
        &self.0
    }

    /// Iterate over the segments in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Identifier> {
        self.0.iter()
    }

    /// The first segment.
    pub fn first(&self) -> &Identifier {
        &self.0[0]
    }

    /// The last segment, i.e. the short name.
    pub fn last(&self) -> &Identifier {
        &self.0[self.0.len() - 1]
    }

    /// The chain without its last segment, or `None` for a single segment.
    pub fn parent(&self) -> Option<QualifiedIdentifier> {
        if self.0.len() < 2 {
            return None;
        }
        Some(QualifiedIdentifier(
            self.0[..self.0.len() - 1].iter().cloned().collect(),
        ))
    }

    /// Every proper prefix of this chain, longest first.
    ///
    /// `A.B.C` yields `A.B` then `A`.
    pub fn ancestors(&self) -> impl Iterator<Item = QualifiedIdentifier> + '_ {
        (1..self.0.len())
            .rev()
            .map(|len| QualifiedIdentifier(self.0[..len].iter().cloned().collect()))
    }

    /// Structural prefix test.
    ///
    /// True when every segment of `prefix` equals the segment at the same
    /// position of `self`. `Foo.Bar` is not a prefix of `Foo.Barn`, and a
    /// prefix longer than `self` never matches.
    pub fn starts_with(&self, prefix: &QualifiedIdentifier) -> bool {
        prefix.len() <= self.len() && prefix.iter().zip(self.iter()).all(|(a, b)| a == b)
    }

    /// Structural prefix test against a single segment.
    pub fn starts_with_ident(&self, prefix: &Identifier) -> bool {
        self.first() == prefix
    }

    /// A new chain with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: &Identifier) -> QualifiedIdentifier {
        let mut segments = self.0.clone();
        segments.push(segment.clone());
        QualifiedIdentifier(segments)
    }

    /// A new chain with every segment of `other` appended.
    #[must_use]
    pub fn join(&self, other: &QualifiedIdentifier) -> QualifiedIdentifier {
        let mut segments = self.0.clone();
        segments.extend(other.iter().cloned());
        QualifiedIdentifier(segments)
    }
}

impl From<Identifier> for QualifiedIdentifier {
    fn from(value: Identifier) -> Self {
        let mut segments = Segments::new();
        segments.push(value);
        QualifiedIdentifier(segments)
    }
}

impl From<&Identifier> for QualifiedIdentifier {
    fn from(value: &Identifier) -> Self {
        QualifiedIdentifier::from(value.clone())
    }
}

impl<'a> IntoIterator for &'a QualifiedIdentifier {
    type Item = &'a Identifier;
    type IntoIter = std::slice::Iter<'a, Identifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Add<&Identifier> for &QualifiedIdentifier {
    type Output = QualifiedIdentifier;

    fn add(self, rhs: &Identifier) -> QualifiedIdentifier {
        self.child(rhs)
    }
}

impl Add<&QualifiedIdentifier> for &QualifiedIdentifier {
    type Output = QualifiedIdentifier;

    fn add(self, rhs: &QualifiedIdentifier) -> QualifiedIdentifier {
        self.join(rhs)
    }
}

impl Add<Identifier> for QualifiedIdentifier {
    type Output = QualifiedIdentifier;

    fn add(mut self, rhs: Identifier) -> QualifiedIdentifier {
        self.0.push(rhs);
        self
    }
}

impl Add<QualifiedIdentifier> for QualifiedIdentifier {
    type Output = QualifiedIdentifier;

    fn add(mut self, rhs: QualifiedIdentifier) -> QualifiedIdentifier {
        self.0.extend(rhs.0);
        self
    }
}

impl fmt::Debug for QualifiedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualifiedIdentifier({:?})", self.to_string())
    }
}

impl fmt::Display for QualifiedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for QualifiedIdentifier {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QualifiedIdentifier::new(s)
    }
}

impl TryFrom<&str> for QualifiedIdentifier {
    type Error = IdentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        QualifiedIdentifier::new(value)
    }
}

impl TryFrom<String> for QualifiedIdentifier {
    type Error = IdentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        QualifiedIdentifier::new(&value)
    }
}

impl From<QualifiedIdentifier> for String {
    fn from(value: QualifiedIdentifier) -> Self {
        value.to_string()
    }
}

impl PartialEq<str> for QualifiedIdentifier {
    fn eq(&self, other: &str) -> bool {
        let mut parts = other.split('.');
        self.iter().all(|segment| parts.next() == Some(segment.as_str())) && parts.next().is_none()
    }
}

impl PartialEq<&str> for QualifiedIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
