//! Occurrence ranges for type references.

use std::fmt;

/// Error when a cardinality range is malformed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CardinalityError {
    #[error(
        "invalid cardinality {minimum}..{}: maximum must be non-zero and not below the minimum",
        upper_bound(.maximum)
    )]
    InvalidCardinality { minimum: u32, maximum: Option<u32> },
}

fn upper_bound(maximum: &Option<u32>) -> String {
    maximum.map_or_else(|| "*".to_owned(), |max| max.to_string())
}

/// How many occurrences a type reference allows.
///
/// `maximum == None` means unbounded. A valid range never has a maximum of
/// zero and never has a maximum below its minimum.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cardinality {
    minimum: u32,
    maximum: Option<u32>,
}

impl Cardinality {
    /// Exactly one (`1..1`).
    pub const ONE: Cardinality = Cardinality::new_unchecked(1, Some(1));
    /// Optional (`0..1`).
    pub const ZERO_OR_ONE: Cardinality = Cardinality::new_unchecked(0, Some(1));
    /// Any number (`0..*`).
    pub const ZERO_OR_MORE: Cardinality = Cardinality::new_unchecked(0, None);
    /// At least one (`1..*`).
    pub const ONE_OR_MORE: Cardinality = Cardinality::new_unchecked(1, None);

    /// Build a range, rejecting a zero maximum or a maximum below the minimum.
    pub const fn new(minimum: u32, maximum: Option<u32>) -> Result<Self, CardinalityError> {
        if Self::is_valid(minimum, maximum) {
            Ok(Cardinality { minimum, maximum })
        } else {
            Err(CardinalityError::InvalidCardinality { minimum, maximum })
        }
    }

    /// Build a range that is known to be valid.
    ///
    /// # Panics
    /// Panics on an invalid range. Only use this for ranges fixed at compile time.
    pub const fn new_unchecked(minimum: u32, maximum: Option<u32>) -> Self {
        assert!(Self::is_valid(minimum, maximum), "invalid cardinality range");
        Cardinality { minimum, maximum }
    }

    const fn is_valid(minimum: u32, maximum: Option<u32>) -> bool {
        match maximum {
            Some(max) => max != 0 && max >= minimum,
            None => true,
        }
    }

    #[inline]
    pub const fn minimum(self) -> u32 {
        self.minimum
    }

    /// Upper bound, or `None` when unbounded.
    #[inline]
    pub const fn maximum(self) -> Option<u32> {
        self.maximum
    }

    /// At least one occurrence is required.
    pub const fn is_at_least_one(self) -> bool {
        self.minimum > 0
    }

    /// More than one occurrence is permitted.
    pub const fn can_be_many(self) -> bool {
        match self.maximum {
            Some(max) => max > 1,
            None => true,
        }
    }

    pub const fn is_one(self) -> bool {
        self.is_at_least_one() && !self.can_be_many()
    }

    pub const fn is_zero_or_one(self) -> bool {
        !self.is_at_least_one() && !self.can_be_many()
    }

    pub const fn is_zero_or_more(self) -> bool {
        !self.is_at_least_one()
    }

    pub const fn is_one_or_more(self) -> bool {
        self.is_at_least_one() && self.can_be_many()
    }

    /// Exactly `1..1`, as opposed to the looser [`Cardinality::is_one`].
    pub const fn is_exactly_one(self) -> bool {
        self.minimum == 1 && matches!(self.maximum, Some(1))
    }

    /// Exactly `0..1`, as opposed to the looser [`Cardinality::is_zero_or_one`].
    pub const fn is_exactly_zero_or_one(self) -> bool {
        self.minimum == 0 && matches!(self.maximum, Some(1))
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Cardinality::ONE
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.maximum {
            Some(max) if max == self.minimum => write!(f, "{max}"),
            Some(max) => write!(f, "{}..{max}", self.minimum),
            None => write!(f, "{}..*", self.minimum),
        }
    }
}
