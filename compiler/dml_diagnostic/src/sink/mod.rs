//! Accumulator for observations raised during one compilation.
//!
//! One sink belongs to exactly one compilation. Passes borrow it mutably,
//! push whatever they find, and keep going.

use crate::Observation;

/// Ordered collection of observations.
///
/// # Example
///
/// ```text
/// let mut sink = ObservationSink::new();
/// sink.fail_if(entity.base.is_none(), || format!("Entity '{name}' ..."));
/// // ... run every other rule
/// if !sink.is_empty() { return Err(sink.into_vec()); }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObservationSink {
    observations: Vec<Observation>,
}

impl ObservationSink {
    pub fn new() -> Self {
        ObservationSink::default()
    }

    pub fn push(&mut self, observation: impl Into<Observation>) {
        self.observations.push(observation.into());
    }

    /// Record a failure message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.observations.push(Observation::new(message));
    }

    /// Record a failure when `condition` holds. The message is only built on failure.
    pub fn fail_if<F>(&mut self, condition: bool, message: F)
    where
        F: FnOnce() -> String,
    {
        if condition {
            self.fail(message());
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// The observations in the order they were raised.
    pub fn into_vec(self) -> Vec<Observation> {
        self.observations
    }

    /// The observations, keeping at most `limit` (0 = unlimited).
    ///
    /// When anything is dropped, a final note `... and N more observations`
    /// is appended.
    pub fn into_limited(self, limit: usize) -> Vec<Observation> {
        let mut observations = self.observations;
        if limit == 0 || observations.len() <= limit {
            return observations;
        }
        let dropped = observations.len() - limit;
        observations.truncate(limit);
        observations.push(Observation::new(format!(
            "... and {dropped} more observations"
        )));
        observations
    }
}

impl Extend<Observation> for ObservationSink {
    fn extend<T: IntoIterator<Item = Observation>>(&mut self, iter: T) {
        self.observations.extend(iter);
    }
}

impl IntoIterator for ObservationSink {
    type Item = Observation;
    type IntoIter = std::vec::IntoIter<Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ObservationSink {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests;
