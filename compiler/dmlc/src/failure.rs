use std::fmt;

use dml_diagnostic::Observation;

/// A compilation that produced observations instead of a graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileFailure {
    observations: Vec<Observation>,
}

impl CompileFailure {
    pub fn new(observations: Vec<Observation>) -> Self {
        CompileFailure { observations }
    }

    /// Observations in the order they were raised.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Each observation rendered as a line of text.
    pub fn messages(&self) -> Vec<String> {
        self.observations.iter().map(ToString::to_string).collect()
    }

    pub fn into_observations(self) -> Vec<Observation> {
        self.observations
    }
}

impl fmt::Display for CompileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, observation) in self.observations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{observation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileFailure {}
