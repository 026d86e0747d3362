//! Compiler configuration.

use std::sync::Arc;

use dml_sema::{EmptyUniverse, TypeUniverse, ValidationOptions};

/// Options for one compilation.
///
/// The defaults run every semantic rule, including base-cycle detection,
/// against an empty external type universe and report every observation.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Maximum observations to report (0 = unlimited).
    pub observation_limit: usize,
    /// Report declarations whose base chain loops back to themselves.
    pub detect_base_cycles: bool,
    /// Types that live outside the compiled sources.
    pub universe: Arc<dyn TypeUniverse>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            observation_limit: 0,
            detect_base_cycles: true,
            universe: Arc::new(EmptyUniverse),
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_observation_limit(mut self, limit: usize) -> Self {
        self.observation_limit = limit;
        self
    }

    #[must_use]
    pub fn with_base_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_base_cycles = enabled;
        self
    }

    #[must_use]
    pub fn with_universe(mut self, universe: Arc<dyn TypeUniverse>) -> Self {
        self.universe = universe;
        self
    }

    pub(crate) fn validation(&self) -> ValidationOptions {
        ValidationOptions {
            detect_base_cycles: self.detect_base_cycles,
        }
    }
}
