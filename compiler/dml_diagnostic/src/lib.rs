//! DML Diagnostic - accumulated compiler observations
//!
//! Semantic passes never stop at the first problem. Every rule runs to
//! completion and pushes its findings into an [`ObservationSink`]; the driver
//! inspects the sink once a whole phase has finished.
//!
//! Parse failures arrive from the external parser as [`ParseError`]s and are
//! converted into located [`Observation`]s.

mod observation;
mod sink;

pub use observation::{Observation, ParseError, SourceLocation};
pub use sink::ObservationSink;
