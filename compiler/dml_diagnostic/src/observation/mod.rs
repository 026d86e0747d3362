//! A single human-readable failure and where it came from.

use std::fmt;

/// Placeholder used when a located failure has no source name.
const UNNAMED_SOURCE: &str = "{input}";

/// Position of a parse failure inside a source unit (1-based).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub source_name: Option<String>,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(source_name: Option<String>, line: u32, column: u32) -> Self {
        SourceLocation {
            source_name,
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: line:{}, column:{}",
            self.source_name.as_deref().unwrap_or(UNNAMED_SOURCE),
            self.line,
            self.column
        )
    }
}

/// A validation failure.
///
/// Semantic observations carry only a message. Parse observations may also
/// carry the location reported by the parser.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Observation {
    message: String,
    location: Option<SourceLocation>,
}

impl Observation {
    pub fn new(message: impl Into<String>) -> Self {
        Observation {
            message: message.into(),
            location: None,
        }
    }

    pub fn located(message: impl Into<String>, location: SourceLocation) -> Self {
        Observation {
            message: message.into(),
            location: Some(location),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} ({location})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl From<String> for Observation {
    fn from(value: String) -> Self {
        Observation::new(value)
    }
}

impl From<&str> for Observation {
    fn from(value: &str) -> Self {
        Observation::new(value)
    }
}

/// An error reported by the external parser for one source unit.
///
/// Line and column are optional: some front ends can only report a message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParseError {
    pub message: String,
    pub source_name: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            source_name: None,
            line: None,
            column: None,
        }
    }

    #[must_use]
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    #[must_use]
    pub fn in_source(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = Some(source_name.into());
        self
    }

    /// The position, when both line and column are known.
    pub fn location(&self) -> Option<SourceLocation> {
        match (self.line, self.column) {
            (Some(line), Some(column)) => Some(SourceLocation::new(
                self.source_name.clone(),
                line,
                column,
            )),
            _ => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location() {
            Some(location) => write!(f, "{} ({location})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for Observation {
    fn from(value: ParseError) -> Self {
        match value.location() {
            Some(location) => Observation::located(value.message, location),
            None => Observation::new(value.message),
        }
    }
}
