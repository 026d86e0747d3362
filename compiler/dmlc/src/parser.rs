//! The parser boundary.
//!
//! Grammar and tokenizer live outside the compiler. A [`SourceParser`]
//! turns one source unit into a [`SyntaxTree`] or reports why it could not.

use dml_diagnostic::ParseError;
use dml_ir::SyntaxTree;

/// One source unit to compile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceInput {
    pub text: String,
    /// Shown in parse error locations; `{input}` when absent.
    pub source_name: Option<String>,
}

impl SourceInput {
    pub fn new(text: impl Into<String>) -> Self {
        SourceInput {
            text: text.into(),
            source_name: None,
        }
    }

    pub fn named(text: impl Into<String>, source_name: impl Into<String>) -> Self {
        SourceInput {
            text: text.into(),
            source_name: Some(source_name.into()),
        }
    }

    /// Whether the text contains nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Parses the text of one source unit.
///
/// `Sync` so one parser can serve parallel batch compilation.
pub trait SourceParser: Sync {
    fn parse(&self, text: &str, source_name: Option<&str>) -> Result<SyntaxTree, Vec<ParseError>>;
}

impl<F> SourceParser for F
where
    F: Fn(&str, Option<&str>) -> Result<SyntaxTree, Vec<ParseError>> + Sync,
{
    fn parse(&self, text: &str, source_name: Option<&str>) -> Result<SyntaxTree, Vec<ParseError>> {
        self(text, source_name)
    }
}

/// Parse one input. Blank text yields an empty tree without calling `parser`.
pub(crate) fn parse_input<P: SourceParser + ?Sized>(
    parser: &P,
    input: &SourceInput,
) -> Result<SyntaxTree, Vec<ParseError>> {
    if input.is_blank() {
        let tree = SyntaxTree::new();
        return Ok(match &input.source_name {
            Some(name) => tree.with_source_name(name.clone()),
            None => tree,
        });
    }

    let source_name = input.source_name.as_deref();
    parser.parse(&input.text, source_name).map_err(|errors| {
        errors
            .into_iter()
            .map(|error| match (&error.source_name, source_name) {
                (None, Some(name)) => error.in_source(name),
                _ => error,
            })
            .collect()
    })
}
