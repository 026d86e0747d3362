//! DMLC - compiler driver for the domain modeling language
//!
//! Turns source text into a validated, immutable symbol graph:
//!
//! ```text
//! source text -> SourceParser -> SyntaxTree
//!             -> merge_namespaces -> SymbolTable -> validate
//!             -> build_compilation -> Compilation
//! ```
//!
//! Parsing is delegated to a caller-supplied [`SourceParser`]. Parse errors
//! are fatal; definition and semantic observations accumulate over a full
//! pass and are returned together in a [`CompileFailure`]. No graph is
//! produced when anything was observed.
//!
//! # Tracing
//!
//! Call [`init_tracing`] once at startup, then set `DML_LOG` (or
//! `RUST_LOG`), e.g. `DML_LOG=dml_sema=debug`. Set `DML_LOG_TREE=1` for
//! indented span output.

mod failure;
mod options;
mod parser;
mod pipeline;

use std::sync::Once;

pub use failure::CompileFailure;
pub use options::CompileOptions;
pub use parser::{SourceInput, SourceParser};
pub use pipeline::{compile, compile_batch, compile_trees};

pub use dml_diagnostic::{Observation, ParseError};
pub use dml_sema::{EmptyUniverse, StaticUniverse, TypeUniverse};
pub use dml_symbols::Compilation;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber driven by `DML_LOG` or `RUST_LOG`.
///
/// Does nothing when neither is set. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = std::env::var("DML_LOG").or_else(|_| std::env::var("RUST_LOG"));
        let Ok(directives) = directives else {
            return;
        };
        let filter = EnvFilter::new(directives);
        let registry = tracing_subscriber::registry().with(filter);
        if std::env::var_os("DML_LOG_TREE").is_some() {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .init();
        } else {
            registry
                .with(fmt::layer().with_target(true).with_level(true))
                .init();
        }
    });
}
