//! Symbol graph for the domain modeling language.
//!
//! The output of a successful compile: an arena of [`Symbol`]s rooted at a
//! [`Compilation`], built by [`build_compilation`] from validated syntax.
//! Cross-references between declarations are deferred [`TypeLookup`]s so
//! the graph tolerates forward and circular references without a build
//! order. Consumers traverse it through [`SymbolVisitor`] or the closure
//! based [`DelegateVisitor`].

mod build;
mod compilation;
mod delegate;
mod id;
mod lookup;
mod symbol;
pub mod text;
pub mod visitor;

pub use build::build_compilation;
pub use compilation::{Compilation, ResolvedType};
pub use delegate::DelegateVisitor;
pub use id::SymbolId;
pub use lookup::{TypeLookup, TypeRef, TypeReference};
pub use symbol::{
    AtomSymbol, Children, ComplexValueSymbol, EntitySymbol, EventSymbol, ExternalValueSymbol,
    NamespaceSymbol, OperationSymbol, PathSymbol, QuerySymbol, Symbol, SymbolKind,
};
pub use text::{render_summary, IndentedWriter};
pub use visitor::{Node, Subject, SymbolVisitor};

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod fixtures;
