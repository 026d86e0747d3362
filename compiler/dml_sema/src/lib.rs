//! DML Sema - name resolution and semantic rules
//!
//! The middle of the pipeline:
//!
//! 1. [`merge_namespaces`]: group namespace fragments from every source unit
//!    into one hierarchy, each fragment carrying its [`Scope`].
//! 2. [`SymbolTable::from_groups`]: register every declaration by its
//!    fully-qualified name, recording duplicate and conflicting definitions.
//! 3. [`validate`]: run the semantic rules.
//!
//! Steps 2 and 3 share one `ObservationSink`; graph construction only runs
//! when it is still empty afterwards.
//!
//! All state is owned by one compilation. Nothing here is process-wide.

pub mod merge;
mod scope;
mod symbol_table;
mod universe;
mod validate;

pub use merge::{all_groups, merge_namespaces, Fragment, NamespaceGroup};
pub use scope::Scope;
pub use symbol_table::{Declaration, Resolved, SymbolTable};
pub use universe::{EmptyUniverse, ExternalType, StaticUniverse, TypeUniverse};
pub use validate::{validate, ValidationOptions};
