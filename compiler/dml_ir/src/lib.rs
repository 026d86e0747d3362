//! DML IR - lexical values and the syntax forest
//!
//! This crate contains the data structures shared by every compiler phase:
//! - Identifiers and qualified (dotted) identifiers
//! - Cardinality ranges
//! - Annotations
//! - The built-in scalar type table
//! - The syntax forest produced by a parser front end, plus a visitor over it
//!
//! Every type here is a plain value: `Clone`, `Eq`, `Hash` where it is used
//! as a key, and `Debug`. Nothing in this crate resolves names; that is the
//! job of `dml_sema`.

mod annotation;
mod builtin_type;
mod cardinality;
mod ident;
pub mod syntax;
pub mod visitor;

pub use annotation::{Annotation, AnnotationError, AnnotationPair, AnnotationSet};
pub use builtin_type::BuiltinType;
pub use cardinality::{Cardinality, CardinalityError};
pub use ident::{IdentError, Identifier, QualifiedIdentifier};
pub use syntax::{
    AtomSyntax, DeclarationKind, EntitySyntax, EventSyntax, ExternalEnumSyntax,
    NamespaceMemberSyntax, NamespaceSyntax, OperationKind, OperationSyntax, PropertySyntax,
    SyntaxTree, TypeReferenceSyntax, ValueSyntax, WebApiCommandSyntax, WebApiMemberSyntax,
    WebApiPathSyntax, WebApiQuerySyntax, WebApiSyntax,
};
pub use visitor::SyntaxVisitor;
