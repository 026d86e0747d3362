//! Syntax forest: one [`SyntaxTree`] per source unit.
//!
//! Trees arrive from an external parser structurally well-formed but
//! semantically unverified. Names inside them are unresolved
//! [`QualifiedIdentifier`]s; the semantic passes decide what they refer to.
//!
//! Nodes own their children. Every node type has a `new` constructor taking
//! its required parts plus `with_*` methods for optional parts, so trees can
//! be assembled directly in tests and by parser front ends.

use std::fmt;

use crate::{Annotation, Cardinality, Identifier, QualifiedIdentifier};

/// The parsed contents of one source unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    /// Name of the source unit, if known (used in messages).
    pub source_name: Option<String>,
    /// Unit-level imports.
    pub imports: Vec<QualifiedIdentifier>,
    pub namespaces: Vec<NamespaceSyntax>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        SyntaxTree::default()
    }

    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_import(mut self, import: QualifiedIdentifier) -> Self {
        self.imports.push(import);
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: NamespaceSyntax) -> Self {
        self.namespaces.push(namespace);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

/// A `namespace A.B { ... }` block.
///
/// `name` is relative to the enclosing namespace, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceSyntax {
    pub name: QualifiedIdentifier,
    pub imports: Vec<QualifiedIdentifier>,
    pub members: Vec<NamespaceMemberSyntax>,
}

impl NamespaceSyntax {
    pub fn new(name: QualifiedIdentifier) -> Self {
        NamespaceSyntax {
            name,
            imports: Vec::new(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_import(mut self, import: QualifiedIdentifier) -> Self {
        self.imports.push(import);
        self
    }

    #[must_use]
    pub fn with_member(mut self, member: impl Into<NamespaceMemberSyntax>) -> Self {
        self.members.push(member.into());
        self
    }

    /// Nested namespace blocks, in source order.
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceSyntax> {
        self.members.iter().filter_map(|member| match member {
            NamespaceMemberSyntax::Namespace(ns) => Some(ns),
            _ => None,
        })
    }
}

/// Anything that may appear directly inside a namespace block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamespaceMemberSyntax {
    Namespace(NamespaceSyntax),
    Entity(EntitySyntax),
    Value(ValueSyntax),
    ExternalEnum(ExternalEnumSyntax),
    WebApi(WebApiSyntax),
}

impl NamespaceMemberSyntax {
    /// Short name of the member.
    pub fn name(&self) -> Option<&Identifier> {
        match self {
            NamespaceMemberSyntax::Namespace(_) => None,
            NamespaceMemberSyntax::Entity(entity) => Some(&entity.name),
            NamespaceMemberSyntax::Value(value) => Some(&value.name),
            NamespaceMemberSyntax::ExternalEnum(external) => Some(&external.name),
            NamespaceMemberSyntax::WebApi(api) => Some(&api.path.operation.name),
        }
    }
}

impl From<NamespaceSyntax> for NamespaceMemberSyntax {
    fn from(value: NamespaceSyntax) -> Self {
        NamespaceMemberSyntax::Namespace(value)
    }
}

impl From<EntitySyntax> for NamespaceMemberSyntax {
    fn from(value: EntitySyntax) -> Self {
        NamespaceMemberSyntax::Entity(value)
    }
}

impl From<ValueSyntax> for NamespaceMemberSyntax {
    fn from(value: ValueSyntax) -> Self {
        NamespaceMemberSyntax::Value(value)
    }
}

impl From<ExternalEnumSyntax> for NamespaceMemberSyntax {
    fn from(value: ExternalEnumSyntax) -> Self {
        NamespaceMemberSyntax::ExternalEnum(value)
    }
}

impl From<WebApiSyntax> for NamespaceMemberSyntax {
    fn from(value: WebApiSyntax) -> Self {
        NamespaceMemberSyntax::WebApi(value)
    }
}

/// The kinds of named declaration the symbol table registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Entity,
    Event,
    Value,
    ExternalEnum,
    WebApi,
}

impl DeclarationKind {
    pub const fn name(self) -> &'static str {
        match self {
            DeclarationKind::Entity => "Entity",
            DeclarationKind::Event => "Event",
            DeclarationKind::Value => "Value",
            DeclarationKind::ExternalEnum => "ExternalEnum",
            DeclarationKind::WebApi => "WebApi",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An enum whose members live in the external type universe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalEnumSyntax {
    pub annotations: Vec<Annotation>,
    pub name: Identifier,
}

impl ExternalEnumSyntax {
    pub fn new(name: Identifier) -> Self {
        ExternalEnumSyntax {
            annotations: Vec::new(),
            name,
        }
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A written reference to a type: `Name`, `Name?`, `Name*`, ...
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeReferenceSyntax {
    pub name: QualifiedIdentifier,
    pub cardinality: Cardinality,
}

impl TypeReferenceSyntax {
    pub fn new(name: QualifiedIdentifier, cardinality: Cardinality) -> Self {
        TypeReferenceSyntax { name, cardinality }
    }

    /// A reference with cardinality exactly one.
    pub fn one(name: QualifiedIdentifier) -> Self {
        TypeReferenceSyntax::new(name, Cardinality::ONE)
    }
}

/// An entity declaration with its events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntitySyntax {
    pub annotations: Vec<Annotation>,
    pub is_abstract: bool,
    pub name: Identifier,
    pub identity_type: Option<TypeReferenceSyntax>,
    pub base: Option<TypeReferenceSyntax>,
    pub events: Vec<EventSyntax>,
}

impl EntitySyntax {
    pub fn new(name: Identifier) -> Self {
        EntitySyntax {
            annotations: Vec::new(),
            is_abstract: false,
            name,
            identity_type: None,
            base: None,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_identity(mut self, identity: TypeReferenceSyntax) -> Self {
        self.identity_type = Some(identity);
        self
    }

    #[must_use]
    pub fn with_base(mut self, base: TypeReferenceSyntax) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn with_event(mut self, event: EventSyntax) -> Self {
        self.events.push(event);
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

/// A domain event owned by an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventSyntax {
    pub annotations: Vec<Annotation>,
    pub is_abstract: bool,
    pub name: Identifier,
    pub base: Option<TypeReferenceSyntax>,
    pub properties: Vec<PropertySyntax>,
}

impl EventSyntax {
    pub fn new(name: Identifier) -> Self {
        EventSyntax {
            annotations: Vec::new(),
            is_abstract: false,
            name,
            base: None,
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_base(mut self, base: TypeReferenceSyntax) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: PropertySyntax) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

/// A value declaration.
///
/// External values carry only a name and an optional base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueSyntax {
    pub annotations: Vec<Annotation>,
    pub is_abstract: bool,
    pub is_external: bool,
    pub name: Identifier,
    pub base: Option<TypeReferenceSyntax>,
    pub properties: Vec<PropertySyntax>,
    /// Property names that make up structural equality.
    pub equal_by: Vec<Identifier>,
}

impl ValueSyntax {
    pub fn new(name: Identifier) -> Self {
        ValueSyntax {
            annotations: Vec::new(),
            is_abstract: false,
            is_external: false,
            name,
            base: None,
            properties: Vec::new(),
            equal_by: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_base(mut self, base: TypeReferenceSyntax) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: PropertySyntax) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn with_equal_by(mut self, property: Identifier) -> Self {
        self.equal_by.push(property);
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn into_external(mut self) -> Self {
        self.is_external = true;
        self
    }
}

/// A named, typed slot: an operation argument or a query filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtomSyntax {
    pub annotations: Vec<Annotation>,
    pub ty: TypeReferenceSyntax,
    pub name: Identifier,
}

impl AtomSyntax {
    pub fn new(name: Identifier, ty: TypeReferenceSyntax) -> Self {
        AtomSyntax {
            annotations: Vec::new(),
            ty,
            name,
        }
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A property of an event or value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertySyntax {
    pub atom: AtomSyntax,
    pub alias: Option<Identifier>,
}

impl PropertySyntax {
    pub fn new(name: Identifier, ty: TypeReferenceSyntax) -> Self {
        PropertySyntax {
            atom: AtomSyntax::new(name, ty),
            alias: None,
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: Identifier) -> Self {
        self.alias = Some(alias);
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.atom.annotations.push(annotation);
        self
    }

    pub fn name(&self) -> &Identifier {
        &self.atom.name
    }
}

/// Command, query or path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Command,
    Query,
    Path,
}

impl OperationKind {
    pub const fn name(self) -> &'static str {
        match self {
            OperationKind::Command => "Command",
            OperationKind::Query => "Query",
            OperationKind::Path => "Path",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parts shared by every web-API operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationSyntax {
    pub annotations: Vec<Annotation>,
    pub name: Identifier,
    pub result: TypeReferenceSyntax,
    /// At most one is valid; extra arguments are a semantic error.
    pub arguments: Vec<AtomSyntax>,
}

impl OperationSyntax {
    pub fn new(name: Identifier, result: TypeReferenceSyntax) -> Self {
        OperationSyntax {
            annotations: Vec::new(),
            name,
            result,
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: AtomSyntax) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebApiCommandSyntax {
    pub operation: OperationSyntax,
}

impl WebApiCommandSyntax {
    pub fn new(operation: OperationSyntax) -> Self {
        WebApiCommandSyntax { operation }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebApiQuerySyntax {
    pub operation: OperationSyntax,
    pub filters: Vec<AtomSyntax>,
}

impl WebApiQuerySyntax {
    pub fn new(operation: OperationSyntax) -> Self {
        WebApiQuerySyntax {
            operation,
            filters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: AtomSyntax) -> Self {
        self.filters.push(filter);
        self
    }
}

/// A path segment: an operation that also owns nested members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebApiPathSyntax {
    pub operation: OperationSyntax,
    pub filters: Vec<AtomSyntax>,
    pub members: Vec<WebApiMemberSyntax>,
}

impl WebApiPathSyntax {
    pub fn new(operation: OperationSyntax) -> Self {
        WebApiPathSyntax {
            operation,
            filters: Vec::new(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: AtomSyntax) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn with_member(mut self, member: impl Into<WebApiMemberSyntax>) -> Self {
        self.members.push(member.into());
        self
    }
}

/// Anything nested inside a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebApiMemberSyntax {
    Command(WebApiCommandSyntax),
    Query(WebApiQuerySyntax),
    Path(WebApiPathSyntax),
}

impl WebApiMemberSyntax {
    pub fn operation(&self) -> &OperationSyntax {
        match self {
            WebApiMemberSyntax::Command(command) => &command.operation,
            WebApiMemberSyntax::Query(query) => &query.operation,
            WebApiMemberSyntax::Path(path) => &path.operation,
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            WebApiMemberSyntax::Command(_) => OperationKind::Command,
            WebApiMemberSyntax::Query(_) => OperationKind::Query,
            WebApiMemberSyntax::Path(_) => OperationKind::Path,
        }
    }
}

impl From<WebApiCommandSyntax> for WebApiMemberSyntax {
    fn from(value: WebApiCommandSyntax) -> Self {
        WebApiMemberSyntax::Command(value)
    }
}

impl From<WebApiQuerySyntax> for WebApiMemberSyntax {
    fn from(value: WebApiQuerySyntax) -> Self {
        WebApiMemberSyntax::Query(value)
    }
}

impl From<WebApiPathSyntax> for WebApiMemberSyntax {
    fn from(value: WebApiPathSyntax) -> Self {
        WebApiMemberSyntax::Path(value)
    }
}

/// The root of a web-API surface: a namespace-level path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebApiSyntax {
    pub path: WebApiPathSyntax,
}

impl WebApiSyntax {
    pub fn new(path: WebApiPathSyntax) -> Self {
        WebApiSyntax { path }
    }

    pub fn name(&self) -> &Identifier {
        &self.path.operation.name
    }
}
