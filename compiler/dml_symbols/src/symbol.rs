//! Symbol arena entries.
//!
//! Each [`Symbol`] is a name, a parent link and an annotation set around a
//! kind-specific payload ([`SymbolKind`]). Containers own their children by
//! ID; every cross-reference between declarations is a [`TypeLookup`] or
//! [`TypeReference`] and never a structural link.

use dml_ir::{Annotation, AnnotationSet, DeclarationKind, Identifier, OperationKind};

use crate::{SymbolId, TypeLookup, TypeReference};

/// Child IDs of a container, assigned exactly once after the children exist.
#[derive(Debug, Default)]
pub struct Children(Option<Vec<SymbolId>>);

impl Children {
    pub fn new() -> Self {
        Children(None)
    }

    /// Record the children. Assigning twice is a builder bug.
    pub fn assign(&mut self, ids: Vec<SymbolId>) {
        assert!(self.0.is_none(), "children were already assigned");
        self.0 = Some(ids);
    }

    pub fn ids(&self) -> &[SymbolId] {
        self.0.as_deref().unwrap_or_default()
    }

    pub fn is_assigned(&self) -> bool {
        self.0.is_some()
    }
}

/// A named, typed slot: a property, an operation argument or a query filter.
#[derive(Debug)]
pub struct AtomSymbol {
    pub name: Identifier,
    pub annotations: AnnotationSet,
    pub reference: TypeReference,
    /// Property alias; always `None` for arguments and filters.
    pub alias: Option<Identifier>,
}

impl AtomSymbol {
    pub fn annotations(&self, name: &str) -> &[Annotation] {
        self.annotations.get(name)
    }

    pub fn first_annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.first(name)
    }

    pub fn single_annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.single(name)
    }
}

#[derive(Debug, Default)]
pub struct NamespaceSymbol {
    /// Types in fragment order, then child namespaces.
    pub members: Children,
}

#[derive(Debug)]
pub struct EntitySymbol {
    pub is_abstract: bool,
    pub identity: Option<TypeReference>,
    pub base: Option<TypeLookup>,
    pub events: Children,
}

#[derive(Debug)]
pub struct EventSymbol {
    pub is_abstract: bool,
    pub base: Option<TypeLookup>,
    pub properties: Vec<AtomSymbol>,
}

#[derive(Debug)]
pub struct ComplexValueSymbol {
    pub is_abstract: bool,
    pub base: Option<TypeLookup>,
    pub properties: Vec<AtomSymbol>,
    /// Property names that define structural equality.
    pub equal_by: Vec<Identifier>,
}

#[derive(Debug)]
pub struct ExternalValueSymbol {
    pub base: Option<TypeLookup>,
}

/// Fields shared by every web-API node.
#[derive(Debug)]
pub struct OperationSymbol {
    pub kind: OperationKind,
    pub result: TypeReference,
    pub argument: Option<AtomSymbol>,
}

#[derive(Debug)]
pub struct QuerySymbol {
    pub operation: OperationSymbol,
    pub filters: Vec<AtomSymbol>,
}

/// A web-API root or a nested path segment.
#[derive(Debug)]
pub struct PathSymbol {
    pub operation: OperationSymbol,
    pub filters: Vec<AtomSymbol>,
    /// Commands, then queries, then nested paths.
    pub members: Children,
}

#[derive(Debug)]
pub enum SymbolKind {
    Namespace(NamespaceSymbol),
    Entity(EntitySymbol),
    Event(EventSymbol),
    ComplexValue(ComplexValueSymbol),
    ExternalValue(ExternalValueSymbol),
    ExternalEnum,
    WebApi(PathSymbol),
    WebApiPath(PathSymbol),
    WebApiQuery(QuerySymbol),
    WebApiCommand(OperationSymbol),
}

impl SymbolKind {
    /// Display name of the kind, e.g. `"ComplexValue"`.
    pub fn name(&self) -> &'static str {
        match self {
            SymbolKind::Namespace(_) => "Namespace",
            SymbolKind::Entity(_) => "Entity",
            SymbolKind::Event(_) => "Event",
            SymbolKind::ComplexValue(_) => "ComplexValue",
            SymbolKind::ExternalValue(_) => "ExternalValue",
            SymbolKind::ExternalEnum => "ExternalEnum",
            SymbolKind::WebApi(_) => "WebApi",
            SymbolKind::WebApiPath(_) => "WebApiPath",
            SymbolKind::WebApiQuery(_) => "WebApiQuery",
            SymbolKind::WebApiCommand(_) => "WebApiCommand",
        }
    }

    /// The declaration kind this symbol was built from, if it is a type.
    pub fn declaration_kind(&self) -> Option<DeclarationKind> {
        match self {
            SymbolKind::Entity(_) => Some(DeclarationKind::Entity),
            SymbolKind::Event(_) => Some(DeclarationKind::Event),
            SymbolKind::ComplexValue(_) | SymbolKind::ExternalValue(_) => {
                Some(DeclarationKind::Value)
            }
            SymbolKind::ExternalEnum => Some(DeclarationKind::ExternalEnum),
            SymbolKind::WebApi(_) => Some(DeclarationKind::WebApi),
            _ => None,
        }
    }

    /// Base lookup of an entity, event or value.
    pub fn base(&self) -> Option<&TypeLookup> {
        match self {
            SymbolKind::Entity(entity) => entity.base.as_ref(),
            SymbolKind::Event(event) => event.base.as_ref(),
            SymbolKind::ComplexValue(value) => value.base.as_ref(),
            SymbolKind::ExternalValue(value) => value.base.as_ref(),
            _ => None,
        }
    }

    /// Properties of an event or complex value; empty for anything else.
    pub fn properties(&self) -> &[AtomSymbol] {
        match self {
            SymbolKind::Event(event) => &event.properties,
            SymbolKind::ComplexValue(value) => &value.properties,
            _ => &[],
        }
    }

    pub fn operation(&self) -> Option<&OperationSymbol> {
        match self {
            SymbolKind::WebApi(path) | SymbolKind::WebApiPath(path) => Some(&path.operation),
            SymbolKind::WebApiQuery(query) => Some(&query.operation),
            SymbolKind::WebApiCommand(operation) => Some(operation),
            _ => None,
        }
    }

    /// Owned children in traversal order.
    pub fn children(&self) -> &[SymbolId] {
        match self {
            SymbolKind::Namespace(namespace) => namespace.members.ids(),
            SymbolKind::Entity(entity) => entity.events.ids(),
            SymbolKind::WebApi(path) | SymbolKind::WebApiPath(path) => path.members.ids(),
            _ => &[],
        }
    }

    /// Whether this symbol is a type other declarations can refer to.
    pub fn is_type(&self) -> bool {
        self.declaration_kind().is_some()
    }
}

/// One entry of the symbol arena.
#[derive(Debug)]
pub struct Symbol {
    pub name: Identifier,
    /// `None` only for top-level namespaces.
    pub parent: Option<SymbolId>,
    pub annotations: AnnotationSet,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn annotations(&self, name: &str) -> &[Annotation] {
        self.annotations.get(name)
    }

    pub fn first_annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.first(name)
    }

    pub fn single_annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.single(name)
    }

    /// Mutable child list of a container, for the builder.
    pub(crate) fn children_mut(&mut self) -> Option<&mut Children> {
        match &mut self.kind {
            SymbolKind::Namespace(namespace) => Some(&mut namespace.members),
            SymbolKind::Entity(entity) => Some(&mut entity.events),
            SymbolKind::WebApi(path) | SymbolKind::WebApiPath(path) => Some(&mut path.members),
            _ => None,
        }
    }
}
