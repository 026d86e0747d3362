//! Symbol graph visitor.
//!
//! One `visit_*` method per symbol kind, each defaulting to the matching
//! `walk_*` function that recurses into the kind's natural children:
//!
//! - compilation: top-level namespaces
//! - namespace: members
//! - entity: events
//! - event, complex value: properties
//! - web-API root or path: filters, then members
//! - query: filters
//!
//! Overriding a `visit_*` method without calling its `walk_*` function prunes
//! that subtree. [`SymbolVisitor::not_interested_in`] prunes by subject
//! before any method runs.

use dml_ir::QualifiedIdentifier;

use crate::{
    AtomSymbol, Compilation, ComplexValueSymbol, EntitySymbol, EventSymbol, ExternalValueSymbol,
    NamespaceSymbol, OperationSymbol, PathSymbol, QuerySymbol, Symbol, SymbolId, SymbolKind,
};

/// Anything a visitor can be asked about.
#[derive(Clone, Copy, Debug)]
pub enum Subject<'g> {
    Compilation,
    Symbol(SymbolId, &'g Symbol),
    Atom(&'g AtomSymbol),
}

/// One symbol seen through its kind-specific payload.
#[derive(Debug)]
pub struct Node<'g, T> {
    pub graph: &'g Compilation,
    pub id: SymbolId,
    pub symbol: &'g Symbol,
    pub data: &'g T,
}

impl<T> Clone for Node<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Node<'_, T> {}

impl<'g, T> Node<'g, T> {
    pub fn name(&self) -> &'g dml_ir::Identifier {
        &self.symbol.name
    }

    pub fn full_name(&self) -> QualifiedIdentifier {
        self.graph.full_name(self.id)
    }
}

pub trait SymbolVisitor<'g> {
    /// Skip `subject` and everything below it.
    fn not_interested_in(&mut self, _subject: &Subject<'g>) -> bool {
        false
    }

    fn visit_compilation(&mut self, graph: &'g Compilation) {
        walk_compilation(self, graph);
    }

    fn visit_namespace(&mut self, node: Node<'g, NamespaceSymbol>) {
        walk_namespace(self, node);
    }

    fn visit_entity(&mut self, node: Node<'g, EntitySymbol>) {
        walk_entity(self, node);
    }

    fn visit_event(&mut self, node: Node<'g, EventSymbol>) {
        walk_event(self, node);
    }

    fn visit_complex_value(&mut self, node: Node<'g, ComplexValueSymbol>) {
        walk_complex_value(self, node);
    }

    fn visit_external_value(&mut self, _node: Node<'g, ExternalValueSymbol>) {}

    fn visit_external_enum(&mut self, _node: Node<'g, ()>) {}

    fn visit_web_api(&mut self, node: Node<'g, PathSymbol>) {
        walk_path(self, node);
    }

    fn visit_path(&mut self, node: Node<'g, PathSymbol>) {
        walk_path(self, node);
    }

    fn visit_query(&mut self, node: Node<'g, QuerySymbol>) {
        walk_query(self, node);
    }

    fn visit_command(&mut self, _node: Node<'g, OperationSymbol>) {}

    /// A property, or a path or query filter.
    fn visit_atom(&mut self, _graph: &'g Compilation, _atom: &'g AtomSymbol) {}
}

/// Dispatch `id` to the visit method of its kind.
pub fn visit_symbol<'g, V: SymbolVisitor<'g> + ?Sized>(
    visitor: &mut V,
    graph: &'g Compilation,
    id: SymbolId,
) {
    let symbol = graph.symbol(id);
    if visitor.not_interested_in(&Subject::Symbol(id, symbol)) {
        return;
    }
    match &symbol.kind {
        SymbolKind::Namespace(data) => visitor.visit_namespace(Node { graph, id, symbol, data }),
        SymbolKind::Entity(data) => visitor.visit_entity(Node { graph, id, symbol, data }),
        SymbolKind::Event(data) => visitor.visit_event(Node { graph, id, symbol, data }),
        SymbolKind::ComplexValue(data) => {
            visitor.visit_complex_value(Node { graph, id, symbol, data });
        }
        SymbolKind::ExternalValue(data) => {
            visitor.visit_external_value(Node { graph, id, symbol, data });
        }
        SymbolKind::ExternalEnum => visitor.visit_external_enum(Node {
            graph,
            id,
            symbol,
            data: &(),
        }),
        SymbolKind::WebApi(data) => visitor.visit_web_api(Node { graph, id, symbol, data }),
        SymbolKind::WebApiPath(data) => visitor.visit_path(Node { graph, id, symbol, data }),
        SymbolKind::WebApiQuery(data) => visitor.visit_query(Node { graph, id, symbol, data }),
        SymbolKind::WebApiCommand(data) => visitor.visit_command(Node { graph, id, symbol, data }),
    }
}

fn visit_atoms<'g, V: SymbolVisitor<'g> + ?Sized>(
    visitor: &mut V,
    graph: &'g Compilation,
    atoms: &'g [AtomSymbol],
) {
    for atom in atoms {
        if !visitor.not_interested_in(&Subject::Atom(atom)) {
            visitor.visit_atom(graph, atom);
        }
    }
}

fn visit_all<'g, V: SymbolVisitor<'g> + ?Sized>(
    visitor: &mut V,
    graph: &'g Compilation,
    ids: &'g [SymbolId],
) {
    for &id in ids {
        visit_symbol(visitor, graph, id);
    }
}

pub fn walk_compilation<'g, V: SymbolVisitor<'g> + ?Sized>(
    visitor: &mut V,
    graph: &'g Compilation,
) {
    visit_all(visitor, graph, graph.namespaces());
}

pub fn walk_namespace<'g, V: SymbolVisitor<'g> + ?Sized>(
    visitor: &mut V,
    node: Node<'g, NamespaceSymbol>,
) {
    visit_all(visitor, node.graph, node.data.members.ids());
}

pub fn walk_entity<'g, V: SymbolVisitor<'g> + ?Sized>(
    visitor: &mut V,
    node: Node<'g, EntitySymbol>,
) {
    visit_all(visitor, node.graph, node.data.events.ids());
}

pub fn walk_event<'g, V: SymbolVisitor<'g> + ?Sized>(visitor: &mut V, node: Node<'g, EventSymbol>) {
    visit_atoms(visitor, node.graph, &node.data.properties);
}

pub fn walk_complex_value<'g, V: SymbolVisitor<'g> + ?Sized>(
    visitor: &mut V,
    node: Node<'g, ComplexValueSymbol>,
) {
    visit_atoms(visitor, node.graph, &node.data.properties);
}

/// Filters, then members. Used for web-API roots and nested paths alike.
pub fn walk_path<'g, V: SymbolVisitor<'g> + ?Sized>(visitor: &mut V, node: Node<'g, PathSymbol>) {
    visit_atoms(visitor, node.graph, &node.data.filters);
    visit_all(visitor, node.graph, node.data.members.ids());
}

pub fn walk_query<'g, V: SymbolVisitor<'g> + ?Sized>(visitor: &mut V, node: Node<'g, QuerySymbol>) {
    visit_atoms(visitor, node.graph, &node.data.filters);
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
