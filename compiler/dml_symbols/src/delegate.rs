//! Closure-driven visitor.
//!
//! [`DelegateVisitor`] lets a consumer handle a few symbol kinds without
//! writing a visitor type. Each handler receives the node and the default
//! continuation: calling the continuation walks the node's children, so a
//! handler can do work before and after them, or prune the subtree by not
//! calling it. Kinds without a handler take the default traversal.
//!
//! Handlers are `Fn` because they re-enter: a path handler runs again for
//! every nested path reached through its own continuation. Keep mutable
//! state in a `Cell` or `RefCell`.

use std::rc::Rc;

use crate::visitor::{
    walk_compilation, walk_complex_value, walk_entity, walk_event, walk_namespace, walk_path,
    walk_query, Node, Subject, SymbolVisitor,
};
use crate::{
    AtomSymbol, Compilation, ComplexValueSymbol, EntitySymbol, EventSymbol, ExternalValueSymbol,
    NamespaceSymbol, OperationSymbol, PathSymbol, QuerySymbol,
};

/// A handler for one symbol kind: the node, then the default continuation.
type Handler<'g, T> = Rc<dyn Fn(Node<'g, T>, &mut dyn FnMut(Node<'g, T>)) + 'g>;

type CompilationHandler<'g> = Rc<dyn Fn(&'g Compilation, &mut dyn FnMut(&'g Compilation)) + 'g>;

#[derive(Default)]
pub struct DelegateVisitor<'g> {
    not_interested: Option<Box<dyn FnMut(&Subject<'g>) -> bool + 'g>>,
    compilation: Option<CompilationHandler<'g>>,
    namespace: Option<Handler<'g, NamespaceSymbol>>,
    entity: Option<Handler<'g, EntitySymbol>>,
    event: Option<Handler<'g, EventSymbol>>,
    complex_value: Option<Handler<'g, ComplexValueSymbol>>,
    external_value: Option<Handler<'g, ExternalValueSymbol>>,
    external_enum: Option<Handler<'g, ()>>,
    web_api: Option<Handler<'g, PathSymbol>>,
    path: Option<Handler<'g, PathSymbol>>,
    query: Option<Handler<'g, QuerySymbol>>,
    command: Option<Handler<'g, OperationSymbol>>,
    atom: Option<Box<dyn FnMut(&'g AtomSymbol) + 'g>>,
}

impl<'g> DelegateVisitor<'g> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn skip_when(mut self, predicate: impl FnMut(&Subject<'g>) -> bool + 'g) -> Self {
        self.not_interested = Some(Box::new(predicate));
        self
    }

    /// The root; the continuation walks the top-level namespaces.
    #[must_use]
    pub fn on_compilation(
        mut self,
        handler: impl Fn(&'g Compilation, &mut dyn FnMut(&'g Compilation)) + 'g,
    ) -> Self {
        self.compilation = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_namespace(
        mut self,
        handler: impl Fn(Node<'g, NamespaceSymbol>, &mut dyn FnMut(Node<'g, NamespaceSymbol>)) + 'g,
    ) -> Self {
        self.namespace = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_entity(
        mut self,
        handler: impl Fn(Node<'g, EntitySymbol>, &mut dyn FnMut(Node<'g, EntitySymbol>)) + 'g,
    ) -> Self {
        self.entity = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_event(
        mut self,
        handler: impl Fn(Node<'g, EventSymbol>, &mut dyn FnMut(Node<'g, EventSymbol>)) + 'g,
    ) -> Self {
        self.event = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_complex_value(
        mut self,
        handler: impl Fn(Node<'g, ComplexValueSymbol>, &mut dyn FnMut(Node<'g, ComplexValueSymbol>))
            + 'g,
    ) -> Self {
        self.complex_value = Some(Rc::new(handler));
        self
    }

    /// External values have no children; the continuation does nothing.
    #[must_use]
    pub fn on_external_value(
        mut self,
        handler: impl Fn(
                Node<'g, ExternalValueSymbol>,
                &mut dyn FnMut(Node<'g, ExternalValueSymbol>),
            ) + 'g,
    ) -> Self {
        self.external_value = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_external_enum(
        mut self,
        handler: impl Fn(Node<'g, ()>, &mut dyn FnMut(Node<'g, ()>)) + 'g,
    ) -> Self {
        self.external_enum = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_web_api(
        mut self,
        handler: impl Fn(Node<'g, PathSymbol>, &mut dyn FnMut(Node<'g, PathSymbol>)) + 'g,
    ) -> Self {
        self.web_api = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_path(
        mut self,
        handler: impl Fn(Node<'g, PathSymbol>, &mut dyn FnMut(Node<'g, PathSymbol>)) + 'g,
    ) -> Self {
        self.path = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_query(
        mut self,
        handler: impl Fn(Node<'g, QuerySymbol>, &mut dyn FnMut(Node<'g, QuerySymbol>)) + 'g,
    ) -> Self {
        self.query = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_command(
        mut self,
        handler: impl Fn(Node<'g, OperationSymbol>, &mut dyn FnMut(Node<'g, OperationSymbol>)) + 'g,
    ) -> Self {
        self.command = Some(Rc::new(handler));
        self
    }

    /// Properties and filters. Atoms have no children to descend into.
    #[must_use]
    pub fn on_atom(mut self, handler: impl FnMut(&'g AtomSymbol) + 'g) -> Self {
        self.atom = Some(Box::new(handler));
        self
    }

    /// Walk `graph` from the root.
    pub fn run(&mut self, graph: &'g Compilation) {
        graph.accept(self);
    }

    /// Hand `node` to `handler` with `walk` as its continuation, or just walk.
    fn dispatch<T>(
        &mut self,
        handler: Option<Handler<'g, T>>,
        node: Node<'g, T>,
        walk: fn(&mut Self, Node<'g, T>),
    ) {
        match handler {
            Some(handler) => (*handler)(node, &mut |node| walk(self, node)),
            None => walk(self, node),
        }
    }
}

fn no_children<V: ?Sized, T>(_visitor: &mut V, _node: Node<'_, T>) {}

impl<'g> SymbolVisitor<'g> for DelegateVisitor<'g> {
    fn not_interested_in(&mut self, subject: &Subject<'g>) -> bool {
        self.not_interested
            .as_mut()
            .is_some_and(|predicate| predicate(subject))
    }

    fn visit_compilation(&mut self, graph: &'g Compilation) {
        match self.compilation.clone() {
            Some(handler) => (*handler)(graph, &mut |graph| walk_compilation(self, graph)),
            None => walk_compilation(self, graph),
        }
    }

    fn visit_namespace(&mut self, node: Node<'g, NamespaceSymbol>) {
        self.dispatch(self.namespace.clone(), node, walk_namespace);
    }

    fn visit_entity(&mut self, node: Node<'g, EntitySymbol>) {
        self.dispatch(self.entity.clone(), node, walk_entity);
    }

    fn visit_event(&mut self, node: Node<'g, EventSymbol>) {
        self.dispatch(self.event.clone(), node, walk_event);
    }

    fn visit_complex_value(&mut self, node: Node<'g, ComplexValueSymbol>) {
        self.dispatch(self.complex_value.clone(), node, walk_complex_value);
    }

    fn visit_external_value(&mut self, node: Node<'g, ExternalValueSymbol>) {
        self.dispatch(self.external_value.clone(), node, no_children);
    }

    fn visit_external_enum(&mut self, node: Node<'g, ()>) {
        self.dispatch(self.external_enum.clone(), node, no_children);
    }

    fn visit_web_api(&mut self, node: Node<'g, PathSymbol>) {
        self.dispatch(self.web_api.clone(), node, walk_path);
    }

    fn visit_path(&mut self, node: Node<'g, PathSymbol>) {
        self.dispatch(self.path.clone(), node, walk_path);
    }

    fn visit_query(&mut self, node: Node<'g, QuerySymbol>) {
        self.dispatch(self.query.clone(), node, walk_query);
    }

    fn visit_command(&mut self, node: Node<'g, OperationSymbol>) {
        self.dispatch(self.command.clone(), node, no_children);
    }

    fn visit_atom(&mut self, _graph: &'g Compilation, atom: &'g AtomSymbol) {
        if let Some(handler) = self.atom.as_mut() {
            handler(atom);
        }
    }
}
