use std::cell::RefCell;

use pretty_assertions::assert_eq;

use super::*;
use crate::fixtures::{build, qi, shop};
use crate::DelegateVisitor;

/// Records every callback as `kind:name`.
#[derive(Default)]
struct Recorder {
    seen: Vec<String>,
    roots: usize,
    skip_symbols: bool,
}

impl<'g> SymbolVisitor<'g> for Recorder {
    fn not_interested_in(&mut self, subject: &Subject<'g>) -> bool {
        self.skip_symbols && !matches!(subject, Subject::Compilation)
    }

    fn visit_compilation(&mut self, graph: &'g Compilation) {
        self.roots += 1;
        walk_compilation(self, graph);
    }

    fn visit_namespace(&mut self, node: Node<'g, NamespaceSymbol>) {
        self.seen.push(format!("namespace:{}", node.name()));
        walk_namespace(self, node);
    }

    fn visit_entity(&mut self, node: Node<'g, EntitySymbol>) {
        self.seen.push(format!("entity:{}", node.name()));
        walk_entity(self, node);
    }

    fn visit_event(&mut self, node: Node<'g, EventSymbol>) {
        self.seen.push(format!("event:{}", node.name()));
        walk_event(self, node);
    }

    fn visit_complex_value(&mut self, node: Node<'g, ComplexValueSymbol>) {
        self.seen.push(format!("value:{}", node.name()));
        walk_complex_value(self, node);
    }

    fn visit_external_enum(&mut self, node: Node<'g, ()>) {
        self.seen.push(format!("enum:{}", node.name()));
    }

    fn visit_web_api(&mut self, node: Node<'g, PathSymbol>) {
        self.seen.push(format!("api:{}", node.name()));
        walk_path(self, node);
    }

    fn visit_path(&mut self, node: Node<'g, PathSymbol>) {
        self.seen.push(format!("path:{}", node.name()));
        walk_path(self, node);
    }

    fn visit_query(&mut self, node: Node<'g, QuerySymbol>) {
        self.seen.push(format!("query:{}", node.name()));
        walk_query(self, node);
    }

    fn visit_command(&mut self, node: Node<'g, OperationSymbol>) {
        self.seen.push(format!("command:{}", node.name()));
    }

    fn visit_atom(&mut self, _graph: &'g Compilation, atom: &'g AtomSymbol) {
        self.seen.push(format!("atom:{}", atom.name));
    }
}

#[test]
fn default_traversal_visits_natural_children_in_order() {
    let graph = build(&shop());
    let mut recorder = Recorder::default();
    graph.accept(&mut recorder);
    assert_eq!(
        recorder.seen,
        vec![
            "namespace:Shop",
            "entity:SpecialOrder",
            "entity:Order",
            "event:Placed",
            "atom:total",
            "event:Shipped",
            "value:Money",
            "value:Address",
            "atom:street",
            "atom:zip",
            "enum:Status",
            "api:Orders",
            "command:Place",
            "query:Recent",
            "atom:status",
            "path:ById",
            "query:Lines",
            "namespace:Billing",
            "value:Invoice",
            "atom:amount",
        ]
    );
    assert_eq!(recorder.roots, 1);
}

#[test]
fn excluding_everything_but_the_root_makes_no_other_callbacks() {
    let graph = build(&shop());
    let mut recorder = Recorder {
        skip_symbols: true,
        ..Recorder::default()
    };
    graph.accept(&mut recorder);
    assert_eq!(recorder.roots, 1);
    assert!(recorder.seen.is_empty());
}

#[test]
fn node_exposes_full_name() {
    let graph = build(&shop());
    let names = RefCell::new(Vec::new());
    DelegateVisitor::new()
        .on_event(|node, _| names.borrow_mut().push(node.full_name().to_string()))
        .run(&graph);
    assert_eq!(
        names.into_inner(),
        vec!["Shop.Order.Placed", "Shop.Order.Shipped"]
    );
}

#[test]
fn delegate_handlers_can_prune_subtrees() {
    let graph = build(&shop());
    let seen = RefCell::new(Vec::new());
    DelegateVisitor::new()
        .on_entity(|node, _| seen.borrow_mut().push(format!("entity:{}", node.name())))
        .on_event(|node, walk| {
            seen.borrow_mut().push(format!("event:{}", node.name()));
            walk(node);
        })
        .on_query(|node, walk| {
            seen.borrow_mut().push(format!("query:{}", node.name()));
            walk(node);
        })
        .run(&graph);
    assert_eq!(
        seen.into_inner(),
        vec![
            "entity:SpecialOrder",
            "entity:Order",
            "query:Recent",
            "query:Lines"
        ]
    );
}

#[test]
fn delegate_handlers_wrap_the_default_walk() {
    let graph = build(&shop());
    let seen = RefCell::new(Vec::new());
    DelegateVisitor::new()
        .on_entity(|node, walk| {
            seen.borrow_mut().push(format!("enter:{}", node.name()));
            walk(node);
            seen.borrow_mut().push(format!("exit:{}", node.name()));
        })
        .on_event(|node, _| seen.borrow_mut().push(format!("event:{}", node.name())))
        .run(&graph);
    assert_eq!(
        seen.into_inner(),
        vec![
            "enter:SpecialOrder",
            "exit:SpecialOrder",
            "enter:Order",
            "event:Placed",
            "event:Shipped",
            "exit:Order"
        ]
    );
}

#[test]
fn compilation_handler_surrounds_the_whole_walk() {
    let graph = build(&shop());
    let seen = RefCell::new(Vec::new());
    DelegateVisitor::new()
        .on_compilation(|graph, walk| {
            seen.borrow_mut().push("begin".to_string());
            walk(graph);
            seen.borrow_mut().push("end".to_string());
        })
        .on_entity(|node, _| seen.borrow_mut().push(node.name().to_string()))
        .run(&graph);
    assert_eq!(seen.into_inner(), vec!["begin", "SpecialOrder", "Order", "end"]);
}

#[test]
fn compilation_handler_can_skip_everything() {
    let graph = build(&shop());
    let atoms = RefCell::new(0);
    DelegateVisitor::new()
        .on_compilation(|_, _| {})
        .on_atom(|_| *atoms.borrow_mut() += 1)
        .run(&graph);
    assert_eq!(atoms.into_inner(), 0);
}

#[test]
fn delegate_predicate_narrows_to_one_kind() {
    let graph = build(&shop());
    let atoms = RefCell::new(Vec::new());
    DelegateVisitor::new()
        .skip_when(|subject| match subject {
            Subject::Symbol(_, symbol) => {
                !matches!(symbol.kind, SymbolKind::Namespace(_) | SymbolKind::ComplexValue(_))
            }
            _ => false,
        })
        .on_atom(|atom| atoms.borrow_mut().push(atom.name.to_string()))
        .run(&graph);
    assert_eq!(atoms.into_inner(), vec!["street", "zip", "amount"]);
}

#[test]
fn visit_symbol_starts_anywhere_in_the_graph() {
    let graph = build(&shop());
    let order = graph.get(&qi("Shop.Order")).unwrap();
    let mut recorder = Recorder::default();
    visit_symbol(&mut recorder, &graph, order);
    assert_eq!(
        recorder.seen,
        vec!["entity:Order", "event:Placed", "atom:total", "event:Shipped"]
    );
    assert_eq!(recorder.roots, 0);
}
