use dml_ir::BuiltinType;
use pretty_assertions::assert_eq;

use super::*;
use crate::fixtures::{build, qi, shop};

#[test]
fn get_finds_types_but_not_namespaces_or_operations() {
    let graph = build(&shop());
    assert!(graph.get(&qi("Shop.Status")).is_some());
    assert!(graph.get(&qi("Shop.Orders")).is_some());
    assert_eq!(graph.get(&qi("Shop")), None);
    assert_eq!(graph.get(&qi("Shop.Orders.Recent")), None);
    assert_eq!(graph.get(&qi("Shop.Missing")), None);
}

#[test]
fn iter_visits_every_symbol_in_build_order() {
    let graph = build(&shop());
    let ids: Vec<SymbolId> = graph.iter().map(|(id, _)| id).collect();
    assert_eq!(ids.len(), graph.len());
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(graph.iter().next().map(|(_, symbol)| symbol.name.as_str()), Some("Shop"));
}

#[test]
fn resolve_borrows_symbol_out_of_the_arena() {
    let graph = build(&shop());
    let special = graph.get(&qi("Shop.SpecialOrder")).unwrap();
    let base = graph.symbol(special).kind.base().unwrap();
    match graph.resolve(base) {
        Some(ResolvedType::Symbol(id, symbol)) => {
            assert_eq!(id, graph.get(&qi("Shop.Order")).unwrap());
            assert_eq!(symbol.kind.name(), "Entity");
        }
        other => panic!("unexpected resolution {other:?}"),
    }

    let money = graph.get(&qi("Shop.Money")).unwrap();
    let base = graph.symbol(money).kind.base().unwrap();
    assert!(matches!(
        graph.resolve(base),
        Some(ResolvedType::BuiltIn(BuiltinType::Decimal))
    ));
}

#[test]
fn describe_uses_keywords_and_full_names() {
    let graph = build(&shop());
    let placed = graph.get(&qi("Shop.Order.Placed")).unwrap();
    assert_eq!(graph.describe(&TypeRef::Symbol(placed)), "Shop.Order.Placed");
    assert_eq!(graph.describe(&TypeRef::BuiltIn(BuiltinType::DateTime)), "datetime");
}

#[test]
fn every_indexed_symbol_is_a_type() {
    let graph = build(&shop());
    let types: Vec<SymbolId> = graph
        .iter()
        .filter(|(_, symbol)| symbol.kind.is_type())
        .map(|(id, _)| id)
        .collect();
    assert_eq!(types.len(), 9);
    for id in types {
        assert_eq!(graph.get(&graph.full_name(id)), Some(id));
    }
    let namespace = graph.namespace(&qi("Shop")).unwrap();
    assert_eq!(graph.symbol(namespace).kind.declaration_kind(), None);
}

#[test]
fn debug_output_is_a_summary() {
    let graph = build(&shop());
    let debug = format!("{graph:?}");
    assert!(debug.starts_with("Compilation {"));
    assert!(debug.contains("types: 9"));
}
