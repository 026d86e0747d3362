//! Shared syntax fixtures for unit tests.

use std::sync::Arc;

use dml_diagnostic::ObservationSink;
use dml_ir::{
    Annotation, AnnotationPair, AtomSyntax, Cardinality, EntitySyntax, EventSyntax,
    ExternalEnumSyntax, Identifier, NamespaceSyntax, OperationSyntax, PropertySyntax,
    QualifiedIdentifier, SyntaxTree, TypeReferenceSyntax, ValueSyntax, WebApiCommandSyntax,
    WebApiPathSyntax, WebApiQuerySyntax, WebApiSyntax,
};
use dml_sema::{merge_namespaces, validate, EmptyUniverse, SymbolTable, TypeUniverse, ValidationOptions};

use crate::{build_compilation, Compilation};

pub(crate) fn id(text: &str) -> Identifier {
    Identifier::new(text).unwrap()
}

pub(crate) fn qi(text: &str) -> QualifiedIdentifier {
    QualifiedIdentifier::new(text).unwrap()
}

pub(crate) fn one(text: &str) -> TypeReferenceSyntax {
    TypeReferenceSyntax::one(qi(text))
}

pub(crate) fn with(text: &str, cardinality: Cardinality) -> TypeReferenceSyntax {
    TypeReferenceSyntax::new(qi(text), cardinality)
}

/// Validate and build; panics if validation reports anything.
pub(crate) fn build_with(trees: &[SyntaxTree], universe: Arc<dyn TypeUniverse>) -> Compilation {
    let groups = merge_namespaces(trees);
    let mut sink = ObservationSink::new();
    let table = SymbolTable::from_groups(&groups, universe, &mut sink);
    validate(&groups, &table, &ValidationOptions::default(), &mut sink);
    let observations: Vec<String> = sink.iter().map(ToString::to_string).collect();
    assert!(observations.is_empty(), "unexpected observations: {observations:?}");
    build_compilation(&groups, Arc::new(table))
}

pub(crate) fn build(trees: &[SyntaxTree]) -> Compilation {
    build_with(trees, Arc::new(EmptyUniverse))
}

/// A small shop model touching every declaration kind.
///
/// `SpecialOrder` names `Order` before it is declared, and `Shop.Billing`
/// reaches `Money` through its ancestor namespace.
pub(crate) fn shop() -> Vec<SyntaxTree> {
    let storage = Annotation::new(id("Storage"), vec![AnnotationPair::new(id("Table"), "orders")]).unwrap();

    let orders = WebApiPathSyntax::new(OperationSyntax::new(id("Orders"), one("void")))
        .with_member(WebApiPathSyntax::new(
            OperationSyntax::new(id("ById"), one("Address"))
                .with_argument(AtomSyntax::new(id("key"), one("guid"))),
        ).with_member(WebApiQuerySyntax::new(OperationSyntax::new(
            id("Lines"),
            with("Money", Cardinality::ZERO_OR_MORE),
        ))))
        .with_member(
            WebApiQuerySyntax::new(OperationSyntax::new(
                id("Recent"),
                with("Money", Cardinality::ZERO_OR_MORE),
            ))
            .with_filter(AtomSyntax::new(id("status"), with("Status", Cardinality::ZERO_OR_ONE))),
        )
        .with_member(WebApiCommandSyntax::new(
            OperationSyntax::new(id("Place"), one("void"))
                .with_argument(AtomSyntax::new(id("amount"), one("Money"))),
        ));

    let shop = NamespaceSyntax::new(qi("Shop"))
        .with_member(EntitySyntax::new(id("SpecialOrder")).with_base(one("Order")))
        .with_member(
            EntitySyntax::new(id("Order"))
                .with_identity(one("guid"))
                .with_annotation(storage)
                .with_annotation(Annotation::marker(id("Aggregate")))
                .with_event(
                    EventSyntax::new(id("Placed"))
                        .with_property(PropertySyntax::new(id("total"), one("Money"))),
                )
                .with_event(EventSyntax::new(id("Shipped")).with_base(one("Placed"))),
        )
        .with_member(ValueSyntax::new(id("Money")).with_base(one("decimal")))
        .with_member(
            ValueSyntax::new(id("Address"))
                .with_property(PropertySyntax::new(id("street"), one("string")).with_alias(id("Line1")))
                .with_property(PropertySyntax::new(id("zip"), with("string", Cardinality::ZERO_OR_ONE)))
                .with_equal_by(id("street")),
        )
        .with_member(ExternalEnumSyntax::new(id("Status")))
        .with_member(WebApiSyntax::new(orders));

    let billing = NamespaceSyntax::new(qi("Shop.Billing")).with_member(
        ValueSyntax::new(id("Invoice"))
            .with_property(PropertySyntax::new(id("amount"), one("Money"))),
    );

    vec![
        SyntaxTree::new().with_source_name("shop.dml").with_namespace(shop),
        SyntaxTree::new().with_source_name("billing.dml").with_namespace(billing),
    ]
}
