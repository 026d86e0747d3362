use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dml_ir::{BuiltinType, SyntaxTree};
use dml_symbols::{render_summary, SymbolKind, TypeRef};
use dmlc::{compile, CompileFailure, CompileOptions, ParseError, SourceInput, StaticUniverse};
use pretty_assertions::assert_eq;

use crate::common::{qi, sources, LineParser};

fn failure(units: &[(&str, &str)]) -> Vec<String> {
    failure_with(units, &CompileOptions::default())
}

fn failure_with(units: &[(&str, &str)], options: &CompileOptions) -> Vec<String> {
    compile(&sources(units), &LineParser, options)
        .expect_err("compilation should fail")
        .messages()
}

const SHOP: &str = "
namespace Shop
entity Order identity guid
event Placed
prop total Money
entity RushOrder : Order
value Money : decimal
enum Status
api Orders -> void
command Place arg amount Money -> void
query Recent -> Money*
filter status Status?
";

#[test]
fn empty_input_compiles_without_parsing() {
    let calls = AtomicUsize::new(0);
    let parser = |_: &str, _: Option<&str>| -> Result<SyntaxTree, Vec<ParseError>> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(SyntaxTree::new())
    };
    let inputs = vec![SourceInput::new(""), SourceInput::named("  \n\t", "blank.dml")];

    let graph = compile(&inputs, &parser, &CompileOptions::default()).unwrap();
    assert!(graph.namespaces().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn no_inputs_compile_to_an_empty_graph() {
    let graph = compile(&[], &LineParser, &CompileOptions::default()).unwrap();
    assert!(graph.is_empty());
}

#[test]
fn namespace_split_across_units_merges_into_one_node() {
    let graph = compile(
        &sources(&[
            ("a.dml", "namespace Foo\nvalue Left : int"),
            ("b.dml", "namespace Foo\nvalue Right : int"),
        ]),
        &LineParser,
        &CompileOptions::default(),
    )
    .unwrap();

    assert_eq!(graph.namespaces().len(), 1);
    let foo = graph.namespace(&qi("Foo")).unwrap();
    let members: Vec<String> = graph
        .symbol(foo)
        .kind
        .children()
        .iter()
        .map(|&id| graph.symbol(id).name.to_string())
        .collect();
    assert_eq!(members, vec!["Left", "Right"]);
}

#[test]
fn shop_model_compiles_and_summarises() {
    let graph = compile(&sources(&[("shop.dml", SHOP)]), &LineParser, &CompileOptions::default())
        .unwrap();
    let rush = graph.get(&qi("Shop.RushOrder")).unwrap();
    assert_eq!(graph.base_entity(rush), graph.get(&qi("Shop.Order")));
    assert_eq!(
        render_summary(&graph),
        "\
namespace Shop
    entity Order identity guid
        event Placed
            total: Shop.Money
    entity RushOrder : Shop.Order
    value Money : decimal
    external enum Status
    api Orders -> void
        command Place(amount: Shop.Money) -> void
        query Recent -> Shop.Money*
            status: Shop.Status?
"
    );
}

#[test]
fn entity_needs_identity_or_base() {
    assert_eq!(
        failure(&[("e.dml", "namespace Shop\nentity Order")]),
        vec!["Entity 'Order' must inherit from a base entity, or specify an identifier type."]
    );
}

#[test]
fn entity_cannot_have_identity_and_base() {
    let text = "namespace Shop\nentity Base identity guid\nentity Order identity guid : Base";
    assert_eq!(
        failure(&[("e.dml", text)]),
        vec!["Entity 'Order' must not specify a base entity if the identifier type is specified."]
    );
}

#[test]
fn entity_with_exactly_one_shape_is_accepted() {
    let text = "namespace Shop\nentity Base identity guid\nentity Order : Base";
    assert!(compile(&sources(&[("e.dml", text)]), &LineParser, &CompileOptions::default()).is_ok());
}

#[test]
fn unresolvable_value_base_is_reported() {
    let expected = vec!["The type or namespace 'Baz' could not be found."];
    assert_eq!(failure(&[("v.dml", "namespace Shop\nvalue Bar : Baz")]), expected);
    assert_eq!(
        failure(&[("v.dml", "namespace Shop\nvalue Bar : Baz\nprop size int")]),
        expected
    );
}

#[test]
fn mutual_entity_bases_are_a_cycle() {
    let text = "namespace Shop\nentity A : B\nentity B : A";
    assert_eq!(
        failure(&[("c.dml", text)]),
        vec![
            "Entity 'A' has a circular base chain.",
            "Entity 'B' has a circular base chain.",
        ]
    );
}

#[test]
fn cycle_detection_can_be_switched_off() {
    let text = "namespace Shop\nentity A : B\nentity B : A";
    let options = CompileOptions::new().with_base_cycle_detection(false);
    let graph = compile(&sources(&[("c.dml", text)]), &LineParser, &options).unwrap();
    let a = graph.get(&qi("Shop.A")).unwrap();
    let b = graph.get(&qi("Shop.B")).unwrap();
    assert_eq!(graph.base_entity(a), Some(b));
    assert_eq!(graph.base_entity(b), Some(a));
}

#[test]
fn self_inheritance_is_not_also_a_cycle() {
    assert_eq!(
        failure(&[("s.dml", "namespace Shop\nvalue Loop : Loop")]),
        vec!["Value 'Loop' cannot inherit from itself."]
    );
}

#[test]
fn query_with_two_arguments_is_rejected() {
    let text = "namespace Shop\napi Orders -> void\nquery Find arg a int arg b int -> int";
    assert_eq!(
        failure(&[("q.dml", text)]),
        vec!["Query 'Find' can only contain one argument."]
    );
}

#[test]
fn query_filter_cardinality_must_be_zero_or_one() {
    let text = "namespace Shop\napi Orders -> void\nquery Find -> int\nfilter size int[0..2]";
    assert_eq!(
        failure(&[("q.dml", text)]),
        vec!["Query filter 'size' must have a cardinality of zero or one."]
    );
}

#[test]
fn every_observation_of_a_pass_is_reported() {
    let text = "\
namespace Shop
entity Order
value Bar : Baz
api Orders -> void
query Empty -> void
";
    assert_eq!(
        failure(&[("m.dml", text)]),
        vec![
            "Entity 'Order' must inherit from a base entity, or specify an identifier type.",
            "The type or namespace 'Baz' could not be found.",
            "Query 'Empty' must return some result.",
        ]
    );
}

#[test]
fn duplicates_across_units_are_reported() {
    assert_eq!(
        failure(&[
            ("a.dml", "namespace Shop\nvalue Money : decimal"),
            ("b.dml", "namespace Shop\nvalue Money : decimal"),
        ]),
        vec!["Duplicate definition of 'Money'."]
    );
    assert_eq!(
        failure(&[
            ("a.dml", "namespace Shop\nentity Money identity guid"),
            ("b.dml", "namespace Shop\nvalue Money : decimal"),
        ]),
        vec!["'Money' is defined as both a Entity and a Value."]
    );
}

#[test]
fn parse_errors_are_fatal_and_located() {
    let messages = failure(&[
        ("good.dml", "namespace Shop\nentity Order"),
        ("broken.dml", "namespace Shop\nbogus Thing"),
    ]);
    assert_eq!(
        messages,
        vec!["unexpected 'bogus' (broken.dml: line:2, column:1)"]
    );
}

#[test]
fn unnamed_source_renders_as_input() {
    let failure = compile(
        &[SourceInput::new("namespace Shop\n  bogus")],
        &LineParser,
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        failure.to_string(),
        "unexpected 'bogus' ({input}: line:2, column:3)"
    );
}

#[test]
fn observation_limit_truncates_with_a_note() {
    let text = "namespace Shop\nentity A\nentity B\nentity C";
    let options = CompileOptions::new().with_observation_limit(1);
    assert_eq!(
        failure_with(&[("l.dml", text)], &options),
        vec![
            "Entity 'A' must inherit from a base entity, or specify an identifier type.",
            "... and 2 more observations",
        ]
    );
}

#[test]
fn failure_displays_one_observation_per_line() {
    let failure: CompileFailure = compile(
        &sources(&[("l.dml", "namespace Shop\nentity A\nentity B")]),
        &LineParser,
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert_eq!(failure.observations().len(), 2);
    assert_eq!(failure.to_string().lines().count(), 2);
}

#[test]
fn unit_imports_and_external_universe_resolve() {
    let universe = StaticUniverse::new()
        .with_value_type(qi("System.Uri"))
        .with_builtin_alias(qi("System.Int32"), BuiltinType::Int);
    let options = CompileOptions::new().with_universe(Arc::new(universe));
    let text = "import System\nnamespace Net\nvalue Endpoint\nprop uri Uri\nprop port Int32";
    let graph = compile(&sources(&[("n.dml", text)]), &LineParser, &options).unwrap();

    let endpoint = graph.get(&qi("Net.Endpoint")).unwrap();
    let SymbolKind::ComplexValue(value) = &graph.symbol(endpoint).kind else {
        panic!("Endpoint should be a complex value");
    };
    assert!(matches!(value.properties[0].reference.ty(), Some(TypeRef::External(_))));
    assert_eq!(
        value.properties[1].reference.ty(),
        Some(&TypeRef::BuiltIn(BuiltinType::Int))
    );
}

#[test]
fn namespace_imports_shadow_ancestors() {
    let text = "\
namespace Shop
value Money : decimal
namespace Shop.Billing
using Other
value Invoice
prop amount Money
namespace Other
value Money : int
";
    let graph = compile(&sources(&[("i.dml", text)]), &LineParser, &CompileOptions::default())
        .unwrap();
    let invoice = graph.get(&qi("Shop.Billing.Invoice")).unwrap();
    let amount = &graph.symbol(invoice).kind.properties()[0];
    assert_eq!(
        amount.reference.ty(),
        graph.get(&qi("Other.Money")).map(TypeRef::Symbol).as_ref()
    );
}

#[test]
fn tracing_initialisation_is_idempotent() {
    dmlc::init_tracing();
    dmlc::init_tracing();
}
