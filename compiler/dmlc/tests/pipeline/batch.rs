use dmlc::{compile_batch, CompileOptions, SourceInput};
use pretty_assertions::assert_eq;

use crate::common::{qi, sources, LineParser};

#[test]
fn batches_compile_independently_and_keep_order() {
    let batches: Vec<Vec<SourceInput>> = vec![
        sources(&[("a.dml", "namespace A\nvalue Money : decimal")]),
        sources(&[("b.dml", "namespace B\nentity Broken")]),
        // Same names as the first batch: no state is shared between batches.
        sources(&[("c.dml", "namespace A\nvalue Money : int")]),
    ];

    let results = compile_batch(&batches, &LineParser, &CompileOptions::default());
    assert_eq!(results.len(), 3);

    let first = results[0].as_ref().unwrap();
    assert!(first.get(&qi("A.Money")).is_some());

    let second = results[1].as_ref().unwrap_err();
    assert_eq!(
        second.messages(),
        vec!["Entity 'Broken' must inherit from a base entity, or specify an identifier type."]
    );

    let third = results[2].as_ref().unwrap();
    assert!(third.get(&qi("A.Money")).is_some());
    assert!(third.get(&qi("B.Broken")).is_none());
}

#[test]
fn single_batch_runs_inline() {
    let batches = vec![sources(&[("a.dml", "namespace A\nenum Status")])];
    let results = compile_batch(&batches, &LineParser, &CompileOptions::default());
    assert!(results[0].is_ok());
}

#[test]
fn empty_batch_list_yields_nothing() {
    assert!(compile_batch(&[], &LineParser, &CompileOptions::default()).is_empty());
}
