use super::*;
use pretty_assertions::assert_eq;

fn messages(observations: &[Observation]) -> Vec<&str> {
    observations.iter().map(Observation::message).collect()
}

#[test]
fn keeps_raise_order() {
    let mut sink = ObservationSink::new();
    sink.fail("first");
    sink.fail_if(false, || "skipped".to_owned());
    sink.fail_if(true, || "second".to_owned());
    sink.push("third");

    assert_eq!(sink.len(), 3);
    assert_eq!(messages(&sink.into_vec()), vec!["first", "second", "third"]);
}

#[test]
fn lazy_message_not_built_on_success() {
    let mut sink = ObservationSink::new();
    sink.fail_if(false, || unreachable!("message built for a passing rule"));
    assert!(sink.is_empty());
}

#[test]
fn limit_zero_is_unlimited() {
    let mut sink = ObservationSink::new();
    for i in 0..5 {
        sink.fail(format!("o{i}"));
    }
    assert_eq!(sink.into_limited(0).len(), 5);
}

#[test]
fn limit_truncates_with_note() {
    let mut sink = ObservationSink::new();
    for i in 0..5 {
        sink.fail(format!("o{i}"));
    }
    let limited = sink.into_limited(2);
    assert_eq!(
        messages(&limited),
        vec!["o0", "o1", "... and 3 more observations"]
    );
}

#[test]
fn limit_at_exact_count_adds_nothing() {
    let mut sink = ObservationSink::new();
    sink.fail("only");
    assert_eq!(messages(&sink.into_limited(1)), vec!["only"]);
}
