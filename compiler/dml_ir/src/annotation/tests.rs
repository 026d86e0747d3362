use super::*;
use pretty_assertions::assert_eq;

fn id(text: &str) -> Identifier {
    Identifier::new(text).unwrap()
}

fn route(path: &str) -> Annotation {
    Annotation::new(id("route"), vec![AnnotationPair::new(id("path"), path)]).unwrap()
}

#[test]
fn rejects_duplicate_keys() {
    let err = Annotation::new(
        id("route"),
        vec![
            AnnotationPair::new(id("path"), "a"),
            AnnotationPair::new(id("path"), "b"),
        ],
    )
    .unwrap_err();
    assert_eq!(
        err,
        AnnotationError::DuplicatePair {
            annotation: id("route"),
            key: id("path"),
        }
    );
}

#[test]
fn pair_lookup_by_key() {
    let annotation = route("orders");
    assert_eq!(annotation.value("path"), Some("orders"));
    assert_eq!(annotation.pair("missing"), None);
}

#[test]
fn groups_by_name_in_source_order() {
    let set: AnnotationSet = [
        route("a"),
        Annotation::marker(id("deprecated")),
        route("b"),
    ]
    .into_iter()
    .collect();

    assert_eq!(set.len(), 3);
    assert_eq!(set.get("route").len(), 2);
    assert_eq!(set.first("route").and_then(|a| a.value("path")), Some("a"));
    assert_eq!(set.single("route"), None);
    assert!(set.single("deprecated").is_some());
    assert!(set.get("missing").is_empty());
    assert!(!set.contains("missing"));
}
