use super::*;
use pretty_assertions::assert_eq;
use sd_ir::IdentError;
use sd_types::{Items, Subject};

fn name(text: &str) -> Name {
    Name::intern(text)
}

fn split(node: &Value, subject: Subject<'_>) -> Option<Items> {
    node.as_structure()
        .expect("compound node")
        .destructure(subject)
        .ok()
}

#[test]
fn test_pat_validates_names() {
    assert_eq!(pat("x"), Ok(Value::Pattern(name("x"))));
    assert_eq!(pat("_"), Ok(Value::Discard));
    assert_eq!(
        pat("1x"),
        Err(PatternError::InvalidBinder(IdentError::NotIdentifier(
            "1x".to_owned()
        )))
    );
    assert_eq!(
        pat("while"),
        Err(PatternError::InvalidBinder(IdentError::Keyword(
            "while".to_owned()
        )))
    );
}

#[test]
fn test_as_pattern_with_discard_is_the_binder() {
    assert_eq!(as_pattern(name("a"), Value::Discard), Value::Pattern(name("a")));
}

#[test]
fn test_as_pattern_splits() {
    let structure = Value::tuple(vec![Value::Pattern(name("b"))]);
    let node = as_pattern(name("a"), structure.clone());

    let template = split(&node, Subject::Template).expect("template splits");
    assert_eq!(template.as_slice(), &[structure.clone(), Value::Pattern(name("a"))]);

    let value = Value::int(3);
    let values = split(&node, Subject::Value(&value)).expect("value splits");
    assert_eq!(values.as_slice(), &[value.clone(), value]);

    let other = as_pattern(name("c"), Value::int(9));
    let values = split(&node, Subject::Value(&other)).expect("other as-pattern splits");
    assert_eq!(values.as_slice(), &[Value::int(9), other.clone()]);
}

#[test]
fn test_bind_without_extras_is_the_structure() {
    let structure = Value::Pattern(name("a"));
    let bound = Bind::new(structure.clone(), Vec::<(&str, Value)>::new()).expect("valid bind");
    assert_eq!(bound, structure);
}

#[test]
fn test_bind_rejects_discard_extra() {
    let err = Bind::new(Value::Discard, [("_", Value::int(1))]);
    assert_eq!(err.err(), Some(PatternError::DiscardAsExtra));
}

#[test]
fn test_bind_splits_extras_reversed() {
    let node = Bind::new(
        Value::Pattern(name("s")),
        [("x", Value::int(1)), ("y", Value::int(2))],
    )
    .expect("valid bind");

    let template = split(&node, Subject::Template).expect("template splits");
    assert_eq!(
        template.as_slice(),
        &[
            Value::Pattern(name("y")),
            Value::Pattern(name("x")),
            Value::Pattern(name("s")),
        ]
    );

    let value = Value::string("v");
    let values = split(&node, Subject::Value(&value)).expect("value splits");
    assert_eq!(values.as_slice(), &[Value::int(2), Value::int(1), value]);
}

#[test]
fn test_guard_collapses_with_discard() {
    let bare = Guard::truthy().with_structure(Value::Discard);
    assert_eq!(bare.type_name(), "Guard");

    let wrapped = guard(|v| v.as_int().is_some(), Value::Pattern(name("n")));
    assert_eq!(wrapped.type_name(), "AsGuard");
}

#[test]
fn test_guard_checks_values_not_templates() {
    let node: Value = Guard::falsy().into();
    assert_eq!(split(&node, Subject::Template).map(|i| i.len()), Some(0));
    assert_eq!(split(&node, Subject::Value(&Value::int(0))).map(|i| i.len()), Some(0));
    assert!(split(&node, Subject::Value(&Value::int(1))).is_none());
}

#[test]
fn test_as_guard_forwards_value() {
    let node = guard(|v| v.as_int() == Some(5), Value::Pattern(name("n")));
    assert_eq!(
        split(&node, Subject::Template).map(|i| i.to_vec()),
        Some(vec![Value::Pattern(name("n"))])
    );
    assert_eq!(
        split(&node, Subject::Value(&Value::int(5))).map(|i| i.to_vec()),
        Some(vec![Value::int(5)])
    );
    assert!(split(&node, Subject::Value(&Value::int(4))).is_none());
}

#[test]
fn test_attr_pattern_peels_first_entry() {
    let node = AttrPattern::new([("x", Value::Pattern(name("a"))), ("y", Value::Discard)]);
    let template = split(&node, Subject::Template).expect("template splits");
    assert_eq!(template.len(), 2);
    assert_eq!(template[1], Value::Pattern(name("a")));
    assert_eq!(template[0].type_name(), "AttrPattern");

    let point = Value::object("Point", [("x", Value::int(1)), ("y", Value::int(2))]);
    let values = split(&node, Subject::Value(&point)).expect("value splits");
    assert_eq!(values.as_slice(), &[point.clone(), Value::int(1)]);

    let missing = Value::object("Other", [("y", Value::int(2))]);
    assert!(split(&node, Subject::Value(&missing)).is_none());
}

#[test]
fn test_attr_pattern_against_smaller_pattern_fails() {
    let node = AttrPattern::new([("x", Value::Discard), ("y", Value::Discard)]);
    let smaller = AttrPattern::new([("x", Value::Discard)]);
    assert!(split(&node, Subject::Value(&smaller)).is_none());
}

#[test]
fn test_empty_mapping_patterns_split_to_nothing() {
    let attrs = AttrPattern::new(Vec::<(&str, Value)>::new());
    assert_eq!(split(&attrs, Subject::Value(&Value::None)).map(|i| i.len()), Some(0));

    let dict = DictPattern::new(Vec::new(), false);
    assert_eq!(split(&dict, Subject::Value(&Value::int(1))).map(|i| i.len()), Some(0));
}

#[test]
fn test_exhaustive_dict_checks_size_first() {
    let node = DictPattern::from_str_keys([("a", Value::int(1))], true);
    let exact = Value::str_dict([("a", Value::int(1))]);
    let extra = Value::str_dict([("a", Value::int(1)), ("b", Value::int(2))]);
    assert!(split(&node, Subject::Value(&exact)).is_some());
    assert!(split(&node, Subject::Value(&extra)).is_none());
    assert!(split(&node, Subject::Value(&Value::int(1))).is_none());

    let empty_exhaustive = DictPattern::new(Vec::new(), true);
    assert!(split(&empty_exhaustive, Subject::Value(&exact)).is_none());
}

#[test]
fn test_dict_pattern_repeated_key_keeps_last_template() {
    let node = DictPattern::from_str_keys([("a", Value::int(1)), ("a", Value::int(2))], false);
    let pattern = downcast::<DictPattern>(&node).expect("dict pattern");
    assert_eq!(pattern.entries(), &[(Value::string("a"), Value::int(2))]);
    assert!(!pattern.is_exhaustive());
}

#[test]
fn test_remainder_is_never_exhaustive() {
    let node = DictPattern::from_str_keys([("a", Value::Discard), ("b", Value::Discard)], true);
    let template = split(&node, Subject::Template).expect("template splits");
    let remainder = downcast::<DictPattern>(&template[0]).expect("remainder");
    assert!(!remainder.is_exhaustive());
    assert_eq!(remainder.entries().len(), 1);
}
