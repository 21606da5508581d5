use super::*;
use crate::errors::LookupError;
use crate::matchable::Matchable;
use crate::nodes::{as_pattern, guard, pat, AttrPattern, Bind, DictPattern};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sd_types::{CallArgs, ProductType, SumType};

fn p(name: &str) -> Value {
    pat(name).expect("valid binder")
}

fn bound(pairs: &[(&str, Value)]) -> MatchBindings {
    pairs.iter().map(|(name, value)| (*name, value.clone())).collect()
}

fn pair(a: Value, b: Value) -> Value {
    Value::tuple(vec![a, b])
}

#[test]
fn test_tuple_of_binders() {
    let template = pair(p("a"), p("b"));
    let value = pair(Value::int(1), Value::int(2));
    assert_eq!(
        match_value(&template, &value),
        Some(bound(&[("a", Value::int(1)), ("b", Value::int(2))]))
    );

    let longer = Value::tuple(vec![Value::int(1), Value::int(2), Value::int(3)]);
    assert_eq!(match_value(&template, &longer), None);
}

#[test]
fn test_literals_compare_by_equality() {
    let template = pair(Value::int(1), p("rest"));
    assert!(match_value(&template, &pair(Value::float(1.0), Value::None)).is_some());
    assert_eq!(match_value(&template, &pair(Value::int(2), Value::None)), None);
}

#[test]
fn test_discard_matches_anything_and_binds_nothing() {
    let bindings = match_value(&Value::Discard, &Value::string("x")).expect("matches");
    assert!(bindings.is_empty());
}

#[test]
fn test_duplicate_binder() {
    let template = pair(p("a"), p("a"));
    let value = pair(Value::int(1), Value::int(2));
    let dup = DuplicateBindingError {
        name: Name::intern("a"),
    };

    assert_eq!(match_value(&template, &value), None);
    assert_eq!(try_match(&template, &value), Err(dup));
    assert_eq!(names(&template), Err(dup));
    assert_eq!(dup.to_string(), "name 'a' is bound more than once");
}

#[test]
fn test_as_pattern_binds_whole_before_parts() {
    let template = as_pattern(Name::intern("whole"), pair(p("x"), p("y")));
    let value = pair(Value::int(1), Value::int(2));
    let bindings = match_value(&template, &value).expect("matches");
    let order: Vec<&str> = bindings.names().map(Name::as_str).collect();
    assert_eq!(order, vec!["whole", "x", "y"]);
    assert_eq!(bindings.get("whole"), Some(&value));
}

#[test]
fn test_bind_adds_literal_bindings() {
    let template = Bind::new(p("s"), [("x", Value::int(1)), ("y", Value::int(2))])
        .expect("valid bind");
    let bindings = match_value(&template, &Value::string("v")).expect("matches");
    assert_eq!(
        bindings,
        bound(&[
            ("s", Value::string("v")),
            ("x", Value::int(1)),
            ("y", Value::int(2)),
        ])
    );
}

#[test]
fn test_guard_filters_values() {
    let template = guard(|v| v.as_int().is_some_and(|n| n > 0), p("n"));
    assert_eq!(
        match_value(&template, &Value::int(5)),
        Some(bound(&[("n", Value::int(5))]))
    );
    assert_eq!(match_value(&template, &Value::int(-1)), None);
    assert_eq!(names(&template), Ok(vec![Name::intern("n")]));
}

#[test]
fn test_attr_pattern_reads_product_fields() {
    let point = ProductType::builder("Point")
        .field("x")
        .field("y")
        .build()
        .expect("valid product");
    let value = point
        .construct(CallArgs::new().arg(Value::int(3)).arg(Value::int(4)))
        .expect("constructs");

    let template = AttrPattern::new([("y", p("b")), ("x", p("a"))]);
    assert_eq!(
        match_value(&template, &value),
        Some(bound(&[("b", Value::int(4)), ("a", Value::int(3))]))
    );

    let missing = AttrPattern::new([("z", Value::Discard)]);
    assert_eq!(match_value(&missing, &value), None);
}

#[test]
fn test_product_positional_template() {
    let point = ProductType::builder("Point")
        .field("x")
        .field("y")
        .build()
        .expect("valid product");
    let template = point
        .construct(CallArgs::new().arg(p("x")).arg(Value::int(0)))
        .expect("constructs");
    let on_axis = point
        .construct(CallArgs::new().arg(Value::int(7)).arg(Value::int(0)))
        .expect("constructs");
    let off_axis = point
        .construct(CallArgs::new().arg(Value::int(7)).arg(Value::int(1)))
        .expect("constructs");

    assert_eq!(
        match_value(&template, &on_axis),
        Some(bound(&[("x", Value::int(7))]))
    );
    assert_eq!(match_value(&template, &off_axis), None);
    assert_eq!(
        match_value(&template, &pair(Value::int(7), Value::int(0))),
        None
    );
}

#[test]
fn test_dict_pattern_exhaustiveness() {
    let strict = DictPattern::from_str_keys([("a", p("x"))], true);
    let loose = DictPattern::from_str_keys([("a", p("x"))], false);
    let exact = Value::str_dict([("a", Value::int(1))]);
    let wider = Value::str_dict([("a", Value::int(1)), ("b", Value::int(2))]);
    let expected = Some(bound(&[("x", Value::int(1))]));

    assert_eq!(match_value(&strict, &exact), expected);
    assert_eq!(match_value(&strict, &wider), None);
    assert_eq!(match_value(&loose, &wider), expected);
    assert_eq!(match_value(&loose, &Value::str_dict([("b", Value::int(2))])), None);
}

#[test]
fn test_variant_matches_only_its_own_variant() {
    let either = SumType::builder("Either")
        .variant("Left", 1)
        .variant("Right", 1)
        .build()
        .expect("valid sum");
    let left = either.variant("Left").expect("exists");
    let right = either.variant("Right").expect("exists");

    let template = left.construct(vec![p("x")]).expect("arity");
    let hit = left.construct(vec![Value::int(3)]).expect("arity");
    let miss = right.construct(vec![Value::int(3)]).expect("arity");

    assert_eq!(match_value(&template, &hit), Some(bound(&[("x", Value::int(3))])));
    assert_eq!(match_value(&template, &miss), None);
    assert_eq!(match_value(&template, &Value::tuple(vec![Value::int(3)])), None);
}

#[test]
fn test_template_matches_itself() {
    let template = as_pattern(
        Name::intern("all"),
        Value::tuple(vec![p("a"), Value::list(vec![p("b"), Value::Discard])]),
    );
    let bindings = match_value(&template, &template).expect("self match");
    assert_eq!(
        bindings,
        bound(&[("all", p("all")), ("a", p("a")), ("b", p("b"))])
    );
}

#[test]
fn test_names_in_binding_order() {
    let template = Value::tuple(vec![
        p("a"),
        Value::Discard,
        as_pattern(Name::intern("b"), Value::list(vec![p("c")])),
    ]);
    let found: Vec<&str> = names(&template)
        .expect("no duplicates")
        .into_iter()
        .map(Name::as_str)
        .collect();
    assert_eq!(found, vec!["a", "b", "c"]);
    assert_eq!(names(&Value::int(3)), Ok(vec![]));
}

#[test]
fn test_deep_nesting_does_not_recurse() {
    let mut template = p("leaf");
    let mut value = Value::int(7);
    for _ in 0..2000 {
        template = Value::tuple(vec![template]);
        value = Value::tuple(vec![value]);
    }
    let bindings = match_value(&template, &value).expect("matches");
    assert_eq!(bindings.get("leaf"), Some(&Value::int(7)));
    assert_eq!(names(&template).expect("no duplicates").len(), 1);
}

#[test]
fn test_explicit_list_destructures() {
    let list = DestructurerList::builtin();
    let bindings = list
        .destructure(&Value::list(vec![p("h")]), &Value::list(vec![Value::int(1)]))
        .expect("matches");
    assert_eq!(bindings.get("h"), Some(&Value::int(1)));
}

#[test]
fn test_matchable_lookup() {
    let mut subject = Matchable::new(pair(Value::int(1), Value::int(2)));
    assert_eq!(subject.get("a"), Err(LookupError::NoMatch));

    assert!(subject.matches(&pair(p("a"), p("b"))).expect("valid template"));
    assert_eq!(subject.get("a"), Ok(&Value::int(1)));
    assert_eq!(
        subject.get_many(&["b", "a"]),
        Ok(vec![&Value::int(2), &Value::int(1)])
    );
    assert_eq!(
        subject.get("z"),
        Err(LookupError::Unbound {
            name: "z".to_owned()
        })
    );

    assert!(!subject.matches(&pair(Value::int(9), p("b"))).expect("valid template"));
    assert!(!subject.is_match());
    assert_eq!(subject.get("a"), Err(LookupError::NoMatch));
}

#[test]
fn test_matchable_reports_duplicate_binder() {
    let mut subject = Matchable::new(pair(Value::int(1), Value::int(2)));
    assert!(subject.matches(&pair(p("a"), p("b"))).expect("valid template"));

    let err = subject
        .matches(&pair(p("a"), p("a")))
        .expect_err("binds a twice");
    assert_eq!(err.name, Name::intern("a"));
    assert!(!subject.is_match());

    // Rejected even where the shape could never have matched.
    let mut single = Matchable::new(Value::int(1));
    assert!(single.matches(&pair(p("x"), p("x"))).is_err());
}

fn binder_names(len: usize) -> Vec<String> {
    (0..len).map(|i| format!("v{i}")).collect()
}

proptest! {
    #[test]
    fn prop_tuple_binds_every_item(items in prop::collection::vec(any::<i64>(), 0..12)) {
        let labels = binder_names(items.len());
        let template = Value::tuple(labels.iter().map(|l| p(l)).collect());
        let value = Value::tuple(items.iter().copied().map(Value::int).collect());

        let bindings = match_value(&template, &value).expect("same length");
        prop_assert_eq!(bindings.len(), items.len());
        for (label, item) in labels.iter().zip(&items) {
            prop_assert_eq!(bindings.get(label), Some(&Value::int(*item)));
        }

        let mut longer = items.iter().copied().map(Value::int).collect::<Vec<_>>();
        longer.push(Value::None);
        prop_assert!(match_value(&template, &Value::tuple(longer)).is_none());
    }

    #[test]
    fn prop_self_match_binds_names_to_themselves(len in 0usize..8) {
        let labels = binder_names(len);
        let template = Value::list(labels.iter().map(|l| p(l)).collect());

        let bindings = match_value(&template, &template).expect("self match");
        let expected = names(&template).expect("no duplicates");
        prop_assert_eq!(bindings.names().collect::<Vec<_>>(), expected);
        for (name, value) in bindings.iter() {
            prop_assert_eq!(value, &Value::Pattern(name));
        }
    }
}
