use super::*;
use pretty_assertions::assert_eq;
use sd_types::{SumType, TupleClass};

fn shapes() -> Arc<SumType> {
    SumType::builder("Shape")
        .variant("Circle", 1)
        .variant("Square", 1)
        .build()
        .expect("valid sum")
}

fn make(sum: &Arc<SumType>, variant: &str, items: Vec<Value>) -> Value {
    sum.variant(variant)
        .expect("variant exists")
        .construct(items)
        .expect("arity matches")
}

#[test]
fn test_builtin_resolution() {
    let list = DestructurerList::builtin();
    let sum = shapes();
    let circle = make(&sum, "Circle", vec![Value::int(1)]);

    assert_eq!(list.get(&circle).map(Destructurer::name), Some("adt"));
    assert_eq!(list.get(&Value::tuple(vec![])).map(Destructurer::name), Some("tuple"));
    assert_eq!(list.get(&Value::list(vec![])).map(Destructurer::name), Some("list"));
    assert!(list.get(&Value::int(3)).is_none());
    assert_eq!(format!("{list:?}"), r#"["adt", "tuple", "list"]"#);
}

#[test]
fn test_adt_requires_exact_variant() {
    let sum = shapes();
    let circle = make(&sum, "Circle", vec![Value::int(1)]);
    let other = make(&sum, "Circle", vec![Value::int(2)]);
    let square = make(&sum, "Square", vec![Value::int(1)]);

    let items = AdtDestructurer.destructure(&circle, &other).expect("same variant");
    assert_eq!(items.as_slice(), &[Value::int(2)]);
    assert!(AdtDestructurer.destructure(&circle, &square).is_err());
    assert!(AdtDestructurer
        .destructure(&circle, &Value::tuple(vec![Value::int(1)]))
        .is_err());
}

#[test]
fn test_tuple_items_come_out_reversed() {
    let target = Value::tuple(vec![Value::int(1), Value::int(2)]);
    let items = TupleDestructurer.destructure(&target, &target).expect("splits");
    assert_eq!(items.as_slice(), &[Value::int(2), Value::int(1)]);

    let longer = Value::tuple(vec![Value::int(1), Value::int(2), Value::int(3)]);
    assert!(TupleDestructurer.destructure(&target, &longer).is_err());
}

#[test]
fn test_tuple_rejects_adt_instances() {
    let sum = shapes();
    let circle = make(&sum, "Circle", vec![Value::int(1)]);
    let target = Value::tuple(vec![Value::Discard]);
    assert!(TupleDestructurer.destructure(&target, &circle).is_err());
}

#[test]
fn test_tuple_class_is_checked_one_way() {
    let base = TupleClass::new("Pair");
    let derived = TupleClass::derive(&base, "NamedPair");
    let plain = Value::tuple(vec![Value::int(1)]);
    let tagged = Value::tuple_of(&derived, vec![Value::int(1)]);

    // A plain tuple template accepts any tuple; a tagged one only its class.
    assert!(TupleDestructurer.destructure(&plain, &tagged).is_ok());
    assert!(TupleDestructurer.destructure(&tagged, &plain).is_err());

    let base_template = Value::tuple_of(&base, vec![Value::Discard]);
    assert!(TupleDestructurer.destructure(&base_template, &tagged).is_ok());
}

#[test]
fn test_list_needs_equal_length() {
    let target = Value::list(vec![Value::Discard, Value::Discard]);
    let items = ListDestructurer
        .destructure(&target, &Value::list(vec![Value::int(1), Value::int(2)]))
        .expect("same length");
    assert_eq!(items.as_slice(), &[Value::int(2), Value::int(1)]);
    assert!(ListDestructurer
        .destructure(&target, &Value::list(vec![Value::int(1)]))
        .is_err());
    assert!(ListDestructurer
        .destructure(&target, &Value::tuple(vec![Value::int(1), Value::int(2)]))
        .is_err());
}

struct Strings;

impl Destructurer for Strings {
    fn name(&self) -> &'static str {
        "chars"
    }

    fn handles(&self, target: &Value) -> bool {
        target.as_str().is_some()
    }

    fn destructure(&self, target: &Value, subject: &Value) -> Result<Items, MatchFailure> {
        let (Some(expected), Some(found)) = (target.as_str(), subject.as_str()) else {
            return Err(MatchFailure);
        };
        if expected.chars().count() != found.chars().count() {
            return Err(MatchFailure);
        }
        Ok(found.chars().rev().map(Value::string).collect())
    }
}

#[test]
fn test_custom_destructurers_come_first() {
    let list = DestructurerList::custom([Arc::new(Strings) as Arc<dyn Destructurer>]);
    assert_eq!(list.len(), 4);
    assert_eq!(list.get(&Value::string("ab")).map(Destructurer::name), Some("chars"));
    assert!(DESTRUCTURERS.get(&Value::string("ab")).is_none());
}
