use super::*;
use crate::errors::{AttributeError, ComparisonError};
use crate::value::CompareOp;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn either(flags: AdtFlags) -> Arc<SumType> {
    SumType::builder("Either")
        .variant("Left", 1)
        .variant("Right", 1)
        .flags(flags)
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
fn test_variants_in_declaration_order() {
    let sum = either(AdtFlags::default());
    let names: Vec<String> = sum.variants().map(|v| v.qualname()).collect();
    assert_eq!(names, vec!["Either.Left", "Either.Right"]);
    assert_eq!(sum.variant("Right").expect("exists").index(), 1);
}

#[test]
fn test_erased_variant_is_dropped() {
    let sum = SumType::builder("Shape")
        .variant("Circle", 1)
        .variant("Square", 1)
        .erase("Circle")
        .variant("Rect", 2)
        .build()
        .expect("valid sum");
    let names: Vec<Name> = sum.variants().map(|v| v.name()).collect();
    assert_eq!(names, vec![Name::intern("Square"), Name::intern("Rect")]);
    assert!(sum.variant("Circle").is_err());
}

#[test]
fn test_wrong_arity_is_rejected() {
    let sum = either(AdtFlags::default());
    let err = sum
        .variant("Left")
        .expect("exists")
        .construct(vec![Value::int(1), Value::int(2)]);
    assert_eq!(
        err,
        Err(ConstructionError::Arity {
            variant: "Either.Left".to_owned(),
            expected: 1,
            found: 2,
        })
    );
}

#[test]
fn test_abstract_base_cannot_be_built() {
    let sum = either(AdtFlags::default());
    assert_eq!(
        sum.construct(vec![]),
        Err(ConstructionError::AbstractSum {
            name: Name::intern("Either")
        })
    );
}

#[test]
fn test_sum_is_closed() {
    let sum = either(AdtFlags::default());
    let err = SumType::builder("More")
        .extends(TypeRef::Sum(Arc::clone(&sum)))
        .variant("Extra", 0)
        .build();
    assert_eq!(
        err.map(|_| ()),
        Err(ConstructionError::ClosedType {
            name: Name::intern("Either")
        })
    );

    let left = sum.variant("Left").expect("exists");
    let err = SumType::builder("Special")
        .extends(TypeRef::Variant(left))
        .build();
    assert_eq!(
        err.map(|_| ()),
        Err(ConstructionError::ClosedType {
            name: Name::intern("Left")
        })
    );
}

#[test]
fn test_variant_names_only_through_base() {
    let sum = either(AdtFlags::default());
    let left = sum.variant("Left").expect("exists");
    assert_eq!(
        left.attr(Name::intern("Right")).map(|_| ()),
        Err(AccessError::MemberThroughVariant {
            name: Name::intern("Right")
        })
    );

    let value = make(&sum, "Left", vec![Value::int(1)]);
    let err = value.get_attr(Name::intern("Right"));
    assert!(matches!(
        err.as_ref().map_err(AttributeError::as_access),
        Err(Some(AccessError::MemberThroughVariant { .. }))
    ));

    let through_base = TypeRef::Sum(Arc::clone(&sum))
        .attr(Name::intern("Right"))
        .expect("variant reachable through base");
    assert_eq!(through_base.to_string(), "<class Either.Right>");
}

#[test]
fn test_derived_equality() {
    let sum = either(AdtFlags::default());
    let a = make(&sum, "Left", vec![Value::int(1)]);
    let b = make(&sum, "Left", vec![Value::int(1)]);
    let c = make(&sum, "Right", vec![Value::int(1)]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(a, Value::tuple(vec![Value::int(1)]));
    assert_eq!(a.hash_value(), b.hash_value());
    assert!(a.is_truthy());
}

#[test]
fn test_identity_equality_without_eq() {
    let sum = either(AdtFlags::REPR);
    let a = make(&sum, "Left", vec![Value::int(1)]);
    let b = make(&sum, "Left", vec![Value::int(1)]);
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
    assert!(a.hash_value().is_ok());
}

#[test]
fn test_derived_ordering() {
    let sum = either(AdtFlags::all());
    let left1 = make(&sum, "Left", vec![Value::int(1)]);
    let left2 = make(&sum, "Left", vec![Value::int(2)]);
    let right = make(&sum, "Right", vec![Value::string("x")]);

    assert_eq!(left1.lt(&right), Ok(true));
    assert_eq!(right.lt(&left1), Ok(false));
    assert_eq!(left1.lt(&left2), Ok(true));
    assert_eq!(left2.ge(&left1), Ok(true));
    assert!(matches!(
        left1.lt(&Value::tuple(vec![Value::int(1)])),
        Err(ComparisonError::Unsupported { op: CompareOp::Lt, .. })
    ));
}

#[test]
fn test_unordered_sum_refuses_comparison() {
    let sum = either(AdtFlags::default());
    let a = make(&sum, "Left", vec![Value::int(1)]);
    let b = make(&sum, "Left", vec![Value::int(2)]);
    assert!(a.lt(&b).is_err());
}

#[test]
fn test_order_without_eq() {
    let err = SumType::builder("Bad")
        .flags(AdtFlags::REPR | AdtFlags::ORDER)
        .build();
    assert_eq!(err.map(|_| ()), Err(ConstructionError::OrderWithoutEq));
}

#[test]
fn test_order_with_user_eq() {
    let err = SumType::builder("Bad")
        .variant("A", 0)
        .flags(AdtFlags::all())
        .methods(UserMethods::new().with_eq(|_, _| true))
        .build();
    assert_eq!(
        err.map(|_| ()),
        Err(ConstructionError::OrderWithUserEq {
            class: Name::intern("Bad")
        })
    );
}

#[test]
fn test_ordering_collision_names_method() {
    let err = SumType::builder("Bad")
        .variant("A", 0)
        .flags(AdtFlags::all())
        .methods(UserMethods::new().with_compare(CompareOp::Gt, |_, _| Ok(false)))
        .build();
    assert_eq!(
        err.map_err(|e| e.to_string()).map(|_| ()),
        Err("cannot overwrite attribute gt in class Bad".to_owned())
    );
}

#[test]
fn test_user_eq_without_hash_is_unhashable() {
    let sum = SumType::builder("Loose")
        .variant("A", 1)
        .methods(UserMethods::new().with_eq(|_, _| true))
        .build()
        .expect("valid sum");
    let a = make(&sum, "A", vec![Value::int(1)]);
    let b = make(&sum, "A", vec![Value::int(2)]);
    assert_eq!(a, b);
    assert_eq!(a, Value::None);
    assert!(matches!(
        a.hash_value(),
        Err(ComparisonError::Unhashable { .. })
    ));
    assert!(!sum.derived().contains(AdtFlags::EQ));
}

#[test]
fn test_repr() {
    let sum = either(AdtFlags::default());
    let value = make(&sum, "Left", vec![Value::int(1)]);
    assert_eq!(value.to_string(), "Either.Left(1)");

    let plain = either(AdtFlags::EQ);
    let value = make(&plain, "Left", vec![Value::int(1)]);
    assert_eq!(value.to_string(), "(1,)");

    let custom = SumType::builder("Custom")
        .variant("A", 0)
        .methods(UserMethods::new().with_repr(|_| "custom!".to_owned()))
        .build()
        .expect("valid sum");
    assert_eq!(make(&custom, "A", vec![]).to_string(), "custom!");
}

#[test]
fn test_user_constructor_runs_after_arity_check() {
    let sum = SumType::builder("Doubled")
        .variant("One", 1)
        .constructor(|variant, args| {
            let doubled = args
                .into_iter()
                .map(|v| Value::int(v.as_int().unwrap_or_default() * 2))
                .collect();
            variant.instantiate(doubled)
        })
        .build()
        .expect("valid sum");
    let one = sum.variant("One").expect("exists");
    assert_eq!(
        one.construct(vec![Value::int(21)]).map(|v| v.to_string()),
        Ok("Doubled.One(42)".to_owned())
    );
    assert!(matches!(
        one.construct(vec![]),
        Err(ConstructionError::Arity { .. })
    ));
}

#[test]
fn test_invalid_variant_name() {
    let err = SumType::builder("Bad").variant("match", 0).build();
    assert!(matches!(err, Err(ConstructionError::InvalidName { .. })));
}

proptest! {
    #[test]
    fn prop_any_other_arity_is_rejected(arity in 0usize..6, given in 0usize..8) {
        prop_assume!(arity != given);
        let sum = SumType::builder("Sized")
            .variant("V", arity)
            .build()
            .expect("valid sum");
        let variant = sum.variant("V").expect("exists");
        let result = variant.construct(vec![Value::None; given]);
        let is_arity_error = matches!(result, Err(ConstructionError::Arity { .. }));
        prop_assert!(is_arity_error);
    }
}
