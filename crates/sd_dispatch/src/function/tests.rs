use super::*;
use crate::template::Placeholder;
use pretty_assertions::assert_eq;
use sd_patterns::pat;
use sd_types::{ConstructionError, Member, MethodMember, Parameter, SumType};

fn p(name: &str) -> Value {
    pat(name).expect("valid binder")
}

fn signature(params: Vec<Parameter>) -> Signature {
    Signature::new(params).expect("valid signature")
}

fn int(args: &HandlerArgs, name: &str) -> Result<i64, DispatchError> {
    args.arg(name)?
        .as_int()
        .ok_or_else(|| DispatchError::handler(format!("{name} is not an int")))
}

fn either() -> TypeRef {
    TypeRef::Sum(
        SumType::builder("Either")
            .variant("Left", 1)
            .variant("Right", 1)
            .build()
            .expect("valid sum"),
    )
}

fn construct(owner: &TypeRef, variant: &str, item: Value) -> Result<Value, ConstructionError> {
    let TypeRef::Sum(sum) = owner else {
        return Err(ConstructionError::Rejected {
            class: owner.name(),
            message: "not a sum type".to_owned(),
        });
    };
    let ctor = sum.variant(variant).map_err(|err| ConstructionError::Rejected {
        class: owner.name(),
        message: err.to_string(),
    })?;
    ctor.construct(vec![item])
}

/// `cls.<variant>(pat(binder))`, resolved per owner.
fn variant_of(variant: &'static str, binder: &'static str) -> Placeholder {
    Placeholder::new(move |owner| construct(owner, variant, p(binder)))
}

fn call2(f: &Function, a: i64, b: i64) -> Result<Value, DispatchError> {
    f.call(CallArgs::positional(vec![Value::int(a), Value::int(b)]))
}

#[test]
fn test_templates_tried_in_order() {
    let f = Function::new(
        "function",
        signature(vec![Parameter::positional("a"), Parameter::positional("b")]),
    );
    f.when([("a", Value::int(3)), ("b", p("b"))], |args| {
        Ok(args.arg("b")?.clone())
    })
    .expect("return_b");
    f.when([("b", Value::int(2)), ("a", p("a"))], |args| {
        Ok(args.arg("a")?.clone())
    })
    .expect("return_a");
    f.when([("a", p("a")), ("b", p("b"))], |args| {
        Ok(Value::int(int(&args, "a")? * int(&args, "b")?))
    })
    .expect("multiply");

    assert_eq!(call2(&f, 3, 2).expect("call"), Value::int(2));
    assert_eq!(call2(&f, 4, 2).expect("call"), Value::int(4));
    assert_eq!(call2(&f, 4, 4).expect("call"), Value::int(16));
}

#[test]
fn test_keywords_and_defaults_are_normalized() {
    let f = Function::new(
        "scale",
        signature(vec![
            Parameter::positional("x"),
            Parameter::positional("factor").with_default(Value::int(2)),
        ]),
    );
    f.when([("x", p("x")), ("factor", p("factor"))], |args| {
        Ok(Value::int(int(&args, "x")? * int(&args, "factor")?))
    })
    .expect("scale");

    let by_default = f.call(CallArgs::new().arg(Value::int(5))).expect("call");
    let by_keyword = f
        .call(CallArgs::new().kwarg("factor", Value::int(3)).kwarg("x", Value::int(5)))
        .expect("call");
    assert_eq!(by_default, Value::int(10));
    assert_eq!(by_keyword, Value::int(15));

    let err = f.call(CallArgs::new());
    assert!(matches!(
        err,
        Err(DispatchError::Signature(SignatureError::MissingArgument { .. }))
    ));
}

#[test]
fn test_exhausted_without_fallback() {
    let f = Function::new("only_one", signature(vec![Parameter::positional("n")]));
    f.when([("n", Value::int(1))], |_| Ok(Value::string("one")))
        .expect("one");

    assert_eq!(
        f.call(CallArgs::positional(vec![Value::int(1)])).expect("call"),
        Value::string("one")
    );
    let err = f
        .call(CallArgs::positional(vec![Value::int(2)]))
        .expect_err("no match");
    assert_eq!(err.code(), sd_diagnostic::ErrorCode::E4001);
}

#[test]
fn test_fallback_gets_original_arguments() {
    let f = Function::new("echo", signature(vec![Parameter::positional("n")]))
        .with_fallback(|args| Ok(Value::list(args.positional)));
    assert_eq!(
        f.call(CallArgs::positional(vec![Value::int(7)])).expect("call"),
        Value::list(vec![Value::int(7)])
    );
}

#[test]
fn test_variadics_are_set_aside() {
    let f = Function::new(
        "trivial",
        signature(vec![
            Parameter::var_positional("args"),
            Parameter::var_keyword("kwargs"),
        ]),
    );
    f.when(Vec::<(&str, Value)>::new(), |args| {
        Ok(Value::tuple(vec![
            Value::list(args.var_positional.clone()),
            Value::str_dict(args.named.iter().map(|(n, v)| (n.as_str(), v.clone()))),
        ]))
    })
    .expect("passthrough");

    assert_eq!(
        f.call(CallArgs::new()).expect("call"),
        Value::tuple(vec![Value::list(vec![]), Value::str_dict(Vec::<(&str, Value)>::new())])
    );
    assert_eq!(
        f.call(CallArgs::new().arg(Value::int(1)).kwarg("a", Value::int(2)))
            .expect("call"),
        Value::tuple(vec![
            Value::list(vec![Value::int(1)]),
            Value::str_dict([("a", Value::int(2))]),
        ])
    );
}

#[test]
fn test_binding_colliding_with_keyword_argument() {
    let f = Function::new(
        "takes_kwargs",
        signature(vec![
            Parameter::positional("arg_to_function"),
            Parameter::var_keyword("kwargs"),
        ]),
    )
    .with_fallback(|_| Err(DispatchError::handler("fallback reached")));
    f.when([("arg_to_function", p("kwarg"))], |args| {
        Ok(Value::tuple(vec![
            args.arg("kwarg")?.clone(),
            args.get("a").cloned().unwrap_or(Value::None),
        ]))
    })
    .expect("impl");

    assert_eq!(
        f.call(CallArgs::new().arg(Value::int(1)).kwarg("a", Value::int(2)))
            .expect("call"),
        Value::tuple(vec![Value::int(1), Value::int(2)])
    );
    let err = f.call(CallArgs::new().arg(Value::int(1)).kwarg("kwarg", Value::int(1)));
    assert!(matches!(err, Err(DispatchError::DuplicateArgument { .. })));
}

#[test]
fn test_empty_when_needs_no_named_arguments() {
    let f = Function::new("not_enough", signature(vec![Parameter::positional("arg")]))
        .with_fallback(|_| Err(DispatchError::handler("fallback reached")));
    f.when(Vec::<(&str, Value)>::new(), |_| Ok(Value::string("matched")))
        .expect("bad_match");

    let err = f
        .call(CallArgs::positional(vec![Value::None]))
        .expect_err("falls back");
    assert_eq!(err.to_string(), "fallback reached");
}

#[test]
fn test_placeholder_method_resolves_against_sum() {
    let owner = either();
    let invert = Function::new("invert", signature(vec![Parameter::positional("self")]))
        .with_fallback(|_| Ok(Value::None));
    invert
        .when([("self", variant_of("Left", "number"))], |args| {
            let number = int(&args, "number")?;
            Ok(Value::int(-number))
        })
        .expect("negate");

    let left = construct(&owner, "Left", Value::int(10)).expect("left");
    let right = construct(&owner, "Right", Value::string("abc")).expect("right");

    assert_eq!(
        invert.call(CallArgs::positional(vec![left])).expect("call"),
        Value::int(-10)
    );
    assert_eq!(
        invert.call(CallArgs::positional(vec![right.clone()])).expect("call"),
        Value::None
    );

    // Registered after the cache for `Either` was filled.
    invert
        .when([("self", variant_of("Right", "string"))], |args| {
            Ok(args.arg("string")?.clone())
        })
        .expect("reverse");
    assert_eq!(
        invert.call(CallArgs::positional(vec![right])).expect("call"),
        Value::string("abc")
    );

    let err = invert.call(CallArgs::positional(vec![Value::int(1)]));
    assert!(matches!(err, Err(DispatchError::AbstractWithoutOwner { .. })));
}

#[test]
fn test_class_method_receives_owner() {
    let owner = either();
    let increment = ClassMethod::new(
        "increment",
        signature(vec![Parameter::positional("cls"), Parameter::positional("value")]),
    );
    increment
        .when(
            [
                ("cls", Matcher::from(p("cls"))),
                ("value", variant_of("Right", "number").into()),
            ],
            |args| {
                let Value::Class(cls) = args.arg("cls")? else {
                    return Err(DispatchError::handler("cls is not a class"));
                };
                let number = int(&args, "number")?;
                construct(cls, "Right", Value::int(number + 1)).map_err(DispatchError::handler)
            },
        )
        .expect("increment_int");
    increment
        .when(
            [
                ("cls", Matcher::from(Value::Discard)),
                ("value", variant_of("Left", "error").into()),
            ],
            |args| Ok(args.arg("error")?.clone()),
        )
        .expect("increment_error");

    let five = construct(&owner, "Right", Value::int(5)).expect("right");
    let six = construct(&owner, "Right", Value::int(6)).expect("right");
    assert_eq!(
        increment
            .call(&owner, CallArgs::positional(vec![five]))
            .expect("call"),
        six
    );

    let failure = construct(&owner, "Left", Value::string("boom")).expect("left");
    assert_eq!(
        increment
            .call(&owner, CallArgs::positional(vec![failure]))
            .expect("call"),
        Value::string("boom")
    );
}

#[test]
fn test_class_method_on_a_variant_receives_the_variant_class() {
    let describe = Arc::new(ClassMethod::new(
        "describe",
        signature(vec![Parameter::positional("cls")]),
    ));
    describe
        .when([("cls", Matcher::from(p("cls")))], |args| {
            Ok(args.arg("cls")?.clone())
        })
        .expect("describe");
    let sum = SumType::builder("Either")
        .variant("Left", 1)
        .variant("Right", 1)
        .member(
            "describe",
            Member::Method(Arc::clone(&describe) as Arc<dyn MethodMember>),
        )
        .build()
        .expect("valid sum");
    let left = sum.variant("Left").expect("Left");
    let instance = left.construct(vec![Value::int(1)]).expect("arity 1");

    let cls = instance
        .call_method(Name::intern("describe"), CallArgs::new())
        .expect("call");
    assert_eq!(cls, Value::class(TypeRef::Variant(left)));
    assert_ne!(cls, Value::class(TypeRef::Sum(sum)));
}

#[test]
fn test_static_method_refuses_placeholders() {
    let f = StaticMethod::new("pick", signature(vec![Parameter::positional("x")]));
    let err = f.when([("x", variant_of("Left", "n"))], |_| Ok(Value::None));
    assert!(matches!(err, Err(DispatchError::PlaceholderNotAllowed { .. })));

    f.when([("x", p("x"))], |args| Ok(args.arg("x")?.clone()))
        .expect("plain");
    assert_eq!(
        f.call(CallArgs::positional(vec![Value::int(4)])).expect("call"),
        Value::int(4)
    );
}

#[test]
fn test_method_member_prepends_instance() {
    let owner = either();
    let describe = Function::new("describe", signature(vec![Parameter::positional("self")]));
    describe
        .when([("self", variant_of("Left", "inner"))], |args| {
            Ok(args.arg("inner")?.clone())
        })
        .expect("describe");

    let left = construct(&owner, "Left", Value::int(3)).expect("left");
    let result = MethodMember::invoke(&describe, &left, CallArgs::new());
    assert_eq!(result.ok(), Some(Value::int(3)));

    let right = construct(&owner, "Right", Value::int(3)).expect("right");
    let err = MethodMember::invoke(&describe, &right, CallArgs::new()).expect_err("exhausted");
    assert_eq!(err.code(), sd_diagnostic::ErrorCode::E4001);
}
