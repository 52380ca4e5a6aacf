use super::*;
use crate::{
    expr::ops::{call, constant, lambda, param, static_field},
    foundation::value::Record,
    reflect::member::{MemberInfo, convert_member},
};

#[derive(Debug, Clone)]
struct Person {
    id: i64,
    name: String,
    age: i64,
    address: Value,
    badge: Value,
}

impl Person {
    fn new() -> Self {
        Self {
            id: 1,
            name: "old".to_string(),
            age: 30,
            address: Value::Record(Record::new("Address").with_field("city", "Paris")),
            badge: Value::Null,
        }
    }
}

impl Reflect for Person {
    fn type_name(&self) -> &str {
        "Person"
    }

    fn members(&self) -> Vec<MemberInfo> {
        vec![
            MemberInfo::field("id").writable(false),
            MemberInfo::field("name"),
            MemberInfo::field("age"),
            MemberInfo::field("address"),
            MemberInfo::field("badge"),
            MemberInfo::property("greeting"),
        ]
    }

    fn get_member(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::Int(self.id)),
            "name" => Some(Value::from(self.name.as_str())),
            "age" => Some(Value::Int(self.age)),
            "address" => Some(self.address.clone()),
            "badge" => Some(self.badge.clone()),
            "greeting" => Some(Value::from(format!("hello {}", self.name))),
            _ => None,
        }
    }

    fn set_member(&mut self, name: &str, value: Value) -> ExprResult<()> {
        match name {
            "id" => self.id = convert_member("Person", name, value)?,
            "name" => self.name = convert_member("Person", name, value)?,
            "age" => self.age = convert_member("Person", name, value)?,
            "address" => self.address = value,
            "badge" => self.badge = value,
            "greeting" => {
                return Err(ExprError::not_assignable("Person.greeting", "is read-only"));
            }
            _ => return Err(ExprError::member_not_found("Person", name)),
        }
        Ok(())
    }

    fn member_mut(&mut self, name: &str) -> Option<&mut Value> {
        match name {
            "address" => Some(&mut self.address),
            "badge" => Some(&mut self.badge),
            _ => None,
        }
    }
}

#[test]
fn setter_assigns_the_getter_member() {
    let getter = lambda("entity", param("entity").field("name"));
    let setter = get_setter::<Person, String>(&getter).unwrap();
    let mut p = Person::new();
    setter.set(&mut p, "new".to_string()).unwrap();
    assert_eq!(p.name, "new");
}

#[test]
fn synthesized_lambda_is_an_assignment() {
    let getter = lambda("e", param("e").field("age"));
    let setter = getter.setter::<Person, i64>().unwrap();
    assert_eq!(setter.lambda().to_string(), "(e, value) => e.age = value");
    assert_eq!(setter.lambda().params()[1].type_name.as_deref(), Some("i64"));
    assert_eq!(setter.path().len(), 1);
}

#[test]
fn value_parameter_is_renamed_on_collision() {
    let getter = lambda("value", param("value").field("age"));
    let setter = get_setter::<Person, i64>(&getter).unwrap();
    assert_eq!(setter.lambda().to_string(), "(value, value_) => value.age = value_");
    let mut p = Person::new();
    setter.set(&mut p, 41).unwrap();
    assert_eq!(p.age, 41);
}

#[test]
fn nested_setter_walks_through_records() {
    let getter = lambda("p", param("p").field("address").field("city"));
    let setter = get_setter::<Person, &str>(&getter).unwrap();
    let mut p = Person::new();
    setter.set(&mut p, "Rome").unwrap();
    let Value::Record(address) = &p.address else {
        panic!("address is not a record");
    };
    assert_eq!(address.field("city"), Some(&Value::from("Rome")));
}

#[test]
fn nested_setter_reports_null_intermediate() {
    let getter = lambda("p", param("p").field("badge").field("code"));
    let setter = get_setter::<Person, i64>(&getter).unwrap();
    let err = setter.set(&mut Person::new(), 7).unwrap_err();
    match err {
        ExprError::NullReferenceEncountered { at, member, .. } => {
            assert_eq!(at, "p.badge");
            assert_eq!(member, "code");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn nested_setter_rejects_shared_objects() {
    let shared = Value::object(Person::new());
    let mut p = Person::new();
    p.badge = shared.clone();
    let getter = lambda("p", param("p").field("badge").field("age"));
    let setter = get_setter::<Person, i64>(&getter).unwrap();
    let err = setter.set(&mut p, 1).unwrap_err();
    assert!(matches!(err, ExprError::NotAssignable { ref target, .. } if target == "p.badge"));
}

#[test]
fn nested_setter_mutates_uniquely_owned_objects() {
    let mut p = Person::new();
    p.badge = Value::object(Person::new());
    let getter = lambda("p", param("p").field("badge").field("age"));
    let setter = get_setter::<Person, i64>(&getter).unwrap();
    setter.set(&mut p, 5).unwrap();
    assert_eq!(p.badge.downcast_ref::<Person>().unwrap().age, 5);
}

#[test]
fn computed_intermediate_cannot_be_assigned_through() {
    let getter = lambda("p", param("p").field("name").field("len"));
    let setter = get_setter::<Person, i64>(&getter).unwrap();
    let err = setter.set(&mut Person::new(), 1).unwrap_err();
    assert!(matches!(err, ExprError::NotAssignable { .. }));

    let getter = lambda("p", param("p").field("nope").field("len"));
    let setter = get_setter::<Person, i64>(&getter).unwrap();
    let err = setter.set(&mut Person::new(), 1).unwrap_err();
    assert!(matches!(err, ExprError::MemberNotFound { .. }));
}

#[test]
fn read_only_property_is_not_assignable() {
    let getter = lambda("p", param("p").property("greeting"));
    let setter = get_setter::<Person, String>(&getter).unwrap();
    let err = setter.set(&mut Person::new(), "hi".to_string()).unwrap_err();
    assert!(matches!(err, ExprError::NotAssignable { .. }));
}

#[test]
fn read_only_field_is_not_assigned() {
    let getter = lambda("p", param("p").field("id"));
    let setter = get_setter::<Person, i64>(&getter).unwrap();
    let mut p = Person::new();
    let err = setter.set(&mut p, 99).unwrap_err();
    assert!(matches!(err, ExprError::NotAssignable { ref target, .. } if target == "p.id"));
    assert_eq!(p.id, 1);
}

#[test]
fn wrong_value_type_is_a_type_mismatch() {
    let getter = lambda("p", param("p").field("age"));
    let setter = get_setter::<Person, &str>(&getter).unwrap();
    let err = setter.set(&mut Person::new(), "thirty").unwrap_err();
    assert!(matches!(err, ExprError::TypeMismatch { ref context, .. } if context == "Person.age"));
}

#[test]
fn setters_work_on_records() {
    let getter = lambda("r", param("r").field("x"));
    let setter = get_setter::<Record, i64>(&getter).unwrap();
    let mut r = Record::new("Point").with_field("x", 0i64);
    setter.set(&mut r, 9).unwrap();
    assert_eq!(r.field("x"), Some(&Value::Int(9)));
}

#[test]
fn getter_body_must_be_a_member_access() {
    let getter = lambda("p", call(param("p"), "name", vec![]));
    let err = get_setter::<Person, String>(&getter).unwrap_err();
    assert!(matches!(err, ExprError::NotAssignable { .. }));
}

#[test]
fn getter_chain_must_be_rooted_in_the_entity() {
    let getter = lambda("p", constant(Person::new().age).field("x"));
    assert!(matches!(
        get_setter::<Person, i64>(&getter),
        Err(ExprError::NotAssignable { .. })
    ));
    let getter = lambda("p", param("q").field("name"));
    assert!(matches!(
        get_setter::<Person, String>(&getter),
        Err(ExprError::NotAssignable { .. })
    ));
    let getter = lambda("p", static_field("name"));
    assert!(matches!(
        get_setter::<Person, String>(&getter),
        Err(ExprError::NotAssignable { .. })
    ));
}

#[test]
fn getter_must_take_one_parameter() {
    let getter = Lambda::new(
        vec![Parameter::new("a"), Parameter::new("b")],
        param("a").field("name"),
    );
    assert!(matches!(
        get_setter::<Person, String>(&getter),
        Err(ExprError::Validation(_))
    ));
}

#[test]
fn compile_checks_the_assignment_source() {
    let lambda = Lambda::new(
        vec![Parameter::new("e"), Parameter::new("v")],
        assign(param("e").field("name").into(), constant("x")),
    );
    assert!(CompiledSetter::<Person, String>::compile(lambda).is_err());
}

#[test]
fn closure_setters_are_settable() {
    let setter = setter_fn(|p: &mut Person, v: String| p.name = v);
    let mut p = Person::new();
    setter.set(&mut p, "closure".to_string()).unwrap();
    assert_eq!(p.name, "closure");
}

#[test]
fn setters_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CompiledSetter<Person, String>>();
}
