use super::*;

#[test]
fn path_builds_fields_from_the_root_outward() {
    let e = path(param("x"), &["a", "b", "c"]).unwrap();
    assert_eq!(e.to_string(), "x.a.b.c");
    assert_eq!(e.member().name, "c");
    let b = e.inner().and_then(Expr::as_member).unwrap();
    assert_eq!(b.member().name, "b");
}

#[test]
fn path_needs_a_segment() {
    assert!(path(param("x"), &[]).is_err());
}

#[test]
fn field_and_property_set_member_kind() {
    use crate::reflect::member::MemberKind;

    assert_eq!(field(param("x"), "a").member().kind, MemberKind::Field);
    assert_eq!(property(param("x"), "a").member().kind, MemberKind::Property);
    assert!(static_field("a").inner().is_none());
}

#[test]
fn lambda_has_one_parameter() {
    let l = lambda("e", field(param("e"), "name"));
    assert_eq!(l.params().len(), 1);
    assert_eq!(l.params()[0].name, "e");
}
