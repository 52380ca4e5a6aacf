use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ExprError::unsupported("value(Order).total", "x", "parameter root")
            .to_string()
            .contains("unsupported expression shape:")
    );
    assert!(
        ExprError::null_reference("value(Order).customer.name", "value(Order).customer", "name")
            .to_string()
            .contains("null reference:")
    );
    assert!(
        ExprError::type_mismatch("i64", "string", "value(Order).id")
            .to_string()
            .contains("type mismatch:")
    );
    assert!(
        ExprError::member_not_found("Order", "nope")
            .to_string()
            .contains("member not found:")
    );
    assert!(
        ExprError::not_assignable("e.total()", "is a method call")
            .to_string()
            .contains("not assignable:")
    );
    assert!(
        ExprError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ExprError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn diagnostics_name_the_failing_node() {
    let err = ExprError::null_reference("value(Order).customer.name", "value(Order).customer", "name");
    let msg = err.to_string();
    assert!(msg.contains("`name`"));
    assert!(msg.contains("`value(Order).customer`"));
    assert!(msg.contains("`value(Order).customer.name`"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ExprError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: ExprError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, ExprError::Serde(_)));
}
