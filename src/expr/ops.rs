use crate::{
    expr::node::{Expr, Lambda, MemberExpr, Parameter},
    foundation::{
        error::{ExprError, ExprResult},
        value::Value,
    },
    reflect::member::Member,
};

/// Closed-over literal.
pub fn constant(value: impl Into<Value>) -> Expr {
    Expr::Constant(value.into())
}

/// Untyped parameter reference.
pub fn param(name: impl Into<String>) -> Expr {
    Expr::Parameter(Parameter::new(name))
}

/// `inner.name` as a field access.
pub fn field(inner: Expr, name: impl Into<String>) -> MemberExpr {
    MemberExpr::new(inner, Member::field(name))
}

/// `inner.name` as a property access.
pub fn property(inner: Expr, name: impl Into<String>) -> MemberExpr {
    MemberExpr::new(inner, Member::property(name))
}

/// Static field with no receiver.
pub fn static_field(name: impl Into<String>) -> MemberExpr {
    MemberExpr::static_member(Member::field(name))
}

/// `target.method(args)`.
pub fn call(target: Expr, method: impl Into<String>, args: Vec<Expr>) -> Expr {
    Expr::Call {
        target: Some(Box::new(target)),
        method: method.into(),
        args,
    }
}

/// `target[index]`.
pub fn index(target: Expr, index: Expr) -> Expr {
    Expr::Index {
        target: Box::new(target),
        index: Box::new(index),
    }
}

/// `target = value`.
pub fn assign(target: Expr, value: Expr) -> Expr {
    Expr::Assign {
        target: Box::new(target),
        value: Box::new(value),
    }
}

/// `name => body`.
pub fn lambda(name: impl Into<String>, body: impl Into<Expr>) -> Lambda {
    Lambda::new(vec![Parameter::new(name)], body)
}

/// Field chain `root.a.b.c` from dotted segments.
pub fn path(root: Expr, segments: &[&str]) -> ExprResult<MemberExpr> {
    let Some((first, rest)) = segments.split_first() else {
        return Err(ExprError::validation(
            "member path needs at least one segment",
        ));
    };
    let mut out = field(root, *first);
    for segment in rest {
        out = out.field(*segment);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/expr/ops.rs"]
mod tests;
