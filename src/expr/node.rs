use std::fmt;

use crate::{
    eval::chain::DependencyChain,
    foundation::{
        error::{ExprError, ExprResult},
        value::Value,
    },
    reflect::member::Member,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Expression node.
///
/// Only member chains rooted in a [`Expr::Constant`] resolve to a value. The other
/// node kinds exist so that callers can describe what they have, and so that
/// rejections can name the offending node.
pub enum Expr {
    /// Closed-over literal value.
    Constant(Value),
    /// Lambda parameter reference.
    Parameter(Parameter),
    /// `<inner>.<member>`.
    Member(MemberExpr),
    /// `<target>.<method>(<args>)`.
    Call {
        /// Receiver; `None` for a free function.
        target: Option<Box<Expr>>,
        /// Method name.
        method: String,
        /// Arguments in order.
        args: Vec<Expr>,
    },
    /// `<target>[<index>]`.
    Index {
        /// Indexed expression.
        target: Box<Expr>,
        /// Index expression.
        index: Box<Expr>,
    },
    /// `<target> = <value>`.
    Assign {
        /// Assignment target.
        target: Box<Expr>,
        /// Assigned value.
        value: Box<Expr>,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Member-access node. `inner` is `None` for a static member.
pub struct MemberExpr {
    /// Object being accessed.
    pub inner: Option<Box<Expr>>,
    /// Member read from `inner`.
    pub member: Member,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Formal lambda parameter. Parameters are identified by name within a lambda.
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type name, if known.
    pub type_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Lambda: parameters plus a body.
pub struct Lambda {
    /// Formal parameters in call order.
    pub params: Vec<Parameter>,
    /// Body expression.
    pub body: Box<Expr>,
}

impl Expr {
    /// Human-readable node kind used in diagnostics.
    pub fn node_kind(&self) -> &'static str {
        match self {
            Self::Constant(_) => "constant",
            Self::Parameter(_) => "parameter",
            Self::Member(_) => "member access",
            Self::Call { .. } => "method call",
            Self::Index { .. } => "indexer",
            Self::Assign { .. } => "assignment",
        }
    }

    /// Borrow the member-access node, if this is one.
    pub fn as_member(&self) -> Option<&MemberExpr> {
        match self {
            Self::Member(m) => Some(m),
            _ => None,
        }
    }

    /// Access field `name` on this expression.
    pub fn field(self, name: impl Into<String>) -> MemberExpr {
        MemberExpr::new(self, Member::field(name))
    }

    /// Access property `name` on this expression.
    pub fn property(self, name: impl Into<String>) -> MemberExpr {
        MemberExpr::new(self, Member::property(name))
    }

    /// Structural checks: non-empty member, parameter and method names.
    pub fn validate(&self) -> ExprResult<()> {
        match self {
            Self::Constant(_) => Ok(()),
            Self::Parameter(p) => p.validate(),
            Self::Member(m) => m.validate(),
            Self::Call {
                target,
                method,
                args,
            } => {
                if method.trim().is_empty() {
                    return Err(ExprError::validation("method name must be non-empty"));
                }
                if let Some(target) = target {
                    target.validate()?;
                }
                args.iter().try_for_each(Expr::validate)
            }
            Self::Index { target, index } => {
                target.validate()?;
                index.validate()
            }
            Self::Assign { target, value } => {
                target.validate()?;
                value.validate()
            }
        }
    }
}

impl MemberExpr {
    /// `inner.member`.
    pub fn new(inner: Expr, member: Member) -> Self {
        Self {
            inner: Some(Box::new(inner)),
            member,
        }
    }

    /// Static member with no receiver.
    pub fn static_member(member: Member) -> Self {
        Self {
            inner: None,
            member,
        }
    }

    /// Receiver expression.
    pub fn inner(&self) -> Option<&Expr> {
        self.inner.as_deref()
    }

    /// Accessed member.
    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Chain a field access onto this node.
    pub fn field(self, name: impl Into<String>) -> Self {
        Expr::Member(self).field(name)
    }

    /// Chain a property access onto this node.
    pub fn property(self, name: impl Into<String>) -> Self {
        Expr::Member(self).property(name)
    }

    /// Structural checks over this node and its receiver.
    ///
    /// Member links are walked iteratively; only the non-member root recurses.
    pub fn validate(&self) -> ExprResult<()> {
        let chain = DependencyChain::collect(self);
        if chain
            .leaf_to_root()
            .any(|link| link.member.name.trim().is_empty())
        {
            return Err(ExprError::validation(format!(
                "member name must be non-empty (in `{self}`)"
            )));
        }
        match chain.root() {
            Some(root) => root.validate(),
            None => Ok(()),
        }
    }
}

impl From<MemberExpr> for Expr {
    fn from(m: MemberExpr) -> Self {
        Self::Member(m)
    }
}

impl From<Parameter> for Expr {
    fn from(p: Parameter) -> Self {
        Self::Parameter(p)
    }
}

impl Parameter {
    /// Untyped parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
        }
    }

    /// Parameter with a declared type name.
    pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
        }
    }

    /// Reference this parameter from an expression body.
    pub fn to_expr(&self) -> Expr {
        Expr::Parameter(self.clone())
    }

    fn validate(&self) -> ExprResult<()> {
        if self.name.trim().is_empty() {
            return Err(ExprError::validation("parameter name must be non-empty"));
        }
        Ok(())
    }
}

impl Lambda {
    /// Build a lambda from parameters and a body.
    pub fn new(params: Vec<Parameter>, body: impl Into<Expr>) -> Self {
        Self {
            params,
            body: Box::new(body.into()),
        }
    }

    /// Formal parameters.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Body expression.
    pub fn body(&self) -> &Expr {
        &self.body
    }

    /// Parameters must be named and unique; the body must be well-formed.
    pub fn validate(&self) -> ExprResult<()> {
        for (i, p) in self.params.iter().enumerate() {
            p.validate()?;
            if self.params[..i].iter().any(|q| q.name == p.name) {
                return Err(ExprError::validation(format!(
                    "duplicate lambda parameter '{}'",
                    p.name
                )));
            }
        }
        self.body.validate()
    }
}

fn fmt_constant(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Int(i) => write!(f, "{i}"),
        Value::Float(x) => write!(f, "{x:?}"),
        Value::Str(s) => write!(f, "{s:?}"),
        other => write!(f, "value({})", other.kind_name()),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => fmt_constant(v, f),
            Self::Parameter(p) => write!(f, "{p}"),
            Self::Member(m) => write!(f, "{m}"),
            Self::Call {
                target,
                method,
                args,
            } => {
                if let Some(target) = target {
                    write!(f, "{target}.")?;
                }
                write!(f, "{method}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Self::Index { target, index } => write!(f, "{target}[{index}]"),
            Self::Assign { target, value } => write!(f, "{target} = {value}"),
        }
    }
}

impl fmt::Display for MemberExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain = DependencyChain::collect(self);
        match chain.root() {
            Some(root) => write!(f, "{root}")?,
            None => f.write_str("<static>")?,
        }
        for link in chain.root_to_leaf() {
            write!(f, ".{}", link.member)?;
        }
        Ok(())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.params.as_slice() {
            [single] => write!(f, "{single} => {}", self.body),
            params => {
                f.write_str("(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") => {}", self.body)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expr/node.rs"]
mod tests;
