/// Convenience result type used across exprchain.
pub type ExprResult<T> = Result<T, ExprError>;

/// Top-level error taxonomy used by resolver and setter APIs.
#[derive(thiserror::Error, Debug)]
pub enum ExprError {
    /// The expression graph is not a chain of member accesses rooted in a constant,
    /// or a node kind other than a member access sits where one is required.
    #[error("unsupported expression shape: {reason} at `{at}` in `{expr}`")]
    UnsupportedExpressionShape {
        /// Full expression being resolved.
        expr: String,
        /// Node where the walk stopped.
        at: String,
        /// What was found instead of the expected node kind.
        reason: String,
    },

    /// An intermediate value is null while a further member read is required.
    #[error("null reference: cannot read `{member}` because `{at}` is null in `{expr}`")]
    NullReferenceEncountered {
        /// Full expression being resolved or assigned.
        expr: String,
        /// Sub-expression that evaluated to null.
        at: String,
        /// Member that could not be read.
        member: String,
    },

    /// A value cannot be converted to the requested type.
    #[error("type mismatch: expected {expected}, found {found} ({context})")]
    TypeMismatch {
        /// Requested type name.
        expected: String,
        /// Kind of the value actually produced.
        found: String,
        /// Expression or member the value came from.
        context: String,
    },

    /// The object does not expose the requested member.
    #[error("member not found: `{type_name}` has no field or property `{member}`")]
    MemberNotFound {
        /// Runtime type name of the object.
        type_name: String,
        /// Requested member name.
        member: String,
    },

    /// A setter target cannot be assigned.
    #[error("not assignable: `{target}` {reason}")]
    NotAssignable {
        /// Assignment target expression or member.
        target: String,
        /// Why the assignment is impossible.
        reason: String,
    },

    /// Invalid expression nodes, lambdas or settings.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from host objects or dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExprError {
    /// Build an [`ExprError::UnsupportedExpressionShape`] value.
    pub fn unsupported(
        expr: impl ToString,
        at: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedExpressionShape {
            expr: expr.to_string(),
            at: at.to_string(),
            reason: reason.into(),
        }
    }

    /// Build an [`ExprError::NullReferenceEncountered`] value.
    pub fn null_reference(expr: impl ToString, at: impl ToString, member: impl Into<String>) -> Self {
        Self::NullReferenceEncountered {
            expr: expr.to_string(),
            at: at.to_string(),
            member: member.into(),
        }
    }

    /// Build an [`ExprError::TypeMismatch`] value.
    pub fn type_mismatch(
        expected: impl Into<String>,
        found: impl Into<String>,
        context: impl ToString,
    ) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
            context: context.to_string(),
        }
    }

    /// Build an [`ExprError::MemberNotFound`] value.
    pub fn member_not_found(type_name: impl Into<String>, member: impl Into<String>) -> Self {
        Self::MemberNotFound {
            type_name: type_name.into(),
            member: member.into(),
        }
    }

    /// Build an [`ExprError::NotAssignable`] value.
    pub fn not_assignable(target: impl ToString, reason: impl Into<String>) -> Self {
        Self::NotAssignable {
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    /// Build an [`ExprError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`ExprError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ExprError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
