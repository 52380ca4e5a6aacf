use crate::{
    eval::chain::DependencyChain,
    expr::node::{Expr, MemberExpr},
    foundation::{
        error::{ExprError, ExprResult},
        value::{FromValue, Value},
    },
    reflect::member::read_member,
};

const DEFAULT_MAX_CHAIN_LEN: usize = 256;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Resolver limits.
pub struct ResolveSettings {
    /// Longest member chain accepted before any member is read.
    pub max_chain_len: usize,
}

impl Default for ResolveSettings {
    fn default() -> Self {
        Self {
            max_chain_len: DEFAULT_MAX_CHAIN_LEN,
        }
    }
}

impl ResolveSettings {
    /// Reject settings that would make every resolution fail.
    pub fn validate(&self) -> ExprResult<()> {
        if self.max_chain_len == 0 {
            return Err(ExprError::validation("max_chain_len must be > 0"));
        }
        Ok(())
    }

    /// Parse settings from JSON; missing keys take their defaults.
    pub fn from_json_str(s: &str) -> ExprResult<Self> {
        let settings: Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Clone, Debug, Default)]
/// Stateless resolver from member-access chains to the values they denote.
pub struct Resolver {
    settings: ResolveSettings,
}

impl Resolver {
    /// Build a resolver with validated settings.
    pub fn new(settings: ResolveSettings) -> ExprResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Active settings.
    pub fn settings(&self) -> &ResolveSettings {
        &self.settings
    }

    #[tracing::instrument(skip_all, fields(expr = %expr))]
    /// Resolve the value of a member chain rooted in a constant.
    pub fn resolve(&self, expr: &MemberExpr) -> ExprResult<Value> {
        let chain = DependencyChain::collect(expr);
        if chain.len() > self.settings.max_chain_len {
            return Err(ExprError::validation(format!(
                "member chain of length {} exceeds max_chain_len {}",
                chain.len(),
                self.settings.max_chain_len
            )));
        }
        expr.validate()?;

        let mut resolved = match chain.root() {
            Some(Expr::Constant(value)) => value.clone(),
            Some(other) => {
                return Err(ExprError::unsupported(
                    expr,
                    other,
                    format!("expected a constant chain root, found {}", other.node_kind()),
                ));
            }
            None => {
                return Err(ExprError::unsupported(
                    expr,
                    chain.outermost(),
                    "expected a constant chain root, found a static member",
                ));
            }
        };
        tracing::debug!(chain_len = chain.len(), "resolving member chain");

        for link in chain.root_to_leaf() {
            if resolved.is_null() {
                let at = link.inner().map(ToString::to_string).unwrap_or_default();
                return Err(ExprError::null_reference(expr, at, &link.member().name));
            }
            resolved = read_member(&resolved, link.member())?;
            tracing::trace!(member = %link.member(), kind = resolved.kind_name(), "read member");
        }

        Ok(resolved)
    }

    /// Resolve and convert to `T`; a failed conversion is [`ExprError::TypeMismatch`].
    pub fn resolve_as<T: FromValue>(&self, expr: &MemberExpr) -> ExprResult<T> {
        let value = self.resolve(expr)?;
        T::from_value(value)
            .map_err(|found| ExprError::type_mismatch(T::expected(), found.kind_name(), expr))
    }

    /// Resolve an arbitrary expression; anything but a member access is rejected.
    pub fn resolve_expr(&self, expr: &Expr) -> ExprResult<Value> {
        match expr {
            Expr::Member(member) => self.resolve(member),
            other => Err(ExprError::unsupported(
                other,
                other,
                format!("expected a member access, found {}", other.node_kind()),
            )),
        }
    }
}

/// Value of `expr` using default settings.
pub fn get_member_value(expr: &MemberExpr) -> ExprResult<Value> {
    Resolver::default().resolve(expr)
}

/// Value of `expr` converted to `T`, using default settings.
pub fn get_member_value_as<T: FromValue>(expr: &MemberExpr) -> ExprResult<T> {
    Resolver::default().resolve_as(expr)
}

impl MemberExpr {
    /// Shorthand for [`get_member_value`].
    pub fn value(&self) -> ExprResult<Value> {
        get_member_value(self)
    }

    /// Shorthand for [`get_member_value_as`].
    pub fn value_as<T: FromValue>(&self) -> ExprResult<T> {
        get_member_value_as(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/resolver.rs"]
mod tests;
