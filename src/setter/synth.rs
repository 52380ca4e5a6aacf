use std::{fmt, marker::PhantomData, sync::Arc};

use crate::{
    eval::chain::DependencyChain,
    expr::{
        node::{Expr, Lambda, Parameter},
        ops::assign,
    },
    foundation::{
        error::{ExprError, ExprResult},
        value::Value,
    },
    reflect::member::{Member, Reflect},
};

/// Capability to assign a `V` into some member of an `E`.
pub trait Settable<E: ?Sized, V> {
    /// Assign `value` into `entity`.
    fn set(&self, entity: &mut E, value: V) -> ExprResult<()>;
}

/// Setter compiled from an assignment lambda `(entity, value) => entity.a.b = value`.
pub struct CompiledSetter<E, V> {
    lambda: Lambda,
    entity: String,
    path: Vec<Member>, // root-to-leaf
    _marker: PhantomData<fn(&mut E, V)>,
}

impl<E, V> CompiledSetter<E, V> {
    /// Compile a two-parameter assignment lambda.
    ///
    /// The assignment target must be a member chain rooted in the first parameter and
    /// the source must be the second parameter.
    pub fn compile(lambda: Lambda) -> ExprResult<Self> {
        lambda.validate()?;
        let [entity, value] = lambda.params() else {
            return Err(ExprError::validation(format!(
                "setter lambda `{lambda}` must take (entity, value), found {} parameters",
                lambda.params().len()
            )));
        };
        let Expr::Assign {
            target,
            value: source,
        } = lambda.body()
        else {
            return Err(ExprError::not_assignable(
                lambda.body(),
                format!("is not an assignment (found {})", lambda.body().node_kind()),
            ));
        };
        if !matches!(source.as_ref(), Expr::Parameter(p) if p.name == value.name) {
            return Err(ExprError::validation(format!(
                "assignment source `{source}` must be the value parameter `{value}`"
            )));
        }
        let Some(member) = target.as_member() else {
            return Err(ExprError::not_assignable(
                target,
                format!("is not a field or property access (found {})", target.node_kind()),
            ));
        };

        let chain = DependencyChain::collect(member);
        match chain.root() {
            Some(Expr::Parameter(p)) if p.name == entity.name => {}
            Some(other) => {
                return Err(ExprError::not_assignable(
                    target,
                    format!(
                        "is rooted in {} `{other}`, not the entity parameter `{entity}`",
                        other.node_kind()
                    ),
                ));
            }
            None => {
                return Err(ExprError::not_assignable(
                    target,
                    "is a static member, not a member of the entity parameter",
                ));
            }
        }

        let path: Vec<Member> = chain
            .root_to_leaf()
            .map(|link| link.member().clone())
            .collect();
        tracing::debug!(setter = %lambda, depth = path.len(), "compiled setter");

        let entity = entity.name.clone();
        Ok(Self {
            lambda,
            entity,
            path,
            _marker: PhantomData,
        })
    }

    /// The synthesized assignment lambda.
    pub fn lambda(&self) -> &Lambda {
        &self.lambda
    }

    /// Members assigned through, root-to-leaf.
    pub fn path(&self) -> &[Member] {
        &self.path
    }
}

impl<E, V> Clone for CompiledSetter<E, V> {
    fn clone(&self) -> Self {
        Self {
            lambda: self.lambda.clone(),
            entity: self.entity.clone(),
            path: self.path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E, V> fmt::Debug for CompiledSetter<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSetter")
            .field("lambda", &self.lambda.to_string())
            .finish()
    }
}

impl<E, V> Settable<E, V> for CompiledSetter<E, V>
where
    E: Reflect,
    V: Into<Value>,
{
    fn set(&self, entity: &mut E, value: V) -> ExprResult<()> {
        let Some((last, intermediate)) = self.path.split_last() else {
            return Err(ExprError::validation("setter has an empty member path"));
        };

        let mut target: &mut (dyn Reflect + 'static) = entity;
        let mut at = self.entity.clone();
        for (i, member) in intermediate.iter().enumerate() {
            let type_name = target.type_name().to_string();
            let declared = target.member_info(&member.name).is_some();
            at = format!("{at}.{member}");
            let Some(slot) = target.member_mut(&member.name) else {
                if declared {
                    return Err(ExprError::not_assignable(
                        &at,
                        format!("is a computed member of `{type_name}` and cannot be assigned through"),
                    ));
                }
                return Err(ExprError::member_not_found(type_name, &member.name));
            };
            let next = &self.path[i + 1].name;
            target = match slot {
                Value::Null => {
                    return Err(ExprError::null_reference(self.lambda.body(), &at, next));
                }
                Value::Record(record) => record,
                Value::Object(object) => match Arc::get_mut(object) {
                    Some(inner) => inner,
                    None => {
                        return Err(ExprError::not_assignable(
                            &at,
                            "is a shared object and cannot be mutated",
                        ));
                    }
                },
                other => {
                    return Err(ExprError::not_assignable(
                        &at,
                        format!("holds {} which has no members", other.kind_name()),
                    ));
                }
            };
        }

        if target.member_info(&last.name).is_some_and(|info| !info.writable) {
            return Err(ExprError::not_assignable(
                format!("{at}.{last}"),
                format!("is a read-only member of `{}`", target.type_name()),
            ));
        }
        tracing::trace!(path = %at, member = %last, "assigning member");
        target.set_member(&last.name, value.into())
    }
}

/// Setter backed by a plain closure.
pub struct FnSetter<F>(F);

impl<F> fmt::Debug for FnSetter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSetter")
    }
}

/// Wrap a closure as a [`Settable`].
pub fn setter_fn<E, V, F>(f: F) -> FnSetter<F>
where
    F: Fn(&mut E, V),
{
    FnSetter(f)
}

impl<E, V, F> Settable<E, V> for FnSetter<F>
where
    F: Fn(&mut E, V),
{
    fn set(&self, entity: &mut E, value: V) -> ExprResult<()> {
        (self.0)(entity, value);
        Ok(())
    }
}

fn value_param_name(entity: &Parameter) -> String {
    let mut name = String::from("value");
    while name == entity.name {
        name.push('_');
    }
    name
}

#[tracing::instrument(skip_all, fields(getter = %getter))]
/// Turn a getter lambda `entity => entity.member` into a setter for the same member.
pub fn get_setter<E, V>(getter: &Lambda) -> ExprResult<CompiledSetter<E, V>>
where
    E: Reflect,
    V: Into<Value>,
{
    getter.validate()?;
    let [entity] = getter.params() else {
        return Err(ExprError::validation(format!(
            "getter `{getter}` must take exactly one parameter, found {}",
            getter.params().len()
        )));
    };
    if getter.body().as_member().is_none() {
        return Err(ExprError::not_assignable(
            getter.body(),
            format!(
                "is not a field or property access (found {})",
                getter.body().node_kind()
            ),
        ));
    }

    let value = Parameter::typed(value_param_name(entity), std::any::type_name::<V>());
    let body = assign(getter.body().clone(), value.to_expr());
    CompiledSetter::compile(Lambda::new(vec![entity.clone(), value], body))
}

impl Lambda {
    /// Shorthand for [`get_setter`].
    pub fn setter<E, V>(&self) -> ExprResult<CompiledSetter<E, V>>
    where
        E: Reflect,
        V: Into<Value>,
    {
        get_setter(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/setter/synth.rs"]
mod tests;
