//! exprchain resolves member-access expression chains and synthesizes setters.
//!
//! Expressions are a closed tagged variant ([`Expr`]) rather than compiler-provided
//! syntax trees. Two operations are built on top:
//!
//! 1. **Resolve**: `value(root).a.b.c -> Value`. The chain is collected leaf-to-root
//!    and re-applied root-to-leaf against the captured constant ([`get_member_value`]).
//! 2. **Synthesize setters**: `e => e.a.b` becomes `(e, value) => e.a.b = value`,
//!    compiled into a [`Settable`] ([`get_setter`]).
//!
//! Member reads and writes go through the [`Reflect`] trait, implemented by
//! [`Record`] for plain data and by host types for everything else.
//!
//! Constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Constant roots only**: a chain rooted in a parameter, a call or an indexer
//!   does not resolve.
//! - **Synchronous and stateless**: all types are `Send + Sync`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

mod eval;
mod expr;
mod foundation;
mod reflect;
mod setter;

pub use eval::chain::DependencyChain;
pub use eval::resolver::{ResolveSettings, Resolver, get_member_value, get_member_value_as};
pub use expr::node::{Expr, Lambda, MemberExpr, Parameter};
pub use expr::ops::{
    assign, call, constant, field, index, lambda, param, path, property, static_field,
};
pub use foundation::error::{ExprError, ExprResult};
pub use foundation::value::{FromValue, Record, TYPE_KEY, Value};
pub use reflect::member::{Member, MemberInfo, MemberKind, Reflect, convert_member, read_member};
pub use setter::synth::{CompiledSetter, FnSetter, Settable, get_setter, setter_fn};
