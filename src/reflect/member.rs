use std::{any::Any, fmt};

use crate::foundation::{
    error::{ExprError, ExprResult},
    value::{FromValue, Value},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Storage kind of a member. Reads treat both kinds the same way.
pub enum MemberKind {
    /// Stored field.
    Field,
    /// Accessor-backed property; may be computed and may have side effects.
    Property,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Member identifier carried by a member-access node.
pub struct Member {
    /// Member name as exposed by [`Reflect::get_member`].
    pub name: String,
    /// Declared storage kind.
    pub kind: MemberKind,
}

impl Member {
    /// Field member.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
        }
    }

    /// Property member.
    pub fn property(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property,
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Member metadata published by a [`Reflect`] implementation.
pub struct MemberInfo {
    /// Member name.
    pub name: String,
    /// Storage kind.
    pub kind: MemberKind,
    /// Whether [`Reflect::set_member`] accepts writes.
    pub writable: bool,
}

impl MemberInfo {
    /// Writable field.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            writable: true,
        }
    }

    /// Read-only property.
    pub fn property(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property,
            writable: false,
        }
    }

    /// Override writability.
    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }
}

/// Name-based member access over a runtime object.
///
/// This is the reflection seam of the crate: host types implement it once, and both
/// the resolver and synthesized setters go through it. `get_member` returning
/// `None` means the member does not exist; a present-but-absent value is
/// [`Value::Null`].
pub trait Reflect: Any + fmt::Debug + Send + Sync {
    /// Runtime type name used in diagnostics.
    fn type_name(&self) -> &str;

    /// Every readable member.
    fn members(&self) -> Vec<MemberInfo>;

    /// Read a field or property by name.
    fn get_member(&self, name: &str) -> Option<Value>;

    /// Assign a field or property by name.
    ///
    /// The default stores into [`Reflect::member_mut`] for members declared
    /// writable. Read-only members and writable members without a stored slot are
    /// [`ExprError::NotAssignable`].
    fn set_member(&mut self, name: &str, value: Value) -> ExprResult<()> {
        let Some(info) = self.member_info(name) else {
            return Err(ExprError::member_not_found(self.type_name(), name));
        };
        let target = format!("{}.{name}", self.type_name());
        if !info.writable {
            return Err(ExprError::not_assignable(target, "is read-only"));
        }
        match self.member_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ExprError::not_assignable(target, "has no stored slot")),
        }
    }

    /// Metadata for one member, looked up in [`Reflect::members`].
    fn member_info(&self, name: &str) -> Option<MemberInfo> {
        self.members().into_iter().find(|m| m.name == name)
    }

    /// Mutable access to a stored member, used to walk nested setter targets.
    ///
    /// Computed properties cannot hand out a slot and return `None`.
    fn member_mut(&mut self, name: &str) -> Option<&mut Value> {
        let _ = name;
        None
    }
}

/// Read `member` from `target`, treating fields and properties uniformly.
pub fn read_member(target: &Value, member: &Member) -> ExprResult<Value> {
    if target.is_null() {
        return Err(ExprError::null_reference("null", "null", &member.name));
    }
    let Some(obj) = target.as_reflect() else {
        return Err(ExprError::member_not_found(target.kind_name(), &member.name));
    };
    obj.get_member(&member.name)
        .ok_or_else(|| ExprError::member_not_found(obj.type_name(), &member.name))
}

/// Convert an incoming value for `type_name.member`, for use in
/// [`Reflect::set_member`] implementations.
pub fn convert_member<T: FromValue>(type_name: &str, member: &str, value: Value) -> ExprResult<T> {
    T::from_value(value).map_err(|found| {
        ExprError::type_mismatch(
            T::expected(),
            found.kind_name(),
            format!("{type_name}.{member}"),
        )
    })
}

#[cfg(test)]
#[path = "../../tests/unit/reflect/member.rs"]
mod tests;
