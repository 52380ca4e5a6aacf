use std::{any::Any, collections::BTreeMap, sync::Arc};

use serde::ser::{SerializeMap, SerializeSeq};

use crate::{
    foundation::error::ExprResult,
    reflect::member::{MemberInfo, Reflect},
};

/// JSON key naming a record's type when (de)serializing.
///
/// Keys starting with `$` are reserved. Fields whose names start with `$` are
/// written with one extra leading `$` and read back without it, so a field named
/// `$type` appears as `$$type` in JSON.
pub const TYPE_KEY: &str = "$type";

const RESERVED_PREFIX: char = '$';

const ANONYMOUS_RECORD: &str = "object";

#[derive(Clone, Debug, Default)]
/// Dynamic runtime value produced and consumed by expression chains.
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Signed integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Ordered list of values.
    List(Vec<Value>),
    /// Owned data object with named fields.
    Record(Record),
    /// Host object exposing members through [`Reflect`].
    Object(Arc<dyn Reflect>),
}

impl Value {
    /// Wrap a host object.
    pub fn object(obj: impl Reflect) -> Self {
        Self::Object(Arc::new(obj))
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short kind name used in diagnostics; objects report their runtime type name.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Record(r) => r.type_name(),
            Self::Object(o) => o.type_name(),
        }
    }

    /// Reflective view over records and host objects.
    pub fn as_reflect(&self) -> Option<&(dyn Reflect + 'static)> {
        match self {
            Self::Record(r) => Some(r),
            Self::Object(o) => Some(o.as_ref()),
            _ => None,
        }
    }

    /// Borrow the concrete host type behind a [`Value::Object`] or [`Value::Record`].
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        let any: &(dyn Any + 'static) = self.as_reflect()?;
        any.downcast_ref::<T>()
    }

    /// Parse a JSON document into a value. Objects become [`Record`]s.
    pub fn from_json_str(s: &str) -> ExprResult<Self> {
        let json: serde_json::Value = serde_json::from_str(s)?;
        Ok(Self::from(json))
    }

    /// Snapshot this value as JSON, reading every member of objects.
    pub fn to_json(&self) -> ExprResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Owned data object: a type name plus named fields.
pub struct Record {
    type_name: String,
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Borrow a field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Iterate fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Reflect for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn members(&self) -> Vec<MemberInfo> {
        self.fields.keys().map(MemberInfo::field).collect()
    }

    fn get_member(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    fn member_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(mut map) => {
                let type_name = match map.remove(TYPE_KEY) {
                    Some(serde_json::Value::String(name)) => name,
                    _ => ANONYMOUS_RECORD.to_string(),
                };
                let mut record = Record::new(type_name);
                for (k, v) in map {
                    let name = match k.strip_prefix(RESERVED_PREFIX) {
                        Some(rest) if rest.starts_with(RESERVED_PREFIX) => rest.to_string(),
                        _ => k,
                    };
                    record.insert(name, Self::from(v));
                }
                Self::Record(record)
            }
        }
    }
}

fn serialize_reflect<S: serde::Serializer>(obj: &dyn Reflect, s: S) -> Result<S::Ok, S::Error> {
    let members = obj.members();
    let mut map = s.serialize_map(Some(members.len() + 1))?;
    if obj.type_name() != ANONYMOUS_RECORD {
        map.serialize_entry(TYPE_KEY, obj.type_name())?;
    }
    for info in members {
        let value = obj.get_member(&info.name).unwrap_or_default();
        if info.name.starts_with(RESERVED_PREFIX) {
            map.serialize_entry(&format!("{RESERVED_PREFIX}{}", info.name), &value)?;
        } else {
            map.serialize_entry(&info.name, &value)?;
        }
    }
    map.end()
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => s.serialize_unit(),
            Self::Bool(b) => s.serialize_bool(*b),
            Self::Int(i) => s.serialize_i64(*i),
            Self::Float(f) => s.serialize_f64(*f),
            Self::Str(v) => s.serialize_str(v),
            Self::List(items) => {
                let mut seq = s.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Record(r) => serialize_reflect(r, s),
            Self::Object(o) => serialize_reflect(o.as_ref(), s),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        <serde_json::Value as serde::Deserialize>::deserialize(d).map(Self::from)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}

impl From<Arc<dyn Reflect>> for Value {
    fn from(v: Arc<dyn Reflect>) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Strict conversion out of a dynamic [`Value`].
///
/// Conversions never coerce between kinds: an `Int` does not convert to `f64`, and
/// `Null` only converts to `Option<T>` or `Value`. On failure the offending value
/// is handed back so callers can report what was found.
pub trait FromValue: Sized {
    /// Convert, returning the original value on mismatch.
    fn from_value(value: Value) -> Result<Self, Value>;

    /// Type name reported in [`crate::ExprError::TypeMismatch`].
    fn expected() -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }

    fn expected() -> String {
        "Value".to_string()
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }

    fn expected() -> String {
        "bool".to_string()
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(other),
        }
    }

    fn expected() -> String {
        "i64".to_string()
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(i) => i32::try_from(i).map_err(|_| Value::Int(i)),
            other => Err(other),
        }
    }

    fn expected() -> String {
        "i32".to_string()
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(i) => u64::try_from(i).map_err(|_| Value::Int(i)),
            other => Err(other),
        }
    }

    fn expected() -> String {
        "u64".to_string()
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(f) => Ok(f),
            other => Err(other),
        }
    }

    fn expected() -> String {
        "f64".to_string()
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(other),
        }
    }

    fn expected() -> String {
        "String".to_string()
    }
}

impl FromValue for Record {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Record(r) => Ok(r),
            other => Err(other),
        }
    }

    fn expected() -> String {
        "Record".to_string()
    }
}

impl FromValue for Arc<dyn Reflect> {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(o) => Ok(o),
            other => Err(other),
        }
    }

    fn expected() -> String {
        "object".to_string()
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::List(items) => {
                let converted: Result<Vec<T>, Value> =
                    items.iter().cloned().map(T::from_value).collect();
                converted.map_err(|_| Value::List(items))
            }
            other => Err(other),
        }
    }

    fn expected() -> String {
        format!("Vec<{}>", T::expected())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn expected() -> String {
        format!("Option<{}>", T::expected())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/value.rs"]
mod tests;
