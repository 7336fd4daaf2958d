use crate::value::{LogValuer, Value};
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// A key/value pair attached to a record or to a handler scope.
#[derive(Debug, Clone, Default)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Attr {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Attr::new(key, Value::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Attr::new(key, Value::Int64(value))
    }

    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Attr::new(key, Value::Uint64(value))
    }

    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Attr::new(key, Value::Float64(value))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Attr::new(key, Value::Bool(value))
    }

    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Attr::new(key, Value::Time(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Attr::new(key, Value::Duration(value))
    }

    /// A nested group. An empty `key` inlines the members into the
    /// enclosing level; an empty `attrs` drops the group entirely.
    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Attr::new(key, Value::Group(attrs))
    }

    pub fn any<T: fmt::Debug + Send + Sync + 'static>(key: impl Into<String>, value: T) -> Self {
        Attr::new(key, Value::any(value))
    }

    /// An attribute whose value is computed only when a record is formatted.
    pub fn valuer<T: LogValuer + 'static>(key: impl Into<String>, valuer: T) -> Self {
        Attr::new(key, Value::valuer(valuer))
    }

    /// True when the attribute carries no value and must be left out.
    pub fn is_empty(&self) -> bool {
        matches!(self.value, Value::Empty)
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
