use crate::attr::Attr;
use chrono::{DateTime, SecondsFormat, Utc};
use std::any::Any;
use std::fmt::{self, Write as _};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on chained [`LogValuer`] resolutions before giving up.
const MAX_LOG_VALUES: usize = 100;

/// A type that can produce its own log representation on demand.
///
/// Used to defer expensive work until a record is actually formatted.
/// Closures returning a [`Value`] implement this trait.
pub trait LogValuer: Send + Sync {
    fn log_value(&self) -> Value;
}

impl<F> LogValuer for F
where
    F: Fn() -> Value + Send + Sync,
{
    fn log_value(&self) -> Value {
        self()
    }
}

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Empty,
    String,
    Int64,
    Uint64,
    Float64,
    Bool,
    Time,
    Duration,
    Group,
    LogValuer,
    Any,
}

/// Value half of an [`Attr`].
#[derive(Clone, Default)]
pub enum Value {
    /// No value. Attributes holding it are left out of the output.
    #[default]
    Empty,
    String(String),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    Bool(bool),
    Time(DateTime<Utc>),
    Duration(Duration),
    Group(Vec<Attr>),
    LogValuer(Arc<dyn LogValuer>),
    /// Anything else; rendered through its `Debug` implementation.
    Any(Arc<dyn fmt::Debug + Send + Sync>),
}

impl Value {
    pub fn any<T: fmt::Debug + Send + Sync + 'static>(value: T) -> Self {
        Value::Any(Arc::new(value))
    }

    pub fn valuer<T: LogValuer + 'static>(valuer: T) -> Self {
        Value::LogValuer(Arc::new(valuer))
    }

    pub fn group(attrs: Vec<Attr>) -> Self {
        Value::Group(attrs)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Empty => Kind::Empty,
            Value::String(_) => Kind::String,
            Value::Int64(_) => Kind::Int64,
            Value::Uint64(_) => Kind::Uint64,
            Value::Float64(_) => Kind::Float64,
            Value::Bool(_) => Kind::Bool,
            Value::Time(_) => Kind::Time,
            Value::Duration(_) => Kind::Duration,
            Value::Group(_) => Kind::Group,
            Value::LogValuer(_) => Kind::LogValuer,
            Value::Any(_) => Kind::Any,
        }
    }

    /// Follow [`LogValuer`]s until a concrete value comes out.
    ///
    /// Each valuer in the chain is called exactly once. A valuer that
    /// panics, or a chain longer than 100 links, resolves to a string
    /// describing the problem instead of failing the caller.
    pub fn resolve(self) -> Value {
        let mut value = self;
        for _ in 0..MAX_LOG_VALUES {
            let valuer = match value {
                Value::LogValuer(valuer) => valuer,
                other => return other,
            };
            value = match panic::catch_unwind(AssertUnwindSafe(|| valuer.log_value())) {
                Ok(next) => next,
                Err(payload) => {
                    return Value::String(format!(
                        "!PANIC: log_value panicked: {}",
                        panic_message(payload.as_ref())
                    ))
                }
            };
        }
        match value {
            Value::LogValuer(_) => Value::String(format!(
                "!ERROR: log_value called more than {} times",
                MAX_LOG_VALUES
            )),
            other => other,
        }
    }
}

impl Value {
    /// Append the text form of `self` to `buf`.
    ///
    /// A user `Debug` impl that returns an error or panics leaves a
    /// placeholder in place of the value instead of failing the caller.
    pub(crate) fn write_text(&self, buf: &mut String) {
        let start = buf.len();
        let result = panic::catch_unwind(AssertUnwindSafe(|| write!(buf, "{}", self)));
        match result {
            Ok(Ok(())) => {}
            Ok(Err(fmt::Error)) => {
                buf.truncate(start);
                buf.push_str("!ERROR: formatting failed");
            }
            Err(payload) => {
                buf.truncate(start);
                buf.push_str("!PANIC: formatting panicked: ");
                buf.push_str(panic_message(payload.as_ref()));
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic payload>"
    }
}

/// RFC 3339 in UTC with as many fractional digits as needed.
pub(crate) fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => f.write_str("<nil>"),
            Value::String(s) => f.write_str(s),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Uint64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Time(t) => f.write_str(&format_time(t)),
            Value::Duration(d) => write!(f, "{:?}", d),
            Value::Group(attrs) => {
                f.write_str("[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}={}", attr.key, attr.value)?;
                }
                f.write_str("]")
            }
            Value::LogValuer(_) => f.write_str("<LogValuer>"),
            Value::Any(v) => write!(f, "{:?}", v),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Group(attrs) => f.debug_tuple("Group").field(attrs).finish(),
            other => write!(f, "{:?}({})", other.kind(), other),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int64(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Uint64(v.into())
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Uint64(v as u64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(v: Vec<Attr>) -> Self {
        Value::Group(v)
    }
}
