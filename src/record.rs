use crate::attr::Attr;
use crate::level::Level;
use chrono::{DateTime, Utc};
use std::fmt;

/// Call site that produced a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub file: String,
    pub line: u32,
}

impl Source {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Source {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One structured log event, built by a frontend for a single log call.
///
/// Handlers receive it by reference and must not hold on to it past
/// [`Handler::handle`](crate::handler::Handler::handle); clone it to keep
/// a copy.
#[derive(Debug, Clone)]
pub struct Record {
    /// `None` means the time is left out of the output.
    pub time: Option<DateTime<Utc>>,
    pub level: Level,
    pub message: String,
    pub source: Option<Source>,
    pub attrs: Vec<Attr>,
}

impl Record {
    /// Create a record without time, source or attributes.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Record {
            time: None,
            level,
            message: message.into(),
            source: None,
            attrs: Vec::new(),
        }
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.add_attrs(attrs);
        self
    }

    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }
}
