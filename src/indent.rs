use crate::attr::Attr;
use crate::error::HandleError;
use crate::handler::Handler;
use crate::level::{Level, Leveler};
use crate::record::Record;
use crate::sink::Sink;
use crate::value::{format_time, Value};
use std::fmt;
use std::sync::Arc;

/// Key of the record time line.
pub const TIME_KEY: &str = "time";
/// Key of the record level line.
pub const LEVEL_KEY: &str = "level";
/// Key of the record message line.
pub const MESSAGE_KEY: &str = "msg";
/// Key of the call site line.
pub const SOURCE_KEY: &str = "source";
/// Line written after every record.
pub const RECORD_SEPARATOR: &str = "---\n";

const INDENT_WIDTH: usize = 4;

/// Options for [`IndentHandler`].
#[derive(Clone)]
pub struct HandlerOptions {
    /// Minimum level to handle. Defaults to [`Level::INFO`]; pass a shared
    /// [`LevelVar`](crate::level::LevelVar) to change it at runtime.
    pub level: Arc<dyn Leveler>,
}

impl HandlerOptions {
    pub fn with_level<L: Leveler + 'static>(level: L) -> Self {
        HandlerOptions {
            level: Arc::new(level),
        }
    }
}

impl Default for HandlerOptions {
    fn default() -> Self {
        HandlerOptions::with_level(Level::INFO)
    }
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("level", &self.level.level())
            .finish()
    }
}

/// [`Handler`] that writes each record as indented `key: value` lines.
///
/// ```text
/// time: 2024-03-01T12:30:00.5Z
/// level: INFO
/// msg: "request done"
/// source: src/server.rs:88
/// request:
///     method: "GET"
///     status: 200
/// ---
/// ```
///
/// Attributes given to [`with_attrs`](Handler::with_attrs) are rendered
/// once, when the derived handler is created, and copied into every record
/// it writes afterwards. Groups from [`with_group`](Handler::with_group)
/// stay pending until some attribute actually lands in them, so a group
/// that never receives anything never shows up.
#[derive(Clone)]
pub struct IndentHandler {
    options: HandlerOptions,
    /// Scope attributes rendered by earlier `with_attrs` calls.
    preformatted: Arc<str>,
    /// Groups named by `with_group` whose header has not been written yet.
    unopened_groups: Arc<[String]>,
    /// Nesting depth of the groups already written into `preformatted`.
    indent_level: usize,
    sink: Sink,
}

impl IndentHandler {
    pub fn new(sink: Sink, options: HandlerOptions) -> Self {
        IndentHandler {
            options,
            preformatted: Arc::from(""),
            unopened_groups: Arc::from(Vec::new()),
            indent_level: 0,
            sink,
        }
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Write the headers of all pending groups and return the depth below
    /// the innermost one.
    fn append_unopened_groups(&self, buf: &mut String, mut indent_level: usize) -> usize {
        for group in self.unopened_groups.iter() {
            push_indent(buf, indent_level);
            push_key(buf, group);
            buf.push_str(":\n");
            indent_level += 1;
        }
        indent_level
    }
}

impl Handler for IndentHandler {
    fn enabled(&self, level: Level) -> bool {
        level >= self.options.level.level()
    }

    fn handle(&self, record: &Record) -> Result<(), HandleError> {
        let mut buf = String::with_capacity(1024);

        if let Some(time) = &record.time {
            push_line(&mut buf, 0, TIME_KEY, &format_time(time));
        }
        push_line(&mut buf, 0, LEVEL_KEY, &record.level.to_string());
        push_line(&mut buf, 0, MESSAGE_KEY, &quote(&record.message));
        if let Some(source) = &record.source {
            push_line(&mut buf, 0, SOURCE_KEY, &source.to_string());
        }

        buf.push_str(&self.preformatted);

        let groups_start = buf.len();
        let indent_level = self.append_unopened_groups(&mut buf, self.indent_level);
        let attrs_start = buf.len();
        for attr in &record.attrs {
            append_attr(&mut buf, attr, indent_level);
        }
        if buf.len() == attrs_start {
            buf.truncate(groups_start);
        }

        buf.push_str(RECORD_SEPARATOR);

        self.sink.write_record(buf.as_bytes())?;
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Self {
        let indent_level = self.indent_level + self.unopened_groups.len();
        let mut rendered = String::new();
        for attr in &attrs {
            append_attr(&mut rendered, attr, indent_level);
        }
        if rendered.is_empty() {
            return self.clone();
        }

        let mut preformatted = String::with_capacity(self.preformatted.len() + rendered.len());
        preformatted.push_str(&self.preformatted);
        self.append_unopened_groups(&mut preformatted, self.indent_level);
        preformatted.push_str(&rendered);

        IndentHandler {
            options: self.options.clone(),
            preformatted: Arc::from(preformatted),
            unopened_groups: Arc::from(Vec::new()),
            indent_level,
            sink: self.sink.clone(),
        }
    }

    fn with_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }

        let mut groups = Vec::with_capacity(self.unopened_groups.len() + 1);
        groups.extend_from_slice(&self.unopened_groups);
        groups.push(name.to_string());

        IndentHandler {
            unopened_groups: Arc::from(groups),
            ..self.clone()
        }
    }
}

impl fmt::Debug for IndentHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndentHandler")
            .field("options", &self.options)
            .field("unopened_groups", &self.unopened_groups)
            .field("indent_level", &self.indent_level)
            .finish_non_exhaustive()
    }
}

/// Render `attr` at `indent_level`, resolving deferred values first.
///
/// Empty values and groups that end up with no lines are skipped. A group
/// with an empty key is inlined at the current level.
fn append_attr(buf: &mut String, attr: &Attr, indent_level: usize) {
    let resolved;
    let value = match &attr.value {
        Value::LogValuer(_) => {
            resolved = attr.value.clone().resolve();
            &resolved
        }
        other => other,
    };

    match value {
        Value::Empty => {}
        Value::Group(attrs) => {
            let start = buf.len();
            let child_level = if attr.key.is_empty() {
                indent_level
            } else {
                push_indent(buf, indent_level);
                push_key(buf, &attr.key);
                buf.push_str(":\n");
                indent_level + 1
            };
            let body_start = buf.len();
            for member in attrs {
                append_attr(buf, member, child_level);
            }
            if buf.len() == body_start {
                buf.truncate(start);
            }
        }
        Value::String(s) => push_line(buf, indent_level, &attr.key, &quote(s)),
        other => {
            push_indent(buf, indent_level);
            push_key(buf, &attr.key);
            buf.push_str(": ");
            other.write_text(buf);
            buf.push('\n');
        }
    }
}

fn push_indent(buf: &mut String, indent_level: usize) {
    buf.extend(std::iter::repeat(' ').take(indent_level * INDENT_WIDTH));
}

fn push_line(buf: &mut String, indent_level: usize, key: &str, value: &str) {
    push_indent(buf, indent_level);
    push_key(buf, key);
    buf.push_str(": ");
    buf.push_str(value);
    buf.push('\n');
}

/// Keys are written raw except for control characters, which are escaped
/// so that a key can never start a new line.
fn push_key(buf: &mut String, key: &str) {
    for c in key.chars() {
        if c.is_control() {
            buf.extend(c.escape_default());
        } else {
            buf.push(c);
        }
    }
}

fn quote(s: &str) -> String {
    format!("{:?}", s)
}
