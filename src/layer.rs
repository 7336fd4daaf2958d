use crate::attr::Attr;
use crate::handler::Handler;
use crate::level::Level;
use crate::record::{Record, Source};
use crate::value::Value;
use chrono::Utc;
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record as SpanValues};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::{LookupSpan, SpanRef};

/// Counters kept by an [`IndentLayer`], shared with whoever asked for them.
#[derive(Debug, Default)]
pub struct LayerStats {
    /// Total events seen by the layer (before filtering by level).
    pub total_events: AtomicU64,
    /// Events written by the handler.
    pub handled_events: AtomicU64,
    /// Events the handler failed to write.
    pub failed_events: AtomicU64,
}

/// `tracing_subscriber` layer that feeds events to a [`Handler`].
///
/// Every span gets its own handler, derived from its parent's with
/// `with_group(span name)` followed by `with_attrs(span fields)`, and kept
/// in the span's extensions. Events are handled by the handler of the
/// span they occur in, so span fields show up as nested groups in the
/// output.
///
/// Write failures cannot be returned to the code that emitted the event;
/// they are counted in [`LayerStats`] and reported on stderr.
pub struct IndentLayer<H> {
    root: H,
    include_time: bool,
    include_source: bool,
    stats: Arc<LayerStats>,
}

/// Derived handler stored in a span's extensions.
struct SpanHandler<H>(H);

impl<H: Handler + Clone> IndentLayer<H> {
    pub fn new(root: H) -> Self {
        IndentLayer {
            root,
            include_time: true,
            include_source: true,
            stats: Arc::new(LayerStats::default()),
        }
    }

    /// Stamp records with the current time (default `true`).
    pub fn with_time(mut self, include_time: bool) -> Self {
        self.include_time = include_time;
        self
    }

    /// Attach the event's file and line (default `true`).
    pub fn with_source(mut self, include_source: bool) -> Self {
        self.include_source = include_source;
        self
    }

    pub fn stats(&self) -> Arc<LayerStats> {
        Arc::clone(&self.stats)
    }

    fn scoped_handler<S>(&self, span: Option<SpanRef<'_, S>>) -> H
    where
        S: for<'a> LookupSpan<'a>,
    {
        if let Some(span) = span {
            let extensions = span.extensions();
            if let Some(scoped) = extensions.get::<SpanHandler<H>>() {
                return scoped.0.clone();
            }
        }
        self.root.clone()
    }
}

impl<S, H> Layer<S> for IndentLayer<H>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    H: Handler + Clone,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut fields = Vec::new();
        attrs.record(&mut FieldVisitor::new(&mut fields, None));

        let parent = self.scoped_handler(span.parent());
        let handler = parent.with_group(span.name()).with_attrs(fields);
        span.extensions_mut().insert(SpanHandler(handler));
    }

    fn on_record(&self, id: &Id, values: &SpanValues<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut fields = Vec::new();
        values.record(&mut FieldVisitor::new(&mut fields, None));
        if fields.is_empty() {
            return;
        }

        let mut extensions = span.extensions_mut();
        if let Some(scoped) = extensions.get_mut::<SpanHandler<H>>() {
            scoped.0 = scoped.0.with_attrs(fields);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        self.stats.total_events.fetch_add(1, Ordering::Relaxed);

        let meta = event.metadata();
        let level = Level::from(*meta.level());
        let handler = self.scoped_handler(ctx.event_span(event));
        if !handler.enabled(level) {
            return;
        }

        let mut attrs = Vec::new();
        let mut message: Option<String> = None;
        event.record(&mut FieldVisitor::new(&mut attrs, Some(&mut message)));

        let mut record = Record::new(level, message.unwrap_or_default());
        record.attrs = attrs;
        if self.include_time {
            record.time = Some(Utc::now());
        }
        if self.include_source {
            if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
                record.source = Some(Source::new(file, line));
            }
        }

        match handler.handle(&record) {
            Ok(()) => {
                self.stats.handled_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.stats.failed_events.fetch_add(1, Ordering::Relaxed);
                eprintln!("indent layer failed to write log record: {}", e);
            }
        }
    }
}

/// Collects `tracing` fields as [`Attr`]s.
///
/// When `message` is set, the `message` field is captured there instead of
/// becoming an attribute.
pub struct FieldVisitor<'a> {
    pub attrs: &'a mut Vec<Attr>,
    pub message: Option<&'a mut Option<String>>,
}

impl<'a> FieldVisitor<'a> {
    pub fn new(attrs: &'a mut Vec<Attr>, message: Option<&'a mut Option<String>>) -> Self {
        FieldVisitor { attrs, message }
    }

    fn message_slot(&mut self, field: &Field) -> Option<&mut Option<String>> {
        if field.name() == "message" {
            self.message.as_deref_mut()
        } else {
            None
        }
    }

    fn push(&mut self, field: &Field, value: Value) {
        self.attrs.push(Attr::new(field.name(), value));
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if let Some(slot) = self.message_slot(field) {
            *slot = Some(value.to_string());
        } else {
            self.push(field, Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::Int64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Value::Uint64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Value::Float64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::Bool(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.push(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let text = format!("{:?}", value);
        if let Some(slot) = self.message_slot(field) {
            *slot = Some(text);
        } else {
            self.push(field, Value::any(DebugText(text)));
        }
    }
}

/// Text captured from a `Debug` field, rendered verbatim.
struct DebugText(String);

impl fmt::Debug for DebugText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
