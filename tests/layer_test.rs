#![cfg(feature = "layer")]

mod common;

use common::{lookup, parse_records, parse_single, FailingWriter, Node};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn};
use tracing_indent_handler::layer::IndentLayer;
use tracing_indent_handler::noop_handler::NoopHandler;
use tracing_indent_handler::prelude::*;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

fn capture<F: FnOnce()>(handler: IndentHandler, f: F) -> Arc<tracing_indent_handler::layer::LayerStats> {
    let layer = IndentLayer::new(handler).with_time(false).with_source(false);
    let stats = layer.stats();
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    stats
}

fn memory() -> (IndentHandler, MemoryWriter) {
    common::memory_handler()
}

#[test]
fn event_becomes_record() {
    let (h, out) = memory();
    capture(h, || info!(key = 23, "hello"));

    assert_eq!(out.contents(), "level: INFO\nmsg: \"hello\"\nkey: 23\n---\n");
}

#[test]
fn span_fields_become_groups() {
    let (h, out) = memory();
    capture(h, || {
        let outer = info_span!("request", method = "GET", id = 7u64);
        let _outer = outer.enter();
        let inner = info_span!("db", table = "users");
        let _inner = inner.enter();
        warn!(rows = 0i64, "nothing found");
    });

    let record = parse_single(&out.contents());
    assert_eq!(record["level"].value(), "WARN");
    assert_eq!(record["msg"].value(), "\"nothing found\"");
    assert_eq!(lookup(&record, &["request", "method"]).map(Node::value), Some("\"GET\""));
    assert_eq!(lookup(&record, &["request", "id"]).map(Node::value), Some("7"));
    assert_eq!(
        lookup(&record, &["request", "db", "table"]).map(Node::value),
        Some("\"users\"")
    );
    assert_eq!(
        lookup(&record, &["request", "db", "rows"]).map(Node::value),
        Some("0")
    );
}

#[test]
fn span_without_fields_is_dropped_when_event_has_none() {
    let (h, out) = memory();
    capture(h, || {
        let span = info_span!("quiet");
        let _entered = span.enter();
        info!("just a message");
    });

    let output = out.contents();
    assert!(!output.contains("quiet"), "{}", output);
    assert_eq!(parse_single(&output).len(), 2);
}

#[test]
fn span_without_fields_wraps_event_fields() {
    let (h, out) = memory();
    capture(h, || {
        let span = info_span!("quiet");
        let _entered = span.enter();
        info!(n = 1i64, "m");
    });

    let record = parse_single(&out.contents());
    assert_eq!(lookup(&record, &["quiet", "n"]).map(Node::value), Some("1"));
}

#[test]
fn recorded_span_values_join_the_group() {
    let (h, out) = memory();
    capture(h, || {
        let span = info_span!("job", id = 1i64, status = tracing::field::Empty);
        let _entered = span.enter();
        span.record("status", "running");
        info!("tick");
    });

    let record = parse_single(&out.contents());
    assert_eq!(lookup(&record, &["job", "id"]).map(Node::value), Some("1"));
    assert_eq!(
        lookup(&record, &["job", "status"]).map(Node::value),
        Some("\"running\"")
    );
}

#[test]
fn events_outside_spans_use_the_root() {
    let (h, out) = memory();
    capture(h, || {
        {
            let span = info_span!("scoped", a = 1i64);
            let _entered = span.enter();
            info!("inside");
        }
        info!("outside");
    });

    let records = parse_records(&out.contents());
    assert_eq!(records.len(), 2);
    assert!(records[0].contains_key("scoped"));
    assert!(!records[1].contains_key("scoped"));
}

#[test]
fn debug_and_error_fields_are_rendered() {
    let (h, out) = memory();
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    capture(h, || {
        error!(items = ?vec![1, 2], cause = &err as &(dyn std::error::Error + 'static), "failed");
    });

    let record = parse_single(&out.contents());
    assert_eq!(record["items"].value(), "[1, 2]");
    assert_eq!(record["cause"].value(), "\"no such file\"");
}

#[test]
fn levels_below_threshold_are_skipped() {
    let (h, out) = common::memory_handler_with(HandlerOptions::with_level(Level::WARN));
    let stats = capture(h, || {
        debug!("dropped");
        info!("dropped too");
        error!("kept");
    });

    let record = parse_single(&out.contents());
    assert_eq!(record["msg"].value(), "\"kept\"");
    assert_eq!(stats.total_events.load(Ordering::Relaxed), 3);
    assert_eq!(stats.handled_events.load(Ordering::Relaxed), 1);
}

#[test]
fn time_and_source_are_attached_when_enabled() {
    let (h, out) = memory();
    let subscriber = Registry::default().with(IndentLayer::new(h));
    tracing::subscriber::with_default(subscriber, || info!("stamped"));

    let record = parse_single(&out.contents());
    assert!(record.contains_key("time"));
    assert!(record["source"].value().contains("layer_test.rs:"));
}

#[test]
fn write_failures_are_counted_not_raised() {
    let h = IndentHandler::new(Sink::new(FailingWriter), HandlerOptions::default());
    let stats = capture(h, || {
        info!("first");
        info!("second");
    });

    assert_eq!(stats.failed_events.load(Ordering::Relaxed), 2);
    assert_eq!(stats.handled_events.load(Ordering::Relaxed), 0);
}

#[test]
fn noop_handler_sees_events_but_writes_nothing() {
    let layer = IndentLayer::new(NoopHandler);
    let stats = layer.stats();
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::with_default(subscriber, || {
        let span = info_span!("s", a = 1i64);
        let _entered = span.enter();
        error!("ignored");
    });

    assert_eq!(stats.total_events.load(Ordering::Relaxed), 1);
    assert_eq!(stats.handled_events.load(Ordering::Relaxed), 0);
}
