use chrono::Utc;
use std::time::Duration;
use tracing_indent_handler::prelude::*;

/// Expensive value computed only if the record is actually written.
struct Inventory;

impl LogValuer for Inventory {
    fn log_value(&self) -> Value {
        Value::group(vec![Attr::int("apples", 3), Attr::int("pears", 0)])
    }
}

fn main() {
    let handler = IndentHandler::new(Sink::stdout(), HandlerOptions::default());

    handler
        .handle(&Record::new(Level::INFO, "hello").with_attrs([Attr::int("key", 23)]))
        .unwrap_or_else(|e| eprintln!("{}", e));

    let request = handler
        .with_group("request")
        .with_attrs(vec![Attr::string("method", "GET"), Attr::string("path", "/stock")]);

    let record = Record::new(Level::WARN, "slow response")
        .with_time(Utc::now())
        .with_source(Source::new(file!(), line!()))
        .with_attrs([
            Attr::duration("elapsed", Duration::from_millis(1250)),
            Attr::valuer("inventory", Inventory),
        ]);
    request
        .handle(&record)
        .unwrap_or_else(|e| eprintln!("{}", e));

    // Not written: below the default INFO threshold.
    let debug = Record::new(Level::DEBUG, "cache miss");
    if request.enabled(debug.level) {
        request.handle(&debug).unwrap_or_else(|e| eprintln!("{}", e));
    }
}
