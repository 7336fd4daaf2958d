use std::sync::Arc;
use tracing::{error, info, info_span, warn};
use tracing_indent_handler::config::LayerConfig;
use tracing_indent_handler::env::config_from_env;
use tracing_indent_handler::init::init_tracing_with_handler;
use tracing_indent_handler::prelude::*;

fn main() {
    let config = config_from_env().unwrap_or_else(|e| {
        eprintln!("ignoring logging environment: {}", e);
        LayerConfig::default()
    });

    let level = Arc::new(LevelVar::new(config.level));
    let handler = IndentHandler::new(
        Sink::stdout(),
        HandlerOptions::with_level(Arc::clone(&level)),
    );
    if let Err(e) = init_tracing_with_handler(handler, &config) {
        eprintln!("{}", e);
        return;
    }

    info!("starting service");

    let span = info_span!("auth", user_id = 42);
    let _entered = span.enter();
    error!(reason = "invalid password", "authentication failed");

    level.set(Level::ERROR);
    warn!("not written after raising the level");
}
