use crate::config::LayerConfig;
use crate::error::InitError;
use crate::handler::Handler;
use crate::indent::{HandlerOptions, IndentHandler};
use crate::layer::{IndentLayer, LayerStats};
use crate::sink::Sink;
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Build an [`IndentLayer`] writing to `writer` as described by `config`.
pub fn build_layer<W: Write + Send + 'static>(
    writer: W,
    config: &LayerConfig,
) -> IndentLayer<IndentHandler> {
    let handler = IndentHandler::new(Sink::new(writer), HandlerOptions::with_level(config.level));
    IndentLayer::new(handler)
        .with_time(config.include_time)
        .with_source(config.include_source)
}

/// Install `handler` behind an [`IndentLayer`] as the global `tracing`
/// subscriber.
///
/// `config.level` is not consulted here: the handler's own `enabled`
/// decides what gets written.
///
/// **Returns**
/// - the layer's shared [`LayerStats`].
/// - `Err(..)` if a global subscriber was already installed.
pub fn init_tracing_with_handler<H: Handler + Clone>(
    handler: H,
    config: &LayerConfig,
) -> Result<Arc<LayerStats>, InitError> {
    let layer = IndentLayer::new(handler)
        .with_time(config.include_time)
        .with_source(config.include_source);
    install(layer)
}

/// Initialize the global `tracing` subscriber with an [`IndentHandler`]
/// over `writer` and the provided [`LayerConfig`].
pub fn init_tracing_with_config<W: Write + Send + 'static>(
    writer: W,
    config: LayerConfig,
) -> Result<Arc<LayerStats>, InitError> {
    install(build_layer(writer, &config))
}

/// Initialize tracing with sensible defaults.
///
/// Equivalent to calling [`init_tracing_with_config`] with
/// [`LayerConfig::default`].
pub fn init_tracing<W: Write + Send + 'static>(writer: W) -> Result<Arc<LayerStats>, InitError> {
    init_tracing_with_config(writer, LayerConfig::default())
}

fn install<H: Handler + Clone>(layer: IndentLayer<H>) -> Result<Arc<LayerStats>, InitError> {
    let stats = layer.stats();
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(stats)
}
