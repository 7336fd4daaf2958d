use crate::level::Level;
use serde::Deserialize;

/// Configuration of the logging layer installed by
/// [`init_tracing_with_config`](crate::init::init_tracing_with_config).
///
/// **Fields**
/// - `level`: minimum level written; anything below is dropped before a
///   record is built.
/// - `include_time`: stamp each record with the current UTC time.
/// - `include_source`: add the `file:line` of the event.
///
/// Missing fields take their default when deserialized, so an empty
/// config document is valid.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub level: Level,
    pub include_time: bool,
    pub include_source: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            include_time: true,
            include_source: true,
        }
    }
}
