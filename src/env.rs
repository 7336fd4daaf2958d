//! [`LayerConfig`] from `INDENT_LOG_*` environment variables.
//!
//! Only [`config_from_env`] touches the process environment; the handler
//! and layer never read it themselves.

use crate::config::LayerConfig;
use crate::error::ConfigError;

/// Minimum level, e.g. `INFO`, `warn`, `DEBUG+2`.
pub const INDENT_LOG_LEVEL_ENV: &str = "INDENT_LOG_LEVEL";

/// Whether records carry a timestamp (`true`/`false`, `1`/`0`).
pub const INDENT_LOG_TIME_ENV: &str = "INDENT_LOG_TIME";

/// Whether records carry the `file:line` of the event.
pub const INDENT_LOG_SOURCE_ENV: &str = "INDENT_LOG_SOURCE";

/// Build a [`LayerConfig`] from the environment, starting from
/// [`LayerConfig::default`] for unset variables.
pub fn config_from_env() -> Result<LayerConfig, ConfigError> {
    config_from_lookup(|key| std::env::var(key).ok())
}

fn config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<LayerConfig, ConfigError> {
    let mut config = LayerConfig::default();

    if let Some(level) = lookup(INDENT_LOG_LEVEL_ENV) {
        config.level = level.parse().map_err(|source| ConfigError::InvalidLevel {
            key: INDENT_LOG_LEVEL_ENV,
            source,
        })?;
    }
    if let Some(value) = lookup(INDENT_LOG_TIME_ENV) {
        config.include_time = parse_bool(INDENT_LOG_TIME_ENV, &value)?;
    }
    if let Some(value) = lookup(INDENT_LOG_SOURCE_ENV) {
        config.include_source = parse_bool(INDENT_LOG_SOURCE_ENV, &value)?;
    }

    Ok(config)
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}
