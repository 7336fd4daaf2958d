use std::io;

/// Error returned by [`Handler::handle`](crate::handler::Handler::handle).
///
/// Formatting never fails; the only reportable condition is the final
/// write to the shared sink.
#[derive(thiserror::Error, Debug)]
pub enum HandleError {
    #[error("failed to write log record: {0}")]
    Write(#[from] io::Error),
}

/// Error type returned when parsing a [`Level`](crate::level::Level) from text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseLevelError {
    #[error("unknown level name: {0:?}")]
    UnknownName(String),

    #[error("invalid level offset in {0:?}")]
    InvalidOffset(String),
}

/// Error type returned when building a layer configuration from the
/// environment.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {source}")]
    InvalidLevel {
        key: &'static str,
        #[source]
        source: ParseLevelError,
    },

    #[error("invalid boolean for {key}: {value:?}")]
    InvalidBool { key: &'static str, value: String },
}

/// Error type returned when installing the global subscriber.
#[cfg(feature = "layer")]
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("failed to set global subscriber: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}
