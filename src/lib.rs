//! Structured log handler that renders records as indented `key: value`
//! text.
//!
//! The crate is split along the frontend/backend line:
//!
//! - [`handler::Handler`] is the backend contract: `enabled`, `handle`,
//!   `with_attrs` and `with_group`.
//! - [`indent::IndentHandler`] implements it, writing every record in one
//!   locked write to a [`sink::Sink`] shared by all derived handlers.
//! - [`layer::IndentLayer`] (feature `layer`, on by default) plugs a
//!   handler in behind the `tracing` facade, turning spans into groups.
//!
//! ```
//! use tracing_indent_handler::prelude::*;
//!
//! let out = MemoryWriter::new();
//! let handler = IndentHandler::new(Sink::new(out.clone()), HandlerOptions::default());
//! let handler = handler.with_group("request").with_attrs(vec![Attr::string("method", "GET")]);
//!
//! let record = Record::new(Level::INFO, "done").with_attrs([Attr::int("status", 200)]);
//! handler.handle(&record).unwrap();
//!
//! assert_eq!(
//!     out.contents(),
//!     "level: INFO\nmsg: \"done\"\nrequest:\n    method: \"GET\"\n    status: 200\n---\n"
//! );
//! ```

pub mod attr;
pub mod config;
pub mod env;
pub mod error;
pub mod handler;
pub mod indent;
pub mod level;
pub mod noop_handler;
pub mod record;
pub mod sink;
pub mod value;

#[cfg(feature = "layer")]
pub mod init;
#[cfg(feature = "layer")]
pub mod layer;

pub mod prelude {
    pub use crate::attr::Attr;
    pub use crate::handler::Handler;
    pub use crate::indent::{HandlerOptions, IndentHandler};
    pub use crate::level::{Level, LevelVar, Leveler};
    pub use crate::record::{Record, Source};
    pub use crate::sink::{MemoryWriter, Sink};
    pub use crate::value::{LogValuer, Value};
}
