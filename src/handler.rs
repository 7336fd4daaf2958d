use crate::attr::Attr;
use crate::error::HandleError;
use crate::level::Level;
use crate::record::Record;

/// Backend that turns structured [`Record`]s into output.
///
/// A frontend (see [`IndentLayer`](crate::layer::IndentLayer)) builds one
/// [`Record`] per log call and hands it to a handler. Scoping calls
/// (`with_attrs`, `with_group`) never modify the receiver; they return a
/// new handler that shares the receiver's output.
pub trait Handler: Send + Sync + 'static {
    /// Whether records at `level` would be handled.
    ///
    /// Called on every log call before the record is built, so it must be
    /// cheap: no allocation and no blocking.
    fn enabled(&self, level: Level) -> bool;

    /// Format `record` and write it out.
    ///
    /// **Returns**
    /// - `Ok(())` once the complete record has been written.
    /// - `Err(..)` if the underlying writer failed. Malformed attribute
    ///   values never produce an error; they are rendered as best as
    ///   possible.
    fn handle(&self, record: &Record) -> Result<(), HandleError>;

    /// A handler whose output includes `attrs` on every record, nested
    /// under all groups opened so far.
    fn with_attrs(&self, attrs: Vec<Attr>) -> Self
    where
        Self: Sized;

    /// A handler that nests every attribute added after this call under
    /// `name`. An empty `name` returns an equivalent handler.
    fn with_group(&self, name: &str) -> Self
    where
        Self: Sized;
}
