use crate::attr::Attr;
use crate::error::HandleError;
use crate::handler::Handler;
use crate::level::Level;
use crate::record::Record;

/// A handler that is never enabled and drops every record.
///
/// Useful for measuring the overhead of the frontend itself without any
/// formatting or I/O, and for tests that don't care about output.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHandler;

impl Handler for NoopHandler {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn handle(&self, _record: &Record) -> Result<(), HandleError> {
        Ok(())
    }

    fn with_attrs(&self, _attrs: Vec<Attr>) -> Self {
        NoopHandler
    }

    fn with_group(&self, _name: &str) -> Self {
        NoopHandler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_enabled_and_always_ok() {
        let h = NoopHandler.with_group("g").with_attrs(vec![Attr::int("a", 1)]);
        assert!(!h.enabled(Level::ERROR));
        assert!(h.handle(&Record::new(Level::ERROR, "dropped")).is_ok());
    }
}
