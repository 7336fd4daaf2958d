use crate::error::ParseLevelError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// Severity of a log record.
///
/// Levels are plain integers so that applications can define their own
/// levels between the named ones. Higher means more severe. The named
/// levels leave gaps of four so that `INFO+2` or `WARN-1` are expressible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(i32);

impl Level {
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);

    pub const fn new(value: i32) -> Self {
        Level(value)
    }

    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Nearest named level at or below `self`, clamped to `DEBUG`.
    fn base(self) -> (&'static str, Level) {
        if self < Level::INFO {
            ("DEBUG", Level::DEBUG)
        } else if self < Level::WARN {
            ("INFO", Level::INFO)
        } else if self < Level::ERROR {
            ("WARN", Level::WARN)
        } else {
            ("ERROR", Level::ERROR)
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, base) = self.base();
        let offset = self.0 - base.0;
        if offset == 0 {
            f.write_str(name)
        } else {
            write!(f, "{}{:+}", name, offset)
        }
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Parses `NAME`, `NAME+n` or `NAME-n`, ignoring the case of `NAME`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, offset) = match s.find(|c: char| c == '+' || c == '-') {
            Some(i) => (&s[..i], Some(&s[i..])),
            None => (s, None),
        };

        let base = match name.to_ascii_uppercase().as_str() {
            "DEBUG" => Level::DEBUG,
            "INFO" => Level::INFO,
            "WARN" => Level::WARN,
            "ERROR" => Level::ERROR,
            _ => return Err(ParseLevelError::UnknownName(s.to_string())),
        };

        let offset = match offset {
            Some(text) => text
                .parse::<i32>()
                .map_err(|_| ParseLevelError::InvalidOffset(s.to_string()))?,
            None => 0,
        };

        base.0
            .checked_add(offset)
            .map(Level)
            .ok_or_else(|| ParseLevelError::InvalidOffset(s.to_string()))
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "layer")]
impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::TRACE {
            Level(Level::DEBUG.0 - 4)
        } else if level == tracing::Level::DEBUG {
            Level::DEBUG
        } else if level == tracing::Level::INFO {
            Level::INFO
        } else if level == tracing::Level::WARN {
            Level::WARN
        } else {
            Level::ERROR
        }
    }
}

/// Source of a minimum level for a handler.
///
/// Implemented by [`Level`] for fixed thresholds and by [`LevelVar`] for
/// thresholds that change while the program runs.
pub trait Leveler: Send + Sync {
    fn level(&self) -> Level;
}

impl Leveler for Level {
    fn level(&self) -> Level {
        *self
    }
}

impl<T: Leveler + ?Sized> Leveler for Arc<T> {
    fn level(&self) -> Level {
        (**self).level()
    }
}

/// A [`Level`] that can be changed at runtime from any thread.
///
/// Reads are a single relaxed atomic load so that `enabled` checks stay
/// cheap on the hot path.
#[derive(Debug, Default)]
pub struct LevelVar {
    value: AtomicI32,
}

impl LevelVar {
    pub fn new(level: Level) -> Self {
        Self {
            value: AtomicI32::new(level.0),
        }
    }

    pub fn set(&self, level: Level) {
        self.value.store(level.0, Ordering::Relaxed);
    }
}

impl Leveler for LevelVar {
    fn level(&self) -> Level {
        Level(self.value.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_levels_are_ordered() {
        assert!(Level::DEBUG < Level::INFO);
        assert!(Level::INFO < Level::WARN);
        assert!(Level::WARN < Level::ERROR);
    }

    #[test]
    fn display_uses_offsets_from_nearest_name() {
        assert_eq!(Level::INFO.to_string(), "INFO");
        assert_eq!(Level::new(2).to_string(), "INFO+2");
        assert_eq!(Level::new(7).to_string(), "WARN+3");
        assert_eq!(Level::new(-8).to_string(), "DEBUG-4");
        assert_eq!(Level::new(12).to_string(), "ERROR+4");
    }

    #[test]
    fn parse_accepts_names_and_offsets() {
        assert_eq!("warn".parse::<Level>(), Ok(Level::WARN));
        assert_eq!("INFO+2".parse::<Level>(), Ok(Level::new(2)));
        assert_eq!("Error-1".parse::<Level>(), Ok(Level::new(7)));
        assert_eq!(" debug ".parse::<Level>(), Ok(Level::DEBUG));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            "LOUD".parse::<Level>(),
            Err(ParseLevelError::UnknownName("LOUD".to_string()))
        );
        assert_eq!(
            "INFO+x".parse::<Level>(),
            Err(ParseLevelError::InvalidOffset("INFO+x".to_string()))
        );
        assert!("".parse::<Level>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for value in [-10, -4, -1, 0, 3, 4, 8, 20] {
            let level = Level::new(value);
            assert_eq!(level.to_string().parse::<Level>(), Ok(level));
        }
    }

    #[test]
    fn level_var_changes_are_visible_through_arc() {
        let var = Arc::new(LevelVar::new(Level::WARN));
        let leveler: Arc<dyn Leveler> = var.clone();
        assert_eq!(leveler.level(), Level::WARN);
        var.set(Level::DEBUG);
        assert_eq!(leveler.level(), Level::DEBUG);
    }

    #[cfg(feature = "layer")]
    #[test]
    fn tracing_levels_map_onto_named_levels() {
        assert_eq!(Level::from(tracing::Level::INFO), Level::INFO);
        assert_eq!(Level::from(tracing::Level::ERROR), Level::ERROR);
        assert_eq!(Level::from(tracing::Level::TRACE).to_string(), "DEBUG-4");
    }
}
