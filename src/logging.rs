//! Log output on stderr.
//!
//! The library only emits `tracing` events; the binary decides whether and
//! how they are printed by calling [`init`] once at startup.

use tracing::Level;

/// Parse a level name from the settings file. Unknown names give `None`.
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

/// Level for a `-v` count, raised from the configured `base` level.
pub fn level_for_verbosity(base: Level, verbose: u8) -> Level {
    let raised = match verbose {
        0 => return base,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // tracing orders levels by verbosity: TRACE > DEBUG > ... > ERROR
    if raised > base { raised } else { base }
}

/// Install the stderr subscriber. Later calls are ignored.
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("Debug"), Some(Level::DEBUG));
        assert_eq!(parse_level(" warning "), Some(Level::WARN));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_verbosity_only_raises() {
        assert_eq!(level_for_verbosity(Level::WARN, 0), Level::WARN);
        assert_eq!(level_for_verbosity(Level::WARN, 2), Level::DEBUG);
        assert_eq!(level_for_verbosity(Level::TRACE, 1), Level::TRACE);
        assert_eq!(level_for_verbosity(Level::ERROR, 9), Level::TRACE);
    }
}
