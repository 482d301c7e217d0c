//! Numeric log levels and a thresholded logger
//!
//! The remote side and older operator tooling speak numeric levels
//! (CRITICAL=50 ... DEBUG=10). [`LevelLogger`] accepts those, drops anything
//! below its threshold, and forwards the rest to `tracing`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub u8);

impl LogLevel {
    pub const CRITICAL: LogLevel = LogLevel(50);
    pub const ERROR: LogLevel = LogLevel(40);
    pub const WARNING: LogLevel = LogLevel(30);
    pub const INFO: LogLevel = LogLevel(20);
    pub const DEBUG: LogLevel = LogLevel(10);

    /// Level name, or `UNDEFINED` for values outside the known set.
    pub fn name(&self) -> &'static str {
        match self.0 {
            50 => "CRITICAL",
            40 => "ERROR",
            30 => "WARNING",
            20 => "INFO",
            10 => "DEBUG",
            _ => "UNDEFINED",
        }
    }

    /// Closest `tracing` level for forwarding.
    pub fn tracing_level(&self) -> tracing::Level {
        match self.0 {
            40.. => tracing::Level::ERROR,
            30..=39 => tracing::Level::WARN,
            20..=29 => tracing::Level::INFO,
            10..=19 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn filter_directive(&self) -> &'static str {
        match self.tracing_level() {
            tracing::Level::ERROR => "error",
            tracing::Level::WARN => "warn",
            tracing::Level::INFO => "info",
            tracing::Level::DEBUG => "debug",
            tracing::Level::TRACE => "trace",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::INFO
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CRITICAL" => Ok(LogLevel::CRITICAL),
            "ERROR" => Ok(LogLevel::ERROR),
            "WARNING" | "WARN" => Ok(LogLevel::WARNING),
            "INFO" => Ok(LogLevel::INFO),
            "DEBUG" => Ok(LogLevel::DEBUG),
            other => other
                .parse::<u8>()
                .map(LogLevel)
                .map_err(|_| format!("Unknown log level: {}", s)),
        }
    }
}

/// Leveled logger with a drop threshold
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelLogger {
    threshold: LogLevel,
}

impl LevelLogger {
    pub fn new(threshold: LogLevel) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: LogLevel) {
        self.threshold = threshold;
    }

    /// Whether a message at `level` passes the threshold.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.threshold
    }

    /// Write a message. Returns the formatted line, or `None` if dropped.
    pub fn log(&self, level: LogLevel, message: &str) -> Option<String> {
        if !self.enabled(level) {
            return None;
        }
        let line = format!("{}: {}", level.name(), message);
        match level.tracing_level() {
            tracing::Level::ERROR => tracing::error!(level = level.0, "{}", message),
            tracing::Level::WARN => tracing::warn!(level = level.0, "{}", message),
            tracing::Level::INFO => tracing::info!(level = level.0, "{}", message),
            tracing::Level::DEBUG => tracing::debug!(level = level.0, "{}", message),
            tracing::Level::TRACE => tracing::trace!(level = level.0, "{}", message),
        }
        Some(line)
    }

    pub fn critical(&self, message: &str) -> Option<String> {
        self.log(LogLevel::CRITICAL, message)
    }

    pub fn error(&self, message: &str) -> Option<String> {
        self.log(LogLevel::ERROR, message)
    }

    pub fn warning(&self, message: &str) -> Option<String> {
        self.log(LogLevel::WARNING, message)
    }

    pub fn info(&self, message: &str) -> Option<String> {
        self.log(LogLevel::INFO, message)
    }

    pub fn debug(&self, message: &str) -> Option<String> {
        self.log(LogLevel::DEBUG, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::CRITICAL > LogLevel::ERROR);
        assert!(LogLevel::ERROR > LogLevel::WARNING);
        assert!(LogLevel::WARNING > LogLevel::INFO);
        assert!(LogLevel::INFO > LogLevel::DEBUG);
    }

    #[test]
    fn test_unknown_level_is_undefined() {
        assert_eq!(LogLevel(35).name(), "UNDEFINED");
        assert_eq!(LogLevel(0).to_string(), "UNDEFINED");
        assert_eq!(LogLevel::WARNING.to_string(), "WARNING");
    }

    #[test]
    fn test_threshold_drops_lower_levels() {
        let logger = LevelLogger::new(LogLevel::WARNING);
        assert_eq!(logger.debug("noise"), None);
        assert_eq!(logger.info("noise"), None);
        assert_eq!(logger.warning("careful").as_deref(), Some("WARNING: careful"));
        assert_eq!(logger.critical("down").as_deref(), Some("CRITICAL: down"));
    }

    #[test]
    fn test_unknown_level_above_threshold_is_written() {
        let logger = LevelLogger::new(LogLevel::INFO);
        assert_eq!(
            logger.log(LogLevel(45), "odd").as_deref(),
            Some("UNDEFINED: odd")
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::WARNING));
        assert_eq!("42".parse::<LogLevel>(), Ok(LogLevel(42)));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_serde_is_numeric() {
        assert_eq!(serde_json::to_string(&LogLevel::ERROR).unwrap(), "40");
        let level: LogLevel = serde_json::from_str("10").unwrap();
        assert_eq!(level, LogLevel::DEBUG);
    }
}
