//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "BOARDCSV_LOG";

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV_VAR: &str = "BOARDCSV_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name; unknown names fall back to pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Event filter.
    pub filter: EnvFilter,
    /// Output format.
    pub format: LogFormat,
    /// Log file; stderr when `None`.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Resolves logging from settings and environment.
    ///
    /// The filter comes from `BOARDCSV_LOG`, then the configured level, then
    /// `warn`. `verbose` raises the crate's own events to `debug`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let directive = std::env::var(LOG_ENV_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| settings.and_then(|s| s.level.clone()))
            .unwrap_or_else(|| "warn".to_string());

        let format = std::env::var(LOG_FORMAT_ENV_VAR)
            .ok()
            .or_else(|| settings.and_then(|s| s.format.clone()))
            .map(|f| LogFormat::parse(&f))
            .unwrap_or_default();

        Self {
            filter: build_filter(&directive, verbose),
            format,
            file: settings.and_then(|s| s.file.clone()),
        }
    }
}

fn build_filter(directive: &str, verbose: bool) -> EnvFilter {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    if verbose {
        match "boardcsv=debug".parse() {
            Ok(d) => filter.add_directive(d),
            Err(_) => filter,
        }
    } else {
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("other"), LogFormat::Pretty);
    }

    #[test]
    fn test_from_settings_keeps_file() {
        let settings = LoggingSettings {
            level: Some("info".to_string()),
            format: None,
            file: Some(PathBuf::from("/tmp/boardcsv.log")),
        };
        let config = LoggingConfig::from_settings(Some(&settings), false);
        assert_eq!(config.file, Some(PathBuf::from("/tmp/boardcsv.log")));
    }

    #[test]
    fn test_verbose_adds_debug_directive() {
        let filter = build_filter("warn", true);
        assert!(filter.to_string().contains("boardcsv=debug"));
    }
}
