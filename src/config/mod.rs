//! Configuration management.
//!
//! [`BoardCsvConfig`] is the resolved configuration. [`ConfigFile`] mirrors
//! the TOML layout with every field optional; missing fields keep their
//! defaults.
//!
//! ```toml
//! [export]
//! name_column_label = "Name"
//! date_format = "%Y-%m-%d"
//! output_dir = "exports"
//!
//! [import]
//! rollback_on_failure = true
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application name used for config paths.
const APP_NAME: &str = "boardcsv";

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Main configuration for boardcsv.
#[derive(Debug, Clone, Default)]
pub struct BoardCsvConfig {
    /// Export settings.
    pub export: ExportSettings,
    /// Import settings.
    pub import: ImportSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Export settings.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Header of the title column.
    pub name_column_label: String,
    /// `chrono` pattern for date cells. Keep it free of commas.
    pub date_format: String,
    /// File name stem for views without a title.
    pub fallback_title: String,
    /// Directory exported files are written to.
    pub output_dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            name_column_label: "Name".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            fallback_title: "Untitled".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Import settings.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    /// Header whose value becomes the card title.
    pub name_column: String,
    /// Title for rows without a name.
    pub fallback_title: String,
    /// Roll the whole import back when one record is rejected.
    pub rollback_on_failure: bool,
    /// Message shown after a finished import.
    pub complete_message: String,
    /// Message shown after a failed import.
    pub failed_message: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            name_column: "Name".to_string(),
            fallback_title: "Untitled".to_string(),
            rollback_on_failure: false,
            complete_message: "Import complete!".to_string(),
            failed_message: "Import failed!".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `boardcsv=debug`.
    pub level: Option<String>,
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Log file path; stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Export section.
    pub export: Option<ConfigFileExport>,
    /// Import section.
    pub import: Option<ConfigFileImport>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// Export section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileExport {
    /// Title column header.
    pub name_column_label: Option<String>,
    /// Date pattern.
    pub date_format: Option<String>,
    /// Fallback file name stem.
    pub fallback_title: Option<String>,
    /// Output directory.
    pub output_dir: Option<String>,
}

/// Import section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileImport {
    /// Title column header.
    pub name_column: Option<String>,
    /// Fallback card title.
    pub fallback_title: Option<String>,
    /// Rollback policy.
    pub rollback_on_failure: Option<bool>,
    /// Completion message.
    pub complete_message: Option<String>,
    /// Failure message.
    pub failed_message: Option<String>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLogging {
    /// Filter directive.
    pub level: Option<String>,
    /// Output format.
    pub format: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

impl BoardCsvConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid config TOML.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/boardcsv/` on macOS)
    /// 2. XDG config dir (`~/.config/boardcsv/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        Self::default_paths()
            .into_iter()
            .filter(|path| path.exists())
            .find_map(|path| match Self::load_from_file(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Ignoring unreadable config file"
                    );
                    None
                },
            })
            .unwrap_or_default()
    }

    /// Returns the candidate config file paths, in lookup order.
    #[must_use]
    pub fn default_paths() -> Vec<PathBuf> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Vec::new();
        };

        let platform = base_dirs.config_dir().join(APP_NAME).join(CONFIG_FILE_NAME);
        let xdg = base_dirs
            .home_dir()
            .join(".config")
            .join(APP_NAME)
            .join(CONFIG_FILE_NAME);

        if platform == xdg {
            vec![platform]
        } else {
            vec![platform, xdg]
        }
    }

    /// Converts a `ConfigFile` to `BoardCsvConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(export) = file.export {
            if let Some(v) = export.name_column_label {
                config.export.name_column_label = v;
            }
            if let Some(v) = export.date_format {
                config.export.date_format = v;
            }
            if let Some(v) = export.fallback_title {
                config.export.fallback_title = v;
            }
            if let Some(v) = export.output_dir {
                config.export.output_dir = PathBuf::from(v);
            }
        }
        if let Some(import) = file.import {
            if let Some(v) = import.name_column {
                config.import.name_column = v;
            }
            if let Some(v) = import.fallback_title {
                config.import.fallback_title = v;
            }
            if let Some(v) = import.rollback_on_failure {
                config.import.rollback_on_failure = v;
            }
            if let Some(v) = import.complete_message {
                config.import.complete_message = v;
            }
            if let Some(v) = import.failed_message {
                config.import.failed_message = v;
            }
        }
        if let Some(logging) = file.logging {
            config.logging.level = logging.level;
            config.logging.format = logging.format;
            config.logging.file = logging.file.map(PathBuf::from);
        }

        config
    }

    /// Sets the export output directory.
    #[must_use]
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.export.output_dir = path.into();
        self
    }

    /// Sets the export date pattern.
    #[must_use]
    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.export.date_format = pattern.into();
        self
    }

    /// Enables or disables rollback on a rejected record.
    #[must_use]
    pub const fn with_rollback_on_failure(mut self, rollback: bool) -> Self {
        self.import.rollback_on_failure = rollback;
        self
    }
}
