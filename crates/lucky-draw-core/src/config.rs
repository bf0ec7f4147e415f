// Configuration loading and validation (config/lucky-draw.toml).
//
// The file is optional: a missing file means built-in defaults. Every field
// inside a present file is optional too and falls back to the same defaults.

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use thiserror::Error;

use crate::draw::{DEFAULT_ANIMATION, DEFAULT_REEL_LENGTH};

/// Config file location relative to the working directory.
pub const CONFIG_FILE: &str = "config/lucky-draw.toml";

/// Default `chrono` format for export timestamps.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub draw: DrawConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Initial number of winners per round.
    pub default_count: usize,
    /// Initial state of the "exclude past winners" toggle.
    pub exclude_winners: bool,
    /// Length of the reel animation in milliseconds.
    pub animation_ms: u64,
    /// Names per reel, including the winner.
    pub reel_length: usize,
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            default_count: 1,
            exclude_winners: true,
            animation_ms: DEFAULT_ANIMATION.as_millis() as u64,
            reel_length: DEFAULT_REEL_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory the CSV export is written to. `None` means the user's
    /// download directory, or the working directory when that is unknown.
    pub directory: Option<PathBuf>,
    /// `chrono` format string for the Timestamp column.
    pub timestamp_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            directory: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl ExportConfig {
    /// Resolve the directory exports are written to.
    pub fn resolve_directory(&self) -> PathBuf {
        if let Some(dir) = &self.directory {
            return dir.clone();
        }
        directories::UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate config text.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from `config/lucky-draw.toml` under `base_dir`.
///
/// A missing file yields `Config::default()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
        path: path.clone(),
        source: e,
    })?;
    parse_config(&text, &path)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::Io {
        path: PathBuf::from("."),
        source: e,
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.draw.default_count == 0 {
        return Err(ConfigError::ValidationError {
            field: "draw.default_count".into(),
            message: "must be at least 1".into(),
        });
    }

    if config.draw.animation_ms == 0 {
        return Err(ConfigError::ValidationError {
            field: "draw.animation_ms".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.draw.reel_length == 0 {
        return Err(ConfigError::ValidationError {
            field: "draw.reel_length".into(),
            message: "must be at least 1".into(),
        });
    }

    let format = &config.export.timestamp_format;
    if format.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "export.timestamp_format".into(),
            message: "must not be empty".into(),
        });
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::ValidationError {
            field: "export.timestamp_format".into(),
            message: format!("invalid strftime format {format:?}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_base(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lucky_draw_config_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("config")).unwrap();
        dir
    }

    #[test]
    fn missing_file_yields_defaults() {
        let base = std::env::temp_dir().join("lucky_draw_config_missing");
        let _ = fs::remove_dir_all(&base);
        let config = load_config_from(&base).expect("defaults");
        assert_eq!(config, Config::default());
        assert_eq!(config.draw.default_count, 1);
        assert!(config.draw.exclude_winners);
        assert_eq!(config.draw.animation_ms, 3500);
        assert_eq!(config.draw.reel_length, 40);
        assert!(config.export.directory.is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let base = temp_base("partial");
        fs::write(
            base.join(CONFIG_FILE),
            "[draw]\ndefault_count = 3\n\n[export]\ndirectory = \"out\"\n",
        )
        .unwrap();
        let config = load_config_from(&base).expect("should load");
        assert_eq!(config.draw.default_count, 3);
        assert!(config.draw.exclude_winners);
        assert_eq!(config.draw.reel_length, 40);
        assert_eq!(config.export.directory, Some(PathBuf::from("out")));
        assert_eq!(config.export.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
    }

    #[test]
    fn rejects_zero_default_count() {
        let err = parse_config("[draw]\ndefault_count = 0\n", Path::new("x.toml")).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "draw.default_count");
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_animation() {
        let err = parse_config("[draw]\nanimation_ms = 0\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "draw.animation_ms"
        ));
    }

    #[test]
    fn rejects_zero_reel_length() {
        let err = parse_config("[draw]\nreel_length = 0\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "draw.reel_length"
        ));
    }

    #[test]
    fn rejects_blank_timestamp_format() {
        let err = parse_config("[export]\ntimestamp_format = \" \"\n", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "export.timestamp_format"
        ));
    }

    #[test]
    fn rejects_unknown_strftime_specifier() {
        let err = parse_config("[export]\ntimestamp_format = \"%Q\"\n", Path::new("x.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("export.timestamp_format"));
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let base = temp_base("invalid");
        fs::write(base.join(CONFIG_FILE), "[draw\nbroken").unwrap();
        let err = load_config_from(&base).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("lucky-draw.toml"));
    }

    #[test]
    fn explicit_export_directory_wins() {
        let export = ExportConfig {
            directory: Some(PathBuf::from("/tmp/draws")),
            ..ExportConfig::default()
        };
        assert_eq!(export.resolve_directory(), PathBuf::from("/tmp/draws"));
    }
}
