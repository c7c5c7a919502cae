use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discovery::search_paths_from_env;

const APP_DIR_NAME: &str = "rex";
const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_MAX_SUGGESTIONS: u16 = 6;
pub const MAX_SUGGESTIONS_LIMIT: u16 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Display capacity of the suggestion list. Also caps how many fuzzy
    /// matches are computed per keystroke.
    pub max_suggestions: u16,
    /// Directories scanned for executables, in lookup order.
    pub search_paths: Vec<PathBuf>,
    pub log_dir: PathBuf,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            search_paths: search_paths_from_env(),
            log_dir: crate::logging::default_logs_dir(),
            config_path: default_config_path(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
    Serialize(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Parse(error) => write!(f, "parse error: {error}"),
            Self::Serialize(error) => write!(f, "serialize error: {error}"),
            Self::Invalid(error) => write!(f, "invalid config: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Json5,
}

fn format_for(path: &Path) -> ConfigFormat {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("json5") | Some("json") => ConfigFormat::Json5,
        _ => ConfigFormat::Toml,
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(dir).join(APP_DIR_NAME);
    }
    if let Some(dir) = std::env::var_os("APPDATA").filter(|v| !v.is_empty()) {
        return PathBuf::from(dir).join(APP_DIR_NAME);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR_NAME);
    }
    std::env::temp_dir().join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(dir).join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME);
    }
    stable_app_data_dir().join(CONFIG_FILE_NAME)
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.max_suggestions == 0 || cfg.max_suggestions > MAX_SUGGESTIONS_LIMIT {
        return Err(format!(
            "max_suggestions must be between 1 and {MAX_SUGGESTIONS_LIMIT}"
        ));
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err("config_path is required".into());
    }

    Ok(())
}

/// Reads the config at `path` (or the default location) without checking
/// value ranges, so callers can merge overrides before validating. A missing
/// file yields the defaults.
pub fn read(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    let mut config = if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)?;
        parse(&raw, format_for(&config_path))?
    } else {
        Config::default()
    };
    config.config_path = config_path;
    Ok(config)
}

pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config = read(path)?;
    validate(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}

fn parse(raw: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
    match format {
        ConfigFormat::Toml => toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string())),
        ConfigFormat::Json5 => json5::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string())),
    }
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg).map_err(ConfigError::Invalid)?;

    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rendered = match format_for(&cfg.config_path) {
        ConfigFormat::Toml => {
            toml::to_string_pretty(cfg).map_err(|e| ConfigError::Serialize(e.to_string()))?
        }
        ConfigFormat::Json5 => serde_json::to_string_pretty(cfg)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?,
    };
    std::fs::write(&cfg.config_path, rendered)?;
    Ok(())
}
