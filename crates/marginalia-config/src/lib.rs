//! Configuration management for marginalia.
//!
//! Parses `marginalia.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `figures.cache_dir`
//! - `figures.default_font`
//! - `figures.latex`
//! - `figures.convert`
//! - `captions.pandoc`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use marginalia_figures::{DEFAULT_DENSITY, DEFAULT_FONT, DEFAULT_TIMEOUT};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override figure cache directory.
    pub cache_dir: Option<PathBuf>,
    /// Override font used when the document names none.
    pub default_font: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "marginalia.toml";

/// Figure cache location relative to the config directory.
const DEFAULT_CACHE_DIR: &str = ".marginalia/figures";

/// Highest accepted rasterization density.
const MAX_DENSITY: u32 = 2400;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Figure configuration (paths are relative strings from TOML).
    figures: FiguresConfigRaw,
    /// Caption conversion configuration.
    pub captions: CaptionsConfig,

    /// Resolved figure configuration (set after loading).
    #[serde(skip)]
    pub figures_resolved: FiguresConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw figure configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FiguresConfigRaw {
    cache_dir: Option<String>,
    default_font: Option<String>,
    latex: Option<String>,
    convert: Option<String>,
    density: Option<u32>,
    timeout_secs: Option<u64>,
}

/// Resolved figure configuration with an absolute cache path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiguresConfig {
    /// Directory holding rendered figures.
    pub cache_dir: PathBuf,
    /// Font package used when the document metadata names none.
    pub default_font: String,
    /// LaTeX engine.
    pub latex: String,
    /// PDF to PNG converter.
    pub convert: String,
    /// Rasterization density in dots per inch.
    pub density: u32,
    /// Time limit for each toolchain program.
    pub timeout: Duration,
}

impl FiguresConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            cache_dir: base.join(DEFAULT_CACHE_DIR),
            default_font: DEFAULT_FONT.to_owned(),
            latex: "pdflatex".to_owned(),
            convert: "convert".to_owned(),
            density: DEFAULT_DENSITY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Default for FiguresConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

/// Caption conversion configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptionsConfig {
    /// Pandoc executable used to parse caption markdown.
    pub pandoc: String,
    /// Time limit for each caption conversion, in seconds.
    pub timeout_secs: u64,
}

impl CaptionsConfig {
    /// Time limit for each caption conversion.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CaptionsConfig {
    fn default() -> Self {
        Self {
            pandoc: "pandoc".to_owned(),
            timeout_secs: 30,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`figures.latex`").
        field: String,
        /// Error message (e.g., "${`TEXBIN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `marginalia.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(cache_dir) = &settings.cache_dir {
            self.figures_resolved.cache_dir.clone_from(cache_dir);
        }
        if let Some(font) = &settings.default_font {
            self.figures_resolved.default_font.clone_from(font);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            figures: FiguresConfigRaw::default(),
            captions: CaptionsConfig::default(),
            figures_resolved: FiguresConfig::with_base(base),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_figures()?;
        self.validate_captions()?;
        Ok(())
    }

    fn validate_figures(&self) -> Result<(), ConfigError> {
        let figures = &self.figures_resolved;
        require_non_empty(&figures.default_font, "figures.default_font")?;
        require_non_empty(&figures.latex, "figures.latex")?;
        require_non_empty(&figures.convert, "figures.convert")?;

        if figures.density == 0 || figures.density > MAX_DENSITY {
            return Err(ConfigError::Validation(format!(
                "figures.density must be between 1 and {MAX_DENSITY}"
            )));
        }
        if figures.timeout.is_zero() {
            return Err(ConfigError::Validation(
                "figures.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_captions(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.captions.pandoc, "captions.pandoc")?;
        if self.captions.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "captions.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let figures = &mut self.figures;
        for (value, field) in [
            (&mut figures.cache_dir, "figures.cache_dir"),
            (&mut figures.default_font, "figures.default_font"),
            (&mut figures.latex, "figures.latex"),
            (&mut figures.convert, "figures.convert"),
        ] {
            if let Some(raw) = value {
                *raw = expand::expand_env(raw, field)?;
            }
        }

        self.captions.pandoc = expand::expand_env(&self.captions.pandoc, "captions.pandoc")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory and fill in defaults.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = FiguresConfig::with_base(config_dir);
        let raw = &self.figures;

        self.figures_resolved = FiguresConfig {
            cache_dir: raw
                .cache_dir
                .as_deref()
                .map_or(defaults.cache_dir, |dir| config_dir.join(dir)),
            default_font: raw.default_font.clone().unwrap_or(defaults.default_font),
            latex: raw.latex.clone().unwrap_or(defaults.latex),
            convert: raw.convert.clone().unwrap_or(defaults.convert),
            density: raw.density.unwrap_or(defaults.density),
            timeout: raw
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
        };
    }
}
