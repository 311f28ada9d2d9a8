use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::data::datatable_loaders::{Delimiter, LoadOptions};
use crate::navigator::{NavigatorOptions, PageCountMode, DEFAULT_PAGE_SIZE};
use crate::ui::chart_renderer::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH};

pub const APP_DIR_NAME: &str = "csv-navigator";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("display.page_size must be greater than zero")]
    InvalidPageSize,

    #[error("loader.delimiter '{0}' is not a single character, 'tab' or 'auto'")]
    InvalidDelimiter(String),

    #[error("charts.width and charts.height must be at least 2 (got {width}x{height})")]
    InvalidChartSize { width: usize, height: usize },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
    pub loader: LoaderConfig,
    pub charts: ChartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows per page
    pub page_size: usize,

    /// Clear the terminal before each page
    pub clear_screen: bool,

    /// Type messages out one character at a time
    pub typewriter: bool,
    pub typewriter_delay_ms: u64,

    pub use_color: bool,

    /// Show the banner and confirmation prompt on startup
    pub show_welcome: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Report `floor(rows / page_size) + 1` pages instead of the exact count
    pub legacy_page_count: bool,

    /// Keep command history between sessions
    pub enable_history: bool,

    pub max_history_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Single character, "tab" or "auto"
    pub delimiter: String,

    pub has_headers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub enabled: bool,
    pub width: usize,
    pub height: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            clear_screen: false,
            typewriter: false,
            typewriter_delay_ms: 10,
            use_color: true,
            show_welcome: true,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            legacy_page_count: false,
            enable_history: true,
            max_history_entries: 500,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            has_headers: true,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults
    /// when no file exists yet
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the commented default file to `path`. Never overwrites.
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Error creating config directory {}", parent.display())
            })?;
        }
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }
        fs::write(path, Self::create_default_with_comments())?;
        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join(APP_DIR_NAME).join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        self.delimiter()?;
        if self.charts.width < 2 || self.charts.height < 2 {
            return Err(ConfigError::InvalidChartSize {
                width: self.charts.width,
                height: self.charts.height,
            });
        }
        Ok(())
    }

    pub fn delimiter(&self) -> Result<Delimiter, ConfigError> {
        Delimiter::parse(&self.loader.delimiter)
            .ok_or_else(|| ConfigError::InvalidDelimiter(self.loader.delimiter.clone()))
    }

    pub fn load_options(&self) -> Result<LoadOptions, ConfigError> {
        Ok(LoadOptions {
            delimiter: self.delimiter()?,
            has_headers: self.loader.has_headers,
        })
    }

    pub fn navigator_options(&self) -> NavigatorOptions {
        NavigatorOptions {
            page_size: self.display.page_size,
            page_count_mode: if self.behavior.legacy_page_count {
                PageCountMode::Legacy
            } else {
                PageCountMode::Exact
            },
            charts_enabled: self.charts.enabled,
        }
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# CSV Navigator Configuration File
# Location: ~/.config/csv-navigator/config.toml (Linux)
#           ~/Library/Application Support/csv-navigator/config.toml (macOS)
#           %APPDATA%\csv-navigator\config.toml (Windows)

[display]
# Rows shown per page (must be greater than zero)
page_size = 10

# Clear the terminal before each page
clear_screen = false

# Type messages out one character at a time
typewriter = false
typewriter_delay_ms = 10

# Colored notices
use_color = true

# Show the DATA QUALITY banner and the confirmation prompt on startup
show_welcome = true

[behavior]
# Report floor(rows / page_size) + 1 pages instead of the exact count
legacy_page_count = false

# Keep command history between sessions (interactive terminals only)
enable_history = true
max_history_entries = 500

[loader]
# Single character, "tab" or "auto" to detect from the header line
delimiter = ","

# When false, columns are named column_0, column_1, ...
has_headers = true

[charts]
# Enables the 'b' (bar) and 's' (scatter) commands
enabled = true
width = 50
height = 15
"#
        .to_string()
    }
}
