//! Configuration and color scheme management for portterm.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.portterm/config.toml`
//! - The three terminal themes (matrix, classic, light) and their colors
//! - Runtime theme switching (the `theme` command)
//!
//! # Configuration File
//!
//! ```toml
//! prompt = "guest@portfolio:~$"
//! theme = "matrix"
//! history_limit = 100
//!
//! # Use an external command engine instead of the built-in commands
//! [engine]
//! program = "/usr/local/bin/cmd-engine"
//! args = []
//!
//! # Demo files for `ls` / `cat`
//! [files]
//! "about.txt" = "Hi, I'm Richard."
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::history::HISTORY_LIMIT;

/// Banner shown when a terminal starts
pub const WELCOME: &str = "Welcome! Type 'help' to see available commands.\n\
                           This is a simulated terminal - nothing actually runs.";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config path")]
    NoConfigPath,

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config: {0}")]
    Write(#[source] io::Error),
}

/// Terminal display theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Matrix,
    Classic,
    Light,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Matrix, Theme::Classic, Theme::Light];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Matrix => "matrix",
            Theme::Classic => "classic",
            Theme::Light => "light",
        }
    }

    /// Exact, case-sensitive match against the three theme names
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|theme| theme.as_str() == name)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown theme '{}' (matrix | classic | light)", s))
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prompt echoed before every submitted line
    pub prompt: String,
    /// Initial theme
    pub theme: Theme,
    /// Banner printed when the terminal starts (empty for none)
    pub welcome: String,
    /// Number of submitted lines kept for ↑/↓ recall
    pub history_limit: usize,
    /// External command engine
    pub engine: EngineConfig,
    /// Demo files served by `ls` and `cat`
    pub files: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let mut files = BTreeMap::new();
        files.insert("about.txt".to_string(), "Hi, I'm Richard.".to_string());

        Self {
            prompt: "guest@portfolio:~$".to_string(),
            theme: Theme::default(),
            welcome: WELCOME.to_string(),
            history_limit: HISTORY_LIMIT,
            engine: EngineConfig::default(),
            files,
        }
    }
}

/// External command engine settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable; the built-in commands are used when unset
    pub program: Option<String>,
    /// Extra arguments placed before the engine subcommand
    pub args: Vec<String>,
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                match fs::read_to_string(&path) {
                    Ok(content) => match Self::from_toml(&content) {
                        Ok(config) => return config,
                        Err(e) => warn!("Ignoring {}: {}", path.display(), e),
                    },
                    Err(e) => warn!("Could not read {}: {}", path.display(), e),
                }
            }
        }
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to file, returning the path written
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::get_config_path().ok_or(ConfigError::NoConfigPath)?;
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content).map_err(ConfigError::Write)?;
        Ok(path)
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("config.toml"))
    }
}

/// `~/.portterm`, created on first use
pub fn config_dir() -> Option<PathBuf> {
    let dir = home_dir()?.join(".portterm");
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }
    Some(dir)
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Color scheme definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    // Transcript and input row
    pub background: Color,
    pub foreground: Color,
    /// Echoed input lines and the placeholder
    pub dim: Color,
    /// The `$` in front of the draft
    pub prompt: Color,

    // Title bar
    pub title_bar_bg: Color,
    pub title_bar_fg: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::matrix()
    }
}

impl ColorScheme {
    /// Green on black
    pub fn matrix() -> Self {
        Self {
            background: Color::new(0, 0, 0),
            foreground: Color::new(34, 197, 94),
            dim: Color::new(22, 128, 61),
            prompt: Color::new(16, 185, 129),
            title_bar_bg: Color::new(24, 24, 27),
            title_bar_fg: Color::new(113, 113, 122),
        }
    }

    /// Light gray on charcoal
    pub fn classic() -> Self {
        Self {
            background: Color::new(24, 24, 27),
            foreground: Color::new(244, 244, 245),
            dim: Color::new(161, 161, 170),
            prompt: Color::new(16, 185, 129),
            title_bar_bg: Color::new(39, 39, 42),
            title_bar_fg: Color::new(113, 113, 122),
        }
    }

    /// Dark text on white
    pub fn light() -> Self {
        Self {
            background: Color::new(255, 255, 255),
            foreground: Color::new(24, 24, 27),
            dim: Color::new(82, 82, 91),
            prompt: Color::new(5, 150, 105),
            title_bar_bg: Color::new(228, 228, 231),
            title_bar_fg: Color::new(113, 113, 122),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Matrix => Self::matrix(),
            Theme::Classic => Self::classic(),
            Theme::Light => Self::light(),
        }
    }
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}
