//! Configuration for the Ember editor
//!
//! Sources, highest priority first:
//! - CLI arguments
//! - Environment variables (`EMBER_*`)
//! - Config file (`<config dir>/ember/config.toml`)
//! - Built-in defaults

use clap::Parser;
use ember_core::highlight::DEFAULT_KEYWORDS;
use ember_core::DEFAULT_HISTORY_LIMIT;
use ember_toolchain::ToolchainConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI arguments for Ember
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ember")]
#[command(version)]
#[command(about = "A minimal code editor with one-key compile and run", long_about = None)]
pub struct CliArgs {
    /// Path to custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to a TrueType/OpenType font file
    #[arg(long, value_name = "FONT")]
    pub font: Option<PathBuf>,

    /// Font size in pixels
    #[arg(long, value_name = "SIZE")]
    pub font_size: Option<f32>,

    /// Theme name (dark, light, custom)
    #[arg(short, long, value_name = "THEME")]
    pub theme: Option<String>,

    /// Compiler program used by compile & run
    #[arg(long, value_name = "PROGRAM")]
    pub compiler: Option<String>,

    /// Directory for the compiler's work files
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// File to open on startup
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Available theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    /// Colours from the `[colors]` section
    Custom,
}

impl ThemeName {
    /// Parse theme name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dark" => Some(ThemeName::Dark),
            "light" => Some(ThemeName::Light),
            "custom" => Some(ThemeName::Custom),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
            ThemeName::Custom => "custom",
        }
    }

    /// Flip between dark and light; a custom scheme toggles to dark
    pub fn next(self) -> Self {
        match self {
            ThemeName::Dark => ThemeName::Light,
            ThemeName::Light | ThemeName::Custom => ThemeName::Dark,
        }
    }
}

/// Font configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    /// Font file; when unset or unusable the fallbacks are tried in order
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Font size in pixels
    #[serde(default = "default_font_size")]
    pub size: f32,
    /// Font files tried when `path` is unset or unreadable
    #[serde(default = "default_font_fallbacks")]
    pub fallbacks: Vec<PathBuf>,
}

fn default_font_size() -> f32 {
    20.0
}

fn default_font_fallbacks() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
        "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
        "/System/Library/Fonts/Menlo.ttc",
        "/System/Library/Fonts/Monaco.ttf",
        "C:\\Windows\\Fonts\\consola.ttf",
        "C:\\Windows\\Fonts\\cour.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            size: default_font_size(),
            fallbacks: default_font_fallbacks(),
        }
    }
}

/// Window geometry in logical pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,
    #[serde(default = "default_window_height")]
    pub height: u32,
    /// Height of one text row
    #[serde(default = "default_line_height")]
    pub line_height: u32,
}

fn default_window_width() -> u32 {
    1200
}
fn default_window_height() -> u32 {
    700
}
fn default_line_height() -> u32 {
    28
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
            line_height: default_line_height(),
        }
    }
}

/// Editing behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// A line containing any of these is drawn in the keyword colour
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Maximum undo depth; 0 keeps everything
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Auto-close ( [ {
    #[serde(default = "default_true")]
    pub auto_pair: bool,
    /// Target of Ctrl+S / Ctrl+O
    #[serde(default = "default_save_file")]
    pub save_file: PathBuf,
    /// Target of the Save Project button
    #[serde(default = "default_project_file")]
    pub project_file: PathBuf,
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}
fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}
fn default_true() -> bool {
    true
}
fn default_save_file() -> PathBuf {
    PathBuf::from("saved_code.cpp")
}
fn default_project_file() -> PathBuf {
    PathBuf::from("saved_project.cpp")
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            history_limit: default_history_limit(),
            auto_pair: true,
            save_file: default_save_file(),
            project_file: default_project_file(),
        }
    }
}

/// Editor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub font: FontConfig,

    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub theme: ThemeName,

    /// Scheme used by the custom theme; unset entries keep the dark colours
    #[serde(default)]
    pub colors: ColorScheme,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// File opened at startup (CLI only)
    #[serde(skip)]
    pub open_file: Option<PathBuf>,
}

/// Colours for every part of the window, as `#rrggbb`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    pub background: String,
    pub foreground: String,
    pub keyword: String,
    pub cursor: String,
    pub selection: String,
    pub gutter: String,
    pub gutter_text: String,
    pub sidebar: String,
    pub button: String,
    pub button_hover: String,
    pub button_text: String,
    pub output_background: String,
    pub output_text: String,
    pub error_text: String,
    pub status_background: String,
    pub status_text: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl ColorScheme {
    pub fn dark() -> Self {
        Self {
            background: "#1e1e1e".to_string(),
            foreground: "#ffffff".to_string(),
            keyword: "#ff0000".to_string(),
            cursor: "#ffffff".to_string(),
            selection: "#264f78".to_string(),
            gutter: "#323232".to_string(),
            gutter_text: "#ffffff".to_string(),
            sidebar: "#323232".to_string(),
            button: "#464646".to_string(),
            button_hover: "#5a5a5a".to_string(),
            button_text: "#ffffff".to_string(),
            output_background: "#1e1e1e".to_string(),
            output_text: "#ffffff".to_string(),
            error_text: "#f14c4c".to_string(),
            status_background: "#646464".to_string(),
            status_text: "#ffffff".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            foreground: "#000000".to_string(),
            keyword: "#ff0000".to_string(),
            cursor: "#000000".to_string(),
            selection: "#add6ff".to_string(),
            gutter: "#e8e8e8".to_string(),
            gutter_text: "#555555".to_string(),
            sidebar: "#e8e8e8".to_string(),
            button: "#d0d0d0".to_string(),
            button_hover: "#bcbcbc".to_string(),
            button_text: "#000000".to_string(),
            output_background: "#f3f3f3".to_string(),
            output_text: "#000000".to_string(),
            error_text: "#cd3131".to_string(),
            status_background: "#646464".to_string(),
            status_text: "#ffffff".to_string(),
        }
    }

    /// Parse a hex color string to RGB
    pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some((r, g, b))
    }

    /// Parse a colour from this scheme, with a mid-grey fallback
    pub fn rgb(value: &str) -> (u8, u8, u8) {
        Self::parse_hex(value).unwrap_or((128, 128, 128))
    }

    fn fields(&self) -> [(&'static str, &str); 16] {
        [
            ("background", &self.background),
            ("foreground", &self.foreground),
            ("keyword", &self.keyword),
            ("cursor", &self.cursor),
            ("selection", &self.selection),
            ("gutter", &self.gutter),
            ("gutter_text", &self.gutter_text),
            ("sidebar", &self.sidebar),
            ("button", &self.button),
            ("button_hover", &self.button_hover),
            ("button_text", &self.button_text),
            ("output_background", &self.output_background),
            ("output_text", &self.output_text),
            ("error_text", &self.error_text),
            ("status_background", &self.status_background),
            ("status_text", &self.status_text),
        ]
    }

    /// Check every colour parses, naming the first bad one
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.fields() {
            if Self::parse_hex(value).is_none() {
                return Err(ConfigError {
                    message: format!("Invalid hex color '{}'. Expected format: #RRGGBB", value),
                    field: Some(format!("colors.{}", name)),
                });
            }
        }
        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub message: String,
    pub field: Option<String>,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Config error in '{}': {}", field, self.message)
        } else {
            write!(f, "Config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    fn field(field: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

impl Config {
    /// Load configuration with full precedence:
    /// CLI args > environment variables > config file > defaults
    pub fn load_with_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        let config_path = args.config.clone().or_else(Self::default_config_path);
        if let Some(path) = &config_path {
            if path.exists() {
                match Self::load_from_file(path) {
                    Ok(file_config) => config = file_config,
                    Err(e) => {
                        log::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        config.apply_env_vars();
        config.apply_cli_args(args);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            message: format!("Failed to read config file: {}", e),
            field: None,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError {
            message: format!("Failed to parse config file: {}", e),
            field: None,
        })
    }

    fn apply_env_vars(&mut self) {
        if let Ok(val) = env::var("EMBER_FONT") {
            self.font.path = Some(PathBuf::from(val));
        }
        if let Ok(val) = env::var("EMBER_FONT_SIZE") {
            if let Ok(size) = val.parse() {
                self.font.size = size;
            }
        }
        if let Ok(val) = env::var("EMBER_THEME") {
            if let Some(theme) = ThemeName::from_str(&val) {
                self.theme = theme;
            }
        }
        if let Ok(val) = env::var("EMBER_COMPILER") {
            self.toolchain.compiler = val;
        }
    }

    fn apply_cli_args(&mut self, args: &CliArgs) {
        if let Some(font) = &args.font {
            self.font.path = Some(font.clone());
        }
        if let Some(size) = args.font_size {
            self.font.size = size;
        }
        if let Some(theme_str) = &args.theme {
            match ThemeName::from_str(theme_str) {
                Some(theme) => self.theme = theme,
                None => log::warn!("Unknown theme '{}', keeping {}", theme_str, self.theme.display_name()),
            }
        }
        if let Some(compiler) = &args.compiler {
            self.toolchain.compiler = compiler.clone();
        }
        if let Some(dir) = &args.work_dir {
            self.toolchain.work_dir = dir.clone();
        }
        if let Some(file) = &args.file {
            self.open_file = Some(file.clone());
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if !(4.0..=200.0).contains(&self.font.size) {
            return Err(ConfigError::field(
                "font.size",
                "Font size must be between 4.0 and 200.0",
            ));
        }

        if self.window.width < 400 || self.window.height < 300 {
            return Err(ConfigError::field(
                "window",
                "Window must be at least 400x300",
            ));
        }
        if self.window.line_height < 8 || self.window.line_height > 200 {
            return Err(ConfigError::field(
                "window.line_height",
                "Line height must be between 8 and 200",
            ));
        }

        if self.editor.keywords.iter().any(|k| k.is_empty()) {
            return Err(ConfigError::field(
                "editor.keywords",
                "Keywords must not be empty strings",
            ));
        }
        if self.editor.save_file.as_os_str().is_empty() {
            return Err(ConfigError::field("editor.save_file", "File name must not be empty"));
        }
        if self.editor.project_file.as_os_str().is_empty() {
            return Err(ConfigError::field(
                "editor.project_file",
                "File name must not be empty",
            ));
        }

        self.colors.validate()?;

        if self.toolchain.compiler.trim().is_empty() {
            return Err(ConfigError::field(
                "toolchain.compiler",
                "Compiler must not be empty",
            ));
        }
        if !self.toolchain.args.iter().any(|a| a.contains("{source}")) {
            return Err(ConfigError::field(
                "toolchain.args",
                "Compiler arguments must reference {source}",
            ));
        }

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ember").join("config.toml"))
    }

    /// Colour scheme for a theme
    pub fn colors_for(&self, theme: ThemeName) -> ColorScheme {
        match theme {
            ThemeName::Dark => ColorScheme::dark(),
            ThemeName::Light => ColorScheme::light(),
            ThemeName::Custom => self.colors.clone(),
        }
    }
}
