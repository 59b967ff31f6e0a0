//! Display helpers: number formatting and terminal styling.
//!
//! Nothing here feeds back into computation.

pub mod numbers;

pub use numbers::{format_currency, format_number, format_percentage, format_value};

use colored::Colorize;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    /// Honors `NO_COLOR`, `CLICOLOR=0` and `CLICOLOR_FORCE=1`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            config.color = ColorMode::Never;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v == "1") {
            config.color = ColorMode::Always;
        }

        config
    }

    pub fn plain() -> Self {
        Self::new(ColorMode::Never)
    }
}

/// Applies (or skips) terminal colors for report text.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(config: FormattingConfig) -> Self {
        Self {
            enabled: config.color.should_use_color(),
        }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().bold().to_string())
    }

    /// Green for gains, red for losses.
    pub fn signed(&self, text: &str, value: f64) -> String {
        if value > 0.0 {
            self.paint(text, |t| t.green().to_string())
        } else {
            self.paint(text, |t| t.red().to_string())
        }
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow().to_string())
    }

    pub fn info(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan().to_string())
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed().to_string())
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> String) -> String {
        if self.enabled {
            style(text)
        } else {
            text.to_string()
        }
    }
}

fn detect_color_support() -> bool {
    if env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }
    std::io::stdout().is_terminal()
}
