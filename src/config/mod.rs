/// TOML loading and value checks.
pub mod parser;
/// Unknown-key warnings.
pub mod validator;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings read from `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Menu lookup and resolution settings
    #[serde(default)]
    pub menu: MenuConfig,

    /// Property-list output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// The `[menu]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MenuConfig {
    /// Menu file used when `--file` is not given
    #[serde(default)]
    pub file: Option<String>,
    /// Locale for `Name[xx]` lookup, overriding `LC_ALL`/`LC_MESSAGES`/`LANG`
    #[serde(default)]
    pub locale: Option<String>,
    /// Keep menus that end up with no children
    #[serde(default)]
    pub show_empty: bool,
}

/// The `[output]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Break wide arrays over several lines
    #[serde(default = "default_indent")]
    pub indent: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// A missing file yields the defaults; nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML
    /// - A value is out of range (see [`parser::parse_config_str`])
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        parser::parse_config_file(path)
    }

    /// Menu file to load, given the `--file` argument
    #[must_use]
    pub fn menu_file<'a>(&'a self, cli_file: Option<&'a str>) -> &'a str {
        cli_file
            .or(self.menu.file.as_deref())
            .unwrap_or(crate::DEFAULT_MENU_FILE)
    }
}

// Default functions for serde
const fn default_indent() -> bool {
    true
}
