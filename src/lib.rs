#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # wmxdgmenu - XDG application menus for Window Maker
//!
//! wmxdgmenu reads a menu definition written against the freedesktop.org
//! Desktop Menu Specification, resolves it into a tree of directories and
//! application entries, and prints that tree as a WINGs property list that
//! Window Maker can use as a root menu or dock launcher.
//!
//! ## Architecture
//!
//! - [`menu`]: menu resolution (XML loading, merging, desktop entries,
//!   rules, layouts) behind an arena of borrowed handles
//! - [`walker`]: the tree-to-property-list transform
//! - [`plist`]: property-list values and their text description
//! - [`commands`]: the top-level render command
//! - [`config`]: optional TOML configuration
//! - [`output`]: styled stderr messages
//!
//! ## Example Usage
//!
//! ```no_run
//! use wmxdgmenu::menu::{MenuTree, MenuTreeFlags};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut tree = MenuTree::new("applications.menu", MenuTreeFlags::NONE)?;
//! tree.load_sync()?;
//!
//! let plist = wmxdgmenu::walker::render_menu(tree.root_directory());
//! println!("{}", plist.indented_description());
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
pub mod cli;

/// Command implementations.
pub mod commands;

/// Configuration parsing and validation.
pub mod config;

/// Menu resolution: the tree of directories, entries and aliases.
pub mod menu;

/// Styled messages on standard error.
pub mod output;

/// Property-list values and their WINGs text description.
pub mod plist;

/// Conversion of a resolved menu tree into a property list.
pub mod walker;

use anyhow::Result;
use std::path::PathBuf;

/// Current version of the wmxdgmenu binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Menu file used when neither the command line nor the config names one.
pub const DEFAULT_MENU_FILE: &str = "applications.menu";

/// Default configuration file path relative to the user config directory.
pub const DEFAULT_CONFIG_PATH: &str = "wmxdgmenu/config.toml";

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "WMXDGMENU_CONFIG_PATH";

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "WMXDGMENU_LOG";

/// Central context for a wmxdgmenu run.
///
/// Holds the configuration file location (if any) and the loaded settings.
///
/// # Examples
///
/// ```no_run
/// use wmxdgmenu::MenuContext;
///
/// # fn main() -> anyhow::Result<()> {
/// // Load from $WMXDGMENU_CONFIG_PATH or the user config directory
/// let ctx = MenuContext::new()?;
///
/// // Load from an explicit file (for testing)
/// let ctx = MenuContext::new_explicit("/tmp/wmxdgmenu.toml".into())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MenuContext {
    /// Path the configuration was read from, when one could be determined.
    pub config_path: Option<PathBuf>,

    /// Loaded configuration settings.
    pub config: config::Config,
}

impl MenuContext {
    /// Creates a context from the default configuration location.
    ///
    /// `WMXDGMENU_CONFIG_PATH` takes precedence over
    /// `<config dir>/wmxdgmenu/config.toml`. A missing file yields defaults.
    ///
    /// # Errors
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed.
    pub fn new() -> Result<Self> {
        let config_path = if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            Some(PathBuf::from(path))
        } else {
            dirs::config_dir().map(|dir| dir.join(DEFAULT_CONFIG_PATH))
        };

        match config_path {
            Some(path) => Self::new_explicit(path),
            None => Ok(Self::default()),
        }
    }

    /// Creates a context from an explicit configuration file.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn new_explicit(config_path: PathBuf) -> Result<Self> {
        let config = config::Config::load(&config_path)?;
        config::validator::ConfigValidator::new().warn_unknown_fields(&config_path);

        Ok(Self {
            config_path: Some(config_path),
            config,
        })
    }

    /// Creates a context around an already built configuration.
    #[must_use]
    pub const fn with_config(config: config::Config) -> Self {
        Self {
            config_path: None,
            config,
        }
    }
}
