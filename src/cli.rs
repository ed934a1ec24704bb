//! Command-line interface definitions for wmxdgmenu.
//!
//! The CLI definition is shared between the main binary and build tools
//! (like xtask) for man page generation.
//!
//! Note: Field-level documentation doubles as clap help text, so the
//! private-item lint is relaxed here.

#![allow(clippy::missing_docs_in_private_items)]

use clap::Parser;

/// Main CLI structure for wmxdgmenu.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "wmxdgmenu",
    version = crate::VERSION,
    about = "Generate a Window Maker menu from XDG menu files",
    long_about = "Reads a freedesktop.org application menu and prints it as a WINGs \
                  property list that Window Maker can use as its root menu"
)]
pub struct Cli {
    /// Menu file to load, by name or path
    #[arg(short, long, value_name = "MENU_FILE")]
    pub file: Option<String>,

    /// Monitor the menu for changes (accepted for compatibility, has no effect)
    #[arg(short, long)]
    pub monitor: bool,

    /// Include entries removed by <Exclude> rules
    #[arg(short = 'i', long)]
    pub include_excluded: bool,

    /// Include entries marked NoDisplay
    #[arg(short = 'n', long)]
    pub include_nodisplay: bool,

    /// Include entries not allocated to any menu
    #[arg(short = 'u', long)]
    pub include_unallocated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["wmxdgmenu"]).unwrap();
        assert_eq!(cli.file, None);
        assert!(!cli.monitor);
        assert!(!cli.include_excluded);
        assert!(!cli.include_nodisplay);
        assert!(!cli.include_unallocated);
    }

    #[test]
    fn test_short_flags() {
        let cli =
            Cli::try_parse_from(["wmxdgmenu", "-f", "kde.menu", "-m", "-i", "-n", "-u"]).unwrap();
        assert_eq!(cli.file.as_deref(), Some("kde.menu"));
        assert!(cli.monitor && cli.include_excluded && cli.include_nodisplay && cli.include_unallocated);
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "wmxdgmenu",
            "--file=/etc/xdg/menus/applications.menu",
            "--include-nodisplay",
        ])
        .unwrap();
        assert_eq!(cli.file.as_deref(), Some("/etc/xdg/menus/applications.menu"));
        assert!(cli.include_nodisplay);
        assert!(!cli.include_excluded);
    }

    #[test]
    fn test_rejects_unknown_flags_and_arguments() {
        assert!(Cli::try_parse_from(["wmxdgmenu", "--verbose"]).is_err());
        assert!(Cli::try_parse_from(["wmxdgmenu", "extra"]).is_err());
    }
}
