use crate::cli::Cli;
use crate::config::Config;
use crate::menu::{MenuTree, MenuTreeFlags, XdgDirs};
use crate::{MenuContext, output, walker};
use anyhow::{Context, Result};
use tracing::debug;

/// What to render, as given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct RenderOptions {
    /// `--file`
    pub menu_file: Option<String>,
    /// `--monitor`; accepted, never acted on
    pub monitor: bool,
    /// `--include-excluded`
    pub include_excluded: bool,
    /// `--include-nodisplay`
    pub include_nodisplay: bool,
    /// `--include-unallocated`
    pub include_unallocated: bool,
}

impl RenderOptions {
    /// Resolver flags for these options and the configuration
    #[must_use]
    pub fn flags(&self, config: &Config) -> MenuTreeFlags {
        let mut flags = MenuTreeFlags::NONE;
        if self.include_excluded {
            flags |= MenuTreeFlags::INCLUDE_EXCLUDED;
        }
        if self.include_nodisplay {
            flags |= MenuTreeFlags::INCLUDE_NODISPLAY;
        }
        if self.include_unallocated {
            flags |= MenuTreeFlags::INCLUDE_UNALLOCATED;
        }
        if config.menu.show_empty {
            flags |= MenuTreeFlags::SHOW_EMPTY;
        }
        flags
    }
}

impl From<Cli> for RenderOptions {
    fn from(cli: Cli) -> Self {
        Self {
            menu_file: cli.file,
            monitor: cli.monitor,
            include_excluded: cli.include_excluded,
            include_nodisplay: cli.include_nodisplay,
            include_unallocated: cli.include_unallocated,
        }
    }
}

/// Execute the render command - print the menu as a property list
///
/// An empty menu prints a warning and `()`.
///
/// # Errors
///
/// Returns an error if the menu file cannot be found, read or parsed.
pub fn execute(ctx: &MenuContext, options: &RenderOptions) -> Result<()> {
    let text = render_to_string(ctx, options)?;
    println!("{text}");
    Ok(())
}

/// Renders the menu using the XDG environment of the process
///
/// # Errors
///
/// Returns an error if the menu cannot be loaded.
pub fn render_to_string(ctx: &MenuContext, options: &RenderOptions) -> Result<String> {
    let xdg = XdgDirs::from_env().context("Failed to load tree")?;
    render_with_dirs(ctx, options, xdg)
}

/// Renders the menu with explicit directory settings
///
/// # Errors
///
/// Returns an error if the menu cannot be loaded.
pub fn render_with_dirs(ctx: &MenuContext, options: &RenderOptions, mut xdg: XdgDirs) -> Result<String> {
    if let Some(locale) = &ctx.config.menu.locale {
        xdg.prefer_locale(locale);
    }
    if options.monitor {
        debug!("monitoring requested; changes to the menu are not watched");
    }

    let menu_file = ctx.config.menu_file(options.menu_file.as_deref());
    let flags = options.flags(&ctx.config);
    debug!(menu_file, ?flags, "rendering menu");

    let mut tree = MenuTree::with_dirs(menu_file, flags, xdg);
    tree.load_sync().context("Failed to load tree")?;

    let root = tree.root_directory();
    if root.is_none() {
        output::warning("Menu tree is empty");
    }

    let plist = walker::render_menu(root);
    Ok(plist.description_with(ctx.config.output.indent))
}
