//! Freedesktop application menus.
//!
//! [`MenuTree`] loads a `.menu` file, evaluates its rules against the
//! installed desktop entries and exposes the result as a tree of borrowed
//! handles rooted at [`MenuTree::root_directory`].

pub mod desktop_entry;
pub mod error;
pub mod layout;
mod resolve;
pub mod rules;
mod tree;
pub mod xdg;

pub use error::{MenuError, MenuResult};
pub use tree::{Alias, Directory, DirectoryIter, Entry, Header, ItemType, Separator, TreeItem};
pub use xdg::XdgDirs;

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::path::{Path, PathBuf};
use tracing::info;
use tree::{Arena, NodeId};

/// Options controlling which entries and menus a tree keeps
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MenuTreeFlags(u32);

impl MenuTreeFlags {
    /// Default behavior
    pub const NONE: Self = Self(0);
    /// Keep entries removed by `<Exclude>` rules
    pub const INCLUDE_EXCLUDED: Self = Self(1);
    /// Keep `NoDisplay` entries and menus, and entries hidden from the
    /// current desktop
    pub const INCLUDE_NODISPLAY: Self = Self(1 << 1);
    /// Add entries no menu took to the root menu
    pub const INCLUDE_UNALLOCATED: Self = Self(1 << 2);
    /// Keep menus with no children
    pub const SHOW_EMPTY: Self = Self(1 << 3);

    /// Whether every flag of `other` is set
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets the flags of `other`
    pub const fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Raw bit value
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for MenuTreeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MenuTreeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Debug for MenuTreeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(MenuTreeFlags, &str); 4] = [
            (MenuTreeFlags::INCLUDE_EXCLUDED, "INCLUDE_EXCLUDED"),
            (MenuTreeFlags::INCLUDE_NODISPLAY, "INCLUDE_NODISPLAY"),
            (MenuTreeFlags::INCLUDE_UNALLOCATED, "INCLUDE_UNALLOCATED"),
            (MenuTreeFlags::SHOW_EMPTY, "SHOW_EMPTY"),
        ];

        let set: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if set.is_empty() {
            f.write_str("NONE")
        } else {
            f.write_str(&set.join(" | "))
        }
    }
}

/// A loaded application menu
#[derive(Debug)]
pub struct MenuTree {
    /// Menu file name or path as given
    menu_file: String,
    /// Inclusion flags
    flags: MenuTreeFlags,
    /// Directory settings used for lookup
    xdg: XdgDirs,
    /// Resolved path of the menu file, once loaded
    canonical_path: Option<PathBuf>,
    /// Node storage
    arena: Arena,
    /// Root directory; `None` until loaded or when the menu is empty
    root: Option<NodeId>,
}

impl MenuTree {
    /// Creates an unloaded tree using the XDG environment of the process
    ///
    /// # Errors
    /// Returns an error if the XDG base directories cannot be determined.
    pub fn new(menu_file: impl Into<String>, flags: MenuTreeFlags) -> MenuResult<Self> {
        Ok(Self::with_dirs(menu_file, flags, XdgDirs::from_env()?))
    }

    /// Creates an unloaded tree with explicit directory settings
    #[must_use]
    pub fn with_dirs(menu_file: impl Into<String>, flags: MenuTreeFlags, xdg: XdgDirs) -> Self {
        Self {
            menu_file: menu_file.into(),
            flags,
            xdg,
            canonical_path: None,
            arena: Arena::default(),
            root: None,
        }
    }

    /// Menu file name or path as given
    #[must_use]
    pub fn menu_file(&self) -> &str {
        &self.menu_file
    }

    /// Inclusion flags
    #[must_use]
    pub const fn flags(&self) -> MenuTreeFlags {
        self.flags
    }

    /// Path of the file that was loaded
    #[must_use]
    pub fn canonical_menu_path(&self) -> Option<&Path> {
        self.canonical_path.as_deref()
    }

    /// Finds, parses and resolves the menu, blocking until done
    ///
    /// Loading again replaces the previous content.
    ///
    /// # Errors
    /// Returns an error if the menu file cannot be found, read or parsed.
    /// Unreadable desktop entries and merged files are skipped.
    pub fn load_sync(&mut self) -> MenuResult<()> {
        let path = self.xdg.find_menu_file(&self.menu_file)?;
        let document = layout::MenuParser::parse_file(&self.xdg, &path)?;

        let (arena, root) = resolve::Resolver::new(&self.xdg, self.flags).resolve(&document);
        info!(
            path = %path.display(),
            flags = ?self.flags,
            empty = root.is_none(),
            "loaded menu"
        );

        self.canonical_path = Some(std::fs::canonicalize(&path).unwrap_or(path));
        self.arena = arena;
        self.root = root;
        Ok(())
    }

    /// Root directory, or `None` if the tree is not loaded or empty
    #[must_use]
    pub fn root_directory(&self) -> Option<Directory<'_>> {
        self.root.map(|id| self.arena.directory_handle(id))
    }
}
