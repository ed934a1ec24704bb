//! `.desktop` and `.directory` files.
//!
//! Both file kinds are decoded with `freedesktop_desktop_entry` and copied
//! into owned values the tree can share between menus.

use super::error::DesktopFileError;
use freedesktop_desktop_entry::DesktopEntry;
use std::path::{Path, PathBuf};

/// Field codes removed from `Exec` lines
const FIELD_CODES: &[char] = &['f', 'F', 'u', 'U', 'd', 'D', 'n', 'N', 'v', 'm', 'i', 'c', 'k'];

/// Application metadata of a desktop entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Desktop-file ID, e.g. `org.gnome.Calculator.desktop`
    desktop_file_id: String,
    /// File the entry was read from
    path: PathBuf,
    /// Localized display name
    name: String,
    /// `Exec` with field codes removed
    command_line: Option<String>,
    /// `Categories`
    categories: Vec<String>,
    /// `Type`, defaulting to `Application`
    entry_type: String,
    /// `NoDisplay=true`
    no_display: bool,
    /// `Hidden=true`
    hidden: bool,
    /// `OnlyShowIn`
    only_show_in: Vec<String>,
    /// `NotShowIn`
    not_show_in: Vec<String>,
}

impl AppInfo {
    /// Reads a `.desktop` file
    ///
    /// `locales` are tried in order for `Name[locale]`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be decoded or has no `Name`.
    pub fn load(path: &Path, desktop_file_id: String, locales: &[String]) -> Result<Self, DesktopFileError> {
        let entry = DesktopEntry::from_path(path.to_path_buf(), Some(locales)).map_err(|source| {
            DesktopFileError::Decode {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_entry(&entry, path, desktop_file_id, locales)
    }

    /// Parses `.desktop` text
    ///
    /// # Errors
    /// Returns an error if the text cannot be decoded or has no `Name`.
    pub fn parse(
        path: &Path,
        desktop_file_id: String,
        content: &str,
        locales: &[String],
    ) -> Result<Self, DesktopFileError> {
        let entry = DesktopEntry::from_str(path, content, Some(locales)).map_err(|source| {
            DesktopFileError::Decode {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_entry(&entry, path, desktop_file_id, locales)
    }

    /// Copies the keys the resolver needs out of a decoded entry
    fn from_entry(
        entry: &DesktopEntry,
        path: &Path,
        desktop_file_id: String,
        locales: &[String],
    ) -> Result<Self, DesktopFileError> {
        let name = entry
            .name(locales)
            .map(|name| name.into_owned())
            .ok_or_else(|| DesktopFileError::MissingName {
                path: path.to_path_buf(),
            })?;

        Ok(Self {
            desktop_file_id,
            path: path.to_path_buf(),
            name,
            command_line: entry.exec().map(strip_field_codes),
            categories: owned_list(entry.categories()),
            entry_type: entry.type_().unwrap_or("Application").to_string(),
            no_display: entry.no_display(),
            hidden: entry.hidden(),
            only_show_in: owned_list(entry.only_show_in()),
            not_show_in: owned_list(entry.not_show_in()),
        })
    }

    /// Desktop-file ID
    #[must_use]
    pub fn desktop_file_id(&self) -> &str {
        &self.desktop_file_id
    }

    /// File the entry was read from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Command line to hand to a shell
    #[must_use]
    pub fn command_line(&self) -> Option<&str> {
        self.command_line.as_deref()
    }

    /// `Categories`
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Whether the entry is an `Application`
    #[must_use]
    pub fn is_application(&self) -> bool {
        self.entry_type == "Application"
    }

    /// `NoDisplay=true`
    #[must_use]
    pub const fn no_display(&self) -> bool {
        self.no_display
    }

    /// `Hidden=true`; such entries are treated as deleted
    #[must_use]
    pub const fn hidden(&self) -> bool {
        self.hidden
    }

    /// `OnlyShowIn`
    #[must_use]
    pub fn only_show_in(&self) -> &[String] {
        &self.only_show_in
    }

    /// `NotShowIn`
    #[must_use]
    pub fn not_show_in(&self) -> &[String] {
        &self.not_show_in
    }
}

/// Metadata of a `.directory` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryInfo {
    /// Localized display name
    pub name: String,
    /// `NoDisplay=true`
    pub no_display: bool,
}

impl DirectoryInfo {
    /// Reads a `.directory` file
    ///
    /// # Errors
    /// Returns an error if the file cannot be decoded or has no `Name`.
    pub fn load(path: &Path, locales: &[String]) -> Result<Self, DesktopFileError> {
        let entry = DesktopEntry::from_path(path.to_path_buf(), Some(locales)).map_err(|source| {
            DesktopFileError::Decode {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let name = entry
            .name(locales)
            .map(|name| name.into_owned())
            .ok_or_else(|| DesktopFileError::MissingName {
                path: path.to_path_buf(),
            })?;

        Ok(Self {
            name,
            no_display: entry.no_display(),
        })
    }
}

/// Owned list values without empty items
fn owned_list(items: Option<Vec<&str>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Removes desktop-entry field codes from an `Exec` line
///
/// Arguments made of a single field code are dropped and `%%` becomes
/// `%`. When anything was removed the remaining arguments are joined back
/// with shell quoting; otherwise the line is returned as written.
#[must_use]
pub fn strip_field_codes(exec: &str) -> String {
    let exec = exec.trim();
    let Ok(words) = shell_words::split(exec) else {
        // Unbalanced quotes: drop standalone codes and keep the rest verbatim
        return exec
            .split_whitespace()
            .filter(|word| !is_field_code(word))
            .collect::<Vec<_>>()
            .join(" ");
    };

    let stripped: Vec<String> = words
        .iter()
        .filter(|word| !is_field_code(word))
        .map(|word| strip_word(word))
        .collect();

    if stripped == words {
        exec.to_string()
    } else {
        shell_words::join(stripped)
    }
}

/// Whether an argument is exactly one field code such as `%U`
fn is_field_code(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some('%'), Some(code), None) if FIELD_CODES.contains(&code)
    )
}

/// Removes field codes embedded in one argument
fn strip_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut chars = word.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(code) if FIELD_CODES.contains(&code) => {
                chars.next();
            }
            _ => out.push('%'),
        }
    }
    out
}
