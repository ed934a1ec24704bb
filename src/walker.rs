//! Walks a resolved menu and builds the property list Window Maker reads.
//!
//! Each directory becomes an array headed by its name, followed by one
//! element per rendered child in the order the resolver laid them out.
//! Entries become `(Name, SHEXEC, command)`.

use crate::menu::{Directory, Entry, TreeItem};
use crate::plist::PropList;
use tracing::{Level, span, trace};

/// Tag telling Window Maker to run the command through a shell
pub const SHEXEC: &str = "SHEXEC";

/// Slash-delimited path of a directory from the root
///
/// The root is `/`; `Root/A/B` is `/A/B/`.
#[must_use]
pub fn directory_path(dir: &Directory<'_>) -> String {
    let mut path = String::new();
    append_directory_path(dir, &mut path);
    path
}

/// Writes the ancestors' segments before our own
fn append_directory_path(dir: &Directory<'_>, path: &mut String) {
    match dir.parent() {
        None => path.push('/'),
        Some(parent) => {
            append_directory_path(&parent, path);
            path.push_str(dir.name());
            path.push('/');
        }
    }
}

/// Display form of a path from [`directory_path`]: `/` for the root,
/// otherwise without the leading slash
#[must_use]
pub fn display_path(path: &str) -> &str {
    if path == "/" {
        path
    } else {
        path.strip_prefix('/').unwrap_or(path)
    }
}

/// Renders an entry as `(Name, SHEXEC, command)`
///
/// An entry without a command line gets an empty command.
#[must_use]
pub fn render_entry(entry: &Entry<'_>) -> PropList {
    let app = entry.app_info();
    PropList::array([
        PropList::string(app.name()),
        PropList::string(SHEXEC),
        PropList::string(app.command_line().unwrap_or_default()),
    ])
}

/// Renders a directory and appends it to `parent`
///
/// Headers and separators have no representation and are skipped, as are
/// aliases of anything but an entry.
pub fn render_directory(dir: &Directory<'_>, parent: &mut PropList) {
    let path = directory_path(dir);
    let _span = span!(Level::DEBUG, "directory", path = display_path(&path)).entered();

    let mut list = PropList::array([PropList::string(dir.name())]);
    for item in dir.iter() {
        match item {
            TreeItem::Entry(entry) => list.push(render_entry(&entry)),
            TreeItem::Directory(sub) => render_directory(&sub, &mut list),
            TreeItem::Alias(alias) => match alias.aliased_entry() {
                Some(entry) => list.push(render_entry(&entry)),
                None => trace!(item_type = ?alias.aliased_item_type(), "skipping alias"),
            },
            TreeItem::Header(_) | TreeItem::Separator(_) => {}
        }
    }
    parent.push(list);
}

/// Renders a whole menu
///
/// Returns the root directory's array, or `()` when there is no root.
#[must_use]
pub fn render_menu(root: Option<Directory<'_>>) -> PropList {
    let Some(root) = root else {
        return PropList::empty_array();
    };

    let mut top = PropList::empty_array();
    render_directory(&root, &mut top);
    top.into_item(0).unwrap_or_else(PropList::empty_array)
}
