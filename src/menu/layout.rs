//! Menu definition documents.
//!
//! Parses `.menu` XML into a [`MenuNode`] tree, following `<MergeFile>`,
//! `<MergeDir>` and `<DefaultMergeDirs>` and folding same-named sibling
//! menus together. Nothing here touches desktop entries; that happens in
//! the resolver.

use super::error::{MenuError, MenuResult};
use super::rules::{MenuRule, Rule};
use super::xdg::XdgDirs;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span, warn};
use xmltree::{Element, XMLNode};

/// Default `inline_limit`
const DEFAULT_INLINE_LIMIT: usize = 4;

/// One `<Menu>` element after merging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuNode {
    /// `<Name>`
    pub name: String,
    /// `<Directory>` values in document order; the last one found wins
    pub directories: Vec<String>,
    /// `<DirectoryDir>` paths, lowest priority first
    pub directory_dirs: Vec<PathBuf>,
    /// `<AppDir>` paths, lowest priority first
    pub app_dirs: Vec<PathBuf>,
    /// `<Include>`/`<Exclude>` blocks in document order
    pub rules: Vec<MenuRule>,
    /// Last of `<OnlyUnallocated/>` / `<NotOnlyUnallocated/>`
    pub only_unallocated: Option<bool>,
    /// Last of `<Deleted/>` / `<NotDeleted/>`
    pub deleted: Option<bool>,
    /// Last `<Layout>`
    pub layout: Option<Layout>,
    /// Last `<DefaultLayout>`
    pub default_layout: Option<Layout>,
    /// Child menus
    pub submenus: Vec<MenuNode>,
}

impl MenuNode {
    /// Whether the menu only takes otherwise unallocated entries
    #[must_use]
    pub fn is_only_unallocated(&self) -> bool {
        self.only_unallocated.unwrap_or(false)
    }

    /// Whether the menu was removed with `<Deleted/>`
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted.unwrap_or(false)
    }

    /// Appends the content of `other`, letting its single-valued
    /// settings override ours; the name is kept
    fn absorb(&mut self, other: Self) {
        self.directories.extend(other.directories);
        self.directory_dirs.extend(other.directory_dirs);
        self.app_dirs.extend(other.app_dirs);
        self.rules.extend(other.rules);
        if other.only_unallocated.is_some() {
            self.only_unallocated = other.only_unallocated;
        }
        if other.deleted.is_some() {
            self.deleted = other.deleted;
        }
        if other.layout.is_some() {
            self.layout = other.layout;
        }
        if other.default_layout.is_some() {
            self.default_layout = other.default_layout;
        }
        self.submenus.extend(other.submenus);
    }

    /// Folds same-named sibling menus together, recursively
    fn merge_duplicates(&mut self) {
        let mut merged: Vec<Self> = Vec::with_capacity(self.submenus.len());
        for sub in self.submenus.drain(..) {
            if let Some(existing) = merged.iter_mut().find(|m| m.name == sub.name) {
                existing.absorb(sub);
            } else {
                merged.push(sub);
            }
        }
        for sub in &mut merged {
            sub.merge_duplicates();
        }
        self.submenus = merged;
    }
}

/// `<Layout>` or `<DefaultLayout>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    /// Attributes on the layout element itself
    pub overrides: LayoutOverrides,
    /// Layout items in order
    pub items: Vec<LayoutItem>,
}

impl Layout {
    /// The layout used when a menu has none: submenus, then entries
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            overrides: LayoutOverrides::default(),
            items: vec![
                LayoutItem::Merge(MergeKind::Menus),
                LayoutItem::Merge(MergeKind::Files),
            ],
        }
    }
}

/// One item of a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutItem {
    /// `<Menuname>`: place the named submenu here
    Menuname {
        /// Submenu `<Name>`
        name: String,
        /// Attributes on the element
        overrides: LayoutOverrides,
    },
    /// `<Filename>`: place the entry with this desktop-file ID here
    Filename(String),
    /// `<Separator/>`
    Separator,
    /// `<Merge type="..."/>`: place everything not yet placed
    Merge(MergeKind),
}

/// What a `<Merge>` item places
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    /// Remaining submenus
    Menus,
    /// Remaining entries
    Files,
    /// Remaining submenus and entries, interleaved by name
    All,
}

/// Presentation options for placing submenus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Keep the submenu when it has no children
    pub show_empty: bool,
    /// Splice the submenu's children into the parent
    pub inline: bool,
    /// Inline only when the child count is at most this; 0 means no limit
    pub inline_limit: usize,
    /// Put a header before inlined children
    pub inline_header: bool,
    /// Replace a single inlined child with an alias
    pub inline_alias: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            show_empty: false,
            inline: false,
            inline_limit: DEFAULT_INLINE_LIMIT,
            inline_header: true,
            inline_alias: false,
        }
    }
}

impl LayoutOptions {
    /// Applies explicitly set attributes on top of these options
    #[must_use]
    pub fn apply(self, overrides: &LayoutOverrides) -> Self {
        Self {
            show_empty: overrides.show_empty.unwrap_or(self.show_empty),
            inline: overrides.inline.unwrap_or(self.inline),
            inline_limit: overrides.inline_limit.unwrap_or(self.inline_limit),
            inline_header: overrides.inline_header.unwrap_or(self.inline_header),
            inline_alias: overrides.inline_alias.unwrap_or(self.inline_alias),
        }
    }

    /// Whether a submenu with `count` children qualifies for inlining
    #[must_use]
    pub const fn inlines(&self, count: usize) -> bool {
        self.inline && (self.inline_limit == 0 || count <= self.inline_limit)
    }
}

/// Layout attributes that were present on an element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutOverrides {
    /// `show_empty`
    pub show_empty: Option<bool>,
    /// `inline`
    pub inline: Option<bool>,
    /// `inline_limit`
    pub inline_limit: Option<usize>,
    /// `inline_header`
    pub inline_header: Option<bool>,
    /// `inline_alias`
    pub inline_alias: Option<bool>,
}

impl LayoutOverrides {
    /// Reads the layout attributes of an element
    fn from_attributes(attributes: &HashMap<String, String>) -> Self {
        let flag = |key: &str| attributes.get(key).and_then(|v| parse_bool(v));
        Self {
            show_empty: flag("show_empty"),
            inline: flag("inline"),
            inline_limit: attributes
                .get("inline_limit")
                .and_then(|v| v.trim().parse().ok()),
            inline_header: flag("inline_header"),
            inline_alias: flag("inline_alias"),
        }
    }
}

/// Parses `true`/`false` attribute values
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Loads menu files, following merges
pub struct MenuParser<'a> {
    /// Directory settings for `Default*` elements
    xdg: &'a XdgDirs,
    /// Top-level menu file, used for `<DefaultMergeDirs>`
    root_file: PathBuf,
    /// Files on the current merge chain, to break merge cycles
    merging: HashSet<PathBuf>,
}

impl<'a> MenuParser<'a> {
    /// Parses a menu file and everything it merges
    ///
    /// # Errors
    /// Returns an error if the top-level file cannot be read or parsed,
    /// its root is not `<Menu>`, or a menu has no `<Name>`. Problems in
    /// merged files are logged and skipped.
    pub fn parse_file(xdg: &'a XdgDirs, path: &Path) -> MenuResult<MenuNode> {
        let _span = span!(Level::DEBUG, "parse_menu", path = %path.display()).entered();

        let mut parser = Self {
            xdg,
            root_file: path.to_path_buf(),
            merging: HashSet::new(),
        };
        parser.merging.insert(merge_key(path));

        let root = load_root_element(path)?;
        let mut menu = parser.parse_menu(&root, path)?;
        menu.merge_duplicates();
        Ok(menu)
    }

    /// Converts one `<Menu>` element
    fn parse_menu(&mut self, element: &Element, file: &Path) -> MenuResult<MenuNode> {
        let mut menu = self.parse_menu_content(element, file)?;
        if menu.name.is_empty() {
            return Err(MenuError::MissingName {
                path: file.to_path_buf(),
            });
        }
        menu.name = menu.name.trim().to_string();
        Ok(menu)
    }

    /// Converts the children of a `<Menu>` element without requiring a name
    fn parse_menu_content(&mut self, element: &Element, file: &Path) -> MenuResult<MenuNode> {
        let base_dir = file.parent().unwrap_or_else(|| Path::new("."));
        let mut menu = MenuNode::default();

        for child in child_elements(element) {
            match child.name.as_str() {
                "Name" => menu.name = text_of(child),
                "Directory" => menu.directories.push(text_of(child)),
                "DirectoryDir" => menu.directory_dirs.push(resolve_path(base_dir, &text_of(child))),
                "DefaultDirectoryDirs" => menu.directory_dirs.extend(self.xdg.default_directory_dirs()),
                "AppDir" => menu.app_dirs.push(resolve_path(base_dir, &text_of(child))),
                "DefaultAppDirs" => menu.app_dirs.extend(self.xdg.default_app_dirs()),
                "Include" => menu.rules.push(MenuRule::Include(Rule::Or(parse_rules(child)))),
                "Exclude" => menu.rules.push(MenuRule::Exclude(Rule::Or(parse_rules(child)))),
                "OnlyUnallocated" => menu.only_unallocated = Some(true),
                "NotOnlyUnallocated" => menu.only_unallocated = Some(false),
                "Deleted" => menu.deleted = Some(true),
                "NotDeleted" => menu.deleted = Some(false),
                "Layout" => menu.layout = Some(parse_layout(child)),
                "DefaultLayout" => menu.default_layout = Some(parse_layout(child)),
                "Menu" => {
                    let submenu = self.parse_menu(child, file)?;
                    menu.submenus.push(submenu);
                }
                "MergeFile" => {
                    if child.attributes.get("type").is_some_and(|t| t == "parent") {
                        debug!("skipping <MergeFile type=\"parent\"> in {}", file.display());
                        continue;
                    }
                    let path = resolve_path(base_dir, &text_of(child));
                    self.merge_file(&mut menu, &path);
                }
                "MergeDir" => {
                    let dir = resolve_path(base_dir, &text_of(child));
                    self.merge_dir(&mut menu, &dir);
                }
                "DefaultMergeDirs" => {
                    let dirs = self.xdg.default_merge_dirs(&self.root_file);
                    for dir in dirs {
                        self.merge_dir(&mut menu, &dir);
                    }
                }
                "LegacyDir" | "KDELegacyDirs" | "Move" => {
                    debug!("ignoring unsupported <{}> in {}", child.name, file.display());
                }
                other => debug!("ignoring unknown <{other}> in {}", file.display()),
            }
        }

        Ok(menu)
    }

    /// Splices the content of another menu file into `menu`
    fn merge_file(&mut self, menu: &mut MenuNode, path: &Path) {
        if !path.is_file() {
            debug!("merge file {} does not exist", path.display());
            return;
        }
        // A file may be merged from several places, just not from inside itself
        let key = merge_key(path);
        if !self.merging.insert(key.clone()) {
            warn!("merge cycle detected at {}, skipping", path.display());
            return;
        }

        let merged = load_root_element(path).and_then(|root| self.parse_menu_content(&root, path));
        self.merging.remove(&key);
        match merged {
            Ok(content) => {
                debug!("merged {}", path.display());
                menu.absorb(content);
            }
            Err(e) => warn!("failed to merge {}: {e}", path.display()),
        }
    }

    /// Merges every `.menu` file of a directory, in name order
    fn merge_dir(&mut self, menu: &mut MenuNode, dir: &Path) {
        let Ok(read_dir) = fs::read_dir(dir) else {
            debug!("merge dir {} is not readable", dir.display());
            return;
        };

        let mut files: Vec<PathBuf> = read_dir
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "menu"))
            .collect();
        files.sort();

        for file in files {
            self.merge_file(menu, &file);
        }
    }
}

/// Identity of a menu file for cycle detection
fn merge_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Reads a file and returns its `<Menu>` document element
fn load_root_element(path: &Path) -> MenuResult<Element> {
    let content = fs::read(path).map_err(|source| MenuError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root = Element::parse(content.as_slice()).map_err(|source| MenuError::Xml {
        path: path.to_path_buf(),
        source,
    })?;

    if root.name != "Menu" {
        return Err(MenuError::InvalidRoot {
            path: path.to_path_buf(),
            found: root.name,
        });
    }
    Ok(root)
}

/// Element children, skipping text and comments
fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(el) => Some(el),
        _ => None,
    })
}

/// Trimmed text content of an element
fn text_of(element: &Element) -> String {
    element
        .get_text()
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Resolves a path from a menu file against that file's directory
fn resolve_path(base_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Parses the rule children of `<Include>`, `<Exclude>` or a combinator
fn parse_rules(element: &Element) -> Vec<Rule> {
    child_elements(element).filter_map(parse_rule).collect()
}

/// Parses one rule element
fn parse_rule(element: &Element) -> Option<Rule> {
    match element.name.as_str() {
        "Filename" => Some(Rule::Filename(text_of(element))),
        "Category" => Some(Rule::Category(text_of(element))),
        "All" => Some(Rule::All),
        "And" => Some(Rule::And(parse_rules(element))),
        "Or" => Some(Rule::Or(parse_rules(element))),
        "Not" => Some(Rule::Not(parse_rules(element))),
        other => {
            debug!("ignoring unknown rule <{other}>");
            None
        }
    }
}

/// Parses `<Layout>` or `<DefaultLayout>`
fn parse_layout(element: &Element) -> Layout {
    let items = child_elements(element)
        .filter_map(|child| match child.name.as_str() {
            "Menuname" => Some(LayoutItem::Menuname {
                name: text_of(child),
                overrides: LayoutOverrides::from_attributes(&child.attributes),
            }),
            "Filename" => Some(LayoutItem::Filename(text_of(child))),
            "Separator" => Some(LayoutItem::Separator),
            "Merge" => match child.attributes.get("type").map(String::as_str) {
                Some("menus") => Some(LayoutItem::Merge(MergeKind::Menus)),
                Some("files") => Some(LayoutItem::Merge(MergeKind::Files)),
                Some("all") => Some(LayoutItem::Merge(MergeKind::All)),
                other => {
                    debug!("ignoring <Merge> with type {other:?}");
                    None
                }
            },
            other => {
                debug!("ignoring unknown layout item <{other}>");
                None
            }
        })
        .collect();

    Layout {
        overrides: LayoutOverrides::from_attributes(&element.attributes),
        items,
    }
}
