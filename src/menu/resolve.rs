//! Turns a parsed [`MenuNode`] document into the arena tree.
//!
//! Resolution runs in three steps: rule evaluation per menu (pass one,
//! recording allocations), `<OnlyUnallocated>` restriction (pass two), then
//! layout into arena nodes with inlining and empty-menu pruning.

use super::MenuTreeFlags;
use super::desktop_entry::{AppInfo, DirectoryInfo};
use super::layout::{Layout, LayoutItem, LayoutOptions, MenuNode, MergeKind};
use super::rules::MenuRule;
use super::tree::{AliasNode, Arena, DirectoryNode, EntryNode, HeaderNode, ItemType, Node, NodeId, SeparatorNode};
use super::xdg::XdgDirs;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{Level, debug, span, trace};
use walkdir::WalkDir;

/// Entries visible to a menu, by desktop-file ID
type Pool = HashMap<String, Rc<AppInfo>>;

/// An entry placed in a menu by its rules
#[derive(Debug, Clone)]
struct Placed {
    /// Application metadata
    app: Rc<AppInfo>,
    /// Removed by an `<Exclude>`
    excluded: bool,
}

/// A menu after rule evaluation and before layout
#[derive(Debug)]
struct Resolved {
    /// `<Name>`
    menu_id: String,
    /// Display name
    name: String,
    /// `.directory` file says `NoDisplay=true`
    no_display: bool,
    /// `<OnlyUnallocated/>` in effect
    only_unallocated: bool,
    /// Entries by desktop-file ID
    entries: BTreeMap<String, Placed>,
    /// Own `<Layout>`
    layout: Option<Layout>,
    /// Own `<DefaultLayout>`
    default_layout: Option<Layout>,
    /// Child menus, deleted ones already dropped
    submenus: Vec<Resolved>,
}

/// Something a `<Merge>` item can place
#[derive(Debug, Clone, Copy)]
enum Pending {
    /// Index into the built submenus
    Menu(usize),
    /// Index into the built entries
    Entry(usize),
}

/// A child directory built for layout
#[derive(Debug)]
struct BuiltMenu {
    /// Arena node
    id: NodeId,
    /// `<Name>`
    menu_id: String,
    /// Display name
    name: String,
}

/// An entry node built for layout
#[derive(Debug)]
struct BuiltEntry {
    /// Arena node
    id: NodeId,
    /// Desktop-file ID
    desktop_file_id: String,
    /// Display name
    name: String,
}

/// State of one resolution
pub(crate) struct Resolver<'a> {
    /// Directory and locale settings
    xdg: &'a XdgDirs,
    /// Inclusion flags
    flags: MenuTreeFlags,
    /// Scanned application directories
    app_dirs: HashMap<PathBuf, Vec<Rc<AppInfo>>>,
    /// IDs placed by a menu without `<OnlyUnallocated/>`
    allocated: HashSet<String>,
    /// Every entry seen in any pool
    all_apps: BTreeMap<String, Rc<AppInfo>>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver
    pub fn new(xdg: &'a XdgDirs, flags: MenuTreeFlags) -> Self {
        Self {
            xdg,
            flags,
            app_dirs: HashMap::new(),
            allocated: HashSet::new(),
            all_apps: BTreeMap::new(),
        }
    }

    /// Resolves a document into an arena and its root directory
    ///
    /// The root is `None` when the root menu is deleted or ends up empty.
    pub fn resolve(mut self, document: &MenuNode) -> (Arena, Option<NodeId>) {
        let _span = span!(Level::DEBUG, "resolve", menu = %document.name).entered();
        let mut arena = Arena::default();

        if document.is_deleted() {
            debug!("root menu is deleted");
            return (arena, None);
        }

        let mut root = self.evaluate(document, &Pool::new(), &[]);
        restrict_unallocated(&mut root, &self.allocated);

        if self.flags.contains(MenuTreeFlags::INCLUDE_UNALLOCATED) {
            let mut placed = BTreeSet::new();
            collect_placed(&root, &mut placed);
            for (id, app) in &self.all_apps {
                if !placed.contains(id) {
                    trace!(id = %id, "adding unallocated entry to root");
                    root.entries.insert(
                        id.clone(),
                        Placed {
                            app: Rc::clone(app),
                            excluded: false,
                        },
                    );
                }
            }
        }

        if !self.flags.contains(MenuTreeFlags::INCLUDE_NODISPLAY) {
            self.filter_hidden(&mut root);
        }

        let fallback = Layout::fallback();
        let root_id = self.build_directory(&mut arena, &root, None, &fallback);

        if arena.directory(root_id).children.is_empty() && !self.flags.contains(MenuTreeFlags::SHOW_EMPTY) {
            debug!("root menu is empty");
            return (arena, None);
        }
        (arena, Some(root_id))
    }

    /// Pass one: evaluates the rules of a menu and its submenus
    fn evaluate(&mut self, node: &MenuNode, parent_pool: &Pool, parent_dir_dirs: &[PathBuf]) -> Resolved {
        let mut pool = parent_pool.clone();
        for dir in &node.app_dirs {
            for app in self.scan_app_dir(dir) {
                pool.insert(app.desktop_file_id().to_string(), app);
            }
        }
        pool.retain(|_, app| app.is_application() && !app.hidden());
        for (id, app) in &pool {
            self.all_apps.entry(id.clone()).or_insert_with(|| Rc::clone(app));
        }

        let mut directory_dirs = parent_dir_dirs.to_vec();
        directory_dirs.extend(node.directory_dirs.iter().cloned());

        let mut entries: BTreeMap<String, Placed> = BTreeMap::new();
        for rule in &node.rules {
            match rule {
                MenuRule::Include(rule) => {
                    for (id, app) in &pool {
                        if rule.matches(app) {
                            entries.insert(
                                id.clone(),
                                Placed {
                                    app: Rc::clone(app),
                                    excluded: false,
                                },
                            );
                        }
                    }
                }
                MenuRule::Exclude(rule) => {
                    for placed in entries.values_mut() {
                        if rule.matches(&placed.app) {
                            placed.excluded = true;
                        }
                    }
                }
            }
        }

        if !self.flags.contains(MenuTreeFlags::INCLUDE_EXCLUDED) {
            entries.retain(|_, placed| !placed.excluded);
        }

        if !node.is_only_unallocated() {
            for (id, placed) in &entries {
                if !placed.excluded {
                    self.allocated.insert(id.clone());
                }
            }
        }

        let directory = self.find_directory_info(&node.directories, &directory_dirs);

        let submenus = node
            .submenus
            .iter()
            .filter(|sub| !sub.is_deleted())
            .map(|sub| self.evaluate(sub, &pool, &directory_dirs))
            .collect();

        debug!(
            menu = %node.name,
            entries = entries.len(),
            pool = pool.len(),
            "evaluated menu rules"
        );

        Resolved {
            menu_id: node.name.clone(),
            name: directory
                .as_ref()
                .map_or_else(|| node.name.clone(), |info| info.name.clone()),
            no_display: directory.as_ref().is_some_and(|info| info.no_display),
            only_unallocated: node.is_only_unallocated(),
            entries,
            layout: node.layout.clone(),
            default_layout: node.default_layout.clone(),
            submenus,
        }
    }

    /// Reads every `.desktop` file under an application directory
    fn scan_app_dir(&mut self, dir: &Path) -> Vec<Rc<AppInfo>> {
        if let Some(apps) = self.app_dirs.get(dir) {
            return apps.clone();
        }

        let mut apps = Vec::new();

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "desktop") {
                continue;
            }
            let Some(id) = desktop_file_id(dir, path) else {
                continue;
            };

            match AppInfo::load(path, id, &self.xdg.locales) {
                Ok(app) => apps.push(Rc::new(app)),
                Err(e) => debug!("skipping desktop file: {e}"),
            }
        }

        debug!(dir = %dir.display(), count = apps.len(), "scanned application directory");
        self.app_dirs.insert(dir.to_path_buf(), apps.clone());
        apps
    }

    /// Looks up the `.directory` file of a menu; the last `<Directory>`
    /// that resolves wins, later directory dirs take priority
    fn find_directory_info(&self, names: &[String], directory_dirs: &[PathBuf]) -> Option<DirectoryInfo> {
        for name in names.iter().rev() {
            for dir in directory_dirs.iter().rev() {
                let path = dir.join(name);
                if !path.is_file() {
                    continue;
                }
                match DirectoryInfo::load(&path, &self.xdg.locales) {
                    Ok(info) => return Some(info),
                    Err(e) => debug!("skipping directory file: {e}"),
                }
            }
        }
        None
    }

    /// Drops `NoDisplay` entries and entries not shown in the current
    /// desktop
    fn filter_hidden(&self, menu: &mut Resolved) {
        menu.entries.retain(|_, placed| {
            !placed.app.no_display()
                && self
                    .xdg
                    .shown_in_current_desktop(placed.app.only_show_in(), placed.app.not_show_in())
        });
        for sub in &mut menu.submenus {
            self.filter_hidden(sub);
        }
    }

    /// Creates the arena nodes of a menu following its layout
    fn build_directory(
        &self,
        arena: &mut Arena,
        menu: &Resolved,
        parent: Option<NodeId>,
        inherited_layout: &Layout,
    ) -> NodeId {
        let dir_id = arena.push(Node::Directory(DirectoryNode {
            name: menu.name.clone(),
            menu_id: menu.menu_id.clone(),
            parent,
            children: Vec::new(),
            no_display: menu.no_display,
        }));

        let default_layout = menu.default_layout.as_ref().unwrap_or(inherited_layout);
        let layout = menu.layout.as_ref().unwrap_or(default_layout);
        let options = LayoutOptions::default()
            .apply(&default_layout.overrides)
            .apply(&layout.overrides);

        let show_nodisplay = self.flags.contains(MenuTreeFlags::INCLUDE_NODISPLAY);
        let submenus: Vec<BuiltMenu> = menu
            .submenus
            .iter()
            .filter(|sub| show_nodisplay || !sub.no_display)
            .map(|sub| BuiltMenu {
                id: self.build_directory(arena, sub, Some(dir_id), default_layout),
                menu_id: sub.menu_id.clone(),
                name: sub.name.clone(),
            })
            .collect();

        let entries: Vec<BuiltEntry> = menu
            .entries
            .iter()
            .map(|(id, placed)| BuiltEntry {
                id: arena.push(Node::Entry(EntryNode {
                    app: Rc::clone(&placed.app),
                    parent: dir_id,
                })),
                desktop_file_id: id.clone(),
                name: placed.app.name().to_string(),
            })
            .collect();

        let mut used_menus = vec![false; submenus.len()];
        let mut used_entries = vec![false; entries.len()];
        let mut children = Vec::new();

        for item in &layout.items {
            match item {
                LayoutItem::Menuname { name, overrides } => {
                    let found = submenus
                        .iter()
                        .enumerate()
                        .find(|(i, sub)| !used_menus[*i] && &sub.menu_id == name);
                    if let Some((i, sub)) = found {
                        used_menus[i] = true;
                        self.place_submenu(arena, dir_id, sub.id, options.apply(overrides), &mut children);
                    }
                }
                LayoutItem::Filename(id) => {
                    let found = entries
                        .iter()
                        .enumerate()
                        .find(|(i, entry)| !used_entries[*i] && &entry.desktop_file_id == id);
                    if let Some((i, entry)) = found {
                        used_entries[i] = true;
                        children.push(entry.id);
                    }
                }
                LayoutItem::Separator => {
                    children.push(arena.push(Node::Separator(SeparatorNode { parent: dir_id })));
                }
                LayoutItem::Merge(kind) => {
                    let mut pending: Vec<(&str, Pending)> = Vec::new();
                    if matches!(kind, MergeKind::Menus | MergeKind::All) {
                        pending.extend(
                            submenus
                                .iter()
                                .enumerate()
                                .filter(|(i, _)| !used_menus[*i])
                                .map(|(i, sub)| (sub.name.as_str(), Pending::Menu(i))),
                        );
                    }
                    if matches!(kind, MergeKind::Files | MergeKind::All) {
                        pending.extend(
                            entries
                                .iter()
                                .enumerate()
                                .filter(|(i, _)| !used_entries[*i])
                                .map(|(i, entry)| (entry.name.as_str(), Pending::Entry(i))),
                        );
                    }
                    pending.sort_by(|(a, _), (b, _)| {
                        a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
                    });

                    for (_, item) in pending {
                        match item {
                            Pending::Menu(i) => {
                                used_menus[i] = true;
                                self.place_submenu(arena, dir_id, submenus[i].id, options, &mut children);
                            }
                            Pending::Entry(i) => {
                                used_entries[i] = true;
                                children.push(entries[i].id);
                            }
                        }
                    }
                }
            }
        }

        arena.directory_mut(dir_id).children = children;
        dir_id
    }

    /// Adds a built submenu to its parent's children, inlining or
    /// pruning it as the options say
    fn place_submenu(
        &self,
        arena: &mut Arena,
        parent: NodeId,
        submenu: NodeId,
        options: LayoutOptions,
        children: &mut Vec<NodeId>,
    ) {
        let sub_children = arena.directory(submenu).children.clone();

        if sub_children.is_empty() {
            if options.show_empty || self.flags.contains(MenuTreeFlags::SHOW_EMPTY) {
                children.push(submenu);
            } else {
                trace!(menu = %arena.directory(submenu).menu_id, "pruning empty menu");
            }
            return;
        }

        if !options.inlines(sub_children.len()) {
            children.push(submenu);
            return;
        }

        if sub_children.len() == 1
            && options.inline_alias
            && matches!(arena.item_type(sub_children[0]), ItemType::Entry | ItemType::Directory)
        {
            children.push(arena.push(Node::Alias(AliasNode {
                parent,
                directory: submenu,
                aliased: sub_children[0],
            })));
            return;
        }

        if options.inline_header {
            children.push(arena.push(Node::Header(HeaderNode {
                parent,
                directory: submenu,
            })));
        }
        for child in sub_children {
            arena.set_parent(child, parent);
            children.push(child);
        }
        arena.directory_mut(submenu).children.clear();
    }
}

/// Pass two: `<OnlyUnallocated/>` menus keep only entries no other menu
/// took in pass one
fn restrict_unallocated(menu: &mut Resolved, allocated: &HashSet<String>) {
    if menu.only_unallocated {
        menu.entries.retain(|id, _| !allocated.contains(id));
    }
    for sub in &mut menu.submenus {
        restrict_unallocated(sub, allocated);
    }
}

/// Collects the IDs of every entry placed anywhere in the tree
fn collect_placed(menu: &Resolved, out: &mut BTreeSet<String>) {
    out.extend(menu.entries.keys().cloned());
    for sub in &menu.submenus {
        collect_placed(sub, out);
    }
}

/// Desktop-file ID of a file under an application directory: the
/// relative path with `/` replaced by `-`
fn desktop_file_id(app_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(app_dir).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("-"))
}
