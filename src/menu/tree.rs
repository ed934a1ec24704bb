//! Arena storage for a resolved menu and the borrowed handles callers use
//! to walk it.
//!
//! Handles are `Copy` views tied to the lifetime of the tree. Nothing a
//! caller holds can outlive the tree or keep nodes alive on its own.

use super::desktop_entry::AppInfo;
use std::fmt;
use std::rc::Rc;

/// Index of a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// A node of the resolved tree
#[derive(Debug)]
pub(crate) enum Node {
    /// A menu
    Directory(DirectoryNode),
    /// An application entry
    Entry(EntryNode),
    /// A layout separator
    Separator(SeparatorNode),
    /// An inline header naming a submenu
    Header(HeaderNode),
    /// An inline alias to another node
    Alias(AliasNode),
}

/// Storage of a directory node
#[derive(Debug)]
pub(crate) struct DirectoryNode {
    /// Display name
    pub name: String,
    /// `<Name>` of the menu
    pub menu_id: String,
    /// Containing directory; `None` for the root
    pub parent: Option<NodeId>,
    /// Children in layout order
    pub children: Vec<NodeId>,
    /// Its `.directory` file says `NoDisplay=true`
    pub no_display: bool,
}

/// Storage of an entry node
#[derive(Debug)]
pub(crate) struct EntryNode {
    /// Application metadata, shared by every menu listing the entry
    pub app: Rc<AppInfo>,
    /// Containing directory
    pub parent: NodeId,
}

/// Storage of a separator node
#[derive(Debug)]
pub(crate) struct SeparatorNode {
    /// Containing directory
    pub parent: NodeId,
}

/// Storage of a header node
#[derive(Debug)]
pub(crate) struct HeaderNode {
    /// Containing directory
    pub parent: NodeId,
    /// Inlined submenu the header stands for
    pub directory: NodeId,
}

/// Storage of an alias node
#[derive(Debug)]
pub(crate) struct AliasNode {
    /// Containing directory
    pub parent: NodeId,
    /// Inlined submenu the alias replaces
    pub directory: NodeId,
    /// Node the alias points at
    pub aliased: NodeId,
}

/// Owner of every node of a tree
#[derive(Debug, Default)]
pub(crate) struct Arena {
    /// Nodes indexed by [`NodeId`]
    nodes: Vec<Node>,
}

impl Arena {
    /// Stores a node and returns its id
    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Looks a node up
    ///
    /// # Panics
    /// Panics if the id does not belong to this arena. Ids only come from
    /// [`Arena::push`], so this is a broken invariant, not a runtime error.
    pub fn get(&self, id: NodeId) -> &Node {
        match self.nodes.get(id.0) {
            Some(node) => node,
            None => panic!("menu tree item {} does not exist", id.0),
        }
    }

    /// Looks a directory node up
    ///
    /// # Panics
    /// Panics if the id is dangling or names another kind of node.
    pub fn directory(&self, id: NodeId) -> &DirectoryNode {
        match self.get(id) {
            Node::Directory(dir) => dir,
            other => panic!("menu tree item {} is not a directory: {other:?}", id.0),
        }
    }

    /// Mutable access to a directory node
    ///
    /// # Panics
    /// Panics if the id is dangling or names another kind of node.
    pub fn directory_mut(&mut self, id: NodeId) -> &mut DirectoryNode {
        match self.nodes.get_mut(id.0) {
            Some(Node::Directory(dir)) => dir,
            Some(_) => panic!("menu tree item {} is not a directory", id.0),
            None => panic!("menu tree item {} does not exist", id.0),
        }
    }

    /// Kind of a node
    pub fn item_type(&self, id: NodeId) -> ItemType {
        match self.get(id) {
            Node::Directory(_) => ItemType::Directory,
            Node::Entry(_) => ItemType::Entry,
            Node::Separator(_) => ItemType::Separator,
            Node::Header(_) => ItemType::Header,
            Node::Alias(_) => ItemType::Alias,
        }
    }

    /// Moves a directory or entry under another directory
    pub fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        match self.nodes.get_mut(id.0) {
            Some(Node::Directory(dir)) => dir.parent = Some(parent),
            Some(Node::Entry(entry)) => entry.parent = parent,
            Some(Node::Separator(sep)) => sep.parent = parent,
            Some(Node::Header(header)) => header.parent = parent,
            Some(Node::Alias(alias)) => alias.parent = parent,
            None => panic!("menu tree item {} does not exist", id.0),
        }
    }

    /// Typed handle for a node
    pub fn item(&self, id: NodeId) -> TreeItem<'_> {
        match self.get(id) {
            Node::Directory(_) => TreeItem::Directory(Directory { arena: self, id }),
            Node::Entry(_) => TreeItem::Entry(Entry { arena: self, id }),
            Node::Separator(_) => TreeItem::Separator(Separator { arena: self, id }),
            Node::Header(_) => TreeItem::Header(Header { arena: self, id }),
            Node::Alias(_) => TreeItem::Alias(Alias { arena: self, id }),
        }
    }

    /// Handle for a node known to be a directory
    pub fn directory_handle(&self, id: NodeId) -> Directory<'_> {
        self.directory(id);
        Directory { arena: self, id }
    }

    /// Number of stored nodes
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Kind of a tree item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// A menu
    Directory,
    /// An application entry
    Entry,
    /// A separator
    Separator,
    /// An inline header
    Header,
    /// An inline alias
    Alias,
}

/// One child of a directory, as yielded by [`Directory::iter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeItem<'a> {
    /// A submenu
    Directory(Directory<'a>),
    /// An application entry
    Entry(Entry<'a>),
    /// A separator
    Separator(Separator<'a>),
    /// An inline header
    Header(Header<'a>),
    /// An inline alias
    Alias(Alias<'a>),
}

impl TreeItem<'_> {
    /// Kind of the item
    #[must_use]
    pub const fn item_type(&self) -> ItemType {
        match self {
            Self::Directory(_) => ItemType::Directory,
            Self::Entry(_) => ItemType::Entry,
            Self::Separator(_) => ItemType::Separator,
            Self::Header(_) => ItemType::Header,
            Self::Alias(_) => ItemType::Alias,
        }
    }
}

/// Generates the shared parts of a handle type
macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name<'a> {
            /// Tree the node lives in
            arena: &'a Arena,
            /// Node within the tree
            id: NodeId,
        }

        impl PartialEq for $name<'_> {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self.arena, other.arena) && self.id == other.id
            }
        }

        impl Eq for $name<'_> {}
    };
}

handle!(
    /// A menu directory
    Directory
);
handle!(
    /// An application entry
    Entry
);
handle!(
    /// A separator
    Separator
);
handle!(
    /// An inline header
    Header
);
handle!(
    /// An inline alias
    Alias
);

impl<'a> Directory<'a> {
    /// Storage of this directory
    fn node(&self) -> &'a DirectoryNode {
        self.arena.directory(self.id)
    }

    /// Display name: the `.directory` file's `Name`, else the menu `<Name>`
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    /// The `<Name>` of the menu
    #[must_use]
    pub fn menu_id(&self) -> &'a str {
        &self.node().menu_id
    }

    /// Containing directory; `None` for the root
    #[must_use]
    pub fn parent(&self) -> Option<Directory<'a>> {
        self.node().parent.map(|id| self.arena.directory_handle(id))
    }

    /// Whether the `.directory` file says `NoDisplay=true`
    #[must_use]
    pub fn is_nodisplay(&self) -> bool {
        self.node().no_display
    }

    /// Children in layout order
    #[must_use]
    pub fn iter(&self) -> DirectoryIter<'a> {
        DirectoryIter {
            arena: self.arena,
            children: self.node().children.iter(),
        }
    }
}

impl<'a> IntoIterator for Directory<'a> {
    type Item = TreeItem<'a>;
    type IntoIter = DirectoryIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Directory<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directory")
            .field("name", &self.name())
            .field("menu_id", &self.menu_id())
            .finish()
    }
}

impl<'a> Entry<'a> {
    /// Storage of this entry
    fn node(&self) -> &'a EntryNode {
        match self.arena.get(self.id) {
            Node::Entry(entry) => entry,
            other => panic!("menu tree item is not an entry: {other:?}"),
        }
    }

    /// Application metadata
    #[must_use]
    pub fn app_info(&self) -> &'a AppInfo {
        &self.node().app
    }

    /// Desktop-file ID
    #[must_use]
    pub fn desktop_file_id(&self) -> &'a str {
        self.app_info().desktop_file_id()
    }

    /// Containing directory
    #[must_use]
    pub fn parent(&self) -> Directory<'a> {
        self.arena.directory_handle(self.node().parent)
    }

    /// `NoDisplay=true`; only present with `INCLUDE_NODISPLAY`
    #[must_use]
    pub fn is_nodisplay(&self) -> bool {
        self.app_info().no_display()
    }
}

impl fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.desktop_file_id())
            .field("name", &self.app_info().name())
            .finish()
    }
}

impl<'a> Separator<'a> {
    /// Containing directory
    #[must_use]
    pub fn parent(&self) -> Directory<'a> {
        match self.arena.get(self.id) {
            Node::Separator(sep) => self.arena.directory_handle(sep.parent),
            other => panic!("menu tree item is not a separator: {other:?}"),
        }
    }
}

impl fmt::Debug for Separator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Separator")
    }
}

impl<'a> Header<'a> {
    /// Storage of this header
    fn node(&self) -> &'a HeaderNode {
        match self.arena.get(self.id) {
            Node::Header(header) => header,
            other => panic!("menu tree item is not a header: {other:?}"),
        }
    }

    /// Containing directory
    #[must_use]
    pub fn parent(&self) -> Directory<'a> {
        self.arena.directory_handle(self.node().parent)
    }

    /// Inlined submenu the header stands for
    #[must_use]
    pub fn directory(&self) -> Directory<'a> {
        self.arena.directory_handle(self.node().directory)
    }
}

impl fmt::Debug for Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Header").field(&self.directory().name()).finish()
    }
}

impl<'a> Alias<'a> {
    /// Storage of this alias
    fn node(&self) -> &'a AliasNode {
        match self.arena.get(self.id) {
            Node::Alias(alias) => alias,
            other => panic!("menu tree item is not an alias: {other:?}"),
        }
    }

    /// Containing directory
    #[must_use]
    pub fn parent(&self) -> Directory<'a> {
        self.arena.directory_handle(self.node().parent)
    }

    /// Inlined submenu the alias replaces
    #[must_use]
    pub fn directory(&self) -> Directory<'a> {
        self.arena.directory_handle(self.node().directory)
    }

    /// Kind of the aliased item
    #[must_use]
    pub fn aliased_item_type(&self) -> ItemType {
        self.arena.item_type(self.node().aliased)
    }

    /// The aliased entry, if the alias points at one
    #[must_use]
    pub fn aliased_entry(&self) -> Option<Entry<'a>> {
        match self.arena.item(self.node().aliased) {
            TreeItem::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    /// The aliased directory, if the alias points at one
    #[must_use]
    pub fn aliased_directory(&self) -> Option<Directory<'a>> {
        match self.arena.item(self.node().aliased) {
            TreeItem::Directory(dir) => Some(dir),
            _ => None,
        }
    }
}

impl fmt::Debug for Alias<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alias")
            .field("type", &self.aliased_item_type())
            .finish()
    }
}

/// Iterator over the children of a directory
#[derive(Clone)]
pub struct DirectoryIter<'a> {
    /// Tree the children live in
    arena: &'a Arena,
    /// Remaining child ids
    children: std::slice::Iter<'a, NodeId>,
}

impl<'a> Iterator for DirectoryIter<'a> {
    type Item = TreeItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.children.next().map(|&id| self.arena.item(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl ExactSizeIterator for DirectoryIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn app(id: &str) -> Rc<AppInfo> {
        let content = format!("[Desktop Entry]\nName={id}\nExec={id}\n");
        Rc::new(AppInfo::parse(Path::new(id), id.to_string(), &content, &[]).unwrap())
    }

    fn directory(arena: &mut Arena, name: &str, parent: Option<NodeId>) -> NodeId {
        let id = arena.push(Node::Directory(DirectoryNode {
            name: name.to_string(),
            menu_id: name.to_string(),
            parent,
            children: Vec::new(),
            no_display: false,
        }));
        if let Some(parent) = parent {
            arena.directory_mut(parent).children.push(id);
        }
        id
    }

    #[test]
    fn test_iteration_yields_typed_items_in_order() {
        let mut arena = Arena::default();
        let root = directory(&mut arena, "Root", None);
        let office = directory(&mut arena, "Office", Some(root));
        let writer = arena.push(Node::Entry(EntryNode {
            app: app("writer"),
            parent: root,
        }));
        let sep = arena.push(Node::Separator(SeparatorNode { parent: root }));
        arena.directory_mut(root).children.extend([writer, sep]);

        let handle = arena.directory_handle(root);
        let kinds: Vec<ItemType> = handle.iter().map(|item| item.item_type()).collect();
        assert_eq!(
            kinds,
            vec![ItemType::Directory, ItemType::Entry, ItemType::Separator]
        );

        let office_handle = arena.directory_handle(office);
        assert_eq!(office_handle.parent(), Some(handle));
        assert_eq!(handle.parent(), None);
        assert_eq!(arena.len(), 4);
    }

    #[test]
    fn test_alias_targets() {
        let mut arena = Arena::default();
        let root = directory(&mut arena, "Root", None);
        let tools = directory(&mut arena, "Tools", None);
        let entry = arena.push(Node::Entry(EntryNode {
            app: app("term"),
            parent: tools,
        }));
        let to_entry = arena.push(Node::Alias(AliasNode {
            parent: root,
            directory: tools,
            aliased: entry,
        }));
        let to_dir = arena.push(Node::Alias(AliasNode {
            parent: root,
            directory: tools,
            aliased: tools,
        }));

        let TreeItem::Alias(alias) = arena.item(to_entry) else {
            panic!("expected alias");
        };
        assert_eq!(alias.aliased_item_type(), ItemType::Entry);
        assert_eq!(alias.aliased_entry().unwrap().desktop_file_id(), "term");
        assert!(alias.aliased_directory().is_none());

        let TreeItem::Alias(alias) = arena.item(to_dir) else {
            panic!("expected alias");
        };
        assert_eq!(alias.aliased_item_type(), ItemType::Directory);
        assert!(alias.aliased_entry().is_none());
        assert_eq!(alias.aliased_directory().unwrap().name(), "Tools");
    }

    #[test]
    #[should_panic(expected = "does not exist")]
    fn test_dangling_item_panics() {
        let arena = Arena::default();
        let _ = arena.item(NodeId(7));
    }

    #[test]
    #[should_panic(expected = "is not a directory")]
    fn test_wrong_kind_panics() {
        let mut arena = Arena::default();
        let sep = arena.push(Node::Separator(SeparatorNode { parent: NodeId(0) }));
        let _ = arena.directory_handle(sep);
    }
}
