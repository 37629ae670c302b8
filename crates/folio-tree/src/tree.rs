//! Document tree.
//!
//! # Architecture
//!
//! Nodes are stored in a flat `Vec<Node>` owned by [`Tree`] and addressed by
//! [`NodeId`]. Each node records its parent index; each directory records an
//! ordered list of child indices plus a key index for O(1) lookup by URI.
//! The directory's index page is stored as the child's key, never as a second
//! owner of the child.
//!
//! Node 0 is always the root directory. All mutation goes through `Tree`
//! methods so key uniqueness and index-page validity are enforced in one
//! place.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::error::TreeError;
use crate::filename::SortKey;

/// Index of a node inside its [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the tree's storage.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index page state of a directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IndexPage {
    /// Children are still being discovered.
    #[default]
    Pending,
    /// No child qualifies as the index page.
    Absent,
    /// Key of the child acting as the index page.
    Page(String),
}

/// Directory node data.
#[derive(Clone, Debug, Default)]
pub struct Directory {
    path: Option<PathBuf>,
    children: Vec<NodeId>,
    keys: HashMap<String, NodeId>,
    index_page: IndexPage,
}

impl Directory {
    /// Backing filesystem path (None for synthetic directories).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Child ids in display order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Current index page state.
    #[must_use]
    pub fn index_page(&self) -> &IndexPage {
        &self.index_page
    }

    /// Insert under `key`, replacing any existing child in place.
    ///
    /// Returns the replaced child.
    fn insert(&mut self, key: String, id: NodeId) -> Option<NodeId> {
        let replaced = self.keys.insert(key, id);
        match replaced {
            Some(old) => {
                if let Some(slot) = self.children.iter_mut().find(|c| **c == old) {
                    *slot = id;
                }
            }
            None => self.children.push(id),
        }
        replaced
    }
}

/// Document leaf data.
#[derive(Clone, Debug, Default)]
pub struct Content {
    path: Option<PathBuf>,
    modified: Option<SystemTime>,
    body: Option<String>,
    first_page: Option<NodeId>,
}

impl Content {
    /// Source file (None for synthetic pages).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Modification time recorded when the file was discovered.
    #[must_use]
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Body assigned in memory. Discovered files have none until read downstream.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// First page of the containing directory, set on index pages.
    #[must_use]
    pub fn first_page(&self) -> Option<NodeId> {
        self.first_page
    }
}

/// Pass-through file data.
#[derive(Clone, Debug)]
pub struct Raw {
    path: PathBuf,
    modified: SystemTime,
}

impl Raw {
    /// Source file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time recorded when the file was discovered.
    #[must_use]
    pub fn modified(&self) -> SystemTime {
        self.modified
    }
}

/// Kind-specific node data.
#[derive(Clone, Debug)]
pub enum NodeKind {
    Directory(Directory),
    Content(Content),
    Raw(Raw),
}

/// A node of the document tree.
#[derive(Clone, Debug)]
pub struct Node {
    parent: Option<NodeId>,
    uri: String,
    title: String,
    name: String,
    kind: NodeKind,
}

impl Node {
    fn new(uri: String, name: String, title: String, kind: NodeKind) -> Self {
        Self {
            parent: None,
            uri,
            title,
            name,
            kind,
        }
    }

    /// New directory node.
    pub(crate) fn directory(
        uri: String,
        name: String,
        title: String,
        path: Option<PathBuf>,
    ) -> Self {
        let dir = Directory {
            path,
            ..Directory::default()
        };
        Self::new(uri, name, title, NodeKind::Directory(dir))
    }

    /// New content node.
    pub(crate) fn content(
        uri: String,
        name: String,
        title: String,
        path: Option<PathBuf>,
        modified: Option<SystemTime>,
        body: Option<String>,
    ) -> Self {
        let content = Content {
            path,
            modified,
            body,
            first_page: None,
        };
        Self::new(uri, name, title, NodeKind::Content(content))
    }

    /// New raw file node.
    pub(crate) fn raw(
        uri: String,
        name: String,
        title: String,
        path: PathBuf,
        modified: SystemTime,
    ) -> Self {
        Self::new(uri, name, title, NodeKind::Raw(Raw { path, modified }))
    }

    /// Identifier of this node within its parent.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Raw name (filename without extension). Determines sibling order.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning directory; None for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Kind label without the data.
    #[must_use]
    pub fn kind_tag(&self) -> NodeKindTag {
        match self.kind {
            NodeKind::Directory(_) => NodeKindTag::Directory,
            NodeKind::Content(_) => NodeKindTag::Content,
            NodeKind::Raw(_) => NodeKindTag::Raw,
        }
    }

    /// Directory data if this node is a directory.
    #[must_use]
    pub fn as_directory(&self) -> Option<&Directory> {
        match &self.kind {
            NodeKind::Directory(dir) => Some(dir),
            _ => None,
        }
    }

    /// Content data if this node is a document.
    #[must_use]
    pub fn as_content(&self) -> Option<&Content> {
        match &self.kind {
            NodeKind::Content(content) => Some(content),
            _ => None,
        }
    }

    /// Raw data if this node is a pass-through file.
    #[must_use]
    pub fn as_raw(&self) -> Option<&Raw> {
        match &self.kind {
            NodeKind::Raw(raw) => Some(raw),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory(_))
    }

    #[must_use]
    pub fn is_content(&self) -> bool {
        matches!(self.kind, NodeKind::Content(_))
    }

    /// Backing filesystem path, if any.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        match &self.kind {
            NodeKind::Directory(dir) => dir.path(),
            NodeKind::Content(content) => content.path(),
            NodeKind::Raw(raw) => Some(raw.path()),
        }
    }

    /// Modification time, for leaves discovered on disk.
    #[must_use]
    pub fn modified(&self) -> Option<SystemTime> {
        match &self.kind {
            NodeKind::Directory(_) => None,
            NodeKind::Content(content) => content.modified(),
            NodeKind::Raw(raw) => Some(raw.modified()),
        }
    }
}

/// Hierarchical document tree rooted at a single directory.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree holding only its root directory.
    ///
    /// The root is populated by [`build`](crate::build).
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        let root = Node::directory(
            String::new(),
            String::new(),
            title.into(),
            Some(path.into()),
        );
        Self { nodes: vec![root] }
    }

    /// Create a tree whose root has no backing directory.
    ///
    /// Useful for trees made entirely of synthetic nodes.
    pub fn empty(title: impl Into<String>) -> Self {
        let root = Node::directory(String::new(), String::new(), title.into(), None);
        Self { nodes: vec![root] }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Whether `id` is the root directory.
    #[must_use]
    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root()
    }

    /// Get a node.
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes ever created, including replaced duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    /// Children of a directory in display order. Empty for leaves.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .as_directory()
            .map(Directory::children)
            .unwrap_or_default()
    }

    /// Look up a child of a directory by key.
    #[must_use]
    pub fn child(&self, dir: NodeId, key: &str) -> Option<NodeId> {
        self.get(dir).as_directory()?.keys.get(key).copied()
    }

    /// Resolved index page of a directory.
    #[must_use]
    pub fn index_page(&self, dir: NodeId) -> Option<NodeId> {
        match self.get(dir).as_directory()?.index_page() {
            IndexPage::Page(key) => self.child(dir, key),
            IndexPage::Pending | IndexPage::Absent => None,
        }
    }

    /// First document of a directory, not counting its index page.
    ///
    /// Direct children are preferred; otherwise subdirectories are searched
    /// in display order. Index pages of subdirectories do count, so a section
    /// holding only an index page still yields it.
    #[must_use]
    pub fn first_page(&self, dir: NodeId) -> Option<NodeId> {
        self.first_page_excluding(dir, self.index_page(dir))
    }

    fn first_page_excluding(&self, dir: NodeId, exclude: Option<NodeId>) -> Option<NodeId> {
        let children = self.get(dir).as_directory()?.children();

        children
            .iter()
            .copied()
            .find(|&c| self.get(c).is_content() && Some(c) != exclude)
            .or_else(|| {
                children
                    .iter()
                    .filter(|&&c| self.get(c).is_directory())
                    .find_map(|&c| self.first_page_excluding(c, None))
            })
    }

    /// URL of a node relative to the root: URIs joined with `/`.
    ///
    /// The root's URL is empty.
    #[must_use]
    pub fn url(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            segments.push(self.get(current).uri());
            current = parent;
        }
        segments.reverse();
        segments.join("/")
    }

    /// Find a node by URL as produced by [`Tree::url`].
    #[must_use]
    pub fn find(&self, url: &str) -> Option<NodeId> {
        let url = url.trim_matches('/');
        if url.is_empty() {
            return Some(self.root());
        }
        url.split('/')
            .try_fold(self.root(), |dir, key| self.child(dir, key))
    }

    /// Depth-first pre-order iteration starting at the root.
    pub fn walk(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev().copied());
            Some(id)
        })
    }

    /// Attach a new node to a directory.
    ///
    /// A child with the same URI is replaced in place; the replaced node stays
    /// in storage but is no longer reachable from its parent.
    pub(crate) fn attach(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId, TreeError> {
        let id = NodeId(self.nodes.len());
        let key = node.uri.clone();
        node.parent = Some(parent);

        let dir = self.directory_mut(parent)?;
        if dir.insert(key, id).is_some() {
            tracing::debug!(uri = %node.uri, "Duplicate identifier, replacing previous entry");
        }
        self.nodes.push(node);
        Ok(id)
    }

    pub(crate) fn set_first_page(&mut self, id: NodeId, first_page: Option<NodeId>) {
        if let NodeKind::Content(content) = &mut self.nodes[id.0].kind {
            content.first_page = first_page;
        }
    }

    /// Set the index page of a directory.
    ///
    /// An [`IndexPage::Page`] key must name an existing child.
    pub(crate) fn set_index_page(
        &mut self,
        dir: NodeId,
        index_page: IndexPage,
    ) -> Result<(), TreeError> {
        if let IndexPage::Page(key) = &index_page
            && self.child(dir, key).is_none()
        {
            return Err(TreeError::UnknownChild {
                dir: self.url(dir),
                key: key.clone(),
            });
        }
        self.directory_mut(dir)?.index_page = index_page;
        Ok(())
    }

    /// Assign the body of a content node.
    pub fn set_body(&mut self, id: NodeId, body: impl Into<String>) -> Result<(), TreeError> {
        if let NodeKind::Content(content) = &mut self.nodes[id.0].kind {
            content.body = Some(body.into());
            return Ok(());
        }
        Err(TreeError::NotContent(self.url(id)))
    }

    /// Sort a directory's children by the ordering key of their names.
    pub(crate) fn sort_children(&mut self, dir: NodeId, index_key: &str) {
        let Some(children) = self.get(dir).as_directory().map(Directory::children) else {
            return;
        };
        let mut keyed: Vec<(SortKey, NodeId)> = children
            .iter()
            .map(|&c| (SortKey::new(self.get(c).name(), index_key), c))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        if let NodeKind::Directory(d) = &mut self.nodes[dir.0].kind {
            d.children = keyed.into_iter().map(|(_, id)| id).collect();
        }
    }

    fn directory_mut(&mut self, id: NodeId) -> Result<&mut Directory, TreeError> {
        let url = self.url(id);
        match &mut self.nodes[id.0].kind {
            NodeKind::Directory(dir) => Ok(dir),
            NodeKind::Content(_) | NodeKind::Raw(_) => Err(TreeError::NotADirectory(url)),
        }
    }

    /// Serializable snapshot of the whole tree.
    #[must_use]
    pub fn dump(&self) -> TreeDump {
        self.dump_node(self.root())
    }

    fn dump_node(&self, id: NodeId) -> TreeDump {
        let node = self.get(id);
        let index_page = self.index_page(id).map(|i| self.url(i));
        let first_page = node
            .as_content()
            .and_then(Content::first_page)
            .map(|p| self.url(p));

        TreeDump {
            kind: node.kind_tag(),
            title: node.title().to_owned(),
            name: node.name().to_owned(),
            uri: node.uri().to_owned(),
            url: self.url(id),
            path: node.source_path().map(Path::to_path_buf),
            modified: node
                .modified()
                .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs()),
            index_page,
            first_page,
            children: self.children(id).iter().map(|&c| self.dump_node(c)).collect(),
        }
    }
}

/// Node kind label in a [`TreeDump`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKindTag {
    Directory,
    Content,
    Raw,
}

/// Owned, serializable view of a subtree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreeDump {
    pub kind: NodeKindTag,
    pub title: String,
    pub name: String,
    pub uri: String,
    /// URL relative to the root.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Modification time in seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<u64>,
    /// URL of the index page (directories only).
    #[serde(rename = "indexPage", skip_serializing_if = "Option::is_none")]
    pub index_page: Option<String>,
    /// URL of the first page (index pages only).
    #[serde(rename = "firstPage", skip_serializing_if = "Option::is_none")]
    pub first_page: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeDump>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(uri: &str) -> Node {
        Node::content(
            uri.to_owned(),
            uri.to_owned(),
            uri.to_owned(),
            None,
            None,
            None,
        )
    }

    fn dir(uri: &str) -> Node {
        Node::directory(uri.to_owned(), uri.to_owned(), uri.to_owned(), None)
    }

    #[test]
    fn test_new_tree_has_root_only() {
        let tree = Tree::empty("Site");
        let root = tree.root();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_root(root));
        assert!(tree.parent(root).is_none());
        assert_eq!(tree.get(root).title(), "Site");
        assert_eq!(
            tree.get(root).as_directory().unwrap().index_page(),
            &IndexPage::Pending
        );
    }

    #[test]
    fn test_attach_and_lookup() {
        let mut tree = Tree::empty("Site");
        let root = tree.root();
        let guide = tree.attach(root, dir("guide")).unwrap();
        let setup = tree.attach(guide, page("setup")).unwrap();

        assert_eq!(tree.child(root, "guide"), Some(guide));
        assert_eq!(tree.child(guide, "setup"), Some(setup));
        assert_eq!(tree.parent(setup), Some(guide));
        assert_eq!(tree.url(setup), "guide/setup");
        assert_eq!(tree.find("guide/setup"), Some(setup));
        assert_eq!(tree.find("/guide/"), Some(guide));
        assert_eq!(tree.find(""), Some(root));
        assert_eq!(tree.find("guide/missing"), None);
    }

    #[test]
    fn test_attach_to_leaf_fails() {
        let mut tree = Tree::empty("Site");
        let leaf = tree.attach(tree.root(), page("a")).unwrap();
        let result = tree.attach(leaf, page("b"));
        assert!(matches!(result, Err(TreeError::NotADirectory(url)) if url == "a"));
    }

    #[test]
    fn test_duplicate_uri_last_wins_in_place() {
        let mut tree = Tree::empty("Site");
        let root = tree.root();
        let first = tree.attach(root, page("a")).unwrap();
        tree.attach(root, page("b")).unwrap();
        let second = tree.attach(root, page("a")).unwrap();

        assert_ne!(first, second);
        assert_eq!(tree.child(root, "a"), Some(second));
        assert_eq!(tree.children(root).len(), 2);
        assert_eq!(tree.children(root)[0], second);
    }

    #[test]
    fn test_index_page_must_be_child() {
        let mut tree = Tree::empty("Site");
        let root = tree.root();
        let result = tree.set_index_page(root, IndexPage::Page("index".to_owned()));
        assert!(matches!(result, Err(TreeError::UnknownChild { .. })));

        let index = tree.attach(root, page("index")).unwrap();
        tree.set_index_page(root, IndexPage::Page("index".to_owned()))
            .unwrap();
        assert_eq!(tree.index_page(root), Some(index));

        tree.set_index_page(root, IndexPage::Absent).unwrap();
        assert_eq!(tree.index_page(root), None);
    }

    #[test]
    fn test_first_page_skips_index_and_descends() {
        let mut tree = Tree::empty("Site");
        let root = tree.root();
        let index = tree.attach(root, page("index")).unwrap();
        tree.set_index_page(root, IndexPage::Page("index".to_owned()))
            .unwrap();
        assert_eq!(tree.first_page(root), None);

        let sub = tree.attach(root, dir("sub")).unwrap();
        let nested = tree.attach(sub, page("nested")).unwrap();
        assert_eq!(tree.first_page(root), Some(nested));

        let direct = tree.attach(root, page("direct")).unwrap();
        assert_eq!(tree.first_page(root), Some(direct));
        assert_ne!(tree.first_page(root), Some(index));
    }

    #[test]
    fn test_first_page_includes_nested_index() {
        let mut tree = Tree::empty("Site");
        let root = tree.root();
        tree.attach(root, page("index")).unwrap();
        tree.set_index_page(root, IndexPage::Page("index".to_owned()))
            .unwrap();

        let guide = tree.attach(root, dir("guide")).unwrap();
        let guide_index = tree.attach(guide, page("index")).unwrap();
        tree.set_index_page(guide, IndexPage::Page("index".to_owned()))
            .unwrap();

        assert_eq!(tree.first_page(guide), None);
        assert_eq!(tree.first_page(root), Some(guide_index));
    }

    #[test]
    fn test_attach_under_leaf_reports_url() {
        let mut tree = Tree::empty("Site");
        let root = tree.root();
        let guide = tree.attach(root, dir("guide")).unwrap();
        let leaf = tree.attach(guide, page("intro")).unwrap();

        let err = tree.attach(leaf, page("nested")).unwrap_err();
        assert!(matches!(err, TreeError::NotADirectory(url) if url == "guide/intro"));
    }

    #[test]
    fn test_node_accessors() {
        let mut tree = Tree::empty("Site");
        let root = tree.root();
        let leaf = tree.attach(root, page("a")).unwrap();

        assert_eq!(root.index(), 0);
        assert_eq!(leaf.index(), 1);
        assert!(matches!(tree.get(root).kind(), NodeKind::Directory(_)));
        assert!(matches!(tree.get(leaf).kind(), NodeKind::Content(_)));
        assert_eq!(tree.get(leaf).kind_tag(), NodeKindTag::Content);
    }

    #[test]
    fn test_set_body() {
        let mut tree = Tree::empty("Site");
        let root = tree.root();
        let leaf = tree.attach(root, page("a")).unwrap();
        tree.set_body(leaf, "# A").unwrap();
        assert_eq!(tree.get(leaf).as_content().unwrap().body(), Some("# A"));
        assert!(matches!(
            tree.set_body(root, "x"),
            Err(TreeError::NotContent(_))
        ));
    }

    #[test]
    fn test_sort_children_by_name() {
        let mut tree = Tree::empty("Site");
        let root = tree.root();
        for name in ["10_c", "b", "2_a", "index"] {
            let node = Node::content(
                name.to_owned(),
                name.to_owned(),
                String::new(),
                None,
                None,
                None,
            );
            tree.attach(root, node).unwrap();
        }
        tree.sort_children(root, "index");

        let names: Vec<_> = tree
            .children(root)
            .iter()
            .map(|&c| tree.get(c).name())
            .collect();
        assert_eq!(names, vec!["index", "2_a", "10_c", "b"]);
    }

    #[test]
    fn test_walk_is_preorder() {
        let mut tree = Tree::empty("Site");
        let root = tree.root();
        let a = tree.attach(root, dir("a")).unwrap();
        let a1 = tree.attach(a, page("a1")).unwrap();
        let b = tree.attach(root, page("b")).unwrap();

        let order: Vec<_> = tree.walk().collect();
        assert_eq!(order, vec![root, a, a1, b]);
    }

    #[test]
    fn test_dump() {
        let mut tree = Tree::empty("Site");
        let root = tree.root();
        tree.attach(root, page("index")).unwrap();
        tree.set_index_page(root, IndexPage::Page("index".to_owned()))
            .unwrap();

        let dump = tree.dump();
        assert_eq!(dump.kind, NodeKindTag::Directory);
        assert_eq!(dump.title, "Site");
        assert_eq!(dump.index_page.as_deref(), Some("index"));
        assert_eq!(dump.children.len(), 1);
        assert_eq!(dump.children[0].url, "index");
        assert_eq!(dump.children[0].kind, NodeKindTag::Content);
    }
}
