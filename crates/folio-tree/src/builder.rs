//! Document tree building by filesystem walking.
//!
//! [`build`] walks one directory, attaches a node for every entry that
//! survives the ignore rules, recurses into subdirectories, then sorts the
//! children and resolves the directory's index page. Directories that cannot
//! be listed are left empty: a permission problem deep in the source tree
//! must not abort the whole build.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use folio_config::{CONFIG_FILENAME, IgnoreConfig, SiteConfig};

use crate::error::TreeError;
use crate::filename::{title_from_filename, uri_from_filename};
use crate::tree::{Directory, IndexPage, Node, NodeId, Tree};

/// File and folder names skipped during a build.
///
/// Rules apply by exact entry name at every depth.
#[derive(Clone, Debug, Default)]
pub struct IgnoreRules {
    files: HashSet<String>,
    folders: HashSet<String>,
}

impl IgnoreRules {
    /// Create rules from file and folder names.
    pub fn new<F, D>(files: F, folders: D) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            folders: folders.into_iter().map(Into::into).collect(),
        }
    }

    /// Copy of these rules with one more ignored file name.
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>) -> Self {
        self.files.insert(name.into());
        self
    }

    /// Copy of these rules with one more ignored folder name.
    #[must_use]
    pub fn with_folder(mut self, name: impl Into<String>) -> Self {
        self.folders.insert(name.into());
        self
    }

    #[must_use]
    pub fn ignores_file(&self, name: &str) -> bool {
        self.files.contains(name)
    }

    #[must_use]
    pub fn ignores_folder(&self, name: &str) -> bool {
        self.folders.contains(name)
    }
}

impl From<&IgnoreConfig> for IgnoreRules {
    fn from(config: &IgnoreConfig) -> Self {
        Self::new(config.files.iter().cloned(), config.folders.iter().cloned())
    }
}

/// Build a complete tree from a source directory.
///
/// The root takes its title from `config.title`.
///
/// # Errors
///
/// Returns `TreeError::RootNotFound` or `TreeError::RootNotDirectory` if
/// `source_dir` cannot serve as the root. Problems below the root never
/// produce errors.
pub fn build_tree(
    source_dir: &Path,
    ignore: &IgnoreRules,
    config: &SiteConfig,
) -> Result<Tree, TreeError> {
    if !source_dir.exists() {
        return Err(TreeError::RootNotFound(source_dir.to_path_buf()));
    }
    if !source_dir.is_dir() {
        return Err(TreeError::RootNotDirectory(source_dir.to_path_buf()));
    }

    let mut tree = Tree::new(source_dir, config.title.clone());
    let root = tree.root();
    build(&mut tree, root, ignore, config);

    tracing::info!(
        path = %source_dir.display(),
        node_count = tree.len(),
        "Document tree built"
    );

    Ok(tree)
}

/// Populate a directory node from its backing path, recursively.
///
/// At the root, [`CONFIG_FILENAME`] is ignored in addition to `ignore`;
/// subdirectories receive `ignore` unchanged. Entries are processed in
/// filename order, so when two entries derive the same URI the one with the
/// greater filename wins.
pub fn build(tree: &mut Tree, dir: NodeId, ignore: &IgnoreRules, config: &SiteConfig) {
    let Some(dir_path) = tree
        .get(dir)
        .as_directory()
        .and_then(Directory::path)
        .map(Path::to_path_buf)
    else {
        tracing::debug!(url = %tree.url(dir), "No backing directory, nothing to build");
        return;
    };

    let Ok(read_dir) = fs::read_dir(&dir_path) else {
        tracing::debug!(path = %dir_path.display(), "Cannot list directory, leaving it empty");
        return;
    };

    let mut entries: Vec<(String, PathBuf)> = read_dir
        .filter_map(Result::ok)
        .filter_map(|e| {
            let path = e.path();
            match e.file_name().into_string() {
                Ok(name) => Some((name, path)),
                Err(name) => {
                    tracing::warn!(name = ?name, "Skipping entry with non UTF-8 name");
                    None
                }
            }
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let root_rules;
    let rules = if tree.is_root(dir) {
        root_rules = ignore.clone().with_file(CONFIG_FILENAME);
        &root_rules
    } else {
        ignore
    };

    for (file_name, path) in entries {
        if path.is_dir() {
            if rules.ignores_folder(&file_name) {
                continue;
            }
            let name = file_stem(&file_name);
            let node = Node::directory(
                uri_from_filename(&file_name),
                name.to_owned(),
                title_from_filename(name),
                Some(path),
            );
            match tree.attach(dir, node) {
                Ok(child) => build(tree, child, ignore, config),
                Err(e) => tracing::debug!(error = %e, "Failed to attach directory"),
            }
        } else {
            if rules.ignores_file(&file_name) {
                continue;
            }
            if let Err(e) = classify(tree, dir, &path, config) {
                tracing::debug!(error = %e, "Failed to attach file");
            }
        }
    }

    tree.sort_children(dir, &config.index_key);
    resolve_index_page(tree, dir, config);
}

/// Register the child stored under the index key as the index page.
///
/// The index page records the directory's first page, found after the index
/// is registered so it never points at itself.
fn resolve_index_page(tree: &mut Tree, dir: NodeId, config: &SiteConfig) {
    let index_uri = config.index_uri();
    let Some(index) = tree.child(dir, &index_uri) else {
        if let Err(e) = tree.set_index_page(dir, IndexPage::Absent) {
            tracing::debug!(error = %e, "Failed to clear index page");
        }
        return;
    };

    if let Err(e) = tree.set_index_page(dir, IndexPage::Page(index_uri)) {
        tracing::debug!(error = %e, "Failed to set index page");
        return;
    }
    let first_page = tree.first_page(dir);
    tree.set_first_page(index, first_page);
}

/// Create a leaf node for a file and attach it to `parent`.
///
/// Files whose extension is listed in `config.markdown_extensions` become
/// content pages; everything else becomes a raw file. Content URIs get an
/// `.html` suffix in static mode. A leaf stored under the index key takes
/// the site title when `parent` is the root, or the parent's title otherwise.
///
/// # Errors
///
/// Returns `TreeError::NotADirectory` if `parent` is not a directory.
pub fn classify(
    tree: &mut Tree,
    parent: NodeId,
    path: &Path,
    config: &SiteConfig,
) -> Result<NodeId, TreeError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = file_stem(&file_name);
    let modified = modified_time(path);

    let is_document = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| config.is_markdown_extension(ext));

    let node = if is_document {
        let mut uri = uri_from_filename(name);
        if config.mode.is_static() {
            uri.push_str(".html");
        }
        let title = leaf_title(tree, parent, &uri, name, config);
        Node::content(
            uri,
            name.to_owned(),
            title,
            Some(path.to_path_buf()),
            Some(modified),
            None,
        )
    } else {
        let uri = uri_from_filename(&file_name);
        let title = leaf_title(tree, parent, &uri, name, config);
        Node::raw(uri, name.to_owned(), title, path.to_path_buf(), modified)
    };

    tree.attach(parent, node)
}

fn leaf_title(tree: &Tree, parent: NodeId, uri: &str, name: &str, config: &SiteConfig) -> String {
    if uri != config.index_uri() {
        return title_from_filename(name);
    }
    if tree.is_root(parent) {
        config.title.clone()
    } else {
        tree.get(parent).title().to_owned()
    }
}

/// Filename without its last extension.
fn file_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(file_name)
}

fn modified_time(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or_else(|e| {
            tracing::debug!(path = %path.display(), error = %e, "Modification time unavailable");
            UNIX_EPOCH
        })
}
