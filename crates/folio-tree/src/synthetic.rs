//! Nodes created on demand rather than discovered on disk.
//!
//! Consumers use these to inject generated pages into a built tree. Nodes are
//! keyed by [`slug`] of their title and lookups never overwrite an existing
//! entry.

use crate::error::TreeError;
use crate::filename::SYNTHETIC_INDEX_NAME;
use crate::slug::slug;
use crate::tree::{IndexPage, Node, NodeId, Tree};

/// Title that makes [`get_or_create_page`] create an index page.
pub const INDEX_TITLE: &str = "index";

/// Placeholder body for generated pages.
const PLACEHOLDER_BODY: &str = "-";

/// Find the directory keyed by `slug(title)` under `parent`, creating it if needed.
///
/// An existing entry under that key is returned as is, whatever its kind.
///
/// # Errors
///
/// Returns `TreeError::NotADirectory` if `parent` is not a directory.
pub fn get_or_create_directory(
    tree: &mut Tree,
    parent: NodeId,
    title: &str,
) -> Result<NodeId, TreeError> {
    let key = slug(title);
    if let Some(existing) = tree.child(parent, &key) {
        return Ok(existing);
    }

    let node = Node::directory(key.clone(), key, title.to_owned(), None);
    tree.attach(parent, node)
}

/// Find the page keyed by `slug(title)` + `.html` under `parent`, creating it if needed.
///
/// New pages get a placeholder body. A page titled [`INDEX_TITLE`] is named
/// `_index`, takes the parent's title and immediately becomes the parent's
/// index page.
///
/// # Errors
///
/// Returns `TreeError::NotADirectory` if `parent` is not a directory.
pub fn get_or_create_page(
    tree: &mut Tree,
    parent: NodeId,
    title: &str,
) -> Result<NodeId, TreeError> {
    let key = slug(title);
    let uri = format!("{key}.html");
    if let Some(existing) = tree.child(parent, &uri) {
        return Ok(existing);
    }

    let is_index = title == INDEX_TITLE;
    let (name, page_title) = if is_index {
        (
            SYNTHETIC_INDEX_NAME.to_owned(),
            tree.get(parent).title().to_owned(),
        )
    } else {
        (key, title.to_owned())
    };

    let node = Node::content(
        uri.clone(),
        name,
        page_title,
        None,
        None,
        Some(PLACEHOLDER_BODY.to_owned()),
    );
    let page = tree.attach(parent, node)?;

    if is_index {
        tree.set_index_page(parent, IndexPage::Page(uri))?;
    }

    Ok(page)
}
