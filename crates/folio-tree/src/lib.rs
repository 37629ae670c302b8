//! Document tree building for Folio.
//!
//! This crate provides:
//! - [`Tree`]: arena-backed hierarchy of directories, content pages and raw files
//! - [`build_tree`] / [`build`]: filesystem walking with ignore rules, sibling
//!   sorting and index page resolution
//! - Filename conventions ([`title_from_filename`], [`uri_from_filename`])
//! - On-demand nodes ([`get_or_create_directory`], [`get_or_create_page`])
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use folio_config::SiteConfig;
//! use folio_tree::{IgnoreRules, build_tree};
//!
//! let config = SiteConfig::default();
//! let ignore = IgnoreRules::new(["Thumbs.db"], [".git"]);
//! let tree = build_tree(Path::new("docs"), &ignore, &config)?;
//!
//! for id in tree.walk() {
//!     println!("{} -> {}", tree.url(id), tree.get(id).title());
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod filename;
mod slug;
mod synthetic;
mod tree;

pub use builder::{IgnoreRules, build, build_tree, classify};
pub use error::TreeError;
pub use filename::{SortKey, is_numeric, title_from_filename, uri_from_filename};
pub use slug::slug;
pub use synthetic::{INDEX_TITLE, get_or_create_directory, get_or_create_page};
pub use tree::{
    Content, Directory, IndexPage, Node, NodeId, NodeKind, NodeKindTag, Raw, Tree, TreeDump,
};
