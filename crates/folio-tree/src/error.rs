//! Tree error types.

use std::path::PathBuf;

/// Error raised by tree operations.
///
/// Building never fails on unreadable subdirectories; only the root
/// precondition and misuse of the synthetic node API produce errors.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Root source directory does not exist.
    #[error("Source directory not found: {}", .0.display())]
    RootNotFound(PathBuf),
    /// Root source path exists but is not a directory.
    #[error("Source path is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),
    /// Node at the given URL is not a directory.
    #[error("Not a directory: '{0}'")]
    NotADirectory(String),
    /// Node at the given URL is not a content page.
    #[error("Not a content page: '{0}'")]
    NotContent(String),
    /// Index page key does not name a child of the directory.
    #[error("Directory '{dir}' has no child '{key}'")]
    UnknownChild {
        /// Directory URL.
        dir: String,
        /// Requested child key.
        key: String,
    },
}
