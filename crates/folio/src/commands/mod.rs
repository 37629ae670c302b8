//! CLI command implementations.

pub(crate) mod tree;

pub(crate) use tree::TreeArgs;
