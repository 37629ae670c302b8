//! `folio tree` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config, Mode};
use folio_tree::{IgnoreRules, NodeId, NodeKindTag, Tree, build_tree};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Site title (overrides config).
    #[arg(long)]
    title: Option<String>,

    /// Use static mode: document URIs end in `.html`.
    #[arg(long = "static")]
    static_mode: bool,

    /// Print the tree as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose output (info-level logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl TreeArgs {
    /// Execute the tree command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the source directory is unusable.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            mode: self.static_mode.then_some(Mode::Static),
            title: self.title,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        tracing::info!(
            source_dir = %config.docs_resolved.source_dir.display(),
            mode = ?config.site.mode,
            "Building document tree"
        );

        let ignore = IgnoreRules::from(&config.ignore);
        let tree = build_tree(&config.docs_resolved.source_dir, &ignore, &config.site)?;

        if self.json {
            output.line(&serde_json::to_string_pretty(&tree.dump())?);
            return Ok(());
        }

        let mut lines = Vec::new();
        outline(&tree, tree.root(), 0, &mut lines);
        for line in lines {
            match line.kind {
                NodeKindTag::Directory => output.highlight(&line.text),
                NodeKindTag::Content => output.line(&line.text),
                NodeKindTag::Raw => output.dim(&line.text),
            }
        }

        Ok(())
    }
}

/// One line of the printed outline.
#[derive(Debug, PartialEq, Eq)]
struct OutlineLine {
    kind: NodeKindTag,
    text: String,
}

/// Render a subtree as indented lines, index pages marked with `*`.
fn outline(tree: &Tree, id: NodeId, depth: usize, lines: &mut Vec<OutlineLine>) {
    let node = tree.get(id);
    let kind = node.kind_tag();
    let title = if node.title().is_empty() {
        "(untitled)"
    } else {
        node.title()
    };

    let text = if tree.is_root(id) {
        title.to_owned()
    } else {
        let is_index = tree
            .parent(id)
            .is_some_and(|parent| tree.index_page(parent) == Some(id));
        let marker = if is_index { " *" } else { "" };
        format!("{}{title} ({}){marker}", "  ".repeat(depth), node.uri())
    };
    lines.push(OutlineLine { kind, text });

    for &child in tree.children(id) {
        outline(tree, child, depth + 1, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_config::SiteConfig;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_outline() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("index.md"), "").unwrap();
        fs::write(temp_dir.path().join("42.md"), "").unwrap();
        let guide = temp_dir.path().join("01_Guide");
        fs::create_dir(&guide).unwrap();
        fs::write(guide.join("01_First_Steps.md"), "").unwrap();
        fs::write(guide.join("logo.png"), "").unwrap();

        let config = SiteConfig {
            title: "Docs".to_owned(),
            ..SiteConfig::default()
        };
        let tree = build_tree(temp_dir.path(), &IgnoreRules::default(), &config).unwrap();
        let mut lines = Vec::new();
        outline(&tree, tree.root(), 0, &mut lines);

        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Docs",
                "  Docs (index) *",
                "  Guide (Guide)",
                "    First Steps (First_Steps)",
                "    logo (logo.png)",
                "  (untitled) ()",
            ]
        );
        assert_eq!(lines[2].kind, NodeKindTag::Directory);
        assert_eq!(lines[4].kind, NodeKindTag::Raw);
    }
}
