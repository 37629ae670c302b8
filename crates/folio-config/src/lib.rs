//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! The configuration file normally lives at the root of the documentation
//! tree it describes, so `docs.source_dir` defaults to the directory that
//! contains it. Tree building never lists the file itself as a document.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override rendering mode.
    pub mode: Option<Mode>,
    /// Override site title.
    pub title: Option<String>,
}

/// Configuration filename to search for.
///
/// A file with this name at the root of the source directory is never part
/// of the document tree.
pub const CONFIG_FILENAME: &str = "folio.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Site-wide settings consumed by the tree builder.
    pub site: SiteConfig,
    /// File and folder names excluded from the tree.
    pub ignore: IgnoreConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory scanned into the document tree.
    pub source_dir: PathBuf,
}

/// Output mode of the documentation site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Pages are rendered per request.
    #[default]
    Dynamic,
    /// Every page is pre-rendered to a standalone `.html` file.
    Static,
}

impl Mode {
    /// Whether page URIs need an explicit `.html` suffix.
    #[must_use]
    pub fn is_static(self) -> bool {
        matches!(self, Self::Static)
    }
}

/// Site settings read by the tree builder.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site-wide title, used for the root index page.
    pub title: String,
    /// Name of the document that acts as a directory's home page.
    pub index_key: String,
    /// Rendering mode.
    pub mode: Mode,
    /// Extensions (without the dot) treated as documents.
    pub markdown_extensions: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_owned(),
            index_key: "index".to_owned(),
            mode: Mode::default(),
            markdown_extensions: vec!["md".to_owned(), "markdown".to_owned()],
        }
    }
}

impl SiteConfig {
    /// Check whether a file extension marks a document.
    #[must_use]
    pub fn is_markdown_extension(&self, extension: &str) -> bool {
        self.markdown_extensions.iter().any(|e| e == extension)
    }

    /// Key under which a directory's index page is stored.
    ///
    /// Static mode gives every document URI an `.html` suffix, the index
    /// page included.
    #[must_use]
    pub fn index_uri(&self) -> String {
        if self.mode.is_static() {
            format!("{}.html", self.index_key)
        } else {
            self.index_key.clone()
        }
    }
}

/// Names skipped while building the tree.
///
/// Matching is by exact entry name at any depth.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// File names to skip.
    pub files: Vec<String>,
    /// Folder names to skip.
    pub folders: Vec<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(mode) = settings.mode {
            self.site.mode = mode;
        }
        if let Some(title) = &settings.title {
            self.site.title.clone_from(title);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            site: SiteConfig::default(),
            ignore: IgnoreConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.to_path_buf(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.index_key, "site.index_key")?;
        if self.site.index_key.contains('/') {
            return Err(ConfigError::Validation(
                "site.index_key cannot contain '/'".to_owned(),
            ));
        }

        if self.site.markdown_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "site.markdown_extensions cannot be empty".to_owned(),
            ));
        }
        for ext in &self.site.markdown_extensions {
            require_non_empty(ext, "site.markdown_extensions entry")?;
            if ext.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "site.markdown_extensions entry '{ext}' must not start with '.'"
                )));
            }
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let source_dir = match self.docs.source_dir.as_deref() {
            Some(dir) => config_dir.join(dir),
            None => config_dir.to_path_buf(),
        };
        self.docs_resolved = DocsConfig { source_dir };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test"));
        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.site.index_key, "index");
        assert_eq!(config.site.mode, Mode::Dynamic);
        assert_eq!(config.site.markdown_extensions, vec!["md", "markdown"]);
        assert!(config.ignore.files.is_empty());
        assert!(config.ignore.folders.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.index_key, "index");
        assert_eq!(config.site.mode, Mode::Dynamic);
    }

    #[test]
    fn test_parse_site_config() {
        let toml = r#"
[site]
title = "My Project"
index_key = "home"
mode = "static"
markdown_extensions = ["md", "txt"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.title, "My Project");
        assert_eq!(config.site.index_key, "home");
        assert!(config.site.mode.is_static());
        assert!(config.site.is_markdown_extension("txt"));
        assert!(!config.site.is_markdown_extension("markdown"));
    }

    #[test]
    fn test_index_uri_follows_mode() {
        let mut site = SiteConfig::default();
        assert_eq!(site.index_uri(), "index");
        site.mode = Mode::Static;
        assert_eq!(site.index_uri(), "index.html");
    }

    #[test]
    fn test_parse_ignore_config() {
        let toml = r#"
[ignore]
files = ["Thumbs.db"]
folders = [".git", "node_modules"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.ignore.files, vec!["Thumbs.db"]);
        assert_eq!(config.ignore.folders, vec![".git", "node_modules"]);
    }

    #[test]
    fn test_parse_invalid_mode() {
        let toml = r#"
[site]
mode = "hybrid"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "content"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/content")
        );
    }

    #[test]
    fn test_resolve_paths_defaults_to_config_dir() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project/docs"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/project/docs"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[site]\ntitle = \"Handbook\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.site.title, "Handbook");
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.docs_resolved.source_dir, dir.path());
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = Config::load(Some(Path::new("/nonexistent/folio.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[site\n").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_apply_cli_settings_source_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let settings = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            ..Default::default()
        };
        config.apply_cli_settings(&settings);
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
    }

    #[test]
    fn test_apply_cli_settings_mode_and_title() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let settings = CliSettings {
            mode: Some(Mode::Static),
            title: Some("Override".to_owned()),
            ..Default::default()
        };
        config.apply_cli_settings(&settings);
        assert_eq!(config.site.mode, Mode::Static);
        assert_eq!(config.site.title, "Override");
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test"));
        assert_eq!(config.site.mode, Mode::Dynamic);
        assert_eq!(config.site.title, "Documentation");
    }

    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let err = config.validate().unwrap_err();
        let msg = err.to_string();
        for expected in expected_substrings {
            assert!(msg.contains(expected), "'{msg}' should contain '{expected}'");
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_index_key_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.index_key = String::new();
        assert_validation_error(&config, &["site.index_key", "empty"]);
    }

    #[test]
    fn test_validate_index_key_with_slash() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.index_key = "docs/index".to_owned();
        assert_validation_error(&config, &["site.index_key", "'/'"]);
    }

    #[test]
    fn test_validate_no_extensions() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.markdown_extensions.clear();
        assert_validation_error(&config, &["site.markdown_extensions", "empty"]);
    }

    #[test]
    fn test_validate_extension_with_dot() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.markdown_extensions = vec![".md".to_owned()];
        assert_validation_error(&config, &["'.md'", "must not start with '.'"]);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[site]\nindex_key = \"\"\n").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
