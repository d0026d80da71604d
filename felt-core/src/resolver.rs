//! Path resolution inside the Configuration Root

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{ConfigurationError, ShellError};
use crate::loader::SCRIPT_EXTENSION;

/// Module name reserved for the root configuration document
pub const ROOT_CONFIG_NAME: &str = "config";

/// Directory holding the stylesheet resource
pub const STYLE_DIR: &str = "style";

/// File name every plugin module is loaded from, minus the extension
pub const PLUGIN_ENTRY_STEM: &str = "main";

/// The on-disk directory tree holding the user's configuration and plugins.
///
/// Layout:
///
/// ```text
/// <root>/
/// ├── config.toml        root configuration
/// ├── <module>/main.rhai plugin modules (plus importable helpers)
/// └── style/main.css     stylesheet
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRoot {
    dir: PathBuf,
}

impl ConfigRoot {
    /// Use an explicit directory as the Configuration Root
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the Configuration Root from the environment
    pub fn from_env() -> Self {
        Self::new(felt_paths::config_dir())
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Create the root directory if it does not exist yet
    pub fn ensure(&self) -> Result<(), ShellError> {
        create_dir(&self.dir)
    }

    /// Map a logical module name to its file.
    ///
    /// [`ROOT_CONFIG_NAME`] maps to `<root>/config.toml`; every other name is
    /// treated as a plugin, see [`resolve_plugin`](Self::resolve_plugin).
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ShellError> {
        if name == ROOT_CONFIG_NAME {
            return Ok(self.dir.join(format!("{ROOT_CONFIG_NAME}.toml")));
        }
        self.resolve_plugin(name)
    }

    /// Map a plugin name to `<root>/<name>/main.rhai`.
    ///
    /// Creates the plugin directory (and any missing parents) but not the
    /// file itself; the loader scaffolds that.
    pub fn resolve_plugin(&self, name: &str) -> Result<PathBuf, ShellError> {
        validate_module_name(name)?;

        let dir = self.dir.join(name);
        create_dir(&dir)?;

        Ok(dir.join(format!("{PLUGIN_ENTRY_STEM}.{SCRIPT_EXTENSION}")))
    }

    /// Resolve `<root>/style/main.css`, creating an empty file if missing
    pub fn stylesheet(&self) -> Result<PathBuf, ShellError> {
        let dir = self.dir.join(STYLE_DIR);
        create_dir(&dir)?;

        let css = dir.join("main.css");
        if scaffold_file(&css).map_err(|e| ShellError::io(&css, e))? {
            tracing::info!(path = %css.display(), "Created empty stylesheet");
        }
        Ok(css)
    }
}

/// Check that a plugin name is a single plain directory name.
///
/// Plugins are only ever looked up directly below the Configuration Root.
pub fn validate_module_name(name: &str) -> Result<(), ConfigurationError> {
    let invalid = |reason| ConfigurationError::InvalidModuleName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("name contains a path separator"));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(component)), None) if component == name => {}
        _ => return Err(invalid("name must be a plain directory name")),
    }

    if name == ROOT_CONFIG_NAME || name == STYLE_DIR {
        return Err(invalid("name is reserved"));
    }

    Ok(())
}

pub(crate) fn create_dir(dir: &Path) -> Result<(), ShellError> {
    std::fs::create_dir_all(dir).map_err(|e| ShellError::io(dir, e))
}

/// Create an empty file at `path` unless one exists.
///
/// Returns whether the file was created. Existing files are never touched.
pub(crate) fn scaffold_file(path: &Path) -> std::io::Result<bool> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_root_config() {
        let dir = TempDir::new().unwrap();
        let root = ConfigRoot::new(dir.path());

        let path = root.resolve(ROOT_CONFIG_NAME).unwrap();
        assert_eq!(path, dir.path().join("config.toml"));
        assert!(!path.exists());
    }

    #[test]
    fn test_resolve_plugin_creates_directory_only() {
        let dir = TempDir::new().unwrap();
        let root = ConfigRoot::new(dir.path());

        let path = root.resolve("clock").unwrap();
        assert_eq!(path, dir.path().join("clock").join("main.rhai"));
        assert!(dir.path().join("clock").is_dir());
        assert!(!path.exists());
    }

    #[test]
    fn test_resolve_plugin_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let root = ConfigRoot::new(dir.path().join("nested/root"));

        let first = root.resolve("bar").unwrap();
        let second = root.resolve("bar").unwrap();
        assert_eq!(first, second);
        assert!(first.parent().unwrap().is_dir());
    }

    #[test]
    fn test_resolve_plugin_propagates_io_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let root = ConfigRoot::new(&blocker);

        let result = root.resolve("clock");
        assert!(matches!(result, Err(ShellError::Io { .. })));
    }

    #[test]
    fn test_invalid_module_names_are_rejected() {
        for name in ["", "..", ".", "a/b", "../escape", "/abs", "a\\b", "config", "style"] {
            let result = validate_module_name(name);
            assert!(
                matches!(result, Err(ConfigurationError::InvalidModuleName { .. })),
                "expected '{name}' to be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_name_does_not_touch_disk() {
        let dir = TempDir::new().unwrap();
        let root = ConfigRoot::new(dir.path().join("root"));

        assert!(root.resolve_plugin("../outside").is_err());
        assert!(!dir.path().join("root").exists());
        assert!(!dir.path().join("outside").exists());
    }

    #[test]
    fn test_valid_module_names() {
        for name in ["clock", "bar-top", "workspaces_2", "élan"] {
            assert!(validate_module_name(name).is_ok(), "'{name}' should be valid");
        }
    }

    #[test]
    fn test_stylesheet_is_scaffolded_empty() {
        let dir = TempDir::new().unwrap();
        let root = ConfigRoot::new(dir.path());

        let css = root.stylesheet().unwrap();
        assert_eq!(css, dir.path().join("style").join("main.css"));
        assert_eq!(std::fs::read_to_string(&css).unwrap(), "");
    }

    #[test]
    fn test_stylesheet_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let root = ConfigRoot::new(dir.path());
        std::fs::create_dir_all(dir.path().join("style")).unwrap();
        std::fs::write(dir.path().join("style/main.css"), "window { color: red; }").unwrap();

        let css = root.stylesheet().unwrap();
        assert_eq!(
            std::fs::read_to_string(css).unwrap(),
            "window { color: red; }"
        );
    }

    #[test]
    fn test_scaffold_file_reports_creation_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.rhai");

        assert!(scaffold_file(&path).unwrap());
        assert!(!scaffold_file(&path).unwrap());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }
}
