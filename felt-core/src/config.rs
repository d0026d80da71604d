//! Root configuration document
//!
//! `config.toml` declares which plugin modules to load and the named
//! arguments each one's entry point receives. Every top-level table is one
//! declaration, and declaration order is window order:
//!
//! ```toml
//! [bar]
//! position = "top"
//!
//! [clock]
//! format = "24h"
//! ```

use std::path::Path;

use crate::error::{ConfigurationError, ShellError};
use crate::resolver::scaffold_file;

/// One plugin module and the arguments its entry point is invoked with
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDeclaration {
    /// Plugin name, also the name of its directory under the root
    pub name: String,
    /// Named arguments, in the order they were written
    pub args: toml::Table,
}

/// Parsed root configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShellConfig {
    declarations: Vec<ModuleDeclaration>,
}

impl ShellConfig {
    /// Load the configuration document at `path`.
    ///
    /// A missing file is created empty, and an empty document declares no
    /// modules.
    pub fn load(path: &Path) -> Result<Self, ShellError> {
        if scaffold_file(path).map_err(|e| ShellError::io(path, e))? {
            tracing::info!(path = %path.display(), "Created empty configuration");
        }

        let content = std::fs::read_to_string(path).map_err(|e| ShellError::io(path, e))?;
        Ok(Self::parse(&content, path)?)
    }

    /// Parse a configuration document; `path` is only used in errors
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigurationError> {
        let table: toml::Table =
            toml::from_str(content).map_err(|source| ConfigurationError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let declarations = table
            .into_iter()
            .map(|(name, value)| match value {
                toml::Value::Table(args) => Ok(ModuleDeclaration { name, args }),
                other => Err(ConfigurationError::MalformedDeclaration {
                    module: name,
                    found: other.type_str(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { declarations })
    }

    /// Declarations in the order they appear in the document
    pub fn declarations(&self) -> &[ModuleDeclaration] {
        &self.declarations
    }

    /// Declared module names, in order
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
