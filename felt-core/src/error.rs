//! Shell error types

use std::path::PathBuf;

use rhai::EvalAltResult;
use thiserror::Error;

/// Errors returned by [`ModuleLoader::load`](crate::ModuleLoader::load).
///
/// The loader does not know which declaration it is loading for, so script
/// errors are handed back untouched and the shell attaches the module name.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The module file could not be created or read
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The module failed to compile or raised while running its top level
    #[error("Script error in {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: Box<EvalAltResult>,
    },
}

/// Structural problems with the user's configuration or a plugin's surface
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// `config.toml` is not valid TOML
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A top-level entry in `config.toml` is not a table of arguments
    #[error("Module '{module}' must be declared as a table of arguments, found {found}")]
    MalformedDeclaration { module: String, found: &'static str },

    /// A module name would escape the Configuration Root or is reserved
    #[error("Invalid module name '{name}': {reason}")]
    InvalidModuleName { name: String, reason: &'static str },

    /// The module does not define a public `main` function
    #[error("Module '{module}' does not define a public `main` entry point")]
    MissingEntryPoint { module: String },

    /// No `main` overload takes exactly the declared arguments
    #[error(
        "Module '{module}' entry point does not accept the declared arguments \
         (missing: [{}], unexpected: [{}])",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    ArgumentMismatch {
        module: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// A declared argument has no script representation
    #[error("Module '{module}' argument '{argument}' cannot be passed to the script: {reason}")]
    UnsupportedArgument {
        module: String,
        argument: String,
        reason: String,
    },
}

/// Errors that abort shell startup
#[derive(Error, Debug)]
pub enum ShellError {
    /// Filesystem access or scaffolding failed
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A plugin module failed to compile or raised at its top level
    #[error("Failed to load module '{module}': {source}")]
    Load {
        module: String,
        path: PathBuf,
        #[source]
        source: Box<EvalAltResult>,
    },

    /// A plugin's entry point raised an error
    #[error("Module '{module}' failed while creating its window: {source}")]
    Plugin {
        module: String,
        #[source]
        source: Box<EvalAltResult>,
    },

    /// The configuration or a plugin broke the module contract
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The host application rejected a call
    #[error("Host application error: {0}")]
    Host(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ShellError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn host(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Host(Box::new(err))
    }

    /// Attach the declaring module's name to a loader error
    pub(crate) fn from_load(module: &str, err: LoadError) -> Self {
        match err {
            LoadError::Io { path, source } => Self::Io { path, source },
            LoadError::Script { path, source } => Self::Load {
                module: module.to_string(),
                path,
                source,
            },
        }
    }

    /// Name of the module the error is attributed to, if any
    pub fn module(&self) -> Option<&str> {
        match self {
            Self::Load { module, .. } | Self::Plugin { module, .. } => Some(module.as_str()),
            Self::Configuration(
                ConfigurationError::MalformedDeclaration { module, .. }
                | ConfigurationError::MissingEntryPoint { module }
                | ConfigurationError::ArgumentMismatch { module, .. }
                | ConfigurationError::UnsupportedArgument { module, .. },
            ) => Some(module.as_str()),
            Self::Configuration(ConfigurationError::InvalidModuleName { name, .. }) => {
                Some(name.as_str())
            }
            _ => None,
        }
    }
}
