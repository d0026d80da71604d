//! Shell - drives startup from the Configuration Root to the host's run loop

use rhai::Dynamic;

use crate::config::{ModuleDeclaration, ShellConfig};
use crate::error::{ConfigurationError, ShellError};
use crate::host::{Application, Window};
use crate::loader::{EntryPoint, LoadedModule, ModuleLoader};
use crate::resolver::{ConfigRoot, ROOT_CONFIG_NAME};

/// Name the host application is created with
pub const APP_NAME: &str = "shell";

/// Function every plugin module must expose
pub const ENTRY_POINT: &str = "main";

/// Startup progress of a [`Shell`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellState {
    Uninitialized,
    RootResolved,
    ConfigLoaded { modules: usize },
    Resolving { module: String },
    Loading { module: String },
    Invoking { module: String },
    Registered { module: String },
    StyleApplied,
    /// The host's run loop has control
    Running,
    /// The host's run loop returned normally
    Exited,
    Failed { reason: String },
}

/// Loads the user's configuration and plugins and hands the result to a host.
///
/// Any failure aborts startup; the host never sees a partially built shell
/// run.
pub struct Shell {
    root: ConfigRoot,
    state: ShellState,
}

impl Shell {
    pub fn new(root: ConfigRoot) -> Self {
        Self {
            root,
            state: ShellState::Uninitialized,
        }
    }

    /// Shell over the Configuration Root selected by the environment
    pub fn from_env() -> Self {
        Self::new(ConfigRoot::from_env())
    }

    pub fn root(&self) -> &ConfigRoot {
        &self.root
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    /// Start the shell with a host created through [`Application::new`].
    ///
    /// Blocks until the host's run loop returns.
    pub fn run<A: Application>(&mut self) -> Result<(), ShellError> {
        self.run_with(A::new)
    }

    /// Start the shell with a host built by `factory`.
    ///
    /// The factory is called with [`APP_NAME`] once the configuration has
    /// been read.
    pub fn run_with<A, F>(&mut self, factory: F) -> Result<(), ShellError>
    where
        A: Application,
        F: FnOnce(&str) -> A,
    {
        let result = self.start(factory);
        if let Err(e) = &result {
            tracing::error!(module = e.module().unwrap_or_default(), error = %e, "Shell startup failed");
            self.transition(ShellState::Failed {
                reason: e.to_string(),
            });
        }
        result
    }

    fn start<A, F>(&mut self, factory: F) -> Result<(), ShellError>
    where
        A: Application,
        F: FnOnce(&str) -> A,
    {
        self.root.ensure()?;
        self.transition(ShellState::RootResolved);

        let config = ShellConfig::load(&self.root.resolve(ROOT_CONFIG_NAME)?)?;
        self.transition(ShellState::ConfigLoaded {
            modules: config.len(),
        });

        let mut app = factory(APP_NAME);

        for declaration in config.declarations() {
            let window = self.create_window(declaration)?;
            app.add_window(window);
            tracing::info!(module = %declaration.name, "Window registered");
            self.transition(ShellState::Registered {
                module: declaration.name.clone(),
            });
        }

        let stylesheet = self.root.stylesheet()?;
        app.set_stylesheet_from_file(&stylesheet)
            .map_err(ShellError::host)?;
        self.transition(ShellState::StyleApplied);

        self.transition(ShellState::Running);
        app.run().map_err(ShellError::host)?;
        self.transition(ShellState::Exited);

        Ok(())
    }

    /// Resolve, load and invoke one declared module
    fn create_window(&mut self, declaration: &ModuleDeclaration) -> Result<Window, ShellError> {
        let module = declaration.name.as_str();

        self.transition(ShellState::Resolving {
            module: module.to_string(),
        });
        let path = self.root.resolve_plugin(module)?;

        self.transition(ShellState::Loading {
            module: module.to_string(),
        });
        let loaded = ModuleLoader::load(&path).map_err(|e| ShellError::from_load(module, e))?;

        let entry = select_entry_point(&loaded, declaration)?;
        let args = bind_arguments(declaration, &entry)?;

        self.transition(ShellState::Invoking {
            module: module.to_string(),
        });
        let value = invoke(&loaded, &entry, args).map_err(|source| ShellError::Plugin {
            module: module.to_string(),
            source,
        })?;

        Ok(Window::new(module, value))
    }

    fn transition(&mut self, next: ShellState) {
        tracing::debug!(from = ?self.state, to = ?next, "Shell state transition");
        self.state = next;
    }
}

fn invoke(
    module: &LoadedModule,
    entry: &EntryPoint,
    args: Vec<Dynamic>,
) -> Result<Dynamic, Box<rhai::EvalAltResult>> {
    tracing::debug!(module = %module.name(), params = ?entry.params, "Invoking entry point");
    module.call(&entry.name, args)
}

/// Pick the `main` overload whose parameter names are exactly the declared
/// argument names.
fn select_entry_point(
    module: &LoadedModule,
    declaration: &ModuleDeclaration,
) -> Result<EntryPoint, ConfigurationError> {
    let overloads = module.entry_points(ENTRY_POINT);
    if overloads.is_empty() {
        return Err(ConfigurationError::MissingEntryPoint {
            module: declaration.name.clone(),
        });
    }

    let mismatches = overloads.into_iter().map(|entry| {
        let missing: Vec<String> = entry
            .params
            .iter()
            .filter(|p| !declaration.args.contains_key(p.as_str()))
            .cloned()
            .collect();
        let unexpected: Vec<String> = declaration
            .args
            .keys()
            .filter(|k| !entry.params.contains(*k))
            .cloned()
            .collect();
        (entry, missing, unexpected)
    });

    let mut closest: Option<(Vec<String>, Vec<String>)> = None;
    for (entry, missing, unexpected) in mismatches {
        if missing.is_empty() && unexpected.is_empty() {
            return Ok(entry);
        }
        let distance = missing.len() + unexpected.len();
        if closest
            .as_ref()
            .is_none_or(|(m, u)| distance < m.len() + u.len())
        {
            closest = Some((missing, unexpected));
        }
    }

    let (missing, unexpected) = closest.unwrap_or_default();
    Err(ConfigurationError::ArgumentMismatch {
        module: declaration.name.clone(),
        missing,
        unexpected,
    })
}

/// Convert the declared arguments to script values in parameter order
fn bind_arguments(
    declaration: &ModuleDeclaration,
    entry: &EntryPoint,
) -> Result<Vec<Dynamic>, ConfigurationError> {
    entry
        .params
        .iter()
        .map(|param| {
            let unsupported = |reason: String| ConfigurationError::UnsupportedArgument {
                module: declaration.name.clone(),
                argument: param.clone(),
                reason,
            };
            let value = declaration
                .args
                .get(param.as_str())
                .ok_or_else(|| unsupported("argument is not declared".to_string()))?;
            rhai::serde::to_dynamic(value).map_err(|e| unsupported(e.to_string()))
        })
        .collect()
}
