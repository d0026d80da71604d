//! Module loader - turns a script file into an executed, addressable module
//!
//! Every call to [`ModuleLoader::load`] builds a fresh [`rhai::Engine`] whose
//! module resolver is rooted at the script's own directory. A plugin can
//! therefore split itself into several files:
//!
//! ```text
//! clock/
//! ├── main.rhai
//! └── format.rhai
//! ```
//!
//! ```rhai
//! // clock/main.rhai
//! import "format" as fmt;
//!
//! fn main(format) {
//!     fmt::render(format)
//! }
//! ```
//!
//! Imports are resolved relative to `clock/` only; one plugin never sees
//! another plugin's helpers. Top-level code runs once per load and the
//! modules it imports stay visible to the script's functions.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use rhai::module_resolvers::FileModuleResolver;
use rhai::{AST, Dynamic, Engine, EvalAltResult, FnAccess, Module, Position, Scope, Shared};

use crate::error::LoadError;
use crate::resolver::scaffold_file;

/// File extension of plugin scripts and their helpers
pub const SCRIPT_EXTENSION: &str = "rhai";

/// Namespace a loaded module is registered under in its own engine
const MODULE_NAMESPACE: &str = "plugin";

/// Source of the per-load suffix on synthetic module names
static NEXT_MODULE_ID: AtomicU64 = AtomicU64::new(1);

/// Loads script modules from disk.
///
/// Loading never caches: each call re-reads and re-executes the file.
pub struct ModuleLoader;

impl ModuleLoader {
    /// Load and execute the module at `path`.
    ///
    /// A missing file is scaffolded as an empty module first, so a plugin
    /// directory that was just created loads as an editable stub. Compile
    /// errors and errors raised by top-level code are returned unmodified.
    pub fn load(path: &Path) -> Result<LoadedModule, LoadError> {
        let io_error = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        if scaffold_file(path).map_err(io_error)? {
            tracing::info!(path = %path.display(), "Created empty module");
        }

        let name = synthetic_name(path);
        let source = std::fs::read_to_string(path).map_err(io_error)?;
        let mut engine = Self::engine_for(path, &name);

        let script_error = |source: Box<EvalAltResult>| LoadError::Script {
            path: path.to_path_buf(),
            source,
        };

        let mut ast = engine
            .compile(&source)
            .map_err(|e| script_error(e.into()))?;
        ast.set_source(name.as_str());

        tracing::debug!(module = %name, path = %path.display(), "Executing module");
        let module: Shared<Module> = Module::eval_ast_as_new(Scope::new(), &ast, &engine)
            .map_err(script_error)?
            .into();
        engine.register_static_module(MODULE_NAMESPACE, module.clone());

        Ok(LoadedModule {
            name,
            path: path.to_path_buf(),
            engine,
            ast,
            module,
        })
    }

    /// Build the engine a single module runs in
    fn engine_for(path: &Path, name: &str) -> Engine {
        let mut engine = Engine::new();

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        engine.set_module_resolver(FileModuleResolver::new_with_path_and_extension(
            base_dir,
            SCRIPT_EXTENSION,
        ));

        let print_module = name.to_string();
        engine.on_print(move |text: &str| {
            tracing::info!(module = %print_module, "{}", text);
        });

        let debug_module = name.to_string();
        engine.on_debug(move |text: &str, source: Option<&str>, pos| {
            tracing::debug!(
                module = %debug_module,
                source = source.unwrap_or_default(),
                position = %pos,
                "{}",
                text
            );
        });

        engine
    }
}

/// `<dir>/<stem>#<n>`, unique for the lifetime of the process
fn synthetic_name(path: &Path) -> String {
    let component = |p: Option<&std::ffi::OsStr>| {
        p.map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let dir = component(path.parent().and_then(Path::file_name));
    let stem = component(path.file_stem());
    let id = NEXT_MODULE_ID.fetch_add(1, Ordering::Relaxed);

    format!("{dir}/{stem}#{id}")
}

/// A script function's callable surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    /// Function name
    pub name: String,
    /// Parameter names in declaration order
    pub params: Vec<String>,
}

/// An executed script module.
///
/// Owns the engine it ran in together with its compiled functions. Imports
/// and constants of the top level are captured by every function.
pub struct LoadedModule {
    name: String,
    path: PathBuf,
    engine: Engine,
    ast: AST,
    module: Shared<Module>,
}

impl LoadedModule {
    /// Synthetic name assigned to this load
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the module was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Public overloads of `function`, in definition order.
    ///
    /// `private` definitions are not invocable from the host and are left out.
    pub fn entry_points(&self, function: &str) -> Vec<EntryPoint> {
        self.ast
            .iter_functions()
            .filter(|f| f.name == function && f.access == FnAccess::Public)
            .map(|f| EntryPoint {
                name: f.name.to_string(),
                params: f.params.iter().map(|p| p.to_string()).collect(),
            })
            .collect()
    }

    /// Call a public script function with positional arguments.
    ///
    /// Top-level code is not run again.
    pub fn call(&self, function: &str, args: Vec<Dynamic>) -> Result<Dynamic, Box<EvalAltResult>> {
        if self.module.get_script_fn(function, args.len()).is_none() {
            return Err(EvalAltResult::ErrorFunctionNotFound(
                format!("{function} ({} arguments)", args.len()),
                Position::NONE,
            )
            .into());
        }

        let mut scope = Scope::new();
        let mut params = Vec::with_capacity(args.len());
        for (i, arg) in args.into_iter().enumerate() {
            let param = format!("arg{i}");
            scope.push_dynamic(param.as_str(), arg);
            params.push(param);
        }

        let call = format!("{MODULE_NAMESPACE}::{function}({})", params.join(", "));
        self.engine.eval_expression_with_scope::<Dynamic>(&mut scope, &call)
    }
}

impl std::fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModule")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
