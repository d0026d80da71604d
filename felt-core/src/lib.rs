//! felt-core: configuration-driven plugin loading for the felt shell
//!
//! This crate turns the user's Configuration Root into windows for a host
//! application:
//!
//! - **Path resolution** - [`ConfigRoot`] maps module names to files below the root
//! - **Module loading** - [`ModuleLoader`] executes Rhai plugin scripts in isolation
//! - **Configuration** - [`ShellConfig`] reads the ordered module declarations
//! - **Orchestration** - [`Shell`] loads every declared module, invokes its
//!   entry point and hands the windows to an [`Application`]
//!
//! # Quick Start
//!
//! ```no_run
//! use felt_core::{Application, Shell, Window};
//! use std::path::Path;
//!
//! struct Printer;
//!
//! impl Application for Printer {
//!     type Error = std::io::Error;
//!
//!     fn new(_name: &str) -> Self {
//!         Printer
//!     }
//!
//!     fn add_window(&mut self, window: Window) {
//!         println!("{}: {:?}", window.module(), window.value());
//!     }
//!
//!     fn set_stylesheet_from_file(&mut self, _path: &Path) -> std::io::Result<()> {
//!         Ok(())
//!     }
//!
//!     fn run(self) -> std::io::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! fn example() -> Result<(), felt_core::ShellError> {
//!     Shell::from_env().run::<Printer>()
//! }
//! ```
//!
//! # Flow
//!
//! ```text
//! ConfigRoot ──► ModuleLoader ──► Shell ──► Application
//!  (paths)        (scripts)      (order)     (windows, css, run)
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod loader;
pub mod resolver;
pub mod shell;

// Re-export key types for convenience
pub use config::{ModuleDeclaration, ShellConfig};
pub use error::{ConfigurationError, LoadError, ShellError};
pub use host::{Application, Window};
pub use loader::{EntryPoint, LoadedModule, ModuleLoader, SCRIPT_EXTENSION};
pub use resolver::{ConfigRoot, ROOT_CONFIG_NAME, STYLE_DIR, validate_module_name};
pub use rhai::Dynamic;
pub use shell::{APP_NAME, ENTRY_POINT, Shell, ShellState};
