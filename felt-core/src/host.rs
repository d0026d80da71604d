//! The host application contract
//!
//! The shell does not render anything itself. It hands windows and a
//! stylesheet to an [`Application`] and then gives up control to its run
//! loop.

use std::path::Path;

use rhai::Dynamic;

/// A window produced by a plugin's entry point.
///
/// The value is whatever the script returned; its meaning is between the
/// plugin and the host.
#[derive(Debug, Clone)]
pub struct Window {
    module: String,
    value: Dynamic,
}

impl Window {
    pub fn new(module: impl Into<String>, value: Dynamic) -> Self {
        Self {
            module: module.into(),
            value,
        }
    }

    /// Name of the module that created this window
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn value(&self) -> &Dynamic {
        &self.value
    }

    pub fn into_value(self) -> Dynamic {
        self.value
    }

    /// Copy the value out as a concrete type, if it is one
    pub fn try_cast<T: std::any::Any + Clone>(&self) -> Option<T> {
        self.value.clone().try_cast::<T>()
    }
}

/// Host application the shell attaches windows to.
///
/// Calls arrive in a fixed order: `new`, then `add_window` once per declared
/// module in declaration order, then `set_stylesheet_from_file`, then `run`.
pub trait Application {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create the named application instance
    fn new(name: &str) -> Self
    where
        Self: Sized;

    /// Register a window
    fn add_window(&mut self, window: Window);

    /// Apply the stylesheet at `path`
    fn set_stylesheet_from_file(&mut self, path: &Path) -> Result<(), Self::Error>;

    /// Run the host's event loop; returns when the application exits
    fn run(self) -> Result<(), Self::Error>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_try_cast() {
        let window = Window::new("clock", Dynamic::from("24h"));
        assert_eq!(window.module(), "clock");
        assert_eq!(window.try_cast::<String>(), Some("24h".to_string()));
        assert_eq!(window.try_cast::<i64>(), None);
    }

    #[test]
    fn test_window_into_value() {
        let window = Window::new("bar", Dynamic::from(7_i64));
        assert_eq!(window.into_value().as_int().unwrap(), 7);
    }
}
