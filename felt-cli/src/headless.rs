//! Headless host - reports windows instead of drawing them
//!
//! Lets a configuration be exercised end to end without a display server:
//! each window is printed to stdout as one JSON line.

use std::path::{Path, PathBuf};

use felt_core::{Application, Window};

pub struct HeadlessApplication {
    name: String,
    windows: Vec<Window>,
    stylesheet: Option<PathBuf>,
}

impl Application for HeadlessApplication {
    type Error = std::io::Error;

    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            windows: Vec::new(),
            stylesheet: None,
        }
    }

    fn add_window(&mut self, window: Window) {
        tracing::debug!(app = %self.name, module = %window.module(), "Window added");
        self.windows.push(window);
    }

    fn set_stylesheet_from_file(&mut self, path: &Path) -> Result<(), Self::Error> {
        let bytes = std::fs::metadata(path)?.len();
        tracing::debug!(app = %self.name, path = %path.display(), bytes, "Stylesheet applied");
        self.stylesheet = Some(path.to_path_buf());
        Ok(())
    }

    fn run(self) -> Result<(), Self::Error> {
        tracing::info!(
            app = %self.name,
            windows = self.windows.len(),
            stylesheet = ?self.stylesheet,
            "Shell running headless"
        );
        for window in &self.windows {
            println!("{}", describe(window));
        }
        Ok(())
    }
}

/// One JSON line per window: the module name and the value it returned
fn describe(window: &Window) -> serde_json::Value {
    let value = rhai::serde::from_dynamic::<serde_json::Value>(window.value()).unwrap_or_else(|e| {
        tracing::debug!(module = %window.module(), error = %e, "Window value is not serializable");
        serde_json::Value::String(window.value().type_name().to_string())
    });

    serde_json::json!({
        "module": window.module(),
        "window": value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use felt_core::Dynamic;
    use tempfile::TempDir;

    #[test]
    fn test_describe_plain_value() {
        let window = Window::new("clock", Dynamic::from("24h"));
        let json = describe(&window);
        assert_eq!(json["module"], "clock");
        assert_eq!(json["window"], "24h");
    }

    #[test]
    fn test_describe_map_value() {
        let mut map = rhai::Map::new();
        map.insert("height".into(), Dynamic::from(30_i64));
        let window = Window::new("bar", Dynamic::from_map(map));

        let json = describe(&window);
        assert_eq!(json["window"]["height"], 30);
    }

    #[test]
    fn test_describe_opaque_value_falls_back_to_type_name() {
        #[derive(Clone)]
        struct Handle;

        let window = Window::new("tray", Dynamic::from(Handle));
        let json = describe(&window);
        assert_eq!(json["module"], "tray");
        assert!(json["window"].as_str().unwrap().ends_with("Handle"));
    }

    #[test]
    fn test_stylesheet_must_exist() {
        let dir = TempDir::new().unwrap();
        let mut app = HeadlessApplication::new("shell");

        assert!(
            app.set_stylesheet_from_file(&dir.path().join("missing.css"))
                .is_err()
        );

        let css = dir.path().join("main.css");
        std::fs::write(&css, "").unwrap();
        app.set_stylesheet_from_file(&css).unwrap();
        assert_eq!(app.stylesheet.as_deref(), Some(css.as_path()));
    }
}
