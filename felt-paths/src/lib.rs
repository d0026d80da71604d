//! XDG Base Directory paths for felt.
//!
//! The shell is configured through plain files the user edits by hand, so we
//! follow the XDG layout on every platform rather than platform-native paths.

use std::path::PathBuf;

/// Name of the application directory under the XDG config home.
pub const APP_NAMESPACE: &str = "felt";

/// Get the felt config directory.
///
/// Returns `$XDG_CONFIG_HOME/felt` if set, otherwise `~/.config/felt`.
/// This is the Configuration Root: `config.toml`, plugin directories and the
/// stylesheet all live below it.
///
/// # Examples
///
/// ```
/// use felt_paths::config_dir;
///
/// let root = config_dir();
/// let clock = root.join("clock").join("main.rhai");
/// ```
pub fn config_dir() -> PathBuf {
    config_base_dir().join(APP_NAMESPACE)
}

/// The base directory the namespace is appended to.
///
/// An empty `XDG_CONFIG_HOME` is treated as unset.
fn config_base_dir() -> PathBuf {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg_config) if !xdg_config.is_empty() => PathBuf::from(xdg_config),
        _ => match dirs::home_dir() {
            Some(home) => home.join(".config"),
            None => PathBuf::from(".config"),
        },
    }
}
