//! Path utilities for the Zellij sandbox environment.
//!
//! In the plugin sandbox the host filesystem is mounted under `/host`, which
//! points to the cwd of the last focused terminal, or the folder Zellij was
//! started from. That is usually the user's home directory.

use std::path::PathBuf;

/// File name of the OTLP trace log.
pub const TRACE_FILE_NAME: &str = "gardenia-otlp.json";

/// Returns the plugin data directory, `/host/.local/share/zellij/gardenia`.
///
/// # Examples
///
/// ```
/// use gardenia::infrastructure::paths::data_dir;
///
/// assert_eq!(data_dir().to_str(), Some("/host/.local/share/zellij/gardenia"));
/// ```
#[must_use]
pub fn data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("gardenia")
}

/// Path of the trace log inside [`data_dir`].
#[must_use]
pub fn trace_file() -> PathBuf {
    data_dir().join(TRACE_FILE_NAME)
}

/// Expands a leading `~` to the sandbox's `/host` mount.
///
/// # Examples
///
/// ```
/// use gardenia::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dusk.toml"), "/host/themes/dusk.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/etc/gardenia.toml"), "/etc/gardenia.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}
