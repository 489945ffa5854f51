//! User-directory resolution.
//!
//! `WIREKIT_HOME` wins when set and non-empty; otherwise the platform config
//! directory (`~/.config/wirekit` on Linux) is used. Project-local
//! `.wirekit/` directories are resolved by [`crate::config::search_paths`].

use std::path::PathBuf;

/// Returns the wirekit user-level config directory.
pub fn user_dir() -> Option<PathBuf> {
    match std::env::var_os("WIREKIT_HOME") {
        Some(home) if !home.is_empty() => Some(PathBuf::from(home)),
        _ => dirs::config_dir().map(|d| d.join("wirekit")),
    }
}
