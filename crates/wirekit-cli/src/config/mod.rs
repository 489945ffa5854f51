pub mod types;

use std::path::PathBuf;

pub use types::{FormConfig, SplitConfig, WirekitConfig};

use crate::paths;

pub const CONFIG_FILE: &str = "wirekit.toml";

/// Effective configuration plus the file it came from, if any.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: WirekitConfig,
    pub source: Option<PathBuf>,
}

/// Config file locations, highest priority first:
/// 1. `.wirekit/wirekit.toml` (project-local)
/// 2. `<user_dir>/wirekit.toml` (see [`paths::user_dir`])
pub fn search_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(".wirekit").join(CONFIG_FILE));
    }

    if let Some(dir) = paths::user_dir() {
        candidates.push(dir.join(CONFIG_FILE));
    }

    candidates
}

/// Load the first config file found on [`search_paths`].
pub fn load() -> LoadedConfig {
    load_from(&search_paths())
}

/// Testable version that accepts explicit paths.
///
/// The first readable file wins. If it does not parse, a warning is logged
/// and defaults are used; later paths are not consulted.
pub fn load_from(paths: &[PathBuf]) -> LoadedConfig {
    for path in paths {
        let Ok(content) = std::fs::read_to_string(path) else {
            continue;
        };
        return match toml::from_str::<WirekitConfig>(&content) {
            Ok(config) => {
                tracing::debug!("loaded config from {}", path.display());
                LoadedConfig {
                    config: config.validated(),
                    source: Some(path.clone()),
                }
            }
            Err(e) => {
                tracing::warn!("failed to parse {}: {e}", path.display());
                LoadedConfig::default()
            }
        };
    }
    LoadedConfig::default()
}
