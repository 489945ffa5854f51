use serde::{Deserialize, Serialize};
use wirekit_common::DEFAULT_BUFFER_SIZE;

/// Settings loaded from `wirekit.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WirekitConfig {
    pub form: FormConfig,
    pub split: SplitConfig,
}

/// `[form]` table: defaults for `wirekit form`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfig {
    /// Streaming buffer capacity in bytes. Must be non-zero.
    pub buffer_size: usize,

    /// Print `Content-Type` and `Content-Length` to stderr.
    pub print_headers: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            print_headers: false,
        }
    }
}

/// `[split]` table: defaults for `wirekit split`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Print tokens as a JSON array instead of one per line.
    pub json: bool,
}

impl WirekitConfig {
    /// Replace out-of-range values with their defaults, warning about each.
    #[must_use]
    pub fn validated(mut self) -> Self {
        if self.form.buffer_size == 0 {
            tracing::warn!(
                "form.buffer_size = 0 is invalid, using the default of {DEFAULT_BUFFER_SIZE}"
            );
            self.form.buffer_size = DEFAULT_BUFFER_SIZE;
        }
        self
    }
}
