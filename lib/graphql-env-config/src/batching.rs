use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(deny_unknown_fields)]
pub struct BatchingConfig {
    /// Accept POST bodies that carry a JSON array of operations. Each entry is executed
    /// concurrently and the response is an array in the same order.
    ///
    /// When disabled, array bodies are rejected with `400 Bad Request` before anything runs.
    ///
    /// Can also be set via the `BATCHING_ENABLED` environment variable.
    #[serde(default = "default_batching_enabled")]
    pub enabled: bool,
}

fn default_batching_enabled() -> bool {
    true
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            enabled: default_batching_enabled(),
        }
    }
}
