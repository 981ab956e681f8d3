use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum size of a request body in bytes. Checked against `Content-Length`
    /// first and again while the body stream is read.
    #[serde(default = "default_max_request_body_size")]
    pub max_request_body_size: usize,
}

fn default_max_request_body_size() -> usize {
    2 * 1024 * 1024
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_body_size: default_max_request_body_size(),
        }
    }
}
