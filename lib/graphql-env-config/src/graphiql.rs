use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(deny_unknown_fields)]
pub struct GraphiQLConfig {
    /// Lets a registered GraphiQL renderer answer browser GET requests instead of JSON.
    /// Clients can always opt out per request with the `raw` query parameter.
    ///
    /// You can override this setting by setting the `GRAPHIQL_ENABLED` environment variable
    /// to `true` or `false`.
    #[serde(default = "default_graphiql_enabled")]
    pub enabled: bool,
}

fn default_graphiql_enabled() -> bool {
    true
}

impl Default for GraphiQLConfig {
    fn default() -> Self {
        Self {
            enabled: default_graphiql_enabled(),
        }
    }
}
