pub mod batching;
mod env_overrides;
pub mod graphiql;
pub mod http_server;
pub mod limits;
pub mod log;

use config::{Config, File, FileFormat, FileSourceFile};
use envconfig::Envconfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::path::PathBuf;

use crate::{
    batching::BatchingConfig,
    env_overrides::{EnvVarOverrides, EnvVarOverridesError},
    graphiql::GraphiQLConfig,
    http_server::HttpServerConfig,
    limits::LimitsConfig,
    log::LoggingConfig,
};

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GraphQLEnvConfig {
    /// The server logger configuration.
    #[serde(default)]
    pub log: LoggingConfig,

    /// Configuration for the HTTP server/listener.
    #[serde(default)]
    pub http: HttpServerConfig,

    /// Controls whether a POST body carrying a JSON array is accepted as a batch of operations.
    #[serde(default)]
    pub batching: BatchingConfig,

    /// Configuration for the interactive GraphiQL console hook.
    #[serde(default)]
    pub graphiql: GraphiQLConfig,

    /// Limits applied to incoming HTTP requests.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl GraphQLEnvConfig {
    pub fn address(&self) -> String {
        self.http.address()
    }

    pub fn graphql_path(&self) -> &str {
        &self.http.graphql_endpoint
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GraphQLEnvConfigError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
    #[error("Failed to apply configuration overrides: {0}")]
    EnvVarOverridesError(#[from] EnvVarOverridesError),
    #[error("Failed to load the environment variables: {0}")]
    EnvVarLoadError(#[from] envconfig::Error),
    #[error("Failed to parse the configuration file path: {0}")]
    ConfigPathParseError(Infallible),
}

static DEFAULT_FILE_NAMES: &[&str] = &[
    "graphql-env.config.yaml",
    "graphql-env.config.yml",
    "graphql-env.config.json",
    "graphql-env.config.json5",
];

/// Loads the configuration from `override_config_path` (or one of the default file names in
/// the working directory), then applies the environment variable overrides on top.
pub fn load_config(
    override_config_path: Option<String>,
) -> Result<GraphQLEnvConfig, GraphQLEnvConfigError> {
    let env_overrides = EnvVarOverrides::init_from_env()?;
    let mut config = Config::builder();

    if let Some(path_str) = override_config_path {
        let path_buf = path_str
            .parse::<PathBuf>()
            .map_err(GraphQLEnvConfigError::ConfigPathParseError)?;
        let as_file: File<FileSourceFile, _> = path_buf.into();

        config = config.add_source(as_file.required(true));
    } else {
        for name in DEFAULT_FILE_NAMES {
            config = config.add_source(File::with_name(name).required(false));
        }
    }

    config = env_overrides.apply_overrides(config)?;

    Ok(config.build()?.try_deserialize::<GraphQLEnvConfig>()?)
}

pub fn parse_yaml_config(config_raw: &str) -> Result<GraphQLEnvConfig, GraphQLEnvConfigError> {
    Config::builder()
        .add_source(File::from_str(config_raw, FileFormat::Yaml))
        .build()?
        .try_deserialize::<GraphQLEnvConfig>()
        .map_err(GraphQLEnvConfigError::ConfigLoadError)
}
