use graphql_env_config::GraphQLEnvConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ServerInitError {
    #[error(transparent)]
    ConfigError(#[from] GraphQLEnvConfigError),
    #[error("Failed to bind HTTP server to address: {0}. Error: {1}")]
    HttpServerBindError(String, std::io::Error),
    #[error("Failed to start HTTP server: {0}")]
    HttpServerStartError(std::io::Error),
}
