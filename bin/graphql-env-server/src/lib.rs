mod engine;
mod error;
mod graphiql;
mod graphql_error;
mod http_utils;
mod logger;
pub mod pipeline;
mod shared_state;

use std::sync::Arc;

use graphql_env_config::{load_config, GraphQLEnvConfig};
use http::Method;
use ntex::web::{self, HttpRequest};
use tracing::info;

use crate::{
    http_utils::probes::health_check_handler,
    logger::configure_logging,
    pipeline::{graphql_request_handler, preflight::preflight_response},
};

pub use crate::{
    engine::{
        AllowedOperations, ExecutionEngine, ExecutionOutcome, MiddlewareChain, OperationKind,
        RequestContext,
    },
    error::ServerInitError,
    graphiql::GraphiQLRenderer,
    graphql_error::{
        DefaultErrorFormatter, ErrorFormatter, ExecutionError, GraphQLError, GraphQLErrorLocation,
        GraphQLErrorPathSegment,
    },
    pipeline::{
        params::{ExecutionParams, ParamsError, QuerySource},
        response::{ExecutionResponse, FormattedResponse},
    },
    shared_state::{GraphQLEnvironment, ServerSharedState},
};

pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

async fn graphql_endpoint_handler(
    request: HttpRequest,
    body_stream: web::types::Payload,
    app_state: web::types::State<Arc<ServerSharedState>>,
) -> web::HttpResponse {
    if request.method() == Method::OPTIONS {
        return preflight_response(request.headers());
    }

    match graphql_request_handler(&request, body_stream, app_state.get_ref()).await {
        Ok(response) => response,
        Err(err) => err.into(),
    }
}

/// Boots the HTTP server around `environment`, using the configuration file found in the
/// working directory (or `GRAPHQL_ENV_CONFIG_FILE_PATH`).
pub async fn server_entrypoint(environment: GraphQLEnvironment) -> Result<(), ServerInitError> {
    let config_path = std::env::var("GRAPHQL_ENV_CONFIG_FILE_PATH").ok();
    let config = load_config(config_path)?;
    configure_logging(&config.log);
    info!("graphql-env-server@{} starting...", SERVER_VERSION);

    let addr = config.address();
    info!(
        "serving GraphQL on http://{}{}",
        addr,
        config.graphql_path()
    );
    let shared_state = Arc::new(ServerSharedState::new(Arc::new(config), environment));

    web::HttpServer::new(move || {
        let shared_state = shared_state.clone();
        async move {
            web::App::new()
                .state(shared_state.clone())
                .configure(|service_config| {
                    configure_ntex_app(service_config, &shared_state.config);
                })
        }
    })
    .bind(&addr)
    .map_err(|err| ServerInitError::HttpServerBindError(addr.clone(), err))?
    .run()
    .await
    .map_err(ServerInitError::HttpServerStartError)
}

pub fn configure_ntex_app(service_config: &mut web::ServiceConfig, config: &GraphQLEnvConfig) {
    service_config
        .route(config.graphql_path(), web::to(graphql_endpoint_handler))
        .route("/health", web::to(health_check_handler));
}
