use std::sync::Arc;

use graphql_env_config::GraphQLEnvConfig;

use crate::{
    engine::{ExecutionEngine, MiddlewareChain},
    graphiql::GraphiQLRenderer,
    graphql_error::{DefaultErrorFormatter, ErrorFormatter},
};

/// Everything the request handlers need to run operations. Built once by the embedder
/// and shared by every request.
#[derive(Clone)]
pub struct GraphQLEnvironment {
    pub engine: Arc<dyn ExecutionEngine>,
    pub middleware: MiddlewareChain,
    pub error_formatter: Arc<dyn ErrorFormatter>,
    pub graphiql_renderer: Option<Arc<dyn GraphiQLRenderer>>,
}

impl GraphQLEnvironment {
    pub fn new(engine: Arc<dyn ExecutionEngine>) -> Self {
        Self {
            engine,
            middleware: MiddlewareChain::new(),
            error_formatter: Arc::new(DefaultErrorFormatter),
            graphiql_renderer: None,
        }
    }

    pub fn with_middleware(mut self, middleware: MiddlewareChain) -> Self {
        self.middleware = middleware;
        self
    }

    pub fn with_error_formatter(mut self, error_formatter: Arc<dyn ErrorFormatter>) -> Self {
        self.error_formatter = error_formatter;
        self
    }

    pub fn with_graphiql_renderer(mut self, renderer: Arc<dyn GraphiQLRenderer>) -> Self {
        self.graphiql_renderer = Some(renderer);
        self
    }
}

pub struct ServerSharedState {
    pub config: Arc<GraphQLEnvConfig>,
    pub environment: GraphQLEnvironment,
}

impl ServerSharedState {
    pub fn new(config: Arc<GraphQLEnvConfig>, environment: GraphQLEnvironment) -> Self {
        Self {
            config,
            environment,
        }
    }
}
