use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use graphql_env_config::parse_yaml_config;
use graphql_env_server::{
    configure_ntex_app, AllowedOperations, ExecutionEngine, ExecutionError, ExecutionOutcome,
    ExecutionParams, GraphQLEnvironment, GraphQLError, MiddlewareChain, OperationKind,
    QuerySource, RequestContext, ServerSharedState,
};
use ntex::{
    http::{Request, StatusCode},
    web::{
        self,
        test::{self, TestRequest},
        WebResponse,
    },
    Pipeline, Service,
};
use serde_json::{json, Value};

/// Test engine whose behaviour is picked by the query text:
///
/// - `mutation ...` is a mutation and is checked against the allowed operations
/// - `{ fail }` raises a plain error, `{ unavailable }` raises one asking for a 503
/// - `{ panic }` panics inside the engine
/// - `{ partial }` returns data alongside a field error
/// - anything else echoes the params back as data
///
/// A numeric `delay` variable makes the execution sleep that many milliseconds first.
#[derive(Default)]
pub struct ScriptedEngine {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedEngine {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of executions that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExecutionEngine for ScriptedEngine {
    async fn execute(
        &self,
        params: &ExecutionParams,
        context: &RequestContext,
        allowed_operations: AllowedOperations,
        middleware: &MiddlewareChain,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let query = match params.require_query()? {
            QuerySource::Text(query) => query.trim(),
            QuerySource::PersistedId(id) => id,
        };

        let kind = if query.starts_with("mutation") {
            OperationKind::Mutation
        } else {
            OperationKind::Query
        };
        allowed_operations.ensure_allowed(kind)?;

        let delay = params
            .variables
            .as_ref()
            .and_then(|variables| variables.get("delay"))
            .and_then(Value::as_u64);
        if let Some(delay) = delay {
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
            ntex::time::sleep(Duration::from_millis(delay)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        match query {
            "{ fail }" => Err(ExecutionError::generic("scripted failure")),
            "{ unavailable }" => Err(ExecutionError::with_status(
                "backend unavailable",
                StatusCode::SERVICE_UNAVAILABLE,
            )),
            "{ panic }" => panic!("scripted panic"),
            "{ partial }" => Ok(ExecutionOutcome::from_data(json!({ "partial": null })).with_error(
                GraphQLError::from("partial failed".to_string())
                    .with_location(1, 3)
                    .with_path(vec!["partial".into()])
                    .into(),
            )),
            _ => Ok(ExecutionOutcome::from_data(json!({
                "query": query,
                "operationName": params.operation_name,
                "variables": params.variables,
                "method": context.method.as_str(),
                "middleware": middleware.len(),
            }))),
        }
    }
}

pub fn scripted_environment() -> (Arc<ScriptedEngine>, GraphQLEnvironment) {
    let engine = Arc::new(ScriptedEngine::default());
    let environment = GraphQLEnvironment::new(engine.clone());
    (engine, environment)
}

pub async fn init_app(
    config_yaml: &str,
    environment: GraphQLEnvironment,
) -> Pipeline<impl Service<Request, Response = WebResponse, Error = web::Error>> {
    let config = Arc::new(parse_yaml_config(config_yaml).expect("test config should be valid"));
    let shared_state = Arc::new(ServerSharedState::new(config.clone(), environment));

    test::init_service(
        web::App::new()
            .state(shared_state)
            .configure(|service_config| configure_ntex_app(service_config, &config)),
    )
    .await
}

pub fn init_graphql_request(body: Value) -> TestRequest {
    TestRequest::post()
        .uri("/graphql")
        .header("content-type", "application/json")
        .set_payload(body.to_string())
}

pub async fn json_body(response: WebResponse) -> Value {
    let body = test::read_body(response).await;
    serde_json::from_slice(&body).expect("the response body should be valid JSON")
}
