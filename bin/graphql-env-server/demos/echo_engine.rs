//! Serves an engine that answers every operation with its own params.
//!
//! ```sh
//! cargo run -p graphql-env-server --example echo_engine
//! curl -s localhost:4000/graphql -H 'content-type: application/json' \
//!   -d '[{"query":"{ a }"},{"query":"mutation { b }"}]'
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use graphql_env_server::{
    server_entrypoint, AllowedOperations, ExecutionEngine, ExecutionError, ExecutionOutcome,
    ExecutionParams, GraphQLEnvironment, MiddlewareChain, OperationKind, QuerySource,
    RequestContext,
};
use serde_json::json;

struct EchoEngine;

#[async_trait]
impl ExecutionEngine for EchoEngine {
    async fn execute(
        &self,
        params: &ExecutionParams,
        context: &RequestContext,
        allowed_operations: AllowedOperations,
        _middleware: &MiddlewareChain,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        let query = match params.require_query()? {
            QuerySource::Text(query) => query,
            QuerySource::PersistedId(id) => {
                return Err(ExecutionError::generic(format!(
                    "Persisted query '{}' not found.",
                    id
                )))
            }
        };

        let kind = if query.trim_start().starts_with("mutation") {
            OperationKind::Mutation
        } else if query.trim_start().starts_with("subscription") {
            OperationKind::Subscription
        } else {
            OperationKind::Query
        };
        allowed_operations.ensure_allowed(kind)?;

        Ok(ExecutionOutcome::from_data(json!({
            "kind": kind.to_string(),
            "query": query,
            "operationName": params.operation_name,
            "variables": params.variables,
            "userAgent": context
                .headers
                .get("user-agent")
                .and_then(|value| value.to_str().ok()),
        })))
    }
}

#[ntex::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    server_entrypoint(GraphQLEnvironment::new(Arc::new(EchoEngine))).await?;

    Ok(())
}
