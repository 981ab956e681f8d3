use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    engine::{AllowedOperations, RequestContext},
    pipeline::{
        error::PipelineError,
        execution::execute_one,
        params::{extract, Record},
        response::ExecutionResponse,
    },
    shared_state::GraphQLEnvironment,
};

/// A decoded POST body, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchPlan {
    Single(Value),
    Batch(Vec<Value>),
}

/// Decides between single and batch mode and checks the batch preconditions. Nothing
/// has been executed when this fails.
pub fn plan_batch(decoded: Value, batching_enabled: bool) -> Result<BatchPlan, PipelineError> {
    match decoded {
        Value::Array(items) => {
            if !batching_enabled {
                warn!("batch request received while batching is disabled");
                return Err(PipelineError::BatchNotEnabled);
            }
            if items.is_empty() {
                warn!("batch request received with no entries");
                return Err(PipelineError::BatchEmptyList);
            }
            debug!(size = items.len(), "processing batch request");
            Ok(BatchPlan::Batch(items))
        }
        Value::Object(_) => Ok(BatchPlan::Single(decoded)),
        other => {
            warn!("request body is not an object nor a list");
            Err(PipelineError::NotADict(other))
        }
    }
}

/// Executes every entry of the plan. Batch entries run concurrently and come back in
/// submission order. The query string only feeds single requests.
pub async fn run_batch(
    environment: &GraphQLEnvironment,
    plan: BatchPlan,
    query_data: &Record,
    context: &RequestContext,
) -> ExecutionResponse {
    match plan {
        BatchPlan::Single(body) => ExecutionResponse::Single(
            execute_one(
                environment,
                extract(query_data, &body),
                AllowedOperations::POST,
                context,
            )
            .await,
        ),
        BatchPlan::Batch(items) => {
            let no_query_data = Record::new();
            let executions = items.iter().map(|item| {
                execute_one(
                    environment,
                    extract(&no_query_data, item),
                    AllowedOperations::POST,
                    context,
                )
            });

            ExecutionResponse::Batch(join_all(executions).await)
        }
    }
}
