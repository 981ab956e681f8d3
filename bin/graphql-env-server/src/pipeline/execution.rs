use std::{any::Any, panic::AssertUnwindSafe};

use futures::FutureExt;
use http::StatusCode;
use tracing::{error, trace, warn};

use crate::{
    engine::{AllowedOperations, ExecutionOutcome, RequestContext},
    graphql_error::ExecutionError,
    pipeline::params::{ExecutionParams, ParamsError},
    shared_state::GraphQLEnvironment,
};

/// One executed entry: the params it ran with (if they could be built), what the
/// engine produced and the status the failure asked for, if any.
#[derive(Debug)]
pub struct BatchItem {
    pub params: Option<ExecutionParams>,
    pub outcome: ExecutionOutcome,
    pub status_hint: Option<StatusCode>,
}

impl BatchItem {
    fn failed(params: Option<ExecutionParams>, error: ExecutionError) -> Self {
        BatchItem {
            params,
            status_hint: error.status_hint(),
            outcome: ExecutionOutcome::failed(error),
        }
    }

    /// `invalid` results default to 400, anything else to 200, unless the failure
    /// carried its own status.
    pub fn status_code(&self) -> StatusCode {
        self.status_hint.unwrap_or(if self.outcome.invalid {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Runs one operation against the engine. Whatever goes wrong, including params that
/// could not be built and panics inside the engine, ends up in the returned outcome.
pub async fn execute_one(
    environment: &GraphQLEnvironment,
    params: Result<ExecutionParams, ParamsError>,
    allowed_operations: AllowedOperations,
    context: &RequestContext,
) -> BatchItem {
    let params = match params {
        Ok(params) => params,
        Err(err) => {
            warn!(code = err.error_code(), "unable to build execution params: {}", err);
            return BatchItem::failed(None, err.into());
        }
    };

    let execution = environment.engine.execute(
        &params,
        context,
        allowed_operations,
        &environment.middleware,
    );

    let result = AssertUnwindSafe(execution).catch_unwind().await;

    match result {
        Ok(Ok(outcome)) => {
            trace!(
                invalid = outcome.invalid,
                errors = outcome.errors.len(),
                "execution finished"
            );
            BatchItem {
                params: Some(params),
                outcome,
                status_hint: None,
            }
        }
        Ok(Err(err)) => {
            warn!("execution failed: {}", err);
            BatchItem::failed(Some(params), err)
        }
        Err(payload) => {
            error!("execution engine panicked: {}", panic_message(payload.as_ref()));
            BatchItem::failed(Some(params), ExecutionError::generic("Unexpected error"))
        }
    }
}
