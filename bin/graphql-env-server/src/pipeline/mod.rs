use http::Method;
use ntex::web::{self, HttpRequest};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{
    engine::{AllowedOperations, RequestContext},
    pipeline::{
        batch::{plan_batch, run_batch},
        body_decoder::{decode_body, decode_urlencoded},
        body_read::read_body,
        error::PipelineError,
        execution::execute_one,
        header::{can_render_graphiql, BodyContentType},
        params::{extract, Record},
        response::{format_response, ExecutionResponse},
    },
    shared_state::ServerSharedState,
};

pub mod batch;
pub mod body_decoder;
pub mod body_read;
pub mod error;
pub mod execution;
pub mod header;
pub mod params;
pub mod preflight;
pub mod response;

fn query_string_data(req: &HttpRequest) -> Result<Record, PipelineError> {
    match req.uri().query() {
        Some(raw) => decode_urlencoded(raw).map_err(PipelineError::InvalidQueryString),
        None => Ok(Record::new()),
    }
}

#[inline]
pub async fn graphql_request_handler(
    req: &HttpRequest,
    body_stream: web::types::Payload,
    shared_state: &ServerSharedState,
) -> Result<web::HttpResponse, PipelineError> {
    let query_data = query_string_data(req)?;
    let context = RequestContext::from_request(req);
    let environment = &shared_state.environment;

    let response = match *req.method() {
        Method::GET => {
            trace!("processing GET GraphQL request");
            let params = extract(&query_data, &Value::Object(Record::new()));
            let item = execute_one(environment, params, AllowedOperations::GET, &context).await;
            ExecutionResponse::Single(item)
        }
        Method::POST => {
            trace!("processing POST GraphQL request");
            let body = read_body(
                req,
                body_stream,
                shared_state.config.limits.max_request_body_size,
            )
            .await?;
            let content_type = BodyContentType::from_headers(req.headers());
            debug!(?content_type, size = body.len(), "decoding request body");

            let decoded = decode_body(content_type, &body).await?;
            let plan = plan_batch(decoded, shared_state.config.batching.enabled)?;
            run_batch(environment, plan, &query_data, &context).await
        }
        _ => {
            warn!("unsupported HTTP method: {}", req.method());
            return Err(PipelineError::UnsupportedHttpMethod(req.method().clone()));
        }
    };

    let formatted = format_response(&response, environment.error_formatter.as_ref());

    if *req.method() == Method::GET && shared_state.config.graphiql.enabled {
        if let Some(renderer) = environment.graphiql_renderer.as_ref() {
            if can_render_graphiql(&query_data, req.headers()) {
                trace!("rendering GraphiQL instead of a JSON response");
                let params = response.items().first().and_then(|item| item.params.as_ref());
                return Ok(renderer.render(params, &response, &formatted));
            }
        }
    }

    Ok(formatted.into_http_response())
}
