use http::{header::ALLOW, Method, StatusCode};
use ntex::{
    http::{error::PayloadError, Response, ResponseBuilder},
    web::error::QueryPayloadError,
};
use serde::Serialize;
use serde_json::Value;
use strum::IntoStaticStr;

use crate::graphql_error::GraphQLError;

/// Failures that reject the whole HTTP request before any execution takes place.
#[derive(Debug, thiserror::Error, IntoStaticStr)]
pub enum PipelineError {
    #[error("GraphQL only supports GET and POST requests.")]
    #[strum(serialize = "METHOD_NOT_ALLOWED")]
    UnsupportedHttpMethod(Method),
    #[error("Failed to parse query parameters")]
    #[strum(serialize = "INVALID_QUERY_PARAMS")]
    InvalidQueryString(QueryPayloadError),
    #[error("POST body sent invalid JSON.")]
    #[strum(serialize = "INVALID_JSON")]
    InvalidJson(sonic_rs::Error),
    #[error("GraphQL params should be a dict. Received {0}.")]
    #[strum(serialize = "NOT_A_DICT")]
    NotADict(Value),
    #[error("Batch GraphQL requests are not enabled.")]
    #[strum(serialize = "BATCH_NOT_ENABLED")]
    BatchNotEnabled,
    #[error("Received an empty list in the batch request.")]
    #[strum(serialize = "BATCH_EMPTY_LIST")]
    BatchEmptyList,
    #[error("Content-Length header is not a valid size.")]
    #[strum(serialize = "INVALID_CONTENT_LENGTH")]
    InvalidContentLength,
    #[error("Request body is larger than the {0} bytes limit.")]
    #[strum(serialize = "PAYLOAD_TOO_LARGE")]
    PayloadTooLarge(usize),
    #[error("Request body could not be read: {0}")]
    #[strum(serialize = "PAYLOAD_READ_FAILED")]
    PayloadRead(PayloadError),
}

impl PipelineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedHttpMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::PayloadRead(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidContentLength
            | Self::InvalidQueryString(_)
            | Self::InvalidJson(_)
            | Self::NotADict(_)
            | Self::BatchNotEnabled
            | Self::BatchEmptyList => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.into()
    }
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct FailedExecutionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphQLError>>,
}

impl From<PipelineError> for Response {
    fn from(val: PipelineError) -> Self {
        let status = val.status_code();
        let graphql_error = GraphQLError::from_message_and_code(val.to_string(), val.error_code());

        let result = FailedExecutionResult {
            errors: Some(vec![graphql_error]),
        };

        let mut builder = ResponseBuilder::new(status);
        if let PipelineError::UnsupportedHttpMethod(_) = val {
            builder.header(ALLOW, "GET, POST, OPTIONS");
        }

        builder.json(&result)
    }
}
