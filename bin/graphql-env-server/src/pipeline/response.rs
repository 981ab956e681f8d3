use http::StatusCode;
use ntex::{http::ResponseBuilder, web};
use serde_json::{Map, Value};

use crate::{graphql_error::ErrorFormatter, pipeline::execution::BatchItem};

/// The executed entries of one request, in submission order.
#[derive(Debug)]
pub enum ExecutionResponse {
    Single(BatchItem),
    Batch(Vec<BatchItem>),
}

impl ExecutionResponse {
    pub fn items(&self) -> &[BatchItem] {
        match self {
            ExecutionResponse::Single(item) => std::slice::from_ref(item),
            ExecutionResponse::Batch(items) => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormattedResponse {
    pub payload: Value,
    pub status: StatusCode,
}

fn format_item(item: &BatchItem, error_formatter: &dyn ErrorFormatter) -> Value {
    let outcome = &item.outcome;
    let mut payload = Map::new();

    if !outcome.errors.is_empty() {
        let errors = outcome
            .errors
            .iter()
            .map(|error| error_formatter.format(error))
            .collect();
        payload.insert("errors".to_string(), Value::Array(errors));
    }

    if !outcome.invalid {
        if let Some(data) = &outcome.data {
            payload.insert("data".to_string(), data.clone());
        }
    }

    Value::Object(payload)
}

/// Builds the JSON payload and the status code of the whole request. A batch answers
/// with the worst status of its entries.
pub fn format_response(
    response: &ExecutionResponse,
    error_formatter: &dyn ErrorFormatter,
) -> FormattedResponse {
    match response {
        ExecutionResponse::Single(item) => FormattedResponse {
            payload: format_item(item, error_formatter),
            status: item.status_code(),
        },
        ExecutionResponse::Batch(items) => FormattedResponse {
            payload: Value::Array(
                items
                    .iter()
                    .map(|item| format_item(item, error_formatter))
                    .collect(),
            ),
            status: items
                .iter()
                .map(BatchItem::status_code)
                .max()
                .unwrap_or(StatusCode::OK),
        },
    }
}

impl FormattedResponse {
    pub fn into_http_response(self) -> web::HttpResponse {
        ResponseBuilder::new(self.status).json(&self.payload)
    }
}
