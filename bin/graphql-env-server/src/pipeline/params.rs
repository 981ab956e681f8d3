use http::StatusCode;
use serde_json::{Map, Value};
use strum::IntoStaticStr;
use tracing::trace;

use crate::graphql_error::ExecutionError;

/// Flat key/value data a request carries, either from the query string or from one
/// entry of the body.
pub type Record = Map<String, Value>;

/// The inputs of one operation, resolved from the query string and/or one body entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionParams {
    pub query: Option<String>,
    pub query_id: Option<String>,
    pub operation_name: Option<String>,
    pub variables: Option<Value>,
}

/// Where the document to execute comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuerySource<'a> {
    Text(&'a str),
    PersistedId(&'a str),
}

impl ExecutionParams {
    /// Query text wins over a persisted query id; having neither is a client error.
    pub fn require_query(&self) -> Result<QuerySource<'_>, ParamsError> {
        match (self.query.as_deref(), self.query_id.as_deref()) {
            (Some(query), _) => Ok(QuerySource::Text(query)),
            (None, Some(query_id)) => Ok(QuerySource::PersistedId(query_id)),
            (None, None) => Err(ParamsError::MissingQuery),
        }
    }
}

/// Failures building the params of a single operation. They stay attached to the
/// entry that caused them.
#[derive(Debug, thiserror::Error, IntoStaticStr)]
pub enum ParamsError {
    #[error("Variables are invalid JSON.")]
    #[strum(serialize = "INVALID_VARIABLES_JSON")]
    InvalidVariablesJson(sonic_rs::Error),
    #[error("GraphQL params should be a dict. Received {0}.")]
    #[strum(serialize = "NOT_A_DICT")]
    NotADict(Value),
    #[error("Parameter '{0}' must be a string.")]
    #[strum(serialize = "INVALID_PARAM_TYPE")]
    InvalidParamType(&'static str),
    #[error("Must provide query string.")]
    #[strum(serialize = "MISSING_QUERY")]
    MissingQuery,
}

impl ParamsError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn error_code(&self) -> &'static str {
        self.into()
    }
}

impl From<ParamsError> for ExecutionError {
    fn from(err: ParamsError) -> Self {
        ExecutionError::with_status(err.to_string(), err.status_code())
    }
}

/// The body value wins over the query string value, field by field. `null` counts as absent.
fn resolve<'a>(field: &str, query_data: &'a Record, body_item: &'a Record) -> Option<&'a Value> {
    body_item
        .get(field)
        .filter(|value| !value.is_null())
        .or_else(|| query_data.get(field).filter(|value| !value.is_null()))
}

fn resolve_string(
    field: &'static str,
    query_data: &Record,
    body_item: &Record,
) -> Result<Option<String>, ParamsError> {
    match resolve(field, query_data, body_item) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ParamsError::InvalidParamType(field)),
    }
}

fn resolve_variables(
    query_data: &Record,
    body_item: &Record,
) -> Result<Option<Value>, ParamsError> {
    match resolve("variables", query_data, body_item) {
        None => Ok(None),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
        Some(Value::String(raw)) => {
            let variables: Value =
                sonic_rs::from_str(raw).map_err(ParamsError::InvalidVariablesJson)?;
            Ok(Some(variables).filter(|variables| !variables.is_null()))
        }
        Some(structured) => Ok(Some(structured.clone())),
    }
}

/// Builds the params of one operation from the query string data and one body entry.
pub fn extract(query_data: &Record, body_item: &Value) -> Result<ExecutionParams, ParamsError> {
    let Value::Object(body_item) = body_item else {
        return Err(ParamsError::NotADict(body_item.clone()));
    };

    let params = ExecutionParams {
        query: resolve_string("query", query_data, body_item)?,
        query_id: resolve_string("queryId", query_data, body_item)?,
        operation_name: resolve_string("operationName", query_data, body_item)?,
        variables: resolve_variables(query_data, body_item)?,
    };

    trace!(
        has_query = params.query.is_some(),
        query_id = params.query_id.as_deref(),
        operation_name = params.operation_name.as_deref(),
        "extracted execution params"
    );

    Ok(params)
}
