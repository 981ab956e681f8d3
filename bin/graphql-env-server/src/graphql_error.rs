use http::StatusCode;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// An error produced by the execution engine itself, carrying the positional
/// information GraphQL clients expect.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<GraphQLErrorLocation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<GraphQLErrorPathSegment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQLError {
    pub fn from_message_and_code(message: impl Into<String>, code: &str) -> Self {
        GraphQLError {
            message: message.into(),
            locations: None,
            path: None,
            extensions: Some(json!({ "code": code })),
        }
    }

    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.locations
            .get_or_insert_with(Vec::new)
            .push(GraphQLErrorLocation { line, column });
        self
    }

    pub fn with_path(mut self, path: Vec<GraphQLErrorPathSegment>) -> Self {
        self.path = Some(path);
        self
    }
}

impl From<String> for GraphQLError {
    fn from(message: String) -> Self {
        GraphQLError {
            message,
            locations: None,
            path: None,
            extensions: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphQLErrorLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GraphQLErrorPathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for GraphQLErrorPathSegment {
    fn from(key: &str) -> Self {
        GraphQLErrorPathSegment::Key(key.to_string())
    }
}

impl From<usize> for GraphQLErrorPathSegment {
    fn from(index: usize) -> Self {
        GraphQLErrorPathSegment::Index(index)
    }
}

/// A failure attached to one execution outcome.
///
/// `Query` errors come from the engine and know where in the document they happened.
/// `Generic` errors are everything else: failures raised while preparing or running
/// the operation, optionally carrying the HTTP status the raiser wants to see.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("{}", .0.message)]
    Query(GraphQLError),
    #[error("{message}")]
    Generic {
        message: String,
        status_hint: Option<StatusCode>,
    },
}

impl ExecutionError {
    pub fn generic(message: impl Into<String>) -> Self {
        ExecutionError::Generic {
            message: message.into(),
            status_hint: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: StatusCode) -> Self {
        ExecutionError::Generic {
            message: message.into(),
            status_hint: Some(status),
        }
    }

    pub fn status_hint(&self) -> Option<StatusCode> {
        match self {
            ExecutionError::Query(_) => None,
            ExecutionError::Generic { status_hint, .. } => *status_hint,
        }
    }

    /// Returns the structured form when the error knows its locations and path.
    pub fn as_structured(&self) -> Option<&GraphQLError> {
        match self {
            ExecutionError::Query(error) => Some(error),
            ExecutionError::Generic { .. } => None,
        }
    }
}

impl From<GraphQLError> for ExecutionError {
    fn from(error: GraphQLError) -> Self {
        ExecutionError::Query(error)
    }
}

/// Turns one execution error into its JSON representation in the `errors` list.
pub trait ErrorFormatter: Send + Sync {
    fn format(&self, error: &ExecutionError) -> Value;
}

/// `{ message, locations?, path? }` for structured errors, `{ message }` for anything else.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultErrorFormatter;

impl ErrorFormatter for DefaultErrorFormatter {
    fn format(&self, error: &ExecutionError) -> Value {
        let Some(structured) = error.as_structured() else {
            return json!({ "message": error.to_string() });
        };

        let mut formatted = Map::new();
        formatted.insert(
            "message".to_string(),
            Value::String(structured.message.clone()),
        );

        if let Some(locations) = &structured.locations {
            let locations = locations
                .iter()
                .map(|location| json!({ "line": location.line, "column": location.column }))
                .collect();
            formatted.insert("locations".to_string(), Value::Array(locations));
        }

        if let Some(path) = &structured.path {
            let path = path
                .iter()
                .map(|segment| match segment {
                    GraphQLErrorPathSegment::Key(key) => Value::String(key.clone()),
                    GraphQLErrorPathSegment::Index(index) => Value::from(*index),
                })
                .collect();
            formatted.insert("path".to_string(), Value::Array(path));
        }

        Value::Object(formatted)
    }
}
