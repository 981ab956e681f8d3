use std::{any::Any, fmt, sync::Arc};

use async_trait::async_trait;
use http::{Method, Uri};
use ntex::{http::HeaderMap, web::HttpRequest};
use serde_json::Value;
use strum::Display;

use crate::{
    graphql_error::{ExecutionError, GraphQLError},
    pipeline::params::ExecutionParams,
};

/// The query-language interpreter the server delegates to.
///
/// One instance is shared by every request of the process, so implementations must
/// tolerate concurrent calls. Returning `Err` is how an engine reports a failure that
/// makes the whole operation unusable; the server turns it into an invalid outcome.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn execute(
        &self,
        params: &ExecutionParams,
        context: &RequestContext,
        allowed_operations: AllowedOperations,
        middleware: &MiddlewareChain,
    ) -> Result<ExecutionOutcome, ExecutionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

/// The operation kinds an HTTP method may run. GET is limited to queries so that
/// side effects never happen on a safe method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedOperations(&'static [OperationKind]);

impl AllowedOperations {
    pub const GET: AllowedOperations = AllowedOperations(&[OperationKind::Query]);
    pub const POST: AllowedOperations = AllowedOperations(&[
        OperationKind::Query,
        OperationKind::Mutation,
        OperationKind::Subscription,
    ]);
    pub const NONE: AllowedOperations = AllowedOperations(&[]);

    pub fn for_method(method: &Method) -> AllowedOperations {
        if *method == Method::GET {
            AllowedOperations::GET
        } else if *method == Method::POST {
            AllowedOperations::POST
        } else {
            AllowedOperations::NONE
        }
    }

    pub fn contains(&self, kind: OperationKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = OperationKind> + '_ {
        self.0.iter().copied()
    }

    /// Engine-side check for the operation it resolved from the document.
    pub fn ensure_allowed(&self, kind: OperationKind) -> Result<(), ExecutionError> {
        if self.contains(kind) {
            return Ok(());
        }

        let allowed = self
            .iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        Err(GraphQLError::from_message_and_code(
            format!(
                "{} operations are not allowed for this request. Allowed operations: {}.",
                kind,
                if allowed.is_empty() { "none" } else { allowed.as_str() }
            ),
            "OPERATION_NOT_ALLOWED",
        )
        .into())
    }
}

/// Read-only view of the inbound HTTP request, handed to resolvers through the engine.
/// All entries of a batch share the same context.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl RequestContext {
    pub fn from_request(req: &HttpRequest) -> Self {
        Self {
            method: req.method().clone(),
            uri: req.uri().clone(),
            headers: req.headers().clone(),
        }
    }
}

/// Ordered middleware handed to the engine untouched. The server never inspects the
/// entries; engines look up the ones they understand with [`MiddlewareChain::find`].
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    entries: Vec<Arc<dyn Any + Send + Sync>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<M: Any + Send + Sync>(mut self, middleware: M) -> Self {
        self.entries.push(Arc::new(middleware));
        self
    }

    pub fn find<M: Any>(&self) -> Option<&M> {
        self.entries
            .iter()
            .find_map(|entry| entry.downcast_ref::<M>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// What one execution produced.
///
/// `invalid` marks results the engine considers unusable as a whole; partial data
/// alongside errors is still valid unless the engine says otherwise.
#[derive(Debug, Default)]
pub struct ExecutionOutcome {
    pub data: Option<Value>,
    pub errors: Vec<ExecutionError>,
    pub invalid: bool,
}

impl ExecutionOutcome {
    pub fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
            invalid: false,
        }
    }

    pub fn failed(error: ExecutionError) -> Self {
        Self {
            data: None,
            errors: vec![error],
            invalid: true,
        }
    }

    pub fn with_error(mut self, error: ExecutionError) -> Self {
        self.errors.push(error);
        self
    }
}
