use ntex::web;

use crate::pipeline::{
    params::ExecutionParams,
    response::{ExecutionResponse, FormattedResponse},
};

/// Renders the interactive query console for browsers hitting the endpoint with GET.
///
/// Only consulted when the console is enabled in the configuration and the request
/// accepts HTML without asking for `raw` output. `params` is `None` when the query
/// string could not be turned into params.
pub trait GraphiQLRenderer: Send + Sync {
    fn render(
        &self,
        params: Option<&ExecutionParams>,
        response: &ExecutionResponse,
        formatted: &FormattedResponse,
    ) -> web::HttpResponse;
}
