use http::header::{ACCEPT, CONTENT_TYPE};
use mediatype::{names, MediaType, ReadParams};
use ntex::http::HeaderMap;
use tracing::debug;

use crate::pipeline::params::Record;

/// `Accept` fragments telling that the client can display an HTML page.
const HTML_ACCEPT_MARKERS: &[&str] = &["text/html", "*/*"];

/// The query string flag that forces a JSON response even for browsers.
pub const RAW_QUERY_PARAM: &str = "raw";

/// How a POST body has to be decoded, based on its `Content-Type` essence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyContentType {
    /// `application/graphql`: the whole body is the query document.
    GraphQL,
    /// `application/json`: a single params object or an array of them.
    Json,
    /// `multipart/form-data`: text fields become a flat key/value record. The boundary
    /// is `None` when the header did not carry one.
    Multipart(Option<String>),
    /// Anything else, url-encoded forms included: a flat key/value record.
    Form,
}

impl BodyContentType {
    pub fn from_media_type(media_type: &MediaType) -> BodyContentType {
        let type_is = |name: &str| media_type.ty.as_str().eq_ignore_ascii_case(name);
        let subtype_is = |name: &str| media_type.subty.as_str().eq_ignore_ascii_case(name);

        if type_is(names::MULTIPART.as_str()) && subtype_is(names::FORM_DATA.as_str()) {
            let boundary = media_type
                .get_param(names::BOUNDARY)
                .map(|value| value.unquoted_str().into_owned());
            return BodyContentType::Multipart(boundary);
        }

        if media_type.suffix.is_some() || !type_is(names::APPLICATION.as_str()) {
            return BodyContentType::Form;
        }

        if subtype_is(names::JSON.as_str()) {
            BodyContentType::Json
        } else if subtype_is("graphql") {
            BodyContentType::GraphQL
        } else {
            BodyContentType::Form
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> BodyContentType {
        let Some(raw) = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        else {
            return BodyContentType::Form;
        };

        match MediaType::parse(raw) {
            Ok(media_type) => Self::from_media_type(&media_type),
            Err(err) => {
                debug!("unable to parse content-type '{}': {}", raw, err);
                BodyContentType::Form
            }
        }
    }
}

/// Whether the interactive console may answer instead of JSON: the client did not ask
/// for `raw` output and its `Accept` header takes HTML (or anything).
pub fn can_render_graphiql(query_data: &Record, headers: &HeaderMap) -> bool {
    if query_data.contains_key(RAW_QUERY_PARAM) {
        return false;
    }

    headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|accept| {
            HTML_ACCEPT_MARKERS
                .iter()
                .any(|marker| accept.contains(marker))
        })
        .unwrap_or(false)
}
