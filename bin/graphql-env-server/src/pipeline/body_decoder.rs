use std::{collections::HashMap, convert::Infallible};

use futures::stream;
use multer::{bytes::Bytes, Multipart};
use ntex::web::{error::QueryPayloadError, types::Query};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::pipeline::{error::PipelineError, header::BodyContentType, params::Record};

/// Decodes `a=1&b=2` style data into a flat record of strings.
pub fn decode_urlencoded(raw: &str) -> Result<Record, QueryPayloadError> {
    let pairs = Query::<HashMap<String, String>>::from_query(raw)?.0;

    Ok(pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect())
}

/// Collects the text fields of a `multipart/form-data` body. File parts are skipped.
pub async fn decode_multipart(boundary: &str, body: &[u8]) -> Result<Record, multer::Error> {
    let body = Bytes::copy_from_slice(body);
    let body_stream = stream::once(async move { Ok::<_, Infallible>(body) });
    let mut multipart = Multipart::new(body_stream, boundary);
    let mut record = Record::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            trace!("skipping unnamed multipart field");
            continue;
        };
        if let Some(file_name) = field.file_name() {
            trace!(field = %name, file_name, "skipping multipart file field");
            continue;
        }

        record.insert(name, Value::String(field.text().await?));
    }

    Ok(record)
}

/// Turns the raw POST body into a structured value according to its content type.
///
/// Only a JSON body can fail. Every other encoding degrades to an empty record when
/// nothing usable can be read from it.
pub async fn decode_body(
    content_type: BodyContentType,
    body: &[u8],
) -> Result<Value, PipelineError> {
    match content_type {
        BodyContentType::GraphQL => {
            trace!("wrapping application/graphql body as the query document");
            let mut record = Map::new();
            record.insert(
                "query".to_string(),
                Value::String(String::from_utf8_lossy(body).into_owned()),
            );
            Ok(Value::Object(record))
        }
        BodyContentType::Json => sonic_rs::from_slice::<Value>(body).map_err(|err| {
            warn!("failed to parse JSON body: {}", err);
            PipelineError::InvalidJson(err)
        }),
        BodyContentType::Multipart(None) => {
            debug!("multipart body without a boundary, treating it as empty");
            Ok(Value::Object(Record::new()))
        }
        BodyContentType::Multipart(Some(boundary)) => {
            let record = decode_multipart(&boundary, body)
                .await
                .unwrap_or_else(|err| {
                    debug!("malformed multipart body, treating it as empty: {}", err);
                    Record::new()
                });

            Ok(Value::Object(record))
        }
        BodyContentType::Form => {
            let record = std::str::from_utf8(body)
                .ok()
                .and_then(|raw| match decode_urlencoded(raw) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        debug!("body is not url-encoded, treating it as empty: {}", err);
                        None
                    }
                })
                .unwrap_or_default();

            Ok(Value::Object(record))
        }
    }
}
