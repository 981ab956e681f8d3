use futures::TryStreamExt;
use http::header::CONTENT_LENGTH;
use ntex::{
    util::{Bytes, BytesMut},
    web::{self, HttpRequest},
};

use crate::pipeline::error::PipelineError;

/// The `Content-Length` the client announced, if any. Announcing more than `limit`
/// bytes rejects the request before anything is read.
fn announced_length(req: &HttpRequest, limit: usize) -> Result<Option<usize>, PipelineError> {
    let Some(header) = req.headers().get(CONTENT_LENGTH) else {
        return Ok(None);
    };

    let length = header
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .ok_or(PipelineError::InvalidContentLength)?;

    if length > limit {
        return Err(PipelineError::PayloadTooLarge(limit));
    }

    Ok(Some(length))
}

/// Buffers the whole request payload. Stops as soon as more than `limit` bytes arrived,
/// whatever `Content-Length` said.
pub async fn read_body(
    req: &HttpRequest,
    payload: web::types::Payload,
    limit: usize,
) -> Result<Bytes, PipelineError> {
    let buffer = BytesMut::with_capacity(announced_length(req, limit)?.unwrap_or_default());

    let body = payload
        .map_err(PipelineError::PayloadRead)
        .try_fold(buffer, |mut body, chunk| async move {
            if body.len() + chunk.len() > limit {
                return Err(PipelineError::PayloadTooLarge(limit));
            }
            body.extend_from_slice(&chunk);
            Ok(body)
        })
        .await?;

    Ok(body.freeze())
}
