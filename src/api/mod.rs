use bytes::Bytes;
use poem::{
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    Body, Request, Response,
};

use crate::{
    core::{ImageProcessor, ProcessingError},
    service::AppState,
};

pub mod body;
pub mod compress;
pub mod convert;
pub mod error;
pub mod mime;
pub mod params;
pub mod reporter;
pub mod resize;

use body::TrackedBody;
use error::ApiError;

/// Fails with [`ApiError::InvalidMimeType`] unless every `Content-Type`
/// header on `req` is in `allowed`.
pub fn check_mime_type(req: &Request, allowed: &[&str]) -> Result<(), ApiError> {
    let declared: Vec<&str> = req
        .headers()
        .get_all(CONTENT_TYPE)
        .iter()
        .map(|v| v.to_str().unwrap_or_default())
        .collect();

    if !mime::is_allowed(&declared, allowed) {
        return Err(ApiError::InvalidMimeType);
    }
    Ok(())
}

pub async fn read_body(body: Body) -> Result<Vec<u8>, ApiError> {
    body.into_vec()
        .await
        .map_err(|e| ApiError::BodyReadError(e.to_string()))
}

/// Runs an image job on the blocking pool once a job slot is free.
pub async fn run_job<F>(state: &AppState, input: Vec<u8>, job: F) -> Result<Bytes, ApiError>
where
    F: FnOnce(&dyn ImageProcessor, &[u8]) -> Result<Bytes, ProcessingError> + Send + 'static,
{
    let permit = state
        .jobs
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| ProcessingError::Failed(e.to_string()))?;

    // The slot is held by the blocking task, so a dropped request does not
    // free it while the job is still running.
    let processor = state.processor.clone();
    let output = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        job(processor.as_ref(), &input)
    })
    .await
        .map_err(|e| ProcessingError::Failed(e.to_string()))??;

    Ok(output)
}

pub fn image_response(func_name: &'static str, content_type: &str, data: Bytes) -> Response {
    let len = data.len();
    Response::builder()
        .status(StatusCode::OK)
        .content_type(content_type)
        .header(CONTENT_LENGTH, len)
        .body(Body::from_async_read(TrackedBody::new(func_name, data)))
}
