use std::sync::Arc;

use bytes::Bytes;
use poem::{handler, web::Data, Body, Request, Response};

use super::{
    check_mime_type, error::ApiError, image_response, mime::PNG_ONLY, read_body,
    reporter::ErrorReporter, run_job,
};
use crate::service::AppState;

const FUNC_NAME: &str = "pngToJpg";

/// `POST /PngToJpg`: PNG in, JPEG out.
#[handler]
pub async fn png_to_jpg(
    req: &Request,
    body: Body,
    Data(state): Data<&Arc<AppState>>,
) -> Response {
    match handle(req, body, state).await {
        Ok(buf) => image_response(FUNC_NAME, "image/jpg", buf),
        Err(e) => ErrorReporter::new(FUNC_NAME, state.legacy_error_status).report_api(e),
    }
}

async fn handle(req: &Request, body: Body, state: &AppState) -> Result<Bytes, ApiError> {
    check_mime_type(req, PNG_ONLY)?;

    let input = read_body(body).await?;
    run_job(state, input, |p, input| p.convert_png_to_jpeg(input)).await
}
