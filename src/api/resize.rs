use std::sync::Arc;

use bytes::Bytes;
use poem::{handler, web::Data, Body, Request, Response};

use super::{
    check_mime_type,
    error::ApiError,
    image_response,
    mime::RASTER_TYPES,
    params::{get_int_parameter_with_limit, QueryParams},
    read_body,
    reporter::ErrorReporter,
    run_job,
};
use crate::service::AppState;

const FUNC_NAME: &str = "resizeImage";

/// `POST /ResizeImage?width=<int>&height=<int>`: force-resize, PNG out.
#[handler]
pub async fn resize_image(
    req: &Request,
    body: Body,
    Data(state): Data<&Arc<AppState>>,
) -> Response {
    match handle(req, body, state).await {
        Ok(buf) => image_response(FUNC_NAME, "image/png", buf),
        Err(e) => ErrorReporter::new(FUNC_NAME, state.legacy_error_status).report_api(e),
    }
}

async fn handle(req: &Request, body: Body, state: &AppState) -> Result<Bytes, ApiError> {
    check_mime_type(req, RASTER_TYPES)?;

    let params = QueryParams::parse(req.uri().query());
    let max = i64::from(state.max_dimension);
    let width = get_int_parameter_with_limit(&params, "width", 1, max)? as u32;
    let height = get_int_parameter_with_limit(&params, "height", 1, max)? as u32;

    let input = read_body(body).await?;
    run_job(state, input, move |p, input| p.resize_image(input, width, height)).await
}
