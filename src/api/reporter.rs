use std::fmt::Display;

use poem::{http::StatusCode, Response};
use serde::Serialize;
use tracing::error;

use super::error::ApiError;

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "Error")]
    error: String,
}

/// Turns a failure into a JSON error response and a log line carrying the
/// name of the operation that failed.
#[derive(Debug, Clone, Copy)]
pub struct ErrorReporter {
    pub func_name: &'static str,
    /// Write 400 whatever status is requested.
    pub legacy_status: bool,
}

impl ErrorReporter {
    pub fn new(func_name: &'static str, legacy_status: bool) -> Self {
        Self {
            func_name,
            legacy_status,
        }
    }

    pub fn report(&self, status: StatusCode, err: impl Display) -> Response {
        let message = err.to_string();
        error!("{}: {}", self.func_name, message);

        let status = if self.legacy_status {
            StatusCode::BAD_REQUEST
        } else {
            status
        };

        let body = serde_json::to_vec(&ErrorBody { error: message }).unwrap_or_default();
        Response::builder()
            .status(status)
            .content_type("application/json")
            .body(body)
    }

    pub fn report_api(&self, err: ApiError) -> Response {
        self.report(err.status(), err)
    }
}
