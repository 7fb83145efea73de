//! HTTP rendering of domain errors and extractor rejections.
//!
//! Server-side failures are logged in full but reach clients without
//! details, and `internal_error` messages are replaced outright. Client
//! errors pass through unchanged.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use tracing::{debug, error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Largest accepted JSON body.
///
/// A preview request can carry a draft whose hero image is already a 500 KB
/// upload alongside a replacement upload of the same size, both base64
/// encoded.
pub const JSON_LIMIT_BYTES: usize = 2 * 1024 * 1024;

const INTERNAL_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// What a client is allowed to see of `error`.
fn redact(error: &Error) -> Error {
    let code = error.code();
    if !code.is_server_side() {
        return error.clone();
    }
    let message = if code == ErrorCode::InternalError {
        INTERNAL_MESSAGE
    } else {
        error.message()
    };
    let visible = Error::new(code, message);
    match error.trace_id() {
        Some(id) => visible.with_trace_id(id),
        None => visible,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if self.code().is_server_side() {
            error!(
                code = ?self.code(),
                message = self.message(),
                details = ?self.details(),
                "request failed"
            );
        } else {
            debug!(code = ?self.code(), message = self.message(), "request rejected");
        }
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id));
        }
        response.json(redact(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced as internal error");
        Self::internal(INTERNAL_MESSAGE)
    }
}

fn json_payload_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "rejected JSON body");
    let problem = match &err {
        JsonPayloadError::ContentType => "unsupported_content_type",
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "payload_too_large"
        }
        _ => "malformed_body",
    };
    Error::invalid_field("body", problem, format!("Request body is invalid: {err}")).into()
}

fn query_payload_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "rejected query string");
    Error::invalid_field(
        "query",
        "malformed_query",
        format!("Query string is invalid: {err}"),
    )
    .into()
}

/// JSON extractor config: size limit plus `invalid_request` rejections.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(json_payload_error)
}

/// Query extractor config reporting bad query strings as `invalid_request`.
#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_payload_error)
}
