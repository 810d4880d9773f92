//! Conversion of handler return values into HTTP responses.
//!
//! | Return type | Status | Content-Type |
//! |-------------|--------|--------------|
//! | `String`, `&'static str` | 200 | `text/plain; charset=utf-8` |
//! | [`Json<T>`](crate::Json), [`JsonResponse<T>`] | 200 (or set) | `application/json` |
//! | `()` | 200 | none |
//! | [`NoContent`] | 204 | none |
//! | [`ProblemDetails`] | its status | `application/problem+json` |
//! | `Option<T>` | `None` is a 404 problem | |
//! | `Result<T, E>` | either side's response | |
//! | `(StatusCode, T)` | the given status | from `T` |

use bytes::Bytes;
use genesis_core::{GenesisError, ProblemDetails, PROBLEM_JSON_CONTENT_TYPE};
use http::header::{self, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;

use crate::{ExtractionError, Json};

/// Response body type.
pub type ResponseBody = Full<Bytes>;

/// HTTP response produced by handlers and filters.
pub type Response = http::Response<ResponseBody>;

/// Converts a value into a [`Response`].
pub trait IntoResponse {
    /// Performs the conversion.
    fn into_response(self) -> Response;
}

/// Builds a response with a body and content type.
pub fn body_response(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response {
    let mut response = http::Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Builds a response without a body.
pub fn empty_response(status: StatusCode) -> Response {
    let mut response = http::Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

/// Serializes a problem details body.
pub fn problem_response(problem: &ProblemDetails) -> Response {
    body_response(
        problem.status_code(),
        PROBLEM_JSON_CONTENT_TYPE,
        problem.to_json_bytes(),
    )
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => body_response(status, "application/json", body),
        Err(err) => {
            tracing::error!(error = %err, "response serialization failed");
            problem_response(
                &ProblemDetails::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                    .with_detail("response serialization failed"),
            )
        }
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        body_response(StatusCode::OK, "text/plain; charset=utf-8", self)
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        body_response(StatusCode::OK, "text/plain; charset=utf-8", self)
    }
}

impl IntoResponse for () {
    fn into_response(self) -> Response {
        empty_response(StatusCode::OK)
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        empty_response(self)
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        json_response(StatusCode::OK, &self.0)
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        problem_response(&self)
    }
}

impl IntoResponse for ExtractionError {
    fn into_response(self) -> Response {
        problem_response(&self.to_problem_details())
    }
}

impl IntoResponse for GenesisError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let title = status.canonical_reason().unwrap_or("Error");
        problem_response(&ProblemDetails::new(status, title).with_detail(self.to_string()))
    }
}

impl<T: IntoResponse> IntoResponse for Option<T> {
    fn into_response(self) -> Response {
        match self {
            Some(value) => value.into_response(),
            None => problem_response(&ProblemDetails::new(StatusCode::NOT_FOUND, "Not Found")),
        }
    }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(value) => value.into_response(),
            Err(err) => err.into_response(),
        }
    }
}

impl<T: IntoResponse> IntoResponse for (StatusCode, T) {
    fn into_response(self) -> Response {
        let (status, value) = self;
        let mut response = value.into_response();
        *response.status_mut() = status;
        response
    }
}

/// JSON body with an explicit status.
#[derive(Debug, Clone)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> JsonResponse<T> {
    /// 200 OK.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// 201 Created.
    #[must_use]
    pub fn created(data: T) -> Self {
        Self {
            data,
            status: StatusCode::CREATED,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response {
        json_response(self.status, &self.data)
    }
}

/// 204 No Content.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        empty_response(StatusCode::NO_CONTENT)
    }
}
