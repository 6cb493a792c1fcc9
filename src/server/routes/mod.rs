mod categories;
mod questions;
mod quizzes;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::{DbError, Question};
use crate::pagination::{paginate, QUESTIONS_PER_PAGE};
use crate::server::deserializers::{deserialize_page, first_page};

pub type ApiResponse<T> = Result<Envelope<T>, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("resource not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("unprocessable: {0}")]
    Unprocessable(String),

    #[error("server error: {0}")]
    ServerError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Bad request",
            ApiError::NotFound => "Resource not found",
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::Unprocessable(_) => "Not able to be processed",
            ApiError::ServerError(_) => "Server error",
        }
    }

    /// Failures while writing, or while reading back after a write, are
    /// reported as 422 rather than 500.
    pub fn unprocessable(error: DbError) -> Self {
        match error {
            DbError::NotFound { .. } => ApiError::NotFound,
            DbError::Persistence(e) => ApiError::Unprocessable(e.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::NotFound { .. } => ApiError::NotFound,
            DbError::Persistence(e) => ApiError::ServerError(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => ApiError::Unprocessable(e.body_text()),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

// an id that does not parse can not name an existing resource
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::ServerError(detail) => tracing::error!(%detail, "Request failed"),
            ApiError::BadRequest(detail) | ApiError::Unprocessable(detail) => {
                tracing::warn!(%detail, status = status.as_u16(), "Request rejected")
            }
            ApiError::NotFound | ApiError::MethodNotAllowed => {
                tracing::debug!(status = status.as_u16(), "Request rejected")
            }
        }
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

/// `{"success": true, ...}` around an endpoint payload.
#[derive(Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(flatten)]
    data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: usize,
}

/// One page of questions plus the size of the whole result set.
#[derive(Serialize, Debug)]
pub struct QuestionsList {
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

impl QuestionsList {
    pub fn page(all: &[Question], page: usize) -> Self {
        Self {
            questions: paginate(page, QUESTIONS_PER_PAGE, all).to_vec(),
            total_questions: all.len(),
        }
    }
}
