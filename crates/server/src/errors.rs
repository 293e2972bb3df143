// Copyright 2025 Alexandre D. Díaz
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use recordstore::DataError;
use serde_json::json;
use sessiontoken::TokenError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("{0}")]
    BadRequest(String),

    #[error("blocking task failed: {0}")]
    Blocking(String),
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        ApiError::Blocking(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Data(DataError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Data(_) | ApiError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Token(TokenError::Encoding(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Token(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(json!({
            "status": status.canonical_reason().unwrap_or("Error"),
            "message": self.to_string(),
        }))
    }
}
