use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use common::AppError;
use db::DbError;
use serde_json::json;
use std::fmt;

/// HTTP-facing error: an `AppError` kind plus the message serialized into the
/// `{"message": ...}` body.
#[derive(Debug)]
pub struct HttpApiError {
    kind: AppError,
    message: String,
}

impl HttpApiError {
    pub fn new(kind: AppError, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(AppError::BadRequest(message.clone()), message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(AppError::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(AppError::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(AppError::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(AppError::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(AppError::Internal, message)
    }
}

impl fmt::Display for HttpApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<AppError> for HttpApiError {
    fn from(kind: AppError) -> Self {
        let message = match &kind {
            AppError::NotFound => "Not found".to_string(),
            AppError::Conflict => "Conflict".to_string(),
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::Forbidden => "Forbidden".to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Internal => "Server error".to_string(),
        };
        Self { kind, message }
    }
}

impl From<DbError> for HttpApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Conflict(detail) => {
                tracing::warn!("db conflict: {detail}");
                Self::conflict("Already registered")
            }
            other => {
                tracing::error!("db error: {other}");
                Self::internal("Server error")
            }
        }
    }
}

impl From<auth::AuthError> for HttpApiError {
    fn from(e: auth::AuthError) -> Self {
        tracing::error!("auth error: {e}");
        Self::internal("Server error")
    }
}

impl ResponseError for HttpApiError {
    fn status_code(&self) -> StatusCode {
        match self.kind {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "message": self.message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        let cases = [
            (AppError::BadRequest("x".into()), 400),
            (AppError::Unauthorized, 401),
            (AppError::Forbidden, 403),
            (AppError::NotFound, 404),
            (AppError::Conflict, 409),
            (AppError::Internal, 500),
        ];
        for (kind, expected) in cases {
            let err = HttpApiError::from(kind);
            assert_eq!(err.status_code().as_u16(), expected);
        }
    }

    #[test]
    fn body_carries_the_message() {
        let err = HttpApiError::not_found("Booking not found");
        let resp = err.error_response();
        assert_eq!(resp.status().as_u16(), 404);
        assert_eq!(err.to_string(), "Booking not found");
    }

    #[test]
    fn db_conflict_becomes_409() {
        let err = HttpApiError::from(DbError::Conflict("duplicate key".into()));
        assert_eq!(err.status_code().as_u16(), 409);
    }
}
