use axum::{
    body::BoxBody,
    http::{header, HeaderValue, Response, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;

use crate::ENCODING_FAILED_BODY;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub error_code: u32,
}

impl ErrorBody {
    #[inline]
    pub fn new(message: String, error_code: u32) -> Self {
        Self {
            message,
            error_code,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No users found")]
    UserNotFound,
    #[error("No users added")]
    UserNotCreated,
    #[error("No users were updated")]
    UserNotUpdated,
    #[error("No users were deleted")]
    UserNotDeleted,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Something went wrong with the database")]
    DatabaseError,
    #[error("Failed to process the provided password")]
    PasswordHashFailed,
    #[error("Failed to generate the authentication token")]
    TokenGenerationFailed,
    #[error("Server service panicked: {0:?}")]
    ServicePanicked(Option<String>),
}

impl From<&ApiError> for StatusCode {
    fn from(value: &ApiError) -> Self {
        match value {
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::UserNotCreated => StatusCode::BAD_REQUEST,
            ApiError::UserNotUpdated => StatusCode::BAD_REQUEST,
            ApiError::UserNotDeleted => StatusCode::BAD_REQUEST,
            // The upstream contract reports login failures with a 200 and an
            // error body; kept as-is for client compatibility.
            ApiError::InvalidCredentials => StatusCode::OK,
            ApiError::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PasswordHashFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::TokenGenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServicePanicked(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&ApiError> for u32 {
    fn from(value: &ApiError) -> Self {
        match value {
            ApiError::UserNotFound => 40401,
            ApiError::UserNotCreated => 40001,
            ApiError::UserNotUpdated => 40002,
            ApiError::UserNotDeleted => 40003,
            ApiError::InvalidCredentials => 20001,
            ApiError::DatabaseError => 50002,
            ApiError::PasswordHashFailed => 50003,
            ApiError::TokenGenerationFailed => 50004,
            ApiError::ServicePanicked(_) => 50001,
        }
    }
}

#[derive(Debug)]
pub struct ErrorResponse {
    pub status_code: StatusCode,
    pub error_code: u32,
    pub message: String,
}

impl From<ApiError> for ErrorResponse {
    fn from(value: ApiError) -> Self {
        Self {
            status_code: (&value).into(),
            error_code: (&value).into(),
            message: value.to_string(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response<BoxBody> {
        let err_body = ErrorBody::new(self.message, self.error_code);

        let tuple = match serde_json::to_vec(&err_body) {
            Ok(buf) => (
                self.status_code,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
                )],
                buf,
            ),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
                )],
                ENCODING_FAILED_BODY.to_vec(),
            ),
        };

        tuple.into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response<BoxBody> {
        ErrorResponse::from(self).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_login_failure_keeps_ok_status() {
        let status: StatusCode = (&ApiError::InvalidCredentials).into();
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn test_empty_result_statuses() {
        let status: StatusCode = (&ApiError::UserNotFound).into();
        assert_eq!(status, StatusCode::NOT_FOUND);

        for err in [
            ApiError::UserNotCreated,
            ApiError::UserNotUpdated,
            ApiError::UserNotDeleted,
        ] {
            let status: StatusCode = (&err).into();
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }
}
