use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::views;

#[derive(Debug)]
pub enum AppError {
    /// A call to the user store failed; the message is deliberately generic.
    OperationFailed(String),
    NotFound(String),
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::OperationFailed(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::OperationFailed(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Internal details stay in the logs
        let message = match self {
            AppError::NotFound(_) => self.to_string(),
            _ => "Something went wrong. Please try again later.".to_string(),
        };
        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(views::error_page(status, &message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_variant() {
        assert_eq!(AppError::NotFound("user".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::OperationFailed("Failed to get user".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_stay_out_of_the_page() {
        let resp = AppError::Config("SESSION_SECRET leaked".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn operation_failed_displays_bare_message() {
        let err = AppError::OperationFailed("Failed to create user".into());
        assert_eq!(err.to_string(), "Failed to create user");
    }
}
