//! Application error type.
//!
//! Every handler returns `Result<_, AppError>`. The error carries the HTTP
//! status, the underlying [`anyhow::Error`], and optional field-level details
//! that are merged into the JSON body:
//!
//! ```json
//! { "error": "Passwords do not match", "status_code": 400, "confirm_password": ["..."] }
//! ```
//!
//! Server errors (5xx other than 503) are logged with full detail and
//! answered with a generic message so internals never reach the caller.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub details: Option<Map<String, Value>>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            details: None,
        }
    }

    fn with_message(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, Error::msg(message.into()))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::BAD_REQUEST, message)
    }

    /// Duplicate enrollment or duplicate unique field. Reported as 400.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::NOT_FOUND, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    /// A 400 carrying one or more messages for a single field.
    pub fn validation(field: &str, messages: Vec<String>) -> Self {
        let summary = messages.join(" ");
        Self::bad_request(summary).with_field_errors(field, messages)
    }

    pub fn with_field_errors(mut self, field: &str, messages: Vec<String>) -> Self {
        let details = self.details.get_or_insert_with(Map::new);
        details.insert(
            field.to_string(),
            Value::Array(messages.into_iter().map(Value::String).collect()),
        );
        self
    }

    fn is_hidden(&self) -> bool {
        self.status.is_server_error() && self.status != StatusCode::SERVICE_UNAVAILABLE
    }

    /// The message that is safe to show to the caller.
    pub fn public_message(&self) -> String {
        if self.is_hidden() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.error.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_hidden() {
            tracing::error!(
                status = %self.status.as_u16(),
                error = ?self.error,
                "Unhandled error while processing request"
            );
        }

        let mut body = json!({
            "error": self.public_message(),
            "status_code": self.status.as_u16(),
        });

        if let (Some(details), Some(object)) = (self.details, body.as_object_mut()) {
            for (key, value) in details {
                object.entry(key).or_insert(value);
            }
        }

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_body_shape() {
        let (status, body) = body_of(AppError::bad_request("Invalid code")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid code");
        assert_eq!(body["status_code"], 400);
    }

    #[tokio::test]
    async fn test_conflict_maps_to_400() {
        let (status, body) = body_of(AppError::conflict("Already enrolled")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Already enrolled");
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let err = AppError::internal(anyhow::anyhow!("connection reset by peer"));
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_service_unavailable_keeps_message() {
        let (status, body) =
            body_of(AppError::service_unavailable("Could not allocate a class code")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Could not allocate a class code");
    }

    #[tokio::test]
    async fn test_field_errors_merged_at_top_level() {
        let err = AppError::validation(
            "password",
            vec![
                "This password is too short.".to_string(),
                "This password is entirely numeric.".to_string(),
            ],
        );
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["password"].as_array().unwrap().len(), 2);
        assert_eq!(body["status_code"], 400);
    }

    #[tokio::test]
    async fn test_details_never_overwrite_reserved_keys() {
        let err = AppError::bad_request("real")
            .with_field_errors("error", vec!["spoofed".to_string()])
            .with_field_errors("status_code", vec!["200".to_string()]);
        let (_, body) = body_of(err).await;
        assert_eq!(body["error"], "real");
        assert_eq!(body["status_code"], 400);
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
