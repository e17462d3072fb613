//! JSON body extractor that runs `validator` rules before the handler.
//!
//! Every failure is a 400 whose body lists the offending fields at the top
//! level, e.g. `{"error": "...", "status_code": 400, "email": ["..."]}`.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use classroom_core::AppError;

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    match error.code.as_ref() {
        "email" => "Enter a valid email address.".to_string(),
        "length" => {
            if let Some(max) = error.params.get("max") {
                format!("Ensure this field has no more than {} characters.", max)
            } else if let Some(min) = error.params.get("min") {
                format!("Ensure this field has at least {} characters.", min)
            } else {
                format!("{} has an invalid length.", field)
            }
        }
        _ => format!("{} is invalid", field),
    }
}

fn validation_error(errors: &ValidationErrors) -> AppError {
    let mut fields: Vec<(String, Vec<String>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let field = field.to_string();
            let messages = errors.iter().map(|e| describe(&field, e)).collect();
            (field, messages)
        })
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let summary = fields
        .iter()
        .flat_map(|(_, messages)| messages.iter().cloned())
        .collect::<Vec<_>>()
        .join(", ");

    fields
        .into_iter()
        .fold(AppError::bad_request(summary), |err, (field, messages)| {
            err.with_field_errors(&field, messages)
        })
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request("Missing 'Content-Type: application/json' header");
    }

    let error_msg = rejection.body_text();

    if let Some(field) = error_msg
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return AppError::bad_request(format!("{} is required", field))
            .with_field_errors(field, vec!["This field is required.".to_string()]);
    }

    if error_msg.contains("unknown variant") {
        return AppError::bad_request("Invalid choice in request");
    }

    if error_msg.contains("invalid type") {
        return AppError::bad_request("Invalid field type in request");
    }

    AppError::bad_request("Invalid request body")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;

        value.validate().map_err(|errors| validation_error(&errors))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(email)]
        email: String,
        #[validate(length(min = 1, max = 5))]
        name: String,
    }

    async fn extract(body: &str, content_type: Option<&str>) -> Result<Payload, (StatusCode, Value)> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();

        match ValidatedJson::<Payload>::from_request(req, &()).await {
            Ok(ValidatedJson(payload)) => Ok(payload),
            Err(err) => {
                let response = err.into_response();
                let status = response.status();
                let bytes = response.into_body().collect().await.unwrap().to_bytes();
                Err((status, serde_json::from_slice(&bytes).unwrap()))
            }
        }
    }

    #[tokio::test]
    async fn test_valid_payload_passes() {
        let payload = extract(r#"{"email":"a@b.co","name":"ada"}"#, Some("application/json"))
            .await
            .unwrap();
        assert_eq!(payload.name, "ada");
    }

    #[tokio::test]
    async fn test_field_errors_listed_per_field() {
        let (status, body) = extract(
            r#"{"email":"nope","name":"far too long"}"#,
            Some("application/json"),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["email"][0], "Enter a valid email address.");
        assert_eq!(
            body["name"][0],
            "Ensure this field has no more than 5 characters."
        );
    }

    #[tokio::test]
    async fn test_missing_field_reported() {
        let (status, body) = extract(r#"{"email":"a@b.co"}"#, Some("application/json"))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name is required");
        assert_eq!(body["name"][0], "This field is required.");
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let (status, body) = extract(r#"{"email":"a@b.co","name":"ada"}"#, None)
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Content-Type"));
    }
}
