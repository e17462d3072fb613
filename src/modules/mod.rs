pub mod auth;
pub mod classes;
pub mod health;
pub mod users;

use serde::Serialize;
use utoipa::ToSchema;

/// Error body shape, for the OpenAPI document.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub status_code: u16,
}
