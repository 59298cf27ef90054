pub mod dto;
pub mod extract;
pub mod health;
pub mod pull_requests;
pub mod teams;
pub mod users;

use crate::error::ApiError;

/// Rejects an absent or empty required field before the store is called.
pub(crate) fn require(value: &str, message: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::BadRequest(message.to_string()));
    }
    Ok(())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
