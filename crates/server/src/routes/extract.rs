use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// `Json` extractor whose rejection renders as a `BAD_REQUEST` error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `Query` extractor whose rejection renders as a `BAD_REQUEST` error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);
