use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::{get, post},
};

use super::{
    dto::{ReviewerQuery, SetIsActiveRequest, UserResponse, UserReviewsResponse},
    extract::{AppJson, AppQuery},
    method_not_allowed, require,
};
use crate::{AppState, error::ApiError};

pub async fn set_is_active(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SetIsActiveRequest>,
) -> Result<ResponseJson<UserResponse>, ApiError> {
    let (user_id, Some(is_active)) = (payload.user_id, payload.is_active) else {
        return Err(ApiError::BadRequest(
            "user_id and is_active are required".to_string(),
        ));
    };
    require(&user_id, "user_id and is_active are required")?;

    let user = state.store().set_user_active(&user_id, is_active)?;
    Ok(ResponseJson(UserResponse { user: user.into() }))
}

pub async fn get_reviews(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ReviewerQuery>,
) -> Result<ResponseJson<UserReviewsResponse>, ApiError> {
    let user_id = query.user_id.unwrap_or_default();
    require(&user_id, "user_id is required")?;

    let pull_requests = state.store().list_pull_requests_by_reviewer(&user_id)?;
    Ok(ResponseJson(UserReviewsResponse {
        user_id,
        pull_requests: pull_requests.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/setIsActive",
            post(set_is_active).fallback(method_not_allowed),
        )
        .route(
            "/users/getReview",
            get(get_reviews).fallback(method_not_allowed),
        )
}
