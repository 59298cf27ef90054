use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use review_store::CreatePullRequest;

use super::{
    dto::{
        CreatePullRequestRequest, MergePullRequestRequest, PullRequestQuery,
        PullRequestResponse, ReassignRequest, ReassignResponse,
    },
    extract::{AppJson, AppQuery},
    method_not_allowed, require,
};
use crate::{AppState, error::ApiError};

pub async fn create_pull_request(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePullRequestRequest>,
) -> Result<(StatusCode, ResponseJson<PullRequestResponse>), ApiError> {
    const MISSING: &str = "pull_request_id, pull_request_name, and author_id are required";
    require(&payload.pull_request_id, MISSING)?;
    require(&payload.pull_request_name, MISSING)?;
    require(&payload.author_id, MISSING)?;

    tracing::debug!(
        "Creating pull request '{}' for author {}",
        payload.pull_request_id,
        payload.author_id
    );
    let pr = state.store().create_pull_request(CreatePullRequest::new(
        payload.pull_request_id,
        payload.pull_request_name,
        payload.author_id,
    ))?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(PullRequestResponse { pr: pr.into() }),
    ))
}

pub async fn get_pull_request(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PullRequestQuery>,
) -> Result<ResponseJson<PullRequestResponse>, ApiError> {
    let pull_request_id = query.pull_request_id.unwrap_or_default();
    require(&pull_request_id, "pull_request_id is required")?;

    let pr = state.store().get_pull_request(&pull_request_id)?;
    Ok(ResponseJson(PullRequestResponse { pr: pr.into() }))
}

pub async fn merge_pull_request(
    State(state): State<AppState>,
    AppJson(payload): AppJson<MergePullRequestRequest>,
) -> Result<ResponseJson<PullRequestResponse>, ApiError> {
    require(&payload.pull_request_id, "pull_request_id is required")?;

    let pr = state.store().merge_pull_request(&payload.pull_request_id)?;
    Ok(ResponseJson(PullRequestResponse { pr: pr.into() }))
}

pub async fn reassign_reviewer(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReassignRequest>,
) -> Result<ResponseJson<ReassignResponse>, ApiError> {
    const MISSING: &str = "pull_request_id and old_user_id are required";
    require(&payload.pull_request_id, MISSING)?;
    require(&payload.old_user_id, MISSING)?;

    let reassignment = state
        .store()
        .reassign_reviewer(&payload.pull_request_id, &payload.old_user_id)?;
    Ok(ResponseJson(reassignment.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/pullRequest/create",
            post(create_pull_request).fallback(method_not_allowed),
        )
        .route(
            "/pullRequest/get",
            get(get_pull_request).fallback(method_not_allowed),
        )
        .route(
            "/pullRequest/merge",
            post(merge_pull_request).fallback(method_not_allowed),
        )
        .route(
            "/pullRequest/reassign",
            post(reassign_reviewer).fallback(method_not_allowed),
        )
}
