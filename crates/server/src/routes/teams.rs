use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use review_store::CreateTeamMember;

use super::{
    dto::{TeamPayload, TeamQuery, TeamResponse},
    extract::{AppJson, AppQuery},
    method_not_allowed, require,
};
use crate::{AppState, error::ApiError};

pub async fn add_team(
    State(state): State<AppState>,
    AppJson(payload): AppJson<TeamPayload>,
) -> Result<(StatusCode, ResponseJson<TeamResponse>), ApiError> {
    require(&payload.team_name, "team_name is required")?;

    let members: Vec<CreateTeamMember> = payload
        .members
        .into_iter()
        .filter(|member| !member.user_id.is_empty())
        .map(Into::into)
        .collect();

    tracing::debug!(
        "Creating team '{}' with {} members",
        payload.team_name,
        members.len()
    );
    let team = state.store().create_team(&payload.team_name, members)?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(TeamResponse { team: team.into() }),
    ))
}

pub async fn get_team(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TeamQuery>,
) -> Result<ResponseJson<TeamPayload>, ApiError> {
    let team_name = query.team_name.unwrap_or_default();
    require(&team_name, "team_name is required")?;

    let team = state.store().get_team(&team_name)?;
    Ok(ResponseJson(team.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/team/add", post(add_team).fallback(method_not_allowed))
        .route("/team/get", get(get_team).fallback(method_not_allowed))
}
