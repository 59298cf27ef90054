//! Wire types for the HTTP API.
//!
//! Request types default every field so that a missing field reaches the
//! handler's own validation and is reported as `BAD_REQUEST` with a specific
//! message, instead of surfacing as a generic deserialization failure.

use chrono::{DateTime, SecondsFormat, Utc};
use review_store::{CreateTeamMember, PullRequest, Reassignment, Team, TeamMember, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamMemberPayload {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamPayload {
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMemberPayload>,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub team: TeamPayload,
}

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    pub team_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetIsActiveRequest {
    #[serde(default)]
    pub user_id: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserPayload,
}

#[derive(Debug, Deserialize)]
pub struct ReviewerQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePullRequestRequest {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default)]
    pub pull_request_name: String,
    #[serde(default)]
    pub author_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MergePullRequestRequest {
    #[serde(default)]
    pub pull_request_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default)]
    pub old_user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestQuery {
    pub pull_request_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PullRequestPayload {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "mergedAt", skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PullRequestResponse {
    pub pr: PullRequestPayload,
}

#[derive(Debug, Serialize)]
pub struct ReassignResponse {
    pub pr: PullRequestPayload,
    pub replaced_by: String,
}

#[derive(Debug, Serialize)]
pub struct PullRequestShort {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UserReviewsResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShort>,
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl From<TeamMemberPayload> for CreateTeamMember {
    fn from(member: TeamMemberPayload) -> Self {
        CreateTeamMember::new(member.user_id, member.username, member.is_active)
    }
}

impl From<TeamMember> for TeamMemberPayload {
    fn from(member: TeamMember) -> Self {
        Self {
            user_id: member.user_id,
            username: member.username,
            is_active: member.is_active,
        }
    }
}

impl From<Team> for TeamPayload {
    fn from(team: Team) -> Self {
        Self {
            team_name: team.name,
            members: team.members.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<User> for UserPayload {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            team_name: user.team_name.unwrap_or_default(),
            is_active: user.is_active,
        }
    }
}

impl From<PullRequest> for PullRequestPayload {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status.to_string(),
            assigned_reviewers: pr.assigned_reviewers,
            created_at: Some(format_timestamp(pr.created_at)),
            merged_at: pr.merged_at.map(format_timestamp),
        }
    }
}

impl From<PullRequest> for PullRequestShort {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status.to_string(),
        }
    }
}

impl From<Reassignment> for ReassignResponse {
    fn from(reassignment: Reassignment) -> Self {
        Self {
            pr: reassignment.pull_request.into(),
            replaced_by: reassignment.replaced_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use review_store::PullRequestStatus;

    use super::*;

    fn pull_request(merged_at: Option<DateTime<Utc>>) -> PullRequest {
        PullRequest {
            id: "pr-1".to_string(),
            name: "Fix parser".to_string(),
            author_id: "u1".to_string(),
            status: if merged_at.is_some() {
                PullRequestStatus::Merged
            } else {
                PullRequestStatus::Open
            },
            assigned_reviewers: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            merged_at,
        }
    }

    #[test]
    fn open_pull_request_omits_merge_timestamp() {
        let json = serde_json::to_value(PullRequestPayload::from(pull_request(None))).unwrap();

        assert_eq!(json["status"], "OPEN");
        assert_eq!(json["createdAt"], "2024-05-01T12:30:00Z");
        assert_eq!(json["assigned_reviewers"], serde_json::json!([]));
        assert!(json.get("mergedAt").is_none());
    }

    #[test]
    fn merged_pull_request_includes_merge_timestamp() {
        let merged_at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 5).unwrap();
        let json =
            serde_json::to_value(PullRequestPayload::from(pull_request(Some(merged_at)))).unwrap();

        assert_eq!(json["status"], "MERGED");
        assert_eq!(json["mergedAt"], "2024-05-02T08:00:05Z");
    }

    #[test]
    fn user_without_team_renders_empty_team_name() {
        let user = User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            team_name: None,
            is_active: true,
        };

        let json = serde_json::to_value(UserPayload::from(user)).unwrap();
        assert_eq!(json["team_name"], "");
    }
}
