use chrono::{DateTime, Utc};

use crate::types::PullRequestStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    /// Reviewer IDs in assignment order. Reassignment keeps positions stable.
    pub assigned_reviewers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreatePullRequest {
    pub id: String,
    pub name: String,
    pub author_id: String,
}

impl CreatePullRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author_id: author_id.into(),
        }
    }
}

/// Outcome of replacing one reviewer on an open pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub pull_request: PullRequest,
    pub replaced_by: String,
}

impl PullRequest {
    pub fn has_reviewer(&self, user_id: &str) -> bool {
        self.assigned_reviewers.iter().any(|id| id == user_id)
    }

    fn reviewer_position(&self, user_id: &str) -> Option<usize> {
        self.assigned_reviewers.iter().position(|id| id == user_id)
    }

    /// Swaps `old` for `new` in place. Returns `false` when `old` is not assigned.
    pub(crate) fn replace_reviewer(&mut self, old: &str, new: String) -> bool {
        match self.reviewer_position(old) {
            Some(position) => {
                self.assigned_reviewers[position] = new;
                true
            }
            None => false,
        }
    }

    /// Marks the pull request merged. The first merge timestamp is kept on repeat calls.
    pub(crate) fn mark_merged(&mut self, now: DateTime<Utc>) {
        if !self.status.is_merged() {
            self.status = PullRequestStatus::Merged;
            self.merged_at.get_or_insert(now);
        }
    }
}
