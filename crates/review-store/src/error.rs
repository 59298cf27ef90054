use thiserror::Error;

/// Coarse classification used by transports to pick a response family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Team already exists")]
    TeamExists,
    #[error("Team not found")]
    TeamNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("Pull request already exists")]
    PullRequestExists,
    #[error("Pull request not found")]
    PullRequestNotFound,
    #[error("Pull request already merged")]
    PullRequestMerged,
    #[error("Reviewer is not assigned to this pull request")]
    ReviewerNotAssigned,
    #[error("No active replacement candidate in team")]
    NoReplacementCandidate,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::TeamNotFound
            | StoreError::UserNotFound
            | StoreError::PullRequestNotFound => ErrorKind::NotFound,
            StoreError::TeamExists
            | StoreError::PullRequestExists
            | StoreError::PullRequestMerged
            | StoreError::ReviewerNotAssigned
            | StoreError::NoReplacementCandidate => ErrorKind::Conflict,
        }
    }
}
