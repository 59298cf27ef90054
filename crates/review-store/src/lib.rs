//! In-memory store for teams, users and pull requests, together with the
//! reviewer assignment policy.

pub mod error;
pub mod models;
pub mod selection;
mod store;
pub mod types;

pub use error::{ErrorKind, StoreError};
pub use models::{
    pull_request::{CreatePullRequest, PullRequest, Reassignment},
    team::{CreateTeamMember, Team, TeamMember},
    user::User,
};
pub use store::ReviewStore;
pub use types::PullRequestStatus;
