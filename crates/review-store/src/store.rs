use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::StoreError,
    models::{
        pull_request::{CreatePullRequest, PullRequest, Reassignment},
        team::{CreateTeamMember, Team, TeamMember},
        user::User,
    },
    selection,
    types::PullRequestStatus,
};

#[derive(Debug)]
struct TeamRecord {
    name: String,
    members: BTreeSet<String>,
}

struct StoreState {
    teams: HashMap<String, TeamRecord>,
    users: HashMap<String, User>,
    pull_requests: BTreeMap<String, PullRequest>,
    rng: StdRng,
}

/// In-memory registry of teams, users and pull requests.
///
/// Every operation runs under one `RwLock`; reads share it, mutations and
/// anything drawing from the RNG take it exclusively. Returned values are
/// owned copies, so callers never alias internal state.
pub struct ReviewStore {
    state: RwLock<StoreState>,
}

impl Default for ReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewStore {
    /// Creates an empty store with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates an empty store whose reviewer selection is reproducible for `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            state: RwLock::new(StoreState {
                teams: HashMap::new(),
                users: HashMap::new(),
                pull_requests: BTreeMap::new(),
                rng,
            }),
        }
    }

    // Mutations finish updating every map before returning, so a poisoned
    // lock still guards consistent state.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a team and upserts its members. Members with an empty user ID
    /// are skipped; members of another team are moved into this one.
    pub fn create_team(
        &self,
        name: &str,
        members: Vec<CreateTeamMember>,
    ) -> Result<Team, StoreError> {
        let mut guard = self.write();
        let state = &mut *guard;

        if state.teams.contains_key(name) {
            return Err(StoreError::TeamExists);
        }

        state.teams.insert(
            name.to_string(),
            TeamRecord {
                name: name.to_string(),
                members: BTreeSet::new(),
            },
        );

        for member in members {
            if member.user_id.is_empty() {
                continue;
            }
            state.upsert_member(name, member);
        }

        let team = state.team_view(name)?;
        tracing::info!(team = name, members = team.members.len(), "Created team");
        Ok(team)
    }

    pub fn get_team(&self, name: &str) -> Result<Team, StoreError> {
        self.read().team_view(name)
    }

    /// Flips the active flag. Existing reviewer assignments are left as they are.
    pub fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User, StoreError> {
        let mut state = self.write();
        let user = state
            .users
            .get_mut(user_id)
            .ok_or(StoreError::UserNotFound)?;
        user.is_active = is_active;
        tracing::info!(user_id, is_active, "Updated user activity");
        Ok(user.clone())
    }

    pub fn get_user(&self, user_id: &str) -> Result<User, StoreError> {
        self.read()
            .users
            .get(user_id)
            .cloned()
            .ok_or(StoreError::UserNotFound)
    }

    /// Stores a new open pull request and assigns up to two active teammates
    /// of the author as reviewers. An empty candidate pool is not an error.
    pub fn create_pull_request(&self, data: CreatePullRequest) -> Result<PullRequest, StoreError> {
        let mut guard = self.write();
        let state = &mut *guard;

        if state.pull_requests.contains_key(&data.id) {
            return Err(StoreError::PullRequestExists);
        }

        let author = state
            .users
            .get(&data.author_id)
            .ok_or(StoreError::UserNotFound)?;
        let team = team_of(&state.teams, author)?;

        let candidates = active_candidates(&state.users, team, &[author.id.as_str()]);
        let assigned_reviewers = selection::pick_reviewers(candidates, &mut state.rng);

        if assigned_reviewers.is_empty() {
            tracing::debug!(
                pull_request_id = %data.id,
                team = %team.name,
                "No active reviewers available; creating pull request without reviewers"
            );
        }

        let pull_request = PullRequest {
            id: data.id,
            name: data.name,
            author_id: author.id.clone(),
            status: PullRequestStatus::Open,
            assigned_reviewers,
            created_at: Utc::now(),
            merged_at: None,
        };

        tracing::info!(
            pull_request_id = %pull_request.id,
            author_id = %pull_request.author_id,
            reviewers = ?pull_request.assigned_reviewers,
            "Created pull request"
        );

        state
            .pull_requests
            .insert(pull_request.id.clone(), pull_request.clone());
        Ok(pull_request)
    }

    pub fn get_pull_request(&self, pull_request_id: &str) -> Result<PullRequest, StoreError> {
        self.read()
            .pull_requests
            .get(pull_request_id)
            .cloned()
            .ok_or(StoreError::PullRequestNotFound)
    }

    /// Marks the pull request merged. Merging twice is a no-op that returns
    /// the same merge timestamp.
    pub fn merge_pull_request(&self, pull_request_id: &str) -> Result<PullRequest, StoreError> {
        let mut state = self.write();
        let pull_request = state
            .pull_requests
            .get_mut(pull_request_id)
            .ok_or(StoreError::PullRequestNotFound)?;

        let was_merged = pull_request.status.is_merged();
        pull_request.mark_merged(Utc::now());
        if !was_merged {
            tracing::info!(pull_request_id, "Merged pull request");
        }

        Ok(pull_request.clone())
    }

    /// Replaces `old_reviewer_id` with a random active member of that
    /// reviewer's team who is neither the author nor already reviewing.
    pub fn reassign_reviewer(
        &self,
        pull_request_id: &str,
        old_reviewer_id: &str,
    ) -> Result<Reassignment, StoreError> {
        let mut guard = self.write();
        let state = &mut *guard;

        let pull_request = state
            .pull_requests
            .get_mut(pull_request_id)
            .ok_or(StoreError::PullRequestNotFound)?;

        if pull_request.status.is_merged() {
            return Err(StoreError::PullRequestMerged);
        }
        if !pull_request.has_reviewer(old_reviewer_id) {
            return Err(StoreError::ReviewerNotAssigned);
        }

        let reviewer = state
            .users
            .get(old_reviewer_id)
            .ok_or(StoreError::UserNotFound)?;
        let team = team_of(&state.teams, reviewer)?;

        // The old reviewer is in the assigned list, so it is excluded here too.
        let mut excluded: Vec<&str> = pull_request
            .assigned_reviewers
            .iter()
            .map(String::as_str)
            .collect();
        excluded.push(pull_request.author_id.as_str());

        let candidates = active_candidates(&state.users, team, &excluded);
        let replacement = selection::pick_replacement(&candidates, &mut state.rng)
            .ok_or(StoreError::NoReplacementCandidate)?;

        pull_request.replace_reviewer(old_reviewer_id, replacement.clone());

        tracing::info!(
            pull_request_id,
            old_reviewer_id,
            new_reviewer_id = %replacement,
            "Reassigned reviewer"
        );

        Ok(Reassignment {
            pull_request: pull_request.clone(),
            replaced_by: replacement,
        })
    }

    /// Pull requests currently assigned to `user_id`, ordered by pull request ID.
    pub fn list_pull_requests_by_reviewer(
        &self,
        user_id: &str,
    ) -> Result<Vec<PullRequest>, StoreError> {
        let state = self.read();
        if !state.users.contains_key(user_id) {
            return Err(StoreError::UserNotFound);
        }

        Ok(state
            .pull_requests
            .values()
            .filter(|pull_request| pull_request.has_reviewer(user_id))
            .cloned()
            .collect())
    }
}

impl StoreState {
    fn upsert_member(&mut self, team_name: &str, member: CreateTeamMember) {
        let user = self
            .users
            .entry(member.user_id.clone())
            .or_insert_with(|| User::new(member.user_id.clone()));

        if let Some(previous) = user.team_name.as_deref() {
            if previous != team_name {
                if let Some(previous_team) = self.teams.get_mut(previous) {
                    previous_team.members.remove(&user.id);
                }
                tracing::debug!(
                    user_id = %user.id,
                    from = previous,
                    to = team_name,
                    "Moving user between teams"
                );
            }
        }

        user.username = member.username;
        user.team_name = Some(team_name.to_string());
        user.is_active = member.is_active;

        if let Some(team) = self.teams.get_mut(team_name) {
            team.members.insert(member.user_id);
        }
    }

    fn team_view(&self, name: &str) -> Result<Team, StoreError> {
        let record = self.teams.get(name).ok_or(StoreError::TeamNotFound)?;
        let members = record
            .members
            .iter()
            .filter_map(|id| self.users.get(id))
            .map(|user| TeamMember {
                user_id: user.id.clone(),
                username: user.username.clone(),
                is_active: user.is_active,
            })
            .collect();

        Ok(Team {
            name: record.name.clone(),
            members,
        })
    }
}

fn team_of<'a>(
    teams: &'a HashMap<String, TeamRecord>,
    user: &User,
) -> Result<&'a TeamRecord, StoreError> {
    user.team_name
        .as_deref()
        .and_then(|name| teams.get(name))
        .ok_or(StoreError::TeamNotFound)
}

/// Active members of `team` not listed in `excluded`, in member-ID order.
fn active_candidates(
    users: &HashMap<String, User>,
    team: &TeamRecord,
    excluded: &[&str],
) -> Vec<String> {
    team.members
        .iter()
        .filter(|id| !excluded.contains(&id.as_str()))
        .filter(|id| users.get(*id).is_some_and(|user| user.is_active))
        .cloned()
        .collect()
}
