//! Shared fixtures for tests that drive a [`ReviewStore`] from outside the
//! store crate.

use review_store::{CreateTeamMember, ReviewStore};

/// Seed used by fixtures that need reproducible reviewer selection.
pub const SEED: u64 = 42;

pub fn member(user_id: &str, is_active: bool) -> CreateTeamMember {
    CreateTeamMember::new(user_id, format!("user-{user_id}"), is_active)
}

pub fn seeded_store() -> ReviewStore {
    ReviewStore::with_seed(SEED)
}

/// Builds a seeded store holding one team with the given `(user_id, is_active)`
/// members.
pub fn store_with_team(team_name: &str, members: &[(&str, bool)]) -> ReviewStore {
    let store = seeded_store();
    if let Err(err) = store.create_team(
        team_name,
        members
            .iter()
            .map(|(user_id, is_active)| member(user_id, *is_active))
            .collect(),
    ) {
        panic!("failed to create fixture team {team_name}: {err}");
    }
    store
}
