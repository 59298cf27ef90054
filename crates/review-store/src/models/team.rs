/// Snapshot of a team member as seen through the team listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

/// Team view with members sorted by user ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone)]
pub struct CreateTeamMember {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

impl CreateTeamMember {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, is_active: bool) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            is_active,
        }
    }
}

impl Team {
    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|member| member.user_id.as_str())
    }
}
