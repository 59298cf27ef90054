#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Team the user currently belongs to. `None` until the user is added to a team.
    pub team_name: Option<String>,
    pub is_active: bool,
}

impl User {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: String::new(),
            team_name: None,
            is_active: false,
        }
    }
}
