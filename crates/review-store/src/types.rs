use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestStatus {
    #[default]
    Open,
    Merged,
}

impl PullRequestStatus {
    pub fn is_merged(self) -> bool {
        matches!(self, PullRequestStatus::Merged)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn status_renders_in_upper_case() {
        assert_eq!(PullRequestStatus::Open.to_string(), "OPEN");
        assert_eq!(PullRequestStatus::Merged.to_string(), "MERGED");
        assert_eq!(
            PullRequestStatus::from_str("MERGED").unwrap(),
            PullRequestStatus::Merged
        );
        assert_eq!(
            serde_json::to_value(PullRequestStatus::Open).unwrap(),
            serde_json::json!("OPEN")
        );
    }
}
