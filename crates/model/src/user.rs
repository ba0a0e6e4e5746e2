use crate::survey::AnswerMap;
use alloc::{collections::BTreeSet, string::String};
use serde::{Deserialize, Serialize};

/// Profile document of an authenticated user.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Name shown on the profile page.
    #[serde(default)]
    pub display_name: String,
    /// Interest tags gathered during onboarding and refined as surveys are
    /// answered.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Ids of surveys this user created.
    #[serde(default)]
    pub surveys: BTreeSet<String>,
    /// Ids of surveys this user has already answered. Never contains
    /// duplicates.
    #[serde(default)]
    pub answered_surveys: BTreeSet<String>,
    /// Reward balance, credited once per genuine completion.
    #[serde(default)]
    pub coins: u64,
}

/// One journal entry of in-progress, unsubmitted answers. Keyed by the
/// `(user, survey)` pair; overwritten on every answer change and deleted on
/// submit or skip.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IncompleteAnswer {
    /// Owner of the partial answers.
    pub user_id: String,
    /// Survey being resumed.
    pub survey_id: String,
    /// Partial answers keyed by question id or index.
    #[serde(default)]
    pub answers: AnswerMap,
    /// Milliseconds since the Unix epoch at the last save.
    #[serde(default)]
    pub saved_at: u64,
}

#[cfg(test)]
mod tests {
    use super::UserProfile;

    #[test]
    fn profile_fields_are_camel_case() {
        let json = r#"{"displayName":"Ada","answeredSurveys":["s1"],"coins":3}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.display_name, "Ada");
        assert!(profile.answered_surveys.contains("s1"));
        assert_eq!(profile.coins, 3);
    }

    #[test]
    fn missing_fields_default() {
        let profile: UserProfile = serde_json::from_str("{}").unwrap();
        assert!(profile.tags.is_empty());
        assert!(profile.answered_surveys.is_empty());
        assert_eq!(profile.coins, 0);
    }
}
