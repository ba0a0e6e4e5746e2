use model::{Survey, UserProfile};

/// Whether `survey` may be shown to the holder of `profile`.
///
/// Owned and already-answered surveys are never recommended, and neither are
/// surveys without a title or without questions.
pub fn is_eligible(survey: &Survey, profile: &UserProfile) -> bool {
    !profile.surveys.contains(&survey.id)
        && !profile.answered_surveys.contains(&survey.id)
        && !survey.data.questions.is_empty()
        && !survey.data.title.is_empty()
}
