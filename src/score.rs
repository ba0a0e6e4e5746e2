use std::collections::BTreeSet;

/// Number of tags shared between a survey and a user's interests.
///
/// This is the entire recommendation heuristic: the more shared tags, the
/// higher a survey ranks. Either side being empty scores zero.
pub fn overlap(survey_tags: &BTreeSet<String>, user_tags: &BTreeSet<String>) -> usize {
    survey_tags.intersection(user_tags).count()
}
