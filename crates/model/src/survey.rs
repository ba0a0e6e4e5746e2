use alloc::{
    collections::{BTreeMap, BTreeSet},
    string::String,
    vec::Vec,
};
use serde::{Deserialize, Serialize};

/// Kinds of questions a survey may contain.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    /// Free-form text input.
    Text,
    /// Pick exactly one of the listed options. Stored upstream as
    /// `multiple-choice`.
    #[serde(alias = "multiple-choice")]
    SingleSelect,
    /// Pick any subset of the listed options. Stored upstream as `checkbox`.
    #[serde(alias = "checkbox")]
    MultiSelect,
}

/// One question of a survey. Immutable once the survey is created.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Question {
    /// Identifier unique within the owning survey.
    pub id: String,
    /// Prompt displayed to the respondent.
    pub text: String,
    /// What kind of input the question expects.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Choices to select from. Present only for the select kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// A submitted answer value: free text or one/many selected options.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Answer {
    One(String),
    Many(Vec<String>),
}

impl Answer {
    /// Whether the value carries any content worth recording.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(text) => text.is_empty(),
            Self::Many(choices) => choices.is_empty(),
        }
    }
}

/// Answers keyed by question id, or by question index rendered as a string
/// for entries saved mid-session.
pub type AnswerMap = BTreeMap<String, Answer>;

/// Document fields of a survey.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SurveyData {
    /// Title displayed to respondents. Surveys without one are never
    /// recommended.
    #[serde(default)]
    pub title: String,
    /// Ordered list of questions.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Topic tags matched against user interests by the recommender.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Uploaded image URLs shown alongside the survey.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Uploaded video URLs shown alongside the survey.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<String>,
    /// Uploaded audio URLs shown alongside the survey.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audios: Vec<String>,
    /// Append-only response records keyed by question id. Each submission
    /// concatenates its answer values onto the list.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, Vec<String>>,
}

/// A survey together with its document id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Survey {
    pub id: String,
    pub data: SurveyData,
}
