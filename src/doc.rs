//! Collection names and conversions between stored documents and the typed
//! models. Survey and journal ids live outside their document payloads, the
//! way the backing store keys them.

use model::{IncompleteAnswer, Survey, SurveyData, UserProfile};
use serde_json::Value;
use store::{DocRef, Document};

pub const SURVEYS: &str = "surveys";
pub const USERS: &str = "users";
pub const INCOMPLETE_ANSWERS: &str = "incompleteAnswers";

pub fn survey_ref(id: &str) -> DocRef {
    DocRef::new(SURVEYS, id)
}

pub fn user_ref(id: &str) -> DocRef {
    DocRef::new(USERS, id)
}

/// Journal entries are keyed by the `(user, survey)` pair.
pub fn journal_ref(user: &str, survey: &str) -> DocRef {
    DocRef::new(INCOMPLETE_ANSWERS, &format!("{user}:{survey}"))
}

pub fn survey_from(id: &str, document: Document) -> store::Result<Survey> {
    let data: SurveyData = serde_json::from_value(Value::Object(document))?;
    Ok(Survey { id: id.into(), data })
}

pub fn profile_from(document: Document) -> store::Result<UserProfile> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

pub fn journal_from(document: Document) -> store::Result<IncompleteAnswer> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

pub fn to_doc<T: serde::Serialize>(value: &T) -> store::Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(store::Error::Data),
    }
}

#[cfg(test)]
mod tests {
    use super::{journal_ref, survey_from, to_doc};
    use model::{Survey, SurveyData};

    #[test]
    fn journal_ids_combine_user_and_survey() {
        let reference = journal_ref("u1", "s1");
        assert_eq!(reference.collection.as_ref(), "incompleteAnswers");
        assert_eq!(reference.id.as_ref(), "u1:s1");
    }

    #[test]
    fn survey_documents_round_trip() {
        let survey = Survey {
            id: "s1".into(),
            data: SurveyData { title: "Lunch".into(), ..SurveyData::default() },
        };
        let document = to_doc(&survey.data).unwrap();
        assert_eq!(survey_from("s1", document).unwrap(), survey);
    }
}
