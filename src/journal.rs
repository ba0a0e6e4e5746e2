use crate::doc;
use model::{AnswerMap, IncompleteAnswer};
use serde_json::Value;
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use store::DocumentStore;

/// Per-user, per-survey store of in-progress answers.
///
/// An entry is written on every answer change while a survey is open and
/// removed once the survey is submitted or skipped, so a user who navigates
/// away can pick up where they left off.
pub struct Journal {
    store: Arc<dyn DocumentStore>,
}

impl Journal {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }

    /// Upserts the partial answers for `(user, survey)`, replacing any
    /// previous state for that pair.
    pub async fn save(&self, user: &str, survey: &str, answers: &AnswerMap) -> store::Result<()> {
        let entry = IncompleteAnswer {
            user_id: user.into(),
            survey_id: survey.into(),
            answers: answers.clone(),
            saved_at: Self::now_millis(),
        };
        self.store.set(&doc::journal_ref(user, survey), doc::to_doc(&entry)?).await
    }

    /// Most recent entry for `user`, if one exists.
    pub async fn load(&self, user: &str) -> store::Result<Option<IncompleteAnswer>> {
        let documents = self
            .store
            .query_eq(doc::INCOMPLETE_ANSWERS, "userId", &Value::from(user))
            .await?;

        let mut latest: Option<IncompleteAnswer> = None;
        for (id, document) in documents {
            let entry = match doc::journal_from(document) {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Skipping malformed journal entry {id}: {err}");
                    continue;
                }
            };
            if latest.as_ref().map_or(true, |current| entry.saved_at >= current.saved_at) {
                latest = Some(entry);
            }
        }
        Ok(latest)
    }

    /// Drops the entry for `(user, survey)`. Missing entries are fine.
    pub async fn clear(&self, user: &str, survey: &str) -> store::Result<()> {
        self.store.delete(&doc::journal_ref(user, survey)).await
    }
}
