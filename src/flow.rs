use crate::{
    doc,
    error::{Error, Result},
    filter,
    identity::Identity,
    journal::Journal,
    random::RandomSurveys,
    rank::Ranker,
    score,
};
use model::{Answer, AnswerMap, Survey, UserProfile};
use serde_json::{Map, Value};
use std::sync::Arc;
use store::{DocumentStore, TxHandle};

/// The survey selected for a user, along with any partial answers saved from
/// an earlier session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Next {
    pub survey: Survey,
    pub saved: Option<AnswerMap>,
}

impl Next {
    fn fresh(survey: Survey) -> Self {
        Self { survey, saved: None }
    }
}

/// Entry point of the recommendation and completion core.
///
/// Every collaborator is injected; nothing reaches for ambient global state,
/// so the whole flow runs deterministically against fakes.
pub struct SurveyFlow {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn Identity>,
    random: Arc<dyn RandomSurveys>,
    journal: Journal,
}

impl SurveyFlow {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn Identity>,
        random: Arc<dyn RandomSurveys>,
    ) -> Self {
        let journal = Journal::new(Arc::clone(&store));
        Self { store, identity, random, journal }
    }

    /// Selects the next survey to present.
    ///
    /// Strategy order: an explicitly requested survey, then a resumable
    /// incomplete one, then the best tag match, then a uniform-random pick.
    /// `Ok(None)` means no survey is available anywhere, which is an expected
    /// terminal state rather than a failure. Read failures in the middle
    /// strategies are logged and fall through to the next strategy.
    pub async fn next_survey(&self, requested: Option<&str>) -> Result<Option<Next>> {
        if let Some(id) = requested {
            return self.requested_survey(id).await.map(Some);
        }

        let Some(user) = self.identity.current_user() else {
            log::error!("Error fetching survey: {}", Error::Unauthenticated);
            return Ok(None);
        };

        if let Some(next) = self.resume_incomplete(&user).await {
            return Ok(Some(next));
        }
        if let Some(survey) = self.best_tag_match(&user).await {
            return Ok(Some(Next::fresh(survey)));
        }
        match self.random.draw(&user).await {
            Ok(survey) => Ok(survey.map(Next::fresh)),
            Err(err) => {
                log::error!("Error fetching random survey: {err}");
                Ok(None)
            }
        }
    }

    /// Best-effort persistence of in-progress answers, called on every answer
    /// change. Store failures are logged, never surfaced.
    pub async fn save_incomplete(&self, survey: &str, answers: &AnswerMap) -> Result<()> {
        let user = self.identity.current_user().ok_or(Error::Unauthenticated)?;
        if let Err(err) = self.journal.save(&user, survey, answers).await {
            log::error!("Error saving incomplete answers: {err}");
        }
        Ok(())
    }

    /// Finalizes a user's answers for `survey_id`.
    ///
    /// Appends each non-empty answer to the survey's response records, then
    /// atomically marks the survey answered on the profile (crediting one
    /// coin for a genuine first completion), then clears the journal entry.
    /// Failures always surface; a transaction failure after the append does
    /// not roll the append back.
    pub async fn complete(
        &self,
        survey_id: &str,
        answers: &AnswerMap,
        skipped: bool,
    ) -> Result<()> {
        let user = self.identity.current_user().ok_or(Error::Unauthenticated)?;

        let document =
            self.store.get(&doc::survey_ref(survey_id)).await?.ok_or(Error::NotFound)?;
        let survey = doc::survey_from(survey_id, document)?;

        self.append_responses(&survey, answers).await?;
        self.mark_answered(&user, survey_id, skipped).await?;
        self.journal.clear(&user, survey_id).await?;
        Ok(())
    }

    /// Deep-link path: the caller asked for one specific survey.
    async fn requested_survey(&self, id: &str) -> Result<Next> {
        let user = self.identity.current_user().ok_or(Error::Unauthenticated)?;
        let Some(document) = self.store.get(&doc::survey_ref(id)).await? else {
            log::error!("Survey not found");
            return Err(Error::NotFound);
        };
        let survey = doc::survey_from(id, document)?;

        let profile = self.profile(&user).await?;
        if profile.answered_surveys.contains(id) {
            return Err(Error::AlreadyAnswered);
        }
        Ok(Next::fresh(survey))
    }

    async fn profile(&self, user: &str) -> store::Result<UserProfile> {
        Ok(match self.store.get(&doc::user_ref(user)).await? {
            Some(document) => doc::profile_from(document)?,
            None => UserProfile::default(),
        })
    }

    /// Resume a previously started survey. The journal entry survives this
    /// read; it is only cleared on submit or skip.
    async fn resume_incomplete(&self, user: &str) -> Option<Next> {
        match self.try_resume(user).await {
            Ok(next) => next,
            Err(err) => {
                log::error!("Error fetching incomplete survey: {err}");
                None
            }
        }
    }

    async fn try_resume(&self, user: &str) -> store::Result<Option<Next>> {
        let Some(entry) = self.journal.load(user).await? else {
            return Ok(None);
        };
        let Some(document) = self.store.get(&doc::survey_ref(&entry.survey_id)).await? else {
            return Ok(None);
        };
        let survey = doc::survey_from(&entry.survey_id, document)?;

        let profile = self.profile(user).await?;
        if !filter::is_eligible(&survey, &profile) {
            return Ok(None);
        }
        Ok(Some(Next { survey, saved: Some(entry.answers) }))
    }

    async fn best_tag_match(&self, user: &str) -> Option<Survey> {
        match self.try_rank(user).await {
            Ok(best) => best,
            Err(err) => {
                log::error!("Error fetching tagged survey recommendation: {err}");
                None
            }
        }
    }

    /// Scores every eligible survey against the user's interest tags and
    /// keeps them in a max-heap, so picking the winner does not re-scan the
    /// collection.
    async fn try_rank(&self, user: &str) -> store::Result<Option<Survey>> {
        let profile = self.profile(user).await?;
        let mut ranker = Ranker::new();
        for (id, document) in self.store.list(doc::SURVEYS).await? {
            let survey = match doc::survey_from(&id, document) {
                Ok(survey) => survey,
                Err(err) => {
                    log::warn!("Skipping malformed survey {id}: {err}");
                    continue;
                }
            };
            if !filter::is_eligible(&survey, &profile) {
                continue;
            }
            let score = score::overlap(&survey.data.tags, &profile.tags);
            ranker.push(score, survey);
        }
        Ok(ranker.pop_highest())
    }

    /// Appends answer values onto the survey's response records. A single
    /// value becomes one new list element; a list answer appends each of its
    /// elements. Existing records are never replaced.
    async fn append_responses(&self, survey: &Survey, answers: &AnswerMap) -> Result<()> {
        let mut responses = survey.data.responses.clone();
        let mut touched = false;
        for (index, question) in survey.data.questions.iter().enumerate() {
            let Some(answer) = lookup_answer(answers, &question.id, index) else {
                continue;
            };
            if answer.is_empty() {
                continue;
            }
            let record = responses.entry(question.id.clone()).or_default();
            match answer {
                Answer::One(value) => record.push(value.clone()),
                Answer::Many(values) => record.extend(values.iter().cloned()),
            }
            touched = true;
        }
        if !touched {
            return Ok(());
        }

        let mut fields = Map::new();
        fields.insert("responses".into(), serde_json::to_value(&responses).map_err(store::Error::from)?);
        self.store.merge(&doc::survey_ref(&survey.id), fields).await?;
        Ok(())
    }

    /// Read-then-write inside the store's transaction primitive, so
    /// concurrent completions from other tabs or devices cannot lose an
    /// increment or a set-membership addition.
    async fn mark_answered(&self, user: &str, survey_id: &str, skipped: bool) -> Result<()> {
        let user_ref = doc::user_ref(user);
        let refs = [user_ref.clone()];
        let survey_id = survey_id.to_owned();

        let mut op = |tx: &mut TxHandle<'_>| {
            // A missing profile still gets a merged write with defaults.
            let profile = match tx.get(&user_ref)? {
                Some(document) => doc::profile_from(document.clone())?,
                None => UserProfile::default(),
            };
            let mut answered = profile.answered_surveys;
            let mut coins = profile.coins;
            // Set semantics: re-completing the same survey neither duplicates
            // the membership nor earns a second coin.
            let newly = answered.insert(survey_id.clone());
            if !skipped && newly {
                coins += 1;
            }

            let mut fields = Map::new();
            fields.insert("answeredSurveys".into(), serde_json::to_value(&answered)?);
            fields.insert("coins".into(), Value::from(coins));
            tx.update(&user_ref, fields)
        };
        self.store.atomically(&refs, &mut op).await?;
        Ok(())
    }
}

/// Answers may be keyed by question id (the submission path) or by the
/// question's index rendered as a string (journal entries save index keys).
fn lookup_answer<'a>(answers: &'a AnswerMap, id: &str, index: usize) -> Option<&'a Answer> {
    answers.get(id).or_else(|| {
        let key = index.to_string();
        answers.get(key.as_str())
    })
}
