use crate::{doc, filter};
use async_trait::async_trait;
use model::{Survey, UserProfile};
use rand::Rng;
use std::sync::Arc;
use store::DocumentStore;

/// Provider of the uniform-random fallback used when nothing matches the
/// user's tags.
#[async_trait]
pub trait RandomSurveys: Send + Sync {
    /// A uniformly-random survey eligible for `user`, or `None` when no
    /// eligible survey exists.
    async fn draw(&self, user: &str) -> store::Result<Option<Survey>>;
}

/// Store-backed [`RandomSurveys`] drawing uniformly over eligible surveys.
pub struct UniformSampler {
    store: Arc<dyn DocumentStore>,
}

impl UniformSampler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RandomSurveys for UniformSampler {
    async fn draw(&self, user: &str) -> store::Result<Option<Survey>> {
        let profile = match self.store.get(&doc::user_ref(user)).await? {
            Some(document) => doc::profile_from(document)?,
            None => UserProfile::default(),
        };

        let mut pool = Vec::new();
        for (id, document) in self.store.list(doc::SURVEYS).await? {
            let survey = match doc::survey_from(&id, document) {
                Ok(survey) => survey,
                Err(err) => {
                    log::warn!("Skipping malformed survey {id}: {err}");
                    continue;
                }
            };
            if filter::is_eligible(&survey, &profile) {
                pool.push(survey);
            }
        }

        if pool.is_empty() {
            return Ok(None);
        }
        let index = rand::thread_rng().gen_range(0..pool.len());
        Ok(Some(pool.swap_remove(index)))
    }
}
