pub mod doc;
pub mod error;
mod filter;
mod flow;
mod identity;
mod journal;
mod random;
mod rank;
mod score;

pub use error::{Error, Result};
pub use flow::{Next, SurveyFlow};
pub use identity::{Anonymous, Identity, StaticIdentity};
pub use journal::Journal;
pub use model::{
    Answer, AnswerMap, IncompleteAnswer, Question, QuestionKind, Survey, SurveyData, UserProfile,
};
pub use random::{RandomSurveys, UniformSampler};
pub use store::{DocRef, Document, DocumentStore, MemoryStore};
