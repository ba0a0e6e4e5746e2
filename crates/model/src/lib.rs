#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod survey;
pub mod user;

pub use survey::{Answer, AnswerMap, Question, QuestionKind, Survey, SurveyData};
pub use user::{IncompleteAnswer, UserProfile};
