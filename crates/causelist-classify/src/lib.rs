//! Respondent classification: decides which cases name a Hyderabad revenue or
//! municipal officer and renders the officer column.

mod classifier;
pub mod keywords;

pub use classifier::{Classified, RULES, RespondentClassifier, Rule, officers_for};
