//! Study session data model
//!
//! The same flashcard shape travels through the HTTP API, the persisted
//! session record, and the review projection.

use serde::{Deserialize, Serialize};

/// Request payload for `POST /analyze`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudyInput {
    pub user_id: String,
    pub notes: String,
}

/// A single question/answer pair derived from a summary
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Summary and flashcards returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudySessionResponse {
    pub summary: String,
    pub flashcards: Vec<Flashcard>,
}

/// Persisted outcome of one analyze request
///
/// Records are create-only. A user may own any number of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudySession {
    pub user_id: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
}

impl StudySession {
    /// Review projection: drops `user_id` and `notes`
    pub fn into_response(self) -> StudySessionResponse {
        StudySessionResponse {
            summary: self.summary,
            flashcards: self.flashcards,
        }
    }
}
