//! Study session pipeline
//!
//! `analyze` runs two dependent prompts (summary first, then flashcards from
//! that summary), then stores the session. Nothing is written unless both
//! prompts succeed, and no step is retried.

use std::sync::Arc;
use std::time::Instant;

use studynotes_common::{parse_flashcards, StudyInput, StudySession, StudySessionResponse};
use thiserror::Error;
use tracing::{info, instrument};

use crate::llm::{CompletionClient, LlmError};
use crate::store::{SessionStore, StoreError};

/// Errors surfaced by the study session service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Session store failed: {0}")]
    Store(#[from] StoreError),
}

pub fn summary_prompt(notes: &str) -> String {
    format!("Summarize these Bible study notes:\n{notes}")
}

pub fn flashcard_prompt(summary: &str) -> String {
    format!(
        "From this Bible summary, create 3 question and answer flashcards in JSON format:\n\
         {summary}\n\
         Return as: [{{'question': '...', 'answer': '...'}}, ...]"
    )
}

/// Summarize notes, derive flashcards, and persist the session
pub struct StudySessionService {
    llm: Arc<dyn CompletionClient>,
    store: Arc<dyn SessionStore>,
}

impl StudySessionService {
    pub fn new(llm: Arc<dyn CompletionClient>, store: Arc<dyn SessionStore>) -> Self {
        Self { llm, store }
    }

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn analyze(&self, input: StudyInput) -> Result<StudySessionResponse, ServiceError> {
        let started = Instant::now();

        let summary = self.llm.complete(&summary_prompt(&input.notes)).await?;
        let flashcards_text = self.llm.complete(&flashcard_prompt(&summary)).await?;
        let flashcards = parse_flashcards(&flashcards_text);

        let session = StudySession {
            user_id: input.user_id,
            notes: input.notes,
            summary,
            flashcards,
        };
        let id = self.store.add(&session).await?;

        info!(
            session_id = %id,
            flashcards = session.flashcards.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Study session created"
        );

        Ok(session.into_response())
    }

    #[instrument(skip(self))]
    pub async fn review(&self, user_id: &str) -> Result<Vec<StudySessionResponse>, ServiceError> {
        let sessions = self.store.find_by_user(user_id).await?;
        info!(count = sessions.len(), "Loaded study sessions");

        Ok(sessions
            .into_iter()
            .map(StudySession::into_response)
            .collect())
    }
}
