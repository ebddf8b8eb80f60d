//! Flashcard parsing of raw LLM output
//!
//! The flashcard prompt asks for a list-of-objects literal such as
//! `[{'question': '...', 'answer': '...'}]`. Models answer with either that
//! single-quoted form or plain JSON, so the text is deserialized as JSON5,
//! which accepts both without evaluating anything.
//!
//! JSON5 is a deliberate superset of the requested literal form: unquoted
//! keys (`{question: 'Q1', ...}`), trailing commas and comments also parse
//! into cards instead of falling back.
//!
//! Parsing is all-or-nothing: any syntax error or shape mismatch yields the
//! single sentinel card carrying the raw text, so the caller still sees what
//! the model produced.

use tracing::debug;

use crate::models::Flashcard;

/// Question used for the sentinel card when parsing fails
pub const FALLBACK_QUESTION: &str = "Could not parse flashcards";

/// Parse raw LLM text into flashcards, falling back to the sentinel card
pub fn parse_flashcards(raw: &str) -> Vec<Flashcard> {
    match json5::from_str::<Vec<Flashcard>>(raw) {
        Ok(cards) => cards,
        Err(e) => {
            debug!(error = %e, "Flashcard output did not parse, using fallback");
            vec![Flashcard::new(FALLBACK_QUESTION, raw)]
        }
    }
}
