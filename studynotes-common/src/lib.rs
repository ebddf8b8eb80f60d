//! # Study Notes Common Library
//!
//! Shared code for the study notes backend:
//! - Study session data model
//! - Flashcard parsing of raw LLM output
//! - Service credential loading
//! - Common error type

pub mod credentials;
pub mod error;
pub mod flashcards;
pub mod models;

pub use error::{Error, Result};
pub use flashcards::{parse_flashcards, FALLBACK_QUESTION};
pub use models::{Flashcard, StudyInput, StudySession, StudySessionResponse};
