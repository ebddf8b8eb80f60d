//! Study session persistence
//!
//! Sessions live in a single append-only collection. Each write gets a fresh
//! generated document id and reads are an equality filter on `user_id`;
//! there is no update, delete, or ordering guarantee.

use async_trait::async_trait;
use studynotes_common::StudySession;
use thiserror::Error;

mod firestore;
mod memory;
mod token;
mod value;

pub use firestore::{FirestoreStore, DEFAULT_COLLECTION};
pub use memory::MemoryStore;
pub use token::{AccessTokenProvider, ServiceAccountTokenProvider, StaticToken};

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Firestore error {status}: {body}")]
    Firestore { status: u16, body: String },

    #[error("Token exchange failed: {0}")]
    Token(String),

    #[error("Invalid signing key: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// Append-only keyed store of study sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new record and return its generated document id
    async fn add(&self, session: &StudySession) -> Result<String, StoreError>;

    /// All records whose `user_id` equals the argument, in storage order
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<StudySession>, StoreError>;
}
