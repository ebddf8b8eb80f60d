//! In-process session store for tests and local development

use async_trait::async_trait;
use studynotes_common::StudySession;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SessionStore, StoreError};

/// Session store backed by a `Vec` in insertion order
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<(String, StudySession)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record with its document id
    pub async fn records(&self) -> Vec<(String, StudySession)> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn add(&self, session: &StudySession) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        self.records
            .write()
            .await
            .push((id.clone(), session.clone()));
        Ok(id)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<StudySession>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|(_, session)| session.user_id == user_id)
            .map(|(_, session)| session.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studynotes_common::Flashcard;

    fn session(user_id: &str, summary: &str) -> StudySession {
        StudySession {
            user_id: user_id.to_string(),
            notes: "notes".to_string(),
            summary: summary.to_string(),
            flashcards: vec![Flashcard::new("Q", "A")],
        }
    }

    #[tokio::test]
    async fn test_add_generates_distinct_ids() {
        let store = MemoryStore::new();
        let first = store.add(&session("u1", "s")).await.unwrap();
        let second = store.add(&session("u1", "s")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_find_by_user_filters_exactly() {
        let store = MemoryStore::new();
        store.add(&session("u1", "first")).await.unwrap();
        store.add(&session("u2", "other")).await.unwrap();
        store.add(&session("u1", "second")).await.unwrap();
        store.add(&session("U1", "case differs")).await.unwrap();

        let found = store.find_by_user("u1").await.unwrap();
        let summaries: Vec<_> = found.iter().map(|s| s.summary.as_str()).collect();
        assert_eq!(summaries, vec!["first", "second"]);

        assert!(store.find_by_user("nobody").await.unwrap().is_empty());
    }
}
