//! Firestore-backed session store (REST v1)

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use studynotes_common::credentials::ServiceAccountKey;
use studynotes_common::StudySession;
use tracing::{debug, info};

use super::token::{AccessTokenProvider, ServiceAccountTokenProvider, StaticToken};
use super::value::{decode_session, encode_session};
use super::{SessionStore, StoreError};

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

/// Collection holding every study session
pub const DEFAULT_COLLECTION: &str = "bible_study_sessions";

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    // Items without a document only carry read metadata
    document: Option<Document>,
}

/// Session store writing to a Firestore collection
pub struct FirestoreStore {
    base_url: String,
    project_id: String,
    collection: String,
    http_client: reqwest::Client,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl FirestoreStore {
    pub fn new(
        project_id: String,
        collection: String,
        tokens: Arc<dyn AccessTokenProvider>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: FIRESTORE_BASE_URL.to_string(),
            project_id,
            collection,
            http_client,
            tokens,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Build the store from service-account credentials
    ///
    /// With `emulator_host` set, requests go to `http://<host>` using the
    /// emulator's `owner` token instead of minting OAuth tokens.
    pub fn connect(
        key: &ServiceAccountKey,
        collection: String,
        emulator_host: Option<&str>,
    ) -> Result<Self, StoreError> {
        let http_client = reqwest::Client::new();

        match emulator_host {
            Some(host) => {
                info!(host = %host, "Using Firestore emulator");
                let tokens = Arc::new(StaticToken("owner".to_string()));
                Ok(Self::new(key.project_id.clone(), collection, tokens, http_client)
                    .with_base_url(format!("http://{}", host)))
            }
            None => {
                let tokens = Arc::new(ServiceAccountTokenProvider::new(key, http_client.clone())?);
                Ok(Self::new(key.project_id.clone(), collection, tokens, http_client))
            }
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    async fn post_json(&self, url: String, body: &Value) -> Result<reqwest::Response, StoreError> {
        let token = self.tokens.access_token().await?;

        let response = self
            .http_client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Firestore {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl SessionStore for FirestoreStore {
    async fn add(&self, session: &StudySession) -> Result<String, StoreError> {
        let body = json!({ "fields": encode_session(session)? });
        let url = format!("{}/{}", self.documents_url(), self.collection);

        let document: Document = self.post_json(url, &body).await?.json().await?;

        let id = document
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        debug!(collection = %self.collection, id = %id, "Stored study session");
        Ok(id)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<StudySession>, StoreError> {
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "user_id" },
                        "op": "EQUAL",
                        "value": { "stringValue": user_id }
                    }
                }
            }
        });
        let url = format!("{}:runQuery", self.documents_url());

        let items: Vec<RunQueryItem> = self.post_json(url, &body).await?.json().await?;

        items
            .into_iter()
            .filter_map(|item| item.document)
            .map(|document| decode_session(&document.fields))
            .collect()
    }
}
