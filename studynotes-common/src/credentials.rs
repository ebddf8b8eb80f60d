//! Service credential loading
//!
//! Credentials come from the process environment only:
//! - `FIREBASE_CREDENTIALS_JSON`: Google service-account key as a JSON string
//! - `OPENAI_API_KEY`: bearer key for the chat-completion provider
//!
//! Both are resolved once at startup. The caller decides whether a missing
//! value is fatal.

use std::fmt;

use serde::Deserialize;
use tracing::info;

use crate::{Error, Result};

pub const FIREBASE_CREDENTIALS_VAR: &str = "FIREBASE_CREDENTIALS_JSON";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Google service-account key (the fields the Firestore client needs)
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

// Keeps the private key out of logs
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Parse a service-account JSON payload
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|source| Error::InvalidCredentials {
            var: FIREBASE_CREDENTIALS_VAR.to_string(),
            source,
        })
    }
}

/// Load the service-account key from `FIREBASE_CREDENTIALS_JSON`
pub fn load_service_account() -> Result<ServiceAccountKey> {
    let payload = required_var(FIREBASE_CREDENTIALS_VAR)?;
    let key = ServiceAccountKey::from_json(&payload)?;
    info!(
        project_id = %key.project_id,
        client_email = %key.client_email,
        "Loaded Firebase service account"
    );
    Ok(key)
}

/// Load the LLM provider key from `OPENAI_API_KEY`
pub fn load_openai_api_key() -> Result<String> {
    required_var(OPENAI_API_KEY_VAR)
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn required_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if is_valid_key(&value) => Ok(value),
        _ => Err(Error::MissingEnv(name.to_string())),
    }
}
