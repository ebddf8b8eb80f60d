//! OAuth2 access tokens for the Firestore REST API
//!
//! A service account proves itself with a self-signed RS256 JWT (the
//! "JWT bearer" grant) and receives a short-lived access token. The token is
//! cached and re-minted shortly before it expires.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use studynotes_common::credentials::ServiceAccountKey;
use tokio::sync::Mutex;

use super::StoreError;

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Source of bearer tokens for Firestore requests
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, StoreError>;
}

/// Fixed token, used against the Firestore emulator
pub struct StaticToken(pub String);

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, StoreError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Mints access tokens from a service-account key
pub struct ServiceAccountTokenProvider {
    client_email: String,
    token_uri: String,
    key_id: Option<String>,
    signing_key: EncodingKey,
    http_client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenProvider {
    /// Fails if the private key is not a valid RSA PEM
    pub fn new(key: &ServiceAccountKey, http_client: reqwest::Client) -> Result<Self, StoreError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;

        Ok(Self {
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            key_id: key.private_key_id.clone(),
            signing_key,
            http_client,
            cached: Mutex::new(None),
        })
    }

    fn signed_assertion(&self) -> Result<String, StoreError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: DATASTORE_SCOPE,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        Ok(jsonwebtoken::encode(&header, &claims, &self.signing_key)?)
    }

    async fn exchange(&self) -> Result<TokenResponse, StoreError> {
        let assertion = self.signed_assertion()?;

        let response = self
            .http_client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Token(format!("{}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Token(e.to_string()))
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String, StoreError> {
        let mut cached = self.cached.lock().await;

        if let Some(entry) = cached.as_ref() {
            if Instant::now() < entry.refresh_at {
                return Ok(entry.token.clone());
            }
        }

        let fresh = self.exchange().await?;
        tracing::debug!(expires_in = fresh.expires_in, "Minted Firestore access token");

        let lifetime = Duration::from_secs(fresh.expires_in).saturating_sub(REFRESH_MARGIN);
        *cached = Some(CachedToken {
            token: fresh.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(fresh.access_token)
    }
}
