//! Bearer-token authentication for the study endpoints
//!
//! Disabled by default. In Firebase mode every protected request must carry
//! `Authorization: Bearer <Firebase ID token>`; the verified uid is attached
//! to the request so handlers can check it against the `user_id` they act on.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{jwk::JwkSet, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{error, warn};

use crate::error::ApiError;
use crate::AppState;

const SECURE_TOKEN_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);
// Lower bound between refetches triggered by an unknown kid
const JWKS_MIN_REFETCH: Duration = Duration::from_secs(60);

/// How protected routes authenticate callers
#[derive(Clone, Default)]
pub enum AuthMode {
    /// No checks; any caller may act as any user
    #[default]
    Disabled,
    /// Firebase ID token required
    Firebase(Arc<dyn TokenVerifier>),
}

/// Caller identity established by the middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

/// Verifies a bearer token and returns the caller's uid
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken(String),
    KeyFetch(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Missing or invalid auth token".to_string(),
            ),
            AuthError::InvalidToken(reason) => {
                (StatusCode::UNAUTHORIZED, format!("Invalid token: {}", reason))
            }
            AuthError::KeyFetch(reason) => {
                error!("Signing key fetch failed: {}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Authentication middleware
///
/// Applied to protected routes only; `/health` never passes through here.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let verifier = match &state.auth {
        AuthMode::Disabled => return Ok(next.run(request).await),
        AuthMode::Firebase(verifier) => verifier,
    };

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let uid = verifier.verify(token).await.map_err(|e| {
        warn!("Token verification failed: {:?}", e);
        e
    })?;

    request.extensions_mut().insert(AuthenticatedUser(uid));
    Ok(next.run(request).await)
}

/// Reject callers acting on a `user_id` other than their own
pub fn ensure_owner(caller: Option<&AuthenticatedUser>, user_id: &str) -> Result<(), ApiError> {
    match caller {
        Some(AuthenticatedUser(uid)) if uid != user_id => Err(ApiError::Forbidden(format!(
            "token does not grant access to user {}",
            user_id
        ))),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
}

/// Verifies Firebase ID tokens against Google's published signing keys
pub struct FirebaseTokenVerifier {
    project_id: String,
    jwks_url: String,
    http_client: reqwest::Client,
    keys: RwLock<Option<(JwkSet, Instant)>>,
    min_refetch: Duration,
}

impl FirebaseTokenVerifier {
    pub fn new(project_id: String, http_client: reqwest::Client) -> Self {
        Self {
            project_id,
            jwks_url: SECURE_TOKEN_JWKS_URL.to_string(),
            http_client,
            keys: RwLock::new(None),
            min_refetch: JWKS_MIN_REFETCH,
        }
    }

    pub fn with_jwks_url(mut self, jwks_url: String) -> Self {
        self.jwks_url = jwks_url;
        self
    }

    /// Cached key set, refetched once the TTL expires
    ///
    /// `refresh` asks for a refetch ahead of the TTL (Google rotated keys),
    /// honoured only if the cached set is older than `min_refetch`.
    async fn key_set(&self, refresh: bool) -> Result<JwkSet, AuthError> {
        if let Some((keys, fetched)) = self.keys.read().await.as_ref() {
            let max_age = if refresh { self.min_refetch } else { JWKS_CACHE_TTL };
            if fetched.elapsed() < max_age {
                return Ok(keys.clone());
            }
        }

        let keys: JwkSet = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        *self.keys.write().await = Some((keys.clone(), Instant::now()));
        Ok(keys)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("https://securetoken.google.com/{}", self.project_id)]);
        validation
    }
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        let header =
            jsonwebtoken::decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing kid".to_string()))?;

        let mut keys = self.key_set(false).await?;
        if keys.find(&kid).is_none() {
            keys = self.key_set(true).await?;
        }
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown kid {}", kid)))?;
        let key = DecodingKey::from_jwk(jwk).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let data = jsonwebtoken::decode::<IdTokenClaims>(token, &key, &self.validation())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }
        Ok(data.claims.sub)
    }
}
