//! Command-line and environment configuration for studynotes-api
//!
//! Every flag has an environment fallback so the service can run from a
//! container with no arguments. Credentials are not flags; they are loaded
//! by `studynotes_common::credentials`.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use clap::{Parser, ValueEnum};
use studynotes_common::{Error, Result};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::llm::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
use crate::store::DEFAULT_COLLECTION;

/// Where study sessions are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Firestore,
    /// Process-local, lost on restart
    Memory,
}

/// Caller authentication for the study endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthKind {
    Disabled,
    Firebase,
}

/// Command-line arguments for studynotes-api
#[derive(Parser, Debug, Clone)]
#[command(name = "studynotes-api")]
#[command(about = "Study notes summarization and flashcard service")]
#[command(version)]
pub struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8000", env = "STUDYNOTES_BIND")]
    pub bind: SocketAddr,

    /// Allowed cross-origin origins, comma separated ("*" allows any)
    #[arg(long, env = "STUDYNOTES_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Session store backend
    #[arg(long, value_enum, default_value = "firestore", env = "STUDYNOTES_STORE")]
    pub store: StoreKind,

    /// Firestore collection holding study sessions
    #[arg(long, default_value = DEFAULT_COLLECTION, env = "STUDYNOTES_COLLECTION")]
    pub collection: String,

    /// Authentication mode for /analyze and /review
    #[arg(long, value_enum, default_value = "disabled", env = "STUDYNOTES_AUTH")]
    pub auth: AuthKind,

    /// Chat model used for both prompts
    #[arg(long, default_value = DEFAULT_OPENAI_MODEL, env = "OPENAI_MODEL")]
    pub openai_model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, default_value = DEFAULT_OPENAI_BASE_URL, env = "OPENAI_BASE_URL")]
    pub openai_base_url: String,

    /// Firestore emulator host:port (skips OAuth)
    #[arg(long, env = "FIRESTORE_EMULATOR_HOST")]
    pub firestore_emulator_host: Option<String>,
}

impl Args {
    /// Whether startup needs the Firebase service account
    pub fn needs_service_account(&self) -> bool {
        self.store == StoreKind::Firestore || self.auth == AuthKind::Firebase
    }
}

/// CORS policy for the configured origin allow-list
///
/// An empty list allows no cross-origin callers. Methods and headers mirror
/// the preflight request, and credentials are allowed. An origin that is not
/// a valid header value is a configuration error.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins: Vec<&str> = origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .collect();

    let allow_origin = if origins.contains(&"*") {
        AllowOrigin::mirror_request()
    } else {
        let values = origins
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| Error::Config(format!("invalid CORS origin {:?}", origin)))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
