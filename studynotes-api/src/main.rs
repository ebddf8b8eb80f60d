//! studynotes-api - Study notes summarization service
//!
//! Accepts study notes over HTTP, asks the LLM for a summary and flashcards,
//! stores each session in Firestore, and serves a user's past sessions.
//!
//! Startup is fatal when `FIREBASE_CREDENTIALS_JSON` is missing and Firestore
//! or Firebase auth is in use. A missing `OPENAI_API_KEY` only logs a warning;
//! `/analyze` then fails per request while `/review` keeps serving.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studynotes_api::api::FirebaseTokenVerifier;
use studynotes_api::config::{cors_layer, Args, AuthKind, StoreKind};
use studynotes_api::llm::OpenAiClient;
use studynotes_api::store::{FirestoreStore, MemoryStore, SessionStore};
use studynotes_api::{build_router, AppState, AuthMode, StudySessionService};
use studynotes_common::credentials::{load_openai_api_key, load_service_account};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studynotes_api=info,studynotes_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification before anything can fail
    info!(
        "Starting studynotes-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let api_key = match load_openai_api_key() {
        Ok(key) => Some(key),
        Err(e) => {
            warn!("{}; /analyze will fail until it is set", e);
            None
        }
    };
    let service_account = if args.needs_service_account() {
        Some(load_service_account().context("Failed to load Firebase credentials")?)
    } else {
        None
    };

    let llm = Arc::new(
        OpenAiClient::new(api_key, args.openai_model.clone())
            .with_base_url(args.openai_base_url.clone()),
    );
    if llm.has_api_key() {
        info!("LLM client ready (model {})", llm.model());
    }

    let store: Arc<dyn SessionStore> = match args.store {
        StoreKind::Firestore => {
            let key = service_account
                .as_ref()
                .context("Firestore store requires a service account")?;
            let store = FirestoreStore::connect(
                key,
                args.collection.clone(),
                args.firestore_emulator_host.as_deref(),
            )
            .context("Failed to initialize Firestore client")?;
            info!("✓ Firestore store ready (collection {})", store.collection());
            Arc::new(store)
        }
        StoreKind::Memory => {
            warn!("Using in-memory session store; sessions are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let auth = match args.auth {
        AuthKind::Disabled => {
            info!("API authentication disabled");
            AuthMode::Disabled
        }
        AuthKind::Firebase => {
            let key = service_account
                .as_ref()
                .context("Firebase auth requires a service account")?;
            info!("✓ Firebase ID token authentication enabled");
            AuthMode::Firebase(Arc::new(FirebaseTokenVerifier::new(
                key.project_id.clone(),
                reqwest::Client::new(),
            )))
        }
    };

    if args.cors_origins.is_empty() {
        info!("No CORS origins configured; cross-origin requests are refused");
    } else {
        info!("CORS origins: {}", args.cors_origins.join(", "));
    }

    let cors = cors_layer(&args.cors_origins).context("Invalid STUDYNOTES_CORS_ORIGINS")?;
    let state = AppState::new(StudySessionService::new(llm, store), auth);
    let app = build_router(state, cors);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", args.bind))?;
    info!("studynotes-api listening on http://{}", args.bind);
    info!("Health check: http://{}/health", args.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
