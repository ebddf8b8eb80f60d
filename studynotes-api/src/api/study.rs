//! Study session endpoints
//!
//! - `POST /analyze`: summarize notes, generate flashcards, store the session
//! - `GET /review?user_id=...`: every stored session for a user

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use studynotes_common::{StudyInput, StudySessionResponse};

use super::auth::{ensure_owner, AuthenticatedUser};
use crate::error::ApiResult;
use crate::AppState;

/// Query parameters for `GET /review`
#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    pub user_id: String,
}

/// POST /analyze
pub async fn analyze_notes(
    State(state): State<AppState>,
    caller: Option<Extension<AuthenticatedUser>>,
    Json(input): Json<StudyInput>,
) -> ApiResult<Json<StudySessionResponse>> {
    ensure_owner(caller.as_deref(), &input.user_id)?;

    let response = state.service.analyze(input).await?;
    Ok(Json(response))
}

/// GET /review
///
/// Order follows storage iteration order and is not stable.
pub async fn review_sessions(
    State(state): State<AppState>,
    caller: Option<Extension<AuthenticatedUser>>,
    Query(query): Query<ReviewQuery>,
) -> ApiResult<Json<Vec<StudySessionResponse>>> {
    ensure_owner(caller.as_deref(), &query.user_id)?;

    let sessions = state.service.review(&query.user_id).await?;
    Ok(Json(sessions))
}
