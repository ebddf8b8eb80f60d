//! Firestore store tests against a mock REST endpoint
//!
//! Covers the OAuth token exchange, document creation, the user_id query,
//! emulator mode, and error propagation. The RSA key in fixtures/ is a
//! throwaway generated for these tests only.

use std::sync::Arc;

use mockito::{Matcher, Server};
use serde_json::json;
use studynotes_api::store::{
    FirestoreStore, ServiceAccountTokenProvider, SessionStore, StoreError,
};
use studynotes_common::credentials::ServiceAccountKey;
use studynotes_common::{Flashcard, StudySession};

const TEST_PRIVATE_KEY: &str = include_str!("fixtures/test_service_account_key.pem");
const DOCUMENTS_PATH: &str = "/v1/projects/demo-project/databases/(default)/documents";

fn service_account(token_uri: String) -> ServiceAccountKey {
    let payload = json!({
        "type": "service_account",
        "project_id": "demo-project",
        "private_key_id": "test-key",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": "firebase-adminsdk@demo-project.iam.gserviceaccount.com",
        "token_uri": token_uri,
    });
    ServiceAccountKey::from_json(&payload.to_string()).expect("Should parse test key")
}

fn store_for(server: &Server) -> FirestoreStore {
    let key = service_account(format!("{}/token", server.url()));
    let http_client = reqwest::Client::new();
    let tokens = ServiceAccountTokenProvider::new(&key, http_client.clone())
        .expect("Test key should be a valid RSA PEM");

    FirestoreStore::new(
        key.project_id.clone(),
        "bible_study_sessions".to_string(),
        Arc::new(tokens),
        http_client,
    )
    .with_base_url(server.url())
}

fn sample_session() -> StudySession {
    StudySession {
        user_id: "u1".to_string(),
        notes: "Genesis 1 describes creation.".to_string(),
        summary: "A short summary.".to_string(),
        flashcards: vec![Flashcard::new("Q1", "A1")],
    }
}

async fn mock_token(server: &mut Server) -> mockito::Mock {
    server
        .mock("POST", "/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "grant_type".to_string(),
                "urn:ietf:params:oauth:grant-type:jwt-bearer".to_string(),
            ),
            Matcher::Regex("assertion=".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "ya29.test", "expires_in": 3599, "token_type": "Bearer"}"#)
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn test_add_then_query_reuses_cached_token() {
    let mut server = Server::new_async().await;
    let token = mock_token(&mut server).await;

    let create = server
        .mock("POST", format!("{}/bible_study_sessions", DOCUMENTS_PATH).as_str())
        .match_header("authorization", "Bearer ya29.test")
        .match_body(Matcher::PartialJson(json!({
            "fields": {
                "user_id": {"stringValue": "u1"},
                "notes": {"stringValue": "Genesis 1 describes creation."},
                "summary": {"stringValue": "A short summary."}
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "name": "projects/demo-project/databases/(default)/documents/bible_study_sessions/AbC123",
                "fields": {}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let query = server
        .mock("POST", format!("{}:runQuery", DOCUMENTS_PATH).as_str())
        .match_header("authorization", "Bearer ya29.test")
        .match_body(Matcher::PartialJson(json!({
            "structuredQuery": {
                "from": [{"collectionId": "bible_study_sessions"}],
                "where": {"fieldFilter": {
                    "field": {"fieldPath": "user_id"},
                    "op": "EQUAL",
                    "value": {"stringValue": "u1"}
                }}
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {
                    "document": {
                        "name": "projects/demo-project/databases/(default)/documents/bible_study_sessions/AbC123",
                        "fields": {
                            "user_id": {"stringValue": "u1"},
                            "notes": {"stringValue": "Genesis 1 describes creation."},
                            "summary": {"stringValue": "A short summary."},
                            "flashcards": {"arrayValue": {"values": [
                                {"mapValue": {"fields": {
                                    "question": {"stringValue": "Q1"},
                                    "answer": {"stringValue": "A1"}
                                }}}
                            ]}}
                        },
                        "createTime": "2026-10-17T12:00:00.000000Z",
                        "updateTime": "2026-10-17T12:00:00.000000Z"
                    },
                    "readTime": "2026-10-17T12:00:01.000000Z"
                }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let store = store_for(&server);

    let id = store.add(&sample_session()).await.unwrap();
    assert_eq!(id, "AbC123");

    let sessions = store.find_by_user("u1").await.unwrap();
    assert_eq!(sessions, vec![sample_session()]);

    token.assert_async().await;
    create.assert_async().await;
    query.assert_async().await;
}

#[tokio::test]
async fn test_query_without_matches_is_empty() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;

    // An empty result still returns one item carrying only readTime
    let _query = server
        .mock("POST", format!("{}:runQuery", DOCUMENTS_PATH).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"readTime": "2026-10-17T12:00:01.000000Z"}]"#)
        .create_async()
        .await;

    let store = store_for(&server);
    assert!(store.find_by_user("u2").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_firestore_error_status_propagates() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;

    let _create = server
        .mock("POST", format!("{}/bible_study_sessions", DOCUMENTS_PATH).as_str())
        .with_status(403)
        .with_body(r#"{"error": {"code": 403, "status": "PERMISSION_DENIED"}}"#)
        .create_async()
        .await;

    let store = store_for(&server);
    match store.add(&sample_session()).await {
        Err(StoreError::Firestore { status, body }) => {
            assert_eq!(status, 403);
            assert!(body.contains("PERMISSION_DENIED"));
        }
        other => panic!("Expected Firestore error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_token_exchange_failure_propagates() {
    let mut server = Server::new_async().await;
    let _token = server
        .mock("POST", "/token")
        .with_status(400)
        .with_body(r#"{"error": "invalid_grant"}"#)
        .create_async()
        .await;

    let store = store_for(&server);
    let result = store.find_by_user("u1").await;

    assert!(matches!(result, Err(StoreError::Token(_))));
}

#[tokio::test]
async fn test_emulator_mode_uses_owner_token() {
    let mut server = Server::new_async().await;

    let create = server
        .mock("POST", format!("{}/bible_study_sessions", DOCUMENTS_PATH).as_str())
        .match_header("authorization", "Bearer owner")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "projects/demo-project/databases/(default)/documents/bible_study_sessions/emu1"}"#)
        .create_async()
        .await;

    // The emulator never sees the private key, so it need not be valid
    let key = ServiceAccountKey::from_json(
        r#"{"project_id": "demo-project", "private_key": "unused", "client_email": "e@demo"}"#,
    )
    .unwrap();
    let host = server.host_with_port();
    let store = FirestoreStore::connect(&key, "bible_study_sessions".to_string(), Some(&host))
        .expect("Emulator store needs no signing key");

    assert_eq!(store.add(&sample_session()).await.unwrap(), "emu1");
    create.assert_async().await;
}

#[test]
fn test_invalid_private_key_is_rejected_at_startup() {
    let key = ServiceAccountKey::from_json(
        r#"{"project_id": "demo-project", "private_key": "not a pem", "client_email": "e@demo"}"#,
    )
    .unwrap();

    let result = FirestoreStore::connect(&key, "bible_study_sessions".to_string(), None);
    assert!(matches!(result, Err(StoreError::Signing(_))));
}
