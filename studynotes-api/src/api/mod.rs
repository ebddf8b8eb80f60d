//! HTTP API handlers for studynotes-api

pub mod auth;
pub mod health;
pub mod study;

pub use auth::{auth_middleware, AuthMode, AuthenticatedUser, FirebaseTokenVerifier, TokenVerifier};
pub use health::health_routes;
pub use study::{analyze_notes, review_sessions};
