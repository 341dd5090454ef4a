//! REST clients for the Firebase services the app delegates to.
//!
//! Three thin clients, one per backend surface:
//!
//! - `auth`: Identity Toolkit account creation / sign-in and token refresh
//! - `firestore`: document reads, writes, and structured queries
//! - `storage`: image blob upload, download URLs, and deletion
//!
//! None of them retry; every failure surfaces as a [`FirebaseError`] for the
//! caller to log or turn into a user-facing message.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub mod auth;
pub mod firestore;
pub mod storage;

pub use auth::{friendly_auth_message, AuthClient, AuthErrorCode, AuthedUser, RefreshedTokens};
pub use firestore::{generate_document_id, Document, FieldValue, FirestoreClient};
pub use storage::{image_object_key, StorageClient};

#[derive(Debug, Error)]
pub enum FirebaseError {
    /// Transport-level failure before a usable response arrived.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered with an error payload.
    #[error("backend error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    /// The backend answered 2xx but the body was not the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Standard Google API error envelope: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Turn a non-2xx response into a [`FirebaseError::Api`], pulling the
/// message out of the error envelope when the body carries one.
pub(crate) async fn error_from_response(response: reqwest::Response) -> FirebaseError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.is_empty() => format!("status {status}"),
        Err(_) => body,
    };
    FirebaseError::Api { status, message }
}
