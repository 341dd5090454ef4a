//! Identity Toolkit client: account creation, password sign-in, token refresh.

use serde::Deserialize;
use tracing::debug;

use super::{error_from_response, FirebaseError};
use crate::config::Config;

/// Client for the Identity Toolkit REST API.
///
/// All calls are keyed by the project's web API key; no service-account
/// credentials are involved, matching how a browser client talks to the
/// endpoint.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    token_url: String,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

/// Tokens and identity returned by sign-up and sign-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthedUser {
    pub local_id: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    /// Lifetime of `id_token` in seconds, as a decimal string per the API.
    pub expires_in: String,
}

impl AuthedUser {
    /// ID token lifetime in seconds, falling back to one hour if the field
    /// is not a number.
    #[must_use]
    pub fn expires_in_secs(&self) -> i64 {
        self.expires_in.parse().unwrap_or(3600)
    }
}

/// Fresh tokens from the secure-token endpoint. Unlike the sign-in
/// responses, this API speaks snake_case.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshedTokens {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub user_id: String,
}

impl RefreshedTokens {
    #[must_use]
    pub fn expires_in_secs(&self) -> i64 {
        self.expires_in.parse().unwrap_or(3600)
    }
}

impl AuthClient {
    #[must_use]
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.firebase_api_key.clone(),
            base_url: config.auth_base_url.clone(),
            token_url: config.token_base_url.clone(),
        }
    }

    /// Create an account with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the request; the error code
    /// (e.g. `EMAIL_EXISTS`) rides in the [`FirebaseError::Api`] message.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthedUser, FirebaseError> {
        debug!(email = %email, "Creating account");
        self.credential_request("signUp", email, password).await
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error when the credentials are rejected or the call fails.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthedUser, FirebaseError> {
        debug!(email = %email, "Signing in");
        self.credential_request("signInWithPassword", email, password)
            .await
    }

    /// Exchange a refresh token for a fresh ID token.
    ///
    /// # Errors
    ///
    /// Returns an error when the refresh token is no longer accepted.
    pub async fn refresh_id_token(
        &self,
        refresh_token: &str,
    ) -> Result<RefreshedTokens, FirebaseError> {
        let url = format!("{}/v1/token?key={}", self.token_url, self.api_key);
        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json().await?)
    }

    async fn credential_request(
        &self,
        operation: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthedUser, FirebaseError> {
        let url = format!(
            "{}/v1/accounts:{operation}?key={}",
            self.base_url, self.api_key
        );
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json().await?)
    }
}

/// Backend error codes the auth form knows how to explain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    EmailAlreadyInUse,
    InvalidEmail,
    WeakPassword,
    UserNotFound,
    WrongPassword,
    InvalidCredential,
    Other,
}

impl AuthErrorCode {
    /// Classify an Identity Toolkit error message.
    ///
    /// Some codes arrive with trailing detail (`WEAK_PASSWORD : Password
    /// should be at least 6 characters`), so only the leading token counts.
    #[must_use]
    pub fn from_api_message(message: &str) -> Self {
        let code = message.split_whitespace().next().unwrap_or(message);
        match code {
            "EMAIL_EXISTS" => Self::EmailAlreadyInUse,
            "INVALID_EMAIL" | "MISSING_EMAIL" => Self::InvalidEmail,
            "WEAK_PASSWORD" => Self::WeakPassword,
            "EMAIL_NOT_FOUND" => Self::UserNotFound,
            "INVALID_PASSWORD" => Self::WrongPassword,
            "INVALID_LOGIN_CREDENTIALS" => Self::InvalidCredential,
            _ => Self::Other,
        }
    }

    /// Fixed banner message for this code, or `None` when the raw backend
    /// message should be shown instead.
    #[must_use]
    pub const fn user_message(self) -> Option<&'static str> {
        match self {
            Self::EmailAlreadyInUse => Some("This email is already registered"),
            Self::InvalidEmail => Some("Invalid email address"),
            Self::WeakPassword => Some("Password is too weak"),
            Self::UserNotFound => Some("No account found with this email"),
            Self::WrongPassword => Some("Incorrect password"),
            Self::InvalidCredential => Some("Invalid email or password"),
            Self::Other => None,
        }
    }
}

/// Message shown on the auth form for a failed sign-up or sign-in.
///
/// Known backend codes map to the fixed friendly messages; everything else
/// surfaces as-is.
#[must_use]
pub fn friendly_auth_message(err: &FirebaseError) -> String {
    match err {
        FirebaseError::Api { message, .. } => {
            match AuthErrorCode::from_api_message(message).user_message() {
                Some(friendly) => friendly.to_string(),
                None => message.clone(),
            }
        }
        other => other.to_string(),
    }
}
