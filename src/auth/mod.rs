//! Session plumbing: cookie-token sessions, request extractors, and the
//! ID-token refresh path.
//!
//! Credential verification itself lives with the backend; this module only
//! associates a browser cookie with the backend tokens it earned.

pub mod middleware;
pub mod session;

use chrono::{Duration, Utc};
use tracing::warn;

pub use middleware::{CurrentUser, MaybeUser, RequireUser};
pub use session::{generate_session_token, Session, SessionStore};

use crate::firebase::auth::AuthClient;

/// Bearer token for the user's session, refreshed through the secure-token
/// endpoint when the cached one is about to lapse.
///
/// Returns `None` when the session is gone or the refresh is rejected; the
/// caller proceeds unauthenticated and lets the backend decide.
pub async fn fresh_id_token(
    auth: &AuthClient,
    sessions: &SessionStore,
    user: &CurrentUser,
) -> Option<String> {
    let session = sessions.get(&user.session_token).await?;
    if !session.id_token_stale(Utc::now()) {
        return Some(session.id_token);
    }

    match auth.refresh_id_token(&session.refresh_token).await {
        Ok(tokens) => {
            let expires_at = Utc::now() + Duration::seconds(tokens.expires_in_secs());
            sessions
                .update_tokens(
                    &user.session_token,
                    tokens.id_token.clone(),
                    tokens.refresh_token,
                    expires_at,
                )
                .await;
            Some(tokens.id_token)
        }
        Err(e) => {
            warn!("Failed to refresh ID token: {e}");
            None
        }
    }
}
