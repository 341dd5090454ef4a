//! Cookie-token sessions holding the backend tokens for a signed-in user.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tokio::sync::RwLock;

/// Generate a cryptographically secure random session token.
pub fn generate_session_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// A signed-in user's server-side session.
///
/// Holds the Firebase tokens so requests can call the backend on the user's
/// behalf; the browser only ever sees the opaque cookie token.
#[derive(Debug, Clone)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    /// When the backend stops accepting `id_token`.
    pub id_token_expires_at: DateTime<Utc>,
    /// When the session itself lapses and the cookie is ignored.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the ID token needs a refresh before the next backend call.
    ///
    /// Refreshes a minute early so an in-flight request never carries a
    /// token that expires mid-call.
    #[must_use]
    pub fn id_token_stale(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(60) >= self.id_token_expires_at
    }

    #[must_use]
    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-process session map keyed by cookie token.
///
/// Sessions live only as long as the process, like the backend SDK's
/// in-memory auth state; a restart signs everyone out.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session and hand back the cookie token that keys it.
    pub async fn insert(&self, session: Session) -> String {
        let token = generate_session_token();
        self.inner.write().await.insert(token.clone(), session);
        token
    }

    /// Look up a live session. Expired entries are evicted on sight.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        match sessions.get(token) {
            Some(session) if session.expired(now) => {
                sessions.remove(token);
                None
            }
            Some(session) => Some(session.clone()),
            None => None,
        }
    }

    pub async fn remove(&self, token: &str) {
        self.inner.write().await.remove(token);
    }

    /// Swap in fresh backend tokens after a refresh.
    pub async fn update_tokens(
        &self,
        token: &str,
        id_token: String,
        refresh_token: String,
        id_token_expires_at: DateTime<Utc>,
    ) {
        if let Some(session) = self.inner.write().await.get_mut(token) {
            session.id_token = id_token;
            session.refresh_token = refresh_token;
            session.id_token_expires_at = id_token_expires_at;
        }
    }
}
