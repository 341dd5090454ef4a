use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use super::session::SessionStore;
use crate::constants::SESSION_COOKIE;

/// The signed-in identity a request acts as.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub uid: String,
    pub email: String,
    /// Cookie token keying the session store entry; needed for sign-out and
    /// for refreshing the backend tokens in place.
    pub session_token: String,
}

/// Current authenticated user (if any).
/// Use this extractor when authentication is optional.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    SessionStore: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionStore::from_ref(state);

        let Some(token) = session_cookie_token(parts) else {
            return Ok(MaybeUser(None));
        };

        // Expired sessions are evicted by the store itself.
        match sessions.get(&token).await {
            Some(session) => Ok(MaybeUser(Some(CurrentUser {
                uid: session.uid,
                email: session.email,
                session_token: token,
            }))),
            None => Ok(MaybeUser(None)),
        }
    }
}

/// Current authenticated user (required).
/// Use this extractor when authentication is mandatory.
/// Redirects to the login page if not signed in.
#[derive(Debug, Clone)]
pub struct RequireUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
    SessionStore: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;

        match user {
            Some(u) => Ok(RequireUser(u)),
            None => Err(Redirect::to("/login").into_response()),
        }
    }
}

/// Pull the session token out of the Cookie header, if any.
fn session_cookie_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("cookie")
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|cookie| {
                cookie
                    .trim()
                    .strip_prefix(SESSION_COOKIE)
                    .and_then(|rest| rest.strip_prefix('='))
            })
        })
        .map(ToString::to_string)
}
