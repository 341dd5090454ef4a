use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use urlencoding::encode;

use crate::auth::{MaybeUser, RequireUser, Session};
use crate::constants::{MIN_PASSWORD_LENGTH, SESSION_COOKIE};
use crate::firebase::auth::{friendly_auth_message, AuthedUser};
use crate::web::pages::{self, AuthMode, AuthPageParams};
use crate::web::AppState;

/// Query string for GET /login.
#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    mode: Option<String>,
}

/// Credentials form data.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    mode: String,
    email: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
}

/// GET /login - Show the auth page.
pub async fn login_page(MaybeUser(user): MaybeUser, Query(query): Query<AuthQuery>) -> Response {
    // Already signed in, nothing to do here
    if user.is_some() {
        return Redirect::to("/").into_response();
    }

    let mode = AuthMode::from_query(query.mode.as_deref());
    Html(pages::render_auth_page(&AuthPageParams::new(mode)).into_string()).into_response()
}

/// POST /auth - Handle sign-up or sign-in.
pub async fn authenticate(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    match form.mode.as_str() {
        "signup" => handle_signup(state, form).await,
        "signin" | "" => handle_signin(state, form).await,
        _ => (StatusCode::BAD_REQUEST, "Invalid mode").into_response(),
    }
}

/// Handle account creation.
async fn handle_signup(state: AppState, form: CredentialsForm) -> Response {
    let email = match form.email {
        Some(e) if !e.is_empty() => e,
        _ => return auth_error(AuthMode::SignUp, "Email is required", None),
    };
    let password = match form.password {
        Some(p) if !p.is_empty() => p,
        _ => return auth_error(AuthMode::SignUp, "Password is required", Some(&email)),
    };

    // Local checks run before any backend call
    if form.confirm_password.as_deref() != Some(password.as_str()) {
        return auth_error(AuthMode::SignUp, "Passwords do not match!", Some(&email));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return auth_error(
            AuthMode::SignUp,
            "Password must be at least 6 characters!",
            Some(&email),
        );
    }

    match state.auth.sign_up(&email, &password).await {
        Ok(user) => {
            tracing::info!(uid = %user.local_id, "Account created");
            establish_session(&state, user, "Account created successfully! 🎉").await
        }
        Err(e) => {
            tracing::warn!("Sign-up failed: {e}");
            auth_error(AuthMode::SignUp, &friendly_auth_message(&e), Some(&email))
        }
    }
}

/// Handle credential sign-in.
async fn handle_signin(state: AppState, form: CredentialsForm) -> Response {
    let email = match form.email {
        Some(e) if !e.is_empty() => e,
        _ => return auth_error(AuthMode::SignIn, "Email is required", None),
    };
    let password = match form.password {
        Some(p) if !p.is_empty() => p,
        _ => return auth_error(AuthMode::SignIn, "Password is required", Some(&email)),
    };

    match state.auth.sign_in(&email, &password).await {
        Ok(user) => {
            tracing::info!(uid = %user.local_id, "Signed in");
            establish_session(&state, user, "Welcome back! 👋").await
        }
        Err(e) => {
            tracing::warn!("Sign-in failed: {e}");
            auth_error(AuthMode::SignIn, &friendly_auth_message(&e), Some(&email))
        }
    }
}

/// Store the backend tokens in a new session and send the browser home with
/// the session cookie and a success flash.
async fn establish_session(state: &AppState, user: AuthedUser, flash: &str) -> Response {
    let now = Utc::now();
    let max_age = state.config.session_ttl.as_secs();
    let id_token_ttl = user.expires_in_secs();

    let session = Session {
        uid: user.local_id,
        email: user.email,
        id_token: user.id_token,
        refresh_token: user.refresh_token,
        id_token_expires_at: now + Duration::seconds(id_token_ttl),
        expires_at: now + Duration::seconds(i64::try_from(max_age).unwrap_or(i64::MAX)),
    };
    let token = state.sessions.insert(session).await;

    // Set session cookie
    let cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={max_age}"
    );
    let destination = format!("/?notice={}", encode(flash));

    ([(header::SET_COOKIE, cookie)], Redirect::to(&destination)).into_response()
}

/// Re-render the auth page with an error, keeping the submitted email.
fn auth_error(mode: AuthMode, message: &str, email: Option<&str>) -> Response {
    let params = AuthPageParams::new(mode)
        .with_error(message)
        .with_email(email);
    Html(pages::render_auth_page(&params).into_string()).into_response()
}

/// POST /logout - End the session.
pub async fn logout(State(state): State<AppState>, RequireUser(user): RequireUser) -> Response {
    state.sessions.remove(&user.session_token).await;
    tracing::info!(uid = %user.uid, "Signed out");

    // Clear session cookie
    let cookie = format!("{SESSION_COOKIE}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0");

    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}
