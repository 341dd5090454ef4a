//! Authentication page for the web UI.
//!
//! This module provides the combined sign-in / sign-up page. Both forms
//! post to the same endpoint; a hidden `mode` field tells the handler
//! which flow was submitted.

use maud::{html, Markup, Render};

use crate::components::{BaseLayout, Form, FormGroup, HiddenInput, Input, Message};

/// Which face of the auth page is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    /// Resolve the mode from the `?mode=` query parameter.
    ///
    /// Anything other than "signup" falls back to sign-in.
    #[must_use]
    pub fn from_query(mode: Option<&str>) -> Self {
        match mode {
            Some("signup") => Self::SignUp,
            _ => Self::SignIn,
        }
    }

    /// Value carried in the hidden `mode` form field.
    #[must_use]
    pub const fn form_value(&self) -> &'static str {
        match self {
            Self::SignIn => "signin",
            Self::SignUp => "signup",
        }
    }

    /// Label on the submit button.
    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        match self {
            Self::SignIn => "Sign In",
            Self::SignUp => "Sign Up",
        }
    }

    /// Label swapped in while the submit is in flight.
    #[must_use]
    pub const fn busy_label(&self) -> &'static str {
        match self {
            Self::SignIn => "Signing In...",
            Self::SignUp => "Creating Account...",
        }
    }
}

/// Parameters for rendering the auth page.
#[derive(Debug, Default)]
pub struct AuthPageParams<'a> {
    /// Which tab is active
    pub mode: AuthMode,
    /// Optional error message shown above the form
    pub error: Option<&'a str>,
    /// Email to prefill after a failed submission
    pub email: Option<&'a str>,
}

impl<'a> AuthPageParams<'a> {
    /// Create params for the given mode.
    #[must_use]
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            error: None,
            email: None,
        }
    }

    /// Set the error message.
    #[must_use]
    pub fn with_error(mut self, error: &'a str) -> Self {
        self.error = Some(error);
        self
    }

    /// Prefill the email field.
    #[must_use]
    pub fn with_email(mut self, email: Option<&'a str>) -> Self {
        self.email = email;
        self
    }
}

/// Render the auth page.
///
/// # Example
///
/// ```ignore
/// // Sign-in tab
/// let page = render_auth_page(&AuthPageParams::new(AuthMode::SignIn));
///
/// // Sign-up tab after a validation failure
/// let params = AuthPageParams::new(AuthMode::SignUp)
///     .with_error("Passwords do not match!")
///     .with_email(Some("me@example.com"));
/// let page = render_auth_page(&params);
/// ```
#[must_use]
pub fn render_auth_page(params: &AuthPageParams<'_>) -> Markup {
    let content = html! {
        div class="auth-container" {
            div class="auth-card" {
                h1 class="auth-title" { "📝 BlogHub" }
                p class="auth-subtitle" { "Share your stories with the world" }

                (render_tabs(params.mode))

                @if let Some(e) = params.error {
                    (Message::error(e))
                }

                (render_auth_form(params))
            }
        }
    };

    // The page is only reachable signed-out; the handler redirects
    // signed-in visitors home.
    BaseLayout::new(params.mode.submit_label(), None).render(content)
}

/// Render the Sign In / Sign Up tab switcher.
fn render_tabs(mode: AuthMode) -> Markup {
    let tab_class = |active: bool| {
        if active {
            "auth-tab active"
        } else {
            "auth-tab"
        }
    };

    html! {
        div class="auth-tabs" {
            a class=(tab_class(mode == AuthMode::SignIn)) href="/login" { "Sign In" }
            a class=(tab_class(mode == AuthMode::SignUp)) href="/login?mode=signup" { "Sign Up" }
        }
    }
}

/// Render the credentials form for the active mode.
fn render_auth_form(params: &AuthPageParams<'_>) -> Markup {
    let mode = params.mode;
    let signup = mode == AuthMode::SignUp;

    let email_field = Input::email("email")
        .id("email")
        .required()
        .autocomplete("email")
        .placeholder("you@example.com")
        .value_opt(params.email)
        .render();

    let password_field = Input::password("password")
        .id("password")
        .required()
        .autocomplete(if signup {
            "new-password"
        } else {
            "current-password"
        })
        .render();

    let fields = html! {
        (HiddenInput::new("mode", mode.form_value()))

        (FormGroup::new("Email", "email", email_field).class("form-group"))

        @if signup {
            (FormGroup::new("Password", "password", password_field)
                .class("form-group")
                .help("At least 6 characters"))
            (FormGroup::new(
                "Confirm Password",
                "confirm_password",
                Input::password("confirm_password")
                    .id("confirm_password")
                    .required()
                    .autocomplete("new-password")
                    .render(),
            )
            .class("form-group"))
        } @else {
            (FormGroup::new("Password", "password", password_field).class("form-group"))
        }

        button class="auth-submit" type="submit" data-busy-label=(mode.busy_label()) {
            (mode.submit_label())
        }
    };

    Form::post("/auth", fields).class("auth-form").render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_mode_from_query() {
        assert_eq!(AuthMode::from_query(None), AuthMode::SignIn);
        assert_eq!(AuthMode::from_query(Some("signin")), AuthMode::SignIn);
        assert_eq!(AuthMode::from_query(Some("signup")), AuthMode::SignUp);
        assert_eq!(AuthMode::from_query(Some("bogus")), AuthMode::SignIn);
    }

    #[test]
    fn test_auth_page_sign_in_default() {
        let page = render_auth_page(&AuthPageParams::new(AuthMode::SignIn));
        let html = page.into_string();

        assert!(html.contains("<title>Sign In - BlogHub</title>"));
        assert!(html.contains("📝 BlogHub"));
        assert!(html.contains("Share your stories with the world"));

        // Form posts to the shared auth endpoint with the signin mode
        assert!(html.contains(r#"action="/auth""#));
        assert!(html.contains(r#"name="mode" value="signin""#));
        assert!(html.contains(r#"name="email""#));
        assert!(html.contains(r#"name="password""#));

        // No confirm field on the sign-in tab
        assert!(!html.contains(r#"name="confirm_password""#));

        // Active tab styling
        assert!(html.contains(r#"class="auth-tab active" href="/login""#));
        assert!(html.contains(r#"class="auth-tab" href="/login?mode=signup""#));
    }

    #[test]
    fn test_auth_page_sign_up_has_confirm_field() {
        let page = render_auth_page(&AuthPageParams::new(AuthMode::SignUp));
        let html = page.into_string();

        assert!(html.contains("<title>Sign Up - BlogHub</title>"));
        assert!(html.contains(r#"name="mode" value="signup""#));
        assert!(html.contains(r#"name="confirm_password""#));
        assert!(html.contains("At least 6 characters"));
        assert!(html.contains(r#"class="auth-tab active" href="/login?mode=signup""#));
    }

    #[test]
    fn test_auth_page_busy_labels() {
        let signin = render_auth_page(&AuthPageParams::new(AuthMode::SignIn)).into_string();
        assert!(signin.contains(r#"data-busy-label="Signing In...""#));
        assert!(signin.contains(">Sign In</button>"));

        let signup = render_auth_page(&AuthPageParams::new(AuthMode::SignUp)).into_string();
        assert!(signup.contains(r#"data-busy-label="Creating Account...""#));
        assert!(signup.contains(">Sign Up</button>"));
    }

    #[test]
    fn test_auth_page_with_error() {
        let params = AuthPageParams::new(AuthMode::SignUp).with_error("Passwords do not match!");
        let html = render_auth_page(&params).into_string();

        assert!(html.contains("error-message"));
        assert!(html.contains("Passwords do not match!"));
    }

    #[test]
    fn test_auth_page_preserves_email_after_failure() {
        let params = AuthPageParams::new(AuthMode::SignIn)
            .with_error("Incorrect password")
            .with_email(Some("me@example.com"));
        let html = render_auth_page(&params).into_string();

        assert!(html.contains(r#"value="me@example.com""#));
    }

    #[test]
    fn test_auth_page_escapes_error() {
        let params = AuthPageParams::new(AuthMode::SignIn).with_error("<script>alert('x')</script>");
        let html = render_auth_page(&params).into_string();

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
