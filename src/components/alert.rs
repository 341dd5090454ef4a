//! Flash banner components for transient success and error messages.
//!
//! Banners carry their auto-hide delay in a `data-hide-after` attribute;
//! `static/js/banners.js` reads it and removes the element after the delay.

use maud::{html, Markup, Render};

use crate::constants::{ERROR_BANNER_MILLIS, SUCCESS_BANNER_MILLIS};

/// Banner variant types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    /// Get the CSS class for the banner div element.
    #[must_use]
    pub const fn message_class(self) -> &'static str {
        match self {
            Self::Success => "success-message",
            Self::Error => "error-message",
        }
    }

    /// Milliseconds the banner stays visible before auto-hiding.
    #[must_use]
    pub const fn hide_after_millis(self) -> u32 {
        match self {
            Self::Success => SUCCESS_BANNER_MILLIS,
            Self::Error => ERROR_BANNER_MILLIS,
        }
    }
}

/// A transient banner message.
///
/// # Example
///
/// ```ignore
/// use crate::components::alert::Message;
///
/// let banner = Message::success("Account created successfully! 🎉");
/// ```
#[derive(Debug, Clone)]
pub struct Message<'a> {
    pub kind: MessageKind,
    pub text: &'a str,
}

impl<'a> Message<'a> {
    /// Create a new banner message.
    #[must_use]
    pub const fn new(kind: MessageKind, text: &'a str) -> Self {
        Self { kind, text }
    }

    /// Create a success banner.
    #[must_use]
    pub const fn success(text: &'a str) -> Self {
        Self::new(MessageKind::Success, text)
    }

    /// Create an error banner.
    #[must_use]
    pub const fn error(text: &'a str) -> Self {
        Self::new(MessageKind::Error, text)
    }
}

impl Render for Message<'_> {
    fn render(&self) -> Markup {
        html! {
            div class=(self.kind.message_class())
                data-hide-after=(self.kind.hide_after_millis()) {
                (self.text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_success() {
        let msg = Message::success("Welcome back! 👋");
        let html = msg.render().into_string();
        assert!(html.contains("success-message"));
        assert!(html.contains("data-hide-after=\"3000\""));
        assert!(html.contains("Welcome back! 👋"));
    }

    #[test]
    fn test_message_error() {
        let msg = Message::error("Passwords do not match!");
        let html = msg.render().into_string();
        assert!(html.contains("error-message"));
        assert!(html.contains("data-hide-after=\"5000\""));
    }

    #[test]
    fn test_message_escapes_html() {
        let msg = Message::error("<script>alert(1)</script>");
        let html = msg.render().into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
