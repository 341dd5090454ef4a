//! Base layout components for the web UI.
//!
//! This module provides the main page layout structure including
//! the HTML skeleton, navigation, flash banners, and footer.

use maud::{html, Markup, DOCTYPE};

use super::alert::Message;
use crate::auth::CurrentUser;

/// Base page layout builder.
///
/// Provides a fluent interface for constructing the main page layout
/// with required user context for authentication-aware navigation.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("My Page", user.as_ref())
///     .with_notice(Some("Welcome back! 👋"))
///     .render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    user: Option<&'a CurrentUser>,
    notice: Option<&'a str>,
    error: Option<&'a str>,
}

impl<'a> BaseLayout<'a> {
    /// Create a new base layout with the given page title and user.
    ///
    /// The user parameter is required so authentication state is always
    /// explicitly handled. Pass `None` for anonymous visitors or
    /// `Some(&user)` for signed-in users.
    #[must_use]
    pub fn new(title: &'a str, user: Option<&'a CurrentUser>) -> Self {
        Self {
            title,
            user,
            notice: None,
            error: None,
        }
    }

    /// Set a transient success banner shown at the top of the page.
    #[must_use]
    pub fn with_notice(mut self, notice: Option<&'a str>) -> Self {
        self.notice = notice;
        self
    }

    /// Set a transient error banner shown at the top of the page.
    #[must_use]
    pub fn with_error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    /// Render the complete HTML page with the given content.
    ///
    /// The content will be placed inside the `<main class="container">`
    /// element, after any flash banners.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) " - BlogHub" }

                    link rel="stylesheet" href="/static/css/style.css";
                    link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>📝</text></svg>";
                }
                body {
                    (self.render_header())
                    main class="container" {
                        (self.render_banners())
                        (content)
                    }
                    (Self::render_footer())
                    // External script for banner auto-hide, delete confirms,
                    // and busy submit labels
                    script src="/static/js/banners.js" {}
                }
            }
        }
    }

    /// Render the page header with navigation.
    fn render_header(&self) -> Markup {
        html! {
            header class="container" {
                nav {
                    ul {
                        li {
                            a href="/" {
                                strong class="site-logo" { "📝 BlogHub" }
                            }
                        }
                    }
                    ul {
                        li { a href="/" { "Home" } }
                        (self.render_auth_nav())
                    }
                }
            }
        }
    }

    /// Render authentication-related navigation items.
    fn render_auth_nav(&self) -> Markup {
        match self.user {
            Some(u) => html! {
                li { span class="nav-user" { "👤 " (u.email) } }
                li { a class="compose-link" href="/compose" { "✍️ New Blog" } }
                li {
                    form class="logout-form" method="post" action="/logout" {
                        button class="logout-btn" type="submit" { "Sign Out" }
                    }
                }
            },
            None => html! {
                li { a href="/login" { "Sign In" } }
            },
        }
    }

    /// Render the flash banners carried across a redirect, if any.
    fn render_banners(&self) -> Markup {
        html! {
            @if let Some(notice) = self.notice {
                (Message::success(notice))
            }
            @if let Some(error) = self.error {
                (Message::error(error))
            }
        }
    }

    /// Render the page footer.
    fn render_footer() -> Markup {
        html! {
            footer class="container" {
                small { "BlogHub | Share your stories with the world" }
            }
        }
    }
}
