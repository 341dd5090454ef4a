//! Home page rendering using maud templates.
//!
//! This module provides the blog feed page: header with the compose
//! shortcut, the category filter (community mode only), and the post
//! grid with its empty and error placeholders.

use maud::{html, Markup, Render};
use urlencoding::encode;

use crate::auth::CurrentUser;
use crate::components::{BaseLayout, EmptyState, PostGrid};
use crate::posts::model::{Category, Post};

/// Category filter buttons shown above the community feed.
///
/// "All" clears the filter; each category links back to the home page
/// with a `?category=` query parameter.
#[derive(Debug, Clone, Copy)]
pub struct CategoryFilter {
    /// Currently selected category, `None` for "All"
    pub active: Option<Category>,
}

impl CategoryFilter {
    /// Create a filter bar with the given active selection.
    #[must_use]
    pub const fn new(active: Option<Category>) -> Self {
        Self { active }
    }

    /// Build the home-page URL for a filter selection.
    fn build_url(category: Option<Category>) -> String {
        category.map_or_else(
            || "/".to_string(),
            |c| format!("/?category={}", encode(c.as_str())),
        )
    }

    /// CSS class for a filter button, marking the active selection.
    fn button_class(self, category: Option<Category>) -> &'static str {
        if self.active == category {
            "filter-btn active"
        } else {
            "filter-btn"
        }
    }
}

impl Render for CategoryFilter {
    fn render(&self) -> Markup {
        html! {
            div class="filter-section" {
                div class="filter-buttons" {
                    a class=(self.button_class(None)) href=(Self::build_url(None)) { "All" }
                    @for category in Category::ALL {
                        a class=(self.button_class(Some(category)))
                            href=(Self::build_url(Some(category)))
                        {
                            (category.emoji()) " " (category.as_str())
                        }
                    }
                }
            }
        }
    }
}

/// Parameters for rendering the home page.
#[derive(Debug)]
pub struct HomePageParams<'a> {
    /// Posts to show, already filtered and ordered
    pub posts: &'a [Post],
    /// The signed-in viewer, if any
    pub user: Option<&'a CurrentUser>,
    /// Active category filter selection
    pub active_category: Option<Category>,
    /// Whether to render the category filter bar
    pub show_category_filter: bool,
    /// Whether to show the "New Blog" shortcut in the header
    pub can_compose: bool,
    /// Whether the feed shows only the viewer's own posts
    pub personal_feed: bool,
    /// Whether loading the feed failed
    pub load_failed: bool,
    /// Flash notice carried across a redirect
    pub notice: Option<&'a str>,
    /// Flash error carried across a redirect
    pub error: Option<&'a str>,
}

impl<'a> HomePageParams<'a> {
    /// Create home page params with the feed and viewer.
    #[must_use]
    pub fn new(posts: &'a [Post], user: Option<&'a CurrentUser>) -> Self {
        Self {
            posts,
            user,
            active_category: None,
            show_category_filter: false,
            can_compose: false,
            personal_feed: false,
            load_failed: false,
            notice: None,
            error: None,
        }
    }

    /// Show the category filter bar with the given selection.
    #[must_use]
    pub fn with_category_filter(mut self, active: Option<Category>) -> Self {
        self.show_category_filter = true;
        self.active_category = active;
        self
    }

    /// Set whether the compose shortcut is shown.
    #[must_use]
    pub fn with_compose(mut self, can_compose: bool) -> Self {
        self.can_compose = can_compose;
        self
    }

    /// Mark the feed as showing only the viewer's own posts.
    #[must_use]
    pub fn personal_feed(mut self) -> Self {
        self.personal_feed = true;
        self
    }

    /// Mark the feed load as failed.
    #[must_use]
    pub fn load_failed(mut self) -> Self {
        self.load_failed = true;
        self
    }

    /// Set the flash notice.
    #[must_use]
    pub fn with_notice(mut self, notice: Option<&'a str>) -> Self {
        self.notice = notice;
        self
    }

    /// Set the flash error.
    #[must_use]
    pub fn with_error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

/// Render the home page.
///
/// # Example
///
/// ```ignore
/// let params = HomePageParams::new(&posts, user.as_ref())
///     .with_category_filter(Some(Category::Travel))
///     .with_compose(true)
///     .with_notice(notice.as_deref());
/// let page = render_home_page(&params);
/// ```
#[must_use]
pub fn render_home_page(params: &HomePageParams<'_>) -> Markup {
    let content = html! {
        div class="home-header" {
            h1 { "Latest Blogs" }
            @if params.can_compose {
                a class="create-btn" href="/compose" { "✍️ New Blog" }
            }
        }

        @if params.show_category_filter {
            (CategoryFilter::new(params.active_category))
        }

        @if params.load_failed {
            (EmptyState::load_failed())
        } @else if params.posts.is_empty() {
            @if params.personal_feed {
                (EmptyState::none_to_show())
            } @else {
                (EmptyState::no_posts())
            }
        } @else {
            (PostGrid::new(params.posts, params.user.map(|u| u.uid.as_str())))
        }
    };

    BaseLayout::new("Home", params.user)
        .with_notice(params.notice)
        .with_error(params.error)
        .render(content)
}
