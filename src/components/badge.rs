//! Badge components for category indicators.
//!
//! This module provides maud components for rendering the category
//! badges used on blog cards and the detail page.

use maud::{html, Markup, Render};

use crate::posts::model::category_emoji;

/// A category badge showing the post's category with its emoji.
///
/// Works from the raw category string stored on the post so documents
/// with unknown categories still render (with a fallback pin emoji).
///
/// # Example
///
/// ```ignore
/// use crate::components::badge::CategoryBadge;
///
/// let badge = CategoryBadge::new("Technology");
/// ```
#[derive(Debug, Clone)]
pub struct CategoryBadge<'a> {
    pub category: &'a str,
}

impl<'a> CategoryBadge<'a> {
    /// Create a new category badge.
    #[must_use]
    pub const fn new(category: &'a str) -> Self {
        Self { category }
    }
}

impl Render for CategoryBadge<'_> {
    fn render(&self) -> Markup {
        html! {
            span class="blog-category" {
                (category_emoji(self.category)) " " (self.category)
            }
        }
    }
}
