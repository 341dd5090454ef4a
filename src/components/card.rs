//! Card components for displaying blog posts in lists and grids.

use chrono::{DateTime, Utc};
use maud::{html, Markup, Render};

use super::badge::CategoryBadge;
use crate::constants::CARD_DESCRIPTION_CHARS;
use crate::posts::model::{category_emoji, Post};

/// Prompt attached to every delete form; `static/js/banners.js` turns it
/// into a confirm dialog.
const DELETE_CONFIRM: &str =
    "Are you sure you want to delete this blog? This action cannot be undone.";

/// A blog post card for list views.
///
/// Pure render: everything shown derives from the post and the viewer's
/// identity. Edit and delete controls appear only when the viewer is the
/// post's author.
///
/// # Example
///
/// ```ignore
/// use crate::components::card::PostCard;
///
/// let card = PostCard::new(&post, Some("uid-1"));
/// ```
#[derive(Debug, Clone)]
pub struct PostCard<'a> {
    pub post: &'a Post,
    pub current_user_id: Option<&'a str>,
}

impl<'a> PostCard<'a> {
    /// Create a new post card for the given viewer.
    #[must_use]
    pub const fn new(post: &'a Post, current_user_id: Option<&'a str>) -> Self {
        Self {
            post,
            current_user_id,
        }
    }

    fn viewer_is_owner(&self) -> bool {
        self.current_user_id == Some(self.post.author_id.as_str())
    }
}

impl Render for PostCard<'_> {
    fn render(&self) -> Markup {
        let post = self.post;
        let emoji = category_emoji(&post.category);
        let description = truncate_chars(&post.description, CARD_DESCRIPTION_CHARS);

        html! {
            article class="blog-card" {
                @if let Some(url) = &post.image_url {
                    img class="blog-image" src=(url) alt=(post.title);
                } @else {
                    div class="blog-image-placeholder" { (emoji) }
                }
                div class="blog-content" {
                    (CategoryBadge::new(&post.category))
                    h3 class="blog-title" { (post.title) }
                    p class="blog-description" { (description) }
                    div class="blog-meta" {
                        span class="blog-author" { "👤 " (post.author_email) }
                        span class="blog-date" { "📅 " (format_post_date(post.created_at)) }
                    }
                    div class="blog-actions" {
                        a class="read-more" href=(format!("/blog?blogId={}", post.id)) {
                            "Read More"
                        }
                        @if self.viewer_is_owner() {
                            a class="edit-btn" href=(format!("/posts/{}/edit", post.id)) {
                                "✏️ Edit"
                            }
                            form class="delete-form"
                                method="post"
                                action=(format!("/posts/{}/delete", post.id))
                                data-confirm=(DELETE_CONFIRM) {
                                button class="delete-btn" type="submit" { "🗑️ Delete" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// A grid container for post cards.
#[derive(Debug, Clone)]
pub struct PostGrid<'a> {
    pub posts: &'a [Post],
    pub current_user_id: Option<&'a str>,
}

impl<'a> PostGrid<'a> {
    /// Create a new post grid for the given viewer.
    #[must_use]
    pub const fn new(posts: &'a [Post], current_user_id: Option<&'a str>) -> Self {
        Self {
            posts,
            current_user_id,
        }
    }
}

impl Render for PostGrid<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="blog-grid" {
                @for post in self.posts {
                    (PostCard::new(post, self.current_user_id))
                }
            }
        }
    }
}

/// Placeholder shown when a list has nothing to render.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    pub title: &'a str,
    pub message: Option<&'a str>,
}

impl<'a> EmptyState<'a> {
    /// Create a new empty state.
    #[must_use]
    pub const fn new(title: &'a str, message: Option<&'a str>) -> Self {
        Self { title, message }
    }

    /// Empty community feed (or empty category).
    #[must_use]
    pub const fn no_posts() -> Self {
        Self {
            title: "No blogs found",
            message: Some("Be the first to create a blog in this category!"),
        }
    }

    /// Empty personal feed.
    #[must_use]
    pub const fn none_to_show() -> Self {
        Self {
            title: "No blogs to show.",
            message: None,
        }
    }

    /// The list fetch failed.
    #[must_use]
    pub const fn load_failed() -> Self {
        Self {
            title: "Error loading blogs",
            message: Some("Please try again later"),
        }
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="no-blogs" {
                h3 { (self.title) }
                @if let Some(message) = self.message {
                    p { (message) }
                }
            }
        }
    }
}

/// Truncate to a character budget, appending an ellipsis only when text was
/// actually cut. Counts characters, not bytes, so multibyte text never
/// splits mid-character.
fn truncate_chars(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let cut: String = text.chars().take(budget).collect();
    format!("{cut}...")
}

/// Card date line, "Jan 5, 2026" style. Posts whose server timestamp has
/// not resolved yet show "Just now".
fn format_post_date(created_at: Option<DateTime<Utc>>) -> String {
    created_at.map_or_else(
        || "Just now".to_string(),
        |t| t.format("%b %-d, %Y").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            id: "post-1".to_string(),
            title: "My First Blog".to_string(),
            category: "Technology".to_string(),
            description: "A short description".to_string(),
            image_url: None,
            author_id: "uid-1".to_string(),
            author_email: "author@example.com".to_string(),
            created_at: DateTime::from_timestamp(1_767_614_400, 0),
            created_at_client: None,
        }
    }

    #[test]
    fn test_card_basic_structure() {
        let post = sample_post();
        let html = PostCard::new(&post, None).render().into_string();

        assert!(html.contains("blog-card"));
        assert!(html.contains("My First Blog"));
        assert!(html.contains("💻 Technology"));
        assert!(html.contains("👤 author@example.com"));
        assert!(html.contains(r#"<a class="read-more" href="/blog?blogId=post-1">"#));
    }

    #[test]
    fn test_card_owner_sees_controls() {
        let post = sample_post();
        let html = PostCard::new(&post, Some("uid-1")).render().into_string();

        assert!(html.contains("✏️ Edit"));
        assert!(html.contains("🗑️ Delete"));
        assert!(html.contains(r#"href="/posts/post-1/edit""#));
        assert!(html.contains(r#"action="/posts/post-1/delete""#));
        assert!(html.contains("Are you sure you want to delete this blog?"));
    }

    #[test]
    fn test_card_non_owner_sees_no_controls() {
        let post = sample_post();

        for viewer in [None, Some("uid-2")] {
            let html = PostCard::new(&post, viewer).render().into_string();
            assert!(!html.contains("Edit"));
            assert!(!html.contains("Delete"));
        }
    }

    #[test]
    fn test_card_image_or_placeholder() {
        let mut post = sample_post();
        let html = PostCard::new(&post, None).render().into_string();
        assert!(html.contains("blog-image-placeholder"));
        assert!(!html.contains("<img"));

        post.image_url = Some("https://x/y.png".to_string());
        let html = PostCard::new(&post, None).render().into_string();
        assert!(html.contains(r#"<img class="blog-image" src="https://x/y.png""#));
        assert!(!html.contains("blog-image-placeholder"));
    }

    #[test]
    fn test_card_date_formats() {
        let post = sample_post();
        let html = PostCard::new(&post, None).render().into_string();
        assert!(html.contains("📅 Jan 5, 2026"));

        let pending = Post {
            created_at: None,
            ..sample_post()
        };
        let html = PostCard::new(&pending, None).render().into_string();
        assert!(html.contains("📅 Just now"));
    }

    #[test]
    fn test_card_escapes_html() {
        let post = Post {
            title: "<script>alert(1)</script>".to_string(),
            ..sample_post()
        };
        let html = PostCard::new(&post, None).render().into_string();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_truncate_within_budget() {
        assert_eq!(truncate_chars("short", 150), "short");
        let exact: String = "a".repeat(150);
        assert_eq!(truncate_chars(&exact, 150), exact);
    }

    #[test]
    fn test_truncate_over_budget() {
        let long: String = "a".repeat(151);
        let truncated = truncate_chars(&long, 150);
        assert_eq!(truncated.len(), 153);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_multibyte() {
        let long: String = "日".repeat(151);
        let truncated = truncate_chars(&long, 150);
        assert_eq!(truncated.chars().count(), 153);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_grid_renders_all_cards() {
        let posts = vec![
            sample_post(),
            Post {
                id: "post-2".to_string(),
                title: "Second".to_string(),
                ..sample_post()
            },
        ];
        let html = PostGrid::new(&posts, None).render().into_string();
        assert!(html.contains("blog-grid"));
        assert!(html.contains("My First Blog"));
        assert!(html.contains("Second"));
    }

    #[test]
    fn test_empty_states() {
        let html = EmptyState::no_posts().render().into_string();
        assert!(html.contains("<h3>No blogs found</h3>"));
        assert!(html.contains("Be the first to create a blog in this category!"));

        let html = EmptyState::load_failed().render().into_string();
        assert!(html.contains("Error loading blogs"));
        assert!(html.contains("Please try again later"));

        let html = EmptyState::none_to_show().render().into_string();
        assert!(html.contains("No blogs to show."));
        assert!(!html.contains("<p>"));
    }
}
