//! Blog detail page for the web UI.
//!
//! Renders a single post in full, or the not-found page when the
//! requested document is missing.

use maud::{html, Markup};

use crate::auth::CurrentUser;
use crate::components::{BaseLayout, CategoryBadge};
use crate::posts::model::Post;

/// Render the full view of a single post.
///
/// # Example
///
/// ```ignore
/// let page = render_detail_page(&post, user.as_ref());
/// ```
#[must_use]
pub fn render_detail_page(post: &Post, user: Option<&CurrentUser>) -> Markup {
    let content = html! {
        article class="blog-detail" {
            @if let Some(url) = &post.image_url {
                img class="detail-image" src=(url) alt=(post.title);
            }
            div class="detail-body" {
                (CategoryBadge::new(&post.category))
                h1 class="detail-title" { (post.title) }
                div class="detail-meta" {
                    span class="detail-author" { "By " (post.author_email) }
                }
                div class="detail-description" { (post.description) }
            }
            a class="back-link" href="/" { "← Back to all blogs" }
        }
    };

    BaseLayout::new(&post.title, user).render(content)
}

/// Render the not-found page for a missing or unspecified post.
#[must_use]
pub fn render_not_found_page(user: Option<&CurrentUser>) -> Markup {
    let content = html! {
        div class="not-found" {
            h1 { "Blog not found!" }
            p { "The blog you are looking for does not exist or was removed." }
            a class="back-link" href="/" { "← Back to all blogs" }
        }
    };

    BaseLayout::new("Blog not found!", user).render(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_post(image_url: Option<&str>) -> Post {
        Post {
            id: "abc123".to_string(),
            title: "A Week in Kyoto".to_string(),
            category: "Travel".to_string(),
            description: "Temples, trains, and far too much matcha.".to_string(),
            image_url: image_url.map(str::to_string),
            author_id: "uid-1".to_string(),
            author_email: "author@example.com".to_string(),
            created_at: None,
            created_at_client: None,
        }
    }

    #[test]
    fn test_detail_page_basic() {
        let post = test_post(None);
        let html = render_detail_page(&post, None).into_string();

        assert!(html.contains("<title>A Week in Kyoto - BlogHub</title>"));
        assert!(html.contains(r#"class="blog-detail""#));
        assert!(html.contains(r#"class="detail-title""#));
        assert!(html.contains("A Week in Kyoto"));
        assert!(html.contains("✈️ Travel"));
        assert!(html.contains("By author@example.com"));
        assert!(html.contains("Temples, trains, and far too much matcha."));
        assert!(html.contains(r#"class="back-link" href="/""#));
    }

    #[test]
    fn test_detail_page_image_when_present() {
        let post = test_post(Some("https://storage.example.com/blog-images/1_a.png"));
        let html = render_detail_page(&post, None).into_string();

        assert!(html.contains(r#"class="detail-image""#));
        assert!(html.contains(r#"src="https://storage.example.com/blog-images/1_a.png""#));
    }

    #[test]
    fn test_detail_page_no_image_element_without_url() {
        let post = test_post(None);
        let html = render_detail_page(&post, None).into_string();

        assert!(!html.contains("detail-image"));
    }

    #[test]
    fn test_detail_page_escapes_content() {
        let mut post = test_post(None);
        post.title = "<script>alert('xss')</script>".to_string();
        let html = render_detail_page(&post, None).into_string();

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_not_found_page() {
        let html = render_not_found_page(None).into_string();

        assert!(html.contains("Blog not found!"));
        assert!(html.contains("does not exist or was removed"));
        assert!(html.contains(r#"class="back-link" href="/""#));
    }
}
