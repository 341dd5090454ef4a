use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use urlencoding::encode;

use super::auth;
use super::pages::{self, EditorPageParams, HomePageParams};
use super::AppState;
use crate::auth::{fresh_id_token, CurrentUser, MaybeUser, RequireUser};
use crate::config::FeedMode;
use crate::posts::model::{Author, Category, ImageUpload, ListOrder, PostContent, PostFilter};
use crate::posts::service::BlogError;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/login", get(auth::login_page))
        .route("/auth", post(auth::authenticate))
        .route("/logout", post(auth::logout))
        .route("/blog", get(blog_detail))
        .route("/compose", get(compose_form))
        .route("/posts", post(create_post))
        .route("/posts/:id/edit", get(edit_form))
        .route("/posts/:id", post(update_post))
        .route("/posts/:id/delete", post(delete_post))
        .route("/healthz", get(health))
        .route("/favicon.ico", get(favicon))
}

// ========== Feed & Detail Routes ==========

#[derive(Debug, Deserialize)]
pub struct HomeParams {
    category: Option<String>,
    notice: Option<String>,
    error: Option<String>,
}

async fn home(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(params): Query<HomeParams>,
) -> Response {
    // The community feed is members-only
    if state.config.feed_mode == FeedMode::Community && user.is_none() {
        return Redirect::to("/login").into_response();
    }

    let category = params.category.as_deref().and_then(Category::parse);
    let (filter, order) = feed_query(&state, user.as_ref(), category);
    let id_token = bearer_for(&state, user.as_ref()).await;

    let (posts, load_failed) = match state
        .blogs
        .list_posts(&filter, order, id_token.as_deref())
        .await
    {
        Ok(posts) => (posts, false),
        Err(e) => {
            tracing::error!("Failed to load blog feed: {e}");
            (Vec::new(), true)
        }
    };

    let can_compose = user.is_some() || state.config.allow_guest_posts;
    let mut page = HomePageParams::new(&posts, user.as_ref())
        .with_compose(can_compose)
        .with_notice(params.notice.as_deref())
        .with_error(params.error.as_deref());
    if state.config.feed_mode == FeedMode::Community {
        page = page.with_category_filter(category);
    }
    if state.config.feed_mode == FeedMode::Personal && user.is_some() {
        page = page.personal_feed();
    }
    if load_failed {
        page = page.load_failed();
    }

    Html(pages::render_home_page(&page).into_string()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    #[serde(rename = "blogId")]
    blog_id: Option<String>,
}

async fn blog_detail(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(params): Query<DetailParams>,
) -> Response {
    let Some(blog_id) = params.blog_id.filter(|id| !id.is_empty()) else {
        return not_found_page(user.as_ref());
    };

    let id_token = bearer_for(&state, user.as_ref()).await;
    match state.blogs.fetch_post(&blog_id, id_token.as_deref()).await {
        Ok(Some(post)) => {
            Html(pages::render_detail_page(&post, user.as_ref()).into_string()).into_response()
        }
        Ok(None) => not_found_page(user.as_ref()),
        Err(e) => {
            tracing::error!("Failed to fetch blog {blog_id}: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load blog post").into_response()
        }
    }
}

// ========== Editor Routes ==========

async fn compose_form(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> Response {
    if user.is_none() && !state.config.allow_guest_posts {
        return Redirect::to("/login").into_response();
    }

    Html(pages::render_editor_page(&EditorPageParams::create(user.as_ref())).into_string())
        .into_response()
}

async fn create_post(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    multipart: Multipart,
) -> Response {
    if user.is_none() && !state.config.allow_guest_posts {
        return Redirect::to("/login").into_response();
    }

    let form = match read_editor_form(multipart).await {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Rejected malformed editor submission: {e}");
            return (StatusCode::BAD_REQUEST, "Malformed form submission").into_response();
        }
    };

    let content = match form.validated() {
        Ok(c) => c,
        Err(message) => {
            let page = EditorPageParams::create(user.as_ref())
                .with_values(&form.title, &form.category, &form.description)
                .with_error(message);
            return Html(pages::render_editor_page(&page).into_string()).into_response();
        }
    };

    let author = user.as_ref().map_or_else(Author::guest, |u| Author {
        id: u.uid.clone(),
        email: u.email.clone(),
    });
    let id_token = bearer_for(&state, user.as_ref()).await;

    match state
        .blogs
        .create_post(&author, content, form.image, id_token.as_deref())
        .await
    {
        Ok(post) => {
            tracing::info!(post_id = %post.id, "Blog created");
            let destination = format!("/?notice={}", encode("✅ Blog created successfully"));
            Redirect::to(&destination).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create blog: {e}");
            let message = format!("Error saving blog: {e}");
            let page = EditorPageParams::create(user.as_ref())
                .with_values(&form.title, &form.category, &form.description)
                .with_error(&message);
            Html(pages::render_editor_page(&page).into_string()).into_response()
        }
    }
}

async fn edit_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Response {
    let id_token = bearer_for(&state, Some(&user)).await;

    match state.blogs.fetch_post(&id, id_token.as_deref()).await {
        Ok(Some(post)) => {
            Html(pages::render_editor_page(&EditorPageParams::edit(&user, &post)).into_string())
                .into_response()
        }
        Ok(None) => not_found_page(Some(&user)),
        Err(e) => {
            tracing::error!("Failed to fetch blog {id} for editing: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load blog post").into_response()
        }
    }
}

async fn update_post(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    let form = match read_editor_form(multipart).await {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Rejected malformed editor submission: {e}");
            return (StatusCode::BAD_REQUEST, "Malformed form submission").into_response();
        }
    };

    let content = match form.validated() {
        Ok(c) => c,
        Err(message) => {
            let page = EditorPageParams::create(Some(&user))
                .editing(&id)
                .with_values(&form.title, &form.category, &form.description)
                .with_error(message);
            return Html(pages::render_editor_page(&page).into_string()).into_response();
        }
    };

    let id_token = bearer_for(&state, Some(&user)).await;

    match state
        .blogs
        .update_post(&id, content, form.image, id_token.as_deref())
        .await
    {
        Ok(()) => {
            tracing::info!(post_id = %id, "Blog updated");
            let destination = format!("/?notice={}", encode("✅ Blog updated successfully"));
            Redirect::to(&destination).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to update blog {id}: {e}");
            let message = format!("Error saving blog: {e}");
            let page = EditorPageParams::create(Some(&user))
                .editing(&id)
                .with_values(&form.title, &form.category, &form.description)
                .with_error(&message);
            Html(pages::render_editor_page(&page).into_string()).into_response()
        }
    }
}

async fn delete_post(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Response {
    let id_token = bearer_for(&state, Some(&user)).await;

    match state.blogs.delete_post(&id, id_token.as_deref()).await {
        Ok(()) => {
            tracing::info!(post_id = %id, "Blog deleted");
            Redirect::to("/").into_response()
        }
        Err(BlogError::NotFound) => not_found_page(Some(&user)),
        Err(e) => {
            tracing::error!("Failed to delete blog {id}: {e}");
            let destination = format!("/?error={}", encode("Error deleting blog"));
            Redirect::to(&destination).into_response()
        }
    }
}

// ========== Utility Routes ==========

async fn health() -> &'static str {
    "OK"
}

async fn favicon() -> Response {
    // Return a simple SVG favicon (memo emoji)
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"><text y=".9em" font-size="90">📝</text></svg>"#;
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/svg+xml")],
        svg,
    )
        .into_response()
}

// ========== Helpers ==========

/// Feed restriction and ordering for the configured mode.
///
/// Community feeds take the visitor's category selection and order by the
/// server timestamp; personal feeds restrict to the signed-in author (all
/// posts when signed out) and order by the client fallback timestamp.
fn feed_query(
    state: &AppState,
    user: Option<&CurrentUser>,
    category: Option<Category>,
) -> (PostFilter, ListOrder) {
    match state.config.feed_mode {
        FeedMode::Community => (
            category.map_or(PostFilter::All, PostFilter::Category),
            ListOrder::ServerTime,
        ),
        FeedMode::Personal => (
            user.map_or(PostFilter::All, |u| PostFilter::Author(u.uid.clone())),
            ListOrder::ClientTime,
        ),
    }
}

/// ID token for backend calls, refreshed through the session when stale.
///
/// Anonymous requests get `None` and rely on the backend's public rules.
async fn bearer_for(state: &AppState, user: Option<&CurrentUser>) -> Option<String> {
    match user {
        Some(u) => fresh_id_token(&state.auth, &state.sessions, u).await,
        None => None,
    }
}

fn not_found_page(user: Option<&CurrentUser>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(pages::render_not_found_page(user).into_string()),
    )
        .into_response()
}

/// Fields collected from the editor's multipart submission.
#[derive(Debug, Default)]
struct EditorForm {
    title: String,
    category: String,
    description: String,
    image: Option<ImageUpload>,
}

impl EditorForm {
    /// Check the submission and build the document content.
    fn validated(&self) -> Result<PostContent, &'static str> {
        if self.title.is_empty() || self.description.is_empty() {
            return Err("Title and description are required");
        }
        let Some(category) = Category::parse(&self.category) else {
            return Err("Please select a valid category");
        };
        Ok(PostContent {
            title: self.title.clone(),
            category,
            description: self.description.clone(),
        })
    }
}

/// Read the editor form out of a multipart body.
///
/// The image part counts only when the browser attached an actual file: it
/// needs a filename and at least one byte, since an untouched file control
/// still submits an empty part.
async fn read_editor_form(mut multipart: Multipart) -> Result<EditorForm, MultipartError> {
    let mut form = EditorForm::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "title" => form.title = field.text().await?.trim().to_string(),
            "category" => form.category = field.text().await?.trim().to_string(),
            "description" => form.description = field.text().await?.trim().to_string(),
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?;
                if !filename.is_empty() && !data.is_empty() {
                    form.image = Some(ImageUpload {
                        filename,
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_form_validation() {
        let form = EditorForm {
            title: "A title".to_string(),
            category: "Travel".to_string(),
            description: "Some text".to_string(),
            image: None,
        };
        let content = form.validated().unwrap();
        assert_eq!(content.title, "A title");
        assert_eq!(content.category, Category::Travel);
    }

    #[test]
    fn test_editor_form_rejects_missing_fields() {
        let form = EditorForm {
            title: String::new(),
            category: "Travel".to_string(),
            description: "Some text".to_string(),
            image: None,
        };
        assert_eq!(
            form.validated().unwrap_err(),
            "Title and description are required"
        );
    }

    #[test]
    fn test_editor_form_rejects_unknown_category() {
        let form = EditorForm {
            title: "A title".to_string(),
            category: "Gardening".to_string(),
            description: "Some text".to_string(),
            image: None,
        };
        assert_eq!(form.validated().unwrap_err(), "Please select a valid category");
    }
}
