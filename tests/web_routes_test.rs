//! Integration tests for web routes.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bloghub::auth::{Session, SessionStore};
use bloghub::config::{Config, FeedMode};
use bloghub::firebase::{AuthClient, FirestoreClient, StorageClient};
use bloghub::posts::BlogService;
use bloghub::web::{create_app, AppState};
use chrono::{Duration, Utc};
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCUMENTS_PATH: &str = "/v1/projects/demo-project/databases/(default)/documents";
const BOUNDARY: &str = "test-boundary";

/// Application state with every backend pointed at the mock server.
fn test_state(mock_uri: &str, feed_mode: FeedMode, allow_guest_posts: bool) -> AppState {
    let config = Config {
        auth_base_url: mock_uri.to_string(),
        token_base_url: mock_uri.to_string(),
        firestore_base_url: mock_uri.to_string(),
        storage_base_url: mock_uri.to_string(),
        feed_mode,
        allow_guest_posts,
        ..Config::for_testing()
    };
    let http = reqwest::Client::new();
    AppState {
        auth: AuthClient::new(&config, http.clone()),
        sessions: SessionStore::new(),
        blogs: BlogService::new(
            FirestoreClient::new(&config, http.clone()),
            StorageClient::new(&config, http),
        ),
        config: Arc::new(config),
    }
}

/// Insert a live session directly and return its cookie header value.
async fn insert_session(state: &AppState) -> String {
    let now = Utc::now();
    let token = state
        .sessions
        .insert(Session {
            uid: "uid-1".to_string(),
            email: "user@example.com".to_string(),
            id_token: "id-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            id_token_expires_at: now + Duration::hours(1),
            expires_at: now + Duration::days(30),
        })
        .await;
    format!("session={token}")
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Multipart body matching what the editor form submits, including the
/// empty file part a browser sends for an untouched image control.
fn editor_body(title: &str, category: &str, description: &str) -> String {
    let mut body = String::new();
    for (name, value) in [
        ("title", title),
        ("category", category),
        ("description", description),
    ] {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"\"\r\n"
    ));
    body.push_str("Content-Type: application/octet-stream\r\n\r\n\r\n");
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn editor_request(uri: &str, cookie: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri).header(
        "content-type",
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

/// Firestore document JSON for a stored post.
fn blog_document(id: &str) -> serde_json::Value {
    serde_json::json!({
        "name": format!("projects/demo-project/databases/(default)/documents/blogs/{id}"),
        "fields": {
            "title": {"stringValue": "A Week in Kyoto"},
            "category": {"stringValue": "Travel"},
            "description": {"stringValue": "Temples, trains, and far too much matcha."},
            "imageUrl": {"nullValue": null},
            "userId": {"stringValue": "uid-1"},
            "userEmail": {"stringValue": "author@example.com"},
            "createdAt": {"timestampValue": "2026-08-20T10:00:00Z"},
            "createdAtClient": {"integerValue": "1787220000000"},
        },
        "createTime": "2026-08-20T10:00:00Z",
        "updateTime": "2026-08-20T10:00:00Z",
    })
}

/// Firestore `runQuery` response, with the bookkeeping entry an empty
/// result set still carries.
fn feed_response(documents: Vec<serde_json::Value>) -> ResponseTemplate {
    let mut results: Vec<serde_json::Value> = documents
        .into_iter()
        .map(|document| {
            serde_json::json!({"document": document, "readTime": "2026-08-24T12:00:00Z"})
        })
        .collect();
    if results.is_empty() {
        results.push(serde_json::json!({"readTime": "2026-08-24T12:00:00Z"}));
    }
    ResponseTemplate::new(200).set_body_json(results)
}

fn commit_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "commitTime": "2026-08-24T12:00:00Z",
    }))
}

#[tokio::test]
async fn test_healthz() {
    let mock_server = MockServer::start().await;
    let app = create_app(test_state(&mock_server.uri(), FeedMode::Community, false));

    let response = app.oneshot(get_request("/healthz", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}

#[tokio::test]
async fn test_favicon_is_svg() {
    let mock_server = MockServer::start().await;
    let app = create_app(test_state(&mock_server.uri(), FeedMode::Community, false));

    let response = app
        .oneshot(get_request("/favicon.ico", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/svg+xml");
}

#[tokio::test]
async fn test_home_requires_sign_in_for_community_feed() {
    let mock_server = MockServer::start().await;
    let app = create_app(test_state(&mock_server.uri(), FeedMode::Community, false));

    let response = app.oneshot(get_request("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/login");
}

#[tokio::test]
async fn test_home_personal_feed_lists_all_when_signed_out() {
    let mock_server = MockServer::start().await;

    // Signed out there is no author to restrict to, so the feed shows
    // everything ordered by the client timestamp.
    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS_PATH}:runQuery")))
        .and(body_json(serde_json::json!({
            "structuredQuery": {
                "from": [{"collectionId": "blogs"}],
                "orderBy": [{
                    "field": {"fieldPath": "createdAtClient"},
                    "direction": "DESCENDING",
                }],
            }
        })))
        .respond_with(feed_response(vec![blog_document("abc123")]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_app(test_state(&mock_server.uri(), FeedMode::Personal, false));
    let response = app.oneshot(get_request("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("A Week in Kyoto"));
    assert!(html.contains("Sign In"));
    assert!(!html.contains("filter-btn"));
    assert!(!html.contains("edit-btn"));
}

#[tokio::test]
async fn test_home_community_shows_owner_controls() {
    let mock_server = MockServer::start().await;
    let state = test_state(&mock_server.uri(), FeedMode::Community, false);
    let cookie = insert_session(&state).await;

    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS_PATH}:runQuery")))
        .and(header("authorization", "Bearer id-token"))
        .respond_with(feed_response(vec![blog_document("abc123")]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_app(state);
    let response = app.oneshot(get_request("/", Some(&cookie))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("filter-btn"));
    // The session uid matches the document's author, so the owner
    // controls are rendered.
    assert!(html.contains("edit-btn"));
    assert!(html.contains("delete-form"));
}

#[tokio::test]
async fn test_home_category_filter_narrows_query() {
    let mock_server = MockServer::start().await;
    let state = test_state(&mock_server.uri(), FeedMode::Community, false);
    let cookie = insert_session(&state).await;

    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS_PATH}:runQuery")))
        .and(body_json(serde_json::json!({
            "structuredQuery": {
                "from": [{"collectionId": "blogs"}],
                "where": {
                    "fieldFilter": {
                        "field": {"fieldPath": "category"},
                        "op": "EQUAL",
                        "value": {"stringValue": "Travel"},
                    }
                },
                "orderBy": [{
                    "field": {"fieldPath": "createdAt"},
                    "direction": "DESCENDING",
                }],
            }
        })))
        .respond_with(feed_response(Vec::new()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_app(state);
    let response = app
        .oneshot(get_request("/?category=Travel", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(r#"class="filter-btn active" href="/?category=Travel""#));
    assert!(html.contains("No blogs found"));
}

#[tokio::test]
async fn test_blog_detail_renders_post() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{DOCUMENTS_PATH}/blogs/abc123")))
        .respond_with(ResponseTemplate::new(200).set_body_json(blog_document("abc123")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_app(test_state(&mock_server.uri(), FeedMode::Community, false));
    let response = app
        .oneshot(get_request("/blog?blogId=abc123", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("A Week in Kyoto"));
    assert!(html.contains("By author@example.com"));
}

#[tokio::test]
async fn test_blog_detail_missing_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{DOCUMENTS_PATH}/blogs/zzz")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_app(test_state(&mock_server.uri(), FeedMode::Community, false));
    let response = app
        .oneshot(get_request("/blog?blogId=zzz", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Blog not found!"));
}

#[tokio::test]
async fn test_blog_detail_without_id_skips_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_app(test_state(&mock_server.uri(), FeedMode::Community, false));
    let response = app.oneshot(get_request("/blog", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Blog not found!"));
}

#[tokio::test]
async fn test_compose_requires_sign_in_without_guest_posts() {
    let mock_server = MockServer::start().await;
    let app = create_app(test_state(&mock_server.uri(), FeedMode::Community, false));

    let response = app.oneshot(get_request("/compose", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/login");
}

#[tokio::test]
async fn test_compose_open_to_guests_when_enabled() {
    let mock_server = MockServer::start().await;
    let app = create_app(test_state(&mock_server.uri(), FeedMode::Community, true));

    let response = app.oneshot(get_request("/compose", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Create New Blog"));
}

#[tokio::test]
async fn test_guest_create_commits_guest_author() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS_PATH}:commit")))
        .and(body_partial_json(serde_json::json!({
            "writes": [{
                "update": {
                    "fields": {
                        "userId": {"stringValue": "guest"},
                        "userEmail": {"stringValue": "Guest User"},
                    }
                }
            }]
        })))
        .respond_with(commit_response())
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_app(test_state(&mock_server.uri(), FeedMode::Community, true));
    let body = editor_body("Hello from a guest", "Travel", "Guest words.");
    let response = app
        .oneshot(editor_request("/posts", None, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(location.contains("Blog%20created%20successfully"));
}

#[tokio::test]
async fn test_create_rejects_missing_title() {
    let mock_server = MockServer::start().await;
    let state = test_state(&mock_server.uri(), FeedMode::Community, false);
    let cookie = insert_session(&state).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_app(state);
    let body = editor_body("", "Travel", "Hello world");
    let response = app
        .oneshot(editor_request("/posts", Some(&cookie), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Title and description are required"));
    // The submitted values survive the round trip.
    assert!(html.contains("Hello world"));
}

#[tokio::test]
async fn test_update_post_redirects_with_flash() {
    let mock_server = MockServer::start().await;
    let state = test_state(&mock_server.uri(), FeedMode::Community, false);
    let cookie = insert_session(&state).await;

    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS_PATH}:commit")))
        .and(body_partial_json(serde_json::json!({
            "writes": [{"currentDocument": {"exists": true}}]
        })))
        .respond_with(commit_response())
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_app(state);
    let body = editor_body("Updated title", "Technology", "Updated words.");
    let response = app
        .oneshot(editor_request("/posts/abc123", Some(&cookie), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(location.contains("Blog%20updated%20successfully"));
}

#[tokio::test]
async fn test_delete_post_redirects_home() {
    let mock_server = MockServer::start().await;
    let state = test_state(&mock_server.uri(), FeedMode::Community, false);
    let cookie = insert_session(&state).await;

    Mock::given(method("GET"))
        .and(path(format!("{DOCUMENTS_PATH}/blogs/abc123")))
        .respond_with(ResponseTemplate::new(200).set_body_json(blog_document("abc123")))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{DOCUMENTS_PATH}/blogs/abc123")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_app(state);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/posts/abc123/delete")
                .header("cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/");
}

#[tokio::test]
async fn test_edit_form_requires_sign_in() {
    let mock_server = MockServer::start().await;
    let app = create_app(test_state(&mock_server.uri(), FeedMode::Community, false));

    let response = app
        .oneshot(get_request("/posts/abc123/edit", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/login");
}

#[tokio::test]
async fn test_edit_form_prefills_post() {
    let mock_server = MockServer::start().await;
    let state = test_state(&mock_server.uri(), FeedMode::Community, false);
    let cookie = insert_session(&state).await;

    Mock::given(method("GET"))
        .and(path(format!("{DOCUMENTS_PATH}/blogs/abc123")))
        .respond_with(ResponseTemplate::new(200).set_body_json(blog_document("abc123")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_app(state);
    let response = app
        .oneshot(get_request("/posts/abc123/edit", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Edit Blog"));
    assert!(html.contains(r#"value="A Week in Kyoto""#));
}
