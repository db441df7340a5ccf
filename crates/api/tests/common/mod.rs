#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use showreel_api::auth::jwt::{generate_access_token, JwtConfig};
use showreel_api::auth::password::hash_password;
use showreel_api::config::ServerConfig;
use showreel_api::router::build_app_router;
use showreel_api::state::AppState;
use showreel_core::media::{MediaKind, UploadError};
use showreel_core::roles::{ROLE_ADMIN, ROLE_EDITOR};
use showreel_core::types::DbId;
use showreel_db::models::user::CreateUser;
use showreel_db::repositories::{RoleRepo, UserRepo};
use showreel_mail::{EmailError, Mailer, OutgoingEmail};
use showreel_media::{MediaStore, StoredMedia, UploadMetadata};

/// Password given to every user created by [`create_user`].
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig`.
///
/// Uploads time out after one second so timeout tests stay fast, and the
/// contact form allows three messages per window.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_timeout_secs: 1,
        contact_rate_limit: 3,
        contact_rate_window_secs: 3600,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// How [`FakeMediaStore::upload`] behaves.
#[derive(Debug, Clone)]
pub enum UploadBehavior {
    Succeed,
    Fail(UploadError),
    /// Never completes; the pipeline timeout has to fire.
    Hang,
    /// Succeeds after sleeping for the given time.
    Delay(std::time::Duration),
}

/// In-memory media store recording every upload and delete.
pub struct FakeMediaStore {
    behavior: Mutex<UploadBehavior>,
    pub uploads: Mutex<Vec<(MediaKind, String)>>,
    pub deletes: Mutex<Vec<(String, MediaKind)>>,
}

impl FakeMediaStore {
    pub fn new() -> Self {
        Self {
            behavior: Mutex::new(UploadBehavior::Succeed),
            uploads: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        }
    }

    pub fn set_behavior(&self, behavior: UploadBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.deletes
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(
        &self,
        _data: Vec<u8>,
        metadata: &UploadMetadata,
    ) -> Result<StoredMedia, UploadError> {
        let behavior = self.behavior.lock().unwrap().clone();
        if let UploadBehavior::Delay(delay) = behavior {
            tokio::time::sleep(delay).await;
        }
        match behavior {
            UploadBehavior::Succeed | UploadBehavior::Delay(_) => {
                let mut uploads = self.uploads.lock().unwrap();
                let content_id = format!("test/{}-{}", metadata.kind.as_str(), uploads.len() + 1);
                uploads.push((metadata.kind, content_id.clone()));
                Ok(StoredMedia {
                    url: format!("https://media.test/{content_id}"),
                    content_id,
                })
            }
            UploadBehavior::Fail(err) => Err(err),
            UploadBehavior::Hang => std::future::pending().await,
        }
    }

    fn derive_thumbnail(&self, content_id: &str, at_offset_secs: f64) -> String {
        format!("https://media.test/{content_id}.jpg?t={at_offset_secs}")
    }

    fn optimized_video_url(&self, content_id: &str) -> String {
        format!("https://media.test/optimized/{content_id}")
    }

    async fn delete_media(&self, content_id: &str, kind: MediaKind) -> Result<(), UploadError> {
        self.deletes
            .lock()
            .unwrap()
            .push((content_id.to_string(), kind));
        Ok(())
    }
}

/// Mailer that records messages, or fails every send.
pub struct FakeMailer {
    fail: Mutex<bool>,
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

impl FakeMailer {
    pub fn new() -> Self {
        Self {
            fail: Mutex::new(false),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        if *self.fail.lock().unwrap() {
            return Err(EmailError::Build("relay unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// A router plus handles on its fakes.
pub struct TestApp {
    pub router: Router,
    pub media: Arc<FakeMediaStore>,
    pub mailer: Arc<FakeMailer>,
}

/// Build the full application router with fake media and mail, using the
/// given database pool.
///
/// Goes through [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeouts, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with_config(pool, test_config())
}

/// Like [`build_test_app`] with a caller-supplied configuration.
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> TestApp {
    let media = Arc::new(FakeMediaStore::new());
    let mailer = Arc::new(FakeMailer::new());

    let state = AppState::new(
        pool,
        config.clone(),
        Some(media.clone() as Arc<dyn MediaStore>),
        Some(mailer.clone() as Arc<dyn Mailer>),
    );

    TestApp {
        router: build_app_router(state, &config),
        media,
        mailer,
    }
}

/// Router with neither a media store nor a mailer configured.
pub fn build_bare_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone(), None, None);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and the given role name.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> DbId {
    let role = RoleRepo::find_by_name(pool, role)
        .await
        .unwrap()
        .expect("role is seeded by migrations");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role_id: role.id,
        },
    )
    .await
    .unwrap();
    user.id
}

/// Access token for a freshly created admin.
pub async fn admin_token(pool: &PgPool) -> String {
    let id = create_user(pool, "admin", ROLE_ADMIN).await;
    generate_access_token(id, ROLE_ADMIN, &test_config().jwt).unwrap()
}

/// Access token for a freshly created non-admin user.
pub async fn editor_token(pool: &PgPool) -> String {
    let id = create_user(pool, "editor", ROLE_EDITOR).await;
    generate_access_token(id, ROLE_EDITOR, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: &Router, uri: &str) -> axum::response::Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> axum::response::Response {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> axum::response::Response {
    send(app, json_request("POST", uri, None, &body)).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> axum::response::Response {
    send(app, json_request("POST", uri, Some(token), &body)).await
}

pub async fn patch_json_auth(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> axum::response::Response {
    send(app, json_request("PATCH", uri, Some(token), &body)).await
}

pub async fn put_json_auth(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> axum::response::Response {
    send(app, json_request("PUT", uri, Some(token), &body)).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> axum::response::Response {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST a contact message as if it came from `ip`.
pub async fn post_contact(app: &Router, ip: &str, body: serde_json::Value) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "showreel-test-boundary";

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    /// `(field, file name, content type, bytes)`
    File(&'a str, &'a str, &'a str, Vec<u8>),
}

pub fn video_part(size: usize) -> Part<'static> {
    Part::File("video", "reel.mp4", "video/mp4", vec![0u8; size])
}

pub fn thumbnail_part() -> Part<'static> {
    Part::File("thumbnail", "cover.png", "image/png", vec![0u8; 64])
}

fn multipart_body(parts: Vec<Part<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, content_type, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart_auth(
    app: &Router,
    uri: &str,
    parts: Vec<Part<'_>>,
    token: &str,
) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a draft through the API and return its JSON.
pub async fn create_draft(app: &Router, token: &str, title: &str) -> serde_json::Value {
    let response = post_json_auth(
        app,
        "/api/admin/projects",
        serde_json::json!({ "title": title }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Create a published project (with a video) and return its JSON.
pub async fn create_published(app: &Router, token: &str, title: &str) -> serde_json::Value {
    let response = post_multipart_auth(
        app,
        "/api/admin/projects",
        vec![Part::Text("title", title), video_part(1024)],
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Project ids in the order the public listing returns them.
pub async fn public_ids(app: &Router) -> Vec<i64> {
    let response = get(app, "/api/projects").await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

/// Project ids in admin order, drafts included.
pub async fn admin_ids(app: &Router, token: &str) -> Vec<i64> {
    let response = get_auth(app, "/api/admin/projects", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}
