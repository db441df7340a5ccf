//! Integration tests for `/api/admin/projects`: creation, uploads, edits,
//! reordering and deletion.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    admin_ids, body_json, create_draft, create_published, delete_auth, get_auth,
    patch_json_auth, post_json_auth, post_multipart_auth, thumbnail_part, video_part, Part,
    UploadBehavior,
};
use serde_json::json;
use showreel_core::media::UploadError;
use sqlx::PgPool;

async fn project_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM projects")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn upload_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM video_uploads")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Poll `check` until it holds or five seconds pass.
async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn json_create_makes_a_draft_at_the_front(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let first = create_draft(&app.router, &token, "First").await;
    let second = create_draft(&app.router, &token, "Second").await;

    assert_eq!(first["status"], "draft");
    assert!(first["videoUrl"].is_null());
    assert_eq!(second["displayOrder"], 0);

    let ids = admin_ids(&app.router, &token).await;
    assert_eq!(ids, vec![second["id"].as_i64().unwrap(), first["id"].as_i64().unwrap()]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_title_is_rejected(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(
        &app.router,
        "/api/admin/projects",
        json!({ "title": "   " }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().starts_with("title:"));
    assert_eq!(project_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn multipart_create_with_video_publishes(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_multipart_auth(
        &app.router,
        "/api/admin/projects",
        vec![
            Part::Text("title", "Launch Spot"),
            Part::Text("tags", "drone, night"),
            Part::Text("featured", "true"),
            video_part(2048),
        ],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let project = body_json(response).await["data"].clone();
    assert_eq!(project["status"], "published");
    assert_eq!(project["featured"], true);
    assert_eq!(project["tags"], json!(["drone", "night"]));
    assert_eq!(
        project["videoUrl"],
        "https://media.test/optimized/test/video-1"
    );
    assert_eq!(project["thumbnailUrl"], "https://media.test/test/video-1.jpg?t=1");

    let uploads: Vec<String> =
        sqlx::query_scalar("SELECT upload_status FROM video_uploads WHERE project_id = $1")
            .bind(project["id"].as_i64().unwrap())
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(uploads, vec!["completed"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn custom_thumbnail_replaces_the_derived_one(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_multipart_auth(
        &app.router,
        "/api/admin/projects",
        vec![
            Part::Text("data", r#"{"title":"With Cover","year":2023}"#),
            video_part(1024),
            thumbnail_part(),
        ],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let project = body_json(response).await["data"].clone();
    assert_eq!(project["year"], 2023);
    assert_eq!(project["thumbnailUrl"], "https://media.test/test/image-2");
    assert_eq!(project["thumbnailPublicId"], "test/image-2");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn thumbnail_without_video_is_rejected(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_multipart_auth(
        &app.router,
        "/api/admin/projects",
        vec![Part::Text("title", "Cover Only"), thumbnail_part()],
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(project_count(&pool).await, 0);
    assert_eq!(app.media.upload_count(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_video_type_never_reaches_the_store(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_multipart_auth(
        &app.router,
        "/api/admin/projects",
        vec![
            Part::Text("title", "Notes"),
            Part::File("video", "notes.txt", "text/plain", b"hello".to_vec()),
        ],
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.media.upload_count(), 0);
    assert_eq!(project_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Upload failures roll creation back
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_upload_leaves_no_project_behind(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    app.media
        .set_behavior(UploadBehavior::Fail(UploadError::Unknown("boom".into())));

    let response = post_multipart_auth(
        &app.router,
        "/api/admin/projects",
        vec![Part::Text("title", "Doomed"), video_part(1024)],
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPLOAD_FAILED");
    assert_eq!(project_count(&pool).await, 0);
    assert_eq!(upload_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn quota_error_is_reported_as_429(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    app.media
        .set_behavior(UploadBehavior::Fail(UploadError::RemoteQuotaExceeded));

    let response = post_multipart_auth(
        &app.router,
        "/api/admin/projects",
        vec![Part::Text("title", "Over Quota"), video_part(1024)],
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(response).await["code"], "UPLOAD_QUOTA_EXCEEDED");
    assert_eq!(project_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn timed_out_upload_leaves_no_project_behind(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    app.media.set_behavior(UploadBehavior::Hang);

    let response = post_multipart_auth(
        &app.router,
        "/api/admin/projects",
        vec![Part::Text("title", "Slow"), video_part(1024)],
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body_json(response).await["code"], "UPLOAD_TIMEOUT");
    assert_eq!(project_count(&pool).await, 0);
    assert_eq!(upload_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_deadline_covers_every_file(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    // Each file alone fits the one-second budget, both together do not.
    app.media
        .set_behavior(UploadBehavior::Delay(Duration::from_millis(700)));

    let response = post_multipart_auth(
        &app.router,
        "/api/admin/projects",
        vec![Part::Text("title", "Two Parts"), video_part(1024), thumbnail_part()],
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body_json(response).await["code"], "UPLOAD_TIMEOUT");
    assert_eq!(project_count(&pool).await, 0);
    assert_eq!(app.media.deleted_ids(), vec!["test/video-1".to_string()]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn abandoned_create_request_still_removes_the_project(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    app.media.set_behavior(UploadBehavior::Hang);

    let request = post_multipart_auth(
        &app.router,
        "/api/admin/projects",
        vec![Part::Text("title", "Walked Away"), video_part(1024)],
        &token,
    );
    // The client goes away while the upload is still running.
    let abandoned = tokio::time::timeout(Duration::from_millis(200), request).await;
    assert!(abandoned.is_err());

    let cleaned = eventually(|| {
        let pool = pool.clone();
        async move { project_count(&pool).await == 0 && upload_count(&pool).await == 0 }
    })
    .await;
    assert!(cleaned, "project row left behind after the request was dropped");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn abandoned_attach_request_still_reverts_the_draft(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let id = create_draft(&app.router, &token, "Walked Away").await["id"]
        .as_i64()
        .unwrap();
    app.media.set_behavior(UploadBehavior::Hang);

    let uri = format!("/api/admin/projects/{id}/video");
    let request = post_multipart_auth(
        &app.router,
        &uri,
        vec![video_part(1024)],
        &token,
    );
    let abandoned = tokio::time::timeout(Duration::from_millis(200), request).await;
    assert!(abandoned.is_err());

    let reverted = eventually(|| {
        let pool = pool.clone();
        async move {
            let status: String = sqlx::query_scalar("SELECT status FROM projects WHERE id = $1")
                .bind(id)
                .fetch_one(&pool)
                .await
                .unwrap();
            let upload: Option<String> = sqlx::query_scalar(
                "SELECT upload_status FROM video_uploads WHERE project_id = $1",
            )
            .bind(id)
            .fetch_optional(&pool)
            .await
            .unwrap();
            status == "draft" && upload.as_deref() == Some("failed")
        }
    })
    .await;
    assert!(reverted, "project stuck in processing after the request was dropped");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn uploads_need_a_configured_store(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_bare_app(pool.clone());

    let response = post_multipart_auth(
        &app,
        "/api/admin/projects",
        vec![Part::Text("title", "Nowhere"), video_part(1024)],
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "DEPENDENCY_FAILED");
    assert_eq!(project_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Attaching a video
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn attaching_a_video_publishes_a_draft(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let draft = create_draft(&app.router, &token, "Later").await;
    let id = draft["id"].as_i64().unwrap();

    let response = post_multipart_auth(
        &app.router,
        &format!("/api/admin/projects/{id}/video"),
        vec![video_part(1024)],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let project = body_json(response).await["data"].clone();
    assert_eq!(project["status"], "published");
    assert_eq!(project["videoPublicId"], "test/video-1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn replacing_a_video_removes_the_old_one(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let project = create_published(&app.router, &token, "Recut").await;
    let id = project["id"].as_i64().unwrap();

    let response = post_multipart_auth(
        &app.router,
        &format!("/api/admin/projects/{id}/video"),
        vec![video_part(1024)],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["videoPublicId"], "test/video-2");
    assert_eq!(app.media.deleted_ids(), vec!["test/video-1".to_string()]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_attach_reverts_the_draft_and_records_the_failure(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let draft = create_draft(&app.router, &token, "Unlucky").await;
    let id = draft["id"].as_i64().unwrap();
    app.media
        .set_behavior(UploadBehavior::Fail(UploadError::Unknown("boom".into())));

    let response = post_multipart_auth(
        &app.router,
        &format!("/api/admin/projects/{id}/video"),
        vec![video_part(1024)],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let project = body_json(get_auth(&app.router, &format!("/api/admin/projects/{id}"), &token).await)
        .await["data"]
        .clone();
    assert_eq!(project["status"], "draft");

    let uploads = body_json(
        get_auth(&app.router, &format!("/api/admin/projects/{id}/uploads"), &token).await,
    )
    .await;
    assert_eq!(uploads["data"][0]["uploadStatus"], "failed");
    assert!(uploads["data"][0]["errorMessage"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn attach_requires_a_video_part(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let draft = create_draft(&app.router, &token, "Empty").await;
    let id = draft["id"].as_i64().unwrap();

    let response = post_multipart_auth(
        &app.router,
        &format!("/api/admin/projects/{id}/video"),
        vec![thumbnail_part()],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn attach_to_missing_project_is_404(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_multipart_auth(
        &app.router,
        "/api/admin/projects/999999/video",
        vec![video_part(1024)],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.media.upload_count(), 0);
}

// ---------------------------------------------------------------------------
// Edits and status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn draft_without_video_cannot_be_published(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let draft = create_draft(&app.router, &token, "Bare").await;
    let id = draft["id"].as_i64().unwrap();

    let response = patch_json_auth(
        &app.router,
        &format!("/api/admin/projects/{id}"),
        json!({ "status": "published" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn processing_cannot_be_requested(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let project = create_published(&app.router, &token, "Live").await;
    let id = project["id"].as_i64().unwrap();

    let response = patch_json_auth(
        &app.router,
        &format!("/api/admin/projects/{id}"),
        json!({ "status": "processing" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn edit_updates_fields_and_bumps_version(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let draft = create_draft(&app.router, &token, "Old Title").await;
    let id = draft["id"].as_i64().unwrap();
    let version = draft["version"].as_i64().unwrap();

    let response = patch_json_auth(
        &app.router,
        &format!("/api/admin/projects/{id}"),
        json!({ "title": "New Title", "client": "Acme", "version": version }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let project = body_json(response).await["data"].clone();
    assert_eq!(project["title"], "New Title");
    assert_eq!(project["client"], "Acme");
    assert_eq!(project["version"].as_i64().unwrap(), version + 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_version_is_a_conflict(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let draft = create_draft(&app.router, &token, "Contested").await;
    let id = draft["id"].as_i64().unwrap();
    let version = draft["version"].as_i64().unwrap();
    let uri = format!("/api/admin/projects/{id}");

    let first = patch_json_auth(
        &app.router,
        &uri,
        json!({ "title": "Mine", "version": version }),
        &token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = patch_json_auth(
        &app.router,
        &uri,
        json!({ "title": "Theirs", "version": version }),
        &token,
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let current = body_json(get_auth(&app.router, &uri, &token).await).await;
    assert_eq!(current["data"]["title"], "Mine");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn editing_missing_project_is_404(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = patch_json_auth(
        &app.router,
        "/api/admin/projects/424242",
        json!({ "title": "Ghost" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Reordering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_moves_projects_and_is_idempotent(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let a = create_draft(&app.router, &token, "A").await["id"].as_i64().unwrap();
    let b = create_draft(&app.router, &token, "B").await["id"].as_i64().unwrap();
    let c = create_draft(&app.router, &token, "C").await["id"].as_i64().unwrap();
    assert_eq!(admin_ids(&app.router, &token).await, vec![c, b, a]);

    let body = json!({ "updates": [
        { "id": a, "displayOrder": 0 },
        { "id": c, "displayOrder": 1 },
    ]});

    let response = post_json_auth(&app.router, "/api/admin/projects/reorder", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]["updated"].as_u64().unwrap() > 0);
    // Listed projects take their ranks, the rest fill in around them.
    let after_first = admin_ids(&app.router, &token).await;
    assert_eq!(after_first, vec![a, c, b]);

    let response = post_json_auth(&app.router, "/api/admin/projects/reorder", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["updated"], 0);
    assert_eq!(admin_ids(&app.router, &token).await, after_first);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_reorder_places_project_at_requested_rank(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let mut ids = Vec::new();
    for title in ["A", "B", "C", "D"] {
        ids.push(create_draft(&app.router, &token, title).await["id"].as_i64().unwrap());
    }
    let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);
    assert_eq!(admin_ids(&app.router, &token).await, vec![d, c, b, a]);

    let response = post_json_auth(
        &app.router,
        "/api/admin/projects/reorder",
        json!({ "updates": [{ "id": a, "displayOrder": 1 }] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(admin_ids(&app.router, &token).await, vec![d, a, c, b]);

    let project = body_json(
        get_auth(&app.router, &format!("/api/admin/projects/{a}"), &token).await,
    )
    .await;
    assert_eq!(project["data"]["displayOrder"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_with_unknown_id_changes_nothing(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let a = create_draft(&app.router, &token, "A").await["id"].as_i64().unwrap();
    let b = create_draft(&app.router, &token, "B").await["id"].as_i64().unwrap();
    let before = admin_ids(&app.router, &token).await;

    let response = post_json_auth(
        &app.router,
        "/api/admin/projects/reorder",
        json!({ "updates": [
            { "id": a, "displayOrder": 0 },
            { "id": 999999, "displayOrder": 1 },
        ]}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(admin_ids(&app.router, &token).await, before);
    assert_eq!(before, vec![b, a]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_with_stale_version_changes_nothing(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let a = create_draft(&app.router, &token, "A").await;
    let b = create_draft(&app.router, &token, "B").await;
    let a_id = a["id"].as_i64().unwrap();
    let before = admin_ids(&app.router, &token).await;

    patch_json_auth(
        &app.router,
        &format!("/api/admin/projects/{a_id}"),
        json!({ "title": "A2" }),
        &token,
    )
    .await;

    let response = post_json_auth(
        &app.router,
        "/api/admin/projects/reorder",
        json!({ "updates": [
            { "id": a_id, "displayOrder": 0, "version": a["version"] },
            { "id": b["id"], "displayOrder": 1, "version": b["version"] },
        ]}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(admin_ids(&app.router, &token).await, before);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_rejects_malformed_batches(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let a = create_draft(&app.router, &token, "A").await["id"].as_i64().unwrap();

    for body in [
        json!({ "updates": [] }),
        json!({ "updates": [{ "id": a, "displayOrder": 0 }, { "id": a, "displayOrder": 1 }] }),
        json!({ "updates": [{ "id": a, "displayOrder": -1 }] }),
    ] {
        let response =
            post_json_auth(&app.router, "/api/admin/projects/reorder", body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_project_uploads_and_media(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let project = create_published(&app.router, &token, "Gone Soon").await;
    let id = project["id"].as_i64().unwrap();
    assert_eq!(upload_count(&pool).await, 1);

    let uri = format!("/api/admin/projects/{id}");
    let response = delete_auth(&app.router, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(project_count(&pool).await, 0);
    assert_eq!(upload_count(&pool).await, 0);
    assert_eq!(app.media.deleted_ids(), vec!["test/video-1".to_string()]);

    let response = get_auth(&app.router, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(&app.router, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_closes_the_gap_in_display_order(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let a = create_draft(&app.router, &token, "A").await["id"].as_i64().unwrap();
    let b = create_draft(&app.router, &token, "B").await["id"].as_i64().unwrap();
    let c = create_draft(&app.router, &token, "C").await["id"].as_i64().unwrap();

    delete_auth(&app.router, &format!("/api/admin/projects/{b}"), &token).await;

    let json = body_json(get_auth(&app.router, "/api/admin/projects", &token).await).await;
    let orders: Vec<(i64, i64)> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["id"].as_i64().unwrap(), p["displayOrder"].as_i64().unwrap()))
        .collect();
    assert_eq!(orders, vec![(c, 0), (a, 1)]);
}
