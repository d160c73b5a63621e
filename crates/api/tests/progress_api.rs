//! HTTP-level integration tests for progress toggling and the dashboard.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use common::{body_json, get, get_auth, post_json, post_json_auth};
use sqlx::PgPool;
use tower::ServiceExt;
use waymark_api::auth::password::hash_password;
use waymark_api::auth::session::issue_session;
use waymark_core::tokens::generate_token;
use waymark_db::models::module::CreateModule;
use waymark_db::models::path::CreatePath;
use waymark_db::models::resource::{CreateResource, Resource};
use waymark_db::models::user::{CreateUser, User};
use waymark_db::repositories::{ModuleRepo, PathRepo, ProgressRepo, ResourceRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a verified user and an active session, returning the row and the
/// bearer token.
async fn auth_user(pool: &PgPool, email: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password("test_password_123!").expect("hashing should succeed"),
            name: None,
            verification_token: generate_token(),
            verification_token_expires_at: Utc::now() + Duration::hours(24),
        },
    )
    .await
    .expect("user creation should succeed");
    UserRepo::mark_email_verified(pool, user.id)
        .await
        .expect("verification should succeed");
    let (token, _session) = issue_session(pool, user.id, 30)
        .await
        .expect("session creation should succeed");
    (user, token)
}

/// Seed a published path with two modules of two resources each. Returns
/// the path id, the module ids, and the resources in path order.
async fn seed_path(pool: &PgPool, slug: &str) -> (i64, Vec<i64>, Vec<Resource>) {
    let path = PathRepo::create(
        pool,
        &CreatePath {
            slug: slug.to_string(),
            title: format!("Path {slug}"),
            description: Some("A seeded path".to_string()),
            is_published: true,
        },
    )
    .await
    .expect("path creation should succeed");

    let mut module_ids = Vec::new();
    let mut resources = Vec::new();
    for (order, module_title) in [(1, "Basics"), (2, "Advanced")] {
        let module = ModuleRepo::create(
            pool,
            &CreateModule {
                path_id: path.id,
                title: module_title.to_string(),
                description: None,
                order_index: order,
            },
        )
        .await
        .expect("module creation should succeed");
        module_ids.push(module.id);

        for n in 1..=2 {
            let resource = ResourceRepo::create(
                pool,
                &CreateResource {
                    module_id: module.id,
                    title: format!("{module_title} {n}"),
                    url: format!("https://example.com/{slug}/{order}/{n}"),
                    resource_type: "DOC".to_string(),
                    est_minutes: Some(10),
                    is_free: true,
                    source_domain: Some("example.com".to_string()),
                },
            )
            .await
            .expect("resource creation should succeed");
            resources.push(resource);
        }
    }
    (path.id, module_ids, resources)
}

// ---------------------------------------------------------------------------
// Toggle tests
// ---------------------------------------------------------------------------

/// Toggling progress requires a session.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_toggle_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "resource_id": 1 });
    let response = post_json(app, "/api/v1/progress", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A JSON client marking a resource done gets the acknowledgement and the
/// row lands in the database.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_toggle_marks_done(pool: PgPool) {
    let (user, token) = auth_user(&pool, "toggle@test.com").await;
    let (_path_id, _modules, resources) = seed_path(&pool, "toggle").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "resource_id": resources[0].id });
    let response = post_json_auth(app, "/api/v1/progress", body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["status"], "DONE");

    let rows = ProgressRepo::rows_for_user(&pool, user.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].resource_id, resources[0].id);
    assert_eq!(rows[0].status, "DONE");
}

/// `action: "undo"` reverts a done resource without deleting the row.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_toggle_undo_reverts(pool: PgPool) {
    let (user, token) = auth_user(&pool, "undo@test.com").await;
    let (_path_id, _modules, resources) = seed_path(&pool, "undo").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "resource_id": resources[0].id });
    let response = post_json_auth(app, "/api/v1/progress", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "resource_id": resources[0].id, "action": "undo" });
    let response = post_json_auth(app, "/api/v1/progress", body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "NOT_STARTED");

    let rows = ProgressRepo::rows_for_user(&pool, user.id).await.unwrap();
    assert_eq!(rows.len(), 1, "undo keeps the row");
    assert_eq!(rows[0].status, "NOT_STARTED");
}

/// A browser form post (no JSON accept) is redirected back to the referer.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_toggle_redirects_browser_to_referer(pool: PgPool) {
    let (_user, token) = auth_user(&pool, "redirect@test.com").await;
    let (_path_id, _modules, resources) = seed_path(&pool, "redirect").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "resource_id": resources[0].id });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/progress")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "text/html")
        .header(header::REFERER, "/p/redirect")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/p/redirect"
    );
}

/// An explicit `redirect_to` in the body wins over the referer.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_toggle_redirect_target_from_body(pool: PgPool) {
    let (_user, token) = auth_user(&pool, "target@test.com").await;
    let (_path_id, _modules, resources) = seed_path(&pool, "target").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "resource_id": resources[0].id,
        "redirect_to": "/p/target?marked=1"
    });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/progress")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "text/html")
        .header(header::REFERER, "/somewhere-else")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/p/target?marked=1"
    );
}

/// Toggling a resource that does not exist returns 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_toggle_unknown_resource(pool: PgPool) {
    let (_user, token) = auth_user(&pool, "missing@test.com").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "resource_id": 999_999 });
    let response = post_json_auth(app, "/api/v1/progress", body, &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Dashboard tests
// ---------------------------------------------------------------------------

/// The dashboard requires a session.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A fresh user sees an empty dashboard with the weekly goal at zero.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_empty_dashboard(pool: PgPool) {
    let (_user, token) = auth_user(&pool, "fresh@test.com").await;
    seed_path(&pool, "untouched").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["email"], "fresh@test.com");
    assert_eq!(json["data"]["recent_done"].as_array().unwrap().len(), 0);
    // Untouched paths are not listed.
    assert_eq!(json["data"]["paths"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["weekly_goal"]["target"], 1);
    assert_eq!(json["data"]["weekly_goal"]["completed"], 0);
    assert_eq!(json["data"]["weekly_goal"]["percent"], 0);
}

/// Completing one module and starting the next shows up as activity, path
/// progress, and a met weekly goal.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_dashboard_after_progress(pool: PgPool) {
    let (user, token) = auth_user(&pool, "active@test.com").await;
    let (path_id, module_ids, resources) = seed_path(&pool, "active").await;

    // Complete module 1 (resources 0 and 1) and start module 2.
    for resource in &resources[..3] {
        ProgressRepo::upsert_status(&pool, user.id, resource.id, "DONE")
            .await
            .expect("progress upsert should succeed");
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["data"]["recent_done"].as_array().unwrap().len(), 3);

    let paths = json["data"]["paths"].as_array().unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0]["id"], path_id);
    assert_eq!(paths[0]["progress"]["done"], 3);
    assert_eq!(paths[0]["progress"]["total"], 4);
    assert_eq!(paths[0]["progress"]["percent"], 75);
    // One 10-minute resource left.
    assert_eq!(paths[0]["progress"]["remaining_minutes"], 10);
    // The next stop is the one unfinished resource.
    assert_eq!(paths[0]["next_url"], resources[3].url.as_str());

    // Module 1 is fully done this week; module 2 is only half done.
    let goal = &json["data"]["weekly_goal"];
    assert_eq!(goal["target"], 1);
    assert_eq!(goal["completed"], 1);
    assert_eq!(goal["percent"], 100);
    let modules = goal["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0]["module_id"], module_ids[0]);
    assert_eq!(modules[0]["path_slug"], "active");
}

/// Undone resources drop back out of the dashboard counts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_undo_updates_counts(pool: PgPool) {
    let (user, token) = auth_user(&pool, "churn@test.com").await;
    let (_path_id, _modules, resources) = seed_path(&pool, "churn").await;

    ProgressRepo::upsert_status(&pool, user.id, resources[0].id, "DONE")
        .await
        .expect("progress upsert should succeed");
    ProgressRepo::upsert_status(&pool, user.id, resources[0].id, "NOT_STARTED")
        .await
        .expect("progress upsert should succeed");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["recent_done"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["paths"].as_array().unwrap().len(), 0);
}
