mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{TestApp, PASSWORD};
use recruitflow::entities::{user, Role};
use sea_orm::EntityTrait;
use serde_json::json;

#[tokio::test]
async fn test_register_defaults_to_candidate() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_json(
            "/auth/register",
            None,
            json!({"email": "ada@example.com", "password": PASSWORD, "phone": "555-0100"}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["role"], "candidate");
    assert_eq!(body["phone"], "555-0100");
    assert!(body["full_name"].is_null());
    assert!(body.get("hashed_password").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let app = TestApp::new().await;
    app.register("dup@example.com", "candidate", "First").await;

    let (status, body) = app
        .post_json(
            "/auth/register",
            None,
            json!({"email": "dup@example.com", "password": "another", "role": "recruiter"}),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn test_duplicate_email_wins_over_invalid_role() {
    let app = TestApp::new().await;
    app.register("dup@example.com", "candidate", "First").await;

    let (status, body) = app
        .post_json(
            "/auth/register",
            None,
            json!({"email": "dup@example.com", "password": PASSWORD, "role": "owner"}),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_registrations_create_one_user() {
    let app = TestApp::new().await;
    let payload = json!({"email": "race@example.com", "password": PASSWORD, "role": "candidate"});

    let (first, second) = tokio::join!(
        app.post_json("/auth/register", None, payload.clone()),
        app.post_json("/auth/register", None, payload.clone()),
    );

    let mut statuses = vec![first.0, second.0];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

    let users = user::Entity::find().all(&app.state.db).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_register_rejects_unknown_role_and_bad_email() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_json(
            "/auth/register",
            None,
            json!({"email": "x@example.com", "password": PASSWORD, "role": "superuser"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .post_json(
            "/auth/register",
            None,
            json!({"email": "not-an-email", "password": PASSWORD}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Neither attempt left a user behind.
    let (status, _) = app
        .post_json("/auth/login", None, json!({"email": "x@example.com", "password": PASSWORD}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_returns_bearer_token_with_role() {
    let app = TestApp::new().await;
    app.register("rec@example.com", "recruiter", "Riley Recruiter").await;

    let (status, body) = app
        .post_json("/auth/login", None, json!({"email": "rec@example.com", "password": PASSWORD}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["role"], "recruiter");
    assert_eq!(body["full_name"], "Riley Recruiter");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    app.register("known@example.com", "candidate", "Known").await;

    let (wrong_status, wrong_body) = app
        .post_json("/auth/login", None, json!({"email": "known@example.com", "password": "nope"}))
        .await;
    let (unknown_status, unknown_body) = app
        .post_json("/auth/login", None, json!({"email": "ghost@example.com", "password": "nope"}))
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_me_echoes_caller() {
    let app = TestApp::new().await;
    let token = app.candidate("me@example.com").await;

    let (status, body) = app.get("/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "me@example.com");
    assert_eq!(body["role"], "candidate");
}

#[tokio::test]
async fn test_missing_or_invalid_token_is_unauthorized() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .uri(app.api("/auth/me"))
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

    let (status, body) = app.get("/auth/me", Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTHENTICATION_ERROR");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new().await;
    let registered = app.register("late@example.com", "candidate", "Late").await;

    let expired = app
        .state
        .tokens
        .issue_with_ttl(
            common::id_of(&registered) as i32,
            Role::Candidate,
            chrono::Duration::seconds(-30),
        )
        .unwrap();

    let (status, _) = app.get("/auth/me", Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_user_is_rejected() {
    let app = TestApp::new().await;
    let registered = app.register("gone@example.com", "candidate", "Gone").await;
    let token = app.login("gone@example.com").await;

    user::Entity::delete_by_id(common::id_of(&registered) as i32)
        .exec(&app.state.db)
        .await
        .unwrap();

    let (status, _) = app.get("/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_roles_gate_each_surface() {
    let app = TestApp::new().await;
    let candidate = app.candidate("cand@example.com").await;
    let recruiter = app.recruiter("rec@example.com").await;

    let (status, body) = app.get("/recruiter/jobs", Some(&candidate)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "AUTHORIZATION_ERROR");

    let (status, _) = app.get("/candidate/applications", Some(&recruiter)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Authentication is checked before the role.
    let (status, _) = app.get("/candidate/applications", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = app.get("/recruiter/jobs", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("error").is_some());
    assert!(body.as_object().unwrap().len() == 2);
}

#[tokio::test]
async fn test_admin_uses_recruiter_surface() {
    let app = TestApp::new().await;
    app.register("admin@example.com", "admin", "Ari Admin").await;
    let admin = app.login("admin@example.com").await;

    let job = app.open_job(&admin, "Platform Lead").await;
    let (status, jobs) = app.get("/recruiter/jobs", Some(&admin)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(jobs.as_array().unwrap().len(), 1);
    assert_eq!(jobs[0]["id"], job["id"]);

    let (status, _) = app.get("/candidate/profile", Some(&admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_profile_update_changes_only_supplied_fields() {
    let app = TestApp::new().await;
    app.post_json(
        "/auth/register",
        None,
        json!({
            "email": "prof@example.com",
            "password": PASSWORD,
            "full_name": "Pat Profile",
            "phone": "555-0101",
            "location": "Lisbon",
        }),
    )
    .await;
    let token = app.login("prof@example.com").await;

    let (status, body) = app
        .patch_json(
            "/candidate/profile",
            Some(&token),
            json!({"bio": "Rustacean", "phone": null}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bio"], "Rustacean");
    assert!(body["phone"].is_null());
    assert_eq!(body["location"], "Lisbon");
    assert_eq!(body["full_name"], "Pat Profile");

    let (_, profile) = app.get("/candidate/profile", Some(&token)).await;
    assert_eq!(profile, body);
}
