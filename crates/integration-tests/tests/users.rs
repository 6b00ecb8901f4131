//! End-to-end tests for registration, login, tokens and profile updates.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::json;

use rolodex_api::models::UpdateUser;
use rolodex_api::services::UserService;
use rolodex_integration_tests::{TestContext, unique_username};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_register_issues_token() {
    let ctx = TestContext::new().await;
    let username = unique_username("reg");
    let before = chrono::Utc::now().timestamp_millis();

    let (status, json) = ctx
        .send(
            Method::POST,
            "/api/users/register",
            None,
            Some(json!({"username": username, "password": "password123", "name": "Reg User"})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["code"], 201);
    assert_eq!(json["status"], "Created");

    let token = json["data"]["token"].as_str().unwrap();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

    let token_exp = json["data"]["token_exp"].as_i64().unwrap();
    assert!(token_exp >= before + 30 * MILLIS_PER_DAY);
    assert!(token_exp <= chrono::Utc::now().timestamp_millis() + 30 * MILLIS_PER_DAY);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_password_is_stored_hashed() {
    let ctx = TestContext::new().await;
    let (username, _) = ctx.register("hash").await;

    let (stored,): (String,) = sqlx::query_as("SELECT password FROM users WHERE username = $1")
        .bind(&username)
        .fetch_one(ctx.pool())
        .await
        .unwrap();

    assert_ne!(stored, "password123");
    assert!(stored.starts_with("$argon2id$"));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_register_duplicate_username() {
    let ctx = TestContext::new().await;
    let (username, _) = ctx.register("dup").await;

    let (status, json) = ctx
        .send(
            Method::POST,
            "/api/users/register",
            None,
            Some(json!({"username": username, "password": "other-pass", "name": "Other"})),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["data"], "username already exists");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_login_replaces_token() {
    let ctx = TestContext::new().await;
    let (username, old_token) = ctx.register("login").await;

    let (status, json) = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({"username": username, "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let new_token = json["data"]["token"].as_str().unwrap().to_owned();
    assert_ne!(new_token, old_token);

    let (status, json) = ctx
        .send(Method::GET, "/api/users/current", Some(&old_token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["data"], "invalid token");

    let (status, json) = ctx
        .send(Method::GET, "/api/users/current", Some(&new_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["username"], username.as_str());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new().await;
    let (username, _) = ctx.register("badlogin").await;

    let (wrong_password_status, wrong_password) = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({"username": username, "password": "not-the-password"})),
        )
        .await;
    let (unknown_user_status, unknown_user) = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({"username": unique_username("ghost"), "password": "password123"})),
        )
        .await;

    assert_eq!(wrong_password_status, StatusCode::NOT_FOUND);
    assert_eq!(unknown_user_status, StatusCode::NOT_FOUND);
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password["data"], "username or password is wrong");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_get_current_user() {
    let ctx = TestContext::new().await;
    let (username, token) = ctx.register("current").await;

    let (status, json) = ctx
        .send(Method::GET, "/api/users/current", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["data"],
        json!({"username": username, "name": "Test User"})
    );
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_raw_token_without_bearer_prefix() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("raw").await;

    let request = Request::get("/api/users/current")
        .header(header::AUTHORIZATION, token)
        .body(Body::empty())
        .unwrap();
    let (status, _) = ctx.send_request(request).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_expired_token_rejected() {
    let ctx = TestContext::new().await;
    let (username, token) = ctx.register("expired").await;
    ctx.expire_token(&username).await;

    let (status, json) = ctx
        .send(Method::GET, "/api/users/current", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["data"], "token expired");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_logout_invalidates_token() {
    let ctx = TestContext::new().await;
    let (username, token) = ctx.register("logout").await;

    let (status, json) = ctx
        .send(Method::DELETE, "/api/users/current", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], "Logout successful");

    let (status, _) = ctx
        .send(Method::GET, "/api/users/current", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (token_exp,): (i64,) = sqlx::query_as("SELECT token_exp FROM users WHERE username = $1")
        .bind(&username)
        .fetch_one(ctx.pool())
        .await
        .unwrap();
    assert_eq!(token_exp, 0);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_token_whitespace_is_not_trimmed() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("spaces").await;

    let (status, json) = ctx
        .send(Method::GET, "/api/users/current", Some(&format!("{token} ")), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["data"], "invalid token");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_profile_update_does_not_restore_replaced_token() {
    let ctx = TestContext::new().await;
    let (username, first_token) = ctx.register("interleave").await;
    let users = UserService::new(ctx.pool(), 30);

    let bearer = format!("Bearer {first_token}");
    let snapshot = users.authenticate(Some(&bearer)).await.unwrap();

    let (status, json) = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({"username": username, "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let second_token = json["data"]["token"].as_str().unwrap().to_owned();

    let update = UpdateUser {
        name: Some("Renamed".to_owned()),
        password: None,
    };
    let profile = users.update(snapshot, update).await.unwrap();
    assert_eq!(profile.name, "Renamed");

    let (status, _) = ctx
        .send(Method::GET, "/api/users/current", Some(&first_token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = ctx
        .send(Method::GET, "/api/users/current", Some(&second_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Renamed");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_stale_logout_keeps_newer_token() {
    let ctx = TestContext::new().await;
    let (username, first_token) = ctx.register("stalelogout").await;
    let users = UserService::new(ctx.pool(), 30);

    let snapshot = users.authenticate(Some(&first_token)).await.unwrap();

    let (_, json) = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({"username": username, "password": "password123"})),
        )
        .await;
    let second_token = json["data"]["token"].as_str().unwrap().to_owned();

    users.logout(snapshot).await.unwrap();

    let (status, _) = ctx
        .send(Method::GET, "/api/users/current", Some(&second_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_update_name_keeps_password() {
    let ctx = TestContext::new().await;
    let (username, token) = ctx.register("rename").await;

    let (status, json) = ctx
        .send(
            Method::PATCH,
            "/api/users/current",
            Some(&token),
            Some(json!({"name": "Renamed User", "password": ""})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Renamed User");

    let (status, _) = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({"username": username, "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_update_password() {
    let ctx = TestContext::new().await;
    let (username, token) = ctx.register("repass").await;

    let (status, json) = ctx
        .send(
            Method::PATCH,
            "/api/users/current",
            Some(&token),
            Some(json!({"password": "brand-new-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Test User");

    let (status, _) = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({"username": username, "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({"username": username, "password": "brand-new-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_update_rejects_short_name() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("shortname").await;

    let (status, json) = ctx
        .send(
            Method::PATCH,
            "/api/users/current",
            Some(&token),
            Some(json!({"name": "Al"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["data"], "name: must be between 3 and 100 characters");
}
