//! End-to-end tests for contact CRUD, ownership scoping and search.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use rolodex_integration_tests::TestContext;

fn contact_ids(json: &Value) -> Vec<i64> {
    json["data"]["contacts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_create_and_get_contact() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("contact").await;

    let (status, created) = ctx
        .send(
            Method::POST,
            "/api/contacts",
            Some(&token),
            Some(json!({
                "first_name": "Ann",
                "last_name": "Lee",
                "email": "ann@example.com",
                "phone": "08123456789",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, fetched) = ctx
        .send(Method::GET, &format!("/api/contacts/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], created["data"]);
    assert_eq!(
        fetched["data"],
        json!({
            "id": id,
            "first_name": "Ann",
            "last_name": "Lee",
            "email": "ann@example.com",
            "phone": "08123456789",
        })
    );
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_create_contact_validation() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("badcontact").await;

    let (status, json) = ctx
        .send(
            Method::POST,
            "/api/contacts",
            Some(&token),
            Some(json!({
                "first_name": "Ann",
                "last_name": "Lee",
                "email": "not-an-email",
                "phone": "0812",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["data"], "email: must be a valid email address");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_contacts_are_owner_scoped() {
    let ctx = TestContext::new().await;
    let (_, owner) = ctx.register("owner").await;
    let (_, intruder) = ctx.register("intruder").await;
    let id = ctx.create_contact(&owner, "Private", "Person").await;
    let uri = format!("/api/contacts/{id}");

    let (status, json) = ctx.send(Method::GET, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["data"], "contact not found");

    let (status, _) = ctx
        .send(
            Method::PATCH,
            &uri,
            Some(&intruder),
            Some(json!({"first_name": "Hijacked"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.send(Method::DELETE, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = ctx.send(Method::GET, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["first_name"], "Private");

    let (_, listing) = ctx
        .send(Method::GET, "/api/contacts", Some(&intruder), None)
        .await;
    assert!(contact_ids(&listing).is_empty());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_partial_update() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("patch").await;
    let id = ctx.create_contact(&token, "Ann", "Lee").await;

    let (status, json) = ctx
        .send(
            Method::PATCH,
            &format!("/api/contacts/{id}"),
            Some(&token),
            Some(json!({"first_name": "", "last_name": "Park", "email": "ann.park@example.com"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["first_name"], "Ann");
    assert_eq!(json["data"]["last_name"], "Park");
    assert_eq!(json["data"]["email"], "ann.park@example.com");
    assert_eq!(json["data"]["phone"], "08123456789");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_delete_is_soft_and_final() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("delete").await;
    let id = ctx.create_contact(&token, "Gone", "Soon").await;
    let uri = format!("/api/contacts/{id}");

    let (status, json) = ctx.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], "Contact deleted successfully");

    let (status, _) = ctx.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listing) = ctx
        .send(Method::GET, "/api/contacts", Some(&token), None)
        .await;
    assert!(!contact_ids(&listing).contains(&id));

    let (deleted,): (bool,) =
        sqlx::query_as("SELECT deleted_at IS NOT NULL FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_one(ctx.pool())
            .await
            .unwrap();
    assert!(deleted);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_search_pagination() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("paging").await;
    let mut ids = Vec::new();
    for i in 0..15 {
        ids.push(ctx.create_contact(&token, &format!("Person{i}"), "Paged").await);
    }

    let (status, json) = ctx
        .send(Method::GET, "/api/contacts?page=2&size=10", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["data"]["paging"],
        json!({"page": 2, "size": 10, "total_page": 2, "total_item": 15})
    );
    assert_eq!(contact_ids(&json), ids.get(10..).unwrap().to_vec());

    let (status, json) = ctx
        .send(Method::GET, "/api/contacts?page=3&size=10", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(contact_ids(&json).is_empty());
    assert_eq!(json["data"]["paging"]["total_page"], 2);
    assert_eq!(json["data"]["paging"]["total_item"], 15);

    let (_, json) = ctx
        .send(Method::GET, "/api/contacts", Some(&token), None)
        .await;
    assert_eq!(json["data"]["paging"]["page"], 1);
    assert_eq!(json["data"]["paging"]["size"], 10);
    assert_eq!(contact_ids(&json).len(), 10);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_search_empty_result() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("empty").await;

    let (status, json) = ctx
        .send(Method::GET, "/api/contacts", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(contact_ids(&json).is_empty());
    assert_eq!(json["data"]["paging"]["total_page"], 0);
    assert_eq!(json["data"]["paging"]["total_item"], 0);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_search_filters() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("filter").await;
    let ann = ctx.create_contact(&token, "Annabel", "Smith").await;
    let joe = ctx.create_contact(&token, "Joe", "Hannigan").await;
    let _bob = ctx.create_contact(&token, "Bob", "Brown").await;

    // Case-insensitive match on first OR last name
    let (_, json) = ctx
        .send(Method::GET, "/api/contacts?name=ANN", Some(&token), None)
        .await;
    assert_eq!(contact_ids(&json), vec![ann, joe]);

    let (_, json) = ctx
        .send(Method::GET, "/api/contacts?email=JOE@", Some(&token), None)
        .await;
    assert_eq!(contact_ids(&json), vec![joe]);

    let (_, json) = ctx
        .send(Method::GET, "/api/contacts?phone=23456", Some(&token), None)
        .await;
    assert_eq!(contact_ids(&json).len(), 3);

    let (_, json) = ctx
        .send(Method::GET, "/api/contacts?name=ann&email=joe", Some(&token), None)
        .await;
    assert_eq!(contact_ids(&json), vec![joe]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_search_wildcards_match_literally() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("wild").await;
    let percent = ctx.create_contact(&token, "Percent", "100%").await;
    let _plain = ctx.create_contact(&token, "Plain", "Name").await;

    let (_, json) = ctx
        .send(Method::GET, "/api/contacts?name=%25", Some(&token), None)
        .await;
    assert_eq!(contact_ids(&json), vec![percent]);

    let (_, json) = ctx
        .send(Method::GET, "/api/contacts?name=_", Some(&token), None)
        .await;
    assert!(contact_ids(&json).is_empty());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_search_rejects_bad_paging() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("badpage").await;

    for query in ["page=0", "size=0", "size=101", "page=abc"] {
        let (status, json) = ctx
            .send(Method::GET, &format!("/api/contacts?{query}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {query}");
        assert_eq!(json["code"], 400);
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_non_numeric_id_is_bad_request() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register("badid").await;

    let (status, json) = ctx
        .send(Method::GET, "/api/contacts/abc", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "Bad Request");
}
