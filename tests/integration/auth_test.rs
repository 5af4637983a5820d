//! Integration tests for bearer-token authentication over HTTP.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn test_me_with_valid_token() {
    let app = helpers::TestApp::new().await;
    let alice = app.create_test_user("alice");
    let token = app.token_for(alice.id);

    let response = app.request("GET", "/api/users/me", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "success");
    assert_eq!(response.body["user"]["id"], alice.id.to_string());
    assert_eq!(response.body["user"]["email"], "alice@test.local");
}

#[tokio::test]
async fn test_me_without_token() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/users/me", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["status"], "error");
    assert_eq!(response.body["message"], "You are not logged in");
}

#[tokio::test]
async fn test_me_with_expired_token() {
    let app = helpers::TestApp::new().await;
    let alice = app.create_test_user("alice");
    let token = app.expired_token_for(alice.id);

    let response = app.request("GET", "/api/users/me", Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Token has expired");
}

#[tokio::test]
async fn test_me_with_tampered_token() {
    let app = helpers::TestApp::new().await;
    let alice = app.create_test_user("alice");
    let mut token = app.token_for(alice.id);
    token.push('x');

    let response = app.request("GET", "/api/users/me", Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["status"], "error");
}

#[tokio::test]
async fn test_me_for_removed_identity() {
    let app = helpers::TestApp::new().await;
    let alice = app.create_test_user("alice");
    let token = app.token_for(alice.id);
    app.store.remove(&alice.id);

    let response = app.request("GET", "/api/users/me", Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "User not found");
}

#[tokio::test]
async fn test_cached_identity_survives_store_removal() {
    let app = helpers::TestApp::new().await;
    let alice = app.create_test_user("alice");
    let token = app.token_for(alice.id);

    let first = app.request("GET", "/api/users/me", Some(&token)).await;
    assert_eq!(first.status, StatusCode::OK);

    app.store.remove(&alice.id);
    let second = app.request("GET", "/api/users/me", Some(&token)).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["user"]["username"], "alice");
}

#[tokio::test]
async fn test_health_is_public() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["connections"], 0);
    assert_eq!(response.body["database_alive"], true);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/nothing/here", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Route Not found");
}
