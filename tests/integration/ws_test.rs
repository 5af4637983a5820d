//! Integration tests for the WebSocket hub over a real socket.

mod helpers;

use std::time::Duration;

use helpers::{expect_closed, next_event, next_json, send_pong, send_text};

#[tokio::test]
async fn test_ws_missing_token_is_rejected() {
    let app = helpers::TestApp::new().await;
    let mut ws = app.connect(None).await;

    let msg = next_json(&mut ws).await.expect("Expected a rejection");
    assert_eq!(msg["type"], "connection");
    assert_eq!(msg["authorized"], false);
    assert_eq!(msg["payload"], "Missing token");
    assert!(msg["user"].is_null());

    expect_closed(&mut ws).await;
    assert_eq!(app.engine.connection_count(), 0);
}

#[tokio::test]
async fn test_ws_invalid_token_is_rejected() {
    let app = helpers::TestApp::new().await;
    let mut ws = app.connect(Some("not-a-jwt")).await;

    let msg = next_json(&mut ws).await.expect("Expected a rejection");
    assert_eq!(msg["type"], "connection");
    assert_eq!(msg["authorized"], false);
    assert!(msg["payload"].as_str().is_some_and(|s| !s.is_empty()));

    expect_closed(&mut ws).await;
    assert_eq!(app.engine.connection_count(), 0);
}

#[tokio::test]
async fn test_ws_expired_token_is_rejected() {
    let app = helpers::TestApp::new().await;
    let user = app.create_test_user("late");
    let token = app.expired_token_for(user.id);
    let mut ws = app.connect(Some(&token)).await;

    let msg = next_json(&mut ws).await.expect("Expected a rejection");
    assert_eq!(msg["authorized"], false);
    assert_eq!(msg["payload"], "Token has expired");
    expect_closed(&mut ws).await;
}

#[tokio::test]
async fn test_ws_unknown_identity_is_rejected() {
    let app = helpers::TestApp::new().await;
    let token = app.token_for(uuid::Uuid::new_v4());
    let mut ws = app.connect(Some(&token)).await;

    let msg = next_json(&mut ws).await.expect("Expected a rejection");
    assert_eq!(msg["authorized"], false);
    assert_eq!(msg["payload"], "User not found");
    expect_closed(&mut ws).await;
}

#[tokio::test]
async fn test_ws_welcome_then_join_notice() {
    let app = helpers::TestApp::new().await;
    let alice = app.create_test_user("alice");
    let token = app.token_for(alice.id);
    let mut ws = app.connect(Some(&token)).await;

    let welcome = next_event(&mut ws).await.expect("Expected a welcome");
    assert_eq!(welcome["type"], "connection");
    assert_eq!(welcome["payload"], "Welcome to The WebSocket!");
    assert_eq!(welcome["authorized"], true);
    assert_eq!(welcome["user"]["username"], "alice");

    let joined = next_event(&mut ws).await.expect("Expected a join notice");
    assert_eq!(joined["type"], "connection");
    assert_eq!(joined["payload"], "A new user has connected!");
    assert_eq!(joined["user"]["id"], alice.id.to_string());

    assert_eq!(app.engine.connection_count(), 1);
    assert_eq!(app.engine.user_count(), 1);
}

#[tokio::test]
async fn test_ws_header_credential_is_accepted() {
    let app = helpers::TestApp::new().await;
    let alice = app.create_test_user("alice");
    let token = app.token_for(alice.id);
    let mut ws = app.connect_with_header(&token).await;

    let welcome = next_event(&mut ws).await.expect("Expected a welcome");
    assert_eq!(welcome["authorized"], true);
    assert_eq!(welcome["user"]["username"], "alice");
}

#[tokio::test]
async fn test_ws_existing_peers_see_join_notice() {
    let app = helpers::TestApp::new().await;
    let alice = app.create_test_user("alice");
    let bob = app.create_test_user("bob");

    let mut alice_ws = app.connect(Some(&app.token_for(alice.id))).await;
    next_event(&mut alice_ws).await.expect("welcome");
    next_event(&mut alice_ws).await.expect("own join notice");

    let mut bob_ws = app.connect(Some(&app.token_for(bob.id))).await;
    next_event(&mut bob_ws).await.expect("welcome");

    let notice = next_event(&mut alice_ws).await.expect("Expected bob's notice");
    assert_eq!(notice["payload"], "A new user has connected!");
    assert_eq!(notice["user"]["username"], "bob");
}

#[tokio::test]
async fn test_ws_same_identity_on_two_devices() {
    let app = helpers::TestApp::new().await;
    let alice = app.create_test_user("alice");
    let token = app.token_for(alice.id);

    let mut phone = app.connect(Some(&token)).await;
    next_event(&mut phone).await.expect("welcome");
    let mut laptop = app.connect(Some(&token)).await;
    next_event(&mut laptop).await.expect("welcome");

    assert!(helpers::eventually(|| app.engine.connection_count() == 2).await);
    assert_eq!(app.engine.user_count(), 1);

    phone.close(None).await.expect("close");
    assert!(helpers::eventually(|| app.engine.connection_count() == 1).await);
    assert_eq!(app.engine.user_count(), 1);

    laptop.close(None).await.expect("close");
    assert!(helpers::eventually(|| app.engine.user_count() == 0).await);
}

#[tokio::test]
async fn test_ws_malformed_message_keeps_connection_open() {
    let app = helpers::TestApp::new().await;
    let alice = app.create_test_user("alice");
    let bob = app.create_test_user("bob");

    let mut alice_ws = app.connect(Some(&app.token_for(alice.id))).await;
    next_event(&mut alice_ws).await.expect("welcome");
    next_event(&mut alice_ws).await.expect("own join notice");

    send_text(&mut alice_ws, "{not json").await;
    send_text(&mut alice_ws, r#"{"type":"shout","payload":"hi"}"#).await;

    let mut bob_ws = app.connect(Some(&app.token_for(bob.id))).await;
    next_event(&mut bob_ws).await.expect("welcome");

    let notice = next_event(&mut alice_ws)
        .await
        .expect("Connection should still be open");
    assert_eq!(notice["user"]["username"], "bob");
    assert_eq!(app.engine.connection_count(), 2);
}

#[tokio::test]
async fn test_ws_silent_connection_is_evicted() {
    let app = helpers::TestApp::with_heartbeat(
        Duration::from_millis(100),
        Duration::from_millis(300),
    )
    .await;
    let alice = app.create_test_user("alice");
    let mut ws = app.connect(Some(&app.token_for(alice.id))).await;

    let mut pings = 0;
    while let Some(msg) = next_json(&mut ws).await {
        if msg["type"] == "ping" {
            assert_eq!(msg["authorized"], true);
            assert!(msg["payload"].as_str().is_some());
            pings += 1;
        }
    }

    assert!(pings >= 1);
    assert!(helpers::eventually(|| app.engine.connection_count() == 0).await);
}

#[tokio::test]
async fn test_ws_pong_keeps_connection_alive() {
    let app = helpers::TestApp::with_heartbeat(
        Duration::from_millis(100),
        Duration::from_millis(300),
    )
    .await;
    let alice = app.create_test_user("alice");
    let mut ws = app.connect(Some(&app.token_for(alice.id))).await;

    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    let mut pongs = 0;
    while tokio::time::Instant::now() < deadline {
        let msg = next_json(&mut ws).await.expect("Connection was evicted");
        if msg["type"] == "ping" {
            let conn_id = msg["payload"].as_str().expect("ping payload").to_string();
            send_pong(&mut ws, &conn_id).await;
            pongs += 1;
        }
    }

    assert!(pongs >= 3);
    assert_eq!(app.engine.connection_count(), 1);
}

#[tokio::test]
async fn test_ws_engine_shutdown_closes_clients() {
    let app = helpers::TestApp::new().await;
    let alice = app.create_test_user("alice");
    let mut ws = app.connect(Some(&app.token_for(alice.id))).await;
    next_event(&mut ws).await.expect("welcome");

    app.engine.shutdown();

    expect_closed(&mut ws).await;
    assert_eq!(app.engine.connection_count(), 0);
}
