mod common;

use common::{body_json, setup_test_db, test_client};
use serde_json::json;

#[tokio::test]
async fn register_login_current_user_logout_lifecycle() {
    let db = setup_test_db().await;
    let cli = test_client(db);

    // Register
    let resp = cli
        .post("/api/auth/register")
        .body_json(&json!({
            "username": "alice",
            "password": "hunter2!",
            "email": "alice@example.com"
        }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Registration successful"));
    assert_eq!(body["data"]["username"], json!("alice"));
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());

    // Login
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({ "username": "alice", "password": "hunter2!" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Login successful"));
    let session_id = body["data"].as_str().expect("session id").to_string();
    assert!(!session_id.is_empty());

    // Current user carries the default role
    let resp = cli
        .get("/api/auth/current-user")
        .header("X-Session-Id", &session_id)
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["username"], json!("alice"));
    let roles = body["data"]["roles"].as_array().expect("roles array");
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0]["role_name"], json!("RegularUser"));

    // Logout invalidates the session
    let resp = cli
        .get("/api/auth/logout")
        .header("X-Session-Id", &session_id)
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Logout successful"));

    let resp = cli
        .get("/api/auth/current-user")
        .header("X-Session-Id", &session_id)
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Not logged in"));
}

#[tokio::test]
async fn duplicate_registration_is_rejected_with_http_200() {
    let db = setup_test_db().await;
    let cli = test_client(db);

    let payload = json!({
        "username": "bob",
        "password": "password1",
        "email": "bob@example.com"
    });

    let resp = cli
        .post("/api/auth/register")
        .body_json(&payload)
        .send()
        .await;
    resp.assert_status_is_ok();
    assert_eq!(body_json(resp).await["success"], json!(true));

    let resp = cli
        .post("/api/auth/register")
        .body_json(&payload)
        .send()
        .await;
    // Failures still travel in the envelope, never as an HTTP error.
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Username already exists"));
    assert_eq!(body["data"], json!(null));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let db = setup_test_db().await;
    let cli = test_client(db);

    cli.post("/api/auth/register")
        .body_json(&json!({
            "username": "carol",
            "password": "correct-horse",
            "email": "carol@example.com"
        }))
        .send()
        .await
        .assert_status_is_ok();

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({ "username": "carol", "password": "wrong" }))
        .send()
        .await;
    let wrong_password = body_json(resp).await;

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({ "username": "nobody", "password": "wrong" }))
        .send()
        .await;
    let unknown_user = body_json(resp).await;

    assert_eq!(wrong_password["success"], json!(false));
    assert_eq!(unknown_user["success"], json!(false));
    assert_eq!(wrong_password["message"], unknown_user["message"]);
    assert_eq!(wrong_password["message"], json!("Invalid username or password"));
}

#[tokio::test]
async fn current_user_without_session_header() {
    let db = setup_test_db().await;
    let cli = test_client(db);

    let resp = cli.get("/api/auth/current-user").send().await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Not logged in"));
}
