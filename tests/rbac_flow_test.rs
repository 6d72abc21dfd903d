mod common;

use common::{body_json, grant_role, setup_test_db, test_client};
use poem::test::TestClient;
use poem::Route;
use serde_json::json;

async fn register_and_login(
    cli: &TestClient<Route>,
    username: &str,
    password: &str,
) -> (i64, String) {
    let resp = cli
        .post("/api/auth/register")
        .body_json(&json!({
            "username": username,
            "password": password,
            "email": format!("{username}@example.com")
        }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    let user_id = body["data"]["id"].as_i64().expect("user id");

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({ "username": username, "password": password }))
        .send()
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    let session_id = body["data"].as_str().expect("session id").to_string();

    (user_id, session_id)
}

#[tokio::test]
async fn gated_endpoint_denies_without_permission() {
    let db = setup_test_db().await;
    let cli = test_client(db);

    let (_, session) = register_and_login(&cli, "alice", "hunter2!").await;

    // Freshly registered users only carry the default role, which grants nothing.
    let resp = cli.get("/api/users").header("X-Session-Id", &session).send().await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Permission denied"));

    // No session at all reads as unauthenticated, not as denied.
    let resp = cli.get("/api/users").send().await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["message"], json!("Not logged in"));
}

#[tokio::test]
async fn granting_a_role_takes_effect_without_re_login() {
    let db = setup_test_db().await;
    let cli = test_client(db.clone());

    let (admin_id, _) = register_and_login(&cli, "admin", "s3cret-admin").await;
    grant_role(
        &db,
        admin_id as i32,
        "Administrator",
        &[
            "permission:create",
            "role:create",
            "role:assign_permission",
            "user:assign_role",
        ],
    )
    .await;
    // Roles loaded fresh on every request, so the grant applies to the
    // session created before it.
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({ "username": "admin", "password": "s3cret-admin" }))
        .send()
        .await;
    let admin_session = body_json(resp).await["data"]
        .as_str()
        .expect("session id")
        .to_string();

    let (alice_id, alice_session) = register_and_login(&cli, "alice", "hunter2!").await;

    // Alice cannot list roles yet.
    let resp = cli
        .get("/api/roles")
        .header("X-Session-Id", &alice_session)
        .send()
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["message"], json!("Permission denied"));

    // Admin builds an Auditor role carrying role:view and hands it to alice.
    let resp = cli
        .post("/api/permissions")
        .header("X-Session-Id", &admin_session)
        .body_json(&json!({
            "permission_name": "role:view",
            "description": "List and inspect roles"
        }))
        .send()
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["message"], json!("Permission created"));
    let permission_id = body["data"]["id"].as_i64().expect("permission id");

    let resp = cli
        .post("/api/roles")
        .header("X-Session-Id", &admin_session)
        .body_json(&json!({ "role_name": "Auditor", "description": "Read-only access" }))
        .send()
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["message"], json!("Role created"));
    let role_id = body["data"]["id"].as_i64().expect("role id");

    let resp = cli
        .post(format!("/api/roles/{role_id}/permissions/{permission_id}"))
        .header("X-Session-Id", &admin_session)
        .send()
        .await;
    assert_eq!(body_json(resp).await["message"], json!("Permission added"));

    let resp = cli
        .post(format!("/api/users/{alice_id}/roles/{role_id}"))
        .header("X-Session-Id", &admin_session)
        .send()
        .await;
    assert_eq!(body_json(resp).await["message"], json!("Role assigned"));

    // Same alice session, now allowed.
    let resp = cli
        .get("/api/roles")
        .header("X-Session-Id", &alice_session)
        .send()
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert!(body["data"].as_array().expect("roles array").len() >= 2);

    // Re-assigning the same role is an idempotent success.
    let resp = cli
        .post(format!("/api/users/{alice_id}/roles/{role_id}"))
        .header("X-Session-Id", &admin_session)
        .send()
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Role assigned"));
}

#[tokio::test]
async fn deleting_a_role_revokes_access() {
    let db = setup_test_db().await;
    let cli = test_client(db.clone());

    let (admin_id, _) = register_and_login(&cli, "admin", "s3cret-admin").await;
    grant_role(&db, admin_id as i32, "Administrator", &["role:delete"]).await;
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({ "username": "admin", "password": "s3cret-admin" }))
        .send()
        .await;
    let admin_session = body_json(resp).await["data"]
        .as_str()
        .expect("session id")
        .to_string();

    let (alice_id, alice_session) = register_and_login(&cli, "alice", "hunter2!").await;
    grant_role(&db, alice_id as i32, "Auditor", &["user:view"]).await;

    let resp = cli
        .get("/api/users")
        .header("X-Session-Id", &alice_session)
        .send()
        .await;
    assert_eq!(body_json(resp).await["success"], json!(true));

    // Deleting the role cascades the user link; alice loses access mid-session.
    let auditor_id = gatehouse_backend::stores::RoleStore::new(db.clone())
        .find_role_by_name("Auditor")
        .await
        .expect("role lookup")
        .expect("Auditor exists")
        .id;
    let resp = cli
        .delete(format!("/api/roles/{auditor_id}"))
        .header("X-Session-Id", &admin_session)
        .send()
        .await;
    assert_eq!(body_json(resp).await["message"], json!("Role deleted"));

    let resp = cli
        .get("/api/users")
        .header("X-Session-Id", &alice_session)
        .send()
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Permission denied"));
}
