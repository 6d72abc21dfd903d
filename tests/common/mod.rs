// Common test utilities for integration tests

use std::time::Duration;

use gatehouse_backend::api::build_route;
use gatehouse_backend::stores::{PermissionStore, RoleStore, DEFAULT_ROLE_NAME};
use migration::{Migrator, MigratorTrait};
use poem::test::{TestClient, TestResponse};
use poem::Route;
use sea_orm::{Database, DatabaseConnection};

/// Creates a test database with migrations applied and the default role
/// seeded (registration depends on it).
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    RoleStore::new(db.clone())
        .create_role(DEFAULT_ROLE_NAME, "Default role")
        .await
        .expect("Failed to seed default role");

    db
}

/// Full application wired against the given database, wrapped in poem's
/// test client.
pub fn test_client(db: DatabaseConnection) -> TestClient<Route> {
    TestClient::new(build_route(db, Duration::from_secs(7200)))
}

/// Creates a role carrying the named permissions and assigns it to a user,
/// straight through the stores. Used to bootstrap an "admin" account for
/// flows whose endpoints are themselves permission-gated.
pub async fn grant_role(
    db: &DatabaseConnection,
    user_id: i32,
    role_name: &str,
    permission_names: &[&str],
) {
    let roles = RoleStore::new(db.clone());
    let permissions = PermissionStore::new(db.clone());

    let role = roles
        .create_role(role_name, "test role")
        .await
        .expect("Failed to create role");

    for name in permission_names {
        let permission = permissions
            .create_permission(name, "test permission")
            .await
            .expect("Failed to create permission");
        roles
            .link_role_permission(role.id, permission.id)
            .await
            .expect("Failed to link permission");
    }

    roles
        .link_user_role(user_id, role.id)
        .await
        .expect("Failed to assign role");
}

/// Extracts the response body as a serde_json value.
pub async fn body_json(resp: TestResponse) -> serde_json::Value {
    resp.json().await.value().deserialize()
}
