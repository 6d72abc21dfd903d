// API layer - HTTP endpoints
pub mod auth;
pub mod health;
pub mod permissions;
pub mod roles;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use poem::Route;
use poem_openapi::OpenApiService;
use sea_orm::DatabaseConnection;

pub use auth::AuthApi;
pub use health::HealthApi;
pub use permissions::PermissionApi;
pub use roles::RoleApi;
pub use users::UserApi;

use crate::gate::RequestGate;
use crate::services::{IdentityService, SessionStore};
use crate::stores::{CredentialStore, PermissionStore, RoleStore};

/// Wire up stores, services, the request gate, and the HTTP routes.
///
/// The API is served under `/api` and the generated Swagger UI under
/// `/swagger`. Shared by `main` and the integration tests.
pub fn build_route(db: DatabaseConnection, session_idle_timeout: Duration) -> Route {
    let credentials = Arc::new(CredentialStore::new(db.clone()));
    let roles = Arc::new(RoleStore::new(db.clone()));
    let permissions = Arc::new(PermissionStore::new(db.clone()));
    let sessions = Arc::new(SessionStore::new(session_idle_timeout));
    let identity = Arc::new(IdentityService::new(
        Arc::clone(&credentials),
        Arc::clone(&roles),
    ));
    let gate = Arc::new(RequestGate::new(
        Arc::clone(&sessions),
        Arc::clone(&identity),
    ));

    let api_service = OpenApiService::new(
        (
            AuthApi::new(
                Arc::clone(&credentials),
                Arc::clone(&identity),
                Arc::clone(&sessions),
            ),
            UserApi::new(
                Arc::clone(&credentials),
                Arc::clone(&identity),
                Arc::clone(&roles),
                Arc::clone(&gate),
            ),
            RoleApi::new(Arc::clone(&roles), Arc::clone(&gate)),
            PermissionApi::new(Arc::clone(&permissions), Arc::clone(&gate)),
            HealthApi::new(db),
        ),
        "RBAC Administration API",
        "1.0.0",
    )
    .server("/api");

    let ui = api_service.swagger_ui();

    Route::new().nest("/api", api_service).nest("/swagger", ui)
}
