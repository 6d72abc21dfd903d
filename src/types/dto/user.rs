use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;
use crate::types::dto::role::RoleView;
use crate::types::internal::auth::LoadedUser;

/// User as returned to clients. The password hash is never serialized.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserView {
    /// User id
    pub id: i32,

    /// Unique username
    pub username: String,

    /// Contact email
    pub email: String,

    /// Creation time (Unix timestamp)
    pub created_at: i64,

    /// Roles held by the user; absent unless explicitly loaded
    pub roles: Option<Vec<RoleView>>,
}

impl From<user::Model> for UserView {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            created_at: model.created_at,
            roles: None,
        }
    }
}

impl From<LoadedUser> for UserView {
    fn from(loaded: LoadedUser) -> Self {
        let roles = loaded.roles.into_iter().map(RoleView::from).collect();
        Self {
            roles: Some(roles),
            ..Self::from(loaded.user)
        }
    }
}

/// Request model for updating a user's profile.
/// There is deliberately no password field; the stored hash is preserved.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// New username
    pub username: String,

    /// New email
    pub email: String,
}
