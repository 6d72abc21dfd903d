use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::role;
use crate::types::dto::permission::PermissionView;
use crate::types::internal::auth::LoadedRole;

/// Role as returned to clients
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RoleView {
    /// Role id
    pub id: i32,

    /// Unique role name, e.g. "RegularUser"
    pub role_name: String,

    /// Free-form description
    pub description: String,

    /// Permissions attached to the role; absent unless explicitly loaded
    pub permissions: Option<Vec<PermissionView>>,
}

impl From<role::Model> for RoleView {
    fn from(model: role::Model) -> Self {
        Self {
            id: model.id,
            role_name: model.role_name,
            description: model.description,
            permissions: None,
        }
    }
}

impl From<LoadedRole> for RoleView {
    fn from(loaded: LoadedRole) -> Self {
        let permissions = loaded
            .permissions
            .into_iter()
            .map(PermissionView::from)
            .collect();
        Self {
            permissions: Some(permissions),
            ..Self::from(loaded.role)
        }
    }
}

/// Request model for creating or updating a role
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RoleRequest {
    /// Unique role name
    pub role_name: String,

    /// Free-form description
    #[oai(default)]
    pub description: String,
}
