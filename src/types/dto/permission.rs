use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::permission;

/// Permission as returned to clients
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PermissionView {
    /// Permission id
    pub id: i32,

    /// Unique capability string, e.g. "user:view"
    pub permission_name: String,

    /// Free-form description
    pub description: String,
}

impl From<permission::Model> for PermissionView {
    fn from(model: permission::Model) -> Self {
        Self {
            id: model.id,
            permission_name: model.permission_name,
            description: model.description,
        }
    }
}

/// Request model for creating or updating a permission
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PermissionRequest {
    /// Unique capability string
    pub permission_name: String,

    /// Free-form description
    #[oai(default)]
    pub description: String,
}
