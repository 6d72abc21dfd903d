use crate::types::db::{permission, role, user};

/// A role together with its attached permissions.
#[derive(Debug, Clone)]
pub struct LoadedRole {
    pub role: role::Model,
    pub permissions: Vec<permission::Model>,
}

/// A user snapshot with roles (and each role's permissions) fully loaded.
///
/// Roles are never eagerly embedded in the persisted user row; this type is
/// assembled on demand by the identity service, and it is the only shape the
/// authorization evaluator accepts.
#[derive(Debug, Clone)]
pub struct LoadedUser {
    pub user: user::Model,
    pub roles: Vec<LoadedRole>,
}
