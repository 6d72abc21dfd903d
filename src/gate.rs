use std::sync::Arc;

use crate::errors::RbacError;
use crate::services::{has_permission, IdentityService, SessionStore};

/// Declarative map from operation id to the permission it requires.
///
/// This table is the single source of truth for gating: endpoints name
/// their operation and the gate looks the requirement up here. Operations
/// not listed (register, login, logout, current-user, health) are open.
pub const GATED_OPERATIONS: &[(&str, &str)] = &[
    ("users.list", "user:view"),
    ("users.get", "user:view"),
    ("users.update", "user:edit"),
    ("users.delete", "user:delete"),
    ("users.assign_role", "user:assign_role"),
    ("users.remove_role", "user:remove_role"),
    ("roles.list", "role:view"),
    ("roles.get", "role:view"),
    ("roles.create", "role:create"),
    ("roles.update", "role:edit"),
    ("roles.delete", "role:delete"),
    ("roles.add_permission", "role:assign_permission"),
    ("roles.remove_permission", "role:remove_permission"),
    ("permissions.list", "permission:view"),
    ("permissions.get", "permission:view"),
    ("permissions.create", "permission:create"),
    ("permissions.update", "permission:edit"),
    ("permissions.delete", "permission:delete"),
];

/// Permission required by an operation, if it is gated at all.
pub fn required_permission(operation: &str) -> Option<&'static str> {
    GATED_OPERATIONS
        .iter()
        .find(|(op, _)| *op == operation)
        .map(|(_, permission)| *permission)
}

/// Pre-condition check run before every gated endpoint body.
///
/// The gate never mutates store state, so a denial leaves no partial side
/// effects. Only the user id is trusted from the session; roles and
/// permissions are re-fetched live on every call.
pub struct RequestGate {
    sessions: Arc<SessionStore>,
    identity: Arc<IdentityService>,
}

impl RequestGate {
    pub fn new(sessions: Arc<SessionStore>, identity: Arc<IdentityService>) -> Self {
        Self { sessions, identity }
    }

    /// Allow or deny `operation` for the given session token.
    ///
    /// Ungated operations pass unconditionally. Otherwise: missing, unknown,
    /// or expired tokens (and tokens whose user row has since been deleted)
    /// deny with `NotAuthenticated`; an authenticated user whose loaded
    /// roles lack the required permission denies with `PermissionDenied`.
    pub async fn authorize(
        &self,
        operation: &str,
        session_id: Option<&str>,
    ) -> Result<(), RbacError> {
        let Some(required) = required_permission(operation) else {
            return Ok(());
        };

        let session_id = session_id.ok_or(RbacError::NotAuthenticated)?;
        let user_id = self
            .sessions
            .resolve(session_id)
            .ok_or(RbacError::NotAuthenticated)?;

        let user = self
            .identity
            .user_with_roles(user_id)
            .await?
            .ok_or(RbacError::NotAuthenticated)?;

        if has_permission(&user, required) {
            Ok(())
        } else {
            Err(RbacError::PermissionDenied)
        }
    }
}
