use std::sync::Arc;

use crate::errors::RbacError;
use crate::stores::{CredentialStore, RoleStore};
use crate::types::internal::auth::{LoadedRole, LoadedUser};

/// Assembles the fully role-loaded user snapshot the authorization
/// evaluator requires.
///
/// The session only stores a user id; every gated request re-fetches the
/// live user here, so permission changes take effect without re-login.
pub struct IdentityService {
    credentials: Arc<CredentialStore>,
    roles: Arc<RoleStore>,
}

impl IdentityService {
    pub fn new(credentials: Arc<CredentialStore>, roles: Arc<RoleStore>) -> Self {
        Self { credentials, roles }
    }

    /// Load a user with their roles and each role's permissions.
    /// Returns None when the user row no longer exists.
    pub async fn user_with_roles(&self, user_id: i32) -> Result<Option<LoadedUser>, RbacError> {
        let Some(user) = self.credentials.find_user(user_id).await? else {
            return Ok(None);
        };

        let mut roles = Vec::new();
        for role in self.roles.roles_for_user(user_id).await? {
            let permissions = self.roles.permissions_for_role(role.id).await?;
            roles.push(LoadedRole { role, permissions });
        }

        Ok(Some(LoadedUser { user, roles }))
    }
}
