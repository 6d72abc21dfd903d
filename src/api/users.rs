use poem_openapi::param::{Header, Path};
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};
use std::sync::Arc;

use crate::errors::RbacError;
use crate::gate::RequestGate;
use crate::services::IdentityService;
use crate::stores::{CredentialStore, RoleStore};
use crate::types::dto::common::{respond, respond_empty, ApiEnvelope, VoidEnvelope};
use crate::types::dto::user::{UpdateUserRequest, UserView};

/// User administration API endpoints
pub struct UserApi {
    credentials: Arc<CredentialStore>,
    identity: Arc<IdentityService>,
    roles: Arc<RoleStore>,
    gate: Arc<RequestGate>,
}

impl UserApi {
    pub fn new(
        credentials: Arc<CredentialStore>,
        identity: Arc<IdentityService>,
        roles: Arc<RoleStore>,
        gate: Arc<RequestGate>,
    ) -> Self {
        Self {
            credentials,
            identity,
            roles,
            gate,
        }
    }
}

/// API tags for user administration endpoints
#[derive(Tags)]
enum UserTags {
    /// User administration endpoints
    Users,
}

#[OpenApi(prefix_path = "/users")]
impl UserApi {
    /// List all users (requires user:view)
    #[oai(path = "/", method = "get", tag = "UserTags::Users")]
    async fn list_users(
        &self,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<ApiEnvelope<Vec<UserView>>> {
        if let Err(err) = self
            .gate
            .authorize("users.list", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        let result = self
            .credentials
            .list_users()
            .await
            .map(|users| users.into_iter().map(UserView::from).collect());
        respond("ok", result)
    }

    /// Get one user with roles loaded (requires user:view)
    #[oai(path = "/:id", method = "get", tag = "UserTags::Users")]
    async fn get_user(
        &self,
        id: Path<i32>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<ApiEnvelope<UserView>> {
        if let Err(err) = self
            .gate
            .authorize("users.get", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        match self.identity.user_with_roles(id.0).await {
            Ok(Some(user)) => ApiEnvelope::ok(UserView::from(user)),
            Ok(None) => ApiEnvelope::error(RbacError::UserNotFound.to_string()),
            Err(err) => ApiEnvelope::error(err.to_string()),
        }
    }

    /// Update a user's username/email; the password is never touched
    /// (requires user:edit)
    #[oai(path = "/:id", method = "put", tag = "UserTags::Users")]
    async fn update_user(
        &self,
        id: Path<i32>,
        body: Json<UpdateUserRequest>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<ApiEnvelope<UserView>> {
        if let Err(err) = self
            .gate
            .authorize("users.update", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        let result = self
            .credentials
            .update_profile(id.0, &body.username, &body.email)
            .await
            .map(UserView::from);
        respond("User updated", result)
    }

    /// Delete a user; role associations cascade away (requires user:delete)
    #[oai(path = "/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete_user(
        &self,
        id: Path<i32>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<VoidEnvelope> {
        if let Err(err) = self
            .gate
            .authorize("users.delete", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        respond_empty("User deleted", self.credentials.delete_user(id.0).await)
    }

    /// Assign a role to a user; already-held roles are a no-op
    /// (requires user:assign_role)
    #[oai(path = "/:user_id/roles/:role_id", method = "post", tag = "UserTags::Users")]
    async fn assign_role(
        &self,
        user_id: Path<i32>,
        role_id: Path<i32>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<VoidEnvelope> {
        if let Err(err) = self
            .gate
            .authorize("users.assign_role", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        respond_empty(
            "Role assigned",
            self.roles.link_user_role(user_id.0, role_id.0).await,
        )
    }

    /// Remove a role from a user; absent associations are a no-op
    /// (requires user:remove_role)
    #[oai(path = "/:user_id/roles/:role_id", method = "delete", tag = "UserTags::Users")]
    async fn remove_role(
        &self,
        user_id: Path<i32>,
        role_id: Path<i32>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<VoidEnvelope> {
        if let Err(err) = self
            .gate
            .authorize("users.remove_role", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        respond_empty(
            "Role removed",
            self.roles.unlink_user_role(user_id.0, role_id.0).await,
        )
    }
}
