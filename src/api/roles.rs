use poem_openapi::param::{Header, Path};
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};
use std::sync::Arc;

use crate::errors::RbacError;
use crate::gate::RequestGate;
use crate::stores::RoleStore;
use crate::types::dto::common::{respond, respond_empty, ApiEnvelope, VoidEnvelope};
use crate::types::dto::role::{RoleRequest, RoleView};
use crate::types::internal::auth::LoadedRole;

/// Role administration API endpoints
pub struct RoleApi {
    roles: Arc<RoleStore>,
    gate: Arc<RequestGate>,
}

impl RoleApi {
    pub fn new(roles: Arc<RoleStore>, gate: Arc<RequestGate>) -> Self {
        Self { roles, gate }
    }
}

/// API tags for role administration endpoints
#[derive(Tags)]
enum RoleTags {
    /// Role administration endpoints
    Roles,
}

#[OpenApi(prefix_path = "/roles")]
impl RoleApi {
    /// List all roles (requires role:view)
    #[oai(path = "/", method = "get", tag = "RoleTags::Roles")]
    async fn list_roles(
        &self,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<ApiEnvelope<Vec<RoleView>>> {
        if let Err(err) = self
            .gate
            .authorize("roles.list", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        let result = self
            .roles
            .list_roles()
            .await
            .map(|roles| roles.into_iter().map(RoleView::from).collect());
        respond("ok", result)
    }

    /// Get one role with its permissions loaded (requires role:view)
    #[oai(path = "/:id", method = "get", tag = "RoleTags::Roles")]
    async fn get_role(
        &self,
        id: Path<i32>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<ApiEnvelope<RoleView>> {
        if let Err(err) = self
            .gate
            .authorize("roles.get", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        let loaded = async {
            let Some(role) = self.roles.find_role(id.0).await? else {
                return Err(RbacError::RoleNotFound);
            };
            let permissions = self.roles.permissions_for_role(role.id).await?;
            Ok(RoleView::from(LoadedRole { role, permissions }))
        }
        .await;
        respond("ok", loaded)
    }

    /// Create a role (requires role:create)
    #[oai(path = "/", method = "post", tag = "RoleTags::Roles")]
    async fn create_role(
        &self,
        body: Json<RoleRequest>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<ApiEnvelope<RoleView>> {
        if let Err(err) = self
            .gate
            .authorize("roles.create", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        let result = self
            .roles
            .create_role(&body.role_name, &body.description)
            .await
            .map(RoleView::from);
        respond("Role created", result)
    }

    /// Update a role (requires role:edit)
    #[oai(path = "/:id", method = "put", tag = "RoleTags::Roles")]
    async fn update_role(
        &self,
        id: Path<i32>,
        body: Json<RoleRequest>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<ApiEnvelope<RoleView>> {
        if let Err(err) = self
            .gate
            .authorize("roles.update", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        let result = self
            .roles
            .update_role(id.0, &body.role_name, &body.description)
            .await
            .map(RoleView::from);
        respond("Role updated", result)
    }

    /// Delete a role; both association tables cascade (requires role:delete)
    #[oai(path = "/:id", method = "delete", tag = "RoleTags::Roles")]
    async fn delete_role(
        &self,
        id: Path<i32>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<VoidEnvelope> {
        if let Err(err) = self
            .gate
            .authorize("roles.delete", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        respond_empty("Role deleted", self.roles.delete_role(id.0).await)
    }

    /// Attach a permission to a role; existing pairs are a no-op
    /// (requires role:assign_permission)
    #[oai(
        path = "/:role_id/permissions/:permission_id",
        method = "post",
        tag = "RoleTags::Roles"
    )]
    async fn add_permission(
        &self,
        role_id: Path<i32>,
        permission_id: Path<i32>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<VoidEnvelope> {
        if let Err(err) = self
            .gate
            .authorize("roles.add_permission", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        respond_empty(
            "Permission added",
            self.roles
                .link_role_permission(role_id.0, permission_id.0)
                .await,
        )
    }

    /// Detach a permission from a role; absent pairs are a no-op
    /// (requires role:remove_permission)
    #[oai(
        path = "/:role_id/permissions/:permission_id",
        method = "delete",
        tag = "RoleTags::Roles"
    )]
    async fn remove_permission(
        &self,
        role_id: Path<i32>,
        permission_id: Path<i32>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<VoidEnvelope> {
        if let Err(err) = self
            .gate
            .authorize("roles.remove_permission", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        respond_empty(
            "Permission removed",
            self.roles
                .unlink_role_permission(role_id.0, permission_id.0)
                .await,
        )
    }
}
