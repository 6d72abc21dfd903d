use poem_openapi::param::{Header, Path};
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};
use std::sync::Arc;

use crate::errors::RbacError;
use crate::gate::RequestGate;
use crate::stores::PermissionStore;
use crate::types::dto::common::{respond, respond_empty, ApiEnvelope, VoidEnvelope};
use crate::types::dto::permission::{PermissionRequest, PermissionView};

/// Permission administration API endpoints
pub struct PermissionApi {
    permissions: Arc<PermissionStore>,
    gate: Arc<RequestGate>,
}

impl PermissionApi {
    pub fn new(permissions: Arc<PermissionStore>, gate: Arc<RequestGate>) -> Self {
        Self { permissions, gate }
    }
}

/// API tags for permission administration endpoints
#[derive(Tags)]
enum PermissionTags {
    /// Permission administration endpoints
    Permissions,
}

#[OpenApi(prefix_path = "/permissions")]
impl PermissionApi {
    /// List all permissions (requires permission:view)
    #[oai(path = "/", method = "get", tag = "PermissionTags::Permissions")]
    async fn list_permissions(
        &self,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<ApiEnvelope<Vec<PermissionView>>> {
        if let Err(err) = self
            .gate
            .authorize("permissions.list", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        let result = self
            .permissions
            .list_permissions()
            .await
            .map(|permissions| permissions.into_iter().map(PermissionView::from).collect());
        respond("ok", result)
    }

    /// Get one permission (requires permission:view)
    #[oai(path = "/:id", method = "get", tag = "PermissionTags::Permissions")]
    async fn get_permission(
        &self,
        id: Path<i32>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<ApiEnvelope<PermissionView>> {
        if let Err(err) = self
            .gate
            .authorize("permissions.get", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        match self.permissions.find_permission(id.0).await {
            Ok(Some(permission)) => ApiEnvelope::ok(PermissionView::from(permission)),
            Ok(None) => ApiEnvelope::error(RbacError::PermissionNotFound.to_string()),
            Err(err) => ApiEnvelope::error(err.to_string()),
        }
    }

    /// Create a permission (requires permission:create)
    #[oai(path = "/", method = "post", tag = "PermissionTags::Permissions")]
    async fn create_permission(
        &self,
        body: Json<PermissionRequest>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<ApiEnvelope<PermissionView>> {
        if let Err(err) = self
            .gate
            .authorize("permissions.create", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        let result = self
            .permissions
            .create_permission(&body.permission_name, &body.description)
            .await
            .map(PermissionView::from);
        respond("Permission created", result)
    }

    /// Update a permission (requires permission:edit)
    #[oai(path = "/:id", method = "put", tag = "PermissionTags::Permissions")]
    async fn update_permission(
        &self,
        id: Path<i32>,
        body: Json<PermissionRequest>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<ApiEnvelope<PermissionView>> {
        if let Err(err) = self
            .gate
            .authorize("permissions.update", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        let result = self
            .permissions
            .update_permission(id.0, &body.permission_name, &body.description)
            .await
            .map(PermissionView::from);
        respond("Permission updated", result)
    }

    /// Delete a permission; role links cascade (requires permission:delete)
    #[oai(path = "/:id", method = "delete", tag = "PermissionTags::Permissions")]
    async fn delete_permission(
        &self,
        id: Path<i32>,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<VoidEnvelope> {
        if let Err(err) = self
            .gate
            .authorize("permissions.delete", session_id.0.as_deref())
            .await
        {
            return ApiEnvelope::error(err.to_string());
        }

        respond_empty(
            "Permission deleted",
            self.permissions.delete_permission(id.0).await,
        )
    }
}
