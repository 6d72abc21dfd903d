use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use tracing::debug;

use crate::errors::RbacError;
use crate::types::db::permission;

/// PermissionStore persists the named capability strings checked by the
/// request gate.
pub struct PermissionStore {
    db: DatabaseConnection,
}

impl PermissionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_permission(
        &self,
        permission_name: &str,
        description: &str,
    ) -> Result<permission::Model, RbacError> {
        let created = permission::ActiveModel {
            permission_name: Set(permission_name.to_owned()),
            description: Set(description.to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        debug!(permission_id = created.id, permission_name, "created permission");
        Ok(created)
    }

    pub async fn find_permission(&self, id: i32) -> Result<Option<permission::Model>, RbacError> {
        Ok(permission::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list_permissions(&self) -> Result<Vec<permission::Model>, RbacError> {
        Ok(permission::Entity::find()
            .order_by_asc(permission::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn update_permission(
        &self,
        id: i32,
        permission_name: &str,
        description: &str,
    ) -> Result<permission::Model, RbacError> {
        let existing = permission::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RbacError::PermissionNotFound)?;

        let mut active: permission::ActiveModel = existing.into();
        active.permission_name = Set(permission_name.to_owned());
        active.description = Set(description.to_owned());
        Ok(active.update(&self.db).await?)
    }

    /// Delete a permission; role↔permission rows referencing it cascade away.
    pub async fn delete_permission(&self, id: i32) -> Result<(), RbacError> {
        permission::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
