use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use crate::errors::RbacError;
use crate::types::db::{permission, role, role_permission, user_role};

/// RoleStore persists roles and the two many-to-many association tables
/// (user↔role, role↔permission), and exposes the joined lookups.
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_role(
        &self,
        role_name: &str,
        description: &str,
    ) -> Result<role::Model, RbacError> {
        let created = role::ActiveModel {
            role_name: Set(role_name.to_owned()),
            description: Set(description.to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        debug!(role_id = created.id, role_name, "created role");
        Ok(created)
    }

    pub async fn find_role(&self, id: i32) -> Result<Option<role::Model>, RbacError> {
        Ok(role::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_role_by_name(&self, name: &str) -> Result<Option<role::Model>, RbacError> {
        Ok(role::Entity::find()
            .filter(role::Column::RoleName.eq(name))
            .one(&self.db)
            .await?)
    }

    pub async fn list_roles(&self) -> Result<Vec<role::Model>, RbacError> {
        Ok(role::Entity::find()
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn update_role(
        &self,
        id: i32,
        role_name: &str,
        description: &str,
    ) -> Result<role::Model, RbacError> {
        let existing = role::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RbacError::RoleNotFound)?;

        let mut active: role::ActiveModel = existing.into();
        active.role_name = Set(role_name.to_owned());
        active.description = Set(description.to_owned());
        Ok(active.update(&self.db).await?)
    }

    /// Delete a role; its user↔role and role↔permission rows cascade away.
    pub async fn delete_role(&self, id: i32) -> Result<(), RbacError> {
        role::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    /// Roles held by a user, joined through user_roles. Order is whatever
    /// the join returns; it carries no meaning.
    pub async fn roles_for_user(&self, user_id: i32) -> Result<Vec<role::Model>, RbacError> {
        let rows = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .find_also_related(role::Entity)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().filter_map(|(_, r)| r).collect())
    }

    /// Permissions attached to a role, joined through role_permissions.
    pub async fn permissions_for_role(
        &self,
        role_id: i32,
    ) -> Result<Vec<permission::Model>, RbacError> {
        let rows = role_permission::Entity::find()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .find_also_related(permission::Entity)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().filter_map(|(_, p)| p).collect())
    }

    /// Idempotent: assigning a role the user already holds is a no-op, and a
    /// lost check-then-insert race (UNIQUE violation) counts as success.
    pub async fn link_user_role(&self, user_id: i32, role_id: i32) -> Result<(), RbacError> {
        let existing = user_role::Entity::find_by_id((user_id, role_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let insert = user_role::Entity::insert(user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        })
        .exec_without_returning(&self.db)
        .await;

        absorb_unique_violation(insert)
    }

    /// Removing an association that does not exist is not an error.
    pub async fn unlink_user_role(&self, user_id: i32, role_id: i32) -> Result<(), RbacError> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Same idempotency rule as [`Self::link_user_role`].
    pub async fn link_role_permission(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> Result<(), RbacError> {
        let existing = role_permission::Entity::find_by_id((role_id, permission_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let insert = role_permission::Entity::insert(role_permission::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(permission_id),
        })
        .exec_without_returning(&self.db)
        .await;

        absorb_unique_violation(insert)
    }

    pub async fn unlink_role_permission(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> Result<(), RbacError> {
        role_permission::Entity::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .filter(role_permission::Column::PermissionId.eq(permission_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

/// The composite primary key is the hard uniqueness constraint; losing the
/// check-then-insert race to a concurrent identical request is a success.
fn absorb_unique_violation(result: Result<u64, DbErr>) -> Result<(), RbacError> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if err.to_string().contains("UNIQUE") => Ok(()),
        Err(err) => Err(err.into()),
    }
}
