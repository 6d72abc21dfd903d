use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use crate::errors::RbacError;
use crate::types::db::{role, user, user_role};

/// Role automatically granted to every new registration. It must be seeded
/// before the first register call can succeed.
pub const DEFAULT_ROLE_NAME: &str = "RegularUser";

/// CredentialStore persists user records and verifies hashed passwords.
pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new user and grant the default role.
    ///
    /// Runs as a single transaction: if the default role is missing, the
    /// user insert is rolled back and nothing is persisted.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<user::Model, RbacError> {
        let txn = self.db.begin().await?;

        let existing = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(RbacError::DuplicateUsername);
        }

        let password_hash = hash_password(password)?;

        let created = user::ActiveModel {
            username: Set(username.to_owned()),
            password_hash: Set(password_hash),
            email: Set(email.to_owned()),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(map_unique_username)?;

        let default_role = role::Entity::find()
            .filter(role::Column::RoleName.eq(DEFAULT_ROLE_NAME))
            .one(&txn)
            .await?
            .ok_or(RbacError::MissingDefaultRole(DEFAULT_ROLE_NAME))?;

        user_role::Entity::insert(user_role::ActiveModel {
            user_id: Set(created.id),
            role_id: Set(default_role.id),
        })
        .exec_without_returning(&txn)
        .await?;

        txn.commit().await?;
        debug!(user_id = created.id, username, "registered user");
        Ok(created)
    }

    /// Verify a username/password pair.
    ///
    /// Unknown username, an unparsable stored hash, and a failed verification
    /// all collapse into the same `InvalidCredentials` error so callers
    /// cannot enumerate usernames.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<user::Model, RbacError> {
        let user = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .ok_or(RbacError::InvalidCredentials)?;

        let parsed_hash =
            PasswordHash::new(&user.password_hash).map_err(|_| RbacError::InvalidCredentials)?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| RbacError::InvalidCredentials)?;

        Ok(user)
    }

    pub async fn find_user(&self, id: i32) -> Result<Option<user::Model>, RbacError> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list_users(&self) -> Result<Vec<user::Model>, RbacError> {
        Ok(user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Overwrite username and email only. The stored password hash (and
    /// creation time) is carried over untouched, so this path can never be
    /// used to change a password.
    pub async fn update_profile(
        &self,
        id: i32,
        username: &str,
        email: &str,
    ) -> Result<user::Model, RbacError> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RbacError::UserNotFound)?;

        let mut active: user::ActiveModel = existing.into();
        active.username = Set(username.to_owned());
        active.email = Set(email.to_owned());

        active.update(&self.db).await.map_err(map_unique_username)
    }

    /// Delete a user row; association rows go with it via FK cascade.
    /// Deleting an id with no row is not an error.
    pub async fn delete_user(&self, id: i32) -> Result<(), RbacError> {
        user::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}

/// Argon2id with a fresh per-record salt, stored as a PHC string.
fn hash_password(password: &str) -> Result<String, RbacError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| RbacError::PasswordHash(e.to_string()))
}

/// A UNIQUE violation on insert/update means two requests raced past the
/// duplicate check; report it as the duplicate it is.
fn map_unique_username(err: DbErr) -> RbacError {
    if err.to_string().contains("UNIQUE") {
        RbacError::DuplicateUsername
    } else {
        RbacError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, PaginatorTrait};

    async fn setup_db(seed_default_role: bool) -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        if seed_default_role {
            role::ActiveModel {
                role_name: Set(DEFAULT_ROLE_NAME.to_string()),
                description: Set("Default role".to_string()),
                ..Default::default()
            }
            .insert(&db)
            .await
            .expect("Failed to seed default role");
        }

        db
    }

    #[tokio::test]
    async fn register_hashes_password_and_grants_default_role() {
        let db = setup_db(true).await;
        let store = CredentialStore::new(db.clone());

        let created = store
            .register("alice", "pw123", "alice@example.com")
            .await
            .expect("registration should succeed");

        assert_eq!(created.username, "alice");
        assert_ne!(created.password_hash, "pw123");
        assert!(created.password_hash.starts_with("$argon2"));

        let links = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(created.id))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(links.len(), 1);

        let granted = role::Entity::find_by_id(links[0].role_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(granted.role_name, DEFAULT_ROLE_NAME);
    }

    #[tokio::test]
    async fn duplicate_username_fails_and_adds_no_row() {
        let db = setup_db(true).await;
        let store = CredentialStore::new(db.clone());

        store
            .register("alice", "pw123", "alice@example.com")
            .await
            .unwrap();
        let err = store
            .register("alice", "other", "other@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::DuplicateUsername));

        let count = user::Entity::find().count(&db).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn missing_default_role_rolls_back_the_user_insert() {
        let db = setup_db(false).await;
        let store = CredentialStore::new(db.clone());

        let err = store
            .register("alice", "pw123", "alice@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::MissingDefaultRole(_)));

        // Nothing committed: neither the user nor the association row.
        let users = user::Entity::find().count(&db).await.unwrap();
        assert_eq!(users, 0);
        let links = user_role::Entity::find().count(&db).await.unwrap();
        assert_eq!(links, 0);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let db = setup_db(true).await;
        let store = CredentialStore::new(db);

        store
            .register("alice", "pw123", "alice@example.com")
            .await
            .unwrap();

        let wrong_password = store
            .verify_credentials("alice", "nope")
            .await
            .unwrap_err();
        let unknown_user = store
            .verify_credentials("nobody", "pw123")
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_password, RbacError::InvalidCredentials));
        assert!(matches!(unknown_user, RbacError::InvalidCredentials));
    }

    #[tokio::test]
    async fn verify_credentials_accepts_the_registered_password() {
        let db = setup_db(true).await;
        let store = CredentialStore::new(db);

        let created = store
            .register("alice", "pw123", "alice@example.com")
            .await
            .unwrap();
        let verified = store.verify_credentials("alice", "pw123").await.unwrap();
        assert_eq!(verified.id, created.id);
    }

    #[tokio::test]
    async fn update_profile_preserves_the_password_hash() {
        let db = setup_db(true).await;
        let store = CredentialStore::new(db);

        let created = store
            .register("alice", "pw123", "alice@example.com")
            .await
            .unwrap();
        let updated = store
            .update_profile(created.id, "alice2", "new@example.com")
            .await
            .unwrap();

        assert_eq!(updated.username, "alice2");
        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.password_hash, created.password_hash);

        // Still logs in with the original password under the new username.
        store.verify_credentials("alice2", "pw123").await.unwrap();
    }

    #[tokio::test]
    async fn update_profile_of_unknown_user_reports_not_found() {
        let db = setup_db(true).await;
        let store = CredentialStore::new(db);

        let err = store
            .update_profile(9999, "ghost", "ghost@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::UserNotFound));
    }

    #[tokio::test]
    async fn delete_user_cascades_role_associations() {
        let db = setup_db(true).await;
        let store = CredentialStore::new(db.clone());

        let created = store
            .register("alice", "pw123", "alice@example.com")
            .await
            .unwrap();
        store.delete_user(created.id).await.unwrap();

        assert!(store.find_user(created.id).await.unwrap().is_none());
        let links = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(created.id))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(links, 0);

        // Deleting again is a silent no-op.
        store.delete_user(created.id).await.unwrap();
    }
}
