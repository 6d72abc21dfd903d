// Stores layer - Data access and repository pattern
pub mod credential_store;
pub mod permission_store;
pub mod role_store;

pub use credential_store::{CredentialStore, DEFAULT_ROLE_NAME};
pub use permission_store::PermissionStore;
pub use role_store::RoleStore;
