use sea_orm::DbErr;
use thiserror::Error;

/// Error kinds surfaced by the stores, services, and the request gate.
///
/// The Display text of each variant is exactly what the client sees in the
/// response envelope's `message` field. Unknown-username and wrong-password
/// logins deliberately share the single `InvalidCredentials` variant so the
/// two cases are indistinguishable to callers.
#[derive(Debug, Error)]
pub enum RbacError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Role not found")]
    RoleNotFound,

    #[error("Permission not found")]
    PermissionNotFound,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Default role '{0}' has not been seeded")]
    MissingDefaultRole(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_message_is_uniform() {
        // Both login failure causes surface this exact text.
        assert_eq!(
            RbacError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
    }

    #[test]
    fn missing_default_role_names_the_role() {
        let err = RbacError::MissingDefaultRole("RegularUser");
        assert_eq!(
            err.to_string(),
            "Default role 'RegularUser' has not been seeded"
        );
    }
}
