use crate::types::internal::auth::LoadedUser;

/// Pure existence check: does any of the user's roles carry a permission
/// named exactly `required`?
///
/// Case-sensitive string equality, short-circuiting on the first match.
/// The caller must hand in a fully loaded user; no store access happens
/// here and no side effects occur.
pub fn has_permission(user: &LoadedUser, required: &str) -> bool {
    user.roles
        .iter()
        .any(|role| {
            role.permissions
                .iter()
                .any(|permission| permission.permission_name == required)
        })
}
