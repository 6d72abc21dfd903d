use poem_openapi::param::Header;
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};
use std::sync::Arc;

use crate::errors::RbacError;
use crate::services::{IdentityService, SessionStore};
use crate::stores::CredentialStore;
use crate::types::dto::auth::{LoginRequest, RegisterRequest};
use crate::types::dto::common::{respond, ApiEnvelope, VoidEnvelope};
use crate::types::dto::user::UserView;

/// Authentication API endpoints
pub struct AuthApi {
    credentials: Arc<CredentialStore>,
    identity: Arc<IdentityService>,
    sessions: Arc<SessionStore>,
}

impl AuthApi {
    pub fn new(
        credentials: Arc<CredentialStore>,
        identity: Arc<IdentityService>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            credentials,
            identity,
            sessions,
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a new user; the RegularUser role is granted automatically
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, body: Json<RegisterRequest>) -> Json<ApiEnvelope<UserView>> {
        let result = self
            .credentials
            .register(&body.username, &body.password, &body.email)
            .await
            .map(UserView::from);
        respond("Registration successful", result)
    }

    /// Login with username and password; the session id comes back as `data`
    /// and is presented on later calls in the X-Session-Id header
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Json<ApiEnvelope<String>> {
        match self
            .credentials
            .verify_credentials(&body.username, &body.password)
            .await
        {
            Ok(user) => {
                self.sessions.purge_expired();
                let session_id = self.sessions.create(user.id);
                ApiEnvelope::ok_with("Login successful", session_id)
            }
            Err(err) => ApiEnvelope::error(err.to_string()),
        }
    }

    /// Destroy the current session. Reports success even when the token is
    /// already gone, matching the original behavior
    #[oai(path = "/logout", method = "get", tag = "AuthTags::Authentication")]
    async fn logout(
        &self,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<VoidEnvelope> {
        if let Some(id) = session_id.0.as_deref() {
            self.sessions.destroy(id);
        }
        ApiEnvelope::ok_empty("Logout successful")
    }

    /// Current session's user with roles and permissions fully loaded
    #[oai(path = "/current-user", method = "get", tag = "AuthTags::Authentication")]
    async fn current_user(
        &self,
        #[oai(name = "X-Session-Id")] session_id: Header<Option<String>>,
    ) -> Json<ApiEnvelope<UserView>> {
        let Some(user_id) = session_id
            .0
            .as_deref()
            .and_then(|id| self.sessions.resolve(id))
        else {
            return ApiEnvelope::error(RbacError::NotAuthenticated.to_string());
        };

        match self.identity.user_with_roles(user_id).await {
            Ok(Some(user)) => ApiEnvelope::ok(UserView::from(user)),
            Ok(None) => ApiEnvelope::error(RbacError::NotAuthenticated.to_string()),
            Err(err) => ApiEnvelope::error(err.to_string()),
        }
    }
}
