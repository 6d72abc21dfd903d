use poem_openapi::payload::Json;
use poem_openapi::types::{ParseFromJSON, ToJSON};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::errors::RbacError;

/// Uniform response envelope shared by every endpoint.
///
/// All endpoints answer HTTP 200; business and authorization failures are
/// signaled exclusively through `success:false` plus a human-readable
/// `message`. Existing clients key on the body, not the status code.
#[derive(Object, Debug)]
pub struct ApiEnvelope<T: ParseFromJSON + ToJSON> {
    /// Whether the operation succeeded
    pub success: bool,

    /// Human-readable outcome message
    pub message: String,

    /// Operation payload, null on failure or for void operations
    pub data: Option<T>,
}

/// Envelope for operations that carry no payload (`data` is always null).
pub type VoidEnvelope = ApiEnvelope<serde_json::Value>;

impl<T: ParseFromJSON + ToJSON> ApiEnvelope<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: "ok".to_string(),
            data: Some(data),
        })
    }

    pub fn ok_with(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }

    pub fn ok_empty(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
        })
    }

    pub fn error(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            message: message.into(),
            data: None,
        })
    }
}

/// Fold a store/service result into the envelope, attaching `message` on
/// success and the error's Display text on failure.
pub fn respond<T: ParseFromJSON + ToJSON>(
    message: &str,
    result: Result<T, RbacError>,
) -> Json<ApiEnvelope<T>> {
    match result {
        Ok(data) => ApiEnvelope::ok_with(message, data),
        Err(err) => ApiEnvelope::error(err.to_string()),
    }
}

/// Same as [`respond`] for void operations.
pub fn respond_empty(message: &str, result: Result<(), RbacError>) -> Json<VoidEnvelope> {
    match result {
        Ok(()) => ApiEnvelope::ok_empty(message),
        Err(err) => ApiEnvelope::error(err.to_string()),
    }
}

/// Response model for the health check endpoint
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Current server time (RFC 3339)
    pub timestamp: String,
}
