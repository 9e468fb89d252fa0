use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// User group required for mutating operations (create, delete).
pub const ADMIN_GROUP: &str = "admin";

/// Authenticated identity for one request, derived from the session store by
/// the token gate. Immutable once created; never shared across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    pub role: String,
}

impl Principal {
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
        }
    }

    /// Role guard for privileged operations. Pure check, no I/O.
    pub fn require_role(&self, role: &str) -> Result<(), ApiError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "must be logged in as a member of the '{}' user group",
                role
            )))
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        self.require_role(ADMIN_GROUP)
    }
}

/// Raw `Authorization` header value of the authenticated request, kept so
/// outbound calls to sibling services can act as the caller.
#[derive(Debug, Clone)]
pub struct Bearer(pub String);

impl Bearer {
    pub fn header_value(&self) -> &str {
        &self.0
    }
}
