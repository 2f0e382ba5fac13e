use serde::{Deserialize, Serialize};

/// The authenticated user on whose behalf an operation runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable user identifier (the JWT subject)
    pub username: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            username: username.into(),
            is_admin,
        }
    }

    pub fn admin(username: impl Into<String>) -> Self {
        Self::new(username, true)
    }
}
