//! Live adapter for the `IdentityProvider` port.

use crate::ports::IdentityProvider;

/// Identity fixed at startup, typically from `OPSBOARD_USER_ID`.
pub struct StaticIdentity {
    user_id: Option<String>,
}

impl StaticIdentity {
    /// Creates an identity provider that always answers with `user_id`.
    #[must_use]
    pub fn new(user_id: Option<String>) -> Self {
        Self { user_id }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<String> {
        self.user_id.clone()
    }
}
