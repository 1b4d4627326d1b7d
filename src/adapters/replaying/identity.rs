//! Replaying adapter for the `IdentityProvider` port.

use super::{next_output, SharedReplayer};
use crate::ports::IdentityProvider;

/// Replays the recorded caller identity.
pub struct ReplayingIdentity {
    replayer: Option<SharedReplayer>,
}

impl ReplayingIdentity {
    /// Creates a replaying identity provider backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Creates a replaying identity provider with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl IdentityProvider for ReplayingIdentity {
    fn current_user(&self) -> Option<String> {
        let output = next_output(self.replayer.as_ref(), "identity", "current_user");
        serde_json::from_value(output).expect("identity::current_user: expected string or null")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::test_support::shared;
    use crate::cassette::format::Interaction;
    use serde_json::json;

    #[test]
    fn replays_signed_in_and_anonymous_callers() {
        let identity = ReplayingIdentity::new(shared(vec![
            Interaction::new("identity", "current_user", json!(null), json!("user_42")),
            Interaction::new("identity", "current_user", json!(null), json!(null)),
        ]));
        assert_eq!(identity.current_user().as_deref(), Some("user_42"));
        assert_eq!(identity.current_user(), None);
    }
}
