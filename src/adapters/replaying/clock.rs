//! Replaying adapter for the `Clock` port.

use chrono::{DateTime, Utc};

use super::{next_output, SharedReplayer};
use crate::ports::Clock;

/// Replays recorded clock values from a cassette.
pub struct ReplayingClock {
    replayer: Option<SharedReplayer>,
}

impl ReplayingClock {
    /// Creates a replaying clock backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Creates a replaying clock with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        let output = next_output(self.replayer.as_ref(), "clock", "now");
        serde_json::from_value(output).expect("clock::now: failed to deserialize DateTime<Utc>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::test_support::shared;
    use crate::cassette::format::Interaction;
    use serde_json::json;

    #[test]
    fn serves_recorded_times_in_order() {
        let clock = ReplayingClock::new(shared(vec![
            Interaction::new("clock", "now", json!(null), json!("2025-03-10T08:00:00Z")),
            Interaction::new("clock", "now", json!(null), json!("2025-03-10T08:00:05Z")),
        ]));
        let first = clock.now();
        let second = clock.now();
        assert_eq!(first.to_rfc3339(), "2025-03-10T08:00:00+00:00");
        assert!(second > first);
    }

    #[test]
    #[should_panic(expected = "clock port not configured")]
    fn unconfigured_clock_panics() {
        let _ = ReplayingClock::unconfigured().now();
    }
}
