//! Recording adapter for the `Clock` port.

use chrono::{DateTime, Utc};

use super::record_interaction;
use crate::cassette::session::SharedRecorder;
use crate::ports::Clock;

/// Records clock reads while delegating to an inner implementation.
pub struct RecordingClock {
    inner: Box<dyn Clock>,
    recorder: SharedRecorder,
}

impl RecordingClock {
    /// Creates a new recording clock wrapping the given implementation.
    pub fn new(inner: Box<dyn Clock>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl Clock for RecordingClock {
    fn now(&self) -> DateTime<Utc> {
        let result = self.inner.now();
        record_interaction(&self.recorder, "clock", "now", &(), &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::clock::LiveClock;
    use crate::adapters::recording::test_support;

    #[test]
    fn records_now_interaction() {
        let dir = std::env::temp_dir().join("opsboard_rec_clock_test");
        let recorder = test_support::recorder(&dir, "clock");

        let now = {
            let clock = RecordingClock::new(Box::new(LiveClock), std::sync::Arc::clone(&recorder));
            clock.now()
        };

        let cassette = test_support::finish(recorder);
        assert_eq!(cassette.interactions.len(), 1);
        let recorded: DateTime<Utc> =
            serde_json::from_value(cassette.interactions[0].output.clone()).unwrap();
        assert_eq!(recorded, now);
    }
}
