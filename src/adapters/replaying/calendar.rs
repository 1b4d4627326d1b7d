//! Replaying adapter for the `CalendarProvider` port.

use super::{next_output, replay_result, SharedReplayer};
use crate::error::PortError;
use crate::ports::{Calendar, CalendarEvent, CalendarProvider};

/// Serves recorded calendar results from a cassette.
pub struct ReplayingCalendar {
    replayer: Option<SharedReplayer>,
}

impl ReplayingCalendar {
    /// Creates a replaying calendar backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Creates a replaying calendar with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl CalendarProvider for ReplayingCalendar {
    fn authorization_url(&self) -> Result<String, PortError> {
        replay_result(next_output(self.replayer.as_ref(), "calendar", "authorization_url"))
    }

    fn list_calendars(&self) -> Result<Vec<Calendar>, PortError> {
        replay_result(next_output(self.replayer.as_ref(), "calendar", "list_calendars"))
    }

    fn upcoming_events(&self, _calendar_ids: &[String]) -> Result<Vec<CalendarEvent>, PortError> {
        replay_result(next_output(self.replayer.as_ref(), "calendar", "upcoming_events"))
    }
}
