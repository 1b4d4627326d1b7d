//! Recording adapter for the `CalendarProvider` port.

use serde_json::json;

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::error::PortError;
use crate::ports::{Calendar, CalendarEvent, CalendarProvider};

/// Records calendar calls while delegating to an inner implementation.
pub struct RecordingCalendar {
    inner: Box<dyn CalendarProvider>,
    recorder: SharedRecorder,
}

impl RecordingCalendar {
    /// Creates a new recording calendar wrapping the given implementation.
    pub fn new(inner: Box<dyn CalendarProvider>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl CalendarProvider for RecordingCalendar {
    fn authorization_url(&self) -> Result<String, PortError> {
        let result = self.inner.authorization_url();
        record_result(&self.recorder, "calendar", "authorization_url", &(), &result);
        result
    }

    fn list_calendars(&self) -> Result<Vec<Calendar>, PortError> {
        let result = self.inner.list_calendars();
        record_result(&self.recorder, "calendar", "list_calendars", &(), &result);
        result
    }

    fn upcoming_events(&self, calendar_ids: &[String]) -> Result<Vec<CalendarEvent>, PortError> {
        let result = self.inner.upcoming_events(calendar_ids);
        let input = json!({ "calendar_ids": calendar_ids });
        record_result(&self.recorder, "calendar", "upcoming_events", &input, &result);
        result
    }
}
