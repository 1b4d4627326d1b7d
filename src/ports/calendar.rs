//! Calendar provider port.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PortError;

/// A calendar the user can pick events from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Calendar {
    /// Provider calendar id.
    pub id: String,
    /// Display name.
    pub summary: String,
}

/// An upcoming calendar event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Provider event id.
    pub id: String,
    /// Event title.
    pub summary: String,
    /// Start time.
    pub start: DateTime<Utc>,
}

/// OAuth-based calendar access.
///
/// Only authorization URL construction is in scope; token exchange and
/// storage belong to the provider's SDK.
pub trait CalendarProvider: Send + Sync {
    /// Builds the URL the user visits to grant calendar access.
    ///
    /// # Errors
    ///
    /// Returns an error if the OAuth client is not configured.
    fn authorization_url(&self) -> Result<String, PortError>;

    /// Lists the user's calendars.
    ///
    /// # Errors
    ///
    /// Returns an error if access has not been granted or the call fails.
    fn list_calendars(&self) -> Result<Vec<Calendar>, PortError>;

    /// Lists upcoming events across the selected calendars.
    ///
    /// # Errors
    ///
    /// Returns an error if access has not been granted or the call fails.
    fn upcoming_events(&self, calendar_ids: &[String]) -> Result<Vec<CalendarEvent>, PortError>;
}
