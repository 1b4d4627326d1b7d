//! Live adapter for the `CalendarProvider` port (Google Calendar).

use reqwest::Url;

use crate::config::AppConfig;
use crate::error::PortError;
use crate::ports::{Calendar, CalendarEvent, CalendarProvider};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Scopes requested when connecting a calendar.
pub const CALENDAR_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/calendar.events",
];

/// Google Calendar over OAuth 2.0.
///
/// Only the consent URL is built here. Listing calendars and reading events
/// need a stored refresh token, which this client does not manage yet.
pub struct GoogleCalendar {
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
}

impl GoogleCalendar {
    /// Creates a calendar client from the OAuth settings in `config`.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.google_redirect_uri.clone(),
        }
    }
}

impl CalendarProvider for GoogleCalendar {
    fn authorization_url(&self) -> Result<String, PortError> {
        let client_id = self.client_id.as_deref().ok_or("GOOGLE_CLIENT_ID is not set")?;
        let redirect_uri = self.redirect_uri.as_deref().ok_or("GOOGLE_CLIENT_URI is not set")?;
        if self.client_secret.is_none() {
            tracing::warn!("GOOGLE_CLIENT_SECRET is not set; the token exchange will fail");
        }

        let scope = CALENDAR_SCOPES.join(" ");
        let url = Url::parse_with_params(
            GOOGLE_AUTH_URL,
            &[
                ("access_type", "offline"),
                ("scope", scope.as_str()),
                ("response_type", "code"),
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
            ],
        )?;
        Ok(url.into())
    }

    fn list_calendars(&self) -> Result<Vec<Calendar>, PortError> {
        Err("Live calendar listing not yet implemented".into())
    }

    fn upcoming_events(&self, _calendar_ids: &[String]) -> Result<Vec<CalendarEvent>, PortError> {
        Err("Live calendar events not yet implemented".into())
    }
}
