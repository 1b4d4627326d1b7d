//! The `{success, data?, error?}` response envelope used by every endpoint.

use serde::{Deserialize, Serialize};

use super::Owner;

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    /// Whether the call succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Wraps a successful payload.
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    /// Wraps a failure message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }

    /// Converts the envelope into a `Result`, treating `success: true` with no
    /// payload as an error so callers never see a silent empty response.
    ///
    /// # Errors
    ///
    /// Returns the server-provided error message, or a generic one.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("response marked successful but carried no data".to_string()),
            (false, _) => Err(self.error.unwrap_or_else(|| "request failed".to_string())),
        }
    }
}

/// The owners endpoint answers with either a bare array or an envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OwnersPayload {
    /// `[{...}, ...]`
    Bare(Vec<Owner>),
    /// `{success, data: [...]}`
    Wrapped(Envelope<Vec<Owner>>),
}

impl OwnersPayload {
    /// Extracts the owner list from whichever shape arrived.
    ///
    /// # Errors
    ///
    /// Returns an error when the wrapped form reports failure.
    pub fn into_owners(self) -> Result<Vec<Owner>, String> {
        match self {
            Self::Bare(owners) => Ok(owners),
            Self::Wrapped(envelope) => envelope.into_result(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;

    #[test]
    fn failure_envelope_surfaces_server_message() {
        let env: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"success": false, "error": "Unauthorized"}"#).unwrap();
        assert_eq!(env.into_result().unwrap_err(), "Unauthorized");
    }

    #[test]
    fn success_without_data_is_an_error() {
        let env: Envelope<Vec<String>> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(env.into_result().is_err());
    }

    #[test]
    fn payload_without_default_decodes() {
        let env: Envelope<Task> =
            serde_json::from_str(r#"{"success": true, "data": {"_id": "t1", "title": "Call"}}"#)
                .unwrap();
        assert_eq!(env.into_result().unwrap().title, "Call");

        let env: Envelope<Task> =
            serde_json::from_str(r#"{"success": false, "error": "Not found"}"#).unwrap();
        assert_eq!(env.data, None);
    }

    #[test]
    fn owners_accepts_bare_array_and_envelope() {
        let bare: OwnersPayload =
            serde_json::from_str(r#"[{"_id": "o1", "name": "Ada"}]"#).unwrap();
        assert_eq!(bare.into_owners().unwrap()[0].name, "Ada");

        let wrapped: OwnersPayload =
            serde_json::from_str(r#"{"success": true, "data": [{"_id": "o2", "name": "Bo"}]}"#)
                .unwrap();
        assert_eq!(wrapped.into_owners().unwrap()[0].id, "o2");
    }
}
