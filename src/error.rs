//! Error taxonomy for dashboard operations.

use thiserror::Error;

/// Boxed error returned by port adapters.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Failures a dashboard operation can report to its caller.
#[derive(Debug, Error)]
pub enum DashError {
    /// No caller identity was available for an authenticated operation.
    #[error("Unauthorized")]
    Unauthorized,

    /// The requested record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The store or another upstream service failed.
    #[error("{context}: {detail}")]
    Upstream {
        /// What the caller was trying to do.
        context: String,
        /// The underlying failure.
        detail: String,
    },

    /// Input was rejected before any network call.
    #[error("{title}: {message}")]
    Validation {
        /// Short notice title, e.g. `Missing Information`.
        title: String,
        /// User-facing explanation.
        message: String,
    },

    /// A bounded wait expired.
    #[error("operation timed out after {secs}s")]
    Timeout {
        /// Configured limit in seconds.
        secs: u64,
    },

    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DashError {
    /// Wraps a port failure with a description of the attempted operation.
    pub fn upstream(context: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Upstream { context: context.into(), detail: detail.to_string() }
    }

    /// Builds a validation failure.
    pub fn validation(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { title: title.into(), message: message.into() }
    }

    /// HTTP-equivalent status for this failure.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::NotFound(_) => 404,
            Self::Validation { .. } => 400,
            Self::Timeout { .. } => 504,
            Self::Upstream { .. } | Self::Config(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(DashError::Unauthorized.status_code(), 401);
        assert_eq!(DashError::NotFound("Chat".into()).status_code(), 404);
        assert_eq!(DashError::upstream("load jobs", "boom").status_code(), 500);
        assert_eq!(DashError::validation("Missing Information", "x").status_code(), 400);
    }

    #[test]
    fn messages_render_context() {
        let err = DashError::upstream("Failed to load tasks", "connection refused");
        assert_eq!(err.to_string(), "Failed to load tasks: connection refused");
        assert_eq!(DashError::NotFound("Chat".into()).to_string(), "Chat not found");
    }
}
