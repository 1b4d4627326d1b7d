//! User-facing notices, the CLI's equivalent of toasts.

use std::fmt;

use crate::error::{DashError, PortError};

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Something worked.
    Success,
    /// Something failed.
    Error,
}

/// A short message queued by a view for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Headline, e.g. `Task completed`.
    pub title: String,
    /// Detail line.
    pub description: String,
    /// Success or error.
    pub kind: NoticeKind,
}

impl Notice {
    /// A success notice.
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), kind: NoticeKind::Success }
    }

    /// An error notice titled `Error`.
    pub fn error(description: impl Into<String>) -> Self {
        Self::titled_error("Error", description)
    }

    /// An error notice with its own title, e.g. `Request Timeout`.
    pub fn titled_error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), kind: NoticeKind::Error }
    }

    /// True for error notices.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            f.write_str(&self.title)
        } else {
            write!(f, "{}: {}", self.title, self.description)
        }
    }
}

/// A queue of pending notices, drained by whoever renders them.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    queue: Vec<Notice>,
}

impl Notices {
    /// Queues a notice.
    pub fn push(&mut self, notice: Notice) {
        self.queue.push(notice);
    }

    /// Takes every queued notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.queue)
    }

    /// Logs a failed store call, queues the matching error notice and
    /// returns the error for the caller.
    pub fn fail(&mut self, context: &str, error: &PortError) -> DashError {
        tracing::warn!(error = %error, "{context}");
        self.push(Notice::error(context));
        DashError::upstream(context, error)
    }

    /// Queued notices without removing them.
    #[must_use]
    pub fn pending(&self) -> &[Notice] {
        &self.queue
    }
}
