//! Clock port for obtaining the current time.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Relative due-date filters ("today", "in 3d") and QBO deadline countdowns
/// read the time through this port so replayed sessions stay deterministic.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
