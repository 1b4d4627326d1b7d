//! Dashboard records as they travel over the wire.
//!
//! The backing API speaks camelCase JSON with Mongo-style `_id` keys. Every
//! record also accepts a plain `id` so hand-written fixtures stay readable.

pub mod dates;
pub mod envelope;
pub mod job;
pub mod people;
pub mod qbo;
pub mod task;

use std::collections::BTreeMap;

pub use envelope::{Envelope, OwnersPayload};
pub use job::{Job, JobDraft, JobPatch};
pub use people::{BusinessFunction, BusinessInfo, ChatHistory, ChatMessage, Owner, SearchHit};
pub use qbo::{Qbo, QboDraft};
pub use task::{Task, TaskDraft, TaskPatch};

/// Jobs keyed by id, the join table the filter engine and cascade read from.
pub type JobIndex = BTreeMap<String, Job>;

/// Builds a [`JobIndex`] from a fetched job list, skipping records without an id.
#[must_use]
pub fn index_jobs(jobs: Vec<Job>) -> JobIndex {
    jobs.into_iter().filter(|job| !job.id.is_empty()).map(|job| (job.id.clone(), job)).collect()
}
