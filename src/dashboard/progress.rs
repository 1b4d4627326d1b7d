//! Job and QBO progress.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::PortError;
use crate::model::{Job, Qbo, Task};
use crate::ports::DashboardStore;

/// Completed and total task counts for one job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    /// Tasks marked completed.
    pub completed: usize,
    /// All tasks.
    pub total: usize,
}

impl TaskCounts {
    /// Counts over the given tasks.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut counts, task| {
            counts.total += 1;
            if task.completed {
                counts.completed += 1;
            }
            counts
        })
    }

    /// `round(completed / total * 100)`, or 0 for a job without tasks.
    #[must_use]
    pub fn percent(self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let completed = self.completed.min(self.total);
        // Round half up in integer arithmetic.
        let percent = (200 * completed + self.total) / (2 * self.total);
        u8::try_from(percent).unwrap_or(100)
    }
}

/// Counts and percentage for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobProgress {
    /// Raw counts.
    pub counts: TaskCounts,
    /// Rounded completion percentage.
    pub percent: u8,
}

impl From<TaskCounts> for JobProgress {
    fn from(counts: TaskCounts) -> Self {
        Self { counts, percent: counts.percent() }
    }
}

/// Fetches a job's tasks and computes its progress.
///
/// # Errors
///
/// Returns the store error if the task list cannot be fetched.
pub async fn job_progress(
    store: &dyn DashboardStore,
    job_id: &str,
) -> Result<JobProgress, PortError> {
    let tasks = store.list_tasks(Some(job_id)).await?;
    Ok(TaskCounts::from_tasks(&tasks).into())
}

/// Progress for several jobs at once, keyed by job id. Jobs are fetched one
/// after another.
///
/// # Errors
///
/// Returns the first store error encountered.
pub async fn batch_progress(
    store: &dyn DashboardStore,
    job_ids: &[String],
) -> Result<BTreeMap<String, JobProgress>, PortError> {
    let mut progress = BTreeMap::new();
    for id in job_ids {
        progress.insert(id.clone(), job_progress(store, id).await?);
    }
    Ok(progress)
}

/// Short card label, e.g. `#j1, 3 done`.
#[must_use]
pub fn card_label(job: &Job, counts: TaskCounts) -> String {
    let prefix: String = job.id.chars().take(2).collect();
    format!("#{prefix}, {} done", counts.completed)
}

/// How far a QBO has moved from its beginning value toward its target,
/// clamped to `0..=100`. A QBO whose target equals its beginning is at 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn qbo_percent(qbo: &Qbo) -> u8 {
    let span = qbo.target_value - qbo.beginning_value;
    if span.abs() < f64::EPSILON || !span.is_finite() {
        return 0;
    }
    let ratio = ((qbo.current_value - qbo.beginning_value) / span * 100.0).round();
    if ratio.is_nan() {
        return 0;
    }
    // Clamped to 0..=100 before the cast.
    ratio.clamp(0.0, 100.0) as u8
}

/// Whole days from `now` until the QBO deadline; negative once it has passed.
#[must_use]
pub fn days_remaining(qbo: &Qbo, now: DateTime<Utc>) -> Option<i64> {
    qbo.deadline.map(|deadline| (deadline.date_naive() - now.date_naive()).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;

    fn task(id: &str, job: &str, completed: bool) -> Task {
        Task { job_id: Some(job.into()), completed, ..Task::new(id, id) }
    }

    #[test]
    fn zero_tasks_is_zero_percent() {
        assert_eq!(TaskCounts::default().percent(), 0);
    }

    #[test]
    fn three_of_four_is_seventy_five() {
        assert_eq!(TaskCounts { completed: 3, total: 4 }.percent(), 75);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(TaskCounts { completed: 1, total: 3 }.percent(), 33);
        assert_eq!(TaskCounts { completed: 2, total: 3 }.percent(), 67);
        assert_eq!(TaskCounts { completed: 1, total: 8 }.percent(), 13);
    }

    #[tokio::test]
    async fn job_progress_counts_only_that_job() {
        let store = MemoryStore::new();
        store.insert_task(task("t1", "j1", true));
        store.insert_task(task("t2", "j1", false));
        store.insert_task(task("t3", "j2", true));

        let progress = job_progress(&store, "j1").await.unwrap();
        assert_eq!(progress.counts, TaskCounts { completed: 1, total: 2 });
        assert_eq!(progress.percent, 50);

        let empty = job_progress(&store, "j9").await.unwrap();
        assert_eq!(empty.percent, 0);
    }

    #[tokio::test]
    async fn batch_progress_keys_by_job() {
        let store = MemoryStore::new();
        store.insert_task(task("t1", "j1", true));
        store.insert_task(task("t2", "j2", false));

        let ids = vec!["j1".to_string(), "j2".to_string()];
        let progress = batch_progress(&store, &ids).await.unwrap();
        assert_eq!(progress["j1"].percent, 100);
        assert_eq!(progress["j2"].percent, 0);
    }

    #[test]
    fn card_label_uses_id_prefix() {
        let job = Job::new("6650ab", "Launch");
        assert_eq!(card_label(&job, TaskCounts { completed: 3, total: 5 }), "#66, 3 done");
    }

    #[test]
    fn qbo_percent_clamps_and_handles_flat_targets() {
        let mut qbo: Qbo = serde_json::from_value(serde_json::json!({
            "_id": "q1", "name": "MRR",
            "beginningValue": 100.0, "currentValue": 150.0, "targetValue": 200.0
        }))
        .unwrap();
        assert_eq!(qbo_percent(&qbo), 50);

        qbo.current_value = 260.0;
        assert_eq!(qbo_percent(&qbo), 100);
        qbo.current_value = 40.0;
        assert_eq!(qbo_percent(&qbo), 0);
        qbo.target_value = 100.0;
        assert_eq!(qbo_percent(&qbo), 0);
    }

    #[test]
    fn days_remaining_counts_calendar_days() {
        let qbo: Qbo = serde_json::from_value(serde_json::json!({
            "_id": "q1", "name": "MRR", "deadline": "2025-07-01"
        }))
        .unwrap();
        let now = "2025-06-28T23:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(days_remaining(&qbo, now), Some(3));
    }
}
