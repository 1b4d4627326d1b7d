//! Clearing stale `nextTaskId` references after a task completes or is deleted.

use crate::model::{JobIndex, JobPatch};
use crate::ports::DashboardStore;

/// Outcome of one cascade run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Jobs whose reference was cleared.
    pub cleared: Vec<String>,
    /// Jobs whose update failed; they still point at the task.
    pub failed: Vec<String>,
}

impl CascadeReport {
    /// True when some update failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Issues one update per job whose `next_task_id` is `task_id`, walking jobs
/// in id order. Each update stands alone: a failure is logged, recorded in
/// the report and not retried, and the remaining jobs are still updated.
///
/// Successfully cleared jobs are patched in `jobs` as well.
pub async fn clear_next_task_references(
    store: &dyn DashboardStore,
    jobs: &mut JobIndex,
    task_id: &str,
) -> CascadeReport {
    let referencing: Vec<String> = jobs
        .values()
        .filter(|job| job.next_task_id.as_deref() == Some(task_id))
        .map(|job| job.id.clone())
        .collect();

    let patch = JobPatch::clear_next_task();
    let mut report = CascadeReport::default();
    for job_id in referencing {
        match store.update_job(&job_id, &patch).await {
            Ok(_) => {
                if let Some(job) = jobs.get_mut(&job_id) {
                    job.apply(&patch);
                }
                tracing::debug!(job_id = %job_id, task_id, "cleared next task reference");
                report.cleared.push(job_id);
            }
            Err(e) => {
                tracing::warn!(
                    job_id = %job_id,
                    task_id,
                    error = %e,
                    "failed to clear next task reference"
                );
                report.failed.push(job_id);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::model::{index_jobs, Job};

    fn job(id: &str, next: Option<&str>) -> Job {
        Job {
            owner: Some("o1".into()),
            next_task_id: next.map(str::to_string),
            ..Job::new(id, format!("Job {id}"))
        }
    }

    fn seeded(jobs: &[Job]) -> (MemoryStore, JobIndex) {
        let store = MemoryStore::new();
        for j in jobs {
            store.insert_job(j.clone());
        }
        (store, index_jobs(jobs.to_vec()))
    }

    #[tokio::test]
    async fn clears_only_the_reference() {
        let (store, mut index) = seeded(&[job("j1", Some("t1"))]);

        let report = clear_next_task_references(&store, &mut index, "t1").await;

        assert_eq!(report.cleared, vec!["j1"]);
        let stored = store.job("j1").unwrap();
        assert_eq!(stored.next_task_id, None);
        assert_eq!(stored.owner.as_deref(), Some("o1"));
        assert_eq!(stored.title, "Job j1");
        assert_eq!(index["j1"].next_task_id, None);
    }

    #[tokio::test]
    async fn unreferenced_task_mutates_nothing() {
        let (store, mut index) = seeded(&[job("j1", Some("t1")), job("j2", None)]);

        let report = clear_next_task_references(&store, &mut index, "t9").await;

        assert_eq!(report, CascadeReport::default());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn one_failure_does_not_block_the_rest() {
        let (store, mut index) =
            seeded(&[job("j1", Some("t1")), job("j2", Some("t1")), job("j3", Some("t1"))]);
        store.fail_on("update_job:j2");

        let report = clear_next_task_references(&store, &mut index, "t1").await;

        assert_eq!(report.cleared, vec!["j1", "j3"]);
        assert_eq!(report.failed, vec!["j2"]);
        assert!(report.has_failures());
        assert_eq!(store.job("j2").unwrap().next_task_id.as_deref(), Some("t1"));
        assert_eq!(index["j2"].next_task_id.as_deref(), Some("t1"));
        let updates = store.calls().iter().filter(|c| c.starts_with("update_job")).count();
        assert_eq!(updates, 3);
    }
}
