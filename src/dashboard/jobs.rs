//! The job board: every job with its function, next-step owner and progress.

use crate::dashboard::cascade::{clear_next_task_references, CascadeReport};
use crate::dashboard::lookup::Lookups;
use crate::dashboard::notice::{Notice, Notices};
use crate::dashboard::progress::{card_label, JobProgress, TaskCounts};
use crate::error::DashError;
use crate::model::{index_jobs, Job, JobDraft, JobIndex, JobPatch, Task, TaskDraft, TaskPatch};
use crate::ports::DashboardStore;

/// One decorated row of the board.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRow<'a> {
    /// The job itself.
    pub job: &'a Job,
    /// Business-function display name.
    pub function: &'a str,
    /// Display name of whoever owns the job's next task.
    pub next_owner: &'a str,
    /// Completion over the job's tasks.
    pub progress: JobProgress,
    /// Short card label, e.g. `#jo, 2 done`.
    pub label: String,
}

/// View state for the job board. Jobs and their tasks are each held once;
/// rows are derived on read.
#[derive(Debug, Clone, Default)]
pub struct JobBoard {
    jobs: JobIndex,
    tasks: Vec<Task>,
    lookups: Lookups,
    notices: Notices,
}

impl JobBoard {
    /// Loads jobs, their tasks and the name tables.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the job list cannot be fetched. Owner,
    /// function and task fetch failures only degrade the decoration.
    pub async fn load(store: &dyn DashboardStore) -> Result<Self, DashError> {
        let mut board = Self::default();

        let owners = store.list_owners().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to fetch owners");
            Vec::new()
        });
        let jobs = match store.list_jobs().await {
            Ok(jobs) => jobs,
            Err(e) => return Err(board.notices.fail("Failed to load jobs", &e)),
        };
        let functions = if jobs.iter().any(|j| j.business_function_id.is_some()) {
            store.list_business_functions().await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to fetch business functions");
                Vec::new()
            })
        } else {
            Vec::new()
        };
        board.tasks = store.list_tasks(None).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to fetch tasks, progress shows 0%");
            Vec::new()
        });

        board.jobs = index_jobs(jobs);
        board.lookups = Lookups::new(&owners, &functions);
        Ok(board)
    }

    /// Decorated rows in job id order.
    #[must_use]
    pub fn rows(&self) -> Vec<JobRow<'_>> {
        self.jobs
            .values()
            .map(|job| {
                let counts = TaskCounts::from_tasks(self.tasks_for(&job.id));
                JobRow {
                    job,
                    function: self.lookups.function_name(job),
                    next_owner: self.lookups.next_task_owner(job, &self.tasks),
                    progress: counts.into(),
                    label: card_label(job, counts),
                }
            })
            .collect()
    }

    /// Looks up a loaded job.
    #[must_use]
    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// Loaded tasks belonging to `job_id`, in load order.
    pub fn tasks_for<'a>(&'a self, job_id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| t.job_id.as_deref() == Some(job_id))
    }

    /// Name tables.
    #[must_use]
    pub fn lookups(&self) -> &Lookups {
        &self.lookups
    }

    /// Takes queued notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Creates a job.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank title, and an upstream error
    /// when the store rejects the create.
    pub async fn create_job(
        &mut self,
        store: &dyn DashboardStore,
        draft: &JobDraft,
    ) -> Result<Job, DashError> {
        if draft.title.trim().is_empty() {
            return Err(DashError::validation("Missing Information", "Job title is required."));
        }
        let job = match store.create_job(draft).await {
            Ok(job) => job,
            Err(e) => return Err(self.notices.fail("Failed to create job", &e)),
        };
        self.jobs.insert(job.id.clone(), job.clone());
        self.notices.push(Notice::success("Success", "Job created successfully"));
        Ok(job)
    }

    /// Applies an edit to a job.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty patch or blank title, and an
    /// upstream error when the store rejects the update.
    pub async fn update_job(
        &mut self,
        store: &dyn DashboardStore,
        id: &str,
        patch: &JobPatch,
    ) -> Result<(), DashError> {
        if patch.is_empty() {
            return Err(DashError::validation("Nothing to update", "No job fields were changed."));
        }
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(DashError::validation("Missing Information", "Job title is required."));
        }
        if let Err(e) = store.update_job(id, patch).await {
            return Err(self.notices.fail("Failed to update job", &e));
        }
        if let Some(job) = self.jobs.get_mut(id) {
            job.apply(patch);
        }
        self.notices.push(Notice::success("Success", "Job updated successfully"));
        Ok(())
    }

    /// Deletes a job. Its tasks are left in place.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the store rejects the delete.
    pub async fn delete_job(
        &mut self,
        store: &dyn DashboardStore,
        id: &str,
    ) -> Result<(), DashError> {
        if let Err(e) = store.delete_job(id).await {
            return Err(self.notices.fail("Failed to delete job", &e));
        }
        self.jobs.remove(id);
        self.notices.push(Notice::success("Success", "Job deleted successfully"));
        Ok(())
    }

    /// Creates a task under `job_id`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank title, and an upstream error
    /// when the store rejects the create.
    pub async fn create_task(
        &mut self,
        store: &dyn DashboardStore,
        job_id: &str,
        draft: TaskDraft,
    ) -> Result<Task, DashError> {
        if draft.title.trim().is_empty() {
            return Err(DashError::validation("Missing Information", "Task title is required."));
        }
        let draft = TaskDraft { job_id: Some(job_id.to_string()), ..draft };
        let task = match store.create_task(&draft).await {
            Ok(task) => task,
            Err(e) => return Err(self.notices.fail("Failed to create task", &e)),
        };
        self.tasks.push(task.clone());
        self.notices.push(Notice::success("Success", "Task created successfully"));
        Ok(task)
    }

    /// Toggles a task's completion. Completing runs the cascade; reopening
    /// does not.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the store rejects the update.
    pub async fn set_task_completed(
        &mut self,
        store: &dyn DashboardStore,
        task_id: &str,
        completed: bool,
    ) -> Result<CascadeReport, DashError> {
        let patch = TaskPatch::completion(completed);
        if let Err(e) = store.update_task(task_id, &patch).await {
            let context =
                if completed { "Failed to complete task" } else { "Failed to reopen task" };
            return Err(self.notices.fail(context, &e));
        }
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
            task.apply(&patch);
        }

        if !completed {
            self.notices.push(Notice::success("Task reopened", "Task has been reopened"));
            return Ok(CascadeReport::default());
        }
        let report = clear_next_task_references(store, &mut self.jobs, task_id).await;
        self.notices.push(Notice::success("Task completed", "Great job!"));
        if report.has_failures() {
            self.notices.push(Notice::error("Failed to update linked jobs"));
        }
        Ok(report)
    }

    /// Deletes a task and clears any job's reference to it.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the store rejects the delete.
    pub async fn delete_task(
        &mut self,
        store: &dyn DashboardStore,
        task_id: &str,
    ) -> Result<CascadeReport, DashError> {
        if let Err(e) = store.delete_task(task_id).await {
            return Err(self.notices.fail("Failed to delete task", &e));
        }
        self.tasks.retain(|t| t.id != task_id);
        let report = clear_next_task_references(store, &mut self.jobs, task_id).await;
        self.notices.push(Notice::success("Success", "Task deleted successfully"));
        if report.has_failures() {
            self.notices.push(Notice::error("Failed to update linked jobs"));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::model::{BusinessFunction, Owner};

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_owner(Owner { id: "o1".into(), name: "Ada".into() });
        store.insert_business_function(BusinessFunction {
            id: "bf1".into(),
            name: "Product".into(),
        });
        store.insert_job(Job {
            business_function_id: Some("bf1".into()),
            next_task_id: Some("t1".into()),
            ..Job::new("j1", "Launch")
        });
        store.insert_job(Job::new("j2", "Quiet"));
        store.insert_task(Task {
            job_id: Some("j1".into()),
            owner: Some("o1".into()),
            ..Task::new("t1", "Spec")
        });
        store.insert_task(Task {
            job_id: Some("j1".into()),
            completed: true,
            ..Task::new("t2", "Mockups")
        });
        store.insert_task(Task { job_id: Some("j1".into()), ..Task::new("t3", "Build") });
        store.insert_task(Task {
            job_id: Some("j1".into()),
            completed: true,
            ..Task::new("t4", "Review")
        });
        store
    }

    #[tokio::test]
    async fn rows_are_decorated() {
        let store = seeded();
        let board = JobBoard::load(&store).await.unwrap();
        let rows = board.rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].function, "Product");
        assert_eq!(rows[0].next_owner, "Ada");
        assert_eq!(rows[0].progress.percent, 50);
        assert_eq!(rows[0].label, "#j1, 2 done");
        assert_eq!(rows[1].function, "No function");
        assert_eq!(rows[1].next_owner, "Not assigned");
        assert_eq!(rows[1].progress.percent, 0);
    }

    #[tokio::test]
    async fn failed_job_list_is_an_error() {
        let store = seeded();
        store.fail_on("list_jobs");
        let err = JobBoard::load(&store).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn blank_titles_never_reach_the_store() {
        let store = MemoryStore::new();
        let mut board = JobBoard::load(&store).await.unwrap();
        let before = store.calls().len();

        let draft = JobDraft { title: "  ".into(), ..JobDraft::default() };
        assert!(board.create_job(&store, &draft).await.is_err());
        let task = TaskDraft { title: String::new(), ..TaskDraft::default() };
        assert!(board.create_task(&store, "j1", task).await.is_err());

        assert_eq!(store.calls().len(), before);
    }

    #[tokio::test]
    async fn created_task_belongs_to_job() {
        let store = seeded();
        let mut board = JobBoard::load(&store).await.unwrap();

        let draft = TaskDraft { title: "Ship".into(), ..TaskDraft::default() };
        let task = board.create_task(&store, "j2", draft).await.unwrap();

        assert_eq!(task.job_id.as_deref(), Some("j2"));
        assert_eq!(board.rows()[1].progress.counts.total, 1);
    }

    #[tokio::test]
    async fn completing_next_task_clears_reference() {
        let store = seeded();
        let mut board = JobBoard::load(&store).await.unwrap();

        let report = board.set_task_completed(&store, "t1", true).await.unwrap();

        assert_eq!(report.cleared, vec!["j1"]);
        let job = store.job("j1").unwrap();
        assert_eq!(job.next_task_id, None);
        assert_eq!(job.title, "Launch");
        assert_eq!(board.rows()[0].progress.percent, 75);
    }

    #[tokio::test]
    async fn reopening_skips_cascade() {
        let store = seeded();
        let mut board = JobBoard::load(&store).await.unwrap();

        board.set_task_completed(&store, "t2", false).await.unwrap();

        assert!(!store.calls().iter().any(|c| c.starts_with("update_job")));
        assert_eq!(board.drain_notices()[0].title, "Task reopened");
    }

    #[tokio::test]
    async fn deleting_job_removes_row() {
        let store = seeded();
        let mut board = JobBoard::load(&store).await.unwrap();

        board.delete_job(&store, "j2").await.unwrap();

        assert_eq!(board.rows().len(), 1);
        assert!(store.job("j2").is_none());
    }
}
