//! The next-step feed: every job's next task, filterable and actionable.
//!
//! The feed keeps one canonical task list. [`FeedState::visible`] derives the
//! filtered view on each read, so a record edited out of the active filters
//! disappears without a refetch.

use crate::dashboard::cascade::{clear_next_task_references, CascadeReport};
use crate::dashboard::filter::{filter_tasks, TaskFilters};
use crate::dashboard::lookup::Lookups;
use crate::dashboard::notice::{Notice, Notices};
use crate::error::DashError;
use crate::model::{index_jobs, JobIndex, Task, TaskPatch};
use crate::ports::DashboardStore;

/// View state for the next-step feed.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    tasks: Vec<Task>,
    jobs: JobIndex,
    lookups: Lookups,
    filters: TaskFilters,
    notices: Notices,
}

impl FeedState {
    /// Loads the feed.
    ///
    /// Owners are fetched first, then jobs. Business-function names are only
    /// fetched when some job references a function, and each job's next task
    /// is then fetched one at a time. Only a failed job fetch is reported to
    /// the user (`Failed to load tasks`); the other lookups degrade to
    /// fallbacks and are logged.
    pub async fn load(store: &dyn DashboardStore) -> Self {
        let mut feed = Self::default();

        let owners = store.list_owners().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to fetch owners");
            Vec::new()
        });

        let jobs = match store.list_jobs().await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch jobs");
                feed.lookups = Lookups::new(&owners, &[]);
                feed.notices.push(Notice::error("Failed to load tasks"));
                return feed;
            }
        };

        let mut next_task_ids: Vec<String> = Vec::new();
        let mut needs_functions = false;
        for job in &jobs {
            if let Some(next) = job.next_task_id.as_deref().filter(|id| !id.is_empty()) {
                if !next_task_ids.iter().any(|id| id == next) {
                    next_task_ids.push(next.to_string());
                }
            }
            needs_functions |= job.business_function_id.is_some();
        }

        let functions = if needs_functions {
            store.list_business_functions().await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to fetch business functions");
                Vec::new()
            })
        } else {
            Vec::new()
        };

        for task_id in &next_task_ids {
            match store.get_task(task_id).await {
                Ok(Some(task)) => feed.tasks.push(task),
                Ok(None) => tracing::debug!(task_id = %task_id, "next task no longer exists"),
                Err(e) => {
                    tracing::warn!(task_id = %task_id, error = %e, "failed to fetch next task");
                }
            }
        }

        feed.jobs = index_jobs(jobs);
        feed.lookups = Lookups::new(&owners, &functions);
        tracing::debug!(tasks = feed.tasks.len(), jobs = feed.jobs.len(), "feed loaded");
        feed
    }

    /// Builds a feed from already-fetched parts.
    #[must_use]
    pub fn from_parts(tasks: Vec<Task>, jobs: JobIndex, lookups: Lookups) -> Self {
        Self { tasks, jobs, lookups, ..Self::default() }
    }

    /// Tasks passing the active filters, in feed order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, &self.jobs, &self.filters)
    }

    /// Every loaded task, ignoring filters.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Loaded jobs by id.
    #[must_use]
    pub fn jobs(&self) -> &JobIndex {
        &self.jobs
    }

    /// Name tables.
    #[must_use]
    pub fn lookups(&self) -> &Lookups {
        &self.lookups
    }

    /// Active filters.
    #[must_use]
    pub fn filters(&self) -> &TaskFilters {
        &self.filters
    }

    /// Replaces the active filters.
    pub fn set_filters(&mut self, filters: TaskFilters) {
        self.filters = filters;
    }

    /// Takes queued notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Looks up a loaded task.
    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Title and notes of a loaded task, with a placeholder for empty notes.
    ///
    /// # Errors
    ///
    /// Returns not-found when the task is not in the feed.
    pub fn notes(&self, id: &str) -> Result<(&str, &str), DashError> {
        let task = self.task(id).ok_or_else(|| DashError::NotFound("Task".into()))?;
        Ok((&task.title, task.notes_or_placeholder()))
    }

    /// Marks a task completed, drops it from the feed and clears any job's
    /// reference to it.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the store rejects the update; the feed
    /// is unchanged in that case.
    pub async fn complete_task(
        &mut self,
        store: &dyn DashboardStore,
        id: &str,
    ) -> Result<CascadeReport, DashError> {
        if let Err(e) = store.update_task(id, &TaskPatch::completion(true)).await {
            return Err(self.notices.fail("Failed to complete task", &e));
        }
        self.tasks.retain(|t| t.id != id);

        let report = clear_next_task_references(store, &mut self.jobs, id).await;
        self.notices.push(Notice::success("Task completed", "Great job!"));
        if report.has_failures() {
            self.notices.push(Notice::error("Failed to update linked jobs"));
        }
        Ok(report)
    }

    /// Marks a task not completed. It stays where it is in the feed.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the store rejects the update.
    pub async fn reopen_task(
        &mut self,
        store: &dyn DashboardStore,
        id: &str,
    ) -> Result<(), DashError> {
        let patch = TaskPatch::completion(false);
        if let Err(e) = store.update_task(id, &patch).await {
            return Err(self.notices.fail("Failed to reopen task", &e));
        }
        self.patch_local(id, &patch);
        self.notices.push(Notice::success("Task reopened", "Task has been reopened"));
        Ok(())
    }

    /// Applies an edit.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty patch or a blank title, and an
    /// upstream error when the store rejects the update.
    pub async fn update_task(
        &mut self,
        store: &dyn DashboardStore,
        id: &str,
        patch: &TaskPatch,
    ) -> Result<(), DashError> {
        if patch.is_empty() {
            return Err(DashError::validation("Nothing to update", "No task fields were changed."));
        }
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(DashError::validation("Missing Information", "Task title is required."));
        }
        if let Err(e) = store.update_task(id, patch).await {
            return Err(self.notices.fail("Failed to update task", &e));
        }
        self.patch_local(id, patch);
        self.notices.push(Notice::success("Success", "Task updated successfully"));
        Ok(())
    }

    /// Deletes a task and clears any job's reference to it.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the store rejects the delete; the feed
    /// is unchanged in that case.
    pub async fn delete_task(
        &mut self,
        store: &dyn DashboardStore,
        id: &str,
    ) -> Result<CascadeReport, DashError> {
        if let Err(e) = store.delete_task(id).await {
            return Err(self.notices.fail("Failed to delete task", &e));
        }
        self.tasks.retain(|t| t.id != id);

        let report = clear_next_task_references(store, &mut self.jobs, id).await;
        self.notices.push(Notice::success("Success", "Task deleted successfully"));
        if report.has_failures() {
            self.notices.push(Notice::error("Failed to update linked jobs"));
        }
        Ok(report)
    }

    /// Acknowledges an add-to-calendar request for a loaded task.
    ///
    /// # Errors
    ///
    /// Returns not-found when the task is not in the feed.
    pub fn add_to_calendar(&mut self, id: &str) -> Result<(), DashError> {
        let title = self.task(id).ok_or_else(|| DashError::NotFound("Task".into()))?.title.clone();
        self.notices.push(Notice::success(
            "Added to calendar",
            format!("\"{title}\" has been added to your calendar"),
        ));
        Ok(())
    }

    fn patch_local(&mut self, id: &str, patch: &TaskPatch) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.apply(patch);
        }
    }
}
