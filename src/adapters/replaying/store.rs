//! Replaying adapter for the `DashboardStore` port.

use serde::de::DeserializeOwned;

use super::{next_output, replay_result, SharedReplayer};
use crate::model::{
    BusinessFunction, BusinessInfo, ChatHistory, Job, JobDraft, JobPatch, Owner, Qbo, QboDraft,
    SearchHit, Task, TaskDraft, TaskPatch,
};
use crate::ports::{DashboardStore, StoreFuture};

/// Serves recorded store responses from a cassette.
///
/// Inputs are not checked against the recording; calls are matched by
/// method name and order only.
pub struct ReplayingStore {
    replayer: Option<SharedReplayer>,
}

impl ReplayingStore {
    /// Create a replaying store backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Create a replaying store with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }

    fn replay<T: DeserializeOwned + Send + 'static>(&self, method: &str) -> StoreFuture<'_, T> {
        let output = next_output(self.replayer.as_ref(), "store", method);
        Box::pin(async move { replay_result(output) })
    }
}

impl DashboardStore for ReplayingStore {
    fn list_jobs(&self) -> StoreFuture<'_, Vec<Job>> {
        self.replay("list_jobs")
    }

    fn get_job(&self, _id: &str) -> StoreFuture<'_, Option<Job>> {
        self.replay("get_job")
    }

    fn create_job(&self, _draft: &JobDraft) -> StoreFuture<'_, Job> {
        self.replay("create_job")
    }

    fn update_job(&self, _id: &str, _patch: &JobPatch) -> StoreFuture<'_, Job> {
        self.replay("update_job")
    }

    fn delete_job(&self, _id: &str) -> StoreFuture<'_, ()> {
        self.replay("delete_job")
    }

    fn list_tasks(&self, _job_id: Option<&str>) -> StoreFuture<'_, Vec<Task>> {
        self.replay("list_tasks")
    }

    fn get_task(&self, _id: &str) -> StoreFuture<'_, Option<Task>> {
        self.replay("get_task")
    }

    fn create_task(&self, _draft: &TaskDraft) -> StoreFuture<'_, Task> {
        self.replay("create_task")
    }

    fn update_task(&self, _id: &str, _patch: &TaskPatch) -> StoreFuture<'_, Task> {
        self.replay("update_task")
    }

    fn delete_task(&self, _id: &str) -> StoreFuture<'_, ()> {
        self.replay("delete_task")
    }

    fn list_owners(&self) -> StoreFuture<'_, Vec<Owner>> {
        self.replay("list_owners")
    }

    fn list_business_functions(&self) -> StoreFuture<'_, Vec<BusinessFunction>> {
        self.replay("list_business_functions")
    }

    fn list_qbos(&self) -> StoreFuture<'_, Vec<Qbo>> {
        self.replay("list_qbos")
    }

    fn create_qbo(&self, _draft: &QboDraft) -> StoreFuture<'_, Qbo> {
        self.replay("create_qbo")
    }

    fn update_qbo(&self, _id: &str, _draft: &QboDraft) -> StoreFuture<'_, Qbo> {
        self.replay("update_qbo")
    }

    fn delete_qbo(&self, _id: &str) -> StoreFuture<'_, ()> {
        self.replay("delete_qbo")
    }

    fn save_business_info(&self, _info: &BusinessInfo) -> StoreFuture<'_, ()> {
        self.replay("save_business_info")
    }

    fn search(&self, _query: &str) -> StoreFuture<'_, Vec<SearchHit>> {
        self.replay("search")
    }

    fn get_chat(&self, _user_id: &str, _chat_id: &str) -> StoreFuture<'_, Option<ChatHistory>> {
        self.replay("get_chat")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::test_support::shared;
    use crate::cassette::format::Interaction;
    use serde_json::json;

    #[tokio::test]
    async fn replays_tasks_and_missing_records() {
        let store = ReplayingStore::new(shared(vec![
            Interaction::new(
                "store",
                "get_task",
                json!({"id": "t1"}),
                json!({"Ok": {"_id": "t1", "title": "Call supplier", "completed": false}}),
            ),
            Interaction::new("store", "get_task", json!({"id": "gone"}), json!({"Ok": null})),
        ]));

        let task = store.get_task("t1").await.unwrap().unwrap();
        assert_eq!(task.title, "Call supplier");
        assert!(store.get_task("gone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replays_store_errors() {
        let store = ReplayingStore::new(shared(vec![Interaction::new(
            "store",
            "update_job",
            json!({}),
            json!({"Err": "HTTP 500 from PUT /api/jobs/j1"}),
        )]));
        let err = store.update_job("j1", &JobPatch::clear_next_task()).await.unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
    }
}
