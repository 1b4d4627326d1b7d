//! Recording adapter for the `DashboardStore` port.

use serde_json::json;

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::model::{
    BusinessFunction, BusinessInfo, ChatHistory, Job, JobDraft, JobPatch, Owner, Qbo, QboDraft,
    SearchHit, Task, TaskDraft, TaskPatch,
};
use crate::ports::{DashboardStore, StoreFuture};

/// Records store calls while delegating to an inner implementation.
pub struct RecordingStore {
    inner: Box<dyn DashboardStore>,
    recorder: SharedRecorder,
}

impl RecordingStore {
    /// Creates a new recording store wrapping the given implementation.
    pub fn new(inner: Box<dyn DashboardStore>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl DashboardStore for RecordingStore {
    fn list_jobs(&self) -> StoreFuture<'_, Vec<Job>> {
        Box::pin(async move {
            let result = self.inner.list_jobs().await;
            record_result(&self.recorder, "store", "list_jobs", &(), &result);
            result
        })
    }

    fn get_job(&self, id: &str) -> StoreFuture<'_, Option<Job>> {
        let id = id.to_string();
        Box::pin(async move {
            let result = self.inner.get_job(&id).await;
            record_result(&self.recorder, "store", "get_job", &json!({ "id": id }), &result);
            result
        })
    }

    fn create_job(&self, draft: &JobDraft) -> StoreFuture<'_, Job> {
        let draft = draft.clone();
        Box::pin(async move {
            let result = self.inner.create_job(&draft).await;
            record_result(&self.recorder, "store", "create_job", &draft, &result);
            result
        })
    }

    fn update_job(&self, id: &str, patch: &JobPatch) -> StoreFuture<'_, Job> {
        let id = id.to_string();
        let patch = patch.clone();
        Box::pin(async move {
            let result = self.inner.update_job(&id, &patch).await;
            let input = json!({ "id": id, "patch": patch });
            record_result(&self.recorder, "store", "update_job", &input, &result);
            result
        })
    }

    fn delete_job(&self, id: &str) -> StoreFuture<'_, ()> {
        let id = id.to_string();
        Box::pin(async move {
            let result = self.inner.delete_job(&id).await;
            record_result(&self.recorder, "store", "delete_job", &json!({ "id": id }), &result);
            result
        })
    }

    fn list_tasks(&self, job_id: Option<&str>) -> StoreFuture<'_, Vec<Task>> {
        let job_id = job_id.map(str::to_string);
        Box::pin(async move {
            let result = self.inner.list_tasks(job_id.as_deref()).await;
            let input = json!({ "job_id": job_id });
            record_result(&self.recorder, "store", "list_tasks", &input, &result);
            result
        })
    }

    fn get_task(&self, id: &str) -> StoreFuture<'_, Option<Task>> {
        let id = id.to_string();
        Box::pin(async move {
            let result = self.inner.get_task(&id).await;
            record_result(&self.recorder, "store", "get_task", &json!({ "id": id }), &result);
            result
        })
    }

    fn create_task(&self, draft: &TaskDraft) -> StoreFuture<'_, Task> {
        let draft = draft.clone();
        Box::pin(async move {
            let result = self.inner.create_task(&draft).await;
            record_result(&self.recorder, "store", "create_task", &draft, &result);
            result
        })
    }

    fn update_task(&self, id: &str, patch: &TaskPatch) -> StoreFuture<'_, Task> {
        let id = id.to_string();
        let patch = patch.clone();
        Box::pin(async move {
            let result = self.inner.update_task(&id, &patch).await;
            let input = json!({ "id": id, "patch": patch });
            record_result(&self.recorder, "store", "update_task", &input, &result);
            result
        })
    }

    fn delete_task(&self, id: &str) -> StoreFuture<'_, ()> {
        let id = id.to_string();
        Box::pin(async move {
            let result = self.inner.delete_task(&id).await;
            record_result(&self.recorder, "store", "delete_task", &json!({ "id": id }), &result);
            result
        })
    }

    fn list_owners(&self) -> StoreFuture<'_, Vec<Owner>> {
        Box::pin(async move {
            let result = self.inner.list_owners().await;
            record_result(&self.recorder, "store", "list_owners", &(), &result);
            result
        })
    }

    fn list_business_functions(&self) -> StoreFuture<'_, Vec<BusinessFunction>> {
        Box::pin(async move {
            let result = self.inner.list_business_functions().await;
            record_result(&self.recorder, "store", "list_business_functions", &(), &result);
            result
        })
    }

    fn list_qbos(&self) -> StoreFuture<'_, Vec<Qbo>> {
        Box::pin(async move {
            let result = self.inner.list_qbos().await;
            record_result(&self.recorder, "store", "list_qbos", &(), &result);
            result
        })
    }

    fn create_qbo(&self, draft: &QboDraft) -> StoreFuture<'_, Qbo> {
        let draft = draft.clone();
        Box::pin(async move {
            let result = self.inner.create_qbo(&draft).await;
            record_result(&self.recorder, "store", "create_qbo", &draft, &result);
            result
        })
    }

    fn update_qbo(&self, id: &str, draft: &QboDraft) -> StoreFuture<'_, Qbo> {
        let id = id.to_string();
        let draft = draft.clone();
        Box::pin(async move {
            let result = self.inner.update_qbo(&id, &draft).await;
            let input = json!({ "id": id, "draft": draft });
            record_result(&self.recorder, "store", "update_qbo", &input, &result);
            result
        })
    }

    fn delete_qbo(&self, id: &str) -> StoreFuture<'_, ()> {
        let id = id.to_string();
        Box::pin(async move {
            let result = self.inner.delete_qbo(&id).await;
            record_result(&self.recorder, "store", "delete_qbo", &json!({ "id": id }), &result);
            result
        })
    }

    fn save_business_info(&self, info: &BusinessInfo) -> StoreFuture<'_, ()> {
        let info = info.clone();
        Box::pin(async move {
            let result = self.inner.save_business_info(&info).await;
            record_result(&self.recorder, "store", "save_business_info", &info, &result);
            result
        })
    }

    fn search(&self, query: &str) -> StoreFuture<'_, Vec<SearchHit>> {
        let query = query.to_string();
        Box::pin(async move {
            let result = self.inner.search(&query).await;
            record_result(&self.recorder, "store", "search", &json!({ "query": query }), &result);
            result
        })
    }

    fn get_chat(&self, user_id: &str, chat_id: &str) -> StoreFuture<'_, Option<ChatHistory>> {
        let user_id = user_id.to_string();
        let chat_id = chat_id.to_string();
        Box::pin(async move {
            let result = self.inner.get_chat(&user_id, &chat_id).await;
            let input = json!({ "user_id": user_id, "chat_id": chat_id });
            record_result(&self.recorder, "store", "get_chat", &input, &result);
            result
        })
    }
}
