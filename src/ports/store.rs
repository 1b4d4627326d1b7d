//! Data store port: the REST API that owns every dashboard record.
//!
//! The store is the sole source of truth. Nothing here caches; view state
//! lives in the dashboard layer for the length of one session.

use std::future::Future;
use std::pin::Pin;

use crate::error::PortError;
use crate::model::{
    BusinessFunction, BusinessInfo, ChatHistory, Job, JobDraft, JobPatch, Owner, Qbo, QboDraft,
    SearchHit, Task, TaskDraft, TaskPatch,
};

/// Boxed future returned by every store call.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PortError>> + Send + 'a>>;

/// Reads and writes dashboard records.
///
/// Lookups of a single record return `Ok(None)` when the record does not
/// exist; only transport or server failures are errors.
pub trait DashboardStore: Send + Sync {
    /// `GET /api/jobs`
    fn list_jobs(&self) -> StoreFuture<'_, Vec<Job>>;

    /// `GET /api/jobs/{id}`
    fn get_job(&self, id: &str) -> StoreFuture<'_, Option<Job>>;

    /// `POST /api/jobs`
    fn create_job(&self, draft: &JobDraft) -> StoreFuture<'_, Job>;

    /// `PUT /api/jobs/{id}`
    fn update_job(&self, id: &str, patch: &JobPatch) -> StoreFuture<'_, Job>;

    /// `DELETE /api/jobs/{id}`
    fn delete_job(&self, id: &str) -> StoreFuture<'_, ()>;

    /// `GET /api/tasks`, optionally narrowed to one job.
    fn list_tasks(&self, job_id: Option<&str>) -> StoreFuture<'_, Vec<Task>>;

    /// `GET /api/tasks/{id}`
    fn get_task(&self, id: &str) -> StoreFuture<'_, Option<Task>>;

    /// `POST /api/tasks`
    fn create_task(&self, draft: &TaskDraft) -> StoreFuture<'_, Task>;

    /// `PUT /api/tasks/{id}`
    fn update_task(&self, id: &str, patch: &TaskPatch) -> StoreFuture<'_, Task>;

    /// `DELETE /api/tasks/{id}`
    fn delete_task(&self, id: &str) -> StoreFuture<'_, ()>;

    /// `GET /api/owners`
    fn list_owners(&self) -> StoreFuture<'_, Vec<Owner>>;

    /// `GET /api/business-functions`
    fn list_business_functions(&self) -> StoreFuture<'_, Vec<BusinessFunction>>;

    /// `GET /api/qbos`
    fn list_qbos(&self) -> StoreFuture<'_, Vec<Qbo>>;

    /// `POST /api/qbos`
    fn create_qbo(&self, draft: &QboDraft) -> StoreFuture<'_, Qbo>;

    /// `PUT /api/qbos/{id}`
    fn update_qbo(&self, id: &str, draft: &QboDraft) -> StoreFuture<'_, Qbo>;

    /// `DELETE /api/qbos/{id}`
    fn delete_qbo(&self, id: &str) -> StoreFuture<'_, ()>;

    /// `POST /api/business-info`
    fn save_business_info(&self, info: &BusinessInfo) -> StoreFuture<'_, ()>;

    /// `GET /api/search?query=...`
    fn search(&self, query: &str) -> StoreFuture<'_, Vec<SearchHit>>;

    /// `GET /api/chat-history/{id}` for the given caller.
    fn get_chat(&self, user_id: &str, chat_id: &str) -> StoreFuture<'_, Option<ChatHistory>>;
}
