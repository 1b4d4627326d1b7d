//! In-memory `DashboardStore` used by tests and offline runs.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::PortError;
use crate::model::dates;
use crate::model::{
    BusinessFunction, BusinessInfo, ChatHistory, Job, JobDraft, JobPatch, Owner, Qbo, QboDraft,
    SearchHit, Task, TaskDraft, TaskPatch,
};
use crate::ports::{DashboardStore, StoreFuture};

#[derive(Default)]
struct State {
    jobs: BTreeMap<String, Job>,
    tasks: BTreeMap<String, Task>,
    owners: Vec<Owner>,
    functions: Vec<BusinessFunction>,
    qbos: BTreeMap<String, Qbo>,
    business_info: Option<BusinessInfo>,
    chats: Vec<ChatHistory>,
    next_id: u64,
    failures: HashSet<String>,
    calls: Vec<String>,
}

impl State {
    /// Logs the call and fails it if `method` or `method:id` was armed.
    fn enter(&mut self, method: &str, id: Option<&str>) -> Result<(), PortError> {
        let key = id.map_or_else(|| method.to_string(), |id| format!("{method}:{id}"));
        let armed = self.failures.contains(method) || self.failures.contains(&key);
        self.calls.push(key.clone());
        if armed {
            return Err(format!("simulated store failure: {key}").into());
        }
        Ok(())
    }

    fn allocate(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

fn ready<T: Send + 'static>(result: Result<T, PortError>) -> StoreFuture<'static, T> {
    Box::pin(std::future::ready(result))
}

fn parse_deadline(raw: Option<&str>) -> Option<chrono::DateTime<chrono::Utc>> {
    raw.and_then(dates::parse_flexible)
}

/// A store that keeps every record in process memory.
///
/// Calls are logged as `method` or `method:id`, and any such key can be armed
/// to fail, which lets tests exercise partial failures.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or replaces a job.
    pub fn insert_job(&self, job: Job) {
        self.state().jobs.insert(job.id.clone(), job);
    }

    /// Inserts or replaces a task.
    pub fn insert_task(&self, task: Task) {
        self.state().tasks.insert(task.id.clone(), task);
    }

    /// Adds an owner.
    pub fn insert_owner(&self, owner: Owner) {
        self.state().owners.push(owner);
    }

    /// Adds a business function.
    pub fn insert_business_function(&self, function: BusinessFunction) {
        self.state().functions.push(function);
    }

    /// Inserts or replaces a QBO.
    pub fn insert_qbo(&self, qbo: Qbo) {
        self.state().qbos.insert(qbo.id.clone(), qbo);
    }

    /// Adds a stored chat.
    pub fn insert_chat(&self, chat: ChatHistory) {
        self.state().chats.push(chat);
    }

    /// Makes every later call matching `key` (`method` or `method:id`) fail.
    pub fn fail_on(&self, key: impl Into<String>) {
        self.state().failures.insert(key.into());
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Current copy of a job.
    #[must_use]
    pub fn job(&self, id: &str) -> Option<Job> {
        self.state().jobs.get(id).cloned()
    }

    /// Current copy of a task.
    #[must_use]
    pub fn task(&self, id: &str) -> Option<Task> {
        self.state().tasks.get(id).cloned()
    }

    /// Current copy of a QBO.
    #[must_use]
    pub fn qbo(&self, id: &str) -> Option<Qbo> {
        self.state().qbos.get(id).cloned()
    }

    /// The last saved business profile.
    #[must_use]
    pub fn business_info(&self) -> Option<BusinessInfo> {
        self.state().business_info.clone()
    }
}

impl DashboardStore for MemoryStore {
    fn list_jobs(&self) -> StoreFuture<'_, Vec<Job>> {
        let mut state = self.state();
        ready(state.enter("list_jobs", None).map(|()| state.jobs.values().cloned().collect()))
    }

    fn get_job(&self, id: &str) -> StoreFuture<'_, Option<Job>> {
        let mut state = self.state();
        ready(state.enter("get_job", Some(id)).map(|()| state.jobs.get(id).cloned()))
    }

    fn create_job(&self, draft: &JobDraft) -> StoreFuture<'_, Job> {
        let mut state = self.state();
        let result = state.enter("create_job", None).map(|()| {
            let mut job = Job::new(state.allocate("job"), draft.title.clone());
            job.owner.clone_from(&draft.owner);
            job.business_function_id.clone_from(&draft.business_function_id);
            job.due_date = draft.due_date;
            state.jobs.insert(job.id.clone(), job.clone());
            job
        });
        ready(result)
    }

    fn update_job(&self, id: &str, patch: &JobPatch) -> StoreFuture<'_, Job> {
        let mut state = self.state();
        let result = state.enter("update_job", Some(id)).and_then(|()| {
            let job = state.jobs.get_mut(id).ok_or_else(|| format!("job {id} not found"))?;
            job.apply(patch);
            Ok(job.clone())
        });
        ready(result)
    }

    fn delete_job(&self, id: &str) -> StoreFuture<'_, ()> {
        let mut state = self.state();
        let result = state.enter("delete_job", Some(id)).map(|()| {
            state.jobs.remove(id);
        });
        ready(result)
    }

    fn list_tasks(&self, job_id: Option<&str>) -> StoreFuture<'_, Vec<Task>> {
        let mut state = self.state();
        let result = state.enter("list_tasks", job_id).map(|()| {
            state
                .tasks
                .values()
                .filter(|task| job_id.is_none() || task.job_id.as_deref() == job_id)
                .cloned()
                .collect()
        });
        ready(result)
    }

    fn get_task(&self, id: &str) -> StoreFuture<'_, Option<Task>> {
        let mut state = self.state();
        ready(state.enter("get_task", Some(id)).map(|()| state.tasks.get(id).cloned()))
    }

    fn create_task(&self, draft: &TaskDraft) -> StoreFuture<'_, Task> {
        let mut state = self.state();
        let result = state.enter("create_task", None).map(|()| {
            let task = Task {
                job_id: draft.job_id.clone(),
                owner: draft.owner.clone(),
                focus_level: draft.focus_level.clone(),
                joy_level: draft.joy_level.clone(),
                required_hours: draft.required_hours,
                date: draft.date,
                tags: draft.tags.clone(),
                notes: draft.notes.clone(),
                ..Task::new(state.allocate("task"), draft.title.clone())
            };
            state.tasks.insert(task.id.clone(), task.clone());
            task
        });
        ready(result)
    }

    fn update_task(&self, id: &str, patch: &TaskPatch) -> StoreFuture<'_, Task> {
        let mut state = self.state();
        let result = state.enter("update_task", Some(id)).and_then(|()| {
            let task = state.tasks.get_mut(id).ok_or_else(|| format!("task {id} not found"))?;
            task.apply(patch);
            Ok(task.clone())
        });
        ready(result)
    }

    fn delete_task(&self, id: &str) -> StoreFuture<'_, ()> {
        let mut state = self.state();
        let result = state.enter("delete_task", Some(id)).map(|()| {
            state.tasks.remove(id);
        });
        ready(result)
    }

    fn list_owners(&self) -> StoreFuture<'_, Vec<Owner>> {
        let mut state = self.state();
        ready(state.enter("list_owners", None).map(|()| state.owners.clone()))
    }

    fn list_business_functions(&self) -> StoreFuture<'_, Vec<BusinessFunction>> {
        let mut state = self.state();
        ready(state.enter("list_business_functions", None).map(|()| state.functions.clone()))
    }

    fn list_qbos(&self) -> StoreFuture<'_, Vec<Qbo>> {
        let mut state = self.state();
        ready(state.enter("list_qbos", None).map(|()| state.qbos.values().cloned().collect()))
    }

    fn create_qbo(&self, draft: &QboDraft) -> StoreFuture<'_, Qbo> {
        let mut state = self.state();
        let result = state.enter("create_qbo", None).map(|()| {
            let qbo = Qbo {
                id: state.allocate("qbo"),
                name: draft.name.clone(),
                unit: draft.unit.clone(),
                beginning_value: draft.beginning_value,
                current_value: draft.current_value,
                target_value: draft.target_value,
                deadline: parse_deadline(draft.deadline.as_deref()),
                points: draft.points,
                user_id: None,
                notes: draft.notes.clone(),
            };
            state.qbos.insert(qbo.id.clone(), qbo.clone());
            qbo
        });
        ready(result)
    }

    fn update_qbo(&self, id: &str, draft: &QboDraft) -> StoreFuture<'_, Qbo> {
        let mut state = self.state();
        let result = state.enter("update_qbo", Some(id)).and_then(|()| {
            let qbo = state.qbos.get_mut(id).ok_or_else(|| format!("QBO {id} not found"))?;
            qbo.name.clone_from(&draft.name);
            qbo.unit.clone_from(&draft.unit);
            qbo.beginning_value = draft.beginning_value;
            qbo.current_value = draft.current_value;
            qbo.target_value = draft.target_value;
            qbo.deadline = parse_deadline(draft.deadline.as_deref());
            qbo.points = draft.points;
            qbo.notes.clone_from(&draft.notes);
            Ok(qbo.clone())
        });
        ready(result)
    }

    fn delete_qbo(&self, id: &str) -> StoreFuture<'_, ()> {
        let mut state = self.state();
        let result = state.enter("delete_qbo", Some(id)).map(|()| {
            state.qbos.remove(id);
        });
        ready(result)
    }

    fn save_business_info(&self, info: &BusinessInfo) -> StoreFuture<'_, ()> {
        let mut state = self.state();
        let result = state.enter("save_business_info", None).map(|()| {
            state.business_info = Some(info.clone());
        });
        ready(result)
    }

    fn search(&self, query: &str) -> StoreFuture<'_, Vec<SearchHit>> {
        let mut state = self.state();
        let needle = query.to_lowercase();
        let result = state.enter("search", None).map(|()| {
            let hit = |id: &str, kind: &str, title: Option<&str>, name: Option<&str>| SearchHit {
                id: id.to_string(),
                kind: Some(kind.to_string()),
                title: title.map(str::to_string),
                name: name.map(str::to_string),
                extra: serde_json::Map::new(),
            };
            let jobs = state
                .jobs
                .values()
                .filter(|job| job.title.to_lowercase().contains(&needle))
                .map(|job| hit(&job.id, "job", Some(&job.title), None));
            let tasks = state
                .tasks
                .values()
                .filter(|task| task.title.to_lowercase().contains(&needle))
                .map(|task| hit(&task.id, "task", Some(&task.title), None));
            let qbos = state
                .qbos
                .values()
                .filter(|qbo| qbo.name.to_lowercase().contains(&needle))
                .map(|qbo| hit(&qbo.id, "qbo", None, Some(&qbo.name)));
            jobs.chain(tasks).chain(qbos).collect()
        });
        ready(result)
    }

    fn get_chat(&self, user_id: &str, chat_id: &str) -> StoreFuture<'_, Option<ChatHistory>> {
        let mut state = self.state();
        let result = state.enter("get_chat", Some(chat_id)).map(|()| {
            state.chats.iter().find(|c| c.id == chat_id && c.user_id == user_id).cloned()
        });
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn armed_failures_only_hit_matching_ids() {
        let store = MemoryStore::new();
        store.insert_job(Job::new("j1", "A"));
        store.insert_job(Job::new("j2", "B"));
        store.fail_on("update_job:j1");

        assert!(store.update_job("j1", &JobPatch::clear_next_task()).await.is_err());
        assert!(store.update_job("j2", &JobPatch::clear_next_task()).await.is_ok());
        assert_eq!(store.calls(), vec!["update_job:j1", "update_job:j2"]);
    }

    #[tokio::test]
    async fn create_assigns_ids_and_list_filters_by_job() {
        let store = MemoryStore::new();
        let draft = TaskDraft {
            title: "Write brief".into(),
            job_id: Some("j1".into()),
            ..TaskDraft::default()
        };
        let created = store.create_task(&draft).await.unwrap();
        store.insert_task(Task::new("other", "Unrelated"));

        assert!(created.id.starts_with("task-"));
        let tasks = store.list_tasks(Some("j1")).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Write brief");
    }

    #[tokio::test]
    async fn chats_are_scoped_to_their_owner() {
        let store = MemoryStore::new();
        store.insert_chat(ChatHistory { id: "c1".into(), user_id: "u1".into(), messages: vec![] });

        assert!(store.get_chat("u1", "c1").await.unwrap().is_some());
        assert!(store.get_chat("u2", "c1").await.unwrap().is_none());
    }
}
