//! Live adapter for the `DashboardStore` port: the dashboard REST API.

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::error::PortError;
use crate::model::{
    BusinessFunction, BusinessInfo, ChatHistory, Envelope, Job, JobDraft, JobPatch, Owner,
    OwnersPayload, Qbo, QboDraft, SearchHit, Task, TaskDraft, TaskPatch,
};
use crate::ports::{DashboardStore, StoreFuture};

/// REST client for the dashboard API.
///
/// Every response is a `{success, data, error}` envelope. A missing base URL
/// is reported per call so commands that never touch the store still run.
pub struct LiveStore {
    client: Client,
    base_url: Option<String>,
    token: Option<String>,
}

impl LiveStore {
    /// Creates a store client from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
        }
    }

    /// Endpoint URL under the base. Each segment is percent-encoded, so a
    /// record id never escapes its path position.
    fn url(&self, segments: &[&str]) -> Result<Url, PortError> {
        let base = self.base_url.as_deref().ok_or("OPSBOARD_API_URL is not set")?;
        let mut url = Url::parse(base)
            .map_err(|e| format!("OPSBOARD_API_URL is not a valid URL: {e}"))?;
        url.path_segments_mut()
            .map_err(|()| format!("OPSBOARD_API_URL cannot carry a path: {base}"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, PortError> {
        let builder = self.client.request(method, self.url(segments)?);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Sends the request and returns the raw status and body.
    async fn send_raw(
        builder: RequestBuilder,
        what: &str,
    ) -> Result<(StatusCode, String), PortError> {
        let response = builder.send().await.map_err(|e| format!("{what}: request failed: {e}"))?;
        let status = response.status();
        let body =
            response.text().await.map_err(|e| format!("{what}: failed to read response: {e}"))?;
        Ok((status, body))
    }

    fn failure(status: StatusCode, body: &str, what: &str) -> PortError {
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(body)
            .ok()
            .and_then(|env| env.error)
            .unwrap_or_else(|| body.trim().to_string());
        format!("{what}: HTTP {}: {message}", status.as_u16()).into()
    }

    fn decode<T: DeserializeOwned>(body: &str, what: &str) -> Result<Envelope<T>, PortError> {
        serde_json::from_str(body).map_err(|e| format!("{what}: unexpected response: {e}").into())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &str,
    ) -> Result<T, PortError> {
        let (status, body) = Self::send_raw(builder, what).await?;
        if !status.is_success() {
            return Err(Self::failure(status, &body, what));
        }
        Self::decode::<T>(&body, what)?.into_result().map_err(|e| format!("{what}: {e}").into())
    }

    async fn fetch_optional<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &str,
    ) -> Result<Option<T>, PortError> {
        let (status, body) = Self::send_raw(builder, what).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::failure(status, &body, what));
        }
        match Self::decode::<T>(&body, what)? {
            Envelope { success: true, data, .. } => Ok(data),
            Envelope { error, .. } => {
                let error = error.unwrap_or_else(|| "request failed".into());
                Err(format!("{what}: {error}").into())
            }
        }
    }

    /// For calls whose envelope may carry no payload (deletes, saves).
    async fn acknowledge(&self, builder: RequestBuilder, what: &str) -> Result<(), PortError> {
        let (status, body) = Self::send_raw(builder, what).await?;
        if !status.is_success() {
            return Err(Self::failure(status, &body, what));
        }
        if body.trim().is_empty() {
            return Ok(());
        }
        let envelope: Envelope<serde_json::Value> = Self::decode(&body, what)?;
        if envelope.success {
            Ok(())
        } else {
            let error = envelope.error.unwrap_or_else(|| "request failed".into());
            Err(format!("{what}: {error}").into())
        }
    }
}

impl DashboardStore for LiveStore {
    fn list_jobs(&self) -> StoreFuture<'_, Vec<Job>> {
        Box::pin(async move {
            let builder = self.request(Method::GET, &["api", "jobs"])?;
            self.fetch(builder, "list jobs").await
        })
    }

    fn get_job(&self, id: &str) -> StoreFuture<'_, Option<Job>> {
        let id = id.to_string();
        Box::pin(async move {
            let builder = self.request(Method::GET, &["api", "jobs", &id])?;
            self.fetch_optional(builder, "get job").await
        })
    }

    fn create_job(&self, draft: &JobDraft) -> StoreFuture<'_, Job> {
        let draft = draft.clone();
        Box::pin(async move {
            let builder = self.request(Method::POST, &["api", "jobs"])?.json(&draft);
            self.fetch(builder, "create job").await
        })
    }

    fn update_job(&self, id: &str, patch: &JobPatch) -> StoreFuture<'_, Job> {
        let id = id.to_string();
        let patch = patch.clone();
        Box::pin(async move {
            let builder = self.request(Method::PUT, &["api", "jobs", &id])?.json(&patch);
            self.fetch(builder, "update job").await
        })
    }

    fn delete_job(&self, id: &str) -> StoreFuture<'_, ()> {
        let id = id.to_string();
        Box::pin(async move {
            let builder = self.request(Method::DELETE, &["api", "jobs", &id])?;
            self.acknowledge(builder, "delete job").await
        })
    }

    fn list_tasks(&self, job_id: Option<&str>) -> StoreFuture<'_, Vec<Task>> {
        let job_id = job_id.map(str::to_string);
        Box::pin(async move {
            let mut builder = self.request(Method::GET, &["api", "tasks"])?;
            if let Some(job_id) = &job_id {
                builder = builder.query(&[("jobId", job_id)]);
            }
            self.fetch(builder, "list tasks").await
        })
    }

    fn get_task(&self, id: &str) -> StoreFuture<'_, Option<Task>> {
        let id = id.to_string();
        Box::pin(async move {
            let builder = self.request(Method::GET, &["api", "tasks", &id])?;
            self.fetch_optional(builder, "get task").await
        })
    }

    fn create_task(&self, draft: &TaskDraft) -> StoreFuture<'_, Task> {
        let draft = draft.clone();
        Box::pin(async move {
            let builder = self.request(Method::POST, &["api", "tasks"])?.json(&draft);
            self.fetch(builder, "create task").await
        })
    }

    fn update_task(&self, id: &str, patch: &TaskPatch) -> StoreFuture<'_, Task> {
        let id = id.to_string();
        let patch = patch.clone();
        Box::pin(async move {
            let builder = self.request(Method::PUT, &["api", "tasks", &id])?.json(&patch);
            self.fetch(builder, "update task").await
        })
    }

    fn delete_task(&self, id: &str) -> StoreFuture<'_, ()> {
        let id = id.to_string();
        Box::pin(async move {
            let builder = self.request(Method::DELETE, &["api", "tasks", &id])?;
            self.acknowledge(builder, "delete task").await
        })
    }

    fn list_owners(&self) -> StoreFuture<'_, Vec<Owner>> {
        Box::pin(async move {
            let what = "list owners";
            let builder = self.request(Method::GET, &["api", "owners"])?;
            let (status, body) = Self::send_raw(builder, what).await?;
            if !status.is_success() {
                return Err(Self::failure(status, &body, what));
            }
            let payload: OwnersPayload = serde_json::from_str(&body)
                .map_err(|e| format!("{what}: unexpected response: {e}"))?;
            let owners = payload.into_owners().map_err(|e| format!("{what}: {e}"))?;
            Ok::<_, PortError>(owners)
        })
    }

    fn list_business_functions(&self) -> StoreFuture<'_, Vec<BusinessFunction>> {
        Box::pin(async move {
            let builder = self.request(Method::GET, &["api", "business-functions"])?;
            self.fetch(builder, "list business functions").await
        })
    }

    fn list_qbos(&self) -> StoreFuture<'_, Vec<Qbo>> {
        Box::pin(async move {
            let builder = self.request(Method::GET, &["api", "qbos"])?;
            self.fetch(builder, "list QBOs").await
        })
    }

    fn create_qbo(&self, draft: &QboDraft) -> StoreFuture<'_, Qbo> {
        let draft = draft.clone();
        Box::pin(async move {
            let builder = self.request(Method::POST, &["api", "qbos"])?.json(&draft);
            self.fetch(builder, "create QBO").await
        })
    }

    fn update_qbo(&self, id: &str, draft: &QboDraft) -> StoreFuture<'_, Qbo> {
        let id = id.to_string();
        let draft = draft.clone();
        Box::pin(async move {
            let builder = self.request(Method::PUT, &["api", "qbos", &id])?.json(&draft);
            self.fetch(builder, "update QBO").await
        })
    }

    fn delete_qbo(&self, id: &str) -> StoreFuture<'_, ()> {
        let id = id.to_string();
        Box::pin(async move {
            let builder = self.request(Method::DELETE, &["api", "qbos", &id])?;
            self.acknowledge(builder, "delete QBO").await
        })
    }

    fn save_business_info(&self, info: &BusinessInfo) -> StoreFuture<'_, ()> {
        let info = info.clone();
        Box::pin(async move {
            let builder = self.request(Method::POST, &["api", "business-info"])?.json(&info);
            self.acknowledge(builder, "save business info").await
        })
    }

    fn search(&self, query: &str) -> StoreFuture<'_, Vec<SearchHit>> {
        let query = query.to_string();
        Box::pin(async move {
            let builder =
                self.request(Method::GET, &["api", "search"])?.query(&[("query", &query)]);
            // The search endpoint omits `data` when nothing matched.
            let hits: Option<Vec<SearchHit>> = self.fetch_optional(builder, "search").await?;
            Ok::<_, PortError>(hits.unwrap_or_default())
        })
    }

    // The API resolves the caller from the bearer token, so `user_id` is not sent.
    fn get_chat(&self, _user_id: &str, chat_id: &str) -> StoreFuture<'_, Option<ChatHistory>> {
        let chat_id = chat_id.to_string();
        Box::pin(async move {
            let builder = self.request(Method::GET, &["api", "chat-history", &chat_id])?;
            self.fetch_optional(builder, "get chat history").await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base: &str) -> LiveStore {
        LiveStore::from_config(&AppConfig {
            api_base_url: Some(base.to_string()),
            ..AppConfig::default()
        })
    }

    #[tokio::test]
    async fn missing_base_url_fails_each_call() {
        let store = LiveStore::from_config(&AppConfig::default());
        let err = store.list_jobs().await.unwrap_err();
        assert!(err.to_string().contains("OPSBOARD_API_URL"));
    }

    #[test]
    fn ids_are_encoded_as_one_path_segment() {
        let url = store("https://dash.example.com").url(&["api", "tasks", "a/b?c"]).unwrap();
        assert_eq!(url.as_str(), "https://dash.example.com/api/tasks/a%2Fb%3Fc");
    }

    #[test]
    fn base_path_is_kept() {
        let url = store("https://dash.example.com/v1").url(&["api", "jobs", "j1"]).unwrap();
        assert_eq!(url.as_str(), "https://dash.example.com/v1/api/jobs/j1");
    }

    #[test]
    fn decodes_task_payload() {
        let body = r#"{"success": true, "data": {"_id": "t1", "title": "Email leads"}}"#;
        let envelope: Envelope<Task> = LiveStore::decode(body, "get task").unwrap();
        assert_eq!(envelope.into_result().unwrap().id, "t1");

        let err = LiveStore::decode::<Task>("<html>", "get task").unwrap_err();
        assert!(err.to_string().starts_with("get task: unexpected response"));
    }

    #[test]
    fn failure_prefers_envelope_message() {
        let err = LiveStore::failure(
            StatusCode::UNAUTHORIZED,
            r#"{"success": false, "error": "Unauthorized"}"#,
            "list jobs",
        );
        assert_eq!(err.to_string(), "list jobs: HTTP 401: Unauthorized");
    }

    #[test]
    fn failure_falls_back_to_body_text() {
        let err = LiveStore::failure(StatusCode::BAD_GATEWAY, "upstream down\n", "list QBOs");
        assert_eq!(err.to_string(), "list QBOs: HTTP 502: upstream down");
    }
}
