//! Jobs: units of work that group tasks and point at their next step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dates;

/// A job record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Store identifier.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    /// Display title.
    pub title: String,
    /// Owner id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Business-function reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_function_id: Option<String>,
    /// Business-function display name, when the API has already joined it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_function_name: Option<String>,
    /// Due date.
    #[serde(
        default,
        deserialize_with = "dates::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<DateTime<Utc>>,
    /// The task currently designated as this job's immediate next step.
    ///
    /// A weak reference: nothing prevents it from pointing at a completed or
    /// deleted task, the cascade clears it after the fact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_task_id: Option<String>,
}

impl Job {
    /// Creates a bare job with only an id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            owner: None,
            business_function_id: None,
            business_function_name: None,
            due_date: None,
            next_task_id: None,
        }
    }

    /// Applies a partial update in place, mirroring what the store does.
    pub fn apply(&mut self, patch: &JobPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(owner) = &patch.owner {
            self.owner.clone_from(owner);
        }
        if let Some(function) = &patch.business_function_id {
            self.business_function_id.clone_from(function);
        }
        if let Some(due) = &patch.due_date {
            self.due_date = *due;
        }
        if let Some(next) = &patch.next_task_id {
            self.next_task_id.clone_from(next);
        }
    }
}

/// Fields submitted by the create-job dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    /// Job title (required).
    pub title: String,
    /// Owner id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Business-function reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_function_id: Option<String>,
    /// Due date.
    #[serde(
        default,
        deserialize_with = "dates::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<DateTime<Utc>>,
}

/// A partial job update.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears it and is sent
/// as JSON `null`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New owner, or clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Option<String>>,
    /// New business function, or clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_function_id: Option<Option<String>>,
    /// New due date, or clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// New next task, or clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_task_id: Option<Option<String>>,
}

impl JobPatch {
    /// The patch the cascade sends: `{"nextTaskId": null}`.
    #[must_use]
    pub fn clear_next_task() -> Self {
        Self { next_task_id: Some(None), ..Self::default() }
    }

    /// True when the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_api_shape() {
        let job: Job = serde_json::from_str(
            r#"{"_id": "j1", "title": "Ship v2", "businessFunctionId": "bf1",
                "dueDate": "2025-04-01", "nextTaskId": "t9"}"#,
        )
        .unwrap();
        assert_eq!(job.id, "j1");
        assert_eq!(job.business_function_id.as_deref(), Some("bf1"));
        assert_eq!(job.next_task_id.as_deref(), Some("t9"));
        assert!(job.due_date.is_some());
    }

    #[test]
    fn clear_next_task_serializes_as_null() {
        let body = serde_json::to_value(JobPatch::clear_next_task()).unwrap();
        assert_eq!(body, serde_json::json!({"nextTaskId": null}));
    }

    #[test]
    fn empty_patch_sends_no_fields() {
        let body = serde_json::to_value(JobPatch::default()).unwrap();
        assert_eq!(body, serde_json::json!({}));
        assert!(JobPatch::default().is_empty());
        assert!(!JobPatch::clear_next_task().is_empty());
    }

    #[test]
    fn apply_clears_only_next_task() {
        let mut job = Job::new("j1", "Ship v2");
        job.owner = Some("o1".into());
        job.next_task_id = Some("t1".into());
        let before = job.clone();

        job.apply(&JobPatch::clear_next_task());

        assert_eq!(job.next_task_id, None);
        assert_eq!(job.owner, before.owner);
        assert_eq!(job.title, before.title);
    }
}
