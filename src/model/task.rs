//! Tasks: the actionable steps inside a job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dates;

/// A task record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store identifier.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    /// Display title.
    pub title: String,
    /// Parent job, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Owner id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
    /// How much focus the task demands (free-form level label).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_level: Option<String>,
    /// How enjoyable the task is (free-form level label).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joy_level: Option<String>,
    /// Estimated effort in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_hours: Option<f64>,
    /// Due date.
    #[serde(
        default,
        deserialize_with = "dates::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<DateTime<Utc>>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Longer notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Task {
    /// Creates a bare open task.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            job_id: None,
            owner: None,
            completed: false,
            focus_level: None,
            joy_level: None,
            required_hours: None,
            date: None,
            tags: Vec::new(),
            notes: None,
        }
    }

    /// Applies a partial update in place, mirroring what the store does.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(job) = &patch.job_id {
            self.job_id.clone_from(job);
        }
        if let Some(owner) = &patch.owner {
            self.owner.clone_from(owner);
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(focus) = &patch.focus_level {
            self.focus_level.clone_from(focus);
        }
        if let Some(joy) = &patch.joy_level {
            self.joy_level.clone_from(joy);
        }
        if let Some(hours) = patch.required_hours {
            self.required_hours = hours;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(tags) = &patch.tags {
            self.tags.clone_from(tags);
        }
        if let Some(notes) = &patch.notes {
            self.notes.clone_from(notes);
        }
    }

    /// Notes text for the notes dialog, with the standard placeholder.
    #[must_use]
    pub fn notes_or_placeholder(&self) -> &str {
        self.notes
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("No notes available for this task.")
    }
}

/// Fields submitted by the create-task dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Task title (required).
    pub title: String,
    /// Parent job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Owner id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Focus level label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_level: Option<String>,
    /// Joy level label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joy_level: Option<String>,
    /// Estimated hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_hours: Option<f64>,
    /// Due date.
    #[serde(
        default,
        deserialize_with = "dates::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<DateTime<Utc>>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A partial task update; `Some(None)` clears a field.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New parent job, or clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Option<String>>,
    /// New owner, or clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Option<String>>,
    /// Completion toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// New focus level, or clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_level: Option<Option<String>>,
    /// New joy level, or clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joy_level: Option<Option<String>>,
    /// New estimate, or clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_hours: Option<Option<f64>>,
    /// New due date, or clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Option<DateTime<Utc>>>,
    /// Replacement tag list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New notes, or clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl TaskPatch {
    /// `{"completed": <value>}`
    #[must_use]
    pub fn completion(completed: bool) -> Self {
        Self { completed: Some(completed), ..Self::default() }
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
    fn deserializes_api_shape_with_missing_optionals() {
        let task: Task = serde_json::from_str(
            r#"{"_id": "t1", "title": "Call supplier", "jobId": "j1", "requiredHours": 1.5,
                "date": "2025-02-10T00:00:00.000Z", "tags": ["ops"]}"#,
        )
        .unwrap();
        assert_eq!(task.id, "t1");
        assert_eq!(task.job_id.as_deref(), Some("j1"));
        assert_eq!(task.required_hours, Some(1.5));
        assert!(!task.completed);
        assert!(task.focus_level.is_none());
        assert_eq!(task.tags, vec!["ops"]);
    }

    #[test]
    fn completion_patch_serializes_minimal_body() {
        let body = serde_json::to_value(TaskPatch::completion(true)).unwrap();
        assert_eq!(body, serde_json::json!({"completed": true}));
    }

    #[test]
    fn apply_merges_patch() {
        let mut task = Task::new("t1", "Draft invoice");
        task.notes = Some("old".into());
        let patch = TaskPatch {
            title: Some("Send invoice".into()),
            notes: Some(None),
            required_hours: Some(Some(2.0)),
            ..TaskPatch::default()
        };
        task.apply(&patch);
        assert_eq!(task.title, "Send invoice");
        assert_eq!(task.notes, None);
        assert_eq!(task.required_hours, Some(2.0));
    }

    #[test]
    fn notes_placeholder() {
        let task = Task::new("t1", "x");
        assert_eq!(task.notes_or_placeholder(), "No notes available for this task.");
    }
}
