//! Turning command-line field flags into drafts and patches.
//!
//! For optional record fields an empty flag value means "clear".

use chrono::{DateTime, Utc};

use crate::cli::{JobFields, QboFields, TaskFields};
use crate::dashboard::QboForm;
use crate::model::dates;
use crate::model::{JobDraft, JobPatch, TaskDraft, TaskPatch};

fn clearable(raw: Option<&String>) -> Option<Option<String>> {
    raw.map(|value| Some(value.trim().to_string()).filter(|v| !v.is_empty()))
}

fn hours(raw: Option<&String>) -> Result<Option<Option<f64>>, String> {
    let Some(raw) = raw.map(|r| r.trim()) else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(Some(None));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|h| h.is_finite() && *h >= 0.0)
        .map(|h| Some(Some(h)))
        .ok_or_else(|| format!("--hours must be a non-negative number, got {raw:?}"))
}

fn date(flag: &str, raw: Option<&String>) -> Result<Option<Option<DateTime<Utc>>>, String> {
    let Some(raw) = raw.map(|r| r.trim()) else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(Some(None));
    }
    dates::parse_flexible(raw)
        .map(|d| Some(Some(d)))
        .ok_or_else(|| format!("{flag} must be YYYY-MM-DD, got {raw:?}"))
}

impl TaskFields {
    /// Patch for `task edit`.
    ///
    /// # Errors
    ///
    /// Returns an error string for malformed hours or dates.
    pub fn to_patch(&self) -> Result<TaskPatch, String> {
        Ok(TaskPatch {
            title: self.title.clone(),
            job_id: None,
            owner: clearable(self.owner.as_ref()),
            completed: None,
            focus_level: clearable(self.focus.as_ref()),
            joy_level: clearable(self.joy.as_ref()),
            required_hours: hours(self.hours.as_ref())?,
            date: date("--due", self.due.as_ref())?,
            tags: (!self.tags.is_empty()).then(|| self.tags.clone()),
            notes: clearable(self.notes.as_ref()),
        })
    }

    /// Draft for `job add-task`. The title may be empty here; the board
    /// rejects it.
    ///
    /// # Errors
    ///
    /// Returns an error string for malformed hours or dates.
    pub fn to_draft(&self) -> Result<TaskDraft, String> {
        let patch = self.to_patch()?;
        Ok(TaskDraft {
            title: self.title.clone().unwrap_or_default(),
            job_id: None,
            owner: patch.owner.flatten(),
            focus_level: patch.focus_level.flatten(),
            joy_level: patch.joy_level.flatten(),
            required_hours: patch.required_hours.flatten(),
            date: patch.date.flatten(),
            tags: self.tags.clone(),
            notes: patch.notes.flatten(),
        })
    }
}

impl JobFields {
    /// Draft for `job create`.
    ///
    /// # Errors
    ///
    /// Returns an error string for a malformed due date.
    pub fn to_draft(&self) -> Result<JobDraft, String> {
        Ok(JobDraft {
            title: self.title.clone().unwrap_or_default(),
            owner: clearable(self.owner.as_ref()).flatten(),
            business_function_id: clearable(self.function.as_ref()).flatten(),
            due_date: date("--due", self.due.as_ref())?.flatten(),
        })
    }

    /// Patch for `job edit`, optionally re-pointing the next task.
    ///
    /// # Errors
    ///
    /// Returns an error string for a malformed due date.
    pub fn to_patch(&self, next_task: Option<&String>) -> Result<JobPatch, String> {
        Ok(JobPatch {
            title: self.title.clone(),
            owner: clearable(self.owner.as_ref()),
            business_function_id: clearable(self.function.as_ref()),
            due_date: date("--due", self.due.as_ref())?,
            next_task_id: clearable(next_task),
        })
    }
}

impl From<&QboFields> for QboForm {
    fn from(fields: &QboFields) -> Self {
        Self {
            name: fields.name.clone(),
            unit: fields.unit.clone(),
            beginning_value: fields.beginning_value.clone(),
            current_value: fields.current_value.clone(),
            target_value: fields.target_value.clone(),
            deadline: fields.deadline.clone(),
            points: fields.points.clone(),
            notes: fields.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_clear_optional_task_fields() {
        let fields = TaskFields {
            notes: Some(String::new()),
            hours: Some(String::new()),
            focus: Some("High".into()),
            ..TaskFields::default()
        };
        let patch = fields.to_patch().unwrap();
        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.required_hours, Some(None));
        assert_eq!(patch.focus_level, Some(Some("High".into())));
        assert_eq!(patch.owner, None);
        assert!(patch.tags.is_none());
    }

    #[test]
    fn bad_hours_and_dates_are_rejected() {
        let fields = TaskFields { hours: Some("lots".into()), ..TaskFields::default() };
        assert!(fields.to_patch().is_err());
        let fields = JobFields { due: Some("soon".into()), ..JobFields::default() };
        assert!(fields.to_draft().is_err());
    }

    #[test]
    fn zero_hours_is_a_value() {
        let fields = TaskFields {
            title: Some("Call".into()),
            hours: Some("0".into()),
            ..TaskFields::default()
        };
        let draft = fields.to_draft().unwrap();
        assert_eq!(draft.required_hours, Some(0.0));
    }

    #[test]
    fn empty_next_task_clears_reference() {
        let patch = JobFields::default().to_patch(Some(&String::new())).unwrap();
        assert_eq!(patch, JobPatch::clear_next_task());
    }
}
