//! Task filter engine.
//!
//! Each filter key maps to one predicate over a task and its (optional)
//! parent job. A task is kept when every active predicate holds.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};

use crate::error::DashError;
use crate::model::dates::midnight_utc;
use crate::model::{Job, JobIndex, Task};

/// Keys the filter engine understands, named as the API names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKey {
    /// Exact match on `focusLevel`.
    FocusLevel,
    /// Exact match on `joyLevel`.
    JoyLevel,
    /// Exact match on the task owner.
    Owner,
    /// Inclusive lower bound on `requiredHours`.
    MinHours,
    /// Inclusive upper bound on `requiredHours`.
    MaxHours,
    /// Task date on or before this day.
    DueDate,
    /// Parent job's business function.
    BusinessFunctionId,
}

impl FilterKey {
    /// Every key, in display order.
    pub const ALL: [Self; 7] = [
        Self::FocusLevel,
        Self::JoyLevel,
        Self::Owner,
        Self::MinHours,
        Self::MaxHours,
        Self::DueDate,
        Self::BusinessFunctionId,
    ];

    /// Wire name of the key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FocusLevel => "focusLevel",
            Self::JoyLevel => "joyLevel",
            Self::Owner => "owner",
            Self::MinHours => "minHours",
            Self::MaxHours => "maxHours",
            Self::DueDate => "dueDate",
            Self::BusinessFunctionId => "businessFunctionId",
        }
    }

    fn predicate(self) -> Predicate {
        match self {
            Self::FocusLevel => |task, _, value| text_eq(task.focus_level.as_deref(), value),
            Self::JoyLevel => |task, _, value| text_eq(task.joy_level.as_deref(), value),
            Self::Owner => |task, _, value| text_eq(task.owner.as_deref(), value),
            Self::MinHours => |task, _, value| match (estimate(task), value) {
                (Some(hours), FilterValue::Hours(min)) => hours >= *min,
                _ => false,
            },
            Self::MaxHours => |task, _, value| match (estimate(task), value) {
                (Some(hours), FilterValue::Hours(max)) => hours <= *max,
                _ => false,
            },
            Self::DueDate => |task, _, value| match (task.date, value) {
                (Some(due), FilterValue::Date(limit)) => due <= midnight_utc(*limit),
                _ => false,
            },
            Self::BusinessFunctionId => |_, job, value| {
                text_eq(job.and_then(|j| j.business_function_id.as_deref()), value)
            },
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("unknown filter key: {s}"))
    }
}

/// A parsed filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Text compared exactly.
    Text(String),
    /// Hour bound.
    Hours(f64),
    /// Calendar day.
    Date(NaiveDate),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Hours(hours) => write!(f, "{hours}"),
            Self::Date(day) => write!(f, "{}", day.format("%Y-%m-%d")),
        }
    }
}

type Predicate = fn(&Task, Option<&Job>, &FilterValue) -> bool;

fn text_eq(field: Option<&str>, value: &FilterValue) -> bool {
    matches!((field, value), (Some(field), FilterValue::Text(want)) if field == want.as_str())
}

/// The hour estimate, where 0 means "not estimated".
fn estimate(task: &Task) -> Option<f64> {
    task.required_hours.filter(|hours| hours.abs() > 0.0)
}

fn invalid(key: FilterKey, raw: &str, what: &str) -> DashError {
    DashError::validation("Invalid filter", format!("{key}: {raw:?} is not {what}"))
}

/// The active filter set. Keys with an empty or `any` value are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilters {
    active: BTreeMap<FilterKey, FilterValue>,
}

impl TaskFilters {
    /// No filters: everything passes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `key=value` pairs. Unknown keys are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed pairs, hours or dates.
    pub fn parse<I, S>(pairs: I, today: NaiveDate) -> Result<Self, DashError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filters = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                DashError::validation("Invalid filter", format!("expected key=value, got {pair:?}"))
            })?;
            match key.trim().parse::<FilterKey>() {
                Ok(key) => filters.set_raw(key, value, today)?,
                Err(reason) => tracing::warn!(%reason, "ignoring filter"),
            }
        }
        Ok(filters)
    }

    /// Sets `key` from user text, or clears it when the text is empty or `any`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when hours or dates do not parse.
    pub fn set_raw(
        &mut self,
        key: FilterKey,
        raw: &str,
        today: NaiveDate,
    ) -> Result<(), DashError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("any") {
            self.active.remove(&key);
            return Ok(());
        }
        let value = match key {
            FilterKey::MinHours | FilterKey::MaxHours => {
                let hours = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|h| h.is_finite())
                    .ok_or_else(|| invalid(key, raw, "a number"))?;
                FilterValue::Hours(hours)
            }
            FilterKey::DueDate => {
                let day = parse_day(raw, today).ok_or_else(|| invalid(key, raw, "a date"))?;
                FilterValue::Date(day)
            }
            _ => FilterValue::Text(raw.to_string()),
        };
        self.active.insert(key, value);
        Ok(())
    }

    /// Sets an already-typed value.
    pub fn set(&mut self, key: FilterKey, value: FilterValue) {
        self.active.insert(key, value);
    }

    /// Removes one filter.
    pub fn clear(&mut self, key: FilterKey) {
        self.active.remove(&key);
    }

    /// The value for `key`, if active.
    #[must_use]
    pub fn get(&self, key: FilterKey) -> Option<&FilterValue> {
        self.active.get(&key)
    }

    /// True when nothing is filtered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Active filters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &FilterValue)> {
        self.active.iter().map(|(k, v)| (*k, v))
    }

    /// Whether `task`, joined to `job`, passes every active filter.
    #[must_use]
    pub fn matches(&self, task: &Task, job: Option<&Job>) -> bool {
        self.active.iter().all(|(key, value)| (key.predicate())(task, job, value))
    }
}

/// `YYYY-MM-DD`, `today`, `tomorrow`, or `in N days` / `in Nd`.
fn parse_day(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = raw.to_ascii_lowercase();
    match lower.as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.checked_add_days(Days::new(1)),
        _ => {}
    }
    if let Some(rest) = lower.strip_prefix("in ") {
        let count = rest
            .trim()
            .trim_end_matches("days")
            .trim_end_matches("day")
            .trim_end_matches('d');
        let days = count.trim().parse::<u64>().ok()?;
        return today.checked_add_days(Days::new(days));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Returns the tasks that pass `filters`, in input order. Each task is joined
/// to its job through `jobs`; tasks whose job is unknown have no parent.
pub fn filter_tasks<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    jobs: &JobIndex,
    filters: &TaskFilters,
) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|task| {
            let job = task.job_id.as_deref().and_then(|id| jobs.get(id));
            filters.matches(task, job)
        })
        .collect()
}
