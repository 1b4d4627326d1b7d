//! Id → display-name tables used to decorate tasks and jobs.

use std::collections::HashMap;

use crate::model::{BusinessFunction, Job, Owner, Task};

/// Shown when a record has no (known) owner.
pub const UNASSIGNED: &str = "Not assigned";
/// Shown when a job has no (known) business function.
pub const NO_FUNCTION: &str = "No function";

/// Name tables built once per load.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    owners: HashMap<String, String>,
    functions: HashMap<String, String>,
}

impl Lookups {
    /// Builds the tables, skipping records without an id or a name.
    #[must_use]
    pub fn new(owners: &[Owner], functions: &[BusinessFunction]) -> Self {
        let named = |id: &str, name: &str| {
            (!id.is_empty() && !name.is_empty()).then(|| (id.to_string(), name.to_string()))
        };
        Self {
            owners: owners.iter().filter_map(|o| named(&o.id, &o.name)).collect(),
            functions: functions.iter().filter_map(|f| named(&f.id, &f.name)).collect(),
        }
    }

    /// Owner display name; unknown ids fall back to [`UNASSIGNED`].
    #[must_use]
    pub fn owner_name(&self, owner_id: Option<&str>) -> &str {
        owner_id.and_then(|id| self.owners.get(id)).map_or(UNASSIGNED, String::as_str)
    }

    /// A job's business-function name: the looked-up name, then the name
    /// the job carries itself, then [`NO_FUNCTION`].
    #[must_use]
    pub fn function_name<'a>(&'a self, job: &'a Job) -> &'a str {
        job.business_function_id
            .as_deref()
            .and_then(|id| self.functions.get(id))
            .map(String::as_str)
            .or(job.business_function_name.as_deref())
            .unwrap_or(NO_FUNCTION)
    }

    /// Name of whoever owns the job's next task, given the loaded tasks.
    #[must_use]
    pub fn next_task_owner(&self, job: &Job, tasks: &[Task]) -> &str {
        let owner = job
            .next_task_id
            .as_deref()
            .and_then(|next| tasks.iter().find(|t| t.id == next))
            .and_then(|t| t.owner.as_deref());
        self.owner_name(owner)
    }

    /// Owner ids and names, sorted by name, for pickers.
    #[must_use]
    pub fn owners(&self) -> Vec<(&str, &str)> {
        let mut owners: Vec<_> =
            self.owners.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        owners.sort_by(|a, b| a.1.cmp(b.1));
        owners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookups() -> Lookups {
        Lookups::new(
            &[
                Owner { id: "o1".into(), name: "Ada".into() },
                Owner { id: "o2".into(), name: String::new() },
            ],
            &[BusinessFunction { id: "bf1".into(), name: "Product".into() }],
        )
    }

    #[test]
    fn owner_name_falls_back_for_unknown_and_nameless() {
        let lookups = lookups();
        assert_eq!(lookups.owner_name(Some("o1")), "Ada");
        assert_eq!(lookups.owner_name(Some("o2")), UNASSIGNED);
        assert_eq!(lookups.owner_name(None), UNASSIGNED);
    }

    #[test]
    fn function_name_prefers_lookup_then_job_field() {
        let lookups = lookups();
        let mut job = Job { business_function_id: Some("bf1".into()), ..Job::new("j1", "A") };
        assert_eq!(lookups.function_name(&job), "Product");

        job.business_function_id = Some("bf9".into());
        job.business_function_name = Some("Design".into());
        assert_eq!(lookups.function_name(&job), "Design");

        job.business_function_name = None;
        assert_eq!(lookups.function_name(&job), NO_FUNCTION);
    }

    #[test]
    fn next_task_owner_resolves_through_tasks() {
        let lookups = lookups();
        let job = Job { next_task_id: Some("t1".into()), ..Job::new("j1", "A") };
        let tasks = vec![Task { owner: Some("o1".into()), ..Task::new("t1", "Call") }];
        assert_eq!(lookups.next_task_owner(&job, &tasks), "Ada");
        assert_eq!(lookups.next_task_owner(&Job::new("j2", "B"), &tasks), UNASSIGNED);
    }
}
