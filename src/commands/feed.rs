//! `opsboard feed` command.

use crate::context::ServiceContext;
use crate::dashboard::lookup::NO_FUNCTION;
use crate::dashboard::{FeedState, TaskFilters};
use crate::model::dates;

use super::{print_notices, print_table};

/// Execute the `feed` command.
///
/// Loads every job's next task, applies `filters` and prints the result.
///
/// # Errors
///
/// Returns an error string for malformed filters (before any network call)
/// or when the job list cannot be loaded.
pub async fn run(ctx: &ServiceContext, filters: &[String]) -> Result<(), String> {
    let today = ctx.clock.now().date_naive();
    let filters = TaskFilters::parse(filters, today).map_err(|e| e.to_string())?;

    let mut feed = load(ctx).await?;
    feed.set_filters(filters);
    render(&feed);
    Ok(())
}

/// Loads the feed, printing load notices.
///
/// # Errors
///
/// Returns an error string when the job list could not be fetched.
pub(crate) async fn load(ctx: &ServiceContext) -> Result<FeedState, String> {
    let mut feed = FeedState::load(ctx.store.as_ref()).await;
    let notices = feed.drain_notices();
    let failed = notices.iter().any(|n| n.is_error());
    print_notices(notices);
    if failed {
        return Err("Failed to load tasks".to_string());
    }
    Ok(feed)
}

fn render(feed: &FeedState) {
    let visible = feed.visible();
    if visible.is_empty() {
        if feed.filters().is_empty() {
            println!("No next steps.");
        } else {
            println!("No tasks match the active filters.");
        }
        return;
    }

    let lookups = feed.lookups();
    let rows: Vec<Vec<String>> = visible
        .iter()
        .map(|task| {
            let job = task.job_id.as_deref().and_then(|id| feed.jobs().get(id));
            vec![
                task.id.clone(),
                task.title.clone(),
                job.map_or_else(|| "-".to_string(), |j| j.title.clone()),
                job.map_or(NO_FUNCTION, |j| lookups.function_name(j)).to_string(),
                lookups.owner_name(task.owner.as_deref()).to_string(),
                task.focus_level.clone().unwrap_or_else(|| "-".into()),
                task.joy_level.clone().unwrap_or_else(|| "-".into()),
                task.required_hours.map_or_else(|| "-".into(), |h| format!("{h}h")),
                dates::display(task.date.as_ref()),
            ]
        })
        .collect();

    print_table(&["ID", "TASK", "JOB", "FUNCTION", "OWNER", "FOCUS", "JOY", "HOURS", "DUE"], &rows);

    let active: Vec<String> =
        feed.filters().iter().map(|(key, value)| format!("{key}={value}")).collect();
    if active.is_empty() {
        println!("\n{} next step(s).", rows.len());
    } else {
        let total = feed.tasks().len();
        println!("\n{} of {total} next step(s) match {}.", rows.len(), active.join(", "));
    }
}
