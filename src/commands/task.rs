//! `opsboard task` command.

use crate::cli::TaskAction;
use crate::context::ServiceContext;
use crate::dashboard::CascadeReport;

use super::feed::load;
use super::print_notices;

/// Execute a `task` action against the next-step feed.
///
/// # Errors
///
/// Returns an error string if the feed cannot be loaded, the input is
/// invalid or the store rejects the change.
pub async fn run(ctx: &ServiceContext, action: &TaskAction) -> Result<(), String> {
    // Flag validation happens before the feed is fetched.
    let patch = match action {
        TaskAction::Edit { fields, .. } => Some(fields.to_patch()?),
        _ => None,
    };

    let mut feed = load(ctx).await?;
    let store = ctx.store.as_ref();

    let result = match action {
        TaskAction::Complete { id } => feed.complete_task(store, id).await.map(|r| report(&r)),
        TaskAction::Reopen { id } => feed.reopen_task(store, id).await,
        TaskAction::Edit { id, .. } => match &patch {
            Some(patch) => feed.update_task(store, id, patch).await,
            None => Ok(()),
        },
        TaskAction::Delete { id } => feed.delete_task(store, id).await.map(|r| report(&r)),
        TaskAction::Notes { id } => feed.notes(id).map(|(title, notes)| {
            println!("{title}\n\n{notes}");
        }),
        TaskAction::AddToCalendar { id } => feed.add_to_calendar(id),
    };

    print_notices(feed.drain_notices());
    result.map_err(|e| e.to_string())
}

pub(crate) fn report(cascade: &CascadeReport) {
    for job_id in &cascade.cleared {
        println!("Cleared next step on job {job_id}");
    }
    for job_id in &cascade.failed {
        eprintln!("Job {job_id} still points at this task");
    }
}
