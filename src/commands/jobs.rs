//! `opsboard jobs` and `opsboard job` commands.

use crate::cli::JobAction;
use crate::context::ServiceContext;
use crate::dashboard::progress::batch_progress;
use crate::dashboard::JobBoard;
use crate::error::DashError;
use crate::model::dates;

use super::task::report;
use super::{print_notices, print_table};

/// Execute the `jobs` command: print the job board.
///
/// # Errors
///
/// Returns an error string if the job list cannot be loaded.
pub async fn list(ctx: &ServiceContext) -> Result<(), String> {
    let mut board = load(ctx).await?;
    print_notices(board.drain_notices());

    let rows: Vec<Vec<String>> = board
        .rows()
        .into_iter()
        .map(|row| {
            let counts = &row.progress.counts;
            vec![
                row.job.id.clone(),
                row.job.title.clone(),
                row.function.to_string(),
                row.next_owner.to_string(),
                row.label,
                format!("{}% ({}/{})", row.progress.percent, counts.completed, counts.total),
                dates::display(row.job.due_date.as_ref()),
            ]
        })
        .collect();

    if rows.is_empty() {
        println!("No jobs yet. Create one with `opsboard job create --title <TITLE>`.");
        return Ok(());
    }
    print_table(&["ID", "JOB", "FUNCTION", "NEXT STEP OWNER", "CARD", "PROGRESS", "DUE"], &rows);
    println!("\n{} job(s).", rows.len());
    Ok(())
}

/// Execute a `job` action.
///
/// # Errors
///
/// Returns an error string for invalid input, a failed load or a rejected
/// store call.
pub async fn run(ctx: &ServiceContext, action: &JobAction) -> Result<(), String> {
    let store = ctx.store.as_ref();

    // Parse flags before touching the network.
    match action {
        JobAction::Create(fields) => {
            let draft = fields.to_draft()?;
            let mut board = load(ctx).await?;
            let outcome =
                board.create_job(store, &draft).await.map(|job| println!("Created job {}", job.id));
            finish(&mut board, outcome)
        }
        JobAction::Edit { id, fields, next_task } => {
            let patch = fields.to_patch(next_task.as_ref())?;
            let mut board = load(ctx).await?;
            let outcome = board.update_job(store, id, &patch).await;
            finish(&mut board, outcome)
        }
        JobAction::Delete { id } => {
            let mut board = load(ctx).await?;
            let outcome = board.delete_job(store, id).await;
            finish(&mut board, outcome)
        }
        JobAction::AddTask { job_id, fields } => {
            let draft = fields.to_draft()?;
            let mut board = load(ctx).await?;
            if board.job(job_id).is_none() {
                return Err(format!("Job {job_id} not found"));
            }
            let outcome = board
                .create_task(store, job_id, draft)
                .await
                .map(|task| println!("Created task {}", task.id));
            finish(&mut board, outcome)
        }
        JobAction::CompleteTask { task_id } => {
            let mut board = load(ctx).await?;
            let outcome = board.set_task_completed(store, task_id, true).await.map(|r| report(&r));
            finish(&mut board, outcome)
        }
        JobAction::ReopenTask { task_id } => {
            let mut board = load(ctx).await?;
            let outcome = board.set_task_completed(store, task_id, false).await.map(|r| report(&r));
            finish(&mut board, outcome)
        }
        JobAction::DeleteTask { task_id } => {
            let mut board = load(ctx).await?;
            let outcome = board.delete_task(store, task_id).await.map(|r| report(&r));
            finish(&mut board, outcome)
        }
        JobAction::Progress { ids } => progress(ctx, ids).await,
    }
}

async fn progress(ctx: &ServiceContext, ids: &[String]) -> Result<(), String> {
    let progress = batch_progress(ctx.store.as_ref(), ids).await.map_err(|e| {
        tracing::warn!(error = %e, "progress lookup failed");
        format!("Failed to fetch job progress: {e}")
    })?;
    let rows: Vec<Vec<String>> = progress
        .iter()
        .map(|(id, p)| {
            vec![
                id.clone(),
                format!("{}%", p.percent),
                p.counts.completed.to_string(),
                p.counts.total.to_string(),
            ]
        })
        .collect();
    print_table(&["JOB", "PROGRESS", "DONE", "TOTAL"], &rows);
    Ok(())
}

async fn load(ctx: &ServiceContext) -> Result<JobBoard, String> {
    JobBoard::load(ctx.store.as_ref()).await.map_err(|e| e.to_string())
}

fn finish(board: &mut JobBoard, outcome: Result<(), DashError>) -> Result<(), String> {
    print_notices(board.drain_notices());
    outcome.map_err(|e| e.to_string())
}
