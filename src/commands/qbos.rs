//! `opsboard qbos` and `opsboard qbo` commands.

use crate::cli::QboAction;
use crate::context::ServiceContext;
use crate::dashboard::{QboBoard, QboForm};
use crate::model::dates;

use super::{print_notices, print_table};

/// Execute the `qbos` command: print every objective with its progress.
///
/// # Errors
///
/// Returns an error string if the QBO list cannot be loaded.
pub async fn list(ctx: &ServiceContext) -> Result<(), String> {
    let now = ctx.clock.now();
    let board = QboBoard::load(ctx.store.as_ref()).await.map_err(|e| e.to_string())?;

    let rows: Vec<Vec<String>> = board
        .rows(now)
        .into_iter()
        .map(|row| {
            let days = match row.days_left {
                Some(days) if days < 0 => format!("{} overdue", -days),
                Some(days) => days.to_string(),
                None => "-".to_string(),
            };
            vec![
                row.qbo.id.clone(),
                row.qbo.name.clone(),
                format!("{} {}", row.qbo.current_value, row.qbo.unit).trim_end().to_string(),
                format!("{} {}", row.qbo.target_value, row.qbo.unit).trim_end().to_string(),
                format!("{}%", row.percent),
                dates::display(row.qbo.deadline.as_ref()),
                days,
                row.qbo.points.to_string(),
            ]
        })
        .collect();

    if rows.is_empty() {
        println!("No QBOs yet.");
        return Ok(());
    }
    print_table(
        &["ID", "QBO", "CURRENT", "TARGET", "PROGRESS", "DEADLINE", "DAYS LEFT", "POINTS"],
        &rows,
    );
    println!("\nPoints allocated: {}/100", board.total_points());
    Ok(())
}

/// Execute a `qbo` action.
///
/// # Errors
///
/// Returns an error string for invalid input, a failed load or a rejected
/// store call.
pub async fn run(ctx: &ServiceContext, action: &QboAction) -> Result<(), String> {
    let store = ctx.store.as_ref();
    let mut board = QboBoard::load(store).await.map_err(|e| e.to_string())?;

    let outcome = match action {
        QboAction::Create(fields) => {
            let created = board.create(store, &QboForm::from(fields)).await;
            created.map(|qbo| println!("Created QBO {}", qbo.id))
        }
        QboAction::Edit { id, fields } => {
            board.update(store, id, &QboForm::from(fields)).await.map(|_| ())
        }
        QboAction::Delete { id } => board.delete(store, id).await,
    };
    print_notices(board.drain_notices());
    outcome.map_err(|e| e.to_string())
}
