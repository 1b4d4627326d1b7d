//! `opsboard search` command.

use crate::context::ServiceContext;
use crate::dashboard::search::search;

use super::print_table;

/// Execute the `search` command.
///
/// # Errors
///
/// Returns an error string for a blank query or a failed search.
pub async fn run(ctx: &ServiceContext, query: &str) -> Result<(), String> {
    let hits = search(ctx.store.as_ref(), query).await.map_err(|e| e.to_string())?;
    if hits.is_empty() {
        println!("No results for \"{}\".", query.trim());
        return Ok(());
    }
    let rows: Vec<Vec<String>> = hits
        .iter()
        .map(|hit| {
            vec![
                hit.id.clone(),
                hit.kind.clone().unwrap_or_else(|| "-".into()),
                hit.label().to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "TYPE", "TITLE"], &rows);
    Ok(())
}
