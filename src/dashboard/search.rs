//! Global search across jobs, tasks and QBOs.

use crate::error::DashError;
use crate::model::SearchHit;
use crate::ports::DashboardStore;

/// Runs a search. The query is trimmed before it is sent.
///
/// # Errors
///
/// Returns a validation error for a blank query without calling the store,
/// and an upstream error when the search fails.
pub async fn search(store: &dyn DashboardStore, query: &str) -> Result<Vec<SearchHit>, DashError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(DashError::validation("Missing Information", "Search query is required"));
    }
    let hits = store.search(query).await.map_err(|e| {
        tracing::error!(error = %e, query, "search failed");
        DashError::upstream("Search failed", e)
    })?;
    tracing::debug!(query, hits = hits.len(), "search finished");
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::model::{Job, Task};

    #[tokio::test]
    async fn blank_query_is_rejected_locally() {
        let store = MemoryStore::new();
        let err = search(&store, "   ").await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn finds_jobs_and_tasks_by_title() {
        let store = MemoryStore::new();
        store.insert_job(Job::new("j1", "Invoice run"));
        store.insert_task(Task::new("t1", "Chase invoice"));
        store.insert_task(Task::new("t2", "Order beans"));

        let hits = search(&store, " invoice ").await.unwrap();

        let labels: Vec<&str> = hits.iter().map(SearchHit::label).collect();
        assert_eq!(labels, vec!["Invoice run", "Chase invoice"]);
        assert_eq!(store.calls(), vec!["search"]);
    }

    #[tokio::test]
    async fn store_failure_is_upstream() {
        let store = MemoryStore::new();
        store.fail_on("search");
        assert_eq!(search(&store, "x").await.unwrap_err().status_code(), 500);
    }
}
