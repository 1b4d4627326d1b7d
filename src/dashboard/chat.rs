//! Stored AI conversations.

use crate::error::DashError;
use crate::model::ChatHistory;
use crate::ports::{DashboardStore, IdentityProvider};

/// Fetches one chat belonging to the signed-in caller.
///
/// # Errors
///
/// Unauthorized without a caller identity, not-found for a missing chat, and
/// upstream when the store fails.
pub async fn chat_history(
    identity: &dyn IdentityProvider,
    store: &dyn DashboardStore,
    chat_id: &str,
) -> Result<ChatHistory, DashError> {
    let user_id = identity.current_user().ok_or(DashError::Unauthorized)?;
    match store.get_chat(&user_id, chat_id).await {
        Ok(Some(chat)) => Ok(chat),
        Ok(None) => Err(DashError::NotFound("Chat".into())),
        Err(e) => {
            tracing::error!(chat_id, error = %e, "failed to fetch chat history");
            Err(DashError::upstream("Failed to fetch chat history", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::StaticIdentity;
    use crate::adapters::memory::MemoryStore;
    use crate::model::ChatMessage;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_chat(ChatHistory {
            id: "c1".into(),
            user_id: "u1".into(),
            messages: vec![ChatMessage { role: "user".into(), content: "hi".into() }],
        });
        store
    }

    fn user(id: &str) -> StaticIdentity {
        StaticIdentity::new(Some(id.into()))
    }

    #[tokio::test]
    async fn anonymous_caller_is_unauthorized() {
        let store = store();
        let err = chat_history(&StaticIdentity::new(None), &store, "c1").await.unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn returns_callers_chat() {
        let chat = chat_history(&user("u1"), &store(), "c1").await.unwrap();
        assert_eq!(chat.messages.len(), 1);
    }

    #[tokio::test]
    async fn missing_and_foreign_chats_are_not_found() {
        let store = store();
        let missing = chat_history(&user("u1"), &store, "nope").await.unwrap_err();
        assert_eq!(missing.to_string(), "Chat not found");
        let foreign = chat_history(&user("u2"), &store, "c1").await.unwrap_err();
        assert_eq!(foreign.status_code(), 404);
    }

    #[tokio::test]
    async fn store_failure_is_a_server_error() {
        let store = store();
        store.fail_on("get_chat");
        let err = chat_history(&user("u1"), &store, "c1").await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
