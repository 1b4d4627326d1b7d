//! `opsboard chat` command.

use crate::context::ServiceContext;
use crate::dashboard::chat::chat_history;

/// Execute the `chat` command: print one stored conversation.
///
/// # Errors
///
/// Returns an error string when no user is signed in, the chat does not
/// exist or the store fails.
pub async fn run(ctx: &ServiceContext, chat_id: &str) -> Result<(), String> {
    let chat = chat_history(ctx.identity.as_ref(), ctx.store.as_ref(), chat_id)
        .await
        .map_err(|e| e.to_string())?;
    if chat.messages.is_empty() {
        println!("Chat {} has no messages.", chat.id);
        return Ok(());
    }
    for message in &chat.messages {
        println!("{}: {}\n", message.role, message.content);
    }
    Ok(())
}
