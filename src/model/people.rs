//! Read-only reference records and the smaller onboarding/search/chat shapes.

use serde::{Deserialize, Serialize};

/// A person who can own jobs and tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Owner {
    /// Store identifier.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// An area of the business (product, design, sales, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessFunction {
    /// Store identifier.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// Business profile captured during onboarding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInfo {
    /// The free-text business description.
    pub mission_statement: String,
    /// Business name.
    pub name: String,
    /// Industry.
    pub industry: String,
    /// Months the business has been operating.
    pub months_in_business: u32,
    /// Annual revenue.
    pub annual_revenue: f64,
    /// Growth stage label.
    pub growth_stage: String,
}

/// One message of a stored AI conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// `user` or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

/// A stored AI conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    /// Chat id.
    #[serde(rename = "_id", alias = "id", alias = "chatId", default)]
    pub id: String,
    /// Owning user.
    #[serde(default)]
    pub user_id: String,
    /// Messages in order.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// A search result. The backend returns heterogeneous records, so anything
/// beyond the display fields is kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    /// Record id.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    /// Record kind (`job`, `task`, `qbo`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Title, for jobs and tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Name, for QBOs and reference records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SearchHit {
    /// Best available label for display.
    #[must_use]
    pub fn label(&self) -> &str {
        self.title.as_deref().or(self.name.as_deref()).unwrap_or("(untitled)")
    }
}
