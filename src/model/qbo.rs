//! Quantified business objectives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dates;

/// A tracked numeric goal with a deadline and point weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Qbo {
    /// Store identifier.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    /// Objective name.
    pub name: String,
    /// Unit the values are measured in.
    #[serde(default)]
    pub unit: String,
    /// Value when the objective was set.
    #[serde(default)]
    pub beginning_value: f64,
    /// Latest measured value.
    #[serde(default)]
    pub current_value: f64,
    /// Value that counts as done.
    #[serde(default)]
    pub target_value: f64,
    /// Deadline.
    #[serde(
        default,
        deserialize_with = "dates::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<DateTime<Utc>>,
    /// Share of the 100-point allocation.
    #[serde(default)]
    pub points: u32,
    /// Owning user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Values submitted by the QBO dialog, used for both create and edit.
///
/// The deadline travels as the string the API expects
/// (`YYYY-MM-DDT00:00:00.000Z`), already normalised by the dialog layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QboDraft {
    /// Objective name (required).
    pub name: String,
    /// Unit.
    pub unit: String,
    /// Starting value.
    pub beginning_value: f64,
    /// Current value.
    pub current_value: f64,
    /// Target value.
    pub target_value: f64,
    /// Normalised deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    /// Points.
    pub points: u32,
    /// Notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl QboDraft {
    /// Pre-fills the edit dialog from an existing objective.
    #[must_use]
    pub fn from_qbo(qbo: &Qbo) -> Self {
        Self {
            name: qbo.name.clone(),
            unit: qbo.unit.clone(),
            beginning_value: qbo.beginning_value,
            current_value: qbo.current_value,
            target_value: qbo.target_value,
            deadline: qbo.deadline.map(|d| dates::to_api_midnight(d.date_naive())),
            points: qbo.points,
            notes: qbo.notes.clone(),
        }
    }
}
