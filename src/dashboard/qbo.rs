//! The QBO board: objectives with progress toward target and time left.

use chrono::{DateTime, Utc};

use crate::dashboard::notice::{Notice, Notices};
use crate::dashboard::progress::{days_remaining, qbo_percent};
use crate::error::DashError;
use crate::model::dates;
use crate::model::{Qbo, QboDraft};
use crate::ports::DashboardStore;

/// Raw dialog input. `None` keeps the current value on edit (or the empty
/// default on create); an empty number means 0 and an empty deadline clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QboForm {
    /// Objective name.
    pub name: Option<String>,
    /// Unit.
    pub unit: Option<String>,
    /// Starting value.
    pub beginning_value: Option<String>,
    /// Current value.
    pub current_value: Option<String>,
    /// Target value.
    pub target_value: Option<String>,
    /// `YYYY-MM-DD`.
    pub deadline: Option<String>,
    /// Points.
    pub points: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

impl QboForm {
    /// Layers this form over `base` and validates the result.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, a malformed number or an
    /// unparseable deadline.
    pub fn apply_to(&self, base: QboDraft) -> Result<QboDraft, DashError> {
        let mut draft = base;
        if let Some(name) = &self.name {
            draft.name = name.trim().to_string();
        }
        if let Some(unit) = &self.unit {
            draft.unit = unit.trim().to_string();
        }
        if let Some(raw) = &self.beginning_value {
            draft.beginning_value = number("Beginning value", raw)?;
        }
        if let Some(raw) = &self.current_value {
            draft.current_value = number("Current value", raw)?;
        }
        if let Some(raw) = &self.target_value {
            draft.target_value = number("Target value", raw)?;
        }
        if let Some(raw) = &self.points {
            draft.points = points(raw)?;
        }
        if let Some(raw) = &self.deadline {
            draft.deadline = deadline(raw)?;
        }
        if let Some(notes) = &self.notes {
            draft.notes = Some(notes.clone()).filter(|n| !n.trim().is_empty());
        }

        if draft.name.is_empty() {
            return Err(DashError::validation("Missing Information", "QBO name is required."));
        }
        Ok(draft)
    }
}

fn invalid_value(message: String) -> DashError {
    DashError::validation("Invalid Value", message)
}

fn number(field: &str, raw: &str) -> Result<f64, DashError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid_value(format!("{field} must be a number, got {raw:?}")))
}

fn points(raw: &str) -> Result<u32, DashError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u32>()
        .map_err(|_| invalid_value(format!("Points must be a whole number, got {raw:?}")))
}

fn deadline(raw: &str) -> Result<Option<String>, DashError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let parsed = dates::parse_flexible(raw)
        .ok_or_else(|| invalid_value(format!("Deadline must be YYYY-MM-DD, got {raw:?}")))?;
    Ok(Some(dates::to_api_midnight(parsed.date_naive())))
}

/// One row of the board.
#[derive(Debug, Clone, PartialEq)]
pub struct QboRow<'a> {
    /// The objective.
    pub qbo: &'a Qbo,
    /// Progress toward target, `0..=100`.
    pub percent: u8,
    /// Whole days until the deadline, negative once passed.
    pub days_left: Option<i64>,
}

/// View state for the QBO board.
#[derive(Debug, Clone, Default)]
pub struct QboBoard {
    qbos: Vec<Qbo>,
    notices: Notices,
}

impl QboBoard {
    /// Loads every QBO.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the list cannot be fetched.
    pub async fn load(store: &dyn DashboardStore) -> Result<Self, DashError> {
        let mut board = Self::default();
        match store.list_qbos().await {
            Ok(qbos) => board.qbos = qbos,
            Err(e) => return Err(board.notices.fail("Failed to fetch QBOs", &e)),
        }
        Ok(board)
    }

    /// Rows with progress and days left as of `now`.
    #[must_use]
    pub fn rows(&self, now: DateTime<Utc>) -> Vec<QboRow<'_>> {
        self.qbos
            .iter()
            .map(|qbo| QboRow {
                qbo,
                percent: qbo_percent(qbo),
                days_left: days_remaining(qbo, now),
            })
            .collect()
    }

    /// Looks up a loaded QBO.
    #[must_use]
    pub fn qbo(&self, id: &str) -> Option<&Qbo> {
        self.qbos.iter().find(|q| q.id == id)
    }

    /// Sum of points over every QBO; a complete allocation is 100.
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.qbos.iter().map(|q| q.points).sum()
    }

    /// Takes queued notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Creates a QBO from dialog input.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, and an upstream error when
    /// the store rejects the create.
    pub async fn create(
        &mut self,
        store: &dyn DashboardStore,
        form: &QboForm,
    ) -> Result<Qbo, DashError> {
        let draft = form.apply_to(QboDraft::default())?;
        let qbo = match store.create_qbo(&draft).await {
            Ok(qbo) => qbo,
            Err(e) => return Err(self.notices.fail("Failed to create QBO", &e)),
        };
        self.qbos.push(qbo.clone());
        self.notices.push(Notice::success("Success", "QBO created successfully"));
        Ok(qbo)
    }

    /// Edits a loaded QBO; fields missing from `form` keep their values.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown id, a validation error for bad input,
    /// and an upstream error when the store rejects the update.
    pub async fn update(
        &mut self,
        store: &dyn DashboardStore,
        id: &str,
        form: &QboForm,
    ) -> Result<Qbo, DashError> {
        let current = self.qbo(id).ok_or_else(|| DashError::NotFound("QBO".into()))?;
        let draft = form.apply_to(QboDraft::from_qbo(current))?;
        let updated = match store.update_qbo(id, &draft).await {
            Ok(qbo) => qbo,
            Err(e) => return Err(self.notices.fail("Failed to update QBO", &e)),
        };
        if let Some(slot) = self.qbos.iter_mut().find(|q| q.id == id) {
            *slot = updated.clone();
        }
        self.notices.push(Notice::success("Success", "QBO updated successfully"));
        Ok(updated)
    }

    /// Deletes a QBO.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the store rejects the delete.
    pub async fn delete(&mut self, store: &dyn DashboardStore, id: &str) -> Result<(), DashError> {
        if let Err(e) = store.delete_qbo(id).await {
            return Err(self.notices.fail("Failed to delete QBO", &e));
        }
        self.qbos.retain(|q| q.id != id);
        self.notices.push(Notice::success("Success", "QBO deleted successfully"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;

    fn form(name: &str) -> QboForm {
        QboForm { name: Some(name.into()), ..QboForm::default() }
    }

    #[test]
    fn empty_numbers_default_to_zero() {
        let input =
            QboForm { target_value: Some(String::new()), points: Some(" ".into()), ..form("MRR") };
        let draft = input.apply_to(QboDraft::default()).unwrap();
        assert_eq!(draft.target_value, 0.0);
        assert_eq!(draft.points, 0);
    }

    #[test]
    fn deadline_is_normalised() {
        let input = QboForm { deadline: Some("2025-06-30".into()), ..form("MRR") };
        let draft = input.apply_to(QboDraft::default()).unwrap();
        assert_eq!(draft.deadline.as_deref(), Some("2025-06-30T00:00:00.000Z"));
    }

    #[test]
    fn rejects_blank_name_and_bad_numbers() {
        assert_eq!(form(" ").apply_to(QboDraft::default()).unwrap_err().status_code(), 400);
        let bad = QboForm { current_value: Some("lots".into()), ..form("MRR") };
        assert!(bad.apply_to(QboDraft::default()).is_err());
    }

    #[tokio::test]
    async fn create_then_edit_keeps_untouched_fields() {
        let store = MemoryStore::new();
        let mut board = QboBoard::load(&store).await.unwrap();

        let created = board
            .create(
                &store,
                &QboForm {
                    unit: Some("USD".into()),
                    target_value: Some("1000".into()),
                    points: Some("40".into()),
                    ..form("MRR")
                },
            )
            .await
            .unwrap();
        let edit = QboForm { current_value: Some("250".into()), ..QboForm::default() };
        let updated = board.update(&store, &created.id, &edit).await.unwrap();

        assert_eq!(updated.unit, "USD");
        assert_eq!(updated.points, 40);
        assert_eq!(updated.current_value, 250.0);
        assert_eq!(board.rows(Utc::now())[0].percent, 25);
        assert_eq!(board.total_points(), 40);
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_store() {
        let store = MemoryStore::new();
        let mut board = QboBoard::load(&store).await.unwrap();
        let before = store.calls().len();

        assert!(board.create(&store, &QboForm::default()).await.is_err());
        assert_eq!(store.calls().len(), before);
    }

    #[tokio::test]
    async fn delete_failure_keeps_row() {
        let store = MemoryStore::new();
        store.insert_qbo(Qbo {
            id: "q1".into(),
            name: "Churn".into(),
            unit: "%".into(),
            beginning_value: 10.0,
            current_value: 8.0,
            target_value: 5.0,
            deadline: dates::parse_flexible("2025-04-01"),
            points: 20,
            user_id: None,
            notes: None,
        });
        let mut board = QboBoard::load(&store).await.unwrap();
        store.fail_on("delete_qbo:q1");

        assert!(board.delete(&store, "q1").await.is_err());
        let now = dates::parse_flexible("2025-03-25").unwrap();
        let rows = board.rows(now);
        assert_eq!(rows[0].percent, 40);
        assert_eq!(rows[0].days_left, Some(7));
        assert_eq!(board.drain_notices(), vec![Notice::error("Failed to delete QBO")]);
    }
}
