//! Effective-dated earnings-limit timeline.
//!
//! Everything in this module is pure: operations receive the current records
//! and the reference date ("today") and hand back a [`Planned`] change set.
//! Persisting the change set and re-deriving the active flag is the job of the
//! setting service and its store.

pub mod clock;
pub mod engine;
pub mod resolver;
pub mod validation;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

pub use clock::Clock;
pub use engine::{plan_create, plan_delete, plan_recalculate, plan_update};
pub use resolver::{mark_active, resolve_active};

/// One dated minijob earnings-limit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SettingRecord {
    pub id: Uuid,
    pub monthly_limit: Decimal,
    pub description: String,
    pub valid_from: NaiveDate,
    /// Inclusive end; `None` means open-ended.
    pub valid_until: Option<NaiveDate>,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SettingRecord {
    /// Whether the record is in effect on `day`.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.valid_from <= day && self.valid_until.map_or(true, |until| day <= until)
    }

    /// Whether the inclusive interval intersects `[from, until]` (`None` = +inf).
    pub fn intersects(&self, from: NaiveDate, until: Option<NaiveDate>) -> bool {
        let starts_before_other_ends = until.map_or(true, |u| self.valid_from <= u);
        let other_starts_before_end = self.valid_until.map_or(true, |u| from <= u);
        starts_before_other_ends && other_starts_before_end
    }

    pub fn is_open_ended(&self) -> bool {
        self.valid_until.is_none()
    }

    /// Chronological order: `valid_from`, then creation time, then id.
    pub fn chronological(a: &SettingRecord, b: &SettingRecord) -> Ordering {
        a.valid_from
            .cmp(&b.valid_from)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// Fields an administrator supplies for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingInput {
    pub monthly_limit: Decimal,
    pub description: String,
    pub valid_from: NaiveDate,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

/// A `valid_until` change made to a record as a side effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub id: Uuid,
    pub description: String,
    pub valid_from: NaiveDate,
    pub previous_valid_until: Option<NaiveDate>,
    pub new_valid_until: Option<NaiveDate>,
}

impl Adjustment {
    fn of(record: &SettingRecord, new_valid_until: Option<NaiveDate>) -> Self {
        Self {
            id: record.id,
            description: record.description.clone(),
            valid_from: record.valid_from,
            previous_valid_until: record.valid_until,
            new_valid_until,
        }
    }
}

/// An existing record that blocks a proposed interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictingRecord {
    pub id: Uuid,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    pub description: String,
}

impl From<&SettingRecord> for ConflictingRecord {
    fn from(record: &SettingRecord) -> Self {
        Self {
            id: record.id,
            valid_from: record.valid_from,
            valid_until: record.valid_until,
            description: record.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("Setting overlaps {} existing record(s)", conflicts.len())]
    Conflict { conflicts: Vec<ConflictingRecord> },

    #[error("Setting {0} not found")]
    NotFound(Uuid),

    #[error("{0}")]
    IllegalState(String),
}

impl TimelineError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), message.clone());
        TimelineError::Validation { message, field_errors }
    }
}

/// Row-level writes a plan needs; applied atomically by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub inserts: Vec<SettingRecord>,
    pub updates: Vec<SettingRecord>,
    pub deletes: Vec<Uuid>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Apply to an in-memory copy of the timeline.
    pub fn apply(&self, records: &mut Vec<SettingRecord>) {
        records.retain(|r| !self.deletes.contains(&r.id));
        for updated in &self.updates {
            if let Some(slot) = records.iter_mut().find(|r| r.id == updated.id) {
                *slot = updated.clone();
            }
        }
        records.extend(self.inserts.iter().cloned());
    }
}

/// Result of planning an operation: what to write, and what to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planned<T> {
    pub changes: ChangeSet,
    pub outcome: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutcome {
    pub record: SettingRecord,
    pub auto_adjusted: Vec<Adjustment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub record: SettingRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub deleted_record: SettingRecord,
    pub adjusted_predecessor: Option<Adjustment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculateOutcome {
    pub changed_count: usize,
    pub changes: Vec<Adjustment>,
}

/// The calendar day before `day`.
pub(crate) fn day_before(day: NaiveDate) -> NaiveDate {
    day.pred_opt().unwrap_or(NaiveDate::MIN)
}
