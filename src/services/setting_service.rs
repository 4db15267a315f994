use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::{DatabaseError, SettingStore, TimelineTx};
use crate::timeline::{
    self, mark_active, resolve_active, CreateOutcome, DeleteOutcome, Planned, RecalculateOutcome,
    SettingInput, SettingRecord, TimelineError, UpdateOutcome,
};

#[derive(Debug, Error)]
pub enum SettingError {
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Runs timeline operations against a store.
///
/// Every mutation holds the store's write lock from the moment the records
/// are read until the changes and the re-derived active flag are committed.
/// A rejected plan drops the transaction, leaving storage untouched.
#[derive(Clone)]
pub struct SettingService {
    store: Arc<dyn SettingStore>,
    audit: bool,
}

impl SettingService {
    pub fn new(store: Arc<dyn SettingStore>) -> Self {
        Self { store, audit: false }
    }

    /// Emit `audit` events for every successful mutation.
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit = enabled;
        self
    }

    pub async fn ping(&self) -> Result<(), SettingError> {
        Ok(self.store.ping().await?)
    }

    /// Every record, newest start first.
    pub async fn list(&self) -> Result<Vec<SettingRecord>, SettingError> {
        let mut records = self.store.snapshot().await?;
        records.sort_by(|a, b| SettingRecord::chronological(b, a));
        Ok(records)
    }

    /// The setting in effect on `today`, computed from the dates rather than
    /// the stored flag.
    pub async fn current(&self, today: NaiveDate) -> Result<Option<SettingRecord>, SettingError> {
        let records = self.store.snapshot().await?;
        Ok(resolve_active(&records, today).cloned())
    }

    pub async fn create(
        &self,
        input: SettingInput,
        created_by: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<CreateOutcome, SettingError> {
        let tx = self.store.begin().await?;
        let planned = timeline::plan_create(tx.records(), input, created_by, today, Utc::now())
            .map_err(|e| rejected("create", e))?;

        let (mut outcome, timeline) = self.commit(tx, planned, today).await?;
        sync_flag(&mut outcome.record, &timeline);

        info!(
            "Created setting {} from {} ({} auto-adjusted)",
            outcome.record.id,
            outcome.record.valid_from,
            outcome.auto_adjusted.len()
        );
        if self.audit {
            info!(
                target: "audit",
                action = "setting.create",
                setting = %outcome.record.id,
                actor = ?created_by,
                adjusted = ?outcome.auto_adjusted.iter().map(|a| a.id).collect::<Vec<_>>(),
                "setting created"
            );
        }
        Ok(outcome)
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: SettingInput,
        actor: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<UpdateOutcome, SettingError> {
        let tx = self.store.begin().await?;
        let planned =
            timeline::plan_update(tx.records(), id, input, Utc::now()).map_err(|e| rejected("update", e))?;

        let (mut outcome, timeline) = self.commit(tx, planned, today).await?;
        sync_flag(&mut outcome.record, &timeline);

        info!("Updated setting {}", id);
        if self.audit {
            info!(target: "audit", action = "setting.update", setting = %id, actor = ?actor, "setting updated");
        }
        Ok(outcome)
    }

    pub async fn delete(
        &self,
        id: Uuid,
        actor: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<DeleteOutcome, SettingError> {
        let tx = self.store.begin().await?;
        let planned =
            timeline::plan_delete(tx.records(), id, today, Utc::now()).map_err(|e| rejected("delete", e))?;

        let (outcome, _) = self.commit(tx, planned, today).await?;

        info!(
            "Deleted setting {} (predecessor adjusted: {})",
            id,
            outcome.adjusted_predecessor.is_some()
        );
        if self.audit {
            info!(
                target: "audit",
                action = "setting.delete",
                setting = %id,
                actor = ?actor,
                adjusted = ?outcome.adjusted_predecessor.as_ref().map(|a| a.id),
                "setting deleted"
            );
        }
        Ok(outcome)
    }

    pub async fn recalculate(
        &self,
        actor: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<RecalculateOutcome, SettingError> {
        let tx = self.store.begin().await?;
        let planned = timeline::plan_recalculate(tx.records(), Utc::now());

        let (outcome, _) = self.commit(tx, planned, today).await?;

        info!("Recalculated timeline: {} record(s) changed", outcome.changed_count);
        if self.audit {
            info!(
                target: "audit",
                action = "setting.recalculate",
                actor = ?actor,
                changed = outcome.changed_count,
                "timeline recalculated"
            );
        }
        Ok(outcome)
    }

    /// Re-derive the active flag for `today` and return the active record.
    ///
    /// Called after startup, since the calendar moves on without any write.
    pub async fn refresh_active(&self, today: NaiveDate) -> Result<Option<SettingRecord>, SettingError> {
        let tx = self.store.begin().await?;
        let planned = Planned {
            changes: Default::default(),
            outcome: (),
        };

        let ((), timeline) = self.commit(tx, planned, today).await?;
        let active = timeline.into_iter().find(|r| r.is_active);

        match &active {
            Some(record) => info!("Active setting for {}: {} ({})", today, record.id, record.monthly_limit),
            None => warn!("No setting is in effect on {}", today),
        }
        Ok(active)
    }

    async fn commit<T>(
        &self,
        tx: Box<dyn TimelineTx>,
        planned: Planned<T>,
        today: NaiveDate,
    ) -> Result<(T, Vec<SettingRecord>), SettingError> {
        let mut timeline = tx.records().to_vec();
        planned.changes.apply(&mut timeline);
        let active = mark_active(&mut timeline, today);

        tx.commit(&planned.changes, active).await?;
        Ok((planned.outcome, timeline))
    }
}

fn rejected(operation: &str, err: TimelineError) -> TimelineError {
    warn!("Setting {} rejected: {}", operation, err);
    err
}

fn sync_flag(record: &mut SettingRecord, timeline: &[SettingRecord]) {
    if let Some(stored) = timeline.iter().find(|r| r.id == record.id) {
        record.is_active = stored.is_active;
    }
}
