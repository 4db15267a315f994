use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::validation::validate_input;
use super::{
    day_before, Adjustment, ChangeSet, ConflictingRecord, CreateOutcome, DeleteOutcome, Planned,
    RecalculateOutcome, SettingInput, SettingRecord, TimelineError, UpdateOutcome,
};

/// Plan the insertion of a new setting.
///
/// The new interval may only overlap a single open-ended record that started
/// earlier; that record is cut off the day before the new one begins. Every
/// other overlap is reported back as a conflict for manual resolution.
pub fn plan_create(
    records: &[SettingRecord],
    input: SettingInput,
    created_by: Option<Uuid>,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Planned<CreateOutcome>, TimelineError> {
    let input = validate_input(input)?;

    if input.valid_from < today {
        return Err(TimelineError::validation(
            "validFrom",
            format!("Start date must not be before {}", today),
        ));
    }

    let mut overlapping: Vec<&SettingRecord> = records
        .iter()
        .filter(|r| r.intersects(input.valid_from, input.valid_until))
        .collect();
    overlapping.sort_by(|a, b| SettingRecord::chronological(a, b));

    let mut changes = ChangeSet::default();
    let mut auto_adjusted = Vec::new();

    match overlapping.as_slice() {
        [] => {}
        [only] if only.is_open_ended() && only.valid_from < input.valid_from => {
            let new_until = Some(day_before(input.valid_from));
            auto_adjusted.push(Adjustment::of(only, new_until));
            changes.updates.push(SettingRecord {
                valid_until: new_until,
                updated_at: now,
                ..(*only).clone()
            });
        }
        blocking => {
            return Err(TimelineError::Conflict {
                conflicts: blocking.iter().map(|r| ConflictingRecord::from(*r)).collect(),
            });
        }
    }

    let record = SettingRecord {
        id: Uuid::new_v4(),
        monthly_limit: input.monthly_limit,
        description: input.description,
        valid_from: input.valid_from,
        valid_until: input.valid_until,
        is_active: false,
        created_by,
        created_at: now,
        updated_at: now,
    };
    changes.inserts.push(record.clone());

    Ok(Planned {
        changes,
        outcome: CreateOutcome { record, auto_adjusted },
    })
}

/// Plan an edit of an existing setting.
///
/// Only the record's own fields are checked; siblings are not re-validated
/// against the new interval and past start dates are allowed.
pub fn plan_update(
    records: &[SettingRecord],
    id: Uuid,
    input: SettingInput,
    now: DateTime<Utc>,
) -> Result<Planned<UpdateOutcome>, TimelineError> {
    let existing = records
        .iter()
        .find(|r| r.id == id)
        .ok_or(TimelineError::NotFound(id))?;

    let input = validate_input(input)?;

    let record = SettingRecord {
        monthly_limit: input.monthly_limit,
        description: input.description,
        valid_from: input.valid_from,
        valid_until: input.valid_until,
        updated_at: now,
        ..existing.clone()
    };

    Ok(Planned {
        changes: ChangeSet {
            updates: vec![record.clone()],
            ..ChangeSet::default()
        },
        outcome: UpdateOutcome { record },
    })
}

/// Plan the removal of a future setting, closing the gap it leaves behind.
///
/// The chronological predecessor is stretched up to the day before the
/// successor, or made open-ended when there is none. The adjustment is
/// reported even when the end date does not actually move.
pub fn plan_delete(
    records: &[SettingRecord],
    id: Uuid,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Planned<DeleteOutcome>, TimelineError> {
    let target = records
        .iter()
        .find(|r| r.id == id)
        .ok_or(TimelineError::NotFound(id))?;

    if target.valid_from <= today {
        return Err(TimelineError::IllegalState(format!(
            "Setting {} started on {} and can no longer be deleted; only future settings can be removed",
            target.id, target.valid_from
        )));
    }

    let previous = records
        .iter()
        .filter(|r| r.id != id && r.valid_from < target.valid_from)
        .max_by(|a, b| SettingRecord::chronological(a, b));
    let next = records
        .iter()
        .filter(|r| r.id != id && r.valid_from > target.valid_from)
        .min_by(|a, b| SettingRecord::chronological(a, b));

    let mut changes = ChangeSet {
        deletes: vec![target.id],
        ..ChangeSet::default()
    };

    let adjusted_predecessor = previous.map(|prev| {
        let new_until = next.map(|n| day_before(n.valid_from));
        changes.updates.push(SettingRecord {
            valid_until: new_until,
            updated_at: now,
            ..prev.clone()
        });
        Adjustment::of(prev, new_until)
    });

    Ok(Planned {
        changes,
        outcome: DeleteOutcome {
            deleted_record: target.clone(),
            adjusted_predecessor,
        },
    })
}

/// Rebuild every end date from chronological order.
///
/// Each record ends the day before its successor starts and the last one is
/// open-ended. Only records whose end date differs are written.
pub fn plan_recalculate(
    records: &[SettingRecord],
    now: DateTime<Utc>,
) -> Planned<RecalculateOutcome> {
    let mut ordered: Vec<&SettingRecord> = records.iter().collect();
    ordered.sort_by(|a, b| SettingRecord::chronological(a, b));

    let mut changes = ChangeSet::default();
    let mut adjustments = Vec::new();

    for (i, record) in ordered.iter().enumerate() {
        let expected = ordered.get(i + 1).map(|next| day_before(next.valid_from));
        if record.valid_until != expected {
            adjustments.push(Adjustment::of(record, expected));
            changes.updates.push(SettingRecord {
                valid_until: expected,
                updated_at: now,
                ..(*record).clone()
            });
        }
    }

    Planned {
        changes,
        outcome: RecalculateOutcome {
            changed_count: adjustments.len(),
            changes: adjustments,
        },
    }
}
