use chrono::NaiveDate;
use uuid::Uuid;

use super::SettingRecord;

/// The record in effect on `today`: the latest start on or before `today`
/// whose interval still covers it. Ignores the persisted `is_active` flag.
pub fn resolve_active(records: &[SettingRecord], today: NaiveDate) -> Option<&SettingRecord> {
    records
        .iter()
        .filter(|r| r.covers(today))
        .max_by(|a, b| SettingRecord::chronological(a, b))
}

/// Re-derive `is_active` for every record and return the id now flagged.
pub fn mark_active(records: &mut [SettingRecord], today: NaiveDate) -> Option<Uuid> {
    let active = resolve_active(records, today).map(|r| r.id);
    for record in records.iter_mut() {
        record.is_active = Some(record.id) == active;
    }
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::fixtures::{date, record};

    #[test]
    fn picks_record_covering_today() {
        let records = vec![
            record("2024-01-01", Some("2024-06-30"), "H1"),
            record("2024-07-01", Some("2024-12-31"), "H2"),
            record("2025-01-01", None, "2025"),
        ];

        assert_eq!(resolve_active(&records, date("2024-03-15")).unwrap().description, "H1");
        assert_eq!(resolve_active(&records, date("2024-07-01")).unwrap().description, "H2");
        assert_eq!(resolve_active(&records, date("2031-01-01")).unwrap().description, "2025");
        assert!(resolve_active(&records, date("2023-12-31")).is_none());
    }

    #[test]
    fn gap_means_no_current_setting() {
        let records = vec![
            record("2024-01-01", Some("2024-03-31"), "Q1"),
            record("2024-07-01", None, "H2"),
        ];
        assert!(resolve_active(&records, date("2024-05-01")).is_none());
    }

    #[test]
    fn prefers_latest_start_when_intervals_overlap() {
        let records = vec![
            record("2024-01-01", None, "old"),
            record("2024-06-01", Some("2024-12-31"), "newer"),
        ];
        assert_eq!(resolve_active(&records, date("2024-08-01")).unwrap().description, "newer");
        assert_eq!(resolve_active(&records, date("2025-02-01")).unwrap().description, "old");
    }

    #[test]
    fn ignores_persisted_flag() {
        let mut stale = record("2020-01-01", Some("2020-12-31"), "stale");
        stale.is_active = true;
        let current = record("2021-01-01", None, "current");

        let records = vec![stale, current];
        assert_eq!(resolve_active(&records, date("2022-01-01")).unwrap().description, "current");
    }

    #[test]
    fn mark_active_flags_exactly_one_and_clears_the_rest() {
        let mut records = vec![
            record("2024-01-01", Some("2024-12-31"), "2024"),
            record("2025-01-01", None, "2025"),
        ];
        records[0].is_active = true;

        let active = mark_active(&mut records, date("2025-02-01"));

        assert_eq!(active, Some(records[1].id));
        assert!(!records[0].is_active);
        assert!(records[1].is_active);
        assert_eq!(records.iter().filter(|r| r.is_active).count(), 1);

        // running again changes nothing
        let again = mark_active(&mut records, date("2025-02-01"));
        assert_eq!(again, active);
    }

    #[test]
    fn mark_active_with_nothing_in_effect_clears_all() {
        let mut records = vec![record("2030-01-01", None, "future")];
        records[0].is_active = true;

        assert_eq!(mark_active(&mut records, date("2025-01-01")), None);
        assert!(!records[0].is_active);
    }
}
