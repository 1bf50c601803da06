//! Record queries and report summaries over an in-memory record snapshot

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::AttendanceRecord;

/// Filters the record store accepts; every set field must match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub client_id: Option<String>,
    pub site_id: Option<String>,
    pub worker_id: Option<String>,
    pub leader_id: Option<String>,
}

impl RecordQuery {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if self.from.is_some_and(|from| record.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| record.date > to) {
            return false;
        }
        Self::id_matches(&self.client_id, record.client_id.as_deref())
            && Self::id_matches(&self.site_id, Some(&record.site_id))
            && Self::id_matches(&self.worker_id, Some(&record.worker_id))
            && Self::id_matches(&self.leader_id, record.leader_id.as_deref())
    }

    /// Records matching this query, input order preserved
    pub fn apply(&self, records: &[AttendanceRecord]) -> Vec<AttendanceRecord> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }

    fn id_matches(wanted: &Option<String>, actual: Option<&str>) -> bool {
        match wanted {
            None => true,
            Some(id) => actual == Some(id.as_str()),
        }
    }
}

/// Headline numbers for a set of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub overtime_hours: f64,
}

pub fn summarize(records: &[AttendanceRecord]) -> ReportSummary {
    records.iter().fold(ReportSummary::default(), |mut acc, r| {
        acc.total += 1;
        if r.present {
            acc.present += 1;
        } else {
            acc.absent += 1;
        }
        acc.overtime_hours += r.overtime_hours;
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(day: NaiveDate, present: bool, ot: f64) -> AttendanceRecord {
        AttendanceRecord {
            site_id: "1".to_string(),
            site_name: "Edificio Central".to_string(),
            client_id: Some("10".to_string()),
            client_name: None,
            leader_id: Some("5".to_string()),
            worker_id: "7".to_string(),
            worker_first_name: "Miguel".to_string(),
            worker_last_name: "Rodríguez".to_string(),
            position: None,
            date: day,
            present,
            shift: None,
            overtime_hours: ot,
        }
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(RecordQuery::default().matches(&record(date(2024, 1, 1), true, 0.0)));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let query = RecordQuery {
            from: Some(date(2024, 1, 10)),
            to: Some(date(2024, 1, 20)),
            ..Default::default()
        };
        assert!(query.matches(&record(date(2024, 1, 10), true, 0.0)));
        assert!(query.matches(&record(date(2024, 1, 20), true, 0.0)));
        assert!(!query.matches(&record(date(2024, 1, 9), true, 0.0)));
        assert!(!query.matches(&record(date(2024, 1, 21), true, 0.0)));
    }

    #[test]
    fn test_id_filters_are_conjunctive() {
        let r = record(date(2024, 1, 1), true, 0.0);
        let query = RecordQuery {
            site_id: Some("1".to_string()),
            leader_id: Some("5".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&r));
        let query = RecordQuery {
            site_id: Some("1".to_string()),
            client_id: Some("11".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&r));
    }

    #[test]
    fn test_missing_optional_id_fails_filter() {
        let mut r = record(date(2024, 1, 1), true, 0.0);
        r.leader_id = None;
        let query = RecordQuery {
            leader_id: Some("5".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&r));
    }

    #[test]
    fn test_summarize() {
        let records = vec![
            record(date(2024, 1, 1), true, 2.0),
            record(date(2024, 1, 2), false, 0.0),
            record(date(2024, 1, 3), true, 1.5),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.present, 2);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.overtime_hours, 3.5);
    }
}
