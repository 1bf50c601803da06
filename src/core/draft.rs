//! In-progress attendance marks for one site and day
//!
//! The draft is owned by whoever is collecting marks (a form, a request
//! handler) and is turned into a submission payload once complete. Nothing
//! here touches the grouping or sheet code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ObraError, ObraResult};
use crate::types::{AttendanceRecord, Shift};

/// Marks for a single worker; `present: None` means not yet marked
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftMark {
    pub present: Option<bool>,
    pub overtime_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDraft {
    marks: BTreeMap<String, DraftMark>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DraftStats {
    pub present: usize,
    pub absent: usize,
    pub marked: usize,
}

/// One line of a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionEntry {
    pub worker_id: String,
    pub present: bool,
    pub shift: Shift,
    pub overtime_hours: f64,
}

/// Payload that replaces a site's attendance for one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSubmission {
    pub date: NaiveDate,
    pub site_id: String,
    pub leader_id: String,
    pub entries: Vec<SubmissionEntry>,
}

impl AttendanceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a draft from records already stored for one date and site.
    ///
    /// A worker listed twice keeps the later record.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        let mut draft = Self::new();
        for record in records {
            draft.marks.insert(
                record.worker_id.clone(),
                DraftMark {
                    present: Some(record.present),
                    overtime_hours: record.overtime_hours,
                },
            );
        }
        draft
    }

    /// Mark a worker present or absent; repeating the current mark clears it
    pub fn toggle_presence(&mut self, worker_id: &str, present: bool) {
        let mark = self.marks.entry(worker_id.to_string()).or_default();
        mark.present = if mark.present == Some(present) {
            None
        } else {
            Some(present)
        };
    }

    /// Set a worker's mark outright, regardless of its current state
    pub fn set_presence(&mut self, worker_id: &str, present: Option<bool>) {
        self.marks.entry(worker_id.to_string()).or_default().present = present;
    }

    /// Record overtime; unusable input (NaN, negative) is stored as 0
    pub fn set_overtime(&mut self, worker_id: &str, hours: f64) {
        let hours = if hours.is_finite() && hours > 0.0 {
            hours
        } else {
            0.0
        };
        self.marks.entry(worker_id.to_string()).or_default().overtime_hours = hours;
    }

    pub fn mark(&self, worker_id: &str) -> Option<&DraftMark> {
        self.marks.get(worker_id)
    }

    pub fn stats(&self) -> DraftStats {
        let mut stats = DraftStats::default();
        for mark in self.marks.values() {
            match mark.present {
                Some(true) => stats.present += 1,
                Some(false) => stats.absent += 1,
                None => {}
            }
        }
        stats.marked = stats.present + stats.absent;
        stats
    }

    /// Build the submission for `date` at `site_id`.
    ///
    /// Only workers with a presence mark are included. The site must have a
    /// leader and at least one worker must be marked.
    pub fn into_submission(
        self,
        date: NaiveDate,
        site_id: &str,
        leader_id: Option<&str>,
        shift: Shift,
    ) -> ObraResult<AttendanceSubmission> {
        let leader_id = leader_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ObraError::Submission("site has no leader assigned".to_string()))?;

        let entries: Vec<SubmissionEntry> = self
            .marks
            .into_iter()
            .filter_map(|(worker_id, mark)| {
                mark.present.map(|present| SubmissionEntry {
                    worker_id,
                    present,
                    shift,
                    overtime_hours: mark.overtime_hours,
                })
            })
            .collect();

        if entries.is_empty() {
            return Err(ObraError::Submission(
                "at least one worker must be marked".to_string(),
            ));
        }

        Ok(AttendanceSubmission {
            date,
            site_id: site_id.to_string(),
            leader_id: leader_id.to_string(),
            entries,
        })
    }
}
