//! Grouping engine: flat attendance records → one group per job site

use std::collections::HashMap;
use tracing::debug;

use crate::types::{AttendanceRecord, DateRange, SiteGroup, WorkerAttendance};

/// Partition records by site, then by worker.
///
/// - Sites and workers keep first-seen order.
/// - Duplicate (site, worker, date) entries resolve last-write-wins.
/// - Every group carries `range` verbatim; records are not re-filtered by it.
pub fn group(records: &[AttendanceRecord], range: DateRange) -> Vec<SiteGroup> {
    let mut groups: Vec<SiteGroup> = Vec::new();
    let mut site_index: HashMap<&str, usize> = HashMap::new();
    let mut worker_index: HashMap<(&str, &str), usize> = HashMap::new();

    for record in records {
        let group_idx = *site_index
            .entry(record.site_id.as_str())
            .or_insert_with(|| {
                groups.push(SiteGroup::new(
                    record.site_id.clone(),
                    record.site_name.clone(),
                    record.client_name.clone().unwrap_or_default(),
                    range,
                ));
                groups.len() - 1
            });
        let group = &mut groups[group_idx];

        let worker_idx = *worker_index
            .entry((record.site_id.as_str(), record.worker_id.as_str()))
            .or_insert_with(|| {
                group.workers.push(WorkerAttendance::new(
                    record.worker_id.clone(),
                    record.worker_display_name(),
                ));
                group.workers.len() - 1
            });
        let worker = &mut group.workers[worker_idx];

        worker.attendance.insert(record.date, record.present);
        worker.overtime.insert(record.date, record.overtime_hours);
    }

    debug!(
        records = records.len(),
        sites = groups.len(),
        "grouped attendance records"
    );
    groups
}
