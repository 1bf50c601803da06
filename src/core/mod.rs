//! Attendance computations: grouping, calendar math, queries, drafts

pub mod calendar;
pub mod draft;
pub mod grouping;
pub mod query;

pub use calendar::{expand, month_markers, to_era_label, weekday_symbol};
pub use draft::{AttendanceDraft, AttendanceSubmission, DraftStats, SubmissionEntry};
pub use grouping::group;
pub use query::{summarize, RecordQuery, ReportSummary};
