//! Obra Sheet - construction-site attendance to bilingual payroll workbooks
//!
//! This library turns daily attendance records into a spreadsheet with one
//! worksheet per site: a date column for every calendar day in the export
//! range, a presence row and an overtime row per worker, and live COUNTIF /
//! SUM formulas for subtotals and grand totals.
//!
//! # Features
//!
//! - JSON / YAML record loading with boundary validation
//! - Grouping by site and worker, first-seen order preserved
//! - Japanese-era dates and month markers in a bilingual header
//! - Excel export (rust_xlsxwriter) and read-back (calamine)
//! - Attendance drafts that validate into submission payloads
//!
//! # Example
//!
//! ```no_run
//! use obra_sheet::core::RecordQuery;
//! use obra_sheet::excel::{workbook_from_records, ExcelExporter, SheetLayout};
//! use obra_sheet::parser::load_records;
//! use obra_sheet::types::DateRange;
//! use chrono::NaiveDate;
//! use std::path::Path;
//!
//! let records = load_records(Path::new("records.json"))?;
//! let range = DateRange::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 21).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
//! )?;
//!
//! let workbook = workbook_from_records(
//!     &records,
//!     range,
//!     &RecordQuery::default(),
//!     &SheetLayout::default(),
//! )?;
//! println!("Sheets: {:?}", workbook.sheet_names());
//!
//! ExcelExporter::new(workbook).export(Path::new("asistencia.xlsx"))?;
//! # Ok::<(), obra_sheet::error::ObraError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod parser;
pub mod types;

// Re-export commonly used types
pub use error::{ObraError, ObraResult};
pub use types::{AttendanceRecord, DateRange, Shift, SiteGroup, WorkerAttendance};
