//! Payroll workbook generation
//!
//! - Layout: site group → [`Grid`] (cells, live formulas, merges, widths)
//! - Assembly: groups → [`AttendanceWorkbook`], one sheet per site
//! - Export: workbook → .xlsx via rust_xlsxwriter
//! - Inspection: .xlsx → sheet summaries via calamine

mod exporter;
pub mod grid;
mod inspector;
pub mod layout;
pub mod workbook;

pub use exporter::ExcelExporter;
pub use grid::{column_letter, format_number, Cell, CellRange, CellRef, ColumnWidth, Grid, SheetFormula};
pub use inspector::{SheetSummary, WorkbookInspector};
pub use layout::{layout, ColumnPlan, SheetLayout};
pub use workbook::{
    assemble, export_file_name, sanitize_sheet_name, workbook_from_records, AttendanceWorkbook,
    NamedSheet,
};
