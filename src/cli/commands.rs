use crate::config::ReportConfig;
use crate::core::{summarize, RecordQuery, ReportSummary};
use crate::error::ObraResult;
use crate::excel::layout::{
    attendance_row, overtime_row, ColumnPlan, COL_FIRST_DATE, COL_NAME, ROW_DAYS,
};
use crate::excel::{
    export_file_name, format_number, workbook_from_records, AttendanceWorkbook, Cell,
    ExcelExporter, NamedSheet, SheetLayout, WorkbookInspector,
};
use crate::parser;
use crate::types::{AttendanceRecord, DateRange};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Execute the export command
pub fn export(
    records: PathBuf,
    range: (NaiveDate, NaiveDate),
    query: RecordQuery,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
) -> ObraResult<()> {
    let config = ReportConfig::load_or_default(config.as_deref())?;
    let output = output.unwrap_or_else(|| default_output_path(&config, today()));

    println!("{}", "🏗️  Obra Sheet - Excel Export".bold().green());
    println!("   Records: {}", records.display());
    println!("   Range:   {} → {}", range.0, range.1);
    println!("   Output:  {}\n", output.display());

    let workbook = build_workbook(&records, range, &query, &config, verbose)?;

    if verbose {
        println!("{}", "📊 Writing workbook...".cyan());
    }

    let exporter = ExcelExporter::new(workbook);
    exporter.export(&output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}", output.display());
    for sheet in &exporter.workbook().sheets {
        println!("   📄 {}", sheet.name.bright_blue());
    }
    println!();

    Ok(())
}

/// Execute the summary command; `verbose` also lists the matching records
pub fn summary(records: PathBuf, query: RecordQuery, verbose: bool) -> ObraResult<()> {
    println!("{}", "🏗️  Obra Sheet - Attendance Summary".bold().green());
    println!("   Records: {}\n", records.display());

    let all = parser::load_records(&records)?;
    let selected = query.apply(&all);
    let totals = summarize(&selected);

    if verbose {
        print_records(&selected);
    }
    print_summary(&totals);
    Ok(())
}

/// Execute the preview command - lay out sheets and print their totals
pub fn preview(
    records: PathBuf,
    range: (NaiveDate, NaiveDate),
    query: RecordQuery,
    config: Option<PathBuf>,
    verbose: bool,
) -> ObraResult<()> {
    let config = ReportConfig::load_or_default(config.as_deref())?;

    println!("{}", "🏗️  Obra Sheet - Preview".bold().green());
    println!("   Records: {}", records.display());
    println!("   Range:   {} → {}\n", range.0, range.1);

    let workbook = build_workbook(&records, range, &query, &config, verbose)?;

    for sheet in &workbook.sheets {
        print_sheet_totals(sheet)?;
    }

    Ok(())
}

/// Execute the inspect command - read an exported workbook back
pub fn inspect(file: PathBuf, verbose: bool) -> ObraResult<()> {
    println!("{}", "🔍 Obra Sheet - Inspect Workbook".bold().green());
    println!("   File: {}\n", file.display());

    let summaries = WorkbookInspector::new(&file).inspect()?;

    for sheet in &summaries {
        println!("   📄 Sheet: {}", sheet.name.bright_blue().bold());
        println!(
            "      {} rows × {} columns, {} formulas",
            sheet.rows,
            sheet.cols,
            sheet.formulas.len()
        );
        if verbose {
            for (row, col, formula) in &sheet.formulas {
                println!("      ({}, {}) ={}", row, col, formula.cyan());
            }
        }
    }
    println!();

    Ok(())
}

/// Load, filter, group and lay out records for `range`
fn build_workbook(
    records: &Path,
    range: (NaiveDate, NaiveDate),
    query: &RecordQuery,
    config: &ReportConfig,
    verbose: bool,
) -> ObraResult<AttendanceWorkbook> {
    let range = DateRange::new(range.0, range.1)?;

    if verbose {
        println!("{}", "📖 Reading attendance records...".cyan());
    }

    let all = parser::load_records(records)?;

    if verbose {
        println!("   Found {} records", all.len());
        println!("   Covering {} days\n", range.day_count());
    }

    let layout = SheetLayout::new(config.company_name.as_str());
    workbook_from_records(&all, range, query, &layout)
}

fn print_records(records: &[AttendanceRecord]) {
    println!("{}", "📖 Records:".bold().cyan());
    for record in records {
        println!("{}", record_line(record));
    }
    println!();
}

/// Date, site, worker, position, shift, presence and overtime of one record
fn record_line(record: &AttendanceRecord) -> String {
    let presence = if record.present { "present" } else { "absent" };
    format!(
        "   {}  {:<20} {:<24} {:<14} {:<12} {:<8} {} h",
        record.date,
        record.site_name,
        record.worker_display_name(),
        record.position.as_deref().unwrap_or("-"),
        record.shift.map(|s| s.label()).unwrap_or("-"),
        presence,
        format_number(record.overtime_hours)
    )
}

fn print_summary(totals: &ReportSummary) {
    println!("{}", "📋 Summary:".bold().cyan());
    println!("   Records:        {}", totals.total.to_string().bold());
    println!("   Present:        {}", totals.present.to_string().green());
    println!("   Absent:         {}", totals.absent.to_string().red());
    println!(
        "   Overtime hours: {}",
        format_number(totals.overtime_hours).bold()
    );
    println!();
}

/// Per-worker subtotals and the grand totals of one laid-out sheet
fn print_sheet_totals(sheet: &NamedSheet) -> ObraResult<()> {
    let grid = &sheet.grid;
    let plan = ColumnPlan::new(sheet_day_count(sheet))?;

    println!("   📄 Sheet: {}", sheet.name.bright_blue().bold());

    let mut k = 0;
    while let Some(name) = grid.cell(attendance_row(k), COL_NAME).as_text() {
        let days = grid
            .evaluate(attendance_row(k), plan.regular_subtotal_col())
            .unwrap_or(0.0);
        let hours = grid
            .evaluate(overtime_row(k), plan.overtime_subtotal_col())
            .unwrap_or(0.0);
        println!(
            "      {:<24} {:>4} days {:>7} h",
            name,
            format_number(days),
            format_number(hours)
        );
        k += 1;
    }

    let total_row = attendance_row(k);
    if let (Some(days), Some(hours)) = (
        grid.evaluate(total_row, plan.regular_subtotal_col()),
        grid.evaluate(total_row + 1, plan.overtime_subtotal_col()),
    ) {
        println!(
            "      {:<24} {:>4} days {:>7} h",
            "Total".bold(),
            format_number(days).bold(),
            format_number(hours).bold()
        );
    }
    println!();
    Ok(())
}

/// Number of date columns, read off the day-number header row
fn sheet_day_count(sheet: &NamedSheet) -> usize {
    (COL_FIRST_DATE..)
        .take_while(|col| matches!(sheet.grid.cell(ROW_DAYS, *col), Cell::Number(_)))
        .count()
}

fn default_output_path(config: &ReportConfig, export_date: NaiveDate) -> PathBuf {
    config
        .output_dir
        .join(export_file_name(&config.file_prefix, export_date))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
