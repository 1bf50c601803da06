//! Excel exporter implementation

use crate::error::ObraResult;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Formula, Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use super::grid::{format_number, Cell, CellRef, Grid};
use super::layout::HEADER_ROWS;
use super::workbook::{AttendanceWorkbook, NamedSheet};

/// Writes an assembled attendance workbook to .xlsx
pub struct ExcelExporter {
    workbook: AttendanceWorkbook,
}

struct SheetFormats {
    header: Format,
    merged: Format,
    body: Format,
    hours: Format,
}

impl SheetFormats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin),
            merged: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap()
                .set_border(FormatBorder::Thin),
            body: Format::new().set_border(FormatBorder::Thin),
            hours: Format::new()
                .set_border(FormatBorder::Thin)
                .set_num_format("0.0#"),
        }
    }
}

impl ExcelExporter {
    pub fn new(workbook: AttendanceWorkbook) -> Self {
        Self { workbook }
    }

    pub fn workbook(&self) -> &AttendanceWorkbook {
        &self.workbook
    }

    /// Export the workbook to an .xlsx file
    pub fn export(&self, output_path: &Path) -> ObraResult<()> {
        let mut workbook = self.build()?;
        workbook.save(output_path)?;
        info!(
            path = %output_path.display(),
            sheets = self.workbook.sheets.len(),
            "saved attendance workbook"
        );
        Ok(())
    }

    /// Export the workbook to an in-memory .xlsx buffer
    pub fn to_buffer(&self) -> ObraResult<Vec<u8>> {
        let mut workbook = self.build()?;
        Ok(workbook.save_to_buffer()?)
    }

    fn build(&self) -> ObraResult<Workbook> {
        let mut workbook = Workbook::new();
        let formats = SheetFormats::new();

        for sheet in &self.workbook.sheets {
            let worksheet = workbook.add_worksheet();
            Self::export_sheet(worksheet, sheet, &formats)?;
        }

        Ok(workbook)
    }

    /// Export a single laid-out sheet
    fn export_sheet(
        worksheet: &mut Worksheet,
        sheet: &NamedSheet,
        formats: &SheetFormats,
    ) -> ObraResult<()> {
        worksheet.set_name(&sheet.name)?;
        let grid = &sheet.grid;

        for width in grid.column_widths() {
            worksheet.set_column_width(width.col, width.width)?;
        }

        // Merged regions carry their anchor cell's text
        let mut anchors: HashSet<CellRef> = HashSet::new();
        for range in grid.merges() {
            let text = grid
                .cell(range.first.row, range.first.col)
                .as_text()
                .unwrap_or_default();
            worksheet.merge_range(
                range.first.row,
                range.first.col,
                range.last.row,
                range.last.col,
                text,
                &formats.merged,
            )?;
            anchors.insert(range.first);
        }

        for (at, cell) in grid.filled_cells() {
            if anchors.contains(&at) {
                continue;
            }
            Self::write_cell(worksheet, grid, at, cell, formats)?;
        }

        Ok(())
    }

    fn write_cell(
        worksheet: &mut Worksheet,
        grid: &Grid,
        at: CellRef,
        cell: &Cell,
        formats: &SheetFormats,
    ) -> ObraResult<()> {
        let in_header = at.row < HEADER_ROWS;
        let text_format = if in_header {
            &formats.header
        } else {
            &formats.body
        };

        match cell {
            Cell::Empty => {}
            Cell::Text(text) => {
                worksheet.write_string_with_format(at.row, at.col, text, text_format)?;
            }
            Cell::Number(value) => {
                let format = if in_header { &formats.header } else { &formats.hours };
                worksheet.write_number_with_format(at.row, at.col, *value, format)?;
            }
            Cell::Formula(formula) => {
                // Cached result so viewers that don't recalculate still show totals
                let result = grid.evaluate_formula(formula);
                let formula = Formula::new(formula.to_string()).set_result(format_number(result));
                worksheet.write_formula_with_format(at.row, at.col, formula, &formats.body)?;
            }
        }
        Ok(())
    }
}
