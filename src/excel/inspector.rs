//! Reads an exported workbook back (.xlsx → sheet summaries)

use crate::error::{ObraError, ObraResult};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What one worksheet of an exported file contains
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetSummary {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    /// `(row, col, formula text)`, zero-based, without the leading `=`
    pub formulas: Vec<(u32, u32, String)>,
}

impl SheetSummary {
    pub fn formula_at(&self, row: u32, col: u32) -> Option<&str> {
        self.formulas
            .iter()
            .find(|(r, c, _)| *r == row && *c == col)
            .map(|(_, _, f)| f.as_str())
    }
}

pub struct WorkbookInspector {
    path: PathBuf,
}

impl WorkbookInspector {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn inspect(&self) -> ObraResult<Vec<SheetSummary>> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| ObraError::Export(format!("Failed to open Excel file: {}", e)))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let mut summaries = Vec::with_capacity(sheet_names.len());

        for name in sheet_names {
            let values = workbook
                .worksheet_range(&name)
                .map_err(|e| ObraError::Export(format!("Failed to read sheet '{}': {}", name, e)))?;
            let formulas = workbook
                .worksheet_formula(&name)
                .map_err(|e| {
                    ObraError::Export(format!("Failed to read formulas of '{}': {}", name, e))
                })?;
            summaries.push(Self::summarize(name, &values, &formulas));
        }

        Ok(summaries)
    }

    /// Text value of one cell, if the sheet has a string there
    pub fn read_text(&self, sheet: &str, row: u32, col: u32) -> ObraResult<Option<String>> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| ObraError::Export(format!("Failed to open Excel file: {}", e)))?;
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| ObraError::Export(format!("Failed to read sheet '{}': {}", sheet, e)))?;
        Ok(match range.get_value((row, col)) {
            Some(Data::String(s)) => Some(s.clone()),
            _ => None,
        })
    }

    fn summarize(name: String, values: &Range<Data>, formulas: &Range<String>) -> SheetSummary {
        let (rows, cols) = match values.end() {
            Some((r, c)) => (r as usize + 1, c as usize + 1),
            None => (0, 0),
        };

        let (row_offset, col_offset) = formulas.start().unwrap_or((0, 0));
        let formulas = formulas
            .used_cells()
            .map(|(r, c, f)| {
                (
                    row_offset + r as u32,
                    col_offset + c as u32,
                    f.trim_start_matches('=').to_string(),
                )
            })
            .collect();

        SheetSummary {
            name,
            rows,
            cols,
            formulas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_missing_file_fails() {
        let inspector = WorkbookInspector::new("/nonexistent/asistencia.xlsx");
        assert!(matches!(inspector.inspect(), Err(ObraError::Export(_))));
    }

    #[test]
    fn test_formula_at() {
        let summary = SheetSummary {
            name: "A".to_string(),
            rows: 1,
            cols: 1,
            formulas: vec![(5, 33, "COUNTIF(C6:AG6,\"○\")".to_string())],
        };
        assert!(summary.formula_at(5, 33).unwrap().starts_with("COUNTIF"));
        assert!(summary.formula_at(0, 0).is_none());
    }
}
