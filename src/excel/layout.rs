//! Sheet layout engine: one site group → the bilingual payroll grid
//!
//! Column plan (N = days in the range):
//!
//! | column      | content                              |
//! |-------------|--------------------------------------|
//! | 0           | row number / row label               |
//! | 1           | worker name / row type label         |
//! | 2 ..= 1+N   | one column per date                  |
//! | 2+N         | attendance subtotal (COUNTIF marker) |
//! | 3+N         | overtime subtotal (SUM)              |
//!
//! Rows 0-4 are the fixed header, then two rows per worker, then the two
//! grand-total rows. Every position right of the date block is derived
//! from N.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::grid::{Cell, CellRange, CellRef, Grid, SheetFormula};
use crate::core::calendar::{expand, month_markers, to_era_label, weekday_symbol};
use crate::error::{ObraError, ObraResult};
use crate::types::SiteGroup;

pub const PRESENCE_MARKER: &str = "○";

pub const LABEL_COMPANY: &str = "会社名 / Empresa";
pub const LABEL_SITE: &str = "現場名 / Obra";
pub const LABEL_TITLE: &str = "出面表 / Planilla de Asistencia";
pub const LABEL_FROM: &str = "自 / Desde";
pub const LABEL_TO: &str = "至 / Hasta";
pub const LABEL_ROW_NUMBER: &str = "No.";
pub const LABEL_NAME: &str = "氏名 / Nombre";
pub const LABEL_WEEKDAY: &str = "曜日 / Día";
pub const LABEL_REGULAR_SUBTOTAL: &str = "出勤日数 / Días";
pub const LABEL_OVERTIME_SUBTOTAL: &str = "残業計 / H. Extra";
pub const LABEL_OVERTIME_ROW: &str = "残業 / Horas Extra";
pub const LABEL_ATTENDANCE_TOTAL: &str = "出勤合計 / Total Días";
pub const LABEL_OVERTIME_TOTAL: &str = "残業合計 / Total H. Extra";

pub const ROW_COMPANY: u32 = 0;
pub const ROW_SITE: u32 = 1;
pub const ROW_MONTHS: u32 = 2;
pub const ROW_DAYS: u32 = 3;
pub const ROW_WEEKDAYS: u32 = 4;
pub const HEADER_ROWS: u32 = 5;

pub const COL_LABEL: u16 = 0;
pub const COL_NAME: u16 = 1;
pub const COL_FIRST_DATE: u16 = 2;

/// Last column index an .xlsx sheet can address (XFD)
pub const XLSX_LAST_COL: u16 = 16_383;

/// Longest range a sheet can hold: the two subtotal columns follow the dates
pub const MAX_DAYS: usize = (XLSX_LAST_COL - COL_FIRST_DATE - 1) as usize;

const TITLE_BAND_START: u16 = 16;
const TITLE_BAND_WIDTH: u16 = 8;
const VALUE_SPAN_LAST_COL: u16 = 8;

const WIDTH_LABEL: f64 = 6.0;
const WIDTH_NAME: f64 = 22.0;
const WIDTH_DATE: f64 = 4.5;
const WIDTH_SUBTOTAL: f64 = 11.0;

/// Column positions for a sheet with `day_count` date columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPlan {
    pub day_count: usize,
    n: u16,
}

impl ColumnPlan {
    /// Fails with `RangeTooLong` when the subtotal columns would fall past
    /// the last xlsx column
    pub fn new(day_count: usize) -> ObraResult<Self> {
        let too_long = || ObraError::RangeTooLong {
            days: day_count,
            max: MAX_DAYS,
        };
        if day_count > MAX_DAYS {
            return Err(too_long());
        }
        let n = u16::try_from(day_count).map_err(|_| too_long())?;
        Ok(Self { day_count, n })
    }

    fn n(&self) -> u16 {
        self.n
    }

    pub fn date_col(&self, index: usize) -> u16 {
        COL_FIRST_DATE + index as u16
    }

    /// Last date column, if there is any
    pub fn last_date_col(&self) -> Option<u16> {
        (self.day_count > 0).then(|| COL_FIRST_DATE + self.n() - 1)
    }

    pub fn regular_subtotal_col(&self) -> u16 {
        COL_FIRST_DATE + self.n()
    }

    pub fn overtime_subtotal_col(&self) -> u16 {
        COL_FIRST_DATE + self.n() + 1
    }

    /// Last column of the company/site value spans; never reaches the
    /// date-range cells
    pub fn value_span_last_col(&self) -> u16 {
        VALUE_SPAN_LAST_COL.min(COL_NAME + self.n())
    }

    /// First column of the title band.
    ///
    /// The band sits at column 16 unless that would cover the date-range
    /// cells, in which case it starts just right of them.
    pub fn title_start_col(&self) -> u16 {
        let band_last = TITLE_BAND_START + TITLE_BAND_WIDTH - 1;
        let span_first = self.regular_subtotal_col();
        let span_last = self.overtime_subtotal_col();
        if span_first <= band_last && span_last >= TITLE_BAND_START {
            span_last + 1
        } else {
            TITLE_BAND_START
        }
    }

    pub fn title_last_col(&self) -> u16 {
        self.title_start_col() + TITLE_BAND_WIDTH - 1
    }

    /// Total grid width
    pub fn width(&self) -> usize {
        (self.overtime_subtotal_col().max(self.title_last_col()) + 1) as usize
    }

    /// Date-column span of one body row
    pub fn date_span(&self, row: u32) -> Option<CellRange> {
        self.last_date_col().map(|last| {
            CellRange::new(CellRef::new(row, COL_FIRST_DATE), CellRef::new(row, last))
        })
    }
}

/// Row of worker `k`'s attendance line
pub fn attendance_row(worker_index: usize) -> u32 {
    HEADER_ROWS + 2 * worker_index as u32
}

/// Row of worker `k`'s overtime line
pub fn overtime_row(worker_index: usize) -> u32 {
    attendance_row(worker_index) + 1
}

/// Lays out site groups using a fixed company name
#[derive(Debug, Clone, Default)]
pub struct SheetLayout {
    company_name: String,
}

impl SheetLayout {
    /// `company_name` fills the company span; when blank, each group's
    /// client name is used instead
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
        }
    }

    /// Lay out `group` over its full date range
    pub fn layout(&self, group: &SiteGroup) -> ObraResult<Grid> {
        group.range.validate()?;
        ColumnPlan::new(group.range.day_count())?;
        let dates = expand(&group.range)?;
        self.layout_dates(group, &dates)
    }

    /// Lay out `group` over an explicit date sequence.
    ///
    /// An empty sequence yields the header rows only.
    pub fn layout_dates(&self, group: &SiteGroup, dates: &[NaiveDate]) -> ObraResult<Grid> {
        let plan = ColumnPlan::new(dates.len())?;
        let mut grid = Grid::new(HEADER_ROWS as usize, plan.width());

        self.write_header(&mut grid, group, dates, &plan);
        if !dates.is_empty() {
            let subtotals = write_body(&mut grid, group, dates, &plan);
            write_grand_totals(&mut grid, &plan, &subtotals);
        }
        apply_merges(&mut grid, &plan);
        apply_column_widths(&mut grid, &plan);

        debug!(
            site = %group.site_id,
            days = dates.len(),
            workers = group.workers.len(),
            rows = grid.height(),
            cols = grid.width(),
            "laid out attendance sheet"
        );
        Ok(grid)
    }

    fn write_header(
        &self,
        grid: &mut Grid,
        group: &SiteGroup,
        dates: &[NaiveDate],
        plan: &ColumnPlan,
    ) {
        let company = if self.company_name.trim().is_empty() {
            group.client_name.as_str()
        } else {
            self.company_name.as_str()
        };

        // Row 1: company, title band, start date
        grid.set(ROW_COMPANY, COL_LABEL, Cell::text(LABEL_COMPANY));
        grid.set(ROW_COMPANY, COL_NAME, Cell::text(company));
        grid.set(ROW_COMPANY, plan.title_start_col(), Cell::text(LABEL_TITLE));
        grid.set(
            ROW_COMPANY,
            plan.regular_subtotal_col(),
            Cell::text(format!("{}  {}", LABEL_FROM, to_era_label(group.range.from))),
        );

        // Row 2: site, end date
        grid.set(ROW_SITE, COL_LABEL, Cell::text(LABEL_SITE));
        grid.set(ROW_SITE, COL_NAME, Cell::text(group.site_name.as_str()));
        grid.set(
            ROW_SITE,
            plan.regular_subtotal_col(),
            Cell::text(format!("{}  {}", LABEL_TO, to_era_label(group.range.to))),
        );

        // Row 3: numbering marker, month markers, subtotal headers
        grid.set(ROW_MONTHS, COL_LABEL, Cell::text(LABEL_ROW_NUMBER));
        for (idx, label) in month_markers(dates) {
            grid.set(ROW_MONTHS, plan.date_col(idx), Cell::Text(label));
        }
        grid.set(
            ROW_MONTHS,
            plan.regular_subtotal_col(),
            Cell::text(LABEL_REGULAR_SUBTOTAL),
        );
        grid.set(
            ROW_MONTHS,
            plan.overtime_subtotal_col(),
            Cell::text(LABEL_OVERTIME_SUBTOTAL),
        );

        // Rows 4-5: day of month, weekday
        grid.set(ROW_DAYS, COL_NAME, Cell::text(LABEL_NAME));
        grid.set(ROW_WEEKDAYS, COL_NAME, Cell::text(LABEL_WEEKDAY));
        for (idx, date) in dates.iter().enumerate() {
            let col = plan.date_col(idx);
            grid.set(ROW_DAYS, col, Cell::Number(date.day() as f64));
            grid.set(ROW_WEEKDAYS, col, Cell::text(weekday_symbol(*date)));
        }
    }
}

/// Subtotal cells written for each worker, in row order
struct Subtotals {
    regular: Vec<CellRef>,
    overtime: Vec<CellRef>,
}

fn write_body(
    grid: &mut Grid,
    group: &SiteGroup,
    dates: &[NaiveDate],
    plan: &ColumnPlan,
) -> Subtotals {
    let mut subtotals = Subtotals {
        regular: Vec::with_capacity(group.workers.len()),
        overtime: Vec::with_capacity(group.workers.len()),
    };

    for (k, worker) in group.workers.iter().enumerate() {
        let att_row = attendance_row(k);
        let ot_row = overtime_row(k);

        grid.set(att_row, COL_LABEL, Cell::Number((k + 1) as f64));
        grid.set(att_row, COL_NAME, Cell::text(worker.display_name.as_str()));
        grid.set(ot_row, COL_NAME, Cell::text(LABEL_OVERTIME_ROW));

        for (idx, date) in dates.iter().enumerate() {
            let col = plan.date_col(idx);
            if worker.is_present(*date) {
                grid.set(att_row, col, Cell::text(PRESENCE_MARKER));
            }
            let hours = worker.overtime_on(*date);
            if hours > 0.0 {
                grid.set(ot_row, col, Cell::Number(hours));
            }
        }

        if let (Some(att_span), Some(ot_span)) = (plan.date_span(att_row), plan.date_span(ot_row))
        {
            let regular = CellRef::new(att_row, plan.regular_subtotal_col());
            let overtime = CellRef::new(ot_row, plan.overtime_subtotal_col());
            grid.set(
                regular.row,
                regular.col,
                Cell::Formula(SheetFormula::CountIf {
                    range: att_span,
                    criterion: PRESENCE_MARKER.to_string(),
                }),
            );
            grid.set(
                overtime.row,
                overtime.col,
                Cell::Formula(SheetFormula::Sum(ot_span)),
            );
            subtotals.regular.push(regular);
            subtotals.overtime.push(overtime);
        }
    }

    subtotals
}

fn write_grand_totals(grid: &mut Grid, plan: &ColumnPlan, subtotals: &Subtotals) {
    let att_total_row = attendance_row(subtotals.regular.len());
    let ot_total_row = att_total_row + 1;

    grid.set(
        att_total_row,
        plan.regular_subtotal_col() - 1,
        Cell::text(LABEL_ATTENDANCE_TOTAL),
    );
    grid.set(
        ot_total_row,
        plan.overtime_subtotal_col() - 1,
        Cell::text(LABEL_OVERTIME_TOTAL),
    );

    // No operands, no formula
    if subtotals.regular.is_empty() {
        return;
    }

    grid.set(
        att_total_row,
        plan.regular_subtotal_col(),
        Cell::Formula(SheetFormula::Add(subtotals.regular.clone())),
    );
    grid.set(
        ot_total_row,
        plan.overtime_subtotal_col(),
        Cell::Formula(SheetFormula::Add(subtotals.overtime.clone())),
    );
}

fn apply_merges(grid: &mut Grid, plan: &ColumnPlan) {
    let value_last = plan.value_span_last_col();
    if value_last > COL_NAME {
        for row in [ROW_COMPANY, ROW_SITE] {
            grid.merge(CellRange::new(
                CellRef::new(row, COL_NAME),
                CellRef::new(row, value_last),
            ));
        }
    }

    grid.merge(CellRange::new(
        CellRef::new(ROW_COMPANY, plan.title_start_col()),
        CellRef::new(ROW_COMPANY, plan.title_last_col()),
    ));

    for row in [ROW_COMPANY, ROW_SITE] {
        grid.merge(CellRange::new(
            CellRef::new(row, plan.regular_subtotal_col()),
            CellRef::new(row, plan.overtime_subtotal_col()),
        ));
    }

    for col in [plan.regular_subtotal_col(), plan.overtime_subtotal_col()] {
        grid.merge(CellRange::new(
            CellRef::new(ROW_MONTHS, col),
            CellRef::new(ROW_WEEKDAYS, col),
        ));
    }
}

fn apply_column_widths(grid: &mut Grid, plan: &ColumnPlan) {
    grid.set_column_width(COL_LABEL, WIDTH_LABEL);
    grid.set_column_width(COL_NAME, WIDTH_NAME);
    for idx in 0..plan.day_count {
        grid.set_column_width(plan.date_col(idx), WIDTH_DATE);
    }
    grid.set_column_width(plan.regular_subtotal_col(), WIDTH_SUBTOTAL);
    grid.set_column_width(plan.overtime_subtotal_col(), WIDTH_SUBTOTAL);
}

/// Lay out `group` with no fixed company name
pub fn layout(group: &SiteGroup) -> ObraResult<Grid> {
    SheetLayout::default().layout(group)
}
