//! In-memory sheet model: cells, live formulas, merges and column widths
//!
//! A [`Grid`] is the fully laid-out sheet before serialization. Formulas are
//! kept structured so they can be rendered to A1 text for the workbook and
//! also evaluated in-process (previews, tests).

use std::fmt;

/// Zero-based cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellRef {
    /// A1 notation: `CellRef::new(5, 2)` → `C6`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letter(self.col as usize), self.row + 1)
    }
}

/// Rectangular block of cells, both corners inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first: CellRef,
    pub last: CellRef,
}

impl CellRange {
    pub fn new(first: CellRef, last: CellRef) -> Self {
        Self { first, last }
    }

    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.first.row..=self.last.row).flat_map(move |row| {
            (self.first.col..=self.last.col).map(move |col| CellRef::new(row, col))
        })
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        (self.first.row..=self.last.row).contains(&cell.row)
            && (self.first.col..=self.last.col).contains(&cell.col)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.last)
    }
}

/// The formula shapes the payroll template uses
#[derive(Debug, Clone, PartialEq)]
pub enum SheetFormula {
    /// `COUNTIF(range,"criterion")`
    CountIf { range: CellRange, criterion: String },
    /// `SUM(range)`
    Sum(CellRange),
    /// `A1+B2+...`; used where the operands are not contiguous
    Add(Vec<CellRef>),
}

impl fmt::Display for SheetFormula {
    /// Excel formula text, including the leading `=`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetFormula::CountIf { range, criterion } => {
                write!(f, "=COUNTIF({},\"{}\")", range, criterion.replace('"', "\"\""))
            }
            SheetFormula::Sum(range) => write!(f, "=SUM({})", range),
            SheetFormula::Add(cells) => {
                let terms: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
                write!(f, "={}", terms.join("+"))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Formula(SheetFormula),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_formula(&self) -> Option<&SheetFormula> {
        match self {
            Cell::Formula(f) => Some(f),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWidth {
    pub col: u16,
    pub width: f64,
}

static EMPTY: Cell = Cell::Empty;

/// Formula nesting in the template is at most two levels deep
const MAX_EVAL_DEPTH: usize = 8;

/// Rectangular laid-out sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    width: usize,
    merges: Vec<CellRange>,
    column_widths: Vec<ColumnWidth>,
}

impl Grid {
    pub(crate) fn new(height: usize, width: usize) -> Self {
        Self {
            rows: vec![vec![Cell::Empty; width]; height],
            width,
            merges: Vec::new(),
            column_widths: Vec::new(),
        }
    }

    /// Place a value; out-of-bounds writes grow the grid
    pub(crate) fn set(&mut self, row: u32, col: u16, cell: Cell) {
        let (row, col) = (row as usize, col as usize);
        if col >= self.width {
            self.width = col + 1;
            for r in &mut self.rows {
                r.resize(self.width, Cell::Empty);
            }
        }
        if row >= self.rows.len() {
            self.rows.resize(row + 1, vec![Cell::Empty; self.width]);
        }
        self.rows[row][col] = cell;
    }

    pub(crate) fn merge(&mut self, range: CellRange) {
        self.merges.push(range);
    }

    pub(crate) fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.push(ColumnWidth { col, width });
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell(&self, row: u32, col: u16) -> &Cell {
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .unwrap_or(&EMPTY)
    }

    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    pub fn column_widths(&self) -> &[ColumnWidth] {
        &self.column_widths
    }

    /// Non-empty cells in row-major order
    pub fn filled_cells(&self) -> impl Iterator<Item = (CellRef, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| !cell.is_empty())
                .map(move |(c, cell)| (CellRef::new(r as u32, c as u16), cell))
        })
    }

    /// Numeric value of a cell the way a spreadsheet would compute it.
    ///
    /// Text and empty cells have no numeric value.
    pub fn evaluate(&self, row: u32, col: u16) -> Option<f64> {
        self.evaluate_at(CellRef::new(row, col), 0)
    }

    /// Evaluate a formula against this grid
    pub fn evaluate_formula(&self, formula: &SheetFormula) -> f64 {
        self.evaluate_formula_at(formula, 0)
    }

    fn evaluate_at(&self, cell: CellRef, depth: usize) -> Option<f64> {
        match self.cell(cell.row, cell.col) {
            Cell::Number(n) => Some(*n),
            Cell::Formula(f) if depth < MAX_EVAL_DEPTH => {
                Some(self.evaluate_formula_at(f, depth + 1))
            }
            _ => None,
        }
    }

    fn evaluate_formula_at(&self, formula: &SheetFormula, depth: usize) -> f64 {
        match formula {
            SheetFormula::CountIf { range, criterion } => range
                .cells()
                .filter(|c| self.cell(c.row, c.col).as_text() == Some(criterion.as_str()))
                .count() as f64,
            SheetFormula::Sum(range) => range
                .cells()
                .filter_map(|c| self.evaluate_at(c, depth))
                .sum(),
            SheetFormula::Add(cells) => cells
                .iter()
                .map(|c| self.evaluate_at(*c, depth).unwrap_or(0.0))
                .sum(),
        }
    }
}

/// Convert a zero-based column index to its spreadsheet letter
///
/// Examples:
/// - 0 → A
/// - 25 → Z
/// - 26 → AA
pub fn column_letter(index: usize) -> String {
    let mut result = String::new();
    let mut idx = index;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    // Six places is plenty for hours and counts; hides float noise like 0.30000000000000004
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
