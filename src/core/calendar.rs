//! Calendar helpers for the payroll template
//!
//! Date-range expansion, the era date notation, month-change markers and the
//! weekday symbol table. All arithmetic is on calendar fields (`NaiveDate`),
//! never on timestamps, so there is no timezone or DST drift.

use chrono::{Datelike, NaiveDate};

use crate::error::ObraResult;
use crate::types::DateRange;

/// Era label printed before the era year
pub const ERA_LABEL: &str = "令和";

/// Calendar year that maps to era year 0
pub const ERA_BASE_YEAR: i32 = 2018;

/// Weekday symbols, Sunday first
pub const WEEKDAY_SYMBOLS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// Every calendar date in `range`, both ends included.
///
/// Fails with `InvalidRange` when `from > to`.
pub fn expand(range: &DateRange) -> ObraResult<Vec<NaiveDate>> {
    range.validate()?;

    let mut dates = Vec::with_capacity(range.day_count());
    let mut current = range.from;
    loop {
        dates.push(current);
        if current >= range.to {
            break;
        }
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(dates)
}

/// Era year for a calendar date (calendar year − 2018)
pub fn era_year(date: NaiveDate) -> i32 {
    date.year() - ERA_BASE_YEAR
}

/// `令和  6年 1月 21日`
pub fn to_era_label(date: NaiveDate) -> String {
    format!(
        "{}  {}年 {}月 {}日",
        ERA_LABEL,
        era_year(date),
        date.month(),
        date.day()
    )
}

/// `(2月)`
pub fn month_marker_label(month: u32) -> String {
    format!("({}月)", month)
}

/// Month-change markers for a date sequence.
///
/// Returns `(index, label)` for index 0 and for every index whose month
/// differs from the previous date's month, so each month segment gets
/// exactly one marker.
pub fn month_markers(dates: &[NaiveDate]) -> Vec<(usize, String)> {
    let mut markers = Vec::new();
    let mut previous: Option<(i32, u32)> = None;

    for (idx, date) in dates.iter().enumerate() {
        let key = (date.year(), date.month());
        if previous != Some(key) {
            markers.push((idx, month_marker_label(date.month())));
        }
        previous = Some(key);
    }

    markers
}

/// Localized weekday symbol for a date
pub fn weekday_symbol(date: NaiveDate) -> &'static str {
    WEEKDAY_SYMBOLS[date.weekday().num_days_from_sunday() as usize]
}
