//! Workbook assembly: one laid-out sheet per site group

use chrono::NaiveDate;

use super::grid::Grid;
use super::layout::{ColumnPlan, SheetLayout};
use crate::core::{group, RecordQuery};
use crate::error::{ObraError, ObraResult};
use crate::types::{AttendanceRecord, DateRange, SiteGroup};

/// Hard limit on sheet-name length in .xlsx
pub const MAX_SHEET_NAME_CHARS: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = [':', '\\', '/', '?', '*', '[', ']'];

/// Sheet name Excel keeps for itself (case-insensitive)
const RESERVED_SHEET_NAME: &str = "History";

#[derive(Debug, Clone, PartialEq)]
pub struct NamedSheet {
    pub name: String,
    pub site_id: String,
    pub grid: Grid,
}

/// Sheets in export order, ready for serialization
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceWorkbook {
    pub sheets: Vec<NamedSheet>,
}

impl AttendanceWorkbook {
    pub fn sheet(&self, name: &str) -> Option<&NamedSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Lay out every group as its own sheet.
///
/// Fails with `EmptyExport` when there is nothing to render. Sheet names
/// that collide after sanitizing are left as-is.
pub fn assemble(groups: &[SiteGroup], layout: &SheetLayout) -> ObraResult<AttendanceWorkbook> {
    if groups.is_empty() {
        return Err(ObraError::EmptyExport);
    }

    let sheets = groups
        .iter()
        .map(|group| {
            Ok(NamedSheet {
                name: sheet_name_for(group),
                site_id: group.site_id.clone(),
                grid: layout.layout(group)?,
            })
        })
        .collect::<ObraResult<Vec<_>>>()?;

    Ok(AttendanceWorkbook { sheets })
}

/// Full export pipeline over a record snapshot.
///
/// The range is checked first (order, and that it fits on one sheet), then `query` (with its dates pinned to the
/// range) selects records the way the record store would, then the
/// survivors are grouped and laid out.
pub fn workbook_from_records(
    records: &[AttendanceRecord],
    range: DateRange,
    query: &RecordQuery,
    layout: &SheetLayout,
) -> ObraResult<AttendanceWorkbook> {
    range.validate()?;
    ColumnPlan::new(range.day_count())?;

    let query = RecordQuery {
        from: Some(range.from),
        to: Some(range.to),
        ..query.clone()
    };
    let selected = query.apply(records);
    let groups = group(&selected, range);
    assemble(&groups, layout)
}

/// Sheet name for a group, falling back to the site id when the site name
/// sanitizes to nothing or to the reserved name
pub fn sheet_name_for(group: &SiteGroup) -> String {
    let name = sanitize_sheet_name(&group.site_name);
    if name.is_empty() || name.eq_ignore_ascii_case(RESERVED_SHEET_NAME) {
        sanitize_sheet_name(&format!("Obra {}", group.site_id))
    } else {
        name
    }
}

/// Strip `: \ / ? * [ ]`, cut to 31 characters and drop edge apostrophes
/// (which the format also rejects). Idempotent.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !FORBIDDEN_SHEET_CHARS.contains(c))
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    cleaned.trim_matches('\'').to_string()
}

/// `asistencia_2024-02-20.xlsx`
pub fn export_file_name(prefix: &str, export_date: NaiveDate) -> String {
    format!("{}_{}.xlsx", prefix, export_date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_sanitize_removes_forbidden_chars() {
        assert_eq!(sanitize_sheet_name("Obra: Torre [A]/B?*\\"), "Obra Torre AB");
    }

    #[test]
    fn test_sanitize_truncates_to_31_chars() {
        let long = "Ampliación Hospital Regional del Norte";
        let name = sanitize_sheet_name(long);
        assert_eq!(name.chars().count(), 31);
        assert!(long.starts_with(&name));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for raw in [
            "Edificio Central",
            "a:b\\c/d?e*f[g]h",
            "'Quoted'",
            "Ampliación Hospital Regional del Norte - Etapa 2",
            "'''",
            "",
        ] {
            let once = sanitize_sheet_name(raw);
            assert_eq!(sanitize_sheet_name(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_sheet_name_falls_back_to_site_id() {
        let group = SiteGroup::new("42", "[]", "", range());
        assert_eq!(sheet_name_for(&group), "Obra 42");
    }

    #[test]
    fn test_reserved_sheet_name_falls_back_to_site_id() {
        for site_name in ["History", "history", "HISTORY"] {
            let group = SiteGroup::new("7", site_name, "", range());
            assert_eq!(sheet_name_for(&group), "Obra 7");
        }
        let group = SiteGroup::new("7", "History Tower", "", range());
        assert_eq!(sheet_name_for(&group), "History Tower");
    }

    #[test]
    fn test_assemble_empty_is_error() {
        let err = assemble(&[], &SheetLayout::default()).unwrap_err();
        assert!(matches!(err, ObraError::EmptyExport));
    }

    #[test]
    fn test_assemble_one_sheet_per_group_in_order() {
        let groups = vec![
            SiteGroup::new("2", "Torre Norte", "", range()),
            SiteGroup::new("1", "Edificio Central", "", range()),
        ];
        let workbook = assemble(&groups, &SheetLayout::default()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Torre Norte", "Edificio Central"]);
        assert_eq!(workbook.sheets[0].site_id, "2");
    }

    #[test]
    fn test_assemble_propagates_invalid_range() {
        let bad = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        let groups = vec![SiteGroup::new("1", "A", "", bad)];
        assert!(matches!(
            assemble(&groups, &SheetLayout::default()),
            Err(ObraError::InvalidRange { .. })
        ));
    }

    fn record(site: &str, day: u32) -> AttendanceRecord {
        AttendanceRecord {
            site_id: site.to_string(),
            site_name: format!("Obra {}", site),
            client_id: None,
            client_name: None,
            leader_id: None,
            worker_id: "1".to_string(),
            worker_first_name: "Ana".to_string(),
            worker_last_name: "Ruiz".to_string(),
            position: None,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            present: true,
            shift: None,
            overtime_hours: 0.0,
        }
    }

    #[test]
    fn test_workbook_from_records_filters_to_range() {
        let records = vec![record("1", 3), record("2", 20)];
        let workbook =
            workbook_from_records(&records, range(), &RecordQuery::default(), &SheetLayout::default())
                .unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Obra 1"]);
    }

    #[test]
    fn test_workbook_from_records_nothing_matches() {
        let records = vec![record("2", 20)];
        let err =
            workbook_from_records(&records, range(), &RecordQuery::default(), &SheetLayout::default())
                .unwrap_err();
        assert!(matches!(err, ObraError::EmptyExport));
    }

    #[test]
    fn test_workbook_from_records_checks_range_first() {
        let bad = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        let err = workbook_from_records(&[], bad, &RecordQuery::default(), &SheetLayout::default())
            .unwrap_err();
        assert!(matches!(err, ObraError::InvalidRange { .. }));
    }

    #[test]
    fn test_workbook_from_records_rejects_overlong_range() {
        let decades = DateRange::new(
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2045, 12, 31).unwrap(),
        )
        .unwrap();
        let err = workbook_from_records(
            &[record("1", 3)],
            decades,
            &RecordQuery::default(),
            &SheetLayout::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ObraError::RangeTooLong { .. }));
    }

    #[test]
    fn test_export_file_name() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        assert_eq!(export_file_name("asistencia", day), "asistencia_2024-02-20.xlsx");
    }
}
