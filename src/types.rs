use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ObraError, ObraResult};

//==============================================================================
// Attendance Records
//==============================================================================

/// One worker's presence and overtime for one site on one calendar date.
///
/// Only produced by [`crate::parser`] after the wire shape has been checked,
/// so every required field is guaranteed to be present and well-formed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub site_id: String,
    pub site_name: String,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub leader_id: Option<String>,
    pub worker_id: String,
    pub worker_first_name: String,
    pub worker_last_name: String,
    pub position: Option<String>,
    pub date: NaiveDate,
    pub present: bool,
    pub shift: Option<Shift>,
    pub overtime_hours: f64,
}

impl AttendanceRecord {
    /// "First Last", or whichever half is non-empty
    pub fn worker_display_name(&self) -> String {
        format!("{} {}", self.worker_first_name, self.worker_last_name)
            .trim()
            .to_string()
    }
}

/// Work shift recorded alongside a day's attendance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    #[default]
    Dia,
    Noche,
    DiaNoche,
}

impl Shift {
    pub fn label(&self) -> &'static str {
        match self {
            Shift::Dia => "Día",
            Shift::Noche => "Noche",
            Shift::DiaNoche => "Día y Noche",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dia" => Some(Shift::Dia),
            "noche" => Some(Shift::Noche),
            "dia_noche" => Some(Shift::DiaNoche),
            _ => None,
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//==============================================================================
// Date Range
//==============================================================================

/// Caller-supplied export period, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `from > to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> ObraResult<Self> {
        let range = Self { from, to };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> ObraResult<()> {
        if self.from > self.to {
            return Err(ObraError::InvalidRange {
                from: self.from,
                to: self.to,
            });
        }
        Ok(())
    }

    /// Inclusive day count (0 for an inverted range)
    pub fn day_count(&self) -> usize {
        let days = (self.to - self.from).num_days();
        if days < 0 {
            0
        } else {
            days as usize + 1
        }
    }
}

//==============================================================================
// Grouped Attendance
//==============================================================================

/// Sparse per-worker attendance within one site group.
///
/// A date missing from either map means "no record", rendered blank.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkerAttendance {
    pub worker_id: String,
    pub display_name: String,
    pub attendance: BTreeMap<NaiveDate, bool>,
    pub overtime: BTreeMap<NaiveDate, f64>,
}

impl WorkerAttendance {
    pub fn new(worker_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    pub fn is_present(&self, date: NaiveDate) -> bool {
        self.attendance.get(&date).copied().unwrap_or(false)
    }

    pub fn overtime_on(&self, date: NaiveDate) -> f64 {
        self.overtime.get(&date).copied().unwrap_or(0.0)
    }
}

/// All attendance for one job site over one export period.
///
/// Workers keep first-seen order; that order becomes the sheet's row order.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteGroup {
    pub site_id: String,
    pub site_name: String,
    pub client_name: String,
    pub range: DateRange,
    pub workers: Vec<WorkerAttendance>,
}

impl SiteGroup {
    pub fn new(
        site_id: impl Into<String>,
        site_name: impl Into<String>,
        client_name: impl Into<String>,
        range: DateRange,
    ) -> Self {
        Self {
            site_id: site_id.into(),
            site_name: site_name.into(),
            client_name: client_name.into(),
            range,
            workers: Vec::new(),
        }
    }

    pub fn worker(&self, worker_id: &str) -> Option<&WorkerAttendance> {
        self.workers.iter().find(|w| w.worker_id == worker_id)
    }
}

//==============================================================================
// Wire Shapes (record store boundary)
//==============================================================================

/// Identifier as the record store sends it: a number or a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl WireId {
    pub fn normalize(&self) -> String {
        match self {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s.trim().to_string(),
        }
    }
}

/// Presence flag: boolean, 0/1, or "true"/"false"
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireFlag {
    Bool(bool),
    Number(i64),
    Text(String),
}

/// Numeric field that may arrive as a number or a numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Number(f64),
    Text(String),
}

/// One attendance row exactly as the record store serves it.
///
/// Field names follow the store's schema; English aliases are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct WireRecord {
    #[serde(alias = "date")]
    pub fecha: String,
    #[serde(alias = "site_id")]
    pub obra_id: WireId,
    #[serde(alias = "site_name")]
    pub obra_nombre: Option<String>,
    #[serde(default, alias = "client_id")]
    pub cliente_id: Option<WireId>,
    #[serde(default, alias = "client_name")]
    pub cliente_nombre: Option<String>,
    #[serde(default, alias = "leader_id")]
    pub lider_id: Option<WireId>,
    #[serde(alias = "worker_id")]
    pub empleado_id: WireId,
    #[serde(default, alias = "worker_first_name")]
    pub empleado_nombre: Option<String>,
    #[serde(default, alias = "worker_last_name")]
    pub empleado_apellido: Option<String>,
    #[serde(default, alias = "position")]
    pub cargo: Option<String>,
    #[serde(alias = "present")]
    pub presente: WireFlag,
    #[serde(default, alias = "shift")]
    pub tipo_jornada: Option<String>,
    #[serde(default, alias = "overtime_hours")]
    pub horas_extras: Option<WireNumber>,
}

/// A records file: either a bare list or a mapping with a list under
/// `records` / `asistencias`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecordFile {
    List(Vec<WireRecord>),
    Wrapped {
        #[serde(alias = "asistencias")]
        records: Vec<WireRecord>,
    },
}

impl RecordFile {
    pub fn into_records(self) -> Vec<WireRecord> {
        match self {
            RecordFile::List(records) => records,
            RecordFile::Wrapped { records } => records,
        }
    }
}
