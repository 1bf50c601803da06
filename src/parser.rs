//! Record file loading
//!
//! The record store hands out loosely typed rows (ids as numbers or strings,
//! optional fields, presence as 0/1). This module is the one place where
//! that shape is checked and turned into [`AttendanceRecord`]s.

use crate::error::{ObraError, ObraResult};
use crate::types::{AttendanceRecord, RecordFile, Shift, WireFlag, WireNumber, WireRecord};
use chrono::NaiveDate;
use std::path::Path;
use tracing::debug;

/// Load and validate a records file (`.json`, otherwise parsed as YAML)
pub fn load_records(path: &Path) -> ObraResult<Vec<AttendanceRecord>> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let records = if is_json {
        parse_records_json(&content)?
    } else {
        parse_records_yaml(&content)?
    };

    debug!(path = %path.display(), count = records.len(), "loaded attendance records");
    Ok(records)
}

pub fn parse_records_json(content: &str) -> ObraResult<Vec<AttendanceRecord>> {
    let file: RecordFile = serde_json::from_str(content)?;
    validate_records(file.into_records())
}

pub fn parse_records_yaml(content: &str) -> ObraResult<Vec<AttendanceRecord>> {
    let file: RecordFile = serde_yaml::from_str(content)?;
    validate_records(file.into_records())
}

/// Validate a batch of wire records, failing on the first bad one
pub fn validate_records(wire: Vec<WireRecord>) -> ObraResult<Vec<AttendanceRecord>> {
    wire.into_iter()
        .enumerate()
        .map(|(index, record)| validate_record(index, record))
        .collect()
}

/// Turn one wire record into a strict [`AttendanceRecord`]
pub fn validate_record(index: usize, wire: WireRecord) -> ObraResult<AttendanceRecord> {
    let fail = |msg: String| ObraError::Record(format!("record #{}: {}", index, msg));

    let date = NaiveDate::parse_from_str(wire.fecha.trim(), "%Y-%m-%d")
        .map_err(|_| fail(format!("invalid date '{}', expected YYYY-MM-DD", wire.fecha)))?;

    let site_id = wire.obra_id.normalize();
    if site_id.is_empty() {
        return Err(fail("missing site id".to_string()));
    }

    let site_name = wire
        .obra_nombre
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| fail("missing site name".to_string()))?;

    let worker_id = wire.empleado_id.normalize();
    if worker_id.is_empty() {
        return Err(fail("missing worker id".to_string()));
    }

    let present = parse_flag(&wire.presente)
        .ok_or_else(|| fail(format!("invalid presence flag {:?}", wire.presente)))?;

    let overtime_hours = match &wire.horas_extras {
        None => 0.0,
        Some(value) => parse_hours(value)
            .ok_or_else(|| fail(format!("invalid overtime hours {:?}", value)))?,
    };

    let shift = match wire.tipo_jornada.as_deref() {
        None | Some("") => None,
        Some(raw) => {
            Some(Shift::parse(raw).ok_or_else(|| fail(format!("unknown shift '{}'", raw)))?)
        }
    };

    Ok(AttendanceRecord {
        site_id,
        site_name,
        client_id: wire.cliente_id.map(|id| id.normalize()),
        client_name: non_blank(wire.cliente_nombre),
        leader_id: wire.lider_id.map(|id| id.normalize()),
        worker_id,
        worker_first_name: wire.empleado_nombre.unwrap_or_default().trim().to_string(),
        worker_last_name: wire.empleado_apellido.unwrap_or_default().trim().to_string(),
        position: non_blank(wire.cargo),
        date,
        present,
        shift,
        overtime_hours,
    })
}

fn parse_flag(flag: &WireFlag) -> Option<bool> {
    match flag {
        WireFlag::Bool(b) => Some(*b),
        WireFlag::Number(0) => Some(false),
        WireFlag::Number(1) => Some(true),
        WireFlag::Number(_) => None,
        WireFlag::Text(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
    }
}

fn parse_hours(value: &WireNumber) -> Option<f64> {
    let hours = match value {
        WireNumber::Number(n) => *n,
        WireNumber::Text(s) if s.trim().is_empty() => 0.0,
        WireNumber::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    (hours.is_finite() && hours >= 0.0).then_some(hours)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
