//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::core::{summarize, AttendanceDraft, AttendanceSubmission, DraftStats, RecordQuery};
use crate::error::{ObraError, ObraResult};
use crate::excel::{export_file_name, workbook_from_records, ExcelExporter, SheetLayout};
use crate::parser::validate_records;
use crate::types::{DateRange, Shift, WireRecord};

use super::server::AppState;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for a failed operation
pub fn status_for(error: &ObraError) -> StatusCode {
    match error {
        ObraError::InvalidRange { .. }
        | ObraError::RangeTooLong { .. }
        | ObraError::Record(_)
        | ObraError::Submission(_)
        | ObraError::Json(_)
        | ObraError::Yaml(_) => StatusCode::BAD_REQUEST,
        ObraError::EmptyExport => StatusCode::UNPROCESSABLE_ENTITY,
        ObraError::Io(_) | ObraError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: ObraError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        warn!("request failed: {}", error);
    }
    (status, Json(ApiResponse::<()>::err(error.to_string()))).into_response()
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Obra Sheet API Server".to_string(),
        version: state.version.clone(),
        description: "Construction-site attendance to payroll workbooks".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new(
                "POST",
                "/api/v1/export",
                "Attendance records to a payroll workbook (.xlsx)",
            ),
            EndpointInfo::new(
                "POST",
                "/api/v1/summary",
                "Present/absent/overtime totals for records",
            ),
            EndpointInfo::new(
                "POST",
                "/api/v1/submission",
                "Validate a day's attendance marks for a site",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "export".to_string(),
            "summary".to_string(),
            "submission".to_string(),
        ],
    }))
}

/// Export request
#[derive(Deserialize)]
pub struct ExportRequest {
    pub records: Vec<WireRecord>,
    pub range: DateRange,
    #[serde(default)]
    pub query: RecordQuery,
    /// Overrides the server's configured company name
    #[serde(default)]
    pub company_name: Option<String>,
}

/// POST /api/v1/export - Records to an .xlsx attachment
pub async fn export(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExportRequest>,
) -> Response {
    let export_date = Local::now().date_naive();
    match export_workbook(&state, req, export_date) {
        Ok((file_name, bytes)) => (
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

fn export_workbook(
    state: &AppState,
    req: ExportRequest,
    export_date: NaiveDate,
) -> Result<(String, Vec<u8>), ObraError> {
    let records = validate_records(req.records)?;
    let company = req
        .company_name
        .unwrap_or_else(|| state.report.company_name.clone());
    let layout = SheetLayout::new(company);

    let workbook = workbook_from_records(&records, req.range, &req.query, &layout)?;
    let bytes = ExcelExporter::new(workbook).to_buffer()?;
    let file_name = export_file_name(&state.report.file_prefix, export_date);
    Ok((file_name, bytes))
}

/// Summary request
#[derive(Deserialize)]
pub struct SummaryRequest {
    pub records: Vec<WireRecord>,
    #[serde(default)]
    pub query: RecordQuery,
}

/// POST /api/v1/summary - Totals over the matching records
pub async fn summary(Json(req): Json<SummaryRequest>) -> Response {
    match validate_records(req.records) {
        Ok(records) => {
            let selected = req.query.apply(&records);
            Json(ApiResponse::ok(summarize(&selected))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// One worker's mark in a submission request; omitted fields keep the
/// stored value
#[derive(Deserialize)]
pub struct MarkRequest {
    pub worker_id: String,
    #[serde(default)]
    pub present: Option<bool>,
    #[serde(default)]
    pub overtime_hours: Option<f64>,
}

/// Submission request.
///
/// `records` are the attendance rows already stored; the ones for `date` at
/// `site_id` seed the draft before `marks` are applied. A missing leader or
/// shift is taken from those rows.
#[derive(Deserialize)]
pub struct SubmissionRequest {
    pub date: NaiveDate,
    pub site_id: String,
    #[serde(default)]
    pub leader_id: Option<String>,
    #[serde(default)]
    pub shift: Option<Shift>,
    #[serde(default)]
    pub records: Vec<WireRecord>,
    pub marks: Vec<MarkRequest>,
}

/// Submission response
#[derive(Serialize)]
pub struct SubmissionResponse {
    pub stats: DraftStats,
    pub submission: AttendanceSubmission,
}

/// POST /api/v1/submission - Stored records plus marks to a validated
/// submission payload
pub async fn submission(Json(req): Json<SubmissionRequest>) -> Response {
    match build_submission(req) {
        Ok(response) => Json(ApiResponse::ok(response)).into_response(),
        Err(e) => error_response(e),
    }
}

fn build_submission(req: SubmissionRequest) -> ObraResult<SubmissionResponse> {
    let stored = validate_records(req.records)?;
    let stored = RecordQuery {
        from: Some(req.date),
        to: Some(req.date),
        site_id: Some(req.site_id.clone()),
        ..RecordQuery::default()
    }
    .apply(&stored);

    let mut draft = AttendanceDraft::from_records(&stored);
    for mark in &req.marks {
        if mark.present.is_some() {
            draft.set_presence(&mark.worker_id, mark.present);
        }
        if let Some(hours) = mark.overtime_hours {
            draft.set_overtime(&mark.worker_id, hours);
        }
    }
    let stats = draft.stats();

    let leader_id = req
        .leader_id
        .or_else(|| stored.iter().rev().find_map(|r| r.leader_id.clone()));
    let shift = req
        .shift
        .or_else(|| stored.iter().rev().find_map(|r| r.shift))
        .unwrap_or_default();

    let submission = draft.into_submission(req.date, &req.site_id, leader_id.as_deref(), shift)?;
    Ok(SubmissionResponse { stats, submission })
}
