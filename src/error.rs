use chrono::NaiveDate;
use thiserror::Error;

pub type ObraResult<T> = Result<T, ObraError>;

#[derive(Error, Debug)]
pub enum ObraError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    Record(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("Date range too long: {days} days, a sheet holds at most {max}")]
    RangeTooLong { days: usize, max: usize },

    #[error("Nothing to export: no attendance records matched")]
    EmptyExport,

    #[error("Cannot submit attendance: {0}")]
    Submission(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl From<rust_xlsxwriter::XlsxError> for ObraError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ObraError::Export(e.to_string())
    }
}
