//! Obra Sheet API Server binary
//!
//! HTTP REST API for payroll workbook export.

use clap::Parser;
use obra_sheet::api::{run_api_server, ApiConfig};
use obra_sheet::config::ReportConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "obra-sheet-server")]
#[command(version)]
#[command(about = "Obra Sheet API Server - attendance records to payroll workbooks over HTTP")]
#[command(long_about = r#"
Obra Sheet API Server

Provides RESTful endpoints for the attendance backend:
  - POST /api/v1/export      - Records + date range → .xlsx attachment
  - POST /api/v1/summary     - Present/absent/overtime totals
  - POST /api/v1/submission  - Validate a day's marks for a site

Additional endpoints:
  - GET  /health             - Health check
  - GET  /version            - Server version info
  - GET  /                   - API documentation

Features:
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - JSON response format with request IDs
  - Tracing and structured logging

Example usage:
  obra-sheet-server                           # Start on localhost:8080
  obra-sheet-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/export \
    -H "Content-Type: application/json" \
    -d '{"records": [...], "range": {"from": "2024-01-21", "to": "2024-02-20"}}' \
    -o asistencia.xlsx
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "OBRA_SHEET_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "OBRA_SHEET_PORT")]
    port: u16,

    /// Report configuration file
    #[arg(short, long, env = "OBRA_SHEET_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        report: ReportConfig::load_or_default(args.config.as_deref())?,
    };

    run_api_server(config).await
}
