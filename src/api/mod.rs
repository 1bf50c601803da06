//! Obra Sheet API server module
//!
//! Provides the HTTP REST surface for the attendance backend.
//! Run with `obra-sheet-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
