//! Admin read path for leadbox.
//!
//! - [`AdminGate`] issues and verifies the opaque bearer token every admin
//!   request must carry.
//! - [`LeadSummary`] counts stored leads per service for the dashboard.
//! - [`export_csv`] renders leads as a spreadsheet-friendly CSV file.

pub mod auth;
pub mod export;
pub mod summary;

pub use auth::{AdminGate, AuthError, DEFAULT_TOKEN_TTL};
pub use export::{CsvExporter, ExportError, export_csv};
pub use summary::LeadSummary;
