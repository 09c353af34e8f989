//! CSV export of stored leads

use csv::Writer;
use leadbox_core::StoredLead;
use std::io::Write;

/// Column headers, in output order.
pub const CSV_HEADERS: [&str; 5] = ["Name", "Email", "Company", "Service", "Submitted"];

/// Format of the `Submitted` column.
pub const SUBMITTED_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
	#[error("Failed to write CSV: {0}")]
	Csv(#[from] csv::Error),
	#[error("Failed to flush CSV output: {0}")]
	Io(#[from] std::io::Error),
}

/// Writes leads as CSV.
///
/// Cells that a spreadsheet would evaluate as a formula are prefixed with a
/// single quote.
#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
	include_headers: bool,
}

impl Default for CsvExporter {
	fn default() -> Self {
		Self {
			include_headers: true,
		}
	}
}

impl CsvExporter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn without_headers(mut self) -> Self {
		self.include_headers = false;
		self
	}

	/// Stream `leads` into `writer`.
	pub fn write<W: Write>(&self, leads: &[StoredLead], writer: W) -> Result<(), ExportError> {
		let mut writer = Writer::from_writer(writer);

		if self.include_headers {
			writer.write_record(CSV_HEADERS)?;
		}
		for lead in leads {
			let submitted = lead.created_at.format(SUBMITTED_FORMAT).to_string();
			writer.write_record([
				sanitize_cell(&lead.name),
				sanitize_cell(&lead.email),
				sanitize_cell(lead.company.as_deref().unwrap_or("")),
				sanitize_cell(&lead.service),
				submitted,
			])?;
		}

		writer.flush()?;
		Ok(())
	}

	pub fn export(&self, leads: &[StoredLead]) -> Result<Vec<u8>, ExportError> {
		let mut output = Vec::new();
		self.write(leads, &mut output)?;
		Ok(output)
	}
}

/// Render `leads` as CSV with a header row.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use leadbox_admin::export_csv;
/// use leadbox_core::{NewLead, StoredLead};
///
/// let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
/// let lead = StoredLead::from_new(1, at, NewLead::new("Jo", "jo@example.com", "Waitlist"));
///
/// let csv = String::from_utf8(export_csv(&[lead]).unwrap()).unwrap();
/// assert_eq!(
///     csv,
///     "Name,Email,Company,Service,Submitted\nJo,jo@example.com,,Waitlist,2024-05-01 09:30:00 UTC\n"
/// );
/// ```
pub fn export_csv(leads: &[StoredLead]) -> Result<Vec<u8>, ExportError> {
	CsvExporter::new().export(leads)
}

fn sanitize_cell(value: &str) -> String {
	match value.chars().next() {
		Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{}", value),
		_ => value.to_string(),
	}
}
