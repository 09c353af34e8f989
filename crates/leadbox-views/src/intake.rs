//! Lead intake endpoint
//!
//! `POST /api/leads/{variant}` validates the submission against the
//! variant's form and stores it. Responses use a fixed envelope:
//!
//! - `201 {"success": true, "id": N}`
//! - `400 {"success": false, "message": ..., "fieldErrors": {...}}`
//! - `503 {"success": false, "message": ...}` when storage fails

use async_trait::async_trait;
use hyper::StatusCode;
use leadbox_core::{Error, LeadVariant, Result, StoredLead};
use leadbox_db::{LeadStore, StoreError};
use leadbox_forms::{FieldErrors, LeadForm};
use leadbox_http::{Handler, Request, Response};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub const INVALID_SUBMISSION_MESSAGE: &str = "Please correct the highlighted fields.";
pub const MALFORMED_SUBMISSION_MESSAGE: &str = "Malformed submission.";
pub const SUBMISSION_FAILED_MESSAGE: &str = "Submission failed, please try again.";

/// Why a submission was not stored.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
	#[error("submission has {} invalid field(s)", .0.len())]
	Invalid(FieldErrors),
	#[error(transparent)]
	Storage(#[from] StoreError),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Accepted {
	success: bool,
	id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Rejected<'a> {
	success: bool,
	message: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	field_errors: Option<&'a FieldErrors>,
}

impl<'a> Rejected<'a> {
	fn new(message: &'a str) -> Self {
		Self {
			success: false,
			message,
			field_errors: None,
		}
	}
}

pub struct IntakeView {
	store: Arc<dyn LeadStore>,
}

impl IntakeView {
	pub fn new(store: Arc<dyn LeadStore>) -> Self {
		Self { store }
	}

	/// Validate `payload` as a `variant` submission and store it.
	///
	/// Nothing is written unless every field is valid, and exactly one record
	/// is written when they are.
	pub async fn submit(
		&self,
		variant: LeadVariant,
		payload: HashMap<String, Value>,
	) -> std::result::Result<StoredLead, IntakeError> {
		let lead = match LeadForm::for_variant(variant).clean(payload) {
			Ok(lead) => lead,
			Err(errors) => {
				tracing::debug!(
					%variant,
					fields = ?errors.fields().collect::<Vec<_>>(),
					"Rejected invalid submission"
				);
				return Err(IntakeError::Invalid(errors));
			}
		};

		let stored = self.store.insert(lead).await?;
		tracing::info!(%variant, id = stored.id, service = %stored.service, "Lead captured");
		Ok(stored)
	}
}

#[async_trait]
impl Handler for IntakeView {
	async fn handle(&self, request: Request) -> Result<Response> {
		let tag = request.path_param("variant").unwrap_or_default();
		let variant: LeadVariant = tag
			.parse()
			.map_err(|_| Error::NotFound(format!("Unknown form: {}", tag)))?;

		let payload = match request.payload() {
			Ok(payload) => payload,
			Err(error) => {
				tracing::debug!(%variant, error = %error, "Malformed submission");
				return Response::bad_request().with_json(&Rejected::new(MALFORMED_SUBMISSION_MESSAGE));
			}
		};

		match self.submit(variant, payload).await {
			Ok(stored) => Response::created().with_json(&Accepted {
				success: true,
				id: stored.id,
			}),
			Err(IntakeError::Invalid(errors)) => Response::bad_request().with_json(&Rejected {
				field_errors: Some(&errors),
				..Rejected::new(INVALID_SUBMISSION_MESSAGE)
			}),
			Err(IntakeError::Storage(error)) => {
				tracing::error!(%variant, error = %error, "Failed to store lead");
				Response::new(StatusCode::SERVICE_UNAVAILABLE)
					.with_json(&Rejected::new(SUBMISSION_FAILED_MESSAGE))
			}
		}
	}
}
