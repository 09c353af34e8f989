//! Admin query endpoints
//!
//! Every admin request carries its credential explicitly as
//! `Authorization: Bearer <token>`; tokens come from the login endpoint.

use async_trait::async_trait;
use leadbox_admin::{AdminGate, LeadSummary};
use leadbox_core::{Error, Result, StoredLead};
use leadbox_db::LeadStore;
use leadbox_http::{Handler, Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const LOAD_FAILED_MESSAGE: &str = "Error loading data.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLeadsResponse {
	pub count: usize,
	pub results: Vec<StoredLead>,
	pub summary: LeadSummary,
}

impl AdminLeadsResponse {
	pub fn new(results: Vec<StoredLead>) -> Self {
		Self {
			count: results.len(),
			summary: LeadSummary::from_leads(&results),
			results,
		}
	}
}

/// `GET /api/admin/leads[?service=S]`
pub struct AdminLeadsView {
	store: Arc<dyn LeadStore>,
	gate: AdminGate,
}

impl AdminLeadsView {
	pub fn new(store: Arc<dyn LeadStore>, gate: AdminGate) -> Self {
		Self { store, gate }
	}

	/// Stored leads for an authenticated caller, optionally restricted to one
	/// service tag.
	pub async fn query(&self, token: Option<&str>, service: Option<&str>) -> Result<AdminLeadsResponse> {
		if let Err(error) = self.gate.verify(token) {
			tracing::warn!(error = %error, "Rejected admin request");
			return Err(error.into());
		}

		let results = self.store.list_all(service).await.map_err(|error| {
			tracing::error!(error = %error, service = ?service, "Failed to load leads");
			Error::Storage(LOAD_FAILED_MESSAGE.to_string())
		})?;

		Ok(AdminLeadsResponse::new(results))
	}
}

#[async_trait]
impl Handler for AdminLeadsView {
	async fn handle(&self, request: Request) -> Result<Response> {
		// A blank filter means "all services".
		let service = request
			.query_param("service")
			.filter(|service| !service.is_empty());

		let body = self.query(request.bearer_token(), service).await?;

		Response::ok()
			.with_header("Cache-Control", "no-store")
			.with_json(&body)
	}
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
	password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
	token: String,
}

/// `POST /api/admin/login {"password": ...}`
pub struct AdminLoginView {
	gate: AdminGate,
}

impl AdminLoginView {
	pub fn new(gate: AdminGate) -> Self {
		Self { gate }
	}
}

#[async_trait]
impl Handler for AdminLoginView {
	async fn handle(&self, request: Request) -> Result<Response> {
		let login: LoginRequest = request.json()?;
		let token = self.gate.login(&login.password)?;

		Response::ok()
			.with_header("Cache-Control", "no-store")
			.with_json(&LoginResponse { token })
	}
}
