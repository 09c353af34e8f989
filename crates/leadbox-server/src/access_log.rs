//! Request access logging

use async_trait::async_trait;
use leadbox_core::Result;
use leadbox_http::{Handler, Middleware, Request, Response};
use std::sync::Arc;
use std::time::Instant;

/// Logs method, path, status and latency of every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccessLogMiddleware;

impl AccessLogMiddleware {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl Middleware for AccessLogMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let method = request.method.clone();
		let path = request.path().to_string();
		let remote = request.remote_addr;
		let started = Instant::now();

		let result = next.handle(request).await;
		let elapsed_ms = started.elapsed().as_millis() as u64;

		match &result {
			Ok(response) => tracing::info!(
				%method,
				%path,
				status = response.status.as_u16(),
				elapsed_ms,
				remote = ?remote,
				"request"
			),
			Err(error) => tracing::warn!(
				%method,
				%path,
				status = error.status_code(),
				elapsed_ms,
				remote = ?remote,
				error = %error,
				"request failed"
			),
		}

		result
	}
}
