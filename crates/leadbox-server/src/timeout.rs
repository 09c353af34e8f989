//! Per-request timeout

use async_trait::async_trait;
use leadbox_core::{Error, Result};
use leadbox_http::{Handler, Request, Response};
use std::sync::Arc;
use std::time::Duration;

/// Fails a request with [`Error::Timeout`] (504) when the inner handler does
/// not finish in time. The inner future is dropped at that point.
///
/// Dropping the future does not roll back work already handed to the
/// database. An insert that was in flight may still commit, so a 504 does not
/// mean nothing was stored, and a client retry can store a duplicate lead.
pub struct TimeoutHandler {
	inner: Arc<dyn Handler>,
	timeout: Duration,
}

impl TimeoutHandler {
	pub fn new(inner: Arc<dyn Handler>, timeout: Duration) -> Self {
		Self { inner, timeout }
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}
}

#[async_trait]
impl Handler for TimeoutHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let path = request.path().to_string();
		match tokio::time::timeout(self.timeout, self.inner.handle(request)).await {
			Ok(result) => result,
			Err(_) => {
				tracing::warn!(path = %path, timeout = ?self.timeout, "Request timed out");
				Err(Error::Timeout(self.timeout.as_secs()))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};

	struct Sleepy(Duration);

	#[async_trait]
	impl Handler for Sleepy {
		async fn handle(&self, _request: Request) -> Result<Response> {
			tokio::time::sleep(self.0).await;
			Ok(Response::ok())
		}
	}

	#[tokio::test(start_paused = true)]
	async fn test_slow_handler_times_out() {
		let handler = TimeoutHandler::new(Arc::new(Sleepy(Duration::from_secs(60))), Duration::from_secs(5));

		let result = handler.handle(Request::builder().build().unwrap()).await;

		assert_eq!(result.unwrap_err(), Error::Timeout(5));
	}

	struct WritesThenStalls(Arc<AtomicUsize>);

	#[async_trait]
	impl Handler for WritesThenStalls {
		async fn handle(&self, _request: Request) -> Result<Response> {
			self.0.fetch_add(1, Ordering::SeqCst);
			tokio::time::sleep(Duration::from_secs(60)).await;
			Ok(Response::ok())
		}
	}

	#[tokio::test(start_paused = true)]
	async fn test_timed_out_request_keeps_completed_writes() {
		// Arrange
		let writes = Arc::new(AtomicUsize::new(0));
		let handler = TimeoutHandler::new(Arc::new(WritesThenStalls(writes.clone())), Duration::from_secs(5));

		// Act
		let result = handler.handle(Request::builder().build().unwrap()).await;

		// Assert
		assert_eq!(result.unwrap_err(), Error::Timeout(5));
		assert_eq!(writes.load(Ordering::SeqCst), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn test_fast_handler_passes_through() {
		let handler = TimeoutHandler::new(Arc::new(Sleepy(Duration::from_millis(10))), Duration::from_secs(5));

		let response = handler.handle(Request::builder().build().unwrap()).await.unwrap();

		assert_eq!(response.status, hyper::StatusCode::OK);
	}
}
