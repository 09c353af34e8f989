//! Middleware and handler traits for HTTP request processing.
//!
//! ```rust
//! use leadbox_http::{Handler, Middleware, MiddlewareChain, Request, Response};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, _request: Request) -> leadbox_http::Result<Response> {
//!         Ok(Response::ok().with_body("Hello!"))
//!     }
//! }
//!
//! struct NoStore;
//!
//! #[async_trait]
//! impl Middleware for NoStore {
//!     async fn process(&self, request: Request, next: Arc<dyn Handler>) -> leadbox_http::Result<Response> {
//!         Ok(next.handle(request).await?.with_header("Cache-Control", "no-store"))
//!     }
//! }
//!
//! let chain = MiddlewareChain::new(Arc::new(Hello)).with_middleware(Arc::new(NoStore));
//! ```

use async_trait::async_trait;
use leadbox_core::Result;
use std::sync::Arc;

use crate::{Request, Response};

/// Handler trait for processing requests.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles an HTTP request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed. The server turns
	/// it into a JSON error response.
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Blanket implementation for `Arc<T>` where T: Handler.
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request, usually by calling `next` and adjusting the result.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;
}

/// Composes middleware around a handler.
///
/// The first middleware added is the outermost one.
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Adds a middleware to the chain using builder pattern.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		let mut current_handler = self.handler.clone();

		for middleware in self.middlewares.iter().rev() {
			current_handler = Arc::new(ComposedHandler {
				middleware: middleware.clone(),
				next: current_handler,
			});
		}

		current_handler.handle(request).await
	}
}

struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::Mutex;

	struct Recorder {
		name: &'static str,
		log: Arc<Mutex<Vec<String>>>,
	}

	#[async_trait]
	impl Middleware for Recorder {
		async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
			self.log.lock().unwrap().push(format!("enter {}", self.name));
			let response = next.handle(request).await;
			self.log.lock().unwrap().push(format!("leave {}", self.name));
			response
		}
	}

	struct Ok200;

	#[async_trait]
	impl Handler for Ok200 {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok())
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_first_middleware_is_outermost() {
		// Arrange
		let log = Arc::new(Mutex::new(Vec::new()));
		let chain = MiddlewareChain::new(Arc::new(Ok200))
			.with_middleware(Arc::new(Recorder {
				name: "outer",
				log: log.clone(),
			}))
			.with_middleware(Arc::new(Recorder {
				name: "inner",
				log: log.clone(),
			}));

		// Act
		let response = chain.handle(Request::builder().build().unwrap()).await.unwrap();

		// Assert
		assert_eq!(response.status, hyper::StatusCode::OK);
		assert_eq!(
			*log.lock().unwrap(),
			vec!["enter outer", "enter inner", "leave inner", "leave outer"]
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_empty_chain_calls_handler() {
		let chain = MiddlewareChain::new(Arc::new(Ok200));
		let response = chain.handle(Request::builder().build().unwrap()).await.unwrap();
		assert_eq!(response.status, hyper::StatusCode::OK);
	}
}
