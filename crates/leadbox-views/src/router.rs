//! Path routing
//!
//! Patterns are literal segments or `{name}` placeholders matching exactly one
//! non-empty segment. Routes are tried in registration order.

use async_trait::async_trait;
use hyper::Method;
use leadbox_core::{Error, Result};
use leadbox_http::{Handler, Request, Response};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Param(String),
}

/// A compiled path pattern such as `/api/leads/{variant}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
	pattern: String,
	segments: Vec<Segment>,
}

impl PathPattern {
	pub fn new(pattern: &str) -> Self {
		let segments = split_path(pattern)
			.map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
				Some(name) => Segment::Param(name.to_string()),
				None => Segment::Literal(segment.to_string()),
			})
			.collect();
		Self {
			pattern: pattern.to_string(),
			segments,
		}
	}

	pub fn as_str(&self) -> &str {
		&self.pattern
	}

	/// Parameters captured from `path`, or `None` if it does not match.
	pub fn extract_params(&self, path: &str) -> Option<HashMap<String, String>> {
		let parts: Vec<&str> = split_path(path).collect();
		if parts.len() != self.segments.len() {
			return None;
		}

		let mut params = HashMap::new();
		for (segment, part) in self.segments.iter().zip(parts) {
			match segment {
				Segment::Literal(literal) if literal == part => {}
				Segment::Literal(_) => return None,
				Segment::Param(name) => {
					params.insert(name.clone(), part.to_string());
				}
			}
		}
		Some(params)
	}

	pub fn is_match(&self, path: &str) -> bool {
		self.extract_params(path).is_some()
	}
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
	path.split('/').filter(|segment| !segment.is_empty())
}

struct Route {
	pattern: PathPattern,
	method: Method,
	name: Option<String>,
	handler: Arc<dyn Handler>,
}

/// Function handler adapter
pub struct FunctionHandler<F> {
	pub func: F,
}

#[async_trait]
impl<F, Fut> Handler for FunctionHandler<F>
where
	F: Fn(Request) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Response>> + Send,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		(self.func)(request).await
	}
}

/// Method and path dispatch.
///
/// A path that matches some route but none with the request method yields
/// [`Error::MethodNotAllowed`]; a path matching nothing yields
/// [`Error::NotFound`].
#[derive(Default)]
pub struct Router {
	routes: Vec<Route>,
}

impl Router {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `handler` for `method` requests on `path`.
	pub fn handler(mut self, path: &str, method: Method, handler: Arc<dyn Handler>) -> Self {
		self.routes.push(Route {
			pattern: PathPattern::new(path),
			method,
			name: None,
			handler,
		});
		self
	}

	/// Register a named handler, resolvable through [`Router::reverse`].
	pub fn handler_named(
		mut self,
		path: &str,
		method: Method,
		name: &str,
		handler: Arc<dyn Handler>,
	) -> Self {
		self = self.handler(path, method, handler);
		if let Some(route) = self.routes.last_mut() {
			route.name = Some(name.to_string());
		}
		self
	}

	/// Register a function-based route.
	pub fn function<F, Fut>(self, path: &str, method: Method, func: F) -> Self
	where
		F: Fn(Request) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Response>> + Send + 'static,
	{
		self.handler(path, method, Arc::new(FunctionHandler { func }))
	}

	pub fn route_count(&self) -> usize {
		self.routes.len()
	}

	/// Pattern registered under `name`.
	pub fn reverse(&self, name: &str) -> Option<&str> {
		self.routes
			.iter()
			.find(|route| route.name.as_deref() == Some(name))
			.map(|route| route.pattern.as_str())
	}
}

#[async_trait]
impl Handler for Router {
	async fn handle(&self, mut request: Request) -> Result<Response> {
		let path = request.path().to_string();
		let mut path_matched = false;

		for route in &self.routes {
			let Some(params) = route.pattern.extract_params(&path) else {
				continue;
			};
			// HEAD is served by GET routes.
			let method_matches = route.method == request.method
				|| (route.method == Method::GET && request.method == Method::HEAD);
			if !method_matches {
				path_matched = true;
				continue;
			}

			for (key, value) in params {
				request.set_path_param(key, value);
			}
			return route.handler.handle(request).await;
		}

		if path_matched {
			Err(Error::MethodNotAllowed(format!(
				"Method {} not allowed for {}",
				request.method, path
			)))
		} else {
			Err(Error::NotFound(format!("No route found for {}", path)))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::*;

	#[rstest]
	#[case("/api/leads/{variant}", "/api/leads/waitlist", Some(("variant", "waitlist")))]
	#[case("/api/leads/{variant}", "/api/leads/waitlist/", Some(("variant", "waitlist")))]
	#[case("/api/leads/{variant}", "/api/leads", None)]
	#[case("/api/leads/{variant}", "/api/leads/a/b", None)]
	#[case("/health", "/healthz", None)]
	fn test_pattern_matching(
		#[case] pattern: &str,
		#[case] path: &str,
		#[case] expected: Option<(&str, &str)>,
	) {
		let params = PathPattern::new(pattern).extract_params(path);

		match expected {
			Some((key, value)) => assert_eq!(params.unwrap()[key], value),
			None => assert!(params.is_none()),
		}
	}

	#[fixture]
	fn router() -> Router {
		Router::new()
			.function("/items/{id}", Method::GET, |request: Request| async move {
				let id = request.path_param("id").unwrap_or_default().to_string();
				Ok(Response::ok().with_body(id))
			})
			.function("/items", Method::POST, |_request: Request| async {
				Ok(Response::created())
			})
	}

	#[rstest]
	#[tokio::test]
	async fn test_dispatch_with_params(router: Router) {
		// Arrange
		let request = Request::builder().uri("/items/42").build().unwrap();

		// Act
		let response = router.handle(request).await.unwrap();

		// Assert
		assert_eq!(response.body, "42");
	}

	#[rstest]
	#[tokio::test]
	async fn test_head_is_served_by_get(router: Router) {
		let request = Request::builder()
			.method(Method::HEAD)
			.uri("/items/7")
			.build()
			.unwrap();

		assert!(router.handle(request).await.is_ok());
	}

	#[rstest]
	#[tokio::test]
	async fn test_wrong_method_is_405(router: Router) {
		let request = Request::builder()
			.method(Method::DELETE)
			.uri("/items")
			.build()
			.unwrap();

		let error = router.handle(request).await.unwrap_err();

		assert_eq!(error.status_code(), 405);
	}

	#[rstest]
	#[tokio::test]
	async fn test_unknown_path_is_404(router: Router) {
		let request = Request::builder().uri("/nothing").build().unwrap();

		let error = router.handle(request).await.unwrap_err();

		assert_eq!(error, Error::NotFound("No route found for /nothing".into()));
	}

	#[rstest]
	fn test_reverse_named_route() {
		let router = Router::new().handler_named(
			"/health",
			Method::GET,
			"health",
			Arc::new(FunctionHandler {
				func: |_request: Request| async { Ok::<_, Error>(Response::ok()) },
			}),
		);

		assert_eq!(router.reverse("health"), Some("/health"));
		assert_eq!(router.reverse("missing"), None);
		assert_eq!(router.route_count(), 1);
	}
}
