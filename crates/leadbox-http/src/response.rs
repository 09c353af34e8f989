use bytes::Bytes;
use hyper::{HeaderMap, StatusCode};
use leadbox_core::{Error, Result};
use serde::Serialize;

/// HTTP Response representation
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}
	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}
	pub fn bad_request() -> Self {
		Self::new(StatusCode::BAD_REQUEST)
	}
	pub fn unauthorized() -> Self {
		Self::new(StatusCode::UNAUTHORIZED)
	}
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}
	pub fn service_unavailable() -> Self {
		Self::new(StatusCode::SERVICE_UNAVAILABLE)
	}
	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}
	/// Set the response body
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}
	/// Add a custom header to the response
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_http::Response;
	///
	/// let response = Response::ok().with_header("Cache-Control", "no-store");
	/// assert_eq!(
	///     response.headers.get("cache-control").unwrap().to_str().unwrap(),
	///     "no-store"
	/// );
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = hyper::header::HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = hyper::header::HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}
	/// Serialize `data` as the JSON body and set the content type.
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::created().with_json(&json!({"success": true, "id": 1})).unwrap();
	/// assert_eq!(response.headers.get("content-type").unwrap(), "application/json");
	/// assert_eq!(response.json_body().unwrap()["id"], 1);
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self> {
		let json = serde_json::to_vec(data).map_err(|e| Error::Serialization(e.to_string()))?;
		self.body = Bytes::from(json);
		self.headers.insert(
			hyper::header::CONTENT_TYPE,
			hyper::header::HeaderValue::from_static("application/json"),
		);
		Ok(self)
	}
	/// Parse the body as JSON. Mostly useful for inspecting responses in tests.
	pub fn json_body(&self) -> Result<serde_json::Value> {
		serde_json::from_slice(&self.body).map_err(|e| Error::Serialization(e.to_string()))
	}
}

impl From<Error> for Response {
	fn from(error: Error) -> Self {
		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let message = match &error {
			// Internal details stay in the logs.
			Error::Internal(_) | Error::Serialization(_) => "Internal server error".to_string(),
			other => other.to_string(),
		};
		let body = serde_json::json!({
			"error": message,
		});

		Response::new(status)
			.with_json(&body)
			.unwrap_or_else(|_| Response::internal_server_error())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_error_conversion_uses_status_code() {
		let response = Response::from(Error::NotFound("No route found for /nope".into()));

		assert_eq!(response.status, StatusCode::NOT_FOUND);
		assert_eq!(
			response.json_body().unwrap()["error"],
			"Not found: No route found for /nope"
		);
	}

	#[rstest]
	fn test_internal_error_details_are_hidden() {
		let response = Response::from(Error::Internal("db password is hunter2".into()));

		assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(response.json_body().unwrap()["error"], "Internal server error");
	}

	#[rstest]
	fn test_invalid_header_is_ignored() {
		let response = Response::ok().with_header("bad header", "x");
		assert!(response.headers.is_empty());
	}
}
