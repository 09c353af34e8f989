//! Incoming HTTP request

use bytes::Bytes;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::{HeaderMap, Method, Uri, Version};
use leadbox_core::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::net::SocketAddr;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// HTTP Request representation
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub remote_addr: Option<SocketAddr>,
	pub query_params: HashMap<String, String>,
	pub path_params: HashMap<String, String>,
}

impl Request {
	/// Create a request from already parsed parts.
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		let query_params = Self::parse_query_params(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			remote_addr: None,
			query_params,
			path_params: HashMap::new(),
		}
	}

	/// Start building a request.
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/api/admin/leads?service=Waitlist")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/api/admin/leads");
	/// assert_eq!(request.query_param("service"), Some("Waitlist"));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// URL-decoded query parameters. For repeated keys the last value wins.
	fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
			.map(|pairs| pairs.into_iter().collect())
			.unwrap_or_default()
	}

	/// Get the request path
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// A single URL-decoded query parameter.
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query_params.get(name).map(String::as_str)
	}

	/// Set a path parameter (used by the router for `{name}` segments)
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}

	pub fn path_param(&self, key: &str) -> Option<&str> {
		self.path_params.get(key).map(String::as_str)
	}

	/// Header value as a string, if present and valid UTF-8.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// Media type of the body without parameters, lowercased.
	pub fn content_type(&self) -> Option<String> {
		self.headers
			.get(CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.and_then(|v| v.split(';').next())
			.map(|v| v.trim().to_ascii_lowercase())
	}

	/// Token from an `Authorization: Bearer <token>` header.
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/api/admin/leads")
	///     .header("Authorization", "Bearer abc123")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.bearer_token(), Some("abc123"));
	/// ```
	pub fn bearer_token(&self) -> Option<&str> {
		let value = self.headers.get(AUTHORIZATION)?.to_str().ok()?;
		let (scheme, token) = value.trim().split_once(' ')?;
		if !scheme.eq_ignore_ascii_case("bearer") {
			return None;
		}
		let token = token.trim();
		(!token.is_empty()).then_some(token)
	}

	/// Deserialize a JSON body.
	pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
		serde_json::from_slice(&self.body)
			.map_err(|e| Error::BadRequest(format!("Invalid JSON body: {}", e)))
	}

	/// Decode the body as a flat key/value payload.
	///
	/// `application/x-www-form-urlencoded` bodies become string values; any
	/// other body must be a JSON object.
	pub fn payload(&self) -> Result<HashMap<String, serde_json::Value>> {
		if self.content_type().as_deref() == Some(FORM_URLENCODED) {
			let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&self.body)
				.map_err(|e| Error::BadRequest(format!("Invalid form body: {}", e)))?;
			return Ok(pairs
				.into_iter()
				.map(|(k, v)| (k, serde_json::Value::String(v)))
				.collect());
		}

		match serde_json::from_slice::<serde_json::Value>(&self.body) {
			Ok(serde_json::Value::Object(map)) => Ok(map.into_iter().collect()),
			Ok(_) => Err(Error::BadRequest("Expected a JSON object".to_string())),
			Err(e) => Err(Error::BadRequest(format!("Invalid JSON body: {}", e))),
		}
	}
}

/// Builder for [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	remote_addr: Option<SocketAddr>,
	error: Option<String>,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: "/".to_string(),
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			remote_addr: None,
			error: None,
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	/// Add a header. Invalid names or values make [`RequestBuilder::build`] fail.
	pub fn header(mut self, name: &str, value: &str) -> Self {
		match (
			hyper::header::HeaderName::from_bytes(name.as_bytes()),
			hyper::header::HeaderValue::from_str(value),
		) {
			(Ok(name), Ok(value)) => {
				self.headers.append(name, value);
			}
			_ => self.error = Some(format!("invalid header {}", name)),
		}
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// JSON body with a matching content type.
	pub fn json(self, value: &serde_json::Value) -> Self {
		self.header("content-type", "application/json")
			.body(value.to_string())
	}

	pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	pub fn build(self) -> Result<Request> {
		if let Some(error) = self.error {
			return Err(Error::BadRequest(error));
		}
		let uri: Uri = self
			.uri
			.parse()
			.map_err(|e| Error::BadRequest(format!("invalid URI {}: {}", self.uri, e)))?;

		let mut request = Request::new(self.method, uri, self.version, self.headers, self.body);
		request.remote_addr = self.remote_addr;
		Ok(request)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("/api/admin/leads?service=Toolkit%20Download", Some("Toolkit Download"))]
	#[case("/api/admin/leads?service=Toolkit+Download", Some("Toolkit Download"))]
	#[case("/api/admin/leads?service=a%3Db&x=1", Some("a=b"))]
	#[case("/api/admin/leads?service=", Some(""))]
	#[case("/api/admin/leads?other=1", None)]
	#[case("/api/admin/leads", None)]
	fn test_query_params_are_decoded(#[case] uri: &str, #[case] expected: Option<&str>) {
		let request = Request::builder().uri(uri).build().unwrap();

		assert_eq!(request.query_param("service"), expected);
	}

	#[rstest]
	#[case("Bearer abc", Some("abc"))]
	#[case("bearer  abc ", Some("abc"))]
	#[case("Basic abc", None)]
	#[case("Bearer ", None)]
	#[case("abc", None)]
	fn test_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
		let request = Request::builder()
			.header("authorization", header)
			.build()
			.unwrap();
		assert_eq!(request.bearer_token(), expected);
	}

	#[rstest]
	fn test_json_payload() {
		let request = Request::builder()
			.method(Method::POST)
			.json(&json!({"name": "Jo", "wantsUpdates": true}))
			.build()
			.unwrap();

		let payload = request.payload().unwrap();

		assert_eq!(payload["name"], json!("Jo"));
		assert_eq!(payload["wantsUpdates"], json!(true));
	}

	#[rstest]
	fn test_urlencoded_payload() {
		let request = Request::builder()
			.method(Method::POST)
			.header("content-type", "application/x-www-form-urlencoded; charset=utf-8")
			.body("name=Jo+Doe&email=jo%40example.com&notify=on")
			.build()
			.unwrap();

		let payload = request.payload().unwrap();

		assert_eq!(payload["name"], json!("Jo Doe"));
		assert_eq!(payload["email"], json!("jo@example.com"));
		assert_eq!(payload["notify"], json!("on"));
	}

	#[rstest]
	#[case("[1, 2]")]
	#[case("not json")]
	#[case("")]
	fn test_non_object_payload_is_bad_request(#[case] body: &'static str) {
		let request = Request::builder()
			.header("content-type", "application/json")
			.body(body)
			.build()
			.unwrap();

		assert!(matches!(request.payload(), Err(Error::BadRequest(_))));
	}

	#[rstest]
	fn test_invalid_header_fails_build() {
		let result = Request::builder().header("bad header", "x").build();
		assert!(result.is_err());
	}
}
