//! Request-level error taxonomy.
//!
//! Every failure that can reach an HTTP caller is expressed as an [`Error`].
//! The variant decides the status code; the message decides what the caller
//! sees. Storage failures always carry a generic message, the underlying cause
//! is logged where it happens and never placed in the variant.

/// Errors surfaced to HTTP callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Validation error: {0}")]
	Validation(String),

	#[error("Authentication failed: {0}")]
	Authentication(String),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Method not allowed: {0}")]
	MethodNotAllowed(String),

	#[error("Bad request: {0}")]
	BadRequest(String),

	#[error("{0}")]
	Storage(String),

	#[error("Request timed out after {0} seconds")]
	Timeout(u64),

	#[error("Serialization error: {0}")]
	Serialization(String),

	#[error("Internal server error: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// HTTP status code for this error.
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_core::Error;
	///
	/// assert_eq!(Error::Validation("bad".into()).status_code(), 400);
	/// assert_eq!(Error::Storage("try again".into()).status_code(), 503);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::Validation(_) | Error::BadRequest(_) => 400,
			Error::Authentication(_) => 401,
			Error::NotFound(_) => 404,
			Error::MethodNotAllowed(_) => 405,
			Error::Storage(_) => 503,
			Error::Timeout(_) => 504,
			Error::Serialization(_) | Error::Internal(_) => 500,
		}
	}

	/// Whether the error is caused by the caller (4xx) rather than the service.
	pub fn is_client_error(&self) -> bool {
		(400..500).contains(&self.status_code())
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Serialization(err.to_string())
	}
}
