/// Storage failure.
///
/// The messages here are for logs. HTTP handlers replace them with a generic
/// retry message before anything reaches a visitor.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("storage unavailable: {0}")]
	Unavailable(String),

	#[error("query failed: {0}")]
	Query(String),

	#[error("corrupt lead row: {0}")]
	Decode(String),

	#[error("migration {name} failed: {reason}")]
	Migration { name: String, reason: String },

	#[error("invalid database configuration: {0}")]
	Configuration(String),
}

impl From<sqlx::Error> for StoreError {
	fn from(err: sqlx::Error) -> Self {
		match err {
			sqlx::Error::PoolTimedOut
			| sqlx::Error::PoolClosed
			| sqlx::Error::WorkerCrashed
			| sqlx::Error::Io(_)
			| sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
			sqlx::Error::ColumnDecode { .. }
			| sqlx::Error::ColumnNotFound(_)
			| sqlx::Error::Decode(_)
			| sqlx::Error::TypeNotFound { .. } => StoreError::Decode(err.to_string()),
			sqlx::Error::Configuration(_) => StoreError::Configuration(err.to_string()),
			other => StoreError::Query(other.to_string()),
		}
	}
}
