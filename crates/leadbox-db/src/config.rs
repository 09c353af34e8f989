//! Connection pool configuration

/// Connection pool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
	/// Database URL (e.g., "sqlite::memory:", "sqlite://leads.db")
	pub url: String,

	/// Connection pool size (max)
	pub pool_max_size: u32,

	/// Seconds to wait for a pooled connection (and for SQLite locks)
	pub pool_timeout: u64,

	/// Maximum idle time for a connection in seconds (None = no limit)
	pub pool_idle_timeout: Option<u64>,
}

impl Default for PoolConfig {
	fn default() -> Self {
		Self {
			url: "sqlite::memory:".to_string(),
			pool_max_size: 5,
			pool_timeout: 5,
			pool_idle_timeout: Some(600),
		}
	}
}

impl PoolConfig {
	/// Create new config with URL
	///
	/// # Examples
	///
	/// ```
	/// use leadbox_db::PoolConfig;
	///
	/// let config = PoolConfig::new("sqlite://leads.db").with_pool_size(8).with_timeout(2);
	/// assert_eq!(config.pool_max_size, 8);
	/// assert_eq!(config.pool_timeout, 2);
	/// assert!(!config.is_memory());
	/// ```
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			..Default::default()
		}
	}
	/// Set max pool size
	pub fn with_pool_size(mut self, max: u32) -> Self {
		self.pool_max_size = max;
		self
	}
	/// Set acquire timeout in seconds
	pub fn with_timeout(mut self, timeout: u64) -> Self {
		self.pool_timeout = timeout;
		self
	}
	/// Set idle timeout in seconds (None = no limit)
	pub fn with_idle_timeout(mut self, timeout: Option<u64>) -> Self {
		self.pool_idle_timeout = timeout;
		self
	}

	/// In-memory databases live as long as their single connection.
	pub fn is_memory(&self) -> bool {
		self.url.contains(":memory:") || self.url.contains("mode=memory")
	}
}
