//! Configuration sources
//!
//! Each source produces a flat map of lowercase keys to JSON values. The
//! [`SettingsBuilder`](crate::SettingsBuilder) merges them by priority.

use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Errors raised while reading a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("failed to parse {path}: {message}")]
	Parse { path: PathBuf, message: String },
	#[error("{path} must contain a table at the top level")]
	NotATable { path: PathBuf },
}

/// A provider of configuration values.
pub trait ConfigSource: Send + Sync {
	/// Load all values this source knows about.
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Higher priorities override lower ones.
	fn priority(&self) -> u8;

	/// Human readable description for logs and `manage check`.
	fn description(&self) -> String;
}

/// Built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_value(mut self, key: &str, value: Value) -> Self {
		self.values.insert(key.to_string(), value);
		self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"defaults".to_string()
	}
}

/// Environment variables.
///
/// With a prefix, every `{PREFIX}{KEY}` variable becomes `key`. With an
/// explicit key list, only those variables are read and the prefix is not
/// applied. Values are kept as strings; typed settings parse them.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
	prefix: Option<String>,
	keys: Vec<String>,
}

impl EnvSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_prefix(mut self, prefix: &str) -> Self {
		self.prefix = Some(prefix.to_string());
		self
	}

	/// Read only the given variables (matched case-sensitively, uppercase).
	pub fn with_keys<I, S>(mut self, keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.keys = keys.into_iter().map(Into::into).collect();
		self
	}

	fn collect(&self) -> IndexMap<String, Value> {
		if !self.keys.is_empty() {
			return self
				.keys
				.iter()
				.filter_map(|key| {
					std::env::var(key)
						.ok()
						.map(|value| (key.to_ascii_lowercase(), Value::String(value)))
				})
				.collect();
		}

		let prefix = self.prefix.as_deref().unwrap_or("");
		let mut values: Vec<(String, Value)> = std::env::vars()
			.filter_map(|(name, value)| {
				let key = name.strip_prefix(prefix)?;
				(!key.is_empty()).then(|| (key.to_ascii_lowercase(), Value::String(value)))
			})
			.collect();
		// Stable order regardless of how the platform enumerates variables.
		values.sort_by(|a, b| a.0.cmp(&b.0));
		values.into_iter().collect()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.collect())
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		if !self.keys.is_empty() {
			format!("environment ({})", self.keys.join(", "))
		} else {
			format!("environment ({}*)", self.prefix.as_deref().unwrap_or(""))
		}
	}
}

/// Environment variables that settings files may override.
#[derive(Debug, Clone, Default)]
pub struct LowPriorityEnvSource {
	inner: EnvSource,
}

impl LowPriorityEnvSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_prefix(mut self, prefix: &str) -> Self {
		self.inner = self.inner.with_prefix(prefix);
		self
	}
}

impl ConfigSource for LowPriorityEnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		self.inner.load()
	}

	fn priority(&self) -> u8 {
		40
	}

	fn description(&self) -> String {
		format!("low-priority {}", self.inner.description())
	}
}

/// A TOML settings file. A missing file yields no values.
#[derive(Debug, Clone)]
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let content = match std::fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!(path = %self.path.display(), "Settings file not found, skipping");
				return Ok(IndexMap::new());
			}
			Err(source) => {
				return Err(SourceError::Io {
					path: self.path.clone(),
					source,
				});
			}
		};

		let table: toml::Table = toml::from_str(&content).map_err(|e| SourceError::Parse {
			path: self.path.clone(),
			message: e.to_string(),
		})?;

		match serde_json::to_value(table) {
			Ok(Value::Object(map)) => Ok(map.into_iter().collect()),
			Ok(_) => Err(SourceError::NotATable {
				path: self.path.clone(),
			}),
			Err(e) => Err(SourceError::Parse {
				path: self.path.clone(),
				message: e.to_string(),
			}),
		}
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("file {}", self.path.display())
	}
}
