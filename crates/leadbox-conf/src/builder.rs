//! Merging configuration sources

use crate::profile::Profile;
use crate::settings::SettingsError;
use crate::sources::ConfigSource;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Collects sources and merges them into [`MergedSettings`].
///
/// ```
/// use leadbox_conf::{DefaultSource, SettingsBuilder};
/// use serde_json::json;
///
/// let merged = SettingsBuilder::new()
///     .add_source(DefaultSource::new().with_value("debug", json!(true)))
///     .build()
///     .unwrap();
///
/// assert!(merged.get::<bool>("debug").unwrap());
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
	profile: Profile,
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn profile(mut self, profile: Profile) -> Self {
		self.profile = profile;
		self
	}

	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Load every source and merge them. Higher priority wins; among equal
	/// priorities the source added later wins.
	pub fn build(mut self) -> Result<MergedSettings, SettingsError> {
		self.sources.sort_by_key(|source| source.priority());

		let mut values = IndexMap::new();
		let mut origins = IndexMap::new();
		for source in &self.sources {
			let loaded = source.load()?;
			let description = source.description();
			tracing::debug!(source = %description, keys = loaded.len(), "Loaded settings source");
			for (key, value) in loaded {
				origins.insert(key.clone(), description.clone());
				values.insert(key, value);
			}
		}

		Ok(MergedSettings {
			profile: self.profile,
			values,
			origins,
		})
	}
}

/// The merged key/value view of all sources.
#[derive(Debug, Clone)]
pub struct MergedSettings {
	profile: Profile,
	values: IndexMap<String, Value>,
	origins: IndexMap<String, String>,
}

impl MergedSettings {
	pub fn profile(&self) -> Profile {
		self.profile
	}

	pub fn as_map(&self) -> &IndexMap<String, Value> {
		&self.values
	}

	/// Which source supplied `key`.
	pub fn origin(&self, key: &str) -> Option<&str> {
		self.origins.get(key).map(String::as_str)
	}

	pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, SettingsError> {
		let value = self
			.values
			.get(key)
			.ok_or_else(|| SettingsError::Missing(key.to_string()))?;
		serde_json::from_value(value.clone()).map_err(|e| SettingsError::Invalid {
			key: key.to_string(),
			message: e.to_string(),
		})
	}

	/// Deserialize the whole map into a typed struct.
	pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, SettingsError> {
		let object: serde_json::Map<String, Value> = self.values.into_iter().collect();
		serde_json::from_value(Value::Object(object))
			.map_err(|e| SettingsError::Deserialize(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sources::{DefaultSource, TomlFileSource};
	use rstest::*;
	use serde_json::json;
	use std::fs;
	use tempfile::TempDir;

	#[rstest]
	fn test_higher_priority_wins_regardless_of_order() {
		// Arrange
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("base.toml");
		fs::write(&path, "log_level = \"debug\"\n").unwrap();

		// Act
		let merged = SettingsBuilder::new()
			.add_source(TomlFileSource::new(&path))
			.add_source(
				DefaultSource::new()
					.with_value("log_level", json!("info"))
					.with_value("debug", json!(false)),
			)
			.build()
			.unwrap();

		// Assert
		assert_eq!(merged.get::<String>("log_level").unwrap(), "debug");
		assert!(!merged.get::<bool>("debug").unwrap());
		assert_eq!(merged.origin("debug"), Some("defaults"));
		assert!(merged.origin("log_level").unwrap().starts_with("file "));
	}

	#[rstest]
	fn test_equal_priority_later_source_wins() {
		let dir = TempDir::new().unwrap();
		let base = dir.path().join("base.toml");
		let production = dir.path().join("production.toml");
		fs::write(&base, "debug = true\nbind_address = \"127.0.0.1:8000\"\n").unwrap();
		fs::write(&production, "debug = false\n").unwrap();

		let merged = SettingsBuilder::new()
			.profile(Profile::Production)
			.add_source(TomlFileSource::new(&base))
			.add_source(TomlFileSource::new(&production))
			.build()
			.unwrap();

		assert!(!merged.get::<bool>("debug").unwrap());
		assert_eq!(merged.get::<String>("bind_address").unwrap(), "127.0.0.1:8000");
		assert_eq!(merged.profile(), Profile::Production);
	}

	#[rstest]
	fn test_missing_and_invalid_keys() {
		let merged = SettingsBuilder::new()
			.add_source(DefaultSource::new().with_value("debug", json!("maybe")))
			.build()
			.unwrap();

		assert!(matches!(merged.get::<bool>("absent"), Err(SettingsError::Missing(_))));
		assert!(matches!(merged.get::<bool>("debug"), Err(SettingsError::Invalid { .. })));
	}
}
