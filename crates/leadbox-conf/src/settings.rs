//! Typed leadbox settings

use crate::builder::SettingsBuilder;
use crate::profile::Profile;
use crate::sources::{DefaultSource, EnvSource, LowPriorityEnvSource, SourceError, TomlFileSource};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Prefix of the low-priority environment variables.
pub const ENV_PREFIX: &str = "LEADBOX_";

/// Unprefixed variables commonly injected by hosting platforms.
pub const DEPLOYMENT_ENV_KEYS: [&str; 3] = ["DATABASE_URL", "ADMIN_PASSWORD", "SECRET_KEY"];

/// Minimum accepted length of `secret_key`.
pub const MIN_SECRET_KEY_LENGTH: usize = 32;

/// Signing key used outside production when none is configured.
pub const DEVELOPMENT_SECRET_KEY: &str = "leadbox-insecure-development-key-change-me";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error(transparent)]
	Source(#[from] SourceError),
	#[error("setting `{0}` is not defined")]
	Missing(String),
	#[error("setting `{key}` is invalid: {message}")]
	Invalid { key: String, message: String },
	#[error("failed to deserialize settings: {0}")]
	Deserialize(String),
	#[error("invalid settings:\n  - {}", .0.join("\n  - "))]
	Validation(Vec<String>),
}

/// Resolved service configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	#[serde(deserialize_with = "lenient::boolean")]
	pub debug: bool,
	pub bind_address: String,
	pub database_url: String,
	#[serde(deserialize_with = "lenient::number")]
	pub pool_max_connections: u32,
	#[serde(deserialize_with = "lenient::number")]
	pub pool_acquire_timeout_secs: u64,
	#[serde(deserialize_with = "lenient::number")]
	pub request_timeout_secs: u64,
	#[serde(deserialize_with = "lenient::optional_string")]
	pub admin_password: Option<String>,
	pub secret_key: String,
	pub log_level: String,
	#[serde(skip)]
	pub profile: Profile,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			debug: true,
			bind_address: "127.0.0.1:8000".to_string(),
			database_url: "sqlite://leadbox.db?mode=rwc".to_string(),
			pool_max_connections: 5,
			pool_acquire_timeout_secs: 5,
			request_timeout_secs: 30,
			admin_password: None,
			secret_key: DEVELOPMENT_SECRET_KEY.to_string(),
			log_level: "info".to_string(),
			profile: Profile::Local,
		}
	}
}

impl fmt::Debug for Settings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Settings")
			.field("debug", &self.debug)
			.field("bind_address", &self.bind_address)
			.field("database_url", &self.database_url)
			.field("pool_max_connections", &self.pool_max_connections)
			.field("pool_acquire_timeout_secs", &self.pool_acquire_timeout_secs)
			.field("request_timeout_secs", &self.request_timeout_secs)
			.field("admin_password", &self.admin_password.as_ref().map(|_| "[REDACTED]"))
			.field("secret_key", &"[REDACTED]")
			.field("log_level", &self.log_level)
			.field("profile", &self.profile)
			.finish()
	}
}

impl Settings {
	/// Defaults appropriate for `profile`.
	pub fn defaults(profile: Profile) -> DefaultSource {
		let (debug, database_url, secret_key) = match profile {
			Profile::Local => (true, "sqlite://leadbox.db?mode=rwc", DEVELOPMENT_SECRET_KEY),
			Profile::Test => (false, "sqlite::memory:", DEVELOPMENT_SECRET_KEY),
			Profile::Production => (false, "sqlite://leadbox.db?mode=rwc", ""),
		};
		let base = Settings::default();

		DefaultSource::new()
			.with_value("debug", json!(debug))
			.with_value("bind_address", json!(base.bind_address))
			.with_value("database_url", json!(database_url))
			.with_value("pool_max_connections", json!(base.pool_max_connections))
			.with_value("pool_acquire_timeout_secs", json!(base.pool_acquire_timeout_secs))
			.with_value("request_timeout_secs", json!(base.request_timeout_secs))
			.with_value("admin_password", json!(null))
			.with_value("secret_key", json!(secret_key))
			.with_value("log_level", json!(base.log_level))
	}

	/// The standard source stack for `profile`, reading files from
	/// `settings_dir`.
	pub fn builder(profile: Profile, settings_dir: impl AsRef<Path>) -> SettingsBuilder {
		let dir = settings_dir.as_ref();
		SettingsBuilder::new()
			.profile(profile)
			.add_source(Self::defaults(profile))
			.add_source(LowPriorityEnvSource::new().with_prefix(ENV_PREFIX))
			.add_source(TomlFileSource::new(dir.join("base.toml")))
			.add_source(TomlFileSource::new(dir.join(format!("{}.toml", profile))))
			.add_source(EnvSource::new().with_keys(DEPLOYMENT_ENV_KEYS))
	}

	/// Load settings for `profile` from the standard sources.
	pub fn load(profile: Profile, settings_dir: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let merged = Self::builder(profile, settings_dir).build()?;
		let mut settings: Settings = merged.into_typed()?;
		settings.profile = profile;
		tracing::debug!(settings = ?settings, "Settings loaded");
		Ok(settings)
	}

	pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
		self.bind_address.parse().map_err(|e: std::net::AddrParseError| SettingsError::Invalid {
			key: "bind_address".to_string(),
			message: e.to_string(),
		})
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_secs)
	}

	pub fn pool_acquire_timeout(&self) -> Duration {
		Duration::from_secs(self.pool_acquire_timeout_secs)
	}

	/// Check the settings a deployment needs. Every problem is reported,
	/// not only the first.
	pub fn validate(&self) -> Result<(), SettingsError> {
		let mut problems = Vec::new();

		if self.admin_password.as_deref().is_none_or(|p| p.trim().is_empty()) {
			problems.push("ADMIN_PASSWORD is not set; every admin login will be rejected".to_string());
		}
		if self.secret_key.chars().count() < MIN_SECRET_KEY_LENGTH {
			problems.push(format!(
				"SECRET_KEY must be at least {} characters",
				MIN_SECRET_KEY_LENGTH
			));
		}
		if self.profile.is_production() {
			if self.secret_key == DEVELOPMENT_SECRET_KEY {
				problems.push("SECRET_KEY must not use the development default in production".to_string());
			}
			if self.debug {
				problems.push("debug must be disabled in production".to_string());
			}
		}
		if let Err(e) = self.bind_addr() {
			problems.push(e.to_string());
		}
		if self.pool_max_connections == 0 {
			problems.push("pool_max_connections must be at least 1".to_string());
		}
		if self.pool_acquire_timeout_secs == 0 {
			problems.push("pool_acquire_timeout_secs must be at least 1".to_string());
		}
		if self.request_timeout_secs == 0 {
			problems.push("request_timeout_secs must be at least 1".to_string());
		}

		if problems.is_empty() {
			Ok(())
		} else {
			Err(SettingsError::Validation(problems))
		}
	}
}

/// Deserializers that also accept the string form environment variables
/// arrive in.
mod lenient {
	use serde::de::{Deserialize, DeserializeOwned, Deserializer, Error};
	use serde_json::Value;
	use std::fmt::Display;
	use std::str::FromStr;

	pub fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
		match Value::deserialize(deserializer)? {
			Value::Bool(b) => Ok(b),
			Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
				"true" | "1" | "yes" | "on" => Ok(true),
				"false" | "0" | "no" | "off" | "" => Ok(false),
				other => Err(D::Error::custom(format!("invalid boolean: {}", other))),
			},
			other => Err(D::Error::custom(format!("invalid boolean: {}", other))),
		}
	}

	pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
	where
		D: Deserializer<'de>,
		T: FromStr + DeserializeOwned,
		T::Err: Display,
	{
		match Value::deserialize(deserializer)? {
			Value::String(s) => s.trim().parse().map_err(D::Error::custom),
			other => serde_json::from_value(other).map_err(D::Error::custom),
		}
	}

	pub fn optional_string<'de, D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<Option<String>, D::Error> {
		match Value::deserialize(deserializer)? {
			Value::Null => Ok(None),
			Value::String(s) if s.is_empty() => Ok(None),
			Value::String(s) => Ok(Some(s)),
			other => Err(D::Error::custom(format!("expected a string, got {}", other))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::*;
	use serial_test::serial;
	use std::fs;
	use tempfile::TempDir;

	fn valid() -> Settings {
		Settings {
			admin_password: Some("hunter22".to_string()),
			..Settings::default()
		}
	}

	#[rstest]
	#[serial(leadbox_env)]
	fn test_load_without_files_uses_profile_defaults() {
		let dir = TempDir::new().unwrap();

		let settings = Settings::load(Profile::Test, dir.path()).unwrap();

		assert_eq!(settings.database_url, "sqlite::memory:");
		assert_eq!(settings.request_timeout_secs, 30);
		assert_eq!(settings.profile, Profile::Test);
		assert!(!settings.debug);
	}

	#[rstest]
	#[serial(leadbox_env)]
	fn test_layering_of_files_and_environment() {
		// Arrange
		let dir = TempDir::new().unwrap();
		fs::write(
			dir.path().join("base.toml"),
			"log_level = \"debug\"\npool_max_connections = 3\nrequest_timeout_secs = 10\n",
		)
		.unwrap();
		fs::write(dir.path().join("production.toml"), "pool_max_connections = 12\n").unwrap();
		unsafe {
			std::env::set_var("LEADBOX_REQUEST_TIMEOUT_SECS", "99");
			std::env::set_var("LEADBOX_BIND_ADDRESS", "0.0.0.0:8080");
			std::env::set_var("ADMIN_PASSWORD", "from-platform");
		}

		// Act
		let settings = Settings::load(Profile::Production, dir.path());
		unsafe {
			std::env::remove_var("LEADBOX_REQUEST_TIMEOUT_SECS");
			std::env::remove_var("LEADBOX_BIND_ADDRESS");
			std::env::remove_var("ADMIN_PASSWORD");
		}
		let settings = settings.unwrap();

		// Assert
		assert_eq!(settings.log_level, "debug");
		assert_eq!(settings.pool_max_connections, 12);
		// Files beat LEADBOX_* variables.
		assert_eq!(settings.request_timeout_secs, 10);
		assert_eq!(settings.bind_address, "0.0.0.0:8080");
		assert_eq!(settings.admin_password.as_deref(), Some("from-platform"));
	}

	#[rstest]
	#[serial(leadbox_env)]
	fn test_unparseable_environment_value_is_reported() {
		let dir = TempDir::new().unwrap();
		unsafe {
			std::env::set_var("LEADBOX_POOL_MAX_CONNECTIONS", "many");
		}

		let result = Settings::load(Profile::Local, dir.path());
		unsafe {
			std::env::remove_var("LEADBOX_POOL_MAX_CONNECTIONS");
		}

		assert!(matches!(result, Err(SettingsError::Deserialize(_))));
	}

	#[rstest]
	fn test_valid_settings_pass() {
		assert!(valid().validate().is_ok());
	}

	#[rstest]
	fn test_validation_reports_every_problem() {
		let settings = Settings {
			admin_password: None,
			secret_key: "short".to_string(),
			bind_address: "nowhere".to_string(),
			request_timeout_secs: 0,
			..Settings::default()
		};

		let Err(SettingsError::Validation(problems)) = settings.validate() else {
			panic!("expected validation failure");
		};

		assert_eq!(problems.len(), 4);
		assert!(problems[0].contains("ADMIN_PASSWORD"));
		assert!(problems[1].contains("SECRET_KEY"));
	}

	#[rstest]
	fn test_production_rejects_development_key_and_debug() {
		let settings = Settings {
			profile: Profile::Production,
			..valid()
		};

		let Err(SettingsError::Validation(problems)) = settings.validate() else {
			panic!("expected validation failure");
		};

		assert_eq!(problems.len(), 2);
	}

	#[rstest]
	fn test_debug_output_redacts_secrets() {
		let rendered = format!("{:?}", valid());

		assert!(!rendered.contains("hunter22"));
		assert!(!rendered.contains(DEVELOPMENT_SECRET_KEY));
		assert!(rendered.contains("[REDACTED]"));
	}
}
