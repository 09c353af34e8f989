//! Deployment profiles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable selecting the active profile.
pub const PROFILE_ENV_VAR: &str = "LEADBOX_ENV";

/// Deployment profile. Selects `settings/{profile}.toml` and the defaults
/// that are safe for that environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
	#[default]
	Local,
	Test,
	Production,
}

impl Profile {
	/// Profile named by `LEADBOX_ENV`, falling back to [`Profile::Local`]
	/// when unset or unrecognised.
	pub fn from_env() -> Self {
		match std::env::var(PROFILE_ENV_VAR) {
			Ok(value) => value.parse().unwrap_or_else(|_| {
				tracing::warn!(value = %value, "Unknown {}, using local profile", PROFILE_ENV_VAR);
				Profile::Local
			}),
			Err(_) => Profile::Local,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Profile::Local => "local",
			Profile::Test => "test",
			Profile::Production => "production",
		}
	}

	pub fn is_production(&self) -> bool {
		matches!(self, Profile::Production)
	}
}

impl fmt::Display for Profile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Profile {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"local" | "dev" | "development" => Ok(Profile::Local),
			"test" | "testing" => Ok(Profile::Test),
			"production" | "prod" => Ok(Profile::Production),
			other => Err(format!("unknown profile: {}", other)),
		}
	}
}
