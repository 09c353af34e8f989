//! # Settings
//!
//! Layered configuration for leadbox.
//!
//! Values are collected from several [`ConfigSource`]s, merged by priority
//! (higher wins, equal priorities resolve in insertion order) and deserialized
//! into the typed [`Settings`] struct.
//!
//! | Source | Priority |
//! |---|---|
//! | [`DefaultSource`] | 0 |
//! | [`LowPriorityEnvSource`] (`LEADBOX_*`) | 40 |
//! | [`TomlFileSource`] (`settings/base.toml`, `settings/{profile}.toml`) | 50 |
//! | [`EnvSource`] (`DATABASE_URL`, `ADMIN_PASSWORD`, `SECRET_KEY`) | 100 |
//!
//! ```no_run
//! use leadbox_conf::{Profile, Settings};
//!
//! let settings = Settings::load(Profile::from_env(), "settings").unwrap();
//! println!("binding {}", settings.bind_address);
//! ```

pub mod builder;
pub mod profile;
pub mod settings;
pub mod sources;

pub use builder::{MergedSettings, SettingsBuilder};
pub use profile::Profile;
pub use settings::{Settings, SettingsError};
pub use sources::{
	ConfigSource, DefaultSource, EnvSource, LowPriorityEnvSource, SourceError, TomlFileSource,
};
