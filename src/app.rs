//! Application assembly
//!
//! Turns resolved [`Settings`] into a connected store, an admin gate and a
//! ready-to-serve [`HttpServer`].

use leadbox_admin::AdminGate;
use leadbox_conf::Settings;
use leadbox_db::{PoolConfig, SqliteLeadStore, StoreError};
use leadbox_http::Handler;
use leadbox_server::{AccessLogMiddleware, HttpServer, TimeoutHandler};
use leadbox_views::{AppState, routes};
use std::sync::Arc;

/// Pool configuration derived from settings.
pub fn pool_config(settings: &Settings) -> PoolConfig {
	PoolConfig::new(settings.database_url.clone())
		.with_pool_size(settings.pool_max_connections)
		.with_timeout(settings.pool_acquire_timeout_secs)
}

/// Connect to the configured database and bring its schema up to date.
pub async fn open_store(settings: &Settings) -> Result<SqliteLeadStore, StoreError> {
	let store = SqliteLeadStore::connect(&pool_config(settings)).await?;
	let applied = store.migrate().await?;
	for name in &applied {
		tracing::info!(migration = %name, "Applied migration");
	}
	Ok(store)
}

pub fn admin_gate(settings: &Settings) -> AdminGate {
	AdminGate::new(&settings.secret_key, settings.admin_password.clone())
}

/// Routes wrapped in the per-request timeout.
pub fn build_handler(state: AppState, settings: &Settings) -> Arc<dyn Handler> {
	let router: Arc<dyn Handler> = Arc::new(routes(state));
	Arc::new(TimeoutHandler::new(router, settings.request_timeout()))
}

/// A server for `state` with access logging outside the timeout, so timed
/// out requests are logged too.
pub fn build_server(state: AppState, settings: &Settings) -> HttpServer {
	HttpServer::new(build_handler(state, settings))
		.with_middleware(Arc::new(AccessLogMiddleware::new()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use leadbox_conf::Profile;
	use leadbox_db::LeadStore;
	use rstest::*;

	#[fixture]
	fn settings() -> Settings {
		Settings {
			database_url: "sqlite::memory:".to_string(),
			admin_password: Some("hunter22".to_string()),
			pool_max_connections: 3,
			pool_acquire_timeout_secs: 2,
			profile: Profile::Test,
			..Settings::default()
		}
	}

	#[rstest]
	fn test_pool_config_follows_settings(settings: Settings) {
		let config = pool_config(&settings);

		assert!(config.is_memory());
		assert_eq!(config.pool_max_size, 3);
		assert_eq!(config.pool_timeout, 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_open_store_runs_migrations(settings: Settings) {
		let store = open_store(&settings).await.unwrap();

		assert_eq!(store.count().await.unwrap(), 0);
		assert!(store.migrate().await.unwrap().is_empty());
	}

	#[rstest]
	fn test_admin_gate_uses_configured_password(settings: Settings) {
		let gate = admin_gate(&settings);

		assert!(gate.login("hunter22").is_ok());
		assert!(gate.login("other").is_err());
	}
}
