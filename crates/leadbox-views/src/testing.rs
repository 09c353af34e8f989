//! Shared fixtures for view tests.

use async_trait::async_trait;
use leadbox_admin::AdminGate;
use leadbox_core::{NewLead, StoredLead};
use leadbox_db::{LeadStore, PoolConfig, SqliteLeadStore, StoreError};
use std::sync::Arc;

pub(crate) async fn memory_store() -> Arc<dyn LeadStore> {
	let store = SqliteLeadStore::connect(&PoolConfig::new("sqlite::memory:"))
		.await
		.unwrap();
	store.migrate().await.unwrap();
	Arc::new(store)
}

pub(crate) fn test_gate() -> AdminGate {
	AdminGate::new("views-test-secret-key-0123456789abcdef", Some("hunter22".to_string()))
}

/// A store whose database is always locked.
pub(crate) struct FailingStore;

#[async_trait]
impl LeadStore for FailingStore {
	async fn insert(&self, _lead: NewLead) -> Result<StoredLead, StoreError> {
		Err(StoreError::Unavailable("database is locked".into()))
	}

	async fn list_all(&self, _service: Option<&str>) -> Result<Vec<StoredLead>, StoreError> {
		Err(StoreError::Unavailable("database is locked".into()))
	}

	async fn count(&self) -> Result<u64, StoreError> {
		Err(StoreError::Unavailable("database is locked".into()))
	}
}
