use crate::StoreError;
use async_trait::async_trait;
use leadbox_core::{NewLead, StoredLead};
use std::sync::Arc;

/// Append-only lead storage.
///
/// Implementations assign ids and creation timestamps. Records are never
/// updated or deleted, and every failure is returned to the caller.
#[async_trait]
pub trait LeadStore: Send + Sync {
	/// Persist a validated lead and return it with its id and timestamp.
	async fn insert(&self, lead: NewLead) -> Result<StoredLead, StoreError>;

	/// All stored leads in insertion order, optionally restricted to one
	/// service-interest tag (exact match).
	async fn list_all(&self, service: Option<&str>) -> Result<Vec<StoredLead>, StoreError>;

	/// Number of stored leads.
	async fn count(&self) -> Result<u64, StoreError>;
}

#[async_trait]
impl<T: LeadStore + ?Sized> LeadStore for Arc<T> {
	async fn insert(&self, lead: NewLead) -> Result<StoredLead, StoreError> {
		(**self).insert(lead).await
	}

	async fn list_all(&self, service: Option<&str>) -> Result<Vec<StoredLead>, StoreError> {
		(**self).list_all(service).await
	}

	async fn count(&self) -> Result<u64, StoreError> {
		(**self).count().await
	}
}
