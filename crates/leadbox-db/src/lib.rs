//! # Lead storage
//!
//! Durable, append-only storage for submitted leads.
//!
//! - [`LeadStore`]: the storage contract used by the HTTP layer
//! - [`SqliteLeadStore`]: the SQLite implementation on top of a sqlx pool
//! - [`migrations`]: the ordered, recorded schema migrations
//!
//! ## Examples
//!
//! ```rust,no_run
//! use leadbox_core::NewLead;
//! use leadbox_db::{LeadStore, PoolConfig, SqliteLeadStore};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = SqliteLeadStore::connect(&PoolConfig::new("sqlite://leads.db")).await.unwrap();
//! store.migrate().await.unwrap();
//!
//! let stored = store
//!     .insert(NewLead::new("Jo", "jo@example.com", "Waitlist"))
//!     .await
//!     .unwrap();
//! assert!(stored.id > 0);
//! # });
//! ```

pub mod config;
pub mod error;
pub mod migrations;
pub mod sqlite;
pub mod store;

pub use config::PoolConfig;
pub use error::StoreError;
pub use migrations::{MIGRATIONS, Migration, MigrationRecord};
pub use sqlite::SqliteLeadStore;
pub use store::LeadStore;
