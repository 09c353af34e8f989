//! Schema migrations
//!
//! Migrations are applied in declaration order. Each one runs in its own
//! transaction together with the row that records it, so a migration is
//! either fully applied and recorded or not applied at all.

use crate::StoreError;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

/// A named schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
	pub name: &'static str,
	pub sql: &'static str,
}

/// Migration record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
	pub name: String,
	pub applied: DateTime<Utc>,
}

pub const MIGRATIONS: &[Migration] = &[
	Migration {
		name: "0001_create_leads",
		sql: "CREATE TABLE IF NOT EXISTS leads (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			name TEXT NOT NULL CHECK (length(trim(name)) > 0),
			email TEXT NOT NULL CHECK (length(trim(email)) > 0),
			company TEXT,
			phone TEXT,
			message TEXT,
			service TEXT NOT NULL,
			wants_updates INTEGER NOT NULL DEFAULT 0,
			resource TEXT,
			course_type TEXT,
			session_id TEXT,
			preferred_time TEXT,
			created_at TEXT NOT NULL
		)",
	},
	Migration {
		name: "0002_leads_service_index",
		sql: "CREATE INDEX IF NOT EXISTS leads_service_idx ON leads (service, id)",
	},
];

const RECORDER_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS leadbox_migrations (
	name TEXT PRIMARY KEY,
	applied TEXT NOT NULL
)";

/// Create the recorder table if needed.
pub async fn ensure_schema_table(pool: &SqlitePool) -> Result<(), StoreError> {
	sqlx::query(RECORDER_TABLE_SQL).execute(pool).await?;
	Ok(())
}

/// Migrations already applied to this database, oldest first.
pub async fn applied_migrations(pool: &SqlitePool) -> Result<Vec<MigrationRecord>, StoreError> {
	ensure_schema_table(pool).await?;

	let rows = sqlx::query("SELECT name, applied FROM leadbox_migrations ORDER BY name")
		.fetch_all(pool)
		.await?;

	rows.iter()
		.map(|row| -> Result<MigrationRecord, StoreError> {
			let name: String = row.try_get("name")?;
			let applied: String = row.try_get("applied")?;
			let applied = DateTime::parse_from_rfc3339(&applied)
				.map_err(|e| StoreError::Decode(format!("migration {name}: {e}")))?
				.with_timezone(&Utc);
			Ok(MigrationRecord { name, applied })
		})
		.collect()
}

/// Apply every pending migration and return the names that were applied.
pub async fn migrate(pool: &SqlitePool) -> Result<Vec<&'static str>, StoreError> {
	let applied = applied_migrations(pool).await?;
	let mut newly_applied = Vec::new();

	for migration in MIGRATIONS {
		if applied.iter().any(|r| r.name == migration.name) {
			continue;
		}

		apply(pool, migration)
			.await
			.map_err(|e| StoreError::Migration {
				name: migration.name.to_string(),
				reason: e.to_string(),
			})?;

		tracing::info!(migration = migration.name, "Applied migration");
		newly_applied.push(migration.name);
	}

	Ok(newly_applied)
}

async fn apply(pool: &SqlitePool, migration: &Migration) -> Result<(), sqlx::Error> {
	let mut tx = pool.begin().await?;

	sqlx::query(migration.sql).execute(&mut *tx).await?;
	sqlx::query("INSERT INTO leadbox_migrations (name, applied) VALUES (?, ?)")
		.bind(migration.name)
		.bind(Utc::now().to_rfc3339())
		.execute(&mut *tx)
		.await?;

	tx.commit().await
}
