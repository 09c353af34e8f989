//! SQLite lead store

use crate::{LeadStore, PoolConfig, StoreError, migrations};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leadbox_core::{NewLead, PreferredTime, StoredLead};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

const SELECT_ALL_LEADS: &str = "SELECT id, name, email, company, phone, message, service, \
	wants_updates, resource, course_type, session_id, preferred_time, created_at \
	FROM leads ORDER BY id";

const SELECT_LEADS_BY_SERVICE: &str = "SELECT id, name, email, company, phone, message, service, \
	wants_updates, resource, course_type, session_id, preferred_time, created_at \
	FROM leads WHERE service = ? ORDER BY id";

// The timestamp never moves backwards relative to earlier rows, even if the
// wall clock does. SQLite serializes writers, so the subquery sees every
// previously committed row.
const INSERT_LEAD: &str = "INSERT INTO leads (name, email, company, phone, message, service, \
	wants_updates, resource, course_type, session_id, preferred_time, created_at) \
	VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, \
	max(strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), coalesce((SELECT max(created_at) FROM leads), ''))) \
	RETURNING id, created_at";

/// Lead store backed by a sqlx SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteLeadStore {
	pool: SqlitePool,
}

impl SqliteLeadStore {
	/// Open a pool for `config.url`, creating the database file if missing.
	pub async fn connect(config: &PoolConfig) -> Result<Self, StoreError> {
		let timeout = Duration::from_secs(config.pool_timeout);
		let mut options = SqliteConnectOptions::from_str(&config.url)
			.map_err(|e| StoreError::Configuration(e.to_string()))?
			.create_if_missing(true)
			.busy_timeout(timeout);

		let mut pool_options = SqlitePoolOptions::new().acquire_timeout(timeout);
		if config.is_memory() {
			// Every connection to `sqlite::memory:` is a separate database.
			pool_options = pool_options
				.min_connections(1)
				.max_connections(1)
				.idle_timeout(None)
				.max_lifetime(None);
		} else {
			options = options.journal_mode(SqliteJournalMode::Wal);
			pool_options = pool_options
				.max_connections(config.pool_max_size)
				.idle_timeout(config.pool_idle_timeout.map(Duration::from_secs));
		}

		let pool = pool_options.connect_with(options).await?;
		tracing::debug!(url = %config.url, "Opened lead database");

		Ok(Self { pool })
	}

	/// Wrap an existing pool.
	pub fn from_pool(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Apply pending schema migrations.
	pub async fn migrate(&self) -> Result<Vec<&'static str>, StoreError> {
		migrations::migrate(&self.pool).await
	}

	/// Close the pool. Later operations fail with [`StoreError::Unavailable`].
	pub async fn close(&self) {
		self.pool.close().await;
	}
}

#[async_trait]
impl LeadStore for SqliteLeadStore {
	#[tracing::instrument(
		name = "Saving new lead",
		skip(self, lead),
		fields(service = %lead.service)
	)]
	async fn insert(&self, lead: NewLead) -> Result<StoredLead, StoreError> {
		let row = sqlx::query(INSERT_LEAD)
			.bind(&lead.name)
			.bind(&lead.email)
			.bind(&lead.company)
			.bind(&lead.phone)
			.bind(&lead.message)
			.bind(&lead.service)
			.bind(lead.wants_updates)
			.bind(&lead.resource)
			.bind(&lead.course_type)
			.bind(&lead.session_id)
			.bind(lead.preferred_time.map(|t| t.as_str()))
			.fetch_one(&self.pool)
			.await?;

		let id: i64 = row.try_get("id")?;
		let created_at = parse_timestamp(&row.try_get::<String, _>("created_at")?)?;

		Ok(StoredLead::from_new(id, created_at, lead))
	}

	#[tracing::instrument(name = "Listing leads", skip(self))]
	async fn list_all(&self, service: Option<&str>) -> Result<Vec<StoredLead>, StoreError> {
		let rows = match service {
			Some(service) => {
				sqlx::query(SELECT_LEADS_BY_SERVICE)
					.bind(service)
					.fetch_all(&self.pool)
					.await?
			}
			None => {
				sqlx::query(SELECT_ALL_LEADS)
					.fetch_all(&self.pool)
					.await?
			}
		};

		rows.iter().map(lead_from_row).collect()
	}

	async fn count(&self) -> Result<u64, StoreError> {
		let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leads")
			.fetch_one(&self.pool)
			.await?;
		Ok(count.max(0) as u64)
	}
}

fn lead_from_row(row: &SqliteRow) -> Result<StoredLead, StoreError> {
	let preferred_time = row
		.try_get::<Option<String>, _>("preferred_time")?
		.map(|t| PreferredTime::from_str(&t))
		.transpose()
		.map_err(|e| StoreError::Decode(e.to_string()))?;

	Ok(StoredLead {
		id: row.try_get("id")?,
		name: row.try_get("name")?,
		email: row.try_get("email")?,
		company: row.try_get("company")?,
		phone: row.try_get("phone")?,
		message: row.try_get("message")?,
		service: row.try_get("service")?,
		wants_updates: row.try_get("wants_updates")?,
		resource: row.try_get("resource")?,
		course_type: row.try_get("course_type")?,
		session_id: row.try_get("session_id")?,
		preferred_time,
		created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
	})
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| StoreError::Decode(format!("created_at {value:?}: {e}")))
}
