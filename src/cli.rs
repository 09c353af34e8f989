//! `manage` command line interface

use crate::app::{admin_gate, build_server, open_store};
use crate::logging::init_tracing;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use leadbox_admin::CsvExporter;
use leadbox_conf::{Profile, Settings};
use leadbox_db::LeadStore;
use leadbox_server::{ShutdownCoordinator, shutdown_signal};
use leadbox_views::AppState;
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// How long open connections may finish after a shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Leadbox management interface
#[derive(Debug, Parser)]
#[command(name = "manage")]
#[command(about = "Leadbox management interface", long_about = None)]
#[command(version)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,

	/// Verbosity level (can be repeated for more output)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	pub verbosity: u8,

	/// Directory holding base.toml and the per-profile settings files
	#[arg(long, value_name = "DIR", default_value = "settings", global = true)]
	pub settings_dir: PathBuf,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
	/// Apply migrations and serve HTTP until interrupted
	Runserver {
		/// Server address (default: `bind_address` setting)
		#[arg(value_name = "ADDRESS")]
		address: Option<String>,
	},

	/// Apply database migrations
	Migrate {
		/// Database URL overriding the `database_url` setting
		#[arg(long, value_name = "DATABASE")]
		database: Option<String>,
	},

	/// Export stored leads as CSV
	Exportcsv {
		/// Only export leads with this service tag
		#[arg(long, value_name = "SERVICE")]
		service: Option<String>,

		/// Output file (default: stdout)
		#[arg(short, long, value_name = "PATH")]
		output: Option<PathBuf>,
	},

	/// Validate settings and database connectivity
	Check,
}

pub async fn execute_from_command_line() -> Result<()> {
	let cli = Cli::parse();
	let settings = Settings::load(Profile::from_env(), &cli.settings_dir)
		.with_context(|| format!("failed to load settings from {}", cli.settings_dir.display()))?;

	init_tracing(&settings.log_level, cli.verbosity);
	tracing::debug!(profile = %settings.profile, "Settings resolved");

	run_command(cli.command, settings).await
}

pub async fn run_command(command: Commands, settings: Settings) -> Result<()> {
	match command {
		Commands::Runserver { address } => execute_runserver(settings, address).await,
		Commands::Migrate { database } => execute_migrate(settings, database).await,
		Commands::Exportcsv { service, output } => execute_exportcsv(settings, service, output).await,
		Commands::Check => execute_check(settings).await,
	}
}

async fn execute_runserver(settings: Settings, address: Option<String>) -> Result<()> {
	if let Err(e) = settings.validate() {
		if settings.profile.is_production() {
			return Err(e).context("refusing to start with invalid production settings");
		}
		tracing::warn!("{}", e);
	}

	let addr: SocketAddr = match address {
		Some(address) => address
			.parse()
			.with_context(|| format!("invalid address {}", address))?,
		None => settings.bind_addr()?,
	};

	let store = open_store(&settings)
		.await
		.context("failed to open the lead store")?;
	let state = AppState::new(Arc::new(store.clone()), admin_gate(&settings));

	let coordinator = ShutdownCoordinator::new(DRAIN_TIMEOUT);
	let signal_coordinator = coordinator.clone();
	tokio::spawn(async move {
		shutdown_signal().await;
		signal_coordinator.shutdown();
	});

	build_server(state, &settings)
		.listen_with_shutdown(addr, coordinator)
		.await?;

	store.close().await;
	tracing::info!("Server stopped");
	Ok(())
}

async fn execute_migrate(mut settings: Settings, database: Option<String>) -> Result<()> {
	if let Some(database) = database {
		settings.database_url = database;
	}

	let store = open_store(&settings)
		.await
		.context("failed to apply migrations")?;
	let applied = leadbox_db::migrations::applied_migrations(store.pool()).await?;

	println!("Migrations:");
	for record in applied {
		println!("  [X] {} ({})", record.name, record.applied);
	}
	store.close().await;
	Ok(())
}

async fn execute_exportcsv(
	settings: Settings,
	service: Option<String>,
	output: Option<PathBuf>,
) -> Result<()> {
	let store = open_store(&settings)
		.await
		.context("failed to open the lead store")?;
	let leads = store.list_all(service.as_deref()).await?;
	let exporter = CsvExporter::new();

	match &output {
		Some(path) => {
			let file = std::fs::File::create(path)
				.with_context(|| format!("failed to create {}", path.display()))?;
			exporter.write(&leads, std::io::BufWriter::new(file))?;
			eprintln!("Exported {} lead(s) to {}", leads.len(), path.display());
		}
		None => {
			let stdout = std::io::stdout();
			let mut handle = stdout.lock();
			exporter.write(&leads, &mut handle)?;
			handle.flush()?;
		}
	}

	tracing::info!(count = leads.len(), service = ?service, "Exported leads");
	store.close().await;
	Ok(())
}

async fn execute_check(settings: Settings) -> Result<()> {
	let mut issues = Vec::new();
	if let Err(e) = settings.validate() {
		issues.push(e.to_string());
	}

	match open_store(&settings).await {
		Ok(store) => {
			let count = store.count().await?;
			println!("Database {} reachable, {} lead(s) stored", settings.database_url, count);
			store.close().await;
		}
		Err(e) => issues.push(format!("database {} is not usable: {}", settings.database_url, e)),
	}

	if !issues.is_empty() {
		for issue in &issues {
			eprintln!("{}", issue);
		}
		bail!("System check identified {} issue(s).", issues.len());
	}

	println!("System check identified no issues.");
	Ok(())
}
