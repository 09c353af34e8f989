//! # Leadbox
//!
//! Lead intake service for a marketing site: validated form capture,
//! durable append-only storage and an authenticated admin read path.
//!
//! The workspace is split the way requests flow:
//!
//! - [`core`]: lead data model, validators and the error taxonomy
//! - [`forms`]: per-variant form schemas producing a [`NewLead`](core::NewLead)
//! - [`db`]: the [`LeadStore`](db::LeadStore) contract and its SQLite backend
//! - [`http`]: request/response types and the handler/middleware traits
//! - [`views`]: intake, admin and health endpoints plus routing
//! - [`admin`]: token gate, summaries and CSV export
//! - [`server`]: the hyper-based HTTP server
//! - [`conf`]: layered settings
//!
//! ```rust,no_run
//! use leadbox::conf::{Profile, Settings};
//! use leadbox::server::ShutdownCoordinator;
//! use leadbox::views::AppState;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let settings = Settings::load(Profile::from_env(), "settings")?;
//! let store = leadbox::app::open_store(&settings).await?;
//! let state = AppState::new(Arc::new(store), leadbox::app::admin_gate(&settings));
//!
//! leadbox::app::build_server(state, &settings)
//!     .listen_with_shutdown(settings.bind_addr()?, ShutdownCoordinator::new(Duration::from_secs(10)))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod logging;

pub use leadbox_admin as admin;
pub use leadbox_conf as conf;
pub use leadbox_core as core;
pub use leadbox_db as db;
pub use leadbox_forms as forms;
pub use leadbox_http as http;
pub use leadbox_server as server;
pub use leadbox_views as views;

pub use leadbox_core::{Error, LeadVariant, NewLead, PreferredTime, Result, StoredLead};
