//! HTTP server for leadbox.
//!
//! Adapts [`leadbox_http::Handler`] to hyper's HTTP/1.1 connection handling.
//!
//! ## Basic Usage
//!
//! ```rust,ignore
//! use leadbox_server::{HttpServer, ShutdownCoordinator, shutdown_signal};
//! use std::time::Duration;
//!
//! let coordinator = ShutdownCoordinator::new(Duration::from_secs(10));
//! let trigger = coordinator.clone();
//! tokio::spawn(async move {
//!     shutdown_signal().await;
//!     trigger.shutdown();
//! });
//!
//! HttpServer::new(handler).listen_with_shutdown(addr, coordinator).await?;
//! ```

pub mod access_log;
pub mod http;
pub mod shutdown;
pub mod timeout;

pub use access_log::AccessLogMiddleware;
pub use http::{HttpServer, ServerError, serve_with_shutdown};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
pub use timeout::TimeoutHandler;
