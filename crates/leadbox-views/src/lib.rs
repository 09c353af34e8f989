//! HTTP views for leadbox.
//!
//! [`routes`] wires the intake, admin and health views into a [`Router`]
//! that implements [`Handler`](leadbox_http::Handler) and can be served by
//! `leadbox-server`.

pub mod admin;
pub mod health;
pub mod intake;
pub mod router;
pub mod state;
pub mod urls;

#[cfg(test)]
mod testing;

pub use admin::{AdminLeadsResponse, AdminLeadsView, AdminLoginView};
pub use intake::{IntakeError, IntakeView};
pub use router::{FunctionHandler, PathPattern, Router};
pub use state::AppState;
pub use urls::routes;
