use leadbox_admin::AdminGate;
use leadbox_db::LeadStore;
use std::sync::Arc;

/// Shared, immutable application state handed to every view.
#[derive(Clone)]
pub struct AppState {
	pub store: Arc<dyn LeadStore>,
	pub gate: AdminGate,
}

impl AppState {
	pub fn new(store: Arc<dyn LeadStore>, gate: AdminGate) -> Self {
		Self { store, gate }
	}
}
