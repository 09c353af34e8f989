//! URL configuration

use crate::admin::{AdminLeadsView, AdminLoginView};
use crate::health::health;
use crate::intake::IntakeView;
use crate::router::Router;
use crate::state::AppState;
use hyper::Method;
use std::sync::Arc;

/// All leadbox routes.
///
/// | Method | Path | Name |
/// |---|---|---|
/// | POST | `/api/leads/{variant}` | `intake` |
/// | POST | `/api/admin/login` | `admin-login` |
/// | GET | `/api/admin/leads` | `admin-leads` |
/// | GET | `/health` | `health` |
pub fn routes(state: AppState) -> Router {
	Router::new()
		.handler_named(
			"/api/leads/{variant}",
			Method::POST,
			"intake",
			Arc::new(IntakeView::new(state.store.clone())),
		)
		.handler_named(
			"/api/admin/login",
			Method::POST,
			"admin-login",
			Arc::new(AdminLoginView::new(state.gate.clone())),
		)
		.handler_named(
			"/api/admin/leads",
			Method::GET,
			"admin-leads",
			Arc::new(AdminLeadsView::new(state.store, state.gate)),
		)
		.function("/health", Method::GET, health)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{memory_store, test_gate};
	use leadbox_http::{Handler, Request};
	use rstest::*;
	use serde_json::json;

	#[rstest]
	#[tokio::test]
	async fn test_submission_then_admin_query() {
		// Arrange
		let store = memory_store().await;
		let router = routes(AppState::new(store.clone(), test_gate()));

		// Act
		let created = router
			.handle(
				Request::builder()
					.method(Method::POST)
					.uri("/api/leads/toolkit")
					.json(&json!({"name": "Jo", "email": "jo@example.com"}))
					.build()
					.unwrap(),
			)
			.await
			.unwrap();
		let login = router
			.handle(
				Request::builder()
					.method(Method::POST)
					.uri("/api/admin/login")
					.json(&json!({"password": "hunter22"}))
					.build()
					.unwrap(),
			)
			.await
			.unwrap();
		let token = login.json_body().unwrap()["token"].as_str().unwrap().to_string();
		let listed = router
			.handle(
				Request::builder()
					.uri("/api/admin/leads?service=Toolkit+Download")
					.header("Authorization", &format!("Bearer {}", token))
					.build()
					.unwrap(),
			)
			.await
			.unwrap();

		// Assert
		let id = created.json_body().unwrap()["id"].clone();
		let body = listed.json_body().unwrap();
		assert_eq!(body["count"], json!(1));
		assert_eq!(body["results"][0]["id"], id);
	}

	#[rstest]
	#[tokio::test]
	async fn test_route_names() {
		let router = routes(AppState::new(memory_store().await, test_gate()));

		assert_eq!(router.reverse("intake"), Some("/api/leads/{variant}"));
		assert_eq!(router.reverse("admin-leads"), Some("/api/admin/leads"));
		assert_eq!(router.route_count(), 4);
	}

	#[rstest]
	#[tokio::test]
	async fn test_get_on_intake_is_405() {
		let router = routes(AppState::new(memory_store().await, test_gate()));

		let error = router
			.handle(Request::builder().uri("/api/leads/contact").build().unwrap())
			.await
			.unwrap_err();

		assert_eq!(error.status_code(), 405);
	}
}
