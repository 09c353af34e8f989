//! The assembled server over a real socket.

use async_trait::async_trait;
use leadbox::conf::Settings;
use leadbox::core::{NewLead, StoredLead};
use leadbox::db::{LeadStore, StoreError};
use leadbox::server::{ServerError, ShutdownCoordinator};
use leadbox::views::AppState;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

struct RunningServer {
	addr: SocketAddr,
	coordinator: ShutdownCoordinator,
	handle: JoinHandle<Result<(), ServerError>>,
}

impl RunningServer {
	async fn start(store: Arc<dyn LeadStore>, settings: Settings) -> Self {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
		let state = AppState::new(store, leadbox::app::admin_gate(&settings));
		let server = leadbox::app::build_server(state, &settings);
		let handle = tokio::spawn(server.serve(listener, coordinator.clone()));
		Self {
			addr,
			coordinator,
			handle,
		}
	}

	fn url(&self, path: &str) -> String {
		format!("http://{}{}", self.addr, path)
	}

	async fn stop(self) {
		self.coordinator.shutdown();
		self.handle.await.unwrap().unwrap();
	}
}

fn settings() -> Settings {
	Settings {
		database_url: "sqlite::memory:".to_string(),
		admin_password: Some("hunter22".to_string()),
		request_timeout_secs: 1,
		..Settings::default()
	}
}

#[tokio::test]
async fn test_submit_and_query_over_http() {
	// Arrange
	let settings = settings();
	let store: Arc<dyn LeadStore> = Arc::new(leadbox::app::open_store(&settings).await.unwrap());
	let server = RunningServer::start(store, settings).await;
	let client = reqwest::Client::new();

	// Act
	let created = client
		.post(server.url("/api/leads/waitlist"))
		.json(&json!({"name": "Jo", "email": "jo@example.com", "preferredTime": "Morning"}))
		.send()
		.await
		.unwrap();
	let created_status = created.status();
	let created: Value = created.json().await.unwrap();
	let rejected = client
		.post(server.url("/api/leads/waitlist"))
		.json(&json!({"name": "J", "email": "not-an-email"}))
		.send()
		.await
		.unwrap();
	let rejected_status = rejected.status();
	let rejected: Value = rejected.json().await.unwrap();
	let login: Value = client
		.post(server.url("/api/admin/login"))
		.json(&json!({"password": "hunter22"}))
		.send()
		.await
		.unwrap()
		.json()
		.await
		.unwrap();
	let listed: Value = client
		.get(server.url("/api/admin/leads"))
		.bearer_auth(login["token"].as_str().unwrap())
		.send()
		.await
		.unwrap()
		.json()
		.await
		.unwrap();

	// Assert
	assert_eq!(created_status, StatusCode::CREATED);
	assert_eq!(created["success"], json!(true));
	assert_eq!(rejected_status, StatusCode::BAD_REQUEST);
	assert!(rejected["fieldErrors"]["name"].is_array());
	assert!(rejected["fieldErrors"]["email"].is_array());
	assert_eq!(listed["count"], json!(1));
	assert_eq!(listed["results"][0]["id"], created["id"]);

	server.stop().await;
}

#[tokio::test]
async fn test_health_and_unknown_route() {
	let settings = settings();
	let store: Arc<dyn LeadStore> = Arc::new(leadbox::app::open_store(&settings).await.unwrap());
	let server = RunningServer::start(store, settings).await;

	let health = reqwest::get(server.url("/health")).await.unwrap();
	let missing = reqwest::get(server.url("/nope")).await.unwrap();

	assert_eq!(health.status(), StatusCode::OK);
	assert_eq!(health.json::<Value>().await.unwrap(), json!({"status": "ok"}));
	assert_eq!(missing.status(), StatusCode::NOT_FOUND);
	assert!(missing.json::<Value>().await.unwrap()["error"].is_string());

	server.stop().await;
}

/// A store that never answers in time.
struct StalledStore;

#[async_trait]
impl LeadStore for StalledStore {
	async fn insert(&self, _lead: NewLead) -> Result<StoredLead, StoreError> {
		tokio::time::sleep(Duration::from_secs(30)).await;
		Err(StoreError::Unavailable("stalled".into()))
	}

	async fn list_all(&self, _service: Option<&str>) -> Result<Vec<StoredLead>, StoreError> {
		Ok(Vec::new())
	}

	async fn count(&self) -> Result<u64, StoreError> {
		Ok(0)
	}
}

#[tokio::test]
async fn test_slow_request_times_out_with_504() {
	let server = RunningServer::start(Arc::new(StalledStore), settings()).await;

	let response = reqwest::Client::new()
		.post(server.url("/api/leads/guide"))
		.json(&json!({"name": "Jo", "email": "jo@example.com"}))
		.send()
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
	assert_eq!(
		response.json::<Value>().await.unwrap(),
		json!({"error": "Request timed out after 1 seconds"})
	);

	server.stop().await;
}
