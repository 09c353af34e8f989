use leadbox_core::Result;
use leadbox_http::{Request, Response};
use serde_json::json;

/// `GET /health`
pub async fn health(_request: Request) -> Result<Response> {
	Response::ok().with_json(&json!({"status": "ok"}))
}
