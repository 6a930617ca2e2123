use finlog_core::Result;
use finlog_http::{Request, Response};
use serde_json::json;

use crate::state::AppState;

/// `GET /healthz`
pub async fn health(_state: AppState, _request: Request) -> Result<Response> {
	Response::ok().with_json(&json!({ "status": "ok" }))
}
