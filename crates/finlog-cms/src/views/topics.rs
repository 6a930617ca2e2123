//! Admin topic backlog and post generation

use finlog_core::Result;
use finlog_core::models::TopicStatus;
use finlog_http::{Request, Response};
use serde_json::json;

use crate::generate::GenerateMode;
use crate::serializers::{CreateTopicRequest, GenerateRequest, UpdateTopicRequest};
use crate::state::AppState;

/// `GET /api/admin/topics?status=`
pub async fn list(state: AppState, request: Request) -> Result<Response> {
	let status = request.query_as::<TopicStatus>("status")?;
	let topics = state.topics.list(status).await?;
	Response::ok().with_json(&json!({ "topics": topics }))
}

/// `POST /api/admin/topics`
pub async fn create(state: AppState, request: Request) -> Result<Response> {
	let body: CreateTopicRequest = request.json()?;
	let topic = state.topics.create(&body.into_new_topic()?).await?;
	tracing::info!(id = topic.id, priority = %topic.priority, "topic created");
	Response::created().with_json(&json!({ "topic": topic }))
}

/// `GET /api/admin/topics/{id}`
pub async fn detail(state: AppState, request: Request) -> Result<Response> {
	let id: i64 = request.path_param_as("id")?;
	let topic = state.topics.get(id).await?;
	Response::ok().with_json(&json!({ "topic": topic }))
}

/// `PUT /api/admin/topics/{id}`; `{"status": "skipped"}` skips, `"backlog"` restores
pub async fn update(state: AppState, request: Request) -> Result<Response> {
	let id: i64 = request.path_param_as("id")?;
	let body: UpdateTopicRequest = request.json()?;
	let topic = state.topics.update(id, &body.into_update()?).await?;
	Response::ok().with_json(&json!({ "topic": topic }))
}

/// `DELETE /api/admin/topics/{id}`
pub async fn delete(state: AppState, request: Request) -> Result<Response> {
	let id: i64 = request.path_param_as("id")?;
	state.topics.delete(id).await?;
	tracing::info!(id, "topic deleted");
	Response::ok().with_json(&json!({ "success": true }))
}

/// `POST /api/admin/topics/{id}/generate` with `{"mode": "draft" | "auto"}`
///
/// An empty body means draft mode.
pub async fn generate(state: AppState, request: Request) -> Result<Response> {
	let id: i64 = request.path_param_as("id")?;
	let body: GenerateRequest = if request.body.is_empty() {
		GenerateRequest::default()
	} else {
		request.json()?
	};
	let mode = match body.mode.as_deref() {
		Some(raw) => raw.parse()?,
		None => GenerateMode::Draft,
	};
	let generated = state.generator.generate(id, mode).await?;
	Response::created().with_json(&generated)
}
