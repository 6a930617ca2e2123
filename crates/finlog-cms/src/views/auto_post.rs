//! Ingestion endpoint for the external post generator

use chrono::Utc;
use finlog_core::{Error, Result};
use finlog_db::AUTO_POST_ENABLED;
use finlog_http::{Request, Response};
use serde_json::json;
use subtle::ConstantTimeEq;

use crate::revalidate::{HOME_PATH, notify};
use crate::serializers::AutoPostRequest;
use crate::state::AppState;

fn authorize(state: &AppState, request: &Request) -> Result<()> {
	let expected = state
		.settings
		.auto_post_secret
		.as_deref()
		.filter(|s| !s.is_empty());
	match (expected, request.bearer_token()) {
		(Some(expected), Some(given)) if bool::from(expected.as_bytes().ct_eq(given.as_bytes())) => {
			Ok(())
		}
		_ => Err(Error::Authentication("Unauthorized".to_string())),
	}
}

/// `POST /api/auto-post`
///
/// Creates a `pending_review` post marked auto-generated.
pub async fn ingest(state: AppState, request: Request) -> Result<Response> {
	authorize(&state, &request)?;
	if !state.site_settings.is_enabled(AUTO_POST_ENABLED, true).await? {
		return Err(Error::Forbidden("Auto posting is disabled".to_string()));
	}

	let body: AutoPostRequest = request.json()?;
	let new = body.into_new_post(Utc::now().date_naive())?;
	let post = state.posts.create(&new).await?;
	tracing::info!(id = post.id, slug = %post.slug, "auto-generated post queued for review");

	notify(state.invalidator.as_ref(), HOME_PATH).await;
	Response::created().with_json(&json!({
		"success": true,
		"message": "Post created and awaiting review",
		"post": {
			"id": post.id,
			"title": post.title,
			"slug": post.slug,
			"status": post.status,
		},
	}))
}
