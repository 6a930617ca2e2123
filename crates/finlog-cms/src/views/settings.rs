//! Site settings as a flat key/value object

use finlog_core::{Error, Result};
use finlog_http::{Request, Response};
use indexmap::IndexMap;
use serde_json::Value;

use crate::state::AppState;

/// `GET /api/admin/settings`
pub async fn list(state: AppState, _request: Request) -> Result<Response> {
	let settings: IndexMap<String, String> = state
		.site_settings
		.all()
		.await?
		.into_iter()
		.map(|s| (s.key, s.value))
		.collect();
	Response::ok().with_json(&settings)
}

/// `PUT /api/admin/settings` with `{key: value, ...}`.
///
/// Non-string values are stored in their JSON text form; `null` is rejected.
pub async fn update(state: AppState, request: Request) -> Result<Response> {
	let body: IndexMap<String, Value> = request.json()?;
	let mut values = Vec::with_capacity(body.len());
	for (key, value) in body {
		let key = key.trim().to_string();
		if key.is_empty() {
			return Err(Error::Validation("Setting keys must not be empty".to_string()));
		}
		let value = match value {
			Value::String(s) => s,
			Value::Null => {
				return Err(Error::Validation(format!("Setting {key} must not be null")));
			}
			other => other.to_string(),
		};
		values.push((key, value));
	}
	state.site_settings.set_many(&values).await?;
	list(state, request).await
}
