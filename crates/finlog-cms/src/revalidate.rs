//! Best-effort invalidation of the public site's cached pages

use async_trait::async_trait;
use finlog_core::{Error, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Path of the home page, invalidated after every content change
pub const HOME_PATH: &str = "/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Something that can drop cached renderings of a site path
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
	async fn invalidate(&self, path: &str) -> Result<()>;
}

/// Does nothing; used when no revalidation endpoint is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInvalidator;

#[async_trait]
impl CacheInvalidator for NoopInvalidator {
	async fn invalidate(&self, path: &str) -> Result<()> {
		tracing::debug!(path, "no revalidation endpoint configured");
		Ok(())
	}
}

#[derive(Serialize)]
struct RevalidateRequest<'a> {
	path: &'a str,
}

/// POSTs `{"path": ...}` to a revalidation endpoint
#[derive(Debug, Clone)]
pub struct HttpInvalidator {
	endpoint: String,
	secret: Option<String>,
	client: Client,
}

impl HttpInvalidator {
	pub fn new(endpoint: impl Into<String>, secret: Option<String>) -> Result<Self> {
		let client = Client::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;
		Ok(Self::with_client(endpoint, secret, client))
	}

	pub fn with_client(endpoint: impl Into<String>, secret: Option<String>, client: Client) -> Self {
		Self {
			endpoint: endpoint.into(),
			secret,
			client,
		}
	}
}

#[async_trait]
impl CacheInvalidator for HttpInvalidator {
	async fn invalidate(&self, path: &str) -> Result<()> {
		let mut request = self
			.client
			.post(&self.endpoint)
			.json(&RevalidateRequest { path });
		if let Some(secret) = &self.secret {
			request = request.bearer_auth(secret);
		}

		let response = request
			.send()
			.await
			.map_err(|e| Error::Internal(format!("revalidation request failed: {e}")))?;

		let status = response.status();
		if !status.is_success() {
			return Err(Error::Internal(format!(
				"revalidation endpoint answered {status}"
			)));
		}
		tracing::debug!(path, "cache invalidated");
		Ok(())
	}
}

/// Invalidate `path`, logging and swallowing any failure.
pub async fn notify(invalidator: &dyn CacheInvalidator, path: &str) {
	if let Err(err) = invalidator.invalidate(path).await {
		tracing::warn!(path, error = %err, "cache invalidation failed");
	}
}
