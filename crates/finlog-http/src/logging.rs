//! Request logging middleware

use async_trait::async_trait;
use finlog_core::Result;
use std::sync::Arc;
use std::time::Instant;

use crate::handler::{Handler, Middleware};
use crate::request::Request;
use crate::response::Response;

/// Logs one line per request with method, path, status and latency.
///
/// Place it outside [`ErrorResponder`](crate::ErrorResponder) so that the
/// status logged is the one actually sent.
#[derive(Debug, Default, Clone)]
pub struct RequestLogging;

impl RequestLogging {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl Middleware for RequestLogging {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let method = request.method.clone();
		let path = request.path().to_string();
		let remote = request.remote_addr.map(|a| a.to_string()).unwrap_or_default();
		let start = Instant::now();

		let result = next.handle(request).await;
		let elapsed_ms = start.elapsed().as_millis() as u64;

		match &result {
			Ok(response) => tracing::info!(
				%method,
				%path,
				%remote,
				status = response.status.as_u16(),
				elapsed_ms,
				"request"
			),
			Err(err) => tracing::info!(
				%method,
				%path,
				%remote,
				status = err.status_code(),
				elapsed_ms,
				"request"
			),
		}
		result
	}
}
