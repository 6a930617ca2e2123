//! Handler and middleware abstractions

use async_trait::async_trait;
use finlog_core::Result;
use std::future::Future;
use std::sync::Arc;

use crate::request::Request;
use crate::response::Response;

/// Handler trait for processing requests
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Blanket implementation so that `Arc<dyn Handler>` is itself a handler
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing
#[async_trait]
pub trait Middleware: Send + Sync {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;

	/// Whether this middleware runs for the given request.
	///
	/// Skipped middleware is bypassed entirely. Defaults to `true`.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

/// Adapts an async closure into a [`Handler`]
pub struct FnHandler<F> {
	f: F,
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
	F: Fn(Request) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		(self.f)(request).await
	}
}

/// Wrap an async closure as a shareable handler
///
/// # Examples
///
/// ```
/// use finlog_http::{Handler, Request, Response, handler_fn};
///
/// # tokio_test_block(async {
/// let handler = handler_fn(|_req| async { Ok(Response::no_content()) });
/// let response = handler.handle(Request::builder().build().unwrap()).await.unwrap();
/// assert_eq!(response.status.as_u16(), 204);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn Handler>
where
	F: Fn(Request) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	Arc::new(FnHandler { f })
}

/// Middleware chain - composes multiple middleware around a handler.
///
/// Middleware added first runs outermost.
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	pub fn len(&self) -> usize {
		self.middlewares.len()
	}

	pub fn is_empty(&self) -> bool {
		self.middlewares.is_empty()
	}
}

struct Next {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for Next {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		let mut current: Arc<dyn Handler> = self.handler.clone();
		for middleware in self
			.middlewares
			.iter()
			.rev()
			.filter(|m| m.should_continue(&request))
		{
			current = Arc::new(Next {
				middleware: middleware.clone(),
				next: current,
			});
		}
		current.handle(request).await
	}
}

/// Turns every `Err` coming out of the inner handler into an error response.
///
/// Server errors are logged with their full detail here, which is the only
/// place that detail is kept.
pub struct ErrorResponder;

#[async_trait]
impl Middleware for ErrorResponder {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let method = request.method.clone();
		let path = request.path().to_string();
		match next.handle(request).await {
			Ok(response) => Ok(response),
			Err(err) => {
				if err.is_server_error() {
					tracing::error!(%method, %path, error = %err, "request failed");
				} else {
					tracing::debug!(%method, %path, error = %err, "request rejected");
				}
				Ok(Response::from_error(&err))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use finlog_core::Error;
	use rstest::rstest;

	struct Hello;

	#[async_trait]
	impl Handler for Hello {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok().with_body("Hello"))
		}
	}

	struct Prefix(&'static str);

	#[async_trait]
	impl Middleware for Prefix {
		async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
			let response = next.handle(request).await?;
			let body = String::from_utf8(response.body.to_vec()).unwrap_or_default();
			Ok(Response::ok().with_body(format!("{}{}", self.0, body)))
		}
	}

	struct OnlyApi;

	#[async_trait]
	impl Middleware for OnlyApi {
		async fn process(&self, _request: Request, _next: Arc<dyn Handler>) -> Result<Response> {
			Ok(Response::ok().with_body("api"))
		}

		fn should_continue(&self, request: &Request) -> bool {
			request.path().starts_with("/api/")
		}
	}

	fn request(path: &str) -> Request {
		Request::builder().uri(path).build().unwrap()
	}

	#[rstest]
	#[tokio::test]
	async fn test_chain_order() {
		let chain = MiddlewareChain::new(Arc::new(Hello))
			.with_middleware(Arc::new(Prefix("First:")))
			.with_middleware(Arc::new(Prefix("Second:")));

		let response = chain.handle(request("/")).await.unwrap();
		assert_eq!(&response.body[..], b"First:Second:Hello");
	}

	#[rstest]
	#[tokio::test]
	async fn test_should_continue_skips_middleware() {
		let chain = MiddlewareChain::new(Arc::new(Hello)).with_middleware(Arc::new(OnlyApi));

		let skipped = chain.handle(request("/healthz")).await.unwrap();
		assert_eq!(&skipped.body[..], b"Hello");

		let applied = chain.handle(request("/api/posts")).await.unwrap();
		assert_eq!(&applied.body[..], b"api");
	}

	#[rstest]
	#[tokio::test]
	async fn test_error_responder_converts_errors() {
		let failing = handler_fn(|_req| async { Err(Error::NotFound("Post not found".into())) });
		let chain = MiddlewareChain::new(failing).with_middleware(Arc::new(ErrorResponder));

		let response = chain.handle(request("/api/posts/x")).await.unwrap();
		assert_eq!(response.status.as_u16(), 404);
		let body: serde_json::Value = response.json().unwrap();
		assert_eq!(body["error"], "Post not found");
	}
}
