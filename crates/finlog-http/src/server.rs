//! hyper-based HTTP/1.1 server

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::Error;
use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;

/// How long in-flight connections get to finish after shutdown is requested
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum request body size (2 MiB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

const BODY_TOO_LARGE: &str = "Request body too large";

/// HTTP server driving a single root [`Handler`]
pub struct HttpServer {
	handler: Arc<dyn Handler>,
	shutdown_timeout: Duration,
	max_body_size: usize,
}

impl HttpServer {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
			max_body_size: DEFAULT_MAX_BODY_SIZE,
		}
	}

	/// Bodies larger than `bytes` are answered with 413 before any handler runs
	pub fn with_max_body_size(mut self, bytes: usize) -> Self {
		self.max_body_size = bytes;
		self
	}

	pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
		self.shutdown_timeout = timeout;
		self
	}

	/// Bind `addr` and serve until `signal` resolves.
	///
	/// After the signal the listener is closed and open connections are
	/// drained for at most the shutdown timeout.
	pub async fn listen_with_shutdown<F>(self, addr: SocketAddr, signal: F) -> std::io::Result<()>
	where
		F: Future<Output = ()>,
	{
		let listener = TcpListener::bind(addr).await?;
		tracing::info!(%addr, "server listening");
		self.serve(listener, signal).await
	}

	/// Serve on an already bound listener until `signal` resolves
	pub async fn serve<F>(self, listener: TcpListener, signal: F) -> std::io::Result<()>
	where
		F: Future<Output = ()>,
	{
		let graceful = GracefulShutdown::new();
		tokio::pin!(signal);

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, remote_addr) = match result {
						Ok(accepted) => accepted,
						Err(err) => {
							tracing::warn!(error = %err, "failed to accept connection");
							continue;
						}
					};
					let service = RequestService {
						handler: self.handler.clone(),
						remote_addr,
						max_body_size: self.max_body_size,
					};
					let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
					let conn = graceful.watch(conn);
					tokio::spawn(async move {
						if let Err(err) = conn.await {
							tracing::debug!(%remote_addr, error = %err, "connection closed with error");
						}
					});
				}
				_ = &mut signal => {
					tracing::info!("shutdown signal received, stopping server");
					break;
				}
			}
		}
		drop(listener);

		tokio::select! {
			_ = graceful.shutdown() => {
				tracing::info!("all connections closed");
			}
			_ = tokio::time::sleep(self.shutdown_timeout) => {
				tracing::warn!(timeout_secs = self.shutdown_timeout.as_secs(), "shutdown timed out, dropping open connections");
			}
		}
		Ok(())
	}
}

struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
	max_body_size: usize,
}

fn into_hyper(response: Response) -> hyper::Response<Full<Bytes>> {
	let mut hyper_response = hyper::Response::new(Full::new(response.body));
	*hyper_response.status_mut() = response.status;
	*hyper_response.headers_mut() = response.headers;
	hyper_response
}

fn payload_too_large(remote_addr: SocketAddr, path: &str) -> hyper::Response<Full<Bytes>> {
	tracing::warn!(%remote_addr, path, "rejecting oversized request body");
	into_hyper(Response::from_error(&Error::PayloadTooLarge(BODY_TOO_LARGE.to_string())))
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Box<dyn std::error::Error + Send + Sync>;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;
		let max_body_size = self.max_body_size;

		Box::pin(async move {
			if let Some(len) = req.headers().get(hyper::header::CONTENT_LENGTH)
				&& let Ok(len) = len.to_str()
				&& let Ok(len) = len.parse::<u64>()
				&& len > max_body_size as u64
			{
				return Ok(payload_too_large(remote_addr, req.uri().path()));
			}

			let (parts, body) = req.into_parts();
			let body_bytes = match Limited::new(body, max_body_size).collect().await {
				Ok(collected) => collected.to_bytes(),
				Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
					return Ok(payload_too_large(remote_addr, parts.uri.path()));
				}
				Err(err) => return Err(err),
			};

			let mut request = Request::new(
				parts.method,
				parts.uri,
				parts.version,
				parts.headers,
				body_bytes,
			);
			request.remote_addr = Some(remote_addr);

			let response = match handler.handle(request).await {
				Ok(response) => response,
				Err(err) => Response::from_error(&err),
			};

			Ok(into_hyper(response))
		})
	}
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %err, "failed to install Ctrl-C handler");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut sig) => {
				sig.recv().await;
			}
			Err(err) => {
				tracing::error!(error = %err, "failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {}
		_ = terminate => {}
	}
}
