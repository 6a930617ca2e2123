//! # finlog-http
//!
//! The HTTP layer finlog runs on: a buffered [`Request`]/[`Response`] pair,
//! the [`Handler`]/[`Middleware`] traits, a path-pattern [`Router`] and a
//! hyper-based [`HttpServer`] with graceful shutdown.
//!
//! ```rust,no_run
//! use finlog_http::{HttpServer, Response, Router, handler_fn};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let router = Router::new().get(
//!     "/healthz",
//!     handler_fn(|_req| async { Response::ok().with_json(&serde_json::json!({"status": "ok"})) }),
//! )?;
//! HttpServer::new(Arc::new(router))
//!     .listen_with_shutdown("127.0.0.1:3000".parse()?, finlog_http::shutdown_signal())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod cookie;
pub mod extensions;
pub mod handler;
pub mod logging;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use cookie::{Cookie, SameSite, parse_cookies};
pub use extensions::Extensions;
pub use handler::{ErrorResponder, FnHandler, Handler, Middleware, MiddlewareChain, handler_fn};
pub use logging::RequestLogging;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use router::{PathPattern, Router};
pub use server::{DEFAULT_MAX_BODY_SIZE, HttpServer, shutdown_signal};

pub use finlog_core::{Error, Result};
pub use hyper::{HeaderMap, Method, StatusCode};
