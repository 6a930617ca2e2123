//! Router, middleware and server integration tests

use finlog_http::{
	Error, ErrorResponder, Handler, HttpServer, Method, MiddlewareChain, Request, RequestLogging,
	Response, Router, StatusCode, handler_fn,
};
use rstest::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[fixture]
fn router() -> Router {
	Router::new()
		.get(
			"/api/posts",
			handler_fn(|_req| async { Response::ok().with_json(&serde_json::json!([])) }),
		)
		.unwrap()
		.get(
			"/api/posts/{slug}",
			handler_fn(|req: Request| async move {
				let slug = req.path_param("slug")?.to_string();
				Response::ok().with_json(&serde_json::json!({ "slug": slug }))
			}),
		)
		.unwrap()
		.delete(
			"/api/admin/posts/{id}",
			handler_fn(|req: Request| async move {
				let id: i64 = req.path_param_as("id")?;
				if id == 404 {
					return Err(Error::NotFound("Post not found".into()));
				}
				Ok(Response::no_content())
			}),
		)
		.unwrap()
}

fn app(router: Router) -> MiddlewareChain {
	MiddlewareChain::new(Arc::new(router))
		.with_middleware(Arc::new(RequestLogging::new()))
		.with_middleware(Arc::new(ErrorResponder))
}

fn request(method: Method, uri: &str) -> Request {
	Request::builder().method(method).uri(uri).build().unwrap()
}

#[rstest]
#[tokio::test]
async fn test_path_params_are_decoded(router: Router) {
	let response = app(router)
		.handle(request(Method::GET, "/api/posts/%EA%B8%88%EB%A6%AC-%EC%A0%84%EB%A7%9D"))
		.await
		.unwrap();

	assert_eq!(response.status, StatusCode::OK);
	let body: serde_json::Value = response.json().unwrap();
	assert_eq!(body["slug"], "금리-전망");
}

#[rstest]
#[tokio::test]
async fn test_unknown_path_is_404(router: Router) {
	let response = app(router)
		.handle(request(Method::GET, "/nope"))
		.await
		.unwrap();

	assert_eq!(response.status, StatusCode::NOT_FOUND);
	let body: serde_json::Value = response.json().unwrap();
	assert_eq!(body["error"], "Not found");
}

#[rstest]
#[tokio::test]
async fn test_wrong_method_is_405_with_allow(router: Router) {
	let response = app(router)
		.handle(request(Method::POST, "/api/posts"))
		.await
		.unwrap();

	assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
	assert_eq!(response.headers["allow"], "GET");
}

#[rstest]
#[case("/api/admin/posts/1", StatusCode::NO_CONTENT)]
#[case("/api/admin/posts/404", StatusCode::NOT_FOUND)]
#[case("/api/admin/posts/abc", StatusCode::BAD_REQUEST)]
#[tokio::test]
async fn test_handler_errors_become_responses(
	router: Router,
	#[case] uri: &str,
	#[case] expected: StatusCode,
) {
	let response = app(router)
		.handle(request(Method::DELETE, uri))
		.await
		.unwrap();
	assert_eq!(response.status, expected);
}

#[rstest]
#[tokio::test]
async fn test_server_round_trip_and_shutdown(router: Router) {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	let (tx, rx) = tokio::sync::oneshot::channel::<()>();

	let server = HttpServer::new(Arc::new(app(router))).with_shutdown_timeout(Duration::from_secs(1));
	let handle = tokio::spawn(server.serve(listener, async {
		let _ = rx.await;
	}));

	let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
	stream
		.write_all(b"GET /api/posts HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
		.await
		.unwrap();
	let mut raw = String::new();
	stream.read_to_string(&mut raw).await.unwrap();

	assert!(raw.starts_with("HTTP/1.1 200 OK"));
	assert!(raw.contains("content-type: application/json"));
	assert!(raw.ends_with("[]"));

	tx.send(()).unwrap();
	tokio::time::timeout(Duration::from_secs(5), handle)
		.await
		.unwrap()
		.unwrap()
		.unwrap();
}

async fn raw_exchange(addr: std::net::SocketAddr, request: &[u8]) -> String {
	let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
	stream.write_all(request).await.unwrap();
	let mut raw = Vec::new();
	let _ = stream.read_to_end(&mut raw).await;
	String::from_utf8_lossy(&raw).into_owned()
}

#[rstest]
#[tokio::test]
async fn test_oversized_bodies_are_rejected_before_handlers() {
	let echo = Router::new()
		.post(
			"/api/auto-post",
			handler_fn(|req: Request| async move {
				Response::ok().with_json(&serde_json::json!({ "len": req.body.len() }))
			}),
		)
		.unwrap();

	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	let (tx, rx) = tokio::sync::oneshot::channel::<()>();
	let server = HttpServer::new(Arc::new(app(echo)))
		.with_max_body_size(16)
		.with_shutdown_timeout(Duration::from_secs(1));
	let handle = tokio::spawn(server.serve(listener, async {
		let _ = rx.await;
	}));

	let small = raw_exchange(
		addr,
		b"POST /api/auto-post HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: 4\r\n\r\nabcd",
	)
	.await;
	assert!(small.starts_with("HTTP/1.1 200 OK"), "{small}");
	assert!(small.ends_with(r#"{"len":4}"#));

	let declared = raw_exchange(
		addr,
		b"POST /api/auto-post HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: 1048576\r\n\r\n",
	)
	.await;
	assert!(declared.starts_with("HTTP/1.1 413"), "{declared}");
	assert!(declared.contains(r#"{"error":"Request body too large"}"#));

	let chunked = raw_exchange(
		addr,
		b"POST /api/auto-post HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nTransfer-Encoding: chunked\r\n\r\n20\r\naaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n0\r\n\r\n",
	)
	.await;
	assert!(chunked.starts_with("HTTP/1.1 413"), "{chunked}");

	tx.send(()).unwrap();
	tokio::time::timeout(Duration::from_secs(5), handle)
		.await
		.unwrap()
		.unwrap()
		.unwrap();
}
