//! Auto-ingested post goes through review and reaches the public catalog

use finlog::cms::NoopInvalidator;
use finlog::http::{Method, Request, Response};
use finlog::prelude::*;
use rstest::*;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::{NamedTempFile, TempDir};

const SECRET: &str = "e2e-generator-secret";

struct Deployment {
	_db_file: NamedTempFile,
	_content: TempDir,
	state: AppState,
	app: Arc<dyn Handler>,
}

impl Deployment {
	async fn call(&self, request: Request) -> (u16, Value) {
		let response: Response = self.app.handle(request).await.unwrap();
		let body = if response.body.is_empty() {
			Value::Null
		} else {
			response.json().unwrap()
		};
		(response.status.as_u16(), body)
	}
}

#[fixture]
async fn deployment() -> Deployment {
	let db_file = NamedTempFile::new().unwrap();
	let content = tempfile::tempdir().unwrap();
	std::fs::write(
		content.path().join("emergency-fund.md"),
		"---\ntitle: 비상금 만들기\ndate: 2024-12-01\ntags: [저축]\n---\n비상금은 생활비 6개월분.\n",
	)
	.unwrap();

	let settings = Settings {
		database_url: format!("sqlite://{}?mode=rwc", db_file.path().display()),
		content_dir: content.path().to_path_buf(),
		session_secret: Some("an-end-to-end-session-secret-of-32b+".to_string()),
		auto_post_secret: Some(SECRET.to_string()),
		..Settings::default()
	};
	let db = Database::connect(&settings.database_url).await.unwrap();
	let state = AppState::with_invalidator(settings, db, Arc::new(NoopInvalidator));
	state.bootstrap().await.unwrap();
	let app = build_app(&state).unwrap();

	Deployment {
		_db_file: db_file,
		_content: content,
		state,
		app,
	}
}

#[rstest]
#[tokio::test]
async fn test_auto_post_review_publish(#[future] deployment: Deployment) {
	let deployment = deployment.await;

	let ingest = Request::builder()
		.method(Method::POST)
		.uri("/api/auto-post")
		.header("authorization", &format!("Bearer {SECRET}"))
		.json(&json!({"title": "T", "slug": "t", "content": "c"}))
		.build()
		.unwrap();
	let (status, body) = deployment.call(ingest).await;
	assert_eq!(status, 201);
	assert_eq!(body["post"]["status"], "pending_review");
	let id = body["post"]["id"].as_i64().unwrap();

	// Awaiting review: not public
	let before = deployment.state.resolver.list_all().await.unwrap();
	assert!(before.iter().all(|p| p.slug != "t"));

	let login = Request::builder()
		.method(Method::POST)
		.uri("/api/admin/auth/login")
		.json(&json!({"username": "admin", "password": "admin1234"}))
		.build()
		.unwrap();
	let response = deployment.app.handle(login).await.unwrap();
	assert_eq!(response.status.as_u16(), 200);
	let cookie = response.headers["set-cookie"]
		.to_str()
		.unwrap()
		.split(';')
		.next()
		.unwrap()
		.to_string();

	let publish = Request::builder()
		.method(Method::POST)
		.uri(format!("/api/admin/posts/{id}/publish"))
		.header("cookie", &cookie)
		.json(&json!({"action": "publish"}))
		.build()
		.unwrap();
	let (status, body) = deployment.call(publish).await;
	assert_eq!(status, 200);
	assert_eq!(body["post"]["status"], "published");

	let after = deployment.state.resolver.list_all().await.unwrap();
	let post = after.iter().find(|p| p.slug == "t").expect("published post is listed");
	assert_eq!(post.source, PostSource::Db);
	assert_eq!(after.iter().filter(|p| p.slug == "t").count(), 1);

	let (status, body) = deployment
		.call(Request::builder().uri("/api/posts").build().unwrap())
		.await;
	assert_eq!(status, 200);
	let slugs: Vec<&str> = body["posts"]
		.as_array()
		.unwrap()
		.iter()
		.map(|p| p["slug"].as_str().unwrap())
		.collect();
	assert!(slugs.contains(&"t"));
	assert!(slugs.contains(&"emergency-fund"));
}
