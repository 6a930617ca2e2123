//! Repository behaviour against a real SQLite file

use chrono::NaiveDate;
use finlog_content::RecordSource;
use finlog_core::models::{NewPost, NewTopic, PostStatus, PostUpdate, TopicPriority, TopicStatus};
use finlog_db::{
	AUTO_POST_ENABLED, AdminUserRepository, Database, PostFilter, PostRepository,
	SettingsRepository, TopicRepository,
};
use rstest::*;
use tempfile::NamedTempFile;

#[fixture]
async fn database() -> (NamedTempFile, Database) {
	let temp_file = NamedTempFile::new().expect("Failed to create temp file");
	let url = format!("sqlite://{}?mode=rwc", temp_file.path().display());
	let db = Database::connect(&url)
		.await
		.expect("Failed to connect to SQLite");
	(temp_file, db)
}

fn day(d: u32) -> NaiveDate {
	NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

#[rstest]
#[tokio::test]
async fn test_concurrent_bootstrap_is_idempotent(
	#[future] database: (NamedTempFile, Database),
) {
	let (file, db) = database.await;

	let handles: Vec<_> = (0..8)
		.map(|_| {
			let db = db.clone();
			tokio::spawn(async move { db.ensure_schema().await })
		})
		.collect();
	for handle in handles {
		handle.await.unwrap().unwrap();
	}

	// A second process-level handle re-runs every statement without error
	let url = format!("sqlite://{}?mode=rwc", file.path().display());
	let other = Database::connect(&url).await.unwrap();
	other.ensure_schema().await.unwrap();

	let settings = SettingsRepository::new(other).all().await.unwrap();
	assert_eq!(settings.len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_create_and_duplicate_slug(#[future] database: (NamedTempFile, Database)) {
	let (_file, db) = database.await;
	let posts = PostRepository::new(db);

	let new = NewPost::draft("대출 가이드", "대출-가이드", "본문", day(5))
		.with_tags(vec!["대출".into(), "금리".into()])
		.with_series("대출 시리즈");
	let created = posts.create(&new).await.unwrap();

	assert_eq!(created.status, PostStatus::Draft);
	assert_eq!(created.tags, vec!["대출", "금리"]);
	assert_eq!(created.series.as_deref(), Some("대출 시리즈"));
	assert_eq!(created.views, 0);
	assert!(created.published_at.is_none());
	assert!(posts.slug_exists("대출-가이드").await.unwrap());

	let err = posts.create(&new).await.unwrap_err();
	assert_eq!(err.status_code(), 409);
}

#[rstest]
#[tokio::test]
async fn test_published_at_is_stamped_once(#[future] database: (NamedTempFile, Database)) {
	let (_file, db) = database.await;
	let posts = PostRepository::new(db);
	let post = posts
		.create(&NewPost::draft("T", "t", "c", day(1)))
		.await
		.unwrap();

	let published = posts.set_status(post.id, PostStatus::Published).await.unwrap();
	let first_stamp = published.published_at.expect("stamped on first publish");

	let draft = posts.set_status(post.id, PostStatus::Draft).await.unwrap();
	assert_eq!(draft.published_at, Some(first_stamp));

	let again = posts.set_status(post.id, PostStatus::Published).await.unwrap();
	assert_eq!(again.published_at, Some(first_stamp));

	let archived = posts
		.update(
			post.id,
			&PostUpdate {
				status: Some(PostStatus::Archived),
				..Default::default()
			},
		)
		.await
		.unwrap();
	assert_eq!(archived.status, PostStatus::Archived);
	assert_eq!(archived.published_at, Some(first_stamp));
}

#[rstest]
#[tokio::test]
async fn test_generic_update_to_published_stamps(
	#[future] database: (NamedTempFile, Database),
) {
	let (_file, db) = database.await;
	let posts = PostRepository::new(db);
	let post = posts
		.create(&NewPost::draft("T", "t", "c", day(1)))
		.await
		.unwrap();

	let updated = posts
		.update(
			post.id,
			&PostUpdate {
				title: Some("New title".into()),
				series: Some(None),
				status: Some(PostStatus::Published),
				..Default::default()
			},
		)
		.await
		.unwrap();

	assert_eq!(updated.title, "New title");
	assert!(updated.published_at.is_some());
}

#[rstest]
#[tokio::test]
async fn test_missing_rows_are_not_found(#[future] database: (NamedTempFile, Database)) {
	let (_file, db) = database.await;
	let posts = PostRepository::new(db.clone());
	let topics = TopicRepository::new(db);

	assert_eq!(posts.get(99).await.unwrap_err().status_code(), 404);
	assert_eq!(
		posts
			.set_status(99, PostStatus::Published)
			.await
			.unwrap_err()
			.status_code(),
		404
	);
	assert_eq!(posts.delete(99).await.unwrap_err().status_code(), 404);
	assert_eq!(topics.get(99).await.unwrap_err().status_code(), 404);
}

#[rstest]
#[tokio::test]
async fn test_admin_list_filters_and_pages(#[future] database: (NamedTempFile, Database)) {
	let (_file, db) = database.await;
	let posts = PostRepository::new(db);

	for i in 1..=25 {
		let mut new = NewPost::draft(format!("Post {i}"), format!("post-{i}"), "c", day(i));
		if i % 5 == 0 {
			new = new.with_status(PostStatus::Published).with_series("Monthly");
		}
		posts.create(&new).await.unwrap();
	}
	posts
		.create(&NewPost::draft("예금 금리 비교", "deposit-rates", "c", day(26)))
		.await
		.unwrap();

	let first = posts.list(&PostFilter::default()).await.unwrap();
	assert_eq!(first.total, 26);
	assert_eq!(first.limit, 20);
	assert_eq!(first.total_pages, 2);
	assert_eq!(first.posts.len(), 20);
	assert_eq!(first.posts[0].slug, "deposit-rates");

	let second = posts
		.list(&PostFilter {
			page: Some(2),
			..Default::default()
		})
		.await
		.unwrap();
	assert_eq!(second.posts.len(), 6);

	let published = posts
		.list(&PostFilter {
			status: Some(PostStatus::Published),
			series: Some("Monthly".into()),
			..Default::default()
		})
		.await
		.unwrap();
	assert_eq!(published.total, 5);

	let search = posts
		.list(&PostFilter {
			search: Some("POST 1".into()),
			..Default::default()
		})
		.await
		.unwrap();
	// Post 1, Post 10..19
	assert_eq!(search.total, 11);

	let korean = posts
		.list(&PostFilter {
			search: Some("금리".into()),
			..Default::default()
		})
		.await
		.unwrap();
	assert_eq!(korean.total, 1);

	let wildcard = posts
		.list(&PostFilter {
			search: Some("%".into()),
			..Default::default()
		})
		.await
		.unwrap();
	assert_eq!(wildcard.total, 0);
}

#[rstest]
#[tokio::test]
async fn test_record_source_and_views(#[future] database: (NamedTempFile, Database)) {
	let (_file, db) = database.await;
	let posts = PostRepository::new(db);

	let live = posts
		.create(&NewPost::draft("Live", "live", "c", day(2)).with_status(PostStatus::Published))
		.await
		.unwrap();
	posts
		.create(&NewPost::draft("Review", "review", "c", day(3)).with_status(PostStatus::PendingReview))
		.await
		.unwrap();

	let published = posts.published_posts().await.unwrap();
	assert_eq!(published.len(), 1);
	assert_eq!(published[0].id, live.id);
	assert!(posts.published_post("review").await.unwrap().is_none());

	assert!(posts.increment_views("live").await.unwrap());
	assert!(posts.increment_views("live").await.unwrap());
	assert!(!posts.increment_views("review").await.unwrap());
	assert_eq!(posts.get(live.id).await.unwrap().views, 2);
}

#[rstest]
#[tokio::test]
async fn test_topics_order_by_priority(#[future] database: (NamedTempFile, Database)) {
	let (_file, db) = database.await;
	let topics = TopicRepository::new(db);

	let normal = topics.create(&NewTopic::new("normal")).await.unwrap();
	let urgent = topics
		.create(&NewTopic::new("urgent").with_priority(TopicPriority::Urgent))
		.await
		.unwrap();
	let high = topics
		.create(&NewTopic::new("high").with_priority(TopicPriority::High))
		.await
		.unwrap();
	assert_eq!(normal.status, TopicStatus::Backlog);

	let order: Vec<_> = topics
		.list(None)
		.await
		.unwrap()
		.into_iter()
		.map(|t| t.id)
		.collect();
	assert_eq!(order, vec![urgent.id, high.id, normal.id]);

	topics.set_status(high.id, TopicStatus::Skipped).await.unwrap();
	let backlog = topics.list(Some(TopicStatus::Backlog)).await.unwrap();
	assert_eq!(backlog.len(), 2);

	topics.delete(normal.id).await.unwrap();
	assert_eq!(topics.list(None).await.unwrap().len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_default_admin_only_when_empty(#[future] database: (NamedTempFile, Database)) {
	let (_file, db) = database.await;
	let users = AdminUserRepository::new(db);

	let created = users
		.ensure_default_admin("admin", "관리자", || Ok("hash-1".to_string()))
		.await
		.unwrap();
	assert!(created);

	let again = users
		.ensure_default_admin("admin", "관리자", || panic!("must not hash again"))
		.await
		.unwrap();
	assert!(!again);

	let admin = users.find_by_username("admin").await.unwrap().unwrap();
	assert_eq!(admin.password_hash, "hash-1");
	assert_eq!(users.count().await.unwrap(), 1);
}

#[rstest]
#[tokio::test]
async fn test_settings_upsert(#[future] database: (NamedTempFile, Database)) {
	let (_file, db) = database.await;
	let settings = SettingsRepository::new(db);

	assert!(settings.is_enabled(AUTO_POST_ENABLED, false).await.unwrap());

	settings
		.set_many(&[
			(AUTO_POST_ENABLED.to_string(), "false".to_string()),
			("theme".to_string(), "dark".to_string()),
		])
		.await
		.unwrap();

	assert!(!settings.is_enabled(AUTO_POST_ENABLED, true).await.unwrap());
	assert_eq!(settings.get("theme").await.unwrap().as_deref(), Some("dark"));
	assert!(settings.is_enabled("missing", true).await.unwrap());
	assert_eq!(settings.all().await.unwrap().len(), 3);
}
