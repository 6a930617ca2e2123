//! Record-origin posts

use async_trait::async_trait;
use finlog_content::RecordSource;
use finlog_core::models::{NewPost, Post, PostStatus, PostUpdate};
use finlog_core::tags::{parse_tags, serialize_tags};
use finlog_core::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::connection::Database;
use crate::error::{
	database_error, format_date, format_timestamp, now, parse_column, parse_date, parse_timestamp,
};

/// Page size used when none is requested
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size served
pub const MAX_PAGE_SIZE: u32 = 100;

const POST_COLUMNS: &str = "id, title, slug, description, content, date, base_date, tags, series, views, status, auto_generated, created_at, updated_at, published_at";

/// Admin listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
	pub status: Option<PostStatus>,
	pub series: Option<String>,
	/// Case-insensitive substring of title, description or slug
	pub search: Option<String>,
	/// 1-based; `None` means the first page
	pub page: Option<u32>,
	/// `None` means [`DEFAULT_PAGE_SIZE`]; capped at [`MAX_PAGE_SIZE`]
	pub limit: Option<u32>,
}

impl PostFilter {
	pub fn page(&self) -> u32 {
		self.page.unwrap_or(1).max(1)
	}

	pub fn limit(&self) -> u32 {
		self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
	}
}

/// One page of an admin listing
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PostPage {
	pub posts: Vec<Post>,
	pub total: i64,
	pub page: u32,
	pub limit: u32,
	pub total_pages: i64,
}

fn post_from_row(row: &SqliteRow) -> Result<Post> {
	let get_str = |column: &str| -> Result<String> { row.try_get(column).map_err(database_error) };
	let get_opt = |column: &str| -> Result<Option<String>> {
		row.try_get(column).map_err(database_error)
	};

	let base_date = match get_opt("base_date")? {
		Some(raw) if !raw.is_empty() => Some(parse_date("base_date", &raw)?),
		_ => None,
	};
	let published_at = match get_opt("published_at")? {
		Some(raw) => Some(parse_timestamp("published_at", &raw)?),
		None => None,
	};

	Ok(Post {
		id: row.try_get("id").map_err(database_error)?,
		title: get_str("title")?,
		slug: get_str("slug")?,
		description: get_str("description")?,
		content: get_str("content")?,
		date: parse_date("date", &get_str("date")?)?,
		base_date,
		tags: parse_tags(&get_str("tags")?),
		series: get_opt("series")?,
		views: row.try_get("views").map_err(database_error)?,
		status: parse_column("status", &get_str("status")?)?,
		auto_generated: row.try_get("auto_generated").map_err(database_error)?,
		created_at: parse_timestamp("created_at", &get_str("created_at")?)?,
		updated_at: parse_timestamp("updated_at", &get_str("updated_at")?)?,
		published_at,
	})
}

fn like_pattern(term: &str) -> String {
	let escaped = term
		.replace('\\', "\\\\")
		.replace('%', "\\%")
		.replace('_', "\\_");
	format!("%{escaped}%")
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &PostFilter) {
	builder.push(" WHERE 1 = 1");
	if let Some(status) = filter.status {
		builder.push(" AND status = ").push_bind(status.as_str());
	}
	if let Some(series) = filter.series.as_deref().filter(|s| !s.is_empty()) {
		builder.push(" AND series = ").push_bind(series.to_string());
	}
	if let Some(term) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
		let pattern = like_pattern(term);
		builder
			.push(" AND (title LIKE ")
			.push_bind(pattern.clone())
			.push(" ESCAPE '\\' OR description LIKE ")
			.push_bind(pattern.clone())
			.push(" ESCAPE '\\' OR slug LIKE ")
			.push_bind(pattern)
			.push(" ESCAPE '\\')");
	}
}

/// Stamps `published_at` the first time the new status is `published`.
///
/// SQLite evaluates `SET` expressions against the old row, so the new
/// status is bound rather than read from the column.
fn push_published_at(builder: &mut QueryBuilder<'_, Sqlite>, status: PostStatus, stamp: &str) {
	builder
		.push("published_at = CASE WHEN ")
		.push_bind(status.as_str())
		.push(" = 'published' THEN COALESCE(published_at, ")
		.push_bind(stamp.to_string())
		.push(") ELSE published_at END");
}

/// Posts table access
#[derive(Debug, Clone)]
pub struct PostRepository {
	db: Database,
}

impl PostRepository {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	/// Insert a post; a taken slug is a conflict
	#[tracing::instrument(skip(self, new), fields(slug = %new.slug))]
	pub async fn create(&self, new: &NewPost) -> Result<Post> {
		let pool = self.db.pool().await?;
		let stamp = format_timestamp(now());
		let published_at = (new.status == PostStatus::Published).then(|| stamp.clone());

		let result = sqlx::query(
			"INSERT INTO posts (title, slug, description, content, date, base_date, tags, series, views, status, auto_generated, created_at, updated_at, published_at)
			 VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?)",
		)
		.bind(&new.title)
		.bind(&new.slug)
		.bind(&new.description)
		.bind(&new.content)
		.bind(format_date(new.date))
		.bind(new.base_date.map(format_date))
		.bind(serialize_tags(&new.tags))
		.bind(&new.series)
		.bind(new.status.as_str())
		.bind(new.auto_generated)
		.bind(&stamp)
		.bind(&stamp)
		.bind(published_at)
		.execute(pool)
		.await
		.map_err(|e| match database_error(e) {
			Error::Conflict(_) => Error::Conflict(format!("Slug already exists: {}", new.slug)),
			other => other,
		})?;

		let id = result.last_insert_rowid();
		tracing::info!(id, status = %new.status, "post created");
		self.get(id).await
	}

	/// A post by id, any status
	pub async fn get(&self, id: i64) -> Result<Post> {
		self.find(id)
			.await?
			.ok_or_else(|| Error::NotFound("Post not found".to_string()))
	}

	pub async fn find(&self, id: i64) -> Result<Option<Post>> {
		let pool = self.db.pool().await?;
		let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
			.bind(id)
			.fetch_optional(pool)
			.await
			.map_err(database_error)?;
		row.as_ref().map(post_from_row).transpose()
	}

	/// A post by slug, any status
	pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>> {
		let pool = self.db.pool().await?;
		let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = ?"))
			.bind(slug)
			.fetch_optional(pool)
			.await
			.map_err(database_error)?;
		row.as_ref().map(post_from_row).transpose()
	}

	pub async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>> {
		let pool = self.db.pool().await?;
		let row = sqlx::query(&format!(
			"SELECT {POST_COLUMNS} FROM posts WHERE slug = ? AND status = 'published'"
		))
		.bind(slug)
		.fetch_optional(pool)
		.await
		.map_err(database_error)?;
		row.as_ref().map(post_from_row).transpose()
	}

	/// Every published post, newest first
	pub async fn list_published(&self) -> Result<Vec<Post>> {
		let pool = self.db.pool().await?;
		let rows = sqlx::query(&format!(
			"SELECT {POST_COLUMNS} FROM posts WHERE status = 'published' ORDER BY date DESC, id DESC"
		))
		.fetch_all(pool)
		.await
		.map_err(database_error)?;
		rows.iter().map(post_from_row).collect()
	}

	/// Filtered, paginated listing for the admin
	pub async fn list(&self, filter: &PostFilter) -> Result<PostPage> {
		let pool = self.db.pool().await?;
		let page = filter.page();
		let limit = filter.limit();

		let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM posts");
		push_filters(&mut count, filter);
		let total = count
			.build_query_scalar::<i64>()
			.fetch_one(pool)
			.await
			.map_err(database_error)?;

		let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {POST_COLUMNS} FROM posts"));
		push_filters(&mut select, filter);
		select
			.push(" ORDER BY date DESC, id DESC LIMIT ")
			.push_bind(i64::from(limit))
			.push(" OFFSET ")
			.push_bind(i64::from(page - 1) * i64::from(limit));
		let rows = select.build().fetch_all(pool).await.map_err(database_error)?;
		let posts = rows.iter().map(post_from_row).collect::<Result<Vec<_>>>()?;

		Ok(PostPage {
			posts,
			total,
			page,
			limit,
			total_pages: (total + i64::from(limit) - 1) / i64::from(limit),
		})
	}

	/// Apply a partial update and return the new row
	#[tracing::instrument(skip(self, update))]
	pub async fn update(&self, id: i64, update: &PostUpdate) -> Result<Post> {
		let pool = self.db.pool().await?;
		let stamp = format_timestamp(now());

		let mut builder = QueryBuilder::<Sqlite>::new("UPDATE posts SET updated_at = ");
		builder.push_bind(stamp.clone());
		if let Some(title) = &update.title {
			builder.push(", title = ").push_bind(title.clone());
		}
		if let Some(slug) = &update.slug {
			builder.push(", slug = ").push_bind(slug.clone());
		}
		if let Some(description) = &update.description {
			builder.push(", description = ").push_bind(description.clone());
		}
		if let Some(content) = &update.content {
			builder.push(", content = ").push_bind(content.clone());
		}
		if let Some(date) = update.date {
			builder.push(", date = ").push_bind(format_date(date));
		}
		if let Some(base_date) = update.base_date {
			builder.push(", base_date = ").push_bind(base_date.map(format_date));
		}
		if let Some(tags) = &update.tags {
			builder.push(", tags = ").push_bind(serialize_tags(tags));
		}
		if let Some(series) = &update.series {
			builder.push(", series = ").push_bind(series.clone());
		}
		if let Some(views) = update.views {
			builder.push(", views = ").push_bind(views);
		}
		if let Some(status) = update.status {
			builder.push(", status = ").push_bind(status.as_str());
			builder.push(", ");
			push_published_at(&mut builder, status, &stamp);
		}
		builder.push(" WHERE id = ").push_bind(id);

		let result = builder
			.build()
			.execute(pool)
			.await
			.map_err(|e| match database_error(e) {
				Error::Conflict(_) => Error::Conflict("Slug already exists".to_string()),
				other => other,
			})?;
		if result.rows_affected() == 0 {
			return Err(Error::NotFound("Post not found".to_string()));
		}
		self.get(id).await
	}

	/// Change only the status, stamping `published_at` on first publish.
	///
	/// One statement, so concurrent publishes cannot both stamp.
	#[tracing::instrument(skip(self))]
	pub async fn set_status(&self, id: i64, status: PostStatus) -> Result<Post> {
		let pool = self.db.pool().await?;
		let stamp = format_timestamp(now());

		let mut builder = QueryBuilder::<Sqlite>::new("UPDATE posts SET status = ");
		builder
			.push_bind(status.as_str())
			.push(", updated_at = ")
			.push_bind(stamp.clone())
			.push(", ");
		push_published_at(&mut builder, status, &stamp);
		builder.push(" WHERE id = ").push_bind(id);

		let result = builder.build().execute(pool).await.map_err(database_error)?;
		if result.rows_affected() == 0 {
			return Err(Error::NotFound("Post not found".to_string()));
		}
		tracing::info!(id, %status, "post status changed");
		self.get(id).await
	}

	pub async fn delete(&self, id: i64) -> Result<()> {
		let pool = self.db.pool().await?;
		let result = sqlx::query("DELETE FROM posts WHERE id = ?")
			.bind(id)
			.execute(pool)
			.await
			.map_err(database_error)?;
		if result.rows_affected() == 0 {
			return Err(Error::NotFound("Post not found".to_string()));
		}
		tracing::info!(id, "post deleted");
		Ok(())
	}

	pub async fn slug_exists(&self, slug: &str) -> Result<bool> {
		let pool = self.db.pool().await?;
		let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM posts WHERE slug = ? LIMIT 1")
			.bind(slug)
			.fetch_optional(pool)
			.await
			.map_err(database_error)?;
		Ok(found.is_some())
	}

	/// Count a view of a published post. `false` when no published post has
	/// this slug.
	pub async fn increment_views(&self, slug: &str) -> Result<bool> {
		let pool = self.db.pool().await?;
		let result =
			sqlx::query("UPDATE posts SET views = views + 1 WHERE slug = ? AND status = 'published'")
				.bind(slug)
				.execute(pool)
				.await
				.map_err(database_error)?;
		Ok(result.rows_affected() > 0)
	}
}

#[async_trait]
impl RecordSource for PostRepository {
	async fn published_posts(&self) -> Result<Vec<Post>> {
		self.list_published().await
	}

	async fn published_post(&self, slug: &str) -> Result<Option<Post>> {
		self.find_published_by_slug(slug).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(None, None, 1, 20)]
	#[case(Some(0), Some(0), 1, 1)]
	#[case(Some(3), Some(500), 3, 100)]
	fn test_filter_defaults(
		#[case] page: Option<u32>,
		#[case] limit: Option<u32>,
		#[case] expected_page: u32,
		#[case] expected_limit: u32,
	) {
		let filter = PostFilter {
			page,
			limit,
			..Default::default()
		};
		assert_eq!(filter.page(), expected_page);
		assert_eq!(filter.limit(), expected_limit);
	}

	#[rstest]
	fn test_like_pattern_escapes_wildcards() {
		assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
	}
}
