//! Backlog topics

use finlog_core::models::{NewTopic, Topic, TopicStatus, TopicUpdate};
use finlog_core::tags::{parse_tags, serialize_tags};
use finlog_core::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::connection::Database;
use crate::error::{database_error, format_timestamp, now, parse_column, parse_timestamp};

const TOPIC_COLUMNS: &str =
	"id, title, description, tags, series, priority, status, notes, created_at, updated_at";

const PRIORITY_ORDER: &str =
	"CASE priority WHEN 'urgent' THEN 0 WHEN 'high' THEN 1 ELSE 2 END, created_at ASC, id ASC";

fn topic_from_row(row: &SqliteRow) -> Result<Topic> {
	let get_str = |column: &str| -> Result<String> { row.try_get(column).map_err(database_error) };

	Ok(Topic {
		id: row.try_get("id").map_err(database_error)?,
		title: get_str("title")?,
		description: get_str("description")?,
		tags: parse_tags(&get_str("tags")?),
		series: row.try_get("series").map_err(database_error)?,
		priority: parse_column("priority", &get_str("priority")?)?,
		status: parse_column("status", &get_str("status")?)?,
		notes: get_str("notes")?,
		created_at: parse_timestamp("created_at", &get_str("created_at")?)?,
		updated_at: parse_timestamp("updated_at", &get_str("updated_at")?)?,
	})
}

/// `post_topics` table access
#[derive(Debug, Clone)]
pub struct TopicRepository {
	db: Database,
}

impl TopicRepository {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	pub async fn create(&self, new: &NewTopic) -> Result<Topic> {
		let pool = self.db.pool().await?;
		let stamp = format_timestamp(now());
		let result = sqlx::query(
			"INSERT INTO post_topics (title, description, tags, series, priority, status, notes, created_at, updated_at)
			 VALUES (?, ?, ?, ?, ?, 'backlog', ?, ?, ?)",
		)
		.bind(&new.title)
		.bind(&new.description)
		.bind(serialize_tags(&new.tags))
		.bind(&new.series)
		.bind(new.priority.as_str())
		.bind(&new.notes)
		.bind(&stamp)
		.bind(&stamp)
		.execute(pool)
		.await
		.map_err(database_error)?;

		let id = result.last_insert_rowid();
		tracing::info!(id, priority = %new.priority, "topic created");
		self.get(id).await
	}

	pub async fn get(&self, id: i64) -> Result<Topic> {
		let pool = self.db.pool().await?;
		let row = sqlx::query(&format!("SELECT {TOPIC_COLUMNS} FROM post_topics WHERE id = ?"))
			.bind(id)
			.fetch_optional(pool)
			.await
			.map_err(database_error)?;
		match row {
			Some(row) => topic_from_row(&row),
			None => Err(Error::NotFound("Topic not found".to_string())),
		}
	}

	/// Topics, most urgent first, then oldest first
	pub async fn list(&self, status: Option<TopicStatus>) -> Result<Vec<Topic>> {
		let pool = self.db.pool().await?;
		let mut builder =
			QueryBuilder::<Sqlite>::new(format!("SELECT {TOPIC_COLUMNS} FROM post_topics"));
		if let Some(status) = status {
			builder.push(" WHERE status = ").push_bind(status.as_str());
		}
		builder.push(" ORDER BY ").push(PRIORITY_ORDER);

		let rows = builder.build().fetch_all(pool).await.map_err(database_error)?;
		rows.iter().map(topic_from_row).collect()
	}

	pub async fn update(&self, id: i64, update: &TopicUpdate) -> Result<Topic> {
		let pool = self.db.pool().await?;
		let mut builder = QueryBuilder::<Sqlite>::new("UPDATE post_topics SET updated_at = ");
		builder.push_bind(format_timestamp(now()));
		if let Some(title) = &update.title {
			builder.push(", title = ").push_bind(title.clone());
		}
		if let Some(description) = &update.description {
			builder.push(", description = ").push_bind(description.clone());
		}
		if let Some(tags) = &update.tags {
			builder.push(", tags = ").push_bind(serialize_tags(tags));
		}
		if let Some(series) = &update.series {
			builder.push(", series = ").push_bind(series.clone());
		}
		if let Some(priority) = update.priority {
			builder.push(", priority = ").push_bind(priority.as_str());
		}
		if let Some(status) = update.status {
			builder.push(", status = ").push_bind(status.as_str());
		}
		if let Some(notes) = &update.notes {
			builder.push(", notes = ").push_bind(notes.clone());
		}
		builder.push(" WHERE id = ").push_bind(id);

		let result = builder.build().execute(pool).await.map_err(database_error)?;
		if result.rows_affected() == 0 {
			return Err(Error::NotFound("Topic not found".to_string()));
		}
		self.get(id).await
	}

	pub async fn set_status(&self, id: i64, status: TopicStatus) -> Result<Topic> {
		self.update(
			id,
			&TopicUpdate {
				status: Some(status),
				..Default::default()
			},
		)
		.await
	}

	pub async fn delete(&self, id: i64) -> Result<()> {
		let pool = self.db.pool().await?;
		let result = sqlx::query("DELETE FROM post_topics WHERE id = ?")
			.bind(id)
			.execute(pool)
			.await
			.map_err(database_error)?;
		if result.rows_affected() == 0 {
			return Err(Error::NotFound("Topic not found".to_string()));
		}
		tracing::info!(id, "topic deleted");
		Ok(())
	}
}
