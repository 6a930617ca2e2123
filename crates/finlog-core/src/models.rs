//! Stored records and their lifecycle states.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::exception::Error;

/// Publication state of a record-origin post.
///
/// The data layer accepts any value through a generic update; only
/// `published` and `draft` are reachable through the publish action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
	/// Being written
	Draft,
	/// Waiting for a human to approve (auto-ingested posts start here)
	PendingReview,
	/// Publicly visible
	Published,
	/// Retired from the site
	Archived,
}

impl PostStatus {
	/// Column value for this status.
	pub fn as_str(&self) -> &'static str {
		match self {
			PostStatus::Draft => "draft",
			PostStatus::PendingReview => "pending_review",
			PostStatus::Published => "published",
			PostStatus::Archived => "archived",
		}
	}
}

impl fmt::Display for PostStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PostStatus {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"draft" => Ok(PostStatus::Draft),
			"pending_review" => Ok(PostStatus::PendingReview),
			"published" => Ok(PostStatus::Published),
			"archived" => Ok(PostStatus::Archived),
			other => Err(Error::Validation(format!("Unknown post status: {other}"))),
		}
	}
}

/// Record-origin post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
	pub id: i64,
	pub title: String,
	pub slug: String,
	pub description: String,
	pub content: String,
	/// Publish date shown on the site
	pub date: NaiveDate,
	/// Date the figures in the article are valid for
	pub base_date: Option<NaiveDate>,
	pub tags: Vec<String>,
	pub series: Option<String>,
	pub views: i64,
	pub status: PostStatus,
	pub auto_generated: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	/// Set on the first transition into `published`, never cleared
	pub published_at: Option<DateTime<Utc>>,
}

/// Values for inserting a post.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
	pub title: String,
	pub slug: String,
	pub description: String,
	pub content: String,
	pub date: NaiveDate,
	pub base_date: Option<NaiveDate>,
	pub tags: Vec<String>,
	pub series: Option<String>,
	pub status: PostStatus,
	pub auto_generated: bool,
}

impl NewPost {
	/// A draft dated `date` with empty metadata.
	pub fn draft(
		title: impl Into<String>,
		slug: impl Into<String>,
		content: impl Into<String>,
		date: NaiveDate,
	) -> Self {
		Self {
			title: title.into(),
			slug: slug.into(),
			description: String::new(),
			content: content.into(),
			date,
			base_date: None,
			tags: Vec::new(),
			series: None,
			status: PostStatus::Draft,
			auto_generated: false,
		}
	}

	/// Set the initial status.
	pub fn with_status(mut self, status: PostStatus) -> Self {
		self.status = status;
		self
	}

	/// Set the tag list.
	pub fn with_tags(mut self, tags: Vec<String>) -> Self {
		self.tags = tags;
		self
	}

	/// Set the series name.
	pub fn with_series(mut self, series: impl Into<String>) -> Self {
		self.series = Some(series.into());
		self
	}
}

/// Partial update of a post. `None` leaves the column untouched.
///
/// `base_date` and `series` are doubly optional so that they can be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostUpdate {
	pub title: Option<String>,
	pub slug: Option<String>,
	pub description: Option<String>,
	pub content: Option<String>,
	pub date: Option<NaiveDate>,
	pub base_date: Option<Option<NaiveDate>>,
	pub tags: Option<Vec<String>>,
	pub series: Option<Option<String>>,
	pub views: Option<i64>,
	pub status: Option<PostStatus>,
}

impl PostUpdate {
	/// Whether the update changes nothing.
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

/// State of a backlog topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
	Backlog,
	InProgress,
	Completed,
	Skipped,
}

impl TopicStatus {
	/// Column value for this status.
	pub fn as_str(&self) -> &'static str {
		match self {
			TopicStatus::Backlog => "backlog",
			TopicStatus::InProgress => "in_progress",
			TopicStatus::Completed => "completed",
			TopicStatus::Skipped => "skipped",
		}
	}
}

impl fmt::Display for TopicStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TopicStatus {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"backlog" => Ok(TopicStatus::Backlog),
			"in_progress" => Ok(TopicStatus::InProgress),
			"completed" => Ok(TopicStatus::Completed),
			"skipped" => Ok(TopicStatus::Skipped),
			other => Err(Error::Validation(format!("Unknown topic status: {other}"))),
		}
	}
}

/// Ordinal priority of a backlog topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicPriority {
	Normal,
	High,
	Urgent,
}

impl TopicPriority {
	/// Column value for this priority.
	pub fn as_str(&self) -> &'static str {
		match self {
			TopicPriority::Normal => "normal",
			TopicPriority::High => "high",
			TopicPriority::Urgent => "urgent",
		}
	}
}

impl fmt::Display for TopicPriority {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TopicPriority {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"normal" => Ok(TopicPriority::Normal),
			"high" => Ok(TopicPriority::High),
			"urgent" => Ok(TopicPriority::Urgent),
			other => Err(Error::Validation(format!("Unknown topic priority: {other}"))),
		}
	}
}

/// A planned article that has not been written yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
	pub id: i64,
	pub title: String,
	pub description: String,
	pub tags: Vec<String>,
	pub series: Option<String>,
	pub priority: TopicPriority,
	pub status: TopicStatus,
	pub notes: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Values for inserting a topic.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTopic {
	pub title: String,
	pub description: String,
	pub tags: Vec<String>,
	pub series: Option<String>,
	pub priority: TopicPriority,
	pub notes: String,
}

impl NewTopic {
	/// A normal-priority topic with only a title.
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			description: String::new(),
			tags: Vec::new(),
			series: None,
			priority: TopicPriority::Normal,
			notes: String::new(),
		}
	}

	/// Set the tag list.
	pub fn with_tags(mut self, tags: Vec<String>) -> Self {
		self.tags = tags;
		self
	}

	/// Set the priority.
	pub fn with_priority(mut self, priority: TopicPriority) -> Self {
		self.priority = priority;
		self
	}
}

/// Partial update of a topic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicUpdate {
	pub title: Option<String>,
	pub description: Option<String>,
	pub tags: Option<Vec<String>>,
	pub series: Option<Option<String>>,
	pub priority: Option<TopicPriority>,
	pub status: Option<TopicStatus>,
	pub notes: Option<String>,
}

/// The admin account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminUser {
	pub id: i64,
	pub username: String,
	#[serde(skip_serializing)]
	pub password_hash: String,
	pub display_name: String,
	pub created_at: DateTime<Utc>,
}

/// Free-form key/value configuration row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
	pub key: String,
	pub value: String,
	pub updated_at: DateTime<Utc>,
}
