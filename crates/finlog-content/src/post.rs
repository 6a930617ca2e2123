//! The public shape of a post, whichever origin it came from

use chrono::NaiveDate;
use finlog_core::models::Post;
use serde::{Deserialize, Serialize};

/// Where a post was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSource {
	/// A content file on disk; always published
	Mdx,
	/// A database row with `status = published`
	Db,
}

/// A publicly visible post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPost {
	/// Database id; file-origin posts have none
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<i64>,
	pub slug: String,
	pub title: String,
	pub description: String,
	pub content: String,
	pub date: NaiveDate,
	pub base_date: Option<NaiveDate>,
	pub tags: Vec<String>,
	pub series: Option<String>,
	pub views: i64,
	pub source: PostSource,
}

impl ContentPost {
	pub fn has_tag(&self, tag: &str) -> bool {
		self.tags.iter().any(|t| t == tag)
	}

	pub fn in_series(&self, series: &str) -> bool {
		self.series.as_deref() == Some(series)
	}
}

impl From<Post> for ContentPost {
	fn from(post: Post) -> Self {
		Self {
			id: Some(post.id),
			slug: post.slug,
			title: post.title,
			description: post.description,
			content: post.content,
			date: post.date,
			base_date: post.base_date,
			tags: post.tags,
			series: post.series,
			views: post.views,
			source: PostSource::Db,
		}
	}
}
