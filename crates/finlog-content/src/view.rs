//! Public JSON representations with derived fields filled in

use chrono::NaiveDate;
use serde::Serialize;

use crate::derived::{reading_time, views_label};
use crate::post::{ContentPost, PostSource};

/// A full post as served to readers
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
	#[serde(flatten)]
	pub post: ContentPost,
	pub reading_time: String,
	pub views_label: Option<String>,
}

impl From<ContentPost> for PostView {
	fn from(post: ContentPost) -> Self {
		Self {
			reading_time: reading_time(&post.content),
			views_label: views_label(post.views),
			post,
		}
	}
}

/// A catalog entry, without the body
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<i64>,
	pub slug: String,
	pub title: String,
	pub description: String,
	pub date: NaiveDate,
	pub base_date: Option<NaiveDate>,
	pub tags: Vec<String>,
	pub series: Option<String>,
	pub source: PostSource,
	pub reading_time: String,
	pub views_label: Option<String>,
}

impl From<&ContentPost> for PostSummary {
	fn from(post: &ContentPost) -> Self {
		Self {
			id: post.id,
			slug: post.slug.clone(),
			title: post.title.clone(),
			description: post.description.clone(),
			date: post.date,
			base_date: post.base_date,
			tags: post.tags.clone(),
			series: post.series.clone(),
			source: post.source,
			reading_time: reading_time(&post.content),
			views_label: views_label(post.views),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_view_serialises_flat_with_derived_fields() {
		let post = ContentPost {
			id: None,
			slug: "s".into(),
			title: "T".into(),
			description: String::new(),
			content: "가".repeat(700),
			date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
			base_date: None,
			tags: vec![],
			series: None,
			views: 12,
			source: PostSource::Mdx,
		};
		let json = serde_json::to_value(PostView::from(post.clone())).unwrap();
		assert_eq!(json["slug"], "s");
		assert_eq!(json["source"], "mdx");
		assert_eq!(json["reading_time"], "2분");
		assert_eq!(json["views_label"], "1K+");
		assert!(json.get("id").is_none());

		let summary = serde_json::to_value(PostSummary::from(&post)).unwrap();
		assert!(summary.get("content").is_none());
		assert_eq!(summary["date"], "2025-02-01");
	}
}
