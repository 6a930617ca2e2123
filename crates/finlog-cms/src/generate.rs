//! Turning backlog topics into post skeletons

use chrono::Utc;
use finlog_core::models::{NewPost, Post, PostStatus, Topic, TopicStatus};
use finlog_core::{Error, Result};
use finlog_db::{PostRepository, TopicRepository};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;

use crate::revalidate::{CacheInvalidator, HOME_PATH, notify};
use crate::slug::{slugify, unique_slug};

/// How a topic becomes a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerateMode {
	/// A draft for a human to write; the topic moves to `in_progress`
	#[default]
	Draft,
	/// Queued for review as machine output; the topic is `completed`
	Auto,
}

impl GenerateMode {
	pub fn post_status(self) -> PostStatus {
		match self {
			GenerateMode::Draft => PostStatus::Draft,
			GenerateMode::Auto => PostStatus::PendingReview,
		}
	}

	pub fn topic_status(self) -> TopicStatus {
		match self {
			GenerateMode::Draft => TopicStatus::InProgress,
			GenerateMode::Auto => TopicStatus::Completed,
		}
	}

	pub fn auto_generated(self) -> bool {
		matches!(self, GenerateMode::Auto)
	}
}

impl FromStr for GenerateMode {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"draft" => Ok(GenerateMode::Draft),
			"auto" => Ok(GenerateMode::Auto),
			_ => Err(Error::Validation(
				"Invalid mode: expected \"draft\" or \"auto\"".to_string(),
			)),
		}
	}
}

/// Skeleton article body seeded with the title and tags
pub fn render_template(title: &str, tags: &[String]) -> String {
	let mut body = String::new();
	let _ = writeln!(body, "## 요약\n\n{title}에 대한 핵심 내용을 정리합니다.\n");
	if !tags.is_empty() {
		let hashtags: Vec<String> = tags.iter().map(|t| format!("#{t}")).collect();
		let _ = writeln!(body, "관련 키워드: {}\n", hashtags.join(" "));
	}
	let _ = writeln!(body, "## 분석\n\n(작성 예정)\n");
	let _ = writeln!(body, "## 실전 팁\n\n(작성 예정)\n");
	let _ = write!(body, "## 마무리\n\n(작성 예정)\n");
	body
}

/// A generated post together with the topic after its status change
#[derive(Debug, Clone, Serialize)]
pub struct Generated {
	pub post: Post,
	pub topic: Topic,
}

/// Creates posts from topics
#[derive(Clone)]
pub struct PostGenerator {
	posts: PostRepository,
	topics: TopicRepository,
	invalidator: Arc<dyn CacheInvalidator>,
}

impl PostGenerator {
	pub fn new(
		posts: PostRepository,
		topics: TopicRepository,
		invalidator: Arc<dyn CacheInvalidator>,
	) -> Self {
		Self {
			posts,
			topics,
			invalidator,
		}
	}

	/// Create a post from topic `topic_id` and advance the topic.
	///
	/// The slug comes from the title with `-1`, `-2`, ... appended on
	/// collision. A title that yields no slug characters is rejected.
	#[tracing::instrument(skip(self))]
	pub async fn generate(&self, topic_id: i64, mode: GenerateMode) -> Result<Generated> {
		let topic = self.topics.get(topic_id).await?;

		let base = slugify(&topic.title);
		if base.is_empty() {
			return Err(Error::Validation(
				"Topic title does not produce a usable slug".to_string(),
			));
		}
		let slug = unique_slug(&base, |candidate| {
			let posts = self.posts.clone();
			async move { posts.slug_exists(&candidate).await }
		})
		.await?;

		let mut new = NewPost::draft(
			topic.title.clone(),
			slug,
			render_template(&topic.title, &topic.tags),
			Utc::now().date_naive(),
		)
		.with_status(mode.post_status())
		.with_tags(topic.tags.clone());
		new.description = topic.description.clone();
		new.series = topic.series.clone();
		new.auto_generated = mode.auto_generated();

		let post = self.posts.create(&new).await?;
		let topic = self.topics.set_status(topic.id, mode.topic_status()).await?;
		tracing::info!(topic_id, post_id = post.id, slug = %post.slug, ?mode, "post generated from topic");

		notify(self.invalidator.as_ref(), HOME_PATH).await;
		Ok(Generated { post, topic })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_mode_outcomes() {
		assert_eq!(GenerateMode::Draft.post_status(), PostStatus::Draft);
		assert_eq!(GenerateMode::Draft.topic_status(), TopicStatus::InProgress);
		assert!(!GenerateMode::Draft.auto_generated());

		assert_eq!(GenerateMode::Auto.post_status(), PostStatus::PendingReview);
		assert_eq!(GenerateMode::Auto.topic_status(), TopicStatus::Completed);
		assert!(GenerateMode::Auto.auto_generated());
	}

	#[rstest]
	fn test_mode_parsing() {
		assert_eq!("auto".parse::<GenerateMode>().unwrap(), GenerateMode::Auto);
		assert_eq!("bulk".parse::<GenerateMode>().unwrap_err().status_code(), 400);
	}

	#[rstest]
	fn test_template_sections() {
		let body = render_template("ISA 계좌", &["절세".to_string(), "ISA".to_string()]);
		for heading in ["## 요약", "## 분석", "## 실전 팁", "## 마무리"] {
			assert!(body.contains(heading), "missing {heading}");
		}
		assert!(body.contains("ISA 계좌에 대한"));
		assert!(body.contains("#절세 #ISA"));
	}

	#[rstest]
	fn test_template_without_tags() {
		let body = render_template("T", &[]);
		assert!(!body.contains("관련 키워드"));
	}
}
