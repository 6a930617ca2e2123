//! Typed request and response bodies of the JSON API
//!
//! Admin bodies reject unknown fields. Dates travel as `YYYY-MM-DD` strings
//! and are checked here, so handlers only see parsed values.

use chrono::NaiveDate;
use finlog_core::models::{
	AdminUser, NewPost, NewTopic, PostStatus, PostUpdate, TopicPriority, TopicStatus, TopicUpdate,
};
use finlog_core::tags::normalize_tags;
use finlog_core::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	Option::<T>::deserialize(deserializer).map(Some)
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
	NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
		.map_err(|_| Error::Validation(format!("Invalid {field}: expected YYYY-MM-DD")))
}

fn parse_optional_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
	match raw.map(str::trim) {
		None | Some("") => Ok(None),
		Some(value) => parse_date(field, value).map(Some),
	}
}

fn non_blank(value: Option<String>) -> Option<String> {
	value
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

fn required(field: &str, value: Option<String>) -> Result<String> {
	non_blank(value).ok_or_else(|| Error::Validation(format!("{field} is required")))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub password: String,
}

impl LoginRequest {
	pub fn validate(&self) -> Result<()> {
		if self.username.trim().is_empty() || self.password.is_empty() {
			return Err(Error::Validation(
				"Username and password are required".to_string(),
			));
		}
		Ok(())
	}
}

/// Public view of the admin account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
	pub id: i64,
	pub username: String,
	pub display_name: String,
}

impl From<&AdminUser> for UserSummary {
	fn from(user: &AdminUser) -> Self {
		Self {
			id: user.id,
			username: user.username.clone(),
			display_name: user.display_name.clone(),
		}
	}
}

/// Body of `POST /api/admin/posts`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePostRequest {
	pub title: Option<String>,
	/// Derived from the title when blank
	pub slug: Option<String>,
	pub description: Option<String>,
	pub content: Option<String>,
	pub date: Option<String>,
	pub base_date: Option<String>,
	pub tags: Option<Vec<String>>,
	pub series: Option<String>,
	pub status: Option<PostStatus>,
}

impl CreatePostRequest {
	/// The requested slug, if one was given
	pub fn slug(&self) -> Option<String> {
		non_blank(self.slug.clone())
	}

	pub fn title(&self) -> Result<String> {
		required("title", self.title.clone())
	}

	/// Build the insert; `date` defaults to `today`.
	pub fn into_new_post(self, slug: String, today: NaiveDate) -> Result<NewPost> {
		let title = required("title", self.title)?;
		let content = self.content.unwrap_or_default();
		let date = parse_optional_date("date", self.date.as_deref())?.unwrap_or(today);

		let mut new = NewPost::draft(title, slug, content, date)
			.with_status(self.status.unwrap_or(PostStatus::Draft))
			.with_tags(normalize_tags(self.tags.unwrap_or_default()));
		new.description = self.description.unwrap_or_default();
		new.base_date = parse_optional_date("base_date", self.base_date.as_deref())?;
		new.series = non_blank(self.series);
		Ok(new)
	}
}

/// Body of `PUT /api/admin/posts/{id}`; absent fields are left alone
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePostRequest {
	pub title: Option<String>,
	pub slug: Option<String>,
	pub description: Option<String>,
	pub content: Option<String>,
	pub date: Option<String>,
	#[serde(default, deserialize_with = "double_option")]
	pub base_date: Option<Option<String>>,
	pub tags: Option<Vec<String>>,
	#[serde(default, deserialize_with = "double_option")]
	pub series: Option<Option<String>>,
	pub views: Option<i64>,
	pub status: Option<PostStatus>,
}

impl UpdatePostRequest {
	pub fn into_update(self) -> Result<PostUpdate> {
		let title = match self.title {
			Some(title) => Some(required("title", Some(title))?),
			None => None,
		};
		let slug = match self.slug {
			Some(slug) => Some(required("slug", Some(slug))?),
			None => None,
		};
		if matches!(self.views, Some(v) if v < 0) {
			return Err(Error::Validation("views must not be negative".to_string()));
		}
		Ok(PostUpdate {
			title,
			slug,
			description: self.description,
			content: self.content,
			date: self
				.date
				.as_deref()
				.map(|raw| parse_date("date", raw))
				.transpose()?,
			base_date: self
				.base_date
				.map(|raw| parse_optional_date("base_date", raw.as_deref()))
				.transpose()?,
			tags: self.tags.map(normalize_tags),
			series: self.series.map(non_blank),
			views: self.views,
			status: self.status,
		})
	}
}

/// Body of `POST /api/admin/posts/{id}/publish`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishRequest {
	#[serde(default)]
	pub action: String,
}

/// Body of `POST /api/admin/topics`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTopicRequest {
	pub title: Option<String>,
	pub description: Option<String>,
	pub tags: Option<Vec<String>>,
	pub series: Option<String>,
	pub priority: Option<TopicPriority>,
	pub notes: Option<String>,
}

impl CreateTopicRequest {
	pub fn into_new_topic(self) -> Result<NewTopic> {
		let mut new = NewTopic::new(required("title", self.title)?)
			.with_tags(normalize_tags(self.tags.unwrap_or_default()))
			.with_priority(self.priority.unwrap_or(TopicPriority::Normal));
		new.description = self.description.unwrap_or_default();
		new.series = non_blank(self.series);
		new.notes = self.notes.unwrap_or_default();
		Ok(new)
	}
}

/// Body of `PUT /api/admin/topics/{id}`; `status` skips or restores a topic
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTopicRequest {
	pub title: Option<String>,
	pub description: Option<String>,
	pub tags: Option<Vec<String>>,
	#[serde(default, deserialize_with = "double_option")]
	pub series: Option<Option<String>>,
	pub priority: Option<TopicPriority>,
	pub status: Option<TopicStatus>,
	pub notes: Option<String>,
}

impl UpdateTopicRequest {
	pub fn into_update(self) -> Result<TopicUpdate> {
		let title = match self.title {
			Some(title) => Some(required("title", Some(title))?),
			None => None,
		};
		Ok(TopicUpdate {
			title,
			description: self.description,
			tags: self.tags.map(normalize_tags),
			series: self.series.map(non_blank),
			priority: self.priority,
			status: self.status,
			notes: self.notes,
		})
	}
}

/// Body of `POST /api/admin/topics/{id}/generate`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateRequest {
	pub mode: Option<String>,
}

/// Body of `POST /api/auto-post`, sent by the external generator
#[derive(Debug, Deserialize)]
pub struct AutoPostRequest {
	pub title: Option<String>,
	pub slug: Option<String>,
	pub description: Option<String>,
	pub content: Option<String>,
	pub date: Option<String>,
	pub base_date: Option<String>,
	pub tags: Option<Vec<String>>,
	pub series: Option<String>,
}

impl AutoPostRequest {
	/// A `pending_review`, auto-generated insert; `date` defaults to `today`.
	pub fn into_new_post(self, today: NaiveDate) -> Result<NewPost> {
		let (Some(title), Some(slug), Some(content)) = (
			non_blank(self.title),
			non_blank(self.slug),
			self.content.filter(|c| !c.trim().is_empty()),
		) else {
			return Err(Error::Validation(
				"title, slug and content are required".to_string(),
			));
		};
		let date = parse_optional_date("date", self.date.as_deref())?.unwrap_or(today);

		let mut new = NewPost::draft(title, slug, content, date)
			.with_status(PostStatus::PendingReview)
			.with_tags(normalize_tags(self.tags.unwrap_or_default()));
		new.description = self.description.unwrap_or_default();
		new.base_date = parse_optional_date("base_date", self.base_date.as_deref())?;
		new.series = non_blank(self.series);
		new.auto_generated = true;
		Ok(new)
	}
}
