//! Content file parsing
//!
//! A content file starts with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: 2025년 금리 전망
//! date: 2025-01-15
//! tags: [금리, 대출]
//! series: 금리 시리즈
//! ---
//! 본문...
//! ```

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

use crate::post::{ContentPost, PostSource};

#[derive(Debug, Error)]
pub enum FrontmatterError {
	#[error("missing frontmatter block")]
	Missing,
	#[error("unterminated frontmatter block")]
	Unterminated,
	#[error("invalid frontmatter: {0}")]
	Yaml(#[from] serde_yaml::Error),
	#[error("invalid {field} date: {value}")]
	Date { field: &'static str, value: String },
	#[error("title is empty")]
	EmptyTitle,
}

/// Metadata keys recognised at the head of a content file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Frontmatter {
	pub title: String,
	/// Informational only; files are keyed by their name
	#[serde(default)]
	pub slug: Option<String>,
	#[serde(default)]
	pub description: String,
	pub date: String,
	#[serde(default)]
	pub base_date: Option<String>,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub series: Option<String>,
	#[serde(default)]
	pub views: Option<i64>,
}

/// Split `text` into its frontmatter and body
pub fn split_frontmatter(text: &str) -> Result<(Frontmatter, &str), FrontmatterError> {
	let text = text.strip_prefix('\u{feff}').unwrap_or(text);
	let rest = text
		.strip_prefix("---\n")
		.or_else(|| text.strip_prefix("---\r\n"))
		.ok_or(FrontmatterError::Missing)?;

	let mut offset = 0;
	for line in rest.split_inclusive('\n') {
		if line.trim_end() == "---" {
			let yaml = &rest[..offset];
			let body = &rest[offset + line.len()..];
			let meta: Frontmatter = serde_yaml::from_str(yaml)?;
			return Ok((meta, body.trim_start_matches(['\r', '\n'])));
		}
		offset += line.len();
	}
	Err(FrontmatterError::Unterminated)
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FrontmatterError> {
	let value = value.trim();
	NaiveDate::parse_from_str(value, "%Y-%m-%d")
		.or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
		.map_err(|_| FrontmatterError::Date {
			field,
			value: value.to_string(),
		})
}

/// Parse a whole content file into a post keyed by `slug`
pub fn parse_post(slug: &str, text: &str) -> Result<ContentPost, FrontmatterError> {
	let (meta, body) = split_frontmatter(text)?;
	let title = meta.title.trim();
	if title.is_empty() {
		return Err(FrontmatterError::EmptyTitle);
	}
	let date = parse_date("date", &meta.date)?;
	let base_date = match meta.base_date.as_deref().map(str::trim) {
		Some(raw) if !raw.is_empty() => Some(parse_date("base_date", raw)?),
		_ => None,
	};

	Ok(ContentPost {
		id: None,
		slug: slug.to_string(),
		title: title.to_string(),
		description: meta.description.trim().to_string(),
		content: body.to_string(),
		date,
		base_date,
		tags: finlog_core::tags::normalize_tags(meta.tags),
		series: meta.series.filter(|s| !s.trim().is_empty()),
		views: meta.views.unwrap_or(0),
		source: PostSource::Mdx,
	})
}
