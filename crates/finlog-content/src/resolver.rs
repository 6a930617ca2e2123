//! One public catalog out of two origins.
//!
//! File-origin posts always win: a database post whose slug matches a
//! content file is dropped from every result, published or not.

use finlog_core::Result;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::post::ContentPost;
use crate::related::related_posts;
use crate::source::{MdxSource, RecordSource};

/// A tag and how many posts carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
	pub tag: String,
	pub count: usize,
}

/// Merges file-origin and record-origin posts
#[derive(Clone)]
pub struct ContentResolver {
	files: MdxSource,
	records: Arc<dyn RecordSource>,
}

impl ContentResolver {
	pub fn new(files: MdxSource, records: Arc<dyn RecordSource>) -> Self {
		Self { files, records }
	}

	/// Every public post, newest first, one entry per slug
	#[tracing::instrument(skip(self))]
	pub async fn list_all(&self) -> Result<Vec<ContentPost>> {
		let mut posts = self.files.load_all().await?;
		let file_slugs: HashSet<String> = posts.iter().map(|p| p.slug.clone()).collect();

		for record in self.records.published_posts().await? {
			if file_slugs.contains(&record.slug) {
				tracing::debug!(slug = %record.slug, "database post shadowed by content file");
				continue;
			}
			posts.push(record.into());
		}

		posts.sort_by(|a, b| b.date.cmp(&a.date));
		Ok(posts)
	}

	/// The file-origin post for `slug`, else the published database post
	pub async fn get_by_slug(&self, slug: &str) -> Result<Option<ContentPost>> {
		if let Some(post) = self.files.load(slug).await? {
			return Ok(Some(post));
		}
		Ok(self.records.published_post(slug).await?.map(Into::into))
	}

	/// Union of file and published database slugs, sorted
	pub async fn list_slugs(&self) -> Result<Vec<String>> {
		let mut slugs: BTreeSet<String> = self
			.files
			.load_all()
			.await?
			.into_iter()
			.map(|p| p.slug)
			.collect();
		slugs.extend(
			self.records
				.published_posts()
				.await?
				.into_iter()
				.map(|p| p.slug),
		);
		Ok(slugs.into_iter().collect())
	}

	/// Public posts carrying `tag`, newest first
	pub async fn list_by_tag(&self, tag: &str) -> Result<Vec<ContentPost>> {
		let mut posts = self.list_all().await?;
		posts.retain(|p| p.has_tag(tag));
		Ok(posts)
	}

	/// Public posts of a series in reading order (oldest first)
	pub async fn list_by_series(&self, series: &str) -> Result<Vec<ContentPost>> {
		let mut posts = self.list_all().await?;
		posts.retain(|p| p.in_series(series));
		posts.reverse();
		Ok(posts)
	}

	/// Distinct tags with their post counts, most used first
	pub async fn all_tags(&self) -> Result<Vec<TagCount>> {
		let mut counts: HashMap<String, usize> = HashMap::new();
		for post in self.list_all().await? {
			for tag in post.tags {
				*counts.entry(tag).or_default() += 1;
			}
		}
		let mut tags: Vec<TagCount> = counts
			.into_iter()
			.map(|(tag, count)| TagCount { tag, count })
			.collect();
		tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
		Ok(tags)
	}

	/// Posts related to `post` among the public catalog
	pub async fn related(&self, post: &ContentPost, limit: usize) -> Result<Vec<ContentPost>> {
		let all = self.list_all().await?;
		Ok(related_posts(post, &all, limit)
			.into_iter()
			.cloned()
			.collect())
	}
}
