//! The two post origins

use async_trait::async_trait;
use finlog_core::models::Post;
use finlog_core::Result;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::frontmatter::parse_post;
use crate::post::ContentPost;

/// Published database posts, as seen by the resolver
#[async_trait]
pub trait RecordSource: Send + Sync {
	/// Every post with `status = published`
	async fn published_posts(&self) -> Result<Vec<Post>>;

	/// The published post with this slug, if any
	async fn published_post(&self, slug: &str) -> Result<Option<Post>>;
}

/// File extensions read from the content directory, most preferred first.
/// When two files share a stem only the preferred one is used.
pub const CONTENT_EXTENSIONS: [&str; 2] = ["mdx", "md"];

/// Reads content files from one directory (non-recursive).
///
/// A file that cannot be read or parsed is logged and skipped.
#[derive(Debug, Clone)]
pub struct MdxSource {
	dir: PathBuf,
}

impl MdxSource {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Slug and extension rank of a content file path
	fn slug_of(path: &Path) -> Option<(String, usize)> {
		let ext = path.extension()?.to_str()?;
		let rank = CONTENT_EXTENSIONS.iter().position(|e| *e == ext)?;
		let slug = path.file_stem()?.to_str()?.to_string();
		Some((slug, rank))
	}

	async fn read_post(&self, path: &Path, slug: &str) -> Option<ContentPost> {
		let text = match tokio::fs::read_to_string(path).await {
			Ok(text) => text,
			Err(err) => {
				tracing::warn!(path = %path.display(), error = %err, "skipping unreadable content file");
				return None;
			}
		};
		match parse_post(slug, &text) {
			Ok(post) => Some(post),
			Err(err) => {
				tracing::warn!(path = %path.display(), error = %err, "skipping invalid content file");
				None
			}
		}
	}

	/// All parsable posts in the directory. A missing directory yields none.
	pub async fn load_all(&self) -> Result<Vec<ContentPost>> {
		let mut entries = match tokio::fs::read_dir(&self.dir).await {
			Ok(entries) => entries,
			Err(err) if err.kind() == ErrorKind::NotFound => {
				tracing::debug!(dir = %self.dir.display(), "content directory does not exist");
				return Ok(Vec::new());
			}
			Err(err) => return Err(err.into()),
		};

		let mut chosen: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();
		loop {
			let entry = match entries.next_entry().await {
				Ok(Some(entry)) => entry,
				Ok(None) => break,
				Err(err) => {
					tracing::warn!(dir = %self.dir.display(), error = %err, "content directory listing interrupted");
					break;
				}
			};
			let path = entry.path();
			let Some((slug, rank)) = Self::slug_of(&path) else {
				continue;
			};
			match entry.file_type().await {
				Ok(file_type) if file_type.is_file() => {}
				Ok(_) => continue,
				Err(err) => {
					tracing::warn!(path = %path.display(), error = %err, "skipping content entry");
					continue;
				}
			}
			match chosen.get(&slug) {
				Some((kept, _)) if *kept <= rank => {
					tracing::debug!(path = %path.display(), "content slug already provided by a preferred file");
				}
				_ => {
					chosen.insert(slug, (rank, path));
				}
			}
		}

		let mut posts = Vec::with_capacity(chosen.len());
		for (slug, (_, path)) in chosen {
			if let Some(post) = self.read_post(&path, &slug).await {
				posts.push(post);
			}
		}
		Ok(posts)
	}

	/// The post stored under `slug`, from the most preferred extension present
	pub async fn load(&self, slug: &str) -> Result<Option<ContentPost>> {
		if slug.is_empty() || slug.contains(['/', '\\']) || slug.starts_with('.') {
			return Ok(None);
		}
		for ext in CONTENT_EXTENSIONS {
			let path = self.dir.join(format!("{slug}.{ext}"));
			match tokio::fs::metadata(&path).await {
				Ok(meta) if meta.is_file() => return Ok(self.read_post(&path, slug).await),
				Ok(_) => continue,
				Err(err) if err.kind() == ErrorKind::NotFound => continue,
				Err(err) => {
					tracing::warn!(path = %path.display(), error = %err, "skipping content entry");
					continue;
				}
			}
		}
		Ok(None)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::*;
	use tempfile::TempDir;

	fn write(dir: &Path, name: &str, body: &str) {
		std::fs::write(dir.join(name), body).unwrap();
	}

	#[fixture]
	fn content_dir() -> TempDir {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "good.mdx", "---\ntitle: Good\ndate: 2025-01-02\n---\nbody");
		write(dir.path(), "plain.md", "---\ntitle: Plain\ndate: 2025-01-01\n---\nbody");
		write(dir.path(), "broken.mdx", "---\ntitle: Broken\n");
		write(dir.path(), "notes.txt", "ignored");
		std::fs::create_dir(dir.path().join("nested.mdx")).unwrap();
		dir
	}

	#[rstest]
	#[tokio::test]
	async fn test_load_all_skips_bad_files(content_dir: TempDir) {
		let source = MdxSource::new(content_dir.path());
		let mut slugs: Vec<_> = source
			.load_all()
			.await
			.unwrap()
			.into_iter()
			.map(|p| p.slug)
			.collect();
		slugs.sort();
		assert_eq!(slugs, vec!["good", "plain"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_load_single(content_dir: TempDir) {
		let source = MdxSource::new(content_dir.path());
		assert_eq!(source.load("plain").await.unwrap().unwrap().title, "Plain");
		assert!(source.load("broken").await.unwrap().is_none());
		assert!(source.load("missing").await.unwrap().is_none());
		assert!(source.load("../good").await.unwrap().is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_mdx_wins_over_md_on_every_path() {
		let dir = tempfile::tempdir().unwrap();
		for i in 0..30 {
			write(dir.path(), &format!("post-{i}.md"), "---\ntitle: MD\ndate: 2025-01-01\n---\nbody");
			write(dir.path(), &format!("post-{i}.mdx"), "---\ntitle: MDX\ndate: 2025-01-01\n---\nbody");
		}
		let source = MdxSource::new(dir.path());

		let listed = source.load_all().await.unwrap();
		assert_eq!(listed.len(), 30);
		for post in &listed {
			assert_eq!(post.title, "MDX");
			let single = source.load(&post.slug).await.unwrap().unwrap();
			assert_eq!(single.title, post.title);
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_broken_preferred_file_hides_slug_everywhere() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "rates.mdx", "---\ntitle: Broken\n");
		write(dir.path(), "rates.md", "---\ntitle: Rates\ndate: 2025-01-01\n---\nbody");
		let source = MdxSource::new(dir.path());

		assert!(source.load_all().await.unwrap().is_empty());
		assert!(source.load("rates").await.unwrap().is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_unreadable_entry_is_skipped() {
		let file = tempfile::NamedTempFile::new().unwrap();
		let source = MdxSource::new(file.path());
		assert!(source.load("anything").await.unwrap().is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_missing_directory_is_empty() {
		let source = MdxSource::new("/definitely/not/here/posts");
		assert!(source.load_all().await.unwrap().is_empty());
	}
}
