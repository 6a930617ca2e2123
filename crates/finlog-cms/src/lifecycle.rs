//! Publish and unpublish actions on record-origin posts

use finlog_core::models::{Post, PostStatus};
use finlog_core::{Error, Result};
use finlog_db::PostRepository;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::revalidate::{CacheInvalidator, HOME_PATH, notify};

/// The two transitions exposed by the publish endpoint.
///
/// Other statuses are only reachable through a generic post update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
	Publish,
	Unpublish,
}

impl PublishAction {
	/// Status a post ends in after this action
	pub fn target_status(self) -> PostStatus {
		match self {
			PublishAction::Publish => PostStatus::Published,
			PublishAction::Unpublish => PostStatus::Draft,
		}
	}
}

impl fmt::Display for PublishAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			PublishAction::Publish => "publish",
			PublishAction::Unpublish => "unpublish",
		})
	}
}

impl FromStr for PublishAction {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"publish" => Ok(PublishAction::Publish),
			"unpublish" => Ok(PublishAction::Unpublish),
			_ => Err(Error::Validation(
				"Invalid action: expected \"publish\" or \"unpublish\"".to_string(),
			)),
		}
	}
}

/// Applies [`PublishAction`]s and tells the site cache about them
#[derive(Clone)]
pub struct PostLifecycle {
	posts: PostRepository,
	invalidator: Arc<dyn CacheInvalidator>,
}

impl PostLifecycle {
	pub fn new(posts: PostRepository, invalidator: Arc<dyn CacheInvalidator>) -> Self {
		Self { posts, invalidator }
	}

	/// Move post `id` to the action's target status.
	///
	/// Allowed from any current status. The first move into `published`
	/// stamps `published_at`; later moves keep that stamp.
	#[tracing::instrument(skip(self))]
	pub async fn apply(&self, id: i64, action: PublishAction) -> Result<Post> {
		let post = self.posts.set_status(id, action.target_status()).await?;
		tracing::info!(id, slug = %post.slug, %action, "post status changed");
		notify(self.invalidator.as_ref(), HOME_PATH).await;
		Ok(post)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("publish", PostStatus::Published)]
	#[case("unpublish", PostStatus::Draft)]
	fn test_action_targets(#[case] raw: &str, #[case] status: PostStatus) {
		let action: PublishAction = raw.parse().unwrap();
		assert_eq!(action.target_status(), status);
		assert_eq!(action.to_string(), raw);
	}

	#[rstest]
	#[case("archive")]
	#[case("pending_review")]
	#[case("Publish")]
	#[case("")]
	fn test_other_actions_are_rejected(#[case] raw: &str) {
		let err = raw.parse::<PublishAction>().unwrap_err();
		assert_eq!(err.status_code(), 400);
	}
}
