//! Related-post scoring

use crate::post::ContentPost;

/// Default number of related posts returned
pub const DEFAULT_RELATED_LIMIT: usize = 3;

const SAME_SERIES: u32 = 30;
const PER_SHARED_TAG: u32 = 10;
const NEARBY_DATE: u32 = 5;
const NEARBY_DAYS: i64 = 7;

/// Relatedness of `candidate` to `post`
pub fn score(post: &ContentPost, candidate: &ContentPost) -> u32 {
	let mut score = 0;

	if let (Some(a), Some(b)) = (post.series.as_deref(), candidate.series.as_deref()) {
		if !a.is_empty() && a == b {
			score += SAME_SERIES;
		}
	}

	let shared = post
		.tags
		.iter()
		.filter(|tag| candidate.tags.contains(tag))
		.count() as u32;
	score += PER_SHARED_TAG * shared;

	if (post.date - candidate.date).num_days().abs() < NEARBY_DAYS {
		score += NEARBY_DATE;
	}
	score
}

/// The `limit` best-scoring candidates, excluding `post` itself and
/// anything scoring zero. Equal scores keep their order in `candidates`.
pub fn related_posts<'a>(
	post: &ContentPost,
	candidates: &'a [ContentPost],
	limit: usize,
) -> Vec<&'a ContentPost> {
	let mut scored: Vec<(u32, &ContentPost)> = candidates
		.iter()
		.filter(|c| c.slug != post.slug)
		.map(|c| (score(post, c), c))
		.filter(|(score, _)| *score > 0)
		.collect();
	scored.sort_by(|a, b| b.0.cmp(&a.0));
	scored.into_iter().take(limit).map(|(_, c)| c).collect()
}
