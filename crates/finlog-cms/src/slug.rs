//! Slug derivation from titles

use finlog_core::{Error, Result};
use regex::Regex;
use std::future::Future;
use std::sync::LazyLock;

/// Longest slug produced by [`slugify`], in characters
pub const MAX_SLUG_CHARS: usize = 60;

/// Candidates tried by [`unique_slug`] before giving up
pub const MAX_SLUG_ATTEMPTS: u32 = 20;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static HYPHENS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

fn is_hangul(c: char) -> bool {
	matches!(c, '\u{AC00}'..='\u{D7A3}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}

fn is_kept(c: char) -> bool {
	c.is_ascii_lowercase() || c.is_ascii_digit() || is_hangul(c) || c.is_whitespace() || c == '-'
}

/// Derive a URL slug from a title.
///
/// Lower-cases, drops everything but `[a-z0-9]`, Hangul, whitespace and
/// hyphens, turns whitespace runs into one hyphen, collapses repeated
/// hyphens and truncates to [`MAX_SLUG_CHARS`] characters.
///
/// # Examples
///
/// ```
/// use finlog_cms::slugify;
///
/// assert_eq!(slugify("2025년 대출 가이드!"), "2025년-대출-가이드");
/// assert_eq!(slugify("  DSR -- 계산법 "), "dsr-계산법");
/// ```
pub fn slugify(title: &str) -> String {
	let kept: String = title.trim().to_lowercase().chars().filter(|c| is_kept(*c)).collect();
	let hyphenated = WHITESPACE_RE.replace_all(&kept, "-");
	let collapsed = HYPHENS_RE.replace_all(&hyphenated, "-");
	collapsed.chars().take(MAX_SLUG_CHARS).collect()
}

/// Find a free slug: `base`, then `base-1`, `base-2`, ...
///
/// `exists` reports whether a candidate is taken. After
/// [`MAX_SLUG_ATTEMPTS`] taken candidates the result is a conflict.
pub async fn unique_slug<F, Fut>(base: &str, mut exists: F) -> Result<String>
where
	F: FnMut(String) -> Fut,
	Fut: Future<Output = Result<bool>>,
{
	let mut candidate = base.to_string();
	for counter in 1..=MAX_SLUG_ATTEMPTS {
		if !exists(candidate.clone()).await? {
			return Ok(candidate);
		}
		candidate = format!("{base}-{counter}");
	}
	Err(Error::Conflict(format!(
		"Could not find a free slug for \"{base}\"; choose a more specific title"
	)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;
	use std::collections::HashSet;

	#[rstest]
	#[case("Hello World", "hello-world")]
	#[case("대출 가이드", "대출-가이드")]
	#[case("ETF vs. 펀드: 무엇을?", "etf-vs-펀드-무엇을")]
	#[case("a\t\n b", "a-b")]
	#[case("---a---b---", "-a-b-")]
	#[case("ㄱㄴ ᄀ", "ㄱㄴ-ᄀ")]
	#[case("Ünïcödé", "ncd")]
	#[case("!!!", "")]
	fn test_slugify(#[case] title: &str, #[case] expected: &str) {
		assert_eq!(slugify(title), expected);
	}

	#[rstest]
	fn test_truncates_by_characters() {
		let slug = slugify(&"가".repeat(100));
		assert_eq!(slug.chars().count(), MAX_SLUG_CHARS);
	}

	async fn resolve(taken: &HashSet<String>, base: &str) -> Result<String> {
		unique_slug(base, |candidate| {
			let hit = taken.contains(&candidate);
			async move { Ok(hit) }
		})
		.await
	}

	#[rstest]
	#[tokio::test]
	async fn test_unique_slug_appends_counter() {
		let mut taken = HashSet::new();
		assert_eq!(resolve(&taken, "대출-가이드").await.unwrap(), "대출-가이드");

		taken.insert("대출-가이드".to_string());
		assert_eq!(resolve(&taken, "대출-가이드").await.unwrap(), "대출-가이드-1");

		taken.insert("대출-가이드-1".to_string());
		assert_eq!(resolve(&taken, "대출-가이드").await.unwrap(), "대출-가이드-2");
	}

	#[rstest]
	#[tokio::test]
	async fn test_unique_slug_gives_up_after_twenty() {
		let mut taken: HashSet<String> = HashSet::from(["s".to_string()]);
		for n in 1..19 {
			taken.insert(format!("s-{n}"));
		}
		assert_eq!(resolve(&taken, "s").await.unwrap(), "s-19");

		taken.insert("s-19".to_string());
		let err = resolve(&taken, "s").await.unwrap_err();
		assert_eq!(err.status_code(), 409);
	}

	proptest! {
		#[test]
		fn prop_slug_shape(title in "\\PC{0,120}") {
			let slug = slugify(&title);
			prop_assert!(slug.chars().count() <= MAX_SLUG_CHARS);
			prop_assert!(!slug.contains("--"));
			prop_assert!(slug.chars().all(|c| c == '-' || c.is_ascii_lowercase() || c.is_ascii_digit() || is_hangul(c)));
		}
	}
}
