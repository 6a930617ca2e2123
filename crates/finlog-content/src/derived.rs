//! Fields computed when a post is resolved, never stored

use regex::Regex;
use std::sync::LazyLock;

/// Characters read per minute
pub const CHARS_PER_MINUTE: usize = 350;

/// Multiplier applied to stored view counts before labelling
pub const VIEW_AMPLIFICATION: i64 = 100;

const VIEW_BUCKETS: [(i64, &str); 6] = [
	(10_000, "10K+"),
	(5_000, "5K+"),
	(1_000, "1K+"),
	(500, "500+"),
	(100, "100+"),
	(10, "10+"),
];

static CODE_FENCE_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?m)^\s*(```|~~~).*$").expect("valid regex"));
static MODULE_LINE_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?m)^\s*(import|export)\s.*$").expect("valid regex"));
static TAG_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid regex"));
static LINK_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").expect("valid regex"));
static SYNTAX_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[#*_>`~|\-=\[\](){}]").expect("valid regex"));

/// Strip markdown and JSX syntax, keeping the readable text
pub fn plain_text(content: &str) -> String {
	let text = CODE_FENCE_RE.replace_all(content, "");
	let text = MODULE_LINE_RE.replace_all(&text, "");
	let text = TAG_RE.replace_all(&text, "");
	let text = LINK_RE.replace_all(&text, "$1");
	SYNTAX_RE.replace_all(&text, "").into_owned()
}

/// Minutes to read `content`; never less than one
///
/// Counts the characters of the plain text, whitespace runs collapsed to a
/// single space.
///
/// # Examples
///
/// ```
/// use finlog_content::reading_minutes;
///
/// assert_eq!(reading_minutes(""), 1);
/// assert_eq!(reading_minutes(&"가".repeat(351)), 2);
/// ```
pub fn reading_minutes(content: &str) -> usize {
	let text = plain_text(content);
	let words = text.split_whitespace().collect::<Vec<_>>();
	let chars = words.iter().map(|w| w.chars().count()).sum::<usize>() + words.len().saturating_sub(1);
	chars.div_ceil(CHARS_PER_MINUTE).max(1)
}

/// Reading time label, e.g. `"3분"`
pub fn reading_time(content: &str) -> String {
	format!("{}분", reading_minutes(content))
}

/// Bucketed view label; `None` below the lowest bucket
///
/// # Examples
///
/// ```
/// use finlog_content::views_label;
///
/// assert_eq!(views_label(0), None);
/// assert_eq!(views_label(6).as_deref(), Some("500+"));
/// assert_eq!(views_label(250).as_deref(), Some("10K+"));
/// ```
pub fn views_label(views: i64) -> Option<String> {
	let amplified = views.saturating_mul(VIEW_AMPLIFICATION);
	VIEW_BUCKETS
		.iter()
		.find(|(threshold, _)| amplified >= *threshold)
		.map(|(_, label)| (*label).to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case(0, None)]
	#[case(1, Some("100+"))]
	#[case(4, Some("100+"))]
	#[case(5, Some("500+"))]
	#[case(10, Some("1K+"))]
	#[case(49, Some("1K+"))]
	#[case(50, Some("5K+"))]
	#[case(100, Some("10K+"))]
	#[case(-3, None)]
	fn test_views_label(#[case] views: i64, #[case] expected: Option<&str>) {
		assert_eq!(views_label(views).as_deref(), expected);
	}

	#[rstest]
	fn test_markup_is_not_counted() {
		let marked = "# 제목\n\n**굵게** [링크](https://example.com/very/long/path)\n<Callout type=\"info\">메모</Callout>\n```rust\n```";
		assert_eq!(plain_text(marked).split_whitespace().collect::<String>(), "제목굵게링크메모");
	}

	#[rstest]
	#[case(350, 1)]
	#[case(351, 2)]
	#[case(700, 2)]
	#[case(1051, 4)]
	fn test_reading_minutes_rounds_up(#[case] chars: usize, #[case] minutes: usize) {
		assert_eq!(reading_minutes(&"가".repeat(chars)), minutes);
	}

	#[rstest]
	fn test_spaces_between_words_are_counted() {
		let spaced = vec!["가"; 350].join(" ");
		assert_eq!(reading_time(&spaced), "2분");
	}

	#[rstest]
	fn test_whitespace_runs_count_once() {
		let padded = format!("\n\n  {}  \n", vec!["가"; 175].join(" \n\t "));
		assert_eq!(reading_minutes(&padded), 1);
	}

	proptest! {
		#[test]
		fn prop_reading_minutes_at_least_one(content in "\\PC*") {
			prop_assert!(reading_minutes(&content) >= 1);
		}
	}
}
