//! Tag column codec.
//!
//! Tags are stored as a JSON array string. Reading is lenient: anything that
//! is not an array of strings degrades to an empty list instead of failing
//! the row.

/// Parse a stored tag column.
///
/// # Examples
///
/// ```
/// use finlog_core::tags::parse_tags;
///
/// assert_eq!(parse_tags(r#"["대출","DSR"]"#), vec!["대출", "DSR"]);
/// assert!(parse_tags("not json").is_empty());
/// ```
pub fn parse_tags(raw: &str) -> Vec<String> {
	serde_json::from_str::<Vec<String>>(raw).unwrap_or_default()
}

/// Encode tags for storage, keeping their order.
pub fn serialize_tags(tags: &[String]) -> String {
	serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

/// Trim tags, drop empty ones and collapse duplicates keeping the first occurrence.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut out: Vec<String> = Vec::new();
	for tag in tags {
		let tag = tag.as_ref().trim();
		if !tag.is_empty() && !out.iter().any(|t| t == tag) {
			out.push(tag.to_string());
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("")]
	#[case("null")]
	#[case("{\"a\":1}")]
	#[case("[1,2,3]")]
	#[case("[\"unterminated")]
	fn test_malformed_tags_degrade_to_empty(#[case] raw: &str) {
		assert!(parse_tags(raw).is_empty());
	}

	#[rstest]
	fn test_serialize_keeps_order() {
		let tags = vec!["주담대".to_string(), "금리".to_string()];
		let raw = serialize_tags(&tags);
		assert_eq!(raw, r#"["주담대","금리"]"#);
		assert_eq!(parse_tags(&raw), tags);
	}

	#[rstest]
	fn test_normalize_drops_blank_and_duplicates() {
		let tags = normalize_tags([" 대출 ", "", "대출", "DSR"]);
		assert_eq!(tags, vec!["대출", "DSR"]);
	}
}
