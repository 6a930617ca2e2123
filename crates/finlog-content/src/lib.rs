//! # finlog-content
//!
//! Public posts come from two places: content files on disk
//! ([`MdxSource`]) and published database rows (any [`RecordSource`]).
//! [`ContentResolver`] merges them, letting files win on slug collisions,
//! and the [`derived`] module computes reading time and view labels at
//! read time.
//!
//! ```text
//! content/posts/*.mdx ──┐
//!                       ├─> ContentResolver ─> list_all / get_by_slug / list_slugs
//! posts (published) ────┘
//! ```

pub mod derived;
pub mod frontmatter;
pub mod post;
pub mod related;
pub mod resolver;
pub mod source;
pub mod view;

pub use derived::{plain_text, reading_minutes, reading_time, views_label};
pub use frontmatter::{Frontmatter, FrontmatterError, parse_post, split_frontmatter};
pub use post::{ContentPost, PostSource};
pub use related::{DEFAULT_RELATED_LIMIT, related_posts, score};
pub use resolver::{ContentResolver, TagCount};
pub use source::{MdxSource, RecordSource};
pub use view::{PostSummary, PostView};
