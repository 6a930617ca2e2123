//! Read-only API over the merged catalog

use finlog_content::{DEFAULT_RELATED_LIMIT, PostSource, PostSummary, PostView};
use finlog_core::{Error, Result};
use finlog_http::{Request, Response};
use serde_json::json;

use crate::state::AppState;

fn summaries<'a, I>(posts: I) -> Vec<PostSummary>
where
	I: IntoIterator<Item = &'a finlog_content::ContentPost>,
{
	posts.into_iter().map(PostSummary::from).collect()
}

/// `GET /api/posts?tag=&series=`
pub async fn list(state: AppState, request: Request) -> Result<Response> {
	let tag = request.query("tag").filter(|t| !t.trim().is_empty());
	let series = request.query("series").filter(|s| !s.trim().is_empty());

	let mut posts = state.resolver.list_all().await?;
	if let Some(tag) = &tag {
		posts.retain(|p| p.has_tag(tag));
	}
	if let Some(series) = &series {
		posts.retain(|p| p.in_series(series));
	}
	Response::ok().with_json(&json!({ "posts": summaries(&posts) }))
}

/// `GET /api/posts/{slug}` with up to three related posts
pub async fn detail(state: AppState, request: Request) -> Result<Response> {
	let slug = request.path_param("slug")?;
	let Some(post) = state.resolver.get_by_slug(slug).await? else {
		return Err(Error::NotFound("Post not found".to_string()));
	};
	let related = state.resolver.related(&post, DEFAULT_RELATED_LIMIT).await?;
	Response::ok().with_json(&json!({
		"post": PostView::from(post),
		"related": summaries(&related),
	}))
}

/// `GET /api/slugs`
pub async fn slugs(state: AppState, _request: Request) -> Result<Response> {
	let slugs = state.resolver.list_slugs().await?;
	Response::ok().with_json(&json!({ "slugs": slugs }))
}

/// `GET /api/tags`
pub async fn tags(state: AppState, _request: Request) -> Result<Response> {
	let tags = state.resolver.all_tags().await?;
	Response::ok().with_json(&json!({ "tags": tags }))
}

/// `GET /api/series/{name}`, oldest first
pub async fn series(state: AppState, request: Request) -> Result<Response> {
	let name = request.path_param("name")?;
	let posts = state.resolver.list_by_series(name).await?;
	Response::ok().with_json(&json!({ "series": name, "posts": summaries(&posts) }))
}

/// `POST /api/posts/{slug}/views`
///
/// File-origin counts live in the files and are left alone.
pub async fn record_view(state: AppState, request: Request) -> Result<Response> {
	let slug = request.path_param("slug")?;
	match state.resolver.get_by_slug(slug).await? {
		Some(post) if post.source == PostSource::Mdx => Ok(Response::no_content()),
		Some(post) => {
			state.posts.increment_views(&post.slug).await?;
			Ok(Response::no_content())
		}
		None => Err(Error::NotFound("Post not found".to_string())),
	}
}
