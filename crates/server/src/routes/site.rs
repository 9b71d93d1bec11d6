use axum::extract::{Query, State};
use axum::Json;
use service::blog::{BlogListing, BlogListingView, BlogQuery};
use service::layout::{ChromeQuery, Layout, PageChrome};
use service::SiteContext;

use crate::errors::ApiError;

/// Navbar, footer and floating buttons for one page.
pub async fn chrome(State(ctx): State<SiteContext>, Query(q): Query<ChromeQuery>) -> Json<PageChrome> {
    Json(Layout::new(&q).render(&ctx).await)
}

pub async fn blog(
    State(ctx): State<SiteContext>,
    Query(q): Query<BlogQuery>,
) -> Result<Json<BlogListingView>, ApiError> {
    let view = BlogListing::new(q).load(&ctx).await?;
    Ok(Json(view))
}
