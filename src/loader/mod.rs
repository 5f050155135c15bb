//! Static page loader
//!
//! Runs once at build time: queries the content service for the first page
//! of posts and hands it to the generator as the seed of the pagination state.

use tracing::info;

use crate::cms::{CmsResult, ContentClient, Predicate, QueryOptions};
use crate::config::ApiConfig;
use crate::content::PostPagination;
use crate::helpers::DateFormatter;

/// Query options for the home page listing
pub fn home_page_options(api: &ApiConfig) -> QueryOptions {
    let mut options = QueryOptions::default().page_size(api.page_size.max(1));
    if let Some(orderings) = api.orderings.as_deref().filter(|o| !o.trim().is_empty()) {
        options = options.orderings(orderings);
    }
    options
}

/// Fetch the first page of posts
///
/// Any failure is returned as-is; there is no partial or cached fallback.
pub async fn load_home_page(
    client: &ContentClient,
    api: &ApiConfig,
    formatter: &DateFormatter,
) -> CmsResult<PostPagination> {
    let predicates = [Predicate::document_type(api.document_type.as_str())];
    let response = client.query(&predicates, &home_page_options(api)).await?;

    let page = PostPagination::from_response(&response, formatter);
    info!(
        "Loaded {} {} (more pages: {})",
        page.results.len(),
        api.document_type,
        page.next_page.is_some()
    );
    Ok(page)
}
