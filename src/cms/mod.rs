//! Content service access
//!
//! Talks to a Prismic-style REST API: master ref discovery, predicate
//! searches, and cursor-following for pagination.

mod client;
mod error;
mod predicate;
mod types;

use async_trait::async_trait;
use std::sync::Arc;

pub use client::{ContentClient, QueryOptions};
pub use error::{CmsError, CmsResult};
pub use predicate::{build_query, Predicate};
pub use types::{
    ApiInfo, ApiRef, ContentSection, Document, DocumentData, RichTextBlock, SearchResponse,
    TextField,
};

/// Anything that can resolve a pagination cursor into a page of documents
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page a cursor points to
    async fn fetch_page(&self, cursor: &str) -> CmsResult<SearchResponse>;
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    async fn fetch_page(&self, cursor: &str) -> CmsResult<SearchResponse> {
        (**self).fetch_page(cursor).await
    }
}
