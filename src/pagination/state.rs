//! Pagination state

use serde::{Deserialize, Serialize};

use crate::content::{PostPagination, PostSummary};

/// Posts loaded so far, the cursor of the next page and the current page number
///
/// `posts` is in pagination order and is only ever appended to.
/// `next_page == None` means there is nothing left to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub posts: Vec<PostSummary>,
    pub next_page: Option<String>,
    pub page: u32,
}

impl PaginationState {
    /// Seed from the statically loaded first page
    pub fn seed(initial: PostPagination) -> Self {
        Self {
            posts: initial.results,
            next_page: initial.next_page,
            page: 1,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    pub(crate) fn append(&mut self, posts: Vec<PostSummary>, next_page: Option<String>, page: u32) {
        self.posts.extend(posts);
        self.next_page = next_page;
        self.page = page.max(1);
    }
}

impl From<PostPagination> for PaginationState {
    fn from(initial: PostPagination) -> Self {
        Self::seed(initial)
    }
}
