//! Load-more controller
//!
//! Loading a page is split in two steps so it can run without holding the
//! controller across the network call:
//!
//! 1. [`PaginationController::begin`] checks the guards and hands out a
//!    [`Ticket`] together with the cursor to fetch.
//! 2. [`PaginationController::complete`] applies the fetched page, but only
//!    if the ticket is still the outstanding one.
//!
//! At most one ticket is outstanding at a time, so each accepted trigger
//! appends exactly one page, in request order.

use tracing::{debug, info, warn};

use super::state::PaginationState;
use crate::cms::{CmsError, PageSource, SearchResponse};
use crate::content::{PostPagination, PostSummary};
use crate::helpers::DateFormatter;

/// Proof of an outstanding page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Result of [`PaginationController::begin`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Begin {
    /// Fetch `cursor`, then call `complete` with the ticket
    Fetch { ticket: Ticket, cursor: String },
    /// Nothing to fetch
    Skip(LoadOutcome),
}

/// What a load-more trigger did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was appended
    Appended { count: usize, page: u32 },
    /// No next page cursor
    Exhausted,
    /// Another request is outstanding; the trigger was rejected
    Busy,
    /// A previous request failed; pagination is disabled
    Halted,
    /// The response belonged to a cancelled request and was discarded
    Stale,
}

/// Owns the pagination state and applies fetched pages to it
#[derive(Debug, Clone)]
pub struct PaginationController {
    state: PaginationState,
    formatter: DateFormatter,
    in_flight: Option<u64>,
    next_token: u64,
    failure: Option<String>,
}

impl PaginationController {
    /// Seed a controller with the statically loaded first page
    pub fn new(initial: PostPagination, formatter: DateFormatter) -> Self {
        Self::from_state(PaginationState::seed(initial), formatter)
    }

    pub fn from_state(state: PaginationState, formatter: DateFormatter) -> Self {
        Self {
            state,
            formatter,
            in_flight: None,
            next_token: 0,
            failure: None,
        }
    }

    /// Restore a halted controller, as saved by an earlier run
    pub fn with_failure(mut self, failure: Option<String>) -> Self {
        self.failure = failure;
        self
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn into_state(self) -> PaginationState {
        self.state
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.state.posts
    }

    /// Message of the failure that halted pagination
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the load-more control should be offered
    pub fn can_load_more(&self) -> bool {
        self.failure.is_none() && self.state.has_next_page()
    }

    /// Check the guards and reserve the next page request
    pub fn begin(&mut self) -> Begin {
        if self.failure.is_some() {
            return Begin::Skip(LoadOutcome::Halted);
        }
        let Some(cursor) = self.state.next_page.clone() else {
            return Begin::Skip(LoadOutcome::Exhausted);
        };
        if self.in_flight.is_some() {
            debug!("Load more rejected, a request is already in flight");
            return Begin::Skip(LoadOutcome::Busy);
        }

        self.next_token += 1;
        self.in_flight = Some(self.next_token);
        debug!(token = self.next_token, cursor = %cursor, "Requesting next page");
        Begin::Fetch {
            ticket: Ticket(self.next_token),
            cursor,
        }
    }

    /// Apply the outcome of a request started by [`begin`](Self::begin)
    ///
    /// On success the posts are appended and the cursor and page number are
    /// replaced. On failure the state is left untouched, pagination is halted
    /// and the error is returned.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<SearchResponse, CmsError>,
    ) -> Result<LoadOutcome, CmsError> {
        if self.in_flight != Some(ticket.0) {
            debug!(token = ticket.0, "Discarding response of a cancelled request");
            return Ok(LoadOutcome::Stale);
        }
        self.in_flight = None;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    "Loading page {} failed: {}",
                    self.state.page.saturating_add(1),
                    err
                );
                self.failure = Some(err.to_string());
                return Err(err);
            }
        };

        let posts: Vec<PostSummary> = response
            .results
            .iter()
            .map(|doc| PostSummary::from_document(doc, &self.formatter))
            .collect();
        let count = posts.len();
        let page = response
            .page
            .filter(|p| *p >= 1)
            .unwrap_or_else(|| self.state.page.saturating_add(1));

        self.state.append(posts, response.next_page, page);
        info!(
            "Loaded page {} ({} posts, {} total)",
            page,
            count,
            self.state.posts.len()
        );

        Ok(LoadOutcome::Appended { count, page })
    }

    /// Cancel the outstanding request, if any
    ///
    /// Its response will be discarded as [`LoadOutcome::Stale`].
    pub fn abandon(&mut self) -> bool {
        self.in_flight.take().is_some()
    }

    /// Cancel `ticket` if it is still the outstanding request
    pub(crate) fn release(&mut self, ticket: Ticket) {
        if self.in_flight == Some(ticket.0) {
            debug!(token = ticket.0, "Page request dropped before completion");
            self.in_flight = None;
        }
    }

    /// Fetch and append the next page
    ///
    /// If the returned future is dropped mid-request the ticket stays
    /// outstanding until [`abandon`](Self::abandon) is called.
    pub async fn load_next_page<S>(&mut self, source: &S) -> Result<LoadOutcome, CmsError>
    where
        S: PageSource + ?Sized,
    {
        let (ticket, cursor) = match self.begin() {
            Begin::Fetch { ticket, cursor } => (ticket, cursor),
            Begin::Skip(outcome) => return Ok(outcome),
        };
        let result = source.fetch_page(&cursor).await;
        self.complete(ticket, result)
    }
}
