//! Controller handle shared between concurrent triggers

use std::sync::{Arc, Mutex, MutexGuard};

use super::controller::{Begin, LoadOutcome, PaginationController, Ticket};
use crate::cms::{CmsError, PageSource};

/// Cloneable handle to a controller and the source it loads pages from
///
/// The lock is not held while a page is being fetched. A trigger that
/// arrives while another request is outstanding is rejected with
/// [`LoadOutcome::Busy`]; a request whose future is dropped releases its
/// ticket so the next trigger can proceed.
pub struct SharedPagination<S> {
    controller: Arc<Mutex<PaginationController>>,
    source: Arc<S>,
}

impl<S> Clone for SharedPagination<S> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: PageSource> SharedPagination<S> {
    pub fn new(controller: PaginationController, source: S) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            source: Arc::new(source),
        }
    }

    /// Fetch and append the next page
    pub async fn load_next_page(&self) -> Result<LoadOutcome, CmsError> {
        let begin = self.lock().begin();
        let (ticket, cursor) = match begin {
            Begin::Fetch { ticket, cursor } => (ticket, cursor),
            Begin::Skip(outcome) => return Ok(outcome),
        };

        let mut pending = Pending {
            controller: &self.controller,
            ticket: Some(ticket),
        };
        let result = self.source.fetch_page(&cursor).await;
        let ticket = pending.ticket.take().unwrap_or(ticket);

        self.lock().complete(ticket, result)
    }

    /// Copy of the controller, for rendering
    pub fn snapshot(&self) -> PaginationController {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PaginationController> {
        lock(&self.controller)
    }
}

/// Releases the ticket if the fetch never completes
struct Pending<'a> {
    controller: &'a Mutex<PaginationController>,
    ticket: Option<Ticket>,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            lock(self.controller).release(ticket);
        }
    }
}

fn lock(controller: &Mutex<PaginationController>) -> MutexGuard<'_, PaginationController> {
    controller
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
