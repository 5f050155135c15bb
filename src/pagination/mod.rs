//! Pagination module
//!
//! Extends the statically generated first page with pages fetched on demand.
//!
//! # Overview
//!
//! [`PaginationState`] is seeded from the loader's first page.
//! [`PaginationController`] appends one page per accepted trigger and
//! halts after the first failure. [`SharedPagination`] wraps a controller
//! for callers that trigger loads from concurrent tasks.

mod controller;
mod shared;
mod state;

pub use controller::{Begin, LoadOutcome, PaginationController, Ticket};
pub use shared::SharedPagination;
pub use state::PaginationState;
