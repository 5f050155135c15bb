//! Content module - post summaries and their pages

mod post;

pub use post::{read_time_minutes, PostPagination, PostSummary, WORDS_PER_MINUTE};
