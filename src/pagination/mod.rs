//! Pagination
//!
//! The Tally API pages with a 1-based page number; page 1 is implicit and
//! the walk stops at the first page that yields zero records.

mod strategies;
mod types;

pub use strategies::{PageNumberPaginator, SinglePagePaginator};
pub use types::{NextPage, PageTokenState, Paginator};
