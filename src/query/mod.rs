//! In-memory query layer: filter, sort, paginate, conflict checks and stats.
//!
//! Everything here is pure and synchronous. Callers hand in a snapshot of a
//! collection and get a new vector (or aggregate) back.

mod conflict;
mod filter;
mod paginate;
mod sort;
mod stats;

pub use conflict::*;
pub use filter::*;
pub use paginate::*;
pub use sort::*;
pub use stats::*;

use crate::errors::AppError;

/// A complete list request: filter, then sort, then slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<S> {
    pub filter: Filter<S>,
    pub sort_by: SortKey,
    pub sort_order: Option<SortOrder>,
    pub page: usize,
    pub page_size: usize,
}

/// Run the filter, sort, paginate pipeline over `records`.
pub fn run_query<T>(records: &[T], query: &ListQuery<T::Status>) -> Result<Page<T>, AppError>
where
    T: Filterable + Sortable + Clone,
{
    let filtered = filter_records(records, &query.filter);
    let sorted = sort_records(filtered, query.sort_by, query.sort_order);
    paginate(sorted, query.page, query.page_size)
}
