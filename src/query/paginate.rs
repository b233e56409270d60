//! Page slicing over an already filtered and sorted collection.

use serde::Serialize;

use crate::errors::AppError;

/// One page of results plus the totals a pager needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

/// Slice `records` into the 1-indexed `page` of `page_size` items.
///
/// A page past the end yields no items; it is not clamped to the last page.
pub fn paginate<T>(records: Vec<T>, page: usize, page_size: usize) -> Result<Page<T>, AppError> {
    if page_size == 0 {
        return Err(AppError::InvalidArgument(
            "pageSize must be a positive integer".to_string(),
        ));
    }
    if page == 0 {
        return Err(AppError::InvalidArgument(
            "page is 1-indexed and must be at least 1".to_string(),
        ));
    }

    let total_count = records.len();
    let total_pages = total_count.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);

    let items = if start >= total_count {
        Vec::new()
    } else {
        records.into_iter().skip(start).take(page_size).collect()
    };

    Ok(Page {
        items,
        page,
        page_size,
        total_pages,
        total_count,
    })
}
