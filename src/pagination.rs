//! Page-number to limit/offset translation.

use serde::Serialize;

/// Results returned per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Slice of a result set to fetch: at most `limit` rows after skipping `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub limit: u32,
    pub offset: u64,
}

/// Translate a 1-based page number into a window of `page_size` rows.
///
/// Page numbers below 1 are clamped to 1 rather than rejected, so a
/// malformed page parameter degrades to the first page.
pub fn resolve_page(requested_page: i64, page_size: u32) -> PageWindow {
    let page = requested_page.max(1) as u64;
    PageWindow {
        limit: page_size,
        offset: (page - 1).saturating_mul(page_size as u64),
    }
}
