//! # Paginated Enumeration
//!
//! Both directories expose offset/page-numbered list endpoints. [`collect_pages`]
//! walks such an endpoint to the end with two stop conditions:
//!
//! - a page shorter than the requested size (including an empty page) is the
//!   end-of-data signal and terminates enumeration normally;
//! - a hard page ceiling bounds worst-case run time and memory against a
//!   runaway remote. Hitting it truncates the result (`truncated = true`)
//!   rather than failing.

/// Coordinates of one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page number.
    pub index: usize,
    /// Zero-based offset of the first record (`index * size`).
    pub offset: usize,
    /// Requested page length.
    pub size: usize,
}

/// Records collected across pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    /// All records, in remote order.
    pub items: Vec<T>,
    /// Number of page fetches performed.
    pub pages_fetched: usize,
    /// True when the page ceiling stopped enumeration on a full page.
    pub truncated: bool,
}

impl<T> Paged<T> {
    /// A single unpaged batch.
    pub fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            pages_fetched: 1,
            truncated: false,
        }
    }
}

/// Fetch pages until end-of-data or `max_pages`.
///
/// Zero `page_size` or `max_pages` are clamped to 1. Errors from `fetch`
/// are returned unchanged and discard the pages collected so far.
pub fn collect_pages<T, E, F>(page_size: usize, max_pages: usize, mut fetch: F) -> Result<Paged<T>, E>
where
    F: FnMut(PageRequest) -> Result<Vec<T>, E>,
{
    let size = page_size.max(1);
    let max_pages = max_pages.max(1);
    let mut items = Vec::new();

    for index in 0..max_pages {
        let page = fetch(PageRequest {
            index,
            offset: index * size,
            size,
        })?;
        let received = page.len();
        items.extend(page);

        tracing::debug!(page = index + 1, received, total = items.len(), "fetched page");

        if received < size {
            return Ok(Paged {
                items,
                pages_fetched: index + 1,
                truncated: false,
            });
        }
    }

    tracing::warn!(
        max_pages,
        page_size = size,
        total = items.len(),
        "page ceiling reached; enumeration truncated"
    );
    Ok(Paged {
        items,
        pages_fetched: max_pages,
        truncated: true,
    })
}
