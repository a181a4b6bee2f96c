//! Paged list responses and the cursor that tracks them.
//!
//! The backend answers list requests either with a bare JSON array or with an
//! envelope carrying `data` plus `pagination` metadata. [`PageBody`] accepts
//! both and [`PageBody::into_page`] normalizes them into a single [`Page`] so
//! nothing past the network boundary has to care which one arrived.

use serde::Deserialize;

use crate::domain::serde_utils::lenient_u64;

/// Position of one paginated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Offset of the most recently acknowledged page.
    pub offset: u64,
    /// Page size of the most recently acknowledged page, always positive.
    pub limit: u64,
    /// Total rows the backend reports for the current filter.
    pub total: u64,
    /// Whether rows exist beyond `offset + limit`.
    pub has_next: bool,
}

impl PageCursor {
    /// Cursor for a list that has not received any page yet.
    #[must_use]
    pub const fn fresh(limit: u64) -> Self {
        Self {
            offset: 0,
            limit: if limit == 0 { 1 } else { limit },
            total: 0,
            has_next: false,
        }
    }

    /// Offset of the page following the acknowledged one.
    #[must_use]
    pub const fn next_offset(&self) -> u64 {
        self.offset.saturating_add(self.limit)
    }
}

/// One normalized page of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Rows in backend order.
    pub items: Vec<T>,
    /// Position of this page in the result set.
    pub cursor: PageCursor,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(items: Vec<T>, cursor: PageCursor) -> Self {
        Self { items, cursor }
    }

    /// A bare, complete result set: nothing follows it.
    #[must_use]
    pub fn complete(items: Vec<T>, requested_offset: u64, requested_limit: u64) -> Self {
        let received = items.len() as u64;
        let cursor = PageCursor {
            offset: requested_offset,
            limit: requested_limit.max(1),
            total: requested_offset.saturating_add(received),
            has_next: false,
        };
        Self { items, cursor }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `pagination` object of an enveloped list response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Offset of the first row.
    #[serde(default, with = "lenient_u64::option")]
    pub offset: Option<u64>,
    /// Page size applied by the backend.
    #[serde(default, with = "lenient_u64::option")]
    pub limit: Option<u64>,
    /// Rows matching the filter.
    #[serde(default, with = "lenient_u64::option")]
    pub total: Option<u64>,
    /// Page count at this limit.
    #[serde(default, with = "lenient_u64::option")]
    pub total_pages: Option<u64>,
    /// Whether rows follow this page.
    #[serde(default, alias = "hasNext")]
    pub has_next_page: Option<bool>,
    /// Whether rows precede this page.
    #[serde(default)]
    pub has_prev_page: Option<bool>,
}

/// Raw list response in either of the shapes the backend produces.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PageBody<T> {
    /// Plain array: the whole result set.
    Bare(Vec<T>),
    /// `{ data, pagination }` envelope.
    Enveloped {
        data: Vec<T>,
        #[serde(default)]
        pagination: Option<PaginationMeta>,
    },
}

impl<T> PageBody<T> {
    /// Normalizes the response against the offset and limit that were requested.
    #[must_use]
    pub fn into_page(self, requested_offset: u64, requested_limit: u64) -> Page<T> {
        match self {
            Self::Bare(items) | Self::Enveloped { data: items, pagination: None } => {
                Page::complete(items, requested_offset, requested_limit)
            }
            Self::Enveloped {
                data,
                pagination: Some(meta),
            } => {
                let offset = meta.offset.unwrap_or(requested_offset);
                let limit = meta.limit.filter(|l| *l > 0).unwrap_or(requested_limit).max(1);
                let received = data.len() as u64;
                let total = meta
                    .total
                    .unwrap_or_else(|| offset.saturating_add(received));
                let has_next = meta.has_next_page.unwrap_or_else(|| {
                    if meta.total.is_some() {
                        offset.saturating_add(limit) < total
                    } else {
                        received == limit
                    }
                });

                Page::new(
                    data,
                    PageCursor {
                        offset,
                        limit,
                        total,
                        has_next,
                    },
                )
            }
        }
    }
}
