//! Generic offset/limit list loader shared by every list screen.
//!
//! A [`PaginatedList`] owns one cursor and one row collection. `reset` starts
//! a new epoch: the collection is replaced wholesale with page 0 of the new
//! filter. `load_more` appends the page after the last acknowledged cursor.
//! Results that arrive for an epoch that has since been superseded are
//! dropped, so rapid filter changes settle on the last filter regardless of
//! response order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::PageCursor;
use crate::domain::errors::ApiError;
use crate::domain::ports::PageSource;

/// Page size used by list screens unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// What a `reset` or `load_more` call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was merged into the collection.
    Applied {
        /// Rows in the merged page.
        received: usize,
    },
    /// Nothing was requested: a fetch is pending or no further rows exist.
    Skipped,
    /// The response belonged to a superseded epoch and was dropped.
    Stale,
}

/// Fetch state of a list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListPhase {
    /// Nothing fetched or in flight.
    Idle,
    /// First page of the current epoch is being fetched.
    Loading,
    /// A continuation page is being fetched.
    LoadingMore,
    /// The first page failed; `retry` repeats it with the same filter.
    Failed(ApiError),
}

impl ListPhase {
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::Loading | Self::LoadingMore)
    }
}

/// Point-in-time copy of a list.
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    /// Loaded rows, in backend order.
    pub items: Vec<T>,
    /// Last acknowledged cursor.
    pub cursor: PageCursor,
    /// Fetch state.
    pub phase: ListPhase,
    /// Last failed continuation; already-loaded rows stay valid.
    pub load_more_error: Option<ApiError>,
}

struct ListState<T, F> {
    epoch: u64,
    filter: Option<F>,
    items: Vec<T>,
    cursor: PageCursor,
    phase: ListPhase,
    load_more_error: Option<ApiError>,
}

/// Paginated collection of `T` under filter `F`.
pub struct PaginatedList<T, F>
where
    T: Send + 'static,
    F: Send + Sync + 'static,
{
    source: Arc<dyn PageSource<T, F>>,
    limit: u64,
    state: Mutex<ListState<T, F>>,
}

impl<T, F> PaginatedList<T, F>
where
    T: Clone + Send + 'static,
    F: Clone + Send + Sync + 'static,
{
    /// Creates an empty list fetching `limit` rows per page.
    #[must_use]
    pub fn new(source: Arc<dyn PageSource<T, F>>, limit: u64) -> Self {
        let cursor = PageCursor::fresh(limit);
        Self {
            source,
            limit: cursor.limit,
            state: Mutex::new(ListState {
                epoch: 0,
                filter: None,
                items: Vec::new(),
                cursor,
                phase: ListPhase::Idle,
                load_more_error: None,
            }),
        }
    }

    /// Drops the collection and loads page 0 under `filter`.
    ///
    /// # Errors
    /// Returns the fetch failure when this reset is still current; the
    /// collection is then empty and the phase is [`ListPhase::Failed`].
    pub async fn reset(&self, filter: F) -> Result<LoadOutcome, ApiError> {
        let epoch = {
            let mut state = self.state.lock();
            state.epoch = state.epoch.wrapping_add(1);
            state.filter = Some(filter.clone());
            state.items.clear();
            state.cursor = PageCursor::fresh(self.limit);
            state.phase = ListPhase::Loading;
            state.load_more_error = None;
            state.epoch
        };
        debug!(epoch, limit = self.limit, "Resetting list");

        let result = self.source.fetch_page(&filter, 0, self.limit).await;

        let mut state = self.state.lock();
        if state.epoch != epoch {
            debug!(epoch, current = state.epoch, "Dropping stale first page");
            return Ok(LoadOutcome::Stale);
        }

        match result {
            Ok(page) => {
                let received = page.items.len();
                state.items = page.items;
                state.cursor = page.cursor;
                state.phase = ListPhase::Idle;
                debug!(epoch, received, total = state.cursor.total, "First page applied");
                Ok(LoadOutcome::Applied { received })
            }
            Err(e) => {
                warn!(epoch, error = %e, "First page failed");
                state.items.clear();
                state.phase = ListPhase::Failed(e.clone());
                Err(e)
            }
        }
    }

    /// Appends the next page, unless a fetch is pending or nothing is left.
    ///
    /// # Errors
    /// Returns the fetch failure; rows and cursor are left as they were.
    pub async fn load_more(&self) -> Result<LoadOutcome, ApiError> {
        let (epoch, filter, offset) = {
            let mut state = self.state.lock();
            if state.phase.is_in_flight() || !state.cursor.has_next {
                return Ok(LoadOutcome::Skipped);
            }
            let Some(filter) = state.filter.clone() else {
                return Ok(LoadOutcome::Skipped);
            };
            state.phase = ListPhase::LoadingMore;
            (state.epoch, filter, state.cursor.next_offset())
        };
        debug!(epoch, offset, "Loading next page");

        let result = self.source.fetch_page(&filter, offset, self.limit).await;

        let mut state = self.state.lock();
        if state.epoch != epoch {
            debug!(epoch, current = state.epoch, "Dropping stale continuation");
            return Ok(LoadOutcome::Stale);
        }
        state.phase = ListPhase::Idle;

        match result {
            Ok(page) => {
                let received = page.items.len();
                state.items.extend(page.items);
                state.cursor = page.cursor;
                state.load_more_error = None;
                debug!(epoch, received, has_next = state.cursor.has_next, "Page appended");
                Ok(LoadOutcome::Applied { received })
            }
            Err(e) => {
                warn!(epoch, offset, error = %e, "Continuation failed");
                state.load_more_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Repeats the last reset with the same filter.
    ///
    /// # Errors
    /// Same as [`Self::reset`].
    pub async fn retry(&self) -> Result<LoadOutcome, ApiError> {
        let filter = self.state.lock().filter.clone();
        match filter {
            Some(filter) => self.reset(filter).await,
            None => Ok(LoadOutcome::Skipped),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<T> {
        let state = self.state.lock();
        ListSnapshot {
            items: state.items.clone(),
            cursor: state.cursor,
            phase: state.phase.clone(),
            load_more_error: state.load_more_error.clone(),
        }
    }

    #[must_use]
    pub fn cursor(&self) -> PageCursor {
        self.state.lock().cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.state.lock().cursor.has_next
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().phase.is_in_flight()
    }

    /// Whether `reset` has been called at least once.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state.lock().epoch > 0
    }

    /// Filter of the current epoch.
    #[must_use]
    pub fn filter(&self) -> Option<F> {
        self.state.lock().filter.clone()
    }

    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.limit
    }
}

/// Scroll-driven continuation: a marker near the end of the rendered rows.
///
/// Loads the next page when the marker turns visible. Staying visible does
/// not trigger again; the list's own in-flight and end-of-data guards still
/// apply to every trigger.
#[derive(Debug, Default)]
pub struct Sentinel {
    visible: AtomicBool,
}

impl Sentinel {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            visible: AtomicBool::new(false),
        }
    }

    /// Records visibility and reports whether it just became visible.
    pub fn observe(&self, visible: bool) -> bool {
        let was_visible = self.visible.swap(visible, Ordering::SeqCst);
        visible && !was_visible
    }

    /// Feeds a visibility change, continuing `list` on a rising edge.
    ///
    /// # Errors
    /// Same as [`PaginatedList::load_more`].
    pub async fn on_visibility<T, F>(
        &self,
        list: &PaginatedList<T, F>,
        visible: bool,
    ) -> Result<LoadOutcome, ApiError>
    where
        T: Clone + Send + 'static,
        F: Clone + Send + Sync + 'static,
    {
        if self.observe(visible) {
            list.load_more().await
        } else {
            Ok(LoadOutcome::Skipped)
        }
    }
}
