//! Page source port used by paginated lists.

use async_trait::async_trait;

use crate::domain::entities::Page;
use crate::domain::errors::ApiError;

/// Fetches one page of `T` under filter `F`.
#[async_trait]
pub trait PageSource<T, F>: Send + Sync
where
    T: Send + 'static,
    F: Send + Sync + 'static,
{
    /// Fetches rows `offset..offset + limit`, already normalized.
    async fn fetch_page(&self, filter: &F, offset: u64, limit: u64) -> Result<Page<T>, ApiError>;
}
