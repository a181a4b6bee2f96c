//! Tabbed house catalog: houses and packages, each with its own list.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::{EntityClient, EntitySource, LoadOutcome, PaginatedList, Sentinel};
use crate::domain::entities::{EntityKind, HouseFilter, NoFilter, Record};
use crate::domain::errors::ApiError;

/// Tab of the house catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogTab {
    /// Houses with filters.
    #[default]
    Houses,
    /// House packages.
    Packages,
}

/// Both catalog tabs. Switching tabs never touches the other tab's cursor.
pub struct HouseCatalog {
    houses: PaginatedList<Record, HouseFilter>,
    packages: PaginatedList<Record, NoFilter>,
    sentinel: Sentinel,
    tab: Mutex<CatalogTab>,
}

impl HouseCatalog {
    #[must_use]
    pub fn new(client: &EntityClient, page_size: u64) -> Self {
        Self {
            houses: PaginatedList::new(
                Arc::new(EntitySource::new(client.clone(), EntityKind::Houses)),
                page_size,
            ),
            packages: PaginatedList::new(
                Arc::new(EntitySource::new(client.clone(), EntityKind::Packages)),
                page_size,
            ),
            sentinel: Sentinel::new(),
            tab: Mutex::new(CatalogTab::default()),
        }
    }

    #[must_use]
    pub fn tab(&self) -> CatalogTab {
        *self.tab.lock()
    }

    #[must_use]
    pub const fn houses(&self) -> &PaginatedList<Record, HouseFilter> {
        &self.houses
    }

    #[must_use]
    pub const fn packages(&self) -> &PaginatedList<Record, NoFilter> {
        &self.packages
    }

    /// Shows `tab`, loading its first page the first time it is opened.
    ///
    /// # Errors
    /// Returns the first-page failure of a tab opened for the first time.
    pub async fn select(&self, tab: CatalogTab) -> Result<LoadOutcome, ApiError> {
        *self.tab.lock() = tab;
        // Marker belongs to the list that was just hidden.
        self.sentinel.observe(false);
        debug!(?tab, "Catalog tab selected");

        match tab {
            CatalogTab::Houses if !self.houses.is_started() => {
                self.houses.reset(HouseFilter::default()).await
            }
            CatalogTab::Packages if !self.packages.is_started() => {
                self.packages.reset(NoFilter).await
            }
            _ => Ok(LoadOutcome::Skipped),
        }
    }

    /// Replaces the house filter; the packages tab is unaffected.
    ///
    /// # Errors
    /// Same as [`PaginatedList::reset`].
    pub async fn filter_houses(&self, filter: HouseFilter) -> Result<LoadOutcome, ApiError> {
        self.houses.reset(filter).await
    }

    /// Feeds the visibility of the end-of-list marker of the active tab.
    ///
    /// # Errors
    /// Same as [`PaginatedList::load_more`].
    pub async fn on_scroll_end(&self, visible: bool) -> Result<LoadOutcome, ApiError> {
        match self.tab() {
            CatalogTab::Houses => self.sentinel.on_visibility(&self.houses, visible).await,
            CatalogTab::Packages => self.sentinel.on_visibility(&self.packages, visible).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::SessionGuard;
    use crate::domain::ports::ApiResponse;
    use crate::domain::ports::mocks::{
        MockAuthPort, MockNavigationPort, MockTokenStorage, MockTransport,
    };
    use serde_json::json;

    async fn catalog() -> (Arc<MockTransport>, HouseCatalog) {
        let transport = Arc::new(MockTransport::new());
        let guard = Arc::new(SessionGuard::new(
            Arc::new(MockAuthPort::new()),
            Arc::new(MockTokenStorage::new()),
            transport.clone(),
            Arc::new(MockNavigationPort::new()),
        ));
        guard.login("manager", "password").await.unwrap();
        (transport.clone(), HouseCatalog::new(&EntityClient::new(guard), 2))
    }

    fn page(offset: u64, total: u64) -> ApiResponse {
        ApiResponse::json_value(
            200,
            &json!({
                "data": [{"id": offset + 1}, {"id": offset + 2}],
                "pagination": {"offset": offset, "limit": 2, "total": total}
            }),
        )
    }

    #[tokio::test]
    async fn test_tabs_keep_independent_cursors() {
        let (transport, catalog) = catalog().await;
        transport.push(Ok(page(0, 6)));
        transport.push(Ok(page(2, 6)));
        transport.push(Ok(page(0, 4)));

        catalog.select(CatalogTab::Houses).await.unwrap();
        catalog.on_scroll_end(true).await.unwrap();
        catalog.select(CatalogTab::Packages).await.unwrap();

        assert_eq!(catalog.houses().len(), 4);
        assert_eq!(catalog.houses().cursor().offset, 2);
        assert_eq!(catalog.packages().len(), 2);
        assert_eq!(catalog.packages().cursor().offset, 0);

        let paths: Vec<String> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["houses", "houses", "packages"]);
    }

    #[tokio::test]
    async fn test_reopening_tab_does_not_refetch() {
        let (transport, catalog) = catalog().await;
        transport.respond_with(page(0, 2));

        catalog.select(CatalogTab::Houses).await.unwrap();
        catalog.select(CatalogTab::Packages).await.unwrap();
        let outcome = catalog.select(CatalogTab::Houses).await.unwrap();

        assert_eq!(outcome, LoadOutcome::Skipped);
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(catalog.tab(), CatalogTab::Houses);
    }

    #[tokio::test]
    async fn test_house_filter_reaches_query() {
        let (transport, catalog) = catalog().await;
        transport.respond_with(page(0, 2));

        catalog
            .filter_houses(HouseFilter {
                project_id: "5".into(),
                ..HouseFilter::default()
            })
            .await
            .unwrap();

        let request = transport.requests().pop().unwrap();
        assert!(request.query.contains(&("project_id".to_string(), "5".to_string())));
        assert!(catalog.packages().filter().is_none());
    }
}
