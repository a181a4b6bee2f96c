//! Session guard, list controller and entity access.

mod catalog;
mod entity_client;
mod paginated_list;
mod session_guard;

pub use catalog::{CatalogTab, HouseCatalog};
pub use entity_client::{EntityClient, EntitySource};
pub use paginated_list::{
    DEFAULT_PAGE_SIZE, ListPhase, ListSnapshot, LoadOutcome, PaginatedList, Sentinel,
};
pub use session_guard::SessionGuard;
