mod auth_port;
mod navigation_port;
mod page_source_port;
mod token_storage_port;
mod transport_port;

pub use auth_port::AuthPort;
pub use navigation_port::NavigationPort;
pub use page_source_port::PageSource;
pub use token_storage_port::{TOKEN_STORAGE_KEY, TokenStoragePort};
pub use transport_port::{ApiRequest, ApiResponse, HttpMethod, TransportPort};
