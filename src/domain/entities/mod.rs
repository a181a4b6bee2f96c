//! Domain entity definitions.

mod filter;
mod page;
mod record;
mod session;
mod token;
mod user;

pub use filter::{ApplicationFilter, ClientFilter, HouseFilter, ListFilter, NoFilter};
pub use page::{Page, PageBody, PageCursor, PaginationMeta};
pub use record::{EntityId, EntityKind, Record};
pub use session::{LoginGrant, Session, SessionStatus};
pub use token::AuthToken;
pub use user::{Role, User, UserId};
