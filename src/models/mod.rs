pub mod movie;
pub mod request_state;
pub mod trending;

pub use movie::{CatalogPayload, Movie, CATALOG_FALLBACK_ERROR};
pub use request_state::{FeedDisplay, RequestState};
pub use trending::TrendingEntry;
