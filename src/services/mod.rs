pub mod catalog;
pub mod debounce;
pub mod trends;

pub use catalog::{CatalogClient, TmdbCatalog};
pub use debounce::Debouncer;
pub use trends::{TrendRecorder, TrendRecorderHandle};
