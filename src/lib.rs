//! Food and drink picture catalogs.
//!
//! Two catalogs ("food" and "drink") each keep a list of item names backed
//! one-to-one by canonical JPEG files under a data root. The store seeds the
//! catalogs once from bundled defaults, then callers add, remove, list and
//! pick random recommendations.

pub mod config;
pub mod error;
pub mod imaging;
pub mod logging;
pub mod state;

pub use config::Config;
pub use error::{CatalogError, Result};
pub use imaging::ImageSource;
pub use state::catalog::{list_items, Catalog, Category};
pub use state::mutate::{add, add_async, remove};
pub use state::recommend::{recommend, recommend_with, Recommendation};
pub use state::store::{CatalogStore, SeedReport};
