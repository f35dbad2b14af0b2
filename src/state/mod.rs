/// Catalog state module
///
/// This module owns everything the catalogs remember:
/// - The catalog entity and category tag (catalog.rs)
/// - Seeding and loading from the data root (store.rs)
/// - Adding and removing items (mutate.rs)
/// - Random recommendations (recommend.rs)

pub mod catalog;
pub mod mutate;
pub mod recommend;
pub mod store;
