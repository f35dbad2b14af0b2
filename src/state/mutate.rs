/// Adding and removing catalog items
///
/// Each mutation holds the catalog's write lock for its whole duration, so
/// two adds of the same name cannot both pass the existence check. The image
/// file is always written or deleted before the in-memory list changes.

use super::catalog::{is_item_name, is_path_safe, Catalog, Category};
use super::store::CatalogStore;
use crate::error::{CatalogError, Result};
use crate::imaging::normalize::{normalize, ImageSource};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Add `name` to `catalog` using exactly one source image
///
/// Returns the path of the stored canonical image.
pub fn add(catalog: &Catalog, name: &str, images: &[ImageSource]) -> Result<PathBuf> {
    let source = match images {
        [] => return Err(CatalogError::NoImageProvided),
        [source] => source,
        many => return Err(CatalogError::TooManyImages(many.len())),
    };
    if !is_item_name(name) {
        return Err(CatalogError::InvalidName(name.to_string()));
    }

    let _guard = catalog.lock_writes();

    let image_path = catalog.image_path(name);
    // An unlisted file with this name would otherwise be overwritten
    if catalog.contains(name) || image_path.exists() {
        return Err(CatalogError::AlreadyExists(name.to_string()));
    }

    if let Err(e) = normalize(source, &image_path) {
        error!("[{}] add {} failed: {}", catalog.category(), image_path.display(), e);
        return Err(e);
    }
    catalog.push_item(name.to_string());

    info!("➕ Added {} item '{}'", catalog.category(), name);
    Ok(image_path)
}

/// Remove `name` from `catalog`
///
/// Existence is decided by the image file, not by the in-memory list. Names
/// with path separators are `InvalidName`; other names no item can have
/// (empty, hidden, ending in `.jpg`) are `NotFound`.
pub fn remove(catalog: &Catalog, name: &str) -> Result<()> {
    if !is_path_safe(name) {
        return Err(CatalogError::InvalidName(name.to_string()));
    }
    if !is_item_name(name) {
        return Err(CatalogError::NotFound(name.to_string()));
    }

    let _guard = catalog.lock_writes();

    let image_path = catalog.image_path(name);
    if !image_path.is_file() {
        return Err(CatalogError::NotFound(name.to_string()));
    }

    if let Err(e) = fs::remove_file(&image_path) {
        error!("[{}] delete {} failed: {}", catalog.category(), image_path.display(), e);
        return Err(e.into());
    }
    catalog.remove_item(name);

    info!("➖ Removed {} item '{}'", catalog.category(), name);
    Ok(())
}

/// `add` on the blocking pool, for hosts running on tokio
pub async fn add_async(
    store: Arc<CatalogStore>,
    category: Category,
    name: String,
    images: Vec<ImageSource>,
) -> Result<PathBuf> {
    tokio::task::spawn_blocking(move || add(store.catalog(category), &name, &images))
        .await
        .map_err(|e| CatalogError::Task(e.to_string()))?
}
