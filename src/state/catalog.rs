/// Catalog entity and category tag
///
/// A `Catalog` is one named category ("food" or "drink"): the directory that
/// holds one canonical image per item, the word used in captions, and the
/// ordered list of item names. The list and the directory are kept in
/// one-to-one correspondence by the mutator.

use crate::error::{CatalogError, Result};
use crate::imaging::CANONICAL_EXT;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, RwLock};

/// The two catalogs the store knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Drink,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Food, Category::Drink];

    /// Identifier callers use ("food" / "drink")
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Drink => "drink",
        }
    }

    /// Sub-directory name, both under the data root and in the bundled assets
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Food => "foods",
            Category::Drink => "drinks",
        }
    }

    /// Verb shown in recommendation captions
    pub fn display_word(&self) -> &'static str {
        match self {
            Category::Food => "吃",
            Category::Drink => "喝",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "food" => Ok(Category::Food),
            "drink" => Ok(Category::Drink),
            other => Err(CatalogError::UnknownCategory(other.to_string())),
        }
    }
}

/// One category of items backed by image files
#[derive(Debug)]
pub struct Catalog {
    category: Category,
    display_word: String,
    directory: PathBuf,
    /// Item names in load/add order
    items: RwLock<Vec<String>>,
    /// Held for the whole of an add/remove, including file I/O
    write_lock: Mutex<()>,
}

impl Catalog {
    pub fn new(category: Category, directory: PathBuf, items: Vec<String>) -> Self {
        Self {
            category,
            display_word: category.display_word().to_string(),
            directory,
            items: RwLock::new(items),
            write_lock: Mutex::new(()),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn display_word(&self) -> &str {
        &self.display_word
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Snapshot of the item names
    pub fn items(&self) -> Vec<String> {
        self.items.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|item| item == name)
    }

    /// Path of the canonical image for `name`
    pub fn image_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", name, CANONICAL_EXT))
    }

    /// Serialize mutations on this catalog
    pub(crate) fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn push_item(&self, name: String) {
        self.items
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(name);
    }

    /// Remove `name` if present; returns whether it was listed
    pub(crate) fn remove_item(&self, name: &str) -> bool {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        let before = items.len();
        items.retain(|item| item != name);
        items.len() != before
    }
}

/// Whether `name` stays a single file name inside the catalog directory
pub(crate) fn is_path_safe(name: &str) -> bool {
    !name.contains(['/', '\\', '\0'])
}

/// Whether `name` can be an item: non-empty, not hidden, path safe, and not
/// already ending in the canonical extension
pub(crate) fn is_item_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && is_path_safe(name)
        && !name.ends_with(&format!(".{}", CANONICAL_EXT))
}

/// Read-only snapshot of a catalog's item names
pub fn list_items(catalog: &Catalog) -> Vec<String> {
    catalog.items()
}
