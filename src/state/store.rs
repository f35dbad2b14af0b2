/// Catalog store: one-time seeding and loading from disk
///
/// On-disk layout under the data root:
/// - `.initialized` marker, written after the first seeding pass
/// - `foods/<name>.jpg`
/// - `drinks/<name>.jpg`
///
/// Seeding copies the bundled default images (normalized to the canonical
/// form) into place exactly once, never overwriting a file that is already
/// there. Loading scans each category directory for canonical images.

use super::catalog::{is_item_name, Catalog, Category};
use crate::config::Config;
use crate::error::Result;
use crate::imaging::normalize::{normalize, ImageSource, CANONICAL_EXT};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Name of the seeding marker file in the data root
pub const INIT_MARKER: &str = ".initialized";

/// What seeding did for one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeed {
    pub category: Category,
    /// Destination file names written
    pub copied: Vec<String>,
    /// Destination file names that already existed
    pub skipped: Vec<String>,
    /// Source files that could not be copied, with the reason
    pub failed: Vec<(PathBuf, String)>,
    /// The bundled assets directory for this category was not found
    pub source_missing: bool,
    /// The destination directory could not be created
    pub destination_failed: bool,
}

impl CategorySeed {
    fn new(category: Category) -> Self {
        Self {
            category,
            copied: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            source_missing: false,
            destination_failed: false,
        }
    }
}

/// Outcome of a seeding pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    /// The marker was already present, nothing was looked at
    pub already_initialized: bool,
    pub categories: Vec<CategorySeed>,
    pub marker_written: bool,
}

impl SeedReport {
    /// Total number of files written across categories
    pub fn copied_count(&self) -> usize {
        self.categories.iter().map(|c| c.copied.len()).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.categories.iter().map(|c| c.failed.len()).sum()
    }
}

/// Owns both catalogs for the lifetime of the host
#[derive(Debug)]
pub struct CatalogStore {
    data_root: PathBuf,
    food: Catalog,
    drink: Catalog,
    seed_report: SeedReport,
}

impl CatalogStore {
    /// Seed (if needed) and load both catalogs from `data_root`
    ///
    /// Safe to call at every startup. Only failing to create `data_root` or to
    /// read an existing category directory is an error; individual seed file
    /// failures are recorded in the seed report.
    pub fn initialize(data_root: impl Into<PathBuf>, assets_dir: impl AsRef<Path>) -> Result<Self> {
        let data_root = data_root.into();
        fs::create_dir_all(&data_root)?;

        let seed_report = seed_from_assets(&data_root, assets_dir.as_ref());

        let food = load_catalog(Category::Food, &data_root)?;
        let drink = load_catalog(Category::Drink, &data_root)?;

        info!("📁 Loaded food items: {:?}", food.items());
        info!("📁 Loaded drink items: {:?}", drink.items());

        Ok(Self {
            data_root,
            food,
            drink,
            seed_report,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::initialize(config.data_root.clone(), &config.assets_dir)
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn food(&self) -> &Catalog {
        &self.food
    }

    pub fn drink(&self) -> &Catalog {
        &self.drink
    }

    pub fn catalog(&self, category: Category) -> &Catalog {
        match category {
            Category::Food => &self.food,
            Category::Drink => &self.drink,
        }
    }

    /// Look up a catalog by its caller-facing identifier
    pub fn resolve_category(&self, identifier: &str) -> Result<&Catalog> {
        let category: Category = identifier.parse()?;
        Ok(self.catalog(category))
    }

    /// What the seeding pass of this startup did
    pub fn seed_report(&self) -> &SeedReport {
        &self.seed_report
    }
}

/// Copy the bundled defaults into `data_root` unless the marker says it's done
pub fn seed_from_assets(data_root: &Path, assets_dir: &Path) -> SeedReport {
    let marker = data_root.join(INIT_MARKER);
    if marker.is_file() {
        info!("Data already initialized, skip copying from assets");
        return SeedReport {
            already_initialized: true,
            ..SeedReport::default()
        };
    }

    let mut report = SeedReport::default();
    for category in Category::ALL {
        let src_dir = assets_dir.join(category.dir_name());
        let dst_dir = data_root.join(category.dir_name());
        report
            .categories
            .push(seed_category(category, &src_dir, &dst_dir));
    }

    if report.categories.iter().any(|c| c.destination_failed) {
        warn!("⚠️  Seeding incomplete, init marker not written; will retry next startup");
        return report;
    }

    match fs::write(&marker, format!("initialized {}\n", Utc::now().to_rfc3339())) {
        Ok(()) => report.marker_written = true,
        // Next startup simply seeds again; every file will be skipped
        Err(e) => warn!("⚠️  Failed to write init marker {}: {}", marker.display(), e),
    }

    report
}

fn seed_category(category: Category, src_dir: &Path, dst_dir: &Path) -> CategorySeed {
    let mut seed = CategorySeed::new(category);

    if let Err(e) = fs::create_dir_all(dst_dir) {
        warn!("⚠️  Cannot create {}: {}", dst_dir.display(), e);
        seed.failed.push((dst_dir.to_path_buf(), e.to_string()));
        seed.destination_failed = true;
        return seed;
    }

    if !src_dir.is_dir() {
        warn!("⚠️  Assets directory not found: {}", src_dir.display());
        seed.source_missing = true;
        return seed;
    }

    for entry in WalkDir::new(src_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(src_dir).to_path_buf();
                warn!("⚠️  Cannot read asset {}: {}", path.display(), e);
                seed.failed.push((path, e.to_string()));
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let stem = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem.to_string(),
            None => {
                warn!("⚠️  Skipping asset with non UTF-8 name {}", path.display());
                seed.failed.push((path.to_path_buf(), "non UTF-8 file name".to_string()));
                continue;
            }
        };
        if stem.starts_with('.') {
            continue;
        }
        if !is_item_name(&stem) {
            warn!("⚠️  Skipping asset {}, '{}' is not a valid item name", path.display(), stem);
            seed.failed.push((path.to_path_buf(), format!("invalid item name '{}'", stem)));
            continue;
        }

        let file_name = format!("{}.{}", stem, CANONICAL_EXT);
        let dest = dst_dir.join(&file_name);
        if dest.exists() {
            seed.skipped.push(file_name);
            continue;
        }

        match normalize(&ImageSource::Path(path.to_path_buf()), &dest) {
            Ok(()) => seed.copied.push(file_name),
            Err(e) => {
                warn!("⚠️  Failed to seed {}: {}", path.display(), e);
                seed.failed.push((path.to_path_buf(), e.to_string()));
            }
        }
    }

    info!(
        "✅ Initialized {} data from assets, copied {} files ({} skipped, {} failed)",
        category.dir_name(),
        seed.copied.len(),
        seed.skipped.len(),
        seed.failed.len()
    );
    seed
}

/// Build a catalog from the files currently in its directory
pub fn load_catalog(category: Category, data_root: &Path) -> Result<Catalog> {
    let directory = data_root.join(category.dir_name());
    let items = scan_items(&directory)?;
    Ok(Catalog::new(category, directory, items))
}

/// Item names for every canonical image in `dir`, sorted by file name
///
/// A missing directory is an empty catalog. Leftover temporary files from an
/// interrupted write are removed; other stray files are ignored.
pub fn scan_items(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with('.') {
            if file_name.ends_with(".tmp") {
                remove_stale_temp(path);
            }
            continue;
        }

        let is_canonical = path
            .extension()
            .map(|ext| ext == CANONICAL_EXT)
            .unwrap_or(false);
        if !is_canonical {
            warn!("⚠️  Ignoring non-canonical file {}", path.display());
            continue;
        }

        match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) if is_item_name(stem) => items.push(stem.to_string()),
            _ => warn!("⚠️  Ignoring file with invalid item name {}", path.display()),
        }
    }

    Ok(items)
}

fn remove_stale_temp(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("🔄 Removed leftover temp file {}", path.display()),
        Err(e) => warn!("⚠️  Cannot remove leftover temp file {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::imaging::normalize::tests::rgba_png;
    use tempfile::TempDir;

    /// Bundled assets with `foods/apple.png` and an empty `drinks/`
    fn assets_with_apple() -> TempDir {
        let assets = TempDir::new().unwrap();
        fs::create_dir_all(assets.path().join("foods")).unwrap();
        fs::create_dir_all(assets.path().join("drinks")).unwrap();
        fs::write(
            assets.path().join("foods").join("apple.png"),
            rgba_png(1200, 800, [200, 30, 30, 100]),
        )
        .unwrap();
        assets
    }

    #[test]
    fn test_fresh_root_seeds_and_normalizes() {
        let assets = assets_with_apple();
        let root = TempDir::new().unwrap();

        let store = CatalogStore::initialize(root.path(), assets.path()).unwrap();

        assert_eq!(store.food().items(), vec!["apple"]);
        assert!(store.drink().items().is_empty());
        assert!(root.path().join(INIT_MARKER).exists());

        let stored = image::open(root.path().join("foods").join("apple.jpg")).unwrap();
        assert!(stored.width() <= 500);
        assert!(!stored.color().has_alpha());
        assert!(!root.path().join("foods").join("apple.png").exists());

        let report = store.seed_report();
        assert!(!report.already_initialized);
        assert!(report.marker_written);
        assert_eq!(report.copied_count(), 1);
    }

    #[test]
    fn test_second_initialize_copies_nothing() {
        let assets = assets_with_apple();
        let root = TempDir::new().unwrap();

        let first = CatalogStore::initialize(root.path(), assets.path()).unwrap();
        let second = CatalogStore::initialize(root.path(), assets.path()).unwrap();

        assert_eq!(first.food().items(), second.food().items());
        assert_eq!(first.drink().items(), second.drink().items());
        assert!(second.seed_report().already_initialized);
        assert_eq!(second.seed_report().copied_count(), 0);
    }

    #[test]
    fn test_seeding_never_overwrites() {
        let assets = assets_with_apple();
        let root = TempDir::new().unwrap();
        let foods = root.path().join("foods");
        fs::create_dir_all(&foods).unwrap();
        fs::write(foods.join("apple.jpg"), b"custom").unwrap();

        let store = CatalogStore::initialize(root.path(), assets.path()).unwrap();

        assert_eq!(fs::read(foods.join("apple.jpg")).unwrap(), b"custom");
        assert_eq!(store.food().items(), vec!["apple"]);
        let food_seed = &store.seed_report().categories[0];
        assert_eq!(food_seed.skipped, vec!["apple.jpg"]);
        assert!(food_seed.copied.is_empty());
    }

    #[test]
    fn test_marker_present_skips_seeding() {
        let assets = assets_with_apple();
        let root = TempDir::new().unwrap();
        fs::write(root.path().join(INIT_MARKER), "initialized").unwrap();

        let store = CatalogStore::initialize(root.path(), assets.path()).unwrap();

        assert!(store.food().is_empty());
        assert!(!root.path().join("foods").exists());
    }

    #[test]
    fn test_missing_assets_is_not_an_error() {
        let root = TempDir::new().unwrap();
        let assets = root.path().join("no-assets");

        let store = CatalogStore::initialize(root.path().join("data"), &assets).unwrap();

        assert!(store.food().is_empty());
        assert!(store.drink().is_empty());
        let report = store.seed_report();
        assert!(report.categories.iter().all(|c| c.source_missing));
        assert!(report.marker_written);
    }

    #[test]
    fn test_bad_seed_file_does_not_abort() {
        let assets = assets_with_apple();
        fs::write(assets.path().join("foods").join("broken.png"), b"not a png").unwrap();
        fs::write(
            assets.path().join("drinks").join("tea.png"),
            rgba_png(40, 40, [0, 120, 0, 255]),
        )
        .unwrap();
        let root = TempDir::new().unwrap();

        let store = CatalogStore::initialize(root.path(), assets.path()).unwrap();

        assert_eq!(store.food().items(), vec!["apple"]);
        assert_eq!(store.drink().items(), vec!["tea"]);
        assert_eq!(store.seed_report().failed_count(), 1);
        assert!(!root.path().join("foods").join("broken.jpg").exists());
    }

    #[test]
    fn test_scan_skips_strays_and_cleans_temp_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(dir.path().join(".c.jpg.tmp"), b"x").unwrap();
        fs::create_dir_all(dir.path().join("sub.jpg")).unwrap();

        let items = scan_items(dir.path()).unwrap();

        assert_eq!(items, vec!["a", "b"]);
        assert!(!dir.path().join(".c.jpg.tmp").exists());
    }

    #[test]
    fn test_marker_write_failure_is_not_fatal() {
        let assets = assets_with_apple();
        let root = TempDir::new().unwrap();
        // A directory where the marker file should go makes the write fail
        fs::create_dir_all(root.path().join(INIT_MARKER)).unwrap();

        let first = CatalogStore::initialize(root.path(), assets.path()).unwrap();
        assert!(!first.seed_report().marker_written);
        assert_eq!(first.seed_report().copied_count(), 1);
        assert_eq!(first.food().items(), vec!["apple"]);

        let second = CatalogStore::initialize(root.path(), assets.path()).unwrap();
        let report = second.seed_report();
        assert!(!report.already_initialized);
        assert_eq!(report.copied_count(), 0);
        assert_eq!(report.categories[0].skipped, vec!["apple.jpg"]);
        assert_eq!(second.food().items(), vec!["apple"]);
    }

    #[test]
    fn test_destination_failure_leaves_marker_unwritten() {
        let assets = assets_with_apple();
        let root = TempDir::new().unwrap();
        // A file in place of the foods directory
        fs::write(root.path().join("foods"), b"in the way").unwrap();

        let store = CatalogStore::initialize(root.path(), assets.path()).unwrap();

        let report = store.seed_report();
        assert!(report.categories[0].destination_failed);
        assert!(!report.marker_written);
        assert!(!root.path().join(INIT_MARKER).exists());
        assert!(store.food().is_empty());

        // Once the obstacle is gone the next startup seeds the category
        fs::remove_file(root.path().join("foods")).unwrap();
        let store = CatalogStore::initialize(root.path(), assets.path()).unwrap();
        assert_eq!(store.food().items(), vec!["apple"]);
        assert!(store.seed_report().marker_written);
    }

    #[test]
    fn test_seed_skips_names_with_canonical_extension() {
        let assets = assets_with_apple();
        fs::write(
            assets.path().join("foods").join("cake.jpg.png"),
            rgba_png(20, 20, [1, 1, 1, 255]),
        )
        .unwrap();
        let root = TempDir::new().unwrap();

        let store = CatalogStore::initialize(root.path(), assets.path()).unwrap();

        assert_eq!(store.food().items(), vec!["apple"]);
        assert!(!root.path().join("foods").join("cake.jpg.jpg").exists());
        assert_eq!(store.seed_report().categories[0].failed.len(), 1);
    }

    #[test]
    fn test_scan_ignores_invalid_item_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cake.jpg.jpg"), b"x").unwrap();
        fs::write(dir.path().join("tea.jpg"), b"x").unwrap();

        assert_eq!(scan_items(dir.path()).unwrap(), vec!["tea"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let assets = assets_with_apple();
        let bad = OsStr::from_bytes(b"caf\xe9.png");
        let root = TempDir::new().unwrap();
        // Some filesystems refuse non UTF-8 names outright
        if fs::write(assets.path().join("foods").join(bad), rgba_png(8, 8, [0, 0, 0, 255])).is_err() {
            return;
        }
        let foods = root.path().join("foods");
        fs::create_dir_all(&foods).unwrap();
        fs::write(foods.join(OsStr::from_bytes(b"th\xe9.jpg")), b"x").unwrap();

        let store = CatalogStore::initialize(root.path(), assets.path()).unwrap();

        assert_eq!(store.food().items(), vec!["apple"]);
        assert_eq!(store.seed_report().categories[0].failed.len(), 1);
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(scan_items(&dir.path().join("missing")).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_category() {
        let root = TempDir::new().unwrap();
        let store = CatalogStore::initialize(root.path(), root.path().join("assets")).unwrap();

        assert_eq!(
            store.resolve_category("drink").unwrap().category(),
            Category::Drink
        );
        assert!(matches!(
            store.resolve_category("dessert"),
            Err(CatalogError::UnknownCategory(_))
        ));
    }
}
