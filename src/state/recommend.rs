/// Random recommendations
///
/// Picks one item uniformly from a catalog snapshot. The chosen image file is
/// not checked for existence; the catalog is trusted to match its directory.

use super::catalog::Catalog;
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::PathBuf;

/// A picked item ready to be shown
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub name: String,
    pub image_path: PathBuf,
    pub caption: String,
}

/// Pick an item with the thread-local RNG; `None` when the catalog is empty
pub fn recommend(catalog: &Catalog) -> Option<Recommendation> {
    recommend_with(catalog, &mut rand::thread_rng())
}

/// Pick an item with a caller-supplied RNG
pub fn recommend_with<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Option<Recommendation> {
    let items = catalog.items();
    let name = items.choose(rng)?.clone();

    Some(Recommendation {
        image_path: catalog.image_path(&name),
        caption: caption(catalog.display_word(), &name),
        name,
    })
}

fn caption(word: &str, name: &str) -> String {
    format!("推荐你{}{}", word, name)
}
