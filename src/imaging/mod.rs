/// Image ingestion module
///
/// Everything that touches pixels lives here. Catalog code only ever hands
/// over an `ImageSource` and a destination path.

pub mod normalize;

pub use normalize::{normalize, normalize_async, normalize_to_bytes, ImageSource, CANONICAL_EXT};
