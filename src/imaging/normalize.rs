/// Canonical image normalization
///
/// Every stored catalog item goes through the same pipeline:
/// - Flatten any transparency onto opaque white
/// - Bound the width to `MAX_WIDTH`, keeping the aspect ratio
/// - Encode as baseline JPEG at `JPEG_QUALITY` with optimized Huffman tables
///
/// The output is written to a hidden temporary file next to the destination
/// and renamed into place, so a failed encode never leaves a partial item.

use crate::error::{CatalogError, Result};
use image::{imageops::FilterType, DynamicImage, ImageError, ImageReader, Rgb, RgbImage};
use jpeg_encoder::{ColorType, Encoder};
use std::fs;
use std::path::{Path, PathBuf};

/// Widest stored image, in pixels
pub const MAX_WIDTH: u32 = 500;

/// JPEG quality used for every stored image
pub const JPEG_QUALITY: u8 = 90;

/// File extension of the canonical representation
pub const CANONICAL_EXT: &str = "jpg";

/// Where an incoming image comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Encoded image bytes (any format the `image` crate can decode)
    Bytes(Vec<u8>),
    /// Path to an encoded image file on disk
    Path(PathBuf),
}

impl ImageSource {
    /// Decode the source, guessing the format from its contents
    pub fn decode(&self) -> Result<DynamicImage> {
        match self {
            ImageSource::Bytes(bytes) => Ok(image::load_from_memory(bytes)?),
            ImageSource::Path(path) => {
                let reader = ImageReader::open(path)
                    .map_err(ImageError::IoError)?
                    .with_guessed_format()
                    .map_err(ImageError::IoError)?;
                Ok(reader.decode()?)
            }
        }
    }
}

/// Run the full pipeline and return the encoded JPEG bytes
pub fn normalize_to_bytes(source: &ImageSource) -> Result<Vec<u8>> {
    let img = source.decode()?;
    let rgb = bound_width(flatten(&img));
    encode_jpeg(&rgb)
}

/// Normalize `source` and write it to `dest`, creating parent directories
///
/// `dest` either ends up holding the complete canonical image or is left
/// untouched.
pub fn normalize(source: &ImageSource, dest: &Path) -> Result<()> {
    let bytes = normalize_to_bytes(source)?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(dest);
    if let Err(e) = fs::write(&tmp, &bytes).and_then(|_| fs::rename(&tmp, dest)) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    tracing::debug!(
        "normalized image written to {} ({} bytes)",
        dest.display(),
        bytes.len()
    );
    Ok(())
}

/// Async version of `normalize` for hosts running on tokio
///
/// Decoding and encoding are CPU-bound, so they run on the blocking pool.
pub async fn normalize_async(source: ImageSource, dest: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || normalize(&source, &dest))
        .await
        .map_err(|e| CatalogError::Task(e.to_string()))?
}

/// Hidden sibling path used while an image is being written
pub fn temp_path(dest: &Path) -> PathBuf {
    let file_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.tmp", file_name))
}

/// Drop the alpha channel, compositing over white when there is one
fn flatten(img: &DynamicImage) -> RgbImage {
    // PNG palettes with a tRNS entry are expanded to RGBA by the decoder,
    // so they take the alpha path too.
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

/// Composite one channel value over white with the given alpha
fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (channel as u32, alpha as u32);
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Downscale proportionally when wider than `MAX_WIDTH`
fn bound_width(rgb: RgbImage) -> RgbImage {
    let (width, height) = rgb.dimensions();
    if width <= MAX_WIDTH {
        return rgb;
    }

    let scale = MAX_WIDTH as f64 / width as f64;
    let new_height = ((height as f64 * scale).round() as u32).max(1);
    image::imageops::resize(&rgb, MAX_WIDTH, new_height, FilterType::Lanczos3)
}

fn encode_jpeg(rgb: &RgbImage) -> Result<Vec<u8>> {
    encode_jpeg_with(rgb, true)
}

fn encode_jpeg_with(rgb: &RgbImage, optimized: bool) -> Result<Vec<u8>> {
    let (width, height) = rgb.dimensions();
    let (width, height) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(CatalogError::NormalizationFailed(format!(
                "{}x{} is too large for JPEG",
                width, height
            )))
        }
    };

    let mut buffer = Vec::new();
    let mut encoder = Encoder::new(&mut buffer, JPEG_QUALITY);
    encoder.set_optimized_huffman_tables(optimized);
    encoder
        .encode(rgb.as_raw(), width, height, ColorType::Rgb)
        .map_err(|e| CatalogError::NormalizationFailed(e.to_string()))?;
    Ok(buffer)
}
