//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image` crate |
//! | Orientation | `kamadak-exif` reads tag 0x0112, `image` rotates/flips |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → JPEG | `jpeg-encoder` (progressive, optimized Huffman, table choice) |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder` (lossless) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::contain_fit;
use super::params::{JpegSettings, OutputFormat, QuantTables, RenderParams};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| BackendError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

/// Read the EXIF orientation tag. Missing or unreadable EXIF means upright.
pub(crate) fn read_orientation(path: &Path) -> u32 {
    let Ok(file) = File::open(path) else {
        return 1;
    };
    let mut reader = BufReader::new(file);
    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .unwrap_or(1),
        Err(exif::Error::NotFound(_)) => 1,
        Err(e) => {
            log::debug!("Unreadable EXIF in {}: {}", path.display(), e);
            1
        }
    }
}

/// Rotate/flip so the pixels are upright for the given EXIF orientation.
pub(crate) fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

fn save_jpeg(img: &DynamicImage, path: &Path, settings: JpegSettings) -> Result<(), BackendError> {
    let encode_err = |reason: String| BackendError::Encode {
        path: path.display().to_string(),
        reason,
    };

    let rgb = img.to_rgb8();
    let width = u16::try_from(rgb.width())
        .map_err(|_| encode_err(format!("width {} exceeds JPEG limit", rgb.width())))?;
    let height = u16::try_from(rgb.height())
        .map_err(|_| encode_err(format!("height {} exceeds JPEG limit", rgb.height())))?;

    let file = File::create(path).map_err(BackendError::Io)?;
    let mut writer = BufWriter::new(file);
    let mut encoder = jpeg_encoder::Encoder::new(&mut writer, settings.quality.value() as u8);
    encoder.set_progressive(settings.progressive);
    encoder.set_optimized_huffman_tables(settings.optimize_scans);
    let table = || match settings.quant_tables {
        QuantTables::Standard => jpeg_encoder::QuantizationTableType::Default,
        QuantTables::Robidoux => jpeg_encoder::QuantizationTableType::ImageMagick,
    };
    encoder.set_quantization_tables(table(), table());
    encoder
        .encode(rgb.as_raw(), width, height, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| encode_err(e.to_string()))?;
    // Dropping a BufWriter swallows write errors
    writer.flush().map_err(BackendError::Io)
}

fn save_webp(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    // The encoder accepts 8-bit RGB(A) only
    let img = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };
    let file = File::create(path).map_err(BackendError::Io)?;
    let mut writer = BufWriter::new(file);
    img.write_with_encoder(WebPEncoder::new_lossless(&mut writer))
        .map_err(|e| BackendError::Encode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    writer.flush().map_err(BackendError::Io)
}

impl ImageBackend for RustBackend {
    fn render(&self, params: &RenderParams) -> Result<Dimensions, BackendError> {
        let orientation = read_orientation(&params.source);
        let img = apply_orientation(load_image(&params.source)?, orientation);

        let (width, height) = contain_fit((img.width(), img.height()), params.bound);
        let resized = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            log::debug!(
                "Resizing {} from {}x{} to {}x{}",
                params.source.display(),
                img.width(),
                img.height(),
                width,
                height
            );
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        match params.format {
            OutputFormat::Jpeg(settings) => save_jpeg(&resized, &params.output, settings)?,
            OutputFormat::WebP => save_webp(&resized, &params.output)?,
        }

        Ok(Dimensions { width, height })
    }
}
