//! Shared test utilities for the album-resize test suite.
//!
//! Provides synthetic image writers and a throwaway site layout (content
//! root, images root, public root) so pipeline tests can build albums in a
//! few lines.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = SiteLayout::new();
//! site.album("tokyo");
//! site.source_file("tokyo", "a.jpg", b"x");
//!
//! let summary = run_with_backend(&MockBackend::new(), &site.config(), None).unwrap();
//! assert_eq!(file_names(&site.images_root().join("tokyo")).len(), 1);
//! ```

use image::{ImageEncoder, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::PipelineConfig;

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write a small valid JPEG with the given dimensions.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a JPEG whose EXIF block carries the given orientation tag (1-8).
///
/// The pixels are stored `width`x`height`; a viewer honouring the tag shows
/// them rotated or mirrored.
pub fn write_test_jpeg_with_orientation(path: &Path, width: u32, height: u32, orientation: u16) {
    let img = gradient(width, height);
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut jpeg)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();

    // Big-endian TIFF with a single IFD0 entry: Orientation (0x0112), SHORT
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2a");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes());

    let mut app1 = vec![0xFF, 0xE1];
    let segment_len = (2 + 6 + tiff.len()) as u16;
    app1.extend_from_slice(&segment_len.to_be_bytes());
    app1.extend_from_slice(b"Exif\x00\x00");
    app1.extend_from_slice(&tiff);

    // APP1 goes right after SOI
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    fs::write(path, out).unwrap();
}

/// Write a small valid PNG with the given dimensions.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::png::PngEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

// =========================================================================
// Site layout
// =========================================================================

/// A temporary site with `content/`, `images/` and `public/` roots.
///
/// Only the content root exists up front; everything else is created by the
/// helpers or by the code under test.
pub struct SiteLayout {
    tmp: TempDir,
}

impl SiteLayout {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("content")).unwrap();
        Self { tmp }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn content_root(&self) -> PathBuf {
        self.root().join("content")
    }

    pub fn images_root(&self) -> PathBuf {
        self.root().join("images")
    }

    pub fn public_root(&self) -> PathBuf {
        self.root().join("public")
    }

    /// Declare an album in the content root.
    pub fn album(&self, name: &str) {
        fs::create_dir_all(self.content_root().join(name)).unwrap();
    }

    /// Write raw bytes into `<images>/<album>-source/<name>`.
    pub fn source_file(&self, album: &str, name: &str, bytes: &[u8]) -> PathBuf {
        let dir = self.images_root().join(format!("{album}-source"));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    /// Stock config pointed at this layout.
    pub fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.paths.content_root = self.content_root();
        config.paths.images_root = self.images_root();
        config.paths.public_root = self.public_root();
        config
    }
}

/// File names directly inside `dir`, sorted. Empty if `dir` is missing.
pub fn file_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
