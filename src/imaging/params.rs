//! Parameter types for image operations.
//!
//! These structs describe *what* to render, not *how*. They are the interface
//! between [`operations`](super::operations), which decides which derivatives
//! a source image gets, and the [`backend`](super::backend), which does the
//! pixel work. Swapping the backend (e.g. for a recording mock in tests)
//! never touches the planning logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100). Clamped on construction.
//! - [`JpegSettings`]: Quality plus progressive/scan/quantization tuning.
//! - [`OutputFormat`]: The encoder a derivative is written with.
//! - [`ResizeBound`]: Which edge is constrained, and to how many pixels.
//! - [`RenderParams`]: Full specification of one derivative.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(92)
    }
}

/// Quantization table family for JPEG output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantTables {
    /// ITU-T T.81 Annex K tables.
    Standard,
    /// N. Robidoux's tables as shipped with ImageMagick (mozjpeg table 3).
    Robidoux,
}

/// JPEG encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegSettings {
    pub quality: Quality,
    pub progressive: bool,
    /// Per-image optimized Huffman tables.
    pub optimize_scans: bool,
    pub quant_tables: QuantTables,
}

impl JpegSettings {
    /// Full-size preset: every perceptual option turned on.
    pub fn full(quality: Quality) -> Self {
        Self {
            quality,
            progressive: true,
            optimize_scans: true,
            quant_tables: QuantTables::Robidoux,
        }
    }

    /// Preview preset: progressive and optimized, standard tables.
    pub fn preview(quality: Quality) -> Self {
        Self {
            quality,
            progressive: true,
            optimize_scans: true,
            quant_tables: QuantTables::Standard,
        }
    }
}

/// Encoder used for a derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg(JpegSettings),
    /// Lossless WebP, i.e. maximum quality.
    WebP,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg(_) => "jpg",
            OutputFormat::WebP => "webp",
        }
    }
}

/// Contain-fit bound on one edge. The other edge follows the aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeBound {
    Height(u32),
    Width(u32),
}

/// Parameters for rendering one derivative: decode, orient, fit, encode.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub bound: ResizeBound,
    pub format: OutputFormat,
}
