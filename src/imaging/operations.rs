//! High-level image operations.
//!
//! [`plan_derivatives`] decides which files one source image turns into;
//! [`create_derivatives`] hands each of them to the backend. Planning is pure
//! so the naming and preset rules are testable without pixels.
//!
//! | Mode | Role | Output | Encoder | Bound |
//! |---|---|---|---|---|
//! | basic | full | `<album_dir>/<id>.<ext>` | JPEG, full preset | height 900 |
//! | extended | full | `<public_dir>/<id>.webp` | lossless WebP | height 900 |
//! | extended | preview | `<album_dir>/<id>-preview.<ext>` | JPEG, preview preset | width 610 |
//!
//! `<ext>` is the source extension as written on disk. Previews are JPEG
//! encoded even when the source (and so the name) is PNG. Full-size WebP is
//! lossless: `image` has no lossy WebP encoder, so quality 100 maps to it.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{JpegSettings, OutputFormat, RenderParams, ResizeBound};
use crate::config::Mode;
use crate::source::{SourceFormat, SourceImage};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Full,
    Preview,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Full => write!(f, "full"),
            Role::Preview => write!(f, "preview"),
        }
    }
}

/// Encoding presets shared by every album in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presets {
    pub full_height: u32,
    pub full_jpeg: JpegSettings,
    pub preview_width: u32,
    pub preview_jpeg: JpegSettings,
}

/// Destination directories of one album.
#[derive(Debug, Clone)]
pub struct OutputTrees {
    /// Basic outputs, or extended-mode previews.
    pub album_dir: PathBuf,
    /// Extended-mode full-size outputs.
    pub public_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Derivative {
    pub role: Role,
    pub params: RenderParams,
}

impl Derivative {
    pub fn file_name(&self) -> String {
        self.params
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Everything planned for one source image. All members share `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeSet {
    pub id: String,
    pub source: PathBuf,
    pub derivatives: Vec<Derivative>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDerivative {
    pub role: Role,
    pub file_name: String,
    pub dimensions: Dimensions,
}

#[derive(Error, Debug)]
#[error("{role} derivative failed: {source}")]
pub struct RoleFailure {
    pub role: Role,
    #[source]
    pub source: BackendError,
}

/// One or more roles of a source image failed.
#[derive(Error, Debug)]
#[error("{}", summarize(.failures))]
pub struct DerivativeError {
    pub failures: Vec<RoleFailure>,
}

fn summarize(failures: &[RoleFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn named(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    dir.join(format!("{stem}.{ext}"))
}

/// Encoder of the full-size role for a source format.
///
/// Every accepted format shares one policy per mode; a new format is a new
/// arm here and in [`preview_format`].
fn full_format(source: SourceFormat, mode: Mode, presets: &Presets) -> OutputFormat {
    match (mode, source) {
        (Mode::Basic, SourceFormat::Jpeg | SourceFormat::Png) => {
            OutputFormat::Jpeg(presets.full_jpeg)
        }
        (Mode::Extended, SourceFormat::Jpeg | SourceFormat::Png) => OutputFormat::WebP,
    }
}

fn preview_format(source: SourceFormat, presets: &Presets) -> OutputFormat {
    match source {
        SourceFormat::Jpeg | SourceFormat::Png => OutputFormat::Jpeg(presets.preview_jpeg),
    }
}

/// Plan the derivatives of one source image.
pub fn plan_derivatives(
    image: &SourceImage,
    id: &str,
    mode: Mode,
    trees: &OutputTrees,
    presets: &Presets,
) -> DerivativeSet {
    let full_bound = ResizeBound::Height(presets.full_height);
    let derivatives = match mode {
        Mode::Basic => vec![Derivative {
            role: Role::Full,
            params: RenderParams {
                source: image.path.clone(),
                output: named(&trees.album_dir, id, &image.extension),
                bound: full_bound,
                format: full_format(image.format, mode, presets),
            },
        }],
        Mode::Extended => vec![
            Derivative {
                role: Role::Full,
                params: RenderParams {
                    source: image.path.clone(),
                    output: named(
                        &trees.public_dir,
                        id,
                        full_format(image.format, mode, presets).extension(),
                    ),
                    bound: full_bound,
                    format: full_format(image.format, mode, presets),
                },
            },
            Derivative {
                role: Role::Preview,
                params: RenderParams {
                    source: image.path.clone(),
                    output: named(&trees.album_dir, &format!("{id}-preview"), &image.extension),
                    bound: ResizeBound::Width(presets.preview_width),
                    format: preview_format(image.format, presets),
                },
            },
        ],
    };

    DerivativeSet {
        id: id.to_string(),
        source: image.path.clone(),
        derivatives,
    }
}

/// Render every derivative of a set.
///
/// Roles run in parallel and independently: a failing role never stops its
/// sibling. The set only succeeds when every role succeeded.
pub fn create_derivatives(
    backend: &impl ImageBackend,
    set: &DerivativeSet,
) -> Result<Vec<RenderedDerivative>, DerivativeError> {
    let results: Vec<Result<RenderedDerivative, RoleFailure>> = set
        .derivatives
        .par_iter()
        .map(|derivative| {
            backend
                .render(&derivative.params)
                .map(|dimensions| RenderedDerivative {
                    role: derivative.role,
                    file_name: derivative.file_name(),
                    dimensions,
                })
                .map_err(|source| RoleFailure {
                    role: derivative.role,
                    source,
                })
        })
        .collect();

    let mut rendered = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(r) => rendered.push(r),
            Err(f) => failures.push(f),
        }
    }

    if failures.is_empty() {
        Ok(rendered)
    } else {
        Err(DerivativeError { failures })
    }
}
