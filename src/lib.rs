//! # Album Resize
//!
//! Regenerates the web derivatives of a photo site's albums. Each album is a
//! directory under the content root; its originals live next to the site
//! assets in `<images_root>/<album>-source/`. Every run throws away the
//! album's previous derivatives and writes fresh ones under new names.
//!
//! # Pipeline
//!
//! ```text
//! content_root/<album>/            (album exists)
//! images_root/<album>-source/*     (originals: jpg, jpeg, png)
//!        │
//!        ▼
//! basic:     images_root/<album>/<id>.<ext>                 JPEG, height ≤ 900
//! extended:  public_root/images/<album>/<id>.webp           WebP, height ≤ 900
//!            images_root/<album>/<id>-preview.<ext>         JPEG, width ≤ 610
//! ```
//!
//! `<id>` is 16 lowercase hex characters, unique within the album's run.
//! `<ext>` is the source file's own extension.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`discover`] | Albums from the content root, resolved to their source directories |
//! | [`source`] | Which files in a source directory are eligible, and why others are not |
//! | [`naming`] | Collision-free random ids, or content ids from SHA-256 |
//! | [`output_tree`] | Empties (or creates) an album's output directories |
//! | [`imaging`] | Derivative planning, presets, and the pure-Rust encode backend |
//! | [`process`] | Drives a run across albums; progress events and the run summary |
//! | [`gallery`] | Read side: counts and lists derivatives the site renders |
//! | [`config`] | `resize-images.toml` loading, validation, and CLI overrides |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Regenerate, Never Merge
//!
//! Output directories are cleared before an album is rendered. Nothing is
//! cached between runs and stale derivatives cannot survive. The price is
//! that every run re-encodes everything, and with random naming every URL
//! changes; pages pick up the new names by listing the directory
//! ([`gallery`]).
//!
//! ## Bounded Parallelism, Joined
//!
//! Files of an album are encoded on the rayon pool, sized by
//! `processing.max_processes`. Albums run one after another and each is
//! joined before the next starts, so when [`process::run`] returns every file
//! is on disk and the summary is exact. A failing file never takes its
//! siblings down.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding and resampling use the `image` crate (Lanczos3), JPEG output uses
//! `jpeg-encoder` for progressive scans and optimized Huffman tables, and EXIF
//! orientation is read with `kamadak-exif`. No system libraries are needed.

pub mod config;
pub mod discover;
pub mod gallery;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod output_tree;
pub mod process;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;
