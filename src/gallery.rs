//! Read side of the output tree.
//!
//! Site pages never see the source images; they count and list whatever the
//! pipeline left in an album's output directory. Extended mode is counted by
//! its full-size `.webp` files, basic mode by its JPEG derivatives.

use crate::config::{Mode, PipelineConfig};
use crate::discover;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

const EXTENDED_EXTENSIONS: &[&str] = &["webp"];
const BASIC_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumCount {
    pub album: String,
    pub photos: usize,
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// Sorted names of the files in `dir` whose extension is in `extensions`
/// (case-insensitive).
pub fn list_derivatives(dir: &Path, extensions: &[&str]) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            if let Some(name) = path.file_name() {
                names.push(name.to_string_lossy().into_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Number of derivatives in `dir`. A missing or unreadable directory counts 0.
pub fn photo_count(dir: &Path, extensions: &[&str]) -> usize {
    match list_derivatives(dir, extensions) {
        Ok(names) => names.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
        Err(e) => {
            log::warn!("Cannot count photos in {}: {}", dir.display(), e);
            0
        }
    }
}

/// Photo counts for every album under the content root.
pub fn count_albums(config: &PipelineConfig) -> io::Result<Vec<AlbumCount>> {
    let albums = discover::discover(&config.paths.content_root)?;
    Ok(albums
        .into_iter()
        .map(|album| {
            let photos = match config.pipeline.mode {
                Mode::Extended => {
                    photo_count(&config.public_album_dir(&album), EXTENDED_EXTENSIONS)
                }
                Mode::Basic => photo_count(&config.album_dir(&album), BASIC_EXTENSIONS),
            };
            AlbumCount { album, photos }
        })
        .collect())
}
