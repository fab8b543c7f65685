//! Album discovery.
//!
//! Albums are the subdirectories of the content root. Each one maps to a
//! source directory `<images_root>/<album>-source`; albums without one are
//! skipped (the sources may have been pruned after derivatives were made).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where an album's sources were expected, and whether they are there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumSource {
    Present(PathBuf),
    Missing(PathBuf),
}

/// Names of the direct subdirectories of `content_root`, sorted.
pub fn discover(content_root: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(content_root)? {
        let entry = entry?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

fn source_dir(images_root: &Path, album: &str) -> PathBuf {
    images_root.join(format!("{album}-source"))
}

pub fn resolve(images_root: &Path, album: &str) -> AlbumSource {
    let dir = source_dir(images_root, album);
    if dir.is_dir() {
        AlbumSource::Present(dir)
    } else {
        AlbumSource::Missing(dir)
    }
}
