//! Output directory reset.
//!
//! Every run regenerates an album's derivatives from scratch: existing output
//! files are removed, never merged. Readers of the directory may see it empty
//! or half-filled while a run is in progress.

use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The directory existed; this many files were removed.
    Cleared { removed: usize },
    /// The directory (and any missing parents) was created.
    Created,
}

/// Empty `dir` of files, or create it.
///
/// Only direct child files are removed. Subdirectories are left in place.
pub fn reset(dir: &Path) -> io::Result<ResetOutcome> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(ResetOutcome::Created);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        fs::remove_file(entry.path())?;
        removed += 1;
    }
    log::debug!("Cleared {} file(s) from {}", removed, dir.display());
    Ok(ResetOutcome::Cleared { removed })
}
