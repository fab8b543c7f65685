//! Source image selection.
//!
//! An album's `<album>-source/` directory is listed once per run and every
//! entry is classified as eligible or skipped. Selection depends only on the
//! entry name and kind, never on file content.

use crate::config::Mode;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Accepted source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
}

/// Extension table, matched case-insensitively. Adding a format is one row
/// here plus its [`SourceFormat::accepted_in`] policy.
const EXTENSIONS: &[(&str, SourceFormat)] = &[
    ("jpg", SourceFormat::Jpeg),
    ("jpeg", SourceFormat::Jpeg),
    ("png", SourceFormat::Png),
];

/// OS bookkeeping files that can sit next to photos.
const METADATA_ARTIFACTS: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
            .map(|(_, format)| *format)
    }

    /// Basic mode re-encodes to the source extension and only handles JPEG.
    pub fn accepted_in(self, mode: Mode) -> bool {
        match (self, mode) {
            (SourceFormat::Jpeg, _) => true,
            (SourceFormat::Png, Mode::Extended) => true,
            (SourceFormat::Png, Mode::Basic) => false,
        }
    }
}

/// An eligible file in an album's source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub path: PathBuf,
    pub file_name: String,
    /// Extension exactly as written on disk (e.g. `JPG`), without the dot.
    pub extension: String,
    pub format: SourceFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MetadataArtifact,
    UnsupportedFormat,
    NotAFile,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MetadataArtifact => write!(f, "metadata file"),
            SkipReason::UnsupportedFormat => write!(f, "not a supported image"),
            SkipReason::NotAFile => write!(f, "not a file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub file_name: String,
    pub reason: SkipReason,
}

/// Classified contents of a source directory, each list sorted by name.
#[derive(Debug, Clone, Default)]
pub struct SourceListing {
    pub eligible: Vec<SourceImage>,
    pub skipped: Vec<SkippedEntry>,
}

/// Classify a file name for the given mode.
pub fn classify(file_name: &str, mode: Mode) -> Result<SourceFormat, SkipReason> {
    if METADATA_ARTIFACTS.contains(&file_name) {
        return Err(SkipReason::MetadataArtifact);
    }
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(SourceFormat::from_extension)
        .filter(|format| format.accepted_in(mode))
        .ok_or(SkipReason::UnsupportedFormat)
}

/// List and classify an album's source directory (non-recursive).
pub fn scan_source_dir(dir: &Path, mode: Mode) -> io::Result<SourceListing> {
    let mut entries: Vec<(String, PathBuf, bool)> = fs::read_dir(dir)?
        .map(|entry| {
            let entry = entry?;
            let is_file = entry.file_type()?.is_file() || entry.path().is_file();
            Ok((
                entry.file_name().to_string_lossy().into_owned(),
                entry.path(),
                is_file,
            ))
        })
        .collect::<io::Result<_>>()?;
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut listing = SourceListing::default();
    for (file_name, path, is_file) in entries {
        if !is_file {
            listing.skipped.push(SkippedEntry {
                file_name,
                reason: SkipReason::NotAFile,
            });
            continue;
        }
        match classify(&file_name, mode) {
            Ok(format) => {
                let extension = path
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default();
                listing.eligible.push(SourceImage {
                    path,
                    file_name,
                    extension,
                    format,
                });
            }
            Err(reason) => listing.skipped.push(SkippedEntry { file_name, reason }),
        }
    }
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(listing: &SourceListing) -> Vec<&str> {
        listing.eligible.iter().map(|i| i.file_name.as_str()).collect()
    }

    #[test]
    fn extensions_match_case_insensitively() {
        for ext in ["jpg", "JPG", "Jpeg", "JPEG"] {
            assert_eq!(SourceFormat::from_extension(ext), Some(SourceFormat::Jpeg));
        }
        assert_eq!(SourceFormat::from_extension("PnG"), Some(SourceFormat::Png));
        assert_eq!(SourceFormat::from_extension("gif"), None);
        assert_eq!(SourceFormat::from_extension(""), None);
    }

    #[test]
    fn png_only_accepted_in_extended_mode() {
        assert!(SourceFormat::Png.accepted_in(Mode::Extended));
        assert!(!SourceFormat::Png.accepted_in(Mode::Basic));
        assert!(SourceFormat::Jpeg.accepted_in(Mode::Basic));
    }

    #[test]
    fn classify_rejects_artifacts_and_unknown_extensions() {
        assert_eq!(
            classify(".DS_Store", Mode::Extended),
            Err(SkipReason::MetadataArtifact)
        );
        assert_eq!(
            classify("c.txt", Mode::Extended),
            Err(SkipReason::UnsupportedFormat)
        );
        assert_eq!(
            classify("noext", Mode::Extended),
            Err(SkipReason::UnsupportedFormat)
        );
        assert_eq!(
            classify("b.PNG", Mode::Basic),
            Err(SkipReason::UnsupportedFormat)
        );
        assert_eq!(classify("a.jpg", Mode::Basic), Ok(SourceFormat::Jpeg));
    }

    #[test]
    fn classify_ignores_content_lookalikes() {
        // Extension must be the final component
        assert_eq!(
            classify("photo.jpg.txt", Mode::Extended),
            Err(SkipReason::UnsupportedFormat)
        );
        assert_eq!(classify("photo.txt.jpg", Mode::Extended), Ok(SourceFormat::Jpeg));
    }

    #[test]
    fn scan_mixed_directory_extended_and_basic() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.jpg", "b.PNG", ".DS_Store", "c.txt"] {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }

        let extended = scan_source_dir(tmp.path(), Mode::Extended).unwrap();
        assert_eq!(names(&extended), vec!["a.jpg", "b.PNG"]);
        assert_eq!(extended.skipped.len(), 2);

        let basic = scan_source_dir(tmp.path(), Mode::Basic).unwrap();
        assert_eq!(names(&basic), vec!["a.jpg"]);
        assert_eq!(basic.skipped.len(), 3);
    }

    #[test]
    fn scan_preserves_extension_case() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("IMG_01.JPG"), b"x").unwrap();

        let listing = scan_source_dir(tmp.path(), Mode::Basic).unwrap();
        assert_eq!(listing.eligible[0].extension, "JPG");
        assert_eq!(listing.eligible[0].format, SourceFormat::Jpeg);
    }

    #[test]
    fn scan_skips_subdirectories_even_with_image_names() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("nested.jpg")).unwrap();
        fs::write(tmp.path().join("real.jpeg"), b"x").unwrap();

        let listing = scan_source_dir(tmp.path(), Mode::Extended).unwrap();
        assert_eq!(names(&listing), vec!["real.jpeg"]);
        assert_eq!(
            listing.skipped,
            vec![SkippedEntry {
                file_name: "nested.jpg".into(),
                reason: SkipReason::NotAFile,
            }]
        );
    }

    #[test]
    fn scan_is_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        for name in ["c.jpg", "a.jpg", "b.jpg"] {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }
        let listing = scan_source_dir(tmp.path(), Mode::Basic).unwrap();
        assert_eq!(names(&listing), vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn scan_missing_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_source_dir(&tmp.path().join("nope"), Mode::Basic).is_err());
    }
}
