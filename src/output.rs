//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! Albums: berlin, tokyo
//! [berlin] Skipped: no source directory at src/assets/images/berlin-source
//! [tokyo] 3 images
//! [tokyo] Skipped .DS_Store (metadata file)
//! [tokyo] Processed a.jpg to 3f9c0a1b2c3d4e5f.webp + 3f9c0a1b2c3d4e5f-preview.jpg (1/3)
//! [tokyo] Failed corrupt.jpg: full derivative failed: ...
//! [tokyo] Processed b.PNG to 77aa01bb02cc03dd.webp + 77aa01bb02cc03dd-preview.PNG (2/3)
//! [tokyo] Done: 2 of 3 processed, 1 failed
//!
//! Processed 2 images in 1 album; 1 failed
//! ```
//!
//! Basic mode produces a single derivative per source and reads
//! `Resized a.jpg to <id>.jpg (n/total)` instead.
//!
//! ## Check
//!
//! ```text
//! berlin
//!     Source: missing (src/assets/images/berlin-source)
//! tokyo
//!     Source: src/assets/images/tokyo-source
//!     2 eligible: a.jpg, b.PNG
//!     Skipped: .DS_Store (metadata file)
//! oslo
//!     Source: src/assets/images/oslo-source
//!     Error: cannot read source directory: Permission denied (os error 13)
//! ```
//!
//! # Architecture
//!
//! Every view has a `format_*` function (returns `Vec<String>`) for
//! testability and, where the CLI needs it, a `print_*` wrapper that writes
//! to stdout. Format functions are pure: no I/O, no side effects.

use crate::discover::AlbumSource;
use crate::gallery::AlbumCount;
use crate::process::{AlbumCheck, AlbumSkipReason, AlbumStatus, ProcessEvent, RunSummary};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Run: progress events
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::RunStarted { albums } if albums.is_empty() => {
            vec!["No albums found".to_string()]
        }
        ProcessEvent::RunStarted { albums } => {
            vec![format!("Albums: {}", albums.join(", "))]
        }
        ProcessEvent::AlbumSkipped { album, reason } => {
            let why = match reason {
                AlbumSkipReason::SourceMissing(path) => {
                    format!("no source directory at {}", path.display())
                }
                AlbumSkipReason::NoEligibleImages => "no eligible images".to_string(),
            };
            vec![format!("[{album}] Skipped: {why}")]
        }
        ProcessEvent::AlbumStarted { album, total } => {
            vec![format!("[{album}] {}", plural(*total, "image", "images"))]
        }
        ProcessEvent::FileSkipped {
            album,
            file_name,
            reason,
        } => vec![format!("[{album}] Skipped {file_name} ({reason})")],
        ProcessEvent::DuplicateSkipped {
            album,
            file_name,
            id,
        } => vec![format!(
            "[{album}] Skipped {file_name} (same content as {id})"
        )],
        ProcessEvent::ImageProcessed {
            album,
            file_name,
            outputs,
            index,
            total,
        } => {
            let verb = if outputs.len() == 1 {
                "Resized"
            } else {
                "Processed"
            };
            vec![format!(
                "[{album}] {verb} {file_name} to {} ({index}/{total})",
                outputs.join(" + ")
            )]
        }
        ProcessEvent::ImageFailed {
            album,
            file_name,
            error,
        } => vec![format!("[{album}] Failed {file_name}: {error}")],
        ProcessEvent::AlbumFinished {
            album,
            processed,
            failed,
            total,
        } => {
            let mut line = format!("[{album}] Done: {processed} of {total} processed");
            if *failed > 0 {
                line.push_str(&format!(", {failed} failed"));
            }
            vec![line]
        }
        ProcessEvent::AlbumFailed { album, error } => {
            vec![format!("[{album}] Album failed: {error}")]
        }
    }
}

// ============================================================================
// Run: summary
// ============================================================================

/// Format the closing summary of a run.
pub fn format_run_summary(summary: &RunSummary) -> Vec<String> {
    let worked = summary
        .albums
        .iter()
        .filter(|a| a.status == AlbumStatus::Processed)
        .count();
    let skipped = summary
        .albums
        .iter()
        .filter(|a| {
            matches!(
                a.status,
                AlbumStatus::SourceMissing | AlbumStatus::NoEligibleImages
            )
        })
        .count();

    let mut line = format!(
        "Processed {} in {}",
        plural(summary.processed(), "image", "images"),
        plural(worked, "album", "albums")
    );
    if skipped > 0 {
        line.push_str(&format!("; {} skipped", plural(skipped, "album", "albums")));
    }
    if summary.failed_files() > 0 {
        line.push_str(&format!("; {} failed", summary.failed_files()));
    }
    if summary.failed_albums() > 0 {
        line.push_str(&format!(
            "; {} could not be processed",
            plural(summary.failed_albums(), "album", "albums")
        ));
    }
    vec![String::new(), line]
}

pub fn print_run_summary(summary: &RunSummary) {
    for line in format_run_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the no-write discovery report.
pub fn format_check_output(checks: &[AlbumCheck]) -> Vec<String> {
    if checks.is_empty() {
        return vec!["No albums found".to_string()];
    }

    let mut lines = Vec::new();
    for check in checks {
        lines.push(check.album.clone());
        match &check.source {
            AlbumSource::Missing(path) => {
                lines.push(format!("{}Source: missing ({})", indent(1), path.display()));
                continue;
            }
            AlbumSource::Present(path) => {
                lines.push(format!("{}Source: {}", indent(1), path.display()));
            }
        }
        if let Some(error) = &check.error {
            lines.push(format!("{}Error: {}", indent(1), error));
            continue;
        }
        if check.eligible.is_empty() {
            lines.push(format!("{}No eligible images", indent(1)));
        } else {
            lines.push(format!(
                "{}{} eligible: {}",
                indent(1),
                check.eligible.len(),
                check.eligible.join(", ")
            ));
        }
        if !check.skipped.is_empty() {
            let skipped: Vec<String> = check
                .skipped
                .iter()
                .map(|(name, reason)| format!("{name} ({reason})"))
                .collect();
            lines.push(format!("{}Skipped: {}", indent(1), skipped.join(", ")));
        }
    }
    lines
}

pub fn print_check_output(checks: &[AlbumCheck]) {
    for line in format_check_output(checks) {
        println!("{}", line);
    }
}

// ============================================================================
// Count
// ============================================================================

/// Format photo counts, one album per line.
///
/// ```text
/// berlin: 0 photos
/// tokyo: 12 photos
/// ```
pub fn format_count_output(counts: &[AlbumCount]) -> Vec<String> {
    counts
        .iter()
        .map(|c| format!("{}: {}", c.album, plural(c.photos, "photo", "photos")))
        .collect()
}

pub fn print_count_output(counts: &[AlbumCount]) {
    for line in format_count_output(counts) {
        println!("{}", line);
    }
}
