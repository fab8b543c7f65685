//! Derivative generation across all albums.
//!
//! For every album under the content root:
//!
//! ```text
//! resolve <images_root>/<album>-source ──missing──▶ skipped
//!         │
//!   scan source dir (classify entries)
//!         │
//!   reset output tree(s)
//!         │
//!   zero eligible ──▶ skipped
//!         │
//!   allocate ids (sequential, album-scoped registry)
//!         │
//!   render files in parallel ──▶ join ──▶ album finished
//! ```
//!
//! ## Parallel Processing
//!
//! Files of one album are rendered with [rayon](https://docs.rs/rayon) and
//! the roles of one file in parallel too. Each album is fully joined before
//! the next one starts, and [`run`] only returns once every encode has
//! finished, so the summary it returns is complete.
//!
//! Progress is reported through an optional [`ProcessEvent`] channel; the CLI
//! renders events on a printer thread (see [`output`](crate::output)).
//!
//! ## Failure isolation
//!
//! A file that fails to decode or encode is reported and left out of the
//! success count; its siblings and other albums carry on. An album whose
//! source directory cannot be listed or whose output tree cannot be reset is
//! reported as failed and the run moves on. Only an unreadable content root
//! fails the whole run.

use crate::config::{Mode, PipelineConfig};
use crate::discover::{self, AlbumSource};
use crate::imaging::{
    DerivativeSet, ImageBackend, OutputTrees, Presets, RustBackend, create_derivatives,
    plan_derivatives,
};
use crate::naming::{Allocation, HashRegistry, NamingStrategy, allocate_for};
use crate::output_tree;
use crate::source::{self, SkipReason, SourceImage, SourceListing};
use rayon::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Cannot read content root {path}: {source}")]
    ContentRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Progress events emitted while processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    RunStarted {
        albums: Vec<String>,
    },
    AlbumSkipped {
        album: String,
        reason: AlbumSkipReason,
    },
    AlbumStarted {
        album: String,
        total: usize,
    },
    FileSkipped {
        album: String,
        file_name: String,
        reason: SkipReason,
    },
    DuplicateSkipped {
        album: String,
        file_name: String,
        id: String,
    },
    ImageProcessed {
        album: String,
        file_name: String,
        outputs: Vec<String>,
        /// 1-based count of successes so far in this album.
        index: usize,
        total: usize,
    },
    ImageFailed {
        album: String,
        file_name: String,
        error: String,
    },
    AlbumFinished {
        album: String,
        processed: usize,
        failed: usize,
        total: usize,
    },
    AlbumFailed {
        album: String,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumSkipReason {
    SourceMissing(PathBuf),
    NoEligibleImages,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumStatus {
    Processed,
    SourceMissing,
    NoEligibleImages,
    Failed(String),
}

/// Accounting for one album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumReport {
    pub album: String,
    pub status: AlbumStatus,
    /// Eligible source images.
    pub total: usize,
    /// Sources whose every derivative was written.
    pub processed: usize,
    pub failed: usize,
    pub skipped_files: usize,
    pub duplicates: usize,
}

impl AlbumReport {
    fn new(album: &str, status: AlbumStatus) -> Self {
        Self {
            album: album.to_string(),
            status,
            total: 0,
            processed: 0,
            failed: 0,
            skipped_files: 0,
            duplicates: 0,
        }
    }
}

/// Accounting for a whole run, albums in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub albums: Vec<AlbumReport>,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.albums.iter().map(|a| a.processed).sum()
    }

    pub fn failed_files(&self) -> usize {
        self.albums.iter().map(|a| a.failed).sum()
    }

    pub fn failed_albums(&self) -> usize {
        self.albums
            .iter()
            .filter(|a| matches!(a.status, AlbumStatus::Failed(_)))
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_files() > 0 || self.failed_albums() > 0
    }
}

fn emit(events: Option<&Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // Receiver gone means nobody is listening; processing carries on
        let _ = tx.send(event);
    }
}

/// Run the pipeline with the pure-Rust backend.
pub fn run(
    config: &PipelineConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    run_with_backend(&RustBackend::new(), config, events)
}

/// Run the pipeline with a specific backend (allows testing with mock).
pub fn run_with_backend(
    backend: &impl ImageBackend,
    config: &PipelineConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    let content_root = &config.paths.content_root;
    let albums = discover::discover(content_root).map_err(|source| ProcessError::ContentRoot {
        path: content_root.clone(),
        source,
    })?;

    emit(
        events.as_ref(),
        ProcessEvent::RunStarted {
            albums: albums.clone(),
        },
    );

    let presets = config.presets();
    let summary = RunSummary {
        albums: albums
            .iter()
            .map(|album| process_album(backend, config, &presets, album, events.as_ref()))
            .collect(),
    };
    Ok(summary)
}

/// A source image with its allocated id, ready to render.
struct PlannedImage<'a> {
    image: &'a SourceImage,
    set: DerivativeSet,
}

/// Process one album end to end. Never fails; problems land in the report.
pub fn process_album(
    backend: &impl ImageBackend,
    config: &PipelineConfig,
    presets: &Presets,
    album: &str,
    events: Option<&Sender<ProcessEvent>>,
) -> AlbumReport {
    let source_dir = match discover::resolve(&config.paths.images_root, album) {
        AlbumSource::Present(dir) => dir,
        AlbumSource::Missing(expected) => {
            emit(
                events,
                ProcessEvent::AlbumSkipped {
                    album: album.to_string(),
                    reason: AlbumSkipReason::SourceMissing(expected),
                },
            );
            return AlbumReport::new(album, AlbumStatus::SourceMissing);
        }
    };

    let fail = |error: String| {
        log::debug!("[{album}] album failed: {error}");
        emit(
            events,
            ProcessEvent::AlbumFailed {
                album: album.to_string(),
                error: error.clone(),
            },
        );
        AlbumReport::new(album, AlbumStatus::Failed(error))
    };

    let mode = config.pipeline.mode;
    let listing = match source::scan_source_dir(&source_dir, mode) {
        Ok(listing) => listing,
        Err(e) => return fail(format!("cannot read {}: {e}", source_dir.display())),
    };

    for dir in config.output_dirs(album) {
        match output_tree::reset(&dir) {
            Ok(outcome) => log::debug!("[{album}] {}: {:?}", dir.display(), outcome),
            Err(e) => return fail(format!("cannot reset {}: {e}", dir.display())),
        }
    }

    for skipped in &listing.skipped {
        emit(
            events,
            ProcessEvent::FileSkipped {
                album: album.to_string(),
                file_name: skipped.file_name.clone(),
                reason: skipped.reason,
            },
        );
    }

    let total = listing.eligible.len();
    let mut report = AlbumReport::new(album, AlbumStatus::Processed);
    report.total = total;
    report.skipped_files = listing.skipped.len();

    if total == 0 {
        emit(
            events,
            ProcessEvent::AlbumSkipped {
                album: album.to_string(),
                reason: AlbumSkipReason::NoEligibleImages,
            },
        );
        report.status = AlbumStatus::NoEligibleImages;
        return report;
    }

    emit(
        events,
        ProcessEvent::AlbumStarted {
            album: album.to_string(),
            total,
        },
    );

    let trees = OutputTrees {
        album_dir: config.album_dir(album),
        public_dir: config.public_album_dir(album),
    };
    let (planned, allocation_failures, duplicates) = plan_album(
        album,
        &listing.eligible,
        mode,
        config.pipeline.naming,
        &trees,
        presets,
        events,
    );
    report.duplicates = duplicates;

    let succeeded = AtomicUsize::new(0);
    let failed: usize = planned
        .par_iter()
        .map(|planned| {
            render_image(backend, album, planned, &succeeded, total, events)
        })
        .filter(|ok| !ok)
        .count();

    report.processed = succeeded.load(Ordering::SeqCst);
    report.failed = failed + allocation_failures;

    emit(
        events,
        ProcessEvent::AlbumFinished {
            album: album.to_string(),
            processed: report.processed,
            failed: report.failed,
            total,
        },
    );
    report
}

/// Allocate ids and plan derivatives sequentially.
///
/// The registry is owned here and dropped with the album. Returns the plans,
/// the number of sources whose id could not be computed, and the number of
/// content duplicates.
fn plan_album<'a>(
    album: &str,
    images: &'a [SourceImage],
    mode: Mode,
    naming: NamingStrategy,
    trees: &OutputTrees,
    presets: &Presets,
    events: Option<&Sender<ProcessEvent>>,
) -> (Vec<PlannedImage<'a>>, usize, usize) {
    let mut registry = HashRegistry::new();
    let mut planned = Vec::with_capacity(images.len());
    let mut failures = 0;
    let mut duplicates = 0;

    for image in images {
        match allocate_for(&mut registry, naming, &image.path) {
            Ok(Allocation::Fresh(id)) => planned.push(PlannedImage {
                image,
                set: plan_derivatives(image, &id, mode, trees, presets),
            }),
            Ok(Allocation::Duplicate(id)) => {
                duplicates += 1;
                emit(
                    events,
                    ProcessEvent::DuplicateSkipped {
                        album: album.to_string(),
                        file_name: image.file_name.clone(),
                        id,
                    },
                );
            }
            Err(e) => {
                failures += 1;
                report_failure(album, &image.file_name, e.to_string(), events);
            }
        }
    }
    (planned, failures, duplicates)
}

fn render_image(
    backend: &impl ImageBackend,
    album: &str,
    planned: &PlannedImage<'_>,
    succeeded: &AtomicUsize,
    total: usize,
    events: Option<&Sender<ProcessEvent>>,
) -> bool {
    match create_derivatives(backend, &planned.set) {
        Ok(rendered) => {
            for r in &rendered {
                log::debug!(
                    "[{album}] {} {}: {}x{}",
                    r.role,
                    r.file_name,
                    r.dimensions.width,
                    r.dimensions.height
                );
            }
            let index = succeeded.fetch_add(1, Ordering::SeqCst) + 1;
            emit(
                events,
                ProcessEvent::ImageProcessed {
                    album: album.to_string(),
                    file_name: planned.image.file_name.clone(),
                    outputs: rendered.into_iter().map(|r| r.file_name).collect(),
                    index,
                    total,
                },
            );
            true
        }
        Err(e) => {
            report_failure(album, &planned.image.file_name, e.to_string(), events);
            false
        }
    }
}

fn report_failure(
    album: &str,
    file_name: &str,
    error: String,
    events: Option<&Sender<ProcessEvent>>,
) {
    log::debug!("[{album}] {file_name} failed: {error}");
    emit(
        events,
        ProcessEvent::ImageFailed {
            album: album.to_string(),
            file_name: file_name.to_string(),
            error,
        },
    );
}

/// What a run would do for one album, without writing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumCheck {
    pub album: String,
    pub source: AlbumSource,
    pub eligible: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
    /// Set when the source directory exists but cannot be listed.
    pub error: Option<String>,
}

/// Discovery and source selection for every album; no output is touched.
pub fn check(config: &PipelineConfig) -> Result<Vec<AlbumCheck>, ProcessError> {
    let content_root = &config.paths.content_root;
    let albums = discover::discover(content_root).map_err(|source| ProcessError::ContentRoot {
        path: content_root.clone(),
        source,
    })?;

    Ok(albums
        .into_iter()
        .map(|album| check_album(config, album))
        .collect())
}

fn check_album(config: &PipelineConfig, album: String) -> AlbumCheck {
    let source = discover::resolve(&config.paths.images_root, &album);
    let listing = match &source {
        AlbumSource::Present(dir) => Some(source::scan_source_dir(dir, config.pipeline.mode)),
        AlbumSource::Missing(_) => None,
    };
    album_check(album, source, listing)
}

/// Build the report for one album from its (attempted) source listing.
fn album_check(
    album: String,
    source: AlbumSource,
    listing: Option<io::Result<SourceListing>>,
) -> AlbumCheck {
    let mut check = AlbumCheck {
        album,
        source,
        eligible: Vec::new(),
        skipped: Vec::new(),
        error: None,
    };
    match listing {
        Some(Ok(listing)) => {
            check.eligible = listing.eligible.into_iter().map(|i| i.file_name).collect();
            check.skipped = listing
                .skipped
                .into_iter()
                .map(|s| (s.file_name, s.reason))
                .collect();
        }
        Some(Err(e)) => check.error = Some(format!("cannot read source directory: {e}")),
        None => {}
    }
    check
}
