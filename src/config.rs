//! Pipeline configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Stock defaults ([`PipelineConfig::default`]), matching the layout of a
//!    content-collection site: albums under `src/content/photos`, sources and
//!    previews under `src/assets/images`, full-size output under `public/images`.
//! 2. An optional `resize-images.toml` next to the invocation.
//! 3. Command-line flags ([`Overrides`]).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! content_root = "src/content/photos"  # One directory per album
//! images_root = "src/assets/images"    # <album>-source/ inputs, <album>/ outputs
//! public_root = "public"               # Full-size output goes to <public_root>/images/<album>/
//!
//! [pipeline]
//! mode = "extended"    # "basic" (one JPEG per source) or "extended" (WebP + preview)
//! naming = "random"    # "random" (fresh ids each run) or "content" (SHA-256 of source)
//!
//! [full]
//! height = 900         # Height bound for full-size/basic derivatives
//! quality = 92         # JPEG quality for basic mode (extended full-size is lossless WebP)
//!
//! [preview]
//! width = 610          # Width bound for previews
//! quality = 80         # Preview JPEG quality
//!
//! [processing]
//! max_processes = 4    # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::operations::Presets;
use crate::imaging::{JpegSettings, Quality};
use crate::naming::NamingStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "resize-images.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Which derivative set each source image gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One JPEG per source, same extension, in the images tree. JPEG sources only.
    Basic,
    /// Full-size WebP in the public tree plus a JPEG preview. JPEG and PNG sources.
    Extended,
}

/// Pipeline configuration loaded from `resize-images.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub pipeline: PipelineSection,
    pub full: FullConfig,
    pub preview: PreviewConfig,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory whose subdirectories name the albums.
    pub content_root: PathBuf,
    /// Holds `<album>-source/` inputs and `<album>/` outputs.
    pub images_root: PathBuf,
    /// Full-size outputs land in `<public_root>/images/<album>/` (extended mode).
    pub public_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("src/content/photos"),
            images_root: PathBuf::from("src/assets/images"),
            public_root: PathBuf::from("public"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSection {
    pub mode: Mode,
    pub naming: NamingStrategy,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            mode: Mode::Extended,
            naming: NamingStrategy::Random,
        }
    }
}

/// Full-size (and basic-mode) derivative settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FullConfig {
    pub height: u32,
    pub quality: u32,
}

impl Default for FullConfig {
    fn default() -> Self {
        Self {
            height: 900,
            quality: 92,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub width: u32,
    pub quality: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 610,
            quality: 80,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Command-line overrides; `None` keeps the file/default value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub content_root: Option<PathBuf>,
    pub images_root: Option<PathBuf>,
    pub public_root: Option<PathBuf>,
    pub mode: Option<Mode>,
    pub naming: Option<NamingStrategy>,
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.full.quality) {
            return Err(ConfigError::Validation(
                "full.quality must be 1-100".into(),
            ));
        }
        if !(1..=100).contains(&self.preview.quality) {
            return Err(ConfigError::Validation(
                "preview.quality must be 1-100".into(),
            ));
        }
        if self.full.height == 0 {
            return Err(ConfigError::Validation(
                "full.height must be non-zero".into(),
            ));
        }
        if self.preview.width == 0 {
            return Err(ConfigError::Validation(
                "preview.width must be non-zero".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(p) = overrides.content_root {
            self.paths.content_root = p;
        }
        if let Some(p) = overrides.images_root {
            self.paths.images_root = p;
        }
        if let Some(p) = overrides.public_root {
            self.paths.public_root = p;
        }
        if let Some(mode) = overrides.mode {
            self.pipeline.mode = mode;
        }
        if let Some(naming) = overrides.naming {
            self.pipeline.naming = naming;
        }
        self
    }

    /// `<images_root>/<album>`: basic outputs, or extended-mode previews.
    pub fn album_dir(&self, album: &str) -> PathBuf {
        self.paths.images_root.join(album)
    }

    /// `<public_root>/images/<album>`: extended-mode full-size outputs.
    pub fn public_album_dir(&self, album: &str) -> PathBuf {
        self.paths.public_root.join("images").join(album)
    }

    /// Output directories an album needs, in reset order.
    pub fn output_dirs(&self, album: &str) -> Vec<PathBuf> {
        match self.pipeline.mode {
            Mode::Basic => vec![self.album_dir(album)],
            Mode::Extended => vec![self.album_dir(album), self.public_album_dir(album)],
        }
    }

    /// Encoding presets derived from the `[full]` and `[preview]` sections.
    pub fn presets(&self) -> Presets {
        Presets {
            full_height: self.full.height,
            full_jpeg: JpegSettings::full(Quality::new(self.full.quality)),
            preview_width: self.preview.width,
            preview_jpeg: JpegSettings::preview(Quality::new(self.preview.quality)),
        }
    }
}

/// Load and validate a config file.
///
/// A missing file yields the stock defaults unless `required` is set (the
/// user named the file explicitly with `--config`).
pub fn load_config(path: &Path, required: bool) -> Result<PipelineConfig, ConfigError> {
    if !path.exists() && !required {
        return Ok(PipelineConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// A documented stock `resize-images.toml`.
pub fn stock_config_toml() -> &'static str {
    r#"# resize-images configuration
# All options are optional - defaults shown below.

[paths]
# Directory whose subdirectories name the albums.
content_root = "src/content/photos"
# Holds <album>-source/ inputs and <album>/ outputs.
images_root = "src/assets/images"
# Full-size outputs land in <public_root>/images/<album>/ (extended mode).
public_root = "public"

[pipeline]
# "basic": one JPEG per source, same extension, JPEG sources only.
# "extended": full-size WebP in the public tree plus a JPEG preview.
mode = "extended"
# "random": fresh 16-hex-char ids every run.
# "content": ids derived from the SHA-256 of the source file (stable across runs).
naming = "random"

[full]
# Height bound for full-size derivatives. Smaller images are never enlarged.
height = 900
# JPEG quality for basic mode. Extended full-size output is lossless WebP.
quality = 92

[preview]
# Width bound for previews.
width = 610
quality = 80

[processing]
# Max parallel workers. Omit for auto (= number of CPU cores).
# max_processes = 4
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn default_paths_match_site_layout() {
        let config = PipelineConfig::default();
        assert_eq!(config.paths.content_root, PathBuf::from("src/content/photos"));
        assert_eq!(config.paths.images_root, PathBuf::from("src/assets/images"));
        assert_eq!(config.paths.public_root, PathBuf::from("public"));
    }

    #[test]
    fn default_pipeline_is_extended_random() {
        let config = PipelineConfig::default();
        assert_eq!(config.pipeline.mode, Mode::Extended);
        assert_eq!(config.pipeline.naming, NamingStrategy::Random);
    }

    #[test]
    fn default_bounds_and_qualities() {
        let config = PipelineConfig::default();
        assert_eq!(config.full.height, 900);
        assert_eq!(config.full.quality, 92);
        assert_eq!(config.preview.width, 610);
        assert_eq!(config.preview.quality, 80);
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: PipelineConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.full.height, 900);
        assert_eq!(config.pipeline.mode, Mode::Extended);
        assert!(config.processing.max_processes.is_none());
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn parse_partial_config() {
        let config: PipelineConfig = toml::from_str(
            r#"
            [pipeline]
            mode = "basic"
            "#,
        )
        .unwrap();
        assert_eq!(config.pipeline.mode, Mode::Basic);
        assert_eq!(config.pipeline.naming, NamingStrategy::Random);
        assert_eq!(config.full.height, 900);
    }

    #[test]
    fn parse_content_naming() {
        let config: PipelineConfig = toml::from_str(
            r#"
            [pipeline]
            naming = "content"
            "#,
        )
        .unwrap();
        assert_eq!(config.pipeline.naming, NamingStrategy::Content);
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<PipelineConfig, _> = toml::from_str(
            r#"
            [full]
            hieght = 800
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<PipelineConfig, _> = toml::from_str("[thumbnails]\nsize = 1\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_quality_out_of_range() {
        let mut config = PipelineConfig::default();
        config.preview.quality = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = PipelineConfig::default();
        config.full.quality = 101;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_bounds() {
        let mut config = PipelineConfig::default();
        config.full.height = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.preview.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_workers() {
        let mut config = PipelineConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn load_config_missing_optional_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(DEFAULT_CONFIG_FILE), false).unwrap();
        assert_eq!(config.full.height, 900);
    }

    #[test]
    fn load_config_missing_required_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(&tmp.path().join("custom.toml"), true);
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            r#"
            [paths]
            content_root = "content/albums"

            [preview]
            width = 480
            "#,
        )
        .unwrap();

        let config = load_config(&path, false).unwrap();
        assert_eq!(config.paths.content_root, PathBuf::from("content/albums"));
        assert_eq!(config.preview.width, 480);
        assert_eq!(config.preview.quality, 80);
    }

    #[test]
    fn load_config_runs_validation() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[full]\nquality = 0\n").unwrap();
        assert!(matches!(
            load_config(&path, false),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[full\nheight = ").unwrap();
        assert!(matches!(load_config(&path, false), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Overrides and derived paths
    // =========================================================================

    #[test]
    fn overrides_replace_only_given_values() {
        let config = PipelineConfig::default().with_overrides(Overrides {
            images_root: Some(PathBuf::from("/tmp/images")),
            mode: Some(Mode::Basic),
            ..Overrides::default()
        });
        assert_eq!(config.paths.images_root, PathBuf::from("/tmp/images"));
        assert_eq!(config.paths.content_root, PathBuf::from("src/content/photos"));
        assert_eq!(config.pipeline.mode, Mode::Basic);
        assert_eq!(config.pipeline.naming, NamingStrategy::Random);
    }

    #[test]
    fn output_dirs_per_mode() {
        let mut config = PipelineConfig::default();
        assert_eq!(
            config.output_dirs("tokyo"),
            vec![
                PathBuf::from("src/assets/images/tokyo"),
                PathBuf::from("public/images/tokyo"),
            ]
        );

        config.pipeline.mode = Mode::Basic;
        assert_eq!(
            config.output_dirs("tokyo"),
            vec![PathBuf::from("src/assets/images/tokyo")]
        );
    }

    #[test]
    fn presets_follow_config() {
        let mut config = PipelineConfig::default();
        config.full.quality = 85;
        config.preview.width = 300;
        let presets = config.presets();
        assert_eq!(presets.full_jpeg.quality.value(), 85);
        assert_eq!(presets.preview_width, 300);
        assert_eq!(presets.full_height, 900);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_auto_uses_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }
}
