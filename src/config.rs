//! Configuration types for dossier generation.
//!
//! All run behaviour is controlled through [`DossierConfig`], built via its
//! [`DossierConfigBuilder`]. The fixed values the dossier layout depends on
//! (photo box size, JPEG quality, crop tolerance) live here as named
//! constants so the template's CSS and the normaliser cannot drift apart
//! silently.

use crate::error::DossierError;
use crate::pipeline::decode::TextEncoding;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Template used when none is given.
pub const DEFAULT_TEMPLATE_PATH: &str = "dossier_template.html";
/// Directory dossiers are written into when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "dossiers";
/// Directory searched for agent photos when none is given.
pub const DEFAULT_PHOTOS_DIR: &str = "photos";

/// Width of the photo box in the dossier layout, in pixels.
pub const PHOTO_WIDTH: u32 = 150;
/// Height of the photo box in the dossier layout, in pixels.
pub const PHOTO_HEIGHT: u32 = 200;
/// JPEG quality used when re-encoding photos.
pub const JPEG_QUALITY: u8 = 85;
/// Aspect ratios closer than this to the target are resized without cropping.
pub const ASPECT_TOLERANCE: f64 = 0.01;
/// Extension appended to the sanitized agent name to locate a photo.
pub const PHOTO_EXTENSION: &str = "jpg";

/// Per-cell text limit of the legacy `.xls` format. A value of exactly this
/// length was most likely truncated upstream.
pub const XLS_CELL_LIMIT: usize = 256;
/// Values longer than this are reported as long-but-complete at DEBUG level.
pub const LONG_FIELD_THRESHOLD: usize = 500;

/// Target geometry and encoding for embedded photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoSpec {
    pub width: u32,
    pub height: u32,
    /// JPEG quality, 1–100.
    pub jpeg_quality: u8,
    pub aspect_tolerance: f64,
    /// File extension (without the dot) photos are looked up with.
    pub extension: String,
}

impl Default for PhotoSpec {
    fn default() -> Self {
        Self {
            width: PHOTO_WIDTH,
            height: PHOTO_HEIGHT,
            jpeg_quality: JPEG_QUALITY,
            aspect_tolerance: ASPECT_TOLERANCE,
            extension: PHOTO_EXTENSION.to_string(),
        }
    }
}

impl PhotoSpec {
    /// Width / height of the target box (0.75 for 150×200).
    pub fn target_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Configuration for a dossier generation run.
///
/// Built via [`DossierConfig::builder()`] or using
/// [`DossierConfig::default()`].
///
/// # Example
/// ```rust
/// use agent_dossier::DossierConfig;
///
/// let config = DossierConfig::builder()
///     .template_path("templates/field_agent.html")
///     .output_dir("out")
///     .jpeg_quality(90)
///     .build()
///     .unwrap();
/// assert_eq!(config.photo.jpeg_quality, 90);
/// ```
#[derive(Clone)]
pub struct DossierConfig {
    /// HTML template with `{placeholder}` tokens. Default: `dossier_template.html`.
    pub template_path: PathBuf,

    /// Directory the dossiers are written into; created if absent. Default: `dossiers`.
    pub output_dir: PathBuf,

    /// Directory holding `<sanitized name>.jpg` photos. Default: `photos`.
    ///
    /// A missing directory is not an error: every dossier gets the
    /// pending-photo placeholder.
    pub photos_dir: PathBuf,

    /// Photo box geometry and JPEG settings.
    pub photo: PhotoSpec,

    /// Encodings tried, in order, for CSV input and template fallback decoding.
    pub encodings: Vec<TextEncoding>,

    /// Optional per-record progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for DossierConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            photos_dir: PathBuf::from(DEFAULT_PHOTOS_DIR),
            photo: PhotoSpec::default(),
            encodings: TextEncoding::DEFAULT_ORDER.to_vec(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for DossierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DossierConfig")
            .field("template_path", &self.template_path)
            .field("output_dir", &self.output_dir)
            .field("photos_dir", &self.photos_dir)
            .field("photo", &self.photo)
            .field("encodings", &self.encodings)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn DossierProgressCallback>"),
            )
            .finish()
    }
}

impl DossierConfig {
    /// Create a new builder for `DossierConfig`.
    pub fn builder() -> DossierConfigBuilder {
        DossierConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`DossierConfig`].
#[derive(Debug)]
pub struct DossierConfigBuilder {
    config: DossierConfig,
}

impl DossierConfigBuilder {
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template_path = path.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn photos_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.photos_dir = dir.into();
        self
    }

    pub fn photo_size(mut self, width: u32, height: u32) -> Self {
        self.config.photo.width = width;
        self.config.photo.height = height;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.photo.jpeg_quality = quality;
        self
    }

    pub fn aspect_tolerance(mut self, tolerance: f64) -> Self {
        self.config.photo.aspect_tolerance = tolerance;
        self
    }

    pub fn encodings(mut self, order: Vec<TextEncoding>) -> Self {
        self.config.encodings = order;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<DossierConfig, DossierError> {
        let p = &self.config.photo;
        if p.width == 0 || p.height == 0 {
            return Err(DossierError::InvalidConfig(format!(
                "Photo size must be non-zero, got {}x{}",
                p.width, p.height
            )));
        }
        if !(1..=100).contains(&p.jpeg_quality) {
            return Err(DossierError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                p.jpeg_quality
            )));
        }
        if !p.aspect_tolerance.is_finite() || p.aspect_tolerance < 0.0 {
            return Err(DossierError::InvalidConfig(format!(
                "Aspect tolerance must be a non-negative number, got {}",
                p.aspect_tolerance
            )));
        }
        if self.config.encodings.is_empty() {
            return Err(DossierError::InvalidConfig(
                "At least one text encoding is required".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_layout() {
        let c = DossierConfig::default();
        assert_eq!(c.template_path, PathBuf::from("dossier_template.html"));
        assert_eq!(c.output_dir, PathBuf::from("dossiers"));
        assert_eq!(c.photos_dir, PathBuf::from("photos"));
        assert_eq!((c.photo.width, c.photo.height), (150, 200));
        assert_eq!(c.photo.jpeg_quality, 85);
        assert!((c.photo.target_ratio() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_zero_quality() {
        let err = DossierConfig::builder().jpeg_quality(0).build().unwrap_err();
        assert!(matches!(err, DossierError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_zero_photo_size() {
        assert!(DossierConfig::builder().photo_size(0, 200).build().is_err());
    }

    #[test]
    fn rejects_empty_encoding_list() {
        assert!(DossierConfig::builder().encodings(vec![]).build().is_err());
    }

    #[test]
    fn rejects_negative_tolerance() {
        assert!(DossierConfig::builder().aspect_tolerance(-0.1).build().is_err());
    }

    #[test]
    fn debug_hides_callback() {
        let dbg = format!("{:?}", DossierConfig::default());
        assert!(dbg.contains("progress_callback: None"));
    }
}
