//! Photo normalisation: locate, center-crop, resize, embed.
//!
//! Every photo ends up exactly `PhotoSpec::width × PhotoSpec::height`
//! (150×200 by default) so the dossier layout never stretches a face. When
//! the source aspect ratio is off by more than the tolerance, the longer
//! axis is cropped symmetrically first; otherwise the image is only resized.
//!
//! Nothing here is fatal. A missing or unreadable photo is logged and the
//! caller renders the pending-photo placeholder instead.

use crate::config::PhotoSpec;
use crate::error::PhotoError;
use crate::naming;
use crate::pipeline::encode;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, RgbImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where the photo for `agent_name` is expected.
pub fn photo_path(agent_name: &str, photos_dir: &Path, spec: &PhotoSpec) -> PathBuf {
    photos_dir.join(naming::photo_file_name(agent_name, &spec.extension))
}

/// Crop rectangle `(x, y, width, height)` that brings a `width × height`
/// image to the target aspect ratio, or `None` when it is already within
/// tolerance.
pub fn crop_box(width: u32, height: u32, spec: &PhotoSpec) -> Option<(u32, u32, u32, u32)> {
    let target = spec.target_ratio();
    let current = f64::from(width) / f64::from(height);

    if (current - target).abs() <= spec.aspect_tolerance {
        return None;
    }

    if current > target {
        // too wide: trim the sides
        let new_width = ((f64::from(height) * target) as u32).clamp(1, width);
        let left = (width - new_width) / 2;
        Some((left, 0, new_width, height))
    } else {
        // too tall: trim top and bottom
        let new_height = ((f64::from(width) / target) as u32).clamp(1, height);
        let top = (height - new_height) / 2;
        Some((0, top, width, new_height))
    }
}

/// Convert to RGB, center-crop to the target ratio, resize to the target box.
pub fn normalize(img: &DynamicImage, spec: &PhotoSpec) -> RgbImage {
    let mut rgb = img.to_rgb8();

    if let Some((x, y, w, h)) = crop_box(rgb.width(), rgb.height(), spec) {
        debug!(
            "Cropping {}x{} → {}x{} at ({}, {})",
            rgb.width(),
            rgb.height(),
            w,
            h,
            x,
            y
        );
        rgb = imageops::crop_imm(&rgb, x, y, w, h).to_image();
    }

    imageops::resize(&rgb, spec.width, spec.height, FilterType::Lanczos3)
}

/// Load the photo at `path` and return it as an inline JPEG data URI.
pub fn process_photo(path: &Path, spec: &PhotoSpec) -> Result<String, PhotoError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| PhotoError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let img = reader.decode().map_err(|source| PhotoError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let normalized = normalize(&img, spec);
    Ok(encode::encode_jpeg_data_uri(&normalized, spec.jpeg_quality)?)
}

/// Find, normalise and embed the photo for `agent_name`.
///
/// Returns `None` when there is no photo or it cannot be processed.
pub fn load_photo(agent_name: &str, photos_dir: &Path, spec: &PhotoSpec) -> Option<String> {
    let path = photo_path(agent_name, photos_dir, spec);

    if !path.is_file() {
        info!("No photo found for {} at {}", agent_name, path.display());
        return None;
    }

    match process_photo(&path, spec) {
        Ok(uri) => {
            info!("Processed photo for {}", agent_name);
            Some(uri)
        }
        Err(e) => {
            warn!("Error processing photo for {}: {}", agent_name, e);
            None
        }
    }
}
