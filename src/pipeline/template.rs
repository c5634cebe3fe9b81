//! Template loading and placeholder substitution.
//!
//! Templates are plain HTML with `{key}` tokens. Substitution is a single
//! regex pass over the template: each known token is replaced by its value
//! and the replacement text is never scanned again, so a record value that
//! happens to contain `{name}` stays literal. Unknown `{...}` sequences
//! (CSS blocks, JavaScript) are left untouched.
//!
//! Values are inserted verbatim. Template and roster are trusted inputs.

use crate::config::PhotoSpec;
use crate::error::DossierError;
use crate::pipeline::decode::{self, TextEncoding};
use crate::record::{AgentField, AgentRecord};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Markup used when no photo could be embedded.
pub const PHOTO_PENDING: &str = "PHOTO<br>[PENDING]";

/// `strftime` format of the `{timestamp}` placeholder.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Triangle glyphs as they appear after UTF-8 was misread as Windows-1252.
const MOJIBAKE_TRIANGLES: [&str; 2] = ["â–³", "â–²"];
const TRIANGLE: &str = "▲";

/// One substitutable token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Field(AgentField),
    Timestamp,
    Photo,
}

impl Placeholder {
    /// All eighteen tokens a template may use.
    pub fn all() -> impl Iterator<Item = Placeholder> {
        AgentField::ALL
            .into_iter()
            .map(Placeholder::Field)
            .chain([Placeholder::Timestamp, Placeholder::Photo])
    }

    pub fn key(&self) -> &'static str {
        match self {
            Placeholder::Field(f) => f.key(),
            Placeholder::Timestamp => "timestamp",
            Placeholder::Photo => "photo",
        }
    }

    /// The literal token, braces included.
    pub fn token(&self) -> String {
        format!("{{{}}}", self.key())
    }

    pub fn from_key(key: &str) -> Option<Placeholder> {
        match key {
            "timestamp" => Some(Placeholder::Timestamp),
            "photo" => Some(Placeholder::Photo),
            other => AgentField::from_key(other).map(Placeholder::Field),
        }
    }
}

static RE_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    let keys: Vec<&str> = Placeholder::all().map(|p| p.key()).collect();
    Regex::new(&format!(r"\{{({})\}}", keys.join("|"))).unwrap()
});

/// What goes into the `{photo}` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoMarkup {
    /// An inline `data:` URI.
    Embedded(String),
    Pending,
}

impl PhotoMarkup {
    pub fn from_data_uri(uri: Option<String>) -> Self {
        uri.map_or(PhotoMarkup::Pending, PhotoMarkup::Embedded)
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, PhotoMarkup::Embedded(_))
    }

    /// HTML for the photo slot, sized to the photo box.
    pub fn to_html(&self, spec: &PhotoSpec) -> String {
        match self {
            PhotoMarkup::Embedded(uri) => format!(
                r#"<img src="{}" alt="Agent Photo" style="width: {}px; height: {}px; object-fit: cover;">"#,
                uri, spec.width, spec.height
            ),
            PhotoMarkup::Pending => PHOTO_PENDING.to_string(),
        }
    }
}

/// Per-record values that do not come from the roster.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub timestamp: String,
    pub photo: PhotoMarkup,
}

impl RenderContext {
    /// Context stamped with the current local time.
    pub fn now(photo: PhotoMarkup) -> Self {
        Self {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            photo,
        }
    }
}

/// A loaded dossier template.
#[derive(Debug, Clone)]
pub struct Template {
    pub path: PathBuf,
    text: String,
}

impl Template {
    pub fn from_string(text: impl Into<String>) -> Self {
        Self {
            path: PathBuf::new(),
            text: text.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Known placeholders that never occur in the template.
    pub fn missing_placeholders(&self) -> Vec<Placeholder> {
        Placeholder::all()
            .filter(|p| !self.text.contains(&p.token()))
            .collect()
    }

    /// Substitute every known token in one pass.
    pub fn render(&self, record: &AgentRecord, ctx: &RenderContext, spec: &PhotoSpec) -> String {
        let photo_html = ctx.photo.to_html(spec);
        RE_PLACEHOLDER
            .replace_all(&self.text, |caps: &Captures| -> String {
                match Placeholder::from_key(&caps[1]) {
                    Some(Placeholder::Field(f)) => record.get(f).to_string(),
                    Some(Placeholder::Timestamp) => ctx.timestamp.clone(),
                    Some(Placeholder::Photo) => photo_html.clone(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Load and decode the template at `path`.
///
/// Strict UTF-8 first, then each fallback encoding, then lossy UTF-8.
/// Misdecoded triangle glyphs are repaired either way.
pub fn load_template(path: impl AsRef<Path>, fallbacks: &[TextEncoding]) -> Result<Template, DossierError> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(DossierError::TemplateNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| DossierError::TemplateUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let text = match TextEncoding::Utf8.decode_strict(&bytes) {
        Some(text) => text,
        None => match decode::decode(&bytes, fallbacks) {
            Ok((text, enc)) => {
                info!("Loaded template with {} encoding", enc);
                text
            }
            Err(_) => {
                info!("Loaded template with fallback decoding");
                String::from_utf8_lossy(&bytes).into_owned()
            }
        },
    };

    let template = Template {
        path: path.to_path_buf(),
        text: repair_mojibake(text),
    };

    let missing = template.missing_placeholders();
    if !missing.is_empty() {
        debug!(
            "Template {} does not use: {}",
            path.display(),
            missing.iter().map(|p| p.token()).collect::<Vec<_>>().join(" ")
        );
    }

    Ok(template)
}

fn repair_mojibake(text: String) -> String {
    if !MOJIBAKE_TRIANGLES.iter().any(|m| text.contains(m)) {
        return text;
    }
    MOJIBAKE_TRIANGLES
        .iter()
        .fold(text, |acc, bad| acc.replace(bad, TRIANGLE))
}
