//! Pipeline stages for roster-to-dossier generation.
//!
//! Each submodule implements one transformation step and is tested on its
//! own.
//!
//! ## Data Flow
//!
//! ```text
//!                 ┌──────────▶ template ─────────┐
//! input ──▶ load ─┤  (decode)                    ├──▶ HTML
//! (path)   (rows) └──▶ photo ──▶ encode ─────────┘
//!                    (crop)    (JPEG/base64)
//! ```
//!
//! 1. [`input`]    - check the data file exists and pick a reader by extension
//! 2. [`decode`]   - strict text decoding over an ordered encoding list
//! 3. [`load`]     - CSV or first worksheet → [`crate::record::AgentRecord`]s
//! 4. [`photo`]    - find the agent's photo, center-crop to 3:4, resize
//! 5. [`encode`]   - JPEG-encode and wrap as a `data:` URI
//! 6. [`template`] - single-pass `{placeholder}` substitution

pub mod decode;
pub mod encode;
pub mod input;
pub mod load;
pub mod photo;
pub mod template;
