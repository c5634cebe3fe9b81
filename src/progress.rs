//! Progress-callback trait for per-record generation events.
//!
//! Inject an [`Arc<dyn DossierProgressCallback>`] via
//! [`crate::config::DossierConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through the roster. The CLI uses it to drive
//! its progress bar; library callers can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use agent_dossier::{DossierConfig, DossierProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl DossierProgressCallback for CountingCallback {
//!     fn on_record_complete(&self, _row: usize, _total: usize, _path: &std::path::Path) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { written: AtomicUsize::new(0) });
//!
//! let config = DossierConfig::builder()
//!     .progress_callback(counter as Arc<dyn DossierProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as it processes each record.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Records are processed one at a time, in input
/// order; `Send + Sync` is required only so configs can be shared freely.
pub trait DossierProgressCallback: Send + Sync {
    /// Called once after the template and data are loaded.
    ///
    /// # Arguments
    /// * `total_records` - number of records that will be processed
    fn on_run_start(&self, total_records: usize) {
        let _ = total_records;
    }

    /// Called before a record is rendered.
    ///
    /// # Arguments
    /// * `row`   - 1-based data row
    /// * `total` - total records
    /// * `name`  - agent name as supplied, empty when the row has none
    fn on_record_start(&self, row: usize, total: usize, name: &str) {
        let _ = (row, total, name);
    }

    /// Called after a dossier was written to `path`.
    fn on_record_complete(&self, row: usize, total: usize, path: &Path) {
        let _ = (row, total, path);
    }

    /// Called when a record is skipped.
    ///
    /// # Arguments
    /// * `error` - human-readable error description
    fn on_record_error(&self, row: usize, total: usize, error: &str) {
        let _ = (row, total, error);
    }

    /// Called once after every record has been attempted.
    fn on_run_complete(&self, total_records: usize, written: usize) {
        let _ = (total_records, written);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl DossierProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::DossierConfig`].
pub type ProgressCallback = Arc<dyn DossierProgressCallback>;
