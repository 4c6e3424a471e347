//! Progress reporting for pipeline runs.
//!
//! The pipeline reports rows as it reads them through [`ProgressCallback`],
//! leaving rendering to the caller: the CLI draws `indicatif` spinners,
//! tests and library callers use [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates from a running pipeline.
pub trait ProgressCallback: Send + Sync {
    /// Advance progress by `delta` rows.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
