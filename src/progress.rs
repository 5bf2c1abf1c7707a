//! Progress-callback trait for generation and rendering events.
//!
//! Inject an [`Arc<dyn PlanProgressCallback>`] via
//! [`crate::config::GenerationConfigBuilder::progress_callback`] to receive
//! events as the run moves from the LLM call to the saved artefacts.
//!
//! The LLM call dominates wall-clock time (often a minute or more for a full
//! week), so the main consumer is a terminal spinner; the trait keeps the
//! library free of any terminal dependency.
//!
//! # Example
//!
//! ```rust
//! use nutriplan_pdf::{GenerationConfig, PlanProgressCallback};
//! use std::sync::Arc;
//!
//! struct Log;
//!
//! impl PlanProgressCallback for Log {
//!     fn on_generation_complete(&self, chars: usize) {
//!         eprintln!("plan ready: {chars} chars");
//!     }
//! }
//!
//! let config = GenerationConfig::builder()
//!     .progress_callback(Arc::new(Log) as Arc<dyn PlanProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as it moves through each stage.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait PlanProgressCallback: Send + Sync {
    /// Called just before the LLM request is sent.
    fn on_generation_start(&self, model: &str) {
        let _ = model;
    }

    /// Called when the model returned a usable plan.
    ///
    /// # Arguments
    /// * `chars`: character count of the cleaned plan text
    fn on_generation_complete(&self, chars: usize) {
        let _ = chars;
    }

    /// Called once the plain-text plan is on disk.
    fn on_text_saved(&self, path: &Path) {
        let _ = path;
    }

    /// Called once the PDF is on disk.
    ///
    /// # Arguments
    /// * `pages`: total page count, cover included
    /// * `warnings`: lines that fell back to plain paragraphs
    fn on_pdf_saved(&self, path: &Path, pages: usize, warnings: usize) {
        let _ = (path, pages, warnings);
    }

    /// Called when the PDF could not be produced. The text plan is kept.
    fn on_pdf_error(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PlanProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::GenerationConfig`].
pub type ProgressCallback = Arc<dyn PlanProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Tracking {
        chars: AtomicUsize,
        pages: AtomicUsize,
        errors: Mutex<Vec<String>>,
    }

    impl PlanProgressCallback for Tracking {
        fn on_generation_complete(&self, chars: usize) {
            self.chars.store(chars, Ordering::SeqCst);
        }

        fn on_pdf_saved(&self, _path: &Path, pages: usize, _warnings: usize) {
            self.pages.store(pages, Ordering::SeqCst);
        }

        fn on_pdf_error(&self, error: &str) {
            self.errors.lock().unwrap().push(error.to_string());
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_generation_start("m");
        cb.on_generation_complete(10);
        cb.on_text_saved(Path::new("a.txt"));
        cb.on_pdf_saved(Path::new("a.pdf"), 3, 0);
        cb.on_pdf_error("boom");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let t = Tracking::default();
        t.on_generation_complete(4200);
        t.on_pdf_saved(Path::new("x.pdf"), 9, 1);
        t.on_pdf_error("disk full");
        assert_eq!(t.chars.load(Ordering::SeqCst), 4200);
        assert_eq!(t.pages.load(Ordering::SeqCst), 9);
        assert_eq!(t.errors.lock().unwrap().as_slice(), ["disk full"]);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_generation_start("claude");
    }
}
