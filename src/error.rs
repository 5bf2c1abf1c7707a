//! Error types for the nutriplan-pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PlanError`]: **Fatal**: the step cannot proceed at all (invalid
//!   profile, provider not configured, no plan produced, output file could not
//!   be written). Returned as `Err(PlanError)` from the top-level functions.
//!
//! * [`LineWarning`]: **Non-fatal**: a single line of generated text could
//!   not be rendered with its inline formatting. The line is emitted as an
//!   escaped plain paragraph instead and the warning is stored in
//!   [`crate::document::Document::warnings`], so one malformed line never
//!   costs the whole document.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the nutriplan-pdf library.
///
/// Per-line rendering failures use [`LineWarning`] and are stored on the
/// rendered document rather than propagated here.
#[derive(Debug, Error)]
pub enum PlanError {
    // ── Profile errors ────────────────────────────────────────────────────
    /// A profile field failed validation when the record was built.
    #[error("Invalid client profile: {field}: {reason}")]
    InvalidProfile { field: &'static str, reason: String },

    /// A profile file could not be read or parsed.
    #[error("Failed to read client profile '{path}': {detail}")]
    ProfileReadFailed { path: PathBuf, detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API call failed. There is no retry; the run is aborted.
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    /// The provider answered, but with no usable text.
    #[error("No plan produced: the model returned an empty response")]
    EmptyPlan,

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The laid-out pages could not be serialised into a PDF.
    #[error("PDF assembly failed: {0}")]
    PdfAssemblyFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a line's inline markup could not be turned into styled spans.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum MarkupError {
    /// A closing tag with no matching opening tag, or closed out of order.
    #[error("unexpected closing tag </{tag}> at byte {offset}")]
    UnbalancedClose { tag: String, offset: usize },

    /// A tag was opened but never closed.
    #[error("unclosed tag <{tag}>")]
    Unclosed { tag: String },

    /// A tag outside the permitted bold/italic vocabulary.
    #[error("unsupported tag <{tag}> at byte {offset}")]
    UnknownTag { tag: String, offset: usize },

    /// An `&…;` sequence that is not one of the escapes the sanitiser emits.
    #[error("invalid entity at byte {offset}")]
    BadEntity { offset: usize },
}

/// A non-fatal error for a single line of plan text.
///
/// Stored alongside the rendered document when a line fell back to an
/// escaped plain paragraph.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
#[error("Line {line}: could not format '{excerpt}': {cause}")]
pub struct LineWarning {
    /// 1-indexed line number in the plan text.
    pub line: usize,
    /// First 50 characters of the offending line.
    pub excerpt: String,
    /// The markup failure that triggered the fallback.
    pub cause: MarkupError,
}

impl LineWarning {
    pub(crate) fn new(line: usize, text: &str, cause: MarkupError) -> Self {
        Self {
            line,
            excerpt: text.chars().take(50).collect(),
            cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_profile_display() {
        let e = PlanError::InvalidProfile {
            field: "meals_per_day",
            reason: "must be 3–6, got 9".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("meals_per_day"), "got: {msg}");
        assert!(msg.contains("got 9"), "got: {msg}");
    }

    #[test]
    fn empty_plan_display() {
        assert!(PlanError::EmptyPlan.to_string().contains("No plan produced"));
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = PlanError::OutputWriteFailed {
            path: PathBuf::from("/nope/plan.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/nope/plan.pdf"));
        assert!(e.source().is_some());
    }

    #[test]
    fn line_warning_truncates_excerpt() {
        let long = "x".repeat(120);
        let w = LineWarning::new(
            7,
            &long,
            MarkupError::Unclosed { tag: "b".into() },
        );
        assert_eq!(w.excerpt.chars().count(), 50);
        let msg = w.to_string();
        assert!(msg.starts_with("Line 7:"), "got: {msg}");
        assert!(msg.contains("unclosed tag <b>"), "got: {msg}");
    }
}
