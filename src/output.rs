//! Results of a generate-and-render run.

use crate::error::LineWarning;
use serde::Serialize;
use std::path::PathBuf;

/// Everything a run produced.
///
/// The text file is always written before the PDF is attempted, so a
/// populated `pdf_error` still comes with a usable `text_path`.
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutput {
    /// Cleaned plan text, as saved below the banner.
    pub plan_text: String,
    pub text_path: PathBuf,
    /// `None` when PDF output was disabled or failed.
    pub pdf_path: Option<PathBuf>,
    /// Why the PDF is missing, when it was requested but could not be built.
    pub pdf_error: Option<String>,
    /// Lines that fell back to plain paragraphs.
    pub warnings: Vec<LineWarning>,
    pub stats: PlanStats,
}

impl PlanOutput {
    pub fn has_pdf(&self) -> bool {
        self.pdf_path.is_some()
    }
}

/// Timing and usage figures for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanStats {
    /// Total pages in the PDF, cover included. Zero without a PDF.
    pub pages: usize,
    pub plan_chars: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub llm_duration_ms: u64,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_without_pdf() {
        let out = PlanOutput {
            plan_text: "DAY 1:\n".into(),
            text_path: PathBuf::from("plan.txt"),
            pdf_path: None,
            pdf_error: Some("PDF assembly failed: boom".into()),
            warnings: Vec::new(),
            stats: PlanStats::default(),
        };
        assert!(!out.has_pdf());
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"pdf_path\":null"));
        assert!(json.contains("boom"));
    }
}
