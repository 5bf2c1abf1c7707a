//! Document rendering: plan text + profile → [`Document`] → PDF bytes.
//!
//! Rendering is synchronous and single-threaded. The async entry point
//! [`render_pdf_bytes`] moves the whole build onto `spawn_blocking` so a
//! long plan never stalls a Tokio worker.

use crate::document::Document;
use crate::error::PlanError;
use crate::pipeline::cover::{cover_page, COVER_TITLE};
use crate::pipeline::layout::layout;
use crate::pipeline::parse::parse_plan_after;
use crate::pipeline::pdf::render_pdf;
use crate::pipeline::stamp::stamp_pages;
use crate::profile::ClientProfile;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

/// Build the full document: cover page from the profile, then the parsed
/// plan text. Never fails; unparseable lines are recorded as warnings.
pub fn render_document(text: &str, profile: &ClientProfile) -> Document {
    render_document_on(text, profile, Local::now().date_naive())
}

/// [`render_document`] with an explicit cover date.
pub fn render_document_on(text: &str, profile: &ClientProfile, created: NaiveDate) -> Document {
    let mut blocks = cover_page(profile, created);
    let cover_len = blocks.len();
    let parsed = parse_plan_after(text, cover_len);
    blocks.extend(parsed.blocks);
    debug!(
        cover = cover_len,
        content = blocks.len() - cover_len,
        "Document assembled"
    );
    Document {
        title: format!("{COVER_TITLE} - {}", profile.name),
        client_name: profile.name.clone(),
        blocks,
        cover_len,
        warnings: parsed.warnings,
    }
}

/// A finished PDF and the page count it was stamped with.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Lay out, stamp and serialise a document. Blocking.
pub fn render_pdf_blocking(doc: &Document) -> Result<RenderedPdf, PlanError> {
    let mut pages = layout(doc);
    stamp_pages(&mut pages, &doc.client_name);
    let bytes = render_pdf(&pages, &doc.title)?;
    info!(pages = pages.len(), bytes = bytes.len(), "PDF rendered");
    Ok(RenderedPdf {
        bytes,
        pages: pages.len(),
    })
}

/// Render on the blocking pool.
pub async fn render_pdf_bytes(doc: Document) -> Result<RenderedPdf, PlanError> {
    tokio::task::spawn_blocking(move || render_pdf_blocking(&doc))
        .await
        .map_err(|e| PlanError::Internal(format!("Render task panicked: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;
    use crate::profile::Gender;

    fn profile() -> ClientProfile {
        ClientProfile::builder("Ana Ruiz")
            .age(29)
            .gender(Gender::Female)
            .height("160cm")
            .current_weight("60kg")
            .ideal_weight("58kg")
            .build()
            .unwrap()
    }

    #[test]
    fn cover_precedes_content() {
        let doc = render_document("NUTRITIONAL ANALYSIS\nEat well.", &profile());
        assert!(doc.cover_len > 0);
        assert!(!doc.content().is_empty());
        assert_eq!(doc.client_name, "Ana Ruiz");
    }

    #[test]
    fn empty_text_renders_cover_only() {
        let doc = render_document("", &profile());
        assert!(doc.content().is_empty());
        let pdf = render_pdf_blocking(&doc).unwrap();
        assert_eq!(pdf.pages, 1);
        assert!(pdf.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn major_sections_after_the_cover_start_new_pages() {
        let doc = render_document(
            "NUTRITIONAL ANALYSIS\nTarget 1800 kcal.\nMEAL PLAN\nDay 1 - Monday\n",
            &profile(),
        );
        let breaks = doc.content().iter().filter(|b| **b == Block::PageBreak).count();
        assert_eq!(breaks, 2);
        // The first break follows the cover's own break and adds no page.
        let pdf = render_pdf_blocking(&doc).unwrap();
        assert_eq!(pdf.pages, 3);
    }

    #[tokio::test]
    async fn async_render_matches_blocking() {
        let doc = render_document("Intro line\n- a bullet", &profile());
        let pdf = render_pdf_bytes(doc).await.unwrap();
        assert_eq!(pdf.pages, 2);
    }
}
