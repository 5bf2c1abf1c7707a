//! Pipeline stages for plan generation and rendering.
//!
//! Each submodule implements one transformation step and is testable on
//! its own. Only [`llm`] does network I/O; everything after it is
//! deterministic.
//!
//! ## Data Flow
//!
//! ```text
//! profile ──▶ llm ──▶ postprocess ──▶ parse ──▶ layout ──▶ stamp ──▶ pdf
//!            (chat)   (cleanup)       (blocks)  (pages)    (chrome)  (bytes)
//! ```
//!
//! 1. [`llm`]         one chat call with the prompt from [`crate::prompts`]
//! 2. [`postprocess`] strip fences, line endings and invisible characters
//! 3. [`cover`] + [`parse`] build the [`crate::document::Document`]; parsing
//!    leans on [`classify`], [`blocks`] and [`sanitize`]
//! 4. [`layout`]      flow blocks onto draft pages, measured with [`metrics`]
//! 5. [`stamp`]       headers and "Page N of M" once the total is known
//! 6. [`pdf`]         serialise with `printpdf`
//!
//! [`render`] ties steps 3–6 together.

pub mod blocks;
pub mod classify;
pub mod cover;
pub mod layout;
pub mod llm;
pub mod metrics;
pub mod parse;
pub mod pdf;
pub mod postprocess;
pub mod render;
pub mod sanitize;
pub mod stamp;
