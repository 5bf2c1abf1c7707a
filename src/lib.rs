//! # nutriplan-pdf
//!
//! Generate a personalised nutrition plan with an LLM and render it as a
//! styled, paginated PDF.
//!
//! The model answers in loosely structured text: section titles in caps or
//! bold, `DAY 1:` headers, `**Recipe Name**` labels, `- item - qty`
//! shopping lines. The renderer classifies every line, keeps a little state
//! for recipes and shopping lists, and turns the result into headings,
//! boxed day labels, recipe cards and check-box tables behind a cover page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ClientProfile
//!  │
//!  ├─ 1. Prompt    profile → one user turn
//!  ├─ 2. LLM       single chat call (claude / gpt / gemini / …), no retry
//!  ├─ 3. Polish    fences, line endings, invisible characters
//!  ├─ 4. Save      banner + plan text → .txt
//!  ├─ 5. Render    cover + parsed blocks → laid-out pages → page numbers
//!  └─ 6. Output    .pdf written atomically next to the .txt
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nutriplan_pdf::{run, ClientProfile, GenerationConfig, Gender};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from ANTHROPIC_API_KEY / OPENAI_API_KEY / …
//!     let mut profile = ClientProfile::builder("Sam Lee")
//!         .age(34)
//!         .gender(Gender::Male)
//!         .height("178cm")
//!         .current_weight("82kg")
//!         .ideal_weight("76kg")
//!         .build()?;
//!     let output = run(&mut profile, &GenerationConfig::default()).await?;
//!     println!("{}", output.text_path.display());
//!     if let Some(pdf) = output.pdf_path {
//!         println!("{}", pdf.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Rendering alone needs no network:
//!
//! ```rust
//! use nutriplan_pdf::{render_document, ClientProfile, Gender};
//!
//! let profile = ClientProfile::builder("Ana")
//!     .age(29)
//!     .gender(Gender::Female)
//!     .height("160cm")
//!     .current_weight("60kg")
//!     .ideal_weight("58kg")
//!     .build()
//!     .unwrap();
//! let doc = render_document("SHOPPING LIST\n- Oats - 500g\n", &profile);
//! assert!(!doc.content().is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `nutriplan` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod progress;
pub mod prompts;
pub mod theme;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerationConfig, GenerationConfigBuilder, DEFAULT_MODEL, DEFAULT_PROVIDER};
pub use document::{Block, Document};
pub use error::{LineWarning, MarkupError, PlanError};
pub use generate::{generate_plan, run, run_sync, run_with_text, save_text, write_pdf_for};
pub use output::{PlanOutput, PlanStats};
pub use pipeline::llm::PlanResponse;
pub use pipeline::parse::{parse_plan, parse_plan_after, ParseOutput};
pub use pipeline::render::{render_document, render_pdf_blocking, render_pdf_bytes, RenderedPdf};
pub use profile::{
    ActivityLevel, ClientProfile, ClientProfileBuilder, CookingSkill, Gender, Goal, MealPrepStyle,
};
pub use progress::{NoopProgressCallback, PlanProgressCallback, ProgressCallback};
pub use prompts::build_nutrition_prompt;
