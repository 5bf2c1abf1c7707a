//! Top-level entry points: generate a plan, save it, render it.
//!
//! [`run`] is the whole flow. The pieces are public too, so a caller that
//! already has plan text can go straight to [`save_text`] and
//! [`write_pdf_for`], or skip the files entirely with
//! [`crate::pipeline::render::render_document`].

use crate::config::GenerationConfig;
use crate::error::{LineWarning, PlanError};
use crate::output::{PlanOutput, PlanStats};
use crate::pipeline::llm::{self, PlanResponse};
use crate::pipeline::postprocess::clean_plan_text;
use crate::pipeline::render::{render_document, render_pdf_bytes};
use crate::profile::ClientProfile;
use crate::prompts::build_nutrition_prompt;
use chrono::{DateTime, Local};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Generate the plan text for a profile: one model call, then cleanup.
///
/// # Errors
/// [`PlanError::ProviderNotConfigured`] when no provider can be built,
/// [`PlanError::LlmApiError`] when the call fails and
/// [`PlanError::EmptyPlan`] when the model answers with nothing usable.
pub async fn generate_plan(
    profile: &ClientProfile,
    config: &GenerationConfig,
) -> Result<PlanResponse, PlanError> {
    let provider = resolve_provider(config)?;
    let prompt = build_nutrition_prompt(profile);
    debug!("Prompt is {} chars", prompt.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_generation_start(config.model_or_default());
    }

    let mut response = llm::generate_plan_text(&provider, &prompt, config).await?;
    response.content = clean_plan_text(&response.content);
    if response.content.is_empty() {
        return Err(PlanError::EmptyPlan);
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_generation_complete(response.content.chars().count());
    }
    Ok(response)
}

/// Generate, save the text, then render the PDF.
///
/// The generated plan is attached to `profile`. A PDF failure does not fail
/// the run: it is logged, reported through the progress callback and
/// returned in [`PlanOutput::pdf_error`].
pub async fn run(
    profile: &mut ClientProfile,
    config: &GenerationConfig,
) -> Result<PlanOutput, PlanError> {
    let total_start = Instant::now();
    info!("Generating plan for {}", profile.name);

    let response = generate_plan(profile, config).await?;
    info!(
        "Plan generated: {} chars in {}ms",
        response.content.len(),
        response.duration_ms
    );
    profile.attach_plan(response.content.clone());

    let mut output = finish(profile, response.content, config, Local::now()).await?;
    output.stats.input_tokens = response.input_tokens;
    output.stats.output_tokens = response.output_tokens;
    output.stats.llm_duration_ms = response.duration_ms;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Save and render plan text that was produced elsewhere, skipping the model.
pub async fn run_with_text(
    profile: &mut ClientProfile,
    plan_text: &str,
    config: &GenerationConfig,
) -> Result<PlanOutput, PlanError> {
    let total_start = Instant::now();
    let text = clean_plan_text(plan_text);
    if text.is_empty() {
        return Err(PlanError::EmptyPlan);
    }
    profile.attach_plan(text.clone());
    let mut output = finish(profile, text, config, Local::now()).await?;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Synchronous wrapper around [`run`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(
    profile: &mut ClientProfile,
    config: &GenerationConfig,
) -> Result<PlanOutput, PlanError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PlanError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(run(profile, config))
}

async fn finish(
    profile: &ClientProfile,
    text: String,
    config: &GenerationConfig,
    at: DateTime<Local>,
) -> Result<PlanOutput, PlanError> {
    let stem = plan_file_stem(profile, &at);
    let text_path = config.output_dir.join(format!("{stem}.txt"));
    save_text(&text_path, profile, &text, &at).await?;
    info!("Text plan saved to {}", text_path.display());
    if let Some(ref cb) = config.progress_callback {
        cb.on_text_saved(&text_path);
    }

    let mut output = PlanOutput {
        plan_text: text,
        text_path,
        pdf_path: None,
        pdf_error: None,
        warnings: Vec::new(),
        stats: PlanStats::default(),
    };
    output.stats.plan_chars = output.plan_text.chars().count();

    if !config.write_pdf {
        return Ok(output);
    }

    let pdf_path = config.output_dir.join(format!("{stem}.pdf"));
    let render_start = Instant::now();
    match write_pdf_for(&pdf_path, &output.plan_text, profile).await {
        Ok((pages, warnings)) => {
            info!("PDF saved to {} ({} pages)", pdf_path.display(), pages);
            if let Some(ref cb) = config.progress_callback {
                cb.on_pdf_saved(&pdf_path, pages, warnings.len());
            }
            output.stats.pages = pages;
            output.warnings = warnings;
            output.pdf_path = Some(pdf_path);
        }
        Err(e) => {
            warn!("PDF generation failed: {}", e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_pdf_error(&e.to_string());
            }
            output.pdf_error = Some(e.to_string());
        }
    }
    output.stats.render_duration_ms = render_start.elapsed().as_millis() as u64;
    Ok(output)
}

/// `nutrition_plan_<Name_With_Underscores>_<YYYYmmdd_HHMMSS>`.
pub fn plan_file_stem(profile: &ClientProfile, at: &DateTime<Local>) -> String {
    format!(
        "nutrition_plan_{}_{}",
        profile.file_stem_name(),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// The fixed header written above the plan in the text file.
pub fn text_banner(profile: &ClientProfile, at: &DateTime<Local>) -> String {
    let rule = "=".repeat(80);
    format!(
        "{rule}\nPERSONAL NUTRITION PLAN\n{rule}\n\nGenerated: {}\nClient: {}\n\n",
        at.format("%d %B %Y at %I:%M %p"),
        profile.name
    )
}

/// Write the banner and plan text to `path`, creating parent directories.
pub async fn save_text(
    path: &Path,
    profile: &ClientProfile,
    plan: &str,
    at: &DateTime<Local>,
) -> Result<(), PlanError> {
    let mut body = text_banner(profile, at);
    body.push_str(plan);
    write_atomic(path, body.as_bytes()).await
}

/// Render `plan` for `profile` and write the PDF to `path`.
///
/// Returns the page count and any per-line formatting warnings. Nothing is
/// left at `path` on failure.
pub async fn write_pdf_for(
    path: &Path,
    plan: &str,
    profile: &ClientProfile,
) -> Result<(usize, Vec<LineWarning>), PlanError> {
    let mut doc = render_document(plan, profile);
    let warnings = std::mem::take(&mut doc.warnings);
    if !warnings.is_empty() {
        warn!("{} line(s) rendered without formatting", warnings.len());
    }
    let pdf = render_pdf_bytes(doc).await?;
    write_atomic(path, &pdf.bytes).await?;
    Ok((pdf.pages, warnings))
}

/// Atomic write: temp file next to the target, then rename.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PlanError> {
    let fail = |e| PlanError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(fail)?;
        }
    }
    let tmp_path = tmp_path_for(path);
    if let Err(e) = tokio::fs::write(&tmp_path, bytes).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(fail(e));
    }
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(fail(e));
    }
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// ── Provider resolution ──────────────────────────────────────────────────

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, PlanError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        PlanError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific:
///
/// 1. a pre-built `config.provider`;
/// 2. `config.provider_name` with the configured model;
/// 3. `EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL` when both are set;
/// 4. an explicit `config.model` with [`crate::config::DEFAULT_PROVIDER`]
///    when `ANTHROPIC_API_KEY` is present;
/// 5. `ProviderFactory::from_env` auto-detection.
pub fn resolve_provider(config: &GenerationConfig) -> Result<Arc<dyn LLMProvider>, PlanError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        return create_provider(name, config.model_or_default());
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        if !key.is_empty() {
            return create_provider(crate::config::DEFAULT_PROVIDER, config.model_or_default());
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| PlanError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set ANTHROPIC_API_KEY, OPENAI_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Gender;
    use chrono::TimeZone;

    fn profile() -> ClientProfile {
        ClientProfile::builder("Mary Jane Watson")
            .age(30)
            .gender(Gender::Female)
            .height("170cm")
            .current_weight("65kg")
            .ideal_weight("62kg")
            .build()
            .unwrap()
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn file_stem_format() {
        assert_eq!(
            plan_file_stem(&profile(), &at()),
            "nutrition_plan_Mary_Jane_Watson_20260109_140507"
        );
    }

    #[test]
    fn banner_layout() {
        let banner = text_banner(&profile(), &at());
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines[0], "=".repeat(80));
        assert_eq!(lines[1], "PERSONAL NUTRITION PLAN");
        assert_eq!(lines[2], "=".repeat(80));
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Generated: 09 January 2026 at 02:05 PM");
        assert_eq!(lines[5], "Client: Mary Jane Watson");
        assert!(banner.ends_with("\n\n"));
    }

    #[test]
    fn tmp_path_sits_next_to_target() {
        assert_eq!(
            tmp_path_for(Path::new("out/plan.pdf")),
            PathBuf::from("out/plan.pdf.tmp")
        );
    }

    #[tokio::test]
    async fn save_text_writes_banner_then_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("plan.txt");
        save_text(&path, &profile(), "DAY 1:\nOats\n", &at()).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(&"=".repeat(80)));
        assert!(written.ends_with("Client: Mary Jane Watson\n\nDAY 1:\nOats\n"));
        assert!(!dir.path().join("nested").join("plan.txt.tmp").exists());
    }

    #[tokio::test]
    async fn run_with_text_rejects_blank_plan() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::builder()
            .output_dir(dir.path())
            .build()
            .unwrap();
        let mut p = profile();
        let err = run_with_text(&mut p, " \n\n", &config).await.unwrap_err();
        assert!(matches!(err, PlanError::EmptyPlan));
        assert!(p.generated_plan.is_none());
    }
}
