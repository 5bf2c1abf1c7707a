//! CLI binary for nutriplan-pdf.
//!
//! Collects a client profile (interactively or from a JSON file), asks the
//! model for a plan, saves it as text and renders the PDF.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use nutriplan_pdf::{
    run, run_with_text, write_pdf_for, ActivityLevel, ClientProfile, CookingSkill,
    GenerationConfig, Gender, Goal, MealPrepStyle, PlanOutput, PlanProgressCallback,
    ProgressCallback,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner while the model writes; one log line per saved artefact.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        Arc::new(Self { bar })
    }
}

impl PlanProgressCallback for CliProgressCallback {
    fn on_generation_start(&self, model: &str) {
        self.bar.set_prefix("Generating");
        self.bar
            .set_message(format!("your personalised nutrition plan with {model}…"));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_generation_complete(&self, chars: usize) {
        self.bar.finish_and_clear();
        eprintln!("{} Plan generated {}", green("✓"), dim(&format!("({chars} chars)")));
    }

    fn on_text_saved(&self, path: &Path) {
        eprintln!("{} Text plan saved to {}", green("✓"), bold(&path.display().to_string()));
    }

    fn on_pdf_saved(&self, path: &Path, pages: usize, warnings: usize) {
        let note = if warnings > 0 {
            format!("{pages} pages, {warnings} lines unformatted")
        } else {
            format!("{pages} pages")
        };
        eprintln!(
            "{} PDF saved to {} {}",
            green("✓"),
            bold(&path.display().to_string()),
            dim(&format!("({note})"))
        );
    }

    fn on_pdf_error(&self, error: &str) {
        eprintln!("{} PDF generation failed: {}", red("✗"), red(error));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Answer the questions interactively
  nutriplan

  # Non-interactive, from a saved profile
  nutriplan --profile sam.json -o plans/

  # Re-render an existing plan without calling the model
  nutriplan --profile sam.json --from-text plan.txt

  # Use a specific provider and model
  nutriplan --provider openai --model gpt-4.1 --profile sam.json

PROFILE FILE (JSON):
  {
    "name": "Sam Lee", "age": 34, "gender": "M",
    "height": "178cm", "current_weight": "82kg", "ideal_weight": "76kg",
    "activity_level": "moderately_active", "goal": "fat_loss",
    "diet_type": "pescatarian", "allergies": ["peanuts"],
    "budget": "£60", "plan_duration_days": 7
  }

ENVIRONMENT VARIABLES:
  ANTHROPIC_API_KEY       Anthropic API key (default provider)
  OPENAI_API_KEY          OpenAI API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (anthropic, openai, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  RUST_LOG                Log filter, e.g. nutriplan_pdf=debug
"#;

/// Generate a personalised nutrition plan and render it as a PDF.
#[derive(Parser, Debug)]
#[command(
    name = "nutriplan",
    version,
    about = "Generate a personalised nutrition plan with an LLM and render it as a PDF",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Read the client profile from a JSON file instead of asking.
    #[arg(short, long, env = "NUTRIPLAN_PROFILE")]
    profile: Option<PathBuf>,

    /// Render an existing plan text file instead of calling the model.
    #[arg(long)]
    from_text: Option<PathBuf>,

    /// Directory for the .txt and .pdf files.
    #[arg(short, long, env = "NUTRIPLAN_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// LLM model ID (e.g. claude-sonnet-4-5-20250929, gpt-4.1).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: anthropic, openai, gemini, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// Max LLM output tokens.
    #[arg(long, env = "NUTRIPLAN_MAX_TOKENS", default_value_t = 16_000)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0). Provider default when unset.
    #[arg(long, env = "NUTRIPLAN_TEMPERATURE")]
    temperature: Option<f32>,

    /// Path to a text file containing a system prompt.
    #[arg(long, env = "NUTRIPLAN_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Write the text plan only.
    #[arg(long, env = "NUTRIPLAN_NO_PDF", conflicts_with = "yes")]
    no_pdf: bool,

    /// Write the PDF without asking.
    #[arg(short, long)]
    yes: bool,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "NUTRIPLAN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "NUTRIPLAN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "NUTRIPLAN_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Profile ──────────────────────────────────────────────────────────
    let interactive = cli.profile.is_none();
    let mut profile = match cli.profile {
        Some(ref path) => ClientProfile::from_json_file(path)
            .with_context(|| format!("Failed to load profile from {}", path.display()))?,
        None => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            collect_profile(&mut input).context("Failed to collect profile")?
        }
    };

    // Interactive runs ask about the PDF only after the text is saved.
    let ask_pdf = interactive && !cli.no_pdf && !cli.yes;
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn PlanProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress, !ask_pdf && !cli.no_pdf).await?;

    // ── Generate ─────────────────────────────────────────────────────────
    let mut output = match cli.from_text {
        Some(ref path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read plan text from {}", path.display()))?;
            run_with_text(&mut profile, &text, &config)
                .await
                .context("Failed to save plan")?
        }
        None => run(&mut profile, &config)
            .await
            .context("Plan generation failed")?,
    };

    if ask_pdf {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let answer = ask(&mut input, "\nWould you like a PDF version? (y/n): ")?;
        if matches!(answer.to_lowercase().as_str(), "y" | "yes") {
            pdf_after_text(&mut output, &profile, config.progress_callback.as_ref()).await;
        }
    }

    // ── Summary ──────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&output);
    }
    Ok(())
}

/// Map CLI args to `GenerationConfig`.
async fn build_config(
    cli: &Cli,
    progress: Option<ProgressCallback>,
    write_pdf: bool,
) -> Result<GenerationConfig> {
    let mut builder = GenerationConfig::builder()
        .max_tokens(cli.max_tokens)
        .output_dir(&cli.output_dir)
        .write_pdf(write_pdf);

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }
    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Render the PDF next to an already-saved text plan. Failures are reported
/// and recorded; the text plan stays.
async fn pdf_after_text(
    output: &mut PlanOutput,
    profile: &ClientProfile,
    progress: Option<&ProgressCallback>,
) {
    let path = output.text_path.with_extension("pdf");
    match write_pdf_for(&path, &output.plan_text, profile).await {
        Ok((pages, warnings)) => {
            if let Some(cb) = progress {
                cb.on_pdf_saved(&path, pages, warnings.len());
            }
            output.stats.pages = pages;
            output.warnings = warnings;
            output.pdf_path = Some(path);
        }
        Err(e) => {
            tracing::warn!("PDF generation failed: {}", e);
            if let Some(cb) = progress {
                cb.on_pdf_error(&e.to_string());
            }
            output.pdf_error = Some(e.to_string());
        }
    }
}

fn print_summary(output: &PlanOutput) {
    let rule = "=".repeat(60);
    println!("\n{rule}");
    println!("{}", bold("YOUR NUTRITION PLAN IS READY!"));
    println!("{rule}");
    println!("\nText version: {}", output.text_path.display());
    match (&output.pdf_path, &output.pdf_error) {
        (Some(pdf), _) => println!("PDF version:  {}", pdf.display()),
        (None, Some(err)) => println!("PDF version:  {} ({err})", red("not created")),
        (None, None) => {}
    }
    if output.stats.output_tokens > 0 {
        println!(
            "{}",
            dim(&format!(
                "{} tokens in / {} tokens out, {}ms",
                output.stats.input_tokens, output.stats.output_tokens, output.stats.total_duration_ms
            ))
        );
    }
    println!("\nNext steps:");
    println!("  - Review your personalised plan");
    println!("  - Use the shopping list for your grocery trip");
    println!("  - Follow the meal plan");
    println!("  - Track your progress!\n");
}

// ── Interactive collection ───────────────────────────────────────────────────

fn ask(input: &mut impl BufRead, prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    io::stderr().flush().ok();
    let mut line = String::new();
    if input.read_line(&mut line).context("Failed to read answer")? == 0 {
        bail!("Input ended before the profile was complete");
    }
    Ok(line.trim().to_string())
}

fn ask_or(input: &mut impl BufRead, prompt: &str, default: &str) -> Result<String> {
    let answer = ask(input, prompt)?;
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer
    })
}

/// Re-ask until the answer parses and passes `check`.
fn ask_number<T>(
    input: &mut impl BufRead,
    prompt: &str,
    default: Option<T>,
    check: impl Fn(&T) -> bool,
) -> Result<T>
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    loop {
        let answer = ask(input, prompt)?;
        if answer.is_empty() {
            if let Some(d) = default {
                return Ok(d);
            }
        }
        match answer.parse::<T>() {
            Ok(v) if check(&v) => return Ok(v),
            _ => eprintln!("Please enter a valid number"),
        }
    }
}

fn ask_required(input: &mut impl BufRead, prompt: &str) -> Result<String> {
    loop {
        let answer = ask(input, prompt)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
        eprintln!("This one is required");
    }
}

fn section(title: &str) {
    eprintln!("\n{}", bold(title));
    eprintln!("{}", "-".repeat(60));
}

fn menu(items: &[&str]) {
    for (i, item) in items.iter().enumerate() {
        eprintln!("{}. {item}", i + 1);
    }
}

fn collect_profile(input: &mut impl BufRead) -> Result<ClientProfile> {
    eprintln!("{}", "=".repeat(60));
    eprintln!("{}", bold("PERSONAL NUTRITION PLAN GENERATOR"));
    eprintln!("{}", "=".repeat(60));
    eprintln!("\nLet's create your personalised nutrition plan!");

    section("PERSONAL INFORMATION");
    let name = ask_required(input, "What's your name? ")?;
    let age: u32 = ask_number(input, "Age: ", None, |a| (1..=120).contains(a))?;
    let gender = loop {
        match Gender::parse(&ask(input, "Gender (M/F): ")?) {
            Some(g) => break g,
            None => eprintln!("Please enter M or F"),
        }
    };
    let height = ask_required(input, "Height (e.g., 5'10\" or 178cm): ")?;
    let current_weight = ask_required(input, "Current weight (e.g., 165lbs or 75kg): ")?;
    let ideal_weight = ask_required(input, "Ideal weight (e.g., 155lbs or 70kg): ")?;

    section("ACTIVITY LEVEL");
    menu(ActivityLevel::MENU);
    let activity = ActivityLevel::from_menu_choice(&ask(input, "\nSelect your activity level (1-5): ")?);

    section("NUTRITION GOALS");
    menu(Goal::MENU);
    let goal = Goal::from_menu_choice(&ask(input, "\nWhat's your primary goal? (1-4): ")?);

    section("DIETARY REQUIREMENTS & RESTRICTIONS");
    let diet = ask_or(
        input,
        "Diet type (e.g., omnivore, vegetarian, vegan, pescatarian): ",
        "omnivore",
    )?;
    let allergies = ask(input, "Any allergies? (comma-separated): ")?;
    let dislikes = ask(input, "Foods you dislike or want to avoid: ")?;
    let cuisines = ask(input, "Cuisine preferences (e.g., Mediterranean, Asian, Mexican): ")?;

    section("PRACTICAL CONSTRAINTS");
    let budget = ask(input, "Weekly food budget (e.g., £50, £100): ")?;
    eprintln!("\nCooking skill level:");
    menu(CookingSkill::MENU);
    let skill = CookingSkill::from_menu_choice(&ask(input, "Select (1-3): ")?);
    let prep: u32 = ask_number(input, "Max time for meal prep per day (minutes): ", Some(30), |m| *m > 0)?;
    let meals: u8 = ask_number(input, "Meals per day (3-6): ", Some(3), |m| (3..=6).contains(m))?;

    section("PLAN DETAILS");
    let days: u32 = ask_number(
        input,
        "Plan duration in days (e.g., 7 for one week): ",
        Some(7),
        |d| (1..=28).contains(d),
    )?;
    let style = MealPrepStyle::parse(&ask(input, "Meal prep preference (daily/batch/mixed): ")?);

    let mut builder = ClientProfile::builder(name)
        .age(age)
        .gender(gender)
        .height(height)
        .current_weight(current_weight)
        .ideal_weight(ideal_weight)
        .activity_level(activity)
        .goal(goal)
        .diet_type(diet)
        .allergies(nutriplan_pdf::profile::split_list(&allergies))
        .dislikes(nutriplan_pdf::profile::split_list(&dislikes))
        .cuisine_preferences(nutriplan_pdf::profile::split_list(&cuisines))
        .cooking_skill(skill)
        .prep_time_minutes(prep)
        .meals_per_day(meals)
        .plan_duration_days(days)
        .meal_prep_style(style);
    if !budget.is_empty() {
        builder = builder.budget(budget);
    }

    let profile = builder.build()?;
    eprintln!("\n{} All information collected!\n", green("✓"));
    Ok(profile)
}
