//! File output: text plan, PDF and their failure modes. No network needed.

use nutriplan_pdf::{
    run_with_text, write_pdf_for, ClientProfile, Gender, GenerationConfig, PlanError,
    PlanProgressCallback,
};
use std::path::Path;
use std::sync::{Arc, Mutex};

const PLAN: &str = "\
NUTRITIONAL ANALYSIS
Daily target: 1,850 kcal

**7-DAY MEAL PLAN**
DAY 1:
Breakfast: Overnight oats with berries
Lunch: Chicken salad

RECIPES
**Overnight Oats**
- 50g oats
- 150ml milk
Calories: 320 kcal | Protein: 14g | Carbs: 48g | Fats: 8g

SHOPPING LIST
- Oats - 500g
- Milk - 2L
- Berries
";

fn profile() -> ClientProfile {
    ClientProfile::builder("Jo Bloggs")
        .age(45)
        .gender(Gender::Female)
        .height("168cm")
        .current_weight("70kg")
        .ideal_weight("64kg")
        .build()
        .unwrap()
}

fn config(dir: &Path, write_pdf: bool) -> GenerationConfig {
    GenerationConfig::builder()
        .output_dir(dir)
        .write_pdf(write_pdf)
        .build()
        .unwrap()
}

fn leftovers(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".tmp"))
        .collect()
}

#[tokio::test]
async fn writes_text_and_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let mut p = profile();
    let out = run_with_text(&mut p, PLAN, &config(dir.path(), true))
        .await
        .unwrap();

    let name = out.text_path.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("nutrition_plan_Jo_Bloggs_"), "{name}");
    assert!(name.ends_with(".txt"));

    let text = std::fs::read_to_string(&out.text_path).unwrap();
    assert!(text.starts_with(&"=".repeat(80)));
    assert!(text.contains("PERSONAL NUTRITION PLAN"));
    assert!(text.contains("Client: Jo Bloggs"));
    assert!(text.ends_with("- Berries\n"));

    let pdf_path = out.pdf_path.as_ref().expect("pdf written");
    assert_eq!(pdf_path.with_extension("txt"), out.text_path);
    let bytes = std::fs::read(pdf_path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(out.stats.pages >= 2, "cover plus content, got {}", out.stats.pages);
    assert!(out.pdf_error.is_none());
    assert!(out.warnings.is_empty());

    assert_eq!(p.generated_plan.as_deref(), Some(out.plan_text.as_str()));
    assert!(leftovers(dir.path()).is_empty());
}

#[tokio::test]
async fn no_pdf_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut p = profile();
    let out = run_with_text(&mut p, PLAN, &config(dir.path(), false))
        .await
        .unwrap();
    assert!(!out.has_pdf());
    assert!(out.pdf_error.is_none());
    assert_eq!(out.stats.pages, 0);
    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 1);
}

#[tokio::test]
async fn output_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("plans").join("2026");
    let mut p = profile();
    let out = run_with_text(&mut p, PLAN, &config(&nested, true))
        .await
        .unwrap();
    assert!(out.text_path.starts_with(&nested));
    assert!(out.has_pdf());
}

#[tokio::test]
async fn pdf_into_unwritable_parent_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"x").unwrap();

    let err = write_pdf_for(&blocker.join("plan.pdf"), PLAN, &profile())
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::OutputWriteFailed { .. }), "{err}");
}

#[tokio::test]
async fn fenced_plan_is_cleaned_before_saving() {
    let dir = tempfile::tempdir().unwrap();
    let mut p = profile();
    let fenced = format!("```markdown\r\n{}```\r\n", PLAN.replace('\n', "\r\n"));
    let out = run_with_text(&mut p, &fenced, &config(dir.path(), false))
        .await
        .unwrap();
    assert_eq!(out.plan_text, PLAN);
}

#[derive(Default)]
struct Events(Mutex<Vec<String>>);

impl PlanProgressCallback for Events {
    fn on_text_saved(&self, _path: &Path) {
        self.0.lock().unwrap().push("text".into());
    }
    fn on_pdf_saved(&self, _path: &Path, pages: usize, _warnings: usize) {
        self.0.lock().unwrap().push(format!("pdf:{pages}"));
    }
    fn on_pdf_error(&self, _error: &str) {
        self.0.lock().unwrap().push("pdf_error".into());
    }
}

#[tokio::test]
async fn progress_events_follow_the_files() {
    let dir = tempfile::tempdir().unwrap();
    let events = Arc::new(Events::default());
    let cfg = GenerationConfig::builder()
        .output_dir(dir.path())
        .progress_callback(events.clone())
        .build()
        .unwrap();
    let mut p = profile();
    let out = run_with_text(&mut p, PLAN, &cfg).await.unwrap();

    let seen = events.0.lock().unwrap().clone();
    assert_eq!(seen, ["text".to_string(), format!("pdf:{}", out.stats.pages)]);
}
