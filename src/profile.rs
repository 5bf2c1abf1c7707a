//! The client profile: everything the plan is tailored to.
//!
//! A [`ClientProfile`] is the request record of the whole pipeline. It is
//! built once (interactively, from a JSON file, or in code), validated at
//! [`ClientProfileBuilder::build`], and then only read: by the prompt
//! builder and by the cover page. The single permitted mutation is
//! [`ClientProfile::attach_plan`] once generation has succeeded.
//!
//! Every field is either required (name, age, gender, height, weights) or
//! carries a typed default, so rendering never has to invent placeholder
//! values for missing data.

use crate::error::PlanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Structured client preferences driving generation and the cover page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    /// Free text with units, e.g. `5'10"` or `178cm`.
    pub height: String,
    /// Free text with units, e.g. `75kg`.
    pub current_weight: String,
    pub ideal_weight: String,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default = "default_diet_type")]
    pub diet_type: String,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
    #[serde(default)]
    pub cuisine_preferences: Vec<String>,
    /// Weekly food budget as typed by the client, e.g. `£60`.
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub cooking_skill: CookingSkill,
    #[serde(default = "default_prep_time")]
    pub prep_time_minutes: u32,
    #[serde(default = "default_meals_per_day")]
    pub meals_per_day: u8,
    #[serde(default = "default_plan_duration")]
    pub plan_duration_days: u32,
    #[serde(default)]
    pub meal_prep_style: MealPrepStyle,
    /// The generated plan, attached after a successful producer call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_plan: Option<String>,
}

fn default_diet_type() -> String {
    "omnivore".to_string()
}
fn default_prep_time() -> u32 {
    30
}
fn default_meals_per_day() -> u8 {
    3
}
fn default_plan_duration() -> u32 {
    7
}

impl ClientProfile {
    /// Start a builder. The five remaining required fields must be set
    /// before [`ClientProfileBuilder::build`] succeeds.
    pub fn builder(name: impl Into<String>) -> ClientProfileBuilder {
        ClientProfileBuilder {
            name: name.into(),
            age: None,
            gender: None,
            height: None,
            current_weight: None,
            ideal_weight: None,
            activity_level: ActivityLevel::default(),
            goal: Goal::default(),
            diet_type: default_diet_type(),
            allergies: Vec::new(),
            dislikes: Vec::new(),
            cuisine_preferences: Vec::new(),
            budget: None,
            cooking_skill: CookingSkill::default(),
            prep_time_minutes: default_prep_time(),
            meals_per_day: default_meals_per_day(),
            plan_duration_days: default_plan_duration(),
            meal_prep_style: MealPrepStyle::default(),
        }
    }

    /// Load and validate a profile from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| PlanError::ProfileReadFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let profile: ClientProfile =
            serde_json::from_str(&raw).map_err(|e| PlanError::ProfileReadFailed {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Attach the generated plan text. The only mutation after collection.
    pub fn attach_plan(&mut self, plan: impl Into<String>) {
        self.generated_plan = Some(plan.into());
    }

    /// Name with spaces replaced by underscores, for output file stems.
    pub fn file_stem_name(&self) -> String {
        self.name.trim().replace(' ', "_")
    }

    /// Budget as shown in the prompt, `Flexible` when none was given.
    pub fn budget_label(&self) -> &str {
        self.budget.as_deref().unwrap_or("Flexible")
    }

    /// Diet type in title case, e.g. `vegetarian` → `Vegetarian`.
    pub fn diet_type_title(&self) -> String {
        self.diet_type
            .split_whitespace()
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn validate(&self) -> Result<(), PlanError> {
        let invalid = |field: &'static str, reason: String| {
            Err(PlanError::InvalidProfile { field, reason })
        };
        if self.name.trim().is_empty() {
            return invalid("name", "must not be empty".into());
        }
        if !(1..=120).contains(&self.age) {
            return invalid("age", format!("must be 1–120, got {}", self.age));
        }
        for (field, value) in [
            ("height", &self.height),
            ("current_weight", &self.current_weight),
            ("ideal_weight", &self.ideal_weight),
        ] {
            if value.trim().is_empty() {
                return invalid(field, "must not be empty".into());
            }
        }
        if !(3..=6).contains(&self.meals_per_day) {
            return invalid(
                "meals_per_day",
                format!("must be 3–6, got {}", self.meals_per_day),
            );
        }
        if !(1..=28).contains(&self.plan_duration_days) {
            return invalid(
                "plan_duration_days",
                format!("must be 1–28, got {}", self.plan_duration_days),
            );
        }
        if self.prep_time_minutes == 0 {
            return invalid("prep_time_minutes", "must be at least 1".into());
        }
        Ok(())
    }
}

/// Builder for [`ClientProfile`].
#[derive(Debug, Clone)]
pub struct ClientProfileBuilder {
    name: String,
    age: Option<u32>,
    gender: Option<Gender>,
    height: Option<String>,
    current_weight: Option<String>,
    ideal_weight: Option<String>,
    activity_level: ActivityLevel,
    goal: Goal,
    diet_type: String,
    allergies: Vec<String>,
    dislikes: Vec<String>,
    cuisine_preferences: Vec<String>,
    budget: Option<String>,
    cooking_skill: CookingSkill,
    prep_time_minutes: u32,
    meals_per_day: u8,
    plan_duration_days: u32,
    meal_prep_style: MealPrepStyle,
}

impl ClientProfileBuilder {
    pub fn age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn height(mut self, height: impl Into<String>) -> Self {
        self.height = Some(height.into());
        self
    }

    pub fn current_weight(mut self, weight: impl Into<String>) -> Self {
        self.current_weight = Some(weight.into());
        self
    }

    pub fn ideal_weight(mut self, weight: impl Into<String>) -> Self {
        self.ideal_weight = Some(weight.into());
        self
    }

    pub fn activity_level(mut self, level: ActivityLevel) -> Self {
        self.activity_level = level;
        self
    }

    pub fn goal(mut self, goal: Goal) -> Self {
        self.goal = goal;
        self
    }

    /// Diet type; blank input keeps the `omnivore` default.
    pub fn diet_type(mut self, diet: impl Into<String>) -> Self {
        let diet = diet.into();
        if !diet.trim().is_empty() {
            self.diet_type = diet.trim().to_string();
        }
        self
    }

    pub fn allergies(mut self, items: Vec<String>) -> Self {
        self.allergies = items;
        self
    }

    pub fn dislikes(mut self, items: Vec<String>) -> Self {
        self.dislikes = items;
        self
    }

    pub fn cuisine_preferences(mut self, items: Vec<String>) -> Self {
        self.cuisine_preferences = items;
        self
    }

    pub fn budget(mut self, budget: impl Into<String>) -> Self {
        let budget = budget.into();
        self.budget = if budget.trim().is_empty() {
            None
        } else {
            Some(budget.trim().to_string())
        };
        self
    }

    pub fn cooking_skill(mut self, skill: CookingSkill) -> Self {
        self.cooking_skill = skill;
        self
    }

    pub fn prep_time_minutes(mut self, minutes: u32) -> Self {
        self.prep_time_minutes = minutes;
        self
    }

    pub fn meals_per_day(mut self, meals: u8) -> Self {
        self.meals_per_day = meals;
        self
    }

    pub fn plan_duration_days(mut self, days: u32) -> Self {
        self.plan_duration_days = days;
        self
    }

    pub fn meal_prep_style(mut self, style: MealPrepStyle) -> Self {
        self.meal_prep_style = style;
        self
    }

    /// Build the profile, validating every field.
    pub fn build(self) -> Result<ClientProfile, PlanError> {
        let missing = |field: &'static str| PlanError::InvalidProfile {
            field,
            reason: "is required".into(),
        };
        let profile = ClientProfile {
            name: self.name.trim().to_string(),
            age: self.age.ok_or_else(|| missing("age"))?,
            gender: self.gender.ok_or_else(|| missing("gender"))?,
            height: self.height.ok_or_else(|| missing("height"))?,
            current_weight: self.current_weight.ok_or_else(|| missing("current_weight"))?,
            ideal_weight: self.ideal_weight.ok_or_else(|| missing("ideal_weight"))?,
            activity_level: self.activity_level,
            goal: self.goal,
            diet_type: self.diet_type,
            allergies: self.allergies,
            dislikes: self.dislikes,
            cuisine_preferences: self.cuisine_preferences,
            budget: self.budget,
            cooking_skill: self.cooking_skill,
            prep_time_minutes: self.prep_time_minutes,
            meals_per_day: self.meals_per_day,
            plan_duration_days: self.plan_duration_days,
            meal_prep_style: self.meal_prep_style,
            generated_plan: None,
        };
        profile.validate()?;
        Ok(profile)
    }
}

/// Split a comma-separated answer into trimmed, non-empty items.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Enums ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(alias = "M", alias = "m", alias = "male")]
    Male,
    #[serde(alias = "F", alias = "f", alias = "female")]
    Female,
}

impl Gender {
    /// Accepts `M`/`F` in any case; anything else is rejected so the
    /// collector can re-ask.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_uppercase().as_str() {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "M",
            Gender::Female => "F",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    #[default]
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    pub const MENU: &'static [&'static str] = &[
        "Sedentary (little or no exercise)",
        "Lightly active (light exercise 1-3 days/week)",
        "Moderately active (moderate exercise 3-5 days/week)",
        "Very active (hard exercise 6-7 days/week)",
        "Extra active (very hard exercise & physical job)",
    ];

    /// Map a 1-based menu answer; unknown answers fall back to the default.
    pub fn from_menu_choice(choice: &str) -> Self {
        match choice.trim() {
            "1" => ActivityLevel::Sedentary,
            "2" => ActivityLevel::LightlyActive,
            "3" => ActivityLevel::ModeratelyActive,
            "4" => ActivityLevel::VeryActive,
            "5" => ActivityLevel::ExtraActive,
            _ => ActivityLevel::default(),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly active",
            ActivityLevel::ModeratelyActive => "Moderately active",
            ActivityLevel::VeryActive => "Very active",
            ActivityLevel::ExtraActive => "Extra active",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    FatLoss,
    Maintenance,
    MuscleGain,
    #[default]
    GeneralHealth,
}

impl Goal {
    pub const MENU: &'static [&'static str] = &[
        "Fat loss (maintain muscle)",
        "Weight maintenance",
        "Muscle gain / bulking",
        "General health & wellness",
    ];

    pub fn from_menu_choice(choice: &str) -> Self {
        match choice.trim() {
            "1" => Goal::FatLoss,
            "2" => Goal::Maintenance,
            "3" => Goal::MuscleGain,
            "4" => Goal::GeneralHealth,
            _ => Goal::default(),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let idx = match self {
            Goal::FatLoss => 0,
            Goal::Maintenance => 1,
            Goal::MuscleGain => 2,
            Goal::GeneralHealth => 3,
        };
        f.write_str(Goal::MENU[idx])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookingSkill {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl CookingSkill {
    pub const MENU: &'static [&'static str] = &[
        "Beginner (simple recipes)",
        "Intermediate (moderate complexity)",
        "Advanced (any complexity)",
    ];

    pub fn from_menu_choice(choice: &str) -> Self {
        match choice.trim() {
            "1" => CookingSkill::Beginner,
            "2" => CookingSkill::Intermediate,
            "3" => CookingSkill::Advanced,
            _ => CookingSkill::default(),
        }
    }
}

impl fmt::Display for CookingSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CookingSkill::Beginner => "Beginner",
            CookingSkill::Intermediate => "Intermediate",
            CookingSkill::Advanced => "Advanced",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealPrepStyle {
    Daily,
    Batch,
    #[default]
    Mixed,
}

impl MealPrepStyle {
    /// Parses `daily` / `batch` / `mixed`; anything else keeps the default.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "daily" => MealPrepStyle::Daily,
            "batch" => MealPrepStyle::Batch,
            _ => MealPrepStyle::Mixed,
        }
    }
}

impl fmt::Display for MealPrepStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MealPrepStyle::Daily => "daily",
            MealPrepStyle::Batch => "batch",
            MealPrepStyle::Mixed => "mixed",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ClientProfileBuilder {
        ClientProfile::builder("Sam Taylor")
            .age(34)
            .gender(Gender::Female)
            .height("168cm")
            .current_weight("72kg")
            .ideal_weight("66kg")
    }

    #[test]
    fn builder_applies_typed_defaults() {
        let p = base().build().unwrap();
        assert_eq!(p.diet_type, "omnivore");
        assert_eq!(p.meals_per_day, 3);
        assert_eq!(p.plan_duration_days, 7);
        assert_eq!(p.prep_time_minutes, 30);
        assert_eq!(p.activity_level, ActivityLevel::ModeratelyActive);
        assert_eq!(p.goal, Goal::GeneralHealth);
        assert_eq!(p.cooking_skill, CookingSkill::Intermediate);
        assert_eq!(p.meal_prep_style, MealPrepStyle::Mixed);
        assert_eq!(p.budget_label(), "Flexible");
        assert!(p.generated_plan.is_none());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = ClientProfile::builder("Sam").age(30).build().unwrap_err();
        assert!(matches!(err, PlanError::InvalidProfile { field: "gender", .. }));
    }

    #[test]
    fn meals_per_day_out_of_range_is_rejected() {
        let err = base().meals_per_day(9).build().unwrap_err();
        assert!(err.to_string().contains("meals_per_day"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = ClientProfile::builder("   ")
            .age(30)
            .gender(Gender::Male)
            .height("180cm")
            .current_weight("80kg")
            .ideal_weight("78kg")
            .build()
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidProfile { field: "name", .. }));
    }

    #[test]
    fn blank_diet_keeps_default() {
        let p = base().diet_type("  ").build().unwrap();
        assert_eq!(p.diet_type, "omnivore");
    }

    #[test]
    fn menu_choices_map_with_fallback() {
        assert_eq!(ActivityLevel::from_menu_choice("4"), ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::from_menu_choice("x"), ActivityLevel::ModeratelyActive);
        assert_eq!(Goal::from_menu_choice("1"), Goal::FatLoss);
        assert_eq!(Goal::from_menu_choice(""), Goal::GeneralHealth);
        assert_eq!(CookingSkill::from_menu_choice("3"), CookingSkill::Advanced);
        assert_eq!(MealPrepStyle::parse("Batch"), MealPrepStyle::Batch);
        assert_eq!(MealPrepStyle::parse("whatever"), MealPrepStyle::Mixed);
    }

    #[test]
    fn gender_parse_only_accepts_m_or_f() {
        assert_eq!(Gender::parse(" m "), Some(Gender::Male));
        assert_eq!(Gender::parse("F"), Some(Gender::Female));
        assert_eq!(Gender::parse("x"), None);
    }

    #[test]
    fn goal_display_uses_menu_label() {
        assert_eq!(Goal::MuscleGain.to_string(), "Muscle gain / bulking");
    }

    #[test]
    fn title_case_and_file_stem() {
        let p = base().diet_type("plant based").build().unwrap();
        assert_eq!(p.diet_type_title(), "Plant Based");
        assert_eq!(p.file_stem_name(), "Sam_Taylor");
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list("nuts, , shellfish ,"), vec!["nuts", "shellfish"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn json_profile_uses_defaults_and_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{"name":"Ana","age":41,"gender":"F","height":"160cm",
                "current_weight":"70kg","ideal_weight":"64kg","goal":"fat_loss"}"#,
        )
        .unwrap();
        let p = ClientProfile::from_json_file(&path).unwrap();
        assert_eq!(p.gender, Gender::Female);
        assert_eq!(p.goal, Goal::FatLoss);
        assert_eq!(p.plan_duration_days, 7);
    }

    #[test]
    fn json_profile_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{"name":"Ana","age":41,"gender":"F","height":"160cm",
                "current_weight":"70kg","ideal_weight":"64kg","plan_duration_days":0}"#,
        )
        .unwrap();
        let err = ClientProfile::from_json_file(&path).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidProfile { field: "plan_duration_days", .. }
        ));
    }

    #[test]
    fn attach_plan_sets_text() {
        let mut p = base().build().unwrap();
        p.attach_plan("DAY 1");
        assert_eq!(p.generated_plan.as_deref(), Some("DAY 1"));
    }
}
