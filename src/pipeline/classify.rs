//! Line classification: one trimmed line → exactly one [`LineKind`].
//!
//! Classification is a first-match-wins walk over [`RULES`], an ordered
//! table of `(kind, predicate)` pairs. The order *is* the disambiguation
//! policy, e.g. a bold line inside a RECIPES section is tried as a recipe
//! title before it can fall through to a bullet or a paragraph. Reordering
//! the table changes behaviour; keep it in sync with the docs on
//! [`LineKind`].
//!
//! Predicates are pure: they read the line and a [`Context`] snapshot of the
//! parser (current section label, whether a recipe is open) and never
//! mutate anything.

use once_cell::sync::Lazy;
use regex::Regex;

/// Semantic role of one line, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Blank,
    /// Section heading whose keywords force a page break.
    MajorSection,
    MinorSection,
    Day,
    Subsection,
    RecipeTitle,
    RecipeBody,
    ShoppingItem,
    Bullet,
    Paragraph,
}

impl LineKind {
    pub fn is_section(self) -> bool {
        matches!(self, LineKind::MajorSection | LineKind::MinorSection)
    }
}

/// Read-only parser state the predicates may consult.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Upper-cased label of the current section, empty before the first one.
    pub section: &'a str,
    /// A recipe title has been seen and its card not yet flushed.
    pub recipe_open: bool,
}

impl<'a> Context<'a> {
    pub fn in_recipes(&self) -> bool {
        self.section.contains("RECIPE")
    }

    pub fn in_shopping(&self) -> bool {
        self.section.contains("SHOPPING")
    }
}

type Predicate = fn(&str, &Context<'_>) -> bool;

/// The classification rules, highest priority first. [`LineKind::Paragraph`]
/// is the fallback when nothing matches.
pub const RULES: &[(LineKind, Predicate)] = &[
    (LineKind::Blank, blank),
    (LineKind::MajorSection, major_section),
    (LineKind::MinorSection, minor_section),
    (LineKind::Day, day),
    (LineKind::Subsection, subsection),
    (LineKind::RecipeTitle, recipe_title),
    (LineKind::RecipeBody, recipe_body),
    (LineKind::ShoppingItem, shopping_item),
    (LineKind::Bullet, bullet),
];

fn blank(line: &str, _: &Context<'_>) -> bool {
    line.is_empty()
}

fn major_section(line: &str, ctx: &Context<'_>) -> bool {
    is_section_heading(line, ctx) && is_major_section(line)
}

fn minor_section(line: &str, ctx: &Context<'_>) -> bool {
    is_section_heading(line, ctx) && !is_major_section(line)
}

fn day(line: &str, _: &Context<'_>) -> bool {
    is_day_heading(line)
}

fn subsection(line: &str, _: &Context<'_>) -> bool {
    is_subsection_heading(line)
}

fn recipe_title(line: &str, ctx: &Context<'_>) -> bool {
    ctx.in_recipes() && is_recipe_title(line)
}

fn recipe_body(_: &str, ctx: &Context<'_>) -> bool {
    ctx.recipe_open
}

fn shopping_item(line: &str, ctx: &Context<'_>) -> bool {
    ctx.in_shopping() && is_bullet_shaped(line)
}

fn bullet(line: &str, _: &Context<'_>) -> bool {
    is_bullet_shaped(line)
}

/// Classify a trimmed line.
pub fn classify(line: &str, ctx: &Context<'_>) -> LineKind {
    RULES
        .iter()
        .find(|(_, matches)| matches(line, ctx))
        .map(|(kind, _)| *kind)
        .unwrap_or(LineKind::Paragraph)
}

// ── Marker helpers ───────────────────────────────────────────────────────

/// Remove every `**`, `*` and `#`, then trim.
pub fn strip_markers(line: &str) -> String {
    line.replace("**", "")
        .replace(['*', '#'], "")
        .trim()
        .to_string()
}

/// Lines starting with `-`, `•` or `*`.
pub fn is_bullet_shaped(line: &str) -> bool {
    line.starts_with(['-', '•', '*'])
}

/// At least one cased character and no lower-case ones.
fn is_all_upper(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

fn is_bold_wrapped(line: &str) -> bool {
    line.starts_with("**") && line.ends_with("**") && line.matches("**").count() == 2
}

// ── Section headings ─────────────────────────────────────────────────────

const MAJOR_KEYWORDS: &[&str] = &[
    "NUTRITIONAL ANALYSIS",
    "MEAL PLAN",
    "DAY MEAL PLAN",
    "RECIPES",
    "SHOPPING LIST",
    "MEAL PREP",
    "ADDITIONAL TIPS",
    "TIPS & ADVICE",
    "TIPS AND ADVICE",
    "HYDRATION",
    "SUPPLEMENT",
];

/// Upper-case (longer than 3 characters), a single `**…**` pair, or a
/// `# `/`## ` prefix.
///
/// Inside a RECIPES section a bold-wrapped line that reads as a recipe title
/// (and carries no major keyword) is left for the recipe rule.
pub fn is_section_heading(line: &str, ctx: &Context<'_>) -> bool {
    if is_all_upper(line) && line.chars().count() > 3 {
        return true;
    }
    if line.starts_with("## ") || line.starts_with("# ") {
        return true;
    }
    if is_bold_wrapped(line) {
        let recipe_title = ctx.in_recipes() && is_recipe_title(line) && !is_major_section(line);
        return !recipe_title;
    }
    false
}

pub fn is_major_section(line: &str) -> bool {
    let clean = line
        .to_uppercase()
        .replace("**", "")
        .replace(['*', '#'], "");
    let clean = clean.trim();
    MAJOR_KEYWORDS.iter().any(|kw| clean.contains(kw))
}

// ── Day headings ─────────────────────────────────────────────────────────

static DAY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^#{0,3}\s*\*{0,2}DAY\s*\d+",
        r"(?i)^#{0,3}\s*\*{0,2}(MONDAY|TUESDAY|WEDNESDAY|THURSDAY|FRIDAY|SATURDAY|SUNDAY)",
        r"(?i)^DAY\s*\d+\s*[-:–]",
        r"(?i)^(Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)\s*[-:–]",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

pub fn is_day_heading(line: &str) -> bool {
    DAY_PATTERNS.iter().any(|re| re.is_match(line))
}

// ── Subsections ──────────────────────────────────────────────────────────

/// `###` prefix, or a bold lead-in with a colon that is not recipe-shaped.
pub fn is_subsection_heading(line: &str) -> bool {
    line.starts_with("###") || (line.starts_with("**") && line.contains(':') && !is_recipe_title(line))
}

// ── Recipes ──────────────────────────────────────────────────────────────

const RECIPE_INDICATORS: &[&str] = &[
    "recipe",
    "breakfast:",
    "lunch:",
    "dinner:",
    "snack:",
    "serves",
    "prep time",
    "cook time",
];

/// A short bold line without a colon, or one naming a meal or recipe detail.
///
/// Section context is checked by the caller.
pub fn is_recipe_title(line: &str) -> bool {
    let clean = strip_markers(line);
    if line.starts_with("**") && clean.chars().count() < 60 && !clean.contains(':') {
        return true;
    }
    let lower = clean.to_lowercase();
    RECIPE_INDICATORS.iter().any(|ind| lower.contains(ind))
}
