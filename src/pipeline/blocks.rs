//! Block builders: one function per visual block kind the parser emits.
//!
//! Builders are pure apart from [`Inline`], which collects a [`LineWarning`]
//! whenever a line's emphasis cannot be parsed and the line drops to plain
//! text.

use crate::document::{Block, BoxedText, Cell, Marker, Paragraph, Row, Rule, Span, Table, TableStyle};
use crate::error::LineWarning;
use crate::pipeline::classify::{is_bullet_shaped, strip_markers};
use crate::pipeline::sanitize::{format_inline, plain};
use crate::theme::{self, TextRole};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Shopping tables keep at most this many buffered items.
pub const MAX_SHOPPING_ROWS: usize = 30;
/// Item names are cut to this many characters.
pub const MAX_ITEM_NAME_CHARS: usize = 50;

/// Width of boxed day headings, in points.
const DAY_BOX_WIDTH: f32 = 468.0;
const SHOPPING_COLUMNS: [f32; 3] = [21.6, 324.0, 108.0];
const MACRO_COLUMNS: [f32; 4] = [108.0, 86.4, 86.4, 86.4];

/// Inline formatting with per-line fallback.
#[derive(Debug, Default)]
pub struct Inline {
    warnings: Vec<LineWarning>,
}

impl Inline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emphasis-formatted spans for `text`, or the whole line as plain text
    /// when its markup does not parse.
    pub fn spans(&mut self, line: usize, text: &str) -> Vec<Span> {
        match format_inline(text) {
            Ok(spans) => spans,
            Err(e) => {
                let warning = LineWarning::new(line, text, e);
                warn!(
                    line = warning.line,
                    excerpt = %warning.excerpt,
                    "Could not format line, falling back to plain text: {}",
                    warning.cause
                );
                self.warnings.push(warning);
                plain(text)
            }
        }
    }

    pub fn warnings(&self) -> &[LineWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<LineWarning> {
        self.warnings
    }
}

/// Heading paragraph followed by a full-width divider.
pub fn section_heading(title: &str) -> [Block; 2] {
    [
        Block::Paragraph(Paragraph::new(TextRole::SectionHeading, plain(title))),
        Block::Rule(Rule {
            width: 1.0,
            thickness: 1.0,
            color: theme::PRIMARY_GREEN,
            space_before: 10.0,
            space_after: 15.0,
        }),
    ]
}

/// Spacer, boxed bold label on a light green band, spacer.
pub fn day_heading(label: &str) -> [Block; 3] {
    [
        Block::Spacer(10.8),
        Block::Boxed(BoxedText {
            paragraph: Paragraph::new(TextRole::DayHeading, vec![Span::bold(label)]),
            background: Some(theme::LIGHT_GREEN),
            border: Some((theme::SECONDARY_GREEN, 1.0)),
            padding: 10.0,
            left_padding: 15.0,
            width: DAY_BOX_WIDTH,
        }),
        Block::Spacer(7.2),
    ]
}

/// `###` and `**` removed, nothing else.
pub fn subsection_title(line: &str) -> String {
    line.replace("###", "").replace("**", "").trim().to_string()
}

pub fn subsection_heading(title: &str) -> Block {
    Block::Paragraph(Paragraph::new(TextRole::SubsectionHeading, plain(title)))
}

/// Strip one leading bullet glyph.
fn strip_bullet(line: &str) -> &str {
    let mut chars = line.chars();
    chars.next();
    chars.as_str().trim()
}

pub fn bullet(inline: &mut Inline, line_no: usize, line: &str) -> Block {
    let spans = inline.spans(line_no, strip_bullet(line));
    Block::Paragraph(Paragraph::new(TextRole::Bullet, spans).with_marker(Marker::Bullet))
}

pub fn paragraph(inline: &mut Inline, line_no: usize, line: &str) -> Block {
    Block::Paragraph(Paragraph::new(TextRole::Body, inline.spans(line_no, line)))
}

// ── Recipe cards ─────────────────────────────────────────────────────────

/// The four headline macros of one recipe line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroSummary {
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fats: String,
}

static RE_CALORIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)calories?[:\s]*\**\s*([0-9][0-9,]*)").unwrap());
static RE_KCAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)([0-9][0-9,]*)\s*kcal").unwrap());
static RE_PROTEIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)protein[:\s]*\**\s*([0-9]+)").unwrap());
static RE_CARBS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)carb(?:ohydrate)?s?[:\s]*\**\s*([0-9]+)").unwrap());
static RE_FATS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)fats?[:\s]*\**\s*([0-9]+)").unwrap());

impl MacroSummary {
    /// Pull all four macros out of a line; `None` unless every one is present.
    pub fn parse(line: &str) -> Option<Self> {
        let grab = |re: &Regex| re.captures(line).map(|c| c[1].to_string());
        Some(Self {
            calories: grab(&RE_CALORIES).or_else(|| grab(&RE_KCAL))?,
            protein: grab(&RE_PROTEIN)?,
            carbs: grab(&RE_CARBS)?,
            fats: grab(&RE_FATS)?,
        })
    }
}

/// Four-column value/label table on a light green ground.
pub fn macro_box(m: &MacroSummary) -> Block {
    let value = |s: String| Cell::Text(Paragraph::new(TextRole::MacroValue, vec![Span::bold(s)]));
    let label = |s: &str| Cell::Text(Paragraph::new(TextRole::MacroLabel, plain(s)));
    Block::Table(Table {
        columns: MACRO_COLUMNS.to_vec(),
        rows: vec![
            Row::body(vec![
                value(m.calories.clone()),
                value(format!("{}g", m.protein)),
                value(format!("{}g", m.carbs)),
                value(format!("{}g", m.fats)),
            ]),
            Row::body(vec![
                label("Calories"),
                label("Protein"),
                label("Carbs"),
                label("Fats"),
            ]),
        ],
        style: TableStyle {
            header_background: None,
            row_backgrounds: vec![theme::LIGHT_GREEN],
            grid: Some((theme::SECONDARY_GREEN, 0.5)),
            padding: 4.0,
            header_padding: 4.0,
        },
        space_after: 4.0,
    })
}

/// Drop leading bullet glyphs and spaces from the first span.
fn trim_bullet_prefix(mut spans: Vec<Span>) -> Vec<Span> {
    if let Some(first) = spans.first_mut() {
        first.text = first
            .text
            .trim_start_matches(['-', '•', '*', ' '])
            .to_string();
    }
    spans.retain(|s| !s.text.is_empty());
    spans
}

/// A keep-together group: marked title, one line per body line, spacer.
///
/// `lines` pairs each body line with its 1-based source line number.
pub fn recipe_card(inline: &mut Inline, title: &str, lines: &[(usize, String)]) -> Block {
    let mut children = vec![Block::Paragraph(
        Paragraph::new(TextRole::RecipeTitle, plain(title)).with_marker(Marker::Recipe),
    )];
    for (line_no, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(macros) = MacroSummary::parse(line) {
            children.push(macro_box(&macros));
            continue;
        }
        let spans = inline.spans(*line_no, line);
        let para = if is_bullet_shaped(line) {
            Paragraph::new(TextRole::RecipeLine, trim_bullet_prefix(spans)).with_marker(Marker::Bullet)
        } else {
            Paragraph::new(TextRole::RecipeLine, spans)
        };
        children.push(Block::Paragraph(para));
    }
    children.push(Block::Spacer(10.8));
    Block::KeepTogether(children)
}

/// Title text of a recipe line, markers removed.
pub fn recipe_title(line: &str) -> String {
    strip_markers(line)
}

// ── Shopping tables ──────────────────────────────────────────────────────

/// Name and quantity of one shopping line, split on the last ` - `.
pub fn split_item(line: &str) -> Option<(String, String)> {
    let clean = line.trim().trim_start_matches(['-', '•', '*', ' ']);
    if clean.is_empty() {
        return None;
    }
    let (name, qty) = clean.rsplit_once(" - ").unwrap_or((clean, ""));
    let name: String = name.chars().take(MAX_ITEM_NAME_CHARS).collect();
    Some((name, qty.to_string()))
}

/// Checkbox / item / quantity table; `None` when no item survives cleaning.
pub fn shopping_table(items: &[String]) -> Option<Block> {
    let text = |role, s: &str| Cell::Text(Paragraph::new(role, plain(s)));
    let body: Vec<Row> = items
        .iter()
        .take(MAX_SHOPPING_ROWS)
        .filter_map(|item| split_item(item))
        .map(|(name, qty)| {
            Row::body(vec![
                Cell::Checkbox,
                text(TextRole::TableCell, &name),
                text(TextRole::TableCell, &qty),
            ])
        })
        .collect();
    if body.is_empty() {
        return None;
    }
    let mut rows = vec![Row::header(vec![
        Cell::Empty,
        text(TextRole::TableHeader, "Item"),
        text(TextRole::TableHeader, "Quantity"),
    ])];
    rows.extend(body);
    Some(Block::Table(Table {
        columns: SHOPPING_COLUMNS.to_vec(),
        rows,
        style: TableStyle {
            header_background: Some(theme::PRIMARY_GREEN),
            row_backgrounds: vec![theme::WHITE, theme::WHITESMOKE],
            grid: Some((theme::GRID_LIGHT, 0.5)),
            padding: 6.0,
            header_padding: 10.0,
        },
        space_after: 0.0,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(block: &Block) -> &Table {
        match block {
            Block::Table(t) => t,
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn split_item_uses_last_separator() {
        assert_eq!(
            split_item("- Chicken - 500g"),
            Some(("Chicken".into(), "500g".into()))
        );
        assert_eq!(
            split_item("• Salt - and - pepper - 1 pinch"),
            Some(("Salt - and - pepper".into(), "1 pinch".into()))
        );
        assert_eq!(split_item("- Broccoli"), Some(("Broccoli".into(), String::new())));
        assert_eq!(split_item("- "), None);
    }

    #[test]
    fn long_item_names_are_truncated() {
        let line = format!("- {} - 1", "x".repeat(80));
        let (name, qty) = split_item(&line).unwrap();
        assert_eq!(name.chars().count(), MAX_ITEM_NAME_CHARS);
        assert_eq!(qty, "1");
    }

    #[test]
    fn shopping_table_caps_rows() {
        let items: Vec<String> = (0..45).map(|i| format!("- Item {i} - {i}g")).collect();
        let block = shopping_table(&items).unwrap();
        let t = table(&block);
        assert_eq!(t.body_rows().count(), MAX_SHOPPING_ROWS);
        assert_eq!(t.rows.len(), MAX_SHOPPING_ROWS + 1);
        assert_eq!(t.rows.last().unwrap().cells[1].plain_text(), "Item 29");
    }

    #[test]
    fn shopping_table_without_items_is_none() {
        assert!(shopping_table(&[]).is_none());
        assert!(shopping_table(&["-".to_string(), "* ".to_string()]).is_none());
    }

    #[test]
    fn macro_summary_needs_all_four() {
        let m = MacroSummary::parse("Calories: 420 | Protein: 25g | Carbs: 50g | Fat: 12g").unwrap();
        assert_eq!(m.calories, "420");
        assert_eq!(m.protein, "25");
        assert_eq!(m.carbs, "50");
        assert_eq!(m.fats, "12");
        assert!(MacroSummary::parse("Protein: 30g, Carbs: 20g").is_none());
    }

    #[test]
    fn macro_summary_accepts_kcal_form() {
        let m = MacroSummary::parse("Per serving: 1,850 kcal, protein 40g, carbohydrates 60g, fats 20g")
            .unwrap();
        assert_eq!(m.calories, "1,850");
        assert_eq!(m.carbs, "60");
    }

    #[test]
    fn recipe_card_groups_title_and_lines() {
        let mut inline = Inline::new();
        let lines = vec![
            (2, "- 50g **rolled** oats".to_string()),
            (3, "Stir and chill overnight.".to_string()),
            (4, "Calories: 350 | Protein: 20g | Carbs: 45g | Fat: 9g".to_string()),
        ];
        let Block::KeepTogether(children) = recipe_card(&mut inline, "Overnight Oats", &lines) else {
            panic!("recipe card must be a keep-together group");
        };
        assert_eq!(children.len(), 5);
        let Block::Paragraph(title) = &children[0] else { panic!() };
        assert_eq!(title.marker, Some(Marker::Recipe));
        assert_eq!(title.plain_text(), "Overnight Oats");
        let Block::Paragraph(first) = &children[1] else { panic!() };
        assert_eq!(first.marker, Some(Marker::Bullet));
        assert_eq!(first.spans[0], Span::plain("50g "));
        assert_eq!(first.spans[1], Span::bold("rolled"));
        assert!(matches!(children[3], Block::Table(_)));
        assert!(matches!(children[4], Block::Spacer(_)));
        assert!(inline.warnings().is_empty());
    }

    #[test]
    fn title_only_recipe_card() {
        let mut inline = Inline::new();
        let Block::KeepTogether(children) = recipe_card(&mut inline, "Soup", &[]) else {
            panic!()
        };
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn bad_markup_falls_back_and_warns() {
        let mut inline = Inline::new();
        let block = paragraph(&mut inline, 7, "**snake_case** and _x_");
        let Block::Paragraph(p) = block else { panic!() };
        assert_eq!(p.spans, vec![Span::plain("**snake_case** and _x_")]);
        assert_eq!(inline.warnings().len(), 1);
        assert_eq!(inline.warnings()[0].line, 7);
    }

    #[test]
    fn bullet_strips_one_glyph() {
        let mut inline = Inline::new();
        let Block::Paragraph(p) = bullet(&mut inline, 1, "• Drink *more* water") else {
            panic!()
        };
        assert_eq!(p.role, TextRole::Bullet);
        assert_eq!(p.spans[0], Span::plain("Drink "));
        assert_eq!(p.spans[1], Span::italic("more"));
    }

    #[test]
    fn subsection_title_keeps_single_stars() {
        assert_eq!(subsection_title("**Storage tips:**"), "Storage tips:");
        assert_eq!(subsection_title("### *Batch* cooking"), "*Batch* cooking");
    }
}
