//! Single-pass plan-text parser.
//!
//! Each line is classified ([`classify`]) against a read-only view of the
//! parser and then fed through [`Parser::step`], which takes the current
//! [`ParseState`] by value and returns the next one. Recipe and shopping
//! lines are buffered in the state itself; every transition out of a
//! buffering state flushes the buffer into exactly one block.

use crate::document::Block;
use crate::error::LineWarning;
use crate::pipeline::blocks::{self, Inline};
use crate::pipeline::classify::{classify, is_bullet_shaped, strip_markers, Context, LineKind};
use tracing::debug;

/// Below this many blocks in the document so far, cover included, a major
/// section gets no page break.
pub const PAGE_BREAK_MIN_BLOCKS: usize = 10;

/// Buffering state between lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParseState {
    #[default]
    Idle,
    /// A recipe title and the body lines seen so far, with line numbers.
    BufferingRecipe {
        title: String,
        lines: Vec<(usize, String)>,
    },
    BufferingShopping { items: Vec<String> },
}

/// Blocks and warnings produced from one plan text.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub blocks: Vec<Block>,
    pub warnings: Vec<LineWarning>,
}

/// Owns everything a parse pass accumulates except the buffering state.
#[derive(Debug, Default)]
pub struct Parser {
    /// Blocks already in the document ahead of this parse (the cover page).
    preceding: usize,
    /// Upper-cased current section title.
    section: String,
    blocks: Vec<Block>,
    inline: Inline,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser whose output is appended after `preceding` existing blocks.
    pub fn with_preceding(preceding: usize) -> Self {
        Self {
            preceding,
            ..Self::default()
        }
    }

    /// Blocks emitted so far in the whole document.
    fn emitted(&self) -> usize {
        self.preceding + self.blocks.len()
    }

    /// Upper-cased label of the section the parser is in.
    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Process one trimmed line. `next` is the remaining input, used only by
    /// the shopping-list blank-line lookahead.
    pub fn step<'a>(
        &mut self,
        state: ParseState,
        line_no: usize,
        line: &str,
        mut next: impl Iterator<Item = &'a str>,
    ) -> ParseState {
        let ctx = Context {
            section: &self.section,
            recipe_open: matches!(state, ParseState::BufferingRecipe { .. }),
        };
        let kind = classify(line, &ctx);

        match (kind, state) {
            // ── Blank lines ──────────────────────────────────────────────
            (LineKind::Blank, ParseState::BufferingRecipe { title, lines }) => {
                if lines.is_empty() {
                    ParseState::BufferingRecipe { title, lines }
                } else {
                    self.flush_recipe(&title, &lines);
                    ParseState::Idle
                }
            }
            (LineKind::Blank, ParseState::BufferingShopping { items }) => {
                // Heuristic: the list continues when the next non-blank line
                // is itself bullet-shaped. A following bulleted list in the
                // same section is merged into the table.
                match next.find(|l| !l.trim().is_empty()) {
                    Some(l) if !is_bullet_shaped(l.trim()) => {
                        self.flush_shopping(&items);
                        ParseState::Idle
                    }
                    _ => ParseState::BufferingShopping { items },
                }
            }
            (LineKind::Blank, state) => state,

            // ── Buffer growth ────────────────────────────────────────────
            (LineKind::RecipeBody, ParseState::BufferingRecipe { title, mut lines }) => {
                lines.push((line_no, line.to_string()));
                ParseState::BufferingRecipe { title, lines }
            }
            (LineKind::ShoppingItem, ParseState::BufferingShopping { mut items }) => {
                items.push(line.to_string());
                ParseState::BufferingShopping { items }
            }
            (LineKind::ShoppingItem, state) => {
                self.flush(state);
                ParseState::BufferingShopping {
                    items: vec![line.to_string()],
                }
            }

            // ── Everything else flushes, then emits ──────────────────────
            (kind, state) => {
                self.flush(state);
                self.emit(kind, line_no, line)
            }
        }
    }

    /// Emit the block(s) for a non-buffered line and return the next state.
    fn emit(&mut self, kind: LineKind, line_no: usize, line: &str) -> ParseState {
        match kind {
            LineKind::MajorSection | LineKind::MinorSection => {
                let title = strip_markers(line);
                self.section = title.to_uppercase();
                if kind == LineKind::MajorSection && self.emitted() >= PAGE_BREAK_MIN_BLOCKS {
                    self.blocks.push(Block::PageBreak);
                }
                self.blocks.extend(blocks::section_heading(&title));
                debug!(section = %self.section, major = kind == LineKind::MajorSection, "Section");
            }
            LineKind::Day => self.blocks.extend(blocks::day_heading(&strip_markers(line))),
            LineKind::Subsection => self
                .blocks
                .push(blocks::subsection_heading(&blocks::subsection_title(line))),
            LineKind::RecipeTitle => {
                return ParseState::BufferingRecipe {
                    title: blocks::recipe_title(line),
                    lines: Vec::new(),
                }
            }
            LineKind::Bullet => {
                let block = blocks::bullet(&mut self.inline, line_no, line);
                self.blocks.push(block);
            }
            LineKind::Paragraph => {
                let block = blocks::paragraph(&mut self.inline, line_no, line);
                self.blocks.push(block);
            }
            // Buffered kinds and blanks are handled in `step`; a stray body
            // line without an open recipe cannot be classified.
            LineKind::Blank | LineKind::RecipeBody | LineKind::ShoppingItem => {}
        }
        ParseState::Idle
    }

    /// Turn any buffered lines into their block.
    pub fn flush(&mut self, state: ParseState) {
        match state {
            ParseState::Idle => {}
            ParseState::BufferingRecipe { title, lines } => self.flush_recipe(&title, &lines),
            ParseState::BufferingShopping { items } => self.flush_shopping(&items),
        }
    }

    fn flush_recipe(&mut self, title: &str, lines: &[(usize, String)]) {
        debug!(title, lines = lines.len(), "Recipe card");
        let card = blocks::recipe_card(&mut self.inline, title, lines);
        self.blocks.push(card);
    }

    fn flush_shopping(&mut self, items: &[String]) {
        debug!(items = items.len(), "Shopping table");
        if let Some(table) = blocks::shopping_table(items) {
            self.blocks.push(table);
        }
    }

    pub fn finish(mut self, state: ParseState) -> ParseOutput {
        self.flush(state);
        ParseOutput {
            blocks: self.blocks,
            warnings: self.inline.into_warnings(),
        }
    }
}

/// Parse a whole plan text into content blocks.
pub fn parse_plan(text: &str) -> ParseOutput {
    parse_plan_after(text, 0)
}

/// Parse plan text that will follow `preceding` blocks in the document.
pub fn parse_plan_after(text: &str, preceding: usize) -> ParseOutput {
    let lines: Vec<&str> = text.lines().collect();
    let mut parser = Parser::with_preceding(preceding);
    let mut state = ParseState::Idle;
    for (i, raw) in lines.iter().enumerate() {
        state = parser.step(state, i + 1, raw.trim(), lines[i + 1..].iter().copied());
    }
    let out = parser.finish(state);
    debug!(
        blocks = out.blocks.len(),
        warnings = out.warnings.len(),
        "Parsed plan text"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Cell, Marker};
    use crate::theme::TextRole;

    fn feed(parser: &mut Parser, state: ParseState, lines: &[&str]) -> ParseState {
        let mut state = state;
        for (i, line) in lines.iter().enumerate() {
            state = parser.step(state, i + 1, line, lines[i + 1..].iter().copied());
        }
        state
    }

    #[test]
    fn empty_text_yields_nothing() {
        let out = parse_plan("");
        assert!(out.blocks.is_empty());
        assert!(out.warnings.is_empty());
        assert!(parse_plan("\n\n   \n").blocks.is_empty());
    }

    #[test]
    fn recipe_returns_to_idle_after_blank() {
        let mut p = Parser::new();
        let state = feed(
            &mut p,
            ParseState::Idle,
            &["RECIPES", "**Overnight Oats**", "- 50g oats", "Soak overnight.", ""],
        );
        assert_eq!(state, ParseState::Idle);
        let cards = p
            .blocks()
            .iter()
            .filter(|b| matches!(b, Block::KeepTogether(_)))
            .count();
        assert_eq!(cards, 1);
    }

    #[test]
    fn blank_before_first_body_line_keeps_recipe_open() {
        let mut p = Parser::new();
        let state = feed(&mut p, ParseState::Idle, &["RECIPES", "**Soup**", ""]);
        assert!(matches!(state, ParseState::BufferingRecipe { ref lines, .. } if lines.is_empty()));
        let out = p.finish(state);
        // Flushed at end of input as a title-only card.
        assert!(matches!(out.blocks.last(), Some(Block::KeepTogether(c)) if c.len() == 2));
    }

    #[test]
    fn new_recipe_title_flushes_the_previous_one() {
        let out = parse_plan("RECIPES\n**Oats**\n- oats\n**Eggs**\n- eggs\n");
        let cards: Vec<_> = out
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::KeepTogether(c) => Some(c),
                _ => None,
            })
            .collect();
        assert_eq!(cards.len(), 2);
        let Block::Paragraph(title) = &cards[1][0] else { panic!() };
        assert_eq!(title.plain_text(), "Eggs");
        assert_eq!(title.marker, Some(Marker::Recipe));
    }

    #[test]
    fn blank_inside_shopping_list_is_tolerated() {
        let out = parse_plan("SHOPPING LIST\n- Eggs - 12\n\n- Milk - 1L\n");
        let tables: Vec<_> = out
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].body_rows().count(), 2);
    }

    #[test]
    fn trailing_blank_keeps_shopping_buffer_until_end() {
        let mut p = Parser::new();
        let state = feed(&mut p, ParseState::Idle, &["SHOPPING LIST", "- Eggs", ""]);
        assert!(matches!(state, ParseState::BufferingShopping { .. }));
        let out = p.finish(state);
        assert!(matches!(out.blocks.last(), Some(Block::Table(_))));
    }

    #[test]
    fn section_change_flushes_shopping_items() {
        let out = parse_plan("SHOPPING LIST\n- Eggs\nMEAL PREP TIPS\n- Cook rice in bulk\n");
        let kinds: Vec<_> = out
            .blocks
            .iter()
            .map(|b| match b {
                Block::Table(_) => "table",
                Block::Paragraph(p) if p.marker == Some(Marker::Bullet) => "bullet",
                Block::Paragraph(_) => "para",
                Block::Rule(_) => "rule",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, ["para", "rule", "table", "para", "rule", "bullet"]);
    }

    #[test]
    fn day_heading_flushes_shopping_items() {
        let out = parse_plan("SHOPPING LIST\n- Eggs\nDay 1 - Monday\n");
        assert!(matches!(out.blocks[2], Block::Table(_)));
        assert!(out.blocks[4].is_role(TextRole::DayHeading));
    }

    #[test]
    fn major_section_page_break_needs_ten_blocks() {
        let mut text = String::from("NUTRITIONAL ANALYSIS\n");
        let out = parse_plan(&format!("{text}MEAL PLAN\n"));
        assert!(!out.blocks.contains(&Block::PageBreak));

        for i in 0..10 {
            text.push_str(&format!("Paragraph {i}\n"));
        }
        text.push_str("MEAL PLAN\n");
        let out = parse_plan(&text);
        let idx = out.blocks.iter().position(|b| *b == Block::PageBreak).unwrap();
        assert!(out.blocks[idx + 1].is_role(TextRole::SectionHeading));
    }

    #[test]
    fn preceding_blocks_count_towards_the_page_break() {
        let text = "NUTRITIONAL ANALYSIS\nTarget 1800 kcal.\nMEAL PLAN\nDay 1 - Monday\n";
        assert!(!parse_plan(text).blocks.contains(&Block::PageBreak));

        let out = parse_plan_after(text, 18);
        let breaks: Vec<usize> = out
            .blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == Block::PageBreak)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(breaks, [0, 4]);
        let Block::Paragraph(heading) = &out.blocks[5] else { panic!() };
        assert_eq!(heading.plain_text(), "MEAL PLAN");
    }

    #[test]
    fn recipe_is_flushed_before_a_day_heading() {
        let out = parse_plan("RECIPES\n**Oats**\n- oats\nDay 2 - Tuesday\n");
        let card = out
            .blocks
            .iter()
            .position(|b| matches!(b, Block::KeepTogether(_)))
            .unwrap();
        let day = out
            .blocks
            .iter()
            .position(|b| b.is_role(TextRole::DayHeading))
            .unwrap();
        let cards = out.blocks.iter().filter(|b| matches!(b, Block::KeepTogether(_))).count();
        assert_eq!(cards, 1);
        assert!(card < day);
    }

    #[test]
    fn recipe_is_flushed_before_a_subsection() {
        let out = parse_plan("RECIPES\n**Oats**\n- oats\n### Method\n");
        let n = out.blocks.len();
        assert!(matches!(out.blocks[n - 2], Block::KeepTogether(_)));
        assert!(out.blocks[n - 1].is_role(TextRole::SubsectionHeading));
    }

    #[test]
    fn recipe_is_flushed_before_a_section() {
        let out = parse_plan("RECIPES\n**Oats**\n- oats\nHYDRATION\n");
        let n = out.blocks.len();
        assert!(matches!(out.blocks[n - 3], Block::KeepTogether(_)));
        assert!(out.blocks[n - 2].is_role(TextRole::SectionHeading));
    }

    #[test]
    fn recipe_is_flushed_before_a_paragraph() {
        let out = parse_plan("RECIPES\n**Oats**\n- oats\n\nServe cold.\n");
        let n = out.blocks.len();
        assert!(matches!(out.blocks[n - 2], Block::KeepTogether(_)));
        let Block::Paragraph(p) = &out.blocks[n - 1] else { panic!() };
        assert_eq!(p.role, TextRole::Body);
        assert_eq!(p.plain_text(), "Serve cold.");
    }

    #[test]
    fn plain_line_inside_open_recipe_joins_the_card() {
        let out = parse_plan("RECIPES\n**Oats**\n- oats\nServe cold.\n");
        assert_eq!(out.blocks.len(), 3);
        let Block::KeepTogether(card) = &out.blocks[2] else { panic!() };
        let texts: Vec<String> = card
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p.plain_text()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, ["Oats", "oats", "Serve cold."]);
    }

    #[test]
    fn minor_section_never_breaks_page() {
        let text: String = (0..20).map(|i| format!("Line {i}\n")).collect::<String>() + "MY NOTES\n";
        assert!(!parse_plan(&text).blocks.contains(&Block::PageBreak));
    }

    #[test]
    fn shopping_rows_carry_checkboxes() {
        let out = parse_plan("SHOPPING LIST\n- Oats - 500g\n");
        let Block::Table(t) = &out.blocks[2] else { panic!() };
        let row = t.body_rows().next().unwrap();
        assert_eq!(row.cells[0], Cell::Checkbox);
        assert_eq!(row.cells[1].plain_text(), "Oats");
        assert_eq!(row.cells[2].plain_text(), "500g");
    }

    #[test]
    fn warnings_carry_line_numbers() {
        let out = parse_plan("Intro\n\nNote: **snake_case** and _x_ again\n");
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].line, 3);
    }

    #[test]
    fn section_label_is_upper_cased_title() {
        let mut p = Parser::new();
        feed(&mut p, ParseState::Idle, &["## Shopping List"]);
        assert_eq!(p.section(), "SHOPPING LIST");
    }
}
