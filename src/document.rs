//! The visual block model produced by the renderer.
//!
//! A [`Document`] is an ordered list of [`Block`]s: cover page first, then
//! the parsed plan content, in exactly the order the classifier made its
//! decisions. The layout engine ([`crate::pipeline::layout`]) flows these
//! blocks onto pages; nothing here knows about page geometry.

use crate::error::LineWarning;
use crate::theme::{Rgb, TextRole};
use serde::{Deserialize, Serialize};

/// A run of text with inline emphasis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            italic: false,
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: true,
        }
    }
}

/// A decoration drawn in front of a paragraph's first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    /// Small round bullet at [`crate::theme::BULLET_INDENT`].
    Bullet,
    /// Accent diamond leading a recipe title.
    Recipe,
    /// Tick leading a cover-page contents item.
    Check,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub role: TextRole,
    pub spans: Vec<Span>,
    pub marker: Option<Marker>,
}

impl Paragraph {
    pub fn new(role: TextRole, spans: Vec<Span>) -> Self {
        Self {
            role,
            spans,
            marker: None,
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Concatenated span text, without formatting.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A horizontal divider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Fraction of the content width, `0.0..=1.0`.
    pub width: f32,
    pub thickness: f32,
    pub color: Rgb,
    pub space_before: f32,
    pub space_after: f32,
}

/// A single padded cell with optional fill and border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxedText {
    pub paragraph: Paragraph,
    pub background: Option<Rgb>,
    pub border: Option<(Rgb, f32)>,
    pub padding: f32,
    pub left_padding: f32,
    /// Box width in points; centred when narrower than the content area.
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Text(Paragraph),
    /// Empty tick box for shopping lists.
    Checkbox,
    Empty,
}

impl Cell {
    pub fn plain_text(&self) -> String {
        match self {
            Cell::Text(p) => p.plain_text(),
            Cell::Checkbox | Cell::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
    /// Header rows take the table's header background.
    pub header: bool,
    /// The first cell spans every column.
    pub span_all: bool,
}

impl Row {
    pub fn body(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            header: false,
            span_all: false,
        }
    }

    pub fn header(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            header: true,
            span_all: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStyle {
    pub header_background: Option<Rgb>,
    /// Alternating body row fills, starting with the first body row.
    pub row_backgrounds: Vec<Rgb>,
    pub grid: Option<(Rgb, f32)>,
    pub padding: f32,
    pub header_padding: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column widths in points.
    pub columns: Vec<f32>,
    pub rows: Vec<Row>,
    pub style: TableStyle,
    pub space_after: f32,
}

impl Table {
    pub fn body_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| !r.header)
    }
}

/// One unit of paginated output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(Paragraph),
    Rule(Rule),
    /// Vertical gap in points.
    Spacer(f32),
    PageBreak,
    Boxed(BoxedText),
    Table(Table),
    /// Children that must not be split across a page boundary.
    KeepTogether(Vec<Block>),
}

impl Block {
    pub fn role(&self) -> Option<TextRole> {
        match self {
            Block::Paragraph(p) => Some(p.role),
            Block::Boxed(b) => Some(b.paragraph.role),
            _ => None,
        }
    }

    pub fn is_role(&self, role: TextRole) -> bool {
        self.role() == Some(role)
    }
}

/// A rendered plan: blocks ready for layout, plus what went wrong on the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub client_name: String,
    pub blocks: Vec<Block>,
    /// Number of leading blocks that belong to the cover page.
    pub cover_len: usize,
    pub warnings: Vec<LineWarning>,
}

impl Document {
    /// Blocks produced from the plan text, cover page excluded.
    pub fn content(&self) -> &[Block] {
        &self.blocks[self.cover_len..]
    }
}
