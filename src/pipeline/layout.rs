//! Flow blocks onto Letter pages.
//!
//! Layout is the first of the two passes behind page numbering: it turns the
//! document's blocks into [`DraftPage`]s made of positioned [`DrawOp`]s
//! without knowing the final page count. [`crate::pipeline::stamp`] adds the
//! headers and footers afterwards.
//!
//! Coordinates are PDF points with the origin at the **top-left** of the
//! page and `y` growing downwards; the serialiser flips them.
//!
//! Each block is first measured into [`Item`]s: vertical gaps, spacers,
//! unbreakable strips (one text line, one table row, one box), page breaks,
//! and keep-together groups. The [`Composer`] then places items top to
//! bottom, opening a new page whenever a strip would cross the bottom
//! margin.

use crate::document::{Block, BoxedText, Cell, Document, Marker, Paragraph, Rule, Span, Table};
use crate::pipeline::metrics::{char_width, pdf_safe, text_width};
use crate::theme::{self, style, Align, FontFace, Rgb, TextStyle, BULLET_INDENT};
use tracing::debug;

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN_LEFT: f32 = 54.0;
pub const MARGIN_RIGHT: f32 = 54.0;
pub const MARGIN_TOP: f32 = 64.8;
pub const MARGIN_BOTTOM: f32 = 54.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
pub const FRAME_TOP: f32 = MARGIN_TOP;
pub const FRAME_BOTTOM: f32 = PAGE_HEIGHT - MARGIN_BOTTOM;
pub const FRAME_HEIGHT: f32 = FRAME_BOTTOM - FRAME_TOP;

/// Side of the empty tick box in shopping tables.
const CHECKBOX_SIZE: f32 = 7.0;

/// One positioned drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        face: FontFace,
        size: f32,
        color: Rgb,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
    },
    /// `y` is the top edge.
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Option<Rgb>,
        stroke: Option<(Rgb, f32)>,
    },
    Polygon {
        points: Vec<(f32, f32)>,
        fill: Rgb,
    },
    Polyline {
        points: Vec<(f32, f32)>,
        width: f32,
        color: Rgb,
    },
}

impl DrawOp {
    fn shifted(self, dy: f32) -> Self {
        match self {
            DrawOp::Text {
                x,
                y,
                text,
                face,
                size,
                color,
            } => DrawOp::Text {
                x,
                y: y + dy,
                text,
                face,
                size,
                color,
            },
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => DrawOp::Line {
                from: (from.0, from.1 + dy),
                to: (to.0, to.1 + dy),
                width,
                color,
            },
            DrawOp::Rect {
                x,
                y,
                w,
                h,
                fill,
                stroke,
            } => DrawOp::Rect {
                x,
                y: y + dy,
                w,
                h,
                fill,
                stroke,
            },
            DrawOp::Polygon { points, fill } => DrawOp::Polygon {
                points: points.into_iter().map(|(x, y)| (x, y + dy)).collect(),
                fill,
            },
            DrawOp::Polyline {
                points,
                width,
                color,
            } => DrawOp::Polyline {
                points: points.into_iter().map(|(x, y)| (x, y + dy)).collect(),
                width,
                color,
            },
        }
    }
}

/// A laid-out page before headers and footers are added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPage {
    pub ops: Vec<DrawOp>,
}

impl DraftPage {
    /// All text on the page in drawing order, joined by single spaces.
    pub fn text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ── Measured items ───────────────────────────────────────────────────────

/// An unbreakable band of drawing ops; `y` in ops is relative to its top.
#[derive(Debug, Clone, Default)]
struct Strip {
    height: f32,
    ops: Vec<DrawOp>,
}

#[derive(Debug, Clone)]
enum Item {
    /// Style spacing; dropped at the top of a page.
    Gap(f32),
    /// Explicit spacer; kept at the top of a page.
    Space(f32),
    Strip(Strip),
    Break,
    KeepTogether(Vec<Item>),
}

impl Item {
    fn height(&self) -> f32 {
        match self {
            Item::Gap(h) | Item::Space(h) => *h,
            Item::Strip(s) => s.height,
            Item::Break => 0.0,
            Item::KeepTogether(items) => items.iter().map(Item::height).sum(),
        }
    }
}

// ── Text setting ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Frag {
    text: String,
    face: FontFace,
    width: f32,
}

#[derive(Debug, Clone, Default)]
struct Word {
    frags: Vec<Frag>,
    width: f32,
}

impl Word {
    fn push(&mut self, piece: &mut String, face: FontFace, size: f32) {
        if piece.is_empty() {
            return;
        }
        let width = text_width(piece, face, size);
        self.width += width;
        self.frags.push(Frag {
            text: std::mem::take(piece),
            face,
            width,
        });
    }

    /// Break a word wider than `max` into pieces that fit.
    fn split(self, max: f32, size: f32) -> Vec<Word> {
        let mut out = Vec::new();
        let mut current = Word::default();
        for frag in self.frags {
            let mut piece = String::new();
            let mut piece_w = 0.0;
            for c in frag.text.chars() {
                let cw = char_width(c, frag.face, size);
                if current.width + piece_w + cw > max && (current.width + piece_w) > 0.0 {
                    current.push(&mut piece, frag.face, size);
                    out.push(std::mem::take(&mut current));
                    piece_w = 0.0;
                }
                piece.push(c);
                piece_w += cw;
            }
            current.push(&mut piece, frag.face, size);
        }
        if !current.frags.is_empty() {
            out.push(current);
        }
        out
    }
}

/// Split styled spans into words, transliterating as we go.
fn words(spans: &[Span], base: FontFace, size: f32) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current = Word::default();
    for span in spans {
        let face = base.with_emphasis(span.bold, span.italic);
        let mut piece = String::new();
        for c in pdf_safe(&span.text).chars() {
            if c.is_whitespace() {
                current.push(&mut piece, face, size);
                if !current.frags.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            } else {
                piece.push(c);
            }
        }
        current.push(&mut piece, face, size);
    }
    if !current.frags.is_empty() {
        words.push(current);
    }
    words
}

struct TextLine {
    words: Vec<Word>,
    width: f32,
}

/// Greedy line filling.
fn wrap(words: Vec<Word>, avail: f32, space: f32, size: f32) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut width = 0.0;
    for word in words {
        let pieces = if word.width > avail {
            word.split(avail, size)
        } else {
            vec![word]
        };
        for w in pieces {
            let needed = if current.is_empty() {
                w.width
            } else {
                width + space + w.width
            };
            if needed > avail && !current.is_empty() {
                lines.push(TextLine {
                    words: std::mem::take(&mut current),
                    width,
                });
                width = w.width;
            } else {
                width = needed;
            }
            current.push(w);
        }
    }
    if !current.is_empty() {
        lines.push(TextLine {
            words: current,
            width,
        });
    }
    lines
}

/// Horizontal room a marker takes in front of the text.
fn marker_reserve(marker: Option<Marker>) -> f32 {
    match marker {
        Some(Marker::Recipe) => 16.0,
        Some(Marker::Check) => 14.0,
        Some(Marker::Bullet) | None => 0.0,
    }
}

fn marker_ops(marker: Marker, marker_x: f32, text_x: f32, cy: f32, st: &TextStyle) -> Vec<DrawOp> {
    match marker {
        Marker::Bullet => {
            let cx = text_x - BULLET_INDENT;
            let r = 1.6;
            let points = (0..8)
                .map(|i| {
                    let a = i as f32 * std::f32::consts::FRAC_PI_4;
                    (cx + r * a.cos(), cy + r * a.sin())
                })
                .collect();
            vec![DrawOp::Polygon {
                points,
                fill: st.color,
            }]
        }
        Marker::Recipe => {
            let cx = marker_x + 5.0;
            let d = 4.0;
            vec![DrawOp::Polygon {
                points: vec![(cx, cy - d), (cx + d, cy), (cx, cy + d), (cx - d, cy)],
                fill: theme::ACCENT_ORANGE,
            }]
        }
        Marker::Check => vec![DrawOp::Polyline {
            points: vec![
                (marker_x + 1.0, cy),
                (marker_x + 4.0, cy + 3.0),
                (marker_x + 10.0, cy - 4.0),
            ],
            width: 1.2,
            color: theme::PRIMARY_GREEN,
        }],
    }
}

/// Set a paragraph into line strips inside `[x0, x0 + avail]`.
fn paragraph_lines(p: &Paragraph, st: &TextStyle, x0: f32, avail: f32) -> Vec<Strip> {
    let reserve = marker_reserve(p.marker);
    let full = (avail - st.left_indent).max(1.0);
    let text_avail = (full - reserve).max(1.0);
    let space = char_width(' ', st.face, st.size);
    let lines = wrap(words(&p.spans, st.face, st.size), text_avail, space, st.size);
    let last = lines.len().saturating_sub(1);
    let baseline = st.leading / 2.0 + 0.255 * st.size;

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let block_w = line.width + reserve;
            let offset = match st.align {
                Align::Left | Align::Justify => 0.0,
                Align::Center => (full - block_w) / 2.0,
                Align::Right => full - block_w,
            };
            let marker_x = x0 + st.left_indent + offset;
            let text_x = marker_x + reserve;
            let gaps = line.words.len().saturating_sub(1);
            let stretch = if st.align == Align::Justify && i != last && gaps > 0 {
                (text_avail - line.width) / gaps as f32
            } else {
                0.0
            };

            let mut ops = Vec::new();
            if i == 0 {
                if let Some(marker) = p.marker {
                    let cy = baseline - 0.3 * st.size;
                    ops.extend(marker_ops(marker, marker_x, text_x, cy, st));
                }
            }
            let mut x = text_x;
            for word in line.words {
                for frag in word.frags {
                    ops.push(DrawOp::Text {
                        x,
                        y: baseline,
                        text: frag.text,
                        face: frag.face,
                        size: st.size,
                        color: st.color,
                    });
                    x += frag.width;
                }
                x += space + stretch;
            }
            Strip {
                height: st.leading,
                ops,
            }
        })
        .collect()
}

/// Stack strips into one, offsetting each below the previous.
fn stack(strips: Vec<Strip>, top: f32) -> (Vec<DrawOp>, f32) {
    let mut ops = Vec::new();
    let mut y = top;
    for s in strips {
        ops.extend(s.ops.into_iter().map(|op| op.shifted(y)));
        y += s.height;
    }
    (ops, y - top)
}

// ── Block measurement ────────────────────────────────────────────────────

fn rule_strip(r: &Rule) -> Strip {
    let w = CONTENT_WIDTH * r.width.clamp(0.0, 1.0);
    let x = MARGIN_LEFT + (CONTENT_WIDTH - w) / 2.0;
    let y = r.thickness / 2.0;
    Strip {
        height: r.thickness,
        ops: vec![DrawOp::Line {
            from: (x, y),
            to: (x + w, y),
            width: r.thickness,
            color: r.color,
        }],
    }
}

fn boxed_strip(b: &BoxedText) -> Strip {
    let w = b.width.min(CONTENT_WIDTH);
    let x0 = MARGIN_LEFT + (CONTENT_WIDTH - w) / 2.0;
    let st = style(b.paragraph.role);
    let lines = paragraph_lines(
        &b.paragraph,
        &st,
        x0 + b.left_padding,
        w - b.left_padding - b.padding,
    );
    let (text_ops, text_h) = stack(lines, b.padding);
    let height = text_h + 2.0 * b.padding;
    let mut ops = vec![DrawOp::Rect {
        x: x0,
        y: 0.0,
        w,
        h: height,
        fill: b.background,
        stroke: b.border,
    }];
    ops.extend(text_ops);
    Strip { height, ops }
}

fn table_strips(t: &Table) -> Vec<Strip> {
    let total: f32 = t.columns.iter().sum();
    let x0 = MARGIN_LEFT + ((CONTENT_WIDTH - total) / 2.0).max(0.0);
    let mut body_index = 0usize;
    let mut strips = Vec::with_capacity(t.rows.len());

    for row in &t.rows {
        let pad = if row.header {
            t.style.header_padding
        } else {
            t.style.padding
        };
        let fill = if row.header {
            t.style.header_background
        } else {
            let f = (!t.style.row_backgrounds.is_empty())
                .then(|| t.style.row_backgrounds[body_index % t.style.row_backgrounds.len()]);
            body_index += 1;
            f
        };

        let mut cells: Vec<(f32, f32, &Cell)> = Vec::new();
        if row.span_all {
            if let Some(first) = row.cells.first() {
                cells.push((x0, total, first));
            }
        } else {
            let mut x = x0;
            for (w, cell) in t.columns.iter().zip(&row.cells) {
                cells.push((x, *w, cell));
                x += w;
            }
        }

        // Measure every cell, then centre contents vertically.
        let measured: Vec<(f32, f32, Vec<DrawOp>, f32)> = cells
            .iter()
            .map(|&(x, w, cell)| {
                let (ops, h) = match cell {
                    Cell::Text(p) => {
                        let st = style(p.role);
                        stack(paragraph_lines(p, &st, x + pad, w - 2.0 * pad), 0.0)
                    }
                    Cell::Checkbox => {
                        let bx = x + (w - CHECKBOX_SIZE) / 2.0;
                        (
                            vec![DrawOp::Rect {
                                x: bx,
                                y: 0.0,
                                w: CHECKBOX_SIZE,
                                h: CHECKBOX_SIZE,
                                fill: None,
                                stroke: Some((theme::TEXT_DARK, 0.6)),
                            }],
                            CHECKBOX_SIZE,
                        )
                    }
                    Cell::Empty => (Vec::new(), 0.0),
                };
                (x, w, ops, h)
            })
            .collect();
        let inner = measured.iter().map(|m| m.3).fold(0.0_f32, f32::max);
        let height = inner + 2.0 * pad;

        let mut ops = Vec::new();
        if let Some(fill) = fill {
            ops.push(DrawOp::Rect {
                x: x0,
                y: 0.0,
                w: total,
                h: height,
                fill: Some(fill),
                stroke: None,
            });
        }
        for (x, w, cell_ops, h) in measured {
            let dy = pad + (inner - h) / 2.0;
            ops.extend(cell_ops.into_iter().map(|op| op.shifted(dy)));
            if let Some(grid) = t.style.grid {
                ops.push(DrawOp::Rect {
                    x,
                    y: 0.0,
                    w,
                    h: height,
                    fill: None,
                    stroke: Some(grid),
                });
            }
        }
        strips.push(Strip { height, ops });
    }
    strips
}

fn measure(block: &Block) -> Vec<Item> {
    match block {
        Block::Paragraph(p) => {
            let st = style(p.role);
            let mut items = vec![Item::Gap(st.space_before)];
            items.extend(
                paragraph_lines(p, &st, MARGIN_LEFT, CONTENT_WIDTH)
                    .into_iter()
                    .map(Item::Strip),
            );
            items.push(Item::Gap(st.space_after));
            items
        }
        Block::Rule(r) => vec![
            Item::Gap(r.space_before),
            Item::Strip(rule_strip(r)),
            Item::Gap(r.space_after),
        ],
        Block::Spacer(h) => vec![Item::Space(*h)],
        Block::PageBreak => vec![Item::Break],
        Block::Boxed(b) => vec![Item::Strip(boxed_strip(b))],
        Block::Table(t) => {
            let mut items: Vec<Item> = table_strips(t).into_iter().map(Item::Strip).collect();
            items.push(Item::Gap(t.space_after));
            items
        }
        Block::KeepTogether(children) => {
            vec![Item::KeepTogether(children.iter().flat_map(measure).collect())]
        }
    }
}

// ── Composition ──────────────────────────────────────────────────────────

/// Places measured items onto pages.
#[derive(Debug)]
pub struct Composer {
    pages: Vec<DraftPage>,
    cursor: f32,
    /// Something visible is on the current page.
    placed: bool,
    /// A page break was requested; the next visible item opens a new page.
    pending_break: bool,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self {
            pages: vec![DraftPage::default()],
            cursor: FRAME_TOP,
            placed: false,
            pending_break: false,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(DraftPage::default());
        self.cursor = FRAME_TOP;
        self.placed = false;
        self.pending_break = false;
    }

    fn honour_break(&mut self) {
        if self.pending_break {
            self.new_page();
        }
    }

    fn current(&mut self) -> &mut DraftPage {
        if self.pages.is_empty() {
            self.pages.push(DraftPage::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn add(&mut self, block: &Block) {
        for item in measure(block) {
            self.place(item);
        }
    }

    fn place(&mut self, item: Item) {
        match item {
            Item::Break => {
                if self.placed {
                    self.pending_break = true;
                }
            }
            Item::Gap(h) => {
                if self.placed && !self.pending_break {
                    self.cursor = (self.cursor + h).min(FRAME_BOTTOM);
                }
            }
            Item::Space(h) => {
                self.honour_break();
                if self.placed && self.cursor + h > FRAME_BOTTOM {
                    self.new_page();
                } else {
                    self.cursor = (self.cursor + h).min(FRAME_BOTTOM);
                }
            }
            Item::Strip(strip) => {
                self.honour_break();
                if self.placed && self.cursor + strip.height > FRAME_BOTTOM {
                    self.new_page();
                }
                let top = self.cursor;
                let ops = strip.ops.into_iter().map(|op| op.shifted(top));
                self.current().ops.extend(ops);
                self.cursor += strip.height;
                self.placed = true;
            }
            Item::KeepTogether(items) => {
                self.honour_break();
                let height: f32 = items.iter().map(Item::height).sum();
                if self.placed && self.cursor + height > FRAME_BOTTOM && height <= FRAME_HEIGHT {
                    self.new_page();
                }
                for item in items {
                    self.place(item);
                }
            }
        }
    }

    pub fn finish(self) -> Vec<DraftPage> {
        self.pages
    }
}

/// Lay out a whole document.
pub fn layout(doc: &Document) -> Vec<DraftPage> {
    let mut composer = Composer::new();
    for block in &doc.blocks {
        composer.add(block);
    }
    let pages = composer.finish();
    debug!(blocks = doc.blocks.len(), pages = pages.len(), "Layout complete");
    pages
}
