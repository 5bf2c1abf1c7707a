//! Serialise stamped pages into PDF bytes with `printpdf`.
//!
//! Only the four built-in Helvetica faces are used, so nothing is embedded
//! and every page is a single layer of vector ops.

use crate::error::PlanError;
use crate::pipeline::layout::{DraftPage, DrawOp, PAGE_HEIGHT, PAGE_WIDTH};
use crate::theme::{FontFace, Rgb};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Pt, Rect,
};

fn mm(v: f32) -> Mm {
    Mm::from(Pt(v))
}

/// Top-down point → PDF user space.
fn point(x: f32, y: f32) -> Point {
    Point::new(mm(x), mm(PAGE_HEIGHT - y))
}

fn color(c: Rgb) -> Color {
    let (r, g, b) = c.unit();
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
    bold_oblique: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, PlanError> {
        let add = |f: BuiltinFont| {
            doc.add_builtin_font(f)
                .map_err(|e| PlanError::PdfAssemblyFailed(format!("built-in font: {e}")))
        };
        Ok(Self {
            regular: add(BuiltinFont::Helvetica)?,
            bold: add(BuiltinFont::HelveticaBold)?,
            oblique: add(BuiltinFont::HelveticaOblique)?,
            bold_oblique: add(BuiltinFont::HelveticaBoldOblique)?,
        })
    }

    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Oblique => &self.oblique,
            FontFace::BoldOblique => &self.bold_oblique,
        }
    }
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp) {
    match op {
        DrawOp::Text {
            x,
            y,
            text,
            face,
            size,
            color: c,
        } => {
            if text.is_empty() {
                return;
            }
            layer.set_fill_color(color(*c));
            layer.use_text(text.as_str(), *size, mm(*x), mm(PAGE_HEIGHT - y), fonts.get(*face));
        }
        DrawOp::Line {
            from,
            to,
            width,
            color: c,
        } => {
            layer.set_outline_color(color(*c));
            layer.set_outline_thickness(*width);
            layer.add_line(Line {
                points: vec![(point(from.0, from.1), false), (point(to.0, to.1), false)],
                is_closed: false,
            });
        }
        DrawOp::Rect {
            x,
            y,
            w,
            h,
            fill,
            stroke,
        } => {
            let mode = match (fill, stroke) {
                (Some(_), Some(_)) => PaintMode::FillStroke,
                (Some(_), None) => PaintMode::Fill,
                (None, Some(_)) => PaintMode::Stroke,
                (None, None) => return,
            };
            if let Some(f) = fill {
                layer.set_fill_color(color(*f));
            }
            if let Some((s, width)) = stroke {
                layer.set_outline_color(color(*s));
                layer.set_outline_thickness(*width);
            }
            let rect = Rect::new(
                mm(*x),
                mm(PAGE_HEIGHT - (y + h)),
                mm(x + w),
                mm(PAGE_HEIGHT - y),
            )
            .with_mode(mode);
            layer.add_rect(rect);
        }
        DrawOp::Polygon { points, fill } => {
            layer.set_fill_color(color(*fill));
            layer.add_polygon(Polygon {
                rings: vec![points.iter().map(|&(x, y)| (point(x, y), false)).collect()],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
        DrawOp::Polyline {
            points,
            width,
            color: c,
        } => {
            layer.set_outline_color(color(*c));
            layer.set_outline_thickness(*width);
            layer.add_line(Line {
                points: points.iter().map(|&(x, y)| (point(x, y), false)).collect(),
                is_closed: false,
            });
        }
    }
}

/// Write every page into a new PDF and return its bytes.
pub fn render_pdf(pages: &[DraftPage], title: &str) -> Result<Vec<u8>, PlanError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Content");
    let fonts = Fonts::load(&doc)?;

    for (i, page) in pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (p, l) = doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Content");
            doc.get_page(p).get_layer(l)
        };
        for op in &page.ops {
            draw(&layer, &fonts, op);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| PlanError::PdfAssemblyFailed(e.to_string()))
}
