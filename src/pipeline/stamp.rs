//! Second pagination pass: headers and footers once the page count is known.

use crate::pipeline::cover::COVER_TITLE;
use crate::pipeline::layout::{DraftPage, DrawOp, MARGIN_LEFT, PAGE_HEIGHT, PAGE_WIDTH};
use crate::pipeline::metrics::{pdf_safe, text_width};
use crate::theme::{self, style, TextRole};

/// Left-hand header text on every page after the cover.
pub const HEADER_TITLE: &str = COVER_TITLE;

const HEADER_RULE_Y: f32 = 54.0;
const HEADER_TEXT_Y: f32 = 46.8;
const FOOTER_RULE_Y: f32 = PAGE_HEIGHT - 43.2;
const FOOTER_TEXT_Y: f32 = PAGE_HEIGHT - 28.8;

/// Add header and footer ops to every page but the first.
pub fn stamp_pages(pages: &mut [DraftPage], client_name: &str) {
    let total = pages.len();
    for (i, page) in pages.iter_mut().enumerate().skip(1) {
        page.ops.extend(chrome(i + 1, total, client_name));
    }
}

fn chrome(number: usize, total: usize, client_name: &str) -> Vec<DrawOp> {
    let st = style(TextRole::PageChrome);
    let right = PAGE_WIDTH - MARGIN_LEFT;
    let text = |x: f32, y: f32, s: String| DrawOp::Text {
        x,
        y,
        text: s,
        face: st.face,
        size: st.size,
        color: st.color,
    };
    let rule = |y: f32| DrawOp::Line {
        from: (MARGIN_LEFT, y),
        to: (right, y),
        width: 0.5,
        color: theme::PRIMARY_GREEN,
    };

    let name = pdf_safe(client_name);
    let name_w = text_width(&name, st.face, st.size);
    let footer = format!("Page {number} of {total}");
    let footer_w = text_width(&footer, st.face, st.size);

    vec![
        rule(HEADER_RULE_Y),
        text(MARGIN_LEFT, HEADER_TEXT_Y, HEADER_TITLE.to_string()),
        text(right - name_w, HEADER_TEXT_Y, name),
        rule(FOOTER_RULE_Y),
        text((PAGE_WIDTH - footer_w) / 2.0, FOOTER_TEXT_Y, footer),
    ]
}
