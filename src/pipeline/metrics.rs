//! Built-in Helvetica metrics and text transliteration.
//!
//! The PDF uses the standard-14 Helvetica faces, which carry no embedded
//! font program and cover printable ASCII reliably. Every string is passed
//! through [`pdf_safe`] before it is measured or drawn, so measurement and
//! rendering always see the same characters.

use crate::theme::FontFace;

/// Advance widths in 1/1000 em for ASCII 32..=126, Helvetica.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Advance widths in 1/1000 em for ASCII 32..=126, Helvetica-Bold.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width of one character in points. Oblique faces share upright widths.
pub fn char_width(c: char, face: FontFace, size: f32) -> f32 {
    let table = if face.is_bold() { &HELVETICA_BOLD } else { &HELVETICA };
    let units = match c as u32 {
        n @ 32..=126 => table[(n - 32) as usize],
        // Anything else has been transliterated away; measure as a space.
        _ => table[0],
    };
    units as f32 * size / 1000.0
}

/// Width of a string in points.
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    text.chars().map(|c| char_width(c, face, size)).sum()
}

/// Replace characters outside printable ASCII with the closest ASCII text;
/// drop what has no sensible equivalent.
pub fn pdf_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if (' '..='~').contains(&c) {
            out.push(c);
            continue;
        }
        let rep: &str = match c {
            '\t' => " ",
            '£' => "GBP",
            '€' => "EUR",
            '‘' | '’' | '‚' | '′' => "'",
            '“' | '”' | '„' | '″' => "\"",
            '–' | '—' | '‐' | '‑' | '−' => "-",
            '…' => "...",
            '•' | '·' => "-",
            '×' => "x",
            '÷' => "/",
            '°' => " deg",
            '½' => "1/2",
            '¼' => "1/4",
            '¾' => "3/4",
            '⅓' => "1/3",
            '⅔' => "2/3",
            '≈' => "~",
            '≤' => "<=",
            '≥' => ">=",
            '→' => "->",
            '✓' | '✔' => "v",
            '\u{a0}' | '\u{2009}' | '\u{202f}' => " ",
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
            'ç' => "c",
            'Ç' => "C",
            'è' | 'é' | 'ê' | 'ë' => "e",
            'È' | 'É' | 'Ê' | 'Ë' => "E",
            'ì' | 'í' | 'î' | 'ï' => "i",
            'Ì' | 'Í' | 'Î' | 'Ï' => "I",
            'ñ' => "n",
            'Ñ' => "N",
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
            'ù' | 'ú' | 'û' | 'ü' => "u",
            'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
            'ý' | 'ÿ' => "y",
            'ß' => "ss",
            'æ' => "ae",
            'Æ' => "AE",
            'œ' => "oe",
            _ => "",
        };
        out.push_str(rep);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_widths() {
        assert_eq!(char_width('W', FontFace::Regular, 1000.0), 944.0);
        assert_eq!(char_width('i', FontFace::Regular, 1000.0), 222.0);
        assert_eq!(char_width('i', FontFace::Bold, 1000.0), 278.0);
        assert_eq!(char_width('m', FontFace::BoldOblique, 1000.0), 889.0);
    }

    #[test]
    fn width_scales_with_size() {
        let w10 = text_width("Oats", FontFace::Regular, 10.0);
        let w20 = text_width("Oats", FontFace::Regular, 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-4);
        assert!(text_width("Oats", FontFace::Bold, 10.0) > w10);
    }

    #[test]
    fn transliteration() {
        assert_eq!(pdf_safe("£40 per week"), "GBP40 per week");
        assert_eq!(pdf_safe("“Don’t” – ok…"), "\"Don't\" - ok...");
        assert_eq!(pdf_safe("Café crème brûlée"), "Cafe creme brulee");
        assert_eq!(pdf_safe("½ cup at 180°C"), "1/2 cup at 180 degC");
    }

    #[test]
    fn emoji_are_dropped() {
        assert_eq!(pdf_safe("🍽️ Dinner 🥗"), " Dinner ");
    }
}
