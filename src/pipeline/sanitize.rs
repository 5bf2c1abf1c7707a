//! Inline text sanitising: escape first, then reintroduce emphasis.
//!
//! Generated plan text is free-form. Anything in it that looks like markup
//! must stay literal text, except the two emphasis forms the prompt asks the
//! model to use. The order is therefore fixed:
//!
//! 1. [`escape`] every character meaningful to the inline markup
//!    (`& < > " '`), so a literal `<b>` in the text can never become a tag;
//! 2. rewrite `**run**` → `<b>run</b>`, then `*run*` and `_run_` →
//!    `<i>run</i>` on the escaped text;
//! 3. [`parse_markup`] the result into styled [`Span`]s.
//!
//! Step 2 works on loosely paired markers, so it can produce mis-nested tags
//! (`**snake_case** _x_`). Step 3 reports those as a [`MarkupError`]; the
//! caller then falls back to [`plain`].

use crate::document::Span;
use crate::error::MarkupError;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static RE_ITALIC_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static RE_ITALIC_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([^_]+)_").unwrap());

/// Escape the characters that carry meaning in the inline markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text`, then convert markdown emphasis into `<b>`/`<i>` tags.
pub fn sanitize(text: &str) -> String {
    let s = escape(text);
    let s = RE_BOLD.replace_all(&s, "<b>${1}</b>");
    let s = RE_ITALIC_STAR.replace_all(&s, "<i>${1}</i>");
    let s = RE_ITALIC_UNDERSCORE.replace_all(&s, "<i>${1}</i>");
    s.into_owned()
}

/// Sanitise and parse in one step.
pub fn format_inline(text: &str) -> Result<Vec<Span>, MarkupError> {
    parse_markup(&sanitize(text))
}

/// The fallback rendering: the whole line as one unformatted span.
///
/// Equivalent to parsing `escape(text)`, which contains no tags.
pub fn plain(text: &str) -> Vec<Span> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Span::plain(text)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Bold,
    Italic,
}

impl Tag {
    fn name(self) -> &'static str {
        match self {
            Tag::Bold => "b",
            Tag::Italic => "i",
        }
    }
}

/// Parse sanitised markup into spans.
///
/// Accepts `<b>`, `<i>`, their closing tags, and the five entities
/// [`escape`] produces. Tags must nest properly.
pub fn parse_markup(markup: &str) -> Result<Vec<Span>, MarkupError> {
    let mut spans: Vec<Span> = Vec::new();
    let mut stack: Vec<Tag> = Vec::new();
    let mut buf = String::new();
    let mut rest = markup;
    let mut offset = 0usize;

    let flush = |buf: &mut String, stack: &[Tag], spans: &mut Vec<Span>| {
        if buf.is_empty() {
            return;
        }
        let bold = stack.contains(&Tag::Bold);
        let italic = stack.contains(&Tag::Italic);
        match spans.last_mut() {
            Some(last) if last.bold == bold && last.italic == italic => last.text.push_str(buf),
            _ => spans.push(Span {
                text: buf.clone(),
                bold,
                italic,
            }),
        }
        buf.clear();
    };

    while let Some(c) = rest.chars().next() {
        match c {
            '<' => {
                let end = rest.find('>').ok_or_else(|| MarkupError::UnknownTag {
                    tag: rest.chars().skip(1).take(8).collect(),
                    offset,
                })?;
                let inner = &rest[1..end];
                let (closing, name) = match inner.strip_prefix('/') {
                    Some(n) => (true, n),
                    None => (false, inner),
                };
                let tag = match name {
                    "b" => Tag::Bold,
                    "i" => Tag::Italic,
                    other => {
                        return Err(MarkupError::UnknownTag {
                            tag: other.to_string(),
                            offset,
                        })
                    }
                };
                flush(&mut buf, &stack, &mut spans);
                if closing {
                    if stack.last() != Some(&tag) {
                        return Err(MarkupError::UnbalancedClose {
                            tag: tag.name().to_string(),
                            offset,
                        });
                    }
                    stack.pop();
                } else {
                    stack.push(tag);
                }
                offset += end + 1;
                rest = &rest[end + 1..];
            }
            '&' => {
                let end = rest
                    .find(';')
                    .filter(|&e| e <= 6)
                    .ok_or(MarkupError::BadEntity { offset })?;
                let decoded = match &rest[..=end] {
                    "&amp;" => '&',
                    "&lt;" => '<',
                    "&gt;" => '>',
                    "&quot;" => '"',
                    "&#x27;" => '\'',
                    _ => return Err(MarkupError::BadEntity { offset }),
                };
                buf.push(decoded);
                offset += end + 1;
                rest = &rest[end + 1..];
            }
            _ => {
                buf.push(c);
                offset += c.len_utf8();
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(MarkupError::Unclosed {
            tag: open.name().to_string(),
        });
    }
    flush(&mut buf, &stack, &mut spans);
    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_markers_become_bold_span() {
        let spans = format_inline("**Grilled Salmon**").unwrap();
        assert_eq!(spans, vec![Span::bold("Grilled Salmon")]);
    }

    #[test]
    fn mixed_emphasis() {
        let spans = format_inline("Eat **more** fibre, *slowly* and _daily_").unwrap();
        assert_eq!(
            spans,
            vec![
                Span::plain("Eat "),
                Span::bold("more"),
                Span::plain(" fibre, "),
                Span::italic("slowly"),
                Span::plain(" and "),
                Span::italic("daily"),
            ]
        );
    }

    #[test]
    fn literal_tags_stay_text() {
        let spans = format_inline("<b>not bold</b> & <script>").unwrap();
        assert_eq!(spans, vec![Span::plain("<b>not bold</b> & <script>")]);
    }

    #[test]
    fn escape_covers_quotes() {
        assert_eq!(escape(r#"a "b" 'c' & <d>"#), "a &quot;b&quot; &#x27;c&#x27; &amp; &lt;d&gt;");
    }

    #[test]
    fn special_characters_inside_bold_are_escaped_then_restored() {
        let spans = format_inline("**Salt & Pepper <3**").unwrap();
        assert_eq!(spans, vec![Span::bold("Salt & Pepper <3")]);
    }

    #[test]
    fn misnested_emphasis_is_an_error() {
        let err = format_inline("**snake_case** and _x_").unwrap_err();
        assert!(matches!(err, MarkupError::UnbalancedClose { .. }), "got {err:?}");
    }

    #[test]
    fn unclosed_tag_is_an_error() {
        assert_eq!(
            parse_markup("<b>open"),
            Err(MarkupError::Unclosed { tag: "b".into() })
        );
    }

    #[test]
    fn unknown_tag_and_bad_entity_are_errors() {
        assert!(matches!(
            parse_markup("<u>x</u>"),
            Err(MarkupError::UnknownTag { .. })
        ));
        assert!(matches!(
            parse_markup("fish &chips"),
            Err(MarkupError::BadEntity { offset: 5 })
        ));
    }

    #[test]
    fn unmatched_single_star_is_left_alone() {
        let spans = format_inline("5 * 3 = 15").unwrap();
        assert_eq!(spans, vec![Span::plain("5 * 3 = 15")]);
    }

    #[test]
    fn plain_fallback_keeps_markers_visible() {
        assert_eq!(plain("**x_"), vec![Span::plain("**x_")]);
        assert!(plain("").is_empty());
    }
}
