//! Deterministic cleanup of the generated plan text.
//!
//! Models occasionally wrap the whole answer in a code fence, answer with
//! CRLF endings, or sprinkle zero-width characters. None of that is content,
//! and all of it confuses the line classifier, so it is removed before the
//! text is saved or rendered. Markup such as `**bold**` and `- ` bullets is
//! left alone: the renderer needs it.
//!
//! Rules (applied in order):
//! 1. Strip an outer code fence (```` ``` ````, ```` ```markdown ````, ```` ```text ````)
//! 2. Normalise line endings (CRLF → LF)
//! 3. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
//! 4. Trim trailing whitespace per line
//! 5. Collapse 3+ consecutive blank lines down to 2
//! 6. Ensure the text ends with exactly one newline

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply every cleanup rule. Whitespace-only input comes back empty so the
/// caller can treat it as "no plan produced".
pub fn clean_plan_text(input: &str) -> String {
    let s = strip_outer_fence(input);
    let s = normalise_line_endings(&s);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    ensure_final_newline(&s)
}

static RE_OUTER_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```(?:markdown|md|text|plaintext)?[ \t]*\r?\n(.*?)\r?\n```\s*$").unwrap()
});

fn strip_outer_fence(input: &str) -> String {
    match RE_OUTER_FENCE.captures(input.trim()) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences() {
        assert_eq!(strip_outer_fence("```markdown\nDAY 1:\nOats\n```"), "DAY 1:\nOats");
        assert_eq!(strip_outer_fence("```\nDAY 1:\n```"), "DAY 1:");
        assert_eq!(strip_outer_fence("```text\r\nDAY 1:\r\n```\n"), "DAY 1:");
    }

    #[test]
    fn inner_fences_are_kept() {
        let input = "Intro\n```\ncode\n```";
        assert_eq!(strip_outer_fence(input), input);
    }

    #[test]
    fn line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn invisible_chars() {
        assert_eq!(remove_invisible_chars("\u{FEFF}Oats\u{200B} and\u{00AD}milk"), "Oats andmilk");
    }

    #[test]
    fn blank_runs_collapse() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n\n\nb"), "a\n\n\nb");
    }

    #[test]
    fn whitespace_only_becomes_empty() {
        assert_eq!(clean_plan_text("  \n\t\n"), "");
        assert_eq!(clean_plan_text(""), "");
    }

    #[test]
    fn full_pass_keeps_markup() {
        let input = "```markdown\r\n**RECIPES**   \r\n\r\n\r\n\r\n\r\n- **Oats** 40g\r\n```";
        let out = clean_plan_text(input);
        assert_eq!(out, "**RECIPES**\n\n\n- **Oats** 40g\n");
    }
}
