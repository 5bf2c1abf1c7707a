//! Cover page, built from the profile alone.

use crate::document::{Block, BoxedText, Cell, Marker, Paragraph, Row, Rule, Span, Table, TableStyle};
use crate::pipeline::sanitize::plain;
use crate::profile::ClientProfile;
use crate::theme::{self, TextRole};
use chrono::NaiveDate;

/// Title on the cover and in the running header.
pub const COVER_TITLE: &str = "Personal Nutrition Plan";

pub const DISCLAIMER: &str = "This nutrition plan is for informational purposes only and should \
     not replace professional medical advice. Please consult with a healthcare provider before \
     starting any new diet or nutrition programme.";

const PROFILE_COLUMNS: [f32; 2] = [144.0, 288.0];
const DISCLAIMER_WIDTH: f32 = 432.0;

fn contents_items(days: u32) -> [String; 6] {
    [
        "Personalised nutritional analysis & calorie targets".to_string(),
        format!("Complete {days}-day meal plan with macros"),
        "Detailed recipes with step-by-step instructions".to_string(),
        "Organised shopping list with budget guidance".to_string(),
        "Meal prep strategies & storage tips".to_string(),
        "Expert advice for long-term success".to_string(),
    ]
}

fn profile_row(label: &str, value: String) -> Row {
    Row::body(vec![
        Cell::Text(Paragraph::new(TextRole::ProfileLabel, plain(label))),
        Cell::Text(Paragraph::new(TextRole::ProfileValue, plain(&value))),
    ])
}

fn profile_table(profile: &ClientProfile, created: NaiveDate) -> Table {
    let mut header = Row::header(vec![Cell::Text(Paragraph::new(
        TextRole::ProfileHeader,
        vec![Span::bold("Your Profile")],
    ))]);
    header.span_all = true;

    Table {
        columns: PROFILE_COLUMNS.to_vec(),
        rows: vec![
            header,
            profile_row("Name", profile.name.clone()),
            profile_row("Age", profile.age.to_string()),
            profile_row("Goal", profile.goal.to_string()),
            profile_row("Diet Type", profile.diet_type_title()),
            profile_row("Activity Level", profile.activity_level.to_string()),
            profile_row("Plan Duration", format!("{} days", profile.plan_duration_days)),
            profile_row("Created", created.format("%d %B %Y").to_string()),
        ],
        style: TableStyle {
            header_background: Some(theme::PRIMARY_GREEN),
            row_backgrounds: vec![theme::WHITE, theme::ROW_ALT],
            grid: Some((theme::SECONDARY_GREEN, 0.5)),
            padding: 8.0,
            header_padding: 12.0,
        },
        space_after: 0.0,
    }
}

/// Every block of the cover page, ending with a page break.
///
/// The spacing is sized so the whole cover fits one letter page.
pub fn cover_page(profile: &ClientProfile, created: NaiveDate) -> Vec<Block> {
    let mut blocks = vec![
        Block::Spacer(54.0),
        Block::Paragraph(Paragraph::new(TextRole::Title, plain(COVER_TITLE))),
        Block::Spacer(7.2),
        Block::Rule(Rule {
            width: 0.4,
            thickness: 2.0,
            color: theme::ACCENT_ORANGE,
            space_before: 5.0,
            space_after: 5.0,
        }),
        Block::Paragraph(Paragraph::new(
            TextRole::Subtitle,
            plain(&format!("Customised for {}", profile.name)),
        )),
        Block::Spacer(21.6),
        Block::Table(profile_table(profile, created)),
        Block::Spacer(28.8),
        Block::Paragraph(Paragraph::new(
            TextRole::ContentsTitle,
            vec![Span::bold("What's Inside")],
        )),
    ];

    blocks.extend(contents_items(profile.plan_duration_days).iter().map(|item| {
        Block::Paragraph(Paragraph::new(TextRole::ContentsItem, plain(item)).with_marker(Marker::Check))
    }));

    blocks.push(Block::Spacer(21.6));
    blocks.push(Block::Boxed(BoxedText {
        paragraph: Paragraph::new(TextRole::Disclaimer, vec![Span::italic(DISCLAIMER)]),
        background: Some(theme::WHITESMOKE),
        border: Some((theme::GRID_LIGHT, 0.5)),
        padding: 12.0,
        left_padding: 12.0,
        width: DISCLAIMER_WIDTH,
    }));
    blocks.push(Block::PageBreak);
    blocks
}
