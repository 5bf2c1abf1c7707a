//! Fixed visual theme: colours, fonts, and per-role paragraph styles.
//!
//! Styling is compiled in. Every visual block names a [`TextRole`]; the
//! layout engine asks [`style`] for the matching [`TextStyle`]. Sizes and
//! spacing are in PDF points.

use serde::{Deserialize, Serialize};

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(v: u32) -> Self {
        Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Components scaled to `0.0..=1.0`.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

pub const PRIMARY_GREEN: Rgb = Rgb::hex(0x2C5F2D);
pub const SECONDARY_GREEN: Rgb = Rgb::hex(0x4A7C4E);
pub const LIGHT_GREEN: Rgb = Rgb::hex(0xE8F5E9);
pub const ACCENT_ORANGE: Rgb = Rgb::hex(0xFF8C00);
pub const TEXT_DARK: Rgb = Rgb::hex(0x333333);
pub const TEXT_LIGHT: Rgb = Rgb::hex(0x666666);
pub const WHITE: Rgb = Rgb::hex(0xFFFFFF);
pub const WHITESMOKE: Rgb = Rgb::hex(0xF5F5F5);
pub const ROW_ALT: Rgb = Rgb::hex(0xF8F8F8);
pub const GRID_LIGHT: Rgb = Rgb::hex(0xDDDDDD);

/// The four built-in Helvetica faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    Regular,
    Bold,
    Oblique,
    BoldOblique,
}

impl FontFace {
    /// Apply inline emphasis on top of a base face.
    pub fn with_emphasis(self, bold: bool, italic: bool) -> Self {
        let bold = bold || matches!(self, FontFace::Bold | FontFace::BoldOblique);
        let italic = italic || matches!(self, FontFace::Oblique | FontFace::BoldOblique);
        match (bold, italic) {
            (false, false) => FontFace::Regular,
            (true, false) => FontFace::Bold,
            (false, true) => FontFace::Oblique,
            (true, true) => FontFace::BoldOblique,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, FontFace::Bold | FontFace::BoldOblique)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
    Right,
    Justify,
}

/// Semantic role of a paragraph; selects its [`TextStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextRole {
    Title,
    Subtitle,
    SectionHeading,
    SubsectionHeading,
    DayHeading,
    Body,
    Bullet,
    RecipeTitle,
    RecipeLine,
    MacroValue,
    MacroLabel,
    ContentsTitle,
    ContentsItem,
    Disclaimer,
    TableHeader,
    TableCell,
    ProfileHeader,
    ProfileLabel,
    ProfileValue,
    PageChrome,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub leading: f32,
    pub color: Rgb,
    pub align: Align,
    pub space_before: f32,
    pub space_after: f32,
    pub left_indent: f32,
}

impl TextStyle {
    const fn new(face: FontFace, size: f32, leading: f32, color: Rgb) -> Self {
        Self {
            face,
            size,
            leading,
            color,
            align: Align::Left,
            space_before: 0.0,
            space_after: 0.0,
            left_indent: 0.0,
        }
    }

    const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    const fn spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    const fn indent(mut self, left: f32) -> Self {
        self.left_indent = left;
        self
    }
}

/// Look up the style for a role.
pub fn style(role: TextRole) -> TextStyle {
    use FontFace::*;
    use TextRole::*;
    match role {
        Title => TextStyle::new(Bold, 28.0, 34.0, PRIMARY_GREEN)
            .align(Align::Center)
            .spacing(0.0, 20.0),
        Subtitle => TextStyle::new(Oblique, 14.0, 17.0, TEXT_LIGHT)
            .align(Align::Center)
            .spacing(0.0, 30.0),
        SectionHeading => TextStyle::new(Bold, 18.0, 22.0, PRIMARY_GREEN).spacing(24.0, 12.0),
        SubsectionHeading => {
            TextStyle::new(Bold, 13.0, 16.0, SECONDARY_GREEN).spacing(14.0, 8.0)
        }
        DayHeading => TextStyle::new(Regular, 12.0, 15.0, PRIMARY_GREEN),
        Body => TextStyle::new(Regular, 10.0, 14.0, TEXT_DARK)
            .align(Align::Justify)
            .spacing(0.0, 8.0),
        Bullet => TextStyle::new(Regular, 10.0, 13.0, TEXT_DARK)
            .spacing(0.0, 4.0)
            .indent(20.0),
        RecipeTitle => TextStyle::new(Bold, 12.0, 15.0, ACCENT_ORANGE).spacing(12.0, 6.0),
        RecipeLine => TextStyle::new(Regular, 10.0, 13.0, TEXT_DARK)
            .spacing(0.0, 4.0)
            .indent(15.0),
        MacroValue => TextStyle::new(Bold, 11.0, 14.0, PRIMARY_GREEN).align(Align::Center),
        MacroLabel => TextStyle::new(Regular, 9.0, 11.0, TEXT_LIGHT).align(Align::Center),
        ContentsTitle => TextStyle::new(Regular, 12.0, 15.0, PRIMARY_GREEN)
            .align(Align::Center)
            .spacing(0.0, 10.0),
        ContentsItem => TextStyle::new(Regular, 10.0, 12.0, TEXT_DARK)
            .align(Align::Center)
            .spacing(0.0, 4.0),
        Disclaimer => TextStyle::new(Regular, 8.0, 11.0, TEXT_LIGHT).align(Align::Center),
        TableHeader => TextStyle::new(Bold, 9.0, 11.0, WHITESMOKE),
        TableCell => TextStyle::new(Regular, 9.0, 11.0, TEXT_DARK),
        ProfileHeader => TextStyle::new(Regular, 12.0, 15.0, WHITESMOKE).align(Align::Center),
        ProfileLabel => TextStyle::new(Bold, 10.0, 12.0, SECONDARY_GREEN).align(Align::Right),
        ProfileValue => TextStyle::new(Regular, 10.0, 12.0, TEXT_DARK),
        PageChrome => TextStyle::new(Regular, 9.0, 11.0, TEXT_LIGHT),
    }
}

/// Distance from a bullet dot's centre to the text it leads.
pub const BULLET_INDENT: f32 = 7.0;
