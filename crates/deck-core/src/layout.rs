//! Slide layouts and the fields each one surfaces.
//!
//! A layout never owns data: switching layouts only changes which slide
//! fields are offered for editing. Text in inactive fields is kept, so
//! switching back restores it.

use crate::model::Slide;
use crate::richtext::RichText;
use serde::{Deserialize, Serialize};

/// Arrangement template of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    Blank,
    #[default]
    TitleContent,
    TitleOnly,
    ContentOnly,
    TwoColumn,
    ImageText,
    Comparison,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 7] = [
        LayoutKind::Blank,
        LayoutKind::TitleContent,
        LayoutKind::TitleOnly,
        LayoutKind::ContentOnly,
        LayoutKind::TwoColumn,
        LayoutKind::ImageText,
        LayoutKind::Comparison,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::Blank => "blank",
            LayoutKind::TitleContent => "title-content",
            LayoutKind::TitleOnly => "title-only",
            LayoutKind::ContentOnly => "content-only",
            LayoutKind::TwoColumn => "two-column",
            LayoutKind::ImageText => "image-text",
            LayoutKind::Comparison => "comparison",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// A text-bearing (or image) field of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideField {
    Title,
    Content,
    LeftContent,
    RightContent,
    Image,
    CompLeftTitle,
    CompLeftContent,
    CompRightTitle,
    CompRightContent,
}

impl SlideField {
    pub const ALL: [SlideField; 9] = [
        SlideField::Title,
        SlideField::Content,
        SlideField::LeftContent,
        SlideField::RightContent,
        SlideField::Image,
        SlideField::CompLeftTitle,
        SlideField::CompLeftContent,
        SlideField::CompRightTitle,
        SlideField::CompRightContent,
    ];

    /// The slide's JSON key holding this field.
    pub fn name(self) -> &'static str {
        match self {
            SlideField::Title => "title",
            SlideField::Content => "content",
            SlideField::LeftContent => "leftContent",
            SlideField::RightContent => "rightContent",
            SlideField::Image => "imageSrc",
            SlideField::CompLeftTitle => "compLeftTitle",
            SlideField::CompLeftContent => "compLeftContent",
            SlideField::CompRightTitle => "compRightTitle",
            SlideField::CompRightContent => "compRightContent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Fields surfaced for editing by each layout.
pub fn active_fields(kind: LayoutKind) -> &'static [SlideField] {
    use SlideField::*;
    match kind {
        LayoutKind::Blank => &[Content],
        LayoutKind::TitleContent => &[Title, Content],
        LayoutKind::TitleOnly => &[Title],
        LayoutKind::ContentOnly => &[Content],
        LayoutKind::TwoColumn => &[Title, LeftContent, RightContent],
        LayoutKind::ImageText => &[Title, Image, RightContent],
        LayoutKind::Comparison => &[
            Title,
            CompLeftTitle,
            CompLeftContent,
            CompRightTitle,
            CompRightContent,
        ],
    }
}

pub fn is_active(kind: LayoutKind, field: SlideField) -> bool {
    active_fields(kind).contains(&field)
}

/// Hint shown in an empty field.
pub fn placeholder(field: SlideField) -> &'static str {
    match field {
        SlideField::Title => "Click to add title",
        SlideField::Content => "Click to add text",
        SlideField::LeftContent => "Left column",
        SlideField::RightContent => "Right column",
        SlideField::Image => "Click to add image",
        SlideField::CompLeftTitle | SlideField::CompRightTitle => "Heading",
        SlideField::CompLeftContent | SlideField::CompRightContent => "Comparison points",
    }
}

impl Slide {
    /// Fields surfaced by the slide's effective layout.
    pub fn active_fields(&self) -> &'static [SlideField] {
        active_fields(self.effective_layout())
    }

    /// Current text of a field as rich text. Plain-string fields are
    /// wrapped; the image field yields its source URI.
    pub fn field_text(&self, field: SlideField) -> RichText {
        match field {
            SlideField::Title => RichText::from_plain(&self.title),
            SlideField::Content => self.content.clone(),
            SlideField::LeftContent => self.left_content.clone(),
            SlideField::RightContent => self.right_content.clone(),
            SlideField::Image => RichText::from_plain(self.image_src.as_deref().unwrap_or("")),
            SlideField::CompLeftTitle => RichText::from_plain(&self.comp_left_title),
            SlideField::CompLeftContent => self.comp_left_content.clone(),
            SlideField::CompRightTitle => RichText::from_plain(&self.comp_right_title),
            SlideField::CompRightContent => self.comp_right_content.clone(),
        }
    }

    /// Overwrite a field. Plain-string fields keep only the text.
    pub fn set_field_text(&mut self, field: SlideField, text: RichText) {
        match field {
            SlideField::Title => self.title = text.plain(),
            SlideField::Content => self.content = text,
            SlideField::LeftContent => self.left_content = text,
            SlideField::RightContent => self.right_content = text,
            SlideField::Image => {
                let src = text.plain();
                self.image_src = (!src.is_empty()).then_some(src);
            }
            SlideField::CompLeftTitle => self.comp_left_title = text.plain(),
            SlideField::CompLeftContent => self.comp_left_content = text,
            SlideField::CompRightTitle => self.comp_right_title = text.plain(),
            SlideField::CompRightContent => self.comp_right_content = text,
        }
    }
}
