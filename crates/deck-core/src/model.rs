//! Core data model for Deck presentations.
//!
//! A presentation is an ordered list of `Slide`s. Each slide carries a set of
//! layout-driven text fields plus a z-ordered list of positioned `Element`s.
//! Elements are a closed tagged union (`ElementKind`); every variant is
//! matched exhaustively, there is no duck typing on a `type` string.
//!
//! The serde representation uses camelCase keys and a `type` tag on
//! elements, so persisted decks stay readable by the browser front end.

use crate::geometry::Bounds;
use crate::id::{CommentId, ElementId, SlideId};
use crate::layout::LayoutKind;
use crate::richtext::RichText;
use crate::table::TableData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::fmt;

// ─── Colors & Backgrounds ────────────────────────────────────────────────

/// RGBA color, 8 bits per channel. Serialized as a hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`. A few CSS keywords
    /// (`white`, `black`, `transparent`) are accepted as well.
    pub fn from_hex(hex: &str) -> Option<Self> {
        match hex.trim().to_ascii_lowercase().as_str() {
            "white" => return Some(Self::WHITE),
            "black" => return Some(Self::BLACK),
            "transparent" => return Some(Self::TRANSPARENT),
            _ => {}
        }

        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let short = |i: usize| hex_val(bytes[i]).map(|v| v * 17);
        let long = |i: usize| Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?);

        match bytes.len() {
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgb(long(0)?, long(2)?, long(4)?)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// CSS form for inline styles: hex when opaque, `rgba()` otherwise.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            self.to_hex()
        } else {
            let alpha = self.a as f32 / 255.0;
            format!("rgba({}, {}, {}, {alpha:.3})", self.r, self.g, self.b)
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
    }
}

/// A gradient stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32, // 0.0 .. 1.0
    pub color: Color,
}

/// Slide background paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Background {
    Solid {
        color: Color,
    },
    LinearGradient {
        angle: f32, // degrees
        stops: Vec<GradientStop>,
    },
    Image {
        src: String,
    },
}

impl Background {
    /// CSS `background` value for the rendering boundary.
    pub fn to_css(&self) -> String {
        match self {
            Background::Solid { color } => color.to_css(),
            Background::LinearGradient { angle, stops } => {
                let stops: Vec<String> = stops
                    .iter()
                    .map(|s| format!("{} {:.0}%", s.color.to_css(), s.offset * 100.0))
                    .collect();
                format!("linear-gradient({angle}deg, {})", stops.join(", "))
            }
            Background::Image { src } => format!("center / cover no-repeat url(\"{src}\")"),
        }
    }
}

// ─── Element payloads ────────────────────────────────────────────────────

/// Geometric primitive drawn by a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Arrow,
    Diamond,
    Star,
    Hexagon,
    Heart,
    Pentagon,
    Oval,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageProps {
    pub src: String,
    pub alt: String,
    /// 0.0 (invisible) .. 1.0 (opaque).
    pub opacity: f32,
    /// CSS filter percentage; 100 = unchanged.
    pub brightness: f32,
    /// CSS filter percentage; 100 = unchanged.
    pub contrast: f32,
    pub border_radius: f32,
}

impl Default for ImageProps {
    fn default() -> Self {
        Self {
            src: String::new(),
            alt: String::new(),
            opacity: 1.0,
            brightness: 100.0,
            contrast: 100.0,
            border_radius: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeProps {
    pub shape_type: ShapeType,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
}

impl Default for ShapeProps {
    fn default() -> Self {
        Self {
            shape_type: ShapeType::Rectangle,
            fill: Color::rgb(0x44, 0x72, 0xC4),
            stroke: Color::rgb(0x2F, 0x52, 0x8F),
            stroke_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
    Doughnut,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub label: String,
    pub color: Option<Color>,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    pub legend: bool,
    pub data_labels: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            legend: true,
            data_labels: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartProps {
    pub chart_type: ChartType,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartProps {
    /// Three-category sample data shown when a chart is first inserted.
    pub fn sample(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            data: ChartData {
                labels: vec!["Q1".into(), "Q2".into(), "Q3".into()],
                datasets: vec![Dataset {
                    label: "Series 1".into(),
                    color: Some(Color::rgb(0x44, 0x72, 0xC4)),
                    data: vec![12.0, 19.0, 7.0],
                }],
            },
            options: ChartOptions::default(),
        }
    }
}

/// Video / audio payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaProps {
    pub src: String,
    pub autoplay: bool,
    pub controls: bool,
    #[serde(rename = "loop")]
    pub looped: bool,
}

impl Default for MediaProps {
    fn default() -> Self {
        Self {
            src: String::new(),
            autoplay: false,
            controls: true,
            looped: false,
        }
    }
}

// ─── Elements ────────────────────────────────────────────────────────────

/// Variant payload of an element, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Textbox {
        #[serde(default)]
        content: RichText,
    },
    Image(ImageProps),
    Shape(ShapeProps),
    Chart(ChartProps),
    Table(TableData),
    Icon {
        #[serde(default)]
        content: String,
    },
    Equation {
        #[serde(default)]
        content: String,
    },
    Video(MediaProps),
    Audio(MediaProps),
}

impl ElementKind {
    /// The `type` tag, also used as the id prefix for fresh elements.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Textbox { .. } => "textbox",
            ElementKind::Image(_) => "image",
            ElementKind::Shape(_) => "shape",
            ElementKind::Chart(_) => "chart",
            ElementKind::Table(_) => "table",
            ElementKind::Icon { .. } => "icon",
            ElementKind::Equation { .. } => "equation",
            ElementKind::Video(_) => "video",
            ElementKind::Audio(_) => "audio",
        }
    }

    /// Size used when the element is inserted without explicit dimensions.
    pub fn default_size(&self) -> (f32, f32) {
        match self {
            ElementKind::Textbox { .. } => (300.0, 60.0),
            ElementKind::Image(_) => (300.0, 200.0),
            ElementKind::Shape(props) => match props.shape_type {
                ShapeType::Line => (200.0, 20.0),
                ShapeType::Circle | ShapeType::Star | ShapeType::Heart => (120.0, 120.0),
                _ => (150.0, 100.0),
            },
            ElementKind::Chart(_) => (400.0, 300.0),
            ElementKind::Table(table) => (120.0 * table.cols() as f32, 40.0 * table.rows() as f32),
            ElementKind::Icon { .. } => (60.0, 60.0),
            ElementKind::Equation { .. } => (240.0, 60.0),
            ElementKind::Video(_) => (480.0, 270.0),
            ElementKind::Audio(_) => (300.0, 54.0),
        }
    }
}

/// A single positioned object on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f32,
    /// Locked elements ignore drag and resize gestures.
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create an element at `(x, y)` with the kind's default size and a
    /// fresh id.
    pub fn new(kind: ElementKind, x: f32, y: f32) -> Self {
        let (width, height) = kind.default_size();
        Self {
            id: ElementId::with_prefix(kind.type_name()),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            locked: false,
            font_size: None,
            font_family: None,
            color: None,
            background_color: None,
            kind,
        }
    }

    pub fn textbox(text: &str, x: f32, y: f32) -> Self {
        let mut el = Self::new(
            ElementKind::Textbox {
                content: RichText::from_plain(text),
            },
            x,
            y,
        );
        el.font_size = Some(18.0);
        el
    }

    pub fn shape(shape_type: ShapeType, x: f32, y: f32) -> Self {
        Self::new(
            ElementKind::Shape(ShapeProps {
                shape_type,
                ..ShapeProps::default()
            }),
            x,
            y,
        )
    }

    pub fn image(src: impl Into<String>, x: f32, y: f32) -> Self {
        Self::new(
            ElementKind::Image(ImageProps {
                src: src.into(),
                ..ImageProps::default()
            }),
            x,
            y,
        )
    }

    pub fn table(rows: usize, cols: usize, x: f32, y: f32) -> Self {
        Self::new(ElementKind::Table(TableData::new(rows, cols)), x, y)
    }

    pub fn chart(chart_type: ChartType, x: f32, y: f32) -> Self {
        Self::new(ElementKind::Chart(ChartProps::sample(chart_type)), x, y)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_bounds(&mut self, b: Bounds) {
        self.x = b.x;
        self.y = b.y;
        self.width = b.width;
        self.height = b.height;
    }

    /// Clone with a fresh id (duplicate / paste).
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = ElementId::with_prefix(self.kind.type_name());
        copy
    }
}

// ─── Animations & Transitions ────────────────────────────────────────────

/// What an entrance animation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationTarget {
    Title,
    Content,
    Element(ElementId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationEffect {
    #[default]
    FadeIn,
    FlyIn,
    ZoomIn,
    SlideUp,
    Bounce,
    Spin,
}

/// An entrance animation revealed during presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub target: AnimationTarget,
    #[serde(rename = "type")]
    pub effect: AnimationEffect,
    /// Seconds.
    pub duration: f32,
    /// Seconds.
    #[serde(default)]
    pub delay: f32,
    pub order: u32,
}

/// Slide-to-slide transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    #[default]
    None,
    Fade,
    Push,
    Wipe,
    Zoom,
    Flip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: CommentId::next(),
            text: text.into(),
            author: author.into(),
            timestamp: Utc::now(),
        }
    }
}

// ─── Slides ──────────────────────────────────────────────────────────────

/// Layout metadata. When present, `kind` takes precedence over `Slide::layout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutMeta {
    #[serde(rename = "type")]
    pub kind: LayoutKind,
}

/// Z-order moves for an element within its slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    Forward,
    Backward,
    Front,
    Back,
}

/// One slide of the presentation.
///
/// Text fields of every layout are always stored; the layout only decides
/// which of them are surfaced (see `crate::layout`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Slide {
    pub id: SlideId,
    pub title: String,
    pub content: RichText,
    pub left_content: RichText,
    pub right_content: RichText,
    pub comp_left_title: String,
    pub comp_left_content: RichText,
    pub comp_right_title: String,
    pub comp_right_content: RichText,
    /// Picture shown by the `image-text` layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    pub layout: LayoutKind,
    /// Absent in older decks; `layout` alone then decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_meta: Option<LayoutMeta>,
    pub elements: Vec<Element>,
    pub animations: SmallVec<[Animation; 2]>,
    pub transition: Transition,
    /// Seconds.
    pub transition_duration: f32,
    pub notes: String,
    pub comments: Vec<Comment>,
}

impl Default for Slide {
    fn default() -> Self {
        Self::new(LayoutKind::TitleContent)
    }
}

impl Slide {
    /// A fresh, empty slide with the given layout.
    pub fn new(layout: LayoutKind) -> Self {
        Self {
            id: SlideId::next(),
            title: String::new(),
            content: RichText::default(),
            left_content: RichText::default(),
            right_content: RichText::default(),
            comp_left_title: String::new(),
            comp_left_content: RichText::default(),
            comp_right_title: String::new(),
            comp_right_content: RichText::default(),
            image_src: None,
            background: None,
            text_color: None,
            layout,
            layout_meta: Some(LayoutMeta { kind: layout }),
            elements: Vec::new(),
            animations: SmallVec::new(),
            transition: Transition::None,
            transition_duration: 0.5,
            notes: String::new(),
            comments: Vec::new(),
        }
    }

    /// The layout actually in force: `layout_meta.type` wins over `layout`.
    pub fn effective_layout(&self) -> LayoutKind {
        self.layout_meta.map(|m| m.kind).unwrap_or(self.layout)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn element_index(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Append an element on top of the z-order. Returns `false` (and leaves
    /// the slide untouched) if an element with the same id already exists.
    pub fn add_element(&mut self, element: Element) -> bool {
        if self.element_index(element.id).is_some() {
            return false;
        }
        self.elements.push(element);
        true
    }

    /// Give every element whose id repeats an earlier one on the slide a
    /// fresh id. Returns how many were renamed.
    pub fn dedup_element_ids(&mut self) -> usize {
        let mut seen = HashSet::with_capacity(self.elements.len());
        let mut renamed = 0;
        for el in &mut self.elements {
            if !seen.insert(el.id) {
                let fresh = ElementId::with_prefix(el.kind.type_name());
                log::warn!("duplicate element id {} on slide {}, renamed to {fresh}", el.id, self.id);
                el.id = fresh;
                seen.insert(fresh);
                renamed += 1;
            }
        }
        renamed
    }

    /// Remove exactly the element with `id`, if any. Animations targeting
    /// it are dropped as well.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let idx = self.element_index(id)?;
        self.animations
            .retain(|a| a.target != AnimationTarget::Element(id));
        Some(self.elements.remove(idx))
    }

    /// Move an element within the z-order. Returns `true` if it moved.
    pub fn reorder_element(&mut self, id: ElementId, order: ZOrder) -> bool {
        let Some(idx) = self.element_index(id) else {
            return false;
        };
        let last = self.elements.len() - 1;
        let target = match order {
            ZOrder::Forward if idx < last => idx + 1,
            ZOrder::Backward if idx > 0 => idx - 1,
            ZOrder::Front if idx < last => last,
            ZOrder::Back if idx > 0 => 0,
            _ => return false,
        };
        let el = self.elements.remove(idx);
        self.elements.insert(target, el);
        true
    }

    /// Deep copy with a new slide id and fresh element ids. Animation
    /// targets are remapped to the new ids.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = SlideId::next();
        copy.comments.clear();
        for el in &mut copy.elements {
            let old = el.id;
            el.id = ElementId::with_prefix(el.kind.type_name());
            for anim in copy.animations.iter_mut() {
                if anim.target == AnimationTarget::Element(old) {
                    anim.target = AnimationTarget::Element(el.id);
                }
            }
        }
        copy
    }

    /// Animations in playback order. Ties keep their insertion order.
    pub fn animation_sequence(&self) -> Vec<&Animation> {
        let mut seq: Vec<&Animation> = self.animations.iter().collect();
        seq.sort_by_key(|a| a.order);
        seq
    }
}

// ─── Presentation metadata ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderFooter {
    pub enabled: bool,
    pub text: String,
    pub show_slide_number: bool,
    pub show_date: bool,
}

/// Canvas dimensions of every slide.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SlideSize {
    #[default]
    Widescreen,
    Standard,
    Custom {
        width: f32,
        height: f32,
    },
}

impl SlideSize {
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            SlideSize::Widescreen => (960.0, 540.0),
            SlideSize::Standard => (960.0, 720.0),
            SlideSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Presentation-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresentationMeta {
    pub title: String,
    pub author: String,
    pub header: HeaderFooter,
    pub footer: HeaderFooter,
    pub theme_preset: String,
    pub slide_size: SlideSize,
    pub updated_at: DateTime<Utc>,
}

impl Default for PresentationMeta {
    fn default() -> Self {
        Self {
            title: "Untitled Presentation".into(),
            author: String::new(),
            header: HeaderFooter::default(),
            footer: HeaderFooter::default(),
            theme_preset: "default".into(),
            slide_size: SlideSize::Widescreen,
            updated_at: Utc::now(),
        }
    }
}

impl PresentationMeta {
    /// Bump `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#4472C4").unwrap();
        assert_eq!(c, Color::rgb(0x44, 0x72, 0xC4));
        assert_eq!(c.to_hex(), "#4472C4");

        let short = Color::from_hex("f0a").unwrap();
        assert_eq!(short.to_hex(), "#FF00AA");

        let alpha = Color::from_hex("#00000080").unwrap();
        assert_eq!(alpha.a, 0x80);
        assert_eq!(alpha.to_hex(), "#00000080");

        assert_eq!(Color::from_hex("white"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
    }

    #[test]
    fn element_serializes_with_type_tag() {
        let el = Element::shape(ShapeType::Star, 10.0, 20.0);
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "shape");
        assert_eq!(json["shapeType"], "star");
        assert_eq!(json["x"], 10.0);

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn element_deserializes_media_loop_flag() {
        let json = r#"{"id":"video_x","x":0,"y":0,"width":10,"height":10,
                       "type":"video","src":"clip.mp4","loop":true}"#;
        let el: Element = serde_json::from_str(json).unwrap();
        match el.kind {
            ElementKind::Video(media) => {
                assert!(media.looped);
                assert!(media.controls);
            }
            other => panic!("expected video, got {other:?}"),
        }
    }

    #[test]
    fn remove_element_removes_only_target() {
        let mut slide = Slide::new(LayoutKind::Blank);
        let a = Element::shape(ShapeType::Circle, 0.0, 0.0);
        let b = Element::textbox("hello", 10.0, 10.0);
        let (a_id, b_id) = (a.id, b.id);
        slide.add_element(a);
        slide.add_element(b.clone());
        slide.animations.push(Animation {
            target: AnimationTarget::Element(a_id),
            effect: AnimationEffect::FadeIn,
            duration: 0.5,
            delay: 0.0,
            order: 0,
        });

        let removed = slide.remove_element(a_id).unwrap();
        assert_eq!(removed.id, a_id);
        assert_eq!(slide.elements, vec![b]);
        assert!(slide.animations.is_empty());
        assert!(slide.element(b_id).is_some());
        assert!(slide.remove_element(a_id).is_none());
    }

    #[test]
    fn add_element_rejects_duplicate_id() {
        let mut slide = Slide::new(LayoutKind::Blank);
        let el = Element::shape(ShapeType::Oval, 0.0, 0.0);
        assert!(slide.add_element(el.clone()));
        assert!(!slide.add_element(el));
        assert_eq!(slide.elements.len(), 1);
    }

    #[test]
    fn dedup_renames_repeated_ids() {
        let mut slide = Slide::new(LayoutKind::Blank);
        let el = Element::shape(ShapeType::Oval, 0.0, 0.0);
        slide.elements = vec![el.clone(), el.clone(), el.clone()];
        assert_eq!(slide.dedup_element_ids(), 2);
        assert_eq!(slide.elements[0].id, el.id);
        assert_ne!(slide.elements[1].id, el.id);
        assert_ne!(slide.elements[1].id, slide.elements[2].id);
        assert!(slide.elements[2].id.as_str().starts_with("shape_"));
        assert_eq!(slide.dedup_element_ids(), 0);
    }

    #[test]
    fn reorder_element_z_order() {
        let mut slide = Slide::new(LayoutKind::Blank);
        let ids: Vec<ElementId> = (0..3)
            .map(|i| {
                let el = Element::shape(ShapeType::Rectangle, i as f32, 0.0);
                let id = el.id;
                slide.add_element(el);
                id
            })
            .collect();

        assert!(slide.reorder_element(ids[0], ZOrder::Front));
        let order: Vec<ElementId> = slide.elements.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![ids[1], ids[2], ids[0]]);

        assert!(!slide.reorder_element(ids[0], ZOrder::Forward));
        assert!(slide.reorder_element(ids[0], ZOrder::Backward));
        assert!(slide.reorder_element(ids[2], ZOrder::Back));
        let order: Vec<ElementId> = slide.elements.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn effective_layout_prefers_meta() {
        let mut slide = Slide::new(LayoutKind::TitleContent);
        slide.layout_meta = Some(LayoutMeta {
            kind: LayoutKind::Comparison,
        });
        assert_eq!(slide.effective_layout(), LayoutKind::Comparison);
        slide.layout_meta = None;
        assert_eq!(slide.effective_layout(), LayoutKind::TitleContent);
    }

    #[test]
    fn duplicate_slide_remaps_animation_targets() {
        let mut slide = Slide::new(LayoutKind::Blank);
        let el = Element::shape(ShapeType::Heart, 0.0, 0.0);
        let old_id = el.id;
        slide.add_element(el);
        slide.animations.push(Animation {
            target: AnimationTarget::Element(old_id),
            effect: AnimationEffect::Bounce,
            duration: 1.0,
            delay: 0.0,
            order: 1,
        });

        let copy = slide.duplicate();
        assert_ne!(copy.id, slide.id);
        let new_id = copy.elements[0].id;
        assert_ne!(new_id, old_id);
        assert_eq!(copy.animations[0].target, AnimationTarget::Element(new_id));
    }

    #[test]
    fn animation_sequence_is_stable() {
        let mut slide = Slide::new(LayoutKind::TitleContent);
        for (target, order) in [
            (AnimationTarget::Content, 2),
            (AnimationTarget::Title, 1),
            (AnimationTarget::Content, 1),
        ] {
            slide.animations.push(Animation {
                target,
                effect: AnimationEffect::FadeIn,
                duration: 0.3,
                delay: 0.0,
                order,
            });
        }
        let seq: Vec<(AnimationTarget, u32)> = slide
            .animation_sequence()
            .into_iter()
            .map(|a| (a.target, a.order))
            .collect();
        assert_eq!(
            seq,
            vec![
                (AnimationTarget::Title, 1),
                (AnimationTarget::Content, 1),
                (AnimationTarget::Content, 2),
            ]
        );
    }

    #[test]
    fn slide_roundtrips_through_json() {
        let mut slide = Slide::new(LayoutKind::TwoColumn);
        slide.title = "Agenda".into();
        slide.left_content = RichText::from_plain("left");
        slide.background = Some(Background::Solid {
            color: Color::rgb(250, 250, 250),
        });
        slide.add_element(Element::chart(ChartType::Pie, 100.0, 100.0));
        slide.add_element(Element::table(3, 2, 10.0, 10.0));
        slide.comments.push(Comment::new("check numbers", "ana"));

        let json = serde_json::to_string(&slide).unwrap();
        let back: Slide = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slide);
    }

    #[test]
    fn partial_slide_json_fills_defaults() {
        let back: Slide = serde_json::from_str(r#"{"id": 42, "title": "Hi"}"#).unwrap();
        assert_eq!(back.id, SlideId(42));
        assert_eq!(back.title, "Hi");
        assert_eq!(back.layout, LayoutKind::TitleContent);
        assert!(back.elements.is_empty());
    }
}
