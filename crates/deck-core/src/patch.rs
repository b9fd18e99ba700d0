//! Partial updates merged into slides and elements.
//!
//! Every field is optional; `None` leaves the target untouched. Fields that
//! are themselves optional on the target use `Option<Option<_>>` so a patch
//! can clear them; in JSON an explicit `null` clears and an absent key
//! leaves the target alone.

use crate::geometry::Bounds;
use crate::layout::LayoutKind;
use crate::model::*;
use crate::richtext::RichText;
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

/// A present key (even `null`) becomes `Some`; absent keys fall back to the
/// container default.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlidePatch {
    pub title: Option<String>,
    pub content: Option<RichText>,
    pub left_content: Option<RichText>,
    pub right_content: Option<RichText>,
    pub comp_left_title: Option<String>,
    pub comp_left_content: Option<RichText>,
    pub comp_right_title: Option<String>,
    pub comp_right_content: Option<RichText>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub image_src: Option<Option<String>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub background: Option<Option<Background>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Option<Color>>,
    pub layout: Option<LayoutKind>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub layout_meta: Option<Option<LayoutMeta>>,
    pub elements: Option<Vec<Element>>,
    pub animations: Option<SmallVec<[Animation; 2]>>,
    pub transition: Option<Transition>,
    pub transition_duration: Option<f32>,
    pub notes: Option<String>,
    pub comments: Option<Vec<Comment>>,
}

impl SlidePatch {
    /// Patch switching the layout (both `layout` and `layoutMeta.type`).
    pub fn layout(kind: LayoutKind) -> Self {
        Self {
            layout: Some(kind),
            layout_meta: Some(Some(LayoutMeta { kind })),
            ..Self::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn content(content: RichText) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge every set field into `slide`. The slide id is never patched.
    pub fn merge_into(self, slide: &mut Slide) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = self.$field { slide.$field = v; })*
            };
        }
        merge!(
            title,
            content,
            left_content,
            right_content,
            comp_left_title,
            comp_left_content,
            comp_right_title,
            comp_right_content,
            image_src,
            background,
            text_color,
            layout,
            layout_meta,
            elements,
            animations,
            transition,
            transition_duration,
            notes,
            comments,
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub locked: Option<bool>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Option<f32>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub font_family: Option<Option<String>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub color: Option<Option<Color>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Option<Color>>,
    /// Replaces the variant payload. Ignored when the variant differs from
    /// the element's current one.
    pub kind: Option<ElementKind>,
}

impl ElementPatch {
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn bounds(b: Bounds) -> Self {
        Self {
            x: Some(b.x),
            y: Some(b.y),
            width: Some(b.width),
            height: Some(b.height),
            ..Self::default()
        }
    }

    pub fn kind(kind: ElementKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Merge into `element`. Returns `false` if the payload variant did not
    /// match (the rest of the patch is still applied).
    pub fn merge_into(self, element: &mut Element) -> bool {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = self.$field { element.$field = v; })*
            };
        }
        merge!(
            x,
            y,
            width,
            height,
            rotation,
            locked,
            font_size,
            font_family,
            color,
            background_color,
        );
        match self.kind {
            Some(kind) if kind.type_name() == element.kind.type_name() => {
                element.kind = kind;
                true
            }
            Some(kind) => {
                log::debug!(
                    "ignoring {} payload for {} element {}",
                    kind.type_name(),
                    element.kind.type_name(),
                    element.id
                );
                false
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slide_patch_merges_only_set_fields() {
        let mut slide = Slide::new(LayoutKind::TitleContent);
        slide.title = "Keep".into();
        slide.notes = "old".into();
        let id = slide.id;

        SlidePatch {
            notes: Some("new".into()),
            text_color: Some(Some(Color::WHITE)),
            ..SlidePatch::default()
        }
        .merge_into(&mut slide);

        assert_eq!(slide.id, id);
        assert_eq!(slide.title, "Keep");
        assert_eq!(slide.notes, "new");
        assert_eq!(slide.text_color, Some(Color::WHITE));

        SlidePatch {
            text_color: Some(None),
            ..SlidePatch::default()
        }
        .merge_into(&mut slide);
        assert_eq!(slide.text_color, None);
    }

    #[test]
    fn layout_patch_sets_meta() {
        let mut slide = Slide::new(LayoutKind::TitleContent);
        SlidePatch::layout(LayoutKind::TwoColumn).merge_into(&mut slide);
        assert_eq!(slide.layout, LayoutKind::TwoColumn);
        assert_eq!(slide.effective_layout(), LayoutKind::TwoColumn);
    }

    #[test]
    fn element_patch_rejects_foreign_payload() {
        let mut el = Element::shape(ShapeType::Star, 0.0, 0.0);
        let ok = ElementPatch {
            x: Some(40.0),
            kind: Some(ElementKind::Icon {
                content: "★".into(),
            }),
            ..ElementPatch::default()
        }
        .merge_into(&mut el);
        assert!(!ok);
        assert_eq!(el.x, 40.0);
        assert!(matches!(el.kind, ElementKind::Shape(_)));
    }

    #[test]
    fn element_patch_replaces_same_payload() {
        let mut el = Element::shape(ShapeType::Star, 0.0, 0.0);
        let ok = ElementPatch::kind(ElementKind::Shape(ShapeProps {
            shape_type: ShapeType::Hexagon,
            ..ShapeProps::default()
        }))
        .merge_into(&mut el);
        assert!(ok);
        match &el.kind {
            ElementKind::Shape(props) => assert_eq!(props.shape_type, ShapeType::Hexagon),
            other => panic!("expected shape, got {other:?}"),
        }
    }

    #[test]
    fn patch_from_json_with_null_clears() {
        let patch: SlidePatch =
            serde_json::from_str(r#"{"title":"T","layout":"comparison"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("T"));
        assert_eq!(patch.layout, Some(LayoutKind::Comparison));
        assert!(patch.background.is_none());
        assert!(!patch.is_empty());

        let clear: SlidePatch =
            serde_json::from_str(r#"{"background":null,"textColor":null}"#).unwrap();
        assert_eq!(clear.background, Some(None));
        assert_eq!(clear.text_color, Some(None));
        assert_eq!(clear.image_src, None);

        let mut slide = Slide::new(LayoutKind::TitleContent);
        slide.background = Some(Background::Solid {
            color: Color::rgb(255, 0, 0),
        });
        slide.image_src = Some("data:image/png;base64,AAAA".into());
        clear.merge_into(&mut slide);
        assert_eq!(slide.background, None);
        assert!(slide.image_src.is_some(), "absent keys are untouched");
    }

    #[test]
    fn element_patch_null_clears_styling() {
        let patch: ElementPatch =
            serde_json::from_str(r##"{"fontSize":null,"color":"#112233"}"##).unwrap();
        assert_eq!(patch.font_size, Some(None));
        assert_eq!(patch.color, Some(Some(Color::rgb(0x11, 0x22, 0x33))));
        assert_eq!(patch.background_color, None);

        let mut el = Element::textbox("hi", 0.0, 0.0);
        el.font_size = Some(32.0);
        patch.merge_into(&mut el);
        assert_eq!(el.font_size, None);
        assert_eq!(el.color, Some(Color::rgb(0x11, 0x22, 0x33)));
    }
}
