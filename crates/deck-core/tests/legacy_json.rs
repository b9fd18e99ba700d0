//! Integration tests: loading decks saved by older editor builds.
//!
//! Older decks store slide text as raw markup, omit `layoutMeta`, keep
//! table styling in parallel per-cell grids, and may carry ragged or
//! overlapping table data. They must load into a valid
//! model and save back without further loss.

use deck_core::table::{BorderStyle, CellBorder};
use deck_core::{
    AnimationTarget, Background, CellRange, Color, ElementId, ElementKind, LayoutKind, RunStyle, Slide, SlideField,
    Transition,
};
use pretty_assertions::assert_eq;

fn legacy_deck() -> Vec<Slide> {
    let json = include_str!("fixtures/legacy_deck.json");
    serde_json::from_str(json).expect("legacy deck should deserialize")
}

fn element_kind<'a>(slide: &'a Slide, id: &str) -> &'a ElementKind {
    &slide
        .element(ElementId::intern(id))
        .unwrap_or_else(|| panic!("element {id} should be present"))
        .kind
}

// ─── Slide text ──────────────────────────────────────────────────────────

#[test]
fn markup_content_becomes_rich_text() {
    let slides = legacy_deck();
    assert_eq!(slides.len(), 2);

    let content = &slides[0].content;
    assert_eq!(content.plain(), "Revenue up 12%\nCosts & overhead down");
    assert_eq!(content.runs[0].text, "Revenue");
    assert!(content.runs[0].style.bold, "<b> should produce a bold run");
    assert_eq!(content.runs[1].style, RunStyle::default());
}

#[test]
fn textbox_markup_is_parsed() {
    let slides = legacy_deck();
    match element_kind(&slides[0], "textbox_901") {
        ElementKind::Textbox { content } => {
            assert_eq!(content.plain(), "Call us today");
            assert!(content.runs.iter().any(|r| r.text == "us" && r.style.italic));
        }
        other => panic!("expected textbox, got {other:?}"),
    }
}

// ─── Layouts ─────────────────────────────────────────────────────────────

#[test]
fn missing_layout_meta_falls_back_to_layout() {
    let slides = legacy_deck();
    assert_eq!(slides[0].effective_layout(), LayoutKind::TitleContent);
    assert_eq!(slides[1].layout_meta, None, "absent layoutMeta must stay absent");
    assert_eq!(slides[1].effective_layout(), LayoutKind::Comparison);

    let left = slides[1].field_text(SlideField::CompLeftContent);
    assert_eq!(left.plain(), "Manual");
    assert!(
        slides[1].active_fields().contains(&SlideField::CompRightTitle),
        "comparison slides surface both column titles"
    );
}

// ─── Elements ────────────────────────────────────────────────────────────

#[test]
fn ragged_table_is_normalized() {
    let slides = legacy_deck();
    let ElementKind::Table(table) = element_kind(&slides[0], "table_902") else {
        panic!("table_902 should be a table");
    };
    assert_eq!((table.rows(), table.cols()), (3, 3));
    assert_eq!(table.data[1], vec!["North", "10", ""]);
    assert_eq!(table.styles.len(), 3);
    assert_eq!(table.merged.len(), 1, "overlapping region should be dropped");
    assert_eq!(table.display_text(1, 1), Some("10 / 11"));
    assert_eq!(table.display_text(1, 2), None, "covered cells show nothing");
}

#[test]
fn table_overlay_grids_and_merged_cells() {
    let slides = legacy_deck();
    let ElementKind::Table(table) = element_kind(&slides[0], "table_904") else {
        panic!("table_904 should be a table");
    };
    let accent = Color::rgb(0x44, 0x72, 0xC4);
    assert_eq!(table.styles[0][1].background, Some(accent));
    assert_eq!(table.styles[0][0].text_color, Some(Color::WHITE));
    assert_eq!(table.styles[1][1].background, None, "empty color strings are skipped");
    assert_eq!(
        table.styles[1][1].border,
        Some(CellBorder {
            width: 2.0,
            color: Color::rgb(0xFF, 0, 0),
            style: BorderStyle::Dashed,
        })
    );
    assert_eq!(table.styles[1][0].border, None);

    assert_eq!(table.merged.len(), 1);
    assert_eq!(table.merged[0].range, CellRange::new(2, 0, 1, 2));
    assert_eq!(table.display_text(2, 0), Some("Total 900"));
    assert_eq!(table.display_text(2, 1), None);
    // The covered cell's overlay is kept but the anchor's style wins.
    assert_eq!(table.styles[2][1].background, Some(Color::rgb(0xFF, 0xF2, 0xCC)));
    assert_eq!(table.effective_style(2, 1).background, None);
}

#[test]
fn shape_and_media_fields() {
    let slides = legacy_deck();
    match element_kind(&slides[0], "shape_900") {
        ElementKind::Shape(props) => {
            assert_eq!(props.fill, Color::rgb(0xFF, 0xC0, 0x00));
            assert_eq!(props.stroke_width, 2.0);
        }
        other => panic!("expected shape, got {other:?}"),
    }
    match element_kind(&slides[0], "video_903") {
        ElementKind::Video(media) => {
            assert!(media.autoplay);
            assert!(media.looped, "`loop` key maps to `looped`");
            assert!(media.controls, "controls default on when omitted");
        }
        other => panic!("expected video, got {other:?}"),
    }
}

// ─── Slide settings ──────────────────────────────────────────────────────

#[test]
fn animations_play_in_order() {
    let slides = legacy_deck();
    let targets: Vec<AnimationTarget> = slides[0].animation_sequence().iter().map(|a| a.target).collect();
    assert_eq!(
        targets,
        vec![
            AnimationTarget::Title,
            AnimationTarget::Element(ElementId::intern("shape_900")),
        ]
    );
}

#[test]
fn background_transition_and_comments() {
    let slides = legacy_deck();
    assert_eq!(
        slides[0].background,
        Some(Background::Solid {
            color: Color::rgb(0xFF, 0xFF, 0xFF)
        })
    );
    assert_eq!(slides[0].transition, Transition::Fade);
    assert_eq!(slides[0].transition_duration, 0.8);

    assert_eq!(slides[1].comments.len(), 1);
    assert_eq!(slides[1].comments[0].author, "kim");
    assert!(slides[1].elements.is_empty());
    assert_eq!(slides[1].transition, Transition::None);
}

// ─── Round trip ──────────────────────────────────────────────────────────

#[test]
fn normalized_deck_saves_without_loss() {
    let slides = legacy_deck();
    let json = serde_json::to_string(&slides).expect("serialize");
    let back: Vec<Slide> = serde_json::from_str(&json).expect("reload");
    assert_eq!(back, slides);
}
