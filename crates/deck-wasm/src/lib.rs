//! WASM bridge for Deck: exposes the document store to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the DOM,
//! rendering, and event listeners; it forwards normalized input here and
//! re-reads the deck as JSON whenever a call reports a change.

mod storage;

pub use storage::LocalStorage;

use deck_core::{
    CellRange, ChartType, Element, ElementId, ElementKind, ElementPatch, LayoutKind, MediaProps, PresentationMeta,
    ResizeHandle, RichText, ShapeType, Slide, SlideField, SlidePatch, TableData, ZOrder,
};
use deck_editor::{
    DocumentStore, EditorConfig, FileDescriptor, InputEvent, MemoryStorage, Modifiers, Storage, ToolKind,
};
use serde_json::json;
use wasm_bindgen::prelude::*;

/// The main WASM-facing editor controller.
///
/// Wraps the document store; all interaction from the page goes through
/// this struct.
#[wasm_bindgen]
pub struct DeckEditor {
    store: DocumentStore,
}

#[wasm_bindgen]
impl DeckEditor {
    /// Open the deck saved in `localStorage`. `config_json` may be empty or
    /// a partial `EditorConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Self {
        console_setup();

        let config = parse_config(config_json);
        let storage: Box<dyn Storage> = match LocalStorage::open() {
            Some(local) => Box::new(local),
            None => {
                log::warn!("localStorage unavailable; edits will not survive a reload");
                Box::new(MemoryStorage::new())
            }
        };
        Self {
            store: DocumentStore::open(config, storage),
        }
    }

    // ─── Reading state ───────────────────────────────────────────────────

    /// The whole slide list as JSON.
    pub fn slides_json(&self) -> String {
        serde_json::to_string(self.store.slides()).unwrap_or_else(|_| "[]".to_string())
    }

    /// One slide as JSON, or `null`.
    pub fn slide_json(&self, index: usize) -> String {
        self.store
            .slide(index)
            .and_then(|s| serde_json::to_string(s).ok())
            .unwrap_or_else(|| "null".to_string())
    }

    pub fn meta_json(&self) -> String {
        serde_json::to_string(self.store.meta()).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn slide_count(&self) -> usize {
        self.store.slides().len()
    }

    pub fn current_slide(&self) -> usize {
        self.store.current_slide()
    }

    /// Selected element id, or empty string if none.
    pub fn selected_id(&self) -> String {
        self.store
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Select an element of the current slide; empty string clears.
    pub fn select_by_id(&mut self, element_id: &str) -> bool {
        if element_id.is_empty() {
            self.store.set_selected(None);
            return true;
        }
        let Some(id) = ElementId::lookup(element_id) else {
            return false;
        };
        self.store.set_selected(Some(id));
        self.store.selected() == Some(id)
    }

    /// CSS cursor for the pointer hovering at `(x, y)`.
    pub fn cursor_at(&self, x: f32, y: f32) -> String {
        self.store.cursor_at(x, y).to_string()
    }

    /// Resize grips of the selected element as
    /// `[{"handle":"nw","x":..,"y":..}, ...]`; `[]` with no selection.
    pub fn handles_json(&self) -> String {
        let Some(el) = self.store.selected().and_then(|id| self.store.current().element(id)) else {
            return "[]".to_string();
        };
        let bounds = el.bounds();
        let grips: Vec<serde_json::Value> = ResizeHandle::ALL
            .iter()
            .map(|handle| {
                let (x, y) = handle.anchor(&bounds);
                json!({"handle": handle.name(), "x": x, "y": y})
            })
            .collect();
        serde_json::Value::from(grips).to_string()
    }

    pub fn get_tool_name(&self) -> String {
        tool_kind_to_name(self.store.active_tool()).to_string()
    }

    /// Message of the last failed save, or empty string.
    pub fn last_warning(&self) -> String {
        self.store.last_warning().unwrap_or_default().to_string()
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    // ─── Slides ──────────────────────────────────────────────────────────

    /// Append a slide; unknown layout names fall back to title-content.
    /// Returns the new slide id.
    pub fn add_slide(&mut self, layout: &str) -> f64 {
        let kind = LayoutKind::from_name(layout).unwrap_or(LayoutKind::TitleContent);
        self.store.add_slide(kind).0 as f64
    }

    pub fn delete_slide(&mut self, index: usize) -> bool {
        self.store.delete_slide(index)
    }

    pub fn duplicate_slide(&mut self, index: usize) -> bool {
        self.store.duplicate_slide(index).is_some()
    }

    pub fn move_slide(&mut self, from: usize, to: usize) -> bool {
        self.store.move_slide(from, to)
    }

    pub fn set_current_slide(&mut self, index: usize) -> bool {
        self.store.set_current_slide(index)
    }

    /// Replace the whole deck with a slide array (template load). Empty or
    /// malformed input is refused.
    pub fn replace_slides(&mut self, slides_json: &str) -> bool {
        match serde_json::from_str::<Vec<Slide>>(slides_json) {
            Ok(slides) => self.store.replace_slides(slides),
            Err(e) => {
                log::warn!("replace_slides: {e}");
                false
            }
        }
    }

    pub fn apply_layout(&mut self, layout: &str) -> bool {
        match LayoutKind::from_name(layout) {
            Some(kind) => self.store.apply_layout(kind),
            None => false,
        }
    }

    /// Merge a partial slide object (camelCase keys) into slide `index`.
    pub fn update_slide(&mut self, index: usize, patch_json: &str, skip_history: bool) -> bool {
        match serde_json::from_str::<SlidePatch>(patch_json) {
            Ok(patch) => self.store.update_slide(index, patch, skip_history),
            Err(e) => {
                log::warn!("update_slide: bad patch: {e}");
                false
            }
        }
    }

    /// Replace a field of the current slide with markup from a
    /// contentEditable region. Typing passes `skip_history = true`.
    pub fn set_field_html(&mut self, field: &str, html: &str, skip_history: bool) -> bool {
        match SlideField::from_name(field) {
            Some(f) => self
                .store
                .set_field_text(f, RichText::from_html(html), skip_history),
            None => false,
        }
    }

    /// Markup for a field of the current slide.
    pub fn field_html(&self, field: &str) -> String {
        SlideField::from_name(field)
            .map(|f| self.store.current().field_text(f).to_html())
            .unwrap_or_default()
    }

    /// Field names the current slide's layout shows, as a JSON array.
    pub fn active_fields_json(&self) -> String {
        let names: Vec<&str> = self
            .store
            .current()
            .active_fields()
            .iter()
            .map(|f| f.name())
            .collect();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn set_notes(&mut self, notes: &str) -> bool {
        self.store.set_notes(notes)
    }

    pub fn add_comment(&mut self, text: &str, author: &str) -> bool {
        self.store.add_comment(text, author).is_some()
    }

    // ─── Presentation metadata ───────────────────────────────────────────

    pub fn rename_presentation(&mut self, title: &str) {
        self.store.rename_presentation(title);
    }

    pub fn set_meta(&mut self, meta_json: &str) -> bool {
        match serde_json::from_str::<PresentationMeta>(meta_json) {
            Ok(meta) => {
                self.store.set_meta(meta);
                true
            }
            Err(e) => {
                log::warn!("set_meta: {e}");
                false
            }
        }
    }

    // ─── Undo / redo ─────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    // ─── Elements ────────────────────────────────────────────────────────

    /// Insert a default element of `kind` (`textbox`, `shape`, `table`,
    /// `chart`, `icon`, `equation`, `video`, `audio`). Returns its id, or empty
    /// string for an unknown kind.
    pub fn add_element(&mut self, kind: &str, x: f32, y: f32) -> String {
        new_element(kind, x, y)
            .and_then(|el| self.store.add_element(el))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn add_shape(&mut self, shape: &str, x: f32, y: f32) -> String {
        let Some(shape_type) = parse_name::<ShapeType>(shape) else {
            return String::new();
        };
        self.insert(Element::shape(shape_type, x, y))
    }

    pub fn add_chart(&mut self, chart: &str, x: f32, y: f32) -> String {
        let Some(chart_type) = parse_name::<ChartType>(chart) else {
            return String::new();
        };
        self.insert(Element::chart(chart_type, x, y))
    }

    /// Insert an image from a data URI or URL.
    pub fn add_image(&mut self, src: &str, x: f32, y: f32) -> String {
        self.insert(Element::image(src, x, y))
    }

    /// Merge a partial element object into element `id`.
    pub fn update_element(&mut self, id: &str, patch_json: &str, skip_history: bool) -> bool {
        match serde_json::from_str::<ElementPatch>(patch_json) {
            Ok(patch) => ElementId::lookup(id)
                .is_some_and(|id| self.store.update_element(id, patch, skip_history)),
            Err(e) => {
                log::warn!("update_element: bad patch: {e}");
                false
            }
        }
    }

    pub fn remove_element(&mut self, id: &str) -> bool {
        ElementId::lookup(id).is_some_and(|id| self.store.remove_element(id))
    }

    /// `forward`, `backward`, `front`, or `back`.
    pub fn reorder_element(&mut self, id: &str, order: &str) -> bool {
        match zorder_from_name(order) {
            Some(order) => ElementId::lookup(id).is_some_and(|id| self.store.reorder_element(id, order)),
            None => false,
        }
    }

    pub fn copy_element(&mut self, id: &str) -> bool {
        ElementId::lookup(id).is_some_and(|id| self.store.copy_element(id))
    }

    pub fn cut_element(&mut self, id: &str) -> bool {
        ElementId::lookup(id).is_some_and(|id| self.store.cut_element(id))
    }

    pub fn paste_element(&mut self) -> String {
        self.store
            .paste_element()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn duplicate_element(&mut self, id: &str) -> String {
        ElementId::lookup(id)
            .and_then(|id| self.store.duplicate_element(id))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    // ─── Tables ──────────────────────────────────────────────────────────

    pub fn set_table_cell(&mut self, id: &str, row: usize, col: usize, text: &str) -> bool {
        self.edit_table(id, |t| t.set_cell(row, col, text))
    }

    pub fn merge_cells(&mut self, id: &str, row: usize, col: usize, rows: usize, cols: usize) -> bool {
        self.edit_table(id, |t| t.merge(CellRange::new(row, col, rows, cols)))
    }

    pub fn unmerge_cells(&mut self, id: &str, row: usize, col: usize) -> bool {
        self.edit_table(id, |t| t.unmerge(row, col))
    }

    pub fn insert_table_row(&mut self, id: &str, at: usize) -> bool {
        self.edit_table(id, |t| {
            t.insert_row(at);
            true
        })
    }

    pub fn insert_table_column(&mut self, id: &str, at: usize) -> bool {
        self.edit_table(id, |t| {
            t.insert_column(at);
            true
        })
    }

    pub fn delete_table_row(&mut self, id: &str, at: usize) -> bool {
        self.edit_table(id, |t| t.delete_row(at))
    }

    pub fn delete_table_column(&mut self, id: &str, at: usize) -> bool {
        self.edit_table(id, |t| t.delete_column(at))
    }

    // ─── Crop ────────────────────────────────────────────────────────────

    pub fn begin_crop(&mut self, id: &str) -> bool {
        ElementId::lookup(id).is_some_and(|id| self.store.begin_crop(id))
    }

    pub fn cancel_crop(&mut self) {
        self.store.cancel_crop();
    }

    /// Crop rectangle in element space as `{x,y,width,height}`, or `null`.
    pub fn crop_rect_json(&self) -> String {
        match self.store.crop_rect() {
            Some(r) => json!({"x": r.x, "y": r.y, "width": r.width, "height": r.height}).to_string(),
            None => "null".to_string(),
        }
    }

    /// Returns JSON: `{"ok":true,"changed":bool}` or `{"ok":false,"error":"..."}`.
    pub fn commit_crop(&mut self) -> String {
        match self.store.commit_crop() {
            Ok(changed) => json!({"ok": true, "changed": changed}).to_string(),
            Err(e) => {
                log::warn!("crop failed: {e}");
                json!({"ok": false, "error": e.to_string()}).to_string()
            }
        }
    }

    // ─── Import ──────────────────────────────────────────────────────────

    /// Import a picked or dropped file. Returns JSON:
    /// `{"ok":true,"count":n}` or `{"ok":false,"error":"..."}`.
    pub fn import_file(&mut self, name: &str, bytes: &[u8]) -> String {
        let file = FileDescriptor::new(name, bytes);
        match self.store.import(&file) {
            Ok(count) => json!({"ok": true, "count": count}).to_string(),
            Err(e) => json!({"ok": false, "error": e.to_string()}).to_string(),
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Handle pointer down on the slide canvas. Returns true if a re-render
    /// is needed.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        self.store
            .handle_input(InputEvent::PointerDown { x, y, modifiers })
    }

    /// Handle pointer move anywhere in the document.
    pub fn handle_pointer_move(&mut self, x: f32, y: f32, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        self.store
            .handle_input(InputEvent::PointerMove { x, y, modifiers })
    }

    /// Handle pointer up anywhere in the document.
    pub fn handle_pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.store.handle_input(InputEvent::pointer_up(x, y))
    }

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool,"tool":"<tool_name>","presenting":bool}`
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        let changed = self.store.handle_input(InputEvent::key(key, modifiers));
        json!({
            "changed": changed,
            "tool": tool_kind_to_name(self.store.active_tool()),
            "presenting": self.store.presenter().is_some(),
        })
        .to_string()
    }

    /// Tell the editor whether a rich-text region has keyboard focus.
    pub fn set_text_focus(&mut self, focused: bool) {
        self.store.set_text_focus(focused);
    }

    // ─── Slideshow ───────────────────────────────────────────────────────

    pub fn start_presentation(&mut self, at: usize) {
        self.store.start_presentation(at);
    }

    pub fn end_presentation(&mut self) {
        self.store.end_presentation();
    }

    /// `{"slide":n,"revealed":k,"atEnd":bool}`, or `null` when not presenting.
    pub fn presenter_json(&self) -> String {
        match self.store.presenter() {
            Some(p) => json!({
                "slide": p.current_slide(),
                "revealed": p.revealed(),
                "atEnd": p.at_end(),
            })
            .to_string(),
            None => "null".to_string(),
        }
    }
}

impl DeckEditor {
    /// Wrap an existing store (native hosts and tests).
    pub fn with_store(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    fn insert(&mut self, element: Element) -> String {
        self.store
            .add_element(element)
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    fn edit_table(&mut self, id: &str, f: impl FnOnce(&mut TableData) -> bool) -> bool {
        ElementId::lookup(id).is_some_and(|id| self.store.edit_table(id, f))
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn console_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Deck WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if console_log::init_with_level(log::Level::Info).is_err() {
                web_sys::console::warn_1(&"Deck: logger already set".into());
            }
        });
    }
}

/// Empty or invalid config falls back to defaults.
fn parse_config(json: &str) -> EditorConfig {
    if json.trim().is_empty() {
        return EditorConfig::default();
    }
    EditorConfig::from_json(json).unwrap_or_else(|e| {
        log::warn!("ignoring invalid editor config: {e}");
        EditorConfig::default()
    })
}

/// Parse a lowercase enum name the way it appears in deck JSON.
fn parse_name<T: serde::de::DeserializeOwned>(name: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(name.to_string())).ok()
}

fn new_element(kind: &str, x: f32, y: f32) -> Option<Element> {
    let el = match kind {
        "textbox" => Element::textbox("Click to edit text", x, y),
        "shape" => Element::shape(ShapeType::Rectangle, x, y),
        "table" => Element::table(3, 3, x, y),
        "chart" => Element::chart(ChartType::Bar, x, y),
        "icon" => Element::new(
            ElementKind::Icon {
                content: "★".to_string(),
            },
            x,
            y,
        ),
        "equation" => Element::new(
            ElementKind::Equation {
                content: "E = mc^2".to_string(),
            },
            x,
            y,
        ),
        "video" => Element::new(ElementKind::Video(MediaProps::default()), x, y),
        "audio" => Element::new(ElementKind::Audio(MediaProps::default()), x, y),
        _ => return None,
    };
    Some(el)
}

fn zorder_from_name(name: &str) -> Option<ZOrder> {
    match name {
        "forward" => Some(ZOrder::Forward),
        "backward" => Some(ZOrder::Backward),
        "front" => Some(ZOrder::Front),
        "back" => Some(ZOrder::Back),
        _ => None,
    }
}

fn tool_kind_to_name(kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::Select => "select",
        ToolKind::Crop => "crop",
    }
}

/// Field names a layout shows, as a JSON array. Returns `[]` for an
/// unknown layout.
#[wasm_bindgen]
pub fn layout_fields(layout: &str) -> String {
    let names: Vec<&str> = LayoutKind::from_name(layout)
        .map(|kind| deck_core::layout::active_fields(kind).iter().map(|f| f.name()).collect())
        .unwrap_or_default();
    serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
}
