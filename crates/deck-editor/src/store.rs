//! The document store: sole owner and writer of the deck.
//!
//! Every mutation follows the same path: snapshot the slide list, apply the
//! change, record the snapshot in `History` (unless asked not to), then
//! write the deck through `Persistence`. Business-rule violations (deleting
//! the last slide, stale ids, out-of-range indices) are silent no-ops that
//! return `false` / `None`; storage failures are warnings and never roll
//! back the in-memory deck.
//!
//! Pointer gestures arrive through `handle_input`; each one is wrapped in a
//! history batch so a whole drag or resize undoes in one step. Writes are
//! deferred until the gesture ends.

use crate::config::EditorConfig;
use crate::history::{History, Snapshot};
use crate::import::{self, FileDescriptor, ImportError};
use crate::input::InputEvent;
use crate::persist::{MemoryStorage, Persistence, Storage};
use crate::presenter::Presenter;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{self, CropTool, Hit, SelectTool, Tool, ToolKind};
use deck_core::{
    Comment, CommentId, CropRect, Element, ElementId, ElementKind, ElementPatch, ImageProps,
    LayoutKind, PresentationMeta, RichText, Slide, SlideField, SlideId, SlidePatch, TableData,
    ZOrder, crop_image,
};

pub struct DocumentStore {
    slides: Vec<Slide>,
    current_slide: usize,
    meta: PresentationMeta,
    history: History,
    persistence: Persistence,
    config: EditorConfig,
    clipboard: Option<Element>,
    active_tool: ToolKind,
    select_tool: SelectTool,
    crop_tool: CropTool,
    presenter: Option<Presenter>,
    /// A rich-text region has keyboard focus.
    text_focused: bool,
    /// Message of the most recent failed write, if the last write failed.
    last_warning: Option<String>,
}

impl DocumentStore {
    /// A fresh deck with one default slide. Nothing is read from `storage`.
    pub fn new(config: EditorConfig, storage: Box<dyn Storage>) -> Self {
        let persistence = Persistence::new(storage, config.keys.clone());
        Self::with_state(
            config,
            persistence,
            vec![Slide::new(LayoutKind::TitleContent)],
            PresentationMeta::default(),
            None,
        )
    }

    /// Rehydrate the deck (and history, when enabled) from `storage`.
    pub fn open(config: EditorConfig, storage: Box<dyn Storage>) -> Self {
        let persistence = Persistence::new(storage, config.keys.clone());
        let slides = persistence.load_slides();
        let meta = persistence.load_meta();
        let history = config
            .persist_history
            .then(|| persistence.load_history(config.history_depth));
        log::info!("opened deck '{}' with {} slides", meta.title, slides.len());
        Self::with_state(config, persistence, slides, meta, history)
    }

    /// Default config over throwaway in-memory storage.
    pub fn in_memory() -> Self {
        Self::new(EditorConfig::default(), Box::new(MemoryStorage::new()))
    }

    fn with_state(
        config: EditorConfig,
        persistence: Persistence,
        slides: Vec<Slide>,
        meta: PresentationMeta,
        history: Option<History>,
    ) -> Self {
        Self {
            history: history.unwrap_or_else(|| History::new(config.history_depth)),
            select_tool: SelectTool::new(config.min_element_size),
            slides,
            current_slide: 0,
            meta,
            persistence,
            config,
            clipboard: None,
            active_tool: ToolKind::Select,
            crop_tool: CropTool::new(),
            presenter: None,
            text_focused: false,
            last_warning: None,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    /// The slide being edited.
    pub fn current(&self) -> &Slide {
        &self.slides[self.current_slide]
    }

    pub fn meta(&self) -> &PresentationMeta {
        &self.meta
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub fn clipboard(&self) -> Option<&Element> {
        self.clipboard.as_ref()
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.select_tool.selected
    }

    pub fn set_selected(&mut self, id: Option<ElementId>) {
        self.select_tool.selected = id.filter(|id| self.current().element(*id).is_some());
    }

    pub fn active_tool(&self) -> ToolKind {
        self.active_tool
    }

    /// Crop rectangle being drawn, in the target element's display space.
    pub fn crop_rect(&self) -> Option<CropRect> {
        self.crop_tool.rect()
    }

    /// CSS cursor for a pointer hovering at `(x, y)`.
    pub fn cursor_at(&self, x: f32, y: f32) -> &'static str {
        if self.active_tool == ToolKind::Crop {
            return "crosshair";
        }
        let hit = tools::hit_test(
            self.current(),
            self.select_tool.selected,
            x,
            y,
            self.config.handle_tolerance,
        );
        match hit {
            Hit::Handle {
                handle, locked: false, ..
            } => handle.cursor(),
            Hit::Body { locked: false, .. } => "move",
            _ => "default",
        }
    }

    pub fn presenter(&self) -> Option<&Presenter> {
        self.presenter.as_ref()
    }

    /// Why the most recent write failed, if it did.
    pub fn last_warning(&self) -> Option<&str> {
        self.last_warning.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Mutation plumbing ───────────────────────────────────────────────

    /// Run `f` over the deck. When it reports a change, record the prior
    /// state (unless `skip_history`) and persist.
    fn edit(&mut self, skip_history: bool, f: impl FnOnce(&mut Vec<Slide>, &mut usize) -> bool) -> bool {
        let before: Snapshot = self.slides.clone();
        if !f(&mut self.slides, &mut self.current_slide) {
            return false;
        }
        if !skip_history {
            self.history.record(before);
        }
        self.clamp_current();
        self.persist();
        true
    }

    /// Edit the current slide.
    fn edit_current(&mut self, skip_history: bool, f: impl FnOnce(&mut Slide) -> bool) -> bool {
        self.edit(skip_history, |slides, current| f(&mut slides[*current]))
    }

    fn clamp_current(&mut self) {
        self.current_slide = self.current_slide.min(self.slides.len().saturating_sub(1));
    }

    /// Write the deck through the persistence adapter. Skipped while a
    /// gesture batch is open; the batch end writes instead.
    fn persist(&mut self) {
        if self.history.is_batching() {
            return;
        }
        self.meta.touch();
        let mut result = self
            .persistence
            .save_slides(&self.slides)
            .and_then(|()| self.persistence.save_meta(&self.meta));
        if result.is_ok() {
            result = if self.config.persist_history {
                self.persistence.save_history(&self.history)
            } else {
                self.persistence.clear_history();
                Ok(())
            };
        }
        match result {
            Ok(()) => self.last_warning = None,
            Err(e) => {
                log::warn!("deck kept in memory only: {e}");
                self.last_warning = Some(e.to_string());
            }
        }
    }

    // ─── Slides ──────────────────────────────────────────────────────────

    /// Merge `patch` into slide `index`. Out-of-range indices and patches
    /// that change nothing are a no-op. Replacement element lists with
    /// repeated ids get fresh ids for the repeats.
    pub fn update_slide(&mut self, index: usize, patch: SlidePatch, skip_history: bool) -> bool {
        if index >= self.slides.len() {
            log::debug!("update_slide: index {index} out of range");
            return false;
        }
        let replaces_elements = patch.elements.is_some();
        let changed = self.edit(skip_history, |slides, _| {
            let slide = &mut slides[index];
            let before = slide.clone();
            patch.merge_into(slide);
            if replaces_elements {
                slide.dedup_element_ids();
            }
            *slide != before
        });
        if changed && replaces_elements && index == self.current_slide {
            self.set_selected(self.select_tool.selected);
        }
        changed
    }

    /// Append a new slide and make it current.
    pub fn add_slide(&mut self, layout: LayoutKind) -> SlideId {
        let slide = Slide::new(layout);
        let id = slide.id;
        self.edit(false, |slides, current| {
            slides.push(slide);
            *current = slides.len() - 1;
            true
        });
        self.reset_tools();
        id
    }

    /// Remove slide `index`. Refused when it is the only slide.
    pub fn delete_slide(&mut self, index: usize) -> bool {
        if self.slides.len() <= 1 || index >= self.slides.len() {
            log::debug!("delete_slide: refusing index {index} of {}", self.slides.len());
            return false;
        }
        let deleted = self.edit(false, |slides, current| {
            slides.remove(index);
            if index < *current {
                *current -= 1;
            }
            true
        });
        self.reset_tools();
        deleted
    }

    /// Switch the current slide's layout. Text of inactive fields is kept.
    pub fn apply_layout(&mut self, kind: LayoutKind) -> bool {
        self.update_slide(self.current_slide, SlidePatch::layout(kind), false)
    }

    pub fn set_current_slide(&mut self, index: usize) -> bool {
        if index >= self.slides.len() || index == self.current_slide {
            return false;
        }
        self.current_slide = index;
        self.reset_tools();
        true
    }

    /// Move slide `from` to position `to`; it becomes the current slide.
    pub fn move_slide(&mut self, from: usize, to: usize) -> bool {
        let len = self.slides.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        self.edit(false, |slides, current| {
            let slide = slides.remove(from);
            slides.insert(to, slide);
            *current = to;
            true
        })
    }

    /// Insert a copy of slide `index` right after it and make it current.
    pub fn duplicate_slide(&mut self, index: usize) -> Option<SlideId> {
        let copy = self.slides.get(index)?.duplicate();
        let id = copy.id;
        self.edit(false, |slides, current| {
            slides.insert(index + 1, copy);
            *current = index + 1;
            true
        });
        self.reset_tools();
        Some(id)
    }

    /// Replace the whole deck (template or import load). Empty decks are
    /// refused.
    pub fn replace_slides(&mut self, mut slides: Vec<Slide>) -> bool {
        if slides.is_empty() {
            return false;
        }
        for slide in &mut slides {
            slide.dedup_element_ids();
        }
        let replaced = self.edit(false, |deck, current| {
            *deck = slides;
            *current = 0;
            true
        });
        self.reset_tools();
        replaced
    }

    /// Import `file` and insert its slides after the current one. On error
    /// the deck is unchanged.
    pub fn import(&mut self, file: &FileDescriptor) -> Result<usize, ImportError> {
        let imported = import::import_file(file, self.meta.slide_size.dimensions())?;
        let count = imported.len();
        if count == 0 {
            return Ok(0);
        }
        self.edit(false, |slides, current| {
            let at = *current + 1;
            slides.splice(at..at, imported);
            *current = at;
            true
        });
        self.reset_tools();
        Ok(count)
    }

    /// Overwrite one text field of the current slide.
    pub fn set_field_text(&mut self, field: SlideField, text: RichText, skip_history: bool) -> bool {
        self.edit_current(skip_history, |slide| {
            if slide.field_text(field) == text {
                return false;
            }
            slide.set_field_text(field, text);
            true
        })
    }

    pub fn set_notes(&mut self, notes: &str) -> bool {
        self.edit_current(false, |slide| {
            if slide.notes == notes {
                return false;
            }
            slide.notes = notes.to_string();
            true
        })
    }

    pub fn add_comment(&mut self, text: &str, author: &str) -> Option<CommentId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let comment = Comment::new(text, author);
        let id = comment.id;
        self.edit_current(false, |slide| {
            slide.comments.push(comment);
            true
        });
        Some(id)
    }

    pub fn remove_comment(&mut self, id: CommentId) -> bool {
        self.edit_current(false, |slide| {
            let before = slide.comments.len();
            slide.comments.retain(|c| c.id != id);
            slide.comments.len() != before
        })
    }

    // ─── Undo / redo ─────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        if self.history.is_batching() || !self.history.can_undo() {
            return false;
        }
        let Some(previous) = self.history.undo(self.slides.clone()) else {
            return false;
        };
        self.restore(previous);
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.history.is_batching() || !self.history.can_redo() {
            return false;
        }
        let Some(next) = self.history.redo(self.slides.clone()) else {
            return false;
        };
        self.restore(next);
        true
    }

    fn restore(&mut self, slides: Snapshot) {
        self.slides = slides;
        self.clamp_current();
        self.reset_tools();
        self.persist();
    }

    // ─── Presentation metadata ───────────────────────────────────────────

    pub fn rename_presentation(&mut self, title: &str) {
        self.meta.title = title.to_string();
        self.persist();
    }

    pub fn set_meta(&mut self, meta: PresentationMeta) {
        self.meta = meta;
        self.persist();
    }

    // ─── Elements (current slide) ────────────────────────────────────────

    /// Add `element` on top of the current slide and select it. `None` if
    /// its id is already used on the slide.
    pub fn add_element(&mut self, element: Element) -> Option<ElementId> {
        let id = element.id;
        if !self.edit_current(false, |slide| slide.add_element(element)) {
            log::debug!("add_element: duplicate id {id}");
            return None;
        }
        self.select_tool.selected = Some(id);
        Some(id)
    }

    /// Patch an element of the current slide. Patches that would shrink a
    /// dimension below the minimum size are refused. A dimension already
    /// under the minimum may be re-sent unchanged or grown.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch, skip_history: bool) -> bool {
        let Some(el) = self.current().element(id) else {
            return false;
        };
        let min = self.config.min_element_size;
        let shrinks = |next: Option<f32>, now: f32| next.is_some_and(|v| v < min && v < now);
        if shrinks(patch.width, el.width) || shrinks(patch.height, el.height) {
            log::debug!("update_element: {id} below minimum size");
            return false;
        }
        self.edit_current(skip_history, |slide| match slide.element_mut(id) {
            Some(el) => {
                let before = el.clone();
                patch.merge_into(el);
                *el != before
            }
            None => false,
        })
    }

    /// Edit the table element `id` in place.
    pub fn edit_table(&mut self, id: ElementId, f: impl FnOnce(&mut TableData) -> bool) -> bool {
        self.edit_current(false, |slide| match slide.element_mut(id).map(|el| &mut el.kind) {
            Some(ElementKind::Table(table)) => f(table),
            _ => false,
        })
    }

    /// Delete exactly the element `id` from the current slide.
    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let removed = self.edit_current(false, |slide| slide.remove_element(id).is_some());
        if removed && self.select_tool.selected == Some(id) {
            self.select_tool.selected = None;
        }
        removed
    }

    pub fn reorder_element(&mut self, id: ElementId, order: ZOrder) -> bool {
        self.edit_current(false, |slide| slide.reorder_element(id, order))
    }

    /// Copy an element of the current slide to the clipboard.
    pub fn copy_element(&mut self, id: ElementId) -> bool {
        match self.current().element(id) {
            Some(el) => {
                self.clipboard = Some(el.clone());
                true
            }
            None => false,
        }
    }

    pub fn cut_element(&mut self, id: ElementId) -> bool {
        self.copy_element(id) && self.remove_element(id)
    }

    /// Paste the clipboard onto the current slide with a fresh id, offset
    /// from the copied position. Repeated pastes keep stepping the offset.
    pub fn paste_element(&mut self) -> Option<ElementId> {
        let source = self.clipboard.as_mut()?;
        source.x += self.config.paste_offset;
        source.y += self.config.paste_offset;
        let copy = source.duplicate();
        self.add_element(copy)
    }

    /// Duplicate an element in place (offset like a paste), leaving the
    /// clipboard alone.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let mut copy = self.current().element(id)?.duplicate();
        copy.x += self.config.paste_offset;
        copy.y += self.config.paste_offset;
        self.add_element(copy)
    }

    // ─── Crop ────────────────────────────────────────────────────────────

    /// Enter crop mode on an unlocked image element.
    pub fn begin_crop(&mut self, id: ElementId) -> bool {
        let Some(el) = self.current().element(id) else {
            return false;
        };
        if el.locked || !matches!(el.kind, ElementKind::Image(_)) {
            return false;
        }
        let bounds = el.bounds();
        self.select_tool.cancel();
        self.select_tool.selected = Some(id);
        self.crop_tool.begin(id, bounds);
        self.active_tool = ToolKind::Crop;
        true
    }

    pub fn cancel_crop(&mut self) {
        self.crop_tool.clear();
        self.active_tool = ToolKind::Select;
    }

    /// Rasterize the drawn crop rectangle into the image element. The
    /// element keeps the cropped region where it was on the slide.
    ///
    /// `Ok(false)` when there is nothing to commit. On error the deck is
    /// unchanged and crop mode stays active.
    pub fn commit_crop(&mut self) -> deck_core::Result<bool> {
        let (Some(id), Some(rect)) = (self.crop_tool.target(), self.crop_tool.rect()) else {
            return Ok(false);
        };
        let Some(el) = self.current().element(id) else {
            self.cancel_crop();
            return Ok(false);
        };
        let ElementKind::Image(props) = &el.kind else {
            self.cancel_crop();
            return Ok(false);
        };

        let cropped = crop_image(&props.src, (el.width, el.height), rect)?;
        let min = self.config.min_element_size;
        let patch = ElementPatch {
            x: Some(el.x + rect.x),
            y: Some(el.y + rect.y),
            width: Some(cropped.width.max(min)),
            height: Some(cropped.height.max(min)),
            kind: Some(ElementKind::Image(ImageProps {
                src: cropped.src,
                ..props.clone()
            })),
            ..ElementPatch::default()
        };
        self.cancel_crop();
        let changed = self.edit_current(false, |slide| match slide.element_mut(id) {
            Some(el) => patch.merge_into(el),
            None => false,
        });
        Ok(changed)
    }

    // ─── Presenter ───────────────────────────────────────────────────────

    pub fn start_presentation(&mut self, at: usize) {
        self.reset_tools();
        self.presenter = Some(Presenter::start(&self.slides, at));
    }

    pub fn end_presentation(&mut self) {
        self.presenter = None;
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Whether a rich-text region has focus. While it does, only undo/redo
    /// shortcuts are handled here.
    pub fn set_text_focus(&mut self, focused: bool) {
        self.text_focused = focused;
    }

    /// Route an input event. Returns `true` when anything visible changed
    /// (deck, selection, crop rectangle, or slideshow position).
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if let Some(presenter) = self.presenter.as_mut() {
            let changed = match &event {
                InputEvent::Key { key, .. } => match presenter.handle_key(key) {
                    Some(false) => {
                        self.presenter = None;
                        true
                    }
                    Some(true) => true,
                    None => false,
                },
                InputEvent::PointerDown { .. } => presenter.next(),
                _ => false,
            };
            return changed;
        }

        if let InputEvent::Key { key, modifiers } = &event {
            return ShortcutMap::resolve_focused(
                key,
                modifiers.ctrl,
                modifiers.shift,
                modifiers.alt,
                modifiers.meta,
                self.text_focused,
            )
            .is_some_and(|action| self.apply_shortcut(action));
        }

        let hit = match event {
            InputEvent::PointerDown { x, y, .. } => tools::hit_test(
                self.current(),
                self.select_tool.selected,
                x,
                y,
                self.config.handle_tolerance,
            ),
            _ => Hit::Empty,
        };

        match self.active_tool {
            ToolKind::Select => self.drive_select(&event, hit),
            ToolKind::Crop => {
                let before = self.crop_tool.rect();
                self.crop_tool.handle(&event, hit);
                self.crop_tool.rect() != before
            }
        }
    }

    fn drive_select(&mut self, event: &InputEvent, hit: Hit) -> bool {
        let selected_before = self.select_tool.selected;
        let edits = self.select_tool.handle(event, hit);

        if self.select_tool.in_gesture() && !self.history.is_batching() {
            self.history.begin_batch(&self.slides);
        }

        let mut changed = false;
        for edit in edits {
            changed |= self.update_element(edit.id, edit.patch, true);
        }

        if !self.select_tool.in_gesture()
            && self.history.is_batching()
            && self.history.end_batch(&self.slides)
        {
            log::trace!("gesture recorded as one undo step");
            self.persist();
        }

        changed || self.select_tool.selected != selected_before
    }

    /// Perform a shortcut action. Returns whether anything changed.
    pub fn apply_shortcut(&mut self, action: ShortcutAction) -> bool {
        let selected = self.select_tool.selected;
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => selected.is_some_and(|id| self.remove_element(id)),
            ShortcutAction::Duplicate => match selected {
                Some(id) => self.duplicate_element(id).is_some(),
                None => self.duplicate_slide(self.current_slide).is_some(),
            },
            ShortcutAction::Copy => selected.is_some_and(|id| self.copy_element(id)),
            ShortcutAction::Cut => selected.is_some_and(|id| self.cut_element(id)),
            ShortcutAction::Paste => self.paste_element().is_some(),
            ShortcutAction::NewSlide => {
                self.add_slide(LayoutKind::TitleContent);
                true
            }
            ShortcutAction::NextSlide => self.set_current_slide(self.current_slide + 1),
            ShortcutAction::PrevSlide => self
                .current_slide
                .checked_sub(1)
                .is_some_and(|i| self.set_current_slide(i)),
            ShortcutAction::StartPresentation => {
                self.start_presentation(self.current_slide);
                true
            }
            ShortcutAction::SendBackward => self.reorder_selected(ZOrder::Backward),
            ShortcutAction::BringForward => self.reorder_selected(ZOrder::Forward),
            ShortcutAction::SendToBack => self.reorder_selected(ZOrder::Back),
            ShortcutAction::BringToFront => self.reorder_selected(ZOrder::Front),
            ShortcutAction::Deselect => {
                let had = selected.is_some() || self.active_tool != ToolKind::Select;
                self.reset_tools();
                had
            }
        }
    }

    fn reorder_selected(&mut self, order: ZOrder) -> bool {
        let selected = self.select_tool.selected;
        selected.is_some_and(|id| self.reorder_element(id, order))
    }

    /// Drop selection, gestures, and crop mode.
    fn reset_tools(&mut self) {
        self.select_tool.cancel();
        self.select_tool.selected = None;
        self.cancel_crop();
    }
}
