//! Tool system for slide-canvas interactions.
//!
//! Each tool translates `InputEvent`s into element edits that the
//! `DocumentStore` applies. Tools never touch the deck themselves; the store
//! hit-tests the pointer against the current slide and hands the result in.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Select Tool | Crop Tool |
//! |----------|-------------|-----------|
//! | **Shift** | Axis-constrain drag | Square crop |

use crate::input::InputEvent;
use deck_core::geometry::{self, Bounds, ResizeHandle};
use deck_core::{CropRect, ElementId, ElementPatch, Slide};

/// The active tool determines how input events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Select,
    Crop,
}

/// What lies under the pointer on the current slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    /// A resize grip of the selected element.
    Handle {
        id: ElementId,
        handle: ResizeHandle,
        bounds: Bounds,
        locked: bool,
    },
    /// The body of an element (topmost in z-order).
    Body {
        id: ElementId,
        bounds: Bounds,
        locked: bool,
    },
    Empty,
}

/// Hit-test `(x, y)` against `slide`. Grips of `selected` win over element
/// bodies; bodies are tested topmost first. Rotation is ignored.
pub fn hit_test(slide: &Slide, selected: Option<ElementId>, x: f32, y: f32, tolerance: f32) -> Hit {
    if let Some(el) = selected.and_then(|id| slide.element(id)) {
        let bounds = el.bounds();
        if let Some(handle) = geometry::handle_at(&bounds, x, y, tolerance) {
            return Hit::Handle {
                id: el.id,
                handle,
                bounds,
                locked: el.locked,
            };
        }
    }
    slide
        .elements
        .iter()
        .rev()
        .find(|el| el.bounds().contains(x, y))
        .map_or(Hit::Empty, |el| Hit::Body {
            id: el.id,
            bounds: el.bounds(),
            locked: el.locked,
        })
}

/// An edit produced by a tool, applied by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementEdit {
    pub id: ElementId,
    pub patch: ElementPatch,
}

/// Trait for tools that handle input and produce element edits.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Handle an input event, returning zero or more edits.
    fn handle(&mut self, event: &InputEvent, hit: Hit) -> Vec<ElementEdit>;

    /// Whether a pointer gesture is in progress.
    fn in_gesture(&self) -> bool;

    /// Drop any gesture state.
    fn cancel(&mut self);
}

// ─── Select Tool ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Drag {
        id: ElementId,
        /// Pointer position relative to the element origin at grab time.
        grab_offset: (f32, f32),
        origin: (f32, f32),
        start: (f32, f32),
    },
    Resize {
        id: ElementId,
        handle: ResizeHandle,
        bounds: Bounds,
        start: (f32, f32),
    },
}

/// Selects, drags, and resizes elements.
pub struct SelectTool {
    /// Currently selected element.
    pub selected: Option<ElementId>,
    gesture: Option<Gesture>,
    min_size: f32,
}

impl SelectTool {
    pub fn new(min_size: f32) -> Self {
        Self {
            selected: None,
            gesture: None,
            min_size,
        }
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn handle(&mut self, event: &InputEvent, hit: Hit) -> Vec<ElementEdit> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                self.gesture = None;
                match hit {
                    Hit::Handle {
                        id,
                        handle,
                        bounds,
                        locked,
                    } => {
                        self.selected = Some(id);
                        if !locked {
                            self.gesture = Some(Gesture::Resize {
                                id,
                                handle,
                                bounds,
                                start: (*x, *y),
                            });
                        }
                    }
                    Hit::Body { id, bounds, locked } => {
                        self.selected = Some(id);
                        if !locked {
                            self.gesture = Some(Gesture::Drag {
                                id,
                                grab_offset: (x - bounds.x, y - bounds.y),
                                origin: (bounds.x, bounds.y),
                                start: (*x, *y),
                            });
                        }
                    }
                    Hit::Empty => self.selected = None,
                }
                vec![]
            }
            InputEvent::PointerMove { x, y, modifiers } => match self.gesture {
                Some(Gesture::Drag {
                    id,
                    grab_offset,
                    origin,
                    start,
                }) => {
                    let (mut nx, mut ny) = geometry::drag_position(grab_offset, (*x, *y));
                    // Shift: constrain to dominant axis
                    if modifiers.shift {
                        if (x - start.0).abs() > (y - start.1).abs() {
                            ny = origin.1;
                        } else {
                            nx = origin.0;
                        }
                    }
                    vec![ElementEdit {
                        id,
                        patch: ElementPatch::position(nx, ny),
                    }]
                }
                Some(Gesture::Resize {
                    id,
                    handle,
                    bounds,
                    start,
                }) => {
                    let next = geometry::resize(bounds, handle, x - start.0, y - start.1, self.min_size);
                    vec![ElementEdit {
                        id,
                        patch: ElementPatch::bounds(next),
                    }]
                }
                None => vec![],
            },
            InputEvent::PointerUp { .. } => {
                self.gesture = None;
                vec![]
            }
            InputEvent::Key { .. } => vec![],
        }
    }

    fn in_gesture(&self) -> bool {
        self.gesture.is_some()
    }

    fn cancel(&mut self) {
        self.gesture = None;
    }
}

// ─── Crop Tool ───────────────────────────────────────────────────────────

/// Draws a crop rectangle over an image element.
///
/// The rectangle is kept in the element's display space (origin at the
/// element's top-left corner, clamped to its box).
pub struct CropTool {
    target: Option<(ElementId, Bounds)>,
    start: Option<(f32, f32)>,
    rect: Option<CropRect>,
}

impl Default for CropTool {
    fn default() -> Self {
        Self::new()
    }
}

impl CropTool {
    pub fn new() -> Self {
        Self {
            target: None,
            start: None,
            rect: None,
        }
    }

    /// Start cropping the element occupying `bounds`.
    pub fn begin(&mut self, id: ElementId, bounds: Bounds) {
        self.target = Some((id, bounds));
        self.start = None;
        self.rect = None;
    }

    pub fn target(&self) -> Option<ElementId> {
        self.target.map(|(id, _)| id)
    }

    /// Current crop rectangle, if it has a non-zero area.
    pub fn rect(&self) -> Option<CropRect> {
        self.rect.filter(|r| r.width > 0.0 && r.height > 0.0)
    }

    /// Forget the target and rectangle.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn local(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let (_, b) = self.target?;
        Some(((x - b.x).clamp(0.0, b.width), (y - b.y).clamp(0.0, b.height)))
    }
}

impl Tool for CropTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Crop
    }

    fn handle(&mut self, event: &InputEvent, _hit: Hit) -> Vec<ElementEdit> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                self.start = self.local(*x, *y);
                self.rect = None;
            }
            InputEvent::PointerMove { x, y, modifiers } => {
                if let (Some((sx, sy)), Some((cx, cy))) = (self.start, self.local(*x, *y)) {
                    let (mut w, mut h) = ((cx - sx).abs(), (cy - sy).abs());
                    if modifiers.shift {
                        w = w.min(h);
                        h = w;
                    }
                    self.rect = Some(CropRect {
                        x: if cx < sx { sx - w } else { sx },
                        y: if cy < sy { sy - h } else { sy },
                        width: w,
                        height: h,
                    });
                }
            }
            InputEvent::PointerUp { .. } => self.start = None,
            InputEvent::Key { .. } => {}
        }
        vec![]
    }

    fn in_gesture(&self) -> bool {
        self.start.is_some()
    }

    fn cancel(&mut self) {
        self.start = None;
    }
}
