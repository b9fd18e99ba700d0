//! Element geometry: drag positioning, eight-handle resize, handle hit-testing.
//!
//! All coordinates are canvas-relative. Elements may extend past the right
//! and bottom canvas edges; only the `>= 0` floor on drag is enforced.

use smallvec::SmallVec;

/// Axis-aligned rectangle of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One of the eight resize grips around a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::NE | Self::NW)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::SE | Self::SW)
    }

    /// Grip position on the given bounds.
    pub fn anchor(self, b: &Bounds) -> (f32, f32) {
        let (cx, cy) = b.center();
        let x = if self.moves_left() {
            b.x
        } else if self.moves_right() {
            b.right()
        } else {
            cx
        };
        let y = if self.moves_top() {
            b.y
        } else if self.moves_bottom() {
            b.bottom()
        } else {
            cy
        };
        (x, y)
    }

    /// CSS cursor name for the grip.
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::NE | Self::SW => "nesw-resize",
            Self::NW | Self::SE => "nwse-resize",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::S => "s",
            Self::E => "e",
            Self::W => "w",
            Self::NE => "ne",
            Self::NW => "nw",
            Self::SE => "se",
            Self::SW => "sw",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "n" => Self::N,
            "s" => Self::S,
            "e" => Self::E,
            "w" => Self::W,
            "ne" => Self::NE,
            "nw" => Self::NW,
            "se" => Self::SE,
            "sw" => Self::SW,
            _ => return None,
        })
    }
}

/// Position of a dragged element: pointer minus the grab offset, floored
/// at zero on both axes.
pub fn drag_position(grab_offset: (f32, f32), pointer: (f32, f32)) -> (f32, f32) {
    (
        (pointer.0 - grab_offset.0).max(0.0),
        (pointer.1 - grab_offset.1).max(0.0),
    )
}

/// Resize `start` by dragging `handle` by `(dx, dy)` from its grab point.
///
/// The edge opposite each moved edge stays fixed, including when the size
/// is clamped to `min_size`.
pub fn resize(start: Bounds, handle: ResizeHandle, dx: f32, dy: f32, min_size: f32) -> Bounds {
    let mut out = start;

    if handle.moves_right() {
        out.width = (start.width + dx).max(min_size);
    } else if handle.moves_left() {
        out.width = (start.width - dx).max(min_size);
        out.x = start.right() - out.width;
    }

    if handle.moves_bottom() {
        out.height = (start.height + dy).max(min_size);
    } else if handle.moves_top() {
        out.height = (start.height - dy).max(min_size);
        out.y = start.bottom() - out.height;
    }

    out
}

/// Which resize grip (if any) lies within `tolerance` of `(px, py)`.
/// Corners win over edges when both are in range.
pub fn handle_at(b: &Bounds, px: f32, py: f32, tolerance: f32) -> Option<ResizeHandle> {
    let hits: SmallVec<[ResizeHandle; 8]> = ResizeHandle::ALL
        .into_iter()
        .filter(|h| {
            let (hx, hy) = h.anchor(b);
            (px - hx).abs() <= tolerance && (py - hy).abs() <= tolerance
        })
        .collect();
    hits.iter()
        .copied()
        .find(|h| matches!(h, ResizeHandle::NE | ResizeHandle::NW | ResizeHandle::SE | ResizeHandle::SW))
        .or_else(|| hits.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: f32 = 20.0;

    #[test]
    fn drag_floors_at_zero() {
        assert_eq!(drag_position((10.0, 5.0), (100.0, 50.0)), (90.0, 45.0));
        assert_eq!(drag_position((10.0, 5.0), (3.0, -40.0)), (0.0, 0.0));
        // No upper clamp: elements may leave the canvas on the right/bottom.
        assert_eq!(drag_position((0.0, 0.0), (5000.0, 9000.0)), (5000.0, 9000.0));
    }

    #[test]
    fn se_handle_keeps_origin() {
        let b = Bounds::new(10.0, 20.0, 100.0, 50.0);
        let r = resize(b, ResizeHandle::SE, 30.0, 15.0, MIN);
        assert_eq!(r, Bounds::new(10.0, 20.0, 130.0, 65.0));
    }

    #[test]
    fn se_handle_clamps_to_min() {
        let b = Bounds::new(10.0, 20.0, 100.0, 50.0);
        let r = resize(b, ResizeHandle::SE, -500.0, -500.0, MIN);
        assert_eq!(r, Bounds::new(10.0, 20.0, MIN, MIN));
    }

    #[test]
    fn nw_handle_keeps_opposite_corner() {
        let b = Bounds::new(50.0, 60.0, 100.0, 80.0);
        for (dx, dy) in [(10.0, 20.0), (-30.0, -5.0), (400.0, 400.0)] {
            let r = resize(b, ResizeHandle::NW, dx, dy, MIN);
            assert_eq!(r.right(), b.right());
            assert_eq!(r.bottom(), b.bottom());
            assert!(r.width >= MIN && r.height >= MIN);
        }
    }

    #[test]
    fn edge_handles_touch_one_axis() {
        let b = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let n = resize(b, ResizeHandle::N, 999.0, 10.0, MIN);
        assert_eq!(n, Bounds::new(0.0, 10.0, 100.0, 90.0));

        let e = resize(b, ResizeHandle::E, 10.0, 999.0, MIN);
        assert_eq!(e, Bounds::new(0.0, 0.0, 110.0, 100.0));

        let w = resize(b, ResizeHandle::W, -10.0, 0.0, MIN);
        assert_eq!(w, Bounds::new(-10.0, 0.0, 110.0, 100.0));

        let s = resize(b, ResizeHandle::S, 0.0, -10.0, MIN);
        assert_eq!(s, Bounds::new(0.0, 0.0, 100.0, 90.0));
    }

    #[test]
    fn handle_hit_testing_prefers_corners() {
        let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
        // Tiny element: NW corner and N edge midpoint are both within 6px.
        assert_eq!(handle_at(&b, 1.0, 1.0, 6.0), Some(ResizeHandle::NW));
        let big = Bounds::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(handle_at(&big, 100.0, 1.0, 4.0), Some(ResizeHandle::N));
        assert_eq!(handle_at(&big, 199.0, 99.0, 4.0), Some(ResizeHandle::SE));
        assert_eq!(handle_at(&big, 100.0, 50.0, 4.0), None);
    }

    #[test]
    fn handle_names_and_cursors() {
        for handle in ResizeHandle::ALL {
            assert_eq!(ResizeHandle::from_name(handle.name()), Some(handle));
        }
        assert_eq!(ResizeHandle::from_name("middle"), None);
        assert_eq!(ResizeHandle::NE.cursor(), ResizeHandle::SW.cursor());
        assert_eq!(ResizeHandle::W.cursor(), "ew-resize");
    }
}
