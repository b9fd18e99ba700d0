//! Editor key bindings.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Bindings follow
//! common presentation-editor conventions (⌘M new slide, F5 present,
//! ⌘[ / ⌘] z-order).

/// What a key chord asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    Duplicate,
    Copy,
    Cut,
    Paste,

    // ── Slides ──
    NewSlide,
    NextSlide,
    PrevSlide,
    StartPresentation,

    // ── Z-order ──
    SendBackward,
    BringForward,
    SendToBack,
    BringToFront,

    // ── UI ──
    Deselect,
}

impl ShortcutAction {
    /// Whether the action still applies while a rich-text region has focus.
    /// Everything else belongs to the text editor in that state.
    pub fn allowed_in_text(self) -> bool {
        matches!(self, ShortcutAction::Undo | ShortcutAction::Redo)
    }
}

/// Key chord lookup. `ctrl` and `meta` are interchangeable so the same
/// bindings work with ⌘ on macOS and Ctrl elsewhere.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Look up the binding for `key` (a `KeyboardEvent.key` value) under
    /// the given modifiers.
    pub fn resolve(key: &str, ctrl: bool, shift: bool, _alt: bool, meta: bool) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "[" | "{" => Some(ShortcutAction::SendToBack),
                "]" | "}" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "c" | "C" => Some(ShortcutAction::Copy),
                "x" | "X" => Some(ShortcutAction::Cut),
                "v" | "V" => Some(ShortcutAction::Paste),
                "m" | "M" => Some(ShortcutAction::NewSlide),
                "[" => Some(ShortcutAction::SendBackward),
                "]" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        if shift {
            return None;
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            "PageDown" => Some(ShortcutAction::NextSlide),
            "PageUp" => Some(ShortcutAction::PrevSlide),
            "F5" => Some(ShortcutAction::StartPresentation),
            _ => None,
        }
    }

    /// Like `resolve`, but drops bindings that belong to the text editor
    /// while a rich-text region has focus.
    pub fn resolve_focused(
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        text_focused: bool,
    ) -> Option<ShortcutAction> {
        Self::resolve(key, ctrl, shift, alt, meta).filter(|a| !text_focused || a.allowed_in_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ShortcutAction::*;

    const CTRL: (bool, bool, bool) = (true, false, false);
    const CMD: (bool, bool, bool) = (false, false, true);
    const CMD_SHIFT: (bool, bool, bool) = (false, true, true);
    const PLAIN: (bool, bool, bool) = (false, false, false);

    /// `(ctrl, shift, meta)` chord plus key.
    fn press(key: &str, (ctrl, shift, meta): (bool, bool, bool)) -> Option<ShortcutAction> {
        ShortcutMap::resolve(key, ctrl, shift, false, meta)
    }

    #[test]
    fn command_chords() {
        let cases = [
            ("z", CMD, Undo),
            ("z", CTRL, Undo),
            ("Z", CMD_SHIFT, Redo),
            ("y", CTRL, Redo),
            ("d", CTRL, Duplicate),
            ("c", CMD, Copy),
            ("x", CMD, Cut),
            ("v", CMD, Paste),
            ("m", CTRL, NewSlide),
            ("[", CMD, SendBackward),
            ("]", CMD, BringForward),
            ("{", CMD_SHIFT, SendToBack),
            ("]", CMD_SHIFT, BringToFront),
        ];
        for (key, chord, want) in cases {
            assert_eq!(press(key, chord), Some(want), "{key} with {chord:?}");
        }
    }

    #[test]
    fn bare_keys() {
        let cases = [
            ("Delete", Delete),
            ("Backspace", Delete),
            ("Escape", Deselect),
            ("PageDown", NextSlide),
            ("PageUp", PrevSlide),
            ("F5", StartPresentation),
        ];
        for (key, want) in cases {
            assert_eq!(press(key, PLAIN), Some(want), "{key}");
        }
    }

    #[test]
    fn unbound_combos() {
        assert_eq!(press("q", PLAIN), None);
        assert_eq!(press("z", PLAIN), None, "undo needs a command modifier");
        assert_eq!(press("Delete", (false, true, false)), None);
        assert_eq!(press("m", CMD_SHIFT), None);
    }

    #[test]
    fn text_focus_keeps_only_history() {
        let focused = |key, ctrl| ShortcutMap::resolve_focused(key, ctrl, false, false, false, true);
        assert_eq!(focused("Backspace", false), None);
        assert_eq!(focused("c", true), None);
        assert_eq!(focused("z", true), Some(Undo));
        assert_eq!(
            ShortcutMap::resolve_focused("Backspace", false, false, false, false, false),
            Some(Delete)
        );
    }
}
