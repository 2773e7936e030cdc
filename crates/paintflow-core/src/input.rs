//! Events fed into the canvas and the effects it asks the host to perform.

use crate::settings::{Palette, PaletteChange};
use crate::text_overlay::{OverlayLayout, TextKey};
use crate::tools::ToolKind;
use kurbo::Point;
use std::time::Duration;

/// Input to [`crate::Canvas::handle`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SelectTool(ToolKind),
    PointerDown(Point),
    PointerMove(Point),
    /// Global release, wherever the pointer is.
    PointerUp,
    Undo,
    Redo,
    NewDocument,
    SetPalette(PaletteChange),
    /// Text typed into the overlay editor.
    TextInput(String),
    TextKey(TextKey),
    /// The overlay editor lost focus.
    TextBlur,
}

/// Transient toast shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub duration: Duration,
}

/// Work the host must perform after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Repaint,
    OpenTextEditor(OverlayLayout),
    UpdateTextEditor(OverlayLayout),
    CloseTextEditor,
    Notify(Notification),
    /// Blocking message, used for persistence failures.
    Alert(String),
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// The palette was changed by the canvas itself; toolbar inputs should follow.
    PaletteChanged(Palette),
}

/// Collects effects while an event is processed.
///
/// Repaint and history notifications are coalesced and emitted last.
#[derive(Debug, Default)]
pub(crate) struct EffectSink {
    effects: Vec<Effect>,
    repaint: bool,
    history: bool,
}

impl EffectSink {
    pub(crate) fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub(crate) fn repaint(&mut self) {
        self.repaint = true;
    }

    pub(crate) fn history_changed(&mut self) {
        self.history = true;
    }

    pub(crate) fn finish(mut self, can_undo: bool, can_redo: bool) -> Vec<Effect> {
        if self.history {
            self.effects.push(Effect::HistoryChanged { can_undo, can_redo });
        }
        if self.repaint {
            self.effects.push(Effect::Repaint);
        }
        self.effects
    }
}
