//! Canvas document and editor state.

use crate::history::History;
use crate::input::{Effect, EffectSink, Event, Notification};
use crate::rng::SimpleRng;
use crate::settings::{EditorSettings, Palette, PaletteChange};
use crate::shapes::Shape;
use crate::storage::{
    Drawing, DrawingDraft, DrawingId, PreviewImage, SaveRequest, StoreError, StoreResult,
};
use crate::text_overlay::{OverlayLayout, TextSession};
use crate::tools::{Gesture, ToolKind};
use kurbo::Rect;
use std::time::Duration;
use thiserror::Error;

/// Default title of a document that was never saved.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("shape index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// The ordered shape sequence (back to front) plus selection and identity.
#[derive(Debug, Clone)]
pub struct CanvasDocument {
    shapes: Vec<Shape>,
    selection: Option<usize>,
    /// Store identifier, absent until the first save.
    pub id: Option<DrawingId>,
    pub title: String,
    /// Bumped whenever the document is swapped for another one.
    generation: u64,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasDocument {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            selection: None,
            id: None,
            title: UNTITLED.to_string(),
            generation: 0,
        }
    }

    pub fn with_shapes(shapes: Vec<Shape>) -> Self {
        Self {
            shapes,
            ..Self::new()
        }
    }

    fn check(&self, index: usize) -> Result<(), ModelError> {
        if index < self.shapes.len() {
            Ok(())
        } else {
            Err(ModelError::IndexOutOfRange {
                index,
                len: self.shapes.len(),
            })
        }
    }

    /// Add a shape on top. Returns its index.
    pub fn append(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    /// Swap in a whole new sequence. Clears the selection.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.selection = None;
    }

    pub fn mutate<R>(&mut self, index: usize, f: impl FnOnce(&mut Shape) -> R) -> Result<R, ModelError> {
        self.check(index)?;
        Ok(f(&mut self.shapes[index]))
    }

    /// Remove a shape, keeping the selection pointed at the same shape.
    pub fn remove_at(&mut self, index: usize) -> Result<Shape, ModelError> {
        self.check(index)?;
        let removed = self.shapes.remove(index);
        self.selection = match self.selection {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        Ok(removed)
    }

    pub fn get(&self, index: usize) -> Result<&Shape, ModelError> {
        self.check(index)?;
        Ok(&self.shapes[index])
    }

    pub fn count(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected(&self) -> Option<&Shape> {
        self.selection.and_then(|i| self.shapes.get(i))
    }

    pub fn set_selection(&mut self, selection: Option<usize>) -> Result<(), ModelError> {
        if let Some(index) = selection {
            self.check(index)?;
        }
        self.selection = selection;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Union of every shape's bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes.iter().map(Shape::bounds).reduce(|a, b| a.union(b))
    }

    /// Replace contents and identity with another drawing.
    fn swap_in(&mut self, id: Option<DrawingId>, title: String, shapes: Vec<Shape>) {
        self.replace_all(shapes);
        self.id = id;
        self.title = title;
        self.generation += 1;
    }
}

/// The editor: document, history, palette and the interaction state machine.
///
/// Every input goes through [`Canvas::handle`], which returns the effects
/// the host has to carry out.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub document: CanvasDocument,
    pub history: History,
    pub palette: Palette,
    pub settings: EditorSettings,
    pub(crate) tool: ToolKind,
    pub(crate) gesture: Gesture,
    pub(crate) text_session: Option<TextSession>,
    pub(crate) rng: SimpleRng,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            document: CanvasDocument::new(),
            history: History::new(settings.history_capacity),
            palette: Palette::default(),
            settings,
            tool: ToolKind::default(),
            gesture: Gesture::Idle,
            text_session: None,
            rng: SimpleRng::from_entropy(),
        }
    }

    /// Fix the random seed used by the assist tools.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng = SimpleRng::new(seed);
        self
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn text_session(&self) -> Option<&TextSession> {
        self.text_session.as_ref()
    }

    /// Whether a pointer gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Process one event.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let mut fx = EffectSink::default();
        match event {
            Event::SelectTool(tool) => self.select_tool(tool, &mut fx),
            Event::PointerDown(p) => self.pointer_down(p, &mut fx),
            Event::PointerMove(p) => self.pointer_move(p, &mut fx),
            Event::PointerUp => self.pointer_up(&mut fx),
            Event::Undo => self.undo(&mut fx),
            Event::Redo => self.redo(&mut fx),
            Event::NewDocument => self.new_document(&mut fx),
            Event::SetPalette(change) => self.set_palette(change, &mut fx),
            Event::TextInput(text) => self.text_input(&text),
            Event::TextKey(key) => self.text_key(key, &mut fx),
            Event::TextBlur => self.close_text_editor(&mut fx),
        }
        fx.finish(self.history.can_undo(), self.history.can_redo())
    }

    /// Record an undo point before mutating the document.
    pub(crate) fn checkpoint(&mut self, fx: &mut EffectSink) {
        if let Err(err) = self.history.record(&self.document) {
            log::warn!("Failed to record undo snapshot: {err}");
        }
        fx.history_changed();
    }

    pub(crate) fn notify(&self, message: &str, fx: &mut EffectSink) {
        fx.push(Effect::Notify(Notification {
            message: message.to_string(),
            duration: Duration::from_millis(self.settings.notification_ms),
        }));
    }

    fn undo(&mut self, fx: &mut EffectSink) {
        if self.text_session.is_some() {
            return;
        }
        self.gesture = Gesture::Idle;
        match self.history.undo(&mut self.document) {
            Ok(true) => fx.repaint(),
            Ok(false) => {}
            Err(err) => log::warn!("Undo failed: {err}"),
        }
        fx.history_changed();
    }

    fn redo(&mut self, fx: &mut EffectSink) {
        if self.text_session.is_some() {
            return;
        }
        self.gesture = Gesture::Idle;
        match self.history.redo(&mut self.document) {
            Ok(true) => fx.repaint(),
            Ok(false) => {}
            Err(err) => log::warn!("Redo failed: {err}"),
        }
        fx.history_changed();
    }

    /// Swap the document for another drawing, keeping the old one undoable.
    fn swap_document(&mut self, id: Option<DrawingId>, title: String, shapes: Vec<Shape>, fx: &mut EffectSink) {
        self.close_text_editor(fx);
        self.gesture = Gesture::Idle;
        if !self.document.is_empty() {
            self.checkpoint(fx);
        }
        self.document.swap_in(id, title, shapes);
        self.history.clear_redo();
        fx.history_changed();
        fx.repaint();
    }

    fn new_document(&mut self, fx: &mut EffectSink) {
        self.swap_document(None, UNTITLED.to_string(), Vec::new(), fx);
        log::info!("Started a new document");
    }

    fn set_palette(&mut self, change: PaletteChange, fx: &mut EffectSink) {
        self.palette.apply(change);
        let restyle = matches!(change, PaletteChange::FontSize(_) | PaletteChange::TextColor(_));
        let Some(index) = self.document.selection() else {
            return;
        };
        if !restyle || self.document.get(index).map_or(true, |s| s.label.is_none()) {
            return;
        }
        self.checkpoint(fx);
        let updated = self.document.mutate(index, |shape| {
            if let Some(label) = shape.label.as_mut() {
                match change {
                    PaletteChange::FontSize(size) => label.font_size = size,
                    PaletteChange::TextColor(color) => label.color = color,
                    _ => {}
                }
            }
            OverlayLayout::for_shape(shape)
        });
        match updated {
            Ok(layout) => {
                if self.text_session.as_ref().is_some_and(|s| s.index() == index) {
                    fx.push(Effect::UpdateTextEditor(layout));
                }
                fx.repaint();
            }
            Err(err) => log::warn!("Palette change hit a stale selection: {err}"),
        }
    }

    /// Capture what a save needs. The store call runs without the canvas.
    pub fn begin_save(&self, title: impl Into<String>, preview: Option<PreviewImage>) -> SaveRequest {
        let title = title.into();
        SaveRequest {
            id: self.document.id.clone(),
            draft: DrawingDraft {
                title: if title.trim().is_empty() { UNTITLED.to_string() } else { title },
                shapes: self.document.shapes().to_vec(),
                preview,
            },
            generation: self.document.generation(),
        }
    }

    /// Apply the outcome of a save started with [`Canvas::begin_save`].
    pub fn finish_save(&mut self, request: &SaveRequest, result: StoreResult<Drawing>) -> Vec<Effect> {
        let mut fx = EffectSink::default();
        match result {
            Ok(drawing) if request.generation == self.document.generation() => {
                log::info!("Saved drawing {} ({})", drawing.id, drawing.title);
                self.document.id = Some(drawing.id);
                self.document.title = drawing.title;
                fx.push(Effect::Alert("Saved".to_string()));
            }
            Ok(drawing) => {
                log::warn!("Save of {} finished after the document was replaced; ignoring", drawing.id);
            }
            Err(err) => fx.push(Effect::Alert(store_alert("Save failed", &err))),
        }
        fx.finish(self.history.can_undo(), self.history.can_redo())
    }

    /// Replace the document with a drawing fetched from a store.
    pub fn load_drawing(&mut self, drawing: Drawing) -> Vec<Effect> {
        let mut fx = EffectSink::default();
        log::info!("Loaded drawing {} with {} shapes", drawing.id, drawing.data.shapes.len());
        self.swap_document(Some(drawing.id), drawing.title, drawing.data.shapes, &mut fx);
        fx.finish(self.history.can_undo(), self.history.can_redo())
    }

    /// Report a failed store request. Local state is left unchanged.
    pub fn store_failed(&self, context: &str, err: &StoreError) -> Vec<Effect> {
        vec![Effect::Alert(store_alert(context, err))]
    }
}

fn store_alert(context: &str, err: &StoreError) -> String {
    match err {
        StoreError::NotFound(_) => "Drawing not found".to_string(),
        other => format!("{context}: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Frame, PrimitiveKind, ShapeStyle};

    fn rect(x: f64) -> Shape {
        Shape::primitive(PrimitiveKind::Rect, Frame::new(x, 0.0, 10.0, 10.0), ShapeStyle::default())
    }

    #[test]
    fn test_document_creation() {
        let doc = CanvasDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.title, "Untitled");
        assert!(doc.id.is_none());
        assert!(doc.bounds().is_none());
    }

    #[test]
    fn test_indexed_access_is_checked() {
        let mut doc = CanvasDocument::new();
        doc.append(rect(0.0));
        assert_eq!(doc.get(1).unwrap_err(), ModelError::IndexOutOfRange { index: 1, len: 1 });
        assert!(doc.mutate(3, |_| ()).is_err());
        assert!(doc.remove_at(1).is_err());
        assert!(doc.set_selection(Some(1)).is_err());
        assert_eq!(doc.count(), 1);
    }

    #[test]
    fn test_remove_adjusts_selection() {
        let mut doc = CanvasDocument::with_shapes(vec![rect(0.0), rect(20.0), rect(40.0)]);
        doc.set_selection(Some(2)).unwrap();
        doc.remove_at(0).unwrap();
        assert_eq!(doc.selection(), Some(1));
        doc.remove_at(1).unwrap();
        assert_eq!(doc.selection(), None);
    }

    #[test]
    fn test_replace_all_clears_selection() {
        let mut doc = CanvasDocument::with_shapes(vec![rect(0.0)]);
        doc.set_selection(Some(0)).unwrap();
        doc.replace_all(vec![rect(1.0), rect(2.0)]);
        assert_eq!(doc.selection(), None);
        assert_eq!(doc.count(), 2);
    }

    #[test]
    fn test_bounds_union() {
        let doc = CanvasDocument::with_shapes(vec![rect(0.0), rect(40.0)]);
        assert_eq!(doc.bounds(), Some(Rect::new(0.0, 0.0, 50.0, 10.0)));
    }

    #[test]
    fn test_new_document_keeps_old_one_undoable() {
        let mut canvas = Canvas::new();
        canvas.document.append(rect(0.0));
        canvas.handle(Event::NewDocument);
        assert!(canvas.document.is_empty());
        assert!(!canvas.history.can_redo());
        canvas.handle(Event::Undo);
        assert_eq!(canvas.document.count(), 1);
    }

    #[test]
    fn test_save_binds_id_for_current_generation() {
        let mut canvas = Canvas::new();
        canvas.document.append(rect(0.0));
        let request = canvas.begin_save("Flow", None);
        let saved = Drawing::new(DrawingId::from("abc"), request.draft.clone());
        let effects = canvas.finish_save(&request, Ok(saved));
        assert_eq!(canvas.document.id, Some(DrawingId::from("abc")));
        assert_eq!(canvas.document.title, "Flow");
        assert_eq!(effects, vec![Effect::Alert("Saved".to_string())]);
        assert_eq!(canvas.begin_save("Flow", None).id, Some(DrawingId::from("abc")));
    }

    #[test]
    fn test_stale_save_is_ignored() {
        let mut canvas = Canvas::new();
        canvas.document.append(rect(0.0));
        let request = canvas.begin_save("Old", None);
        canvas.handle(Event::NewDocument);
        let saved = Drawing::new(DrawingId::from("old"), request.draft.clone());
        canvas.finish_save(&request, Ok(saved));
        assert!(canvas.document.id.is_none());
        assert_eq!(canvas.document.title, "Untitled");
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let mut canvas = Canvas::new();
        canvas.document.append(rect(0.0));
        let request = canvas.begin_save("", None);
        assert_eq!(request.draft.title, "Untitled");
        let effects = canvas.finish_save(&request, Err(StoreError::NotFound("x".into())));
        assert_eq!(effects, vec![Effect::Alert("Drawing not found".to_string())]);
        assert_eq!(canvas.document.count(), 1);
        assert!(canvas.document.id.is_none());
    }

    #[test]
    fn test_load_replaces_document() {
        let mut canvas = Canvas::new();
        canvas.document.append(rect(0.0));
        let drawing = Drawing::new(
            DrawingId::from("d1"),
            DrawingDraft {
                title: "Loaded".into(),
                shapes: vec![rect(1.0), rect(2.0)],
                preview: None,
            },
        );
        let effects = canvas.load_drawing(drawing);
        assert!(effects.contains(&Effect::Repaint));
        assert_eq!(canvas.document.count(), 2);
        assert_eq!(canvas.document.id, Some(DrawingId::from("d1")));
        assert!(canvas.history.can_undo());
        assert!(!canvas.history.can_redo());
    }
}
