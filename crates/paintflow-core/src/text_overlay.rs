//! The text editing overlay bound to one shape.
//!
//! The host owns the actual text widget. The canvas only tells it where to
//! sit and how to look ([`OverlayLayout`]) and keeps its own copy of the
//! buffer so the commit on close does not depend on the widget.

use crate::canvas::Canvas;
use crate::input::{Effect, EffectSink};
use crate::picking::hit_test;
use crate::settings::Palette;
use crate::shapes::{Frame, SerializableColor, Shape, TextLabel};
use kurbo::{Point, Rect};

/// Smallest overlay for a standalone text box.
pub const MIN_EDITOR_WIDTH: f64 = 80.0;
pub const MIN_EDITOR_HEIGHT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// Placement and style of the overlay editor, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    pub rect: Rect,
    pub font_size: f64,
    pub color: SerializableColor,
    pub align: TextAlign,
    pub line_height: f64,
}

impl OverlayLayout {
    pub fn for_shape(shape: &Shape) -> Self {
        let label = shape
            .label
            .clone()
            .unwrap_or_else(|| TextLabel::empty(TextLabel::DEFAULT_FONT_SIZE, SerializableColor::black()));
        let bounds = shape.bounds();
        let (rect, align) = if shape.is_text() {
            let rect = Rect::from_origin_size(
                bounds.origin(),
                (bounds.width().max(MIN_EDITOR_WIDTH), bounds.height().max(MIN_EDITOR_HEIGHT)),
            );
            (rect, TextAlign::Left)
        } else {
            (bounds, TextAlign::Center)
        };
        Self {
            rect,
            font_size: label.font_size,
            color: label.color,
            align,
            line_height: label.line_height(),
        }
    }
}

/// Keys the overlay forwards instead of inserting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    /// Soft line break.
    Enter,
    Escape,
    Tab,
    Backspace,
    Left,
    Right,
    Home,
    End,
}

/// An open edit of the label of shape `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSession {
    index: usize,
    original: String,
    buffer: String,
    /// Byte offset, always on a char boundary.
    cursor: usize,
    /// The empty label was added when the session opened.
    attached_label: bool,
}

impl TextSession {
    pub fn new(index: usize, text: &str) -> Self {
        Self {
            index,
            original: text.to_string(),
            buffer: text.to_string(),
            cursor: text.len(),
            attached_label: false,
        }
    }

    pub(crate) fn with_attached_label(mut self, attached: bool) -> Self {
        self.attached_label = attached;
        self
    }

    pub fn attached_label(&self) -> bool {
        self.attached_label
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_changed(&self) -> bool {
        self.buffer != self.original
    }

    pub fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    pub fn backspace(&mut self) {
        if let Some((at, _)) = self.buffer[..self.cursor].char_indices().next_back() {
            self.buffer.remove(at);
            self.cursor = at;
        }
    }

    pub fn move_left(&mut self) {
        if let Some((at, _)) = self.buffer[..self.cursor].char_indices().next_back() {
            self.cursor = at;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Start of the current line.
    pub fn move_home(&mut self) {
        self.cursor = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
    }

    /// End of the current line.
    pub fn move_end(&mut self) {
        self.cursor = self.buffer[self.cursor..]
            .find('\n')
            .map_or(self.buffer.len(), |i| self.cursor + i);
    }
}

/// Size of a fresh text box for `font_size`.
pub fn new_text_frame(center: Point, font_size: f64) -> Frame {
    let w = (font_size * 4.0).max(100.0);
    let h = (font_size + 10.0).max(30.0);
    Frame::centered(center, w, h)
}

impl Canvas {
    pub(crate) fn text_tool(&mut self, point: Point, fx: &mut EffectSink) {
        let (index, attached) = match hit_test(self.document.shapes(), point) {
            Some(index) => {
                let label = self.palette.empty_label();
                // Editing state only; attaching an empty label is not a change.
                let attached = self.document.mutate(index, |shape| {
                    let attach = shape.label.is_none();
                    if attach {
                        shape.label = Some(label);
                    }
                    attach
                });
                match attached {
                    Ok(attached) => (index, attached),
                    Err(err) => {
                        log::warn!("Text tool hit a stale index: {err}");
                        return;
                    }
                }
            }
            None => {
                self.checkpoint(fx);
                let frame = new_text_frame(point, self.palette.font_size);
                (self.document.append(Shape::text(frame, self.palette.empty_label())), false)
            }
        };
        self.open_text_editor(index, attached, fx);
    }

    fn open_text_editor(&mut self, index: usize, attached: bool, fx: &mut EffectSink) {
        let Ok(shape) = self.document.get(index) else {
            return;
        };
        let layout = OverlayLayout::for_shape(shape);
        let session = TextSession::new(index, shape.label_text()).with_attached_label(attached);
        let label_style = shape.label.as_ref().map(|label| (label.font_size, label.color));
        if self.document.set_selection(Some(index)).is_err() {
            return;
        }
        log::debug!("Text editor opened on shape {index}");
        self.text_session = Some(session);
        fx.push(Effect::OpenTextEditor(layout));

        // The toolbar shows the style of the label being edited.
        if let Some((font_size, text_color)) = label_style {
            let synced = Palette {
                font_size,
                text_color,
                ..self.palette
            };
            if synced != self.palette {
                self.palette = synced;
                fx.push(Effect::PaletteChanged(synced));
            }
        }
        fx.repaint();
    }

    /// Commit the open session, if any, and hide the editor.
    pub(crate) fn close_text_editor(&mut self, fx: &mut EffectSink) {
        let Some(session) = self.text_session.take() else {
            return;
        };
        let index = session.index();
        if session.is_changed() {
            self.checkpoint(fx);
            let committed = self.document.mutate(index, |shape| {
                if let Some(label) = shape.label.as_mut() {
                    label.content = session.text().to_string();
                }
            });
            if let Err(err) = committed {
                log::warn!("Dropping text edit: {err}");
            }
        } else if session.attached_label() {
            let detached = self.document.mutate(index, |shape| {
                if !shape.is_text() && shape.label.as_ref().is_some_and(|l| l.content.is_empty()) {
                    shape.label = None;
                }
            });
            if let Err(err) = detached {
                log::warn!("Failed to detach unused label: {err}");
            }
        }
        if self.document.get(index).is_ok_and(Shape::is_blank_text) {
            if !session.is_changed() {
                // Nothing recorded yet for the removal itself.
                self.checkpoint(fx);
            }
            if let Err(err) = self.document.remove_at(index) {
                log::warn!("Failed to remove empty text box: {err}");
            }
        }
        self.document.clear_selection();
        fx.push(Effect::CloseTextEditor);
        fx.repaint();
    }

    pub(crate) fn text_input(&mut self, text: &str) {
        if let Some(session) = self.text_session.as_mut() {
            session.insert(text);
        }
    }

    pub(crate) fn text_key(&mut self, key: TextKey, fx: &mut EffectSink) {
        let Some(session) = self.text_session.as_mut() else {
            return;
        };
        match key {
            TextKey::Enter => session.insert("\n"),
            TextKey::Escape | TextKey::Tab => self.close_text_editor(fx),
            TextKey::Backspace => session.backspace(),
            TextKey::Left => session.move_left(),
            TextKey::Right => session.move_right(),
            TextKey::Home => session.move_home(),
            TextKey::End => session.move_end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Event;
    use crate::settings::PaletteChange;
    use crate::shapes::{PrimitiveKind, ShapeStyle};
    use crate::tools::ToolKind;

    fn text_canvas() -> Canvas {
        let mut canvas = Canvas::new();
        canvas.handle(Event::SelectTool(ToolKind::Text));
        canvas
    }

    #[test]
    fn test_session_editing() {
        let mut session = TextSession::new(0, "ab");
        session.move_left();
        session.insert("é");
        assert_eq!(session.text(), "aéb");
        session.backspace();
        session.backspace();
        assert_eq!(session.text(), "b");
        session.move_home();
        session.backspace();
        assert_eq!(session.text(), "b");
        session.move_end();
        session.insert("\nxy");
        session.move_home();
        assert_eq!(session.cursor(), 2);
        session.move_right();
        session.move_end();
        assert_eq!(session.cursor(), session.text().len());
    }

    #[test]
    fn test_new_text_box_size() {
        let frame = new_text_frame(Point::new(100.0, 100.0), 18.0);
        assert_eq!(frame.normalized(), Rect::new(50.0, 85.0, 150.0, 115.0));
        let big = new_text_frame(Point::ZERO, 40.0);
        assert_eq!(big.normalized().size(), kurbo::Size::new(160.0, 50.0));
    }

    #[test]
    fn test_create_type_and_commit() {
        let mut canvas = text_canvas();
        let effects = canvas.handle(Event::PointerDown(Point::new(100.0, 100.0)));
        let Some(Effect::OpenTextEditor(layout)) = effects.first() else {
            panic!("editor not opened: {effects:?}");
        };
        assert_eq!(layout.align, TextAlign::Left);
        assert!((layout.line_height - 21.6).abs() < 1e-9);
        assert_eq!(canvas.document.selection(), Some(0));

        canvas.handle(Event::TextInput("Hi".into()));
        canvas.handle(Event::TextKey(TextKey::Enter));
        canvas.handle(Event::TextInput("You".into()));
        assert_eq!(canvas.text_session().map(TextSession::text), Some("Hi\nYou"));

        let effects = canvas.handle(Event::TextBlur);
        assert!(effects.contains(&Effect::CloseTextEditor));
        assert!(canvas.text_session().is_none());
        assert_eq!(canvas.document.selection(), None);
        assert_eq!(canvas.document.shapes()[0].label_text(), "Hi\nYou");

        // Creation and commit are separate undo steps.
        canvas.handle(Event::Undo);
        assert_eq!(canvas.document.shapes()[0].label_text(), "");
        canvas.handle(Event::Undo);
        assert!(canvas.document.is_empty());
    }

    #[test]
    fn test_empty_text_box_removed_on_close() {
        let mut canvas = text_canvas();
        canvas.handle(Event::PointerDown(Point::new(100.0, 100.0)));
        canvas.handle(Event::TextInput("   ".into()));
        canvas.handle(Event::TextKey(TextKey::Escape));
        assert!(canvas.document.is_empty());

        canvas.handle(Event::PointerDown(Point::new(300.0, 300.0)));
        canvas.handle(Event::TextKey(TextKey::Tab));
        assert!(canvas.document.is_empty());
        assert!(!canvas.history.can_redo());
    }

    #[test]
    fn test_label_on_existing_shape() {
        let mut canvas = text_canvas();
        let rect = Shape::primitive(PrimitiveKind::Rect, Frame::new(0.0, 0.0, 200.0, 100.0), ShapeStyle::default());
        canvas.document.append(rect);

        let effects = canvas.handle(Event::PointerDown(Point::new(100.0, 50.0)));
        assert!(!canvas.history.can_undo());
        let Some(Effect::OpenTextEditor(layout)) = effects.first() else {
            panic!("editor not opened: {effects:?}");
        };
        assert_eq!(layout.align, TextAlign::Center);
        assert_eq!(layout.rect, Rect::new(0.0, 0.0, 200.0, 100.0));

        canvas.handle(Event::TextInput("Box".into()));
        // A press elsewhere closes and commits first.
        canvas.handle(Event::PointerDown(Point::new(500.0, 500.0)));
        assert_eq!(canvas.document.shapes()[0].label_text(), "Box");
        assert_eq!(canvas.document.shapes()[0].type_name(), "rect");
        assert_eq!(canvas.document.count(), 2);
    }

    #[test]
    fn test_undo_ignored_while_editing() {
        let mut canvas = text_canvas();
        canvas.handle(Event::PointerDown(Point::new(100.0, 100.0)));
        let effects = canvas.handle(Event::Undo);
        assert!(effects.is_empty());
        assert_eq!(canvas.document.count(), 1);
        assert!(canvas.text_session().is_some());
    }

    #[test]
    fn test_palette_restyles_open_label() {
        let mut canvas = text_canvas();
        canvas.handle(Event::PointerDown(Point::new(100.0, 100.0)));
        let effects = canvas.handle(Event::SetPalette(PaletteChange::FontSize(30.0)));
        let update = effects.iter().find_map(|e| match e {
            Effect::UpdateTextEditor(layout) => Some(layout),
            _ => None,
        });
        assert_eq!(update.map(|l| l.font_size), Some(30.0));
        assert_eq!(canvas.document.shapes()[0].label.as_ref().map(|l| l.font_size), Some(30.0));
    }

    #[test]
    fn test_restyle_changes_only_the_edited_property() {
        let red = SerializableColor::rgb(255, 0, 0);
        let mut canvas = text_canvas();
        canvas.handle(Event::PointerDown(Point::new(100.0, 100.0)));
        canvas.handle(Event::SetPalette(PaletteChange::TextColor(red)));
        canvas.handle(Event::TextInput("Hi".into()));
        canvas.handle(Event::TextBlur);

        // Nothing selected: the palette moves on, the box keeps its color.
        canvas.handle(Event::SetPalette(PaletteChange::TextColor(SerializableColor::black())));
        assert_eq!(canvas.document.shapes()[0].label.as_ref().map(|l| l.color), Some(red));

        canvas.handle(Event::PointerDown(Point::new(100.0, 100.0)));
        canvas.handle(Event::SetPalette(PaletteChange::FontSize(30.0)));
        let label = canvas.document.shapes()[0].label.clone().unwrap();
        assert_eq!(label.font_size, 30.0);
        assert_eq!(label.color, red);
    }

    #[test]
    fn test_opening_editor_syncs_palette_to_label() {
        let blue = SerializableColor::rgb(0, 0, 255);
        let mut canvas = text_canvas();
        let label = TextLabel::new("Note".to_string(), 24.0, blue);
        canvas.document.append(Shape::text(Frame::new(0.0, 0.0, 120.0, 40.0), label));

        let effects = canvas.handle(Event::PointerDown(Point::new(60.0, 20.0)));
        assert_eq!(canvas.palette.font_size, 24.0);
        assert_eq!(canvas.palette.text_color, blue);
        assert!(effects.contains(&Effect::PaletteChanged(canvas.palette)));
        // Stroke settings are not part of the label.
        assert_eq!(canvas.palette.stroke_width, Palette::default().stroke_width);

        // Reopening with the palette already in sync reports nothing new.
        canvas.handle(Event::TextBlur);
        let effects = canvas.handle(Event::PointerDown(Point::new(60.0, 20.0)));
        assert!(!effects.iter().any(|e| matches!(e, Effect::PaletteChanged(_))));
    }

    #[test]
    fn test_unchanged_edit_leaves_shape_as_it_was() {
        let mut canvas = text_canvas();
        let rect = Shape::primitive(PrimitiveKind::Rect, Frame::new(0.0, 0.0, 200.0, 100.0), ShapeStyle::default());
        canvas.document.append(rect);
        let before = serde_json::to_value(canvas.document.shapes()).unwrap();

        canvas.handle(Event::PointerDown(Point::new(100.0, 50.0)));
        assert!(canvas.text_session().is_some_and(TextSession::attached_label));
        canvas.handle(Event::TextInput("x".into()));
        canvas.handle(Event::TextKey(TextKey::Backspace));
        canvas.handle(Event::TextKey(TextKey::Escape));

        assert_eq!(serde_json::to_value(canvas.document.shapes()).unwrap(), before);
        assert!(canvas.document.shapes()[0].label.is_none());
        assert!(!canvas.history.can_undo());
    }

    #[test]
    fn test_existing_empty_label_is_kept() {
        let mut canvas = text_canvas();
        let rect = Shape::primitive(PrimitiveKind::Rect, Frame::new(0.0, 0.0, 200.0, 100.0), ShapeStyle::default())
            .with_label(TextLabel::empty(18.0, SerializableColor::black()));
        canvas.document.append(rect);

        canvas.handle(Event::PointerDown(Point::new(100.0, 50.0)));
        assert!(!canvas.text_session().is_some_and(TextSession::attached_label));
        canvas.handle(Event::TextBlur);
        assert!(canvas.document.shapes()[0].label.is_some());
    }
}
