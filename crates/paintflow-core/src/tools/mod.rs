//! Tool selection and the pointer gesture state machine.

mod eraser;

pub use eraser::{EraserStroke, erase_at};

use crate::assist::AssistTool;
use crate::canvas::Canvas;
use crate::input::EffectSink;
use crate::picking::hit_test;
use crate::shapes::{CurvePhase, Frame, Geometry, PrimitiveKind, QuadCurve, Shape};
use kurbo::Point;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Line,
    Arrow,
    /// Two-phase quadratic curve: drag the end point, then the control point.
    Curve,
    Shape(PrimitiveKind),
    Text,
    Select,
    Fill,
    Stroke,
    Assist(AssistTool),
}

impl ToolKind {
    /// Resolve a toolbar identifier such as `"brush"`, `"star5"` or `"aiColorize"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let tool = match name {
            "brush" => ToolKind::Brush,
            "eraser" => ToolKind::Eraser,
            "line" => ToolKind::Line,
            "arrow" => ToolKind::Arrow,
            "curve" => ToolKind::Curve,
            "text" => ToolKind::Text,
            "select" => ToolKind::Select,
            "fill" => ToolKind::Fill,
            "stroke" => ToolKind::Stroke,
            other => match AssistTool::from_name(other) {
                Some(assist) => ToolKind::Assist(assist),
                None => ToolKind::Shape(PrimitiveKind::from_name(other)?),
            },
        };
        Some(tool)
    }

    /// Whether pressing with this tool creates or changes shapes.
    pub fn is_drawing_tool(self) -> bool {
        matches!(
            self,
            ToolKind::Brush | ToolKind::Eraser | ToolKind::Line | ToolKind::Arrow | ToolKind::Curve | ToolKind::Shape(_)
        )
    }
}

/// The in-progress pointer interaction.
#[derive(Debug, Clone, Default)]
pub(crate) enum Gesture {
    #[default]
    Idle,
    /// Dragging shape `index` (brush, line, arrow or a frame primitive).
    Drawing { index: usize },
    /// Building curve `index`; `pressed` is false between its two drags.
    Curve { index: usize, pressed: bool },
    Erasing(EraserStroke),
}

impl Canvas {
    pub(crate) fn select_tool(&mut self, tool: ToolKind, fx: &mut EffectSink) {
        self.close_text_editor(fx);
        self.gesture = Gesture::Idle;
        if self.tool != tool {
            log::debug!("Tool changed: {:?} -> {:?}", self.tool, tool);
        }
        self.tool = tool;
    }

    fn start_shape(&mut self, shape: Shape, fx: &mut EffectSink) -> usize {
        self.checkpoint(fx);
        fx.repaint();
        self.document.append(shape)
    }

    pub(crate) fn pointer_down(&mut self, point: Point, fx: &mut EffectSink) {
        if self.text_session.is_some() {
            self.close_text_editor(fx);
        }

        // Second press of a curve places its control point.
        if let Gesture::Curve { index, pressed: false } = self.gesture {
            let placed = self.document.mutate(index, |shape| match &mut shape.geometry {
                Geometry::Curve(curve) if curve.phase == CurvePhase::Control => {
                    curve.control = point;
                    true
                }
                _ => false,
            });
            match placed {
                Ok(true) => {
                    self.gesture = Gesture::Curve { index, pressed: true };
                    fx.repaint();
                    return;
                }
                Ok(false) => {}
                Err(err) => log::warn!("Abandoning curve gesture: {err}"),
            }
            self.gesture = Gesture::Idle;
        }

        let style = self.palette.shape_style();
        match self.tool {
            ToolKind::Brush => {
                let index = self.start_shape(Shape::path(vec![point], style), fx);
                self.gesture = Gesture::Drawing { index };
            }
            ToolKind::Eraser => {
                self.checkpoint(fx);
                let width = if self.palette.stroke_width > 0.0 {
                    self.palette.stroke_width
                } else {
                    self.settings.eraser_width
                };
                self.gesture = Gesture::Erasing(EraserStroke::new(point, width));
            }
            ToolKind::Line => {
                let index = self.start_shape(Shape::line(point, point, style), fx);
                self.gesture = Gesture::Drawing { index };
            }
            ToolKind::Arrow => {
                let index = self.start_shape(Shape::arrow(point, point, style), fx);
                self.gesture = Gesture::Drawing { index };
            }
            ToolKind::Curve => {
                let index = self.start_shape(Shape::curve(QuadCurve::at(point), style), fx);
                self.gesture = Gesture::Curve { index, pressed: true };
            }
            ToolKind::Shape(kind) => {
                let index = self.start_shape(Shape::primitive(kind, Frame::at(point), style), fx);
                self.gesture = Gesture::Drawing { index };
            }
            ToolKind::Text => self.text_tool(point, fx),
            ToolKind::Select => {
                let hit = hit_test(self.document.shapes(), point);
                self.select(hit);
                fx.repaint();
            }
            ToolKind::Fill | ToolKind::Stroke => self.recolor(point, fx),
            ToolKind::Assist(tool) => self.run_assist(tool, point, fx),
        }
    }

    pub(crate) fn pointer_move(&mut self, point: Point, fx: &mut EffectSink) {
        let result = match &mut self.gesture {
            Gesture::Idle | Gesture::Curve { pressed: false, .. } => return,
            Gesture::Drawing { index } | Gesture::Curve { index, pressed: true } => {
                let index = *index;
                self.document.mutate(index, |shape| shape.drag_to(point)).map(|_| ())
            }
            Gesture::Erasing(stroke) => {
                stroke.push(point);
                let radius = stroke.radius();
                erase_at(&mut self.document, point, radius).map(|_| ())
            }
        };
        match result {
            Ok(()) => fx.repaint(),
            Err(err) => {
                log::warn!("Abandoning gesture: {err}");
                self.gesture = Gesture::Idle;
            }
        }
    }

    pub(crate) fn pointer_up(&mut self, fx: &mut EffectSink) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Curve { index, pressed: true } => {
                let phase = self.document.mutate(index, |shape| match &mut shape.geometry {
                    Geometry::Curve(curve) => {
                        let was = curve.phase;
                        curve.phase = CurvePhase::Control;
                        Some(was)
                    }
                    _ => None,
                });
                // The first release keeps the curve open for its control point.
                if let Ok(Some(CurvePhase::Endpoint)) = phase {
                    self.gesture = Gesture::Curve { index, pressed: false };
                }
                fx.repaint();
            }
            Gesture::Curve { index, pressed: false } => {
                self.gesture = Gesture::Curve { index, pressed: false };
            }
            Gesture::Idle => {}
            Gesture::Drawing { .. } | Gesture::Erasing(_) => fx.repaint(),
        }
    }

    fn select(&mut self, index: Option<usize>) {
        if let Err(err) = self.document.set_selection(index) {
            log::warn!("Ignoring selection: {err}");
        }
    }

    fn recolor(&mut self, point: Point, fx: &mut EffectSink) {
        let Some(index) = hit_test(self.document.shapes(), point) else {
            return;
        };
        self.checkpoint(fx);
        let tool = self.tool;
        let palette = self.palette;
        let result = self.document.mutate(index, |shape| match tool {
            ToolKind::Fill => shape.style.set_fill(palette.fill()),
            _ => shape.style.stroke_color = palette.stroke_color,
        });
        if let Err(err) = result {
            log::warn!("Recolor failed: {err}");
            return;
        }
        self.select(Some(index));
        fx.repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Effect, Event};
    use crate::settings::PaletteChange;
    use crate::shapes::SerializableColor;

    fn press_drag_release(canvas: &mut Canvas, from: Point, to: Point) {
        canvas.handle(Event::PointerDown(from));
        canvas.handle(Event::PointerMove(to));
        canvas.handle(Event::PointerUp);
    }

    fn canvas_with(tool: ToolKind) -> Canvas {
        let mut canvas = Canvas::new().with_seed(1);
        canvas.handle(Event::SelectTool(tool));
        canvas
    }

    #[test]
    fn test_tool_names() {
        assert_eq!(ToolKind::from_name("brush"), Some(ToolKind::Brush));
        assert_eq!(ToolKind::from_name("star6"), Some(ToolKind::Shape(PrimitiveKind::Star6)));
        assert_eq!(ToolKind::from_name("aiGenerate"), Some(ToolKind::Assist(AssistTool::Generate)));
        assert_eq!(ToolKind::from_name("lasso"), None);
    }

    #[test]
    fn test_brush_stroke() {
        let mut canvas = canvas_with(ToolKind::Brush);
        let effects = canvas.handle(Event::PointerDown(Point::new(0.0, 0.0)));
        assert!(effects.contains(&Effect::HistoryChanged {
            can_undo: true,
            can_redo: false
        }));
        canvas.handle(Event::PointerMove(Point::new(5.0, 5.0)));
        canvas.handle(Event::PointerMove(Point::new(10.0, 5.0)));
        canvas.handle(Event::PointerUp);
        assert!(!canvas.is_drawing());
        assert!(matches!(&canvas.document.shapes()[0].geometry, Geometry::Path(p) if p.len() == 3));

        // Moves after release do nothing.
        canvas.handle(Event::PointerMove(Point::new(50.0, 50.0)));
        assert!(matches!(&canvas.document.shapes()[0].geometry, Geometry::Path(p) if p.len() == 3));
    }

    #[test]
    fn test_rect_drag_keeps_signed_frame() {
        let mut canvas = canvas_with(ToolKind::Shape(PrimitiveKind::Rect));
        press_drag_release(&mut canvas, Point::new(110.0, 60.0), Point::new(10.0, 10.0));
        let shape = &canvas.document.shapes()[0];
        assert_eq!(shape.geometry.frame(), Some(&Frame::new(110.0, 60.0, -100.0, -50.0)));
        assert_eq!(shape.bounds(), kurbo::Rect::new(10.0, 10.0, 110.0, 60.0));
    }

    #[test]
    fn test_line_and_arrow() {
        let mut canvas = canvas_with(ToolKind::Arrow);
        press_drag_release(&mut canvas, Point::new(0.0, 0.0), Point::new(40.0, 30.0));
        match &canvas.document.shapes()[0].geometry {
            Geometry::Arrow(s) => {
                assert_eq!(s.start, Point::new(0.0, 0.0));
                assert_eq!(s.end, Point::new(40.0, 30.0));
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_curve_two_phase() {
        let mut canvas = canvas_with(ToolKind::Curve);
        press_drag_release(&mut canvas, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(canvas.is_drawing());

        // Hover between the drags changes nothing.
        canvas.handle(Event::PointerMove(Point::new(70.0, 70.0)));
        press_drag_release(&mut canvas, Point::new(50.0, -10.0), Point::new(50.0, -60.0));
        assert!(!canvas.is_drawing());
        assert_eq!(canvas.document.count(), 1);
        assert_eq!(canvas.history.undo_len(), 1);
        match &canvas.document.shapes()[0].geometry {
            Geometry::Curve(c) => {
                assert_eq!(c.end, Point::new(100.0, 0.0));
                assert_eq!(c.control, Point::new(50.0, -60.0));
                assert_eq!(c.phase, CurvePhase::Control);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_select_has_no_snapshot() {
        let mut canvas = canvas_with(ToolKind::Shape(PrimitiveKind::Rect));
        press_drag_release(&mut canvas, Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        canvas.handle(Event::SelectTool(ToolKind::Select));
        let undo_len = canvas.history.undo_len();
        canvas.handle(Event::PointerDown(Point::new(25.0, 25.0)));
        assert_eq!(canvas.document.selection(), Some(0));
        canvas.handle(Event::PointerDown(Point::new(400.0, 400.0)));
        assert_eq!(canvas.document.selection(), None);
        assert_eq!(canvas.history.undo_len(), undo_len);
    }

    #[test]
    fn test_fill_tool_recolors_hit() {
        let mut canvas = canvas_with(ToolKind::Shape(PrimitiveKind::Ellipse));
        press_drag_release(&mut canvas, Point::new(0.0, 0.0), Point::new(100.0, 60.0));
        canvas.handle(Event::SetPalette(PaletteChange::FillColor(SerializableColor::rgb(0, 255, 0))));
        canvas.handle(Event::SelectTool(ToolKind::Fill));
        canvas.handle(Event::PointerDown(Point::new(50.0, 30.0)));
        let shape = &canvas.document.shapes()[0];
        assert_eq!(shape.style.fill_color, Some(SerializableColor::rgb(0, 255, 0)));
        assert_eq!(canvas.document.selection(), Some(0));

        // Missing the shape neither snapshots nor recolors.
        let undo_len = canvas.history.undo_len();
        canvas.handle(Event::PointerDown(Point::new(500.0, 500.0)));
        assert_eq!(canvas.history.undo_len(), undo_len);
    }

    #[test]
    fn test_stroke_tool() {
        let mut canvas = canvas_with(ToolKind::Line);
        press_drag_release(&mut canvas, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        canvas.handle(Event::SetPalette(PaletteChange::StrokeColor(SerializableColor::rgb(9, 9, 9))));
        canvas.handle(Event::SelectTool(ToolKind::Stroke));
        canvas.handle(Event::PointerDown(Point::new(50.0, 1.0)));
        assert_eq!(canvas.document.shapes()[0].style.stroke_color, SerializableColor::rgb(9, 9, 9));
    }

    #[test]
    fn test_redo_cleared_by_new_gesture() {
        let mut canvas = canvas_with(ToolKind::Brush);
        press_drag_release(&mut canvas, Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        canvas.handle(Event::Undo);
        assert!(canvas.history.can_redo());
        press_drag_release(&mut canvas, Point::new(10.0, 0.0), Point::new(15.0, 5.0));
        assert!(!canvas.history.can_redo());
    }

    #[test]
    fn test_undo_mid_gesture_abandons_it() {
        let mut canvas = canvas_with(ToolKind::Brush);
        canvas.handle(Event::PointerDown(Point::new(0.0, 0.0)));
        canvas.handle(Event::Undo);
        assert!(canvas.document.is_empty());
        canvas.handle(Event::PointerMove(Point::new(3.0, 3.0)));
        assert!(canvas.document.is_empty());
        assert!(!canvas.is_drawing());
    }
}
