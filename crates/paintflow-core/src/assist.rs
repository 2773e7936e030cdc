//! Assist tools: one-click heuristics that complete, recolor or tidy shapes.

use crate::canvas::{Canvas, CanvasDocument, ModelError};
use crate::input::EffectSink;
use crate::picking::hit_test;
use crate::rng::SimpleRng;
use crate::shapes::{Frame, Geometry, PrimitiveKind, SerializableColor, Shape, ShapeStyle};
use kurbo::{Point, Rect};

/// Fill colors handed out by [`colorize`].
pub const SMART_COLORS: [SerializableColor; 7] = [
    SerializableColor::from_u32(0xff6b6b),
    SerializableColor::from_u32(0x4ecdc4),
    SerializableColor::from_u32(0x45b7d1),
    SerializableColor::from_u32(0x96ceb4),
    SerializableColor::from_u32(0xfeca57),
    SerializableColor::from_u32(0xff9ff3),
    SerializableColor::from_u32(0x54a0ff),
];
const COLORIZE_STROKE: SerializableColor = SerializableColor::from_u32(0x333333);

/// (stroke, fill, width) bundles handed out by [`restyle`].
pub const STYLE_BUNDLES: [(SerializableColor, SerializableColor, f64); 4] = [
    (SerializableColor::from_u32(0xff0000), SerializableColor::from_u32(0xffcccc), 4.0),
    (SerializableColor::from_u32(0x0000ff), SerializableColor::from_u32(0xccccff), 3.0),
    (SerializableColor::from_u32(0x00ff00), SerializableColor::from_u32(0xccffcc), 5.0),
    (SerializableColor::from_u32(0xff00ff), SerializableColor::from_u32(0xffccff), 2.0),
];

/// Side of the shapes created when nothing was clicked.
pub const STAMP_SIZE: f64 = 50.0;
const CLOSE_DISTANCE: f64 = 50.0;
const CLOSE_JITTER: f64 = 20.0;
const MIN_LINE_LENGTH: f64 = 30.0;
const MIN_ENHANCED_WIDTH: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistTool {
    AutoComplete,
    Colorize,
    Enhance,
    Generate,
    Style,
}

impl AssistTool {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "aiAutoComplete" => Some(AssistTool::AutoComplete),
            "aiColorize" => Some(AssistTool::Colorize),
            "aiEnhance" => Some(AssistTool::Enhance),
            "aiGenerate" => Some(AssistTool::Generate),
            "aiStyle" => Some(AssistTool::Style),
            _ => None,
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            AssistTool::AutoComplete => "AI completed your shape!",
            AssistTool::Colorize => "AI applied smart colors!",
            AssistTool::Enhance => "AI enhanced your drawing!",
            AssistTool::Generate => "AI generated a new shape!",
            AssistTool::Style => "AI applied artistic style!",
        }
    }

    /// Message shown when a tool that needs a target hits nothing.
    pub fn miss_message(self) -> Option<&'static str> {
        match self {
            AssistTool::Colorize => Some("No shape found to colorize"),
            AssistTool::Enhance => Some("No shape found to enhance"),
            AssistTool::Style => Some("No shape found to style"),
            AssistTool::AutoComplete | AssistTool::Generate => None,
        }
    }
}

/// What a path most resembles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Square,
    Circle,
    Freeform,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathAnalysis {
    pub class: PathClass,
    pub bounds: Rect,
}

/// Classify a freehand path as a square, a circle or neither.
///
/// A square needs a near-equal aspect ratio, both sides above 20, and a point
/// near each corner of its bounds. A circle needs more than 60% of its points
/// within 40% of the expected radius. The square test runs first.
pub fn classify_path(points: &[Point]) -> PathAnalysis {
    if points.len() < 3 {
        return PathAnalysis {
            class: PathClass::Freeform,
            bounds: Rect::ZERO,
        };
    }
    let first = Rect::from_points(points[0], points[0]);
    let bounds = points.iter().fold(first, |r, &p| r.union_pt(p));
    let (w, h) = (bounds.width(), bounds.height());
    let longest = w.max(h);
    let center = bounds.center();

    let aspect = if longest > 0.0 { (w - h).abs() / longest } else { 0.0 };
    let corner_reach = longest * 0.1;
    let corners = [
        Point::new(bounds.x0, bounds.y0),
        Point::new(bounds.x1, bounds.y0),
        Point::new(bounds.x1, bounds.y1),
        Point::new(bounds.x0, bounds.y1),
    ];
    let has_corners = corners
        .iter()
        .all(|c| points.iter().any(|p| p.distance(*c) <= corner_reach));
    let is_square = aspect < 0.3 && w > 20.0 && h > 20.0 && has_corners;

    let radius = longest / 2.0;
    let on_circle = points
        .iter()
        .filter(|p| radius > 0.0 && (p.distance(center) - radius).abs() / radius < 0.4)
        .count();
    let is_circle = on_circle as f64 / points.len() as f64 > 0.6 && radius > 15.0;

    let class = if is_square {
        PathClass::Square
    } else if is_circle {
        PathClass::Circle
    } else {
        PathClass::Freeform
    };
    log::debug!("Path of {} points classified as {class:?} (aspect {aspect:.2})", points.len());
    PathAnalysis { class, bounds }
}

/// Three-point moving average; the endpoints stay put.
pub fn smooth_path(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut smoothed = Vec::with_capacity(points.len());
    smoothed.push(points[0]);
    for window in points.windows(3) {
        let sum = window[0].to_vec2() + window[1].to_vec2() + window[2].to_vec2();
        smoothed.push((sum / 3.0).to_point());
    }
    smoothed.push(points[points.len() - 1]);
    smoothed
}

/// Square frame with the longer side of `rect`, on the same center.
fn perfect_frame(rect: Rect) -> Frame {
    let size = rect.width().max(rect.height());
    Frame::centered(rect.center(), size, size)
}

/// Geometry auto-complete turns `geometry` into, if anything.
fn completed_geometry(geometry: &Geometry, rng: &mut SimpleRng) -> Option<Geometry> {
    match geometry {
        Geometry::Primitive { kind, frame } => {
            let kind = match kind {
                PrimitiveKind::Rect | PrimitiveKind::Square => PrimitiveKind::Square,
                PrimitiveKind::Ellipse | PrimitiveKind::Circle => PrimitiveKind::Circle,
                _ => return None,
            };
            Some(Geometry::Primitive {
                kind,
                frame: perfect_frame(frame.normalized()),
            })
        }
        Geometry::Path(points) if points.len() > 2 => {
            let analysis = classify_path(points);
            let kind = match analysis.class {
                PathClass::Square => PrimitiveKind::Square,
                PathClass::Circle => PrimitiveKind::Circle,
                PathClass::Freeform => return Some(Geometry::Path(close_path(points, rng))),
            };
            Some(Geometry::Primitive {
                kind,
                frame: perfect_frame(analysis.bounds),
            })
        }
        Geometry::Line(segment) if segment.length() > MIN_LINE_LENGTH => {
            let length = segment.length();
            let mid = segment.midpoint();
            let apex = Point::new(mid.x + rng.jitter(length), mid.y + rng.jitter(length));
            Some(Geometry::Path(vec![segment.start, segment.end, apex, segment.start]))
        }
        _ => None,
    }
}

fn close_path(points: &[Point], rng: &mut SimpleRng) -> Vec<Point> {
    let mut closed = points.to_vec();
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return closed;
    };
    if first.distance(last) >= CLOSE_DISTANCE {
        let mid = first.midpoint(last);
        closed.push(Point::new(mid.x + rng.jitter(CLOSE_JITTER), mid.y + rng.jitter(CLOSE_JITTER)));
    }
    closed.push(first);
    closed
}

/// Perfect, classify, close or extend the shape at `target`; stamp a square
/// at `point` when there is none.
pub fn auto_complete(
    document: &mut CanvasDocument,
    target: Option<usize>,
    point: Point,
    style: ShapeStyle,
    rng: &mut SimpleRng,
) -> Result<(), ModelError> {
    let Some(index) = target else {
        let frame = Frame::centered(point, STAMP_SIZE, STAMP_SIZE);
        document.append(Shape::primitive(PrimitiveKind::Square, frame, style));
        return Ok(());
    };
    document.mutate(index, |shape| {
        if let Some(geometry) = completed_geometry(&shape.geometry, rng) {
            shape.geometry = geometry;
        }
    })
}

pub fn colorize(shape: &mut Shape, rng: &mut SimpleRng) {
    shape.style.set_fill(rng.choose(&SMART_COLORS).copied());
    shape.style.stroke_color = COLORIZE_STROKE;
}

pub fn restyle(shape: &mut Shape, rng: &mut SimpleRng) {
    if let Some(&(stroke, fill, width)) = rng.choose(&STYLE_BUNDLES) {
        shape.style = ShapeStyle::new(stroke, Some(fill), width);
    }
}

pub fn enhance(shape: &mut Shape) {
    if let Geometry::Path(points) = &mut shape.geometry {
        *points = smooth_path(points);
    }
    shape.style.stroke_width = shape.style.stroke_width.max(MIN_ENHANCED_WIDTH);
}

/// The fixed circle produced by the generate tool.
pub fn generated_shape(point: Point) -> Shape {
    let style = ShapeStyle::new(
        SerializableColor::from_u32(0xff0000),
        Some(SerializableColor::from_u32(0xffcccc)),
        3.0,
    );
    Shape::primitive(PrimitiveKind::Circle, Frame::centered(point, STAMP_SIZE, STAMP_SIZE), style)
}

impl Canvas {
    pub(crate) fn run_assist(&mut self, tool: AssistTool, point: Point, fx: &mut EffectSink) {
        let target = hit_test(self.document.shapes(), point);
        if let (Some(message), None) = (tool.miss_message(), target) {
            self.notify(message, fx);
            return;
        }
        self.checkpoint(fx);
        let rng = &mut self.rng;
        let result = match (tool, target) {
            (AssistTool::AutoComplete, _) => {
                auto_complete(&mut self.document, target, point, self.palette.shape_style(), rng)
            }
            (AssistTool::Generate, _) => {
                self.document.append(generated_shape(point));
                Ok(())
            }
            (AssistTool::Colorize, Some(index)) => self.document.mutate(index, |s| colorize(s, rng)),
            (AssistTool::Style, Some(index)) => self.document.mutate(index, |s| restyle(s, rng)),
            (AssistTool::Enhance, Some(index)) => self.document.mutate(index, enhance),
            (_, None) => Ok(()),
        };
        match result {
            Ok(()) => self.notify(tool.success_message(), fx),
            Err(err) => log::warn!("{tool:?} skipped: {err}"),
        }
        fx.repaint();
    }
}
