//! Shape definitions for the drawing surface.

mod color;
mod kind;
mod record;

pub use color::{ColorParseError, SerializableColor};
pub use kind::PrimitiveKind;
pub use record::ShapeError;

use crate::geometry::{self, Outline};
use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Style properties shared by every shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub stroke_color: SerializableColor,
    /// `None` means no fill.
    pub fill_color: Option<SerializableColor>,
    /// Raw stored width. Zero renders as [`ShapeStyle::DEFAULT_STROKE_WIDTH`].
    pub stroke_width: f64,
}

impl ShapeStyle {
    pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
    /// Stroke color assumed for records that carry none.
    pub const DEFAULT_STROKE: SerializableColor = SerializableColor::from_u32(0x222222);

    pub fn new(stroke_color: SerializableColor, fill_color: Option<SerializableColor>, stroke_width: f64) -> Self {
        Self {
            stroke_color,
            fill_color: fill_color.filter(|c| !c.is_transparent()),
            stroke_width,
        }
    }

    /// Width used for rendering and picking.
    pub fn effective_stroke_width(&self) -> f64 {
        if self.stroke_width > 0.0 {
            self.stroke_width
        } else {
            Self::DEFAULT_STROKE_WIDTH
        }
    }

    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(Color::from)
    }

    pub fn set_fill(&mut self, color: Option<SerializableColor>) {
        self.fill_color = color.filter(|c| !c.is_transparent());
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STROKE, None, Self::DEFAULT_STROKE_WIDTH)
    }
}

/// Text carried by a shape.
///
/// For `text` shapes this is the primary content; on any other shape it is a
/// centered caption.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub content: String,
    pub font_size: f64,
    pub color: SerializableColor,
}

impl TextLabel {
    pub const DEFAULT_FONT_SIZE: f64 = 18.0;
    pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

    pub fn new(content: impl Into<String>, font_size: f64, color: SerializableColor) -> Self {
        Self {
            content: content.into(),
            font_size,
            color,
        }
    }

    pub fn empty(font_size: f64, color: SerializableColor) -> Self {
        Self::new(String::new(), font_size, color)
    }

    pub fn line_height(&self) -> f64 {
        self.font_size * Self::LINE_HEIGHT_FACTOR
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A signed box: origin plus width/height that may be negative when the
/// user dragged up or left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// A zero-sized frame anchored at `point`.
    pub fn at(point: Point) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    /// A frame of the given size centered on `center`.
    pub fn centered(center: Point, w: f64, h: f64) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Stretch the far corner to `point`, keeping the origin.
    pub fn drag_to(&mut self, point: Point) {
        self.w = point.x - self.x;
        self.h = point.y - self.y;
    }

    /// Min-corner rect with non-negative size.
    pub fn normalized(&self) -> Rect {
        Rect::from_points(self.origin(), Point::new(self.x + self.w, self.y + self.h))
    }
}

/// Construction phase of a quadratic curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurvePhase {
    /// The end point is being dragged.
    #[default]
    Endpoint,
    /// The control point is being placed.
    Control,
}

impl CurvePhase {
    pub fn as_u8(self) -> u8 {
        match self {
            CurvePhase::Endpoint => 0,
            CurvePhase::Control => 1,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        if value == 0 {
            CurvePhase::Endpoint
        } else {
            CurvePhase::Control
        }
    }
}

/// A two-point segment used by lines and arrows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }
}

/// A quadratic curve defined by start, end and control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadCurve {
    pub start: Point,
    pub end: Point,
    pub control: Point,
    pub phase: CurvePhase,
}

impl QuadCurve {
    /// A degenerate curve with every point at `point`.
    pub fn at(point: Point) -> Self {
        Self {
            start: point,
            end: point,
            control: point,
            phase: CurvePhase::Endpoint,
        }
    }
}

/// Variant-specific geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Freehand polyline with at least one point.
    Path(Vec<Point>),
    Line(Segment),
    Arrow(Segment),
    Curve(QuadCurve),
    /// Standalone text box.
    Text(Frame),
    Primitive { kind: PrimitiveKind, frame: Frame },
}

impl Geometry {
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Geometry::Text(frame) | Geometry::Primitive { frame, .. } => Some(frame),
            _ => None,
        }
    }
}

/// A drawable shape: geometry, style and an optional text label.
///
/// Serialized through the flat record format used by stored drawings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "record::ShapeRecord", into = "record::ShapeRecord")]
pub struct Shape {
    pub geometry: Geometry,
    pub style: ShapeStyle,
    pub label: Option<TextLabel>,
}

impl Shape {
    pub fn new(geometry: Geometry, style: ShapeStyle) -> Self {
        Self {
            geometry,
            style,
            label: None,
        }
    }

    pub fn path(points: Vec<Point>, style: ShapeStyle) -> Self {
        Self::new(Geometry::Path(points), style)
    }

    pub fn line(start: Point, end: Point, style: ShapeStyle) -> Self {
        Self::new(Geometry::Line(Segment::new(start, end)), style)
    }

    pub fn arrow(start: Point, end: Point, style: ShapeStyle) -> Self {
        Self::new(Geometry::Arrow(Segment::new(start, end)), style)
    }

    pub fn curve(curve: QuadCurve, style: ShapeStyle) -> Self {
        Self::new(Geometry::Curve(curve), style)
    }

    pub fn primitive(kind: PrimitiveKind, frame: Frame, style: ShapeStyle) -> Self {
        Self::new(Geometry::Primitive { kind, frame }, style)
    }

    /// A text box. Text boxes have no visible stroke or fill of their own.
    pub fn text(frame: Frame, label: TextLabel) -> Self {
        Self {
            geometry: Geometry::Text(frame),
            style: ShapeStyle::new(SerializableColor::transparent(), None, 0.0),
            label: Some(label),
        }
    }

    pub fn with_label(mut self, label: TextLabel) -> Self {
        self.label = Some(label);
        self
    }

    /// Wire type tag.
    pub fn type_name(&self) -> &'static str {
        match &self.geometry {
            Geometry::Path(_) => "path",
            Geometry::Line(_) => "line",
            Geometry::Arrow(_) => "arrow",
            Geometry::Curve(_) => "curve",
            Geometry::Text(_) => "text",
            Geometry::Primitive { kind, .. } => kind.as_str(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.geometry, Geometry::Text(_))
    }

    pub fn label_text(&self) -> &str {
        self.label.as_ref().map(|l| l.content.as_str()).unwrap_or("")
    }

    /// A text box with nothing visible in it.
    pub fn is_blank_text(&self) -> bool {
        self.is_text() && self.label.as_ref().is_none_or(TextLabel::is_blank)
    }

    pub fn bounds(&self) -> Rect {
        geometry::bounding_box(self)
    }

    pub fn outline(&self) -> Outline {
        geometry::build_outline(self)
    }

    /// Advance an in-progress gesture to `point`.
    pub fn drag_to(&mut self, point: Point) {
        match &mut self.geometry {
            Geometry::Path(points) => points.push(point),
            Geometry::Line(segment) | Geometry::Arrow(segment) => segment.end = point,
            Geometry::Curve(curve) => match curve.phase {
                CurvePhase::Endpoint => curve.end = point,
                CurvePhase::Control => curve.control = point,
            },
            Geometry::Text(frame) | Geometry::Primitive { frame, .. } => frame.drag_to(point),
        }
    }
}
