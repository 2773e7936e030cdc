//! Flat JSON record used for stored drawings and history snapshots.

use super::{
    CurvePhase, Frame, Geometry, PrimitiveKind, QuadCurve, Segment, SerializableColor, Shape, ShapeStyle, TextLabel,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failure when turning a stored record into a [`Shape`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("unknown shape type '{0}'")]
    UnknownType(String),
    #[error("eraser strokes are transient and cannot be stored")]
    TransientEraser,
    #[error("'{kind}' expects {expected} points, found {found}")]
    PointCount {
        kind: &'static str,
        expected: &'static str,
        found: usize,
    },
    #[error("'{kind}' is missing field '{field}'")]
    MissingField { kind: String, field: &'static str },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct PointRecord {
    x: f64,
    y: f64,
}

impl From<Point> for PointRecord {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PointRecord> for Point {
    fn from(p: PointRecord) -> Self {
        Point::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShapeRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    points: Option<Vec<PointRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phase: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stroke: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fill: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_color: Option<SerializableColor>,
}

impl ShapeRecord {
    fn points(
        &self,
        kind: &'static str,
        expected: &'static str,
        accept: impl Fn(usize) -> bool,
    ) -> Result<Vec<Point>, ShapeError> {
        let points: Vec<Point> = self.points.iter().flatten().map(|&p| p.into()).collect();
        if accept(points.len()) {
            Ok(points)
        } else {
            Err(ShapeError::PointCount {
                kind,
                expected,
                found: points.len(),
            })
        }
    }

    fn frame(&self) -> Result<Frame, ShapeError> {
        let missing = |field| ShapeError::MissingField {
            kind: self.kind.clone(),
            field,
        };
        Ok(Frame::new(
            self.x.ok_or_else(|| missing("x"))?,
            self.y.ok_or_else(|| missing("y"))?,
            self.w.ok_or_else(|| missing("w"))?,
            self.h.ok_or_else(|| missing("h"))?,
        ))
    }

    fn segment(&self, kind: &'static str) -> Result<Segment, ShapeError> {
        let points = self.points(kind, "exactly 2", |n| n == 2)?;
        Ok(Segment::new(points[0], points[1]))
    }
}

impl TryFrom<ShapeRecord> for Shape {
    type Error = ShapeError;

    fn try_from(record: ShapeRecord) -> Result<Self, Self::Error> {
        let geometry = match record.kind.as_str() {
            "path" => Geometry::Path(record.points("path", "at least 1", |n| n >= 1)?),
            "line" => Geometry::Line(record.segment("line")?),
            "arrow" => Geometry::Arrow(record.segment("arrow")?),
            "curve" => {
                let points = record.points("curve", "exactly 3", |n| n == 3)?;
                Geometry::Curve(QuadCurve {
                    start: points[0],
                    end: points[1],
                    control: points[2],
                    phase: record.phase.map_or(CurvePhase::Control, CurvePhase::from_u8),
                })
            }
            "text" => Geometry::Text(record.frame()?),
            "eraser" => return Err(ShapeError::TransientEraser),
            other => match PrimitiveKind::from_name(other) {
                Some(kind) => Geometry::Primitive {
                    kind,
                    frame: record.frame()?,
                },
                None => return Err(ShapeError::UnknownType(other.to_string())),
            },
        };

        let style = ShapeStyle::new(
            record.stroke.unwrap_or(ShapeStyle::DEFAULT_STROKE),
            record.fill,
            record.width.unwrap_or(ShapeStyle::DEFAULT_STROKE_WIDTH),
        );
        let is_text = matches!(geometry, Geometry::Text(_));
        let label = match record.text {
            Some(content) => Some(content),
            None if is_text => Some(String::new()),
            None => None,
        }
        .map(|content| {
            TextLabel::new(
                content,
                record.font_size.unwrap_or(TextLabel::DEFAULT_FONT_SIZE),
                record.text_color.unwrap_or(SerializableColor::black()),
            )
        });

        Ok(Shape { geometry, style, label })
    }
}

impl From<Shape> for ShapeRecord {
    fn from(shape: Shape) -> Self {
        let mut record = ShapeRecord {
            kind: shape.type_name().to_string(),
            stroke: Some(shape.style.stroke_color),
            fill: Some(shape.style.fill_color.unwrap_or(SerializableColor::transparent())),
            width: Some(shape.style.stroke_width),
            ..Default::default()
        };
        let encode = |points: &[Point]| -> Option<Vec<PointRecord>> { Some(points.iter().map(|&p| p.into()).collect()) };
        match &shape.geometry {
            Geometry::Path(points) => record.points = encode(points),
            Geometry::Line(s) | Geometry::Arrow(s) => record.points = encode(&[s.start, s.end]),
            Geometry::Curve(c) => {
                record.points = encode(&[c.start, c.end, c.control]);
                record.phase = Some(c.phase.as_u8());
            }
            Geometry::Text(frame) | Geometry::Primitive { frame, .. } => {
                record.x = Some(frame.x);
                record.y = Some(frame.y);
                record.w = Some(frame.w);
                record.h = Some(frame.h);
            }
        }
        if let Some(label) = shape.label {
            record.text = Some(label.content);
            record.font_size = Some(label.font_size);
            record.text_color = Some(label.color);
        }
        record
    }
}
