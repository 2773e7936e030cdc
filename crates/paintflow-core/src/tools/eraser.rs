//! Point-by-point erasing of document shapes.

use crate::canvas::{CanvasDocument, ModelError};
use crate::geometry::point_to_segment_distance;
use crate::picking::contains_inclusive;
use crate::shapes::{Geometry, Shape};
use kurbo::Point;

/// Share of a path's points that must survive one eraser pass.
const MIN_SURVIVING_RATIO: f64 = 0.3;

/// The transient eraser trail. Never added to the document.
#[derive(Debug, Clone, PartialEq)]
pub struct EraserStroke {
    pub points: Vec<Point>,
    pub width: f64,
}

impl EraserStroke {
    pub fn new(start: Point, width: f64) -> Self {
        Self {
            points: vec![start],
            width,
        }
    }

    pub fn radius(&self) -> f64 {
        self.width / 2.0
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }
}

/// Erase around `point`, topmost shape first. Returns how many shapes were
/// removed.
///
/// The outcome depends only on the current shapes, so applying it twice at
/// the same point removes nothing the second time.
pub fn erase_at(document: &mut CanvasDocument, point: Point, radius: f64) -> Result<usize, ModelError> {
    let mut removed = 0;
    for index in (0..document.count()).rev() {
        if document.mutate(index, |shape| erase_shape(shape, point, radius))? {
            document.remove_at(index)?;
            removed += 1;
        }
    }
    if removed > 0 {
        log::debug!("Eraser removed {removed} shape(s)");
    }
    Ok(removed)
}

/// Trim `shape` and report whether it should be dropped entirely.
fn erase_shape(shape: &mut Shape, point: Point, radius: f64) -> bool {
    match &mut shape.geometry {
        Geometry::Path(points) => {
            let before = points.len();
            points.retain(|p| p.distance(point) > radius);
            points.len() < 2 || (points.len() as f64) < before as f64 * MIN_SURVIVING_RATIO
        }
        Geometry::Line(s) | Geometry::Arrow(s) => point_to_segment_distance(point, s.start, s.end) < radius,
        Geometry::Curve(_) => shape.outline().distance(point) < radius,
        Geometry::Text(_) | Geometry::Primitive { .. } => {
            contains_inclusive(shape.bounds().inflate(radius, radius), point)
        }
    }
}
