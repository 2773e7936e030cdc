//! Geometry kernel: bounding boxes, outline construction and distance helpers.
//!
//! [`build_outline`] is the one place a shape's drawable geometry is defined.
//! The renderer strokes and fills its output and the picking engine tests
//! points against the same paths.

use crate::shapes::{Frame, Geometry, PrimitiveKind, Shape};
use kurbo::{
    Arc, BezPath, Circle, Ellipse, ParamCurveNearest, Point, Rect, RoundedRect, Shape as KurboShape, Vec2,
};
use peniko::Fill;
use std::f64::consts::PI;

/// Flattening tolerance used when converting curves to paths.
pub const TOLERANCE: f64 = 0.1;
/// Outer / inner radius ratio of every star.
pub const STAR_INNER_RATIO: f64 = 2.5;
/// Base head length of the `arrow` two-point shape.
pub const ARROW_HEAD_BASE: f64 = 10.0;
/// Base head length of the directional arrow primitives.
pub const PRIMITIVE_HEAD_BASE: f64 = 8.0;
const HEAD_SPREAD: f64 = PI / 6.0;
const CALLOUT_TAIL_RATIO: f64 = 0.18;
const CALLOUT_RADIUS: f64 = 10.0;

/// Drawable outline of a shape.
#[derive(Debug, Clone)]
pub struct Outline {
    /// Main path. Filled when `closed`, always stroked.
    pub body: BezPath,
    /// Whether the body encloses an area.
    pub closed: bool,
    pub fill_rule: Fill,
    /// Stroke-only decorations (arrow heads, sun rays).
    pub marks: BezPath,
}

impl Outline {
    fn closed(body: BezPath) -> Self {
        Self {
            body,
            closed: true,
            fill_rule: Fill::NonZero,
            marks: BezPath::new(),
        }
    }

    fn open(body: BezPath) -> Self {
        Self {
            closed: false,
            ..Self::closed(body)
        }
    }

    fn with_marks(mut self, marks: BezPath) -> Self {
        self.marks = marks;
        self
    }

    /// Whether `point` lies inside the filled region.
    pub fn contains(&self, point: Point) -> bool {
        if !self.closed {
            return false;
        }
        let winding = self.body.winding(point);
        match self.fill_rule {
            Fill::NonZero => winding != 0,
            Fill::EvenOdd => winding % 2 != 0,
        }
    }

    /// Distance from `point` to the nearest stroked segment.
    pub fn distance(&self, point: Point) -> f64 {
        let nearest = self
            .body
            .segments()
            .chain(self.marks.segments())
            .map(|seg| seg.nearest(point, TOLERANCE).distance_sq)
            .fold(f64::INFINITY, f64::min);
        if nearest.is_finite() {
            return nearest.sqrt();
        }
        // A single-point path has no segments; measure to the point itself.
        match self.body.elements().first() {
            Some(kurbo::PathEl::MoveTo(p)) => p.distance(point),
            _ => f64::INFINITY,
        }
    }
}

/// Shortest distance from `point` to the segment `a`-`b`.
pub fn point_to_segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Vertices of a regular polygon, starting at `phase` radians.
pub fn regular_polygon_vertices(center: Point, radius: f64, sides: usize, phase: f64) -> Vec<Point> {
    let step = 2.0 * PI / sides as f64;
    (0..sides)
        .map(|i| center + Vec2::from_angle(step * i as f64 + phase) * radius)
        .collect()
}

/// Vertices of an n-pointed star, alternating outer and inner radius, first
/// point straight up.
pub fn star_vertices(center: Point, outer: f64, points: usize) -> Vec<Point> {
    let inner = outer / STAR_INNER_RATIO;
    let step = PI / points as f64;
    (0..points * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            center + Vec2::from_angle(step * i as f64 - PI / 2.0) * radius
        })
        .collect()
}

/// Corner radius used by the `roundrect` primitive.
pub fn rounded_rect_radius(w: f64, h: f64) -> f64 {
    let (w, h) = (w.abs(), h.abs());
    (w.min(h).min(12.0) * 0.25).min(w / 2.0).min(h / 2.0)
}

/// Axis-aligned bounds of a shape: the extent of its points, or the
/// normalized frame for box shapes.
pub fn bounding_box(shape: &Shape) -> Rect {
    match &shape.geometry {
        Geometry::Path(points) => points_bounds(points),
        Geometry::Line(s) | Geometry::Arrow(s) => points_bounds(&[s.start, s.end]),
        Geometry::Curve(c) => points_bounds(&[c.start, c.end, c.control]),
        Geometry::Text(frame) | Geometry::Primitive { frame, .. } => frame.normalized(),
    }
}

fn points_bounds(points: &[Point]) -> Rect {
    let mut iter = points.iter();
    let Some(&first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(first, first), |rect, &p| rect.union_pt(p))
}

/// Build the stroke / fill outline of a shape.
pub fn build_outline(shape: &Shape) -> Outline {
    let width = shape.style.effective_stroke_width();
    match &shape.geometry {
        Geometry::Path(points) => Outline::open(polyline(points, false)),
        Geometry::Line(s) => Outline::open(polyline(&[s.start, s.end], false)),
        Geometry::Arrow(s) => {
            let mut marks = BezPath::new();
            arrow_head(&mut marks, s.start, s.end, ARROW_HEAD_BASE + width);
            Outline::open(polyline(&[s.start, s.end], false)).with_marks(marks)
        }
        Geometry::Curve(c) => {
            let mut body = BezPath::new();
            body.move_to(c.start);
            body.quad_to(c.control, c.end);
            Outline::open(body)
        }
        Geometry::Text(frame) => Outline::closed(frame.normalized().to_path(TOLERANCE)),
        Geometry::Primitive { kind, frame } => primitive_outline(*kind, frame, width),
    }
}

fn polyline(points: &[Point], close: bool) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(&first) = iter.next() {
        path.move_to(first);
        for &p in iter {
            path.line_to(p);
        }
        if close {
            path.close_path();
        }
    }
    path
}

fn polygon(points: &[Point]) -> BezPath {
    polyline(points, true)
}

fn arrow_head(path: &mut BezPath, from: Point, to: Point, size: f64) {
    let angle = (to - from).atan2();
    for spread in [-HEAD_SPREAD, HEAD_SPREAD] {
        path.move_to(to);
        path.line_to(to - Vec2::from_angle(angle + spread) * size);
    }
}

/// Square anchored at the drag origin, sized by the shorter side.
fn anchored_square(frame: &Frame) -> Rect {
    let size = frame.w.abs().min(frame.h.abs());
    let x0 = if frame.w >= 0.0 { frame.x } else { frame.x - size };
    let y0 = if frame.h >= 0.0 { frame.y } else { frame.y - size };
    Rect::new(x0, y0, x0 + size, y0 + size)
}

fn primitive_outline(kind: PrimitiveKind, frame: &Frame, width: f64) -> Outline {
    let bb = frame.normalized();
    let center = bb.center();
    let min_side = bb.width().min(bb.height());
    let at = |fx: f64, fy: f64| Point::new(bb.x0 + bb.width() * fx, bb.y0 + bb.height() * fy);

    match kind {
        PrimitiveKind::Rect => Outline::closed(bb.to_path(TOLERANCE)),
        PrimitiveKind::Square => Outline::closed(anchored_square(frame).to_path(TOLERANCE)),
        PrimitiveKind::RoundRect => {
            let radius = rounded_rect_radius(bb.width(), bb.height());
            Outline::closed(RoundedRect::from_rect(bb, radius).to_path(TOLERANCE))
        }
        PrimitiveKind::Ellipse => Outline::closed(Ellipse::from_rect(bb).to_path(TOLERANCE)),
        PrimitiveKind::Circle => {
            let square = anchored_square(frame);
            Outline::closed(Circle::new(square.center(), square.width() / 2.0).to_path(TOLERANCE))
        }
        PrimitiveKind::Diamond => Outline::closed(polygon(&[at(0.5, 0.0), at(1.0, 0.5), at(0.5, 1.0), at(0.0, 0.5)])),
        PrimitiveKind::Triangle | PrimitiveKind::TriangleIso => {
            Outline::closed(polygon(&[at(0.5, 0.0), at(1.0, 1.0), at(0.0, 1.0)]))
        }
        PrimitiveKind::TriangleRight => Outline::closed(polygon(&[at(0.0, 0.0), at(1.0, 1.0), at(0.0, 1.0)])),
        PrimitiveKind::Star | PrimitiveKind::Star5 => Outline::closed(polygon(&star_vertices(center, min_side / 2.0, 5))),
        PrimitiveKind::Star4 => Outline::closed(polygon(&star_vertices(center, min_side / 2.0, 4))),
        PrimitiveKind::Star6 => Outline::closed(polygon(&star_vertices(center, min_side / 2.0, 6))),
        PrimitiveKind::Polygon5 => {
            Outline::closed(polygon(&regular_polygon_vertices(center, min_side / 2.0, 5, -PI / 2.0)))
        }
        PrimitiveKind::Polygon6 => {
            Outline::closed(polygon(&regular_polygon_vertices(center, min_side / 2.0, 6, -PI / 2.0)))
        }
        PrimitiveKind::Donut => {
            let outer = min_side / 2.0;
            let mut body = Circle::new(center, outer).to_path(TOLERANCE);
            body.extend(Circle::new(center, outer * 0.5).path_elements(TOLERANCE));
            Outline {
                fill_rule: Fill::EvenOdd,
                ..Outline::closed(body)
            }
        }
        PrimitiveKind::Cross => {
            let mut body = BezPath::new();
            body.move_to(at(0.0, 0.0));
            body.line_to(at(1.0, 1.0));
            body.move_to(at(1.0, 0.0));
            body.line_to(at(0.0, 1.0));
            Outline::open(body)
        }
        PrimitiveKind::ArrowLeft
        | PrimitiveKind::ArrowRight
        | PrimitiveKind::ArrowUp
        | PrimitiveKind::ArrowDown
        | PrimitiveKind::ArrowLeftRight
        | PrimitiveKind::ArrowUpDown => directional_arrows(kind, bb, width),
        PrimitiveKind::CalloutRounded => {
            let tail_w = bb.width() * CALLOUT_TAIL_RATIO;
            let tail_h = bb.height() * CALLOUT_TAIL_RATIO;
            let bubble = Rect::new(bb.x0, bb.y0, bb.x1, bb.y1 - tail_h);
            let radius = CALLOUT_RADIUS.min(bubble.width() / 2.0).min(bubble.height() / 2.0);
            let mut body = RoundedRect::from_rect(bubble, radius).to_path(TOLERANCE);
            let tail_top = bb.y1 - tail_h;
            let tail = polygon(&[
                Point::new(bb.x0 + bb.width() * 0.3, tail_top),
                Point::new(bb.x0 + bb.width() * 0.3 + tail_w * 0.4, bb.y1),
                Point::new(bb.x0 + bb.width() * 0.5, tail_top),
            ]);
            body.extend(tail.iter());
            Outline::closed(body)
        }
        PrimitiveKind::CalloutCloud => {
            let r = min_side / 4.0;
            let mut body = BezPath::new();
            for lobe in regular_polygon_vertices(center, r * 1.2, 8, 0.0) {
                body.extend(Circle::new(lobe, r).path_elements(TOLERANCE));
            }
            Outline::closed(body)
        }
        PrimitiveKind::Heart => {
            let (w, h) = (bb.width(), bb.height());
            let tip = Point::new(center.x, center.y + h * 0.25);
            let notch = Point::new(center.x, bb.y0 + h * 0.25);
            let mut body = BezPath::new();
            body.move_to(tip);
            body.curve_to(
                Point::new(center.x - w * 0.5, center.y - h * 0.15),
                Point::new(center.x - w * 0.15, bb.y0),
                notch,
            );
            body.curve_to(
                Point::new(center.x + w * 0.15, bb.y0),
                Point::new(center.x + w * 0.5, center.y - h * 0.15),
                tip,
            );
            body.close_path();
            Outline::closed(body)
        }
        PrimitiveKind::Bolt => Outline::closed(polygon(&[
            at(0.55, 0.0),
            at(0.2, 0.6),
            at(0.5, 0.6),
            at(0.45, 1.0),
            at(0.8, 0.4),
            at(0.5, 0.4),
        ])),
        PrimitiveKind::Sun => {
            let r = min_side / 4.0;
            let mut rays = BezPath::new();
            for angle in (0..8).map(|i| PI / 4.0 * i as f64) {
                let dir = Vec2::from_angle(angle);
                rays.move_to(center + dir * r);
                rays.line_to(center + dir * r * 1.8);
            }
            Outline::closed(Circle::new(center, r).to_path(TOLERANCE)).with_marks(rays)
        }
        PrimitiveKind::Moon => {
            let r = min_side / 2.0;
            let outer = Arc {
                center,
                radii: Vec2::new(r, r),
                start_angle: PI * 0.2,
                sweep_angle: PI * 1.6,
                x_rotation: 0.0,
            };
            let inner_center = Point::new(center.x + r * 0.5, center.y - r * 0.1);
            let inner = Arc {
                center: inner_center,
                radii: Vec2::new(r * 0.8, r * 0.8),
                start_angle: PI * 1.2,
                sweep_angle: -PI * 0.4,
                x_rotation: 0.0,
            };
            let mut body = BezPath::new();
            body.move_to(center + Vec2::from_angle(outer.start_angle) * r);
            body.extend(outer.append_iter(TOLERANCE));
            body.line_to(inner_center + Vec2::from_angle(inner.start_angle) * r * 0.8);
            body.extend(inner.append_iter(TOLERANCE));
            body.close_path();
            Outline::closed(body)
        }
    }
}

fn directional_arrows(kind: PrimitiveKind, bb: Rect, width: f64) -> Outline {
    let center = bb.center();
    let left = Point::new(bb.x0, center.y);
    let right = Point::new(bb.x1, center.y);
    let top = Point::new(center.x, bb.y0);
    let bottom = Point::new(center.x, bb.y1);
    let shafts: &[(Point, Point)] = match kind {
        PrimitiveKind::ArrowLeft => &[(right, left)],
        PrimitiveKind::ArrowRight => &[(left, right)],
        PrimitiveKind::ArrowUp => &[(bottom, top)],
        PrimitiveKind::ArrowDown => &[(top, bottom)],
        PrimitiveKind::ArrowLeftRight => &[(right, left), (left, right)],
        PrimitiveKind::ArrowUpDown => &[(bottom, top), (top, bottom)],
        _ => &[],
    };
    let mut body = BezPath::new();
    let mut heads = BezPath::new();
    for &(from, to) in shafts {
        body.move_to(from);
        body.line_to(to);
        arrow_head(&mut heads, from, to, PRIMITIVE_HEAD_BASE + width);
    }
    Outline::open(body).with_marks(heads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{QuadCurve, ShapeStyle};

    fn primitive(kind: PrimitiveKind, x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::primitive(kind, Frame::new(x, y, w, h), ShapeStyle::default())
    }

    #[test]
    fn test_rect_bounding_box() {
        let rect = primitive(PrimitiveKind::Rect, 10.0, 10.0, 100.0, 50.0);
        assert_eq!(bounding_box(&rect), Rect::new(10.0, 10.0, 110.0, 60.0));
        let flipped = primitive(PrimitiveKind::Rect, 110.0, 60.0, -100.0, -50.0);
        assert_eq!(bounding_box(&flipped), Rect::new(10.0, 10.0, 110.0, 60.0));
    }

    #[test]
    fn test_point_shape_bounds() {
        let path = Shape::path(
            vec![Point::new(5.0, 5.0), Point::new(-5.0, 20.0), Point::new(30.0, 0.0)],
            ShapeStyle::default(),
        );
        assert_eq!(bounding_box(&path), Rect::new(-5.0, 0.0, 30.0, 20.0));

        let curve = Shape::curve(
            QuadCurve {
                control: Point::new(50.0, -40.0),
                end: Point::new(100.0, 0.0),
                ..QuadCurve::at(Point::ZERO)
            },
            ShapeStyle::default(),
        );
        assert_eq!(bounding_box(&curve), Rect::new(0.0, -40.0, 100.0, 0.0));
    }

    #[test]
    fn test_point_to_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_distance(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-9);
        assert!((point_to_segment_distance(Point::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-9);
        assert!((point_to_segment_distance(Point::new(1.0, 1.0), a, a) - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_star_vertices() {
        let verts = star_vertices(Point::new(0.0, 0.0), 50.0, 5);
        assert_eq!(verts.len(), 10);
        assert!((verts[0].x).abs() < 1e-9);
        assert!((verts[0].y + 50.0).abs() < 1e-9);
        assert!((verts[1].to_vec2().hypot() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_polygon_vertices() {
        let verts = regular_polygon_vertices(Point::new(10.0, 10.0), 5.0, 6, -PI / 2.0);
        assert_eq!(verts.len(), 6);
        assert!((verts[0] - Point::new(10.0, 5.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_rounded_rect_radius() {
        assert_eq!(rounded_rect_radius(100.0, 50.0), 3.0);
        assert_eq!(rounded_rect_radius(4.0, 100.0), 1.0);
        assert_eq!(rounded_rect_radius(-8.0, 8.0), 2.0);
    }

    #[test]
    fn test_rect_outline_contains() {
        let outline = build_outline(&primitive(PrimitiveKind::Rect, 10.0, 10.0, 100.0, 50.0));
        assert!(outline.contains(Point::new(50.0, 30.0)));
        assert!(!outline.contains(Point::new(200.0, 200.0)));
        assert!(outline.distance(Point::new(50.0, 12.0)) < 2.5);
    }

    #[test]
    fn test_donut_hole_is_empty() {
        let outline = build_outline(&primitive(PrimitiveKind::Donut, 0.0, 0.0, 100.0, 100.0));
        assert!(outline.contains(Point::new(10.0, 50.0)));
        assert!(!outline.contains(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_square_anchors_to_drag_origin() {
        let outline = build_outline(&primitive(PrimitiveKind::Square, 100.0, 100.0, -40.0, -80.0));
        let bbox = outline.body.bounding_box();
        assert!((bbox.x0 - 60.0).abs() < 1e-6);
        assert!((bbox.y0 - 60.0).abs() < 1e-6);
        assert!((bbox.width() - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_open_outlines_have_no_interior() {
        for kind in [PrimitiveKind::Cross, PrimitiveKind::ArrowLeftRight] {
            let outline = build_outline(&primitive(kind, 0.0, 0.0, 100.0, 100.0));
            assert!(!outline.closed);
            assert!(!outline.contains(Point::new(25.0, 75.0)));
        }
    }

    #[test]
    fn test_sun_rays_are_marks() {
        let outline = build_outline(&primitive(PrimitiveKind::Sun, 0.0, 0.0, 100.0, 100.0));
        // Ray tip at 1.8r to the right of center.
        assert!(outline.distance(Point::new(50.0 + 45.0, 50.0)) < 1e-6);
        assert!(!outline.contains(Point::new(50.0 + 40.0, 50.0)));
    }

    #[test]
    fn test_arrow_head_marks() {
        let arrow = Shape::arrow(Point::new(0.0, 0.0), Point::new(100.0, 0.0), ShapeStyle::default());
        let outline = build_outline(&arrow);
        let size = ARROW_HEAD_BASE + 2.0;
        let barb = Point::new(100.0 - size * HEAD_SPREAD.cos(), size * HEAD_SPREAD.sin());
        assert!(outline.distance(barb) < 1e-6);
    }

    #[test]
    fn test_single_point_path_distance() {
        let dot = Shape::path(vec![Point::new(3.0, 4.0)], ShapeStyle::default());
        assert!((build_outline(&dot).distance(Point::ZERO) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_every_kind_builds_a_body() {
        for kind in PrimitiveKind::ALL {
            let outline = build_outline(&primitive(kind, 0.0, 0.0, 120.0, 80.0));
            assert!(outline.body.segments().next().is_some(), "{kind} has an empty outline");
            assert_eq!(outline.closed, kind.is_closed(), "{kind}");
        }
    }

    #[test]
    fn test_closed_outlines_contain_their_center() {
        for kind in PrimitiveKind::ALL.into_iter().filter(|k| k.is_closed()) {
            if matches!(kind, PrimitiveKind::Donut | PrimitiveKind::Moon | PrimitiveKind::CalloutCloud) {
                continue;
            }
            let outline = build_outline(&primitive(kind, 0.0, 0.0, 120.0, 120.0));
            assert!(outline.contains(Point::new(60.0, 62.0)), "{kind} misses its center");
        }
    }
}
