//! Hit testing against shape outlines, topmost shape first.

use crate::geometry::build_outline;
use crate::shapes::Shape;
use kurbo::{Point, Rect};

/// Extra width added to a shape's stroke when testing for stroke hits.
pub const STROKE_TOLERANCE: f64 = 4.0;

/// Whether `point` falls inside the shape's fill or within its stroke band.
pub fn hits_shape(shape: &Shape, point: Point) -> bool {
    let outline = build_outline(shape);
    if outline.contains(point) {
        return true;
    }
    let band = (shape.style.effective_stroke_width() + STROKE_TOLERANCE) / 2.0;
    outline.distance(point) <= band
}

/// Exact outline test. Later shapes win.
pub fn pick(shapes: &[Shape], point: Point) -> Option<usize> {
    shapes.iter().rposition(|shape| hits_shape(shape, point))
}

/// Bounding-box test for shapes whose outline encloses no area.
///
/// Lets a click inside a scribble, a cross or an arrow still grab it.
pub fn pick_bounds(shapes: &[Shape], point: Point) -> Option<usize> {
    shapes
        .iter()
        .rposition(|shape| !build_outline(shape).closed && contains_inclusive(shape.bounds(), point))
}

/// Exact pick with the bounding-box fallback.
pub fn hit_test(shapes: &[Shape], point: Point) -> Option<usize> {
    let hit = pick(shapes, point).or_else(|| pick_bounds(shapes, point));
    log::debug!("Hit test at ({:.1}, {:.1}) -> {hit:?}", point.x, point.y);
    hit
}

/// Closed-interval containment; `Rect::contains` excludes the far edges.
pub fn contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Frame, PrimitiveKind, SerializableColor, ShapeStyle, TextLabel};

    fn filled_rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        let style = ShapeStyle::new(SerializableColor::black(), Some(SerializableColor::rgb(255, 0, 0)), 2.0);
        Shape::primitive(PrimitiveKind::Rect, Frame::new(x, y, w, h), style)
    }

    #[test]
    fn test_rect_scenario() {
        let shapes = vec![filled_rect(10.0, 10.0, 100.0, 50.0)];
        assert_eq!(shapes[0].bounds(), Rect::new(10.0, 10.0, 110.0, 60.0));
        assert_eq!(hit_test(&shapes, Point::new(50.0, 30.0)), Some(0));
        assert_eq!(hit_test(&shapes, Point::new(200.0, 200.0)), None);
    }

    #[test]
    fn test_topmost_wins() {
        let shapes = vec![filled_rect(0.0, 0.0, 100.0, 100.0), filled_rect(50.0, 50.0, 100.0, 100.0)];
        assert_eq!(hit_test(&shapes, Point::new(75.0, 75.0)), Some(1));
        assert_eq!(hit_test(&shapes, Point::new(25.0, 25.0)), Some(0));
    }

    #[test]
    fn test_stroke_band() {
        let line = Shape::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0), ShapeStyle::default());
        // Band is (2 + 4) / 2 = 3 on either side.
        assert!(hits_shape(&line, Point::new(50.0, 2.9)));
        assert!(!hits_shape(&line, Point::new(50.0, 3.5)));
    }

    #[test]
    fn test_unfilled_interior_still_hits() {
        let ellipse = Shape::primitive(
            PrimitiveKind::Ellipse,
            Frame::new(0.0, 0.0, 100.0, 60.0),
            ShapeStyle::default(),
        );
        assert!(hits_shape(&ellipse, Point::new(50.0, 30.0)));
        // Bounding-box corner outside the ellipse is not part of it.
        assert_eq!(hit_test(&[ellipse], Point::new(2.0, 2.0)), None);
    }

    #[test]
    fn test_bounds_fallback_for_open_shapes() {
        let scribble = Shape::path(
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)],
            ShapeStyle::default(),
        );
        let shapes = vec![scribble];
        assert_eq!(pick(&shapes, Point::new(40.0, 60.0)), None);
        assert_eq!(hit_test(&shapes, Point::new(40.0, 60.0)), Some(0));
        assert_eq!(hit_test(&shapes, Point::new(100.0, 100.0)), Some(0));
    }

    #[test]
    fn test_text_box_hits_inside_frame() {
        let text = Shape::text(
            Frame::new(0.0, 0.0, 100.0, 30.0),
            TextLabel::new("hello", 18.0, SerializableColor::black()),
        );
        assert_eq!(hit_test(&[text], Point::new(50.0, 15.0)), Some(0));
    }

    #[test]
    fn test_closed_outline_interior_matches_pick() {
        for kind in PrimitiveKind::ALL.into_iter().filter(|k| k.is_closed()) {
            let shape = Shape::primitive(kind, Frame::new(0.0, 0.0, 120.0, 90.0), ShapeStyle::default());
            let outline = shape.outline();
            for ix in 0..24 {
                for iy in 0..18 {
                    let p = Point::new(ix as f64 * 5.0 + 2.5, iy as f64 * 5.0 + 2.5);
                    if outline.contains(p) {
                        assert!(hits_shape(&shape, p), "{kind} at {p:?}");
                    }
                }
            }
        }
    }
}
