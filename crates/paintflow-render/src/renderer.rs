//! Shape rendering onto a [`Surface`].

use crate::surface::{Surface, TextBaseline, TextRun};
use kurbo::{BezPath, Cap, Join, Point, Rect, Shape as KurboShape, Size, Stroke};
use paintflow_core::canvas::CanvasDocument;
use paintflow_core::geometry::build_outline;
use paintflow_core::shapes::{SerializableColor, Shape};
use paintflow_core::text_overlay::TextAlign;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Could not allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error("SVG snapshot could not be parsed: {0}")]
    Svg(String),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("PDF export failed: {0}")]
    Pdf(String),
}

pub type RenderResult<T> = Result<T, RendererError>;

/// Margin between a selected shape and its selection box.
pub const SELECTION_MARGIN: f64 = 4.0;
/// Inset of labels from their shape's bounds.
pub const TEXT_PADDING: f64 = 4.0;
const SELECTION_DASH: [f64; 2] = [6.0, 4.0];
const TEXT_OUTLINE_WIDTH: f64 = 2.0;

/// Context for a single render pass.
pub struct RenderContext<'a> {
    pub shapes: &'a [Shape],
    pub selection: Option<usize>,
    pub viewport_size: Size,
    /// `None` leaves the surface transparent.
    pub background_color: Option<Color>,
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    pub fn new(document: &'a CanvasDocument, viewport_size: Size) -> Self {
        Self {
            shapes: document.shapes(),
            selection: document.selection(),
            viewport_size,
            background_color: None,
            selection_color: Color::from_rgba8(0x4a, 0x90, 0xe2, 255),
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    /// Drop the selection decoration, as exports do.
    pub fn without_selection(mut self) -> Self {
        self.selection = None;
        self
    }
}

/// Clear the surface, draw every shape back to front, then the selection box.
pub fn render(ctx: &RenderContext, surface: &mut dyn Surface) {
    surface.clear(ctx.background_color);
    for shape in ctx.shapes {
        draw_shape(shape, surface);
    }
    let selected = ctx.selection.and_then(|i| ctx.shapes.get(i));
    if let Some(shape) = selected.filter(|s| !s.is_text()) {
        draw_selection(shape.bounds(), ctx.selection_color, surface);
    }
}

fn outline_stroke(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Butt).with_join(Join::Miter)
}

/// Draw one shape: fill, stroke, decorations, then its label.
pub fn draw_shape(shape: &Shape, surface: &mut dyn Surface) {
    if !shape.is_text() {
        let outline = build_outline(shape);
        let style = &shape.style;
        if outline.closed {
            if let Some(fill) = style.fill() {
                surface.fill_path(&outline.body, outline.fill_rule, fill);
            }
        }
        if !style.stroke_color.is_transparent() {
            let stroke = outline_stroke(style.effective_stroke_width());
            surface.stroke_path(&outline.body, &stroke, style.stroke());
            if !outline.marks.is_empty() {
                surface.stroke_path(&outline.marks, &stroke, style.stroke());
            }
        }
    }
    draw_label(shape, surface);
}

/// Text runs for the shape's label, one per line. Empty when there is
/// nothing visible to draw.
pub fn layout_label(shape: &Shape) -> Vec<TextRun> {
    let Some(label) = shape.label.as_ref().filter(|l| !l.is_blank()) else {
        return Vec::new();
    };
    let bounds = shape.bounds();
    let line_height = label.line_height();
    let lines: Vec<&str> = label.lines().collect();

    if shape.is_text() {
        let origin = Point::new(bounds.x0 + TEXT_PADDING, bounds.y0 + TEXT_PADDING);
        return lines
            .iter()
            .enumerate()
            .map(|(i, line)| TextRun {
                text: line.to_string(),
                origin: Point::new(origin.x, origin.y + i as f64 * line_height),
                font_size: label.font_size,
                align: TextAlign::Left,
                baseline: TextBaseline::Top,
            })
            .collect();
    }

    let center = bounds.center();
    let start = center.y - lines.len() as f64 * line_height / 2.0 + line_height / 2.0;
    let (min_y, max_y) = (bounds.y0 + TEXT_PADDING, bounds.y1 - TEXT_PADDING);
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            // Lower bound first, so a box too short for the inset pins to max_y.
            let y = (start + i as f64 * line_height).max(min_y);
            let y = if y > max_y { max_y } else { y };
            TextRun {
                text: line.to_string(),
                origin: Point::new(center.x, y),
                font_size: label.font_size,
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
            }
        })
        .collect()
}

fn draw_label(shape: &Shape, surface: &mut dyn Surface) {
    let Some(label) = shape.label.as_ref() else {
        return;
    };
    let color: Color = label.color.into();
    let outlined = !label.color.is_white();
    for run in layout_label(shape) {
        if outlined {
            surface.stroke_text(&run, TEXT_OUTLINE_WIDTH, SerializableColor::white().into());
        }
        surface.fill_text(&run, color);
    }
}

fn draw_selection(bounds: Rect, color: Color, surface: &mut dyn Surface) {
    let rect = bounds.inflate(SELECTION_MARGIN, SELECTION_MARGIN);
    let path: BezPath = rect.to_path(0.1);
    let stroke = outline_stroke(1.0).with_dashes(0.0, SELECTION_DASH);
    surface.stroke_path(&path, &stroke, color);
}
