//! Drawing surface abstraction.

use kurbo::{BezPath, Point, Stroke};
use paintflow_core::shapes::SerializableColor;
use paintflow_core::text_overlay::TextAlign;
use peniko::{Color, Fill};

/// Vertical anchor of a text run's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
}

/// One line of text placed on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub origin: Point,
    pub font_size: f64,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

/// Immediate-mode 2D target the renderer draws into.
///
/// Implementations can rasterize, emit markup, or just record.
pub trait Surface {
    /// Reset the surface, painting it with `background` if given.
    fn clear(&mut self, background: Option<Color>);

    fn fill_path(&mut self, path: &BezPath, fill: Fill, color: Color);

    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke, color: Color);

    fn fill_text(&mut self, run: &TextRun, color: Color);

    fn stroke_text(&mut self, run: &TextRun, width: f64, color: Color);
}

/// A recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Option<SerializableColor>),
    Fill {
        path: BezPath,
        fill: Fill,
        color: SerializableColor,
    },
    Stroke {
        path: BezPath,
        width: f64,
        dashes: Vec<f64>,
        color: SerializableColor,
    },
    FillText {
        run: TextRun,
        color: SerializableColor,
    },
    StrokeText {
        run: TextRun,
        width: f64,
        color: SerializableColor,
    },
}

/// Surface that keeps every call, for tests and vector snapshots.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Text of every filled run, in drawing order.
    pub fn filled_text(&self) -> Vec<&TextRun> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { run, .. } => Some(run),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, background: Option<Color>) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(background.map(SerializableColor::from)));
    }

    fn fill_path(&mut self, path: &BezPath, fill: Fill, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            fill,
            color: color.into(),
        });
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke, color: Color) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            width: stroke.width,
            dashes: stroke.dash_pattern.to_vec(),
            color: color.into(),
        });
    }

    fn fill_text(&mut self, run: &TextRun, color: Color) {
        self.commands.push(DrawCommand::FillText {
            run: run.clone(),
            color: color.into(),
        });
    }

    fn stroke_text(&mut self, run: &TextRun, width: f64, color: Color) {
        self.commands.push(DrawCommand::StrokeText {
            run: run.clone(),
            width,
            color: color.into(),
        });
    }
}
