//! SVG markup surface, used for vector snapshots and as the input to
//! rasterization.

use crate::surface::{Surface, TextBaseline, TextRun};
use kurbo::{BezPath, Size, Stroke};
use paintflow_core::shapes::SerializableColor;
use paintflow_core::text_overlay::TextAlign;
use peniko::{Color, Fill};
use std::fmt::Write;

pub const FONT_FAMILY: &str = "Arial, sans-serif";

/// Accumulates drawing calls as SVG elements.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    size: Size,
    background: Option<SerializableColor>,
    body: String,
}

impl SvgSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            background: None,
            body: String::new(),
        }
    }

    /// The complete SVG document.
    pub fn finish(&self) -> String {
        let (w, h) = (self.size.width, self.size.height);
        let mut out = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n"
        );
        if let Some(bg) = self.background {
            let _ = writeln!(out, "<rect width=\"{w}\" height=\"{h}\"{}/>", paint("fill", bg));
        }
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

/// `fill="#rrggbb"` plus an opacity attribute when the color is translucent.
fn paint(attr: &str, color: SerializableColor) -> String {
    if color.is_transparent() {
        return format!(" {attr}=\"none\"");
    }
    let opaque = SerializableColor::rgb(color.r, color.g, color.b);
    let mut out = format!(" {attr}=\"{}\"", opaque.to_css());
    if color.a < 255 {
        let _ = write!(out, " {attr}-opacity=\"{:.3}\"", f64::from(color.a) / 255.0);
    }
    out
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn text_attrs(run: &TextRun) -> String {
    let anchor = match run.align {
        TextAlign::Left => "start",
        TextAlign::Center => "middle",
    };
    let baseline = match run.baseline {
        TextBaseline::Top => "hanging",
        TextBaseline::Middle => "central",
    };
    format!(
        concat!(
            "x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" ",
            "text-anchor=\"{}\" dominant-baseline=\"{}\" xml:space=\"preserve\"",
        ),
        run.origin.x, run.origin.y, FONT_FAMILY, run.font_size, anchor, baseline
    )
}

impl Surface for SvgSurface {
    fn clear(&mut self, background: Option<Color>) {
        self.body.clear();
        self.background = background.map(SerializableColor::from);
    }

    fn fill_path(&mut self, path: &BezPath, fill: Fill, color: Color) {
        let rule = match fill {
            Fill::NonZero => "nonzero",
            Fill::EvenOdd => "evenodd",
        };
        let _ = writeln!(
            self.body,
            "<path d=\"{}\"{} fill-rule=\"{rule}\"/>",
            path.to_svg(),
            paint("fill", color.into())
        );
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke, color: Color) {
        let mut attrs = format!(
            " fill=\"none\"{} stroke-width=\"{}\" stroke-linecap=\"butt\" stroke-linejoin=\"miter\"",
            paint("stroke", color.into()),
            stroke.width
        );
        if !stroke.dash_pattern.is_empty() {
            let dashes: Vec<String> = stroke.dash_pattern.iter().map(f64::to_string).collect();
            let _ = write!(attrs, " stroke-dasharray=\"{}\"", dashes.join(" "));
        }
        let _ = writeln!(self.body, "<path d=\"{}\"{attrs}/>", path.to_svg());
    }

    fn fill_text(&mut self, run: &TextRun, color: Color) {
        let _ = writeln!(
            self.body,
            "<text {}{}>{}</text>",
            text_attrs(run),
            paint("fill", color.into()),
            escape_xml(&run.text)
        );
    }

    fn stroke_text(&mut self, run: &TextRun, width: f64, color: Color) {
        let _ = writeln!(
            self.body,
            "<text {} fill=\"none\"{} stroke-width=\"{width}\">{}</text>",
            text_attrs(run),
            paint("stroke", color.into()),
            escape_xml(&run.text)
        );
    }
}
