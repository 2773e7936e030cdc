//! Editor configuration and the current tool palette.

use crate::shapes::{SerializableColor, ShapeStyle, TextLabel};
use serde::{Deserialize, Serialize};

/// Values picked in the toolbar, applied to newly created shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    pub stroke_color: SerializableColor,
    /// Transparent means no fill.
    pub fill_color: SerializableColor,
    pub stroke_width: f64,
    pub font_size: f64,
    pub text_color: SerializableColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            fill_color: SerializableColor::transparent(),
            stroke_width: ShapeStyle::DEFAULT_STROKE_WIDTH,
            font_size: TextLabel::DEFAULT_FONT_SIZE,
            text_color: SerializableColor::black(),
        }
    }
}

impl Palette {
    pub fn shape_style(&self) -> ShapeStyle {
        ShapeStyle::new(self.stroke_color, Some(self.fill_color), self.stroke_width)
    }

    pub fn fill(&self) -> Option<SerializableColor> {
        Some(self.fill_color).filter(|c| !c.is_transparent())
    }

    pub fn empty_label(&self) -> TextLabel {
        TextLabel::empty(self.font_size, self.text_color)
    }
}

/// A single palette edit coming from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaletteChange {
    StrokeColor(SerializableColor),
    FillColor(SerializableColor),
    StrokeWidth(f64),
    FontSize(f64),
    TextColor(SerializableColor),
}

impl Palette {
    pub fn apply(&mut self, change: PaletteChange) {
        match change {
            PaletteChange::StrokeColor(c) => self.stroke_color = c,
            PaletteChange::FillColor(c) => self.fill_color = c,
            PaletteChange::StrokeWidth(w) => self.stroke_width = w,
            PaletteChange::FontSize(s) => self.font_size = s,
            PaletteChange::TextColor(c) => self.text_color = c,
        }
    }
}

/// Tunables of the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorSettings {
    /// Maximum number of undo snapshots kept.
    pub history_capacity: usize,
    /// Eraser width used when the palette width is unset.
    pub eraser_width: f64,
    pub notification_ms: u64,
    /// Maximum number of drawings returned by a listing.
    pub list_limit: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_capacity: 100,
            eraser_width: 10.0,
            notification_ms: 2000,
            list_limit: 50,
        }
    }
}

impl EditorSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings = EditorSettings::from_json(r#"{"historyCapacity": 5}"#).unwrap();
        assert_eq!(settings.history_capacity, 5);
        assert_eq!(settings.eraser_width, 10.0);
        assert_eq!(settings.list_limit, 50);
    }

    #[test]
    fn test_default_palette_has_no_fill() {
        let palette = Palette::default();
        assert!(palette.fill().is_none());
        assert!(palette.shape_style().fill_color.is_none());
        assert_eq!(palette.shape_style().stroke_width, 2.0);
    }

    #[test]
    fn test_apply_change() {
        let mut palette = Palette::default();
        palette.apply(PaletteChange::FontSize(24.0));
        palette.apply(PaletteChange::FillColor(SerializableColor::rgb(255, 0, 0)));
        assert_eq!(palette.font_size, 24.0);
        assert_eq!(palette.fill(), Some(SerializableColor::rgb(255, 0, 0)));
    }
}
