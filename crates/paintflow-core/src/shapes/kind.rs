//! Parametric primitive kinds drawn inside a frame.

use std::fmt;

/// A box-parametric primitive, identified on the wire by its type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Rect,
    Square,
    RoundRect,
    Ellipse,
    Circle,
    Diamond,
    Triangle,
    TriangleRight,
    TriangleIso,
    /// Five-pointed star under its legacy tag.
    Star,
    Star4,
    Star5,
    Star6,
    Polygon5,
    Polygon6,
    Donut,
    Cross,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    ArrowLeftRight,
    ArrowUpDown,
    CalloutRounded,
    CalloutCloud,
    Heart,
    Bolt,
    Sun,
    Moon,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 29] = [
        PrimitiveKind::Rect,
        PrimitiveKind::Square,
        PrimitiveKind::RoundRect,
        PrimitiveKind::Ellipse,
        PrimitiveKind::Circle,
        PrimitiveKind::Diamond,
        PrimitiveKind::Triangle,
        PrimitiveKind::TriangleRight,
        PrimitiveKind::TriangleIso,
        PrimitiveKind::Star,
        PrimitiveKind::Star4,
        PrimitiveKind::Star5,
        PrimitiveKind::Star6,
        PrimitiveKind::Polygon5,
        PrimitiveKind::Polygon6,
        PrimitiveKind::Donut,
        PrimitiveKind::Cross,
        PrimitiveKind::ArrowLeft,
        PrimitiveKind::ArrowRight,
        PrimitiveKind::ArrowUp,
        PrimitiveKind::ArrowDown,
        PrimitiveKind::ArrowLeftRight,
        PrimitiveKind::ArrowUpDown,
        PrimitiveKind::CalloutRounded,
        PrimitiveKind::CalloutCloud,
        PrimitiveKind::Heart,
        PrimitiveKind::Bolt,
        PrimitiveKind::Sun,
        PrimitiveKind::Moon,
    ];

    /// Wire type tag.
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Rect => "rect",
            PrimitiveKind::Square => "square",
            PrimitiveKind::RoundRect => "roundrect",
            PrimitiveKind::Ellipse => "ellipse",
            PrimitiveKind::Circle => "circle",
            PrimitiveKind::Diamond => "diamond",
            PrimitiveKind::Triangle => "triangle",
            PrimitiveKind::TriangleRight => "triangleRight",
            PrimitiveKind::TriangleIso => "triangleIso",
            PrimitiveKind::Star => "star",
            PrimitiveKind::Star4 => "star4",
            PrimitiveKind::Star5 => "star5",
            PrimitiveKind::Star6 => "star6",
            PrimitiveKind::Polygon5 => "polygon5",
            PrimitiveKind::Polygon6 => "polygon6",
            PrimitiveKind::Donut => "donut",
            PrimitiveKind::Cross => "cross",
            PrimitiveKind::ArrowLeft => "arrowLeft",
            PrimitiveKind::ArrowRight => "arrowRight",
            PrimitiveKind::ArrowUp => "arrowUp",
            PrimitiveKind::ArrowDown => "arrowDown",
            PrimitiveKind::ArrowLeftRight => "arrowLR",
            PrimitiveKind::ArrowUpDown => "arrowUD",
            PrimitiveKind::CalloutRounded => "calloutRounded",
            PrimitiveKind::CalloutCloud => "calloutCloud",
            PrimitiveKind::Heart => "heart",
            PrimitiveKind::Bolt => "bolt",
            PrimitiveKind::Sun => "sun",
            PrimitiveKind::Moon => "moon",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Kinds whose outline encloses an area.
    ///
    /// The cross and the directional arrows are open strokes.
    pub fn is_closed(self) -> bool {
        !matches!(
            self,
            PrimitiveKind::Cross
                | PrimitiveKind::ArrowLeft
                | PrimitiveKind::ArrowRight
                | PrimitiveKind::ArrowUp
                | PrimitiveKind::ArrowDown
                | PrimitiveKind::ArrowLeftRight
                | PrimitiveKind::ArrowUpDown
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
