//! PaintFlow Core Library
//!
//! Platform-agnostic document model, geometry and interaction state machine
//! for the PaintFlow drawing editor.

pub mod assist;
pub mod canvas;
pub mod geometry;
pub mod history;
pub mod input;
pub mod picking;
pub mod rng;
pub mod settings;
pub mod shapes;
pub mod storage;
pub mod text_overlay;
pub mod tools;

pub use assist::AssistTool;
pub use canvas::{Canvas, CanvasDocument, ModelError, UNTITLED};
pub use geometry::{Outline, build_outline};
pub use history::{History, HistoryError, MAX_UNDO_HISTORY, Snapshot};
pub use input::{Effect, Event, Notification};
pub use picking::hit_test;
pub use settings::{EditorSettings, Palette, PaletteChange};
pub use shapes::{Frame, Geometry, PrimitiveKind, SerializableColor, Shape, ShapeError, ShapeStyle, TextLabel};
pub use storage::{
    DEFAULT_LIST_LIMIT, Drawing, DrawingDraft, DrawingId, DrawingStore, DrawingSummary, FileStore, MemoryStore,
    PreviewImage, SaveRequest, StoreError, StoreResult,
};
pub use text_overlay::{OverlayLayout, TextAlign, TextKey, TextSession};
pub use tools::ToolKind;
