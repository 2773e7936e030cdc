//! PaintFlow Render Library
//!
//! Draws a PaintFlow document onto an abstract [`Surface`] and exports it as
//! SVG, PNG, an HTML document or a paginated PDF.

mod export;
mod pdf;
mod renderer;
mod surface;
mod svg;

pub use export::{RasterExporter, doc_html, export_svg};
pub use pdf::{PAGE_SIZE, PageLayout, write_pdf};
pub use renderer::{
    RenderContext, RenderResult, RendererError, SELECTION_MARGIN, TEXT_PADDING, draw_shape, layout_label,
    render,
};
pub use surface::{DrawCommand, RecordingSurface, Surface, TextBaseline, TextRun};
pub use svg::{SvgSurface, escape_xml};
