//! One-way exports of the current document: SVG, PNG, an HTML "DOC" and a
//! paginated PDF.

use crate::renderer::{RenderContext, RenderResult, RendererError, render};
use crate::svg::SvgSurface;
use kurbo::Size;
use paintflow_core::canvas::CanvasDocument;
use paintflow_core::storage::PreviewImage;
use peniko::Color;
use resvg::usvg;
use std::sync::Arc;

/// Render context for exports: white background, no selection box.
fn snapshot<'a>(document: &'a CanvasDocument, size: Size) -> RenderContext<'a> {
    RenderContext::new(document, size)
        .with_background(Color::from_rgba8(255, 255, 255, 255))
        .without_selection()
}

/// Vector snapshot of `document` at `size`.
pub fn export_svg(document: &CanvasDocument, size: Size) -> String {
    let mut surface = SvgSurface::new(size);
    render(&snapshot(document, size), &mut surface);
    surface.finish()
}

/// Word-compatible HTML document embedding a PNG.
pub fn doc_html(image: &PreviewImage) -> String {
    format!(
        "<!doctype html><html><body><img src=\"{}\" style=\"max-width:100%\"/></body></html>",
        image.to_data_url()
    )
}

/// Rasterizes documents through resvg. Holds the font database so it is
/// loaded once.
pub struct RasterExporter {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Default for RasterExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterExporter {
    /// Exporter using the fonts installed on this machine.
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} font faces for export", db.len());
        Self { fontdb: Arc::new(db) }
    }

    /// Exporter with an empty font database. Labels are not rasterized.
    pub fn without_system_fonts() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    pub fn rasterize(&self, svg: &str, size: Size) -> RenderResult<Vec<u8>> {
        let pixmap = self.render_pixmap(svg, size)?;
        pixmap.encode_png().map_err(|e| RendererError::Encode(e.to_string()))
    }

    /// Renders `svg` into a pixmap of `size`, rounded up to whole pixels.
    pub fn render_pixmap(&self, svg: &str, size: Size) -> RenderResult<tiny_skia::Pixmap> {
        let width = size.width.ceil().max(1.0) as u32;
        let height = size.height.ceil().max(1.0) as u32;

        let options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(svg, &options).map_err(|e| RendererError::Svg(e.to_string()))?;
        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(RendererError::Pixmap { width, height })?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap)
    }

    /// Opaque pixels of `document` at `size` on the export background.
    pub fn export_pixmap(&self, document: &CanvasDocument, size: Size) -> RenderResult<tiny_skia::Pixmap> {
        self.render_pixmap(&export_svg(document, size), size)
    }

    /// PNG bytes of `document` at `size`.
    pub fn export_png(&self, document: &CanvasDocument, size: Size) -> RenderResult<Vec<u8>> {
        self.rasterize(&export_svg(document, size), size)
    }

    /// Preview stored alongside a saved drawing.
    pub fn preview(&self, document: &CanvasDocument, size: Size) -> RenderResult<PreviewImage> {
        self.export_png(document, size).map(PreviewImage::from_png)
    }

    pub fn export_doc(&self, document: &CanvasDocument, size: Size) -> RenderResult<String> {
        self.preview(document, size).map(|image| doc_html(&image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paintflow_core::shapes::{Frame, PrimitiveKind, SerializableColor, Shape, ShapeStyle};

    fn document() -> CanvasDocument {
        let style = ShapeStyle::new(SerializableColor::black(), Some(SerializableColor::rgb(255, 0, 0)), 2.0);
        let mut document = CanvasDocument::with_shapes(vec![Shape::primitive(
            PrimitiveKind::Rect,
            Frame::new(10.0, 10.0, 100.0, 50.0),
            style,
        )]);
        document.set_selection(Some(0)).unwrap();
        document
    }

    #[test]
    fn test_svg_export_has_no_selection() {
        let svg = export_svg(&document(), Size::new(200.0, 100.0));
        assert!(svg.contains("fill=\"#ff0000\""));
        assert!(!svg.contains("stroke-dasharray"));
        assert!(svg.contains("fill=\"#ffffff\""));
    }

    #[test]
    fn test_png_pixels() {
        let exporter = RasterExporter::without_system_fonts();
        let png = exporter.export_png(&document(), Size::new(200.0, 100.0)).unwrap();
        let pixmap = tiny_skia::Pixmap::decode_png(&png).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (200, 100));

        let inside = pixmap.pixel(50, 30).unwrap();
        assert_eq!((inside.red(), inside.green(), inside.blue(), inside.alpha()), (255, 0, 0, 255));
        let outside = pixmap.pixel(150, 80).unwrap();
        assert_eq!((outside.red(), outside.green(), outside.blue()), (255, 255, 255));
    }

    #[test]
    fn test_doc_embeds_png() {
        let exporter = RasterExporter::without_system_fonts();
        let html = exporter.export_doc(&document(), Size::new(50.0, 50.0)).unwrap();
        assert!(html.starts_with("<!doctype html><html><body><img src=\"data:image/png;base64,"));
        assert!(html.ends_with("style=\"max-width:100%\"/></body></html>"));
    }

    #[test]
    fn test_bad_svg_is_an_error() {
        let exporter = RasterExporter::without_system_fonts();
        assert!(matches!(
            exporter.rasterize("<not-svg", Size::new(10.0, 10.0)),
            Err(RendererError::Svg(_))
        ));
    }
}
