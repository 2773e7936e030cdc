//! Paginated PDF export.
//!
//! The document is rasterized once and placed on A4 landscape pages, scaled
//! to the page width. A drawing that fits on one page is centered on it. A
//! taller one continues over as many pages as needed, each page showing the
//! next slice of the same image.

use crate::export::RasterExporter;
use crate::renderer::{RenderResult, RendererError};
use kurbo::Size;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use paintflow_core::canvas::CanvasDocument;

/// A4 landscape, in points.
pub const PAGE_SIZE: Size = Size::new(842.0, 595.0);

const IMAGE_NAME: &str = "Im0";

/// Placement of the exported image across pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page: Size,
    /// The whole image once scaled.
    pub image: Size,
    /// Distance from the top of the first page to the top of the image.
    pub top: f64,
    pub pages: usize,
}

impl PageLayout {
    pub fn new(content: Size, page: Size) -> Self {
        if content.width <= 0.0 || content.height <= 0.0 {
            return Self {
                page,
                image: Size::ZERO,
                top: 0.0,
                pages: 1,
            };
        }
        let scale = page.width / content.width;
        let image = Size::new(page.width, content.height * scale);
        if image.height <= page.height {
            return Self {
                page,
                image,
                top: (page.height - image.height) / 2.0,
                pages: 1,
            };
        }
        // Tolerate rounding so an exact multiple does not open an empty page.
        let pages = ((image.height - 1e-6) / page.height).ceil() as usize;
        Self {
            page,
            image,
            top: 0.0,
            pages,
        }
    }

    /// Lower-left corner of the image on page `index`, in PDF coordinates
    /// (y grows upward).
    pub fn origin(&self, index: usize) -> (f64, f64) {
        let y = self.page.height - self.top - self.image.height + index as f64 * self.page.height;
        (0.0, y)
    }
}

fn real(value: f64) -> Object {
    Object::from(value as f32)
}

fn pdf_error(err: impl std::fmt::Display) -> RendererError {
    RendererError::Pdf(err.to_string())
}

/// Writes `pixmap` as a PDF following `layout`.
pub fn write_pdf(pixmap: &tiny_skia::Pixmap, layout: &PageLayout) -> RenderResult<Vec<u8>> {
    // Export pixmaps sit on an opaque background, so alpha carries nothing.
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(pixmap.width()),
            "Height" => i64::from(pixmap.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        },
        rgb,
    ));
    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! { IMAGE_NAME => image_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages);
    for index in 0..layout.pages {
        let (x, y) = layout.origin(index);
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        real(layout.image.width),
                        real(0.0),
                        real(0.0),
                        real(layout.image.height),
                        real(x),
                        real(y),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().map_err(pdf_error)?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![real(0.0), real(0.0), real(layout.page.width), real(layout.page.height)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(pdf_error)?;
    log::debug!("Wrote {}-page PDF ({} bytes)", layout.pages, bytes.len());
    Ok(bytes)
}

impl RasterExporter {
    /// A4 PDF of `document` rendered at `size`.
    pub fn export_pdf(&self, document: &CanvasDocument, size: Size) -> RenderResult<Vec<u8>> {
        let pixmap = self.export_pixmap(document, size)?;
        let content = Size::new(f64::from(pixmap.width()), f64::from(pixmap.height()));
        write_pdf(&pixmap, &PageLayout::new(content, PAGE_SIZE))
    }
}
