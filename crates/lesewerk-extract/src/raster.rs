// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rasterization fallback — when no readable text is recoverable, the
// document's pages become images instead.
//
// The built-in rasterizer walks the PDF page tree with `lopdf` and
// recovers embedded page images (scanned documents store each page as a
// single DCTDecode JPEG or a FlateDecode pixel stream). Pages without a
// recoverable image render as a bordered placeholder card so the page
// count stays visible to the reader. Callers with a full page renderer
// (pdfium, MuPDF) can supply their own `PageRasterizer`.

use std::io::Cursor;

use async_trait::async_trait;
use image::{DynamicImage, GrayImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use lopdf::{Document, Object};
use tracing::{debug, info, instrument, warn};

use lesewerk_core::config::RasterOptions;
use lesewerk_core::error::{LesewerkError, Result};
use lesewerk_core::types::RenderedPage;

/// The outcome of one batched rasterization call.
#[derive(Debug, Clone)]
pub struct RasterBatch {
    /// Rendered pages, capped at `RasterOptions::max_pages`.
    pub pages: Vec<RenderedPage>,
    /// Authoritative page count from the page tree (may exceed
    /// `pages.len()` when the cap applied).
    pub page_count: u32,
}

/// Converts document pages into images, one batched call per document.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    async fn rasterize(&self, data: &[u8], options: &RasterOptions) -> Result<RasterBatch>;
}

/// Built-in lopdf-based rasterizer.
pub struct PdfRasterizer;

#[async_trait]
impl PageRasterizer for PdfRasterizer {
    #[instrument(skip_all, fields(len = data.len()))]
    async fn rasterize(&self, data: &[u8], options: &RasterOptions) -> Result<RasterBatch> {
        let document = Document::load_mem(data)
            .map_err(|err| LesewerkError::ConversionFailure(format!("PDF load failed: {err}")))?;

        if document.trailer.get(b"Encrypt").is_ok() {
            return Err(LesewerkError::CorruptDocument(
                "document is encrypted".into(),
            ));
        }

        let page_ids = document.get_pages();
        let page_count = page_ids.len() as u32;
        if page_count == 0 {
            return Err(LesewerkError::ConversionFailure(
                "document has no pages".into(),
            ));
        }

        let mut pages = Vec::new();
        for (index, (_, page_id)) in page_ids
            .iter()
            .take(options.max_pages as usize)
            .enumerate()
        {
            let rendered = match embedded_page_image(&document, *page_id) {
                Some(img) => bounded(img, options),
                None => placeholder_card(options),
            };
            pages.push(RenderedPage {
                index: index as u32,
                data: encode_png(&rendered)?,
                mime: "image/png".into(),
            });
        }

        info!(
            rendered = pages.len(),
            page_count, "rasterization batch complete"
        );
        Ok(RasterBatch { pages, page_count })
    }
}

/// Follow a reference one level if needed.
fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Recover the first embedded image XObject of a page, if any.
///
/// Scanned documents typically carry exactly one full-page image per page.
/// DCTDecode streams are raw JPEG; FlateDecode streams hold raw pixels
/// described by Width/Height/ColorSpace. Everything else is skipped.
fn embedded_page_image(document: &Document, page_id: lopdf::ObjectId) -> Option<DynamicImage> {
    let page = document.get_object(page_id).ok()?;
    let Object::Dictionary(page_dict) = page else {
        return None;
    };
    let Object::Dictionary(resources) = resolve(document, page_dict.get(b"Resources").ok()?)
    else {
        return None;
    };
    let Object::Dictionary(xobjects) = resolve(document, resources.get(b"XObject").ok()?) else {
        return None;
    };

    for (name, value) in xobjects.iter() {
        let Object::Stream(stream) = resolve(document, value) else {
            continue;
        };
        let is_image = matches!(
            stream.dict.get(b"Subtype"),
            Ok(Object::Name(subtype)) if subtype.as_slice() == b"Image"
        );
        if !is_image {
            continue;
        }

        let decoded = match stream.dict.get(b"Filter") {
            Ok(Object::Name(filter)) if filter.as_slice() == b"DCTDecode" => {
                image::load_from_memory(&stream.content).ok()
            }
            Ok(Object::Name(filter)) if filter.as_slice() == b"FlateDecode" => {
                let raw = stream.decompressed_content().ok()?;
                let width = match stream.dict.get(b"Width") {
                    Ok(Object::Integer(w)) => *w as u32,
                    _ => continue,
                };
                let height = match stream.dict.get(b"Height") {
                    Ok(Object::Integer(h)) => *h as u32,
                    _ => continue,
                };
                match stream.dict.get(b"ColorSpace") {
                    Ok(Object::Name(cs)) if cs.as_slice() == b"DeviceGray" => {
                        GrayImage::from_raw(width, height, raw).map(DynamicImage::ImageLuma8)
                    }
                    _ => RgbImage::from_raw(width, height, raw).map(DynamicImage::ImageRgb8),
                }
            }
            _ => None,
        };

        match decoded {
            Some(img) => {
                debug!(
                    xobject = %String::from_utf8_lossy(name),
                    width = img.width(),
                    height = img.height(),
                    "embedded page image recovered"
                );
                return Some(img);
            }
            None => {
                warn!(
                    xobject = %String::from_utf8_lossy(name),
                    "image XObject present but undecodable"
                );
            }
        }
    }
    None
}

/// Fit an image inside the configured bounds, preserving aspect ratio.
fn bounded(img: DynamicImage, options: &RasterOptions) -> DynamicImage {
    if img.width() <= options.max_width && img.height() <= options.max_height {
        return img;
    }
    img.resize(
        options.max_width,
        options.max_height,
        image::imageops::FilterType::Lanczos3,
    )
}

/// A white page card with a gray border, page-shaped at US Letter aspect
/// ratio within the configured bounds.
fn placeholder_card(options: &RasterOptions) -> DynamicImage {
    // Floor of 3 keeps the inner border rectangle strictly positive.
    let width = options.max_width.min(612).max(3);
    let height = options.max_height.min(792).max(3);
    let mut card = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    draw_hollow_rect_mut(
        &mut card,
        Rect::at(0, 0).of_size(width, height),
        Rgb([180, 180, 180]),
    );
    draw_hollow_rect_mut(
        &mut card,
        Rect::at(1, 1).of_size(width - 2, height - 2),
        Rgb([180, 180, 180]),
    );
    DynamicImage::ImageRgb8(card)
}

/// Encode to PNG bytes.
fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| LesewerkError::ConversionFailure(format!("PNG encoding failed: {err}")))?;
    Ok(bytes)
}
