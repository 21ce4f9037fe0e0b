//! Per-call page handle.

use image::RgbaImage;

use crate::engine::{EngineDocument, EnginePage};
use crate::error::{Error, Result};
use crate::extract;
use crate::geometry::{page_size_at, Dpi, Rect, SizeF};
use crate::model::{Link, TextBox};

/// A page loaded for the duration of one operation.
///
/// The native page is released when the value is dropped. It borrows the
/// engine document, so it cannot outlive the document lock.
pub struct Page<'a> {
    doc: &'a dyn EngineDocument,
    raw: Box<dyn EnginePage + 'a>,
    index: usize,
}

impl<'a> Page<'a> {
    /// Load the page at a zero-based `index`.
    pub fn load(doc: &'a dyn EngineDocument, index: usize) -> Result<Self> {
        let count = doc.page_count();
        if index >= count {
            return Err(Error::PageOutOfRange(index, count));
        }
        let raw = doc.load_page(index)?;
        Ok(Self { doc, raw, index })
    }

    /// Zero-based page index.
    pub fn number(&self) -> usize {
        self.index
    }

    /// Page box in native units.
    pub fn bounds(&self) -> Rect {
        self.raw.bounds()
    }

    /// Page size in device units at `dpi`.
    pub fn size(&self, dpi: Dpi) -> SizeF {
        page_size_at(self.raw.bounds(), dpi)
    }

    /// Presentation duration in seconds.
    ///
    /// Durations shorter than `min_seconds` are treated as absent.
    pub fn duration(&self, min_seconds: f64) -> Option<f64> {
        self.raw
            .presentation_duration()
            .filter(|seconds| *seconds >= min_seconds)
    }

    /// Render the page into a `width` x `height` image.
    pub fn render(&self, width: u32, height: u32) -> Result<RgbaImage> {
        extract::render_page(self.doc, self.raw.as_ref(), width, height)
    }

    /// Character boxes in device units at `dpi`.
    pub fn text_boxes(&self, dpi: Dpi) -> Vec<TextBox> {
        extract::extract_text_boxes(self.raw.as_ref(), dpi)
    }

    /// Links with rectangles normalized at `dpi`.
    pub fn links(&self, dpi: Dpi) -> Vec<Link> {
        extract::page_links(self.doc, self.raw.as_ref(), dpi)
    }
}
