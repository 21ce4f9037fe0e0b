//! Pixel buffer assembly.

use image::RgbaImage;

use crate::engine::{Cookie, EngineDocument, EnginePage, Pixmap};
use crate::error::{Error, Result};
use crate::geometry::Matrix;

/// Render `page` into a `width` x `height` RGBA image on opaque white.
///
/// The page's native extent is scaled to fill the pixel box on both axes.
/// When the engine reports any error during the run the result is an empty
/// (0x0) image: a partial raster is never returned.
pub fn render_page(
    doc: &dyn EngineDocument,
    page: &dyn EnginePage,
    width: u32,
    height: u32,
) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidSize { width, height });
    }

    let native = page.bounds().size();
    if native.is_empty() {
        log::warn!("Page has an empty page box, skipping render");
        return Ok(RgbaImage::new(0, 0));
    }

    let ctm = Matrix::scale(
        f64::from(width) / native.width,
        f64::from(height) / native.height,
    );

    let mut pixmap = doc.new_pixmap(width, height);
    pixmap.clear_with_value(0xff);

    let mut cookie = Cookie::new();
    page.run(&ctm, &mut pixmap, &mut cookie);

    if cookie.has_errors() {
        log::warn!(
            "Engine reported {} error(s) rendering at {}x{}, discarding raster",
            cookie.errors,
            width,
            height
        );
        return Ok(RgbaImage::new(0, 0));
    }

    Ok(pixmap_to_image(&pixmap))
}

/// Copy a pixmap into a tightly packed image.
///
/// Padded rows are copied one at a time; a single copy across mismatched
/// strides would shift every row after the first.
pub fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();

    let data = if pixmap.is_packed() {
        pixmap.samples().to_vec()
    } else {
        log::warn!(
            "Pixmap stride {} differs from row length {}, copying row by row",
            pixmap.stride(),
            pixmap.row_len()
        );
        let mut data = Vec::with_capacity(pixmap.row_len() * height as usize);
        for y in 0..height {
            data.extend_from_slice(pixmap.row(y));
        }
        data
    };

    RgbaImage::from_raw(width, height, data).unwrap_or_else(|| RgbaImage::new(0, 0))
}
