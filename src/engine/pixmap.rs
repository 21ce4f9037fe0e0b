//! Engine drawing surface.

use crate::geometry::Rect;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// An RGBA raster an engine draws into.
///
/// Rows are `stride` bytes apart; only the first `width * 4` bytes of each
/// row hold pixels.
#[derive(Debug, Clone)]
pub struct Pixmap {
    width: u32,
    height: u32,
    stride: usize,
    samples: Vec<u8>,
}

impl Pixmap {
    /// Allocate a tightly packed pixmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_stride(width, height, width as usize * BYTES_PER_PIXEL)
    }

    /// Allocate a pixmap with explicit row stride.
    ///
    /// A stride shorter than one row of pixels is widened to fit.
    pub fn with_stride(width: u32, height: u32, stride: usize) -> Self {
        let stride = stride.max(width as usize * BYTES_PER_PIXEL);
        Self {
            width,
            height,
            stride,
            samples: vec![0; stride * height as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes of pixel data in one row.
    pub fn row_len(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Whether rows are packed without padding.
    pub fn is_packed(&self) -> bool {
        self.stride == self.row_len()
    }

    /// All samples including row padding.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Mutable access to all samples.
    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    /// Pixel bytes of row `y`, without padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.samples[start..start + self.row_len()]
    }

    /// Mutable pixel bytes of row `y`, without padding.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let len = self.row_len();
        &mut self.samples[start..start + len]
    }

    /// Set every sample byte, padding included, to `value`.
    ///
    /// `0xff` yields opaque white.
    pub fn clear_with_value(&mut self, value: u8) {
        self.samples.fill(value);
    }

    /// Fill a device-space rectangle with a colour, clipped to the pixmap.
    pub fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]) {
        let x0 = rect.x0.floor().max(0.0) as u32;
        let y0 = rect.y0.floor().max(0.0) as u32;
        let x1 = (rect.x1.ceil().max(0.0) as u32).min(self.width);
        let y1 = (rect.y1.ceil().max(0.0) as u32).min(self.height);
        for y in y0..y1 {
            let row = self.row_mut(y);
            for x in x0..x1 {
                let at = x as usize * BYTES_PER_PIXEL;
                row[at..at + BYTES_PER_PIXEL].copy_from_slice(&rgba);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_pixmap() {
        let pixmap = Pixmap::new(3, 2);
        assert_eq!(pixmap.stride(), 12);
        assert!(pixmap.is_packed());
        assert_eq!(pixmap.samples().len(), 24);
    }

    #[test]
    fn test_padded_rows() {
        let mut pixmap = Pixmap::with_stride(3, 2, 16);
        assert!(!pixmap.is_packed());
        assert_eq!(pixmap.samples().len(), 32);

        pixmap.row_mut(1).fill(7);
        assert_eq!(pixmap.row(1), &[7; 12]);
        assert_eq!(&pixmap.samples()[12..16], &[0; 4]);
    }

    #[test]
    fn test_short_stride_widened() {
        let pixmap = Pixmap::with_stride(4, 1, 2);
        assert_eq!(pixmap.stride(), 16);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut pixmap = Pixmap::new(4, 4);
        pixmap.clear_with_value(0xff);
        pixmap.fill_rect(Rect::new(2.0, 2.0, 10.0, 10.0), [1, 2, 3, 4]);
        assert_eq!(&pixmap.row(3)[8..12], &[1, 2, 3, 4]);
        assert_eq!(&pixmap.row(1)[8..12], &[0xff; 4]);
    }
}
