//! Coordinate types and unit conversion.
//!
//! Engines describe pages in native units of 1/72 inch. The host works in
//! device units (native units scaled by a resolution) and in normalized
//! fractions of the page size. Conversions never round and never clamp:
//! content that bleeds past the page box keeps fractions outside `[0, 1]`.

use serde::{Deserialize, Serialize};

/// Resolution of native page space, in units per inch.
pub const NATIVE_DPI: f64 = 72.0;

/// Horizontal and vertical resolution in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dpi {
    /// Horizontal resolution
    pub x: f64,
    /// Vertical resolution
    pub y: f64,
}

impl Dpi {
    /// Native page resolution (72x72).
    pub const NATIVE: Dpi = Dpi {
        x: NATIVE_DPI,
        y: NATIVE_DPI,
    };

    /// Create a resolution with distinct axes.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a resolution with the same value on both axes.
    pub fn uniform(dpi: f64) -> Self {
        Self { x: dpi, y: dpi }
    }

    /// Device units per native unit on the horizontal axis.
    pub fn scale_x(&self) -> f64 {
        self.x / NATIVE_DPI
    }

    /// Device units per native unit on the vertical axis.
    pub fn scale_y(&self) -> f64 {
        self.y / NATIVE_DPI
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self::NATIVE
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeF {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl SizeF {
    /// Create a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A point in native or device space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert a native point to device units at `dpi`.
    pub fn to_device(&self, dpi: Dpi) -> Point {
        Point::new(self.x * dpi.scale_x(), self.y * dpi.scale_y())
    }

    /// Normalize a device point against the page's device size.
    pub fn normalize(&self, page: SizeF) -> Point {
        Point::new(self.x / page.width, self.y / page.height)
    }
}

/// An axis-aligned rectangle given by its top-left and bottom-right corners.
///
/// The same type carries native and device coordinates; the function that
/// produced it states which.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f64,
    /// Top edge
    pub y0: f64,
    /// Right edge
    pub x1: f64,
    /// Bottom edge
    pub y1: f64,
}

impl Rect {
    /// Create a rectangle from its corners.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Size of the rectangle.
    pub fn size(&self) -> SizeF {
        SizeF::new(self.width(), self.height())
    }

    /// Check if the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Convert a native rectangle to device units at `dpi`.
    pub fn to_device(&self, dpi: Dpi) -> Rect {
        let sx = dpi.scale_x();
        let sy = dpi.scale_y();
        Rect::new(self.x0 * sx, self.y0 * sy, self.x1 * sx, self.y1 * sy)
    }

    /// Normalize a device rectangle against the page's device size.
    pub fn normalize(&self, page: SizeF) -> NormalizedRect {
        NormalizedRect {
            left: self.x0 / page.width,
            top: self.y0 / page.height,
            right: self.x1 / page.width,
            bottom: self.y1 / page.height,
        }
    }
}

/// Four corners of a possibly rotated glyph box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quad {
    /// Upper-left corner
    pub ul: Point,
    /// Upper-right corner
    pub ur: Point,
    /// Lower-left corner
    pub ll: Point,
    /// Lower-right corner
    pub lr: Point,
}

impl Quad {
    /// Build the quad covering an axis-aligned rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            ul: Point::new(rect.x0, rect.y0),
            ur: Point::new(rect.x1, rect.y0),
            ll: Point::new(rect.x0, rect.y1),
            lr: Point::new(rect.x1, rect.y1),
        }
    }

    /// Smallest axis-aligned rectangle containing all four corners.
    pub fn bounds(&self) -> Rect {
        let xs = [self.ul.x, self.ur.x, self.ll.x, self.lr.x];
        let ys = [self.ul.y, self.ur.y, self.ll.y, self.lr.y];
        Rect::new(
            xs.iter().copied().fold(f64::INFINITY, f64::min),
            ys.iter().copied().fold(f64::INFINITY, f64::min),
            xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )
    }
}

/// A 2D affine transform `[a b c d e f]`, applied as
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// A pure scale transform.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Apply the transform to a point.
    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Apply the transform to a rectangle, returning its bounding box.
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        let q = Quad::from_rect(rect);
        Quad {
            ul: self.transform_point(q.ul),
            ur: self.transform_point(q.ur),
            ll: self.transform_point(q.ll),
            lr: self.transform_point(q.lr),
        }
        .bounds()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A rectangle expressed as fractions of the page size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedRect {
    /// Left edge fraction
    pub left: f64,
    /// Top edge fraction
    pub top: f64,
    /// Right edge fraction
    pub right: f64,
    /// Bottom edge fraction
    pub bottom: f64,
}

impl NormalizedRect {
    /// Create a normalized rectangle.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width as a fraction of the page width.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height as a fraction of the page height.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Map back to device units for a page of the given device size.
    pub fn denormalize(&self, page: SizeF) -> Rect {
        Rect::new(
            self.left * page.width,
            self.top * page.height,
            self.right * page.width,
            self.bottom * page.height,
        )
    }

    /// Check whether a normalized point falls inside the rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Device-unit size of a page whose native bounds are `bounds`.
pub fn page_size_at(bounds: Rect, dpi: Dpi) -> SizeF {
    SizeF::new(
        bounds.width() * dpi.scale_x(),
        bounds.height() * dpi.scale_y(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_to_device_scales_each_axis() {
        let native = Rect::new(72.0, 36.0, 144.0, 72.0);
        let device = native.to_device(Dpi::new(144.0, 96.0));
        assert!(approx(device.x0, 144.0));
        assert!(approx(device.y0, 48.0));
        assert!(approx(device.x1, 288.0));
        assert!(approx(device.y1, 96.0));
    }

    #[test]
    fn test_native_dpi_is_identity() {
        let native = Rect::new(1.5, 2.5, 3.5, 4.5);
        assert_eq!(native.to_device(Dpi::NATIVE), native);
    }

    #[test]
    fn test_normalize_does_not_clamp() {
        let page = SizeF::new(100.0, 200.0);
        let bleed = Rect::new(-10.0, 190.0, 110.0, 220.0).normalize(page);
        assert!(approx(bleed.left, -0.1));
        assert!(approx(bleed.right, 1.1));
        assert!(approx(bleed.bottom, 1.1));
    }

    #[test]
    fn test_normalize_round_trip() {
        let page = SizeF::new(612.0 * 1.5, 792.0 * 1.5);
        let rects = [
            Rect::new(0.0, 0.0, 918.0, 1188.0),
            Rect::new(12.25, 40.5, 80.75, 52.125),
            Rect::new(-3.0, -7.0, 1000.0, 1300.0),
        ];
        for rect in rects {
            let back = rect.normalize(page).denormalize(page);
            assert!(approx(back.x0, rect.x0));
            assert!(approx(back.y0, rect.y0));
            assert!(approx(back.x1, rect.x1));
            assert!(approx(back.y1, rect.y1));
        }
    }

    #[test]
    fn test_quad_bounds() {
        let quad = Quad {
            ul: Point::new(10.0, 5.0),
            ur: Point::new(20.0, 3.0),
            ll: Point::new(9.0, 15.0),
            lr: Point::new(19.0, 14.0),
        };
        assert_eq!(quad.bounds(), Rect::new(9.0, 3.0, 20.0, 15.0));
    }

    #[test]
    fn test_matrix_scale() {
        let m = Matrix::scale(2.0, 0.5);
        let p = m.transform_point(Point::new(10.0, 10.0));
        assert_eq!(p, Point::new(20.0, 5.0));
        assert_eq!(
            m.transform_rect(Rect::new(0.0, 0.0, 612.0, 792.0)),
            Rect::new(0.0, 0.0, 1224.0, 396.0)
        );
    }

    #[test]
    fn test_page_size_at() {
        let size = page_size_at(Rect::new(0.0, 0.0, 612.0, 792.0), Dpi::uniform(144.0));
        assert!(approx(size.width, 1224.0));
        assert!(approx(size.height, 1584.0));
    }
}
