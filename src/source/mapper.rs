//! Unit conversion around source index queries.

use crate::geometry::{Dpi, SizeF};
use crate::model::{Anchor, Viewport};

use super::{SourceIndex, SourceLocation, SourceReference};

/// A loaded source index together with the resolution it works in.
pub struct SourceMapper {
    index: Box<dyn SourceIndex>,
    reference_dpi: f64,
}

impl SourceMapper {
    /// Wrap `index`, whose coordinates are expressed at `reference_dpi`.
    pub fn new(index: Box<dyn SourceIndex>, reference_dpi: f64) -> Self {
        Self {
            index,
            reference_dpi,
        }
    }

    /// Resolution the index expects coordinates in.
    pub fn reference_dpi(&self) -> f64 {
        self.reference_dpi
    }

    /// Find the source location under a device point on a 0-based page.
    ///
    /// Only the first hit is used. A negative column becomes 0.
    pub fn forward(&mut self, page: usize, x: f64, y: f64, dpi: Dpi) -> Option<SourceLocation> {
        let page = u32::try_from(page + 1).ok()?;
        let x = x * self.reference_dpi / dpi.x;
        let y = y * self.reference_dpi / dpi.y;

        let hit = self.index.forward_query(page, x, y).into_iter().next()?;
        Some(SourceLocation::new(hit.name, hit.line, hit.column.max(0)))
    }

    /// Find the rendered viewport of a source reference.
    ///
    /// `page_size` returns the size of a 0-based page at `dpi`, or `None`
    /// when the page does not exist. The viewport is anchored at its
    /// center, with half a device unit added to the vertical position.
    pub fn reverse<F>(&mut self, reference: &SourceReference, dpi: Dpi, page_size: F) -> Option<Viewport>
    where
        F: FnOnce(usize) -> Option<SizeF>,
    {
        let hit = self
            .index
            .reverse_query(&reference.path, reference.line, 0)
            .into_iter()
            .next()?;

        let Some(page) = (hit.page as usize).checked_sub(1) else {
            log::warn!("Source index returned page 0 for {}", reference);
            return None;
        };
        let size = page_size(page)?;

        let px = hit.h * dpi.x / self.reference_dpi;
        let py = hit.v * dpi.y / self.reference_dpi;

        Some(Viewport::at(
            page,
            px / size.width,
            (py + 0.5) / size.height,
            Anchor::Center,
        ))
    }
}

impl std::fmt::Debug for SourceMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceMapper")
            .field("reference_dpi", &self.reference_dpi)
            .finish_non_exhaustive()
    }
}
