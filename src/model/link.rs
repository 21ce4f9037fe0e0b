//! Hyperlink types.

use serde::{Deserialize, Serialize};

use super::{Anchor, Viewport};
use crate::geometry::NormalizedRect;

/// Where a link leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LinkTarget {
    /// A URI outside the document
    External {
        /// Target URI
        uri: String,
    },
    /// A position inside the document
    Internal {
        /// Zero-based target page
        page: usize,
        /// Normalized horizontal position on the target page
        x: f64,
        /// Normalized vertical position on the target page
        y: f64,
    },
}

impl LinkTarget {
    /// Check if the target is outside the document.
    pub fn is_external(&self) -> bool {
        matches!(self, LinkTarget::External { .. })
    }

    /// Viewport to jump to, for internal targets.
    pub fn viewport(&self) -> Option<Viewport> {
        match self {
            LinkTarget::External { .. } => None,
            LinkTarget::Internal { page, x, y } => {
                Some(Viewport::at(*page, *x, *y, Anchor::TopLeft))
            }
        }
    }
}

/// An active link region on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Link target
    pub target: LinkTarget,
    /// Active area, normalized against the source page
    pub rect: NormalizedRect,
}

impl Link {
    /// Create a link.
    pub fn new(target: LinkTarget, rect: NormalizedRect) -> Self {
        Self { target, rect }
    }
}
