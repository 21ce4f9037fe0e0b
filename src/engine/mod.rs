//! Rendering engine abstraction layer.
//!
//! Provides a trait-based interface to the native engine that actually
//! parses and draws documents, isolating it from the normalization logic.
//! Nothing in this crate holds an engine value across calls except the
//! document handle owned by [`crate::Document`].
//!
//! Engine handles are not assumed to be reentrant: [`EngineDocument`] only
//! needs to be `Send`, and every call into it is serialized by the
//! document lock.

mod pixmap;
mod stext;

pub use pixmap::Pixmap;
pub use stext::{StextBlock, StextChar, StextLine, StextPage};

use std::path::Path;

use crate::error::Result;
use crate::geometry::{Matrix, Rect};
use crate::model::PageMode;

/// URI prefix engines use for named destinations.
pub const NAMED_DEST_PREFIX: &str = "#nameddest=";

/// Entry point of a rendering engine.
pub trait Engine: Send + Sync {
    /// Short engine name used in log output.
    fn name(&self) -> &str;

    /// Open the document at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn EngineDocument>>;
}

/// An open engine document.
pub trait EngineDocument: Send {
    /// Whether the document is encrypted and still needs a password.
    fn needs_password(&self) -> bool;

    /// Try to unlock the document. Returns true on success.
    fn authenticate(&mut self, password: &str) -> bool;

    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Load the native handle for a zero-based page index.
    ///
    /// The returned page borrows the document and is released on drop.
    fn load_page(&self, index: usize) -> Result<Box<dyn EnginePage + '_>>;

    /// Allocate a drawing surface for a `width` x `height` RGBA raster.
    ///
    /// Engines with row padding return a pixmap whose stride exceeds
    /// `width * 4`.
    fn new_pixmap(&self, width: u32, height: u32) -> Pixmap {
        Pixmap::new(width, height)
    }

    /// Whether a link URI points outside the document.
    fn is_external_link(&self, uri: &str) -> bool {
        is_external_uri(uri)
    }

    /// Resolve an internal link URI to a page location in native units.
    ///
    /// Returns [`Location::UNRESOLVED`] when the link has no target.
    fn resolve_link(&self, uri: &str) -> Location;

    /// Name of the destination if `uri` is a named destination rather than
    /// a page location. Recognizes `#nameddest=` URIs by default.
    fn named_destination(&self, uri: &str) -> Option<String> {
        parse_named_destination(uri)
    }

    /// Head of the native outline chain, or `None` when the document has no
    /// outline.
    fn outline(&self) -> Option<Box<RawOutline>>;

    /// Value of an information dictionary entry (`Title`, `Author`, ...).
    fn info_key(&self, key: &str) -> Option<String>;

    /// Declared page presentation mode.
    fn page_mode(&self) -> PageMode {
        PageMode::None
    }

    /// Format version, e.g. `1.7`.
    fn format_version(&self) -> f32;
}

/// A loaded native page.
pub trait EnginePage {
    /// Page box in native units.
    fn bounds(&self) -> Rect;

    /// Raw presentation duration in seconds, if the page declares one.
    fn presentation_duration(&self) -> Option<f64> {
        None
    }

    /// Execute the page's drawing program onto `pixmap` through `ctm`.
    ///
    /// Failures are reported through `cookie.errors`.
    fn run(&self, ctm: &Matrix, pixmap: &mut Pixmap, cookie: &mut Cookie);

    /// Run the structured text pass over the page.
    fn structured_text(&self, cookie: &mut Cookie) -> Result<StextPage>;

    /// Link annotations on the page, in native order.
    fn links(&self) -> Vec<RawLink>;
}

/// Progress and error counter shared with a running engine pass.
#[derive(Debug, Clone, Default)]
pub struct Cookie {
    /// Number of errors met while running
    pub errors: u32,
    /// Set to request the engine to stop early
    pub abort: bool,
    /// Set by the engine when the pass did not finish
    pub incomplete: bool,
}

impl Cookie {
    /// Create a fresh cookie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the pass reported any error.
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// A link target resolved by the engine, in native units of the target page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Zero-based page index, `-1` when unresolved
    pub page: i32,
    /// Horizontal anchor
    pub x: f64,
    /// Vertical anchor
    pub y: f64,
}

impl Location {
    /// Sentinel for links without a navigable target.
    pub const UNRESOLVED: Location = Location {
        page: -1,
        x: 0.0,
        y: 0.0,
    };

    /// Create a resolved location.
    pub fn new(page: i32, x: f64, y: f64) -> Self {
        Self { page, x, y }
    }

    /// Whether the location points at a page.
    pub fn is_resolved(&self) -> bool {
        self.page >= 0
    }
}

/// A link annotation as reported by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLink {
    /// Active area in native units
    pub rect: Rect,
    /// Engine-encoded target
    pub uri: String,
}

impl RawLink {
    /// Create a raw link.
    pub fn new(rect: Rect, uri: impl Into<String>) -> Self {
        Self {
            rect,
            uri: uri.into(),
        }
    }
}

/// One entry of the native outline chain.
///
/// Entries are linked to their next sibling and first child, matching the
/// shape engines store outlines in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOutline {
    /// Display title
    pub title: String,
    /// Engine-encoded target, empty when the entry has none
    pub uri: String,
    /// Whether the entry is expanded by default
    pub is_open: bool,
    /// First child
    pub down: Option<Box<RawOutline>>,
    /// Next sibling
    pub next: Option<Box<RawOutline>>,
}

impl RawOutline {
    /// Create an entry without children or siblings.
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Mark the entry as expanded.
    pub fn open(mut self) -> Self {
        self.is_open = true;
        self
    }

    /// Attach children, linking them into a sibling chain.
    pub fn with_children(mut self, children: Vec<RawOutline>) -> Self {
        self.down = Self::chain(children);
        self
    }

    /// Link entries into a sibling chain and return its head.
    pub fn chain(entries: Vec<RawOutline>) -> Option<Box<RawOutline>> {
        entries.into_iter().rev().fold(None, |next, mut entry| {
            entry.next = next;
            Some(Box::new(entry))
        })
    }
}

/// Check whether a URI carries a scheme (`scheme:rest`), which marks it as
/// external to the document.
pub fn is_external_uri(uri: &str) -> bool {
    let Some((scheme, _)) = uri.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Extract the name from a `#nameddest=` URI.
pub fn parse_named_destination(uri: &str) -> Option<String> {
    uri.strip_prefix(NAMED_DEST_PREFIX)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
