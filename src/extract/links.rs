//! Link classification and resolution.
//!
//! Engines resolve internal links to a location in native units on the
//! target page. Normalization always happens here, against the target
//! page's own size, so link and outline destinations follow one contract.

use std::collections::HashMap;

use crate::engine::{EngineDocument, EnginePage, Location};
use crate::geometry::{page_size_at, Dpi, Point, SizeF};
use crate::model::{Anchor, Destination, Link, LinkTarget, Viewport};

/// Classification of a raw link target.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A URI outside the document
    External(String),
    /// A named destination
    Named(String),
    /// A page location in native units
    Internal(Location),
    /// No navigable target
    Unresolved,
}

/// Resolves raw link URIs against one engine document.
///
/// Target page sizes are cached for the lifetime of the resolver, which is
/// one engine interaction.
pub struct LinkResolver<'a> {
    doc: &'a dyn EngineDocument,
    page_sizes: HashMap<usize, Option<SizeF>>,
}

impl<'a> LinkResolver<'a> {
    /// Create a resolver for `doc`.
    pub fn new(doc: &'a dyn EngineDocument) -> Self {
        Self {
            doc,
            page_sizes: HashMap::new(),
        }
    }

    /// Classify a raw outline target.
    ///
    /// Named destinations are recognized before the engine resolver runs.
    pub fn classify(&self, uri: &str) -> Resolution {
        if uri.is_empty() {
            return Resolution::Unresolved;
        }
        if self.doc.is_external_link(uri) {
            return Resolution::External(uri.to_string());
        }
        if let Some(name) = self.doc.named_destination(uri) {
            return Resolution::Named(name);
        }
        self.locate(uri)
    }

    /// Classify a raw page link target.
    ///
    /// Page links are either external or handed to the engine resolver.
    pub fn classify_link(&self, uri: &str) -> Resolution {
        if uri.is_empty() {
            return Resolution::Unresolved;
        }
        if self.doc.is_external_link(uri) {
            return Resolution::External(uri.to_string());
        }
        self.locate(uri)
    }

    fn locate(&self, uri: &str) -> Resolution {
        let location = self.doc.resolve_link(uri);
        if !location.is_resolved() || location.page as usize >= self.doc.page_count() {
            log::debug!("Link {:?} has no resolvable target", uri);
            return Resolution::Unresolved;
        }
        Resolution::Internal(location)
    }

    /// Resolve a raw page link target into a link target.
    ///
    /// A named destination the engine cannot place on a page yields `None`.
    pub fn resolve(&mut self, uri: &str) -> Option<LinkTarget> {
        match self.classify_link(uri) {
            Resolution::External(uri) => Some(LinkTarget::External { uri }),
            Resolution::Internal(location) => {
                let (page, anchor) = self.normalize(location)?;
                Some(LinkTarget::Internal {
                    page,
                    x: anchor.x,
                    y: anchor.y,
                })
            }
            Resolution::Named(_) | Resolution::Unresolved => {
                if let Some(name) = self.doc.named_destination(uri) {
                    log::warn!("Named destination {:?} on a page link is not stored", name);
                }
                None
            }
        }
    }

    /// Resolve a raw target into an outline destination.
    pub fn destination(&mut self, uri: &str) -> Option<Destination> {
        match self.classify(uri) {
            Resolution::External(uri) => Some(Destination::External { uri }),
            Resolution::Named(name) => Some(Destination::Named { name }),
            Resolution::Internal(location) => {
                let (page, anchor) = self.normalize(location)?;
                Some(Destination::Internal(Viewport::at(
                    page,
                    anchor.x,
                    anchor.y,
                    Anchor::TopLeft,
                )))
            }
            Resolution::Unresolved => None,
        }
    }

    /// Normalize a native location against its target page.
    fn normalize(&mut self, location: Location) -> Option<(usize, Point)> {
        let page = location.page as usize;
        let size = self.target_size(page)?;
        let anchor = Point::new(location.x, location.y).normalize(size);
        Some((page, anchor))
    }

    fn target_size(&mut self, page: usize) -> Option<SizeF> {
        let doc = self.doc;
        *self.page_sizes.entry(page).or_insert_with(|| {
            match doc.load_page(page) {
                Ok(target) => {
                    let size = target.bounds().size();
                    (!size.is_empty()).then_some(size)
                }
                Err(e) => {
                    log::debug!("Cannot load link target page {}: {}", page, e);
                    None
                }
            }
        })
    }
}

/// Collect the links of `page` with rectangles normalized at `dpi`.
///
/// Links without a navigable target are left out.
pub fn page_links(doc: &dyn EngineDocument, page: &dyn EnginePage, dpi: Dpi) -> Vec<Link> {
    let page_size = page_size_at(page.bounds(), dpi);
    let mut resolver = LinkResolver::new(doc);

    page.links()
        .into_iter()
        .filter_map(|raw| {
            let rect = raw.rect.to_device(dpi).normalize(page_size);
            resolver
                .resolve(&raw.uri)
                .map(|target| Link::new(target, rect))
        })
        .collect()
}
