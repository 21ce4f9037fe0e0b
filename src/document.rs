//! Document lifecycle and the lock that serializes engine access.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use image::RgbaImage;

use crate::engine::{Engine, EngineDocument};
use crate::error::{Error, Result};
use crate::extract::build_outline;
use crate::geometry::{Dpi, SizeF};
use crate::model::{
    parse_pdf_date, DocumentInfo, InfoKey, Link, MetaDataKey, MetaValue, Outline, PageInfo,
    PageMode, TextBox, TextPage, Viewport, MIME_TYPE_PDF,
};
use crate::options::DocumentOptions;
use crate::page::Page;
use crate::source::{SourceIndexLoader, SourceLocation, SourceMapper, SourceReference};

/// Outcome of opening a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenResult {
    /// The document is open and unlocked
    Success,
    /// The document is open but needs a password before use
    NeedsPassword,
}

/// Everything that exists only while a document is open.
struct Session {
    doc: Box<dyn EngineDocument>,
    path: PathBuf,
    locked: bool,
    /// `None` until the first synopsis request; then the built outline, if any
    outline: Option<Option<Arc<Outline>>>,
    mapper: Option<SourceMapper>,
    links_attached: Vec<bool>,
}

impl Session {
    fn unlocked(&mut self) {
        self.locked = false;
        self.links_attached = vec![false; self.doc.page_count()];
    }

    fn page(&self, index: usize) -> Result<Page<'_>> {
        Page::load(self.doc.as_ref(), index)
    }
}

/// A document opened through an engine.
///
/// All engine access goes through one lock held for the full duration of
/// each operation, so a `Document` can be shared between threads behind an
/// `Arc` even though engine handles are not reentrant. Results are owned
/// and remain valid after the lock is released.
pub struct Document {
    engine: Arc<dyn Engine>,
    options: DocumentOptions,
    source_loader: Option<Arc<dyn SourceIndexLoader>>,
    state: Mutex<Option<Session>>,
}

impl Document {
    /// Create a closed document bound to `engine`.
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine,
            options: DocumentOptions::default(),
            source_loader: None,
            state: Mutex::new(None),
        }
    }

    /// Set the document options.
    pub fn with_options(mut self, options: DocumentOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the loader used to find a source index when a document opens.
    pub fn with_source_loader(mut self, loader: Arc<dyn SourceIndexLoader>) -> Self {
        self.source_loader = Some(loader);
        self
    }

    /// Options in effect.
    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Session>>> {
        Ok(self.state.lock()?)
    }

    /// Run `f` on an open, unlocked session while holding the lock.
    fn with_session<T>(&self, f: impl FnOnce(&mut Session) -> Result<T>) -> Result<T> {
        let mut guard = self.lock()?;
        let session = guard.as_mut().ok_or(Error::NotOpen)?;
        if session.locked {
            return Err(Error::Locked);
        }
        f(session)
    }

    // ---- lifecycle ----

    /// Open the document at `path`, closing any document already open.
    ///
    /// An encrypted document is left open and locked, and
    /// [`OpenResult::NeedsPassword`] is returned.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<OpenResult> {
        let path = path.as_ref();
        let mut guard = self.lock()?;

        if guard.take().is_some() {
            log::debug!("Closing previous document before opening {}", path.display());
        }

        let doc = self.engine.open(path).map_err(|e| match e {
            Error::Open { .. } => e,
            other => Error::Open {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;

        let mapper = self.source_loader.as_ref().and_then(|loader| {
            let index = loader.load(path);
            if index.is_none() {
                log::warn!("No source index available for {}", path.display());
            }
            index.map(|index| SourceMapper::new(index, self.options.source_reference_dpi))
        });

        let mut session = Session {
            doc,
            path: path.to_path_buf(),
            locked: true,
            outline: None,
            mapper,
            links_attached: Vec::new(),
        };

        let result = if session.doc.needs_password() {
            log::debug!("{} is encrypted, waiting for a password", path.display());
            OpenResult::NeedsPassword
        } else {
            session.unlocked();
            log::debug!(
                "Opened {} with {} ({} pages)",
                path.display(),
                self.engine.name(),
                session.links_attached.len()
            );
            OpenResult::Success
        };

        *guard = Some(session);
        Ok(result)
    }

    /// Open the document at `path` and try `password` once if it is locked.
    pub fn open_with_password(&self, path: impl AsRef<Path>, password: &str) -> Result<OpenResult> {
        match self.open(path)? {
            OpenResult::Success => Ok(OpenResult::Success),
            OpenResult::NeedsPassword if self.unlock(password)? => Ok(OpenResult::Success),
            OpenResult::NeedsPassword => Ok(OpenResult::NeedsPassword),
        }
    }

    /// Try to unlock the open document.
    ///
    /// Returns `true` without asking the engine when it is already unlocked.
    pub fn unlock(&self, password: &str) -> Result<bool> {
        let mut guard = self.lock()?;
        let session = guard.as_mut().ok_or(Error::NotOpen)?;

        if !session.locked {
            return Ok(true);
        }
        if session.doc.authenticate(password) && !session.doc.needs_password() {
            session.unlocked();
            log::debug!("Unlocked {}", session.path.display());
            return Ok(true);
        }

        log::debug!("Wrong password for {}", session.path.display());
        Ok(false)
    }

    /// Close the document, releasing the engine handle and every cache.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.lock()?;
        if let Some(session) = guard.take() {
            log::debug!("Closed {}", session.path.display());
        }
        Ok(())
    }

    /// Whether a document is open, locked or not.
    pub fn is_open(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Whether the open document still needs a password.
    pub fn is_locked(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|session| session.locked)
    }

    // ---- pages ----

    /// Number of pages.
    pub fn page_count(&self) -> Result<usize> {
        self.with_session(|s| Ok(s.doc.page_count()))
    }

    /// Size of a page in device units at `dpi`.
    pub fn page_size(&self, index: usize, dpi: Dpi) -> Result<SizeF> {
        self.with_session(|s| Ok(s.page(index)?.size(dpi)))
    }

    /// Presentation duration of a page in seconds.
    pub fn page_duration(&self, index: usize) -> Result<Option<f64>> {
        let min = self.options.min_presentation_duration;
        self.with_session(|s| Ok(s.page(index)?.duration(min)))
    }

    /// Size and duration of every page at the document resolution.
    ///
    /// Pages the engine cannot load are reported with a zero size.
    pub fn page_infos(&self) -> Result<Vec<PageInfo>> {
        let dpi = self.options.dpi;
        let min = self.options.min_presentation_duration;

        self.with_session(|s| {
            let infos = (0..s.doc.page_count())
                .map(|index| match s.page(index) {
                    Ok(page) => {
                        let size = page.size(dpi);
                        PageInfo {
                            index,
                            width: size.width,
                            height: size.height,
                            duration: page.duration(min),
                        }
                    }
                    Err(e) => {
                        log::warn!("Cannot load page {}: {}", index, e);
                        PageInfo {
                            index,
                            width: 0.0,
                            height: 0.0,
                            duration: None,
                        }
                    }
                })
                .collect();
            Ok(infos)
        })
    }

    /// Run `f` on a loaded page while holding the lock.
    pub fn with_page<T>(&self, index: usize, f: impl FnOnce(&Page<'_>) -> T) -> Result<T> {
        self.with_session(|s| Ok(f(&s.page(index)?)))
    }

    // ---- extraction ----

    /// Render a page into a `width` x `height` image on white.
    ///
    /// A render the engine reports errors for yields an empty image.
    pub fn render_page(&self, index: usize, width: u32, height: u32) -> Result<RgbaImage> {
        self.with_session(|s| s.page(index)?.render(width, height))
    }

    /// Render a page, also returning its links the first time it is rendered
    /// in this session.
    pub fn render_page_with_links(
        &self,
        index: usize,
        width: u32,
        height: u32,
    ) -> Result<(RgbaImage, Option<Vec<Link>>)> {
        let dpi = self.options.dpi;
        let attach = self.options.attach_links_on_render;

        self.with_session(|s| {
            let page = Page::load(s.doc.as_ref(), index)?;
            let image = page.render(width, height)?;

            let links = match s.links_attached.get_mut(index) {
                Some(attached) if attach && !*attached => {
                    *attached = true;
                    Some(page.links(dpi))
                }
                _ => None,
            };
            Ok((image, links))
        })
    }

    /// Character boxes of a page in device units at `dpi`.
    pub fn extract_text(&self, index: usize, dpi: Dpi) -> Result<Vec<TextBox>> {
        self.with_session(|s| Ok(s.page(index)?.text_boxes(dpi)))
    }

    /// Normalized text of a page, built at the document resolution.
    pub fn text_page(&self, index: usize) -> Result<TextPage> {
        let dpi = self.options.dpi;
        self.with_session(|s| {
            let page = s.page(index)?;
            let boxes = page.text_boxes(dpi);
            Ok(TextPage::from_boxes(&boxes, page.size(dpi)))
        })
    }

    /// Links of a page with rectangles normalized at `dpi`.
    pub fn extract_links(&self, index: usize, dpi: Dpi) -> Result<Vec<Link>> {
        self.with_session(|s| Ok(s.page(index)?.links(dpi)))
    }

    /// The document outline, or `None` when it has none.
    ///
    /// Built once per session and shared afterwards.
    pub fn synopsis(&self) -> Result<Option<Arc<Outline>>> {
        self.with_session(|s| {
            if let Some(cached) = &s.outline {
                log::debug!("Outline cache hit");
                return Ok(cached.clone());
            }
            let outline = build_outline(s.doc.as_ref()).map(Arc::new);
            s.outline = Some(outline.clone());
            Ok(outline)
        })
    }

    // ---- metadata ----

    /// Information entries for the requested keys.
    ///
    /// Mime type and page count are always present. Dates are reported in
    /// RFC 3339 form when they parse, raw otherwise.
    pub fn metadata_info(&self, keys: &HashSet<InfoKey>) -> Result<DocumentInfo> {
        self.with_session(|s| {
            let mut info = DocumentInfo::new();
            info.set(DocumentInfo::MIME_TYPE, MIME_TYPE_PDF);
            info.set(DocumentInfo::PAGES, s.doc.page_count().to_string());

            for key in InfoKey::ALL.iter().filter(|key| keys.contains(key)) {
                let Some(engine_key) = key.engine_key() else {
                    continue;
                };
                let Some(value) = s.doc.info_key(engine_key) else {
                    continue;
                };
                let value = if key.is_date() {
                    parse_pdf_date(&value)
                        .map(|date| date.to_rfc3339())
                        .unwrap_or(value)
                } else {
                    value
                };
                info.set(key.name(), value);
            }

            if keys.contains(&InfoKey::CustomKeys) {
                info.set(
                    DocumentInfo::FORMAT,
                    format!("PDF v. {}", s.doc.format_version()),
                );
            }

            Ok(info)
        })
    }

    /// The document title, if set.
    pub fn document_title(&self) -> Result<Option<String>> {
        self.with_session(|s| Ok(s.doc.info_key("Title")))
    }

    /// Declared page presentation mode.
    pub fn page_mode(&self) -> Result<PageMode> {
        self.with_session(|s| Ok(s.doc.page_mode()))
    }

    /// Format version, e.g. `1.7`.
    pub fn format_version(&self) -> Result<f32> {
        self.with_session(|s| Ok(s.doc.format_version()))
    }

    /// Viewer hint for `key`, or `None` when the document gives none.
    pub fn meta_data(&self, key: &MetaDataKey) -> Result<Option<MetaValue>> {
        if let MetaDataKey::NamedViewport(name) = key {
            if !name.is_empty() {
                log::warn!("Named viewports are not stored, ignoring {:?}", name);
            }
            return Ok(None);
        }

        self.with_session(|s| {
            let value = match key {
                MetaDataKey::DocumentTitle => s.doc.info_key("Title").map(MetaValue::Text),
                MetaDataKey::StartFullScreen => {
                    (s.doc.page_mode() == PageMode::FullScreen).then_some(MetaValue::Flag(true))
                }
                MetaDataKey::OpenToc => {
                    (s.doc.page_mode() == PageMode::UseOutlines).then_some(MetaValue::Flag(true))
                }
                MetaDataKey::NamedViewport(_) => None,
            };
            Ok(value)
        })
    }

    // ---- source search ----

    /// Source location under a device point on a page, at the document
    /// resolution.
    ///
    /// Returns `None` when no source index is loaded. With a source loader
    /// configured, a closed document is `NotOpen`.
    pub fn forward_source_query(&self, index: usize, x: f64, y: f64) -> Result<Option<SourceLocation>> {
        let dpi = self.options.dpi;
        let mut guard = self.lock()?;
        if guard.is_none() && self.source_loader.is_some() {
            return Err(Error::NotOpen);
        }
        let Some(session) = guard.as_mut().filter(|s| s.mapper.is_some()) else {
            return Ok(None);
        };
        if session.locked {
            return Err(Error::Locked);
        }

        let count = session.doc.page_count();
        if index >= count {
            return Err(Error::PageOutOfRange(index, count));
        }
        Ok(session
            .mapper
            .as_mut()
            .and_then(|mapper| mapper.forward(index, x, y, dpi)))
    }

    /// Viewport of a `src:<line><path>` reference.
    ///
    /// Returns `None` when no source index is loaded, the string is not a
    /// reference, or nothing matches. With a source loader configured, a
    /// closed document is `NotOpen`.
    pub fn reverse_source_query(&self, reference: &str) -> Result<Option<Viewport>> {
        let dpi = self.options.dpi;
        let mut guard = self.lock()?;
        if guard.is_none() && self.source_loader.is_some() {
            return Err(Error::NotOpen);
        }
        let Some(session) = guard.as_mut().filter(|s| s.mapper.is_some()) else {
            return Ok(None);
        };
        if session.locked {
            return Err(Error::Locked);
        }

        let Some(reference) = SourceReference::parse(reference) else {
            log::debug!("{:?} is not a source reference", reference);
            return Ok(None);
        };

        let Session { doc, mapper, .. } = session;
        let doc: &dyn EngineDocument = &**doc;
        Ok(mapper.as_mut().and_then(|mapper| {
            mapper.reverse(&reference, dpi, |page| {
                Page::load(doc, page).ok().map(|page| page.size(dpi))
            })
        }))
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("engine", &self.engine.name())
            .field("options", &self.options)
            .field("open", &self.is_open())
            .finish()
    }
}
