//! In-memory engine and source index shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use folio::engine::{
    Cookie, Engine, EngineDocument, EnginePage, Location, Pixmap, RawLink, RawOutline,
    StextBlock, StextLine, StextPage,
};
use folio::error::{Error, Result};
use folio::geometry::{Matrix, Point, Rect};
use folio::source::{ForwardHit, ReverseHit, SourceIndex, SourceIndexLoader};
use folio::PageMode;

/// Install a test logger once.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Counts engine entries and records any that overlap.
#[derive(Debug, Default)]
pub struct Probe {
    active: AtomicUsize,
    overlaps: AtomicUsize,
    calls: AtomicUsize,
}

impl Probe {
    fn enter(&self) -> Entered<'_> {
        if self.active.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Entered(self)
    }

    /// Number of engine calls seen while another was in progress.
    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    /// Total number of instrumented engine calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

struct Entered<'a>(&'a Probe);

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One page of the fake document.
#[derive(Debug, Clone)]
pub struct FakePage {
    pub width: f64,
    pub height: f64,
    /// Text lines laid out from (10, 20), 14 units apart
    pub lines: Vec<String>,
    /// Native rectangle painted black on render
    pub ink: Option<Rect>,
    pub links: Vec<RawLink>,
    pub duration: Option<f64>,
    pub render_errors: u32,
    pub text_errors: u32,
}

impl FakePage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            lines: Vec::new(),
            ink: None,
            links: Vec::new(),
            duration: None,
            render_errors: 0,
            text_errors: 0,
        }
    }

    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    pub fn with_lines(mut self, lines: &[&str]) -> Self {
        self.lines = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_ink(mut self, rect: Rect) -> Self {
        self.ink = Some(rect);
        self
    }

    pub fn with_link(mut self, rect: Rect, uri: &str) -> Self {
        self.links.push(RawLink::new(rect, uri));
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn failing_render(mut self) -> Self {
        self.render_errors = 1;
        self
    }

    pub fn failing_text(mut self) -> Self {
        self.text_errors = 2;
        self
    }
}

/// Contents of the fake document.
#[derive(Debug, Clone, Default)]
pub struct FakeSpec {
    pub pages: Vec<FakePage>,
    pub password: Option<String>,
    pub outline: Option<Box<RawOutline>>,
    pub info: HashMap<String, String>,
    pub page_mode: PageMode,
    pub version: f32,
    /// Extra bytes per pixmap row
    pub row_padding: usize,
    /// Delay inside each page call, widening any race window
    pub delay: Duration,
}

impl FakeSpec {
    pub fn with_pages(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            version: 1.7,
            ..Default::default()
        }
    }
}

/// Engine serving one in-memory document for every path except `missing.pdf`.
pub struct FakeEngine {
    spec: Arc<FakeSpec>,
    probe: Arc<Probe>,
}

impl FakeEngine {
    pub fn new(spec: FakeSpec) -> Self {
        Self {
            spec: Arc::new(spec),
            probe: Arc::new(Probe::default()),
        }
    }

    pub fn probe(&self) -> Arc<Probe> {
        Arc::clone(&self.probe)
    }
}

impl Engine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn EngineDocument>> {
        if path.file_name().is_some_and(|name| name == "missing.pdf") {
            return Err(Error::Engine("cannot find document".to_string()));
        }
        Ok(Box::new(FakeDocument {
            spec: Arc::clone(&self.spec),
            probe: Arc::clone(&self.probe),
            locked: self.spec.password.is_some(),
        }))
    }
}

struct FakeDocument {
    spec: Arc<FakeSpec>,
    probe: Arc<Probe>,
    locked: bool,
}

impl EngineDocument for FakeDocument {
    fn needs_password(&self) -> bool {
        self.locked
    }

    fn authenticate(&mut self, password: &str) -> bool {
        if self.spec.password.as_deref() == Some(password) {
            self.locked = false;
        }
        !self.locked
    }

    fn page_count(&self) -> usize {
        self.spec.pages.len()
    }

    fn load_page(&self, index: usize) -> Result<Box<dyn EnginePage + '_>> {
        let _entered = self.probe.enter();
        let page = self
            .spec
            .pages
            .get(index)
            .ok_or(Error::PageOutOfRange(index, self.spec.pages.len()))?;
        Ok(Box::new(FakePageHandle {
            page,
            probe: self.probe.as_ref(),
            delay: self.spec.delay,
        }))
    }

    fn new_pixmap(&self, width: u32, height: u32) -> Pixmap {
        Pixmap::with_stride(width, height, width as usize * 4 + self.spec.row_padding)
    }

    fn resolve_link(&self, uri: &str) -> Location {
        uri.strip_prefix("#page=")
            .and_then(|rest| {
                let mut parts = rest.split('&');
                let page = parts.next()?.parse::<i32>().ok()?;
                let x = parts.next().and_then(|v| v.parse().ok()).unwrap_or(0.0);
                let y = parts.next().and_then(|v| v.parse().ok()).unwrap_or(0.0);
                Some(Location::new(page - 1, x, y))
            })
            .unwrap_or(Location::UNRESOLVED)
    }

    fn outline(&self) -> Option<Box<RawOutline>> {
        self.spec.outline.clone()
    }

    fn info_key(&self, key: &str) -> Option<String> {
        self.spec.info.get(key).cloned()
    }

    fn page_mode(&self) -> PageMode {
        self.spec.page_mode
    }

    fn format_version(&self) -> f32 {
        self.spec.version
    }
}

struct FakePageHandle<'a> {
    page: &'a FakePage,
    probe: &'a Probe,
    delay: Duration,
}

impl EnginePage for FakePageHandle<'_> {
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.page.width, self.page.height)
    }

    fn presentation_duration(&self) -> Option<f64> {
        self.page.duration
    }

    fn run(&self, ctm: &Matrix, pixmap: &mut Pixmap, cookie: &mut Cookie) {
        let _entered = self.probe.enter();
        thread::sleep(self.delay);

        if self.page.render_errors > 0 {
            pixmap.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), [255, 0, 0, 255]);
            cookie.errors += self.page.render_errors;
            return;
        }
        if let Some(ink) = self.page.ink {
            pixmap.fill_rect(ctm.transform_rect(ink), [0, 0, 0, 255]);
        }
    }

    fn structured_text(&self, cookie: &mut Cookie) -> Result<StextPage> {
        let _entered = self.probe.enter();
        thread::sleep(self.delay);

        cookie.errors += self.page.text_errors;
        let lines = self
            .page
            .lines
            .iter()
            .enumerate()
            .map(|(i, text)| {
                StextLine::layout(text, Point::new(10.0, 20.0 + 14.0 * i as f64), 6.0, 12.0)
            })
            .collect();

        let mut stext = StextPage::new();
        stext.push(StextBlock::text(lines));
        Ok(stext)
    }

    fn links(&self) -> Vec<RawLink> {
        self.page.links.clone()
    }
}

/// Queries seen by a [`FakeIndex`].
#[derive(Debug, Default)]
pub struct IndexLog {
    pub forward: Vec<(u32, f64, f64)>,
    pub reverse: Vec<(String, i32, i32)>,
}

/// Source index answering every query with fixed hits.
pub struct FakeIndex {
    log: Arc<Mutex<IndexLog>>,
    forward_hits: Vec<ForwardHit>,
    reverse_hits: Vec<ReverseHit>,
}

impl SourceIndex for FakeIndex {
    fn forward_query(&mut self, page: u32, x: f64, y: f64) -> Vec<ForwardHit> {
        self.log.lock().unwrap().forward.push((page, x, y));
        self.forward_hits.clone()
    }

    fn reverse_query(&mut self, path: &str, line: i32, column: i32) -> Vec<ReverseHit> {
        self.log
            .lock()
            .unwrap()
            .reverse
            .push((path.to_string(), line, column));
        self.reverse_hits.clone()
    }
}

/// Loader handing out a [`FakeIndex`] for every document.
pub struct FakeIndexLoader {
    pub log: Arc<Mutex<IndexLog>>,
    pub forward_hits: Vec<ForwardHit>,
    pub reverse_hits: Vec<ReverseHit>,
}

impl FakeIndexLoader {
    pub fn new(forward_hits: Vec<ForwardHit>, reverse_hits: Vec<ReverseHit>) -> Self {
        Self {
            log: Arc::new(Mutex::new(IndexLog::default())),
            forward_hits,
            reverse_hits,
        }
    }
}

impl SourceIndexLoader for FakeIndexLoader {
    fn load(&self, _document: &Path) -> Option<Box<dyn SourceIndex>> {
        Some(Box::new(FakeIndex {
            log: Arc::clone(&self.log),
            forward_hits: self.forward_hits.clone(),
            reverse_hits: self.reverse_hits.clone(),
        }))
    }
}

/// A three page document with text, links, an outline and metadata.
pub fn sample_spec() -> FakeSpec {
    let mut spec = FakeSpec::with_pages(vec![
        FakePage::letter()
            .with_lines(&["Hello", "world"])
            .with_ink(Rect::new(0.0, 0.0, 306.0, 396.0))
            .with_link(Rect::new(153.0, 198.0, 306.0, 396.0), "#page=2&150&200")
            .with_link(Rect::new(0.0, 0.0, 612.0, 99.0), "https://example.org")
            .with_link(Rect::new(0.0, 0.0, 10.0, 10.0), "#page=42")
            .with_duration(3.0),
        FakePage::new(300.0, 400.0).with_duration(0.05),
        FakePage::letter().with_lines(&["Last"]),
    ]);

    spec.outline = RawOutline::chain(vec![
        RawOutline::new("Introduction", "#page=1").open(),
        RawOutline::new("Body", "#page=2&150&100").with_children(vec![
            RawOutline::new("Details", "#nameddest=details"),
            RawOutline::new("Elsewhere", "https://example.org/more"),
        ]),
        RawOutline::new("Dangling", "#page=99").with_children(vec![RawOutline::new(
            "Still here",
            "#page=3",
        )]),
    ]);

    spec.info.insert("Title".to_string(), "Sample".to_string());
    spec.info.insert("Author".to_string(), "Jo Doe".to_string());
    spec.info
        .insert("CreationDate".to_string(), "D:20240115103045Z".to_string());
    spec
}
