//! Message-passing front end.
//!
//! A [`DocumentWorker`] owns a [`Document`] on a dedicated thread and feeds
//! it requests from a channel, for hosts that prefer sending messages to
//! sharing a lock. Requests are served strictly in arrival order.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use image::RgbaImage;

use crate::document::{Document, OpenResult};
use crate::error::{Error, Result};
use crate::geometry::Dpi;
use crate::model::{Link, Outline, TextBox, Viewport};
use crate::source::SourceLocation;

type Reply<T> = Sender<Result<T>>;

enum Request {
    Open {
        path: PathBuf,
        reply: Reply<OpenResult>,
    },
    Unlock {
        password: String,
        reply: Reply<bool>,
    },
    PageCount {
        reply: Reply<usize>,
    },
    Render {
        index: usize,
        width: u32,
        height: u32,
        reply: Reply<RgbaImage>,
    },
    ExtractText {
        index: usize,
        dpi: Dpi,
        reply: Reply<Vec<TextBox>>,
    },
    ExtractLinks {
        index: usize,
        dpi: Dpi,
        reply: Reply<Vec<Link>>,
    },
    Synopsis {
        reply: Reply<Option<Arc<Outline>>>,
    },
    ForwardSource {
        index: usize,
        x: f64,
        y: f64,
        reply: Reply<Option<SourceLocation>>,
    },
    ReverseSource {
        reference: String,
        reply: Reply<Option<Viewport>>,
    },
    Close {
        reply: Reply<()>,
    },
}

/// Handle to a document served by its own thread.
pub struct DocumentWorker {
    requests: Option<Sender<Request>>,
    thread: Option<JoinHandle<()>>,
}

impl DocumentWorker {
    /// Move `document` onto a new worker thread.
    pub fn spawn(document: Document) -> Result<Self> {
        let (sender, receiver) = unbounded();
        let thread = thread::Builder::new()
            .name("folio-document".to_string())
            .spawn(move || serve(document, receiver))?;

        Ok(Self {
            requests: Some(sender),
            thread: Some(thread),
        })
    }

    fn call<T>(&self, request: impl FnOnce(Reply<T>) -> Request) -> Result<T> {
        let requests = self.requests.as_ref().ok_or(Error::WorkerClosed)?;
        let (reply, response) = bounded(1);
        requests
            .send(request(reply))
            .map_err(|_| Error::WorkerClosed)?;
        response.recv().map_err(|_| Error::WorkerClosed)?
    }

    /// See [`Document::open`].
    pub fn open(&self, path: impl Into<PathBuf>) -> Result<OpenResult> {
        let path = path.into();
        self.call(|reply| Request::Open { path, reply })
    }

    /// See [`Document::unlock`].
    pub fn unlock(&self, password: &str) -> Result<bool> {
        let password = password.to_string();
        self.call(|reply| Request::Unlock { password, reply })
    }

    /// See [`Document::page_count`].
    pub fn page_count(&self) -> Result<usize> {
        self.call(|reply| Request::PageCount { reply })
    }

    /// See [`Document::render_page`].
    pub fn render_page(&self, index: usize, width: u32, height: u32) -> Result<RgbaImage> {
        self.call(|reply| Request::Render {
            index,
            width,
            height,
            reply,
        })
    }

    /// See [`Document::extract_text`].
    pub fn extract_text(&self, index: usize, dpi: Dpi) -> Result<Vec<TextBox>> {
        self.call(|reply| Request::ExtractText { index, dpi, reply })
    }

    /// See [`Document::extract_links`].
    pub fn extract_links(&self, index: usize, dpi: Dpi) -> Result<Vec<Link>> {
        self.call(|reply| Request::ExtractLinks { index, dpi, reply })
    }

    /// See [`Document::synopsis`].
    pub fn synopsis(&self) -> Result<Option<Arc<Outline>>> {
        self.call(|reply| Request::Synopsis { reply })
    }

    /// See [`Document::forward_source_query`].
    pub fn forward_source_query(&self, index: usize, x: f64, y: f64) -> Result<Option<SourceLocation>> {
        self.call(|reply| Request::ForwardSource { index, x, y, reply })
    }

    /// See [`Document::reverse_source_query`].
    pub fn reverse_source_query(&self, reference: &str) -> Result<Option<Viewport>> {
        let reference = reference.to_string();
        self.call(|reply| Request::ReverseSource { reference, reply })
    }

    /// See [`Document::close`].
    pub fn close(&self) -> Result<()> {
        self.call(|reply| Request::Close { reply })
    }

    /// Stop the worker thread and wait for it to exit.
    ///
    /// Requests made afterwards fail with [`Error::WorkerClosed`].
    pub fn shutdown(&mut self) {
        self.requests.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Document worker thread panicked");
            }
        }
    }

    /// Whether the worker still accepts requests.
    pub fn is_running(&self) -> bool {
        self.requests.is_some()
    }
}

impl Drop for DocumentWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn serve(document: Document, requests: Receiver<Request>) {
    log::debug!("Document worker started");

    // A dropped reply receiver only means the caller stopped waiting.
    for request in requests {
        match request {
            Request::Open { path, reply } => {
                let _ = reply.send(document.open(&path));
            }
            Request::Unlock { password, reply } => {
                let _ = reply.send(document.unlock(&password));
            }
            Request::PageCount { reply } => {
                let _ = reply.send(document.page_count());
            }
            Request::Render {
                index,
                width,
                height,
                reply,
            } => {
                let _ = reply.send(document.render_page(index, width, height));
            }
            Request::ExtractText { index, dpi, reply } => {
                let _ = reply.send(document.extract_text(index, dpi));
            }
            Request::ExtractLinks { index, dpi, reply } => {
                let _ = reply.send(document.extract_links(index, dpi));
            }
            Request::Synopsis { reply } => {
                let _ = reply.send(document.synopsis());
            }
            Request::ForwardSource { index, x, y, reply } => {
                let _ = reply.send(document.forward_source_query(index, x, y));
            }
            Request::ReverseSource { reference, reply } => {
                let _ = reply.send(document.reverse_source_query(&reference));
            }
            Request::Close { reply } => {
                let _ = reply.send(document.close());
            }
        }
    }

    if let Err(e) = document.close() {
        log::warn!("Failed to close document on worker exit: {}", e);
    }
    log::debug!("Document worker stopped");
}
