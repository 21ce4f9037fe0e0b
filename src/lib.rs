//! # folio
//!
//! Resolution-independent document model on top of a native rendering
//! engine.
//!
//! This library adapts a paginated document opened by an engine into what a
//! document viewer needs: page rasters, per-character text geometry, a table
//! of contents, resolved links, and synchronized search between rendered
//! positions and source files.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use folio::{Document, Dpi, Engine, OpenResult};
//!
//! fn show(engine: Arc<dyn Engine>) -> folio::Result<()> {
//!     let doc = Document::new(engine);
//!
//!     if doc.open("paper.pdf")? == OpenResult::NeedsPassword {
//!         doc.unlock("secret")?;
//!     }
//!
//!     let image = doc.render_page(0, 612, 792)?;
//!     let text = doc.extract_text(0, Dpi::uniform(96.0))?;
//!     println!("{}x{}, {} characters", image.width(), image.height(), text.len());
//!
//!     if let Some(outline) = doc.synopsis()? {
//!         for (depth, node) in outline.iter() {
//!             println!("{}{}", "  ".repeat(depth), node.title);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Units
//!
//! Engines work in native units (1/72 inch). Text boxes are reported in
//! device units at the caller's resolution; every other coordinate handed to
//! the host is normalized to the page, so `0.0..=1.0` spans the page box.
//!
//! ## Threading
//!
//! Engine handles are not reentrant. A [`Document`] serializes every call
//! behind one lock and can be shared through an `Arc`; a
//! [`DocumentWorker`] serves one from a dedicated thread instead.

pub mod document;
pub mod engine;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod model;
pub mod options;
pub mod page;
pub mod source;
pub mod worker;

// Re-export commonly used types
pub use document::{Document, OpenResult};
pub use engine::{Engine, EngineDocument, EnginePage};
pub use error::{Error, Result};
pub use geometry::{Dpi, NormalizedRect, Rect, SizeF};
pub use model::{
    Anchor, Destination, DocumentInfo, InfoKey, JsonFormat, Link, LinkTarget, MetaDataKey,
    MetaValue, Outline, OutlineNode, PageInfo, PageMode, TextBox, TextPage, Viewport,
};
pub use options::DocumentOptions;
pub use page::Page;
pub use source::{SourceIndex, SourceIndexLoader, SourceLocation};
pub use worker::DocumentWorker;
