//! Synchronized source search.
//!
//! Maps rendered page positions to source file locations and back through
//! an external index. The index itself is out of scope: this module only
//! defines the query surface it must offer and the unit conversions around
//! it.

mod mapper;
mod reference;

pub use mapper::SourceMapper;
pub use reference::SourceReference;

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A forward query result as reported by the index.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardHit {
    /// Index-internal file tag
    pub tag: i32,
    /// 1-based line
    pub line: i32,
    /// Column, negative when unknown
    pub column: i32,
    /// Source file name
    pub name: String,
}

/// A reverse query result as reported by the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseHit {
    /// 1-based page number
    pub page: u32,
    /// Horizontal position at the reference resolution
    pub h: f64,
    /// Vertical position at the reference resolution
    pub v: f64,
}

/// Query surface of a source index.
///
/// Both queries return an empty sequence when nothing matches.
pub trait SourceIndex: Send {
    /// Find the source locations under a point on `page` (1-based).
    fn forward_query(&mut self, page: u32, x: f64, y: f64) -> Vec<ForwardHit>;

    /// Find the rendered positions of a source line.
    fn reverse_query(&mut self, path: &str, line: i32, column: i32) -> Vec<ReverseHit>;
}

/// Locates and opens the source index belonging to a document.
pub trait SourceIndexLoader: Send + Sync {
    /// Load the index for the document at `document`, if one exists.
    fn load(&self, document: &Path) -> Option<Box<dyn SourceIndex>>;
}

/// A position in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File path as recorded in the index
    pub path: String,
    /// 1-based line
    pub line: i32,
    /// Column, 0 when unknown
    pub column: i32,
}

impl SourceLocation {
    /// Create a new source location.
    pub fn new(path: impl Into<String>, line: i32, column: i32) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }
}
