//! Document-level information.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// MIME type reported for every document.
pub const MIME_TYPE_PDF: &str = "application/pdf";

/// Declared page presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageMode {
    /// No special mode
    #[default]
    None,
    /// Show the outline panel
    UseOutlines,
    /// Show the thumbnail panel
    UseThumbnails,
    /// Start in full screen
    FullScreen,
    /// Show the optional content panel
    UseOptionalContent,
    /// Show the attachments panel
    UseAttachments,
}

/// Information entries a host may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InfoKey {
    Title,
    Subject,
    Author,
    Keywords,
    Creator,
    Producer,
    CreationDate,
    ModificationDate,
    /// Derived entries that have no information dictionary key ("format")
    CustomKeys,
}

impl InfoKey {
    /// Every key, in reporting order.
    pub const ALL: [InfoKey; 9] = [
        InfoKey::Title,
        InfoKey::Subject,
        InfoKey::Author,
        InfoKey::Keywords,
        InfoKey::Creator,
        InfoKey::Producer,
        InfoKey::CreationDate,
        InfoKey::ModificationDate,
        InfoKey::CustomKeys,
    ];

    /// Key under which the value is reported in [`DocumentInfo`].
    pub fn name(self) -> &'static str {
        match self {
            InfoKey::Title => "title",
            InfoKey::Subject => "subject",
            InfoKey::Author => "author",
            InfoKey::Keywords => "keywords",
            InfoKey::Creator => "creator",
            InfoKey::Producer => "producer",
            InfoKey::CreationDate => "creation_date",
            InfoKey::ModificationDate => "modification_date",
            InfoKey::CustomKeys => "custom",
        }
    }

    /// Information dictionary key the engine is asked for.
    pub fn engine_key(self) -> Option<&'static str> {
        match self {
            InfoKey::Title => Some("Title"),
            InfoKey::Subject => Some("Subject"),
            InfoKey::Author => Some("Author"),
            InfoKey::Keywords => Some("Keywords"),
            InfoKey::Creator => Some("Creator"),
            InfoKey::Producer => Some("Producer"),
            InfoKey::CreationDate => Some("CreationDate"),
            InfoKey::ModificationDate => Some("ModDate"),
            InfoKey::CustomKeys => None,
        }
    }

    /// Whether the raw value is a date string.
    pub fn is_date(self) -> bool {
        matches!(self, InfoKey::CreationDate | InfoKey::ModificationDate)
    }
}

/// Key/value information about a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Entries by name
    pub entries: BTreeMap<String, String>,
}

impl DocumentInfo {
    /// Key of the MIME type entry.
    pub const MIME_TYPE: &'static str = "mime_type";
    /// Key of the page count entry.
    pub const PAGES: &'static str = "pages";
    /// Key of the derived format version entry.
    pub const FORMAT: &'static str = "format";

    /// Create an empty info map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Get an entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Get the entry for a requestable key.
    pub fn get_key(&self, key: InfoKey) -> Option<&str> {
        self.get(key.name())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Size and timing of one page, as reported when a document opens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Zero-based page index
    pub index: usize,
    /// Width in device units at the document resolution
    pub width: f64,
    /// Height in device units at the document resolution
    pub height: f64,
    /// Presentation duration in seconds
    pub duration: Option<f64>,
}

/// Viewer hints a host may query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaDataKey {
    /// The document title
    DocumentTitle,
    /// Whether to start in full screen
    StartFullScreen,
    /// Whether to show the table of contents on open
    OpenToc,
    /// A named viewport
    NamedViewport(String),
}

/// Value of a viewer hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    /// A string value
    Text(String),
    /// A boolean value
    Flag(bool),
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm') into UTC.
pub fn parse_pdf_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    let offset = s.get(14..).map_or(FixedOffset::east_opt(0), parse_utc_offset)?;
    let naive = chrono::NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(hour, minute, second)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse the `Z`, `+HH'mm'` or `-HH'mm'` suffix of a PDF date. A missing
/// suffix is UTC.
fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let sign = match s.chars().next() {
        None | Some('Z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };
    let hours: i32 = s.get(1..3)?.parse().ok()?;
    let minutes: i32 = s
        .get(3..)
        .map(|rest| rest.trim_start_matches('\'').trim_end_matches('\''))
        .filter(|rest| !rest.is_empty())
        .map_or(Some(0), |rest| rest.parse().ok())?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
