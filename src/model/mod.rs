//! Host-facing model types.
//!
//! Everything in this module is owned, engine-independent and expressed in
//! device or normalized units. Values produced here never borrow from the
//! engine and stay valid after the document that produced them is closed.

mod info;
mod json;
mod link;
mod outline;
mod text;
mod viewport;

pub use info::{
    parse_pdf_date, DocumentInfo, InfoKey, MetaDataKey, MetaValue, PageInfo, PageMode,
    MIME_TYPE_PDF,
};
pub use json::{to_json, JsonFormat};
pub use link::{Link, LinkTarget};
pub use outline::{Destination, Outline, OutlineIter, OutlineNode};
pub use text::{TextBox, TextEntity, TextPage};
pub use viewport::{Anchor, ParseViewportError, Viewport};
