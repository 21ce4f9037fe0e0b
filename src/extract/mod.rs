//! Extraction from engine pages into host model types.
//!
//! Functions here take engine handles by reference and return owned
//! results. Engine failures degrade to empty results; only invalid
//! arguments are errors.

mod links;
mod outline;
mod raster;
mod text;

pub use links::{page_links, LinkResolver, Resolution};
pub use outline::build_outline;
pub use raster::{pixmap_to_image, render_page};
pub use text::{collect_text_boxes, extract_text_boxes};
