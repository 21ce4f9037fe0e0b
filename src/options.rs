//! Document options and configuration.

use crate::geometry::Dpi;

/// Reference resolution of source-sync indexes, in units per inch.
pub const DEFAULT_SOURCE_REFERENCE_DPI: f64 = 96.0;

/// Shortest presentation duration, in seconds, reported to the host.
pub const DEFAULT_MIN_PRESENTATION_DURATION: f64 = 0.1;

/// Options for a [`crate::Document`].
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    /// Host resolution used for page sizes, links attached on render, text
    /// pages and source queries
    pub dpi: Dpi,

    /// Resolution the source index expects coordinates in
    pub source_reference_dpi: f64,

    /// Durations below this are reported as absent
    pub min_presentation_duration: f64,

    /// Whether the first render of a page also returns its links
    pub attach_links_on_render: bool,
}

impl DocumentOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host resolution.
    pub fn with_dpi(mut self, dpi: Dpi) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the source index reference resolution.
    pub fn with_source_reference_dpi(mut self, dpi: f64) -> Self {
        self.source_reference_dpi = dpi;
        self
    }

    /// Set the shortest reported presentation duration.
    pub fn with_min_presentation_duration(mut self, seconds: f64) -> Self {
        self.min_presentation_duration = seconds;
        self
    }

    /// Enable or disable link attachment on first render.
    pub fn with_links_on_render(mut self, attach: bool) -> Self {
        self.attach_links_on_render = attach;
        self
    }
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            dpi: Dpi::NATIVE,
            source_reference_dpi: DEFAULT_SOURCE_REFERENCE_DPI,
            min_presentation_duration: DEFAULT_MIN_PRESENTATION_DURATION,
            attach_links_on_render: true,
        }
    }
}
