//! Structured text produced by the engine's text pass.

use crate::geometry::{Point, Quad, Rect};

/// Result of a structured text pass over one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StextPage {
    /// Blocks in reading order
    pub blocks: Vec<StextBlock>,
}

impl StextPage {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block.
    pub fn push(&mut self, block: StextBlock) {
        self.blocks.push(block);
    }

    /// Total number of characters in text blocks.
    pub fn char_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|block| match block {
                StextBlock::Text { lines, .. } => lines.iter().map(|l| l.chars.len()).sum(),
                StextBlock::Image { .. } => 0,
            })
            .sum()
    }
}

/// A block of the structured text result.
#[derive(Debug, Clone, PartialEq)]
pub enum StextBlock {
    /// Lines of text
    Text {
        /// Block bounds in native units
        bbox: Rect,
        /// Lines in order
        lines: Vec<StextLine>,
    },
    /// A picture; carries no characters
    Image {
        /// Block bounds in native units
        bbox: Rect,
    },
}

impl StextBlock {
    /// Build a text block from lines, computing its bounds.
    pub fn text(lines: Vec<StextLine>) -> Self {
        let bbox = lines
            .iter()
            .flat_map(|line| line.chars.iter().map(|ch| ch.quad.bounds()))
            .reduce(|a, b| {
                Rect::new(a.x0.min(b.x0), a.y0.min(b.y0), a.x1.max(b.x1), a.y1.max(b.y1))
            })
            .unwrap_or_default();
        StextBlock::Text { bbox, lines }
    }
}

/// One line of characters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StextLine {
    /// Characters in order
    pub chars: Vec<StextChar>,
}

impl StextLine {
    /// Create a line from characters.
    pub fn new(chars: Vec<StextChar>) -> Self {
        Self { chars }
    }

    /// Lay out `text` left to right as fixed-advance glyphs.
    ///
    /// `origin` is the top-left corner of the first glyph in native units.
    pub fn layout(text: &str, origin: Point, advance: f64, height: f64) -> Self {
        let chars = text
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let x0 = origin.x + advance * i as f64;
                StextChar::new(
                    c,
                    Quad::from_rect(Rect::new(x0, origin.y, x0 + advance, origin.y + height)),
                )
            })
            .collect();
        Self { chars }
    }
}

/// One character with its glyph quad in native units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StextChar {
    /// Unicode value
    pub c: char,
    /// Glyph quad
    pub quad: Quad,
}

impl StextChar {
    /// Create a character.
    pub fn new(c: char, quad: Quad) -> Self {
        Self { c, quad }
    }
}
