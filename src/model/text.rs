//! Character geometry types.

use serde::{Deserialize, Serialize};

use crate::geometry::{NormalizedRect, Rect, SizeF};

/// One extracted character.
///
/// `rect` is in device units at the resolution the extraction was asked
/// for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    /// Character value
    pub c: char,
    /// Bounding rectangle in device units
    pub rect: Rect,
    /// Whether this is the last character of its line
    pub end_of_line: bool,
}

impl TextBox {
    /// Create a box that is not at the end of a line.
    pub fn new(c: char, rect: Rect) -> Self {
        Self {
            c,
            rect,
            end_of_line: false,
        }
    }

    /// Character value.
    pub fn text(&self) -> char {
        self.c
    }

    /// Whether this is the last character of its line.
    pub fn is_at_end_of_line(&self) -> bool {
        self.end_of_line
    }

    /// Mark this as the last character of its line.
    pub fn mark_at_end_of_line(&mut self) {
        self.end_of_line = true;
    }
}

/// A character run with normalized geometry, ready for a host text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntity {
    /// Character, followed by `'\n'` at the end of a line
    pub text: String,
    /// Normalized bounding rectangle
    pub rect: NormalizedRect,
}

/// Text of one page in normalized coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextPage {
    /// Entities in extraction order
    pub entities: Vec<TextEntity>,
}

impl TextPage {
    /// Create an empty text page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize device-unit boxes against the page's device size.
    pub fn from_boxes(boxes: &[TextBox], page: SizeF) -> Self {
        let entities = boxes
            .iter()
            .map(|b| {
                let mut text = String::with_capacity(2);
                text.push(b.c);
                if b.end_of_line {
                    text.push('\n');
                }
                TextEntity {
                    text,
                    rect: b.rect.normalize(page),
                }
            })
            .collect();
        Self { entities }
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the page has no text.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Concatenated text, with line breaks where lines end.
    pub fn plain_text(&self) -> String {
        self.entities.iter().map(|e| e.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_end_of_line() {
        let mut b = TextBox::new('x', Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(!b.is_at_end_of_line());
        b.mark_at_end_of_line();
        assert!(b.is_at_end_of_line());
        assert_eq!(b.text(), 'x');
    }

    #[test]
    fn test_text_page_from_boxes() {
        let mut boxes = vec![
            TextBox::new('H', Rect::new(0.0, 0.0, 10.0, 20.0)),
            TextBox::new('i', Rect::new(10.0, 0.0, 20.0, 20.0)),
            TextBox::new('!', Rect::new(0.0, 20.0, 10.0, 40.0)),
        ];
        boxes[1].mark_at_end_of_line();
        boxes[2].mark_at_end_of_line();

        let page = TextPage::from_boxes(&boxes, SizeF::new(100.0, 200.0));
        assert_eq!(page.len(), 3);
        assert_eq!(page.plain_text(), "Hi\n!\n");
        assert_eq!(page.entities[1].rect, NormalizedRect::new(0.1, 0.0, 0.2, 0.1));
    }

    #[test]
    fn test_empty_text_page() {
        let page = TextPage::from_boxes(&[], SizeF::new(10.0, 10.0));
        assert!(page.is_empty());
        assert_eq!(page.plain_text(), "");
    }
}
