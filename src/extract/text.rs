//! Per-character text extraction.

use crate::engine::{Cookie, EnginePage, StextBlock, StextPage};
use crate::geometry::Dpi;
use crate::model::TextBox;

/// Run the engine's structured text pass and collect character boxes.
///
/// Returns an empty sequence when the pass fails or reports errors.
pub fn extract_text_boxes(page: &dyn EnginePage, dpi: Dpi) -> Vec<TextBox> {
    let mut cookie = Cookie::new();
    match page.structured_text(&mut cookie) {
        Ok(stext) if !cookie.has_errors() => collect_text_boxes(&stext, dpi),
        Ok(_) => {
            log::warn!(
                "Structured text pass reported {} error(s), dropping page text",
                cookie.errors
            );
            Vec::new()
        }
        Err(e) => {
            log::warn!("Structured text pass failed: {}", e);
            Vec::new()
        }
    }
}

/// Walk blocks, lines and characters into device-unit boxes.
///
/// Non-text blocks are skipped. The last box of every non-empty line is
/// flagged as end of line; empty lines add nothing.
pub fn collect_text_boxes(stext: &StextPage, dpi: Dpi) -> Vec<TextBox> {
    let mut boxes = Vec::with_capacity(stext.char_count());

    for block in &stext.blocks {
        let StextBlock::Text { lines, .. } = block else {
            continue;
        };

        for line in lines {
            for ch in &line.chars {
                boxes.push(TextBox::new(ch.c, ch.quad.bounds().to_device(dpi)));
            }

            if !line.chars.is_empty() {
                if let Some(last) = boxes.last_mut() {
                    last.mark_at_end_of_line();
                }
            }
        }
    }

    boxes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StextLine;
    use crate::geometry::{Point, Rect};

    fn two_line_page() -> StextPage {
        let mut page = StextPage::new();
        page.push(StextBlock::text(vec![
            StextLine::layout("Hi", Point::new(10.0, 10.0), 6.0, 12.0),
            StextLine::default(),
            StextLine::layout("you", Point::new(10.0, 24.0), 6.0, 12.0),
        ]));
        page
    }

    #[test]
    fn test_end_of_line_flags() {
        let boxes = collect_text_boxes(&two_line_page(), Dpi::NATIVE);
        let text: String = boxes.iter().map(|b| b.c).collect();
        assert_eq!(text, "Hiyou");

        let flags: Vec<bool> = boxes.iter().map(|b| b.end_of_line).collect();
        assert_eq!(flags, vec![false, true, false, false, true]);
    }

    #[test]
    fn test_boxes_in_device_units() {
        let boxes = collect_text_boxes(&two_line_page(), Dpi::uniform(144.0));
        assert_eq!(boxes[0].rect, Rect::new(20.0, 20.0, 32.0, 44.0));
    }

    #[test]
    fn test_image_blocks_skipped() {
        let mut page = StextPage::new();
        page.push(StextBlock::Image {
            bbox: Rect::new(0.0, 0.0, 100.0, 100.0),
        });
        page.push(StextBlock::text(vec![StextLine::layout(
            "x",
            Point::new(0.0, 0.0),
            5.0,
            5.0,
        )]));

        let boxes = collect_text_boxes(&page, Dpi::NATIVE);
        assert_eq!(boxes.len(), 1);
        assert!(boxes[0].end_of_line);
    }

    #[test]
    fn test_block_of_empty_lines() {
        let mut page = StextPage::new();
        page.push(StextBlock::text(vec![StextLine::default(), StextLine::default()]));
        assert!(collect_text_boxes(&page, Dpi::NATIVE).is_empty());
    }
}
