//! Document outline (table of contents).

use serde::{Deserialize, Serialize};

use super::Viewport;

/// Jump target of an outline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Destination {
    /// A URI outside the document
    External {
        /// Target URI
        uri: String,
    },
    /// A position inside the document
    Internal(Viewport),
    /// A document-defined named anchor
    Named {
        /// Anchor name
        name: String,
    },
}

/// One entry of the outline tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Entry title
    pub title: String,
    /// Whether the entry is expanded by default
    pub open: bool,
    /// Jump target, if any
    pub destination: Option<Destination>,
    /// Child entries in document order
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Create a closed entry without destination or children.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            open: false,
            destination: None,
            children: Vec::new(),
        }
    }

    /// Set the destination.
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Add a child entry.
    pub fn add_child(&mut self, child: OutlineNode) {
        self.children.push(child);
    }
}

/// Outline tree. The root is synthetic; its children are the top-level
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Top-level entries
    pub children: Vec<OutlineNode>,
}

impl Outline {
    /// Create an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level entry.
    pub fn add_child(&mut self, child: OutlineNode) {
        self.children.push(child);
    }

    /// Check if the outline has no entries.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of entries, nested ones included.
    pub fn total_items(&self) -> usize {
        self.iter().count()
    }

    /// Nesting depth; 1 when only top-level entries exist.
    pub fn depth(&self) -> usize {
        self.iter().map(|(depth, _)| depth + 1).max().unwrap_or(0)
    }

    /// Pre-order traversal yielding `(depth, node)`, depth 0 at top level.
    pub fn iter(&self) -> OutlineIter<'_> {
        OutlineIter {
            stack: self.children.iter().rev().map(|n| (0, n)).collect(),
        }
    }
}

/// Pre-order iterator over an [`Outline`].
pub struct OutlineIter<'a> {
    stack: Vec<(usize, &'a OutlineNode)>,
}

impl<'a> Iterator for OutlineIter<'a> {
    type Item = (usize, &'a OutlineNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Outline {
        let mut outline = Outline::new();
        let mut chapter1 = OutlineNode::new("Chapter 1");
        chapter1.add_child(OutlineNode::new("Section 1.1"));
        let mut section = OutlineNode::new("Section 1.2");
        section.add_child(OutlineNode::new("Section 1.2.1"));
        chapter1.add_child(section);
        outline.add_child(chapter1);
        outline.add_child(OutlineNode::new("Chapter 2"));
        outline
    }

    #[test]
    fn test_total_items_and_depth() {
        let outline = sample();
        assert_eq!(outline.total_items(), 5);
        assert_eq!(outline.depth(), 3);
        assert_eq!(Outline::new().depth(), 0);
    }

    #[test]
    fn test_preorder() {
        let outline = sample();
        let titles: Vec<_> = outline
            .iter()
            .map(|(d, n)| format!("{}{}", d, n.title))
            .collect();
        assert_eq!(
            titles,
            vec![
                "0Chapter 1",
                "1Section 1.1",
                "1Section 1.2",
                "2Section 1.2.1",
                "0Chapter 2"
            ]
        );
    }
}
